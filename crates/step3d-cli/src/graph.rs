//! Graphviz DOT rendering of the assembly structure.
//!
//! Three layouts are available, numbered the way output files are named
//! (`<input>_<n>.dot`):
//! 1. top-down digraph, assemblies drawn as plain boxes
//! 2. the same graph laid out left to right
//! 3. a folder-style tree, children hanging off a point under their parent

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use step3d_hlr::{HlrResult, Part, Relation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphStyle {
    Normal,
    RankdirLr,
    Folder,
}

impl GraphStyle {
    pub const ALL: [GraphStyle; 3] = [GraphStyle::Normal, GraphStyle::RankdirLr, GraphStyle::Folder];

    /// Parse a `--style` value. `all` selects every style.
    pub fn parse_selection(s: &str) -> Result<Vec<Self>> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::ALL.to_vec()),
            "normal" | "1" => Ok(vec![Self::Normal]),
            "rankdir-lr" | "lr" | "2" => Ok(vec![Self::RankdirLr]),
            "folder" | "3" => Ok(vec![Self::Folder]),
            other => Err(anyhow!(
                "unknown graph style `{other}` (expected normal|rankdir-lr|folder|all)"
            )),
        }
    }

    pub fn number(self) -> u8 {
        match self {
            GraphStyle::Normal => 1,
            GraphStyle::RankdirLr => 2,
            GraphStyle::Folder => 3,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GraphOptions {
    /// Label edges with the relation that produced them.
    pub label_relations: bool,
}

/// `<out_dir>/<file name of input>_<n>.dot`; next to the input when no
/// directory is given.
pub fn output_path(input: &Path, out_dir: Option<&Path>, style: GraphStyle) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "step3d".to_string());
    let dir = out_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(format!("{file_name}_{}.dot", style.number()))
}

pub fn render_dot(result: &HlrResult, style: GraphStyle, options: &GraphOptions) -> String {
    match style {
        GraphStyle::Normal => render_digraph(result, options, false),
        GraphStyle::RankdirLr => render_digraph(result, options, true),
        GraphStyle::Folder => render_folder(result),
    }
}

fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn node_label(part: &Part) -> String {
    dot_escape(&format!("{}#{} {}", part.type_label, part.id, part.name))
}

fn edge_label(relation: &Relation) -> String {
    dot_escape(&format!("{}#{}", relation.type_label, relation.id))
}

fn render_digraph(result: &HlrResult, options: &GraphOptions, left_to_right: bool) -> String {
    let mut out = String::new();
    out.push_str("digraph G {\n");
    if left_to_right {
        out.push_str("rankdir=LR;\n");
        out.push_str("fixedsize=true;\n");
        out.push_str(
            "node [style=\"rounded,filled\", width=0, height=0, shape=box, fillcolor=\"#E5E5E5\", concentrate=true];\n\n",
        );
    } else {
        out.push_str("node [fontname=\"Courier New\", fontsize=10];\n");
        out.push_str("node [shape=box, style=\"filled, rounded\", fillcolor=\"#E5E5E5\"];\n");
    }

    for part in &result.parts {
        out.push_str(&format!("I{} [label=\"{}\"];\n", part.id, node_label(part)));
    }
    if left_to_right {
        out.push('\n');
    }

    for relation in &result.relations {
        if options.label_relations {
            out.push_str(&format!(
                "I{} -> I{} [label=\"{}\"];\n",
                relation.relating_id,
                relation.related_id,
                edge_label(relation)
            ));
        } else {
            out.push_str(&format!("I{} -> I{};\n", relation.relating_id, relation.related_id));
        }
    }

    // Assemblies lose the fill so leaves stand out.
    let mut seen = HashSet::new();
    for relation in &result.relations {
        if seen.insert(relation.relating_id) {
            out.push_str(&format!("I{} [shape=box, style=\"\"];\n", relation.relating_id));
        }
    }

    out.push_str("}\n");
    out
}

fn render_folder(result: &HlrResult) -> String {
    let mut assemblies: BTreeMap<u64, Vec<u64>> = BTreeMap::new();
    let mut related = HashSet::new();
    for relation in &result.relations {
        assemblies
            .entry(relation.relating_id)
            .or_default()
            .push(relation.related_id);
        related.insert(relation.related_id);
    }

    let mut out = String::new();
    out.push_str("digraph tree\n{\n");
    out.push_str("fixedsize=true;\n");
    out.push_str("node [style=\"rounded,filled\", width=0, height=0, shape=box, fillcolor=\"#E5E5E5\"]\n");

    for part in &result.parts {
        let label = node_label(part);
        if related.contains(&part.id) {
            out.push_str("{rank=same\n");
            out.push_str(&format!("  i_point_{} [shape=point]\n", part.id));
            out.push_str(&format!("  i_dir_{} [label=\"{label}\", width=2]\n", part.id));
            out.push_str("}\n");
            out.push_str(&format!("i_point_{id} -> i_dir_{id}\n", id = part.id));
        } else {
            out.push_str(&format!("i_dir_{} [label=\"{label}\", width=2]\n", part.id));
        }
    }
    out.push_str("\n\n");

    for (parent, children) in &assemblies {
        out.push_str(&format!("i_dir_{parent}"));
        for child in children {
            out.push_str(&format!(" -> i_point_{child}"));
        }
        out.push_str(" [arrowhead=none]\n");
    }

    out.push_str("}\n");
    out
}
