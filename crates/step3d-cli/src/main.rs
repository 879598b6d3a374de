//! step3d CLI
//!
//! Inspect the High-Level Representation of STEP AP242 files:
//! - `info`: header metadata, parts and assembly relations
//! - `tree`: indented assembly tree
//! - `graph`: Graphviz DOT files of the assembly structure

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use step3d_hlr::{
    build_tree, engine_version, ExtractOptions, HeaderInfo, MissingRepresentationPolicy, Part,
    Relation, SessionState, Status, Step3dFile, TextStyle,
};

mod graph;

use graph::{GraphOptions, GraphStyle};

#[derive(Parser)]
#[command(name = "step3d")]
#[command(author, version, about = "step3d: product structure of STEP AP242 files")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` still applies.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print header metadata, parts and relations.
    Info {
        /// Input STEP file
        input: PathBuf,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
        /// Keep names in exchange notation (`'Part'` instead of `Part`)
        #[arg(long)]
        raw: bool,
        /// What to do with parts lacking a shape representation: abort|skip
        #[arg(long, default_value = "abort")]
        on_missing_representation: String,
    },

    /// Print the assembly tree.
    Tree {
        /// Input STEP file
        input: PathBuf,
        /// What to do with parts lacking a shape representation: abort|skip
        #[arg(long, default_value = "abort")]
        on_missing_representation: String,
    },

    /// Write Graphviz DOT files of the assembly structure.
    Graph {
        /// Input STEP file
        input: PathBuf,
        /// Layout: normal|rankdir-lr|folder|all
        #[arg(long, default_value = "all")]
        style: String,
        /// Label edges with their relation id
        #[arg(long)]
        label_relations: bool,
        /// Output directory (default: next to the input)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Print the reader engine version.
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Info {
            input,
            json,
            raw,
            on_missing_representation,
        } => {
            let style = if raw { TextStyle::Raw } else { TextStyle::Cleaned };
            cmd_info(&input, json, style, &on_missing_representation)?;
        }
        Commands::Tree {
            input,
            on_missing_representation,
        } => {
            cmd_tree(&input, &on_missing_representation)?;
        }
        Commands::Graph {
            input,
            style,
            label_relations,
            out_dir,
        } => {
            cmd_graph(&input, &style, label_relations, out_dir.as_deref())?;
        }
        Commands::Version => {
            println!("step3d {}", env!("CARGO_PKG_VERSION"));
            println!("{}", engine_version());
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Load and parse `input`. Load failures are errors; extraction failures
/// leave the partial result in the returned session.
fn open(input: &Path, options: ExtractOptions) -> Result<Step3dFile> {
    let mut file = Step3dFile::with_options(options);
    if !file.load(input) {
        return Err(anyhow!("{} ({})", file.error_message(), file.error_kind()));
    }
    file.parse_hlr_information();
    Ok(file)
}

fn require_parsed(file: &Step3dFile) -> Result<()> {
    if file.has_failed() {
        return Err(anyhow!("{} ({})", file.error_message(), file.error_kind()));
    }
    Ok(())
}

fn extract_options(on_missing_representation: &str, text_style: TextStyle) -> Result<ExtractOptions> {
    Ok(ExtractOptions {
        missing_representation: MissingRepresentationPolicy::parse(on_missing_representation)?,
        text_style,
        ..Default::default()
    })
}

// ============================================================================
// info
// ============================================================================

#[derive(Serialize)]
struct InfoReport<'a> {
    file: String,
    state: SessionState,
    header: HeaderInfo,
    parts: &'a [Part],
    relations: &'a [Relation],
    read_severity: String,
    read_diagnostics: usize,
    status: &'a Status,
}

fn cmd_info(input: &Path, json: bool, style: TextStyle, on_missing_representation: &str) -> Result<()> {
    let file = open(input, extract_options(on_missing_representation, style)?)?;
    let result = file.result();
    let header = match style {
        TextStyle::Raw => result.header.clone(),
        TextStyle::Cleaned => result.header.cleaned(),
    };

    if json {
        let report = InfoReport {
            file: input.display().to_string(),
            state: file.state(),
            header,
            parts: file.parts(),
            relations: file.relations(),
            read_severity: file.load_report().severity.to_string(),
            read_diagnostics: file.load_report().diagnostics.len(),
            status: file.status(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_info(input, &header, &file);
    }

    require_parsed(&file)
}

fn print_info(input: &Path, header: &HeaderInfo, file: &Step3dFile) {
    let result = file.result();
    let report = file.load_report();
    println!("{} {}", "File:".bold(), input.display());
    println!(
        "{} {} ({} diagnostics)",
        "Read:".bold(),
        report.severity,
        report.diagnostics.len()
    );
    for diagnostic in &report.diagnostics {
        let line = diagnostic.line.map(|l| format!("line {l}: ")).unwrap_or_default();
        println!("  {} {line}{}", diagnostic.severity.to_string().yellow(), diagnostic.message);
    }
    println!("{}", "Header".bold());
    for (key, value) in [
        ("description", &header.description),
        ("implementation_level", &header.implementation_level),
        ("name", &header.name),
        ("time_stamp", &header.time_stamp),
        ("author", &header.author),
        ("organization", &header.organization),
        ("preprocessor_version", &header.preprocessor_version),
        ("originating_system", &header.originating_system),
        ("authorisation", &header.authorisation),
        ("schema", &header.schema),
    ] {
        println!("  {:<22} {}", key.dimmed(), value);
    }

    println!("{} ({})", "Parts".bold(), result.parts.len());
    for part in &result.parts {
        let [x, y, z] = part.placement.origin;
        println!(
            "  {} {:<20} {:<36} origin=({x}, {y}, {z})",
            format!("{}#{}", part.type_label, part.id).cyan(),
            part.name,
            part.representation_type,
        );
    }

    println!("{} ({})", "Relations".bold(), result.relations.len());
    for relation in &result.relations {
        println!(
            "  {} {:<16} #{} -> #{}",
            format!("{}#{}", relation.type_label, relation.id).cyan(),
            relation.name,
            relation.relating_id,
            relation.related_id
        );
    }

    if result.has_failed() {
        println!("{} {}", "error:".red().bold(), result.status.message.red());
    }
}

// ============================================================================
// tree
// ============================================================================

fn cmd_tree(input: &Path, on_missing_representation: &str) -> Result<()> {
    let file = open(input, extract_options(on_missing_representation, TextStyle::Cleaned)?)?;
    require_parsed(&file)?;

    let result = file.result();
    for row in build_tree(result) {
        let Some(part) = result.part(row.part_id) else {
            continue;
        };
        let indent = "  ".repeat(row.depth);
        let via = row
            .relation_id
            .map(|id| format!(" (NUAO#{id})").dimmed().to_string())
            .unwrap_or_default();
        let kind = if part.representation_type.is_empty() {
            String::new()
        } else {
            format!(" [{}]", part.representation_type)
        };
        println!(
            "{indent}{} {}{kind}{via}",
            format!("{}#{}", part.type_label, part.id).cyan(),
            part.name
        );
    }
    Ok(())
}

// ============================================================================
// graph
// ============================================================================

fn cmd_graph(input: &Path, style: &str, label_relations: bool, out_dir: Option<&Path>) -> Result<()> {
    let styles = GraphStyle::parse_selection(style)?;
    let file = open(input, ExtractOptions::default())?;
    require_parsed(&file)?;

    if let Some(dir) = out_dir {
        fs::create_dir_all(dir)?;
    }

    let options = GraphOptions { label_relations };
    for style in styles {
        let out = graph::output_path(input, out_dir, style);
        fs::write(&out, graph::render_dot(file.result(), style, &options))?;
        tracing::debug!(path = %out.display(), style = style.number(), "dot file written");
        println!(
            "{} {} (parts={} relations={})",
            "wrote".green(),
            out.display(),
            file.parts().len(),
            file.relations().len()
        );
    }
    Ok(())
}
