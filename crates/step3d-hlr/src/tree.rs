//! Assembly tree rows built from a flat HLR result.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use step3d_express::InstanceId;
use tracing::warn;

use crate::model::{HlrResult, Relation};

/// One row of the assembly tree, in pre-order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeRow {
    /// 1-based position in pre-order.
    pub row_id: usize,
    pub parent_row: Option<usize>,
    pub part_id: InstanceId,
    /// Relation that attached the part to its parent; `None` for roots.
    pub relation_id: Option<InstanceId>,
    pub depth: usize,
}

struct Pending {
    part_id: InstanceId,
    relation_id: Option<InstanceId>,
    parent_row: Option<usize>,
    depth: usize,
}

/// Roots are the parts never named as a related child. A part appears once
/// per relation that uses it; relations pointing at unknown parts, and
/// occurrences that would re-enter a part on its own ancestor path, are left
/// out.
pub fn build_tree(result: &HlrResult) -> Vec<TreeRow> {
    let known: HashSet<InstanceId> = result.parts.iter().map(|p| p.id).collect();
    let related: HashSet<InstanceId> = result.relations.iter().map(|r| r.related_id).collect();

    let mut children: HashMap<InstanceId, Vec<&Relation>> = HashMap::new();
    for relation in &result.relations {
        if known.contains(&relation.related_id) {
            children.entry(relation.relating_id).or_default().push(relation);
        }
    }

    let mut rows = Vec::new();
    let mut path: Vec<InstanceId> = Vec::new();

    for root in result.parts.iter().filter(|p| !related.contains(&p.id)) {
        let mut stack = vec![Pending {
            part_id: root.id,
            relation_id: None,
            parent_row: None,
            depth: 0,
        }];

        while let Some(next) = stack.pop() {
            path.truncate(next.depth);
            if path.contains(&next.part_id) {
                warn!(part = next.part_id, relation = ?next.relation_id, "assembly cycle cut");
                continue;
            }

            let row_id = rows.len() + 1;
            rows.push(TreeRow {
                row_id,
                parent_row: next.parent_row,
                part_id: next.part_id,
                relation_id: next.relation_id,
                depth: next.depth,
            });
            path.push(next.part_id);

            if let Some(kids) = children.get(&next.part_id) {
                stack.extend(kids.iter().rev().map(|r| Pending {
                    part_id: r.related_id,
                    relation_id: Some(r.id),
                    parent_row: Some(row_id),
                    depth: next.depth + 1,
                }));
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Part;

    fn my_parts() -> HlrResult {
        HlrResult {
            parts: vec![
                Part::new(5, "Part"),
                Part::new(367, "Caja"),
                Part::new(380, "SubPart"),
                Part::new(737, "Cube"),
                Part::new(854, "Cylinder"),
            ],
            relations: vec![
                Relation::new(376, "=>[0:1:1:1]", 5, 367),
                Relation::new(746, "=>[0:1:1:2]", 380, 737),
                Relation::new(863, "=>[0:1:1:3]", 380, 854),
                Relation::new(869, "=>[0:1:1:4]", 5, 380),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn pre_order_rows() {
        let rows = build_tree(&my_parts());
        let layout: Vec<_> = rows
            .iter()
            .map(|r| (r.row_id, r.parent_row, r.part_id, r.depth))
            .collect();
        assert_eq!(
            layout,
            vec![
                (1, None, 5, 0),
                (2, Some(1), 367, 1),
                (3, Some(1), 380, 1),
                (4, Some(3), 737, 2),
                (5, Some(3), 854, 2),
            ]
        );
        assert_eq!(rows[2].relation_id, Some(869));
    }

    #[test]
    fn cycles_are_cut() {
        let result = HlrResult {
            parts: vec![Part::new(1, "root"), Part::new(2, "a"), Part::new(3, "b")],
            relations: vec![
                Relation::new(10, "", 1, 2),
                Relation::new(11, "", 2, 3),
                Relation::new(12, "", 3, 2),
            ],
            ..Default::default()
        };
        let parts: Vec<_> = build_tree(&result).iter().map(|r| r.part_id).collect();
        assert_eq!(parts, vec![1, 2, 3]);
    }

    #[test]
    fn dangling_children_are_skipped() {
        let result = HlrResult {
            parts: vec![Part::new(1, "root")],
            relations: vec![Relation::new(10, "", 1, 99)],
            ..Default::default()
        };
        assert_eq!(build_tree(&result).len(), 1);
    }
}
