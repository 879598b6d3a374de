//! The High-Level Representation: header, parts, relations.

use serde::Serialize;
use step3d_express::InstanceId;

use crate::error::Status;
use crate::text::to_cleaned;

pub const PART_TYPE_LABEL: &str = "PD";
pub const RELATION_TYPE_LABEL: &str = "NUAO";

/// Header section metadata, in exchange notation (`('FreeCAD Model')`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeaderInfo {
    pub description: String,
    pub implementation_level: String,
    pub name: String,
    pub time_stamp: String,
    pub author: String,
    pub organization: String,
    pub preprocessor_version: String,
    pub originating_system: String,
    pub authorisation: String,
    pub schema: String,
}

impl HeaderInfo {
    /// Copy with every field cleaned of its literal delimiters.
    pub fn cleaned(&self) -> HeaderInfo {
        HeaderInfo {
            description: to_cleaned(&self.description),
            implementation_level: to_cleaned(&self.implementation_level),
            name: to_cleaned(&self.name),
            time_stamp: to_cleaned(&self.time_stamp),
            author: to_cleaned(&self.author),
            organization: to_cleaned(&self.organization),
            preprocessor_version: to_cleaned(&self.preprocessor_version),
            originating_system: to_cleaned(&self.originating_system),
            authorisation: to_cleaned(&self.authorisation),
            schema: to_cleaned(&self.schema),
        }
    }
}

/// Local frame of a part: origin plus axis and reference direction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Placement {
    pub name: String,
    pub origin: [f64; 3],
    pub axis: [f64; 3],
    pub ref_direction: [f64; 3],
}

/// A product definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    /// Id of the source `PRODUCT_DEFINITION` instance.
    pub id: InstanceId,
    pub type_label: String,
    pub name: String,
    /// Schema name of the resolved representation; empty when unresolved.
    pub representation_type: String,
    pub placement: Placement,
}

impl Part {
    pub fn new(id: InstanceId, name: impl Into<String>) -> Self {
        Self {
            id,
            type_label: PART_TYPE_LABEL.to_string(),
            name: name.into(),
            representation_type: String::new(),
            placement: Placement::default(),
        }
    }
}

/// Parent/child link between two parts (`NEXT_ASSEMBLY_USAGE_OCCURRENCE`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relation {
    pub id: InstanceId,
    pub type_label: String,
    pub name: String,
    /// Parent part id.
    pub relating_id: InstanceId,
    /// Child part id.
    pub related_id: InstanceId,
}

impl Relation {
    pub fn new(
        id: InstanceId,
        name: impl Into<String>,
        relating_id: InstanceId,
        related_id: InstanceId,
    ) -> Self {
        Self {
            id,
            type_label: RELATION_TYPE_LABEL.to_string(),
            name: name.into(),
            relating_id,
            related_id,
        }
    }
}

/// Extraction output. Parts and relations are in file order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HlrResult {
    pub header: HeaderInfo,
    pub parts: Vec<Part>,
    pub relations: Vec<Relation>,
    pub status: Status,
}

impl HlrResult {
    pub fn part(&self, id: InstanceId) -> Option<&Part> {
        self.parts.iter().find(|p| p.id == id)
    }

    pub fn relating_part(&self, relation: &Relation) -> Option<&Part> {
        self.part(relation.relating_id)
    }

    pub fn related_part(&self, relation: &Relation) -> Option<&Part> {
        self.part(relation.related_id)
    }

    /// Relations whose parent is `part_id`, in file order.
    pub fn children_of(&self, part_id: InstanceId) -> impl Iterator<Item = &Relation> {
        self.relations
            .iter()
            .filter(move |r| r.relating_id == part_id)
    }

    pub fn has_failed(&self) -> bool {
        self.status.has_failed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_endpoints_resolve_on_demand() {
        let result = HlrResult {
            parts: vec![Part::new(5, "Part"), Part::new(367, "Caja")],
            relations: vec![
                Relation::new(376, "=>[0:1:1:1]", 5, 367),
                Relation::new(900, "dangling", 5, 999),
            ],
            ..Default::default()
        };

        let rel = &result.relations[0];
        assert_eq!(result.relating_part(rel).map(|p| p.name.as_str()), Some("Part"));
        assert_eq!(result.related_part(rel).map(|p| p.name.as_str()), Some("Caja"));
        assert!(result.related_part(&result.relations[1]).is_none());
        assert_eq!(result.children_of(5).count(), 2);
        assert_eq!(result.children_of(367).count(), 0);
    }

    #[test]
    fn header_cleaning() {
        let header = HeaderInfo {
            description: "('FreeCAD Model')".into(),
            implementation_level: "'2;1'".into(),
            organization: "('')".into(),
            ..Default::default()
        };
        let cleaned = header.cleaned();
        assert_eq!(cleaned.description, "FreeCAD Model");
        assert_eq!(cleaned.implementation_level, "2;1");
        assert_eq!(cleaned.organization, "");
        assert_eq!(cleaned.author, "");
    }

    #[test]
    fn labels() {
        assert_eq!(Part::new(1, "").type_label, "PD");
        assert_eq!(Relation::new(2, "", 1, 3).type_label, "NUAO");
    }
}
