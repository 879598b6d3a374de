//! Entity kinds the extraction dispatches on.

use step3d_express::Instance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    FileDescription,
    FileName,
    FileSchema,
    Product,
    ProductDefinitionFormation,
    ProductDefinition,
    NextAssemblyUsageOccurrence,
    ProductDefinitionShape,
    ShapeDefinitionRepresentation,
    ShapeRepresentation,
    AdvancedBrepShapeRepresentation,
    Axis2Placement3d,
    CartesianPoint,
    Direction,
    Other,
}

/// Map a declared Part 21 type name to its kind. Matching is exact.
pub fn classify(type_name: &str) -> EntityKind {
    match type_name {
        "FILE_DESCRIPTION" => EntityKind::FileDescription,
        "FILE_NAME" => EntityKind::FileName,
        "FILE_SCHEMA" => EntityKind::FileSchema,
        "PRODUCT" => EntityKind::Product,
        "PRODUCT_DEFINITION_FORMATION" | "PRODUCT_DEFINITION_FORMATION_WITH_SPECIFIED_SOURCE" => {
            EntityKind::ProductDefinitionFormation
        }
        "PRODUCT_DEFINITION" => EntityKind::ProductDefinition,
        "NEXT_ASSEMBLY_USAGE_OCCURRENCE" => EntityKind::NextAssemblyUsageOccurrence,
        "PRODUCT_DEFINITION_SHAPE" => EntityKind::ProductDefinitionShape,
        "SHAPE_DEFINITION_REPRESENTATION" => EntityKind::ShapeDefinitionRepresentation,
        "SHAPE_REPRESENTATION" => EntityKind::ShapeRepresentation,
        "ADVANCED_BREP_SHAPE_REPRESENTATION" => EntityKind::AdvancedBrepShapeRepresentation,
        "AXIS2_PLACEMENT_3D" => EntityKind::Axis2Placement3d,
        "CARTESIAN_POINT" => EntityKind::CartesianPoint,
        "DIRECTION" => EntityKind::Direction,
        _ => EntityKind::Other,
    }
}

impl EntityKind {
    /// Kind of an instance; complex instances are always `Other`.
    pub fn of(instance: &Instance) -> Self {
        instance.type_name().map_or(EntityKind::Other, classify)
    }

    /// Entity name as spelled by the AP242 schema.
    pub fn schema_name(self) -> &'static str {
        match self {
            EntityKind::FileDescription => "File_Description",
            EntityKind::FileName => "File_Name",
            EntityKind::FileSchema => "File_Schema",
            EntityKind::Product => "Product",
            EntityKind::ProductDefinitionFormation => "Product_Definition_Formation",
            EntityKind::ProductDefinition => "Product_Definition",
            EntityKind::NextAssemblyUsageOccurrence => "Next_Assembly_Usage_Occurrence",
            EntityKind::ProductDefinitionShape => "Product_Definition_Shape",
            EntityKind::ShapeDefinitionRepresentation => "Shape_Definition_Representation",
            EntityKind::ShapeRepresentation => "Shape_Representation",
            EntityKind::AdvancedBrepShapeRepresentation => "Advanced_Brep_Shape_Representation",
            EntityKind::Axis2Placement3d => "Axis2_Placement_3d",
            EntityKind::CartesianPoint => "Cartesian_Point",
            EntityKind::Direction => "Direction",
            EntityKind::Other => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use step3d_express::{Instance, InstanceBody, Record};

    #[test]
    fn classification_is_exact() {
        assert_eq!(classify("PRODUCT_DEFINITION"), EntityKind::ProductDefinition);
        assert_eq!(classify("Product_Definition"), EntityKind::Other);
        assert_eq!(classify("PRODUCT_DEFINITION_WITH_ASSOCIATED_DOCUMENTS"), EntityKind::Other);
        assert_eq!(
            classify("PRODUCT_DEFINITION_FORMATION_WITH_SPECIFIED_SOURCE"),
            EntityKind::ProductDefinitionFormation
        );
    }

    #[test]
    fn complex_instances_are_other() {
        let complex = Instance {
            id: 1,
            body: InstanceBody::Complex(vec![Record {
                type_name: "SHAPE_REPRESENTATION".into(),
                params: vec![],
            }]),
        };
        assert_eq!(EntityKind::of(&complex), EntityKind::Other);
    }

    #[test]
    fn representation_labels() {
        assert_eq!(EntityKind::ShapeRepresentation.schema_name(), "Shape_Representation");
        assert_eq!(
            EntityKind::AdvancedBrepShapeRepresentation.schema_name(),
            "Advanced_Brep_Shape_Representation"
        );
    }
}
