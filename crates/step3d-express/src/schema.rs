//! Attribute names for the entity types the HLR extraction reads.
//!
//! Part 21 records are positional. This table maps the explicit attributes
//! of each supported entity (AP242 MIM long form, plus the header schema) to
//! their parameter index, which is what makes name-based access possible.
//! Entity types that are not listed are still loaded; they are only
//! addressable by position.

const FILE_DESCRIPTION: &[&str] = &["description", "implementation_level"];
const FILE_NAME: &[&str] = &[
    "name",
    "time_stamp",
    "author",
    "organization",
    "preprocessor_version",
    "originating_system",
    "authorization",
];
const FILE_SCHEMA: &[&str] = &["schema_identifiers"];

const PRODUCT: &[&str] = &["id", "name", "description", "frame_of_reference"];
const PRODUCT_DEFINITION_FORMATION: &[&str] = &["id", "description", "of_product"];
const PRODUCT_DEFINITION_FORMATION_WITH_SPECIFIED_SOURCE: &[&str] =
    &["id", "description", "of_product", "make_or_buy"];
const PRODUCT_DEFINITION: &[&str] = &["id", "description", "formation", "frame_of_reference"];
const NEXT_ASSEMBLY_USAGE_OCCURRENCE: &[&str] = &[
    "id",
    "name",
    "description",
    "relating_product_definition",
    "related_product_definition",
    "reference_designator",
];
const PRODUCT_DEFINITION_SHAPE: &[&str] = &["name", "description", "definition"];
const SHAPE_DEFINITION_REPRESENTATION: &[&str] = &["definition", "used_representation"];
const REPRESENTATION: &[&str] = &["name", "items", "context_of_items"];
const AXIS2_PLACEMENT_3D: &[&str] = &["name", "location", "axis", "ref_direction"];
const CARTESIAN_POINT: &[&str] = &["name", "coordinates"];
const DIRECTION: &[&str] = &["name", "direction_ratios"];

/// Explicit attribute names of a data-section entity type, in parameter order.
pub fn attribute_names(type_name: &str) -> Option<&'static [&'static str]> {
    let names = match type_name {
        "PRODUCT" => PRODUCT,
        "PRODUCT_DEFINITION_FORMATION" => PRODUCT_DEFINITION_FORMATION,
        "PRODUCT_DEFINITION_FORMATION_WITH_SPECIFIED_SOURCE" => {
            PRODUCT_DEFINITION_FORMATION_WITH_SPECIFIED_SOURCE
        }
        "PRODUCT_DEFINITION" => PRODUCT_DEFINITION,
        "NEXT_ASSEMBLY_USAGE_OCCURRENCE" => NEXT_ASSEMBLY_USAGE_OCCURRENCE,
        "PRODUCT_DEFINITION_SHAPE" => PRODUCT_DEFINITION_SHAPE,
        "SHAPE_DEFINITION_REPRESENTATION" => SHAPE_DEFINITION_REPRESENTATION,
        "SHAPE_REPRESENTATION" | "ADVANCED_BREP_SHAPE_REPRESENTATION" => REPRESENTATION,
        "AXIS2_PLACEMENT_3D" => AXIS2_PLACEMENT_3D,
        "CARTESIAN_POINT" => CARTESIAN_POINT,
        "DIRECTION" => DIRECTION,
        _ => return header_attribute_names(type_name),
    };
    Some(names)
}

fn header_attribute_names(type_name: &str) -> Option<&'static [&'static str]> {
    match type_name {
        "FILE_DESCRIPTION" => Some(FILE_DESCRIPTION),
        "FILE_NAME" => Some(FILE_NAME),
        "FILE_SCHEMA" => Some(FILE_SCHEMA),
        _ => None,
    }
}

/// Parameter index of `attribute` on `type_name`.
pub fn attribute_index(type_name: &str, attribute: &str) -> Option<usize> {
    attribute_names(type_name)?.iter().position(|n| *n == attribute)
}
