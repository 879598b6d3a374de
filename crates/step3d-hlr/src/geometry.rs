//! Geometry pass: representation type and local placement of each part.

use step3d_express::{Instance, InstancePool, Value};
use tracing::{debug, info, warn};

use crate::entity::EntityKind;
use crate::error::HlrError;
use crate::index::RepresentationIndex;
use crate::model::{Part, Placement};
use crate::options::MissingRepresentationPolicy;
use crate::select::UsedRepresentation;
use crate::text::TextStyle;

const PASS: &str = "geometry pass";

/// Resolve every part through `index`, writing placements in place.
///
/// Under [`MissingRepresentationPolicy::Abort`] the first part without an
/// index entry stops the pass; parts resolved before it keep their data.
pub fn resolve_geometry(
    pool: &InstancePool,
    index: &RepresentationIndex,
    policy: MissingRepresentationPolicy,
    style: TextStyle,
    parts: &mut [Part],
) -> Result<(), HlrError> {
    info!(parts = parts.len(), "parsing geometry");

    let mut resolved = 0usize;
    for part in parts.iter_mut() {
        let Some(sdr) = index.get(part.id).and_then(|id| pool.get(id)) else {
            match policy {
                MissingRepresentationPolicy::Abort => {
                    return Err(HlrError::process(
                        PASS,
                        format!("no shape definition representation for part #{}", part.id),
                    ));
                }
                MissingRepresentationPolicy::Skip => {
                    warn!(part = part.id, "no shape definition representation, part skipped");
                    continue;
                }
            }
        };

        if resolve_part(pool, sdr, style, part)? {
            resolved += 1;
        }
    }

    info!(resolved, "geometry parsed");
    Ok(())
}

/// Returns `false` when the representation is not one of the accepted kinds.
fn resolve_part(pool: &InstancePool, sdr: &Instance, style: TextStyle, part: &mut Part) -> Result<bool, HlrError> {
    let used = sdr
        .attribute("used_representation")
        .map_err(|e| HlrError::process(PASS, e))?;
    let Some((representation, kind)) = UsedRepresentation::resolve(pool, used).accepted() else {
        debug!(part = part.id, sdr = sdr.id, "representation kind not handled, part skipped");
        return Ok(false);
    };
    part.representation_type = kind.schema_name().to_string();

    let items = representation
        .attribute("items")
        .map_err(|e| HlrError::process(PASS, e))?;
    let first = match items.as_list() {
        Some([first, ..]) => first,
        Some([]) => {
            return Err(HlrError::process(
                PASS,
                format!("representation #{} has no items", representation.id),
            ))
        }
        None => {
            return Err(HlrError::process(
                PASS,
                format!("items of representation #{} is not an aggregate", representation.id),
            ))
        }
    };

    let axis2 = pool
        .resolve(first)
        .filter(|i| EntityKind::of(i) == EntityKind::Axis2Placement3d)
        .ok_or_else(|| {
            HlrError::process(
                PASS,
                format!(
                    "first item of representation #{} is not an AXIS2_PLACEMENT_3D",
                    representation.id
                ),
            )
        })?;

    part.placement = read_placement(pool, axis2, style)?;
    debug!(
        part = part.id,
        representation = %part.representation_type,
        origin = ?part.placement.origin,
        "placement"
    );
    Ok(true)
}

fn read_placement(pool: &InstancePool, axis2: &Instance, style: TextStyle) -> Result<Placement, HlrError> {
    let attr = |name: &str| axis2.attribute(name).map_err(|e| HlrError::process(PASS, e));

    let name = axis2.raw_attribute("name").map_err(|e| HlrError::process(PASS, e))?;
    let origin = referenced_triple(pool, axis2.id, attr("location")?, EntityKind::CartesianPoint, "coordinates")?;
    let axis = optional_direction(pool, axis2.id, attr("axis")?)?;
    let ref_direction = optional_direction(pool, axis2.id, attr("ref_direction")?)?;

    Ok(Placement {
        name: style.apply(&name),
        origin,
        axis,
        ref_direction,
    })
}

/// `$` leaves the zero vector.
fn optional_direction(pool: &InstancePool, owner: u64, value: &Value) -> Result<[f64; 3], HlrError> {
    if value.is_null() {
        return Ok([0.0; 3]);
    }
    referenced_triple(pool, owner, value, EntityKind::Direction, "direction_ratios")
}

fn referenced_triple(
    pool: &InstancePool,
    owner: u64,
    value: &Value,
    kind: EntityKind,
    attribute: &str,
) -> Result<[f64; 3], HlrError> {
    let target = pool
        .resolve(value)
        .filter(|i| EntityKind::of(i) == kind)
        .ok_or_else(|| {
            HlrError::process(
                PASS,
                format!("#{owner} does not reference a {}", kind.schema_name()),
            )
        })?;
    let components = target
        .attribute(attribute)
        .map_err(|e| HlrError::process(PASS, e))?;
    triple(target.id, components)
}

/// Exactly three real components.
fn triple(owner: u64, value: &Value) -> Result<[f64; 3], HlrError> {
    let items = value.as_list().unwrap_or_default();
    if items.len() != 3 {
        return Err(HlrError::process(
            PASS,
            format!("#{owner}: expected 3 components, found {}", items.len()),
        ));
    }

    let mut out = [0.0; 3];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = item
            .as_real()
            .ok_or_else(|| HlrError::process(PASS, format!("#{owner}: non-numeric component {item}")))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn s(v: &str) -> Value {
        Value::String(v.into())
    }

    fn r(id: u64) -> Value {
        Value::Ref(id)
    }

    fn reals(v: &[f64]) -> Value {
        Value::List(v.iter().map(|x| Value::Real(*x)).collect())
    }

    fn insert(pool: &mut InstancePool, id: u64, ty: &str, params: Vec<Value>) {
        pool.insert(Instance::simple(id, ty, params)).unwrap();
    }

    /// SDR #100 → SR #101 → AXIS2 #102 (point #103, axis #104, ref #105).
    fn shaped_pool(rep_type: &str, axis: &[f64]) -> (InstancePool, RepresentationIndex) {
        let mut pool = InstancePool::new();
        insert(&mut pool, 100, "SHAPE_DEFINITION_REPRESENTATION", vec![r(99), r(101)]);
        insert(&mut pool, 101, rep_type, vec![s("rep"), Value::List(vec![r(102)]), r(98)]);
        insert(&mut pool, 102, "AXIS2_PLACEMENT_3D", vec![s("frame"), r(103), r(104), r(105)]);
        insert(&mut pool, 103, "CARTESIAN_POINT", vec![s(""), reals(&[1.0, 2.0, 3.0])]);
        insert(&mut pool, 104, "DIRECTION", vec![s(""), reals(axis)]);
        insert(&mut pool, 105, "DIRECTION", vec![s(""), reals(&[1.0, 0.0, 0.0])]);
        let mut index = RepresentationIndex::new();
        index.insert(5, 100);
        (pool, index)
    }

    fn resolve(pool: &InstancePool, index: &RepresentationIndex, parts: &mut [Part]) -> Result<(), HlrError> {
        resolve_geometry(pool, index, MissingRepresentationPolicy::Abort, TextStyle::Cleaned, parts)
    }

    #[test]
    fn axis_and_ref_direction_are_read_separately() {
        let (pool, index) = shaped_pool("SHAPE_REPRESENTATION", &[0.0, 0.0, 1.0]);
        let mut parts = vec![Part::new(5, "Part")];
        resolve(&pool, &index, &mut parts).unwrap();

        let part = &parts[0];
        assert_eq!(part.representation_type, "Shape_Representation");
        assert_eq!(part.placement.name, "frame");
        assert_eq!(part.placement.origin, [1.0, 2.0, 3.0]);
        assert_eq!(part.placement.axis, [0.0, 0.0, 1.0]);
        assert_eq!(part.placement.ref_direction, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn two_component_direction_is_a_process_error() {
        let (pool, index) = shaped_pool("ADVANCED_BREP_SHAPE_REPRESENTATION", &[0.0, 1.0]);
        let mut parts = vec![Part::new(5, "Part")];
        let err = resolve(&pool, &index, &mut parts).unwrap_err();
        assert_eq!(err.kind, ErrorKind::FileProcess);
        assert!(err.message.contains("expected 3 components, found 2"));
    }

    #[test]
    fn unhandled_representation_kind_is_skipped() {
        let (pool, index) = shaped_pool("FACETED_BREP_SHAPE_REPRESENTATION", &[0.0, 0.0, 1.0]);
        let mut parts = vec![Part::new(5, "Part")];
        resolve(&pool, &index, &mut parts).unwrap();
        assert_eq!(parts[0].representation_type, "");
        assert_eq!(parts[0].placement, Placement::default());
    }

    #[test]
    fn unset_axis_leaves_zero_vector() {
        let (mut pool, index) = shaped_pool("SHAPE_REPRESENTATION", &[0.0, 0.0, 1.0]);
        insert(&mut pool, 106, "AXIS2_PLACEMENT_3D", vec![s(""), r(103), Value::Null, Value::Null]);
        insert(&mut pool, 107, "SHAPE_REPRESENTATION", vec![s(""), Value::List(vec![r(106)]), r(98)]);
        insert(&mut pool, 108, "SHAPE_DEFINITION_REPRESENTATION", vec![r(99), r(107)]);
        let mut index = index;
        index.insert(6, 108);

        let mut parts = vec![Part::new(6, "Bare")];
        resolve(&pool, &index, &mut parts).unwrap();
        assert_eq!(parts[0].placement.axis, [0.0; 3]);
        assert_eq!(parts[0].placement.ref_direction, [0.0; 3]);
        assert_eq!(parts[0].placement.origin, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn empty_items_and_wrong_first_item_fail() {
        let mut pool = InstancePool::new();
        insert(&mut pool, 1, "SHAPE_DEFINITION_REPRESENTATION", vec![r(9), r(2)]);
        insert(&mut pool, 2, "SHAPE_REPRESENTATION", vec![s(""), Value::List(vec![]), r(9)]);
        insert(&mut pool, 3, "SHAPE_DEFINITION_REPRESENTATION", vec![r(9), r(4)]);
        insert(&mut pool, 4, "SHAPE_REPRESENTATION", vec![s(""), Value::List(vec![r(5)]), r(9)]);
        insert(&mut pool, 5, "CARTESIAN_POINT", vec![s(""), reals(&[0.0, 0.0, 0.0])]);

        let mut index = RepresentationIndex::new();
        index.insert(10, 1);
        index.insert(11, 3);

        let err = resolve(&pool, &index, &mut [Part::new(10, "")]).unwrap_err();
        assert!(err.message.contains("has no items"));
        let err = resolve(&pool, &index, &mut [Part::new(11, "")]).unwrap_err();
        assert!(err.message.contains("not an AXIS2_PLACEMENT_3D"));
    }

    #[test]
    fn miss_policy() {
        let (pool, index) = shaped_pool("SHAPE_REPRESENTATION", &[0.0, 0.0, 1.0]);
        let mut parts = vec![Part::new(4, "Orphan"), Part::new(5, "Part")];

        let err = resolve(&pool, &index, &mut parts).unwrap_err();
        assert_eq!(err.message, "no shape definition representation for part #4 at geometry pass");
        assert_eq!(parts[1].representation_type, "");

        resolve_geometry(
            &pool,
            &index,
            MissingRepresentationPolicy::Skip,
            TextStyle::Cleaned,
            &mut parts,
        )
        .unwrap();
        assert_eq!(parts[0].representation_type, "");
        assert_eq!(parts[1].representation_type, "Shape_Representation");
    }
}
