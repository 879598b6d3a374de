//! Content pass: parts, relations and the representation index.

use step3d_express::{AttributeError, Instance, InstancePool};
use tracing::{debug, info, warn};

use crate::entity::EntityKind;
use crate::error::HlrError;
use crate::index::RepresentationIndex;
use crate::model::{Part, Relation};
use crate::select::{ProductDefinitionSelect, RepresentedDefinition};
use crate::text::TextStyle;

const PASS: &str = "content pass";

/// Output sinks of the content pass. Items are appended in pool order, so a
/// failed pass leaves everything found before the failure in place.
pub struct ContentSink<'a> {
    pub parts: &'a mut Vec<Part>,
    pub relations: &'a mut Vec<Relation>,
    pub index: &'a mut RepresentationIndex,
}

/// Walk the pool once and dispatch on each instance's kind.
pub fn extract_content(
    pool: &InstancePool,
    style: TextStyle,
    sink: ContentSink<'_>,
) -> Result<(), HlrError> {
    info!(instances = pool.len(), "parsing content");

    for instance in pool.instances() {
        match EntityKind::of(instance) {
            EntityKind::ProductDefinition => {
                let part = Part::new(instance.id, style.apply(&product_name(pool, instance)));
                debug!(id = part.id, name = %part.name, "part");
                sink.parts.push(part);
            }
            EntityKind::NextAssemblyUsageOccurrence => {
                if let Some(relation) = relation(pool, instance, style).map_err(|e| HlrError::process(PASS, e))? {
                    debug!(
                        id = relation.id,
                        relating = relation.relating_id,
                        related = relation.related_id,
                        "relation"
                    );
                    sink.relations.push(relation);
                }
            }
            EntityKind::ShapeDefinitionRepresentation => {
                if let Some(definition) =
                    represented_definition(pool, instance).map_err(|e| HlrError::process(PASS, e))?
                {
                    if let Some(previous) = sink.index.insert(definition, instance.id) {
                        debug!(definition, previous, sdr = instance.id, "representation replaced");
                    }
                }
            }
            _ => {}
        }
    }

    info!(
        parts = sink.parts.len(),
        relations = sink.relations.len(),
        indexed = sink.index.len(),
        "content parsed"
    );
    Ok(())
}

/// `definition.formation.of_product.name`, raw. Any broken hop gives an
/// empty name.
fn product_name(pool: &InstancePool, definition: &Instance) -> String {
    let formation = definition
        .attribute("formation")
        .ok()
        .and_then(|v| pool.resolve(v))
        .filter(|f| EntityKind::of(f) == EntityKind::ProductDefinitionFormation);
    let product = formation
        .and_then(|f| f.attribute("of_product").ok())
        .and_then(|v| pool.resolve(v))
        .filter(|p| EntityKind::of(p) == EntityKind::Product);

    match product.map(|p| p.raw_attribute("name")) {
        Some(Ok(name)) => name,
        _ => {
            warn!(id = definition.id, "product definition without a product name");
            String::new()
        }
    }
}

/// A relation when both ends are product definitions.
fn relation(
    pool: &InstancePool,
    occurrence: &Instance,
    style: TextStyle,
) -> Result<Option<Relation>, AttributeError> {
    let relating = ProductDefinitionSelect::resolve(pool, occurrence.attribute("relating_product_definition")?);
    let related = ProductDefinitionSelect::resolve(pool, occurrence.attribute("related_product_definition")?);

    let (Some(relating), Some(related)) = (relating.product_definition(), related.product_definition()) else {
        debug!(id = occurrence.id, "occurrence between non-definitions skipped");
        return Ok(None);
    };

    let name = style.apply(&occurrence.raw_attribute("name")?);
    Ok(Some(Relation::new(occurrence.id, name, relating.id, related.id)))
}

/// The product definition a shape definition representation describes,
/// through its `PRODUCT_DEFINITION_SHAPE` wrapper.
fn represented_definition(pool: &InstancePool, sdr: &Instance) -> Result<Option<u64>, AttributeError> {
    let RepresentedDefinition::ProductDefinitionShape(shape) =
        RepresentedDefinition::resolve(pool, sdr.attribute("definition")?)
    else {
        return Ok(None);
    };

    let definition = match shape.attribute("definition") {
        Ok(value) => ProductDefinitionSelect::resolve(pool, value).product_definition(),
        Err(_) => None,
    };
    Ok(definition.map(|pd| pd.id))
}
