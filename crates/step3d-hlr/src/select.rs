//! Select-typed attributes as closed unions.
//!
//! Each select the extraction reads is resolved one hop through the pool and
//! matched against the concrete kinds it cares about. Anything else lands in
//! `Other` (resolved, wrong kind) or `Unresolved` (`$`, not a reference, or a
//! dangling id). Callers never follow a reference without going through one
//! of these.

use step3d_express::{Instance, InstancePool, Value};

use crate::entity::EntityKind;

/// `product_definition_or_reference` / `characterized_product_definition`.
#[derive(Debug, Clone, Copy)]
pub enum ProductDefinitionSelect<'p> {
    ProductDefinition(&'p Instance),
    Other(&'p Instance),
    Unresolved,
}

impl<'p> ProductDefinitionSelect<'p> {
    pub fn resolve(pool: &'p InstancePool, value: &Value) -> Self {
        match pool.resolve(value) {
            None => Self::Unresolved,
            Some(target) => match EntityKind::of(target) {
                EntityKind::ProductDefinition => Self::ProductDefinition(target),
                _ => Self::Other(target),
            },
        }
    }

    pub fn product_definition(self) -> Option<&'p Instance> {
        match self {
            Self::ProductDefinition(pd) => Some(pd),
            Self::Other(_) | Self::Unresolved => None,
        }
    }
}

/// `represented_definition` of a shape definition representation.
#[derive(Debug, Clone, Copy)]
pub enum RepresentedDefinition<'p> {
    ProductDefinitionShape(&'p Instance),
    Other(&'p Instance),
    Unresolved,
}

impl<'p> RepresentedDefinition<'p> {
    pub fn resolve(pool: &'p InstancePool, value: &Value) -> Self {
        match pool.resolve(value) {
            None => Self::Unresolved,
            Some(target) => match EntityKind::of(target) {
                EntityKind::ProductDefinitionShape => Self::ProductDefinitionShape(target),
                _ => Self::Other(target),
            },
        }
    }
}

/// `used_representation`: only the two shape representation kinds count.
#[derive(Debug, Clone, Copy)]
pub enum UsedRepresentation<'p> {
    Shape(&'p Instance),
    AdvancedBrep(&'p Instance),
    Other(&'p Instance),
    Unresolved,
}

impl<'p> UsedRepresentation<'p> {
    pub fn resolve(pool: &'p InstancePool, value: &Value) -> Self {
        match pool.resolve(value) {
            None => Self::Unresolved,
            Some(target) => match EntityKind::of(target) {
                EntityKind::ShapeRepresentation => Self::Shape(target),
                EntityKind::AdvancedBrepShapeRepresentation => Self::AdvancedBrep(target),
                _ => Self::Other(target),
            },
        }
    }

    /// The accepted representation and its kind.
    pub fn accepted(self) -> Option<(&'p Instance, EntityKind)> {
        match self {
            Self::Shape(rep) => Some((rep, EntityKind::ShapeRepresentation)),
            Self::AdvancedBrep(rep) => Some((rep, EntityKind::AdvancedBrepShapeRepresentation)),
            Self::Other(_) | Self::Unresolved => None,
        }
    }
}
