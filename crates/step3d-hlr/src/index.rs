//! Definition → shape definition representation index.
//!
//! Built while scanning the pool once, so the geometry pass can find each
//! part's representation by lookup instead of rescanning the pool per part.

use std::collections::HashMap;

use step3d_express::InstanceId;

#[derive(Debug, Clone, Default)]
pub struct RepresentationIndex {
    by_definition: HashMap<InstanceId, InstanceId>,
}

impl RepresentationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `definition → sdr`. A later entry replaces an earlier one;
    /// the replaced id is returned.
    pub fn insert(&mut self, definition: InstanceId, sdr: InstanceId) -> Option<InstanceId> {
        self.by_definition.insert(definition, sdr)
    }

    pub fn get(&self, definition: InstanceId) -> Option<InstanceId> {
        self.by_definition.get(&definition).copied()
    }

    pub fn len(&self) -> usize {
        self.by_definition.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_definition.is_empty()
    }
}
