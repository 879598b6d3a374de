//! Extraction configuration.

use anyhow::{anyhow, Result};
use step3d_express::LoadOptions;

pub use crate::text::TextStyle;

/// What the geometry pass does with a part that has no indexed
/// shape definition representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingRepresentationPolicy {
    /// Record a `FileProcess` error and stop resolving further parts.
    #[default]
    Abort,
    /// Leave the part unresolved and continue with the next one.
    Skip,
}

impl MissingRepresentationPolicy {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" | "continue" => Ok(Self::Skip),
            other => Err(anyhow!(
                "unknown missing-representation policy `{other}` (expected abort|skip)"
            )),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub missing_representation: MissingRepresentationPolicy,
    /// Presentation of part, relation and placement names.
    pub text_style: TextStyle,
    pub load: LoadOptions,
}
