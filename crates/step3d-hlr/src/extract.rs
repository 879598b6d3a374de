//! The three extraction passes over one pool.

use step3d_express::InstancePool;
use tracing::warn;

use crate::error::HlrError;
use crate::geometry::resolve_geometry;
use crate::header::extract_header;
use crate::index::RepresentationIndex;
use crate::model::HlrResult;
use crate::options::ExtractOptions;
use crate::structure::{extract_content, ContentSink};

/// Run header, content and geometry passes in that order.
///
/// A failing pass stops extraction and is recorded in the result status;
/// whatever was extracted before the failure stays in the result.
pub fn extract_hlr(pool: &InstancePool, options: &ExtractOptions) -> HlrResult {
    let mut result = HlrResult::default();
    if let Err(err) = run_passes(pool, options, &mut result) {
        warn!(kind = %err.kind, error = %err.message, "extraction stopped");
        result.status.fail(err);
    }
    result
}

fn run_passes(pool: &InstancePool, options: &ExtractOptions, result: &mut HlrResult) -> Result<(), HlrError> {
    extract_header(pool, &mut result.header)?;

    let mut index = RepresentationIndex::new();
    extract_content(
        pool,
        options.text_style,
        ContentSink {
            parts: &mut result.parts,
            relations: &mut result.relations,
            index: &mut index,
        },
    )?;

    resolve_geometry(
        pool,
        &index,
        options.missing_representation,
        options.text_style,
        &mut result.parts,
    )
}
