//! Header pass.

use step3d_express::{AttributeError, Instance, InstancePool};
use tracing::{debug, info};

use crate::entity::EntityKind;
use crate::error::HlrError;
use crate::model::HeaderInfo;

const PASS: &str = "header pass";

/// Copy `FILE_DESCRIPTION`, `FILE_NAME` and `FILE_SCHEMA` into `header`,
/// verbatim. Other header entities are skipped.
pub fn extract_header(pool: &InstancePool, header: &mut HeaderInfo) -> Result<(), HlrError> {
    info!(instances = pool.header_instances().len(), "parsing header");

    for instance in pool.header_instances() {
        read_header_instance(instance, header).map_err(|e| HlrError::process(PASS, e))?;
    }
    Ok(())
}

fn read_header_instance(instance: &Instance, header: &mut HeaderInfo) -> Result<(), AttributeError> {
    match EntityKind::of(instance) {
        EntityKind::FileDescription => {
            header.description = instance.raw_attribute("description")?;
            header.implementation_level = instance.raw_attribute("implementation_level")?;
        }
        EntityKind::FileName => {
            header.name = instance.raw_attribute("name")?;
            header.time_stamp = instance.raw_attribute("time_stamp")?;
            header.author = instance.raw_attribute("author")?;
            header.organization = instance.raw_attribute("organization")?;
            header.preprocessor_version = instance.raw_attribute("preprocessor_version")?;
            header.originating_system = instance.raw_attribute("originating_system")?;
            header.authorisation = instance.raw_attribute("authorization")?;
        }
        EntityKind::FileSchema => {
            header.schema = instance.raw_attribute("schema_identifiers")?;
        }
        _ => debug!(entity = ?instance.type_name(), "header entity skipped"),
    }
    Ok(())
}
