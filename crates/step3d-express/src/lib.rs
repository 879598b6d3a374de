//! EXPRESS instance pool for STEP (ISO 10303-21) exchange files.
//!
//! This crate reads the clear-text exchange structure into a flat
//! [`InstancePool`] of typed, cross-referenced instances:
//! - header instances (`FILE_DESCRIPTION`, `FILE_NAME`, `FILE_SCHEMA`, ...)
//! - data instances addressable by their file-local `#id`
//! - named attribute access for the entity types listed in [`schema`]
//!
//! Read problems are graded with a [`Severity`] instead of aborting, so the
//! caller decides what counts as fatal.

pub mod loader;
pub mod parser;
pub mod pool;
pub mod schema;
pub mod value;

pub use loader::{load_file, load_str, Diagnostic, LoadError, LoadOptions, LoadReport, Severity};
pub use pool::{AttributeError, Instance, InstanceBody, InstancePool, Record};
pub use value::{InstanceId, Value};

/// Revision of the reader engine, e.g.
/// `git commit id: v0.1.0-3-gabc1234, build timestamp 2026-10-16T08:00:00Z`.
pub fn engine_version() -> String {
    format!(
        "git commit id: {}, build timestamp {}",
        env!("STEP3D_GIT_DESCRIBE"),
        env!("STEP3D_BUILD_TIMESTAMP")
    )
}
