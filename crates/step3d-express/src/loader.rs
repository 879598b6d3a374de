//! Build an [`InstancePool`] from an exchange file and grade what went wrong.

use std::fmt;
use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

use crate::parser::{parse_exchange, SyntaxError};
use crate::pool::{Instance, InstanceBody, InstancePool};
use crate::schema;
use crate::value::Value;

/// Read-level severity, most severe first.
///
/// Anything below [`Severity::Warning`] means the pool cannot be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Exit,
    Bug,
    InputError,
    Warning,
    Incomplete,
    Null,
}

impl Severity {
    pub fn is_fatal(self) -> bool {
        self < Severity::Warning
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Exit => "SEVERITY_EXIT",
            Severity::Bug => "SEVERITY_BUG",
            Severity::InputError => "SEVERITY_INPUT_ERROR",
            Severity::Warning => "SEVERITY_WARNING",
            Severity::Incomplete => "SEVERITY_INCOMPLETE",
            Severity::Null => "SEVERITY_NULL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub line: Option<usize>,
    pub message: String,
}

/// Outcome of a read. `severity` is the worst diagnostic, `Null` when clean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub severity: Severity,
    pub diagnostics: Vec<Diagnostic>,
}

impl Default for LoadReport {
    fn default() -> Self {
        Self {
            severity: Severity::Null,
            diagnostics: Vec::new(),
        }
    }
}

impl LoadReport {
    fn push(&mut self, severity: Severity, line: Option<usize>, message: String) {
        self.severity = self.severity.min(severity);
        self.diagnostics.push(Diagnostic {
            severity,
            line,
            message,
        });
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

/// Loader knobs.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Report allow-listed records whose parameter count differs from the
    /// attribute table.
    pub check_arity: bool,
    /// Report references to ids that are not defined in the file.
    pub check_references: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            check_arity: true,
            check_references: true,
        }
    }
}

/// Read and load a file from disk.
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<(InstancePool, LoadReport), LoadError> {
    let text = fs::read(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let text = decode_text(text);
    Ok(load_str(&text, options))
}

/// UTF-8 when the bytes allow it, ISO 8859-1 otherwise.
///
/// Every Latin-1 byte maps to the code point of the same value, so no input
/// byte is lost or replaced.
fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            debug!(offset = err.utf8_error().valid_up_to(), "not UTF-8, reading as ISO 8859-1");
            err.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

/// Load an in-memory exchange structure.
///
/// Syntax errors do not produce an `Err`: they are graded
/// [`Severity::InputError`] and an empty pool is returned, the same way a
/// reader reports an unreadable file through its severity.
pub fn load_str(text: &str, options: &LoadOptions) -> (InstancePool, LoadReport) {
    let mut report = LoadReport::default();
    let mut pool = InstancePool::new();

    let file = match parse_exchange(text) {
        Ok(file) => file,
        Err(err) => {
            warn!(line = err.line, error = %err.message, "exchange file rejected");
            report.push(Severity::InputError, Some(err.line), err.message);
            return (pool, report);
        }
    };

    for record in file.header {
        pool.push_header(record.type_name, record.params);
    }

    let mut lines = Vec::with_capacity(file.data.len());
    for parsed in file.data {
        let line = parsed.line;
        let instance = Instance {
            id: parsed.id,
            body: parsed.body,
        };
        if options.check_arity {
            check_arity(&instance, line, &mut report);
        }
        if let Err(dup) = pool.insert(instance) {
            report.push(
                Severity::InputError,
                Some(line),
                format!("duplicate instance name #{}", dup.id),
            );
            continue;
        }
        lines.push(line);
    }

    if options.check_references {
        for (instance, line) in pool.instances().zip(lines) {
            for id in references(instance) {
                if !pool.contains(id) {
                    report.push(
                        Severity::Incomplete,
                        Some(line),
                        format!("#{} references undefined instance #{id}", instance.id),
                    );
                }
            }
        }
    }

    debug!(
        header = pool.header_instances().len(),
        instances = pool.len(),
        severity = %report.severity,
        "exchange file loaded"
    );
    (pool, report)
}

fn check_arity(instance: &Instance, line: usize, report: &mut LoadReport) {
    let Some(type_name) = instance.type_name() else {
        return;
    };
    if let Some(names) = schema::attribute_names(type_name) {
        let count = instance.params().len();
        if count != names.len() {
            report.push(
                Severity::Warning,
                Some(line),
                format!(
                    "#{}: {type_name} expects {} parameters, found {count}",
                    instance.id,
                    names.len()
                ),
            );
        }
    }
}

fn references(instance: &Instance) -> Vec<u64> {
    fn collect(value: &Value, out: &mut Vec<u64>) {
        match value {
            Value::Ref(id) => out.push(*id),
            Value::List(items) => items.iter().for_each(|v| collect(v, out)),
            Value::Typed(_, inner) => collect(inner, out),
            _ => {}
        }
    }

    let mut out = Vec::new();
    match &instance.body {
        InstanceBody::Simple(record) => record.params.iter().for_each(|v| collect(v, &mut out)),
        InstanceBody::Complex(records) => records
            .iter()
            .flat_map(|r| r.params.iter())
            .for_each(|v| collect(v, &mut out)),
    }
    out
}
