//! Load/parse lifecycle of one STEP file.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use step3d_express::{load_file, InstancePool, LoadReport, Severity};
use tracing::{debug, info, warn};

use crate::error::{ErrorKind, HlrError, Status};
use crate::extract::extract_hlr;
use crate::model::{HeaderInfo, HlrResult, Part, Relation};
use crate::options::ExtractOptions;

pub const NOT_LOADED_MESSAGE: &str = "No loaded file yet, parse content is not possible";
pub const EXTRACTION_FAILED_MESSAGE: &str = "HLR extraction already failed for this file";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SessionState {
    #[default]
    Created,
    Loaded,
    Parsed,
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Parsed | SessionState::Failed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Created => "created",
            SessionState::Loaded => "loaded",
            SessionState::Parsed => "parsed",
            SessionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A STEP file session: `load`, then `parse_hlr_information`, then read.
///
/// Every failure is reported through the boolean return value and the
/// sticky error status; nothing here panics on bad input.
#[derive(Debug, Default)]
pub struct Step3dFile {
    options: ExtractOptions,
    filename: Option<PathBuf>,
    state: SessionState,
    pool: Option<InstancePool>,
    report: LoadReport,
    result: HlrResult,
}

impl Step3dFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ExtractOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Read `path` into a fresh session. Any previous result is discarded.
    pub fn load(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        self.filename = Some(path.to_path_buf());
        self.state = SessionState::Created;
        self.pool = None;
        self.report = LoadReport::default();
        self.result = HlrResult::default();

        info!(path = %path.display(), "loading STEP file");
        match self.read(path) {
            Ok(pool) => {
                self.pool = Some(pool);
                self.state = SessionState::Loaded;
                true
            }
            Err(err) => {
                warn!(path = %path.display(), kind = %err.kind, error = %err.message, "load failed");
                self.result.status.fail(err);
                self.state = SessionState::Failed;
                false
            }
        }
    }

    fn read(&mut self, path: &Path) -> Result<InstancePool, HlrError> {
        if !path.exists() {
            return Err(HlrError::new(
                ErrorKind::FileNotFound,
                format!("File does not exist: {}", path.display()),
            ));
        }

        let (pool, report) = load_file(path, &self.options.load)
            .map_err(|e| HlrError::new(ErrorKind::FileRead, e.to_string()))?;
        for diagnostic in &report.diagnostics {
            debug!(
                severity = %diagnostic.severity,
                line = ?diagnostic.line,
                message = %diagnostic.message,
                "reader diagnostic"
            );
        }
        let severity = report.severity;
        self.report = report;

        if severity.is_fatal() {
            return Err(HlrError::new(
                ErrorKind::FileRead,
                format!("Error reading the STEP file content: {severity}"),
            ));
        }
        Ok(pool)
    }

    /// Extract header, parts, relations and placements from the loaded file.
    ///
    /// Returns `false` when the session has failed. A session that already
    /// reached a terminal state is not extracted again; a failed one keeps
    /// answering `false` even after [`Self::clear_error`].
    pub fn parse_hlr_information(&mut self) -> bool {
        if self.state.is_terminal() {
            debug!(state = %self.state, "HLR information already parsed");
        }
        match self.state {
            SessionState::Created => {
                if !self.has_failed() {
                    self.result
                        .status
                        .fail(HlrError::new(ErrorKind::FileProcess, NOT_LOADED_MESSAGE));
                }
                false
            }
            SessionState::Parsed => !self.has_failed(),
            SessionState::Failed => {
                if !self.has_failed() {
                    let message = if self.pool.is_none() {
                        NOT_LOADED_MESSAGE
                    } else {
                        EXTRACTION_FAILED_MESSAGE
                    };
                    self.result
                        .status
                        .fail(HlrError::new(ErrorKind::FileProcess, message));
                }
                false
            }
            SessionState::Loaded => {
                let Some(pool) = self.pool.as_ref() else {
                    self.result
                        .status
                        .fail(HlrError::new(ErrorKind::FileProcess, NOT_LOADED_MESSAGE));
                    self.state = SessionState::Failed;
                    return false;
                };
                self.result = extract_hlr(pool, &self.options);
                self.state = if self.result.has_failed() {
                    SessionState::Failed
                } else {
                    SessionState::Parsed
                };
                info!(
                    state = %self.state,
                    parts = self.result.parts.len(),
                    relations = self.result.relations.len(),
                    "HLR information parsed"
                );
                !self.has_failed()
            }
        }
    }

    pub fn header_info(&self) -> &HeaderInfo {
        &self.result.header
    }

    pub fn parts(&self) -> &[Part] {
        &self.result.parts
    }

    pub fn relations(&self) -> &[Relation] {
        &self.result.relations
    }

    pub fn result(&self) -> &HlrResult {
        &self.result
    }

    /// Reader diagnostics of the last load.
    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    pub fn read_severity(&self) -> Severity {
        self.report.severity
    }

    pub fn status(&self) -> &Status {
        &self.result.status
    }

    pub fn has_failed(&self) -> bool {
        self.result.status.has_failed()
    }

    pub fn error_kind(&self) -> ErrorKind {
        self.result.status.kind
    }

    pub fn error_message(&self) -> &str {
        &self.result.status.message
    }

    pub fn clear_error(&mut self) {
        self.result.status.clear();
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }
}
