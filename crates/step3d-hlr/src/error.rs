//! Error taxonomy and the sticky session status.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ErrorKind {
    #[default]
    NoError,
    /// Path missing at load time.
    FileNotFound,
    /// The reader could not produce a usable instance pool.
    FileRead,
    /// Structural or reference-resolution failure during extraction.
    FileProcess,
    NotImplemented,
    Unknown,
}

impl ErrorKind {
    /// Stable numeric code, as exposed to adapter layers.
    pub fn code(self) -> i32 {
        match self {
            ErrorKind::NoError => 0,
            ErrorKind::FileNotFound => 1,
            ErrorKind::FileRead => 2,
            ErrorKind::FileProcess => 3,
            ErrorKind::NotImplemented => 4,
            ErrorKind::Unknown => 1000,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NoError => "no error",
            ErrorKind::FileNotFound => "file not found",
            ErrorKind::FileRead => "file read",
            ErrorKind::FileProcess => "file process",
            ErrorKind::NotImplemented => "not implemented",
            ErrorKind::Unknown => "unknown error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct HlrError {
    pub kind: ErrorKind,
    pub message: String,
}

impl HlrError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// A `FileProcess` failure raised inside the named extraction pass.
    pub fn process(pass: &str, cause: impl fmt::Display) -> Self {
        Self::new(ErrorKind::FileProcess, format!("{cause} at {pass}"))
    }
}

/// Error state of a session. Only [`Status::clear`] resets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Status {
    pub kind: ErrorKind,
    pub message: String,
}

impl Status {
    pub fn has_failed(&self) -> bool {
        self.kind != ErrorKind::NoError
    }

    pub fn fail(&mut self, err: HlrError) {
        self.kind = err.kind;
        self.message = err.message;
    }

    pub fn clear(&mut self) {
        self.kind = ErrorKind::NoError;
        self.message.clear();
    }
}
