//! Error taxonomy for a snapshot export run.
//!
//! Per-line errors (`Decode`) and per-file errors (`FileNotFound`, `InputUnreadable`,
//! `Decompression`) are contained by the pipeline; `OutputConflict` and `WriteFailure`
//! are the only errors that end a run.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A single line could not be turned into a record.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid Ion text at byte {offset}: {reason}")]
    Ion { offset: usize, reason: String },
    #[error("attribute `{field}` rejected: {reason}")]
    Attribute { field: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("cannot open input {}: {source}", path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("decompression failed in {} after {lines} lines: {source}", path.display())]
    Decompression {
        path: PathBuf,
        lines: u64,
        #[source]
        source: io::Error,
    },

    #[error("{}:{line}: {source}", path.display())]
    Decode {
        path: PathBuf,
        line: u64,
        #[source]
        source: DecodeError,
    },

    #[error("output {} already exists; delete it before starting a new run", .0.display())]
    OutputConflict(PathBuf),

    #[error("write to {} failed: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unknown source type `{0}` (expected NOTIFICATION, PROFILE or USER_SEGMENT)")]
    UnknownSource(String),
}

impl ExportError {
    /// True for errors that only cost the current input file; the run moves on to the next one.
    pub fn is_file_recoverable(&self) -> bool {
        matches!(
            self,
            ExportError::FileNotFound(_)
                | ExportError::InputUnreadable { .. }
                | ExportError::Decompression { .. }
        )
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: impl Into<io::Error>) -> Self {
        ExportError::WriteFailure { path: path.into(), source: source.into() }
    }
}
