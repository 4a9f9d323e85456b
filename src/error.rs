//! Error types and result aliases for f90ops.
//!
//! This module defines the error handling infrastructure:
//! - [`Result<T>`]: Type alias for `anyhow::Result<T>` used by the pipeline and binary
//! - [`ScanError`]: Fatal errors that abort the scan of a single input
//! - [`ScanWarning`]: Non-fatal anomalies reported next to findings

use std::io;
use std::path::PathBuf;

use anyhow::Result as AnyhowResult;
use thiserror::Error;

pub type Result<T> = AnyhowResult<T>;

/// Errors that stop the scan of one input
#[derive(Debug, Error)]
pub enum ScanError {
    /// The input could not be read (missing file, permissions, invalid UTF-8)
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading from an anonymous reader failed
    #[error("read error: {0}")]
    Read(#[from] io::Error),
}

impl ScanError {
    /// Attach a path to a bare read error
    #[must_use]
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            ScanError::Read(source) => ScanError::Io {
                path: path.into(),
                source,
            },
            other => other,
        }
    }
}

/// Anomalies found while lexing; scanning always continues past them
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanWarning {
    /// A quote was opened but neither closed nor continued with `&`
    #[error("unterminated string literal")]
    UnterminatedString { line: usize, column: usize },

    /// The input ended while a `&` continuation was still open
    #[error("continuation marker '&' has no following line")]
    UnterminatedContinuation { line: usize },
}

impl ScanWarning {
    /// Line the warning refers to
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            ScanWarning::UnterminatedString { line, .. }
            | ScanWarning::UnterminatedContinuation { line } => *line,
        }
    }

    /// Column the warning refers to, when it points at a character
    #[must_use]
    pub fn column(&self) -> Option<usize> {
        match self {
            ScanWarning::UnterminatedString { column, .. } => Some(*column),
            ScanWarning::UnterminatedContinuation { .. } => None,
        }
    }
}
