//! Error and warning types for textloom.

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for textloom operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort an extraction.
///
/// Any page-level failure aborts the whole run; there are no partial
/// per-page results.
#[derive(Error, Debug)]
pub enum Error {
    /// The source file could not be opened or read.
    #[error("cannot read file {path}")]
    FileNotReadable {
        /// Path of the unreadable file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The upstream container or placement dump could not be parsed.
    #[error("failed to parse input: {0}")]
    ParseFailure(String),

    /// A specific page's placements could not be resolved.
    #[error("failed to extract page {page}: {reason}")]
    PageExtraction {
        /// Zero-based page index
        page: usize,
        /// Human-readable failure description
        reason: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ParseFailure(err.to_string())
    }
}

/// Non-fatal, page-local anomaly reported alongside results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionWarning {
    /// Zero-based page index the anomaly was observed on
    pub page: usize,

    /// Anomaly category
    pub kind: WarningKind,

    /// Human-readable description
    pub message: String,
}

impl ExtractionWarning {
    pub fn new(page: usize, kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            page,
            kind,
            message: message.into(),
        }
    }
}

/// Categories of non-fatal anomalies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A line segment could have joined more than one candidate table grid.
    AmbiguousTableGrid,

    /// A bidi run could not be confidently reordered.
    UnresolvedBidi,

    /// A painted line had zero length or zero stroke width.
    DegenerateLine,
}
