//! Error types for topology template loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for topology operations.
pub type TopologyResult<T> = Result<T, TopologyError>;

/// Errors that can occur while loading an adjacency template.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// Template file not found.
    #[error("template not found: {path}")]
    TemplateNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// A text template line could not be parsed.
    #[error("invalid template line {line}: {message}")]
    InvalidLine {
        /// 1-based line number.
        line: usize,
        /// Description of what was invalid.
        message: String,
    },

    /// JSON template could not be decoded.
    #[error("invalid JSON template: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TopologyError {
    /// Create an `InvalidLine` error for the given 1-based line number.
    #[must_use]
    pub fn invalid_line(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidLine {
            line,
            message: message.into(),
        }
    }
}
