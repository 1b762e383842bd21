//! Error types for the batch pipeline.

use std::io;
use std::path::PathBuf;

use face_io::IoError;
use thiserror::Error;

/// Result type alias for batch runs.
pub type BatchResult<T> = Result<T, BatchError>;

/// Directory-level failures that stop a batch before any image is processed.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The input directory cannot be listed.
    #[error("cannot read input directory {path}: {source}")]
    InputDir {
        /// Directory that was listed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The output directory cannot be created.
    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        /// Directory that was created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Errors reported by a [`LandmarkDetector`](crate::LandmarkDetector).
#[derive(Debug, Error)]
pub enum DetectError {
    /// The detector's input could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The detector's input was read but is malformed.
    #[error("malformed landmarks in {path}: {message}")]
    Malformed {
        /// File that was parsed.
        path: PathBuf,
        /// Description of what was invalid.
        message: String,
    },

    /// Detector backend failure.
    #[error("detector failed: {0}")]
    Backend(String),
}

impl DetectError {
    /// Create a malformed input error.
    #[must_use]
    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a backend error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

/// Why a single image failed.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Landmark detection failed.
    #[error(transparent)]
    Detect(#[from] DetectError),

    /// Writing the mesh failed.
    #[error(transparent)]
    Export(#[from] IoError),

    /// Another image with the same stem already writes this output.
    #[error("{output} is already written for {owner}")]
    DuplicateOutput {
        /// Contested output file.
        output: PathBuf,
        /// Image that owns the output.
        owner: PathBuf,
    },
}

/// A per-image failure recorded in a [`BatchReport`](crate::BatchReport).
#[derive(Debug)]
pub struct ImageFailure {
    /// The image that failed.
    pub image: PathBuf,
    /// What went wrong.
    pub error: ImageError,
}
