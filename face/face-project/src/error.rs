//! Error types for surface projection.

use thiserror::Error;

/// Result type alias for projection operations.
pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Errors that can occur during surface projection and conforming.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// Cast direction is zero or not finite.
    #[error("invalid cast direction: {0}")]
    InvalidDirection(String),

    /// Invalid projection parameters.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// Conform target does not resolve to a mesh object.
    #[error("target not found: {name}")]
    TargetNotFound {
        /// Name that was looked up.
        name: String,
    },

    /// `bake` was called before `attach`.
    #[error("no mesh attached")]
    NothingAttached,

    /// Input mesh (or target surface) has no geometry.
    #[error("mesh is empty")]
    EmptyMesh,
}

impl ProjectionError {
    /// Create an invalid direction error.
    #[must_use]
    pub fn invalid_direction(details: impl Into<String>) -> Self {
        Self::InvalidDirection(details.into())
    }

    /// Create an invalid params error.
    #[must_use]
    pub fn invalid_params(details: impl Into<String>) -> Self {
        Self::InvalidParams(details.into())
    }

    /// Create a target not found error.
    #[must_use]
    pub fn target_not_found(name: impl Into<String>) -> Self {
        Self::TargetNotFound { name: name.into() }
    }
}
