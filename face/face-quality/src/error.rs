//! Error types for quality analysis.

use face_types::ObjectKind;
use thiserror::Error;

/// Result type alias for quality analysis.
pub type QualityResult<T> = Result<T, QualityError>;

/// Errors that can occur during quality analysis.
///
/// Degenerate geometry is not an error; metrics report `+inf` or zero
/// instead.
#[derive(Debug, Error)]
pub enum QualityError {
    /// The analyzed object carries no mesh data.
    #[error("object is not a mesh (found {kind})")]
    NotAMesh {
        /// Kind of the object that was passed in.
        kind: ObjectKind,
    },

    /// A face references a vertex that does not exist.
    #[error("face {face} references missing vertex {index}")]
    InvalidIndex {
        /// Face index (in the mesh as given).
        face: usize,
        /// The missing vertex index.
        index: u32,
    },

    /// A wire edge references a vertex that does not exist.
    #[error("wire edge {edge} references missing vertex {index}")]
    InvalidEdgeIndex {
        /// Position in the mesh's wire edge list.
        edge: usize,
        /// The missing vertex index.
        index: u32,
    },

    /// A selection index does not exist in the mesh.
    #[error("invalid selection: {element} {index} out of range (count {count})")]
    InvalidSelection {
        /// `"vertex"` or `"face"`.
        element: &'static str,
        /// The offending index.
        index: usize,
        /// Number of elements of that kind in the mesh.
        count: usize,
    },
}

impl QualityError {
    /// Create a not-a-mesh error.
    #[must_use]
    pub const fn not_a_mesh(kind: ObjectKind) -> Self {
        Self::NotAMesh { kind }
    }

    /// Create an invalid selection error.
    #[must_use]
    pub const fn invalid_selection(element: &'static str, index: usize, count: usize) -> Self {
        Self::InvalidSelection {
            element,
            index,
            count,
        }
    }
}
