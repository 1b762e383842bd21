//! Vertex and face subsets for density measurement.

use face_types::PolygonMesh;

use crate::error::{QualityError, QualityResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A subset of a mesh's vertices and faces.
///
/// Face indices refer to the mesh as given, before triangulation. Only the
/// vertex density depends on the selection; all other metrics cover the
/// whole mesh.
///
/// # Example
///
/// ```
/// use face_quality::Selection;
///
/// let sel = Selection::new().with_vertices([0, 1, 2]).with_faces([0]);
/// assert_eq!(sel.vertices(), &[0, 1, 2]);
/// assert_eq!(sel.faces(), &[0]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Selection {
    vertices: Vec<u32>,
    faces: Vec<usize>,
}

impl Selection {
    /// Create an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Select every vertex and face of `mesh`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn all(mesh: &PolygonMesh) -> Self {
        Self {
            vertices: (0..mesh.vertices.len() as u32).collect(),
            faces: (0..mesh.faces.len()).collect(),
        }
    }

    /// Add vertices to the selection. Duplicates are ignored.
    #[must_use]
    pub fn with_vertices<I: IntoIterator<Item = u32>>(mut self, vertices: I) -> Self {
        for v in vertices {
            if !self.vertices.contains(&v) {
                self.vertices.push(v);
            }
        }
        self
    }

    /// Add faces to the selection. Duplicates are ignored.
    #[must_use]
    pub fn with_faces<I: IntoIterator<Item = usize>>(mut self, faces: I) -> Self {
        for f in faces {
            if !self.faces.contains(&f) {
                self.faces.push(f);
            }
        }
        self
    }

    /// Selected vertex indices.
    #[must_use]
    pub fn vertices(&self) -> &[u32] {
        &self.vertices
    }

    /// Selected face indices.
    #[must_use]
    pub fn faces(&self) -> &[usize] {
        &self.faces
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.faces.is_empty()
    }

    /// Check every index against `mesh`.
    ///
    /// # Errors
    ///
    /// Returns [`QualityError::InvalidSelection`] for the first vertex or
    /// face index that is out of range.
    pub fn validate(&self, mesh: &PolygonMesh) -> QualityResult<()> {
        let vertex_count = mesh.vertices.len();
        if let Some(&v) = self.vertices.iter().find(|&&v| v as usize >= vertex_count) {
            return Err(QualityError::invalid_selection(
                "vertex",
                v as usize,
                vertex_count,
            ));
        }
        let face_count = mesh.faces.len();
        if let Some(&f) = self.faces.iter().find(|&&f| f >= face_count) {
            return Err(QualityError::invalid_selection("face", f, face_count));
        }
        Ok(())
    }
}
