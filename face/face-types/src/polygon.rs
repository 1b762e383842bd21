//! General polygon mesh with optional wire edges.

use crate::{IndexedMesh, MeshTopology, Vertex};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A mesh whose faces may have any number of vertices.
///
/// This is what a mesh file or an editing host hands over before
/// triangulation. Besides faces it may carry loose "wire" edges that
/// belong to no face; they count towards topology statistics.
///
/// Metric code works on triangles only, so the conversion to
/// [`IndexedMesh`] is an explicit step: [`triangulate`](Self::triangulate).
///
/// # Example
///
/// ```
/// use face_types::{PolygonMesh, Vertex, MeshTopology};
///
/// let mut quad = PolygonMesh::new();
/// quad.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// quad.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// quad.vertices.push(Vertex::from_coords(1.0, 1.0, 0.0));
/// quad.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// quad.faces.push(vec![0, 1, 2, 3]);
///
/// let tris = quad.triangulate();
/// assert_eq!(quad.face_count(), 1);
/// assert_eq!(tris.face_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PolygonMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Polygon faces as vertex index loops.
    pub faces: Vec<Vec<u32>>,

    /// Wire edges that are not part of any face.
    pub edges: Vec<[u32; 2]>,
}

impl PolygonMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Fan-triangulate every face.
    ///
    /// Faces with fewer than three vertices are dropped; triangles are kept
    /// as-is. Wire edges do not survive triangulation. Face `k` of an
    /// n-gon maps to triangle `[f0, f(k+1), f(k+2)]`.
    #[must_use]
    pub fn triangulate(&self) -> IndexedMesh {
        let tri_count: usize = self
            .faces
            .iter()
            .map(|f| f.len().saturating_sub(2))
            .sum();
        let mut mesh = IndexedMesh::with_capacity(self.vertices.len(), tri_count);
        mesh.vertices.extend_from_slice(&self.vertices);

        for face in &self.faces {
            if face.len() < 3 {
                continue;
            }
            for i in 1..face.len() - 1 {
                mesh.faces.push([face[0], face[i], face[i + 1]]);
            }
        }

        mesh
    }

    /// Whether every face is already a triangle.
    #[must_use]
    pub fn is_triangulated(&self) -> bool {
        self.faces.iter().all(|f| f.len() == 3)
    }
}

impl From<IndexedMesh> for PolygonMesh {
    fn from(mesh: IndexedMesh) -> Self {
        Self {
            vertices: mesh.vertices,
            faces: mesh.faces.iter().map(|f| f.to_vec()).collect(),
            edges: Vec::new(),
        }
    }
}

impl MeshTopology for PolygonMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }
}
