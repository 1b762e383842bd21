//! Traits for mesh types.

use crate::Vertex;

/// Trait for types that provide mesh topology information.
///
/// Implemented by both [`IndexedMesh`](crate::IndexedMesh) and
/// [`PolygonMesh`](crate::PolygonMesh) so that counting and vertex access
/// does not care whether a mesh has been triangulated yet.
pub trait MeshTopology {
    /// Get the number of vertices.
    fn vertex_count(&self) -> usize;

    /// Get the number of faces.
    fn face_count(&self) -> usize;

    /// Check if the mesh is empty.
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0 || self.face_count() == 0
    }

    /// Get a vertex by index.
    ///
    /// Returns `None` if the index is out of bounds.
    fn vertex(&self, index: usize) -> Option<&Vertex>;

    /// Iterate over all vertices.
    fn vertices(&self) -> impl Iterator<Item = &Vertex>;
}
