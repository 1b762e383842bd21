//! Mesh adjacency data structures.
//!
//! Provides lookups for edge-to-face, vertex-to-face and vertex-to-vertex
//! (1-ring) relationships over triangle or polygon faces.

use hashbrown::HashMap;

/// Adjacency information for a mesh.
///
/// Provides lookups for:
/// - Faces bordering an edge
/// - Faces and 1-ring neighbors of a vertex
/// - Boundary edges (exactly one bordering face)
/// - Non-manifold edges (bordering face count other than one or two)
///
/// Wire edges added with [`with_wire_edges`](Self::with_wire_edges) border
/// zero faces and therefore count as non-manifold.
#[derive(Debug, Clone, Default)]
pub struct MeshAdjacency {
    /// Maps edge (v0, v1) to list of face indices. v0 < v1.
    edge_to_faces: HashMap<(u32, u32), Vec<usize>>,
    /// Maps vertex index to list of face indices.
    vertex_to_faces: HashMap<u32, Vec<usize>>,
    /// Maps vertex index to its edge-connected neighbors, in discovery order.
    neighbors: HashMap<u32, Vec<u32>>,
}

impl MeshAdjacency {
    /// Build adjacency information from a list of faces.
    ///
    /// Faces may be triangles (`[u32; 3]`) or polygons (`Vec<u32>`). Edges
    /// connect consecutive vertices of each face, closing the loop.
    ///
    /// # Example
    ///
    /// ```
    /// use face_types::MeshAdjacency;
    ///
    /// let faces = vec![[0, 1, 2], [1, 3, 2]];
    /// let adj = MeshAdjacency::build(&faces);
    ///
    /// assert_eq!(adj.edge_count(), 5);
    /// assert_eq!(adj.boundary_edge_count(), 4);
    /// assert_eq!(adj.neighbors(1), &[0, 2, 3]);
    /// ```
    #[must_use]
    pub fn build<F: AsRef<[u32]>>(faces: &[F]) -> Self {
        let mut adj = Self::default();

        for (face_idx, face) in faces.iter().enumerate() {
            let face = face.as_ref();
            let n = face.len();

            for &v in face {
                adj.vertex_to_faces.entry(v).or_default().push(face_idx);
            }

            if n < 2 {
                continue;
            }
            for i in 0..n {
                let (a, b) = (face[i], face[(i + 1) % n]);
                if a == b {
                    continue;
                }
                let entry = adj.edge_to_faces.entry(normalize_edge(a, b)).or_default();
                if !entry.contains(&face_idx) {
                    entry.push(face_idx);
                }
                adj.link(a, b);
            }
        }

        adj
    }

    /// Add loose edges that belong to no face.
    ///
    /// An edge that is already part of a face keeps its face list.
    #[must_use]
    pub fn with_wire_edges(mut self, edges: &[[u32; 2]]) -> Self {
        for &[a, b] in edges {
            if a == b {
                continue;
            }
            self.edge_to_faces.entry(normalize_edge(a, b)).or_default();
            self.link(a, b);
        }
        self
    }

    fn link(&mut self, a: u32, b: u32) {
        let na = self.neighbors.entry(a).or_default();
        if !na.contains(&b) {
            na.push(b);
        }
        let nb = self.neighbors.entry(b).or_default();
        if !nb.contains(&a) {
            nb.push(a);
        }
    }

    /// Get faces bordering an edge.
    ///
    /// Returns `None` if the edge doesn't exist in the mesh.
    #[must_use]
    pub fn faces_for_edge(&self, v0: u32, v1: u32) -> Option<&[usize]> {
        self.edge_to_faces
            .get(&normalize_edge(v0, v1))
            .map(Vec::as_slice)
    }

    /// Get faces containing a vertex.
    ///
    /// Returns an empty slice if the vertex has no adjacent faces.
    #[must_use]
    pub fn faces_for_vertex(&self, v: u32) -> &[usize] {
        self.vertex_to_faces.get(&v).map_or(&[], Vec::as_slice)
    }

    /// Get the 1-ring neighbors of a vertex.
    ///
    /// Returns an empty slice for a loose vertex.
    #[must_use]
    pub fn neighbors(&self, v: u32) -> &[u32] {
        self.neighbors.get(&v).map_or(&[], Vec::as_slice)
    }

    /// Faces sharing at least one edge with the given face, excluding itself.
    ///
    /// The result is sorted and free of duplicates.
    #[must_use]
    pub fn edge_neighbor_faces(&self, face_idx: usize, face: &[u32]) -> Vec<usize> {
        let n = face.len();
        let mut out = Vec::new();
        for i in 0..n {
            if let Some(faces) = self.faces_for_edge(face[i], face[(i + 1) % n]) {
                out.extend(faces.iter().copied().filter(|&f| f != face_idx));
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Count the number of boundary edges.
    #[must_use]
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_to_faces
            .values()
            .filter(|faces| faces.len() == 1)
            .count()
    }

    /// Iterate over all non-manifold edges (bordering face count not 1 or 2).
    pub fn non_manifold_edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.edge_to_faces
            .iter()
            .filter(|(_, faces)| !matches!(faces.len(), 1 | 2))
            .map(|(&edge, _)| edge)
    }

    /// Count the number of non-manifold edges.
    #[must_use]
    pub fn non_manifold_edge_count(&self) -> usize {
        self.edge_to_faces
            .values()
            .filter(|faces| !matches!(faces.len(), 1 | 2))
            .count()
    }

    /// Check if the mesh is manifold (every edge borders one or two faces).
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edge_count() == 0
    }

    /// Count vertices in `0..vertex_count` that have no incident edge.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn loose_vertex_count(&self, vertex_count: usize) -> usize {
        (0..vertex_count)
            .filter(|&v| self.neighbors(v as u32).is_empty())
            .count()
    }

    /// Get the total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_to_faces.len()
    }
}

/// Normalize edge direction so v0 < v1.
#[inline]
#[must_use]
pub const fn normalize_edge(v0: u32, v1: u32) -> (u32, u32) {
    if v0 < v1 { (v0, v1) } else { (v1, v0) }
}
