//! Triangle discovery over a directed landmark adjacency.

// Landmark templates hold a few hundred points; index casts cannot truncate.
#![allow(clippy::cast_possible_truncation)]

use face_types::{IndexedMesh, Landmark, Vertex};
use hashbrown::HashSet;
use tracing::{debug, info};

use crate::EdgeAdjacency;

/// Order-independent identity of a triangle.
///
/// Two triangles over the same three vertices are the same face, whatever
/// their winding.
///
/// # Example
///
/// ```
/// use face_topology::face_key;
///
/// assert_eq!(face_key(7, 2, 5), face_key(5, 7, 2));
/// assert_eq!(face_key(7, 2, 5).0, [2, 5, 7]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceKey(pub [u32; 3]);

/// Identity of the triangle `{a, b, c}`.
#[must_use]
pub fn face_key(a: u32, b: u32, c: u32) -> FaceKey {
    let mut key = [a, b, c];
    key.sort_unstable();
    FaceKey(key)
}

impl From<[u32; 3]> for FaceKey {
    fn from([a, b, c]: [u32; 3]) -> Self {
        face_key(a, b, c)
    }
}

/// Discover triangles in a landmark adjacency.
///
/// Walks every landmark `v` in slice order. For each neighbor `n1` of `v`
/// whose directed edge `(v, n1)` is still unconsumed, it scans the neighbors
/// `n2` of `n1` (skipping `v` and consumed edges `(n1, n2)`) for one that
/// closes the loop back to `v`. The first such `n2` whose vertex set is new
/// yields the triangle `[v, n1, n2]` and consumes `(v, n1)`.
///
/// Landmark `i` is expected at position `i` of `vertices`; neighbor
/// indices past the end of the slice are skipped, as are neighbors without
/// an adjacency entry. The adjacency is used as given and never made
/// symmetric.
///
/// The result is deterministic and in discovery order. Empty inputs give an
/// empty result.
///
/// # Example
///
/// ```
/// use face_topology::{build_faces, EdgeAdjacency};
/// use face_types::{landmarks_from_positions, Point3};
///
/// let landmarks = landmarks_from_positions(&[
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ]);
/// let adjacency = EdgeAdjacency::from_pairs([(0, 1), (1, 2), (2, 0)]);
///
/// assert_eq!(build_faces(&landmarks, &adjacency), vec![[0, 1, 2]]);
/// ```
#[must_use]
pub fn build_faces(vertices: &[Landmark], adjacency: &EdgeAdjacency) -> Vec<[u32; 3]> {
    if vertices.is_empty() || adjacency.is_empty() {
        debug!(
            vertices = vertices.len(),
            adjacency = adjacency.len(),
            "Nothing to build"
        );
        return Vec::new();
    }

    info!(
        vertices = vertices.len(),
        edges = adjacency.pair_count(),
        "Building faces from adjacency"
    );

    let in_range = |index: u32| (index as usize) < vertices.len();

    let mut faces = Vec::new();
    let mut consumed: HashSet<(u32, u32)> = HashSet::new();
    let mut emitted: HashSet<FaceKey> = HashSet::new();
    let mut skipped_out_of_range = 0usize;

    for landmark in vertices {
        let v = landmark.index;
        let Some(first_ring) = adjacency.neighbors(v) else {
            continue;
        };

        for &n1 in first_ring {
            if consumed.contains(&(v, n1)) {
                continue;
            }
            let Some(second_ring) = adjacency.neighbors(n1) else {
                continue;
            };
            if !in_range(n1) {
                skipped_out_of_range += 1;
                continue;
            }

            for &n2 in second_ring {
                if n2 == v || consumed.contains(&(n1, n2)) {
                    continue;
                }
                if !in_range(n2) {
                    skipped_out_of_range += 1;
                    continue;
                }
                if !adjacency.contains(n2, v) {
                    continue;
                }

                let key = face_key(v, n1, n2);
                if emitted.insert(key) {
                    faces.push([v, n1, n2]);
                    consumed.insert((v, n1));
                    break;
                }
            }
        }
    }

    if skipped_out_of_range > 0 {
        debug!(
            skipped = skipped_out_of_range,
            "Skipped neighbors outside the landmark list"
        );
    }

    info!(
        faces = faces.len(),
        consumed_edges = consumed.len(),
        "Face building complete"
    );

    faces
}

/// Build a triangle mesh over the landmark positions.
///
/// Vertex `i` of the mesh is landmark `i`; faces come from
/// [`build_faces`].
#[must_use]
pub fn build_landmark_mesh(landmarks: &[Landmark], adjacency: &EdgeAdjacency) -> IndexedMesh {
    let faces = build_faces(landmarks, adjacency);
    let vertices = landmarks.iter().map(|l| Vertex::new(l.position)).collect();
    IndexedMesh::from_parts(vertices, faces)
}
