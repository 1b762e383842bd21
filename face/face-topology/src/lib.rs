//! Triangle topology reconstruction for facemesh.
//!
//! A landmark detector outputs an ordered point set with no faces. This
//! crate recovers triangles from a static adjacency template (pairs of
//! landmark indices) by looking for closed 3-cycles:
//!
//! - [`EdgeAdjacency`] - Directed index -> neighbors map, built once per template
//! - [`build_faces`] - Discover deduplicated triangles
//! - [`build_landmark_mesh`] - Landmarks plus faces as an [`IndexedMesh`](face_types::IndexedMesh)
//! - [`load_template`] - Read a template from JSON or text
//!
//! # Example
//!
//! ```
//! use face_topology::{build_landmark_mesh, EdgeAdjacency};
//! use face_types::{landmarks_from_positions, MeshTopology, Point3};
//!
//! let landmarks = landmarks_from_positions(&[
//!     Point3::new(0.4, 0.4, 0.0),
//!     Point3::new(0.6, 0.4, 0.0),
//!     Point3::new(0.6, 0.6, 0.0),
//!     Point3::new(0.4, 0.6, 0.0),
//! ]);
//! let adjacency = EdgeAdjacency::symmetric([(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]);
//!
//! let mesh = build_landmark_mesh(&landmarks, &adjacency);
//! assert_eq!(mesh.face_count(), 2);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod adjacency;
mod builder;
mod error;
mod template;

pub use adjacency::EdgeAdjacency;
pub use builder::{FaceKey, build_faces, build_landmark_mesh, face_key};
pub use error::{TopologyError, TopologyResult};
pub use template::{load_template, parse_json_pairs, parse_text_pairs};
