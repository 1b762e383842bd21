//! Core types for facemesh.
//!
//! This crate provides the foundational types shared by every stage of the
//! landmark-to-mesh pipeline:
//!
//! - [`Landmark`] - A detected facial keypoint with a stable index
//! - [`Vertex`] - A point in 3D space
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices
//! - [`PolygonMesh`] - An n-gon mesh with optional wire edges, as loaded from disk
//! - [`Triangle`] - A concrete triangle with geometric helpers
//! - [`MeshAdjacency`] - Edge/face/vertex adjacency lookups
//! - [`SceneObject`] - A named object in a capture scene (mesh, camera, empty)
//!
//! # Coordinate System
//!
//! Landmarks live in the detector's normalized image space: `x` and `y` in
//! `[0, 1]` with `y` growing downward, `z` a relative depth. Meshes handed to
//! the projector and analyzer live in a right-handed authoring space.
//!
//! # Example
//!
//! ```
//! use face_types::{Vertex, IndexedMesh, MeshTopology};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(0.5, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!(!mesh.is_empty());
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod adjacency;
mod landmark;
mod mesh;
mod object;
mod polygon;
mod traits;
mod triangle;
mod vertex;

pub use adjacency::{MeshAdjacency, normalize_edge};
pub use landmark::{Landmark, landmarks_from_positions};
pub use mesh::IndexedMesh;
pub use object::{ObjectData, ObjectId, ObjectKind, SceneObject, Viewpoint};
pub use polygon::PolygonMesh;
pub use traits::MeshTopology;
pub use triangle::Triangle;
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Isometry3, Point3, UnitQuaternion, Vector3};
