//! Surface projection for facemesh.
//!
//! A reconstructed landmark mesh floats in front of the target head. This
//! crate snaps it onto the head surface in two stages:
//!
//! 1. [`project_onto_surface`] casts one ray per vertex along a shared
//!    direction, skipping hits on the projected mesh itself. Vertices whose
//!    ray finds nothing are moved to the mean of their neighbors.
//! 2. [`conform_to_target`] hands the result to a [`ConformService`] (by
//!    default [`NearestSurfaceShrinkwrap`]) to close the remaining gaps.
//!
//! Ray queries go through the [`RayCaster`] trait. [`Scene`] implements it
//! with a per-object BVH over triangulated meshes.
//!
//! # Example
//!
//! ```
//! use face_project::{project_onto_surface, ProjectionParams, Scene};
//! use face_types::{IndexedMesh, Isometry3, ObjectData, ObjectId, SceneObject, Vector3};
//!
//! let head = IndexedMesh::from_raw(
//!     &[-5.0, -5.0, 0.0, 5.0, -5.0, 0.0, 5.0, 5.0, 0.0, -5.0, 5.0, 0.0],
//!     &[0, 1, 2, 0, 2, 3],
//! );
//! let scene = Scene::from_objects([
//!     SceneObject::new(ObjectId(13), "Object_13", ObjectData::Mesh(head.into())),
//! ]);
//!
//! let patch = IndexedMesh::from_raw(&[0.2, 0.3, 2.0, 1.1, 0.4, 2.0, 0.5, 1.2, 2.0], &[0, 1, 2]);
//! let projection = project_onto_surface(
//!     &patch,
//!     &Isometry3::identity(),
//!     &-Vector3::z(),
//!     &scene,
//!     ObjectId(1),
//!     &ProjectionParams::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(projection.projected_count, 3);
//! assert!(projection.mesh.vertices.iter().all(|v| v.position.z.abs() < 1e-9));
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod conform;
mod error;
mod params;
mod projector;
mod raycast;
mod scene;

pub use conform::{ConformService, NearestSurfaceShrinkwrap, conform_to_target};
pub use error::{ProjectionError, ProjectionResult};
pub use params::{ProjectionParams, SceneParams, ShrinkwrapParams};
pub use projector::{
    MissReason, Projection, VertexOutcome, project_from_viewpoint, project_onto_surface,
    project_with_adjacency,
};
pub use raycast::{RayCaster, RayHit};
pub use scene::Scene;
