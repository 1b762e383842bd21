//! Face mesh reconstruction toolkit.
//!
//! This umbrella crate re-exports the facemesh crates behind one API:
//! landmarks from a detector become a triangle mesh, the mesh is written as
//! OBJ, snapped onto a reference head surface, and checked for element
//! quality.
//!
//! # Quick Start
//!
//! ```
//! use facemesh::prelude::*;
//!
//! // Detector output and a connectivity template
//! let landmarks = landmarks_from_positions(&[
//!     Point3::new(0.4, 0.4, 0.0),
//!     Point3::new(0.6, 0.4, 0.0),
//!     Point3::new(0.6, 0.6, 0.0),
//!     Point3::new(0.4, 0.6, 0.0),
//! ]);
//! let adjacency = EdgeAdjacency::symmetric([(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]);
//!
//! // Recover triangles
//! let mesh = build_landmark_mesh(&landmarks, &adjacency);
//! assert_eq!(mesh.face_count(), 2);
//!
//! // Check quality
//! let report = analyze_mesh(&mesh.into(), None).unwrap();
//! assert_eq!(report.topology.non_manifold_edges, 0);
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - Landmarks, meshes, triangles and scene objects
//! - [`topology`] - Triangle discovery from an adjacency template
//! - [`io`] - OBJ export and import
//! - [`project`] - Ray-cast projection and shrinkwrap conforming
//! - [`quality`] - Element quality metrics and topology statistics
//! - [`batch`] - Folder pipeline from images to meshes
//!
//! # Feature Flags
//!
//! - `serde` - Serialization for parameters, meshes and reports

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

// =============================================================================
// Re-exports
// =============================================================================

/// Landmarks, meshes, triangles and scene objects.
pub use face_types as types;

/// Triangle discovery from an adjacency template.
pub use face_topology as topology;

/// OBJ export and import.
pub use face_io as io;

/// Ray-cast projection and shrinkwrap conforming.
pub use face_project as project;

/// Element quality metrics and topology statistics.
pub use face_quality as quality;

/// Folder pipeline from images to meshes.
pub use face_batch as batch;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for face mesh processing.
///
/// # Usage
///
/// ```
/// use facemesh::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use face_types::{
        IndexedMesh, Landmark, MeshTopology, ObjectData, ObjectId, ObjectKind, Point3,
        PolygonMesh, SceneObject, Triangle, Vector3, Vertex, Viewpoint, landmarks_from_positions,
    };

    // Topology
    pub use face_topology::{EdgeAdjacency, build_faces, build_landmark_mesh, load_template};

    // I/O
    pub use face_io::{CoordinateTransform, export_landmarks, load_mesh, save_mesh};

    // Projection
    pub use face_project::{
        ConformService, NearestSurfaceShrinkwrap, ProjectionParams, RayCaster, Scene,
        conform_to_target, project_onto_surface,
    };

    // Quality
    pub use face_quality::{QualityReport, Selection, analyze_mesh, analyze_object};

    // Batch
    pub use face_batch::{BatchParams, LandmarkDetector, SidecarDetector, process_folder};
}

// =============================================================================
// Tests
// =============================================================================
