//! Mesh quality metrics for facemesh.
//!
//! Validates a reconstructed or projected face mesh with classic element
//! quality measures, computed per triangle after an explicit fan
//! triangulation:
//!
//! | Metric | Ideal | Degenerate |
//! |--------|-------|------------|
//! | Aspect ratio (longest / shortest edge) | 1 | `+inf` |
//! | Equiangle skewness | 0 | 1 |
//! | Size ratio (vs. edge neighbors) | 1 | `+inf` |
//! | Shape factor (area / equilateral area) | 1 | `+inf` |
//!
//! The [`QualityReport`] also carries means, area extremes, topology counts
//! and the vertex density of an optional [`Selection`].
//!
//! # Example
//!
//! ```
//! use face_quality::{analyze_mesh, QualityThresholds};
//! use face_types::{IndexedMesh, PolygonMesh};
//!
//! let mesh: PolygonMesh = IndexedMesh::from_raw(
//!     &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
//!     &[0, 1, 2, 0, 2, 3],
//! )
//! .into();
//!
//! let report = analyze_mesh(&mesh, None).unwrap();
//! assert_eq!(report.topology.edges, 5);
//! assert!(report.flagged_faces(&QualityThresholds::default()).is_empty());
//! println!("{report}");
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod analyze;
mod error;
mod metrics;
mod report;
mod selection;

pub use analyze::{analyze_mesh, analyze_object};
pub use error::{QualityError, QualityResult};
pub use metrics::{aspect_ratio, shape_factor, size_ratio, skewness, skewness_from_angles};
pub use report::{
    AreaExtremes, FaceArea, FaceQuality, QualityReport, QualityThresholds, QualityTotals,
    TopologyStats,
};
pub use selection::Selection;
