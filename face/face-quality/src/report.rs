//! Typed quality report.

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Quality metrics of one triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FaceQuality {
    /// Longest over shortest edge (`+inf` for a zero-length edge).
    pub aspect_ratio: f64,
    /// Equiangle skewness in `[0, 1]`.
    pub skewness: f64,
    /// Largest over smallest area among the face and its edge neighbors.
    pub size_ratio: f64,
    /// Area over the equilateral area for the same circumradius.
    pub shape_factor: f64,
    /// Triangle area.
    pub area: f64,
}

/// Arithmetic means of the per-face metrics.
///
/// A single degenerate face makes the corresponding mean `+inf`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct QualityTotals {
    /// Mean aspect ratio.
    pub aspect_ratio: f64,
    /// Mean skewness.
    pub skewness: f64,
    /// Mean size ratio.
    pub size_ratio: f64,
    /// Mean shape factor.
    pub shape_factor: f64,
}

/// A face index with its area.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FaceArea {
    /// Index into the triangulated faces.
    pub face: usize,
    /// Area of that face.
    pub area: f64,
}

/// Largest and smallest triangles.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AreaExtremes {
    /// Face with the largest area (first one on ties).
    pub max: FaceArea,
    /// Face with the smallest area (first one on ties).
    pub min: FaceArea,
}

/// Counts over the mesh as given (before triangulation).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TopologyStats {
    /// Number of vertices.
    pub vertices: usize,
    /// Number of unique undirected edges, wire edges included.
    pub edges: usize,
    /// Number of faces.
    pub faces: usize,
    /// Edges bordered by a face count other than one or two.
    pub non_manifold_edges: usize,
    /// Vertices with no incident edge.
    pub loose_vertices: usize,
}

/// Limits above which a face is flagged.
///
/// # Example
///
/// ```
/// use face_quality::QualityThresholds;
///
/// let strict = QualityThresholds::strict();
/// assert!(strict.max_aspect_ratio < QualityThresholds::default().max_aspect_ratio);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, serde::Deserialize))]
pub struct QualityThresholds {
    /// Largest acceptable aspect ratio.
    pub max_aspect_ratio: f64,
    /// Largest acceptable skewness.
    pub max_skewness: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            max_aspect_ratio: 5.0,
            max_skewness: 0.85,
        }
    }
}

impl QualityThresholds {
    /// Thresholds for simulation-grade meshes.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            max_aspect_ratio: 3.0,
            max_skewness: 0.5,
        }
    }

    /// Set the aspect ratio limit.
    #[must_use]
    pub const fn max_aspect_ratio(mut self, limit: f64) -> Self {
        self.max_aspect_ratio = limit;
        self
    }

    /// Set the skewness limit.
    #[must_use]
    pub const fn max_skewness(mut self, limit: f64) -> Self {
        self.max_skewness = limit;
        self
    }

    /// Whether a face exceeds either limit.
    #[must_use]
    pub fn exceeded_by(&self, face: &FaceQuality) -> bool {
        face.aspect_ratio > self.max_aspect_ratio || face.skewness > self.max_skewness
    }
}

/// Result of [`analyze_mesh`](crate::analyze_mesh).
///
/// Recomputed from scratch on every call.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct QualityReport {
    /// Metrics per triangulated face, in face order.
    pub faces: Vec<FaceQuality>,
    /// Means over all triangulated faces.
    pub totals: QualityTotals,
    /// Largest and smallest faces; `None` without faces.
    pub extremes: Option<AreaExtremes>,
    /// Topology counts.
    pub topology: TopologyStats,
    /// Selected vertices per unit area of selected faces.
    pub vertex_density: f64,
}

impl QualityReport {
    /// Whether the analyzed mesh had no vertices and no faces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty() && self.topology.vertices == 0
    }

    /// Indices of triangulated faces that exceed `thresholds`.
    #[must_use]
    pub fn flagged_faces(&self, thresholds: &QualityThresholds) -> Vec<usize> {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, f)| thresholds.exceeded_by(f))
            .map(|(i, _)| i)
            .collect()
    }
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Quality Report:")?;
        writeln!(f, "  Aspect ratio (mean): {:.4}", self.totals.aspect_ratio)?;
        writeln!(f, "  Skewness (mean): {:.4}", self.totals.skewness)?;
        writeln!(f, "  Size ratio (mean): {:.4}", self.totals.size_ratio)?;
        writeln!(f, "  Shape factor (mean): {:.4}", self.totals.shape_factor)?;
        writeln!(f)?;

        if let Some(extremes) = &self.extremes {
            writeln!(
                f,
                "  Max element: face {} (area {:.4})",
                extremes.max.face, extremes.max.area
            )?;
            writeln!(
                f,
                "  Min element: face {} (area {:.4})",
                extremes.min.face, extremes.min.area
            )?;
            writeln!(f)?;
        }

        writeln!(f, "  Topology:")?;
        writeln!(f, "    Vertices: {}", self.topology.vertices)?;
        writeln!(f, "    Edges: {}", self.topology.edges)?;
        writeln!(f, "    Faces: {}", self.topology.faces)?;
        writeln!(f, "    Non-manifold edges: {}", self.topology.non_manifold_edges)?;
        writeln!(f, "    Loose vertices: {}", self.topology.loose_vertices)?;
        writeln!(f)?;
        write!(f, "  Vertex density: {:.2}", self.vertex_density)
    }
}
