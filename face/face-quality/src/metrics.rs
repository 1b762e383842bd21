//! Per-triangle quality metrics.
//!
//! All functions are total: degenerate triangles produce `+inf` (ratios with
//! a zero denominator) or `0.0` (areas, angles next to a zero-length edge).

use face_types::Triangle;

/// Angle of an ideal (equilateral) triangle, in degrees.
const IDEAL_ANGLE: f64 = 60.0;

/// Longest edge over shortest edge.
///
/// `1.0` for an equilateral triangle, `+inf` if any edge has zero length.
///
/// # Example
///
/// ```
/// use face_quality::aspect_ratio;
/// use face_types::Triangle;
///
/// let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
/// assert!((aspect_ratio(&tri) - 5.0_f64.sqrt()).abs() < 1e-12);
/// ```
#[must_use]
pub fn aspect_ratio(tri: &Triangle) -> f64 {
    let shortest = tri.min_edge_length();
    if shortest > 0.0 {
        tri.max_edge_length() / shortest
    } else {
        f64::INFINITY
    }
}

/// Equiangle skewness from the interior angles in degrees.
///
/// `max((max - 60) / 120, (60 - min) / 60)`: `0.0` for an equilateral
/// triangle, `1.0` for a fully degenerate one.
#[must_use]
pub fn skewness_from_angles(angles: &[f64]) -> f64 {
    let max = angles.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = angles.iter().copied().fold(f64::INFINITY, f64::min);
    ((max - IDEAL_ANGLE) / (180.0 - IDEAL_ANGLE)).max((IDEAL_ANGLE - min) / IDEAL_ANGLE)
}

/// Equiangle skewness of a triangle.
#[must_use]
pub fn skewness(tri: &Triangle) -> f64 {
    skewness_from_angles(&tri.interior_angles())
}

/// Area relative to an equilateral triangle inscribed in the same
/// circumcircle.
///
/// The ideal area is `3√3/4 · R²`, so an equilateral triangle scores `1.0`
/// and slivers approach zero. Zero-area triangles score `+inf`.
///
/// # Example
///
/// ```
/// use face_quality::shape_factor;
/// use face_types::Triangle;
///
/// let h = 3.0_f64.sqrt() / 2.0;
/// let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, h, 0.0]);
/// assert!((shape_factor(&tri) - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn shape_factor(tri: &Triangle) -> f64 {
    let area = tri.area();
    let Some(radius) = tri.circumradius() else {
        return f64::INFINITY;
    };
    let ideal = 3.0 * 3.0_f64.sqrt() / 4.0 * radius * radius;
    if ideal > 0.0 && area > 0.0 {
        area / ideal
    } else {
        f64::INFINITY
    }
}

/// Largest over smallest of `own` and `neighbors`.
///
/// `+inf` if the smallest area is zero.
#[must_use]
pub fn size_ratio(own: f64, neighbors: impl IntoIterator<Item = f64>) -> f64 {
    let (min, max) = neighbors
        .into_iter()
        .fold((own, own), |(lo, hi), a| (lo.min(a), hi.max(a)));
    if min > 0.0 { max / min } else { f64::INFINITY }
}
