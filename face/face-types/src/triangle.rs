//! Triangle type for geometric calculations.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle with concrete vertex positions.
///
/// Stores the actual vertex positions rather than indices. All measures are
/// robust to degenerate input: zero-length edges and collinear vertices
/// produce zero areas and zero angles, never `NaN`.
///
/// # Example
///
/// ```
/// use face_types::{Triangle, Point3};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(3.0, 0.0, 0.0),
///     Point3::new(0.0, 4.0, 0.0),
/// );
///
/// assert!((tri.area() - 6.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3<f64>,
    /// Second vertex.
    pub v1: Point3<f64>,
    /// Third vertex.
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle from three points.
    #[inline]
    #[must_use]
    pub const fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Create a triangle from coordinate arrays.
    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn from_arrays(v0: [f64; 3], v1: [f64; 3], v2: [f64; 3]) -> Self {
        Self {
            v0: Point3::new(v0[0], v0[1], v0[2]),
            v1: Point3::new(v1[0], v1[1], v1[2]),
            v2: Point3::new(v2[0], v2[1], v2[2]),
        }
    }

    /// Get vertices as an array.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [Point3<f64>; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Compute the (unnormalized) face normal via cross product.
    ///
    /// The magnitude equals twice the triangle's area.
    #[inline]
    #[must_use]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        e1.cross(&e2)
    }

    /// Compute the unit face normal.
    ///
    /// Returns `None` for degenerate triangles (zero area).
    #[must_use]
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let n = self.normal_unnormalized();
        let len_sq = n.norm_squared();
        if len_sq > f64::EPSILON * f64::EPSILON {
            Some(n / len_sq.sqrt())
        } else {
            None
        }
    }

    /// Compute the lengths of the three edges.
    ///
    /// Returns `[len01, len12, len20]` where `lenXY` is the distance from vX to vY.
    #[inline]
    #[must_use]
    pub fn edge_lengths(&self) -> [f64; 3] {
        [
            (self.v1 - self.v0).norm(),
            (self.v2 - self.v1).norm(),
            (self.v0 - self.v2).norm(),
        ]
    }

    /// Get the length of the shortest edge.
    #[inline]
    #[must_use]
    pub fn min_edge_length(&self) -> f64 {
        let [a, b, c] = self.edge_lengths();
        a.min(b).min(c)
    }

    /// Get the length of the longest edge.
    #[inline]
    #[must_use]
    pub fn max_edge_length(&self) -> f64 {
        let [a, b, c] = self.edge_lengths();
        a.max(b).max(c)
    }

    /// Compute the area from the three edge lengths (Heron's formula).
    ///
    /// The radicand is clamped at zero so that nearly collinear triangles
    /// report `0.0` instead of `NaN`.
    ///
    /// # Example
    ///
    /// ```
    /// use face_types::Triangle;
    ///
    /// let flat = Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
    /// assert_eq!(flat.area(), 0.0);
    /// ```
    #[must_use]
    pub fn area(&self) -> f64 {
        let [a, b, c] = self.edge_lengths();
        let s = (a + b + c) / 2.0;
        let radicand = s * (s - a) * (s - b) * (s - c);
        radicand.max(0.0).sqrt()
    }

    /// Compute the three interior angles in degrees.
    ///
    /// Returns `[angle_at_v0, angle_at_v1, angle_at_v2]`. An angle whose
    /// adjacent edge has zero length is reported as `0.0`.
    ///
    /// # Example
    ///
    /// ```
    /// use face_types::Triangle;
    ///
    /// let right = Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
    /// let [a, b, c] = right.interior_angles();
    /// assert!((a - 90.0).abs() < 1e-10);
    /// assert!((b - 45.0).abs() < 1e-10);
    /// assert!((c - 45.0).abs() < 1e-10);
    /// ```
    #[must_use]
    pub fn interior_angles(&self) -> [f64; 3] {
        let [p0, p1, p2] = self.vertices();
        [
            vector_angle_degrees(&(p2 - p0), &(p1 - p0)),
            vector_angle_degrees(&(p0 - p1), &(p2 - p1)),
            vector_angle_degrees(&(p1 - p2), &(p0 - p2)),
        ]
    }

    /// Compute the circumradius `abc / (4 * area)`.
    ///
    /// Returns `None` for zero-area triangles.
    #[must_use]
    pub fn circumradius(&self) -> Option<f64> {
        let area = self.area();
        if area > 0.0 {
            let [a, b, c] = self.edge_lengths();
            Some(a * b * c / (4.0 * area))
        } else {
            None
        }
    }

    /// Compute the centroid (center of mass).
    #[inline]
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        Point3::new(
            (self.v0.x + self.v1.x + self.v2.x) / 3.0,
            (self.v0.y + self.v1.y + self.v2.y) / 3.0,
            (self.v0.z + self.v1.z + self.v2.z) / 3.0,
        )
    }

    /// Compute the closest point on the triangle to a query point.
    ///
    /// Uses the barycentric region method.
    #[must_use]
    #[allow(clippy::many_single_char_names)]
    pub fn closest_point(&self, p: &Point3<f64>) -> Point3<f64> {
        let (a, b, c) = (self.v0, self.v1, self.v2);
        let ab = b - a;
        let ac = c - a;
        let ap = p - a;

        let d1 = ab.dot(&ap);
        let d2 = ac.dot(&ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return a;
        }

        let bp = p - b;
        let d3 = ab.dot(&bp);
        let d4 = ac.dot(&bp);
        if d3 >= 0.0 && d4 <= d3 {
            return b;
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v = d1 / (d1 - d3);
            return a + ab * v;
        }

        let cp = p - c;
        let d5 = ab.dot(&cp);
        let d6 = ac.dot(&cp);
        if d6 >= 0.0 && d5 <= d6 {
            return c;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = d2 / (d2 - d6);
            return a + ac * w;
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return b + (c - b) * w;
        }

        let denom = va + vb + vc;
        if denom.abs() < f64::MIN_POSITIVE {
            // Degenerate triangle with no interior region
            return a;
        }
        let v = vb / denom;
        let w = vc / denom;
        a + ab * v + ac * w
    }
}

/// Angle between two vectors in degrees, `0.0` if either has zero length.
fn vector_angle_degrees(u: &Vector3<f64>, v: &Vector3<f64>) -> f64 {
    if u.norm_squared() == 0.0 || v.norm_squared() == 0.0 {
        return 0.0;
    }
    u.cross(v).norm().atan2(u.dot(v)).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn equilateral() -> Triangle {
        let h = 3.0_f64.sqrt();
        Triangle::from_arrays([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [1.0, h, 0.0])
    }

    #[test]
    fn heron_matches_cross_product_area() {
        let tri = Triangle::from_arrays([0.3, -1.0, 2.0], [4.0, 0.5, 1.0], [-2.0, 3.0, 0.0]);
        let cross_area = tri.normal_unnormalized().norm() * 0.5;
        assert_relative_eq!(tri.area(), cross_area, epsilon = 1e-9);
    }

    #[test]
    fn equilateral_angles_and_radius() {
        let tri = equilateral();
        for angle in tri.interior_angles() {
            assert_relative_eq!(angle, 60.0, epsilon = 1e-9);
        }
        // R = side / sqrt(3)
        let r = tri.circumradius();
        assert!(r.is_some());
        assert_relative_eq!(r.unwrap_or_default(), 2.0 / 3.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn angles_sum_to_180() {
        let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [5.0, 1.0, 0.0], [1.0, 2.0, 3.0]);
        let sum: f64 = tri.interior_angles().iter().sum();
        assert_relative_eq!(sum, 180.0, epsilon = 1e-9);
    }

    #[test]
    fn collinear_triangle_is_degenerate() {
        let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
        assert_eq!(tri.area(), 0.0);
        assert!(tri.circumradius().is_none());
        assert!(tri.normal().is_none());
        let [a, b, c] = tri.interior_angles();
        assert_relative_eq!(a, 0.0, epsilon = 1e-9);
        assert_relative_eq!(b, 180.0, epsilon = 1e-9);
        assert_relative_eq!(c, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_length_edge_angles_are_zero() {
        let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let angles = tri.interior_angles();
        assert_eq!(angles[0], 0.0);
        assert_eq!(angles[1], 0.0);
        assert!(angles.iter().all(|a| a.is_finite()));
    }

    #[test]
    fn edge_lengths_3_4_5() {
        let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [3.0, 0.0, 0.0], [0.0, 4.0, 0.0]);
        let lengths = tri.edge_lengths();
        assert_relative_eq!(lengths[0], 3.0);
        assert_relative_eq!(lengths[1], 5.0);
        assert_relative_eq!(lengths[2], 4.0);
        assert_relative_eq!(tri.min_edge_length(), 3.0);
        assert_relative_eq!(tri.max_edge_length(), 5.0);
    }

    #[test]
    fn closest_point_regions() {
        let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);

        // Interior projection
        let p = tri.closest_point(&Point3::new(0.25, 0.25, 5.0));
        assert_relative_eq!(p, Point3::new(0.25, 0.25, 0.0), epsilon = 1e-12);

        // Vertex region
        let p = tri.closest_point(&Point3::new(-1.0, -1.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.0, 0.0, 0.0), epsilon = 1e-12);

        // Edge region (hypotenuse)
        let p = tri.closest_point(&Point3::new(1.0, 1.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.5, 0.5, 0.0), epsilon = 1e-12);
    }
}
