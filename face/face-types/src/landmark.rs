//! Detected facial landmarks.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single detected facial keypoint.
///
/// The index is assigned by detection order and is stable for a given
/// detector version: landmark `i` of one image corresponds to landmark `i`
/// of every other image. The position is in normalized detector space
/// (`x`, `y` in `[0, 1]`, `z` a relative depth).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Landmark {
    /// Stable detector index.
    pub index: u32,
    /// Position in normalized detector space.
    pub position: Point3<f64>,
}

impl Landmark {
    /// Create a landmark.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, position: Point3<f64>) -> Self {
        Self { index, position }
    }
}

/// Assign detection-order indices to a list of raw positions.
///
/// # Example
///
/// ```
/// use face_types::{landmarks_from_positions, Point3};
///
/// let landmarks = landmarks_from_positions(&[
///     Point3::new(0.5, 0.5, 0.0),
///     Point3::new(0.6, 0.5, -0.01),
/// ]);
/// assert_eq!(landmarks[1].index, 1);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
// Truncation: detector templates hold a few hundred points
pub fn landmarks_from_positions(positions: &[Point3<f64>]) -> Vec<Landmark> {
    positions
        .iter()
        .enumerate()
        .map(|(i, &p)| Landmark::new(i as u32, p))
        .collect()
}
