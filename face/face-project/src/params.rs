//! Parameters for surface projection and shrinkwrap conforming.

use crate::error::{ProjectionError, ProjectionResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters for [`project_onto_surface`](crate::project_onto_surface).
///
/// # Example
///
/// ```
/// use face_project::ProjectionParams;
///
/// let params = ProjectionParams::default();
/// assert!((params.epsilon - 1e-4).abs() < 1e-12);
/// assert_eq!(params.max_self_hits, 64);
///
/// let strict = ProjectionParams::default().max_self_hits(4).epsilon(1e-3);
/// assert_eq!(strict.max_self_hits, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProjectionParams {
    /// Distance a ray origin is pushed past a self hit before re-casting.
    pub epsilon: f64,

    /// Maximum number of re-casts after hitting the projected mesh itself.
    /// A vertex that still hits itself after this many re-casts is
    /// unresolved.
    pub max_self_hits: usize,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            epsilon: 1e-4,
            max_self_hits: 64,
        }
    }
}

impl ProjectionParams {
    /// Parameters for dense, thin target surfaces (small step, more retries).
    #[must_use]
    pub const fn fine() -> Self {
        Self {
            epsilon: 1e-5,
            max_self_hits: 256,
        }
    }

    /// Set the re-cast offset.
    #[must_use]
    pub const fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the self-hit retry bound.
    #[must_use]
    pub const fn max_self_hits(mut self, count: usize) -> Self {
        self.max_self_hits = count;
        self
    }

    /// Check that the parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::InvalidParams`] if `epsilon` is not a
    /// positive finite number.
    pub fn validate(&self) -> ProjectionResult<()> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(ProjectionError::invalid_params(format!(
                "epsilon must be positive and finite, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

/// Parameters for the [`Scene`](crate::Scene) ray caster.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SceneParams {
    /// Hits closer than this along the ray are ignored.
    pub epsilon: f64,

    /// Maximum ray distance to trace. Set to 0 for unlimited.
    pub max_distance: f64,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            epsilon: 1e-9,
            max_distance: 1000.0,
        }
    }
}

impl SceneParams {
    /// Set the maximum ray distance.
    #[must_use]
    pub const fn max_distance(mut self, distance: f64) -> Self {
        self.max_distance = distance;
        self
    }

    pub(crate) fn effective_max_distance(&self) -> f64 {
        if self.max_distance > 0.0 {
            self.max_distance
        } else {
            f64::MAX
        }
    }
}

/// Parameters for [`NearestSurfaceShrinkwrap`](crate::NearestSurfaceShrinkwrap).
///
/// # Example
///
/// ```
/// use face_project::ShrinkwrapParams;
///
/// let params = ShrinkwrapParams::default().offset(0.002);
/// assert!((params.offset - 0.002).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShrinkwrapParams {
    /// Distance to keep from the target surface, along the target face
    /// normal. Zero snaps vertices onto the surface.
    pub offset: f64,
}

impl ShrinkwrapParams {
    /// Set the surface offset.
    #[must_use]
    pub const fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }
}
