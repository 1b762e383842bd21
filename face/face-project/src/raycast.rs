//! Scene ray-cast contract.

use face_types::{ObjectId, ObjectKind, Point3, Vector3};

/// The nearest surface hit along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space hit location.
    pub point: Point3<f64>,
    /// Unit normal of the hit face (zero for a degenerate face).
    pub normal: Vector3<f64>,
    /// Index of the hit face within the target's triangulated mesh.
    pub face_index: usize,
    /// Object that was hit.
    pub target: ObjectId,
    /// Kind of the object that was hit.
    pub kind: ObjectKind,
}

/// A scene that can answer "what does this ray hit first?".
///
/// The projector only ever asks for the nearest hit; implementations decide
/// how far rays travel and how long a query may take.
pub trait RayCaster {
    /// Cast a ray from `origin` along the unit vector `direction`.
    ///
    /// Returns the nearest hit in front of the origin, or `None` on a miss.
    fn cast_ray(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> Option<RayHit>;
}

impl<T: RayCaster + ?Sized> RayCaster for &T {
    fn cast_ray(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> Option<RayHit> {
        (**self).cast_ray(origin, direction)
    }
}
