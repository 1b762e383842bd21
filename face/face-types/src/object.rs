//! Scene objects and capture viewpoints.

use std::fmt;

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};

use crate::PolygonMesh;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identity of an object in a scene.
///
/// Identity equality is what the projector uses to recognize hits on the
/// mesh being projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of data an object carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ObjectKind {
    /// Polygon or triangle mesh.
    Mesh,
    /// Capture camera.
    Camera,
    /// Transform-only placeholder.
    Empty,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mesh => "mesh",
            Self::Camera => "camera",
            Self::Empty => "empty",
        };
        f.write_str(name)
    }
}

/// Object payload.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ObjectData {
    /// Mesh in the object's local space.
    Mesh(PolygonMesh),
    /// Capture camera.
    Camera(Viewpoint),
    /// No data.
    Empty,
}

impl ObjectData {
    /// The kind of this payload.
    #[must_use]
    pub const fn kind(&self) -> ObjectKind {
        match self {
            Self::Mesh(_) => ObjectKind::Mesh,
            Self::Camera(_) => ObjectKind::Camera,
            Self::Empty => ObjectKind::Empty,
        }
    }
}

/// A named object placed in a scene.
///
/// # Example
///
/// ```
/// use face_types::{ObjectData, ObjectId, ObjectKind, PolygonMesh, SceneObject};
///
/// let obj = SceneObject::new(ObjectId(7), "Head", ObjectData::Mesh(PolygonMesh::new()));
/// assert_eq!(obj.kind(), ObjectKind::Mesh);
/// assert!(obj.mesh().is_some());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SceneObject {
    /// Object identity.
    pub id: ObjectId,
    /// Human-readable name.
    pub name: String,
    /// World placement of the object's local space.
    pub transform: Isometry3<f64>,
    /// Object payload.
    pub data: ObjectData,
}

impl SceneObject {
    /// Create an object at the world origin.
    #[must_use]
    pub fn new(id: ObjectId, name: impl Into<String>, data: ObjectData) -> Self {
        Self {
            id,
            name: name.into(),
            transform: Isometry3::identity(),
            data,
        }
    }

    /// Set the world placement.
    #[must_use]
    pub fn with_transform(mut self, transform: Isometry3<f64>) -> Self {
        self.transform = transform;
        self
    }

    /// The kind of data this object carries.
    #[must_use]
    pub const fn kind(&self) -> ObjectKind {
        self.data.kind()
    }

    /// The mesh payload, if this is a mesh object.
    #[must_use]
    pub const fn mesh(&self) -> Option<&PolygonMesh> {
        match &self.data {
            ObjectData::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }
}

/// A capture camera.
///
/// Cameras look down their local `-Z` axis.
///
/// # Example
///
/// ```
/// use face_types::{Viewpoint, Point3, Vector3};
///
/// let cam = Viewpoint::looking_at(Point3::new(0.0, -5.0, 0.0), Point3::origin(), Vector3::z());
/// let f = cam.forward();
/// assert!((f.y - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Viewpoint {
    /// Camera position in world space.
    pub location: Point3<f64>,
    /// Camera orientation in world space.
    pub rotation: UnitQuaternion<f64>,
}

impl Default for Viewpoint {
    fn default() -> Self {
        Self {
            location: Point3::origin(),
            rotation: UnitQuaternion::identity(),
        }
    }
}

impl Viewpoint {
    /// Create a viewpoint from a location and orientation.
    #[must_use]
    pub const fn new(location: Point3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self { location, rotation }
    }

    /// Create a viewpoint at `location` looking towards `target`.
    ///
    /// Falls back to the identity orientation when `target` coincides with
    /// `location`.
    #[must_use]
    pub fn looking_at(location: Point3<f64>, target: Point3<f64>, up: Vector3<f64>) -> Self {
        let back = location - target;
        let rotation = if back.norm_squared() > 0.0 {
            UnitQuaternion::face_towards(&back, &up)
        } else {
            UnitQuaternion::identity()
        };
        Self { location, rotation }
    }

    /// Unit view direction (the camera's local `-Z`).
    #[must_use]
    pub fn forward(&self) -> Vector3<f64> {
        self.rotation * -Vector3::z()
    }

    /// Placement of an object moved to this viewpoint.
    ///
    /// Only the location is taken over; the object's orientation stays
    /// axis-aligned.
    #[must_use]
    pub fn placement(&self) -> Isometry3<f64> {
        Isometry3::from_parts(
            Translation3::from(self.location.coords),
            UnitQuaternion::identity(),
        )
    }
}
