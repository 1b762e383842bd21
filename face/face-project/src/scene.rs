//! BVH-accelerated ray casting over scene objects.

use face_types::{Isometry3, ObjectId, ObjectKind, Point3, SceneObject, Triangle, Vector3};
use tracing::debug;

use crate::params::SceneParams;
use crate::raycast::{RayCaster, RayHit};

/// A set of objects that rays can be cast against.
///
/// Mesh objects are triangulated and moved to world space on insertion,
/// then indexed by a bounding volume hierarchy. Cameras and empties are
/// kept for lookup but have no surface.
///
/// # Example
///
/// ```
/// use face_project::{RayCaster, Scene};
/// use face_types::{IndexedMesh, ObjectData, ObjectId, Point3, SceneObject, Vector3};
///
/// let quad = IndexedMesh::from_raw(
///     &[-1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 1.0, 1.0, 0.0, -1.0, 1.0, 0.0],
///     &[0, 1, 2, 0, 2, 3],
/// );
/// let scene = Scene::from_objects([SceneObject::new(
///     ObjectId(1),
///     "Ground",
///     ObjectData::Mesh(quad.into()),
/// )]);
///
/// let hit = scene
///     .cast_ray(&Point3::new(0.2, 0.3, 5.0), &-Vector3::z())
///     .unwrap();
/// assert_eq!(hit.target, ObjectId(1));
/// assert!((hit.point.z).abs() < 1e-12);
/// ```
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
    surfaces: Vec<Option<Surface>>,
    params: SceneParams,
}

/// World-space triangles of one mesh object and their BVH.
#[derive(Debug)]
pub(crate) struct Surface {
    pub(crate) triangles: Vec<Triangle>,
    bvh: BvhNode,
}

impl Surface {
    fn build(object: &SceneObject, epsilon: f64) -> Option<Self> {
        let mesh = object.mesh()?.triangulate().transformed(&object.transform);
        let triangles: Vec<Triangle> = mesh.triangles().collect();
        let mut indices: Vec<usize> = (0..triangles.len()).collect();
        let bvh = BvhNode::build(&triangles, &mut indices, epsilon)?;
        Some(Self { triangles, bvh })
    }
}

impl Scene {
    /// Create an empty scene with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scene with the given parameters.
    #[must_use]
    pub fn with_params(params: SceneParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Create a scene holding the given objects.
    #[must_use]
    pub fn from_objects<I: IntoIterator<Item = SceneObject>>(objects: I) -> Self {
        let mut scene = Self::new();
        for object in objects {
            scene.insert(object);
        }
        scene
    }

    /// Add an object, replacing any object with the same id.
    pub fn insert(&mut self, object: SceneObject) {
        let surface = Surface::build(&object, self.params.epsilon);
        debug!(
            id = %object.id,
            name = %object.name,
            kind = %object.kind(),
            triangles = surface.as_ref().map_or(0, |s| s.triangles.len()),
            "Scene object inserted"
        );

        if let Some(slot) = self.position(object.id) {
            self.objects[slot] = object;
            self.surfaces[slot] = surface;
        } else {
            self.objects.push(object);
            self.surfaces.push(surface);
        }
    }

    /// Move an object, rebuilding its surface.
    ///
    /// Returns `false` if no object has this id.
    pub fn set_transform(&mut self, id: ObjectId, transform: Isometry3<f64>) -> bool {
        let Some(slot) = self.position(id) else {
            return false;
        };
        self.objects[slot].transform = transform;
        self.surfaces[slot] = Surface::build(&self.objects[slot], self.params.epsilon);
        true
    }

    /// Number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate over the objects in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    /// Look up an object by id.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.position(id).map(|slot| &self.objects[slot])
    }

    /// Look up the first object with the given name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// World-space surface of a mesh object by name.
    pub(crate) fn surface_by_name(&self, name: &str) -> Option<(ObjectId, &Surface)> {
        let slot = self.objects.iter().position(|o| o.name == name)?;
        let surface = self.surfaces[slot].as_ref()?;
        Some((self.objects[slot].id, surface))
    }

    fn position(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }
}

impl RayCaster for Scene {
    fn cast_ray(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> Option<RayHit> {
        let dir_inv = inverse_direction(direction, self.params.epsilon);
        let mut max_dist = self.params.effective_max_distance();
        let mut best: Option<(f64, usize, usize)> = None;

        for (slot, surface) in self.surfaces.iter().enumerate() {
            let Some(surface) = surface else {
                continue;
            };
            if let Some((t, face_idx)) = trace_ray(
                &surface.bvh,
                origin,
                direction,
                &dir_inv,
                &surface.triangles,
                max_dist,
                self.params.epsilon,
            ) {
                max_dist = t;
                best = Some((t, slot, face_idx));
            }
        }

        let (t, slot, face_idx) = best?;
        let object = &self.objects[slot];
        let triangle = self.surfaces[slot].as_ref()?.triangles.get(face_idx)?;

        Some(RayHit {
            point: origin + direction * t,
            normal: triangle.normal().unwrap_or_else(Vector3::zeros),
            face_index: face_idx,
            target: object.id,
            kind: ObjectKind::Mesh,
        })
    }
}

// ============================================================================
// Internal: BVH and ray tracing
// ============================================================================

/// Axis-aligned bounding box for spatial acceleration.
#[derive(Debug, Clone, Copy)]
struct Aabb {
    min: Point3<f64>,
    max: Point3<f64>,
}

impl Aabb {
    fn from_triangle(tri: &Triangle) -> Self {
        let min = Point3::new(
            tri.v0.x.min(tri.v1.x).min(tri.v2.x),
            tri.v0.y.min(tri.v1.y).min(tri.v2.y),
            tri.v0.z.min(tri.v1.z).min(tri.v2.z),
        );
        let max = Point3::new(
            tri.v0.x.max(tri.v1.x).max(tri.v2.x),
            tri.v0.y.max(tri.v1.y).max(tri.v2.y),
            tri.v0.z.max(tri.v1.z).max(tri.v2.z),
        );
        Self { min, max }
    }

    fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Expand AABB by epsilon for numerical robustness.
    fn expand(&self, epsilon: f64) -> Self {
        let pad = Vector3::repeat(epsilon);
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// Slab test. Returns the entry and exit distances along the ray.
    fn ray_intersect(&self, origin: &Point3<f64>, dir_inv: &Vector3<f64>) -> Option<(f64, f64)> {
        let t1 = (self.min.x - origin.x) * dir_inv.x;
        let t2 = (self.max.x - origin.x) * dir_inv.x;
        let t3 = (self.min.y - origin.y) * dir_inv.y;
        let t4 = (self.max.y - origin.y) * dir_inv.y;
        let t5 = (self.min.z - origin.z) * dir_inv.z;
        let t6 = (self.max.z - origin.z) * dir_inv.z;

        let t_min = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
        let t_max = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

        if t_max >= t_min && t_max >= 0.0 {
            Some((t_min.max(0.0), t_max))
        } else {
            None
        }
    }
}

/// Component-wise reciprocal for the slab test. Near-zero components map to
/// `f64::MAX` so a ray starting on a slab plane never multiplies `0 * inf`.
fn inverse_direction(direction: &Vector3<f64>, epsilon: f64) -> Vector3<f64> {
    direction.map(|c| if c.abs() > epsilon { 1.0 / c } else { f64::MAX })
}

#[derive(Debug)]
enum BvhNode {
    Leaf {
        aabb: Aabb,
        face_idx: usize,
    },
    Internal {
        aabb: Aabb,
        left: Box<BvhNode>,
        right: Box<BvhNode>,
    },
}

impl BvhNode {
    /// Median-split BVH over the given triangle indices.
    fn build(triangles: &[Triangle], indices: &mut [usize], epsilon: f64) -> Option<Self> {
        let (&first, rest) = indices.split_first()?;

        if rest.is_empty() {
            return Some(Self::Leaf {
                aabb: Aabb::from_triangle(&triangles[first]).expand(epsilon),
                face_idx: first,
            });
        }

        let combined = rest
            .iter()
            .fold(Aabb::from_triangle(&triangles[first]), |acc, &idx| {
                acc.union(&Aabb::from_triangle(&triangles[idx]))
            })
            .expand(epsilon);

        // Split along the longest extent
        let extent = combined.max - combined.min;
        let axis = extent.imax();

        indices.sort_by(|&a, &b| {
            let va = triangles[a].centroid()[axis];
            let vb = triangles[b].centroid()[axis];
            va.total_cmp(&vb)
        });

        let mid = indices.len() / 2;
        let (left_indices, right_indices) = indices.split_at_mut(mid);

        let left = Self::build(triangles, left_indices, epsilon);
        let right = Self::build(triangles, right_indices, epsilon);

        match (left, right) {
            (Some(l), Some(r)) => Some(Self::Internal {
                aabb: combined,
                left: Box::new(l),
                right: Box::new(r),
            }),
            (Some(node), None) | (None, Some(node)) => Some(node),
            (None, None) => None,
        }
    }

    const fn aabb(&self) -> &Aabb {
        match self {
            Self::Leaf { aabb, .. } | Self::Internal { aabb, .. } => aabb,
        }
    }
}

/// Möller–Trumbore ray-triangle intersection.
#[allow(clippy::many_single_char_names)]
fn ray_triangle_intersect(
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
    tri: &Triangle,
    epsilon: f64,
) -> Option<f64> {
    let edge1 = tri.v1 - tri.v0;
    let edge2 = tri.v2 - tri.v0;

    let h = direction.cross(&edge2);
    let a = edge1.dot(&h);

    // Ray is parallel to triangle
    if a.abs() < epsilon {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - tri.v0;
    let u = f * s.dot(&h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * direction.dot(&q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);

    if t > epsilon { Some(t) } else { None }
}

/// Closest hit in a BVH subtree, no farther than `max_dist`.
fn trace_ray(
    node: &BvhNode,
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
    dir_inv: &Vector3<f64>,
    triangles: &[Triangle],
    max_dist: f64,
    epsilon: f64,
) -> Option<(f64, usize)> {
    let (t_near, _) = node.aabb().ray_intersect(origin, dir_inv)?;
    if t_near > max_dist {
        return None;
    }

    match node {
        BvhNode::Leaf { face_idx, .. } => {
            ray_triangle_intersect(origin, direction, &triangles[*face_idx], epsilon)
                .filter(|&t| t <= max_dist)
                .map(|t| (t, *face_idx))
        }
        BvhNode::Internal { left, right, .. } => {
            let hit_left = trace_ray(left, origin, direction, dir_inv, triangles, max_dist, epsilon);
            let max_dist_right = hit_left.map_or(max_dist, |(t, _)| t);
            let hit_right = trace_ray(
                right,
                origin,
                direction,
                dir_inv,
                triangles,
                max_dist_right,
                epsilon,
            );

            match (hit_left, hit_right) {
                (Some(l), Some(r)) => Some(if l.0 <= r.0 { l } else { r }),
                (Some(h), None) | (None, Some(h)) => Some(h),
                (None, None) => None,
            }
        }
    }
}
