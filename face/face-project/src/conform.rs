//! Deformation hand-off after projection.
//!
//! Ray casting leaves gaps (vertices that hit nothing are only averaged in
//! place), so the projected mesh is finally conformed to the target with a
//! shrinkwrap-style pass: attach the mesh to a named target, then bake the
//! deformed result.

use face_types::{IndexedMesh, Isometry3, ObjectId, ObjectKind, Point3, Triangle};
use tracing::{debug, info};

use crate::error::{ProjectionError, ProjectionResult};
use crate::params::ShrinkwrapParams;
use crate::projector::Projection;
use crate::scene::Scene;

/// A deformation that can be attached to a mesh and baked.
pub trait ConformService {
    /// Attach `mesh` (local space, placed by `placement`) to the target
    /// object named `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::TargetNotFound`] if `target` does not name
    /// a mesh object, and [`ProjectionError::EmptyMesh`] if the target mesh
    /// has no faces.
    fn attach(
        &mut self,
        mesh: &IndexedMesh,
        placement: &Isometry3<f64>,
        target: &str,
    ) -> ProjectionResult<()>;

    /// Apply the deformation and return the result in local space.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::NothingAttached`] if nothing was attached.
    fn bake(&mut self) -> ProjectionResult<IndexedMesh>;
}

#[derive(Debug)]
struct Attached {
    mesh: IndexedMesh,
    placement: Isometry3<f64>,
    target: ObjectId,
    target_name: String,
}

/// Shrinkwrap that moves every vertex to the nearest point on the target
/// surface.
///
/// # Example
///
/// ```
/// use face_project::{ConformService, NearestSurfaceShrinkwrap, Scene, ShrinkwrapParams};
/// use face_types::{IndexedMesh, Isometry3, ObjectData, ObjectId, SceneObject};
///
/// let ground = IndexedMesh::from_raw(
///     &[-5.0, -5.0, 0.0, 5.0, -5.0, 0.0, 0.0, 5.0, 0.0],
///     &[0, 1, 2],
/// );
/// let scene = Scene::from_objects([
///     SceneObject::new(ObjectId(1), "Head", ObjectData::Mesh(ground.into())),
/// ]);
/// let patch = IndexedMesh::from_raw(&[0.0, 0.0, 1.5], &[]);
///
/// let mut wrap = NearestSurfaceShrinkwrap::new(&scene, ShrinkwrapParams::default());
/// wrap.attach(&patch, &Isometry3::identity(), "Head").unwrap();
/// let baked = wrap.bake().unwrap();
/// assert!(baked.vertices[0].position.z.abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct NearestSurfaceShrinkwrap<'a> {
    scene: &'a Scene,
    params: ShrinkwrapParams,
    attached: Option<Attached>,
}

impl<'a> NearestSurfaceShrinkwrap<'a> {
    /// Create a shrinkwrap that resolves targets in `scene`.
    #[must_use]
    pub const fn new(scene: &'a Scene, params: ShrinkwrapParams) -> Self {
        Self {
            scene,
            params,
            attached: None,
        }
    }

    /// Whether a mesh is currently attached.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached.is_some()
    }
}

impl ConformService for NearestSurfaceShrinkwrap<'_> {
    fn attach(
        &mut self,
        mesh: &IndexedMesh,
        placement: &Isometry3<f64>,
        target: &str,
    ) -> ProjectionResult<()> {
        let is_mesh = self
            .scene
            .find_by_name(target)
            .is_some_and(|o| o.kind() == ObjectKind::Mesh);
        if !is_mesh {
            return Err(ProjectionError::target_not_found(target));
        }
        let (target_id, _) = self
            .scene
            .surface_by_name(target)
            .ok_or(ProjectionError::EmptyMesh)?;

        debug!(
            target_name = target,
            id = %target_id,
            vertices = mesh.vertices.len(),
            "Shrinkwrap attached"
        );
        self.attached = Some(Attached {
            mesh: mesh.clone(),
            placement: *placement,
            target: target_id,
            target_name: target.to_string(),
        });
        Ok(())
    }

    fn bake(&mut self) -> ProjectionResult<IndexedMesh> {
        let attached = self.attached.take().ok_or(ProjectionError::NothingAttached)?;
        let (_, surface) = self
            .scene
            .surface_by_name(&attached.target_name)
            .filter(|(id, _)| *id == attached.target)
            .ok_or_else(|| ProjectionError::target_not_found(&attached.target_name))?;

        let inverse = attached.placement.inverse();
        let mut baked = attached.mesh;
        for vertex in &mut baked.vertices {
            let world = attached.placement * vertex.position;
            if let Some(snapped) = nearest_on_surface(&surface.triangles, &world, self.params.offset)
            {
                vertex.position = inverse * snapped;
            }
        }

        info!(
            target_name = %attached.target_name,
            vertices = baked.vertices.len(),
            offset = self.params.offset,
            "Shrinkwrap baked"
        );
        Ok(baked)
    }
}

/// Closest point over all triangles, pushed `offset` along the face normal.
fn nearest_on_surface(triangles: &[Triangle], point: &Point3<f64>, offset: f64) -> Option<Point3<f64>> {
    let mut best: Option<(f64, Point3<f64>, &Triangle)> = None;

    for tri in triangles {
        let p = tri.closest_point(point);
        let dist_sq = (p - point).norm_squared();
        if best.is_none_or(|(d, _, _)| dist_sq < d) {
            best = Some((dist_sq, p, tri));
        }
    }

    let (_, closest, tri) = best?;
    if offset.abs() < f64::EPSILON {
        return Some(closest);
    }
    let Some(normal) = tri.normal() else {
        return Some(closest);
    };
    // Offset towards the side the vertex came from
    let side = if (point - closest).dot(&normal) < 0.0 { -1.0 } else { 1.0 };
    Some(closest + normal * (offset * side))
}

/// Conform a projection to a target: attach, then bake.
///
/// # Errors
///
/// Propagates the service's attach and bake errors.
pub fn conform_to_target<S: ConformService + ?Sized>(
    projection: &Projection,
    service: &mut S,
    target: &str,
) -> ProjectionResult<IndexedMesh> {
    service.attach(&projection.mesh, &projection.placement, target)?;
    service.bake()
}
