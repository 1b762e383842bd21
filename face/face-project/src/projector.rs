//! Per-vertex ray-cast projection onto a target surface.

use face_types::{
    IndexedMesh, Isometry3, MeshAdjacency, ObjectId, ObjectKind, Point3, Vector3, Viewpoint,
};
use tracing::{debug, info, warn};

use crate::error::{ProjectionError, ProjectionResult};
use crate::params::ProjectionParams;
use crate::raycast::{RayCaster, RayHit};

/// Why a vertex could not be projected by ray casting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    /// The ray left the scene without hitting anything.
    NoHit,
    /// The first foreign hit was an object that is not a mesh.
    NotAMesh(ObjectKind),
    /// The ray kept hitting the projected mesh itself.
    SelfHitsExhausted,
}

/// What happened to one vertex during projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexOutcome {
    /// Snapped to a hit on another mesh.
    Projected {
        /// Object the vertex landed on.
        target: ObjectId,
    },
    /// No usable hit; position filled from neighbors (or left unchanged
    /// for a vertex without edges).
    Unresolved(MissReason),
}

impl VertexOutcome {
    /// Whether the vertex was snapped by a ray hit.
    #[must_use]
    pub const fn is_projected(&self) -> bool {
        matches!(self, Self::Projected { .. })
    }
}

/// Result of [`project_onto_surface`].
#[derive(Debug, Clone)]
pub struct Projection {
    /// Projected mesh, in the object's local space.
    pub mesh: IndexedMesh,
    /// Placement the projection was computed for.
    pub placement: Isometry3<f64>,
    /// Per-vertex outcome, parallel to `mesh.vertices`.
    pub outcomes: Vec<VertexOutcome>,
    /// Vertices snapped by a ray hit.
    pub projected_count: usize,
    /// Vertices filled from their neighbors or left in place.
    pub unresolved_count: usize,
    /// Unresolved vertices whose self-hit retries ran out.
    pub exhausted_count: usize,
}

impl Projection {
    /// Indices of unresolved vertices.
    #[must_use]
    pub fn unresolved_vertices(&self) -> Vec<usize> {
        self.outcomes
            .iter()
            .enumerate()
            .filter(|(_, o)| !o.is_projected())
            .map(|(i, _)| i)
            .collect()
    }

    /// Fraction of vertices snapped by a ray hit (`0.0` for an empty mesh).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_ratio(&self) -> f64 {
        if self.outcomes.is_empty() {
            0.0
        } else {
            self.projected_count as f64 / self.outcomes.len() as f64
        }
    }

    /// The projected mesh in world space.
    #[must_use]
    pub fn world_mesh(&self) -> IndexedMesh {
        self.mesh.transformed(&self.placement)
    }
}

/// Project every vertex of a mesh onto the surfaces in front of it.
///
/// Each vertex is placed in the world with `placement` and a ray is cast
/// from it along `cast_direction`:
///
/// 1. A hit on the projected mesh itself (`self_id`) is stepped over by
///    re-casting from just past the hit point, at most
///    `params.max_self_hits` times.
/// 2. A hit on another mesh moves the vertex there (back in local space).
/// 3. Anything else leaves the vertex unresolved.
///
/// Unresolved vertices then move to the mean of their 1-ring neighbors as
/// they stood after the ray-cast pass. A vertex without edges keeps its
/// original position.
///
/// # Errors
///
/// - [`ProjectionError::EmptyMesh`] if the mesh has no vertices
/// - [`ProjectionError::InvalidDirection`] if the direction is zero or not finite
/// - [`ProjectionError::InvalidParams`] if `params` do not validate
///
/// # Example
///
/// ```
/// use face_project::{project_onto_surface, ProjectionParams, Scene};
/// use face_types::{IndexedMesh, Isometry3, ObjectData, ObjectId, SceneObject, Vector3};
///
/// let ground = IndexedMesh::from_raw(
///     &[-5.0, -5.0, 0.0, 5.0, -5.0, 0.0, 5.0, 5.0, 0.0, -5.0, 5.0, 0.0],
///     &[0, 1, 2, 0, 2, 3],
/// );
/// let scene = Scene::from_objects([
///     SceneObject::new(ObjectId(1), "Ground", ObjectData::Mesh(ground.into())),
/// ]);
///
/// let patch = IndexedMesh::from_raw(&[0.1, 0.1, 0.0, 1.0, 0.2, 0.0, 0.3, 1.0, 0.0], &[0, 1, 2]);
/// let result = project_onto_surface(
///     &patch,
///     &Isometry3::translation(0.0, 0.0, 2.0),
///     &-Vector3::z(),
///     &scene,
///     ObjectId(2),
///     &ProjectionParams::default(),
/// )
/// .unwrap();
///
/// assert_eq!(result.projected_count, 3);
/// assert!((result.mesh.vertices[0].position.z + 2.0).abs() < 1e-9);
/// ```
pub fn project_onto_surface<C: RayCaster + ?Sized>(
    mesh: &IndexedMesh,
    placement: &Isometry3<f64>,
    cast_direction: &Vector3<f64>,
    scene: &C,
    self_id: ObjectId,
    params: &ProjectionParams,
) -> ProjectionResult<Projection> {
    let adjacency = MeshAdjacency::build(&mesh.faces);
    project_with_adjacency(mesh, &adjacency, placement, cast_direction, scene, self_id, params)
}

/// [`project_onto_surface`] with caller-supplied connectivity.
///
/// Unresolved vertices average their neighbors in `adjacency` instead of
/// the mesh's triangle edges. Use this when the source mesh had wire edges
/// that triangulation dropped:
///
/// ```
/// use face_project::{project_with_adjacency, ProjectionParams, Scene};
/// use face_types::{Isometry3, MeshAdjacency, ObjectId, PolygonMesh, Vector3, Vertex};
///
/// let mut face = PolygonMesh::new();
/// face.vertices = vec![Vertex::from_coords(0.0, 0.0, 0.0), Vertex::from_coords(2.0, 0.0, 0.0)];
/// face.edges = vec![[0, 1]];
///
/// let mesh = face.triangulate();
/// let adjacency = MeshAdjacency::build(&mesh.faces).with_wire_edges(&face.edges);
/// let result = project_with_adjacency(
///     &mesh,
///     &adjacency,
///     &Isometry3::identity(),
///     &-Vector3::z(),
///     &Scene::new(),
///     ObjectId(1),
///     &ProjectionParams::default(),
/// )
/// .unwrap();
///
/// // Nothing to hit: each vertex takes its wire neighbor's position
/// assert!((result.mesh.vertices[0].position.x - 2.0).abs() < 1e-12);
/// ```
///
/// # Errors
///
/// Same as [`project_onto_surface`].
pub fn project_with_adjacency<C: RayCaster + ?Sized>(
    mesh: &IndexedMesh,
    adjacency: &MeshAdjacency,
    placement: &Isometry3<f64>,
    cast_direction: &Vector3<f64>,
    scene: &C,
    self_id: ObjectId,
    params: &ProjectionParams,
) -> ProjectionResult<Projection> {
    if mesh.vertices.is_empty() {
        return Err(ProjectionError::EmptyMesh);
    }
    params.validate()?;
    let direction = unit_direction(cast_direction)?;

    info!(
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        self_id = %self_id,
        max_self_hits = params.max_self_hits,
        "Starting surface projection"
    );

    let inverse = placement.inverse();
    let mut projected = mesh.clone();
    let mut outcomes = Vec::with_capacity(mesh.vertices.len());

    // Ray-cast pass
    for (vertex_idx, vertex) in projected.vertices.iter_mut().enumerate() {
        let origin = placement * vertex.position;
        let outcome = match cast_past_self(scene, origin, &direction, self_id, params) {
            Ok(hit) if hit.kind == ObjectKind::Mesh => {
                vertex.position = inverse * hit.point;
                VertexOutcome::Projected { target: hit.target }
            }
            Ok(hit) => VertexOutcome::Unresolved(MissReason::NotAMesh(hit.kind)),
            Err(reason) => {
                if reason == MissReason::SelfHitsExhausted {
                    debug!(vertex = vertex_idx, "Self-hit retries exhausted");
                }
                VertexOutcome::Unresolved(reason)
            }
        };
        outcomes.push(outcome);
    }

    // Neighbor-average pass, reading from a snapshot of the ray-cast result
    let unresolved: Vec<usize> = outcomes
        .iter()
        .enumerate()
        .filter(|(_, o)| !o.is_projected())
        .map(|(i, _)| i)
        .collect();

    if !unresolved.is_empty() {
        let snapshot: Vec<Point3<f64>> = projected.positions();

        for &vertex_idx in &unresolved {
            #[allow(clippy::cast_possible_truncation)]
            let neighbors = adjacency.neighbors(vertex_idx as u32);
            let positions: Vec<&Point3<f64>> = neighbors
                .iter()
                .filter_map(|&n| snapshot.get(n as usize))
                .collect();
            if let Some(mean) = mean_position(&positions) {
                projected.vertices[vertex_idx].position = mean;
            }
        }
    }

    let unresolved_count = unresolved.len();
    let exhausted_count = outcomes
        .iter()
        .filter(|o| matches!(o, VertexOutcome::Unresolved(MissReason::SelfHitsExhausted)))
        .count();
    let projected_count = outcomes.len() - unresolved_count;

    if unresolved_count > 0 {
        warn!(
            unresolved = unresolved_count,
            exhausted = exhausted_count,
            "Some vertices found no target surface"
        );
    }
    info!(
        projected = projected_count,
        unresolved = unresolved_count,
        "Surface projection complete"
    );

    Ok(Projection {
        mesh: projected,
        placement: *placement,
        outcomes,
        projected_count,
        unresolved_count,
        exhausted_count,
    })
}

/// Project a mesh moved to a capture viewpoint, casting along its view axis.
///
/// The mesh is placed at the camera location (keeping an axis-aligned
/// orientation) and rays travel along the camera's forward direction.
///
/// # Errors
///
/// Same as [`project_onto_surface`].
pub fn project_from_viewpoint<C: RayCaster + ?Sized>(
    mesh: &IndexedMesh,
    viewpoint: &Viewpoint,
    scene: &C,
    self_id: ObjectId,
    params: &ProjectionParams,
) -> ProjectionResult<Projection> {
    project_onto_surface(
        mesh,
        &viewpoint.placement(),
        &viewpoint.forward(),
        scene,
        self_id,
        params,
    )
}

fn unit_direction(direction: &Vector3<f64>) -> ProjectionResult<Vector3<f64>> {
    let norm = direction.norm();
    if !norm.is_finite() || norm <= f64::EPSILON {
        return Err(ProjectionError::invalid_direction(format!(
            "cannot cast along ({}, {}, {})",
            direction.x, direction.y, direction.z
        )));
    }
    Ok(direction / norm)
}

/// Cast a ray, stepping over hits on `self_id`.
fn cast_past_self<C: RayCaster + ?Sized>(
    scene: &C,
    mut origin: Point3<f64>,
    direction: &Vector3<f64>,
    self_id: ObjectId,
    params: &ProjectionParams,
) -> Result<RayHit, MissReason> {
    let mut retries = 0;
    loop {
        let hit = scene.cast_ray(&origin, direction).ok_or(MissReason::NoHit)?;
        if hit.target != self_id {
            return Ok(hit);
        }
        if retries == params.max_self_hits {
            return Err(MissReason::SelfHitsExhausted);
        }
        retries += 1;
        origin = hit.point + direction * params.epsilon;
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean_position(points: &[&Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc: Vector3<f64>, p| acc + p.coords);
    Some(Point3::from(sum / points.len() as f64))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use face_types::Vertex;
    use std::cell::Cell;

    const SELF: ObjectId = ObjectId(1);
    const HEAD: ObjectId = ObjectId(2);

    /// Rays from `x ~= 1` only ever hit the projected mesh; all others land
    /// on a mesh at `z = 0`. Rays from `x ~= 5` hit a camera.
    struct Mock {
        casts: Cell<usize>,
    }

    impl Mock {
        fn new() -> Self {
            Self {
                casts: Cell::new(0),
            }
        }
    }

    impl RayCaster for Mock {
        fn cast_ray(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> Option<RayHit> {
            self.casts.set(self.casts.get() + 1);
            let hit = |point, target, kind| RayHit {
                point,
                normal: Vector3::z(),
                face_index: 0,
                target,
                kind,
            };
            if (origin.x - 1.0).abs() < 1e-9 {
                Some(hit(origin + direction * 0.01, SELF, ObjectKind::Mesh))
            } else if (origin.x - 5.0).abs() < 1e-9 {
                Some(hit(Point3::new(5.0, origin.y, 0.0), ObjectId(3), ObjectKind::Camera))
            } else if origin.x > 50.0 {
                None
            } else {
                Some(hit(Point3::new(origin.x, origin.y, 0.0), HEAD, ObjectKind::Mesh))
            }
        }
    }

    fn strip() -> IndexedMesh {
        IndexedMesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 3.0),
                Vertex::from_coords(1.0, 0.0, 3.0),
                Vertex::from_coords(2.0, 0.0, 3.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    fn project(mesh: &IndexedMesh, caster: &Mock, params: &ProjectionParams) -> Projection {
        project_onto_surface(
            mesh,
            &Isometry3::identity(),
            &-Vector3::z(),
            caster,
            SELF,
            params,
        )
        .unwrap()
    }

    #[test]
    fn exhausted_vertex_takes_neighbor_mean() {
        let caster = Mock::new();
        let result = project(&strip(), &caster, &ProjectionParams::default());

        assert_eq!(result.projected_count, 2);
        assert_eq!(result.unresolved_count, 1);
        assert_eq!(result.exhausted_count, 1);
        assert_eq!(
            result.outcomes[1],
            VertexOutcome::Unresolved(MissReason::SelfHitsExhausted)
        );
        assert_relative_eq!(
            result.mesh.vertices[1].position,
            Point3::new(1.0, 0.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn self_hit_retries_are_bounded() {
        let caster = Mock::new();
        let params = ProjectionParams::default().max_self_hits(5);
        let mesh = IndexedMesh::from_parts(vec![Vertex::from_coords(1.0, 0.0, 3.0)], vec![]);
        let result = project(&mesh, &caster, &params);

        // One initial cast plus five retries
        assert_eq!(caster.casts.get(), 6);
        assert_eq!(result.exhausted_count, 1);
    }

    #[test]
    fn vertex_without_edges_keeps_position() {
        let mut mesh = strip();
        mesh.vertices.push(Vertex::from_coords(60.0, 1.0, 3.0));
        let result = project(&mesh, &Mock::new(), &ProjectionParams::default());

        assert_eq!(result.outcomes[3], VertexOutcome::Unresolved(MissReason::NoHit));
        assert_eq!(result.mesh.vertices[3].position, Point3::new(60.0, 1.0, 3.0));
    }

    #[test]
    fn non_mesh_target_is_unresolved() {
        let mesh = IndexedMesh::from_parts(
            vec![
                Vertex::from_coords(4.0, 0.0, 3.0),
                Vertex::from_coords(5.0, 0.0, 3.0),
                Vertex::from_coords(6.0, 0.0, 3.0),
            ],
            vec![[0, 1, 2]],
        );
        let result = project(&mesh, &Mock::new(), &ProjectionParams::default());

        assert_eq!(
            result.outcomes[1],
            VertexOutcome::Unresolved(MissReason::NotAMesh(ObjectKind::Camera))
        );
        assert_relative_eq!(
            result.mesh.vertices[1].position,
            Point3::new(5.0, 0.0, 0.0),
            epsilon = 1e-12
        );
        assert_eq!(result.exhausted_count, 0);
    }

    #[test]
    fn wire_edges_supply_fallback_neighbors() {
        // Vertex 3 only hangs off vertex 0 by a wire edge; the triangle
        // itself never connects it
        let mesh = IndexedMesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 3.0),
                Vertex::from_coords(2.0, 0.0, 3.0),
                Vertex::from_coords(0.0, 2.0, 3.0),
                Vertex::from_coords(1.0, 5.0, 3.0),
            ],
            vec![[0, 1, 2]],
        );
        let placement = Isometry3::identity();
        let params = ProjectionParams::default().max_self_hits(2);

        let plain = project(&mesh, &Mock::new(), &params);
        assert_relative_eq!(plain.mesh.vertices[3].position, Point3::new(1.0, 5.0, 3.0));

        let adjacency = MeshAdjacency::build(&mesh.faces).with_wire_edges(&[[0, 3]]);
        let wired = project_with_adjacency(
            &mesh,
            &adjacency,
            &placement,
            &-Vector3::z(),
            &Mock::new(),
            SELF,
            &params,
        )
        .unwrap();
        assert!(!wired.outcomes[3].is_projected());
        assert_relative_eq!(wired.mesh.vertices[3].position, Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn neighbor_mean_uses_ray_cast_snapshot() {
        // 0 - 1 - 2 chain where 1 and 2 are both unresolved: 1 averages the
        // snapshot positions of 0 (projected) and 2 (unmoved), not the
        // already-averaged value of 2.
        let mesh = IndexedMesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 3.0),
                Vertex::from_coords(1.0, 0.0, 3.0),
                Vertex::from_coords(60.0, 0.0, 3.0),
            ],
            vec![[0, 1, 2]],
        );
        let result = project(&mesh, &Mock::new(), &ProjectionParams::default());

        assert_eq!(result.unresolved_count, 2);
        assert_eq!(result.unresolved_vertices(), vec![1, 2]);
        assert_relative_eq!(result.hit_ratio(), 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(
            result.mesh.vertices[1].position,
            Point3::new(30.0, 0.0, 1.5),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            result.mesh.vertices[2].position,
            Point3::new(0.5, 0.0, 1.5),
            epsilon = 1e-12
        );
    }

    #[test]
    fn placement_round_trips_to_local_space() {
        let placement = Isometry3::translation(0.0, 0.0, 10.0);
        let mesh = IndexedMesh::from_parts(vec![Vertex::from_coords(3.0, 2.0, 0.0)], vec![]);
        let result = project_onto_surface(
            &mesh,
            &placement,
            &Vector3::new(0.0, 0.0, -4.0),
            &Mock::new(),
            SELF,
            &ProjectionParams::default(),
        )
        .unwrap();

        assert_relative_eq!(
            result.mesh.vertices[0].position,
            Point3::new(3.0, 2.0, -10.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            result.world_mesh().vertices[0].position,
            Point3::new(3.0, 2.0, 0.0),
            epsilon = 1e-12
        );
        assert_eq!(result.hit_ratio(), 1.0);
    }

    #[test]
    fn invalid_inputs() {
        let caster = Mock::new();
        let params = ProjectionParams::default();

        let empty = project_onto_surface(
            &IndexedMesh::new(),
            &Isometry3::identity(),
            &-Vector3::z(),
            &caster,
            SELF,
            &params,
        );
        assert!(matches!(empty, Err(ProjectionError::EmptyMesh)));

        let zero = project_onto_surface(
            &strip(),
            &Isometry3::identity(),
            &Vector3::zeros(),
            &caster,
            SELF,
            &params,
        );
        assert!(matches!(zero, Err(ProjectionError::InvalidDirection(_))));

        let bad = project_onto_surface(
            &strip(),
            &Isometry3::identity(),
            &-Vector3::z(),
            &caster,
            SELF,
            &params.epsilon(0.0),
        );
        assert!(matches!(bad, Err(ProjectionError::InvalidParams(_))));
    }

    #[test]
    fn viewpoint_projection_uses_camera_axis() {
        let camera = Viewpoint::new(Point3::new(0.0, 0.0, 4.0), face_types::UnitQuaternion::identity());
        let mesh = IndexedMesh::from_parts(vec![Vertex::from_coords(2.0, 3.0, 0.0)], vec![]);
        let result =
            project_from_viewpoint(&mesh, &camera, &Mock::new(), SELF, &ProjectionParams::default())
                .unwrap();

        assert!(result.outcomes[0].is_projected());
        assert_relative_eq!(
            result.mesh.vertices[0].position,
            Point3::new(2.0, 3.0, -4.0),
            epsilon = 1e-12
        );
    }
}
