//! Projection onto a target surface.

use std::path::PathBuf;

use anyhow::{Context, Result};
use facemesh::io::{load_mesh, save_mesh};
use facemesh::project::{
    NearestSurfaceShrinkwrap, ProjectionParams, Scene, ShrinkwrapParams, conform_to_target,
    project_with_adjacency,
};
use facemesh::types::{
    MeshAdjacency, ObjectData, ObjectId, Point3, SceneObject, Vector3, Viewpoint,
};
use tracing::info;

const FACE_ID: ObjectId = ObjectId(1);
const TARGET_ID: ObjectId = ObjectId(2);

#[derive(Debug)]
pub struct ProjectArgs {
    pub mesh: PathBuf,
    pub target: PathBuf,
    pub output: PathBuf,
    pub camera: [f64; 3],
    pub look_at: [f64; 3],
    pub max_self_hits: usize,
    pub epsilon: f64,
    pub offset: f64,
    pub conform: bool,
}

pub fn run(args: &ProjectArgs) -> Result<()> {
    let face = load_mesh(&args.mesh)
        .with_context(|| format!("loading {}", args.mesh.display()))?;
    let target = load_mesh(&args.target)
        .with_context(|| format!("loading {}", args.target.display()))?;
    let target_name = args
        .target
        .file_stem()
        .map_or_else(|| "target".to_string(), |s| s.to_string_lossy().into_owned());

    let [cx, cy, cz] = args.camera;
    let [lx, ly, lz] = args.look_at;
    let view = Viewpoint::looking_at(
        Point3::new(cx, cy, cz),
        Point3::new(lx, ly, lz),
        Vector3::y(),
    );

    // The face itself is part of the scene so its own surface is skipped
    let scene = Scene::from_objects([
        SceneObject::new(FACE_ID, "face", ObjectData::Mesh(face.clone()))
            .with_transform(view.placement()),
        SceneObject::new(TARGET_ID, target_name.clone(), ObjectData::Mesh(target)),
    ]);

    let params = ProjectionParams::default()
        .max_self_hits(args.max_self_hits)
        .epsilon(args.epsilon);
    // Wire edges are lost by triangulation but still count as neighbors
    let mesh = face.triangulate();
    let adjacency = MeshAdjacency::build(&mesh.faces).with_wire_edges(&face.edges);
    let projection = project_with_adjacency(
        &mesh,
        &adjacency,
        &view.placement(),
        &view.forward(),
        &scene,
        FACE_ID,
        &params,
    )?;
    println!(
        "projected {} of {} vertices ({} unresolved, {} exhausted self-hit retries)",
        projection.projected_count,
        projection.mesh.vertices.len(),
        projection.unresolved_count,
        projection.exhausted_count
    );

    let local = if args.conform {
        let mut wrap =
            NearestSurfaceShrinkwrap::new(&scene, ShrinkwrapParams::default().offset(args.offset));
        conform_to_target(&projection, &mut wrap, &target_name)?
    } else {
        projection.mesh.clone()
    };

    let world = local.transformed(&projection.placement);
    save_mesh(&world, &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(output = %args.output.display(), conformed = args.conform, "Projection saved");
    Ok(())
}
