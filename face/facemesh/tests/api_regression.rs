//! API Regression Tests for the facemesh crates
//!
//! These tests pin the public API of the umbrella crate. They are organized
//! in 5 tiers following the data flow:
//!
//! - Tier 1: Foundation (face-types)
//! - Tier 2: Reconstruction (face-topology, face-io)
//! - Tier 3: Projection (face-project)
//! - Tier 4: Quality (face-quality)
//! - Tier 5: Pipelines (end to end, face-batch)
//!
//! A failure after an API change is a breaking change and needs a version
//! bump.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::float_cmp)]

use approx::assert_relative_eq;
use facemesh::prelude::*;
use facemesh::{io, project, quality, topology, types};

/// Four landmarks on a square plus one in the middle, normalized space.
fn diamond_landmarks() -> Vec<Landmark> {
    landmarks_from_positions(&[
        Point3::new(0.4, 0.4, 0.0),
        Point3::new(0.6, 0.4, 0.0),
        Point3::new(0.6, 0.6, 0.0),
        Point3::new(0.4, 0.6, 0.0),
        Point3::new(0.5, 0.5, -0.02),
    ])
}

/// Fan around the middle landmark.
fn diamond_template() -> EdgeAdjacency {
    EdgeAdjacency::symmetric([
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 0),
        (4, 0),
        (4, 1),
        (4, 2),
        (4, 3),
    ])
}

/// A 10 x 10 quad at height `z`, split along the `x = -y` diagonal.
fn plane(z: f64) -> IndexedMesh {
    IndexedMesh::from_raw(
        &[-5.0, -5.0, z, 5.0, -5.0, z, 5.0, 5.0, z, -5.0, 5.0, z],
        &[0, 1, 3, 1, 2, 3],
    )
}

// =============================================================================
// TIER 1: Foundation - Types
// =============================================================================

mod tier1_foundation {
    use super::*;

    #[test]
    fn landmark_indices_follow_input_order() {
        let landmarks = diamond_landmarks();
        for (i, l) in landmarks.iter().enumerate() {
            assert_eq!(l.index as usize, i);
        }
    }

    #[test]
    fn polygon_triangulation_is_explicit() {
        let mut mesh = PolygonMesh::new();
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            mesh.vertices.push(Vertex::from_coords(x, y, 0.0));
        }
        mesh.faces.push(vec![0, 1, 2, 3]);
        assert!(!mesh.is_triangulated());

        let tris = mesh.triangulate();
        assert_eq!(tris.face_count(), 2);
        assert_eq!(tris.faces, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn scene_object_kinds() {
        let mesh = SceneObject::new(ObjectId(1), "Head", ObjectData::Mesh(PolygonMesh::new()));
        let camera = SceneObject::new(ObjectId(2), "Camera", ObjectData::Camera(Viewpoint::default()));
        let empty = SceneObject::new(ObjectId(3), "Root", ObjectData::Empty);

        assert_eq!(mesh.kind(), ObjectKind::Mesh);
        assert_eq!(camera.kind(), ObjectKind::Camera);
        assert_eq!(empty.kind(), ObjectKind::Empty);
        assert!(camera.mesh().is_none());
        assert_eq!(format!("{}", ObjectId(13)), "#13");
    }

    #[test]
    fn viewpoint_forward_and_placement() {
        let view = Viewpoint::looking_at(
            Point3::new(0.0, 0.0, 5.0),
            Point3::origin(),
            Vector3::y(),
        );
        assert_relative_eq!(view.forward(), -Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(
            view.placement() * Point3::origin(),
            Point3::new(0.0, 0.0, 5.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn mesh_adjacency_counts() {
        let faces = vec![[0u32, 1, 2], [1, 3, 2]];
        let adj = types::MeshAdjacency::build(&faces);
        assert_eq!(adj.edge_count(), 5);
        assert!(adj.is_manifold());
        assert_eq!(adj.loose_vertex_count(5), 1);
    }
}

// =============================================================================
// TIER 2: Reconstruction - Topology and I/O
// =============================================================================

mod tier2_reconstruction {
    use super::*;

    #[test]
    fn directed_adjacency_is_not_symmetrized() {
        let landmarks = diamond_landmarks();
        let one_way = EdgeAdjacency::from_pairs([(0, 1), (1, 2), (2, 0)]);
        assert_eq!(build_faces(&landmarks, &one_way), vec![[0, 1, 2]]);

        // Opposite orientation on the last edge: no closed cycle
        let broken = EdgeAdjacency::from_pairs([(0, 1), (1, 2), (0, 2)]);
        assert!(build_faces(&landmarks, &broken).is_empty());
    }

    #[test]
    fn faces_are_unique_by_vertex_set() {
        let faces = build_faces(&diamond_landmarks(), &diamond_template());
        assert_eq!(faces.len(), 4);

        let mut keys: Vec<_> = faces
            .iter()
            .map(|f| topology::face_key(f[0], f[1], f[2]))
            .collect();
        keys.sort_by_key(|k| k.0);
        keys.dedup();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn template_text_format() {
        let pairs = topology::parse_text_pairs("# tesselation\n0 1\n1, 2\n\n2 0\n").unwrap();
        assert_eq!(pairs, vec![(0, 1), (1, 2), (2, 0)]);
        let json = topology::parse_json_pairs("[[0, 1], [1, 2]]").unwrap();
        assert_eq!(json, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn export_layout() {
        let landmarks = landmarks_from_positions(&[
            Point3::new(0.5, 0.5, 0.0),
            Point3::new(1.0, 0.0, 0.25),
            Point3::new(0.0, 1.0, 0.0),
        ]);
        let mut out = Vec::new();
        io::write_landmarks(&landmarks, &[[0, 1, 2]], &CoordinateTransform::default(), &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "v 0.5 0.28125 -0.25");
        assert_eq!(lines[3], "f 1 2 3");
    }

    #[test]
    fn export_then_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.obj");
        let landmarks = diamond_landmarks();
        let faces = build_faces(&landmarks, &diamond_template());

        export_landmarks(&landmarks, &faces, &CoordinateTransform::unit(), &path).unwrap();
        let loaded = load_mesh(&path).unwrap();

        assert_eq!(loaded.vertex_count(), 5);
        assert_eq!(loaded.faces.len(), faces.len());
        for (face, original) in loaded.faces.iter().zip(&faces) {
            assert_eq!(face.as_slice(), original.as_slice());
        }
        assert_relative_eq!(loaded.vertices[4].position.z, 0.02, epsilon = 1e-12);
    }

    #[test]
    fn format_detection() {
        assert_eq!(io::MeshFormat::from_path("face.OBJ"), Some(io::MeshFormat::Obj));
        assert_eq!(io::MeshFormat::from_path("face.stl"), None);
        assert!(save_mesh(&IndexedMesh::new(), "face.stl").is_err());
    }
}

// =============================================================================
// TIER 3: Projection
// =============================================================================

mod tier3_projection {
    use super::*;
    use facemesh::project::{MissReason, ProjectionError, ShrinkwrapParams, VertexOutcome};

    fn head_scene() -> Scene {
        Scene::from_objects([SceneObject::new(
            ObjectId(13),
            "Object_13",
            ObjectData::Mesh(plane(-1.0).into()),
        )])
    }

    #[test]
    fn params_builders() {
        let params = ProjectionParams::default().max_self_hits(8).epsilon(1e-3);
        assert_eq!(params.max_self_hits, 8);
        assert!(params.validate().is_ok());
        assert!(ProjectionParams::default().epsilon(0.0).validate().is_err());
        assert!(ProjectionParams::fine().max_self_hits > ProjectionParams::default().max_self_hits);
    }

    #[test]
    fn projection_snaps_and_reports() {
        let scene = head_scene();
        let mesh = build_landmark_mesh(&diamond_landmarks(), &diamond_template());
        let result = project_onto_surface(
            &mesh,
            &types::Isometry3::identity(),
            &-Vector3::z(),
            &scene,
            ObjectId(1),
            &ProjectionParams::default(),
        )
        .unwrap();

        assert_eq!(result.projected_count, 5);
        assert_eq!(result.unresolved_count, 0);
        assert_relative_eq!(result.hit_ratio(), 1.0);
        for v in &result.mesh.vertices {
            assert_relative_eq!(v.position.z, -1.0, epsilon = 1e-9);
        }
        assert!(result.outcomes.iter().all(VertexOutcome::is_projected));
    }

    #[test]
    fn misses_fall_back_to_neighbors() {
        let scene = head_scene();
        let mesh = build_landmark_mesh(&diamond_landmarks(), &diamond_template());
        // Casting upwards misses everything
        let result = project_onto_surface(
            &mesh,
            &types::Isometry3::identity(),
            &Vector3::z(),
            &scene,
            ObjectId(1),
            &ProjectionParams::default(),
        )
        .unwrap();

        assert_eq!(result.unresolved_count, 5);
        assert_eq!(
            result.outcomes[0],
            VertexOutcome::Unresolved(MissReason::NoHit)
        );
        // The center is the mean of the four corners
        assert_relative_eq!(
            result.mesh.vertices[4].position,
            Point3::new(0.5, 0.5, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn zero_direction_is_rejected() {
        let scene = head_scene();
        let mesh = plane(0.0);
        let err = project_onto_surface(
            &mesh,
            &types::Isometry3::identity(),
            &Vector3::zeros(),
            &scene,
            ObjectId(1),
            &ProjectionParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidDirection(_)));
    }

    #[test]
    fn ray_caster_contract() {
        let scene = head_scene();
        let hit = scene
            .cast_ray(&Point3::new(0.3, 0.2, 4.0), &-Vector3::z())
            .unwrap();
        assert_eq!(hit.target, ObjectId(13));
        assert_eq!(hit.kind, ObjectKind::Mesh);
        assert_relative_eq!(hit.point.z, -1.0, epsilon = 1e-12);
        assert!(scene.cast_ray(&Point3::new(0.3, 0.2, 4.0), &Vector3::z()).is_none());
    }

    #[test]
    fn shrinkwrap_contract() {
        let scene = head_scene();
        let mut wrap = NearestSurfaceShrinkwrap::new(&scene, ShrinkwrapParams::default());

        assert!(matches!(
            wrap.attach(&plane(0.0), &types::Isometry3::identity(), "Missing"),
            Err(ProjectionError::TargetNotFound { .. })
        ));
        assert!(matches!(wrap.bake(), Err(ProjectionError::NothingAttached)));

        wrap.attach(&plane(3.0), &types::Isometry3::identity(), "Object_13")
            .unwrap();
        let baked = wrap.bake().unwrap();
        for v in &baked.vertices {
            assert_relative_eq!(v.position.z, -1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn projection_params_reachable_through_module() {
        let _ = project::SceneParams::default().max_distance(10.0);
    }
}

// =============================================================================
// TIER 4: Quality
// =============================================================================

mod tier4_quality {
    use super::*;
    use facemesh::quality::{QualityError, QualityThresholds};

    #[test]
    fn equilateral_reference_values() {
        let h = 3.0_f64.sqrt() / 2.0;
        let mesh: PolygonMesh =
            IndexedMesh::from_raw(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, h, 0.0], &[0, 1, 2]).into();
        let report = analyze_mesh(&mesh, None).unwrap();

        assert_relative_eq!(report.totals.aspect_ratio, 1.0, epsilon = 1e-12);
        assert_relative_eq!(report.totals.skewness, 0.0, epsilon = 1e-9);
        assert_relative_eq!(report.totals.shape_factor, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn report_fields_and_display() {
        let mesh = build_landmark_mesh(&diamond_landmarks(), &diamond_template());
        let report = analyze_mesh(&mesh.into(), None).unwrap();

        assert_eq!(report.faces.len(), 4);
        assert_eq!(report.topology.vertices, 5);
        assert_eq!(report.topology.edges, 8);
        assert_eq!(report.topology.faces, 4);
        assert_eq!(report.topology.non_manifold_edges, 0);
        assert_eq!(report.topology.loose_vertices, 0);
        assert!(report.vertex_density > 0.0);
        assert!(report.extremes.is_some());

        let text = format!("{report}");
        assert!(text.contains("Non-manifold edges: 0"));
        assert!(report.flagged_faces(&QualityThresholds::default()).is_empty());
    }

    #[test]
    fn selection_affects_density_only() {
        let mesh: PolygonMesh = plane(0.0).into();
        let full = analyze_mesh(&mesh, None).unwrap();
        let sel = Selection::new().with_vertices([0, 1, 2]).with_faces([0]);
        let partial = analyze_mesh(&mesh, Some(&sel)).unwrap();

        assert_eq!(full.totals, partial.totals);
        assert_relative_eq!(full.vertex_density, 4.0 / 100.0, epsilon = 1e-12);
        assert_relative_eq!(partial.vertex_density, 3.0 / 50.0, epsilon = 1e-12);
    }

    #[test]
    fn non_mesh_objects_fail() {
        let camera = SceneObject::new(ObjectId(2), "Camera", ObjectData::Camera(Viewpoint::default()));
        assert!(matches!(
            analyze_object(&camera, None),
            Err(QualityError::NotAMesh { .. })
        ));

        let empty_mesh = SceneObject::new(ObjectId(3), "Blank", ObjectData::Mesh(PolygonMesh::new()));
        assert!(analyze_object(&empty_mesh, None).unwrap().is_empty());
    }

    #[test]
    fn metric_functions_are_public() {
        let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
        assert!(quality::shape_factor(&tri).is_infinite());
        assert_relative_eq!(quality::aspect_ratio(&tri), 2.0, epsilon = 1e-12);
    }
}

// =============================================================================
// TIER 5: Pipelines
// =============================================================================

mod tier5_pipelines {
    use super::*;
    use facemesh::batch::BatchParams;
    use std::fs;
    use std::sync::Arc;

    #[test]
    fn landmarks_to_conformed_mesh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.obj");

        // Reconstruct and export
        let landmarks = diamond_landmarks();
        let faces = build_faces(&landmarks, &diamond_template());
        export_landmarks(&landmarks, &faces, &CoordinateTransform::default(), &path).unwrap();

        // Reload and place at the capture viewpoint
        let face = load_mesh(&path).unwrap().triangulate();
        let scene = Scene::from_objects([SceneObject::new(
            ObjectId(13),
            "Object_13",
            ObjectData::Mesh(plane(-1.0).into()),
        )]);
        let view = Viewpoint::looking_at(
            Point3::new(0.3, 0.2, 5.0),
            Point3::new(0.3, 0.2, 0.0),
            Vector3::y(),
        );

        let projection = project::project_from_viewpoint(
            &face,
            &view,
            &scene,
            ObjectId(1),
            &ProjectionParams::default(),
        )
        .unwrap();
        assert_eq!(projection.projected_count, face.vertex_count());

        let mut wrap = NearestSurfaceShrinkwrap::new(&scene, project::ShrinkwrapParams::default());
        let conformed = conform_to_target(&projection, &mut wrap, "Object_13").unwrap();
        let world = conformed.transformed(&projection.placement);
        for v in &world.vertices {
            assert_relative_eq!(v.position.z, -1.0, epsilon = 1e-9);
        }

        // Flattening a square fan keeps its quality
        let report = analyze_mesh(&world.into(), None).unwrap();
        assert_eq!(report.topology.non_manifold_edges, 0);
        assert_eq!(report.faces.len(), 4);
    }

    #[test]
    fn folder_batch() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let sidecar = "[[0.4, 0.4, 0.0], [0.6, 0.4, 0.0], [0.6, 0.6, 0.0], [0.4, 0.6, 0.0], [0.5, 0.5, -0.02]]";
        for stem in ["front", "left", "right"] {
            fs::write(input.path().join(format!("{stem}.png")), b"").unwrap();
        }
        fs::write(input.path().join("front.landmarks.json"), sidecar).unwrap();
        fs::write(input.path().join("right.landmarks.json"), sidecar).unwrap();

        let report = process_folder(
            input.path(),
            output.path(),
            &SidecarDetector::default(),
            Arc::new(diamond_template()),
            &BatchParams::default(),
        )
        .unwrap();

        assert_eq!(report.exported.len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert!(output.path().join("front.obj").exists());
        assert!(!output.path().join("left.obj").exists());
        assert!(output.path().join("right.obj").exists());

        let mesh = load_mesh(output.path().join("right.obj")).unwrap();
        assert_eq!(mesh.faces.len(), 4);
    }
}
