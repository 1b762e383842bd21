//! Mesh quality analysis.

use face_types::{MeshAdjacency, PolygonMesh, SceneObject, Triangle};
use tracing::{debug, info};

use crate::error::{QualityError, QualityResult};
use crate::metrics::{aspect_ratio, shape_factor, size_ratio, skewness};
use crate::report::{
    AreaExtremes, FaceArea, FaceQuality, QualityReport, QualityTotals, TopologyStats,
};
use crate::selection::Selection;

/// Analyze the quality of a mesh.
///
/// The mesh is fan-triangulated first; per-face metrics, their means and the
/// area extremes are computed over the triangles. Topology counts describe
/// the mesh as given, including wire edges. Only the vertex density depends
/// on `selection` (`None` selects everything).
///
/// An empty mesh yields an empty report rather than an error.
///
/// # Errors
///
/// - [`QualityError::InvalidIndex`] if a face references a missing vertex
/// - [`QualityError::InvalidEdgeIndex`] if a wire edge does
/// - [`QualityError::InvalidSelection`] if `selection` is out of range
///
/// # Example
///
/// ```
/// use face_quality::analyze_mesh;
/// use face_types::{IndexedMesh, PolygonMesh};
///
/// let h = 3.0_f64.sqrt() / 2.0;
/// let mesh: PolygonMesh =
///     IndexedMesh::from_raw(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, h, 0.0], &[0, 1, 2]).into();
///
/// let report = analyze_mesh(&mesh, None).unwrap();
/// assert!((report.totals.aspect_ratio - 1.0).abs() < 1e-12);
/// assert!((report.totals.shape_factor - 1.0).abs() < 1e-12);
/// assert_eq!(report.topology.edges, 3);
/// ```
pub fn analyze_mesh(mesh: &PolygonMesh, selection: Option<&Selection>) -> QualityResult<QualityReport> {
    check_indices(mesh)?;
    if let Some(selection) = selection {
        selection.validate(mesh)?;
    }

    info!(
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        wire_edges = mesh.edges.len(),
        selected = selection.is_some(),
        "Starting quality analysis"
    );

    let triangulated = mesh.triangulate();
    let triangles: Vec<Triangle> = triangulated.triangles().collect();
    let areas: Vec<f64> = triangles.iter().map(Triangle::area).collect();
    let adjacency = MeshAdjacency::build(&triangulated.faces);

    let faces: Vec<FaceQuality> = triangles
        .iter()
        .zip(&triangulated.faces)
        .enumerate()
        .map(|(idx, (tri, face))| {
            let neighbors = adjacency.edge_neighbor_faces(idx, face);
            FaceQuality {
                aspect_ratio: aspect_ratio(tri),
                skewness: skewness(tri),
                size_ratio: size_ratio(areas[idx], neighbors.iter().map(|&n| areas[n])),
                shape_factor: shape_factor(tri),
                area: areas[idx],
            }
        })
        .collect();

    let totals = mean_metrics(&faces);
    let extremes = area_extremes(&areas);
    let topology = topology_stats(mesh);
    let vertex_density = vertex_density(mesh, selection);

    if triangulated.faces.len() != mesh.faces.len() {
        debug!(
            polygons = mesh.faces.len(),
            triangles = triangulated.faces.len(),
            "Triangulated before analysis"
        );
    }
    info!(
        faces = faces.len(),
        non_manifold = topology.non_manifold_edges,
        loose = topology.loose_vertices,
        density = vertex_density,
        "Quality analysis complete"
    );

    Ok(QualityReport {
        faces,
        totals,
        extremes,
        topology,
        vertex_density,
    })
}

/// Analyze the mesh carried by a scene object.
///
/// Every metric is invariant under the object's rigid transform, so the
/// mesh is analyzed in local space.
///
/// # Errors
///
/// Returns [`QualityError::NotAMesh`] if the object is a camera or empty,
/// plus the errors of [`analyze_mesh`].
pub fn analyze_object(object: &SceneObject, selection: Option<&Selection>) -> QualityResult<QualityReport> {
    let mesh = object
        .mesh()
        .ok_or_else(|| QualityError::not_a_mesh(object.kind()))?;
    debug!(object = %object.id, name = %object.name, "Analyzing object");
    analyze_mesh(mesh, selection)
}

fn check_indices(mesh: &PolygonMesh) -> QualityResult<()> {
    let n = mesh.vertices.len();
    for (face, indices) in mesh.faces.iter().enumerate() {
        if let Some(&index) = indices.iter().find(|&&v| v as usize >= n) {
            return Err(QualityError::InvalidIndex { face, index });
        }
    }
    for (edge, pair) in mesh.edges.iter().enumerate() {
        if let Some(&index) = pair.iter().find(|&&v| v as usize >= n) {
            return Err(QualityError::InvalidEdgeIndex { edge, index });
        }
    }
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn mean_metrics(faces: &[FaceQuality]) -> QualityTotals {
    if faces.is_empty() {
        return QualityTotals::default();
    }
    let n = faces.len() as f64;
    let sum = faces.iter().fold(QualityTotals::default(), |acc, f| QualityTotals {
        aspect_ratio: acc.aspect_ratio + f.aspect_ratio,
        skewness: acc.skewness + f.skewness,
        size_ratio: acc.size_ratio + f.size_ratio,
        shape_factor: acc.shape_factor + f.shape_factor,
    });
    QualityTotals {
        aspect_ratio: sum.aspect_ratio / n,
        skewness: sum.skewness / n,
        size_ratio: sum.size_ratio / n,
        shape_factor: sum.shape_factor / n,
    }
}

fn area_extremes(areas: &[f64]) -> Option<AreaExtremes> {
    let (&first, rest) = areas.split_first()?;
    let mut max = FaceArea { face: 0, area: first };
    let mut min = max;

    for (offset, &area) in rest.iter().enumerate() {
        let face = offset + 1;
        if area > max.area {
            max = FaceArea { face, area };
        }
        if area < min.area {
            min = FaceArea { face, area };
        }
    }

    Some(AreaExtremes { max, min })
}

fn topology_stats(mesh: &PolygonMesh) -> TopologyStats {
    let adjacency = MeshAdjacency::build(&mesh.faces).with_wire_edges(&mesh.edges);
    TopologyStats {
        vertices: mesh.vertices.len(),
        edges: adjacency.edge_count(),
        faces: mesh.faces.len(),
        non_manifold_edges: adjacency.non_manifold_edge_count(),
        loose_vertices: adjacency.loose_vertex_count(mesh.vertices.len()),
    }
}

/// Area of a polygon face as the sum of its fan triangles.
fn polygon_area(mesh: &PolygonMesh, face: &[u32]) -> f64 {
    let position = |i: u32| mesh.vertices[i as usize].position;
    if face.len() < 3 {
        return 0.0;
    }
    (1..face.len() - 1)
        .map(|i| Triangle::new(position(face[0]), position(face[i]), position(face[i + 1])).area())
        .sum()
}

#[allow(clippy::cast_precision_loss)]
fn vertex_density(mesh: &PolygonMesh, selection: Option<&Selection>) -> f64 {
    let (vertex_count, area) = match selection {
        Some(sel) => (
            sel.vertices().len(),
            sel.faces()
                .iter()
                .map(|&f| polygon_area(mesh, &mesh.faces[f]))
                .sum::<f64>(),
        ),
        None => (
            mesh.vertices.len(),
            mesh.faces.iter().map(|f| polygon_area(mesh, f)).sum::<f64>(),
        ),
    };
    if area > 0.0 {
        vertex_count as f64 / area
    } else {
        0.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use face_types::{
        IndexedMesh, Isometry3, ObjectData, ObjectId, ObjectKind, Vector3, Vertex, Viewpoint,
    };

    fn equilateral() -> PolygonMesh {
        let h = 3.0_f64.sqrt() / 2.0;
        IndexedMesh::from_raw(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, h, 0.0], &[0, 1, 2]).into()
    }

    /// Unit square split along the 0-2 diagonal.
    fn square() -> PolygonMesh {
        IndexedMesh::from_raw(
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
            &[0, 1, 2, 0, 2, 3],
        )
        .into()
    }

    #[test]
    fn test_equilateral_metrics() {
        let report = analyze_mesh(&equilateral(), None).unwrap();

        assert_eq!(report.faces.len(), 1);
        assert_relative_eq!(report.totals.aspect_ratio, 1.0, epsilon = 1e-12);
        assert_relative_eq!(report.totals.skewness, 0.0, epsilon = 1e-9);
        assert_relative_eq!(report.totals.size_ratio, 1.0);
        assert_relative_eq!(report.totals.shape_factor, 1.0, epsilon = 1e-12);

        let extremes = report.extremes.unwrap();
        assert_eq!(extremes.max.face, 0);
        assert_eq!(extremes.min.face, 0);
        assert_relative_eq!(extremes.max.area, 3.0_f64.sqrt() / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_collinear_face() {
        let mesh: PolygonMesh =
            IndexedMesh::from_raw(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0], &[0, 1, 2])
                .into();
        let report = analyze_mesh(&mesh, None).unwrap();

        assert_relative_eq!(report.faces[0].area, 0.0);
        assert!(report.faces[0].shape_factor.is_infinite());
        assert!(report.faces[0].size_ratio.is_infinite());
        assert!(report.totals.shape_factor.is_infinite());
        assert_relative_eq!(report.vertex_density, 0.0);
    }

    #[test]
    fn test_size_ratio_uses_edge_neighbors() {
        // Right triangle (area 0.5) next to a larger one (area 1.0)
        let mesh: PolygonMesh = IndexedMesh::from_raw(
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 2.0, 1.0, 0.0],
            &[0, 1, 2, 1, 3, 2],
        )
        .into();
        let report = analyze_mesh(&mesh, None).unwrap();

        assert_relative_eq!(report.faces[0].area, 0.5, epsilon = 1e-12);
        assert_relative_eq!(report.faces[1].area, 1.0, epsilon = 1e-12);
        assert_relative_eq!(report.faces[0].size_ratio, 2.0, epsilon = 1e-12);
        assert_relative_eq!(report.faces[1].size_ratio, 2.0, epsilon = 1e-12);

        let extremes = report.extremes.unwrap();
        assert_eq!(extremes.max.face, 1);
        assert_eq!(extremes.min.face, 0);
    }

    #[test]
    fn test_area_ties_keep_first_face() {
        let report = analyze_mesh(&square(), None).unwrap();
        let extremes = report.extremes.unwrap();
        assert_eq!(extremes.max.face, 0);
        assert_eq!(extremes.min.face, 0);
    }

    #[test]
    fn test_quad_is_triangulated() {
        let mut mesh = square();
        mesh.faces = vec![vec![0, 1, 2, 3]];
        let report = analyze_mesh(&mesh, None).unwrap();

        assert_eq!(report.faces.len(), 2);
        assert_eq!(report.topology.faces, 1);
        // Topology over the quad: no diagonal
        assert_eq!(report.topology.edges, 4);
        assert_relative_eq!(report.vertex_density, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_loose_vertex() {
        let base = analyze_mesh(&square(), None).unwrap();

        let mut mesh = square();
        mesh.vertices.push(Vertex::from_coords(5.0, 5.0, 0.0));
        let report = analyze_mesh(&mesh, None).unwrap();

        assert_eq!(report.topology.vertices, base.topology.vertices + 1);
        assert_eq!(report.topology.loose_vertices, base.topology.loose_vertices + 1);
        assert_eq!(report.topology.edges, base.topology.edges);
        assert_eq!(report.topology.faces, base.topology.faces);
        assert_eq!(
            report.topology.non_manifold_edges,
            base.topology.non_manifold_edges
        );
    }

    #[test]
    fn test_non_manifold_edges() {
        let positions = [
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.5, 1.0, 0.0, //
            0.5, -1.0, 0.0, //
            0.5, 0.0, 1.0,
        ];

        // Edge 0-1 shared by two faces: manifold
        let two: PolygonMesh = IndexedMesh::from_raw(&positions, &[0, 1, 2, 1, 0, 3]).into();
        assert_eq!(analyze_mesh(&two, None).unwrap().topology.non_manifold_edges, 0);

        // Edge 0-1 shared by three faces
        let three: PolygonMesh =
            IndexedMesh::from_raw(&positions, &[0, 1, 2, 1, 0, 3, 0, 1, 4]).into();
        assert_eq!(analyze_mesh(&three, None).unwrap().topology.non_manifold_edges, 1);
    }

    #[test]
    fn test_wire_edge_is_non_manifold() {
        let mut mesh = square();
        mesh.vertices.push(Vertex::from_coords(2.0, 0.0, 0.0));
        mesh.edges.push([1, 4]);
        let report = analyze_mesh(&mesh, None).unwrap();

        assert_eq!(report.topology.edges, 6);
        assert_eq!(report.topology.non_manifold_edges, 1);
        assert_eq!(report.topology.loose_vertices, 0);
    }

    #[test]
    fn test_selection_density() {
        let mesh = square();
        let sel = Selection::new().with_vertices([0, 1, 2]).with_faces([0]);
        let report = analyze_mesh(&mesh, Some(&sel)).unwrap();
        assert_relative_eq!(report.vertex_density, 6.0, epsilon = 1e-12);

        // Means ignore the selection
        let full = analyze_mesh(&mesh, None).unwrap();
        assert_eq!(report.totals, full.totals);
        assert_relative_eq!(full.vertex_density, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_selection_without_faces() {
        let sel = Selection::new().with_vertices([0]);
        let report = analyze_mesh(&square(), Some(&sel)).unwrap();
        assert_relative_eq!(report.vertex_density, 0.0);
    }

    #[test]
    fn test_invalid_selection() {
        let sel = Selection::new().with_faces([2]);
        let result = analyze_mesh(&square(), Some(&sel));
        assert!(matches!(result, Err(QualityError::InvalidSelection { .. })));
    }

    #[test]
    fn test_invalid_face_index() {
        let mut mesh = square();
        mesh.faces.push(vec![0, 1, 9]);
        let result = analyze_mesh(&mesh, None);
        assert!(matches!(
            result,
            Err(QualityError::InvalidIndex { face: 2, index: 9 })
        ));
    }

    #[test]
    fn test_invalid_wire_edge_index() {
        let mut mesh = square();
        mesh.edges.push([0, 2]);
        mesh.edges.push([3, 12]);
        let result = analyze_mesh(&mesh, None);
        assert!(matches!(
            result,
            Err(QualityError::InvalidEdgeIndex { edge: 1, index: 12 })
        ));
    }

    #[test]
    fn test_empty_mesh() {
        let report = analyze_mesh(&PolygonMesh::new(), None).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.totals, QualityTotals::default());
        assert!(report.extremes.is_none());
        assert_relative_eq!(report.vertex_density, 0.0);
    }

    #[test]
    fn test_analyze_object() {
        let object = SceneObject::new(ObjectId(3), "Face", ObjectData::Mesh(equilateral()))
            .with_transform(Isometry3::new(Vector3::new(4.0, 0.0, -2.0), Vector3::y()));
        let report = analyze_object(&object, None).unwrap();
        assert_relative_eq!(report.totals.shape_factor, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_not_a_mesh() {
        let camera = SceneObject::new(
            ObjectId(1),
            "Camera",
            ObjectData::Camera(Viewpoint::default()),
        );
        let err = analyze_object(&camera, None).unwrap_err();
        assert!(matches!(
            err,
            QualityError::NotAMesh {
                kind: ObjectKind::Camera
            }
        ));

        let empty = SceneObject::new(ObjectId(2), "Empty", ObjectData::Empty);
        assert!(analyze_object(&empty, None).is_err());
    }
}
