//! Wavefront OBJ support.
//!
//! Only geometry is handled:
//!
//! ```text
//! v x y z [w]        vertex position (w ignored)
//! f i j k ...        polygon, 1-based; i, i/t, i//n, i/t/n; negative = relative
//! l i j ...          polyline, stored as wire edges
//! ```
//!
//! Every other directive (`vt`, `vn`, `o`, `g`, `s`, `usemtl`, ...) is
//! skipped. The writer emits `v` and `f` lines only.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use face_types::{IndexedMesh, PolygonMesh, Vertex};
use tracing::{debug, info};

use crate::error::{IoError, IoResult};

/// Load a polygon mesh from an OBJ file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a line is malformed, or a
/// face refers to a missing vertex.
///
/// # Example
///
/// ```no_run
/// use face_io::load_obj;
///
/// let mesh = load_obj("face.obj").unwrap();
/// println!("Loaded {} faces", mesh.faces.len());
/// ```
pub fn load_obj<P: AsRef<Path>>(path: P) -> IoResult<PolygonMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IoError::from_open(e, path))?;
    let mesh = read_obj(BufReader::new(file))?;

    info!(
        path = %path.display(),
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        wire_edges = mesh.edges.len(),
        "Loaded OBJ"
    );
    Ok(mesh)
}

/// Read a polygon mesh from OBJ text.
///
/// # Errors
///
/// Returns [`IoError::Parse`] for a malformed line and
/// [`IoError::InvalidIndex`] for a face index that does not resolve to a
/// vertex.
///
/// # Example
///
/// ```
/// use face_io::read_obj;
///
/// let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1/1 2/2 3/3 4/4\nl 1 3\n";
/// let mesh = read_obj(text.as_bytes()).unwrap();
/// assert_eq!(mesh.faces, vec![vec![0, 1, 2, 3]]);
/// assert_eq!(mesh.edges, vec![[0, 2]]);
/// ```
pub fn read_obj<R: BufRead>(reader: R) -> IoResult<PolygonMesh> {
    let mut mesh = PolygonMesh::new();
    let mut skipped = 0usize;

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_idx + 1;
        let trimmed = line.split('#').next().unwrap_or("").trim();

        let mut parts = trimmed.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword {
            "v" => {
                let coords: Vec<f64> = parts
                    .take(3)
                    .map(|s| {
                        s.parse::<f64>()
                            .map_err(|e| IoError::parse(line_no, format!("'{s}': {e}")))
                    })
                    .collect::<IoResult<_>>()?;
                let [x, y, z] = coords[..] else {
                    return Err(IoError::parse(line_no, "vertex needs 3 coordinates"));
                };
                mesh.vertices.push(Vertex::from_coords(x, y, z));
            }
            "f" => {
                let face = parts
                    .map(|token| resolve_index(token, mesh.vertices.len(), line_no))
                    .collect::<IoResult<Vec<u32>>>()?;
                if face.len() < 3 {
                    return Err(IoError::parse(line_no, "face needs at least 3 vertices"));
                }
                mesh.faces.push(face);
            }
            "l" => {
                let polyline = parts
                    .map(|token| resolve_index(token, mesh.vertices.len(), line_no))
                    .collect::<IoResult<Vec<u32>>>()?;
                mesh.edges
                    .extend(polyline.windows(2).map(|pair| [pair[0], pair[1]]));
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(lines = skipped, "Skipped non-geometry OBJ directives");
    }

    check_polygons(&mesh)?;
    Ok(mesh)
}

/// Resolve one `f`/`l` token to a 0-based index.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
// Indices are range-checked against the vertex count afterwards
fn resolve_index(token: &str, vertex_count: usize, line_no: usize) -> IoResult<u32> {
    let raw = token.split('/').next().unwrap_or(token);
    let value: i64 = raw
        .parse()
        .map_err(|e| IoError::parse(line_no, format!("'{raw}': {e}")))?;

    let resolved = match value {
        0 => return Err(IoError::parse(line_no, "OBJ indices start at 1")),
        v if v > 0 => v - 1,
        v => vertex_count as i64 + v,
    };

    if resolved < 0 || resolved > i64::from(u32::MAX) {
        return Err(IoError::parse(
            line_no,
            format!("index {value} does not resolve to a vertex"),
        ));
    }
    Ok(resolved as u32)
}

fn check_polygons(mesh: &PolygonMesh) -> IoResult<()> {
    let vertex_count = mesh.vertices.len();
    let edge_faces = mesh.edges.iter().map(<[u32; 2]>::as_slice);
    let loops = mesh.faces.iter().map(Vec::as_slice).chain(edge_faces);

    for (face, indices) in loops.enumerate() {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(IoError::InvalidIndex {
                face,
                index: i64::from(index),
                vertex_count,
            });
        }
    }
    Ok(())
}

/// Save a triangle mesh as OBJ.
///
/// # Errors
///
/// Returns an error if the file cannot be written or a face index is out of
/// range.
///
/// # Example
///
/// ```no_run
/// use face_io::{load_obj, save_obj};
///
/// let mesh = load_obj("input.obj").unwrap().triangulate();
/// save_obj(&mesh, "output.obj").unwrap();
/// ```
pub fn save_obj<P: AsRef<Path>>(mesh: &IndexedMesh, path: P) -> IoResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_obj(mesh, &mut writer)?;
    writer.flush()?;

    info!(
        path = %path.display(),
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        "Saved OBJ"
    );
    Ok(())
}

/// Write a triangle mesh as OBJ text (`v` and `f` lines only).
///
/// # Errors
///
/// Returns [`IoError::InvalidIndex`] for an out-of-range face index, or an
/// I/O error from the writer.
pub fn write_obj<W: Write>(mesh: &IndexedMesh, mut writer: W) -> IoResult<()> {
    if let Some((face, index)) = mesh.first_invalid_index() {
        return Err(IoError::InvalidIndex {
            face,
            index: i64::from(index),
            vertex_count: mesh.vertices.len(),
        });
    }

    for v in &mesh.vertices {
        let p = &v.position;
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for &[a, b, c] in &mesh.faces {
        writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }
    Ok(())
}
