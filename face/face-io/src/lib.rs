//! Mesh file I/O for facemesh.
//!
//! The pipeline exchanges meshes as Wavefront OBJ:
//!
//! - [`export_landmarks`] - Landmark positions plus faces, mapped into the capture frame
//! - [`save_obj`] / [`write_obj`] - Any triangle mesh
//! - [`load_obj`] / [`read_obj`] - Polygon meshes with optional wire edges
//!
//! # Example
//!
//! ```no_run
//! use face_io::{export_landmarks, load_obj, CoordinateTransform};
//! use face_types::{landmarks_from_positions, Point3};
//!
//! let landmarks = landmarks_from_positions(&[
//!     Point3::new(0.4, 0.4, 0.0),
//!     Point3::new(0.6, 0.4, 0.0),
//!     Point3::new(0.5, 0.6, 0.0),
//! ]);
//! export_landmarks(&landmarks, &[[0, 1, 2]], &CoordinateTransform::default(), "face.obj").unwrap();
//!
//! let mesh = load_obj("face.obj").unwrap();
//! assert_eq!(mesh.faces.len(), 1);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod export;
mod obj;

pub use error::{IoError, IoResult};
pub use export::{CoordinateTransform, export_landmarks, write_landmarks};
pub use obj::{load_obj, read_obj, save_obj, write_obj};

use std::path::Path;

use face_types::{IndexedMesh, PolygonMesh};

/// Mesh file formats understood by [`load_mesh`] and [`save_mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// Wavefront OBJ, ASCII geometry.
    Obj,
}

impl MeshFormat {
    /// Format named by a path's extension, ignoring case.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        ext.eq_ignore_ascii_case("obj").then_some(Self::Obj)
    }

    /// Extension written for this format, without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Obj => "obj",
        }
    }

    fn require(path: &Path) -> IoResult<Self> {
        Self::from_path(path).ok_or_else(|| IoError::UnknownFormat {
            extension: path
                .extension()
                .map_or_else(|| "(none)".to_string(), |e| e.to_string_lossy().into_owned()),
        })
    }
}

/// Load a polygon mesh, picking the reader from the file extension.
///
/// # Errors
///
/// [`IoError::UnknownFormat`] for an unsupported extension, otherwise
/// whatever the format's reader reports.
pub fn load_mesh<P: AsRef<Path>>(path: P) -> IoResult<PolygonMesh> {
    let path = path.as_ref();
    match MeshFormat::require(path)? {
        MeshFormat::Obj => load_obj(path),
    }
}

/// Save a triangle mesh, picking the writer from the file extension.
///
/// # Errors
///
/// [`IoError::UnknownFormat`] for an unsupported extension, otherwise
/// whatever the format's writer reports.
pub fn save_mesh<P: AsRef<Path>>(mesh: &IndexedMesh, path: P) -> IoResult<()> {
    let path = path.as_ref();
    match MeshFormat::require(path)? {
        MeshFormat::Obj => save_obj(mesh, path),
    }
}
