//! Landmark mesh export.
//!
//! Landmarks arrive in normalized image space (`x`, `y` in `[0, 1]`, `y`
//! growing downward, `z` a depth where smaller is closer). The exporter
//! re-centers them on the frame and flips `y` and `z` so the mesh lines up
//! with an orthographic capture camera of scale 1 looking down `-Z`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use face_types::{Landmark, Point3};
use tracing::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{IoError, IoResult};

/// Mapping from normalized landmark space to capture-frame space.
///
/// `x' = (x - 0.5) * scale_x`, `y' = (y - 0.5) * scale_y`, `z' = -z`.
///
/// # Example
///
/// ```
/// use face_io::CoordinateTransform;
/// use face_types::Point3;
///
/// let t = CoordinateTransform::default();
/// let p = t.apply(&Point3::new(1.0, 0.0, 0.25));
/// assert_eq!(p, Point3::new(0.5, 0.28125, -0.25));
///
/// assert_eq!(CoordinateTransform::for_frame(1920, 1080), t);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoordinateTransform {
    /// Scale applied to the centered `x` coordinate.
    pub scale_x: f64,
    /// Scale applied to the centered `y` coordinate. Negative to flip image
    /// rows into an upward axis.
    pub scale_y: f64,
}

impl Default for CoordinateTransform {
    /// 1920x1080 frame, orthographic scale 1.
    fn default() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: -0.5625,
        }
    }
}

impl CoordinateTransform {
    /// Create a transform with explicit scales.
    #[must_use]
    pub const fn new(scale_x: f64, scale_y: f64) -> Self {
        Self { scale_x, scale_y }
    }

    /// Identity-like transform: centers the frame and flips nothing but `z`.
    #[must_use]
    pub const fn unit() -> Self {
        Self::new(1.0, 1.0)
    }

    /// Transform for a `width x height` frame at orthographic scale 1.
    ///
    /// The frame's long side spans one unit horizontally; `y` is scaled by
    /// the aspect ratio and flipped.
    #[must_use]
    pub fn for_frame(width: u32, height: u32) -> Self {
        let aspect = if width == 0 {
            0.0
        } else {
            f64::from(height) / f64::from(width)
        };
        Self::new(1.0, -aspect)
    }

    /// Map one landmark position.
    #[must_use]
    pub fn apply(&self, p: &Point3<f64>) -> Point3<f64> {
        Point3::new(
            (p.x - 0.5) * self.scale_x,
            (p.y - 0.5) * self.scale_y,
            -p.z,
        )
    }
}

/// Write a landmark mesh as OBJ to a file.
///
/// Writes one `v x y z` line per landmark in index order, then one
/// `f i j k` line per triangle with 1-based indices. No other directives are
/// emitted. An existing file is overwritten.
///
/// # Errors
///
/// Returns [`IoError::InvalidIndex`] if a face refers to a landmark index
/// that is not in `landmarks` (checked before the file is created), or an
/// I/O error if the file cannot be created or written. A partially written
/// file is left in place.
///
/// # Example
///
/// ```no_run
/// use face_io::{export_landmarks, CoordinateTransform};
/// use face_types::{landmarks_from_positions, Point3};
///
/// let landmarks = landmarks_from_positions(&[
///     Point3::new(0.4, 0.4, 0.0),
///     Point3::new(0.6, 0.4, 0.0),
///     Point3::new(0.5, 0.6, 0.0),
/// ]);
/// export_landmarks(&landmarks, &[[0, 1, 2]], &CoordinateTransform::default(), "face.obj").unwrap();
/// ```
pub fn export_landmarks<P: AsRef<Path>>(
    landmarks: &[Landmark],
    faces: &[[u32; 3]],
    transform: &CoordinateTransform,
    path: P,
) -> IoResult<()> {
    let path = path.as_ref();
    check_faces(faces, landmarks.len())?;

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_landmarks(landmarks, faces, transform, &mut writer)?;
    writer.flush()?;

    info!(
        path = %path.display(),
        vertices = landmarks.len(),
        faces = faces.len(),
        "Exported landmark mesh"
    );
    Ok(())
}

/// Write a landmark mesh as OBJ to any writer.
///
/// See [`export_landmarks`] for the output layout.
///
/// # Errors
///
/// Returns [`IoError::InvalidIndex`] for an out-of-range face index, or an
/// I/O error from the writer.
pub fn write_landmarks<W: Write>(
    landmarks: &[Landmark],
    faces: &[[u32; 3]],
    transform: &CoordinateTransform,
    mut writer: W,
) -> IoResult<()> {
    check_faces(faces, landmarks.len())?;

    let mut ordered: Vec<&Landmark> = landmarks.iter().collect();
    if !ordered.is_sorted_by_key(|l| l.index) {
        debug!("Landmarks out of index order, sorting before export");
        ordered.sort_by_key(|l| l.index);
    }

    for landmark in ordered {
        let p = transform.apply(&landmark.position);
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }

    for &[a, b, c] in faces {
        writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }

    Ok(())
}

fn check_faces(faces: &[[u32; 3]], vertex_count: usize) -> IoResult<()> {
    for (face, tri) in faces.iter().enumerate() {
        if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(IoError::InvalidIndex {
                face,
                index: i64::from(index),
                vertex_count,
            });
        }
    }
    Ok(())
}
