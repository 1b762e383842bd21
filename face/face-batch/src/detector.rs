//! Landmark detection contract and a file-backed detector.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use face_types::Point3;
use serde::Deserialize;
use tracing::debug;

use crate::error::DetectError;

/// Produces an ordered landmark set for an image.
///
/// Implementations are shared across worker threads.
pub trait LandmarkDetector: Send + Sync {
    /// Detect landmarks in `image`.
    ///
    /// Returns `Ok(None)` if the image contains no face. Positions are in
    /// normalized image space: `x` and `y` in `[0, 1]` with `y` growing
    /// downward, `z` a relative depth.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError`] if the image or the detector's input cannot
    /// be processed.
    fn detect(&self, image: &Path) -> Result<Option<Vec<Point3<f64>>>, DetectError>;
}

impl<T: LandmarkDetector + ?Sized> LandmarkDetector for &T {
    fn detect(&self, image: &Path) -> Result<Option<Vec<Point3<f64>>>, DetectError> {
        (**self).detect(image)
    }
}

/// Reads landmarks precomputed by an external detector.
///
/// For `renders/front.png` the landmarks are read from
/// `renders/front.landmarks.json`, a JSON array of `[x, y, z]` triples or
/// `{"x": .., "y": .., "z": ..}` objects. A missing sidecar or an empty
/// array means no face was detected.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use face_batch::SidecarDetector;
///
/// let detector = SidecarDetector::default();
/// assert_eq!(
///     detector.sidecar_path(Path::new("renders/front.png")),
///     Path::new("renders/front.landmarks.json")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarDetector {
    suffix: String,
}

impl Default for SidecarDetector {
    fn default() -> Self {
        Self {
            suffix: ".landmarks.json".to_string(),
        }
    }
}

impl SidecarDetector {
    /// Use a custom sidecar suffix appended to the image stem.
    #[must_use]
    pub fn with_suffix(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    /// Path of the sidecar file for `image`.
    #[must_use]
    pub fn sidecar_path(&self, image: &Path) -> PathBuf {
        let stem = image
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        image.with_file_name(format!("{stem}{}", self.suffix))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SidecarPoint {
    Triple([f64; 3]),
    Named { x: f64, y: f64, z: f64 },
}

impl From<SidecarPoint> for Point3<f64> {
    fn from(point: SidecarPoint) -> Self {
        match point {
            SidecarPoint::Triple([x, y, z]) | SidecarPoint::Named { x, y, z } => {
                Self::new(x, y, z)
            }
        }
    }
}

/// Parse a sidecar document. An empty array is `None`.
///
/// # Errors
///
/// Returns [`DetectError::Malformed`] (reported against `path`) if the
/// document is not an array of points or a coordinate is not finite.
pub fn parse_sidecar(json: &str, path: &Path) -> Result<Option<Vec<Point3<f64>>>, DetectError> {
    let points: Vec<SidecarPoint> =
        serde_json::from_str(json).map_err(|e| DetectError::malformed(path, e.to_string()))?;
    if points.is_empty() {
        return Ok(None);
    }

    let points: Vec<Point3<f64>> = points.into_iter().map(Point3::from).collect();
    if let Some(i) = points.iter().position(|p| !p.coords.iter().all(|c| c.is_finite())) {
        return Err(DetectError::malformed(
            path,
            format!("landmark {i} has a non-finite coordinate"),
        ));
    }
    Ok(Some(points))
}

impl LandmarkDetector for SidecarDetector {
    fn detect(&self, image: &Path) -> Result<Option<Vec<Point3<f64>>>, DetectError> {
        let sidecar = self.sidecar_path(image);
        let json = match fs::read_to_string(&sidecar) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(sidecar = %sidecar.display(), "No sidecar, no face");
                return Ok(None);
            }
            Err(source) => {
                return Err(DetectError::Read {
                    path: sidecar,
                    source,
                });
            }
        };
        parse_sidecar(&json, &sidecar)
    }
}
