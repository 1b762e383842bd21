//! Folder-level batch processing.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use face_io::{CoordinateTransform, export_landmarks};
use face_topology::{EdgeAdjacency, build_faces};
use face_types::landmarks_from_positions;
use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::detector::LandmarkDetector;
use crate::error::{BatchError, BatchResult, ImageError, ImageFailure};

/// Extensions (lowercase) treated as images.
pub const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff", "webp"];

/// Whether `path` has a recognized image extension (case-insensitive).
#[must_use]
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

/// Parameters for [`process_folder`].
///
/// # Example
///
/// ```
/// use face_batch::BatchParams;
/// use face_io::CoordinateTransform;
///
/// let params = BatchParams::default()
///     .transform(CoordinateTransform::for_frame(1280, 720))
///     .parallel(false);
/// assert!(!params.parallel);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchParams {
    /// Mapping from detector space to the exported mesh frame.
    pub transform: CoordinateTransform,

    /// Process images on the rayon thread pool. Results are identical
    /// either way; sequential runs are easier to debug.
    pub parallel: bool,
}

impl Default for BatchParams {
    fn default() -> Self {
        Self {
            transform: CoordinateTransform::default(),
            parallel: true,
        }
    }
}

impl BatchParams {
    /// Set the export coordinate transform.
    #[must_use]
    pub const fn transform(mut self, transform: CoordinateTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Enable or disable parallel processing.
    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// One exported mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedMesh {
    /// Source image.
    pub image: PathBuf,
    /// Written OBJ file.
    pub output: PathBuf,
    /// Number of landmarks written as vertices.
    pub vertices: usize,
    /// Number of triangles written.
    pub faces: usize,
}

/// Outcome of a batch run. Entries are in file name order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Images that produced a mesh.
    pub exported: Vec<ExportedMesh>,
    /// Images in which no face was detected.
    pub skipped: Vec<PathBuf>,
    /// Images that failed; the batch continued past them.
    pub failures: Vec<ImageFailure>,
}

impl BatchReport {
    /// Number of images considered.
    #[must_use]
    pub fn total(&self) -> usize {
        self.exported.len() + self.skipped.len() + self.failures.len()
    }

    /// Whether no image failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// An image paired with the output it will be written to.
struct Job {
    image: PathBuf,
    output: PathBuf,
    /// Earlier image that already claimed `output`.
    claimed_by: Option<PathBuf>,
}

enum ImageOutcome {
    Exported(ExportedMesh),
    Skipped(PathBuf),
    Failed(ImageFailure),
}

/// Turn every image in `input_dir` into `<output_dir>/<stem>.obj`.
///
/// Each image is run through `detector`; the landmarks are triangulated
/// with the shared `adjacency` template and exported with
/// `params.transform`. Images without a face are skipped. A failing image
/// is recorded in the report and does not stop the batch.
///
/// Files are visited in file name order; only files with an
/// [image extension](IMAGE_EXTENSIONS) are considered. When several images
/// share a stem (`a.png`, `a.jpg`) the first in file name order owns
/// `<stem>.obj` and the others fail with [`ImageError::DuplicateOutput`].
///
/// # Errors
///
/// - [`BatchError::InputDir`] if `input_dir` cannot be listed
/// - [`BatchError::OutputDir`] if `output_dir` cannot be created
pub fn process_folder<D: LandmarkDetector + ?Sized>(
    input_dir: &Path,
    output_dir: &Path,
    detector: &D,
    adjacency: Arc<EdgeAdjacency>,
    params: &BatchParams,
) -> BatchResult<BatchReport> {
    let images = list_images(input_dir)?;
    fs::create_dir_all(output_dir).map_err(|source| BatchError::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    info!(
        input = %input_dir.display(),
        output = %output_dir.display(),
        images = images.len(),
        parallel = params.parallel,
        "Starting batch"
    );

    let jobs = plan_outputs(images, output_dir);
    let run = |job: &Job| process_image(job, detector, &adjacency, params);
    let outcomes: Vec<ImageOutcome> = if params.parallel {
        jobs.par_iter().map(run).collect()
    } else {
        jobs.iter().map(run).collect()
    };

    let mut report = BatchReport::default();
    for outcome in outcomes {
        match outcome {
            ImageOutcome::Exported(mesh) => report.exported.push(mesh),
            ImageOutcome::Skipped(image) => report.skipped.push(image),
            ImageOutcome::Failed(failure) => report.failures.push(failure),
        }
    }

    info!(
        exported = report.exported.len(),
        skipped = report.skipped.len(),
        failed = report.failures.len(),
        "Batch complete"
    );
    Ok(report)
}

fn list_images(input_dir: &Path) -> BatchResult<Vec<PathBuf>> {
    let input_err = |source| BatchError::InputDir {
        path: input_dir.to_path_buf(),
        source,
    };

    let mut images = Vec::new();
    for entry in fs::read_dir(input_dir).map_err(input_err)? {
        let path = entry.map_err(input_err)?.path();
        if path.is_file() && is_image(&path) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// Output path for `image`: `<output_dir>/<stem>.obj`.
fn output_path(image: &Path, output_dir: &Path) -> PathBuf {
    let stem = image.file_stem().unwrap_or(image.as_os_str());
    output_dir.join(format!("{}.obj", stem.to_string_lossy()))
}

/// Assign outputs in listing order; the first image to reach a path owns it.
fn plan_outputs(images: Vec<PathBuf>, output_dir: &Path) -> Vec<Job> {
    let mut owners: HashMap<PathBuf, PathBuf> = HashMap::with_capacity(images.len());
    images
        .into_iter()
        .map(|image| {
            let output = output_path(&image, output_dir);
            let claimed_by = match owners.entry(output.clone()) {
                Entry::Occupied(owner) => Some(owner.get().clone()),
                Entry::Vacant(slot) => {
                    slot.insert(image.clone());
                    None
                }
            };
            Job {
                image,
                output,
                claimed_by,
            }
        })
        .collect()
}

fn process_image<D: LandmarkDetector + ?Sized>(
    job: &Job,
    detector: &D,
    adjacency: &EdgeAdjacency,
    params: &BatchParams,
) -> ImageOutcome {
    let image = job.image.as_path();
    let result = match &job.claimed_by {
        Some(owner) => Err(ImageError::DuplicateOutput {
            output: job.output.clone(),
            owner: owner.clone(),
        }),
        None => export_image(image, &job.output, detector, adjacency, params),
    };
    match result {
        Ok(Some(mesh)) => ImageOutcome::Exported(mesh),
        Ok(None) => {
            warn!(image = %image.display(), "Face not detected, skipping");
            ImageOutcome::Skipped(image.to_path_buf())
        }
        Err(error) => {
            warn!(image = %image.display(), error = %error, "Image failed");
            ImageOutcome::Failed(ImageFailure {
                image: image.to_path_buf(),
                error,
            })
        }
    }
}

fn export_image<D: LandmarkDetector + ?Sized>(
    image: &Path,
    output: &Path,
    detector: &D,
    adjacency: &EdgeAdjacency,
    params: &BatchParams,
) -> Result<Option<ExportedMesh>, ImageError> {
    let Some(points) = detector.detect(image)? else {
        return Ok(None);
    };

    let landmarks = landmarks_from_positions(&points);
    let faces = build_faces(&landmarks, adjacency);

    export_landmarks(&landmarks, &faces, &params.transform, output)?;
    debug!(
        image = %image.display(),
        vertices = landmarks.len(),
        faces = faces.len(),
        "Image exported"
    );

    Ok(Some(ExportedMesh {
        image: image.to_path_buf(),
        output: output.to_path_buf(),
        vertices: landmarks.len(),
        faces: faces.len(),
    }))
}
