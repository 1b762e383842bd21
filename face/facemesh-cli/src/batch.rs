//! Folder batch.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use facemesh::batch::{BatchParams, SidecarDetector, process_folder};
use facemesh::io::CoordinateTransform;
use facemesh::topology::load_template;
use tracing::warn;

#[derive(Debug)]
pub struct BatchArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub template: PathBuf,
    pub frame: (u32, u32),
    pub sidecar_suffix: String,
    pub sequential: bool,
}

pub fn run(args: &BatchArgs) -> Result<()> {
    let adjacency = load_template(&args.template)
        .with_context(|| format!("loading template {}", args.template.display()))?;
    let detector = SidecarDetector::with_suffix(args.sidecar_suffix.clone());
    let params = BatchParams::default()
        .transform(CoordinateTransform::for_frame(args.frame.0, args.frame.1))
        .parallel(!args.sequential);

    let report = process_folder(
        &args.input,
        &args.output,
        &detector,
        Arc::new(adjacency),
        &params,
    )?;

    for mesh in &report.exported {
        println!(
            "{} -> {} ({} vertices, {} faces)",
            mesh.image.display(),
            mesh.output.display(),
            mesh.vertices,
            mesh.faces
        );
    }
    for image in &report.skipped {
        println!("{}: face not detected", image.display());
    }
    for failure in &report.failures {
        warn!(image = %failure.image.display(), "{}", failure.error);
        println!("{}: failed: {}", failure.image.display(), failure.error);
    }
    println!(
        "{} images: {} exported, {} skipped, {} failed",
        report.total(),
        report.exported.len(),
        report.skipped.len(),
        report.failures.len()
    );
    Ok(())
}
