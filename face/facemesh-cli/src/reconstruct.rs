//! Single landmark file to OBJ.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use facemesh::batch::parse_sidecar;
use facemesh::io::{CoordinateTransform, export_landmarks};
use facemesh::topology::{build_faces, load_template};
use facemesh::types::landmarks_from_positions;
use tracing::info;

pub fn run(landmarks: &Path, output: &Path, template: &Path, frame: (u32, u32)) -> Result<()> {
    let adjacency = load_template(template)
        .with_context(|| format!("loading template {}", template.display()))?;
    let json = fs::read_to_string(landmarks)
        .with_context(|| format!("reading {}", landmarks.display()))?;
    let Some(points) = parse_sidecar(&json, landmarks)? else {
        bail!("{} contains no landmarks", landmarks.display());
    };

    let landmarks = landmarks_from_positions(&points);
    let faces = build_faces(&landmarks, &adjacency);
    let transform = CoordinateTransform::for_frame(frame.0, frame.1);
    export_landmarks(&landmarks, &faces, &transform, output)
        .with_context(|| format!("writing {}", output.display()))?;

    info!(
        vertices = landmarks.len(),
        faces = faces.len(),
        output = %output.display(),
        "Mesh built"
    );
    println!(
        "{}: {} vertices, {} faces",
        output.display(),
        landmarks.len(),
        faces.len()
    );
    Ok(())
}
