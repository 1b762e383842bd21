//! Quality report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use facemesh::io::load_mesh;
use facemesh::quality::{QualityThresholds, Selection, analyze_mesh};

#[derive(Debug)]
pub struct AnalyzeArgs {
    pub mesh: PathBuf,
    pub json: bool,
    pub vertices: Vec<u32>,
    pub faces: Vec<usize>,
    pub max_aspect_ratio: f64,
    pub max_skewness: f64,
}

impl AnalyzeArgs {
    fn selection(&self) -> Option<Selection> {
        if self.vertices.is_empty() && self.faces.is_empty() {
            return None;
        }
        Some(
            Selection::new()
                .with_vertices(self.vertices.iter().copied())
                .with_faces(self.faces.iter().copied()),
        )
    }
}

pub fn run(args: &AnalyzeArgs) -> Result<()> {
    let mesh = load_mesh(&args.mesh)
        .with_context(|| format!("loading {}", args.mesh.display()))?;
    let selection = args.selection();
    let report = analyze_mesh(&mesh, selection.as_ref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{report}");
    let thresholds = QualityThresholds::default()
        .max_aspect_ratio(args.max_aspect_ratio)
        .max_skewness(args.max_skewness);
    let flagged = report.flagged_faces(&thresholds);
    if !flagged.is_empty() {
        println!();
        println!(
            "  {} faces above aspect ratio {} or skewness {}:",
            flagged.len(),
            thresholds.max_aspect_ratio,
            thresholds.max_skewness
        );
        for face in flagged {
            let q = &report.faces[face];
            println!(
                "    face {face}: aspect {:.3}, skewness {:.3}",
                q.aspect_ratio, q.skewness
            );
        }
    }
    Ok(())
}
