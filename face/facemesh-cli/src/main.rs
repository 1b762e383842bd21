//! facemesh command line tool
//!
//! Runs the reconstruction pipeline outside of a 3D editor.
//!
//! # Usage
//!
//! ```bash
//! # Landmark sidecars in renders/ to one OBJ per face in meshes/
//! facemesh batch renders meshes --template tesselation.json
//!
//! # A single landmark file
//! facemesh build front.landmarks.json front.obj --template tesselation.json
//!
//! # Snap a mesh onto a head scan from a camera position
//! facemesh project front.obj head.obj --camera 0,0,5 --output conformed.obj
//!
//! # Quality report, as text or JSON
//! facemesh analyze conformed.obj --json
//! ```

mod analyze;
mod batch;
mod project;
mod reconstruct;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Face mesh reconstruction, projection and quality analysis
#[derive(Parser, Debug)]
#[command(name = "facemesh")]
#[command(author, version, about = "Face mesh reconstruction from landmarks", long_about = None)]
struct Cli {
    /// Logging verbosity level
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Turn every image with landmarks in a folder into an OBJ mesh
    Batch {
        /// Folder of rendered images and their landmark sidecars
        input: PathBuf,

        /// Folder for the exported meshes
        output: PathBuf,

        /// Adjacency template (JSON pairs or text)
        #[arg(short, long)]
        template: PathBuf,

        /// Capture frame width in pixels
        #[arg(long, default_value = "1920")]
        frame_width: u32,

        /// Capture frame height in pixels
        #[arg(long, default_value = "1080")]
        frame_height: u32,

        /// Suffix of landmark sidecar files
        #[arg(long, default_value = ".landmarks.json")]
        sidecar_suffix: String,

        /// Process images one at a time
        #[arg(long)]
        sequential: bool,
    },

    /// Build a mesh from one landmark file
    Build {
        /// Landmark JSON (array of [x, y, z] or {x, y, z})
        landmarks: PathBuf,

        /// Output OBJ path
        output: PathBuf,

        /// Adjacency template (JSON pairs or text)
        #[arg(short, long)]
        template: PathBuf,

        /// Capture frame width in pixels
        #[arg(long, default_value = "1920")]
        frame_width: u32,

        /// Capture frame height in pixels
        #[arg(long, default_value = "1080")]
        frame_height: u32,
    },

    /// Project a mesh onto a target surface and conform it
    Project {
        /// Mesh to project (OBJ)
        mesh: PathBuf,

        /// Target surface (OBJ)
        target: PathBuf,

        /// Output OBJ path (world space)
        #[arg(short, long)]
        output: PathBuf,

        /// Camera location the mesh is moved to
        #[arg(long, value_parser = parse_point, default_value = "0,0,5")]
        camera: [f64; 3],

        /// Point the camera looks at
        #[arg(long, value_parser = parse_point, default_value = "0,0,0")]
        look_at: [f64; 3],

        /// Re-casts allowed after hitting the projected mesh itself
        #[arg(long, default_value = "64")]
        max_self_hits: usize,

        /// Distance to step past a self hit
        #[arg(long, default_value = "0.0001")]
        epsilon: f64,

        /// Distance to keep from the target after conforming
        #[arg(long, default_value = "0")]
        offset: f64,

        /// Skip the shrinkwrap pass
        #[arg(long)]
        no_conform: bool,
    },

    /// Report mesh quality metrics
    Analyze {
        /// Mesh to analyze (OBJ)
        mesh: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Selected vertex indices for the density measure
        #[arg(long, value_delimiter = ',')]
        vertices: Vec<u32>,

        /// Selected face indices for the density measure
        #[arg(long, value_delimiter = ',')]
        faces: Vec<usize>,

        /// Flag faces above this aspect ratio
        #[arg(long, default_value = "5")]
        max_aspect_ratio: f64,

        /// Flag faces above this skewness
        #[arg(long, default_value = "0.85")]
        max_skewness: f64,
    },
}

/// Parse `x,y,z` into a coordinate triple.
fn parse_point(s: &str) -> Result<[f64; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z, got '{s}'"));
    };
    let parse = |v: &str| v.parse::<f64>().map_err(|e| format!("'{v}': {e}"));
    Ok([parse(*x)?, parse(*y)?, parse(*z)?])
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("facemesh v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Batch {
            input,
            output,
            template,
            frame_width,
            frame_height,
            sidecar_suffix,
            sequential,
        } => batch::run(&batch::BatchArgs {
            input,
            output,
            template,
            frame: (frame_width, frame_height),
            sidecar_suffix,
            sequential,
        }),
        Commands::Build {
            landmarks,
            output,
            template,
            frame_width,
            frame_height,
        } => reconstruct::run(&landmarks, &output, &template, (frame_width, frame_height)),
        Commands::Project {
            mesh,
            target,
            output,
            camera,
            look_at,
            max_self_hits,
            epsilon,
            offset,
            no_conform,
        } => project::run(&project::ProjectArgs {
            mesh,
            target,
            output,
            camera,
            look_at,
            max_self_hits,
            epsilon,
            offset,
            conform: !no_conform,
        }),
        Commands::Analyze {
            mesh,
            json,
            vertices,
            faces,
            max_aspect_ratio,
            max_skewness,
        } => analyze::run(&analyze::AnalyzeArgs {
            mesh,
            json,
            vertices,
            faces,
            max_aspect_ratio,
            max_skewness,
        }),
    }
}
