//! Batch pipeline for facemesh: a folder of rendered images in, one
//! landmark mesh per detected face out.
//!
//! Detection is delegated to a [`LandmarkDetector`]; the crate ships
//! [`SidecarDetector`], which reads landmarks an external model wrote next
//! to each image. The adjacency template is loaded once and shared by all
//! worker threads.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use face_batch::{process_folder, BatchParams, SidecarDetector};
//! use face_topology::load_template;
//!
//! let adjacency = Arc::new(load_template("tesselation.json").unwrap());
//! let report = process_folder(
//!     Path::new("renders"),
//!     Path::new("meshes"),
//!     &SidecarDetector::default(),
//!     adjacency,
//!     &BatchParams::default(),
//! )
//! .unwrap();
//!
//! println!("{} meshes, {} without a face", report.exported.len(), report.skipped.len());
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod detector;
mod error;
mod pipeline;

pub use detector::{LandmarkDetector, SidecarDetector, parse_sidecar};
pub use error::{BatchError, BatchResult, DetectError, ImageError, ImageFailure};
pub use pipeline::{
    BatchParams, BatchReport, ExportedMesh, IMAGE_EXTENSIONS, is_image, process_folder,
};
