#![forbid(unsafe_code)]

//! Batch generator of labelled text-phrase images for OCR/CTC training.
//!
//! One run renders N visually-perturbed rasters of a single phrase and
//! appends one tab-separated ground-truth line per image. Every stage draws
//! from one seeded [`SampleRng`] in a fixed order, so a run is reproducible
//! from its seed and arguments alone.

pub mod blur;
pub mod canvas;
pub mod color;
pub mod error;
pub mod font;
pub mod geometry;
pub mod markup;
pub mod pipeline;
pub mod post;
pub mod raster;
pub mod rng;
pub mod scene;

/// Samples land in a subdirectory of the output root named after the tool.
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

pub use canvas::Canvas;
pub use color::{ColorScheme, Rgb};
pub use error::{SamplerError, SamplerResult};
pub use font::{FontCatalog, TextMetrics};
pub use geometry::GeometryPlan;
pub use markup::MarkupWriter;
pub use pipeline::{GenerateConfig, SampleDriver, SampleImage, SampleOutput, generate_sample};
pub use rng::SampleRng;
