//! # Pipeline Module
//!
//! Turns a folder of meeting screenshots into one PDF.
//!
//! ## Pipeline Stages
//! 1. **Collect** - Find images and order them by capture time
//! 2. **Process** - Decode each image and, optionally, crop it to the slide
//! 3. **Write** - Place every image on its own A4 page and save the PDF
//!
//! ## Parallelism
//! Images are decoded and cropped in parallel with rayon, a batch at a time,
//! so only `batch_size` full-resolution screenshots are in memory at once.

mod executor;
mod sources;

pub use executor::{
    Pipeline, PipelineBuilder, PipelineConfig, PipelineResult, DEFAULT_BATCH_SIZE,
};
pub use sources::{collect_sources, output_file_name, CollectedSources, ImageSource};
