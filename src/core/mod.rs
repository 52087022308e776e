//! # Core Module
//!
//! The UI-agnostic screenshot-to-PDF engine.
//!
//! ## Modules
//! - `scanner` - Finds screenshots in a folder and orders them
//! - `decode` - Loads image files into memory
//! - `detector` - Locates the shared slide inside a screenshot
//! - `layout` - Fits an image onto an A4 page
//! - `document` - Writes pages into a PDF
//! - `pipeline` - Orchestrates the full workflow

pub mod decode;
pub mod detector;
pub mod document;
pub mod layout;
pub mod pipeline;
pub mod scanner;

// Re-export commonly used types
pub use detector::{detect, CropOutcome, DetectorParams, MissReason, Region, RegionDetector};
pub use layout::{Orientation, PageConfig};
pub use pipeline::{ImageSource, Pipeline, PipelineResult};
pub use scanner::ImageFile;
