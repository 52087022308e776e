//! # Detector Module
//!
//! Finds the shared slide inside a meeting screenshot and crops to it.
//!
//! ## How It Works
//! 1. Convert to grayscale
//! 2. Gaussian blur (5x5 equivalent) to knock out compression noise
//! 3. Canny edges with hysteresis thresholds 50 / 150
//! 4. Trace outer contours, ignoring anything nested inside another contour
//! 5. Keep contours that simplify to 4+ vertices, enclose more than 20% of
//!    the image and have a bounding box aspect ratio in (0.5, 3.0)
//! 6. Crop the original image to the bounding box of the largest survivor
//!
//! Detection is a pure function of the pixels: no I/O, no shared state.
//! A miss is an ordinary result, not an error; callers typically use
//! [`CropOutcome::or_original`] to fall back to the full screenshot.
//!
//! ## Example
//! ```rust,ignore
//! use slidecrop::core::detector::detect;
//!
//! let page = detect(&screenshot).or_original(&screenshot);
//! ```

mod geometry;
mod outcome;
mod params;
mod region;

pub use outcome::{CandidateRegion, CropOutcome, MissReason, Region};
pub use params::*;
pub use region::RegionDetector;

use image::DynamicImage;

/// Run the detector with default parameters
pub fn detect(image: &DynamicImage) -> CropOutcome {
    RegionDetector::default().detect(image)
}
