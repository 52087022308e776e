//! Tunable thresholds for slide detection.
//!
//! The defaults were chosen empirically on Zoom/Meet/Teams screenshots.
//! Changing them changes which screenshots get cropped, so keep them in
//! sync with the tests in `tests/integration_detector.rs`.

use serde::{Deserialize, Serialize};

/// Side of the square Gaussian kernel used to suppress noise
pub const DEFAULT_BLUR_KERNEL_SIZE: u32 = 5;

/// Gradient magnitude above which a pixel may continue an edge
pub const DEFAULT_CANNY_LOW: f32 = 50.0;

/// Gradient magnitude above which a pixel starts an edge
pub const DEFAULT_CANNY_HIGH: f32 = 150.0;

/// Polygon simplification tolerance as a fraction of the contour perimeter
pub const DEFAULT_APPROX_EPSILON_RATIO: f64 = 0.02;

/// Minimum vertex count of the simplified contour
pub const DEFAULT_MIN_VERTICES: usize = 4;

/// Minimum contour area as a fraction of the whole image
pub const DEFAULT_MIN_AREA_RATIO: f64 = 0.20;

/// Exclusive lower bound of the bounding box width / height
pub const DEFAULT_MIN_ASPECT_RATIO: f64 = 0.5;

/// Exclusive upper bound of the bounding box width / height
pub const DEFAULT_MAX_ASPECT_RATIO: f64 = 3.0;

/// Parameters for [`super::RegionDetector`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorParams {
    /// Gaussian kernel size (odd). Sigma is derived from it.
    pub blur_kernel_size: u32,
    /// Canny hysteresis low threshold
    pub canny_low: f32,
    /// Canny hysteresis high threshold
    pub canny_high: f32,
    /// Douglas-Peucker tolerance, relative to the perimeter
    pub approx_epsilon_ratio: f64,
    /// Simplified contours with fewer vertices are rejected
    pub min_vertices: usize,
    /// Contours enclosing no more than this share of the image are rejected
    pub min_area_ratio: f64,
    /// Aspect ratio must be strictly greater than this
    pub min_aspect_ratio: f64,
    /// Aspect ratio must be strictly less than this
    pub max_aspect_ratio: f64,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            blur_kernel_size: DEFAULT_BLUR_KERNEL_SIZE,
            canny_low: DEFAULT_CANNY_LOW,
            canny_high: DEFAULT_CANNY_HIGH,
            approx_epsilon_ratio: DEFAULT_APPROX_EPSILON_RATIO,
            min_vertices: DEFAULT_MIN_VERTICES,
            min_area_ratio: DEFAULT_MIN_AREA_RATIO,
            min_aspect_ratio: DEFAULT_MIN_ASPECT_RATIO,
            max_aspect_ratio: DEFAULT_MAX_ASPECT_RATIO,
        }
    }
}

impl DetectorParams {
    /// Gaussian sigma for the configured kernel size.
    ///
    /// Same derivation OpenCV applies when sigma is left at zero:
    /// `0.3 * ((k - 1) * 0.5 - 1) + 0.8`, which is 1.1 for a 5x5 kernel.
    pub fn blur_sigma(&self) -> f32 {
        0.3 * ((self.blur_kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
    }

    /// Check that every stage can run with these values
    pub fn validate(&self) -> Result<(), String> {
        if self.blur_kernel_size == 0 || self.blur_kernel_size % 2 == 0 {
            return Err(format!(
                "blur kernel size must be odd, got {}",
                self.blur_kernel_size
            ));
        }
        if !(self.canny_low >= 0.0 && self.canny_low <= self.canny_high) {
            return Err(format!(
                "canny thresholds must satisfy 0 <= low <= high, got {} and {}",
                self.canny_low, self.canny_high
            ));
        }
        if !(self.approx_epsilon_ratio > 0.0) {
            return Err("approximation tolerance must be positive".to_string());
        }
        if !(0.0..1.0).contains(&self.min_area_ratio) {
            return Err(format!(
                "minimum area ratio must be in [0, 1), got {}",
                self.min_area_ratio
            ));
        }
        if !(self.min_aspect_ratio >= 0.0 && self.min_aspect_ratio < self.max_aspect_ratio) {
            return Err(format!(
                "aspect ratio bounds are empty: ({}, {})",
                self.min_aspect_ratio, self.max_aspect_ratio
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(DetectorParams::default().validate().is_ok());
    }

    #[test]
    fn five_by_five_kernel_gives_sigma_1_1() {
        let sigma = DetectorParams::default().blur_sigma();
        assert!((sigma - 1.1).abs() < 1e-6);
    }

    #[test]
    fn even_kernel_is_rejected() {
        let params = DetectorParams {
            blur_kernel_size: 4,
            ..Default::default()
        };
        assert!(params.validate().unwrap_err().contains("odd"));
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let params = DetectorParams {
            canny_low: 200.0,
            canny_high: 100.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn empty_aspect_window_is_rejected() {
        let params = DetectorParams {
            min_aspect_ratio: 2.0,
            max_aspect_ratio: 2.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }
}
