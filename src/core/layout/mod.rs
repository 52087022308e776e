//! # Layout Module
//!
//! Page geometry for the output document. All lengths are millimetres with
//! the origin at the top-left corner of the page.

use serde::{Deserialize, Serialize};

/// A4 short side in millimetres
pub const A4_SHORT_MM: f64 = 210.0;
/// A4 long side in millimetres
pub const A4_LONG_MM: f64 = 297.0;
/// Margin kept clear on every side by default
pub const DEFAULT_MARGIN_MM: f64 = 10.0;
/// JPEG quality used when embedding page images
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Portrait => write!(f, "portrait"),
            Orientation::Landscape => write!(f, "landscape"),
        }
    }
}

/// Physical page size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PageSize {
    /// A4 in the given orientation
    pub fn a4(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Portrait => Self {
                width_mm: A4_SHORT_MM,
                height_mm: A4_LONG_MM,
            },
            Orientation::Landscape => Self {
                width_mm: A4_LONG_MM,
                height_mm: A4_SHORT_MM,
            },
        }
    }
}

/// Where an image lands on its page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

/// Page settings for a whole document
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub orientation: Orientation,
    pub margin_mm: f64,
    /// 1-100; higher keeps slide text crisper at the cost of file size
    pub jpeg_quality: u8,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Portrait,
            margin_mm: DEFAULT_MARGIN_MM,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl PageConfig {
    pub fn page_size(&self) -> PageSize {
        PageSize::a4(self.orientation)
    }

    pub fn validate(&self) -> Result<(), String> {
        let page = self.page_size();
        if !(self.margin_mm >= 0.0) || self.margin_mm * 2.0 >= page.width_mm.min(page.height_mm) {
            return Err(format!(
                "margin of {}mm leaves no room on a {}x{}mm page",
                self.margin_mm, page.width_mm, page.height_mm
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(format!(
                "JPEG quality must be between 1 and 100, got {}",
                self.jpeg_quality
            ));
        }
        Ok(())
    }

    /// Placement of a `width` x `height` pixel image on one page
    pub fn place(&self, width: u32, height: u32) -> Placement {
        fit(self.page_size(), self.margin_mm, width, height)
    }
}

/// Scale an image uniformly to fit inside the margins and center it.
///
/// The image is scaled up as well as down; one axis always touches the margin.
pub fn fit(page: PageSize, margin_mm: f64, width: u32, height: u32) -> Placement {
    let max_width = page.width_mm - 2.0 * margin_mm;
    let max_height = page.height_mm - 2.0 * margin_mm;

    let scale = (max_width / width.max(1) as f64).min(max_height / height.max(1) as f64);
    let width_mm = width as f64 * scale;
    let height_mm = height as f64 * scale;

    Placement {
        x_mm: (page.width_mm - width_mm) / 2.0,
        y_mm: (page.height_mm - height_mm) / 2.0,
        width_mm,
        height_mm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn a4_orientations() {
        let portrait = PageSize::a4(Orientation::Portrait);
        let landscape = PageSize::a4(Orientation::Landscape);
        assert_eq!((portrait.width_mm, portrait.height_mm), (210.0, 297.0));
        assert_eq!((landscape.width_mm, landscape.height_mm), (297.0, 210.0));
    }

    #[test]
    fn wide_image_on_portrait_is_width_bound() {
        let placement = fit(PageSize::a4(Orientation::Portrait), 10.0, 1920, 1080);

        assert!(close(placement.width_mm, 190.0));
        assert!(close(placement.height_mm, 190.0 * 1080.0 / 1920.0));
        assert!(close(placement.x_mm, 10.0));
        assert!(close(placement.y_mm, (297.0 - placement.height_mm) / 2.0));
    }

    #[test]
    fn wide_image_on_landscape_is_height_bound_when_tall_enough() {
        let placement = fit(PageSize::a4(Orientation::Landscape), 10.0, 1000, 1000);

        assert!(close(placement.height_mm, 190.0));
        assert!(close(placement.width_mm, 190.0));
        assert!(close(placement.x_mm, (297.0 - 190.0) / 2.0));
        assert!(close(placement.y_mm, 10.0));
    }

    #[test]
    fn small_images_are_scaled_up() {
        let placement = fit(PageSize::a4(Orientation::Landscape), 10.0, 16, 9);
        assert!(close(placement.width_mm, 277.0));
        assert!(placement.height_mm <= 190.0);
    }

    #[test]
    fn placement_preserves_aspect_ratio() {
        let placement = PageConfig::default().place(1366, 768);
        assert!(close(
            placement.width_mm / placement.height_mm,
            1366.0 / 768.0
        ));
    }

    #[test]
    fn oversized_margin_is_rejected() {
        let config = PageConfig {
            margin_mm: 110.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(PageConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_quality_is_rejected() {
        let config = PageConfig {
            jpeg_quality: 0,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("quality"));
    }
}
