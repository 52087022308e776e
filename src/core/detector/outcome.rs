//! Detection results and the fallback combinator.

use image::{DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Axis-aligned pixel rectangle inside the source image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Width divided by height
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Number of pixels covered
    pub fn pixel_area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Shrink by `by` pixels on every side; `None` if nothing is left
    pub fn inset(&self, by: u32) -> Option<Region> {
        let width = self.width.checked_sub(by.saturating_mul(2)).filter(|w| *w > 0)?;
        let height = self.height.checked_sub(by.saturating_mul(2)).filter(|h| *h > 0)?;
        Some(Region {
            x: self.x + by,
            y: self.y + by,
            width,
            height,
        })
    }
}

/// A contour that passed every geometric filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateRegion {
    /// Bounding box of the contour
    pub bounds: Region,
    /// Area enclosed by the raw contour
    pub area: f64,
    /// `bounds.width / bounds.height`
    pub aspect_ratio: f64,
}

/// Why no slide could be cut out of a screenshot
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MissReason {
    #[error("image has no pixels")]
    EmptyImage,

    #[error("image is {width}x{height}, too small to blur")]
    TooSmall { width: u32, height: u32 },

    #[error("no edges found")]
    NoEdges,

    #[error("no large, roughly rectangular region found")]
    NoCandidate,

    #[error("detection aborted: {0}")]
    Transform(String),
}

/// Result of running the detector on one image
#[derive(Debug, Clone)]
pub enum CropOutcome {
    /// The slide region, cut out of the original pixels
    Cropped { image: RgbImage, region: Region },
    /// Nothing suitable was found
    Unavailable(MissReason),
}

impl CropOutcome {
    pub fn is_cropped(&self) -> bool {
        matches!(self, CropOutcome::Cropped { .. })
    }

    /// Where the crop was taken from, if any
    pub fn region(&self) -> Option<Region> {
        match self {
            CropOutcome::Cropped { region, .. } => Some(*region),
            CropOutcome::Unavailable(_) => None,
        }
    }

    pub fn miss_reason(&self) -> Option<&MissReason> {
        match self {
            CropOutcome::Cropped { .. } => None,
            CropOutcome::Unavailable(reason) => Some(reason),
        }
    }

    /// The cropped image, discarding the miss reason
    pub fn into_image(self) -> Option<RgbImage> {
        match self {
            CropOutcome::Cropped { image, .. } => Some(image),
            CropOutcome::Unavailable(_) => None,
        }
    }

    /// The cropped image, or the whole original when detection missed
    pub fn or_original(self, original: &DynamicImage) -> RgbImage {
        match self {
            CropOutcome::Cropped { image, .. } => image,
            CropOutcome::Unavailable(_) => original.to_rgb8(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn region_aspect_ratio() {
        let region = Region {
            x: 0,
            y: 0,
            width: 1600,
            height: 900,
        };
        assert!((region.aspect_ratio() - 16.0 / 9.0).abs() < 1e-9);
        assert_eq!(region.pixel_area(), 1_440_000);
    }

    #[test]
    fn inset_shrinks_every_side() {
        let region = Region {
            x: 79,
            y: 59,
            width: 242,
            height: 182,
        };
        assert_eq!(
            region.inset(1),
            Some(Region {
                x: 80,
                y: 60,
                width: 240,
                height: 180
            })
        );
        assert_eq!(region.inset(91), None);
    }

    #[test]
    fn unavailable_falls_back_to_original() {
        let original = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, Rgb([1, 2, 3])));
        let outcome = CropOutcome::Unavailable(MissReason::NoCandidate);

        assert!(!outcome.is_cropped());
        assert_eq!(outcome.miss_reason(), Some(&MissReason::NoCandidate));

        let page = outcome.or_original(&original);
        assert_eq!(page.dimensions(), (4, 3));
        assert_eq!(page.get_pixel(3, 2), &Rgb([1, 2, 3]));
    }

    #[test]
    fn cropped_ignores_original() {
        let original = DynamicImage::new_rgb8(10, 10);
        let region = Region {
            x: 1,
            y: 1,
            width: 2,
            height: 2,
        };
        let outcome = CropOutcome::Cropped {
            image: RgbImage::new(2, 2),
            region,
        };

        assert_eq!(outcome.region(), Some(region));
        assert_eq!(outcome.or_original(&original).dimensions(), (2, 2));
    }

    #[test]
    fn miss_reasons_read_well() {
        assert_eq!(MissReason::NoEdges.to_string(), "no edges found");
        assert!(MissReason::TooSmall {
            width: 2,
            height: 1
        }
        .to_string()
        .contains("2x1"));
    }
}
