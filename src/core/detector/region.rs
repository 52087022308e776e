//! The region detector: edges, outer contours, filters, crop.

use super::geometry::{bounding_box, polygon_area, simplify_closed};
use super::{CandidateRegion, CropOutcome, DetectorParams, MissReason, Region};
use image::{DynamicImage, GenericImageView, GrayImage};
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometry::arc_length;
use imageproc::point::Point;
use tracing::debug;

/// Finds the dominant slide-like rectangle in a screenshot.
///
/// Stateless: one detector can be shared across threads and reused for any
/// number of images.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionDetector {
    params: DetectorParams,
}

impl RegionDetector {
    pub fn new(params: DetectorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Locate the largest qualifying region and crop the original image to it.
    ///
    /// Never fails: anything that prevents a crop is reported as
    /// [`CropOutcome::Unavailable`].
    pub fn detect(&self, image: &DynamicImage) -> CropOutcome {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return CropOutcome::Unavailable(MissReason::EmptyImage);
        }
        if let Err(reason) = self.params.validate() {
            return CropOutcome::Unavailable(MissReason::Transform(reason));
        }
        if width < self.params.blur_kernel_size || height < self.params.blur_kernel_size {
            return CropOutcome::Unavailable(MissReason::TooSmall { width, height });
        }

        let edges = self.edge_map(image);
        let contours: Vec<Contour<u32>> = find_contours(&edges);
        if contours.is_empty() {
            debug!(width, height, "no edges in screenshot");
            return CropOutcome::Unavailable(MissReason::NoEdges);
        }

        let min_area = width as f64 * height as f64 * self.params.min_area_ratio;

        // Outermost borders only; everything nested inside a frame is content
        let outer: Vec<usize> = contours
            .iter()
            .enumerate()
            .filter(|(_, c)| c.border_type == BorderType::Outer && c.parent.is_none())
            .map(|(i, _)| i)
            .collect();
        let candidates = outer.iter().filter_map(|&i| {
            self.evaluate(&contours[i].points, min_area)
                .map(|candidate| (i, candidate))
        });

        let Some((index, best)) = select_best(candidates) else {
            debug!(
                contours = contours.len(),
                outer = outer.len(),
                "no contour passed the filters"
            );
            return CropOutcome::Unavailable(MissReason::NoCandidate);
        };

        // The edge ring sits on the background side of the slide border
        let region = interior_bounds(&contours, index).unwrap_or(best.bounds);
        debug!(
            x = region.x,
            y = region.y,
            width = region.width,
            height = region.height,
            pixels = region.pixel_area(),
            area = best.area,
            "slide region found"
        );

        CropOutcome::Cropped {
            image: image
                .crop_imm(region.x, region.y, region.width, region.height)
                .to_rgb8(),
            region,
        }
    }

    /// Binary edge map: grayscale, Gaussian blur, then Canny hysteresis.
    ///
    /// Edge pixels are 255, everything else 0.
    pub fn edge_map(&self, image: &DynamicImage) -> GrayImage {
        let gray = image.to_luma8();
        let blurred = gaussian_blur_f32(&gray, self.params.blur_sigma());
        canny(&blurred, self.params.canny_low, self.params.canny_high)
    }

    /// Apply the shape, size and aspect filters to one outer contour
    fn evaluate(&self, points: &[Point<u32>], min_area: f64) -> Option<CandidateRegion> {
        let perimeter = arc_length(points, true);
        if perimeter <= 0.0 {
            return None;
        }

        let polygon = simplify_closed(points, self.params.approx_epsilon_ratio * perimeter);
        if polygon.len() < self.params.min_vertices {
            return None;
        }

        let area = polygon_area(points);
        if area <= min_area {
            return None;
        }

        let bounds = bounding_box(points)?;
        let aspect_ratio = bounds.aspect_ratio();
        if aspect_ratio <= self.params.min_aspect_ratio
            || aspect_ratio >= self.params.max_aspect_ratio
        {
            return None;
        }

        Some(CandidateRegion {
            bounds,
            area,
            aspect_ratio,
        })
    }
}

/// Largest candidate by contour area; on equal areas the first one wins
pub(crate) fn select_best<I>(candidates: I) -> Option<(usize, CandidateRegion)>
where
    I: IntoIterator<Item = (usize, CandidateRegion)>,
{
    candidates.into_iter().fold(None, |best, (index, candidate)| match best {
        Some((_, current)) if candidate.area <= current.area => best,
        _ => Some((index, candidate)),
    })
}

/// Pixels enclosed by the edge ring of contour `outer`.
///
/// The ring's hole border runs along the ring's own pixels, so its bounding
/// box is inset by one pixel on every side. `None` when the ring has no hole.
fn interior_bounds(contours: &[Contour<u32>], outer: usize) -> Option<Region> {
    let hole = contours
        .iter()
        .filter(|c| c.border_type == BorderType::Hole && c.parent == Some(outer))
        .max_by(|a, b| polygon_area(&a.points).total_cmp(&polygon_area(&b.points)))?;

    bounding_box(&hole.points)?.inset(1)
}
