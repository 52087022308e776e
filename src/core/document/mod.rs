//! # Document Module
//!
//! Assembles page images into a PDF with lopdf.
//!
//! Each page holds one image, embedded as a JPEG (DCTDecode) XObject and
//! positioned with a `cm` transform. PDF user space starts at the bottom-left
//! corner in points, so layout placements (top-left, millimetres) are
//! converted on the way in.

use crate::core::layout::{PageSize, Placement};
use crate::error::DocumentError;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::fs;
use std::path::Path;

const POINTS_PER_MM: f64 = 72.0 / 25.4;

fn mm_to_pt(mm: f64) -> f32 {
    (mm * POINTS_PER_MM) as f32
}

/// A PDF under construction
pub struct PdfDocument {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    page: PageSize,
    jpeg_quality: u8,
}

impl PdfDocument {
    /// Start an empty document whose pages all have the given size
    pub fn new(page: PageSize, jpeg_quality: u8) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
            page,
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Append a page showing `image` at `placement`
    pub fn add_image_page(
        &mut self,
        image: &RgbImage,
        placement: Placement,
    ) -> Result<(), DocumentError> {
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, self.jpeg_quality)
            .encode_image(image)
            .map_err(|e| DocumentError::Encode(e.to_string()))?;

        let image_id = self.doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width() as i64,
                "Height" => image.height() as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
                "Filter" => "DCTDecode",
            },
            jpeg,
        ));

        let name = format!("Im{}", self.page_ids.len() + 1);
        let bottom_mm = self.page.height_mm - placement.y_mm - placement.height_mm;
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        mm_to_pt(placement.width_mm).into(),
                        0_i64.into(),
                        0_i64.into(),
                        mm_to_pt(placement.height_mm).into(),
                        mm_to_pt(placement.x_mm).into(),
                        mm_to_pt(bottom_mm).into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content
            .encode()
            .map_err(|e| DocumentError::Pdf(e.to_string()))?;
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                0_i64.into(),
                0_i64.into(),
                mm_to_pt(self.page.width_mm).into(),
                mm_to_pt(self.page.height_mm).into(),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    name.as_str() => image_id,
                },
            },
        });
        self.page_ids.push(page_id);

        Ok(())
    }

    /// Serialize the finished document
    pub fn to_bytes(mut self) -> Result<Vec<u8>, DocumentError> {
        if self.page_ids.is_empty() {
            return Err(DocumentError::NoPages);
        }

        let kids: Vec<Object> = self.page_ids.iter().map(|&id| id.into()).collect();
        let count = kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        let info_id = self.doc.add_object(dictionary! {
            "Producer" => Object::string_literal("slidecrop"),
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        self.doc
            .save_to(&mut bytes)
            .map_err(|e| DocumentError::Pdf(e.to_string()))?;
        Ok(bytes)
    }

    /// Write the finished document to `path`
    pub fn save(self, path: &Path) -> Result<(), DocumentError> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes).map_err(|e| DocumentError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::{fit, Orientation};
    use image::Rgb;

    fn page_image() -> RgbImage {
        RgbImage::from_pixel(64, 36, Rgb([240, 240, 240]))
    }

    #[test]
    fn empty_document_has_no_pages_error() {
        let pdf = PdfDocument::new(PageSize::a4(Orientation::Portrait), 90);
        assert!(matches!(pdf.to_bytes(), Err(DocumentError::NoPages)));
    }

    #[test]
    fn writes_one_page_per_image() {
        let page = PageSize::a4(Orientation::Landscape);
        let mut pdf = PdfDocument::new(page, 90);

        for _ in 0..3 {
            let image = page_image();
            pdf.add_image_page(&image, fit(page, 10.0, image.width(), image.height()))
                .unwrap();
        }
        assert_eq!(pdf.page_count(), 3);

        let bytes = pdf.to_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let reloaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 3);
    }

    #[test]
    fn millimetres_convert_to_points() {
        assert!((mm_to_pt(25.4) - 72.0).abs() < 1e-4);
        assert!((mm_to_pt(210.0) - 595.2756).abs() < 1e-3);
    }

    #[test]
    fn save_reports_unwritable_path() {
        let page = PageSize::a4(Orientation::Portrait);
        let mut pdf = PdfDocument::new(page, 90);
        let image = page_image();
        pdf.add_image_page(&image, fit(page, 10.0, 64, 36)).unwrap();

        let error = pdf
            .save(Path::new("/nonexistent/dir/out.pdf"))
            .unwrap_err();
        assert!(matches!(error, DocumentError::Io { .. }));
    }
}
