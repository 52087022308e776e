//! # Decode Module
//!
//! Loads screenshots into memory.
//!
//! Uses zune-jpeg for JPEG files (1.5-2x faster than image crate),
//! falls back to the image crate for everything else and for JPEGs that
//! zune-jpeg refuses.

use crate::core::scanner::ImageFormat;
use crate::error::LoadError;
use image::{DynamicImage, GenericImageView, ImageBuffer, Luma, Rgb, Rgba};
use std::fs;
use std::path::Path;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

/// Image decoder that picks the fastest available path per format
pub struct ImageDecoder;

impl ImageDecoder {
    /// Decode an image from a file path, choosing the decoder by extension
    pub fn decode(path: &Path) -> Result<DynamicImage, LoadError> {
        Self::decode_as(path, ImageFormat::from_path(path))
    }

    /// Decode an image whose format is already known from scanning.
    ///
    /// An image that decodes to zero width or height is reported as
    /// [`LoadError::EmptyImage`].
    pub fn decode_as(path: &Path, format: ImageFormat) -> Result<DynamicImage, LoadError> {
        let image = if format == ImageFormat::Jpeg {
            Self::decode_jpeg(path).or_else(|_| Self::decode_fallback(path))?
        } else {
            Self::decode_fallback(path)?
        };

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(LoadError::EmptyImage {
                path: path.to_path_buf(),
            });
        }

        Ok(image)
    }

    /// Fast JPEG decoding using zune-jpeg
    fn decode_jpeg(path: &Path) -> Result<DynamicImage, LoadError> {
        let file_bytes = fs::read(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let options = DecoderOptions::new_fast().jpeg_set_out_colorspace(ColorSpace::RGB);
        let mut decoder = JpegDecoder::new_with_options(&file_bytes, options);

        let pixels = decoder.decode().map_err(|e| LoadError::Decode {
            path: path.to_path_buf(),
            reason: format!("zune-jpeg decode failed: {:?}", e),
        })?;

        let info = decoder.info().ok_or_else(|| LoadError::Decode {
            path: path.to_path_buf(),
            reason: "Failed to get image info".to_string(),
        })?;

        let width = info.width as u32;
        let height = info.height as u32;
        let buffer_error = || LoadError::Decode {
            path: path.to_path_buf(),
            reason: "Decoded pixel buffer does not match image size".to_string(),
        };

        // The decoder may override the requested colorspace (e.g. grayscale JPEGs)
        let image = match decoder.get_output_colorspace().unwrap_or(ColorSpace::RGB) {
            ColorSpace::RGB => {
                let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(buffer_error)?;
                DynamicImage::ImageRgb8(buffer)
            }
            ColorSpace::RGBA => {
                let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(buffer_error)?;
                DynamicImage::ImageRgba8(buffer)
            }
            ColorSpace::Luma => {
                let buffer: ImageBuffer<Luma<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(buffer_error)?;
                DynamicImage::ImageLuma8(buffer)
            }
            _ => return Self::decode_fallback(path),
        };

        Ok(image)
    }

    /// Fallback to image crate for non-JPEG formats
    fn decode_fallback(path: &Path) -> Result<DynamicImage, LoadError> {
        image::open(path).map_err(|e| match e {
            image::ImageError::IoError(source) => LoadError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => LoadError::Decode {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use tempfile::TempDir;

    #[test]
    fn scanned_format_selects_jpeg_decoder() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("meeting.capture");
        RgbImage::from_pixel(24, 12, Rgb([90, 90, 90]))
            .save_with_format(&path, image::ImageFormat::Jpeg)
            .unwrap();

        // The extension says nothing, the scanned format does
        assert!(matches!(
            ImageDecoder::decode(&path),
            Err(LoadError::Decode { .. })
        ));
        let image = ImageDecoder::decode_as(&path, ImageFormat::Jpeg).unwrap();
        assert_eq!(image.dimensions(), (24, 12));
    }

    #[test]
    fn decodes_png_through_fallback() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("slide.png");
        RgbImage::from_pixel(12, 8, Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let image = ImageDecoder::decode(&path).unwrap();

        assert_eq!(image.dimensions(), (12, 8));
        assert_eq!(image.to_rgb8().get_pixel(0, 0), &Rgb([10, 20, 30]));
    }

    #[test]
    fn decodes_jpeg_with_zune() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("slide.jpg");
        RgbImage::from_pixel(32, 16, Rgb([200, 200, 200]))
            .save(&path)
            .unwrap();

        let image = ImageDecoder::decode(&path).unwrap();

        assert_eq!(image.dimensions(), (32, 16));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.png");
        fs::write(&path, b"definitely not a png").unwrap();

        let error = ImageDecoder::decode(&path).unwrap_err();

        assert!(matches!(error, LoadError::Decode { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let error = ImageDecoder::decode(Path::new("/nonexistent/shot.png")).unwrap_err();
        assert!(matches!(error, LoadError::Io { .. }));
    }
}
