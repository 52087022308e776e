//! Pipeline execution implementation.

use super::sources::ImageSource;
use crate::core::decode::ImageDecoder;
use crate::core::detector::{DetectorParams, MissReason, Region, RegionDetector};
use crate::core::document::PdfDocument;
use crate::core::layout::PageConfig;
use crate::error::{DocumentError, LoadError, SlideCropError};
use crate::events::{
    null_sender, Event, EventSender, PipelineEvent, PipelinePhase, PipelineSummary, ProcessEvent,
    ProcessProgress,
};
use image::RgbImage;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Images decoded and cropped concurrently before their pages are appended
pub const DEFAULT_BATCH_SIZE: usize = 8;

/// Result of pipeline execution
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    /// Where the document was written
    pub output_path: PathBuf,
    /// Sources handed to the pipeline
    pub total_images: usize,
    /// Pages in the written document
    pub pages: usize,
    /// Pages showing a detected slide region
    pub cropped: usize,
    /// Pages showing the full screenshot because detection missed
    pub fallbacks: usize,
    /// Sources that could not be loaded
    pub skipped: usize,
    /// Non-fatal errors, one per skipped source
    pub errors: Vec<String>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Images to render, one page each, in this order
    pub sources: Vec<ImageSource>,
    /// Crop each image to its slide region before placing it
    pub smart_crop: bool,
    pub detector: DetectorParams,
    pub page: PageConfig,
    pub batch_size: usize,
    /// PDF file to write
    pub output: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            smart_crop: false,
            detector: DetectorParams::default(),
            page: PageConfig::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            output: PathBuf::from("slides.pdf"),
        }
    }
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    /// Set the images to render
    pub fn sources(mut self, sources: Vec<ImageSource>) -> Self {
        self.config.sources = sources;
        self
    }

    /// Enable or disable slide region cropping
    pub fn smart_crop(mut self, enabled: bool) -> Self {
        self.config.smart_crop = enabled;
        self
    }

    /// Set the detector tunables used when smart cropping
    pub fn detector(mut self, params: DetectorParams) -> Self {
        self.config.detector = params;
        self
    }

    /// Set page size, margin and embedding quality
    pub fn page(mut self, page: PageConfig) -> Self {
        self.config.page = page;
        self
    }

    /// Set how many images are held in memory at once (at least 1)
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size.max(1);
        self
    }

    /// Set the PDF file to write
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output = path.into();
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            config: self.config,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// One loaded image ready to be placed on a page
struct RenderedPage {
    image: RgbImage,
    region: Option<Region>,
    miss: Option<MissReason>,
}

/// Turns a list of screenshots into a PDF, one page per image
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<PipelineResult, SlideCropError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting.
    ///
    /// Unreadable sources are skipped and reported in
    /// [`PipelineResult::errors`]. A run that produces no pages fails with
    /// [`DocumentError::NoPages`] and writes nothing.
    pub fn run_with_events(
        &self,
        events: &EventSender,
    ) -> Result<PipelineResult, SlideCropError> {
        let start_time = Instant::now();
        self.config.page.validate().map_err(SlideCropError::Config)?;
        if self.config.output.as_os_str().is_empty() {
            return Err(SlideCropError::Config("output path is empty".to_string()));
        }

        let sources = &self.config.sources;
        let total_images = sources.len();

        events.send(Event::Pipeline(PipelineEvent::Started));
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Processing,
        }));
        events.send(Event::Process(ProcessEvent::Started { total_images }));

        let detector = RegionDetector::new(self.config.detector);
        let mut document =
            PdfDocument::new(self.config.page.page_size(), self.config.page.jpeg_quality);
        let completed = AtomicUsize::new(0);
        let mut cropped = 0;
        let mut fallbacks = 0;
        let mut errors = Vec::new();

        for batch in sources.chunks(self.config.batch_size.max(1)) {
            // Collected in batch order, so pages follow the source order
            let rendered: Vec<(&ImageSource, Result<RenderedPage, LoadError>)> = batch
                .par_iter()
                .map(|source| {
                    let result = self.render(&detector, source);
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    events.send(Event::Process(ProcessEvent::Progress(ProcessProgress {
                        completed: done,
                        total: total_images,
                        current_path: source.path.clone(),
                    })));
                    (source, result)
                })
                .collect();

            for (source, result) in rendered {
                let page = match result {
                    Ok(page) => page,
                    Err(e) => {
                        warn!(path = %source.path.display(), error = %e, "skipping image");
                        events.send(Event::Process(ProcessEvent::Error {
                            path: source.path.clone(),
                            message: e.to_string(),
                        }));
                        errors.push(e.to_string());
                        continue;
                    }
                };

                if let Some(region) = page.region {
                    cropped += 1;
                    events.send(Event::Process(ProcessEvent::Cropped {
                        path: source.path.clone(),
                        x: region.x,
                        y: region.y,
                        width: region.width,
                        height: region.height,
                    }));
                } else if let Some(reason) = page.miss {
                    fallbacks += 1;
                    debug!(path = %source.path.display(), %reason, "using full screenshot");
                    events.send(Event::Process(ProcessEvent::FellBack {
                        path: source.path.clone(),
                        reason: reason.to_string(),
                    }));
                }

                let placement = self
                    .config
                    .page
                    .place(page.image.width(), page.image.height());
                document.add_image_page(&page.image, placement)?;
            }
        }

        let pages = document.page_count();
        events.send(Event::Process(ProcessEvent::Completed {
            pages,
            cropped,
            fallbacks,
        }));

        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Writing,
        }));

        if pages == 0 {
            let error = DocumentError::NoPages;
            events.send(Event::Pipeline(PipelineEvent::Error {
                message: error.to_string(),
            }));
            return Err(error.into());
        }

        let output_path = self.config.output.clone();
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| DocumentError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        document.save(&output_path)?;

        let skipped = errors.len();
        let duration_ms = start_time.elapsed().as_millis() as u64;
        info!(
            path = %output_path.display(),
            pages,
            cropped,
            fallbacks,
            skipped,
            "document written"
        );

        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: PipelineSummary {
                total_images,
                pages_written: pages,
                cropped,
                fallbacks,
                skipped,
                duration_ms,
            },
        }));

        Ok(PipelineResult {
            output_path,
            total_images,
            pages,
            cropped,
            fallbacks,
            skipped,
            errors,
            duration_ms,
        })
    }

    /// Load one source and, when enabled, cut it down to its slide
    fn render(
        &self,
        detector: &RegionDetector,
        source: &ImageSource,
    ) -> Result<RenderedPage, LoadError> {
        let original = ImageDecoder::decode_as(&source.path, source.format)?;

        if !self.config.smart_crop {
            return Ok(RenderedPage {
                image: original.to_rgb8(),
                region: None,
                miss: None,
            });
        }

        let outcome = detector.detect(&original);
        let region = outcome.region();
        let miss = outcome.miss_reason().cloned();
        Ok(RenderedPage {
            image: outcome.or_original(&original),
            region,
            miss,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::Orientation;
    use crate::core::scanner::ImageFormat;
    use crate::events::EventChannel;
    use image::Rgb;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_screenshot(dir: &Path, name: &str, slide: bool) -> ImageSource {
        let mut canvas = RgbImage::from_pixel(320, 200, Rgb([25, 25, 30]));
        if slide {
            draw_filled_rect_mut(
                &mut canvas,
                Rect::at(40, 30).of_size(240, 140),
                Rgb([240, 240, 240]),
            );
        }
        let path = dir.join(name);
        canvas.save(&path).unwrap();
        ImageSource::from_path(path)
    }

    #[test]
    fn builder_sets_configuration() {
        let pipeline = Pipeline::builder()
            .smart_crop(true)
            .batch_size(0)
            .page(PageConfig {
                orientation: Orientation::Landscape,
                ..Default::default()
            })
            .output("/tmp/out.pdf")
            .build();

        assert!(pipeline.config().smart_crop);
        assert_eq!(pipeline.config().batch_size, 1);
        assert_eq!(pipeline.config().page.orientation, Orientation::Landscape);
        assert_eq!(pipeline.config().output, PathBuf::from("/tmp/out.pdf"));
    }

    #[test]
    fn no_sources_is_no_pages() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out.pdf");

        let error = Pipeline::builder().output(&output).build().run().unwrap_err();

        assert!(matches!(
            error,
            SlideCropError::Document(DocumentError::NoPages)
        ));
        assert!(!output.exists());
    }

    #[test]
    fn invalid_page_config_is_rejected() {
        let error = Pipeline::builder()
            .page(PageConfig {
                jpeg_quality: 0,
                ..Default::default()
            })
            .build()
            .run()
            .unwrap_err();

        assert!(matches!(error, SlideCropError::Config(_)));
    }

    #[test]
    fn counts_crops_and_fallbacks() {
        let temp_dir = TempDir::new().unwrap();
        let sources = vec![
            write_screenshot(temp_dir.path(), "a.png", true),
            write_screenshot(temp_dir.path(), "b.png", false),
            write_screenshot(temp_dir.path(), "c.png", true),
        ];

        let result = Pipeline::builder()
            .sources(sources)
            .smart_crop(true)
            .batch_size(2)
            .output(temp_dir.path().join("PDF").join("deck.pdf"))
            .build()
            .run()
            .unwrap();

        assert_eq!(result.pages, 3);
        assert_eq!(result.cropped, 2);
        assert_eq!(result.fallbacks, 1);
        assert_eq!(result.skipped, 0);
        assert!(result.output_path.exists());
    }

    #[test]
    fn source_format_picks_the_decoder() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("standup.capture");
        RgbImage::from_pixel(64, 48, Rgb([90, 90, 90]))
            .save_with_format(&path, image::ImageFormat::Jpeg)
            .unwrap();

        let source = ImageSource {
            format: ImageFormat::Jpeg,
            ..ImageSource::from_path(path)
        };
        let result = Pipeline::builder()
            .sources(vec![source])
            .output(temp_dir.path().join("deck.pdf"))
            .build()
            .run()
            .unwrap();

        assert_eq!((result.pages, result.skipped), (1, 0));
    }

    #[test]
    fn without_smart_crop_nothing_is_counted() {
        let temp_dir = TempDir::new().unwrap();
        let sources = vec![write_screenshot(temp_dir.path(), "a.png", true)];

        let result = Pipeline::builder()
            .sources(sources)
            .output(temp_dir.path().join("deck.pdf"))
            .build()
            .run()
            .unwrap();

        assert_eq!(result.pages, 1);
        assert_eq!((result.cropped, result.fallbacks), (0, 0));
    }

    #[test]
    fn reports_progress_for_every_source() {
        let temp_dir = TempDir::new().unwrap();
        let sources = vec![
            write_screenshot(temp_dir.path(), "a.png", true),
            write_screenshot(temp_dir.path(), "b.png", true),
        ];
        let (sender, receiver) = EventChannel::new();

        Pipeline::builder()
            .sources(sources)
            .output(temp_dir.path().join("deck.pdf"))
            .build()
            .run_with_events(&sender)
            .unwrap();
        drop(sender);

        let events: Vec<Event> = receiver.iter().collect();
        let progress = events
            .iter()
            .filter(|e| matches!(e, Event::Process(ProcessEvent::Progress(_))))
            .count();
        assert_eq!(progress, 2);
        assert!(matches!(
            events.last(),
            Some(Event::Pipeline(PipelineEvent::Completed { .. }))
        ));
    }
}
