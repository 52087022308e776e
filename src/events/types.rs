//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted while building a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Scanning phase events
    Scan(ScanEvent),
    /// Per-image load and crop events
    Process(ProcessEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during the scanning phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Scanning has started
    Started { paths: Vec<PathBuf> },
    /// Progress update during scanning
    Progress(ScanProgress),
    /// An image was found
    ImageFound { path: PathBuf },
    /// An image was found but rejected by the date filter
    Skipped { path: PathBuf },
    /// An error occurred but scanning continues
    Error { path: PathBuf, message: String },
    /// Scanning completed
    Completed { total_images: usize },
}

/// Progress information during scanning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Number of directories scanned so far
    pub directories_scanned: usize,
    /// Number of images found so far
    pub images_found: usize,
    /// Current directory being scanned
    pub current_path: PathBuf,
}

/// Events while loading and cropping images
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProcessEvent {
    /// Processing has started
    Started { total_images: usize },
    /// Progress update after each image
    Progress(ProcessProgress),
    /// The slide region was found and the image cropped to it
    Cropped {
        path: PathBuf,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    /// No slide region was found; the full screenshot is used
    FellBack { path: PathBuf, reason: String },
    /// The image could not be loaded and was skipped
    Error { path: PathBuf, message: String },
    /// Processing completed
    Completed {
        pages: usize,
        cropped: usize,
        fallbacks: usize,
    },
}

/// Progress information during processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessProgress {
    /// Number of images processed so far
    pub completed: usize,
    /// Total number of images to process
    pub total: usize,
    /// Image that just finished
    pub current_path: PathBuf,
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed successfully
    Completed { summary: PipelineSummary },
    /// Pipeline encountered a fatal error
    Error { message: String },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    Processing,
    Writing,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Images handed to the pipeline
    pub total_images: usize,
    /// Pages written to the document
    pub pages_written: usize,
    /// Pages that were cropped to a detected slide
    pub cropped: usize,
    /// Pages that fell back to the full screenshot
    pub fallbacks: usize,
    /// Images that could not be loaded
    pub skipped: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Processing => write!(f, "Processing"),
            PipelinePhase::Writing => write!(f, "Writing"),
        }
    }
}
