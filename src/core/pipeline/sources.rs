//! Resolving a folder into an ordered list of page sources.

use crate::core::scanner::{
    sort_chronologically, ImageFile, ImageFormat, ImageScanner, ScanConfig, WalkDirScanner,
};
use crate::error::ScanError;
use crate::events::{Event, EventSender, PipelineEvent, PipelinePhase};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One image that becomes one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSource {
    /// File to load
    pub path: PathBuf,
    /// Name shown in progress output
    pub name: String,
    /// Selects the decoder
    pub format: ImageFormat,
}

impl ImageSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let format = ImageFormat::from_path(&path);
        Self { path, name, format }
    }
}

impl From<ImageFile> for ImageSource {
    fn from(file: ImageFile) -> Self {
        Self {
            path: file.path,
            name: file.filename,
            format: file.format,
        }
    }
}

/// Sources found in a folder, oldest first
#[derive(Debug)]
pub struct CollectedSources {
    pub sources: Vec<ImageSource>,
    /// Unreadable entries that were skipped
    pub errors: Vec<ScanError>,
}

/// Scan `directory` and order what was found by (mtime, natural file name)
pub fn collect_sources(
    directory: &Path,
    config: ScanConfig,
    events: &EventSender,
) -> Result<CollectedSources, ScanError> {
    if !directory.is_dir() {
        return Err(ScanError::DirectoryNotFound {
            path: directory.to_path_buf(),
        });
    }

    events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
        phase: PipelinePhase::Scanning,
    }));

    let scanner = WalkDirScanner::new(config);
    let mut result = scanner.scan_with_events(&[directory.to_path_buf()], events)?;
    sort_chronologically(&mut result.images);

    Ok(CollectedSources {
        sources: result.images.into_iter().map(ImageSource::from).collect(),
        errors: result.errors,
    })
}

/// File name for the document built from `directory`.
///
/// `<folder>_compiled.pdf`, or `<folder>_today_<YYYYMMDD>.pdf` when the run
/// was restricted to one day.
pub fn output_file_name(directory: &Path, day: Option<NaiveDate>) -> String {
    let resolved = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());
    let folder = resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "images".to_string());

    match day {
        Some(day) => format!("{}_today_{}.pdf", folder, day.format("%Y%m%d")),
        None => format!("{}_compiled.pdf", folder),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::null_sender;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn source_from_path_uses_file_name() {
        let source = ImageSource::from_path("/shots/Screenshot 3.png");
        assert_eq!(source.name, "Screenshot 3.png");
        assert_eq!(source.format, ImageFormat::Png);
    }

    #[test]
    fn collect_rejects_missing_directory() {
        let error = collect_sources(
            Path::new("/nonexistent/shots"),
            ScanConfig::default(),
            &null_sender(),
        )
        .unwrap_err();
        assert!(matches!(error, ScanError::DirectoryNotFound { .. }));
    }

    #[test]
    fn collect_returns_every_image() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["b.png", "a.png", "notes.txt"] {
            fs::write(temp_dir.path().join(name), b"png").unwrap();
        }

        let collected =
            collect_sources(temp_dir.path(), ScanConfig::default(), &null_sender()).unwrap();

        let mut names: Vec<_> = collected.sources.iter().map(|s| s.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["a.png", "b.png"]);
    }

    #[test]
    fn compiled_name_uses_folder() {
        let name = output_file_name(Path::new("/nonexistent/meeting-notes"), None);
        assert_eq!(name, "meeting-notes_compiled.pdf");
    }

    #[test]
    fn today_name_includes_date() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let name = output_file_name(Path::new("/nonexistent/standup"), Some(day));
        assert_eq!(name, "standup_today_20240307.pdf");
    }
}
