//! # Error Module
//!
//! User-friendly error types for slidecrop.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Recovery hints** - suggest how to fix when possible
//!
//! Region detection has no error type of its own: a detector that cannot
//! find a slide returns [`crate::core::detector::CropOutcome::Unavailable`].

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum SlideCropError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Loading error: {0}")]
    Load(#[from] LoadError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while collecting screenshots
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while decoding a screenshot into pixels
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to open image file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Image is empty or corrupted: {path}")]
    EmptyImage { path: PathBuf },
}

/// Errors that occur while assembling or writing the PDF
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("No pages to write. Check that the folder contains readable images.")]
    NoPages,

    #[error("Failed to encode page image: {0}")]
    Encode(String),

    #[error("PDF assembly failed: {0}")]
    Pdf(String),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, SlideCropError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_error_includes_path() {
        let error = ScanError::DirectoryNotFound {
            path: PathBuf::from("/screenshots/monday"),
        };
        let message = error.to_string();
        assert!(message.contains("/screenshots/monday"));
    }

    #[test]
    fn load_error_includes_path_and_reason() {
        let error = LoadError::Decode {
            path: PathBuf::from("/screenshots/broken.png"),
            reason: "invalid PNG signature".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/screenshots/broken.png"));
        assert!(message.contains("invalid PNG signature"));
    }

    #[test]
    fn no_pages_suggests_recovery() {
        let message = DocumentError::NoPages.to_string();
        assert!(message.contains("readable images"));
    }

    #[test]
    fn nested_errors_convert_into_top_level() {
        let error: SlideCropError = LoadError::EmptyImage {
            path: PathBuf::from("/screenshots/empty.png"),
        }
        .into();
        assert!(matches!(error, SlideCropError::Load(_)));
        assert!(error.to_string().starts_with("Loading error"));
    }
}
