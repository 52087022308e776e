//! # slidecrop
//!
//! Turns a folder of meeting screenshots into a single PDF, one image per
//! page, optionally cropping each screenshot down to the shared slide.
//!
//! ## Architecture
//! The library is split into a core engine (UI-agnostic) and presentation layers:
//! - `core` - Region detection, scanning, layout and PDF assembly
//! - `events` - Event-driven progress reporting (GUI-ready)
//! - `error` - User-friendly error types
//! - `cli` - Command-line interface (binary only)
//!
//! The region detector in [`core::detector`] is a pure function over a decoded
//! image. Everything that touches the filesystem lives elsewhere.

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{Result, SlideCropError};

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or GUI).
/// `RUST_LOG` takes precedence; otherwise `verbose` selects between
/// `debug` and `warn` for this crate. Calling it twice is harmless.
pub fn init_tracing(verbose: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(if verbose {
            "slidecrop=debug"
        } else {
            "slidecrop=warn"
        })
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
