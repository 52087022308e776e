//! # slidecrop CLI
//!
//! Command-line interface for building a PDF out of screenshots.
//!
//! ## Usage
//! ```bash
//! slidecrop ~/Pictures/Screenshots landscape --smart-crop
//! slidecrop ~/Pictures/Screenshots P --today-only --output json
//! ```

mod cli;

use slidecrop::Result;

fn main() -> Result<()> {
    cli::run()
}
