//! # CLI Module
//!
//! Command-line interface for compiling screenshots into a PDF.
//!
//! ## Usage
//! ```bash
//! # Every screenshot in a folder, portrait pages
//! slidecrop ~/Pictures/Screenshots P
//!
//! # Only today's captures, cropped to the shared slide
//! slidecrop ~/Pictures/Screenshots landscape --today-only --smart-crop
//!
//! # JSON summary for scripting
//! slidecrop ~/Pictures/Screenshots L --output json
//! ```

use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use slidecrop::core::layout::{Orientation, PageConfig, DEFAULT_JPEG_QUALITY, DEFAULT_MARGIN_MM};
use slidecrop::core::pipeline::{
    collect_sources, output_file_name, Pipeline, PipelineResult, DEFAULT_BATCH_SIZE,
};
use slidecrop::core::scanner::ScanConfig;
use slidecrop::error::{Result, SlideCropError};
use slidecrop::events::{Event, EventChannel, EventSender, PipelineEvent, ProcessEvent, ScanEvent};
use std::path::{Path, PathBuf};
use std::thread;

/// slidecrop - Compile meeting screenshots into one PDF
#[derive(Parser, Debug)]
#[command(name = "slidecrop")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Folder containing the screenshots
    directory: PathBuf,

    /// Page orientation: P, L, Portrait or Landscape
    #[arg(value_enum, ignore_case = true)]
    orientation: PageOrientation,

    /// Only include images modified today
    #[arg(long)]
    today_only: bool,

    /// Crop each screenshot to the shared slide when one is found
    #[arg(long)]
    smart_crop: bool,

    /// Folder the PDF is written to (created if missing)
    #[arg(long, default_value = "PDF")]
    output_dir: PathBuf,

    /// Also collect images from subfolders
    #[arg(short, long)]
    recursive: bool,

    /// Include hidden files
    #[arg(long)]
    include_hidden: bool,

    /// Page margin in millimetres
    #[arg(long, default_value_t = DEFAULT_MARGIN_MM)]
    margin: f64,

    /// JPEG quality for embedded pages (1-100)
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY)]
    quality: u8,

    /// Images processed concurrently
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PageOrientation {
    /// Tall pages (210 x 297 mm)
    #[value(alias = "p")]
    Portrait,
    /// Wide pages (297 x 210 mm)
    #[value(alias = "l")]
    Landscape,
}

impl From<PageOrientation> for Orientation {
    fn from(orientation: PageOrientation) -> Self {
        match orientation {
            PageOrientation::Portrait => Orientation::Portrait,
            PageOrientation::Landscape => Orientation::Landscape,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// What a run ended with
enum Outcome {
    Written(PipelineResult),
    NoImages,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    slidecrop::init_tracing(cli.verbose);

    let page = PageConfig {
        orientation: cli.orientation.into(),
        margin_mm: cli.margin,
        jpeg_quality: cli.quality,
    };
    page.validate().map_err(SlideCropError::Config)?;

    let day = cli.today_only.then(|| Local::now().date_naive());
    let term = Term::stderr();
    let pretty = matches!(cli.output, OutputFormat::Pretty);

    if pretty {
        term.write_line(&format!(
            "{} {}",
            style("slidecrop").bold().cyan(),
            style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line(&format!(
            "  {} {} ({}){}",
            style("Compiling").dim(),
            cli.directory.display(),
            page.orientation,
            if cli.smart_crop { ", smart crop" } else { "" }
        ))
        .ok();
        term.write_line("").ok();
    }

    let (sender, receiver) = EventChannel::new();

    let progress = if pretty {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .map(|s| s.progress_chars("█▓░"))
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Some(pb)
    } else {
        None
    };

    let verbose = cli.verbose;

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        let Some(pb) = progress else {
            for _ in receiver.iter() {}
            return;
        };

        for event in receiver.iter() {
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_message(format!("{}", phase));
                }
                Event::Scan(ScanEvent::Completed { total_images }) => {
                    pb.set_length(total_images as u64);
                }
                Event::Process(ProcessEvent::Started { total_images }) => {
                    pb.set_length(total_images as u64);
                    pb.set_position(0);
                }
                Event::Process(ProcessEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                    if verbose {
                        pb.set_message(
                            p.current_path
                                .file_name()
                                .unwrap_or_default()
                                .to_string_lossy()
                                .into_owned(),
                        );
                    }
                }
                Event::Process(ProcessEvent::FellBack { path, reason }) if verbose => {
                    pb.println(format!(
                        "  {} {} ({})",
                        style("○").dim(),
                        display_path(&path),
                        reason
                    ));
                }
                Event::Process(ProcessEvent::Error { path, message }) => {
                    pb.println(format!(
                        "  {} {}: {}",
                        style("!").yellow().bold(),
                        display_path(&path),
                        message
                    ));
                }
                Event::Pipeline(PipelineEvent::Completed { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
        pb.finish_and_clear();
    });

    let outcome = compile(&cli, page, day, &sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    match outcome? {
        Outcome::Written(result) => match cli.output {
            OutputFormat::Pretty => print_pretty_results(&term, &result, verbose),
            OutputFormat::Json => print_json_results(&result),
        },
        Outcome::NoImages => match cli.output {
            OutputFormat::Pretty => {
                term.write_line(&format!(
                    "{} No matching images found in {}{}",
                    style("!").yellow().bold(),
                    cli.directory.display(),
                    if cli.today_only { " for today" } else { "" }
                ))
                .ok();
            }
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "pages": 0, "output_path": null }));
            }
        },
    }

    Ok(())
}

/// Collect the folder's images and build the document
fn compile(
    cli: &Cli,
    page: PageConfig,
    day: Option<NaiveDate>,
    events: &EventSender,
) -> Result<Outcome> {
    let scan_config = ScanConfig {
        include_hidden: cli.include_hidden,
        max_depth: if cli.recursive { None } else { Some(1) },
        modified_on: day,
        ..Default::default()
    };

    let collected = collect_sources(&cli.directory, scan_config, events)?;
    for error in &collected.errors {
        tracing::warn!(%error, "unreadable entry skipped");
    }
    if collected.sources.is_empty() {
        return Ok(Outcome::NoImages);
    }

    let output = cli
        .output_dir
        .join(output_file_name(&cli.directory, day));

    let result = Pipeline::builder()
        .sources(collected.sources)
        .smart_crop(cli.smart_crop)
        .page(page)
        .batch_size(cli.batch_size)
        .output(output)
        .build()
        .run_with_events(events)?;

    Ok(Outcome::Written(result))
}

fn print_pretty_results(term: &Term, result: &PipelineResult, verbose: bool) {
    term.write_line(&format!("{} PDF Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} pages written in {:.1}s",
        style(result.pages).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();

    if result.cropped + result.fallbacks > 0 {
        term.write_line(&format!(
            "  {} cropped to the slide, {} kept whole",
            style(result.cropped).cyan(),
            style(result.fallbacks).yellow()
        ))
        .ok();
    }

    if result.skipped > 0 {
        term.write_line(&format!(
            "  {} images could not be read",
            style(result.skipped).red()
        ))
        .ok();
        if verbose {
            for error in &result.errors {
                term.write_line(&format!("    {}", style(error).dim())).ok();
            }
        }
    }

    term.write_line("").ok();
    term.write_line(&format!(
        "  {} {}",
        style("Saved to").dim(),
        style(display_path(&result.output_path)).bold()
    ))
    .ok();
}

fn print_json_results(result: &PipelineResult) {
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!(error = %e, "failed to serialize result"),
    }
}

/// Show paths under the home directory as `~/...`
fn display_path(path: &Path) -> String {
    let absolute = path
        .canonicalize()
        .unwrap_or_else(|_| path.to_path_buf());
    match dirs::home_dir().and_then(|home| absolute.strip_prefix(home).ok().map(Path::to_path_buf)) {
        Some(relative) => format!("~/{}", relative.display()),
        None => absolute.display().to_string(),
    }
}
