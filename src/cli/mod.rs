//! # CLI Module
//!
//! Command-line interface for the image scrubber.
//!
//! ## Usage
//! ```bash
//! # Sanitize ./input into ./output
//! img-scrub
//!
//! # Explicit directories
//! img-scrub ~/Camera/incoming ~/Camera/clean
//!
//! # Per-file progress lines
//! img-scrub --verbose
//!
//! # JSON report for scripting
//! img-scrub --report json
//! ```

use clap::{Parser, ValueEnum};
use console::{style, Term};
use image_scrubber::core::pipeline::{BatchReport, Pipeline};
use image_scrubber::core::sanitizer::TaskOutcome;
use image_scrubber::error::Result;
use image_scrubber::events::{BatchEvent, Event, EventChannel, ScanEvent, TaskEvent};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::thread;

/// Image Scrubber - Share photos without their hidden metadata
#[derive(Parser, Debug)]
#[command(name = "img-scrub")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the images to sanitize
    #[arg(default_value = "input")]
    input: PathBuf,

    /// Directory receiving the sanitized copies
    #[arg(default_value = "output")]
    output: PathBuf,

    /// Report format
    #[arg(short, long, default_value = "pretty")]
    report: ReportFormat,

    /// Print a line per processed file
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    run_batch(cli.input, cli.output, cli.report, cli.verbose)
}

fn run_batch(
    input: PathBuf,
    output: PathBuf,
    report: ReportFormat,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();

    // Print header
    if matches!(report, ReportFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Image Scrubber").bold().cyan(),
            style("v0.1.0").dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    // Build pipeline
    let pipeline = Pipeline::builder()
        .input_dir(input)
        .output_dir(output)
        .build();

    // Set up event handling
    let (sender, receiver) = EventChannel::new();

    // Progress bar for pretty output
    let progress = if matches!(report, ReportFormat::Pretty) {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let verbose_clone = verbose;

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            match event {
                Event::Scan(ScanEvent::Completed { total_images, .. }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_length(total_images as u64);
                    }
                }
                Event::Task(TaskEvent::Started { path }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_message(
                            path.file_name()
                                .unwrap_or_default()
                                .to_string_lossy()
                                .to_string(),
                        );
                    }
                }
                Event::Task(TaskEvent::Finished { outcome }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.inc(1);
                        if verbose_clone {
                            pb.println(describe_outcome(&outcome));
                        }
                    }
                }
                Event::Batch(BatchEvent::Completed { .. }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.finish_and_clear();
                    }
                }
                _ => {}
            }
        }
    });

    // Run the pipeline
    let result = pipeline.run_with_events(&sender)?;

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    // The summary itself goes to stdout; stderr was for progress only.
    match report {
        ReportFormat::Pretty => print_pretty_summary(&Term::stdout(), &result),
        ReportFormat::Json => print_json_summary(&result),
    }

    Ok(())
}

fn describe_outcome(outcome: &TaskOutcome) -> String {
    match &outcome.error {
        Some(error) => format!(
            "{} {}: {}",
            style("✗").red().bold(),
            outcome.original_name,
            error
        ),
        None => {
            let removed = outcome
                .metadata
                .as_ref()
                .and_then(|m| m.describe())
                .map(|d| format!(" (removed: {})", d))
                .unwrap_or_default();
            format!(
                "{} {}{}",
                style("✓").green().bold(),
                outcome.original_name,
                removed
            )
        }
    }
}

fn print_pretty_summary(term: &Term, report: &BatchReport) {
    term.write_line("").ok();
    term.write_line(&format!("{} Batch Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "{}",
        style("Processing Summary:").bold().underlined()
    ))
    .ok();
    term.write_line(&format!(
        "  Total images processed: {}",
        style(report.total()).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  Successful: {}",
        style(report.succeeded()).green()
    ))
    .ok();
    term.write_line(&format!("  Failed: {}", style(report.failed()).red()))
        .ok();

    if report.skipped > 0 {
        term.write_line(&format!(
            "  Skipped (not images): {}",
            style(report.skipped).dim()
        ))
        .ok();
    }

    term.write_line(&format!(
        "  Finished in {:.1}s on {} worker threads",
        report.duration_ms as f64 / 1000.0,
        report.workers
    ))
    .ok();

    if report.failed() > 0 {
        term.write_line("").ok();
        term.write_line(&format!("{}", style("Failed Files:").bold().underlined()))
            .ok();
        for outcome in report.failures() {
            term.write_line(&format!(
                "  - {}: {}",
                outcome.original_name,
                style(outcome.error.as_deref().unwrap_or("unknown error")).red()
            ))
            .ok();
        }
    }

    term.write_line("").ok();
    term.write_line(&format!(
        "{}",
        style("Original files were left untouched.").dim()
    ))
    .ok();
}

fn print_json_summary(report: &BatchReport) {
    let output = serde_json::json!({
        "total": report.total(),
        "succeeded": report.succeeded(),
        "failed": report.failed(),
        "skipped": report.skipped,
        "workers": report.workers,
        "duration_ms": report.duration_ms,
        // Per-file outcomes, keyed by original name; failures carry their
        // error, successes the digest of what was removed.
        "files": report.outcomes,
    });

    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}
