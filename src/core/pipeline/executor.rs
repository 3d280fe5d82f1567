//! Pipeline execution implementation.

use crate::core::pipeline::pool;
use crate::core::sanitizer::{self, ImageTask, TaskOutcome};
use crate::core::scanner::DirScanner;
use crate::error::{Result, ScrubError};
use crate::events::{null_sender, BatchEvent, BatchSummary, Event, EventSender, TaskEvent};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// Result of a batch run
#[derive(Debug)]
pub struct BatchReport {
    /// Outcome of every submitted task, in submission order
    pub outcomes: Vec<TaskOutcome>,
    /// Directory entries skipped during discovery
    pub skipped: usize,
    /// Worker threads the batch ran on (0 for an empty batch)
    pub workers: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl BatchReport {
    /// Images submitted to workers
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Failed outcomes, in submission order
    pub fn failures(&self) -> impl Iterator<Item = &TaskOutcome> {
        self.outcomes.iter().filter(|o| !o.success)
    }

    fn summary(&self) -> BatchSummary {
        BatchSummary {
            total: self.total(),
            succeeded: self.succeeded(),
            failed: self.failed(),
            skipped: self.skipped,
            duration_ms: self.duration_ms,
        }
    }
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding the images to sanitize
    pub input_dir: PathBuf,
    /// Directory receiving sanitized copies
    pub output_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
        }
    }
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    /// Set the input directory
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    /// Set the output directory
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// Build the pipeline
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

/// The batch sanitization pipeline
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<BatchReport> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting.
    ///
    /// Fails fast only when the output directory cannot be created or the
    /// input directory cannot be enumerated. Everything after that is
    /// per-file: a broken image becomes a failed outcome in the report.
    pub fn run_with_events(&self, events: &EventSender) -> Result<BatchReport> {
        let start_time = Instant::now();

        // Workers write into this directory; it must exist up front.
        fs::create_dir_all(&self.config.output_dir).map_err(|e| ScrubError::OutputDir {
            path: self.config.output_dir.clone(),
            source: e,
        })?;

        let scan = DirScanner::new().scan_with_events(&self.config.input_dir, events)?;

        let tasks: Vec<ImageTask> = scan
            .images
            .into_iter()
            .map(|image| ImageTask::new(image.path, &self.config.output_dir))
            .collect();

        if tasks.is_empty() {
            let report = BatchReport {
                outcomes: Vec::new(),
                skipped: scan.skipped,
                workers: 0,
                duration_ms: start_time.elapsed().as_millis() as u64,
            };
            events.send(Event::Batch(BatchEvent::Completed {
                summary: report.summary(),
            }));
            return Ok(report);
        }

        let workers = pool::bounded_worker_count(tasks.len());
        events.send(Event::Batch(BatchEvent::Started {
            total_tasks: tasks.len(),
            workers,
        }));

        let outcomes = pool::run_tasks(&tasks, workers, |task| {
            events.send(Event::Task(TaskEvent::Started {
                path: task.input_path.clone(),
            }));
            let outcome = sanitizer::sanitize_file(task);
            events.send(Event::Task(TaskEvent::Finished {
                outcome: outcome.clone(),
            }));
            outcome
        });

        let report = BatchReport {
            outcomes,
            skipped: scan.skipped,
            workers,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        events.send(Event::Batch(BatchEvent::Completed {
            summary: report.summary(),
        }));

        Ok(report)
    }
}
