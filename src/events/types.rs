//! Event type definitions for progress reporting.

use crate::core::format::ImageKind;
use crate::core::sanitizer::TaskOutcome;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the sanitization pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Discovery phase events
    Scan(ScanEvent),
    /// Per-file sanitization events
    Task(TaskEvent),
    /// Batch-level events
    Batch(BatchEvent),
}

/// Events during directory discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Discovery has started
    Started { dir: PathBuf },
    /// A classifiable image was found
    ImageFound { path: PathBuf, kind: ImageKind },
    /// Discovery completed
    Completed { total_images: usize, skipped: usize },
}

/// Events from individual sanitization tasks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TaskEvent {
    /// A worker picked up this file
    Started { path: PathBuf },
    /// The task finished, successfully or not
    Finished { outcome: TaskOutcome },
}

/// Batch-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BatchEvent {
    /// The batch is about to run on this many workers
    Started { total_tasks: usize, workers: usize },
    /// All tasks joined; the summary is final
    Completed { summary: BatchSummary },
}

/// Summary of a completed batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Images submitted to workers
    pub total: usize,
    /// Sanitized copies written
    pub succeeded: usize,
    /// Tasks that failed
    pub failed: usize,
    /// Directory entries skipped during discovery
    pub skipped: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Scan(ScanEvent::ImageFound {
            path: PathBuf::from("/photos/a.png"),
            kind: ImageKind::Png,
        });

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Scan(ScanEvent::ImageFound { kind, .. }) => {
                assert_eq!(kind, ImageKind::Png);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn batch_summary_is_serializable() {
        let summary = BatchSummary {
            total: 40,
            succeeded: 38,
            failed: 2,
            skipped: 5,
            duration_ms: 1200,
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("1200"));
    }
}
