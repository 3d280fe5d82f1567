//! # Core Module
//!
//! The UI-agnostic sanitization engine.
//!
//! ## Modules
//! - `format` - Classifies image content by leading bytes
//! - `naming` - Generates anonymous output file names
//! - `metadata` - Extracts EXIF metadata from images
//! - `sanitizer` - Rebuilds a single image from pixel data
//! - `scanner` - Discovers image content in a directory
//! - `pipeline` - Orchestrates the full batch workflow

pub mod format;
pub mod metadata;
pub mod naming;
pub mod pipeline;
pub mod sanitizer;
pub mod scanner;

// Re-export commonly used types
pub use format::ImageKind;
pub use metadata::MetadataSummary;
pub use pipeline::{BatchReport, Pipeline, PipelineBuilder, PipelineConfig};
pub use sanitizer::{ImageTask, TaskOutcome};
pub use scanner::CandidateImage;
