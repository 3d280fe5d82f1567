//! # Pipeline Module
//!
//! Orchestrates the full batch sanitization workflow.
//!
//! ## Pipeline Stages
//! 1. **Prepare** - Create the output directory
//! 2. **Scan** - Discover image content in the input directory
//! 3. **Sanitize** - Rebuild every discovered image from pixel data
//! 4. **Report** - Collect per-file outcomes into a batch report
//!
//! ## Parallelism
//! Uses rayon for parallel sanitization across multiple CPU cores.

mod executor;
pub mod pool;

pub use executor::{BatchReport, Pipeline, PipelineBuilder, PipelineConfig};
