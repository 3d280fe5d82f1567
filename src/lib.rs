//! # Image Scrubber
//!
//! A batch tool that re-emits photos with their identifying metadata removed.
//!
//! ## Core Philosophy
//! - **Never modify originals** - Sanitized copies land in a separate directory
//! - **Rebuild, don't edit** - Output images are re-encoded from pixel data alone
//! - **Trust content, not names** - File extensions are ignored; bytes decide
//!
//! ## Architecture
//! The library is split into a core engine (UI-agnostic) and presentation layers:
//! - `core` - The sanitization engine
//! - `events` - Event-driven progress reporting (GUI-ready)
//! - `error` - User-friendly error types
//! - `cli` - Command-line interface

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{Result, ScrubError};

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or GUI).
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
