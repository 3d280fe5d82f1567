//! # Error Module
//!
//! User-friendly error types for the image scrubber.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Per-file errors stay per-file** - a broken image fails its own task,
//!   never the batch

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum ScrubError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while enumerating the input directory
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while sanitizing a single image.
///
/// These never propagate out of a task; the dispatcher records them
/// as failed outcomes against the original filename.
#[derive(Error, Debug)]
pub enum SanitizeError {
    #[error("Unsupported or invalid image file")]
    UnrecognizedFormat,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Failed to encode image {path}: {reason}")]
    Encode { path: PathBuf, reason: String },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, ScrubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_error_includes_path() {
        let error = ScanError::DirectoryNotFound {
            path: PathBuf::from("/photos/vacation"),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/vacation"));
    }

    #[test]
    fn sanitize_error_includes_path_and_reason() {
        let error = SanitizeError::Decode {
            path: PathBuf::from("/photos/broken.jpg"),
            reason: "invalid JPEG".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/broken.jpg"));
        assert!(message.contains("invalid JPEG"));
    }

    #[test]
    fn unrecognized_format_has_stable_message() {
        let message = SanitizeError::UnrecognizedFormat.to_string();
        assert_eq!(message, "Unsupported or invalid image file");
    }
}
