//! # Metadata Module
//!
//! Reports what identifying metadata a source image carries before it is
//! scrubbed. The digest is informational only: the sanitizer never consults
//! it, it rebuilds outputs from pixels regardless.
//!
//! ## Digest Fields
//! - Camera make/model
//! - Original capture date/time (DateTimeOriginal)
//! - Software tag (editor fingerprints)
//! - GPS position presence
//!
//! EXIF containers are found in JPEG and TIFF files and occasionally in
//! PNG/WebP; everything else yields an empty digest.

use chrono::{DateTime, NaiveDateTime, Utc};
use exif::{In, Reader, Tag, Value};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;

/// Identifying metadata found in a source image
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataSummary {
    /// Original capture date/time
    pub date_taken: Option<DateTime<Utc>>,
    /// Camera make (e.g., "Apple", "Canon")
    pub camera_make: Option<String>,
    /// Camera model (e.g., "iPhone 15 Pro")
    pub camera_model: Option<String>,
    /// Software that produced or edited the file
    pub software: Option<String>,
    /// Whether the file embeds a GPS position
    pub has_gps: bool,
}

impl MetadataSummary {
    /// Check if anything identifying was found
    pub fn has_data(&self) -> bool {
        self.date_taken.is_some()
            || self.camera_make.is_some()
            || self.camera_model.is_some()
            || self.software.is_some()
            || self.has_gps
    }

    /// Get a display string for the camera
    pub fn camera_display(&self) -> Option<String> {
        match (&self.camera_make, &self.camera_model) {
            (Some(make), Some(model)) => {
                // Avoid duplication like "Apple Apple iPhone"
                if model.starts_with(make) {
                    Some(model.clone())
                } else {
                    Some(format!("{} {}", make, model))
                }
            }
            (None, Some(model)) => Some(model.clone()),
            (Some(make), None) => Some(make.clone()),
            (None, None) => None,
        }
    }

    /// One-line digest for verbose reporting, `None` when nothing was found
    pub fn describe(&self) -> Option<String> {
        let mut parts = Vec::new();

        if let Some(camera) = self.camera_display() {
            parts.push(camera);
        }
        if let Some(date) = self.date_taken {
            parts.push(date.format("%Y-%m-%d %H:%M").to_string());
        }
        if let Some(ref software) = self.software {
            parts.push(software.clone());
        }
        if self.has_gps {
            parts.push("GPS position".to_string());
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Inspect in-memory image bytes for an EXIF block.
///
/// Unreadable or absent EXIF yields an empty digest; this never fails.
pub fn inspect_bytes(bytes: &[u8]) -> MetadataSummary {
    let mut summary = MetadataSummary::default();

    let mut cursor = Cursor::new(bytes);
    let exif_reader = match Reader::new().read_from_container(&mut cursor) {
        Ok(r) => r,
        Err(_) => return summary,
    };

    if let Some(field) = exif_reader.get_field(Tag::DateTimeOriginal, In::PRIMARY) {
        if let Value::Ascii(ref vec) = field.value {
            if let Some(bytes) = vec.first() {
                if let Ok(s) = std::str::from_utf8(bytes) {
                    // EXIF date format: "YYYY:MM:DD HH:MM:SS"
                    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S") {
                        summary.date_taken = Some(DateTime::from_naive_utc_and_offset(naive, Utc));
                    }
                }
            }
        }
    }

    if let Some(field) = exif_reader.get_field(Tag::Make, In::PRIMARY) {
        summary.camera_make = get_string_value(&field.value);
    }

    if let Some(field) = exif_reader.get_field(Tag::Model, In::PRIMARY) {
        summary.camera_model = get_string_value(&field.value);
    }

    if let Some(field) = exif_reader.get_field(Tag::Software, In::PRIMARY) {
        summary.software = get_string_value(&field.value);
    }

    summary.has_gps = exif_reader
        .get_field(Tag::GPSLatitude, In::PRIMARY)
        .is_some()
        || exif_reader
            .get_field(Tag::GPSLongitude, In::PRIMARY)
            .is_some();

    summary
}

/// Inspect a file on disk for an EXIF block
pub fn inspect_file(path: &Path) -> MetadataSummary {
    match std::fs::read(path) {
        Ok(bytes) => inspect_bytes(&bytes),
        Err(_) => MetadataSummary::default(),
    }
}

/// Helper to extract string from EXIF ASCII value
fn get_string_value(value: &Value) -> Option<String> {
    if let Value::Ascii(ref vec) = value {
        if let Some(bytes) = vec.first() {
            if let Ok(s) = std::str::from_utf8(bytes) {
                let trimmed = s.trim_end_matches('\0').trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }
    None
}
