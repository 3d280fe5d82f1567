//! # Scanner Module
//!
//! Discovers image files to sanitize.
//!
//! Only the direct entries of the input directory are considered, and each
//! regular file is classified by reading its leading bytes. Anything that
//! is not a classifiable image - subdirectories, special files, text with
//! an image extension - is skipped silently: discovery reports work, not
//! garbage.

use crate::core::format::{ImageKind, SNIFF_LEN};
use crate::error::ScanError;
use crate::events::{Event, EventSender, ScanEvent};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// A discovered image eligible for sanitization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateImage {
    /// Path to the image file
    pub path: PathBuf,
    /// Format detected from content
    pub kind: ImageKind,
}

/// Result of scanning the input directory
#[derive(Debug)]
pub struct ScanOutcome {
    /// Content-classified images, in directory order
    pub images: Vec<CandidateImage>,
    /// Entries passed over: non-regular files and unclassifiable content
    pub skipped: usize,
}

/// Scanner over the direct entries of one directory
pub struct DirScanner;

impl DirScanner {
    pub fn new() -> Self {
        Self
    }

    /// Scan without event reporting
    pub fn scan(&self, dir: &Path) -> Result<ScanOutcome, ScanError> {
        self.scan_with_events(dir, &crate::events::null_sender())
    }

    /// Scan the directory, emitting discovery events
    pub fn scan_with_events(
        &self,
        dir: &Path,
        events: &EventSender,
    ) -> Result<ScanOutcome, ScanError> {
        if !dir.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }

        events.send(Event::Scan(ScanEvent::Started {
            dir: dir.to_path_buf(),
        }));

        let mut images = Vec::new();
        let mut skipped = 0usize;

        for entry_result in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    // An error on the root listing means the directory
                    // itself is unreadable; that fails the scan.
                    let is_root = e.path().map(|p| p == dir).unwrap_or(false);
                    if is_root {
                        let source = e.into_io_error().unwrap_or_else(|| {
                            std::io::Error::new(
                                std::io::ErrorKind::Other,
                                "directory unreadable",
                            )
                        });
                        return Err(ScanError::ReadDirectory {
                            path: dir.to_path_buf(),
                            source,
                        });
                    }
                    skipped += 1;
                    debug!("skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();

            // Regular files only; `is_file` follows symlinks, so a link
            // to a real image still qualifies.
            if !path.is_file() {
                skipped += 1;
                continue;
            }

            match classify(path) {
                Some(kind) => {
                    events.send(Event::Scan(ScanEvent::ImageFound {
                        path: path.to_path_buf(),
                        kind,
                    }));
                    images.push(CandidateImage {
                        path: path.to_path_buf(),
                        kind,
                    });
                }
                None => {
                    skipped += 1;
                    debug!("skipping non-image entry: {}", path.display());
                }
            }
        }

        events.send(Event::Scan(ScanEvent::Completed {
            total_images: images.len(),
            skipped,
        }));

        Ok(ScanOutcome { images, skipped })
    }
}

impl Default for DirScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a file's leading bytes and classify them.
///
/// Read errors classify as non-images; during discovery they are
/// indistinguishable from any other unclassifiable entry.
fn classify(path: &Path) -> Option<ImageKind> {
    let mut file = File::open(path).ok()?;
    let mut prefix = [0u8; SNIFF_LEN];
    let mut filled = 0;

    while filled < prefix.len() {
        match file.read(&mut prefix[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(_) => return None,
        }
    }

    ImageKind::sniff(&prefix[..filled])
}
