//! # Sanitizer Module
//!
//! The per-file transform: classify by content, decode, rebuild from raw
//! pixels, re-encode under a random name, then clean up what lives outside
//! the file body.
//!
//! ## Guarantees
//! - Outputs are constructed from pixel data only; nothing else from the
//!   source file crosses over
//! - The output filename shares nothing with the input filename
//! - Failures stay per-file and are reported against the original name
//!
//! The residual JPEG strip, xattr clearing and timestamp reset run after
//! the output is written. They are best-effort: their failures are logged
//! and swallowed, never turning a success into a failure.

pub mod jpeg;
pub mod scrub;

use crate::core::format::ImageKind;
use crate::core::metadata::{self, MetadataSummary};
use crate::core::naming;
use crate::error::SanitizeError;
use image::{DynamicImage, ImageBuffer, Pixel};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One unit of work: sanitize this file into that directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageTask {
    /// Source image file
    pub input_path: PathBuf,
    /// Directory receiving the sanitized copy
    pub output_dir: PathBuf,
}

impl ImageTask {
    pub fn new(input_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: output_dir.into(),
        }
    }
}

/// Outcome of one task, reported against the original filename.
///
/// Deliberately carries no output filename: no record produced by this
/// crate links an anonymized output back to its source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutcome {
    /// Whether the sanitized copy was written
    pub success: bool,
    /// Basename of the source file
    pub original_name: String,
    /// Failure detail, present only on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Identifying metadata the source carried, for reporting only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataSummary>,
}

/// Sanitize a single image file.
///
/// Never panics and never returns an error: every failure path is folded
/// into a failed [`TaskOutcome`]. Total over arbitrary paths - handing it
/// a text file yields a failure outcome, not a crash.
pub fn sanitize_file(task: &ImageTask) -> TaskOutcome {
    let original_name = task
        .input_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| task.input_path.display().to_string());

    // Read once; the same bytes feed classification, the metadata digest
    // and the decoder.
    let (result, source_metadata) = match fs::read(&task.input_path) {
        Ok(bytes) => {
            let summary = metadata::inspect_bytes(&bytes);
            let digest = summary.has_data().then_some(summary);
            (reencode(&bytes, task), digest)
        }
        Err(e) => (
            Err(SanitizeError::Read {
                path: task.input_path.clone(),
                source: e,
            }),
            None,
        ),
    };

    match result {
        Ok((output_path, kind)) => {
            if kind == ImageKind::Jpeg {
                if let Err(e) = jpeg::strip_file(&output_path) {
                    debug!("residual JPEG strip failed: {}", e);
                }
            }
            scrub::clear_xattrs(&output_path);
            scrub::reset_timestamps(&output_path);

            TaskOutcome {
                success: true,
                original_name,
                error: None,
                metadata: source_metadata,
            }
        }
        Err(e) => TaskOutcome {
            success: false,
            original_name,
            error: Some(e.to_string()),
            metadata: source_metadata,
        },
    }
}

/// Classify, name, decode, rebuild, encode.
fn reencode(bytes: &[u8], task: &ImageTask) -> Result<(PathBuf, ImageKind), SanitizeError> {
    let input = &task.input_path;

    let kind = ImageKind::sniff(bytes).ok_or(SanitizeError::UnrecognizedFormat)?;

    let output_path = task.output_dir.join(naming::output_file_name(kind));

    let decoded = image::load_from_memory_with_format(bytes, kind.to_image_format()).map_err(
        |e| SanitizeError::Decode {
            path: input.clone(),
            reason: e.to_string(),
        },
    )?;

    let rebuilt = rebuild_pixels(decoded);

    write_image(&rebuilt, &output_path, kind)?;

    Ok((output_path, kind))
}

/// Rebuild the decoded image from its raw samples.
///
/// `into_raw` keeps only the sample vector; reassembling it through
/// `from_raw` yields a buffer that never saw the source container, so
/// ancillary chunks, EXIF blocks and ICC payloads have nowhere to ride.
fn rebuild_pixels(decoded: DynamicImage) -> DynamicImage {
    match decoded {
        DynamicImage::ImageLuma8(buf) => DynamicImage::ImageLuma8(remake(buf)),
        DynamicImage::ImageLumaA8(buf) => DynamicImage::ImageLumaA8(remake(buf)),
        DynamicImage::ImageRgb8(buf) => DynamicImage::ImageRgb8(remake(buf)),
        DynamicImage::ImageRgba8(buf) => DynamicImage::ImageRgba8(remake(buf)),
        DynamicImage::ImageLuma16(buf) => DynamicImage::ImageLuma16(remake(buf)),
        DynamicImage::ImageLumaA16(buf) => DynamicImage::ImageLumaA16(remake(buf)),
        DynamicImage::ImageRgb16(buf) => DynamicImage::ImageRgb16(remake(buf)),
        DynamicImage::ImageRgba16(buf) => DynamicImage::ImageRgba16(remake(buf)),
        // Float TIFFs decode to these.
        DynamicImage::ImageRgb32F(buf) => DynamicImage::ImageRgb32F(remake(buf)),
        DynamicImage::ImageRgba32F(buf) => DynamicImage::ImageRgba32F(remake(buf)),
        // DynamicImage is non_exhaustive; unknown variants pass through
        // unchanged.
        other => other,
    }
}

fn remake<P>(buf: ImageBuffer<P, Vec<P::Subpixel>>) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel,
{
    let (width, height) = buf.dimensions();
    let samples = buf.into_raw();
    // Same samples, same dimensions: from_raw cannot come up short.
    ImageBuffer::from_raw(width, height, samples)
        .unwrap_or_else(|| ImageBuffer::new(width, height))
}

/// Encode the rebuilt image.
///
/// PNG is the one supported format with a tunable lossless effort and gets
/// maximum compression; every other format uses the encoder defaults.
fn write_image(img: &DynamicImage, path: &Path, kind: ImageKind) -> Result<(), SanitizeError> {
    use image::codecs::png::{CompressionType, FilterType, PngEncoder};

    let file = fs::File::create(path).map_err(|e| SanitizeError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);

    let encoded = match kind {
        ImageKind::Png => img.write_with_encoder(PngEncoder::new_with_quality(
            &mut writer,
            CompressionType::Best,
            FilterType::Adaptive,
        )),
        _ => img.write_to(&mut writer, kind.to_image_format()),
    };

    if let Err(e) = encoded {
        // Drop the partial file rather than leaving encoder garbage behind.
        drop(writer);
        let _ = fs::remove_file(path);
        return Err(SanitizeError::Encode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        });
    }

    if let Err(e) = writer.flush() {
        // A failed flush truncates the file; discard it like a failed
        // encode.
        drop(writer);
        let _ = fs::remove_file(path);
        return Err(SanitizeError::Write {
            path: path.to_path_buf(),
            source: e,
        });
    }

    Ok(())
}
