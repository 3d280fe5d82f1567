//! Integration tests for the batch pipeline.
//!
//! These tests verify end-to-end behavior including:
//! - Mixed directories of images and non-images
//! - Per-file failure reporting
//! - Anonymous output naming
//! - Output directory creation and timestamp reset

use assert_fs::prelude::*;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, Rgb, RgbImage};
use image_scrubber::core::pipeline::Pipeline;
use image_scrubber::error::ScrubError;
use predicates::prelude::*;
use std::fs;
use std::io::Cursor;

/// Encode a small gradient PNG in memory
fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 9) as u8, (y * 17) as u8, 200])
    });
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Encode a flat JPEG with a COM segment spliced in after SOI
fn jpeg_with_comment(comment: &[u8]) -> Vec<u8> {
    let img = RgbImage::from_pixel(8, 8, Rgb([90, 90, 90]));
    let mut bytes = Vec::new();
    JpegEncoder::new(&mut bytes).encode_image(&img).unwrap();

    let mut out = bytes[..2].to_vec();
    out.extend_from_slice(&[0xFF, 0xFE]);
    out.extend_from_slice(&((comment.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(comment);
    out.extend_from_slice(&bytes[2..]);
    out
}

/// A PNG signature followed by garbage: classified as PNG, fails to decode
fn corrupt_png_bytes() -> Vec<u8> {
    let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0x4C; 48]);
    bytes
}

#[test]
fn batch_sanitizes_mixed_directory() {
    let input = assert_fs::TempDir::new().unwrap();
    let output = assert_fs::TempDir::new().unwrap();

    input.child("a.png").write_binary(&png_bytes(12, 9)).unwrap();
    input.child("b.png").write_binary(&png_bytes(5, 5)).unwrap();
    input
        .child("c.jpg")
        .write_binary(&jpeg_with_comment(b"lens notes"))
        .unwrap();
    input
        .child("fake.png")
        .write_binary(b"just some prose, no pixels")
        .unwrap();
    input.child("empty.dat").touch().unwrap();

    let pipeline = Pipeline::builder()
        .input_dir(input.path())
        .output_dir(output.path())
        .build();

    let report = pipeline.run().unwrap();

    assert_eq!(report.total(), 3);
    assert_eq!(report.succeeded(), 3);
    assert_eq!(report.failed(), 0);
    assert_eq!(report.skipped, 2);

    let entries: Vec<_> = fs::read_dir(output.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 3);

    for path in &entries {
        let stem = path.file_stem().unwrap().to_string_lossy();
        assert_eq!(stem.len(), 20);
        assert!(stem.chars().all(|c| c.is_ascii_alphanumeric()));

        let ext = path.extension().unwrap().to_string_lossy();
        assert!(ext == "png" || ext == "jpg", "unexpected extension: {}", ext);
    }
}

#[test]
fn batch_reports_failures_per_file() {
    let input = assert_fs::TempDir::new().unwrap();
    let output = assert_fs::TempDir::new().unwrap();

    input.child("good.png").write_binary(&png_bytes(6, 6)).unwrap();
    input
        .child("broken.png")
        .write_binary(&corrupt_png_bytes())
        .unwrap();

    let pipeline = Pipeline::builder()
        .input_dir(input.path())
        .output_dir(output.path())
        .build();

    let report = pipeline.run().unwrap();

    assert_eq!(report.total(), 2);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 1);

    let failure = report.failures().next().unwrap();
    assert_eq!(failure.original_name, "broken.png");
    assert!(!failure.error.as_deref().unwrap_or("").is_empty());

    // The good file still made it through
    assert_eq!(fs::read_dir(output.path()).unwrap().count(), 1);
}

#[test]
fn batch_output_names_leak_nothing_about_inputs() {
    let input = assert_fs::TempDir::new().unwrap();
    let output = assert_fs::TempDir::new().unwrap();

    input
        .child("holiday-trip-2024.png")
        .write_binary(&png_bytes(10, 10))
        .unwrap();

    let pipeline = Pipeline::builder()
        .input_dir(input.path())
        .output_dir(output.path())
        .build();

    pipeline.run().unwrap();

    output
        .child("holiday-trip-2024.png")
        .assert(predicate::path::missing());

    let entry = fs::read_dir(output.path()).unwrap().next().unwrap().unwrap();
    let name = entry.file_name().to_string_lossy().to_string();
    assert!(!name.contains("holiday"));
    assert!(!name.contains("2024"));
}

#[test]
fn batch_resets_output_timestamps() {
    let input = assert_fs::TempDir::new().unwrap();
    let output = assert_fs::TempDir::new().unwrap();

    input.child("pic.png").write_binary(&png_bytes(4, 4)).unwrap();

    let pipeline = Pipeline::builder()
        .input_dir(input.path())
        .output_dir(output.path())
        .build();

    pipeline.run().unwrap();

    let entry = fs::read_dir(output.path()).unwrap().next().unwrap().unwrap();
    let meta = fs::metadata(entry.path()).unwrap();
    let mtime = filetime::FileTime::from_last_modification_time(&meta);
    assert_eq!(mtime.unix_seconds(), 0);
}

#[test]
fn batch_creates_missing_output_directory() {
    let input = assert_fs::TempDir::new().unwrap();
    let base = assert_fs::TempDir::new().unwrap();
    let nested = base.path().join("clean").join("batch-01");

    input.child("pic.png").write_binary(&png_bytes(4, 4)).unwrap();

    let pipeline = Pipeline::builder()
        .input_dir(input.path())
        .output_dir(&nested)
        .build();

    let report = pipeline.run().unwrap();

    assert!(nested.is_dir());
    assert_eq!(report.succeeded(), 1);
}

#[test]
fn batch_fails_when_input_directory_is_missing() {
    let output = assert_fs::TempDir::new().unwrap();

    let pipeline = Pipeline::builder()
        .input_dir("/nonexistent/path/that/does/not/exist")
        .output_dir(output.path())
        .build();

    assert!(matches!(pipeline.run(), Err(ScrubError::Scan(_))));
}

#[test]
fn batch_output_jpeg_carries_no_comment_text() {
    let input = assert_fs::TempDir::new().unwrap();
    let output = assert_fs::TempDir::new().unwrap();

    let marker = b"shot on my phone";
    input
        .child("commented.jpg")
        .write_binary(&jpeg_with_comment(marker))
        .unwrap();

    let pipeline = Pipeline::builder()
        .input_dir(input.path())
        .output_dir(output.path())
        .build();

    let report = pipeline.run().unwrap();
    assert_eq!(report.succeeded(), 1);

    let entry = fs::read_dir(output.path()).unwrap().next().unwrap().unwrap();
    let bytes = fs::read(entry.path()).unwrap();
    assert!(!bytes.windows(marker.len()).any(|w| w == marker));
}
