//! # Format Module
//!
//! Classifies image files by content, never by extension.
//!
//! ## Supported Formats
//! - JPEG (FF D8 FF)
//! - PNG (89 50 4E 47 0D 0A 1A 0A)
//! - GIF (GIF87a / GIF89a)
//! - WebP (RIFF....WEBP)
//! - TIFF (II*\0 little-endian / MM\0* big-endian)
//! - BMP (BM)
//!
//! A file whose leading bytes match none of these signatures is not an
//! image as far as this crate is concerned, whatever its name says.

use serde::{Deserialize, Serialize};

/// Number of leading bytes needed to classify any supported format.
///
/// WebP has the widest signature window: "WEBP" sits at offset 8..12.
pub const SNIFF_LEN: usize = 12;

/// Supported image formats, identified by content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
    WebP,
    Tiff,
    Bmp,
}

impl ImageKind {
    /// Classify a byte buffer by its leading signature.
    ///
    /// Pure function over the prefix: buffers shorter than [`SNIFF_LEN`]
    /// never classify, so zero-byte and truncated files fall out here.
    pub fn sniff(bytes: &[u8]) -> Option<ImageKind> {
        if bytes.len() < SNIFF_LEN {
            return None;
        }

        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageKind::Jpeg);
        }

        if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(ImageKind::Png);
        }

        if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            return Some(ImageKind::Gif);
        }

        if bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
            return Some(ImageKind::WebP);
        }

        if bytes.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || bytes.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Some(ImageKind::Tiff);
        }

        if bytes.starts_with(b"BM") {
            return Some(ImageKind::Bmp);
        }

        None
    }

    /// The extension written on sanitized output files.
    ///
    /// Always derived from the detected content, so a PNG masquerading
    /// as `photo.jpg` comes out as `<token>.png`.
    pub fn canonical_extension(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::Gif => "gif",
            ImageKind::WebP => "webp",
            ImageKind::Tiff => "tiff",
            ImageKind::Bmp => "bmp",
        }
    }

    /// Map to the image crate's format token for decode/encode dispatch
    pub fn to_image_format(&self) -> image::ImageFormat {
        match self {
            ImageKind::Jpeg => image::ImageFormat::Jpeg,
            ImageKind::Png => image::ImageFormat::Png,
            ImageKind::Gif => image::ImageFormat::Gif,
            ImageKind::WebP => image::ImageFormat::WebP,
            ImageKind::Tiff => image::ImageFormat::Tiff,
            ImageKind::Bmp => image::ImageFormat::Bmp,
        }
    }
}

impl std::fmt::Display for ImageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageKind::Jpeg => write!(f, "JPEG"),
            ImageKind::Png => write!(f, "PNG"),
            ImageKind::Gif => write!(f, "GIF"),
            ImageKind::WebP => write!(f, "WebP"),
            ImageKind::Tiff => write!(f, "TIFF"),
            ImageKind::Bmp => write!(f, "BMP"),
        }
    }
}
