//! Residual JPEG metadata strip.
//!
//! A JPEG written by the re-encode step already starts from bare pixels,
//! but the container format can still carry metadata segments. This pass
//! walks the segment stream of the *written* file and drops the families
//! JPEG writers use for identifying data:
//!
//! - APP1 (FF E1): EXIF, XMP
//! - APP13 (FF ED): IPTC/Photoshop
//! - COM (FF FE): comments
//!
//! Everything structural stays - JFIF header, quantization and Huffman
//! tables, frame/scan segments, ICC profile and Adobe color transform.

use crate::error::SanitizeError;
use std::fs;
use std::path::Path;

mod markers {
    pub const PREFIX: u8 = 0xFF;

    pub const SOI: u8 = 0xD8;
    pub const EOI: u8 = 0xD9;
    pub const SOS: u8 = 0xDA;

    pub const RST0: u8 = 0xD0;
    pub const RST7: u8 = 0xD7;
    pub const TEM: u8 = 0x01;

    pub const APP1: u8 = 0xE1;
    pub const APP13: u8 = 0xED;
    pub const COM: u8 = 0xFE;
}

/// Segments removed by this pass
fn is_stripped_segment(marker: u8) -> bool {
    matches!(marker, markers::APP1 | markers::APP13 | markers::COM)
}

/// Markers that carry no length field
fn is_standalone_marker(marker: u8) -> bool {
    match marker {
        markers::SOI | markers::EOI | markers::TEM => true,
        m if (markers::RST0..=markers::RST7).contains(&m) => true,
        0x00 | 0xFF => true, // padding/stuffing bytes
        _ => false,
    }
}

/// Strip metadata segments from a JPEG file in place.
///
/// Rewrites the file only when a segment was actually dropped.
pub fn strip_file(path: &Path) -> Result<(), SanitizeError> {
    let data = fs::read(path).map_err(|e| SanitizeError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let stripped = strip_segments(&data, path)?;

    if stripped.len() != data.len() {
        fs::write(path, &stripped).map_err(|e| SanitizeError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    Ok(())
}

/// Walk the segment stream, copying everything except stripped segments.
fn strip_segments(data: &[u8], path: &Path) -> Result<Vec<u8>, SanitizeError> {
    let structure = |reason: &str| SanitizeError::Decode {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    if data.len() < 4 {
        return Err(structure("file too small to be a valid JPEG"));
    }
    if data[0] != markers::PREFIX || data[1] != markers::SOI {
        return Err(structure("missing JPEG SOI marker"));
    }

    let mut output = Vec::with_capacity(data.len());
    output.extend_from_slice(&[markers::PREFIX, markers::SOI]);
    let mut pos = 2;

    while pos < data.len() {
        if data[pos] != markers::PREFIX {
            return Err(structure("expected segment marker"));
        }

        // Fill bytes: any number of 0xFF may precede a marker.
        while pos < data.len() && data[pos] == markers::PREFIX {
            pos += 1;
        }
        if pos >= data.len() {
            break;
        }

        let marker = data[pos];
        pos += 1;

        if marker == markers::EOI {
            output.extend_from_slice(&[markers::PREFIX, markers::EOI]);
            break;
        }

        if marker == markers::SOS {
            output.extend_from_slice(&[markers::PREFIX, markers::SOS]);

            if pos + 2 > data.len() {
                return Err(structure("truncated SOS segment"));
            }
            let length = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
            if length < 2 || pos + length > data.len() {
                return Err(structure("SOS segment extends beyond file"));
            }
            output.extend_from_slice(&data[pos..pos + length]);
            pos += length;

            // Entropy-coded data: 0xFF is escaped as 0xFF00, restart
            // markers are embedded, anything else marks the end of the
            // scan.
            while pos < data.len() {
                if data[pos] == markers::PREFIX && pos + 1 < data.len() {
                    let next = data[pos + 1];

                    if next == 0x00 {
                        output.extend_from_slice(&[markers::PREFIX, 0x00]);
                        pos += 2;
                        continue;
                    }

                    if (markers::RST0..=markers::RST7).contains(&next) {
                        output.extend_from_slice(&[markers::PREFIX, next]);
                        pos += 2;
                        continue;
                    }

                    if next == markers::EOI {
                        output.extend_from_slice(&[markers::PREFIX, markers::EOI]);
                        pos += 2;
                        break;
                    }

                    // Another marker: progressive files have several scans.
                    break;
                }

                output.push(data[pos]);
                pos += 1;
            }

            continue;
        }

        if is_standalone_marker(marker) {
            continue;
        }

        if pos + 2 > data.len() {
            return Err(structure("truncated segment header"));
        }
        let length = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
        if length < 2 {
            return Err(structure("invalid segment length"));
        }
        if pos + length > data.len() {
            return Err(structure("segment extends beyond file"));
        }

        if is_stripped_segment(marker) {
            pos += length;
        } else {
            output.extend_from_slice(&[markers::PREFIX, marker]);
            output.extend_from_slice(&data[pos..pos + length]);
            pos += length;
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::jpeg::JpegEncoder;
    use image::ImageEncoder;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn test_path() -> PathBuf {
        PathBuf::from("test.jpg")
    }

    /// A real encoder-produced JPEG, the same thing this pass sees in
    /// production.
    fn encoded_jpeg() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([120, 64, 200]));
        let mut bytes = Vec::new();
        JpegEncoder::new(&mut bytes)
            .write_image(img.as_raw(), 4, 4, image::ExtendedColorType::Rgb8)
            .unwrap();
        bytes
    }

    /// Splice a length-prefixed segment right after SOI.
    fn with_segment(jpeg: &[u8], marker: u8, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(jpeg.len() + payload.len() + 4);
        out.extend_from_slice(&jpeg[..2]);
        out.push(0xFF);
        out.push(marker);
        out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
        out.extend_from_slice(payload);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn strip_removes_spliced_exif_segment() {
        let data = with_segment(&encoded_jpeg(), 0xE1, b"Exif\x00\x00fake exif payload");
        let result = strip_segments(&data, &test_path()).unwrap();

        assert!(result.len() < data.len());
        assert!(!result.windows(2).any(|w| w == [0xFF, 0xE1]));
        assert!(result.starts_with(&[0xFF, 0xD8]));
        assert!(result.ends_with(&[0xFF, 0xD9]));

        // Still a decodable image afterwards.
        image::load_from_memory(&result).unwrap();
    }

    #[test]
    fn strip_removes_comment_segment() {
        let data = with_segment(&encoded_jpeg(), 0xFE, b"shot on holiday 2024");
        let result = strip_segments(&data, &test_path()).unwrap();
        assert!(!result.windows(2).any(|w| w == [0xFF, 0xFE]));
    }

    #[test]
    fn strip_removes_iptc_segment() {
        let data = with_segment(&encoded_jpeg(), 0xED, b"Photoshop 3.0\x00fake iptc");
        let result = strip_segments(&data, &test_path()).unwrap();
        assert!(!result.windows(2).any(|w| w == [0xFF, 0xED]));
    }

    #[test]
    fn strip_preserves_jfif_header() {
        let jpeg = encoded_jpeg();
        assert!(jpeg.windows(2).any(|w| w == [0xFF, 0xE0]));

        let result = strip_segments(&jpeg, &test_path()).unwrap();
        assert!(result.windows(2).any(|w| w == [0xFF, 0xE0]));
    }

    #[test]
    fn strip_leaves_clean_files_unchanged() {
        let jpeg = encoded_jpeg();
        let result = strip_segments(&jpeg, &test_path()).unwrap();
        assert_eq!(result.len(), jpeg.len());
    }

    #[test]
    fn strip_rejects_tiny_input() {
        assert!(strip_segments(&[0xFF, 0xD8], &test_path()).is_err());
    }

    #[test]
    fn strip_rejects_missing_soi() {
        assert!(strip_segments(&[0x00; 8], &test_path()).is_err());
    }

    #[test]
    fn strip_file_rewrites_in_place() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dirty.jpg");
        let data = with_segment(&encoded_jpeg(), 0xE1, b"Exif\x00\x00payload");
        fs::write(&path, &data).unwrap();

        strip_file(&path).unwrap();

        let rewritten = fs::read(&path).unwrap();
        assert!(rewritten.len() < data.len());
        assert!(!rewritten.windows(2).any(|w| w == [0xFF, 0xE1]));
        image::load_from_memory(&rewritten).unwrap();
    }
}
