// src/codecs/ppm.rs
//
// Binary PPM (`P6`) decode and encode.
//
// The format: ASCII magic `P6`, then width, height, and max sample value as
// decimal integers separated by whitespace (with `#` comments allowed wherever
// whitespace is), then exactly one whitespace byte, then width*height*3 raw
// samples. Dimension limits are checked before any payload allocation.

use crate::engine::{MAX_DIMENSION, MAX_PIXELS};
use crate::error::{GraymillError, Result};
use crate::pixmap::{PixelBuffer, PpmHeader};

fn is_ppm_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

struct HeaderScanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> HeaderScanner<'a> {
    fn new(bytes: &'a [u8], pos: usize) -> Self {
        Self { bytes, pos }
    }

    /// Consume whitespace and `#` comments; returns how many bytes were eaten.
    fn skip_separators(&mut self) -> usize {
        let start = self.pos;
        while let Some(&b) = self.bytes.get(self.pos) {
            if is_ppm_whitespace(b) {
                self.pos += 1;
            } else if b == b'#' {
                while let Some(&c) = self.bytes.get(self.pos) {
                    self.pos += 1;
                    if c == b'\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
        self.pos - start
    }

    /// Parse one decimal integer. Every field must be separated from the
    /// previous token by at least one whitespace or comment byte.
    fn next_uint(&mut self, field: &'static str) -> Result<u32> {
        if self.skip_separators() == 0 {
            return Err(GraymillError::invalid_header(format!(
                "missing separator before {field}"
            )));
        }
        let start = self.pos;
        let mut value: u64 = 0;
        while let Some(&b) = self.bytes.get(self.pos) {
            if !b.is_ascii_digit() {
                break;
            }
            value = value * 10 + u64::from(b - b'0');
            if value > u64::from(u32::MAX) {
                return Err(GraymillError::invalid_header(format!(
                    "{field} is out of range"
                )));
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(GraymillError::invalid_header(format!("missing {field}")));
        }
        Ok(value as u32)
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width > MAX_DIMENSION {
        return Err(GraymillError::dimension_exceeds_limit(width, MAX_DIMENSION));
    }
    if height > MAX_DIMENSION {
        return Err(GraymillError::dimension_exceeds_limit(
            height,
            MAX_DIMENSION,
        ));
    }
    let pixels = u64::from(width) * u64::from(height);
    if pixels > MAX_PIXELS {
        return Err(GraymillError::pixel_count_exceeds_limit(
            pixels, MAX_PIXELS,
        ));
    }
    Ok(())
}

/// Parse the `P6` header. Returns the header fields and the byte offset where
/// the pixel payload begins.
pub fn parse_header(bytes: &[u8]) -> Result<(PpmHeader, usize)> {
    if bytes.len() < 2 {
        return Err(GraymillError::invalid_header(
            "file too short for a magic number",
        ));
    }
    if &bytes[..2] != b"P6" {
        return Err(GraymillError::invalid_header(format!(
            "expected magic 'P6', found '{}'",
            String::from_utf8_lossy(&bytes[..2]).escape_default()
        )));
    }

    let mut scanner = HeaderScanner::new(bytes, 2);
    let width = scanner.next_uint("width")?;
    let height = scanner.next_uint("height")?;
    let max_value = scanner.next_uint("max value")?;

    check_dimensions(width, height)?;
    if max_value == 0 || max_value > 255 {
        return Err(GraymillError::unsupported_max_value(max_value));
    }

    // Exactly one whitespace byte separates the header from the raw payload;
    // a comment here would be part of the pixel data.
    match bytes.get(scanner.pos) {
        Some(&b) if is_ppm_whitespace(b) => Ok((
            PpmHeader::new(width, height, max_value as u16),
            scanner.pos + 1,
        )),
        _ => Err(GraymillError::invalid_header(
            "missing whitespace before pixel payload",
        )),
    }
}

/// Decode a whole `P6` file into its header and pixel buffer.
///
/// The returned buffer is exactly `width * height * 3` bytes; trailing bytes
/// after the payload are ignored.
pub fn decode(bytes: &[u8]) -> Result<(PpmHeader, PixelBuffer)> {
    let (header, offset) = parse_header(bytes)?;
    let expected = header.expected_len();
    let available = bytes.len() - offset;
    if available < expected {
        return Err(GraymillError::truncated_pixel_data(expected, available));
    }
    let pixels = PixelBuffer::from_vec(bytes[offset..offset + expected].to_vec())?;
    Ok((header, pixels))
}

/// Serialize header and samples back into a `P6` file.
pub fn encode(header: &PpmHeader, pixels: &PixelBuffer) -> Vec<u8> {
    let mut out = Vec::with_capacity(32 + pixels.len());
    out.extend_from_slice(
        format!(
            "P6\n{} {}\n{}\n",
            header.width, header.height, header.max_value
        )
        .as_bytes(),
    );
    out.extend_from_slice(pixels.as_slice());
    out
}
