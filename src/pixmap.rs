// src/pixmap.rs
//
// Shared pixel-map vocabulary.
// The codec produces these types and the engine mutates them in place.

use crate::error::{GraymillError, Result};

/// Interleaved color channels per pixel. The whole crate assumes packed RGB.
pub const CHANNELS: usize = 3;

/// Header fields of a binary PPM (`P6`) image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PpmHeader {
    pub width: u32,
    pub height: u32,
    /// Maximum sample value as declared by the file. Decoding accepts 1..=255
    /// only; the value is carried through so output headers round-trip what
    /// the input declared.
    pub max_value: u16,
}

impl PpmHeader {
    pub fn new(width: u32, height: u32, max_value: u16) -> Self {
        Self {
            width,
            height,
            max_value,
        }
    }

    /// Byte length of the pixel payload this header describes.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * CHANNELS
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Owned, contiguous, interleaved 8-bit samples.
///
/// The length is always a whole number of pixels. The only constructor
/// rejects anything else, so every downstream consumer can rely on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    samples: Vec<u8>,
}

impl PixelBuffer {
    pub fn from_vec(samples: Vec<u8>) -> Result<Self> {
        if samples.len() % CHANNELS != 0 {
            return Err(GraymillError::misaligned_buffer(samples.len()));
        }
        Ok(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn pixel_count(&self) -> usize {
        self.samples.len() / CHANNELS
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.samples
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.samples
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.samples
    }
}
