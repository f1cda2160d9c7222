// src/engine/transform.rs
//
// Per-pixel grayscale transform. Pure byte arithmetic over a triplet-aligned
// run; correctness under concurrency comes from disjoint slices, not locks.

use crate::error::{GraymillError, Result};
use crate::pixmap::CHANNELS;

/// Truncating mean of one RGB triplet. The sum is widened to u16 first; the
/// maximum (765) fits without saturation.
#[inline]
pub fn channel_mean(r: u8, g: u8, b: u8) -> u8 {
    ((u16::from(r) + u16::from(g) + u16::from(b)) / 3) as u8
}

/// Overwrite every triplet in `run` with its channel mean.
///
/// `run` must span whole pixels; anything else means the caller handed out a
/// slice that does not line up with the segment plan. An empty run is a no-op.
pub fn grayscale_in_place(run: &mut [u8]) -> Result<()> {
    if run.len() % CHANNELS != 0 {
        return Err(GraymillError::misaligned_run(run.len()));
    }
    for pixel in run.chunks_exact_mut(CHANNELS) {
        let gray = channel_mean(pixel[0], pixel[1], pixel[2]);
        pixel[0] = gray;
        pixel[1] = gray;
        pixel[2] = gray;
    }
    Ok(())
}
