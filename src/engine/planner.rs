// src/engine/planner.rs
//
// Segment planning: divides the sample buffer into contiguous, pixel-aligned
// ranges, one per worker. The last segment absorbs the remainder.

use crate::error::{GraymillError, Result};
use crate::pixmap::CHANNELS;
use tracing::debug;

/// Half-open byte range `[start, end)` assigned to one worker.
///
/// Planned segments always start on a pixel boundary and span a whole number
/// of pixels; together they tile the buffer exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Plan one segment per worker over a buffer of `buffer_len` samples.
///
/// Every non-final segment gets exactly `buffer_len / (3 * workers) * 3`
/// bytes, so it covers whole pixels; the final segment runs to the end of the
/// buffer and may be longer than the others. With more workers than pixels
/// the leading segments degenerate to zero length, which downstream treats as
/// a no-op rather than an error.
pub fn plan_segments(buffer_len: usize, workers: usize) -> Result<Vec<Segment>> {
    if workers == 0 {
        return Err(GraymillError::invalid_configuration(
            "workers",
            "0",
            "must be at least 1",
        ));
    }
    if buffer_len % CHANNELS != 0 {
        return Err(GraymillError::misaligned_buffer(buffer_len));
    }

    let segment_size = buffer_len / (CHANNELS * workers) * CHANNELS;
    let mut segments = Vec::with_capacity(workers);
    let mut start = 0;
    for _ in 0..workers - 1 {
        segments.push(Segment {
            start,
            end: start + segment_size,
        });
        start += segment_size;
    }
    segments.push(Segment {
        start,
        end: buffer_len,
    });

    debug!(
        target: "graymill::planner",
        buffer_len,
        workers,
        segment_size,
        "planned segments"
    );
    Ok(segments)
}
