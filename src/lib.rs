// lib.rs
//
// graymill: a bounded-concurrency grayscale engine for binary PPM images
//
// Design goals:
// - Deterministic output regardless of worker count
// - Hard upper bound on concurrently active pixel work
// - Zero-copy input, atomic output
// - No global state: every engine owns its pool and its admission gate

// Memory allocator optimization - jemalloc for better performance
// Note: jemalloc is not supported on Windows/MSVC, so we exclude it on that platform
#[cfg(all(feature = "jemalloc", not(target_env = "msvc")))]
#[global_allocator]
static ALLOC: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

pub mod codecs;
pub mod engine;
pub mod error;
pub mod io;
pub mod pixmap;

pub use engine::{process_image, EngineConfig, EngineReport, GrayscaleEngine, SchedulingHint};
pub use error::{ErrorCategory, GraymillError, Result};
pub use pixmap::{PixelBuffer, PpmHeader};

/// Get library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Metrics payload version. Bump when the shape of `RunMetrics` changes.
pub const RUN_METRICS_VERSION: &str = "1.0.0";

/// Per-run metrics for performance monitoring
#[derive(Debug, Clone)]
pub struct RunMetrics {
    /// Schema version for compatibility negotiation
    pub version: String,
    /// Decode stage duration in milliseconds
    pub decode_ms: f64,
    /// Parallel transform stage duration in milliseconds
    pub transform_ms: f64,
    /// Encode stage duration in milliseconds
    pub encode_ms: f64,
    /// Total wall-clock duration in milliseconds
    pub total_ms: f64,
    /// Peak memory usage (RSS, bytes)
    ///
    /// **Note**: On Linux/macOS this uses `ru_maxrss` from `getrusage()`, which is
    /// the cumulative maximum RSS of the whole process, not just this run.
    pub peak_rss: u64,
    /// Total CPU time (user + system) in seconds
    pub cpu_time: f64,
    /// Input file size in bytes
    pub bytes_in: u64,
    /// Output file size in bytes
    pub bytes_out: u64,
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self {
            version: RUN_METRICS_VERSION.to_string(),
            decode_ms: 0.0,
            transform_ms: 0.0,
            encode_ms: 0.0,
            total_ms: 0.0,
            peak_rss: 0,
            cpu_time: 0.0,
            bytes_in: 0,
            bytes_out: 0,
        }
    }
}
