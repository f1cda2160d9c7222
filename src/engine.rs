// src/engine.rs
//
// The core of graymill. A bounded-concurrency pixel engine that:
// 1. Plans one pixel-aligned segment per worker
// 2. Gates how many workers may transform at once
// 3. Joins every worker before reporting
//
// This file is a facade that delegates to the decomposed modules in engine/

// =============================================================================
// SECURITY LIMITS
// =============================================================================

/// Maximum allowed image dimension (width or height).
/// Images larger than 32768x32768 are rejected to prevent decompression bombs.
/// This is the same limit libvips uses.
pub const MAX_DIMENSION: u32 = 32768;

/// Maximum allowed total pixels (width * height).
/// 100 megapixels = 300MB of interleaved RGB samples. Beyond this is likely
/// malicious.
pub const MAX_PIXELS: u64 = 100_000_000;

/// Maximum worker count an engine will accept.
pub const MAX_WORKERS: usize = 1024;

// =============================================================================
// MODULE DECOMPOSITION
// =============================================================================

mod api;
mod gate;
mod planner;
mod pool;
mod transform;

// Re-export commonly used types and functions
pub use api::{process_image, EngineConfig, EngineReport, GrayscaleEngine};
pub use gate::{AdmissionGate, GatePermit};
pub use planner::{plan_segments, Segment};
pub use pool::{SchedulingHint, WorkerPool};
pub use transform::{channel_mean, grayscale_in_place};
