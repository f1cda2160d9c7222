// src/engine/api.rs
//
// GrayscaleEngine: validates configuration, plans segments, and drives the
// worker pool. This is the main public API of the crate.

use crate::engine::gate::AdmissionGate;
use crate::engine::planner::plan_segments;
use crate::engine::pool::{SchedulingHint, WorkerPool};
use crate::engine::MAX_WORKERS;
use crate::error::{GraymillError, Result};
use crate::pixmap::PixelBuffer;
use std::time::{Duration, Instant};
use tracing::debug;

/// Engine configuration. `workers` is the number of segments and pool
/// threads; `max_active` caps how many of them transform at the same time.
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    pub workers: usize,
    pub max_active: usize,
    pub hint: SchedulingHint,
}

impl EngineConfig {
    /// `workers` segments with an unconstrained gate (`max_active == workers`).
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            max_active: workers,
            hint: SchedulingHint::default(),
        }
    }
}

/// What one run did and how long its parallel phase took.
#[derive(Clone, Copy, Debug)]
pub struct EngineReport {
    /// Wall-clock duration of the parallel phase only; decoding and file I/O
    /// happen outside this measurement.
    pub elapsed: Duration,
    pub workers: usize,
    pub max_active: usize,
    pub segments: usize,
    pub bytes: usize,
}

pub struct GrayscaleEngine {
    pool: WorkerPool,
    config: EngineConfig,
}

impl GrayscaleEngine {
    /// Build an engine, validating the configuration before any thread is
    /// spawned or any byte is touched.
    pub fn new(config: EngineConfig) -> Result<Self> {
        if config.workers == 0 {
            return Err(GraymillError::invalid_configuration(
                "workers",
                "0",
                "must be at least 1",
            ));
        }
        if config.workers > MAX_WORKERS {
            return Err(GraymillError::invalid_configuration(
                "workers",
                config.workers.to_string(),
                format!("must not exceed {MAX_WORKERS}"),
            ));
        }
        if config.max_active == 0 {
            return Err(GraymillError::invalid_configuration(
                "max_active",
                "0",
                "must be at least 1",
            ));
        }
        if config.max_active > config.workers {
            return Err(GraymillError::invalid_configuration(
                "max_active",
                config.max_active.to_string(),
                "must not exceed workers",
            ));
        }
        let pool = WorkerPool::new(config.workers, config.hint)?;
        Ok(Self { pool, config })
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Grayscale the whole buffer in place.
    ///
    /// The admission gate lives exactly as long as the run: constructed here,
    /// torn down when the run ends, never shared with another run or engine.
    /// On error the buffer may be partially transformed; callers must not
    /// persist it.
    pub fn process(&self, pixels: &mut PixelBuffer) -> Result<EngineReport> {
        let segments = plan_segments(pixels.len(), self.config.workers)?;
        let gate = AdmissionGate::new(self.config.max_active);

        let started = Instant::now();
        self.pool.run(pixels.as_mut_slice(), &segments, &gate)?;
        let elapsed = started.elapsed();

        let report = EngineReport {
            elapsed,
            workers: self.config.workers,
            max_active: self.config.max_active,
            segments: segments.len(),
            bytes: pixels.len(),
        };
        debug!(
            target: "graymill::engine",
            workers = report.workers,
            max_active = report.max_active,
            bytes = report.bytes,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "run complete"
        );
        Ok(report)
    }
}

/// One-shot convenience: build an engine with the default hint and run once.
pub fn process_image(
    pixels: &mut PixelBuffer,
    workers: usize,
    max_active: usize,
) -> Result<EngineReport> {
    let engine = GrayscaleEngine::new(EngineConfig {
        workers,
        max_active,
        hint: SchedulingHint::default(),
    })?;
    engine.process(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_of(bytes: &[u8]) -> PixelBuffer {
        PixelBuffer::from_vec(bytes.to_vec()).unwrap()
    }

    #[test]
    fn rejects_zero_workers_before_touching_pixels() {
        let mut pixels = buffer_of(&[10, 20, 30, 40, 50, 60]);
        let err = process_image(&mut pixels, 0, 1).unwrap_err();
        assert!(matches!(err, GraymillError::InvalidConfiguration { .. }));
        assert_eq!(pixels.as_slice(), &[10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn rejects_zero_max_active() {
        let err = GrayscaleEngine::new(EngineConfig {
            workers: 4,
            max_active: 0,
            hint: SchedulingHint::Inherit,
        })
        .map(|_| ())
        .unwrap_err();
        assert!(matches!(err, GraymillError::InvalidConfiguration { .. }));
    }

    #[test]
    fn rejects_max_active_above_workers() {
        let err = GrayscaleEngine::new(EngineConfig {
            workers: 2,
            max_active: 3,
            hint: SchedulingHint::Inherit,
        })
        .map(|_| ())
        .unwrap_err();
        assert!(matches!(err, GraymillError::InvalidConfiguration { .. }));
    }

    #[test]
    fn rejects_workers_above_limit() {
        let err = GrayscaleEngine::new(EngineConfig::with_workers(MAX_WORKERS + 1))
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(err, GraymillError::InvalidConfiguration { .. }));
    }

    #[test]
    fn serialized_two_worker_run_matches_expected_bytes() {
        let mut pixels = buffer_of(&[10, 20, 30, 40, 50, 60]);
        let report = process_image(&mut pixels, 2, 1).unwrap();
        assert_eq!(pixels.as_slice(), &[20, 20, 20, 50, 50, 50]);
        assert_eq!(report.workers, 2);
        assert_eq!(report.max_active, 1);
        assert_eq!(report.segments, 2);
        assert_eq!(report.bytes, 6);
    }

    #[test]
    fn worker_count_does_not_change_output() {
        let source: Vec<u8> = (0..120).map(|i| (i * 31 % 256) as u8).collect();
        let mut serial = buffer_of(&source);
        process_image(&mut serial, 1, 1).unwrap();

        let mut parallel = buffer_of(&source);
        process_image(&mut parallel, 8, 8).unwrap();

        assert_eq!(serial.as_slice(), parallel.as_slice());
    }

    #[test]
    fn empty_buffer_is_processed_without_error() {
        let mut pixels = PixelBuffer::from_vec(Vec::new()).unwrap();
        let report = process_image(&mut pixels, 4, 2).unwrap();
        assert_eq!(report.bytes, 0);
        assert_eq!(report.segments, 4);
        assert!(pixels.is_empty());
    }

    #[test]
    fn engine_is_reusable_across_runs() {
        let engine = GrayscaleEngine::new(EngineConfig::with_workers(3)).unwrap();
        for _ in 0..3 {
            let mut pixels = buffer_of(&[9, 9, 9, 30, 60, 90, 1, 2, 3]);
            engine.process(&mut pixels).unwrap();
            assert_eq!(pixels.as_slice(), &[9, 9, 9, 60, 60, 60, 2, 2, 2]);
        }
    }
}
