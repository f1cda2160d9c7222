// src/engine/pool.rs
//
// Worker pool: one rayon thread pool per engine instance, sized to the worker
// count. There is no process-global pool; independent engines never share
// threads, so two runs can never contend on each other's admission budget.

use crate::engine::gate::AdmissionGate;
use crate::engine::planner::Segment;
use crate::engine::transform::grayscale_in_place;
use crate::error::{GraymillError, Result};
use parking_lot::Mutex;
use tracing::debug;

/// Scheduling hint applied to worker threads at spawn.
///
/// Purely advisory: platforms without a matching mechanism run the pool at
/// default priority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SchedulingHint {
    /// Inherit the process priority.
    #[default]
    Inherit,
    /// Lower worker thread priority so interactive work keeps the CPU.
    Background,
}

/// Niceness delta applied by `SchedulingHint::Background` on unix.
#[cfg(unix)]
const BACKGROUND_NICE: libc::c_int = 5;

#[derive(Debug)]
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize, hint: SchedulingHint) -> Result<Self> {
        if workers == 0 {
            return Err(GraymillError::invalid_configuration(
                "workers",
                "0",
                "must be at least 1",
            ));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .start_handler(move |_| apply_scheduling_hint(hint))
            .build()
            .map_err(|e| GraymillError::pool_build_failed(e.to_string()))?;
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Transform every segment of `pixels`, at most `gate.capacity()` at a time.
    ///
    /// One scoped task per segment except the last, which the orchestrating
    /// closure runs itself; both paths acquire a gate permit before touching
    /// pixels, and the permit is a drop guard, so it is returned even when the
    /// transform fails. The scope joins every task before this returns; the
    /// first failure in segment order is propagated after the join.
    pub fn run(
        &self,
        pixels: &mut [u8],
        segments: &[Segment],
        gate: &AdmissionGate,
    ) -> Result<()> {
        let slices = split_segments(pixels, segments)?;
        let inline_index = segments.len().saturating_sub(1);
        let failures: Mutex<Vec<(usize, GraymillError)>> = Mutex::new(Vec::new());

        self.pool.scope(|scope| {
            let mut jobs = slices;
            let inline_run = jobs.pop();
            for (index, run) in jobs.into_iter().enumerate() {
                let failures = &failures;
                scope.spawn(move |_| {
                    if let Err(err) = transform_gated(run, gate) {
                        failures.lock().push((index, err));
                    }
                });
            }
            if let Some(run) = inline_run {
                if let Err(err) = transform_gated(run, gate) {
                    failures.lock().push((inline_index, err));
                }
            }
        });

        let mut failures = failures.into_inner();
        failures.sort_by_key(|entry| entry.0);
        let mut failures = failures.into_iter();
        match failures.next() {
            None => Ok(()),
            Some((segment, first)) => {
                for (segment, err) in failures {
                    debug!(
                        target: "graymill::pool",
                        segment,
                        error = %err,
                        "suppressed worker failure"
                    );
                }
                debug!(target: "graymill::pool", segment, error = %first, "worker failed");
                Err(first)
            }
        }
    }
}

/// Split the buffer into one exclusive slice per segment.
///
/// The plan must tile the buffer exactly; a gap, overlap, or short plan is
/// rejected here, before any task is spawned or any byte is written.
fn split_segments<'a>(pixels: &'a mut [u8], segments: &[Segment]) -> Result<Vec<&'a mut [u8]>> {
    let total = pixels.len();
    let mut rest = pixels;
    let mut offset = 0;
    let mut slices = Vec::with_capacity(segments.len());
    for seg in segments {
        if seg.start != offset {
            return Err(GraymillError::segment_plan_mismatch(offset, seg.start));
        }
        if seg.end < seg.start || seg.end > total {
            return Err(GraymillError::segment_plan_mismatch(offset, seg.end));
        }
        let (head, tail) = rest.split_at_mut(seg.len());
        slices.push(head);
        rest = tail;
        offset = seg.end;
    }
    if offset != total {
        return Err(GraymillError::segment_plan_mismatch(total, offset));
    }
    Ok(slices)
}

fn transform_gated(run: &mut [u8], gate: &AdmissionGate) -> Result<()> {
    let _permit = gate.acquire()?;
    grayscale_in_place(run)
}

fn apply_scheduling_hint(hint: SchedulingHint) {
    match hint {
        SchedulingHint::Inherit => {}
        SchedulingHint::Background => lower_thread_priority(),
    }
}

#[cfg(unix)]
fn lower_thread_priority() {
    // Safety: nice(2) touches no memory; on failure errno is set and the
    // priority stays unchanged.
    unsafe {
        let _ = libc::nice(BACKGROUND_NICE);
    }
}

#[cfg(not(unix))]
fn lower_thread_priority() {}
