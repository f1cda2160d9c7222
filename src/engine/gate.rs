// src/engine/gate.rs
//
// Admission gate: a counting semaphore that bounds how many workers may be
// transforming pixels at once, independent of how many worker threads exist.
//
// Every instance is owned by its run; there is no process-global gate. Closing
// the gate fails blocked and future acquires instead of silently admitting.

use crate::error::{GraymillError, Result};
use parking_lot::{Condvar, Mutex};

#[derive(Debug)]
struct GateState {
    available: usize,
    closed: bool,
}

/// Counting admission gate with uniform single-permit weights.
#[derive(Debug)]
pub struct AdmissionGate {
    capacity: usize,
    state: Mutex<GateState>,
    cvar: Condvar,
}

/// Permit handed out by [`AdmissionGate::acquire`]. Dropping it returns the
/// permit and wakes a waiter, so release happens even when the holder errors.
#[derive(Debug)]
pub struct GatePermit<'a> {
    gate: &'a AdmissionGate,
}

impl AdmissionGate {
    pub fn new(permits: usize) -> Self {
        // Zero permits would block every acquire forever; clamp to one.
        let capacity = permits.max(1);
        Self {
            capacity,
            state: Mutex::new(GateState {
                available: capacity,
                closed: false,
            }),
            cvar: Condvar::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits currently free. Snapshot only, for diagnostics and tests.
    pub fn available(&self) -> usize {
        self.state.lock().available
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Block until a permit is free, then take it.
    ///
    /// Wakeups are not strictly FIFO: a woken waiter re-contends under the
    /// lock. Every holder releases after one bounded segment, which keeps
    /// waiting times bounded for any fixed worker count.
    pub fn acquire(&self) -> Result<GatePermit<'_>> {
        let mut state = self.state.lock();
        loop {
            if state.closed {
                return Err(GraymillError::gate_closed());
            }
            if state.available > 0 {
                state.available -= 1;
                return Ok(GatePermit { gate: self });
            }
            self.cvar.wait(&mut state);
        }
    }

    /// Close the gate: blocked and future acquires fail with GateClosed.
    /// Permits already handed out still release normally on drop.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        // Wake every waiter so each observes the closed flag.
        self.cvar.notify_all();
    }

    fn release(&self) {
        let mut state = self.state.lock();
        state.available = (state.available + 1).min(self.capacity);
        // One freed permit admits exactly one waiter.
        self.cvar.notify_one();
    }
}

impl Drop for GatePermit<'_> {
    fn drop(&mut self) {
        self.gate.release();
    }
}
