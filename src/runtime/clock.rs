//! Millisecond clocks used by the scheduler's delay gate
//!
//! The scheduler never reads wall time directly; it asks a [`Clock`]. Tests and
//! the headless CLI drive a [`ManualClock`] so every run is reproducible.

use chrono::Utc;
use std::cell::Cell;
use std::rc::Rc;

/// Source of the current time in milliseconds.
pub trait Clock {
    /// Current time in milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> u64;
}

/// Wall clock backed by `chrono`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// Manually advanced clock. Clones share the same underlying time.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    /// Create a clock starting at `start_ms`.
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    /// Move time forward by `ms`.
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    /// Jump to an absolute time.
    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}
