//! Time management for the sampling pipeline
//!
//! Burn-in deadlines and tick schedules are all computed from a [`Clock`],
//! so the same code runs against:
//! - The system monotonic clock (production)
//! - A manual clock whose `sleep` only advances virtual time (tests)

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Timestamp in milliseconds since the clock's origin
pub type Timestamp = u64;

/// Source of time for calibration and sampling
pub trait Clock {
    /// Current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Block the caller for `ms` milliseconds
    fn sleep(&self, ms: u64);

    /// Sleep until `deadline`, returning immediately if it has already passed
    fn sleep_until(&self, deadline: Timestamp) {
        let now = self.now();
        if deadline > now {
            self.sleep(deadline - now);
        }
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }

    fn sleep(&self, ms: u64) {
        (**self).sleep(ms)
    }
}

/// Monotonic clock starting at 0 when constructed
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Clock reading 0 now
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        self.origin.elapsed().as_millis() as Timestamp
    }

    fn sleep(&self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}

/// Virtual clock for tests and replays
///
/// `sleep` advances the clock instead of blocking, so a 300 second burn-in
/// completes instantly while still seeing the right deadlines.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    /// Clock stopped at `start`
    pub fn new(start: Timestamp) -> Self {
        Self { now_ms: AtomicU64::new(start) }
    }

    /// Jump to `timestamp`
    pub fn set(&self, timestamp: Timestamp) {
        self.now_ms.store(timestamp, Ordering::SeqCst);
    }

    /// Move forward by `ms`
    pub fn advance(&self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now_ms.load(Ordering::SeqCst)
    }

    fn sleep(&self, ms: u64) {
        self.advance(ms);
    }
}

/// Convert a millisecond delta to fractional seconds
pub fn ms_to_seconds(ms: u64) -> f64 {
    ms as f64 / 1000.0
}
