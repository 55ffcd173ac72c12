//! Time-Related Constants
//!
//! Intervals and durations for sampling, burn-in and the read watchdog.

// ===== SAMPLING =====

/// Default tick interval of the sampling loop (milliseconds).
///
/// Matches the 500 ms refresh of the live station plots.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 500;

/// Default number of samples retained per channel.
pub const DEFAULT_WINDOW_CAPACITY: usize = 20;

// ===== BURN-IN =====

/// Default burn-in length (milliseconds).
///
/// Five minutes lets the MOX heater plate settle from a cold start.
pub const DEFAULT_BURN_IN_DURATION_MS: u64 = 300_000;

/// Default poll interval during burn-in (milliseconds).
pub const DEFAULT_BURN_IN_POLL_INTERVAL_MS: u64 = 1_000;

// ===== WATCHDOG =====

/// Default deadline for one hardware read (milliseconds).
///
/// A forced-mode conversion with the default heater profile finishes in
/// well under 200 ms; anything past 2 s is a hung bus.
pub const DEFAULT_SENSOR_READ_TIMEOUT_MS: u64 = 2_000;
