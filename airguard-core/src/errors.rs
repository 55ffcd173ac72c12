//! Error Types for the Sampling Pipeline
//!
//! ## Design Philosophy
//!
//! AirGuard errors follow the same rules as the rest of the core:
//!
//! 1. **Small Size**: every variant carries a few bytes of inline data, since errors
//!    are returned from the sensor path on every tick.
//!
//! 2. **No Heap Allocation**: reasons are `&'static str`, never `String`.
//!
//! 3. **Copy Semantics**: errors are `Copy` so they can be logged, counted and
//!    returned without ownership juggling.
//!
//! ## Error Categories
//!
//! ### Sensor Path (recovered locally)
//! - `SensorUnavailable`: the hardware read failed; the tick is skipped
//! - `SensorTimeout`: the read did not finish before the watchdog deadline
//!
//! ### Startup (surfaced to the caller)
//! - `CalibrationFailed`: burn-in saw no heat-stable reading at all
//! - `InvalidConfig`: a configuration value can never work
//!
//! ### Output
//! - `SinkFailed`: the exporter rejected a snapshot; the window is unaffected
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use airguard_core::{AirGuardError, CalibrationMode, Calibrator, Baseline};
//! # use airguard_core::time::ManualClock;
//! # use airguard_core::{SensorPort, RawSample};
//! # struct Dead;
//! # impl SensorPort for Dead {
//! #     fn poll(&mut self) -> nb::Result<RawSample, AirGuardError> { Err(nb::Error::WouldBlock) }
//! # }
//! # let clock = ManualClock::new(0);
//! # let mut sensor = Dead;
//! let mode = CalibrationMode::BurnIn { duration_ms: 10_000, poll_interval_ms: 1_000 };
//! let baseline = match Calibrator::new(&clock).calibrate(mode, &mut sensor) {
//!     Ok(baseline) => baseline,
//!     Err(AirGuardError::CalibrationFailed { .. }) => {
//!         // Fall back to the pre-measured constant
//!         Baseline::constant(125_000.0, 0)
//!     }
//!     Err(e) => panic!("unexpected: {e}"),
//! };
//! # assert_eq!(baseline.gas_resistance_ohms, 125_000.0);
//! ```

use thiserror_no_std::Error;

/// Result type for pipeline operations
pub type AirGuardResult<T> = Result<T, AirGuardError>;

/// Pipeline errors - kept small, they travel through every tick
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum AirGuardError {
    /// Transient hardware read failure
    #[error("Sensor unavailable: {reason}")]
    SensorUnavailable {
        /// What the driver reported
        reason: &'static str,
    },

    /// Hardware read did not complete before the watchdog deadline
    #[error("Sensor read timed out after {waited_ms}ms")]
    SensorTimeout {
        /// How long the caller waited before giving up
        waited_ms: u64,
    },

    /// Burn-in finished without a single heat-stable reading
    #[error("Calibration failed: no heat-stable reading in {polls} polls ({unstable} unstable)")]
    CalibrationFailed {
        /// Number of polls attempted during the burn-in window
        polls: u32,
        /// Polls that produced a sample whose heater had not settled
        unstable: u32,
    },

    /// Configuration value rejected during validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Which constraint the value broke
        reason: &'static str,
    },

    /// Sink could not accept a snapshot
    #[error("Sink failed: {reason}")]
    SinkFailed {
        /// What the sink could not do
        reason: &'static str,
    },
}

impl AirGuardError {
    /// Errors the sampling loop absorbs by skipping the current tick
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::SensorUnavailable { .. } | Self::SensorTimeout { .. } | Self::SinkFailed { .. }
        )
    }
}
