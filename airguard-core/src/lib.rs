//! Core sampling pipeline for AirGuard
//!
//! Turns raw BME680 readings into a live window of environmental metrics
//! and an air-quality index.
//!
//! Pipeline stages:
//! - Calibration: establish the clean-air gas baseline (constant or burn-in)
//! - Scoring: humidity + gas resistance → index, higher is better
//! - Windowing: the last N samples of every channel, always aligned
//! - Sampling: fixed-cadence poll/score/append/publish loop
//!
//! The sensor driver and the renderer are outside the core, behind the
//! [`SensorPort`] and [`Sink`] traits.
//!
//! ```no_run
//! use airguard_core::{
//!     Calibrator, LoopSettings, SamplingLoop, StationConfig, StopSignal,
//!     sink::MemorySink, time::SystemClock,
//! };
//! # use airguard_core::{AirGuardError, RawSample, SensorPort};
//! # struct Bme680;
//! # impl SensorPort for Bme680 {
//! #     fn poll(&mut self) -> nb::Result<RawSample, AirGuardError> { Err(nb::Error::WouldBlock) }
//! # }
//! # fn main() -> Result<(), AirGuardError> {
//! let config = StationConfig::default();
//! config.validate()?;
//!
//! let clock = SystemClock::new();
//! let mut sensor = Bme680;
//! let baseline = Calibrator::new(&clock).calibrate_or_fallback(
//!     config.calibration,
//!     config.calibration_fallback_ohms,
//!     &mut sensor,
//! )?;
//!
//! let mut sampler = SamplingLoop::new(
//!     baseline,
//!     sensor,
//!     MemorySink::new(),
//!     &clock,
//!     LoopSettings::from(&config),
//! )?;
//! sampler.run(&StopSignal::new());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod buffer;
pub mod calibration;
pub mod config;
pub mod constants;
pub mod errors;
pub mod sample;
pub mod sampling;
pub mod scoring;
pub mod sensor;
pub mod sink;
pub mod time;
pub mod traits;
pub mod window;

// Public API
pub use calibration::{BurnInOutcome, BurnInStats, CalibrationMode, Calibrator};
pub use config::StationConfig;
pub use errors::{AirGuardError, AirGuardResult};
pub use sample::{Baseline, RawSample, ScoredSample, TemperatureUnit};
pub use sampling::{LoopSettings, LoopState, LoopStats, SamplingLoop, StopSignal, TickOutcome};
pub use scoring::{AirQualityScorer, Algorithm, ScoreBreakdown};
pub use sensor::SensorSettings;
pub use traits::{SensorPort, Sink};
pub use window::{Channel, SlidingWindow, WindowEntry, WindowSnapshot};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
