//! Station configuration
//!
//! Every tunable of the pipeline in one serde-friendly struct. Missing
//! fields fall back to their defaults, so an empty JSON object is a valid
//! configuration:
//!
//! ```rust
//! use airguard_core::{CalibrationMode, StationConfig};
//!
//! let config = StationConfig::default()
//!     .with_calibration(CalibrationMode::default_burn_in())
//!     .with_window_capacity(60);
//!
//! assert!(config.validate().is_ok());
//! ```
//!
//! Validation is a separate step: deserialization accepts any well-typed
//! value and [`StationConfig::validate`] rejects the ones that cannot work.

use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationMode;
use crate::constants::sensors::{DEFAULT_GAS_BASELINE_OHMS, DEFAULT_TEMPERATURE_OFFSET_C};
use crate::constants::time::{
    DEFAULT_SENSOR_READ_TIMEOUT_MS, DEFAULT_TICK_INTERVAL_MS, DEFAULT_WINDOW_CAPACITY,
};
use crate::errors::{AirGuardError, AirGuardResult};
use crate::sample::TemperatureUnit;
use crate::scoring::Algorithm;
use crate::sensor::SensorSettings;

/// Complete pipeline configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// Sampling period
    pub tick_interval_ms: u64,
    /// Samples retained per channel
    pub window_capacity: usize,
    /// Self-heating correction subtracted from the die temperature
    pub temperature_offset_c: f64,
    /// Display unit of the temperature channel
    pub temperature_unit: TemperatureUnit,
    /// Air quality index formula
    pub algorithm: Algorithm,
    /// How the gas baseline is established at startup
    pub calibration: CalibrationMode,
    /// Constant baseline used when burn-in fails; `None` makes failure fatal
    pub calibration_fallback_ohms: Option<f64>,
    /// Watchdog deadline for a single sensor read
    pub sensor_read_timeout_ms: u64,
    /// Driver settings handed to the sensor on open
    pub sensor: SensorSettings,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            temperature_offset_c: DEFAULT_TEMPERATURE_OFFSET_C,
            temperature_unit: TemperatureUnit::Celsius,
            algorithm: Algorithm::WeightedBaseline,
            calibration: CalibrationMode::default(),
            calibration_fallback_ohms: Some(DEFAULT_GAS_BASELINE_OHMS),
            sensor_read_timeout_ms: DEFAULT_SENSOR_READ_TIMEOUT_MS,
            sensor: SensorSettings::default(),
        }
    }
}

impl StationConfig {
    /// Set the sampling period
    pub fn with_tick_interval(mut self, interval_ms: u64) -> Self {
        self.tick_interval_ms = interval_ms;
        self
    }

    /// Set how many samples the window keeps
    pub fn with_window_capacity(mut self, capacity: usize) -> Self {
        self.window_capacity = capacity;
        self
    }

    /// Set the temperature display unit
    pub fn with_temperature_unit(mut self, unit: TemperatureUnit) -> Self {
        self.temperature_unit = unit;
        self
    }

    /// Select the scoring formula
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Select the calibration mode
    pub fn with_calibration(mut self, mode: CalibrationMode) -> Self {
        self.calibration = mode;
        self
    }

    /// Set or clear the burn-in fallback baseline
    pub fn with_fallback(mut self, baseline_ohms: Option<f64>) -> Self {
        self.calibration_fallback_ohms = baseline_ohms;
        self
    }

    /// Reject values the pipeline can never run with
    pub fn validate(&self) -> AirGuardResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(AirGuardError::InvalidConfig {
                reason: "tick interval must be non-zero",
            });
        }

        if self.window_capacity == 0 {
            return Err(AirGuardError::InvalidConfig {
                reason: "window capacity must be at least 1",
            });
        }

        if !self.temperature_offset_c.is_finite() {
            return Err(AirGuardError::InvalidConfig {
                reason: "temperature offset must be finite",
            });
        }

        match self.calibration {
            CalibrationMode::Constant { baseline_ohms } => {
                if !is_positive(baseline_ohms) {
                    return Err(AirGuardError::InvalidConfig {
                        reason: "constant baseline must be positive and finite",
                    });
                }
            }
            CalibrationMode::BurnIn { duration_ms, poll_interval_ms } => {
                if duration_ms == 0 || poll_interval_ms == 0 {
                    return Err(AirGuardError::InvalidConfig {
                        reason: "burn-in duration and poll interval must be non-zero",
                    });
                }
            }
        }

        if let Some(fallback) = self.calibration_fallback_ohms {
            if !is_positive(fallback) {
                return Err(AirGuardError::InvalidConfig {
                    reason: "fallback baseline must be positive and finite",
                });
            }
        }

        if self.sensor_read_timeout_ms == 0 {
            return Err(AirGuardError::InvalidConfig {
                reason: "sensor read timeout must be non-zero",
            });
        }

        self.sensor.validate()
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
