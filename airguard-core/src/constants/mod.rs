//! Constants for AirGuard Core
//!
//! All numeric values used by calibration, scoring and sampling live here,
//! with units in their names and the source of each value next to it.
//!
//! ## Organization
//!
//! - **Sensors**: BME680 operating limits and default driver setup
//! - **Scoring**: coefficients of the two air-quality formulas
//! - **Time**: sampling cadence, burn-in and watchdog defaults

/// BME680 specifications and default driver configuration.
pub mod sensors;

/// Air-quality formula coefficients.
pub mod scoring;

/// Sampling, calibration and timeout intervals.
pub mod time;

pub use sensors::{
    SEA_LEVEL_PRESSURE_HPA, OPTIMAL_INDOOR_HUMIDITY_PCT,
    DEFAULT_TEMPERATURE_OFFSET_C, DEFAULT_GAS_BASELINE_OHMS,
};

pub use scoring::{
    BURN_IN_AVERAGE_WINDOW, HUMIDITY_WEIGHTING, HUMIDITY_BASELINE_PCT,
};

pub use time::{
    DEFAULT_TICK_INTERVAL_MS, DEFAULT_WINDOW_CAPACITY,
    DEFAULT_BURN_IN_DURATION_MS, DEFAULT_BURN_IN_POLL_INTERVAL_MS,
    DEFAULT_SENSOR_READ_TIMEOUT_MS,
};
