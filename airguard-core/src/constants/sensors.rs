//! Sensor Specifications and Limits
//!
//! Operating limits and default setup for the Bosch BME680 gas sensor.
//!
//! Source: BME680 datasheet (BST-BME680-DS001)

// ===== ENVIRONMENT REFERENCES =====

/// Standard atmospheric pressure at sea level (hPa).
///
/// Drawn as a reference line next to the live pressure series.
pub const SEA_LEVEL_PRESSURE_HPA: f64 = 1013.25;

/// Optimal indoor relative humidity (%RH).
///
/// Reference line for the humidity series, and the humidity baseline
/// both scoring formulas measure distance from.
pub const OPTIMAL_INDOOR_HUMIDITY_PCT: f64 = 40.0;

// ===== CALIBRATION DEFAULTS =====

/// Self-heating correction subtracted from every temperature reading (°C).
///
/// The gas heater and board electronics warm the die; readings on the
/// Grove breakout sit about 5°C above ambient.
pub const DEFAULT_TEMPERATURE_OFFSET_C: f64 = 5.0;

/// Pre-measured clean-air gas resistance (Ω) used by constant calibration.
///
/// Measured on the reference station after a full 300 second burn-in in a
/// ventilated room. Also the fallback when a burn-in fails.
pub const DEFAULT_GAS_BASELINE_OHMS: f64 = 125_000.0;

// ===== GAS HEATER =====

/// Default heater target temperature (°C).
pub const DEFAULT_HEATER_TEMPERATURE_C: u16 = 320;

/// Default heater on-time (ms).
pub const DEFAULT_HEATER_DURATION_MS: u16 = 150;

/// Lowest heater target the datasheet recommends (°C).
pub const HEATER_TEMPERATURE_MIN_C: u16 = 200;

/// Highest heater target the datasheet allows (°C).
pub const HEATER_TEMPERATURE_MAX_C: u16 = 400;

/// Longest encodable heater duration (ms).
///
/// 6-bit mantissa with a 4x multiplier up to 64: 63 * 64 = 4032.
pub const HEATER_DURATION_MAX_MS: u16 = 4032;

/// Number of heater profile slots (0-9).
pub const HEATER_PROFILE_COUNT: u8 = 10;

/// Discarded reads after opening the sensor.
///
/// The first conversion after power-up returns reset values.
pub const DEFAULT_WARM_UP_READS: u8 = 2;
