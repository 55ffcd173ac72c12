//! Air-Quality Formula Coefficients
//!
//! Both scoring policies split the index into a humidity contribution
//! (at most 25 points) and a gas contribution (at most 75 points).

// ===== WEIGHTED BASELINE (variant A) =====

/// Share of the index driven by humidity (0.0-1.0).
pub const HUMIDITY_WEIGHTING: f64 = 0.25;

/// Humidity considered ideal by the weighted formula (%RH).
pub const HUMIDITY_BASELINE_PCT: f64 = 40.0;

// ===== PIECEWISE THRESHOLD (variant B) =====

/// Humidity reference for the piecewise formula (%RH).
pub const HUMIDITY_REFERENCE_PCT: f64 = 40.0;

/// Lower edge of the comfortable humidity band (%RH).
pub const HUMIDITY_BAND_LOW_PCT: f64 = 38.0;

/// Upper edge of the comfortable humidity band (%RH).
pub const HUMIDITY_BAND_HIGH_PCT: f64 = 42.0;

/// Humidity score inside the comfortable band.
pub const HUMIDITY_BAND_SCORE: f64 = 25.0;

/// Intercept of the humid-side humidity line.
///
/// Makes the line reach 25 points at 40 %RH: 25/60 ≈ 0.416666.
pub const HUMID_SIDE_INTERCEPT: f64 = 0.416666;

/// Gas resistance mapped to the bottom of the gas score (Ω).
pub const GAS_LOWER_LIMIT_OHMS: f64 = 5_000.0;

/// Gas resistance mapped to the top of the gas score (Ω).
pub const GAS_UPPER_LIMIT_OHMS: f64 = 50_000.0;

/// Maximum gas contribution to the index.
pub const GAS_SCORE_MAX: f64 = 75.0;

// ===== BURN-IN =====

/// Number of most recent stable readings averaged into the baseline.
pub const BURN_IN_AVERAGE_WINDOW: usize = 50;
