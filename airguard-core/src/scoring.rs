//! Air-Quality Scoring
//!
//! ## Overview
//!
//! The index combines two signals into a single number where higher is better:
//!
//! - **Humidity** (up to 25 points): distance from a comfortable 40 %RH
//! - **Gas resistance** (up to 75 points): VOCs lower the resistance of the
//!   heated MOX plate, so readings below the clean-air baseline score lower
//!
//! Two policies are supported, selected by [`Algorithm`]:
//!
//! ### Weighted baseline (continuous)
//!
//! ```text
//! hum_offset = humidity - 40
//! hum_score  = (60 - hum_offset) / 60 * 25     if hum_offset > 0
//!            = (40 + hum_offset) / 40 * 25     otherwise
//!
//! gas_offset = baseline - gas
//! gas_score  = gas / baseline * 75             if gas_offset > 0
//!            = 75                              otherwise
//! ```
//!
//! Not clamped: humidity above 100 %RH or a negative reading produce values
//! outside 0-100, and that is passed through unchanged.
//!
//! ### Piecewise threshold (clipped)
//!
//! ```text
//! hum_score = 25                                  38 <= humidity <= 42
//!           = 0.25/40 * humidity * 100            humidity < 38
//!           = (-0.25/60 * humidity + 0.416666)*100  humidity > 42
//!
//! edge      = 50000 if baseline > 50000 else 5000
//! gas_score = clamp((0.75/45000 * edge - 5000 * 0.75/45000) * 100, 0, 75)
//! ```
//!
//! The gas term only sees the baseline snapped to one of the two band edges,
//! so it is either 0 or 75 for a given station.
//!
//! ## Preconditions
//!
//! Scoring is only defined for heat-stable readings against a positive, finite
//! baseline. Anything else yields `None` instead of a NaN or infinity.

use serde::{Deserialize, Serialize};

use crate::constants::scoring::{
    GAS_LOWER_LIMIT_OHMS, GAS_SCORE_MAX, GAS_UPPER_LIMIT_OHMS, HUMIDITY_BAND_HIGH_PCT,
    HUMIDITY_BAND_LOW_PCT, HUMIDITY_BAND_SCORE, HUMIDITY_BASELINE_PCT, HUMIDITY_REFERENCE_PCT,
    HUMIDITY_WEIGHTING, HUMID_SIDE_INTERCEPT,
};
use crate::sample::{Baseline, RawSample};

/// Scoring policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Continuous distance from the humidity and gas baselines
    #[default]
    WeightedBaseline,
    /// Piecewise-linear humidity with a band-quantized gas term
    PiecewiseThreshold,
}

/// Humidity and gas contributions of one index value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    /// Humidity term, at most 25
    pub humidity_score: f64,
    /// Gas term, at most 75
    pub gas_score: f64,
}

impl ScoreBreakdown {
    /// Combined index
    pub fn total(&self) -> f64 {
        self.humidity_score + self.gas_score
    }
}

/// Pure scoring function bound to one [`Algorithm`]
#[derive(Debug, Clone, Copy, Default)]
pub struct AirQualityScorer {
    algorithm: Algorithm,
}

impl AirQualityScorer {
    /// Scorer using `algorithm`
    pub fn new(algorithm: Algorithm) -> Self {
        Self { algorithm }
    }

    /// Formula in use
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Index for `sample`, or `None` when scoring is undefined
    pub fn score(&self, sample: &RawSample, baseline: &Baseline) -> Option<f64> {
        self.breakdown(sample, baseline).map(|b| b.total())
    }

    /// Per-signal contributions for `sample`
    pub fn breakdown(&self, sample: &RawSample, baseline: &Baseline) -> Option<ScoreBreakdown> {
        if !sample.heat_stable || !baseline.is_usable() {
            return None;
        }
        if !sample.humidity_pct.is_finite() || !sample.gas_resistance_ohms.is_finite() {
            return None;
        }

        let breakdown = match self.algorithm {
            Algorithm::WeightedBaseline => ScoreBreakdown {
                humidity_score: weighted_humidity_score(sample.humidity_pct),
                gas_score: weighted_gas_score(
                    sample.gas_resistance_ohms,
                    baseline.gas_resistance_ohms,
                ),
            },
            Algorithm::PiecewiseThreshold => ScoreBreakdown {
                humidity_score: piecewise_humidity_score(sample.humidity_pct),
                gas_score: piecewise_gas_score(baseline.gas_resistance_ohms),
            },
        };

        Some(breakdown)
    }
}

/// Score `sample` against `baseline` with `algorithm`
pub fn score(sample: &RawSample, baseline: &Baseline, algorithm: Algorithm) -> Option<f64> {
    AirQualityScorer::new(algorithm).score(sample, baseline)
}

fn weighted_humidity_score(humidity_pct: f64) -> f64 {
    let hb = HUMIDITY_BASELINE_PCT;
    let max_points = HUMIDITY_WEIGHTING * 100.0;
    let offset = humidity_pct - hb;

    if offset > 0.0 {
        (100.0 - hb - offset) / (100.0 - hb) * max_points
    } else {
        (hb + offset) / hb * max_points
    }
}

fn weighted_gas_score(gas_ohms: f64, baseline_ohms: f64) -> f64 {
    let max_points = 100.0 - HUMIDITY_WEIGHTING * 100.0;
    let offset = baseline_ohms - gas_ohms;

    if offset > 0.0 {
        gas_ohms / baseline_ohms * max_points
    } else {
        max_points
    }
}

fn piecewise_humidity_score(humidity_pct: f64) -> f64 {
    let hr = HUMIDITY_REFERENCE_PCT;

    if (HUMIDITY_BAND_LOW_PCT..=HUMIDITY_BAND_HIGH_PCT).contains(&humidity_pct) {
        HUMIDITY_BAND_SCORE
    } else if humidity_pct < HUMIDITY_BAND_LOW_PCT {
        (0.25 / hr) * humidity_pct * 100.0
    } else {
        ((-0.25 / (100.0 - hr)) * humidity_pct + HUMID_SIDE_INTERCEPT) * 100.0
    }
}

fn piecewise_gas_score(baseline_ohms: f64) -> f64 {
    let edge = if baseline_ohms > GAS_UPPER_LIMIT_OHMS {
        GAS_UPPER_LIMIT_OHMS
    } else {
        GAS_LOWER_LIMIT_OHMS
    };
    let slope = 0.75 / (GAS_UPPER_LIMIT_OHMS - GAS_LOWER_LIMIT_OHMS);
    let raw = (slope * edge - GAS_LOWER_LIMIT_OHMS * slope) * 100.0;

    raw.clamp(0.0, GAS_SCORE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reading(humidity_pct: f64, gas_resistance_ohms: f64) -> RawSample {
        RawSample {
            timestamp: 0,
            temperature_c: 24.0,
            pressure_hpa: 1012.0,
            humidity_pct,
            gas_resistance_ohms,
            heat_stable: true,
        }
    }

    const BASELINE: Baseline = Baseline::constant(100_000.0, 0);

    #[test]
    fn weighted_humidity_branches() {
        // humidity at baseline takes the non-positive branch
        assert_relative_eq!(weighted_humidity_score(40.0), 25.0);
        // dry: (40 - 20) / 40 * 25
        assert_relative_eq!(weighted_humidity_score(20.0), 12.5);
        // humid: (60 - 30) / 60 * 25
        assert_relative_eq!(weighted_humidity_score(70.0), 12.5);
        assert_relative_eq!(weighted_humidity_score(100.0), 0.0);
    }

    #[test]
    fn weighted_gas_branches() {
        // below baseline scales linearly
        assert_relative_eq!(weighted_gas_score(50_000.0, 100_000.0), 37.5);
        // at baseline takes the non-positive branch
        assert_relative_eq!(weighted_gas_score(100_000.0, 100_000.0), 75.0);
        assert_relative_eq!(weighted_gas_score(180_000.0, 100_000.0), 75.0);
    }

    #[test]
    fn weighted_total() {
        let scorer = AirQualityScorer::new(Algorithm::WeightedBaseline);
        let aqi = scorer.score(&reading(55.0, 80_000.0), &BASELINE).unwrap();
        // hum: (60 - 15) / 60 * 25 = 18.75, gas: 0.8 * 75 = 60
        assert_relative_eq!(aqi, 78.75, epsilon = 1e-9);
    }

    #[test]
    fn weighted_is_not_clamped() {
        let scorer = AirQualityScorer::new(Algorithm::WeightedBaseline);
        let aqi = scorer.score(&reading(120.0, 100_000.0), &BASELINE).unwrap();
        // hum: (60 - 80) / 60 * 25 = -8.333..
        assert!(aqi < 75.0);
        assert_relative_eq!(aqi, 75.0 - 25.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn piecewise_humidity_branches() {
        assert_eq!(piecewise_humidity_score(40.0), 25.0);
        assert_eq!(piecewise_humidity_score(38.0), 25.0);
        assert_eq!(piecewise_humidity_score(42.0), 25.0);
        assert_relative_eq!(piecewise_humidity_score(37.0), 23.125, epsilon = 1e-9);
        assert_relative_eq!(piecewise_humidity_score(43.0), 23.74993333, epsilon = 1e-6);
    }

    #[test]
    fn piecewise_gas_snaps_to_band_edges() {
        assert_relative_eq!(piecewise_gas_score(120_000.0), 75.0, epsilon = 1e-9);
        assert_eq!(piecewise_gas_score(50_000.0), 0.0);
        assert_eq!(piecewise_gas_score(20_000.0), 0.0);
        assert_eq!(piecewise_gas_score(1.0), 0.0);
    }

    #[test]
    fn unstable_or_degenerate_inputs_score_none() {
        let scorer = AirQualityScorer::default();
        let mut unstable = reading(40.0, 90_000.0);
        unstable.heat_stable = false;
        assert_eq!(scorer.score(&unstable, &BASELINE), None);

        let zero = Baseline::constant(0.0, 0);
        assert_eq!(scorer.score(&reading(40.0, 90_000.0), &zero), None);
        assert_eq!(
            score(&reading(40.0, 90_000.0), &zero, Algorithm::PiecewiseThreshold),
            None
        );
        assert_eq!(scorer.score(&reading(f64::NAN, 90_000.0), &BASELINE), None);
    }

    #[test]
    fn algorithm_serde_names() {
        let json = serde_json::to_string(&Algorithm::PiecewiseThreshold).unwrap();
        assert_eq!(json, "\"piecewise_threshold\"");
        let parsed: Algorithm = serde_json::from_str("\"weighted_baseline\"").unwrap();
        assert_eq!(parsed, Algorithm::WeightedBaseline);
    }
}
