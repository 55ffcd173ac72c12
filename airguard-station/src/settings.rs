//! Configuration loading
//!
//! Layering, lowest to highest priority:
//!
//! 1. Built-in defaults ([`StationConfig::default`])
//! 2. JSON config file, if one is given (missing keys keep their defaults)
//! 3. Command-line overrides ([`Overrides`])
//!
//! The merged result is validated once, before anything touches the sensor.

use std::fs;
use std::path::Path;

use airguard_core::constants::DEFAULT_BURN_IN_POLL_INTERVAL_MS;
use airguard_core::{Algorithm, CalibrationMode, StationConfig, TemperatureUnit};

use crate::error::{StationError, StationResult};

/// Values set on the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub tick_interval_ms: Option<u64>,
    pub window_capacity: Option<usize>,
    pub algorithm: Option<Algorithm>,
    pub temperature_unit: Option<TemperatureUnit>,
    /// Burn-in length; switches calibration to burn-in mode
    pub burn_in_secs: Option<u64>,
    /// Constant baseline; switches calibration to constant mode
    pub baseline_ohms: Option<f64>,
    /// Abort instead of falling back when burn-in fails
    pub no_fallback: bool,
}

impl Overrides {
    /// Apply on top of `config`
    pub fn apply(&self, mut config: StationConfig) -> StationConfig {
        if let Some(interval) = self.tick_interval_ms {
            config.tick_interval_ms = interval;
        }
        if let Some(capacity) = self.window_capacity {
            config.window_capacity = capacity;
        }
        if let Some(algorithm) = self.algorithm {
            config.algorithm = algorithm;
        }
        if let Some(unit) = self.temperature_unit {
            config.temperature_unit = unit;
        }
        if let Some(baseline_ohms) = self.baseline_ohms {
            config.calibration = CalibrationMode::Constant { baseline_ohms };
        }
        if let Some(secs) = self.burn_in_secs {
            let poll_interval_ms = match config.calibration {
                CalibrationMode::BurnIn { poll_interval_ms, .. } => poll_interval_ms,
                CalibrationMode::Constant { .. } => DEFAULT_BURN_IN_POLL_INTERVAL_MS,
            };
            config.calibration = CalibrationMode::BurnIn {
                duration_ms: secs.saturating_mul(1000),
                poll_interval_ms,
            };
        }
        if self.no_fallback {
            config.calibration_fallback_ohms = None;
        }
        config
    }
}

/// Read a config file
pub fn load_file(path: &Path) -> StationResult<StationConfig> {
    let text = fs::read_to_string(path).map_err(|source| StationError::ConfigFile {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&text).map_err(|source| StationError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Defaults, then `path` if given, then `overrides`; validated
pub fn resolve(path: Option<&Path>, overrides: &Overrides) -> StationResult<StationConfig> {
    let base = match path {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            load_file(path)?
        }
        None => StationConfig::default(),
    };

    let config = overrides.apply(base);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win() {
        let overrides = Overrides {
            window_capacity: Some(60),
            algorithm: Some(Algorithm::PiecewiseThreshold),
            burn_in_secs: Some(120),
            no_fallback: true,
            ..Overrides::default()
        };

        let config = overrides.apply(StationConfig::default());
        assert_eq!(config.window_capacity, 60);
        assert_eq!(config.algorithm, Algorithm::PiecewiseThreshold);
        assert_eq!(
            config.calibration,
            CalibrationMode::BurnIn { duration_ms: 120_000, poll_interval_ms: 1_000 }
        );
        assert_eq!(config.calibration_fallback_ohms, None);
    }

    #[test]
    fn burn_in_keeps_configured_poll_interval() {
        let base = StationConfig::default().with_calibration(CalibrationMode::BurnIn {
            duration_ms: 300_000,
            poll_interval_ms: 250,
        });
        let overrides = Overrides { burn_in_secs: Some(10), ..Overrides::default() };

        assert_eq!(
            overrides.apply(base).calibration,
            CalibrationMode::BurnIn { duration_ms: 10_000, poll_interval_ms: 250 }
        );
    }

    #[test]
    fn empty_overrides_change_nothing() {
        let base = StationConfig::default().with_window_capacity(7);
        assert_eq!(Overrides::default().apply(base), base);
    }

    #[test]
    fn invalid_override_rejected() {
        let overrides = Overrides { tick_interval_ms: Some(0), ..Overrides::default() };
        assert!(matches!(resolve(None, &overrides), Err(StationError::Pipeline(_))));
    }
}
