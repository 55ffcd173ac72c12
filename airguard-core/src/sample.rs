//! Sample and baseline data types
//!
//! A [`RawSample`] lives for exactly one tick: the loop either drops it
//! (no heat-stable gas reading) or turns it into a [`ScoredSample`] whose
//! values are copied into the sliding window.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// One reading from the sensor, as reported by the driver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// When the reading was taken
    pub timestamp: Timestamp,
    /// Die temperature, before any offset correction
    pub temperature_c: f64,
    /// Barometric pressure
    pub pressure_hpa: f64,
    /// Relative humidity
    pub humidity_pct: f64,
    /// Resistance of the heated MOX gas sensor
    pub gas_resistance_ohms: f64,
    /// Heater plate reached its target, so the gas reading is valid
    pub heat_stable: bool,
}

impl fmt::Display for RawSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} C, {:.2} hPa, {:.2} %RH",
            self.temperature_c, self.pressure_hpa, self.humidity_pct
        )?;
        if self.heat_stable {
            write!(f, " {} Ohms", self.gas_resistance_ohms)?;
        }
        Ok(())
    }
}

/// Reference clean-air gas resistance
///
/// Established once at startup and read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    /// Clean-air gas resistance
    pub gas_resistance_ohms: f64,
    /// When calibration finished
    pub established_at: Timestamp,
}

impl Baseline {
    /// Baseline from a pre-measured value
    pub const fn constant(gas_resistance_ohms: f64, established_at: Timestamp) -> Self {
        Self { gas_resistance_ohms, established_at }
    }

    /// A baseline the scorer can divide by
    pub fn is_usable(&self) -> bool {
        self.gas_resistance_ohms.is_finite() && self.gas_resistance_ohms > 0.0
    }
}

/// Display unit for temperature channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureUnit {
    /// Degrees Celsius
    #[default]
    Celsius,
    /// Degrees Fahrenheit
    Fahrenheit,
}

impl TemperatureUnit {
    /// Convert a Celsius value into this unit
    pub fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    /// Unit suffix for labels
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }
}

/// A heat-stable sample after correction and scoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredSample {
    /// The reading this sample was derived from
    pub raw: RawSample,
    /// Offset-corrected temperature in the configured display unit
    pub temperature: f64,
    /// `None` when the scorer rejected its inputs
    pub air_quality_index: Option<f64>,
    /// Seconds since the sampling loop started
    pub elapsed_seconds: f64,
}
