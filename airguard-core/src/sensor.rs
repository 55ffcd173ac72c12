//! Sensor driver settings
//!
//! The driver is configured exactly once, when it is opened. The core never
//! interprets these values beyond validating them; they are handed to
//! whatever [`SensorPort`](crate::SensorPort) implementation owns the bus.

use serde::{Deserialize, Serialize};

use crate::constants::sensors::{
    DEFAULT_HEATER_DURATION_MS, DEFAULT_HEATER_TEMPERATURE_C, DEFAULT_WARM_UP_READS,
    HEATER_DURATION_MAX_MS, HEATER_PROFILE_COUNT, HEATER_TEMPERATURE_MAX_C,
    HEATER_TEMPERATURE_MIN_C,
};
use crate::errors::{AirGuardError, AirGuardResult};

/// Hardware oversampling factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Oversampling {
    /// Measurement skipped
    Skip,
    /// One conversion
    X1,
    /// Two conversions
    X2,
    /// Four conversions
    X4,
    /// Eight conversions
    X8,
    /// Sixteen conversions
    X16,
}

impl Oversampling {
    /// Number of raw conversions averaged per reported value
    pub fn factor(self) -> u8 {
        match self {
            Self::Skip => 0,
            Self::X1 => 1,
            Self::X2 => 2,
            Self::X4 => 4,
            Self::X8 => 8,
            Self::X16 => 16,
        }
    }
}

/// IIR filter coefficient applied to temperature and pressure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterSize {
    /// No filtering
    Off,
    /// Coefficient 1
    Size1,
    /// Coefficient 3
    Size3,
    /// Coefficient 7
    Size7,
    /// Coefficient 15
    Size15,
    /// Coefficient 31
    Size31,
    /// Coefficient 63
    Size63,
    /// Coefficient 127
    Size127,
}

/// One gas heater profile slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaterProfile {
    /// Slot index (0-9)
    pub index: u8,
    /// Target plate temperature in °C
    pub temperature_c: u16,
    /// Heating time before the gas conversion in ms
    pub duration_ms: u16,
}

impl Default for HeaterProfile {
    fn default() -> Self {
        Self {
            index: 0,
            temperature_c: DEFAULT_HEATER_TEMPERATURE_C,
            duration_ms: DEFAULT_HEATER_DURATION_MS,
        }
    }
}

/// Driver configuration accepted once at construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorSettings {
    /// Humidity oversampling
    pub humidity_oversampling: Oversampling,
    /// Pressure oversampling
    pub pressure_oversampling: Oversampling,
    /// Temperature oversampling
    pub temperature_oversampling: Oversampling,
    /// IIR filter on temperature and pressure
    pub filter: FilterSize,
    /// Run the gas conversion after each T/P/H conversion
    pub gas_measurement: bool,
    /// Heater slot used for the gas conversion
    pub heater: HeaterProfile,
    /// Reads discarded right after opening the sensor
    pub warm_up_reads: u8,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            humidity_oversampling: Oversampling::X2,
            pressure_oversampling: Oversampling::X4,
            temperature_oversampling: Oversampling::X8,
            filter: FilterSize::Size3,
            gas_measurement: true,
            heater: HeaterProfile::default(),
            warm_up_reads: DEFAULT_WARM_UP_READS,
        }
    }
}

impl SensorSettings {
    /// Reject settings the BME680 cannot be programmed with
    pub fn validate(&self) -> AirGuardResult<()> {
        let heater = &self.heater;

        if heater.index >= HEATER_PROFILE_COUNT {
            return Err(AirGuardError::InvalidConfig {
                reason: "heater profile index must be 0-9",
            });
        }

        if !(HEATER_TEMPERATURE_MIN_C..=HEATER_TEMPERATURE_MAX_C).contains(&heater.temperature_c) {
            return Err(AirGuardError::InvalidConfig {
                reason: "heater temperature must be 200-400°C",
            });
        }

        if heater.duration_ms == 0 || heater.duration_ms > HEATER_DURATION_MAX_MS {
            return Err(AirGuardError::InvalidConfig {
                reason: "heater duration must be 1-4032ms",
            });
        }

        if self.temperature_oversampling == Oversampling::Skip {
            return Err(AirGuardError::InvalidConfig {
                reason: "temperature conversion cannot be skipped",
            });
        }

        Ok(())
    }
}
