//! Shared fixtures for the integration tests
//!
//! - [`ScriptedSensor`] replays a fixed list of poll results and counts polls
//! - [`reading`] / [`unstable`] build raw samples with sane defaults
//! - [`scenarios`] holds canned sequences reused across test files

#![allow(dead_code)]

use std::collections::VecDeque;

use airguard_core::{AirGuardError, RawSample, SensorPort};

pub mod scenarios;

/// Sensor that replays a script, then reports no data
#[derive(Debug, Default)]
pub struct ScriptedSensor {
    script: VecDeque<nb::Result<RawSample, AirGuardError>>,
    polls: usize,
}

impl ScriptedSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script of heat-stable readings with the given gas resistances
    pub fn stable(gases: &[f64]) -> Self {
        let mut sensor = Self::new();
        for &gas in gases {
            sensor.push(reading(gas));
        }
        sensor
    }

    pub fn push(&mut self, sample: RawSample) -> &mut Self {
        self.script.push_back(Ok(sample));
        self
    }

    pub fn push_no_data(&mut self) -> &mut Self {
        self.script.push_back(Err(nb::Error::WouldBlock));
        self
    }

    pub fn push_failure(&mut self) -> &mut Self {
        self.script.push_back(Err(nb::Error::Other(AirGuardError::SensorUnavailable {
            reason: "scripted failure",
        })));
        self
    }

    /// Number of times `poll` was called
    pub fn polls(&self) -> usize {
        self.polls
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl SensorPort for ScriptedSensor {
    fn poll(&mut self) -> nb::Result<RawSample, AirGuardError> {
        self.polls += 1;
        self.script.pop_front().unwrap_or(Err(nb::Error::WouldBlock))
    }
}

/// Heat-stable reading at room conditions
pub fn reading(gas_resistance_ohms: f64) -> RawSample {
    RawSample {
        timestamp: 0,
        temperature_c: 26.0,
        pressure_hpa: 1011.5,
        humidity_pct: 40.0,
        gas_resistance_ohms,
        heat_stable: true,
    }
}

/// Reading taken before the heater settled
pub fn unstable(gas_resistance_ohms: f64) -> RawSample {
    RawSample { heat_stable: false, ..reading(gas_resistance_ohms) }
}

/// Arithmetic mean, for hand-checking baselines
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
