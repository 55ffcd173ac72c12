//! Simulated BME680
//!
//! Synthetic stand-in for the hardware driver, used when no sensor is
//! attached and by the station tests. It behaves like the real part in the
//! ways the pipeline cares about:
//!
//! - The gas heater needs a few polls before readings are heat-stable
//! - A cold MOX plate reads low and the resistance climbs toward clean air
//! - Higher oversampling means less noise on the matching channel
//! - Reads can fail transiently (I2C NACK) at a configurable rate
//!
//! Noise comes from a seeded `StdRng`, so a given seed always replays the
//! same sequence.

use airguard_core::{
    sensor::Oversampling, time::Clock, AirGuardError, AirGuardResult, RawSample, SensorPort,
    SensorSettings,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Ambient conditions the simulated sensor sits in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    /// Die temperature, self-heating included
    pub temperature_c: f64,
    pub pressure_hpa: f64,
    pub humidity_pct: f64,
    /// Settled gas resistance in this air
    pub clean_air_ohms: f64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            temperature_c: 26.5,
            pressure_hpa: 1009.8,
            humidity_pct: 43.0,
            clean_air_ohms: 125_000.0,
        }
    }
}

/// Gas resistance of a cold plate
const COLD_PLATE_OHMS: f64 = 20_000.0;

/// Fraction of the remaining gap to clean air closed per poll
const GAS_SETTLE_RATE: f64 = 0.08;

/// Noise amplitude at x1 oversampling
const TEMPERATURE_NOISE_C: f64 = 0.2;
const PRESSURE_NOISE_HPA: f64 = 0.12;
const HUMIDITY_NOISE_PCT: f64 = 0.6;
const GAS_NOISE_FRACTION: f64 = 0.01;

/// Deterministic synthetic BME680
pub struct SimulatedBme680<C: Clock> {
    settings: SensorSettings,
    environment: Environment,
    clock: C,
    rng: StdRng,
    polls: u32,
    heat_up_polls: u32,
    gas_ohms: f64,
    failure_rate: f64,
}

impl<C: Clock> SimulatedBme680<C> {
    /// Open the sensor, performing the configured warm-up reads
    pub fn open(settings: SensorSettings, clock: C, seed: u64) -> AirGuardResult<Self> {
        settings.validate()?;

        let mut sensor = Self {
            settings,
            environment: Environment::default(),
            clock,
            rng: StdRng::seed_from_u64(seed),
            polls: 0,
            heat_up_polls: 3,
            gas_ohms: COLD_PLATE_OHMS,
            failure_rate: 0.0,
        };

        for _ in 0..settings.warm_up_reads {
            let _ = sensor.read();
        }
        log::debug!(
            "Simulated BME680 open: heater {}°C/{}ms, {} warm-up reads",
            settings.heater.temperature_c,
            settings.heater.duration_ms,
            settings.warm_up_reads
        );

        Ok(sensor)
    }

    /// Place the sensor in different air
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Polls before the heater reports stable, counted from open
    pub fn with_heat_up_polls(mut self, polls: u32) -> Self {
        self.heat_up_polls = polls;
        self
    }

    /// Probability of a transient read failure per poll
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn settings(&self) -> &SensorSettings {
        &self.settings
    }

    /// Change the air mid-run (e.g. a VOC source appears)
    pub fn set_environment(&mut self, environment: Environment) {
        self.environment = environment;
    }

    /// Polls performed, warm-up reads included
    pub fn polls(&self) -> u32 {
        self.polls
    }

    fn read(&mut self) -> nb::Result<RawSample, AirGuardError> {
        self.polls += 1;

        if self.failure_rate > 0.0 && self.rng.gen_bool(self.failure_rate) {
            return Err(nb::Error::Other(AirGuardError::SensorUnavailable {
                reason: "simulated I2C NACK",
            }));
        }

        let env = self.environment;
        let heat_stable = self.settings.gas_measurement && self.polls > self.heat_up_polls;
        if self.settings.gas_measurement {
            self.gas_ohms += (env.clean_air_ohms - self.gas_ohms) * GAS_SETTLE_RATE;
        }

        let temperature_c = env.temperature_c
            + self.noise(TEMPERATURE_NOISE_C, self.settings.temperature_oversampling);
        let pressure_hpa =
            env.pressure_hpa + self.noise(PRESSURE_NOISE_HPA, self.settings.pressure_oversampling);
        let humidity_pct = (env.humidity_pct
            + self.noise(HUMIDITY_NOISE_PCT, self.settings.humidity_oversampling))
        .clamp(0.0, 100.0);
        let gas_resistance_ohms = if heat_stable {
            let jitter = self.rng.gen_range(-GAS_NOISE_FRACTION..=GAS_NOISE_FRACTION);
            (self.gas_ohms * (1.0 + jitter)).round()
        } else {
            0.0
        };

        Ok(RawSample {
            timestamp: self.clock.now(),
            temperature_c,
            pressure_hpa,
            humidity_pct,
            gas_resistance_ohms,
            heat_stable,
        })
    }

    fn noise(&mut self, amplitude: f64, oversampling: Oversampling) -> f64 {
        let scaled = amplitude / f64::from(oversampling.factor().max(1)).sqrt();
        self.rng.gen_range(-scaled..=scaled)
    }
}

impl<C: Clock> SensorPort for SimulatedBme680<C> {
    fn poll(&mut self) -> nb::Result<RawSample, AirGuardError> {
        self.read()
    }
}
