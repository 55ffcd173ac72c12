//! Gas Baseline Calibration
//!
//! ## Overview
//!
//! A MOX gas sensor has no absolute zero: its resistance in clean air varies
//! from part to part and drifts with age. Scoring therefore measures every
//! reading against a *baseline* resistance established once at startup.
//!
//! Two modes are supported:
//!
//! - **Constant**: use a pre-measured value. No sensor access, returns immediately.
//! - **Burn-in**: poll the sensor for a fixed wall-clock duration while the
//!   heater plate settles, then average the most recent stable readings.
//!
//! ## Burn-in Averaging
//!
//! Early readings are dominated by the heater warming up, so only the last
//! [`BURN_IN_AVERAGE_WINDOW`] heat-stable readings contribute. When the burn-in
//! produced fewer than that, the mean is taken over what was collected:
//!
//! ```text
//! stable readings:  g1 g2 ... gk
//! baseline       =  mean(g[max(1, k-49)..=k])
//! ```
//!
//! A burn-in with no stable reading at all fails with
//! [`AirGuardError::CalibrationFailed`]; it never yields zero or NaN.
//!
//! ## Ownership
//!
//! Burn-in borrows the sensor mutably for its whole duration, so the sampling
//! loop cannot touch the sensor until calibration has returned.

use heapless::HistoryBuffer;
use serde::{Deserialize, Serialize};

use crate::constants::scoring::BURN_IN_AVERAGE_WINDOW;
use crate::constants::sensors::DEFAULT_GAS_BASELINE_OHMS;
use crate::constants::time::{DEFAULT_BURN_IN_DURATION_MS, DEFAULT_BURN_IN_POLL_INTERVAL_MS};
use crate::errors::{AirGuardError, AirGuardResult};
use crate::sample::Baseline;
use crate::time::{Clock, Timestamp};
use crate::traits::SensorPort;

/// How the baseline is established
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CalibrationMode {
    /// Pre-measured clean-air resistance
    Constant {
        /// Gas resistance treated as clean air
        baseline_ohms: f64,
    },
    /// Measure the baseline by polling the sensor
    BurnIn {
        /// Wall-clock length of the burn-in, from the first poll
        duration_ms: u64,
        /// Spacing between polls
        poll_interval_ms: u64,
    },
}

impl CalibrationMode {
    /// Five-minute burn-in polled once per second
    pub const fn default_burn_in() -> Self {
        Self::BurnIn {
            duration_ms: DEFAULT_BURN_IN_DURATION_MS,
            poll_interval_ms: DEFAULT_BURN_IN_POLL_INTERVAL_MS,
        }
    }
}

impl Default for CalibrationMode {
    fn default() -> Self {
        Self::Constant { baseline_ohms: DEFAULT_GAS_BASELINE_OHMS }
    }
}

/// Running mean over the most recent stable gas readings
///
/// Keeps at most [`BURN_IN_AVERAGE_WINDOW`] values regardless of how long
/// the burn-in runs.
#[derive(Debug, Default)]
pub struct BaselineAccumulator {
    recent: HistoryBuffer<f64, BURN_IN_AVERAGE_WINDOW>,
    total: usize,
}

impl BaselineAccumulator {
    /// Empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one stable reading, returning false if it cannot be used
    pub fn push(&mut self, gas_resistance_ohms: f64) -> bool {
        if !gas_resistance_ohms.is_finite() || gas_resistance_ohms <= 0.0 {
            return false;
        }
        self.recent.write(gas_resistance_ohms);
        self.total += 1;
        true
    }

    /// Readings accepted so far, including those already rotated out
    pub fn total(&self) -> usize {
        self.total
    }

    /// Mean of the last `min(50, total)` readings
    pub fn mean(&self) -> Option<f64> {
        let window = self.recent.as_slice();
        if window.is_empty() {
            return None;
        }
        Some(window.iter().sum::<f64>() / window.len() as f64)
    }
}

/// Counters from one burn-in run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BurnInStats {
    /// Total polls issued
    pub polls: u32,
    /// Polls whose reading was heat-stable and usable
    pub stable: u32,
    /// Polls with a reading whose heater had not settled
    pub unstable: u32,
    /// Polls that returned no data or failed
    pub unavailable: u32,
}

/// Result of a successful burn-in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurnInOutcome {
    /// Mean of the most recent stable readings
    pub baseline: Baseline,
    /// What the burn-in polls returned
    pub stats: BurnInStats,
}

/// Establishes the gas baseline before sampling starts
pub struct Calibrator<C: Clock> {
    clock: C,
}

impl<C: Clock> Calibrator<C> {
    /// Calibrator timing its polls with `clock`
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Produce a baseline using `mode`
    ///
    /// Constant mode never touches `sensor`.
    pub fn calibrate<S: SensorPort>(
        &self,
        mode: CalibrationMode,
        sensor: &mut S,
    ) -> AirGuardResult<Baseline> {
        match mode {
            CalibrationMode::Constant { baseline_ohms } => {
                let baseline = Baseline::constant(baseline_ohms, self.clock.now());
                if !baseline.is_usable() {
                    return Err(AirGuardError::InvalidConfig {
                        reason: "constant baseline must be positive and finite",
                    });
                }
                log::info!("Using constant gas baseline {:.0} Ohms", baseline_ohms);
                Ok(baseline)
            }
            CalibrationMode::BurnIn { duration_ms, poll_interval_ms } => self
                .burn_in(duration_ms, poll_interval_ms, sensor)
                .map(|outcome| outcome.baseline),
        }
    }

    /// Calibrate, falling back to a constant baseline if burn-in fails
    ///
    /// With `fallback_ohms == None` a failed burn-in is returned to the caller.
    pub fn calibrate_or_fallback<S: SensorPort>(
        &self,
        mode: CalibrationMode,
        fallback_ohms: Option<f64>,
        sensor: &mut S,
    ) -> AirGuardResult<Baseline> {
        match self.calibrate(mode, sensor) {
            Err(err @ AirGuardError::CalibrationFailed { .. }) => match fallback_ohms {
                Some(baseline_ohms) => {
                    log::warn!("{err}; falling back to constant baseline");
                    self.calibrate(CalibrationMode::Constant { baseline_ohms }, sensor)
                }
                None => Err(err),
            },
            other => other,
        }
    }

    /// Poll `sensor` every `poll_interval_ms` for `duration_ms`
    pub fn burn_in<S: SensorPort>(
        &self,
        duration_ms: u64,
        poll_interval_ms: u64,
        sensor: &mut S,
    ) -> AirGuardResult<BurnInOutcome> {
        if duration_ms == 0 || poll_interval_ms == 0 {
            return Err(AirGuardError::InvalidConfig {
                reason: "burn-in duration and poll interval must be non-zero",
            });
        }

        let start: Timestamp = self.clock.now();
        let deadline = start.saturating_add(duration_ms);
        let mut next_poll = start;
        let mut accumulator = BaselineAccumulator::new();
        let mut stats = BurnInStats::default();

        log::info!(
            "Burn-in started: {}s, polling every {}ms",
            duration_ms / 1000,
            poll_interval_ms
        );

        loop {
            stats.polls += 1;
            match sensor.poll() {
                Ok(sample) if sample.heat_stable => {
                    if accumulator.push(sample.gas_resistance_ohms) {
                        stats.stable += 1;
                        log::trace!("Burn-in gas: {} Ohms", sample.gas_resistance_ohms);
                    } else {
                        stats.unavailable += 1;
                        log::debug!("Burn-in discarded unusable gas reading");
                    }
                }
                Ok(_) => stats.unstable += 1,
                Err(nb::Error::WouldBlock) => stats.unavailable += 1,
                Err(nb::Error::Other(e)) => {
                    stats.unavailable += 1;
                    log::debug!("Burn-in poll failed: {e}");
                }
            }

            next_poll = next_poll.saturating_add(poll_interval_ms);
            if next_poll >= deadline || self.clock.now() >= deadline {
                break;
            }
            self.clock.sleep_until(next_poll);
        }

        let Some(mean) = accumulator.mean() else {
            log::warn!(
                "Burn-in produced no heat-stable reading ({} polls, {} unstable)",
                stats.polls,
                stats.unstable
            );
            return Err(AirGuardError::CalibrationFailed {
                polls: stats.polls,
                unstable: stats.unstable,
            });
        };

        let baseline = Baseline {
            gas_resistance_ohms: mean,
            established_at: self.clock.now(),
        };

        log::info!(
            "Burn-in complete: baseline {:.0} Ohms from {} stable readings ({} polls)",
            mean,
            stats.stable,
            stats.polls
        );

        Ok(BurnInOutcome { baseline, stats })
    }
}
