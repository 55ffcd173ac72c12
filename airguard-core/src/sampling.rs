//! Sampling Loop
//!
//! ## Overview
//!
//! Drives the pipeline on a fixed cadence:
//!
//! ```text
//!   tick ──► SensorPort::poll ──► heat stable? ──► offset + unit ──► score
//!                 │                    │                              │
//!              no data              dropped                           ▼
//!              / error                                   SlidingWindow::append
//!                                                                     │
//!                                                                     ▼
//!                                                          Sink::publish(snapshot)
//! ```
//!
//! ## State
//!
//! The loop is `Idle` until its first tick and `Running` afterwards. There is
//! no terminal state; [`SamplingLoop::run`] returns only when its
//! [`StopSignal`] is raised, which is checked between ticks.
//!
//! ## Scheduling
//!
//! Ticks are due every `tick_interval_ms`. A tick that overruns its slot is
//! followed immediately by the next one, and the schedule restarts from
//! there: late ticks are never replayed in a burst.
//!
//! ## Ownership
//!
//! The loop owns the sensor, the window and the sink. Ticks take `&mut self`,
//! so two ticks can never overlap.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::StationConfig;
use crate::constants::sensors::DEFAULT_TEMPERATURE_OFFSET_C;
use crate::constants::time::{DEFAULT_TICK_INTERVAL_MS, DEFAULT_WINDOW_CAPACITY};
use crate::errors::{AirGuardError, AirGuardResult};
use crate::sample::{Baseline, RawSample, ScoredSample, TemperatureUnit};
use crate::scoring::{AirQualityScorer, Algorithm};
use crate::time::{ms_to_seconds, Clock, Timestamp};
use crate::traits::{SensorPort, Sink};
use crate::window::SlidingWindow;

/// Cooperative cancellation flag shared between the loop and its owner
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    stopped: Arc<AtomicBool>,
}

impl StopSignal {
    /// Signal that has not been raised
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to return after the current tick
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Whether [`stop`](Self::stop) was called on any clone
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Loop lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No tick has run yet
    Idle,
    /// Ticking
    Running {
        /// Time of the first tick; elapsed seconds are measured from here
        started_at: Timestamp,
    },
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Sensor had no new reading
    NoData,
    /// Sensor read failed; nothing changed
    SensorFailed(AirGuardError),
    /// Reading dropped because the heater had not settled
    Unstable(RawSample),
    /// Sample appended to the window and offered to the sink
    Appended {
        /// The sample as stored in the window
        sample: ScoredSample,
        /// Sink error, if the publish failed
        sink_error: Option<AirGuardError>,
    },
}

/// Counters over the loop's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Ticks run
    pub ticks: u64,
    /// Samples added to the window
    pub appended: u64,
    /// Ticks where the sensor had nothing new
    pub no_data: u64,
    /// Readings dropped because the heater had not settled
    pub unstable: u64,
    /// Failed or timed out reads
    pub sensor_errors: u64,
    /// Publishes the sink rejected
    pub sink_errors: u64,
    /// Appended samples the scorer could not score
    pub unscored: u64,
}

/// Tunables of the sampling loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopSettings {
    /// Time between tick starts
    pub tick_interval_ms: u64,
    /// Samples kept in the window
    pub window_capacity: usize,
    /// Subtracted from the raw temperature before unit conversion
    pub temperature_offset_c: f64,
    /// Unit the corrected temperature is stored in
    pub temperature_unit: TemperatureUnit,
    /// Scoring formula
    pub algorithm: Algorithm,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            temperature_offset_c: DEFAULT_TEMPERATURE_OFFSET_C,
            temperature_unit: TemperatureUnit::Celsius,
            algorithm: Algorithm::WeightedBaseline,
        }
    }
}

impl From<&StationConfig> for LoopSettings {
    fn from(config: &StationConfig) -> Self {
        Self {
            tick_interval_ms: config.tick_interval_ms,
            window_capacity: config.window_capacity,
            temperature_offset_c: config.temperature_offset_c,
            temperature_unit: config.temperature_unit,
            algorithm: config.algorithm,
        }
    }
}

/// Periodic poll → score → window → sink driver
pub struct SamplingLoop<S, K, C> {
    sensor: S,
    sink: K,
    clock: C,
    baseline: Baseline,
    scorer: AirQualityScorer,
    window: SlidingWindow,
    settings: LoopSettings,
    state: LoopState,
    stats: LoopStats,
}

impl<S, K, C> SamplingLoop<S, K, C>
where
    S: SensorPort,
    K: Sink,
    C: Clock,
{
    /// Build a loop around an already established baseline
    pub fn new(
        baseline: Baseline,
        sensor: S,
        sink: K,
        clock: C,
        settings: LoopSettings,
    ) -> AirGuardResult<Self> {
        if !baseline.is_usable() {
            log::warn!(
                "Baseline {} Ohms is not usable; every sample will be unscored",
                baseline.gas_resistance_ohms
            );
        }
        if settings.tick_interval_ms == 0 {
            return Err(AirGuardError::InvalidConfig {
                reason: "tick interval must be non-zero",
            });
        }
        if !settings.temperature_offset_c.is_finite() {
            return Err(AirGuardError::InvalidConfig {
                reason: "temperature offset must be finite",
            });
        }

        let window = SlidingWindow::new(settings.window_capacity, settings.temperature_unit)?;

        Ok(Self {
            sensor,
            sink,
            clock,
            baseline,
            scorer: AirQualityScorer::new(settings.algorithm),
            window,
            settings,
            state: LoopState::Idle,
            stats: LoopStats::default(),
        })
    }

    /// Idle until the first tick
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Counters so far
    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// Baseline every sample is scored against
    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    /// Current window contents
    pub fn window(&self) -> &SlidingWindow {
        &self.window
    }

    /// The sink snapshots are published to
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Settings the loop was built with
    pub fn settings(&self) -> &LoopSettings {
        &self.settings
    }

    /// Give back the sensor and sink
    pub fn into_parts(self) -> (S, K) {
        (self.sensor, self.sink)
    }

    /// Run one poll/score/append/publish cycle
    pub fn tick(&mut self) -> TickOutcome {
        let now = self.clock.now();
        let started_at = match self.state {
            LoopState::Idle => {
                log::info!(
                    "Sampling started: every {}ms, window {}, {:?}",
                    self.settings.tick_interval_ms,
                    self.window.capacity(),
                    self.scorer.algorithm()
                );
                self.state = LoopState::Running { started_at: now };
                now
            }
            LoopState::Running { started_at } => started_at,
        };
        self.stats.ticks += 1;

        let raw = match self.sensor.poll() {
            Ok(raw) => raw,
            Err(nb::Error::WouldBlock) => {
                self.stats.no_data += 1;
                log::trace!("Tick {}: no data", self.stats.ticks);
                return TickOutcome::NoData;
            }
            Err(nb::Error::Other(e)) => {
                self.stats.sensor_errors += 1;
                if e.is_transient() {
                    log::warn!("Tick {} skipped: {e}", self.stats.ticks);
                } else {
                    log::error!("Tick {} skipped: {e}", self.stats.ticks);
                }
                return TickOutcome::SensorFailed(e);
            }
        };

        if !raw.heat_stable {
            self.stats.unstable += 1;
            log::debug!("Tick {}: heater not stable, dropped {raw}", self.stats.ticks);
            return TickOutcome::Unstable(raw);
        }

        let sample = self.score(raw, now.saturating_sub(started_at));
        self.window.append(&sample);
        self.stats.appended += 1;
        if sample.air_quality_index.is_none() {
            self.stats.unscored += 1;
        }

        log::debug!(
            "Tick {}: {raw} -> AQI {:?}",
            self.stats.ticks,
            sample.air_quality_index
        );

        let sink_error = self.sink.publish(&self.window.snapshot()).err();
        if let Some(e) = sink_error {
            self.stats.sink_errors += 1;
            log::warn!("Tick {}: {e}", self.stats.ticks);
        }

        TickOutcome::Appended { sample, sink_error }
    }

    /// Tick every `tick_interval_ms` until `stop` is raised
    pub fn run(&mut self, stop: &StopSignal) -> LoopStats {
        let interval = self.settings.tick_interval_ms;
        let mut next_tick = self.clock.now();

        while !stop.is_stopped() {
            self.tick();

            next_tick = next_tick.saturating_add(interval);
            let now = self.clock.now();
            if now >= next_tick {
                log::debug!("Tick overran by {}ms", now - next_tick);
                next_tick = now;
            } else {
                self.clock.sleep_until(next_tick);
            }
        }

        log::info!(
            "Sampling stopped after {} ticks ({} appended)",
            self.stats.ticks,
            self.stats.appended
        );
        self.stats
    }

    fn score(&self, raw: RawSample, elapsed_ms: u64) -> ScoredSample {
        let corrected_c = raw.temperature_c - self.settings.temperature_offset_c;

        ScoredSample {
            raw,
            temperature: self.settings.temperature_unit.from_celsius(corrected_c),
            air_quality_index: self.scorer.score(&raw, &self.baseline),
            elapsed_seconds: ms_to_seconds(elapsed_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use crate::time::ManualClock;
    use std::collections::VecDeque;

    struct QueueSensor {
        queue: VecDeque<nb::Result<RawSample, AirGuardError>>,
    }

    impl SensorPort for QueueSensor {
        fn poll(&mut self) -> nb::Result<RawSample, AirGuardError> {
            self.queue.pop_front().unwrap_or(Err(nb::Error::WouldBlock))
        }
    }

    fn raw(temperature_c: f64, heat_stable: bool) -> RawSample {
        RawSample {
            timestamp: 0,
            temperature_c,
            pressure_hpa: 1010.0,
            humidity_pct: 40.0,
            gas_resistance_ohms: 100_000.0,
            heat_stable,
        }
    }

    fn build(
        queue: Vec<nb::Result<RawSample, AirGuardError>>,
        clock: &ManualClock,
        settings: LoopSettings,
    ) -> SamplingLoop<QueueSensor, MemorySink, &ManualClock> {
        SamplingLoop::new(
            Baseline::constant(100_000.0, 0),
            QueueSensor { queue: queue.into() },
            MemorySink::new(),
            clock,
            settings,
        )
        .unwrap()
    }

    #[test]
    fn first_tick_starts_running() {
        let clock = ManualClock::new(7_000);
        let mut sampler = build(vec![], &clock, LoopSettings::default());
        assert_eq!(sampler.state(), LoopState::Idle);

        assert_eq!(sampler.tick(), TickOutcome::NoData);
        assert_eq!(sampler.state(), LoopState::Running { started_at: 7_000 });
    }

    #[test]
    fn offset_applied_before_conversion() {
        let clock = ManualClock::new(0);
        let settings = LoopSettings {
            temperature_unit: TemperatureUnit::Fahrenheit,
            ..LoopSettings::default()
        };
        let mut sampler = build(vec![Ok(raw(25.0, true))], &clock, settings);

        match sampler.tick() {
            TickOutcome::Appended { sample, sink_error } => {
                // (25 - 5) °C = 68 °F
                assert_eq!(sample.temperature, 68.0);
                assert_eq!(sample.air_quality_index, Some(100.0));
                assert!(sink_error.is_none());
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn unstable_and_failed_reads_leave_window_alone() {
        let clock = ManualClock::new(0);
        let queue = vec![
            Ok(raw(22.0, false)),
            Err(nb::Error::Other(AirGuardError::SensorUnavailable { reason: "nack" })),
        ];
        let mut sampler = build(queue, &clock, LoopSettings::default());

        assert!(matches!(sampler.tick(), TickOutcome::Unstable(_)));
        assert!(matches!(sampler.tick(), TickOutcome::SensorFailed(_)));
        assert!(sampler.window().is_empty());
        assert_eq!(sampler.sink().count(), 0);

        let stats = sampler.stats();
        assert_eq!(stats.unstable, 1);
        assert_eq!(stats.sensor_errors, 1);
    }

    #[test]
    fn elapsed_measured_from_first_tick() {
        let clock = ManualClock::new(1_000);
        let queue = vec![Ok(raw(22.0, true)), Ok(raw(22.0, true))];
        let mut sampler = build(queue, &clock, LoopSettings::default());

        sampler.tick();
        clock.advance(1_500);
        sampler.tick();

        let elapsed: Vec<_> = sampler.window().snapshot().elapsed_seconds;
        assert_eq!(elapsed, vec![0.0, 1.5]);
    }

    #[test]
    fn run_stops_between_ticks() {
        struct StoppingSensor {
            polls: u32,
            stop: StopSignal,
        }

        impl SensorPort for StoppingSensor {
            fn poll(&mut self) -> nb::Result<RawSample, AirGuardError> {
                self.polls += 1;
                if self.polls == 4 {
                    self.stop.stop();
                }
                Ok(raw(21.0, true))
            }
        }

        let clock = ManualClock::new(0);
        let stop = StopSignal::new();
        let sensor = StoppingSensor { polls: 0, stop: stop.clone() };
        let mut sampler = SamplingLoop::new(
            Baseline::constant(100_000.0, 0),
            sensor,
            MemorySink::new(),
            &clock,
            LoopSettings::default(),
        )
        .unwrap();

        let stats = sampler.run(&stop);
        assert_eq!(stats.ticks, 4);
        assert_eq!(stats.appended, 4);
        // ticks at 0, 500, 1000, 1500 then one more sleep
        assert_eq!(clock.now(), 2_000);
        assert_eq!(sampler.sink().count(), 4);
    }

    #[test]
    fn overrun_tick_restarts_schedule_without_burst() {
        /// Records when each poll happens; the second poll takes 1300ms
        struct SlowSecondRead<'a> {
            clock: &'a ManualClock,
            started: Vec<Timestamp>,
            stop: StopSignal,
        }

        impl SensorPort for SlowSecondRead<'_> {
            fn poll(&mut self) -> nb::Result<RawSample, AirGuardError> {
                self.started.push(self.clock.now());
                if self.started.len() == 2 {
                    self.clock.advance(1_300);
                }
                if self.started.len() == 5 {
                    self.stop.stop();
                }
                Ok(raw(21.0, true))
            }
        }

        let clock = ManualClock::new(0);
        let stop = StopSignal::new();
        let sensor = SlowSecondRead { clock: &clock, started: Vec::new(), stop: stop.clone() };
        let mut sampler = SamplingLoop::new(
            Baseline::constant(100_000.0, 0),
            sensor,
            MemorySink::new(),
            &clock,
            LoopSettings::default(),
        )
        .unwrap();

        let stats = sampler.run(&stop);
        assert_eq!(stats.ticks, 5);

        // 1000 and 1500 were missed: one immediate tick at 1800, then every 500ms
        let (sensor, _) = sampler.into_parts();
        assert_eq!(sensor.started, vec![0, 500, 1_800, 2_300, 2_800]);
    }

    #[test]
    fn zero_interval_rejected() {
        let clock = ManualClock::new(0);
        let settings = LoopSettings { tick_interval_ms: 0, ..LoopSettings::default() };
        let result = SamplingLoop::new(
            Baseline::constant(1.0, 0),
            QueueSensor { queue: VecDeque::new() },
            MemorySink::new(),
            &clock,
            settings,
        );
        assert!(matches!(result, Err(AirGuardError::InvalidConfig { .. })));
    }
}
