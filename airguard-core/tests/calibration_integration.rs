//! Integration tests for baseline calibration
//!
//! Drives the calibrator against scripted sensors on a manual clock, so a
//! five-minute burn-in runs instantly and deterministically.

mod common;

use airguard_core::{
    time::{Clock, ManualClock},
    AirGuardError, CalibrationMode, Calibrator,
};
use approx::assert_relative_eq;
use proptest::prelude::*;

use common::{mean, scenarios, ScriptedSensor};

const POLL_MS: u64 = 1_000;

fn burn_in(polls: usize) -> CalibrationMode {
    CalibrationMode::BurnIn {
        duration_ms: polls as u64 * POLL_MS,
        poll_interval_ms: POLL_MS,
    }
}

#[test]
fn constant_mode_never_reads_the_sensor() {
    let clock = ManualClock::new(42);
    let mut sensor = ScriptedSensor::stable(&[1.0, 2.0, 3.0]);

    let baseline = Calibrator::new(&clock)
        .calibrate(CalibrationMode::Constant { baseline_ohms: 125_000.0 }, &mut sensor)
        .unwrap();

    assert_eq!(baseline.gas_resistance_ohms, 125_000.0);
    assert_eq!(baseline.established_at, 42);
    assert_eq!(sensor.polls(), 0);
    assert_eq!(clock.now(), 42);
}

#[test]
fn short_burn_in_averages_what_it_collected() {
    let gases = [90_000.0, 100_000.0, 110_000.0, 120_000.0];
    let clock = ManualClock::new(0);
    let mut sensor = ScriptedSensor::stable(&gases);

    let baseline = Calibrator::new(&clock).calibrate(burn_in(10), &mut sensor).unwrap();

    // 4 readings: true mean, not sum / 50
    assert_relative_eq!(baseline.gas_resistance_ohms, 105_000.0, epsilon = 1e-6);
    assert_eq!(sensor.polls(), 10);
}

#[test]
fn long_burn_in_keeps_last_fifty() {
    let gases: Vec<f64> = (1..=80).map(|i| i as f64 * 1_000.0).collect();
    let clock = ManualClock::new(0);
    let mut sensor = ScriptedSensor::stable(&gases);

    let outcome = Calibrator::new(&clock).burn_in(80 * POLL_MS, POLL_MS, &mut sensor).unwrap();

    assert_relative_eq!(
        outcome.baseline.gas_resistance_ohms,
        mean(&gases[30..]),
        epsilon = 1e-6
    );
    assert_eq!(outcome.stats.stable, 80);
    assert_eq!(outcome.stats.polls, 80);
}

#[test]
fn warm_up_readings_are_skipped() {
    let clock = ManualClock::new(0);
    let mut sensor = ScriptedSensor::new();
    for sample in scenarios::heater_warm_up(3, &[60_000.0, 80_000.0]) {
        sensor.push(sample);
    }

    let outcome = Calibrator::new(&clock).burn_in(5 * POLL_MS, POLL_MS, &mut sensor).unwrap();

    assert_relative_eq!(outcome.baseline.gas_resistance_ohms, 70_000.0, epsilon = 1e-6);
    assert_eq!(outcome.stats.unstable, 3);
    assert_eq!(outcome.stats.stable, 2);
}

#[test]
fn no_stable_reading_fails() {
    let clock = ManualClock::new(0);
    let mut sensor = ScriptedSensor::new();
    sensor
        .push(common::unstable(5_000.0))
        .push_no_data()
        .push_failure()
        .push(common::unstable(6_000.0));

    let result = Calibrator::new(&clock).calibrate(burn_in(6), &mut sensor);

    assert_eq!(result, Err(AirGuardError::CalibrationFailed { polls: 6, unstable: 2 }));
}

#[test]
fn failed_burn_in_falls_back_when_configured() {
    let clock = ManualClock::new(0);
    let calibrator = Calibrator::new(&clock);

    let mut sensor = ScriptedSensor::new();
    let baseline = calibrator
        .calibrate_or_fallback(burn_in(3), Some(125_000.0), &mut sensor)
        .unwrap();
    assert_eq!(baseline.gas_resistance_ohms, 125_000.0);

    let mut sensor = ScriptedSensor::new();
    let result = calibrator.calibrate_or_fallback(burn_in(3), None, &mut sensor);
    assert!(matches!(result, Err(AirGuardError::CalibrationFailed { .. })));
}

#[test]
fn burn_in_duration_is_wall_clock() {
    let clock = ManualClock::new(10_000);
    let mut sensor = ScriptedSensor::stable(&[50_000.0; 100]);

    Calibrator::new(&clock).burn_in(30_000, 3_000, &mut sensor).unwrap();

    assert_eq!(sensor.polls(), 10);
    // last poll lands at start + 27s
    assert_eq!(clock.now(), 37_000);
}

proptest! {
    #[test]
    fn constant_mode_is_identity(baseline_ohms in 1.0f64..1.0e7) {
        let clock = ManualClock::new(0);
        let mut sensor = ScriptedSensor::stable(&[1.0]);

        let baseline = Calibrator::new(&clock)
            .calibrate(CalibrationMode::Constant { baseline_ohms }, &mut sensor)
            .unwrap();

        prop_assert_eq!(baseline.gas_resistance_ohms, baseline_ohms);
        prop_assert_eq!(sensor.polls(), 0);
    }

    #[test]
    fn burn_in_mean_of_last_min_50(gases in prop::collection::vec(1_000.0f64..500_000.0, 1..120)) {
        let clock = ManualClock::new(0);
        let mut sensor = ScriptedSensor::stable(&gases);

        let baseline = Calibrator::new(&clock)
            .calibrate(burn_in(gases.len()), &mut sensor)
            .unwrap();

        let kept = &gases[gases.len().saturating_sub(50)..];
        let expected = mean(kept);
        prop_assert!((baseline.gas_resistance_ohms - expected).abs() <= expected * 1e-9);
    }
}
