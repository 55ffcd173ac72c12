//! Canned sensor sequences

use airguard_core::RawSample;

use super::{reading, unstable};

/// `n` distinguishable heat-stable readings
///
/// Reading `i` carries `i` in every channel so alignment can be checked
/// after the window has evicted its head.
pub fn numbered_run(n: usize) -> Vec<RawSample> {
    (0..n)
        .map(|i| {
            let k = i as f64;
            RawSample {
                timestamp: i as u64 * 500,
                temperature_c: 20.0 + k,
                pressure_hpa: 1000.0 + k,
                humidity_pct: 30.0 + k,
                gas_resistance_ohms: 80_000.0 + k,
                heat_stable: true,
            }
        })
        .collect()
}

/// Heater warming up: `warm_up` unstable polls, then stable readings
pub fn heater_warm_up(warm_up: usize, gases: &[f64]) -> Vec<RawSample> {
    let mut samples: Vec<_> = (0..warm_up).map(|_| unstable(10_000.0)).collect();
    samples.extend(gases.iter().map(|&gas| reading(gas)));
    samples
}
