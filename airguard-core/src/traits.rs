//! Core traits for the pipeline seams
//!
//! The hardware driver and the renderer both live outside the core.
//! These traits are the only contact points, kept deliberately small.

use crate::errors::AirGuardError;
use crate::sample::RawSample;
use crate::window::WindowSnapshot;

/// Source of raw sensor readings
///
/// Follows the non-blocking `nb` convention:
/// - `Ok(sample)` - a fresh reading
/// - `Err(nb::Error::WouldBlock)` - no new data this poll
/// - `Err(nb::Error::Other(e))` - the read failed
///
/// ## Example Implementation
///
/// ```rust
/// use airguard_core::{SensorPort, RawSample, AirGuardError};
///
/// struct FixedSensor(RawSample);
///
/// impl SensorPort for FixedSensor {
///     fn poll(&mut self) -> nb::Result<RawSample, AirGuardError> {
///         Ok(self.0)
///     }
/// }
/// ```
pub trait SensorPort {
    /// Read the sensor once
    fn poll(&mut self) -> nb::Result<RawSample, AirGuardError>;
}

impl<S: SensorPort + ?Sized> SensorPort for &mut S {
    fn poll(&mut self) -> nb::Result<RawSample, AirGuardError> {
        (**self).poll()
    }
}

impl<S: SensorPort + ?Sized> SensorPort for Box<S> {
    fn poll(&mut self) -> nb::Result<RawSample, AirGuardError> {
        (**self).poll()
    }
}

/// Consumer of window snapshots (plotter, exporter, logger)
///
/// Called once per tick after a sample was scored and appended.
/// Implementations receive a borrowed snapshot and clone what they keep.
pub trait Sink {
    /// Hand the current window contents to the consumer
    fn publish(&mut self, snapshot: &WindowSnapshot) -> Result<(), AirGuardError>;
}

impl<K: Sink + ?Sized> Sink for &mut K {
    fn publish(&mut self, snapshot: &WindowSnapshot) -> Result<(), AirGuardError> {
        (**self).publish(snapshot)
    }
}

impl<K: Sink + ?Sized> Sink for Box<K> {
    fn publish(&mut self, snapshot: &WindowSnapshot) -> Result<(), AirGuardError> {
        (**self).publish(snapshot)
    }
}

/// Fan a snapshot out to several sinks
///
/// Every sink sees the snapshot; the first failure is reported.
impl<K: Sink> Sink for Vec<K> {
    fn publish(&mut self, snapshot: &WindowSnapshot) -> Result<(), AirGuardError> {
        let mut first_err = None;
        for sink in self.iter_mut() {
            if let Err(e) = sink.publish(snapshot) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}
