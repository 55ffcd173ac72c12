//! Sliding Multi-Channel Sample Window
//!
//! ## Overview
//!
//! The renderer plots the last N samples of every metric side by side, and
//! index `i` must mean the same reading on every plot. Rather than keeping one
//! list per metric and trimming each separately, the window stores one
//! [`WindowEntry`] per accepted sample in a single [`RingBuffer`]:
//!
//! ```text
//!            ┌──────── entry 0 ────────┐ ┌─ entry 1 ─┐      ┌─ entry C-1 ─┐
//! elapsed     0.5                          1.0          ...
//! temperature 21.3                         21.3         ...
//! pressure    1011.9                       1011.8       ...
//! humidity    41.2                         41.0         ...
//! gas         98000                        98400        ...
//! aqi         Some(97.1)                   Some(97.3)   ...
//! ```
//!
//! Every channel therefore grows, and is trimmed, together: there is exactly
//! one length and one capacity.
//!
//! ## Snapshots
//!
//! [`SlidingWindow::snapshot`] copies the window into a [`WindowSnapshot`], an
//! owned value the sink may keep, serialize, or hand to another thread. Taking
//! a snapshot never mutates the window.

use core::num::NonZeroUsize;

use serde::{Deserialize, Deserializer, Serialize};

use crate::buffer::RingBuffer;
use crate::constants::sensors::{OPTIMAL_INDOOR_HUMIDITY_PCT, SEA_LEVEL_PRESSURE_HPA};
use crate::errors::{AirGuardError, AirGuardResult};
use crate::sample::{ScoredSample, TemperatureUnit};
use crate::time::Timestamp;

/// One metric series of the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Seconds since the first tick
    ElapsedSeconds,
    /// Corrected temperature in the display unit
    Temperature,
    /// Pressure in hPa
    Pressure,
    /// Relative humidity in %
    Humidity,
    /// Gas resistance in Ohms
    GasResistance,
    /// Air quality index, absent when unscored
    AirQuality,
}

impl Channel {
    /// Every channel, in display order
    pub const ALL: [Channel; 6] = [
        Channel::ElapsedSeconds,
        Channel::Temperature,
        Channel::Pressure,
        Channel::Humidity,
        Channel::GasResistance,
        Channel::AirQuality,
    ];
}

/// Values retained from one scored sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowEntry {
    /// When the reading was taken
    pub timestamp: Timestamp,
    /// Seconds since the first tick
    pub elapsed_seconds: f64,
    /// Offset-corrected, in the window's display unit
    #[serde(deserialize_with = "nan_if_null")]
    pub temperature: f64,
    /// Pressure in hPa
    #[serde(deserialize_with = "nan_if_null")]
    pub pressure_hpa: f64,
    /// Relative humidity in %
    #[serde(deserialize_with = "nan_if_null")]
    pub humidity_pct: f64,
    /// Gas resistance in Ohms
    #[serde(deserialize_with = "nan_if_null")]
    pub gas_resistance_ohms: f64,
    /// `None` when the sample could not be scored
    pub air_quality_index: Option<f64>,
}

impl WindowEntry {
    /// Value of `channel` for this entry
    pub fn value(&self, channel: Channel) -> Option<f64> {
        match channel {
            Channel::ElapsedSeconds => Some(self.elapsed_seconds),
            Channel::Temperature => Some(self.temperature),
            Channel::Pressure => Some(self.pressure_hpa),
            Channel::Humidity => Some(self.humidity_pct),
            Channel::GasResistance => Some(self.gas_resistance_ohms),
            Channel::AirQuality => self.air_quality_index,
        }
    }
}

impl From<&ScoredSample> for WindowEntry {
    fn from(sample: &ScoredSample) -> Self {
        Self {
            timestamp: sample.raw.timestamp,
            elapsed_seconds: sample.elapsed_seconds,
            temperature: sample.temperature,
            pressure_hpa: sample.raw.pressure_hpa,
            humidity_pct: sample.raw.humidity_pct,
            gas_resistance_ohms: sample.raw.gas_resistance_ohms,
            air_quality_index: sample.air_quality_index,
        }
    }
}

/// Horizontal guide lines drawn next to the live series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLines {
    /// Standard sea-level pressure
    pub sea_level_pressure_hpa: f64,
    /// Humidity the scorers treat as ideal
    pub optimal_humidity_pct: f64,
}

impl Default for ReferenceLines {
    fn default() -> Self {
        Self {
            sea_level_pressure_hpa: SEA_LEVEL_PRESSURE_HPA,
            optimal_humidity_pct: OPTIMAL_INDOOR_HUMIDITY_PCT,
        }
    }
}

/// Fixed-capacity window over the most recent scored samples
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    entries: RingBuffer<WindowEntry>,
    temperature_unit: TemperatureUnit,
}

impl SlidingWindow {
    /// Window retaining at most `capacity` samples
    pub fn new(capacity: usize, temperature_unit: TemperatureUnit) -> AirGuardResult<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or(AirGuardError::InvalidConfig {
            reason: "window capacity must be at least 1",
        })?;
        Ok(Self {
            entries: RingBuffer::with_capacity(capacity),
            temperature_unit,
        })
    }

    /// Append every channel of `sample` at once, evicting the oldest entry when full
    pub fn append(&mut self, sample: &ScoredSample) -> Option<WindowEntry> {
        self.entries.push(WindowEntry::from(sample))
    }

    /// Samples currently held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True until the first append
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most samples the window keeps
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Unit of the temperature channel
    pub fn temperature_unit(&self) -> TemperatureUnit {
        self.temperature_unit
    }

    /// Newest entry
    pub fn latest(&self) -> Option<&WindowEntry> {
        self.entries.last()
    }

    /// Entries from oldest to newest
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &WindowEntry> + '_ {
        self.entries.iter()
    }

    /// One channel's values, oldest first
    pub fn channel(&self, channel: Channel) -> impl Iterator<Item = Option<f64>> + '_ {
        self.entries.iter().map(move |entry| entry.value(channel))
    }

    /// Owned copy of every channel
    pub fn snapshot(&self) -> WindowSnapshot {
        let len = self.entries.len();
        let mut snapshot = WindowSnapshot {
            capacity: self.capacity(),
            temperature_unit: self.temperature_unit,
            references: ReferenceLines::default(),
            timestamps: Vec::with_capacity(len),
            elapsed_seconds: Vec::with_capacity(len),
            temperature: Vec::with_capacity(len),
            pressure_hpa: Vec::with_capacity(len),
            humidity_pct: Vec::with_capacity(len),
            gas_resistance_ohms: Vec::with_capacity(len),
            air_quality_index: Vec::with_capacity(len),
        };

        for entry in self.entries.iter() {
            snapshot.timestamps.push(entry.timestamp);
            snapshot.elapsed_seconds.push(entry.elapsed_seconds);
            snapshot.temperature.push(entry.temperature);
            snapshot.pressure_hpa.push(entry.pressure_hpa);
            snapshot.humidity_pct.push(entry.humidity_pct);
            snapshot.gas_resistance_ohms.push(entry.gas_resistance_ohms);
            snapshot.air_quality_index.push(entry.air_quality_index);
        }

        snapshot
    }
}

/// Immutable per-channel copy of a [`SlidingWindow`]
///
/// All vectors have the same length; index `i` refers to the same sample
/// in every one of them.
///
/// JSON has no NaN or infinity, so non-finite readings serialize as `null`.
/// Reading a snapshot back turns those `null`s into NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSnapshot {
    /// Capacity of the window it was taken from
    pub capacity: usize,
    /// Unit of [`temperature`](Self::temperature)
    pub temperature_unit: TemperatureUnit,
    /// Guide lines for the pressure and humidity plots
    pub references: ReferenceLines,
    /// Reading times
    pub timestamps: Vec<Timestamp>,
    /// Seconds since the first tick
    pub elapsed_seconds: Vec<f64>,
    /// Corrected temperature in the display unit
    #[serde(deserialize_with = "nan_if_null_each")]
    pub temperature: Vec<f64>,
    /// Pressure in hPa
    #[serde(deserialize_with = "nan_if_null_each")]
    pub pressure_hpa: Vec<f64>,
    /// Relative humidity in %
    #[serde(deserialize_with = "nan_if_null_each")]
    pub humidity_pct: Vec<f64>,
    /// Gas resistance in Ohms
    #[serde(deserialize_with = "nan_if_null_each")]
    pub gas_resistance_ohms: Vec<f64>,
    /// Air quality index, `None` where unscored
    pub air_quality_index: Vec<Option<f64>>,
}

impl WindowSnapshot {
    /// Samples in the snapshot
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// True for a snapshot of an empty window
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Values of one channel, `None` where the channel has no value
    pub fn channel(&self, channel: Channel) -> Vec<Option<f64>> {
        match channel {
            Channel::ElapsedSeconds => self.elapsed_seconds.iter().copied().map(Some).collect(),
            Channel::Temperature => self.temperature.iter().copied().map(Some).collect(),
            Channel::Pressure => self.pressure_hpa.iter().copied().map(Some).collect(),
            Channel::Humidity => self.humidity_pct.iter().copied().map(Some).collect(),
            Channel::GasResistance => self.gas_resistance_ohms.iter().copied().map(Some).collect(),
            Channel::AirQuality => self.air_quality_index.clone(),
        }
    }

    /// Reassemble the entry at `index`
    pub fn entry(&self, index: usize) -> Option<WindowEntry> {
        Some(WindowEntry {
            timestamp: *self.timestamps.get(index)?,
            elapsed_seconds: *self.elapsed_seconds.get(index)?,
            temperature: *self.temperature.get(index)?,
            pressure_hpa: *self.pressure_hpa.get(index)?,
            humidity_pct: *self.humidity_pct.get(index)?,
            gas_resistance_ohms: *self.gas_resistance_ohms.get(index)?,
            air_quality_index: *self.air_quality_index.get(index)?,
        })
    }

    /// Newest entry
    pub fn latest(&self) -> Option<WindowEntry> {
        self.len().checked_sub(1).and_then(|i| self.entry(i))
    }
}

fn nan_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

fn nan_if_null_each<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
    let values = Vec::<Option<f64>>::deserialize(deserializer)?;
    Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}
