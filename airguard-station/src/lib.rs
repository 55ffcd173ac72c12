//! AirGuard station
//!
//! Everything around the core pipeline that touches the outside world:
//!
//! - [`simulated`]: synthetic BME680 for running without hardware
//! - [`watchdog`]: timeout around blocking sensor reads
//! - [`export`]: JSON-lines and console sinks
//! - [`settings`]: config file + command-line layering
//!
//! The `airguard-station` binary wires these together.

#![deny(unsafe_code)]

pub mod error;
pub mod export;
pub mod settings;
pub mod simulated;
pub mod watchdog;

pub use error::{StationError, StationResult};
pub use export::{ConsoleSink, JsonLinesSink};
pub use settings::Overrides;
pub use simulated::{Environment, SimulatedBme680};
pub use watchdog::WatchdogSensor;
