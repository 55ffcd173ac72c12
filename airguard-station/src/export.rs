//! Snapshot exporters
//!
//! Two [`Sink`]s for the station:
//!
//! - [`JsonLinesSink`]: one JSON document per publish, for a plotting
//!   front end tailing a file or a pipe
//! - [`ConsoleSink`]: one human-readable line per publish with the newest
//!   sample and its index
//!
//! Both write to any `io::Write`. A write error is reported as
//! [`AirGuardError::SinkFailed`]; the sampling loop logs it and carries on.

use std::io::Write;

use airguard_core::{AirGuardError, Sink, WindowSnapshot};

/// Writes every snapshot as a single line of JSON
pub struct JsonLinesSink<W: Write> {
    writer: W,
    lines: u64,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, lines: 0 }
    }

    /// Lines written so far
    pub fn lines(&self) -> u64 {
        self.lines
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for JsonLinesSink<W> {
    fn publish(&mut self, snapshot: &WindowSnapshot) -> Result<(), AirGuardError> {
        serde_json::to_writer(&mut self.writer, snapshot).map_err(|e| {
            log::debug!("Snapshot encoding failed: {e}");
            AirGuardError::SinkFailed { reason: "failed to write JSON snapshot" }
        })?;
        self.writer
            .write_all(b"\n")
            .and_then(|()| self.writer.flush())
            .map_err(|e| {
                log::debug!("Snapshot write failed: {e}");
                AirGuardError::SinkFailed { reason: "failed to write JSON snapshot" }
            })?;

        self.lines += 1;
        Ok(())
    }
}

/// Prints the newest sample of each snapshot
///
/// ```text
/// 21.46 °C, 1009.73 hPa, 43.12 %RH, 124871 Ohms, AQI 98.6
/// ```
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl ConsoleSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> Sink for ConsoleSink<W> {
    fn publish(&mut self, snapshot: &WindowSnapshot) -> Result<(), AirGuardError> {
        let Some(entry) = snapshot.latest() else {
            return Ok(());
        };

        let aqi = match entry.air_quality_index {
            Some(aqi) => format!("{aqi:.1}"),
            None => "n/a".to_owned(),
        };

        writeln!(
            self.out,
            "{:.2} {}, {:.2} hPa, {:.2} %RH, {} Ohms, AQI {}",
            entry.temperature,
            snapshot.temperature_unit.symbol(),
            entry.pressure_hpa,
            entry.humidity_pct,
            entry.gas_resistance_ohms,
            aqi
        )
        .map_err(|_| AirGuardError::SinkFailed { reason: "console write failed" })
    }
}
