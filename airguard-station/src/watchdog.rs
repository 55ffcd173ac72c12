//! Sensor-read watchdog
//!
//! A hung I2C transaction would otherwise stall the sampling loop forever.
//! [`WatchdogSensor`] moves the real sensor onto a worker thread and waits
//! for each read with a deadline:
//!
//! ```text
//!   poll() ──(seq n)──► worker: sensor.poll() ──(seq n, result)──► poll()
//!      │                                                            │
//!      └────────────── recv_timeout(deadline) ──────────────────────┘
//!                         expired → SensorTimeout
//! ```
//!
//! At most one read is in flight. While the worker is stuck, later polls
//! wait on that same read instead of queueing new ones. A read that finished
//! after every poll gave up on it is discarded and replaced by a fresh one.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use airguard_core::{AirGuardError, RawSample, SensorPort};

use crate::error::StationResult;

type PollResult = nb::Result<RawSample, AirGuardError>;

/// [`SensorPort`] wrapper that bounds every read with a timeout
pub struct WatchdogSensor {
    requests: Sender<u64>,
    results: Receiver<(u64, PollResult)>,
    next_seq: u64,
    /// Request the worker has not answered yet
    in_flight: Option<u64>,
    timeout: Duration,
    timeouts: u64,
}

impl WatchdogSensor {
    /// Move `sensor` onto a worker thread, allowing `timeout_ms` per read
    pub fn spawn<S>(mut sensor: S, timeout_ms: u64) -> StationResult<Self>
    where
        S: SensorPort + Send + 'static,
    {
        let (requests, request_rx) = mpsc::channel::<u64>();
        let (result_tx, results) = mpsc::channel();

        thread::Builder::new()
            .name("airguard-sensor".into())
            .spawn(move || {
                // Exits once the watchdog is dropped
                while let Ok(seq) = request_rx.recv() {
                    if result_tx.send((seq, sensor.poll())).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            requests,
            results,
            next_seq: 0,
            in_flight: None,
            timeout: Duration::from_millis(timeout_ms),
            timeouts: 0,
        })
    }

    /// Reads that missed their deadline so far
    pub fn timeouts(&self) -> u64 {
        self.timeouts
    }

    /// Reuse the outstanding request, or send a new one
    fn request(&mut self) -> Result<u64, nb::Error<AirGuardError>> {
        if let Some(seq) = self.in_flight {
            match self.results.try_recv() {
                Ok((done, _)) => log::debug!("Discarding late sensor read #{done}"),
                Err(TryRecvError::Empty) => return Ok(seq),
                Err(TryRecvError::Disconnected) => return Err(Self::worker_gone()),
            }
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.requests.send(seq).map_err(|_| Self::worker_gone())?;
        self.in_flight = Some(seq);
        Ok(seq)
    }

    fn worker_gone() -> nb::Error<AirGuardError> {
        nb::Error::Other(AirGuardError::SensorUnavailable {
            reason: "sensor worker stopped",
        })
    }
}

impl SensorPort for WatchdogSensor {
    fn poll(&mut self) -> PollResult {
        let seq = self.request()?;

        match self.results.recv_timeout(self.timeout) {
            Ok((done, result)) => {
                debug_assert_eq!(done, seq);
                self.in_flight = None;
                result
            }
            Err(RecvTimeoutError::Timeout) => {
                self.timeouts += 1;
                let waited_ms = self.timeout.as_millis() as u64;
                log::warn!("Sensor read #{seq} exceeded {waited_ms}ms");
                Err(nb::Error::Other(AirGuardError::SensorTimeout { waited_ms }))
            }
            Err(RecvTimeoutError::Disconnected) => Err(Self::worker_gone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn sample(gas: f64) -> RawSample {
        RawSample {
            timestamp: 0,
            temperature_c: 25.0,
            pressure_hpa: 1000.0,
            humidity_pct: 40.0,
            gas_resistance_ohms: gas,
            heat_stable: true,
        }
    }

    /// Sleeps for the scripted delay before answering
    struct SlowSensor {
        delays_ms: Arc<Mutex<Vec<u64>>>,
        reads: f64,
    }

    impl SensorPort for SlowSensor {
        fn poll(&mut self) -> PollResult {
            let delay = self.delays_ms.lock().unwrap().pop().unwrap_or(0);
            thread::sleep(Duration::from_millis(delay));
            self.reads += 1.0;
            Ok(sample(self.reads))
        }
    }

    #[test]
    fn fast_reads_pass_through() {
        let sensor = SlowSensor { delays_ms: Arc::default(), reads: 0.0 };
        let mut watchdog = WatchdogSensor::spawn(sensor, 500).unwrap();

        assert_eq!(watchdog.poll().unwrap().gas_resistance_ohms, 1.0);
        assert_eq!(watchdog.poll().unwrap().gas_resistance_ohms, 2.0);
        assert_eq!(watchdog.timeouts(), 0);
    }

    #[test]
    fn hung_read_times_out_and_late_result_is_dropped() {
        // popped from the back: first read hangs for 300ms
        let delays = Arc::new(Mutex::new(vec![0, 300]));
        let sensor = SlowSensor { delays_ms: delays, reads: 0.0 };
        let mut watchdog = WatchdogSensor::spawn(sensor, 50).unwrap();

        assert!(matches!(
            watchdog.poll(),
            Err(nb::Error::Other(AirGuardError::SensorTimeout { waited_ms: 50 }))
        ));

        thread::sleep(Duration::from_millis(400));

        // read #1 finished late; read #2 is the one returned
        assert_eq!(watchdog.poll().unwrap().gas_resistance_ohms, 2.0);
        assert_eq!(watchdog.timeouts(), 1);
    }

    #[test]
    fn hang_does_not_queue_extra_reads() {
        // first read hangs for 400ms, the rest answer at once
        let delays = Arc::new(Mutex::new(vec![0, 0, 400]));
        let sensor = SlowSensor { delays_ms: delays, reads: 0.0 };
        let mut watchdog = WatchdogSensor::spawn(sensor, 50).unwrap();

        for _ in 0..3 {
            assert!(matches!(
                watchdog.poll(),
                Err(nb::Error::Other(AirGuardError::SensorTimeout { .. }))
            ));
        }

        thread::sleep(Duration::from_millis(500));

        // only the hung read reached the sensor during the outage
        assert_eq!(watchdog.poll().unwrap().gas_resistance_ohms, 2.0);
        assert_eq!(watchdog.poll().unwrap().gas_resistance_ohms, 3.0);
        assert_eq!(watchdog.timeouts(), 3);
    }

    #[test]
    fn no_data_is_forwarded() {
        struct Idle;
        impl SensorPort for Idle {
            fn poll(&mut self) -> PollResult {
                Err(nb::Error::WouldBlock)
            }
        }

        let mut watchdog = WatchdogSensor::spawn(Idle, 100).unwrap();
        assert!(matches!(watchdog.poll(), Err(nb::Error::WouldBlock)));
    }
}
