//! In-process sinks
//!
//! - [`MemorySink`] records every publication (tests, replays)
//! - [`LatestSnapshot`] hands the newest snapshot to another thread
//!
//! Exporters that write to files or the console live in the station crate.

use std::sync::{Arc, Mutex, PoisonError};

use crate::errors::AirGuardError;
use crate::traits::Sink;
use crate::window::WindowSnapshot;

/// Keeps a copy of every published snapshot
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    published: Vec<WindowSnapshot>,
}

impl MemorySink {
    /// Sink with nothing published yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of publications received
    pub fn count(&self) -> usize {
        self.published.len()
    }

    /// Most recent publication
    pub fn last(&self) -> Option<&WindowSnapshot> {
        self.published.last()
    }

    /// Every publication, oldest first
    pub fn all(&self) -> &[WindowSnapshot] {
        &self.published
    }
}

impl Sink for MemorySink {
    fn publish(&mut self, snapshot: &WindowSnapshot) -> Result<(), AirGuardError> {
        self.published.push(snapshot.clone());
        Ok(())
    }
}

/// Thread-safe slot holding the newest snapshot
///
/// The sampling loop publishes into one clone, a renderer polls another.
/// Readers get an `Arc` to an immutable snapshot and never block the loop
/// for longer than a pointer swap.
///
/// ```rust
/// use airguard_core::sink::LatestSnapshot;
///
/// let slot = LatestSnapshot::new();
/// let reader = slot.clone();
/// std::thread::spawn(move || {
///     if let Some(snapshot) = reader.get() {
///         println!("{} samples", snapshot.len());
///     }
/// });
/// ```
#[derive(Debug, Default, Clone)]
pub struct LatestSnapshot {
    slot: Arc<Mutex<Option<Arc<WindowSnapshot>>>>,
}

impl LatestSnapshot {
    /// Empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Newest snapshot, if any was published
    pub fn get(&self) -> Option<Arc<WindowSnapshot>> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Sink for LatestSnapshot {
    fn publish(&mut self, snapshot: &WindowSnapshot) -> Result<(), AirGuardError> {
        let shared = Arc::new(snapshot.clone());
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(shared);
        Ok(())
    }
}
