//! Pluggable event sinks.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::Level;

use crate::events::SimulationEvent;

/// Trait for event consumers.
pub trait EventSink: Send {
    /// Process a single event.
    fn handle(&mut self, event: &SimulationEvent);

    /// Called when the simulation ends.
    fn finalize(&mut self) {}

    /// Returns a human-readable name for this sink.
    fn name(&self) -> &str;
}

/// Collects events into a shared in-memory log.
///
/// The log outlives the sink: keep a clone of [`log`](VecSink::log)
/// before boxing the sink into a bus.
#[derive(Default)]
pub struct VecSink {
    events: Arc<Mutex<Vec<SimulationEvent>>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the collected events.
    pub fn log(&self) -> Arc<Mutex<Vec<SimulationEvent>>> {
        Arc::clone(&self.events)
    }

    /// Copy of everything collected so far.
    pub fn snapshot(&self) -> Vec<SimulationEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &SimulationEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// Forwards events to `tracing` at a fixed level.
pub struct TracingSink {
    level: Level,
}

impl TracingSink {
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(Level::DEBUG)
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &SimulationEvent) {
        let (step, name, kind) = (event.step, event.name(), &event.kind);
        if self.level == Level::ERROR {
            tracing::error!(step, event = name, ?kind, "simulation_event");
        } else if self.level == Level::WARN {
            tracing::warn!(step, event = name, ?kind, "simulation_event");
        } else if self.level == Level::INFO {
            tracing::info!(step, event = name, ?kind, "simulation_event");
        } else if self.level == Level::DEBUG {
            tracing::debug!(step, event = name, ?kind, "simulation_event");
        } else {
            tracing::trace!(step, event = name, ?kind, "simulation_event");
        }
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}
