//! Event bus — per-frame event queue with pluggable sinks.
//!
//! The simulation facade owns the bus, queues events while it advances a
//! frame, and flushes once at the end of the frame so every sink sees
//! the events in emission order.

use std::collections::{BTreeMap, VecDeque};

use crate::events::SimulationEvent;
use crate::sinks::EventSink;

/// Ordered event queue feeding a set of sinks.
pub struct EventBus {
    queue: VecDeque<SimulationEvent>,
    sinks: Vec<Box<dyn EventSink>>,
    /// Delivered events per [`SimulationEvent::name`].
    delivered: BTreeMap<&'static str, u64>,
    enabled: bool,
}

impl EventBus {
    /// Creates an enabled bus with no sinks.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            sinks: Vec::new(),
            delivered: BTreeMap::new(),
            enabled: true,
        }
    }

    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Disabling drops events already queued as well as later ones.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.queue.clear();
        }
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Queues an event for the next flush.
    pub fn emit(&mut self, event: SimulationEvent) {
        if self.enabled {
            self.queue.push_back(event);
        }
    }

    /// Events queued since the last flush.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Hands every queued event to every sink, returning how many.
    pub fn flush(&mut self) -> usize {
        let count = self.queue.len();
        for event in self.queue.drain(..) {
            for sink in &mut self.sinks {
                sink.handle(&event);
            }
            *self.delivered.entry(event.name()).or_insert(0) += 1;
        }
        count
    }

    /// Number of delivered events named `name`, e.g. `"step_skipped"`.
    pub fn delivered(&self, name: &str) -> u64 {
        self.delivered.get(name).copied().unwrap_or(0)
    }

    /// Flushes, then lets every sink finalize.
    pub fn finalize(&mut self) {
        self.flush();
        for sink in &mut self.sinks {
            sink.finalize();
        }
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
