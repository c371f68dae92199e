//! # eddy-telemetry
//!
//! Event bus for simulation telemetry. The solver emits structured
//! events (steps issued, skipped, completed, field statistics) that are
//! consumed by pluggable sinks: `tracing` output or an in-memory log.

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::EventBus;
pub use events::{EventKind, SimulationEvent};
pub use sinks::{EventSink, TracingSink, VecSink};
