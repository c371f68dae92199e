//! Simulation event types.
//!
//! Lightweight value types emitted by the step scheduler and the
//! simulation facade.

use serde::{Deserialize, Serialize};

use eddy_types::Field;

/// A simulation event tagged with the step it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Step number (1-based once a step has been issued, 0 before).
    pub step: u64,
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// A step's command list was submitted.
    StepIssued {
        /// Host frame time that triggered the step (seconds).
        frame_time: f64,
        /// Timestep used by the step (seconds).
        dt: f32,
        /// Number of recorded commands.
        commands: usize,
    },

    /// A frame arrived while the previous step was still in flight.
    StepSkipped { frame_time: f64 },

    /// An issued step's fence was observed signaled.
    StepCompleted {
        /// Frame time the step was issued at.
        frame_time: f64,
        /// Seconds between issue and the frame that observed completion.
        ///
        /// A blocking wait measures to the latest frame seen instead.
        latency: f64,
    },

    /// Summary of one field after a step.
    FieldStats {
        field: Field,
        min: f32,
        max: f32,
        sum: f64,
    },

    /// Custom event for extensibility.
    Custom {
        label: String,
        /// JSON-encoded payload.
        payload: String,
    },
}

impl SimulationEvent {
    pub fn new(step: u64, kind: EventKind) -> Self {
        Self { step, kind }
    }

    /// Short snake_case tag of the payload.
    pub fn name(&self) -> &'static str {
        match self.kind {
            EventKind::StepIssued { .. } => "step_issued",
            EventKind::StepSkipped { .. } => "step_skipped",
            EventKind::StepCompleted { .. } => "step_completed",
            EventKind::FieldStats { .. } => "field_stats",
            EventKind::Custom { .. } => "custom",
        }
    }
}
