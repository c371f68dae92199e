//! Simulation state — the field buffers of one simulation instance.
//!
//! Owns one canonical buffer per [`Field`] plus the step bookkeeping the
//! scheduler needs to gate submissions. Outside an in-flight step each
//! canonical buffer is the authoritative value of its field.

use glam::Vec2;

use eddy_gpu::{CommandList, ComputeBackend, Fence};
use eddy_types::{BufferId, EddyResult, Field, Grid};

use crate::config::Seed;
use crate::operators;

/// Where the step pipeline stands.
#[derive(Debug, Clone)]
pub enum StepPhase {
    Idle,
    /// A step was submitted and its fence has not been observed signaled.
    StepIssued { fence: Fence, frame_time: f64 },
}

/// Canonical buffer of each field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSlots {
    pub density: BufferId,
    /// Horizontal velocity.
    pub u: BufferId,
    /// Vertical velocity.
    pub v: BufferId,
    pub density_source: BufferId,
    pub u_source: BufferId,
    pub v_source: BufferId,
}

impl FieldSlots {
    pub fn get(&self, field: Field) -> BufferId {
        match field {
            Field::Density => self.density,
            Field::HorizontalVelocity => self.u,
            Field::VerticalVelocity => self.v,
            Field::DensitySource => self.density_source,
            Field::HorizontalVelocitySource => self.u_source,
            Field::VerticalVelocitySource => self.v_source,
        }
    }

    pub fn all(&self) -> [BufferId; 6] {
        Field::ALL.map(|f| self.get(f))
    }
}

/// All buffers and step bookkeeping of one simulation.
///
/// Replaced whole when the grid changes.
#[derive(Debug)]
pub struct SimulationState {
    grid: Grid,
    fields: FieldSlots,
    pub(crate) phase: StepPhase,
    /// True from issuing a step until its completion is observed.
    pub(crate) frame_in_progress: bool,
    pub(crate) last_frame_time: Option<f64>,
    pub(crate) last_completed_frame_time: Option<f64>,
    pub(crate) steps_issued: u64,
}

impl SimulationState {
    /// Allocates zeroed field buffers, then writes the optional seed.
    pub fn new<B: ComputeBackend>(backend: &mut B, grid: Grid, seed: Option<&Seed>) -> EddyResult<Self> {
        let fields = FieldSlots {
            density: backend.create_buffer(grid)?,
            u: backend.create_buffer(grid)?,
            v: backend.create_buffer(grid)?,
            density_source: backend.create_buffer(grid)?,
            u_source: backend.create_buffer(grid)?,
            v_source: backend.create_buffer(grid)?,
        };

        if let Some(seed) = seed {
            let mut list = CommandList::new("seed");
            operators::inject_source_at_point(
                &mut list,
                fields.get(seed.field),
                Vec2::new(seed.x, seed.y),
                seed.radius,
                seed.magnitude,
            );
            let fence = backend.submit(list)?;
            backend.wait(&fence)?;
        }

        Ok(Self {
            grid,
            fields,
            phase: StepPhase::Idle,
            frame_in_progress: false,
            last_frame_time: None,
            last_completed_frame_time: None,
            steps_issued: 0,
        })
    }

    /// Frees every field buffer.
    pub fn release<B: ComputeBackend>(self, backend: &mut B) -> EddyResult<()> {
        for id in self.fields.all() {
            backend.release_buffer(id)?;
        }
        Ok(())
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn fields(&self) -> &FieldSlots {
        &self.fields
    }

    pub fn buffer(&self, field: Field) -> BufferId {
        self.fields.get(field)
    }

    pub fn phase(&self) -> &StepPhase {
        &self.phase
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, StepPhase::Idle)
    }

    pub fn frame_in_progress(&self) -> bool {
        self.frame_in_progress
    }

    /// Frame time of the most recently issued step.
    pub fn last_frame_time(&self) -> Option<f64> {
        self.last_frame_time
    }

    /// Frame time of the most recent step observed complete.
    pub fn last_completed_frame_time(&self) -> Option<f64> {
        self.last_completed_frame_time
    }

    pub fn steps_issued(&self) -> u64 {
        self.steps_issued
    }

    /// Measures the next step's `dt` from `frame_time`.
    ///
    /// Drivers call this when resuming after a pause so the first step
    /// does not cover the whole pause.
    pub fn resume_clock_at(&mut self, frame_time: f64) {
        self.last_frame_time = Some(frame_time);
    }

    /// The in-flight fence and its frame time, if any.
    pub(crate) fn in_flight(&self) -> Option<(&Fence, f64)> {
        match &self.phase {
            StepPhase::StepIssued { fence, frame_time } => Some((fence, *frame_time)),
            StepPhase::Idle => None,
        }
    }

    /// Records that the in-flight step finished. Returns its frame time.
    pub(crate) fn complete_step(&mut self) -> Option<f64> {
        let (_, frame_time) = self.in_flight()?;
        self.phase = StepPhase::Idle;
        self.frame_in_progress = false;
        self.last_completed_frame_time = Some(frame_time);
        Some(frame_time)
    }

    pub(crate) fn issue_step(&mut self, fence: Fence, frame_time: f64) {
        self.phase = StepPhase::StepIssued { fence, frame_time };
        self.frame_in_progress = true;
        self.last_frame_time = Some(frame_time);
        self.steps_issued += 1;
    }
}
