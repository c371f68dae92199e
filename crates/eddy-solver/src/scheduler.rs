//! Step scheduler — records and gates one simulation step per frame.
//!
//! ```text
//!            try_advance (fence signaled or none)
//!   Idle ───────────────────────────────────────▶ StepIssued
//!    ▲                                              │
//!    └──────────── fence observed signaled ─────────┘
//! ```
//!
//! A frame that finds the previous fence pending issues nothing and
//! returns [`AdvanceError::StillBusy`]: at most one step is ever in
//! flight, so no pass can read a buffer a running step still writes.

use eddy_gpu::{CommandList, ComputeBackend, FenceStatus};
use eddy_types::constants::FALLBACK_DT;
use eddy_types::{BoundaryMode, BufferId, EddyError, EddyResult, Grid, OutputSelector};

use crate::error::AdvanceError;
use crate::input::UserInput;
use crate::operators::{self, ProjectionScratch};
use crate::params::{FluidParams, SourceFade};
use crate::pingpong::PingPong;
use crate::state::{FieldSlots, SimulationState, StepPhase};

/// A step observed complete at the start of `try_advance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletedStep {
    /// Frame time the step was issued at.
    pub frame_time: f64,
    /// Frame time elapsed between issue and observation.
    pub latency: f64,
}

/// Outcome of an issued step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// 1-based index of the issued step.
    pub step: u64,
    pub frame_time: f64,
    pub dt: f32,
    /// Commands in the submitted list.
    pub commands: usize,
    /// The previous step, if this call observed its completion.
    pub completed: Option<CompletedStep>,
    /// Field to present.
    pub output: OutputSelector,
}

/// Buffers private to the step pipeline, never observed outside a step.
#[derive(Debug, Clone, Copy)]
struct ScratchBuffers {
    /// Add-source targets, also staging for advection and decay.
    stage: [BufferId; 2],
    u: PingPong,
    v: PingPong,
    projection: ProjectionScratch,
}

impl ScratchBuffers {
    fn all(&self) -> Vec<BufferId> {
        let mut ids = self.stage.to_vec();
        for pair in [self.u, self.v, self.projection.divergence, self.projection.pressure] {
            ids.extend(pair.slots());
        }
        ids
    }
}

/// Records steps into command lists and keeps one in flight at a time.
#[derive(Debug)]
pub struct StepScheduler {
    grid: Grid,
    scratch: ScratchBuffers,
}

impl StepScheduler {
    /// Allocates the scratch buffers for `grid`.
    pub fn new<B: ComputeBackend>(backend: &mut B, grid: Grid) -> EddyResult<Self> {
        let pair = |backend: &mut B| -> EddyResult<PingPong> {
            Ok(PingPong::new(backend.create_buffer(grid)?, backend.create_buffer(grid)?))
        };
        let stage = [backend.create_buffer(grid)?, backend.create_buffer(grid)?];
        let u = pair(&mut *backend)?;
        let v = pair(&mut *backend)?;
        let projection = ProjectionScratch {
            divergence: pair(&mut *backend)?,
            pressure: pair(&mut *backend)?,
        };
        Ok(Self {
            grid,
            scratch: ScratchBuffers {
                stage,
                u,
                v,
                projection,
            },
        })
    }

    /// Frees the scratch buffers.
    pub fn release<B: ComputeBackend>(self, backend: &mut B) -> EddyResult<()> {
        for id in self.scratch.all() {
            backend.release_buffer(id)?;
        }
        Ok(())
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Number of scratch buffers the scheduler owns.
    pub fn scratch_count(&self) -> usize {
        self.scratch.all().len()
    }

    /// Issues one step unless the previous one is still in flight.
    ///
    /// `dt` is the time since the last issued frame, or the fallback on
    /// the first frame or when that difference is not positive and
    /// finite.
    ///
    /// Invalid `params` are rejected before the fence is polled, leaving
    /// the state untouched.
    pub fn try_advance<B: ComputeBackend>(
        &mut self,
        backend: &mut B,
        state: &mut SimulationState,
        frame_time: f64,
        params: &FluidParams,
        input: Option<&UserInput>,
    ) -> Result<StepReport, AdvanceError> {
        assert_eq!(state.grid(), self.grid, "scheduler and state grids differ");
        params.validate()?;

        let mut completed = None;
        let in_flight = state
            .in_flight()
            .map(|(fence, issued_at)| (backend.poll(fence), issued_at));
        if let Some((status, issued_at)) = in_flight {
            match status {
                FenceStatus::Pending => {
                    state.frame_in_progress = true;
                    tracing::trace!(frame_time, "step still in flight");
                    return Err(AdvanceError::StillBusy);
                }
                FenceStatus::Failed => {
                    let step = state.steps_issued();
                    state.phase = StepPhase::Idle;
                    state.frame_in_progress = false;
                    tracing::error!(step, "step failed on device");
                    return Err(EddyError::Device(format!("step {step} failed")).into());
                }
                FenceStatus::Signaled => {
                    state.complete_step();
                    tracing::debug!(issued_at, "step completed");
                    completed = Some(CompletedStep {
                        frame_time: issued_at,
                        latency: frame_time - issued_at,
                    });
                }
            }
        }

        let dt = step_dt(state.last_frame_time(), frame_time);
        let list = self.record_step(state, dt, params, input);
        let commands = list.len();
        let fence = backend.submit(list)?;
        state.issue_step(fence, frame_time);

        let step = state.steps_issued();
        tracing::debug!(step, dt, commands, "step issued");
        Ok(StepReport {
            step,
            frame_time,
            dt,
            commands,
            completed,
            output: params.output,
        })
    }

    /// Records one full step without submitting it.
    pub fn record_step(
        &self,
        state: &SimulationState,
        dt: f32,
        params: &FluidParams,
        input: Option<&UserInput>,
    ) -> CommandList {
        let fields = state.fields();
        let mut list = CommandList::new(format!("step {}", state.steps_issued() + 1));
        self.record_sources(&mut list, fields, params, input);
        self.record_density(&mut list, fields, dt, params);
        self.record_velocity(&mut list, fields, dt, params);
        list
    }

    fn record_sources(
        &self,
        list: &mut CommandList,
        fields: &FieldSlots,
        params: &FluidParams,
        input: Option<&UserInput>,
    ) {
        let sources = [fields.density_source, fields.u_source, fields.v_source];
        match (input, params.idle_sources) {
            (Some(input), _) => {
                let injection = &params.injection;
                operators::inject_source_at_point(
                    list,
                    fields.density_source,
                    input.curr.pos,
                    injection.radius,
                    injection.density,
                );
                operators::inject_velocity_from_drag(
                    list,
                    input,
                    injection,
                    fields.u_source,
                    fields.v_source,
                );
            }
            (None, SourceFade::Hold) => {}
            (None, SourceFade::Clear) => {
                for id in sources {
                    list.fill(id, 0.0);
                }
            }
            (None, SourceFade::Decay { factor }) => {
                for id in sources {
                    operators::decay(list, id, factor, self.scratch.stage[0]);
                }
            }
        }
    }

    /// Density moves with the velocity the step started from.
    fn record_density(&self, list: &mut CommandList, fields: &FieldSlots, dt: f32, params: &FluidParams) {
        let stage = self.scratch.stage[0];
        let mut pair = self.scratch.u;

        operators::add_source(list, fields.density, fields.density_source, dt, stage);
        let diffused = operators::diffuse(
            list,
            BoundaryMode::Scalar,
            params.diffusion_rate,
            dt,
            stage,
            &mut pair,
        );
        let mut out = PingPong::new(pair.output(), stage);
        let density = operators::advect(
            list,
            BoundaryMode::Scalar,
            dt,
            diffused,
            fields.u,
            fields.v,
            &mut out,
        );
        operators::copy(list, density, fields.density);
    }

    fn record_velocity(&self, list: &mut CommandList, fields: &FieldSlots, dt: f32, params: &FluidParams) {
        let [stage_u, stage_v] = self.scratch.stage;
        let mut u = self.scratch.u;
        let mut v = self.scratch.v;
        let mut projection = self.scratch.projection;

        operators::add_source(list, fields.u, fields.u_source, dt, stage_u);
        operators::diffuse(
            list,
            BoundaryMode::HorizontalVelocity,
            params.viscosity,
            dt,
            stage_u,
            &mut u,
        );
        operators::add_source(list, fields.v, fields.v_source, dt, stage_v);
        operators::diffuse(
            list,
            BoundaryMode::VerticalVelocity,
            params.viscosity,
            dt,
            stage_v,
            &mut v,
        );
        operators::project(list, &mut u, &mut v, &mut projection);

        // both components trace back through the same projected field
        let (u_now, v_now) = (u.input(), v.input());
        operators::advect(
            list,
            BoundaryMode::HorizontalVelocity,
            dt,
            u_now,
            u_now,
            v_now,
            &mut PingPong::new(u.output(), stage_u),
        );
        operators::advect(
            list,
            BoundaryMode::VerticalVelocity,
            dt,
            v_now,
            u_now,
            v_now,
            &mut PingPong::new(v.output(), stage_v),
        );
        u.swap();
        v.swap();

        operators::project(list, &mut u, &mut v, &mut projection);
        operators::copy(list, u.input(), fields.u);
        operators::copy(list, v.input(), fields.v);
    }
}

/// Timestep for a frame, given the previously issued frame time.
pub fn step_dt(last_frame_time: Option<f64>, frame_time: f64) -> f32 {
    match last_frame_time.map(|last| frame_time - last) {
        Some(dt) if dt.is_finite() && dt > 0.0 => dt as f32,
        _ => FALLBACK_DT,
    }
}
