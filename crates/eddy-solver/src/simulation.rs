//! Simulation facade.
//!
//! [`FluidSimulation`] bundles a backend with the state, the scheduler
//! and a telemetry bus, which is what a driver loop needs:
//!
//! ```text
//! let mut sim = FluidSimulation::new(CpuFallback::new(), &config)?;
//! loop {
//!     match sim.advance(now, &params, tracker.poll().as_ref()) {
//!         Ok(report) => sim.present(&mut presenter, report.output)?,
//!         Err(AdvanceError::StillBusy) => {}
//!         Err(err) => return Err(err.into()),
//!     }
//! }
//! ```

use eddy_gpu::ComputeBackend;
use eddy_telemetry::{EventBus, EventKind, SimulationEvent};
use eddy_types::{EddyResult, Field, Grid, OutputSelector};

use crate::config::FluidConfig;
use crate::diagnostics::FieldStats;
use crate::error::AdvanceError;
use crate::input::UserInput;
use crate::params::FluidParams;
use crate::presenter::{FieldView, Presenter};
use crate::scheduler::{StepReport, StepScheduler};
use crate::state::SimulationState;

/// A running simulation on one backend.
pub struct FluidSimulation<B: ComputeBackend> {
    backend: B,
    state: SimulationState,
    scheduler: StepScheduler,
    events: EventBus,
    /// Latest frame time passed to `advance`, issued or skipped.
    last_seen_frame_time: Option<f64>,
}

impl<B: ComputeBackend> FluidSimulation<B> {
    /// Initializes `backend` and allocates a state for `config`.
    pub fn new(mut backend: B, config: &FluidConfig) -> EddyResult<Self> {
        config.validate()?;
        let grid = config.grid()?;
        backend.init()?;
        let state = SimulationState::new(&mut backend, grid, config.seed.as_ref())?;
        let scheduler = StepScheduler::new(&mut backend, grid)?;
        tracing::info!(
            backend = backend.name(),
            width = grid.width(),
            height = grid.height(),
            "simulation created"
        );
        Ok(Self {
            backend,
            state,
            scheduler,
            events: EventBus::new(),
            last_seen_frame_time: None,
        })
    }

    /// Issues a step for this frame unless the previous one is in flight.
    ///
    /// Emits telemetry for the outcome and flushes the bus.
    pub fn advance(
        &mut self,
        frame_time: f64,
        params: &FluidParams,
        input: Option<&UserInput>,
    ) -> Result<StepReport, AdvanceError> {
        self.last_seen_frame_time = Some(frame_time);
        let result = self.scheduler.try_advance(
            &mut self.backend,
            &mut self.state,
            frame_time,
            params,
            input,
        );
        match &result {
            Ok(report) => {
                if let Some(done) = report.completed {
                    self.events.emit(SimulationEvent::new(
                        report.step - 1,
                        EventKind::StepCompleted {
                            frame_time: done.frame_time,
                            latency: done.latency,
                        },
                    ));
                }
                self.events.emit(SimulationEvent::new(
                    report.step,
                    EventKind::StepIssued {
                        frame_time,
                        dt: report.dt,
                        commands: report.commands,
                    },
                ));
            }
            Err(AdvanceError::StillBusy) => {
                self.events.emit(SimulationEvent::new(
                    self.state.steps_issued(),
                    EventKind::StepSkipped { frame_time },
                ));
            }
            Err(AdvanceError::Backend(_)) => {}
        }
        self.events.flush();
        result
    }

    /// Reads the selected field and hands it to `presenter`.
    pub fn present(&self, presenter: &mut dyn Presenter, selector: OutputSelector) -> EddyResult<()> {
        let field = selector.field();
        let values = self.read_field(field)?;
        presenter.present_field(FieldView {
            field,
            grid: self.state.grid(),
            values: &values,
        })
    }

    /// Reads a field back, after every submitted step.
    pub fn read_field(&self, field: Field) -> EddyResult<Vec<f32>> {
        self.backend.read(self.state.buffer(field))
    }

    /// Overwrites a field, ordered after every submitted step.
    pub fn set_field(&mut self, field: Field, values: &[f32]) -> EddyResult<()> {
        self.backend.set_values(self.state.buffer(field), values)
    }

    /// Reads a field, emits its statistics and returns them.
    pub fn field_stats(&mut self, field: Field) -> EddyResult<FieldStats> {
        let stats = FieldStats::of(&self.read_field(field)?);
        self.events.emit(SimulationEvent::new(
            self.state.steps_issued(),
            EventKind::FieldStats {
                field,
                min: stats.min,
                max: stats.max,
                sum: stats.sum,
            },
        ));
        self.events.flush();
        Ok(stats)
    }

    /// Blocks until the in-flight step, if any, has finished.
    ///
    /// Emits `StepCompleted` for that step and flushes the bus.
    pub fn wait_idle(&mut self) -> EddyResult<()> {
        let Some((fence, _)) = self.state.in_flight() else {
            return Ok(());
        };
        let fence = fence.clone();
        self.backend.wait(&fence)?;

        let step = self.state.steps_issued();
        if let Some(issued_at) = self.state.complete_step() {
            let seen = self.last_seen_frame_time.unwrap_or(issued_at);
            self.events.emit(SimulationEvent::new(
                step,
                EventKind::StepCompleted {
                    frame_time: issued_at,
                    latency: seen - issued_at,
                },
            ));
            self.events.flush();
        }
        Ok(())
    }

    /// Replaces the whole state with a zeroed one on `grid`.
    pub fn reset(&mut self, grid: Grid) -> EddyResult<()> {
        self.wait_idle()?;
        let state = SimulationState::new(&mut self.backend, grid, None)?;
        let scheduler = StepScheduler::new(&mut self.backend, grid)?;
        std::mem::replace(&mut self.state, state).release(&mut self.backend)?;
        std::mem::replace(&mut self.scheduler, scheduler).release(&mut self.backend)?;
        tracing::info!(width = grid.width(), height = grid.height(), "simulation reset");
        Ok(())
    }

    /// Measures the next step's `dt` from `frame_time`.
    pub fn resume_at(&mut self, frame_time: f64) {
        self.state.resume_clock_at(frame_time);
    }

    pub fn grid(&self) -> Grid {
        self.state.grid()
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }
}
