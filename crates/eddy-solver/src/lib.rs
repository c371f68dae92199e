//! # eddy-solver
//!
//! The Stable Fluids step pipeline.
//!
//! One step injects sources from user input, then diffuses and advects
//! density and velocity, projecting the velocity onto its
//! divergence-free part before and after self-advection. Every pass is
//! a [`Kernel`](eddy_gpu::Kernel) dispatch recorded into a single
//! command list; scratch buffers alternate through explicit
//! [`PingPong`] pairs so no dispatch reads what it writes.
//!
//! The [`StepScheduler`] keeps at most one step in flight: each
//! submission returns a fence that the next
//! [`try_advance`](StepScheduler::try_advance) polls instead of
//! blocking.
//!
//! ## Pipeline
//!
//! ```text
//! sources ← input (splat) | idle policy
//! density:  add_source → diffuse → advect(u, v) → copy
//! velocity: add_source → diffuse → project → advect(self) → project → copy
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod input;
pub mod operators;
pub mod params;
pub mod pingpong;
pub mod presenter;
pub mod scheduler;
pub mod simulation;
pub mod state;

pub use config::{FluidConfig, Seed};
pub use error::AdvanceError;
pub use input::{DragTracker, PointerSample, UserInput};
pub use params::{FluidParams, InjectionParams, SourceFade};
pub use pingpong::PingPong;
pub use presenter::{FieldView, Presenter};
pub use scheduler::{CompletedStep, StepReport, StepScheduler};
pub use simulation::FluidSimulation;
pub use state::{FieldSlots, SimulationState, StepPhase};
