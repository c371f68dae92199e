//! # eddy-bench
//!
//! Benchmark suite for the Eddy fluid solver.
//!
//! Provides 3 scripted scenarios, a runner that drives a
//! [`FluidSimulation`](eddy_solver::FluidSimulation) at a fixed frame
//! rate on any backend, and CSV export for regression tracking.

pub mod metrics;
pub mod runner;
pub mod scenarios;

pub use metrics::BenchmarkMetrics;
pub use runner::BenchmarkRunner;
pub use scenarios::{Scenario, ScenarioKind, Stroke};
