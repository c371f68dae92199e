//! Benchmark runner — drives a scenario frame by frame and collects metrics.

use std::time::Instant;

use eddy_gpu::ComputeBackend;
use eddy_solver::diagnostics::{divergence_norm, FieldStats};
use eddy_solver::{AdvanceError, FluidSimulation};
use eddy_types::{EddyResult, Field};

use crate::metrics::BenchmarkMetrics;
use crate::scenarios::{Scenario, ScenarioKind};

/// Runs benchmark scenarios and collects metrics.
pub struct BenchmarkRunner;

impl BenchmarkRunner {
    /// Run a single scenario on `backend`.
    ///
    /// Frames arrive at the scenario's fixed interval whether or not the
    /// previous step finished; busy frames are counted, not retried.
    pub fn run<B: ComputeBackend>(scenario: &Scenario, backend: B) -> EddyResult<BenchmarkMetrics> {
        let mut sim = FluidSimulation::new(backend, &scenario.config)?;
        let params = scenario.config.params;
        let backend_name = sim.backend().name().to_string();

        let mut frame_times = Vec::with_capacity(scenario.frames as usize);
        let (mut issued, mut skipped) = (0u32, 0u32);
        let total_start = Instant::now();

        for frame in 0..scenario.frames {
            let input = scenario.input_at(frame);
            let frame_start = Instant::now();
            match sim.advance(scenario.frame_time(frame), &params, input.as_ref()) {
                Ok(_) => issued += 1,
                Err(AdvanceError::StillBusy) => skipped += 1,
                Err(AdvanceError::Backend(err)) => return Err(err),
            }
            frame_times.push(frame_start.elapsed().as_secs_f64());
        }
        sim.wait_idle()?;
        let total_wall_time = total_start.elapsed().as_secs_f64();

        let density = FieldStats::of(&sim.read_field(Field::Density)?);
        let u = sim.read_field(Field::HorizontalVelocity)?;
        let v = sim.read_field(Field::VerticalVelocity)?;
        let grid = sim.grid();

        let avg_frame_time = if frame_times.is_empty() {
            0.0
        } else {
            frame_times.iter().sum::<f64>() / frame_times.len() as f64
        };
        let max_frame_time = frame_times.iter().copied().fold(0.0, f64::max);

        tracing::info!(
            scenario = scenario.kind.name(),
            backend = %backend_name,
            issued,
            skipped,
            total_wall_time,
            "benchmark finished"
        );

        Ok(BenchmarkMetrics {
            scenario: scenario.kind.name().to_string(),
            backend: backend_name,
            width: grid.width(),
            height: grid.height(),
            frames: scenario.frames,
            steps_issued: issued,
            steps_skipped: skipped,
            total_wall_time,
            avg_frame_time,
            max_frame_time,
            final_mass: density.sum,
            peak_density: density.max,
            divergence_l2: divergence_norm(grid, &u, &v),
        })
    }

    /// Run all scenarios, each on a fresh backend from `make_backend`.
    pub fn run_all<B, F>(mut make_backend: F) -> EddyResult<Vec<BenchmarkMetrics>>
    where
        B: ComputeBackend,
        F: FnMut() -> B,
    {
        ScenarioKind::all()
            .iter()
            .map(|&kind| Self::run(&Scenario::from_kind(kind), make_backend()))
            .collect()
    }
}
