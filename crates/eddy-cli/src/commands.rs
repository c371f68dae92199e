//! CLI command implementations.

use std::error::Error;

use eddy_bench::metrics::BenchmarkMetrics;
use eddy_bench::runner::BenchmarkRunner;
use eddy_bench::scenarios::{Scenario, ScenarioKind};
use eddy_gpu::{ComputeBackend, CpuFallback, ThreadedDevice};
use eddy_solver::{AdvanceError, FluidConfig, FluidParams, FluidSimulation, Seed, SourceFade};
use eddy_telemetry::TracingSink;
use eddy_types::{Field, OutputSelector};

use crate::terminal::TerminalPresenter;

const FRAME_INTERVAL: f64 = 1.0 / 60.0;
const MAX_COLUMNS: usize = 64;

fn load_config(path: &str) -> Result<FluidConfig, Box<dyn Error>> {
    let content = std::fs::read_to_string(path)?;
    let config: FluidConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// The box drawn when no config is given: a held source in the middle.
fn default_config() -> FluidConfig {
    FluidConfig {
        params: FluidParams {
            idle_sources: SourceFade::Hold,
            ..Default::default()
        },
        seed: Some(Seed::central_source(10.0)),
        ..FluidConfig::preview()
    }
}

fn parse_selector(name: &str) -> Result<OutputSelector, Box<dyn Error>> {
    OutputSelector::from_name(name).ok_or_else(|| {
        let available: Vec<&str> = OutputSelector::ALL.iter().map(|s| s.field().name()).collect();
        format!("Unknown field: '{name}'. Available: {}", available.join(", ")).into()
    })
}

/// Run a simulation headless, drawing to stdout.
pub fn run(
    config_path: Option<&str>,
    frames: u32,
    every: u32,
    select: Option<&str>,
    threaded: bool,
) -> Result<(), Box<dyn Error>> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => default_config(),
    };
    if let Some(name) = select {
        config.params.output = parse_selector(name)?;
    }

    println!("Eddy Simulation");
    println!("───────────────");
    println!("Config:  {}", config_path.unwrap_or("<preview>"));
    println!("Grid:    {}×{}", config.width, config.height);
    println!("Frames:  {frames}");
    println!("Output:  {}", config.params.output.field());
    println!();

    if threaded {
        simulate(ThreadedDevice::new(), &config, frames, every)
    } else {
        simulate(CpuFallback::new(), &config, frames, every)
    }
}

fn simulate<B: ComputeBackend>(
    backend: B,
    config: &FluidConfig,
    frames: u32,
    every: u32,
) -> Result<(), Box<dyn Error>> {
    let mut sim = FluidSimulation::new(backend, config)?;
    sim.events_mut().add_sink(Box::new(TracingSink::default()));
    let params = config.params;
    let mut presenter = TerminalPresenter::new(std::io::stdout(), MAX_COLUMNS);

    for frame in 0..frames {
        match sim.advance(frame as f64 * FRAME_INTERVAL, &params, None) {
            Ok(report) => {
                let last = frame + 1 == frames;
                if last || (every > 0 && report.step % every as u64 == 0) {
                    sim.present(&mut presenter, report.output)?;
                    let stats = sim.field_stats(Field::Density)?;
                    println!(
                        "step {:>4}  dt {:.4}s  mass {:.4}  peak {:.4}",
                        report.step, report.dt, stats.sum, stats.max
                    );
                    println!();
                }
            }
            Err(AdvanceError::StillBusy) => {}
            Err(err) => return Err(err.into()),
        }
    }
    sim.wait_idle()?;
    sim.events_mut().finalize();

    let events = sim.events();
    println!("Backend:   {}", sim.backend().name());
    println!("Issued:    {}", events.delivered("step_issued"));
    println!("Completed: {}", events.delivered("step_completed"));
    println!("Skipped:   {}", events.delivered("step_skipped"));
    Ok(())
}

/// Run benchmark suite.
pub fn benchmark(
    scenario_name: &str,
    output_path: Option<&str>,
    threaded: bool,
) -> Result<(), Box<dyn Error>> {
    println!("Eddy Benchmark Suite");
    println!("════════════════════");
    println!();

    let scenarios: Vec<ScenarioKind> = if scenario_name == "all" {
        ScenarioKind::all().to_vec()
    } else {
        match ScenarioKind::from_name(scenario_name) {
            Some(kind) => vec![kind],
            None => {
                let available: Vec<&str> = ScenarioKind::all().iter().map(|k| k.name()).collect();
                eprintln!("Unknown scenario: {scenario_name}");
                eprintln!("Available: {}, all", available.join(", "));
                return Err("Unknown scenario".into());
            }
        }
    };

    let mut all_metrics = Vec::new();
    for &kind in &scenarios {
        let scenario = Scenario::from_kind(kind);
        println!(
            "Running: {} ({}×{}, {} frames)",
            kind.name(),
            scenario.config.width,
            scenario.config.height,
            scenario.frames,
        );

        let metrics = if threaded {
            BenchmarkRunner::run(&scenario, ThreadedDevice::new())
        } else {
            BenchmarkRunner::run(&scenario, CpuFallback::new())
        }
        .map_err(|e| format!("Benchmark failed: {e}"))?;

        println!("  Wall time:     {:.3}s", metrics.total_wall_time);
        println!("  Avg frame:     {:.3}ms", metrics.avg_frame_time * 1000.0);
        println!("  Issued/skip:   {}/{}", metrics.steps_issued, metrics.steps_skipped);
        println!("  Final mass:    {:.4}", metrics.final_mass);
        println!("  Divergence:    {:.4e}", metrics.divergence_l2);
        println!();

        all_metrics.push(metrics);
    }

    if let Some(path) = output_path {
        std::fs::write(path, BenchmarkMetrics::to_csv(&all_metrics))?;
        println!("Results written to: {path}");
    } else {
        println!("CSV Output:");
        println!("{}", BenchmarkMetrics::to_csv(&all_metrics));
    }

    Ok(())
}

/// Validate a simulation config.
pub fn validate(path: &str) -> Result<(), Box<dyn Error>> {
    println!("Eddy Validator");
    println!("──────────────");
    println!();

    if !path.ends_with(".toml") {
        return Err(format!("Unsupported file type: {path} (expected .toml)").into());
    }
    println!("Validating config: {path}");
    let config = load_config(path)?;
    println!("✅ Config is valid.");
    println!("  Grid:       {}×{}", config.width, config.height);
    println!("  Diffusion:  {}", config.params.diffusion_rate);
    println!("  Viscosity:  {}", config.params.viscosity);
    println!("  Output:     {}", config.params.output.field());
    match config.seed {
        Some(seed) => println!("  Seed:       {} at ({}, {})", seed.field, seed.x, seed.y),
        None => println!("  Seed:       none"),
    }
    Ok(())
}
