//! Integration tests for eddy-bench.

use eddy_bench::metrics::BenchmarkMetrics;
use eddy_bench::runner::BenchmarkRunner;
use eddy_bench::scenarios::{Scenario, ScenarioKind};
use eddy_gpu::{CpuFallback, ThreadedDevice};
use eddy_types::Field;

fn short(kind: ScenarioKind, frames: u32) -> Scenario {
    let mut scenario = Scenario::from_kind(kind);
    scenario.config.width = 24;
    scenario.config.height = 24;
    scenario.frames = frames;
    if let Some(stroke) = scenario.stroke.as_mut() {
        stroke.end_frame = stroke.end_frame.min(frames);
    }
    scenario
}

// ─── Scenario Tests ───────────────────────────────────────────

#[test]
fn center_impulse_setup() {
    let s = Scenario::center_impulse();
    assert_eq!(s.kind, ScenarioKind::CenterImpulse);
    assert!(s.config.validate().is_ok());
    assert_eq!(s.config.seed.unwrap().field, Field::DensitySource);
    assert!(s.input_at(0).is_none());
}

#[test]
fn drag_stroke_script() {
    let s = Scenario::drag_stroke();
    let first = s.input_at(0).unwrap();
    assert!(first.prev.is_none());
    assert!((first.curr.pos.x - 0.2).abs() < 1e-6);

    let mid = s.input_at(30).unwrap();
    let velocity = mid.velocity().unwrap();
    assert!(velocity.x > 0.0);
    assert_eq!(velocity.y, 0.0);

    let last = s.input_at(59).unwrap();
    assert!((last.curr.pos.x - 0.8).abs() < 1e-5);
    assert!(s.input_at(60).is_none());
}

#[test]
fn all_scenarios() {
    assert_eq!(ScenarioKind::all().len(), 3);
    for &kind in ScenarioKind::all() {
        assert_eq!(ScenarioKind::from_name(kind.name()), Some(kind));
        assert!(Scenario::from_kind(kind).config.validate().is_ok());
    }
    assert_eq!(ScenarioKind::from_name("tornado"), None);
}

// ─── Runner Tests ─────────────────────────────────────────────

#[test]
fn run_center_impulse() {
    let scenario = short(ScenarioKind::CenterImpulse, 5);
    let metrics = BenchmarkRunner::run(&scenario, CpuFallback::new()).unwrap();

    assert_eq!(metrics.scenario, "center_impulse");
    assert_eq!(metrics.backend, "cpu_fallback");
    assert_eq!(metrics.frames, 5);
    // the CPU fallback finishes every step before the next frame
    assert_eq!(metrics.steps_issued, 5);
    assert_eq!(metrics.steps_skipped, 0);
    assert!(metrics.final_mass > 0.0);
    assert!(metrics.peak_density > 0.0);
}

#[test]
fn quiescent_stays_empty() {
    let scenario = short(ScenarioKind::Quiescent, 4);
    let metrics = BenchmarkRunner::run(&scenario, CpuFallback::new()).unwrap();
    assert_eq!(metrics.final_mass, 0.0);
    assert_eq!(metrics.divergence_l2, 0.0);
}

#[test]
fn threaded_run_accounts_for_every_frame() {
    let scenario = short(ScenarioKind::DragStroke, 8);
    let metrics = BenchmarkRunner::run(&scenario, ThreadedDevice::new()).unwrap();
    assert_eq!(metrics.backend, "threaded");
    assert_eq!(metrics.steps_issued + metrics.steps_skipped, 8);
    assert!(metrics.steps_issued >= 1);
}

#[test]
fn run_all_scenarios() {
    let results = BenchmarkRunner::run_all(CpuFallback::new).unwrap();
    assert_eq!(results.len(), 3);
    for (metrics, kind) in results.iter().zip(ScenarioKind::all()) {
        assert_eq!(metrics.scenario, kind.name());
        assert!(metrics.total_wall_time >= 0.0);
    }
}

// ─── Metrics Tests ────────────────────────────────────────────

fn sample() -> BenchmarkMetrics {
    BenchmarkMetrics {
        scenario: "test".into(),
        backend: "cpu_fallback".into(),
        width: 64,
        height: 64,
        frames: 100,
        steps_issued: 90,
        steps_skipped: 10,
        total_wall_time: 1.5,
        avg_frame_time: 0.015,
        max_frame_time: 0.02,
        final_mass: 12.5,
        peak_density: 0.75,
        divergence_l2: 1e-4,
    }
}

#[test]
fn metrics_csv_output() {
    let header = BenchmarkMetrics::to_csv_header();
    let row = sample().to_csv_row();
    assert_eq!(header.split(',').count(), row.split(',').count());
    assert!(row.starts_with("test,cpu_fallback,64,64,100,90,10,"));

    let csv = BenchmarkMetrics::to_csv(&[sample(), sample()]);
    assert_eq!(csv.lines().count(), 3);
}

#[test]
fn metrics_serialization() {
    let json = serde_json::to_string(&sample()).unwrap();
    let recovered: BenchmarkMetrics = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered.steps_skipped, 10);
    assert_eq!(recovered.scenario, "test");
}
