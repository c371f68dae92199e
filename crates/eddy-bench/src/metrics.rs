//! Benchmark metrics — data collected during a benchmark run.

use serde::{Deserialize, Serialize};

/// Metrics collected from a benchmark scenario run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkMetrics {
    pub scenario: String,
    pub backend: String,
    pub width: usize,
    pub height: usize,
    /// Frames driven.
    pub frames: u32,
    pub steps_issued: u32,
    /// Frames that found the previous step still in flight.
    pub steps_skipped: u32,
    /// Total wall-clock time including the final drain (seconds).
    pub total_wall_time: f64,
    /// Average host time per `advance` call (seconds).
    pub avg_frame_time: f64,
    pub max_frame_time: f64,
    /// Sum of the final density field.
    pub final_mass: f64,
    pub peak_density: f32,
    /// Interior L2 norm of the final velocity divergence.
    pub divergence_l2: f32,
}

impl BenchmarkMetrics {
    /// CSV header line.
    pub fn to_csv_header() -> String {
        "scenario,backend,width,height,frames,steps_issued,steps_skipped,total_wall_time_s,avg_frame_ms,max_frame_ms,final_mass,peak_density,divergence_l2".to_string()
    }

    /// Format this metrics instance as a CSV data row.
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{:.6},{:.4},{:.4},{:.6},{:.6},{:.6e}",
            self.scenario,
            self.backend,
            self.width,
            self.height,
            self.frames,
            self.steps_issued,
            self.steps_skipped,
            self.total_wall_time,
            self.avg_frame_time * 1000.0,
            self.max_frame_time * 1000.0,
            self.final_mass,
            self.peak_density,
            self.divergence_l2,
        )
    }

    /// Format multiple metrics as a complete CSV string.
    pub fn to_csv(metrics: &[BenchmarkMetrics]) -> String {
        let mut csv = Self::to_csv_header();
        for m in metrics {
            csv.push('\n');
            csv.push_str(&m.to_csv_row());
        }
        csv
    }
}
