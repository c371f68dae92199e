//! Host-side field diagnostics.

use eddy_gpu::Kernel;
use eddy_types::Grid;

/// Summary statistics of one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStats {
    pub min: f32,
    pub max: f32,
    /// Accumulated in `f64` so large grids do not lose mass to rounding.
    pub sum: f64,
}

impl FieldStats {
    pub fn of(values: &[f32]) -> Self {
        let (min, max, sum) = values.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY, 0.0f64),
            |(lo, hi, sum), &v| (lo.min(v), hi.max(v), sum + v as f64),
        );
        Self { min, max, sum }
    }

    pub fn mean(&self, cells: usize) -> f64 {
        if cells == 0 {
            0.0
        } else {
            self.sum / cells as f64
        }
    }
}

/// Divergence of `(u, v)` as the projection sees it, zero on the boundary.
pub fn divergence(grid: Grid, u: &[f32], v: &[f32]) -> Vec<f32> {
    let mut out = vec![0.0; grid.cell_count()];
    Kernel::Divergence.run(grid, &[u, v], &mut out);
    out
}

/// L2 norm over interior cells.
pub fn l2_interior(grid: Grid, values: &[f32]) -> f32 {
    let mut sum = 0.0f64;
    for j in 1..grid.height() - 1 {
        for i in 1..grid.width() - 1 {
            let v = values[grid.index(i, j)] as f64;
            sum += v * v;
        }
    }
    sum.sqrt() as f32
}

/// Interior L2 norm of the divergence of `(u, v)`.
pub fn divergence_norm(grid: Grid, u: &[f32], v: &[f32]) -> f32 {
    l2_interior(grid, &divergence(grid, u, v))
}
