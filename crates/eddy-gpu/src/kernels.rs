//! Per-cell compute kernels.
//!
//! A [`Kernel`] is a pure function of its input buffers evaluated at one
//! cell. Dispatching a kernel evaluates every cell of the output grid,
//! rows in parallel, and never reads the buffer it writes.
//!
//! Kernels defined on the interior pass their primary input through on
//! boundary cells; a following [`Kernel::SetBoundary`] dispatch gives
//! the boundary its meaning.

use glam::Vec2;
use rayon::prelude::*;

use eddy_types::{BoundaryMode, Grid};

/// Grid axis a velocity component points along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// `i` / x.
    Horizontal,
    /// `j` / y.
    Vertical,
}

impl Axis {
    /// Boundary mode of the velocity component along this axis.
    pub fn boundary_mode(self) -> BoundaryMode {
        match self {
            Axis::Horizontal => BoundaryMode::HorizontalVelocity,
            Axis::Vertical => BoundaryMode::VerticalVelocity,
        }
    }
}

/// A grid operator evaluated cell by cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kernel {
    /// `[x, source]`: `x + source * dt` on every cell.
    AddSource { dt: f32 },
    /// `[x0, x_n]`: one Jacobi sweep of implicit diffusion.
    JacobiDiffuse { k: f32 },
    /// `[field, u, v]`: semi-Lagrangian backtrace with bilinear sampling.
    Advect { dt: f32 },
    /// `[x]`: interior copied, edges mirrored or negated per `mode`.
    SetBoundary { mode: BoundaryMode },
    /// `[u, v]`: `-0.5 hx² (du/hx + dv/hy)`, zero on the boundary.
    ///
    /// On a square grid this is `-0.5 h (du + dv)`.
    Divergence,
    /// `[div, p_n]`: one Jacobi sweep of the pressure Poisson equation.
    ///
    /// Vertical neighbours weigh `(hx/hy)²` relative to horizontal ones.
    JacobiPressure,
    /// `[velocity, p]`: removes the pressure gradient along `axis`.
    SubtractGradient { axis: Axis },
    /// `[x]`
    Copy,
    /// `[x]`: `x * factor` on every cell.
    Scale { factor: f32 },
    /// No inputs: `magnitude * (1 - q²)²` with `q = d / radius`, zero for `q >= 1`.
    ///
    /// `center` and `radius` are in normalized grid coordinates.
    Splat { center: Vec2, radius: f32, magnitude: f32 },
}

impl Kernel {
    /// Number of input buffers the kernel reads.
    pub fn arity(&self) -> usize {
        match self {
            Kernel::Splat { .. } => 0,
            Kernel::SetBoundary { .. } | Kernel::Copy | Kernel::Scale { .. } => 1,
            Kernel::AddSource { .. }
            | Kernel::JacobiDiffuse { .. }
            | Kernel::Divergence
            | Kernel::JacobiPressure
            | Kernel::SubtractGradient { .. } => 2,
            Kernel::Advect { .. } => 3,
        }
    }

    /// Returns a snake_case name.
    pub fn name(&self) -> &'static str {
        match self {
            Kernel::AddSource { .. } => "add_source",
            Kernel::JacobiDiffuse { .. } => "jacobi_diffuse",
            Kernel::Advect { .. } => "advect",
            Kernel::SetBoundary { .. } => "set_boundary",
            Kernel::Divergence => "divergence",
            Kernel::JacobiPressure => "jacobi_pressure",
            Kernel::SubtractGradient { .. } => "subtract_gradient",
            Kernel::Copy => "copy",
            Kernel::Scale { .. } => "scale",
            Kernel::Splat { .. } => "splat",
        }
    }

    /// Evaluates the whole output grid.
    ///
    /// # Panics
    /// If the input count or any slice length disagrees with the grid.
    pub fn run(&self, grid: Grid, inputs: &[&[f32]], out: &mut [f32]) {
        assert_eq!(
            inputs.len(),
            self.arity(),
            "{} takes {} inputs, got {}",
            self.name(),
            self.arity(),
            inputs.len()
        );
        let n = grid.cell_count();
        assert_eq!(out.len(), n, "{} output does not cover the grid", self.name());
        for (slot, input) in inputs.iter().enumerate() {
            assert_eq!(input.len(), n, "{} input {slot} does not cover the grid", self.name());
        }

        let width = grid.width();
        out.par_chunks_mut(width)
            .enumerate()
            .for_each(|(j, row)| {
                for (i, cell) in row.iter_mut().enumerate() {
                    *cell = self.eval(grid, inputs, i, j);
                }
            });
    }

    /// Value of the output at cell `(i, j)`.
    pub fn eval(&self, grid: Grid, inputs: &[&[f32]], i: usize, j: usize) -> f32 {
        let c = grid.index(i, j);
        match *self {
            Kernel::AddSource { dt } => inputs[0][c] + inputs[1][c] * dt,
            Kernel::Copy => inputs[0][c],
            Kernel::Scale { factor } => inputs[0][c] * factor,
            Kernel::Splat { center, radius, magnitude } => {
                let [x, y] = grid.cell_center(i, j);
                magnitude * falloff(Vec2::new(x, y).distance(center), radius)
            }
            Kernel::SetBoundary { mode } => boundary_value(grid, inputs[0], mode, i, j),
            _ if !grid.is_interior(i, j) => self.pass_through(inputs, c),
            Kernel::JacobiDiffuse { k } => {
                let (x0, xn) = (inputs[0], inputs[1]);
                (x0[c] + k * neighbour_sum(grid, xn, i, j)) / (1.0 + 4.0 * k)
            }
            Kernel::Advect { dt } => advect_cell(grid, inputs, dt, i, j),
            Kernel::Divergence => {
                let (u, v) = (inputs[0], inputs[1]);
                let [hx, hy] = grid.spacings();
                let du = u[grid.index(i + 1, j)] - u[grid.index(i - 1, j)];
                let dv = v[grid.index(i, j + 1)] - v[grid.index(i, j - 1)];
                -0.5 * (du * hx + dv * hx * hx / hy)
            }
            Kernel::JacobiPressure => {
                let (div, p) = (inputs[0], inputs[1]);
                let r = vertical_weight(grid);
                let across = p[grid.index(i - 1, j)] + p[grid.index(i + 1, j)];
                let down = p[grid.index(i, j - 1)] + p[grid.index(i, j + 1)];
                (div[c] + across + r * down) / (2.0 + 2.0 * r)
            }
            Kernel::SubtractGradient { axis } => {
                let (vel, p) = (inputs[0], inputs[1]);
                let [hx, hy] = grid.spacings();
                let (gradient, h) = match axis {
                    Axis::Horizontal => (p[grid.index(i + 1, j)] - p[grid.index(i - 1, j)], hx),
                    Axis::Vertical => (p[grid.index(i, j + 1)] - p[grid.index(i, j - 1)], hy),
                };
                vel[c] - 0.5 * gradient / h
            }
        }
    }

    /// Boundary value of an interior-only kernel.
    fn pass_through(&self, inputs: &[&[f32]], c: usize) -> f32 {
        match self {
            Kernel::JacobiDiffuse { .. } | Kernel::JacobiPressure => inputs[1][c],
            Kernel::Divergence => 0.0,
            _ => inputs[0][c],
        }
    }
}

/// Soft-circle weight `(1 - q²)²` for `q = distance / radius < 1`.
pub fn falloff(distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    let q = distance / radius;
    if q < 1.0 {
        let s = 1.0 - q * q;
        s * s
    } else {
        0.0
    }
}

/// `(hx/hy)²`, one on a square grid.
#[inline]
fn vertical_weight(grid: Grid) -> f32 {
    let [hx, hy] = grid.spacings();
    (hx / hy) * (hx / hy)
}

#[inline]
fn neighbour_sum(grid: Grid, x: &[f32], i: usize, j: usize) -> f32 {
    x[grid.index(i - 1, j)] + x[grid.index(i + 1, j)] + x[grid.index(i, j - 1)] + x[grid.index(i, j + 1)]
}

fn boundary_value(grid: Grid, x: &[f32], mode: BoundaryMode, i: usize, j: usize) -> f32 {
    let (last_i, last_j) = (grid.width() - 1, grid.height() - 1);
    let on_side = i == 0 || i == last_i;
    let on_cap = j == 0 || j == last_j;
    let inward_i = i.clamp(1, last_i - 1);
    let inward_j = j.clamp(1, last_j - 1);
    let inner = x[grid.index(inward_i, inward_j)];

    match (on_side, on_cap) {
        (false, false) => x[grid.index(i, j)],
        (true, false) => mode.side_wall_sign() * inner,
        (false, true) => mode.cap_wall_sign() * inner,
        // average of the two neighbouring edge cells
        (true, true) => 0.5 * (mode.side_wall_sign() + mode.cap_wall_sign()) * inner,
    }
}

fn advect_cell(grid: Grid, inputs: &[&[f32]], dt: f32, i: usize, j: usize) -> f32 {
    let (field, u, v) = (inputs[0], inputs[1], inputs[2]);
    let c = grid.index(i, j);
    let [nx, ny] = grid.interior_extents();

    // backtraces leaving the interior sample its outermost half cell
    let x = (i as f32 - dt * nx * u[c]).clamp(0.5, nx + 0.5);
    let y = (j as f32 - dt * ny * v[c]).clamp(0.5, ny + 0.5);

    let (i0, j0) = (x.floor() as usize, y.floor() as usize);
    let (i1, j1) = (i0 + 1, j0 + 1);
    let (s1, t1) = (x - i0 as f32, y - j0 as f32);
    let (s0, t0) = (1.0 - s1, 1.0 - t1);

    s0 * (t0 * field[grid.index(i0, j0)] + t1 * field[grid.index(i0, j1)])
        + s1 * (t0 * field[grid.index(i1, j0)] + t1 * field[grid.index(i1, j1)])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(grid: Grid) -> Vec<f32> {
        (0..grid.cell_count()).map(|c| c as f32).collect()
    }

    fn run(kernel: Kernel, grid: Grid, inputs: &[&[f32]]) -> Vec<f32> {
        let mut out = vec![f32::NAN; grid.cell_count()];
        kernel.run(grid, inputs, &mut out);
        out
    }

    #[test]
    fn scalar_boundary_mirrors_interior() {
        let grid = Grid::new(5, 4).unwrap();
        let x = ramp(grid);
        let out = run(Kernel::SetBoundary { mode: BoundaryMode::Scalar }, grid, &[&x]);
        assert_eq!(out[grid.index(0, 2)], x[grid.index(1, 2)]);
        assert_eq!(out[grid.index(4, 1)], x[grid.index(3, 1)]);
        assert_eq!(out[grid.index(2, 0)], x[grid.index(2, 1)]);
        assert_eq!(out[grid.index(2, 3)], x[grid.index(2, 2)]);
        assert_eq!(out[grid.index(2, 2)], x[grid.index(2, 2)]);
        assert_eq!(out[grid.index(0, 0)], x[grid.index(1, 1)]);
    }

    #[test]
    fn velocity_boundaries_negate_normal_component() {
        let grid = Grid::square(4).unwrap();
        let x = ramp(grid);
        let u = run(
            Kernel::SetBoundary { mode: BoundaryMode::HorizontalVelocity },
            grid,
            &[&x],
        );
        assert_eq!(u[grid.index(0, 1)], -x[grid.index(1, 1)]);
        assert_eq!(u[grid.index(1, 0)], x[grid.index(1, 1)]);
        assert_eq!(u[grid.index(0, 0)], 0.0);

        let v = run(
            Kernel::SetBoundary { mode: BoundaryMode::VerticalVelocity },
            grid,
            &[&x],
        );
        assert_eq!(v[grid.index(0, 2)], x[grid.index(1, 2)]);
        assert_eq!(v[grid.index(2, 3)], -x[grid.index(2, 2)]);
        assert_eq!(v[grid.index(3, 3)], 0.0);
    }

    #[test]
    fn advect_with_zero_velocity_is_identity_inside() {
        let grid = Grid::square(6).unwrap();
        let field = ramp(grid);
        let zero = vec![0.0; grid.cell_count()];
        let out = run(Kernel::Advect { dt: 0.1 }, grid, &[&field, &zero, &zero]);
        assert_eq!(out, field);
    }

    #[test]
    fn advect_translates_along_velocity() {
        let grid = Grid::square(6).unwrap();
        let field = ramp(grid);
        // dt * N * u = one cell
        let u = vec![0.25; grid.cell_count()];
        let zero = vec![0.0; grid.cell_count()];
        let out = run(Kernel::Advect { dt: 1.0 }, grid, &[&field, &u, &zero]);
        assert!((out[grid.index(3, 2)] - field[grid.index(2, 2)]).abs() < 1e-5);
    }

    #[test]
    fn advect_moves_same_fraction_of_each_axis() {
        // 40 interior cells across, 10 down
        let grid = Grid::new(42, 12).unwrap();
        let columns: Vec<f32> = (0..grid.cell_count()).map(|c| (c % grid.width()) as f32).collect();
        let rows: Vec<f32> = (0..grid.cell_count()).map(|c| (c / grid.width()) as f32).collect();
        let zero = vec![0.0; grid.cell_count()];
        let speed = vec![0.1; grid.cell_count()];

        // a tenth of the unit length per unit time on either axis
        let across = run(Kernel::Advect { dt: 1.0 }, grid, &[&columns, &speed, &zero]);
        assert!((across[grid.index(20, 5)] - 16.0).abs() < 1e-4);
        let down = run(Kernel::Advect { dt: 1.0 }, grid, &[&rows, &zero, &speed]);
        assert!((down[grid.index(20, 5)] - 4.0).abs() < 1e-4);
    }

    #[test]
    fn advect_clamps_runaway_backtraces() {
        let grid = Grid::new(8, 6).unwrap();
        let field = ramp(grid);
        let u = vec![1e30; grid.cell_count()];
        let v = vec![-1e30; grid.cell_count()];
        let out = run(Kernel::Advect { dt: 1000.0 }, grid, &[&field, &u, &v]);

        // every backtrace lands on (0.5, Ny + 0.5)
        let corner = 0.25
            * (field[grid.index(0, 4)]
                + field[grid.index(1, 4)]
                + field[grid.index(0, 5)]
                + field[grid.index(1, 5)]);
        let (lo, hi) = (field[0], field[grid.cell_count() - 1]);
        for j in 1..grid.height() - 1 {
            for i in 1..grid.width() - 1 {
                let value = out[grid.index(i, j)];
                assert!(value.is_finite());
                assert!((lo..=hi).contains(&value));
                assert!((value - corner).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn advect_keeps_uniform_field_under_infinite_velocity() {
        let grid = Grid::square(7).unwrap();
        let field = vec![1.0; grid.cell_count()];
        let u = vec![f32::INFINITY; grid.cell_count()];
        let v = vec![f32::NEG_INFINITY; grid.cell_count()];
        let out = run(Kernel::Advect { dt: 1e6 }, grid, &[&field, &u, &v]);
        assert!(out.iter().all(|&x| x == 1.0));
    }

    #[test]
    fn gradient_uses_spacing_of_its_axis() {
        let grid = Grid::new(42, 12).unwrap();
        // p = j: dp/dy = Ny per unit length, no horizontal gradient
        let p: Vec<f32> = (0..grid.cell_count()).map(|c| (c / grid.width()) as f32).collect();
        let zero = vec![0.0; grid.cell_count()];
        let u = run(Kernel::SubtractGradient { axis: Axis::Horizontal }, grid, &[&zero, &p]);
        let v = run(Kernel::SubtractGradient { axis: Axis::Vertical }, grid, &[&zero, &p]);
        assert_eq!(u[grid.index(20, 5)], 0.0);
        assert!((v[grid.index(20, 5)] + 10.0).abs() < 1e-4);
    }

    #[test]
    fn jacobi_pressure_weights_rows_by_spacing() {
        let grid = Grid::new(12, 7).unwrap();
        let zero = vec![0.0; grid.cell_count()];
        // unit pressure above and below only
        let mut p = vec![0.0; grid.cell_count()];
        p[grid.index(5, 2)] = 1.0;
        p[grid.index(5, 4)] = 1.0;
        let out = run(Kernel::JacobiPressure, grid, &[&zero, &p]);
        // Nx = 10, Ny = 5: r = 1/4, (2r) / (2 + 2r) = 0.2
        assert!((out[grid.index(5, 3)] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn divergence_is_zero_on_boundary() {
        let grid = Grid::square(5).unwrap();
        let u = ramp(grid);
        let v = ramp(grid);
        let div = run(Kernel::Divergence, grid, &[&u, &v]);
        assert_eq!(div[grid.index(0, 2)], 0.0);
        // du = 2, dv = 2 * width, h = 1/3
        let expected = -0.5 * (2.0 + 10.0) / 3.0;
        assert!((div[grid.index(2, 2)] - expected).abs() < 1e-5);
    }

    #[test]
    fn jacobi_diffuse_without_coupling_returns_initial_guess() {
        let grid = Grid::square(4).unwrap();
        let x0 = ramp(grid);
        let xn = vec![3.0; grid.cell_count()];
        let out = run(Kernel::JacobiDiffuse { k: 0.0 }, grid, &[&x0, &xn]);
        assert_eq!(out[grid.index(1, 2)], x0[grid.index(1, 2)]);
        assert_eq!(out[grid.index(0, 0)], 3.0);
    }

    #[test]
    fn splat_peaks_at_center_and_vanishes_outside() {
        let grid = Grid::square(10).unwrap();
        let kernel = Kernel::Splat {
            center: Vec2::new(0.55, 0.55),
            radius: 0.2,
            magnitude: 4.0,
        };
        let out = run(kernel, grid, &[]);
        assert!((out[grid.index(5, 5)] - 4.0).abs() < 1e-5);
        assert_eq!(out[grid.index(0, 0)], 0.0);
        assert!(out.iter().all(|&s| (0.0..=4.0 + 1e-5).contains(&s)));
    }

    #[test]
    fn falloff_shape() {
        assert_eq!(falloff(0.0, 1.0), 1.0);
        assert_eq!(falloff(1.0, 1.0), 0.0);
        assert!((falloff(0.5, 1.0) - 0.5625).abs() < 1e-6);
        assert_eq!(falloff(0.0, 0.0), 0.0);
    }

    #[test]
    #[should_panic(expected = "advect takes 3 inputs")]
    fn wrong_arity_panics() {
        let grid = Grid::square(3).unwrap();
        let x = vec![0.0; grid.cell_count()];
        run(Kernel::Advect { dt: 0.1 }, grid, &[&x]);
    }
}
