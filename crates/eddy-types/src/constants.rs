//! Numerical constants and simulation defaults.

/// Jacobi relaxation sweeps per diffusion and pressure solve.
///
/// Fixed regardless of grid size: bounded, predictable cost per step
/// at the price of accuracy on large grids.
pub const JACOBI_ITERATIONS: usize = 20;

/// Timestep used when no previous frame time exists (seconds).
pub const FALLBACK_DT: f32 = 0.01;

/// Radius of pointer injection, as a fraction of the grid extent.
pub const DEFAULT_INJECTION_RADIUS: f32 = 0.1;

/// Density written at the pointer position while dragging.
pub const DEFAULT_INJECTED_DENSITY: f32 = 10.0;

/// Default density diffusion coefficient.
pub const DEFAULT_DIFFUSION_RATE: f32 = 0.0001;

/// Default velocity diffusion coefficient.
pub const DEFAULT_VISCOSITY: f32 = 0.0001;

/// Smallest supported grid extent: one interior cell plus the boundary ring.
pub const MIN_GRID_EXTENT: u32 = 3;
