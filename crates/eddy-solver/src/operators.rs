//! Grid operators as recorded device passes.
//!
//! Each function appends dispatches to a [`CommandList`]; nothing runs
//! until the list is submitted. Operators that end in a boundary pass
//! work through a [`PingPong`] pair and return the buffer holding their
//! result, which is always the pair's input afterwards.
//!
//! Buffers passed as read-only arguments must not be slots of the pair
//! an operator writes through.

use glam::Vec2;

use eddy_gpu::{Axis, CommandList, Kernel};
use eddy_types::constants::JACOBI_ITERATIONS;
use eddy_types::{BoundaryMode, BufferId};

use crate::input::UserInput;
use crate::params::InjectionParams;
use crate::pingpong::PingPong;

/// Scratch pairs used by [`project`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionScratch {
    pub divergence: PingPong,
    pub pressure: PingPong,
}

/// `out = x + source * dt`.
pub fn add_source(list: &mut CommandList, x: BufferId, source: BufferId, dt: f32, out: BufferId) {
    list.dispatch(Kernel::AddSource { dt }, &[x, source], out);
}

/// Writes `x` into `out` with the boundary ring derived from the interior.
pub fn set_boundary(list: &mut CommandList, mode: BoundaryMode, x: BufferId, out: BufferId) {
    list.dispatch(Kernel::SetBoundary { mode }, &[x], out);
}

/// Boundary pass from `pair.input()` into `pair.output()`, then swap.
fn bound(list: &mut CommandList, mode: BoundaryMode, pair: &mut PingPong) {
    set_boundary(list, mode, pair.input(), pair.output());
    pair.swap();
}

/// Implicit diffusion of `x0` with coefficient `rate`.
///
/// Runs the fixed number of Jacobi sweeps with `k = rate * dt`,
/// starting from `x0` and re-applying the boundary after each sweep.
pub fn diffuse(
    list: &mut CommandList,
    mode: BoundaryMode,
    rate: f32,
    dt: f32,
    x0: BufferId,
    pair: &mut PingPong,
) -> BufferId {
    assert!(!pair.contains(x0), "diffuse: initial state {x0} is a scratch slot");
    let k = rate * dt;
    copy(list, x0, pair.input());
    for _ in 0..JACOBI_ITERATIONS {
        list.dispatch(Kernel::JacobiDiffuse { k }, &[x0, pair.input()], pair.output());
        pair.swap();
        bound(list, mode, pair);
    }
    pair.input()
}

/// Semi-Lagrangian transport of `field` by `(u, v)`, then a boundary pass.
pub fn advect(
    list: &mut CommandList,
    mode: BoundaryMode,
    dt: f32,
    field: BufferId,
    u: BufferId,
    v: BufferId,
    pair: &mut PingPong,
) -> BufferId {
    assert!(
        !(pair.contains(u) || pair.contains(v)),
        "advect: velocity buffers overlap the scratch pair"
    );
    list.dispatch(Kernel::Advect { dt }, &[field, u, v], pair.output());
    pair.swap();
    bound(list, mode, pair);
    pair.input()
}

/// Central-difference divergence scaled by `-hx²`, with a scalar boundary.
pub fn compute_divergence(
    list: &mut CommandList,
    u: BufferId,
    v: BufferId,
    pair: &mut PingPong,
) -> BufferId {
    list.dispatch(Kernel::Divergence, &[u, v], pair.output());
    pair.swap();
    bound(list, BoundaryMode::Scalar, pair);
    pair.input()
}

/// Jacobi solve of the pressure Poisson equation from `p = 0`.
pub fn solve_pressure(list: &mut CommandList, divergence: BufferId, pair: &mut PingPong) -> BufferId {
    assert!(
        !pair.contains(divergence),
        "solve_pressure: divergence {divergence} is a scratch slot"
    );
    list.fill(pair.input(), 0.0);
    for _ in 0..JACOBI_ITERATIONS {
        list.dispatch(Kernel::JacobiPressure, &[divergence, pair.input()], pair.output());
        pair.swap();
        bound(list, BoundaryMode::Scalar, pair);
    }
    pair.input()
}

/// Removes the pressure gradient from the velocity component in `velocity`.
pub fn subtract_pressure_gradient(
    list: &mut CommandList,
    axis: Axis,
    pressure: BufferId,
    velocity: &mut PingPong,
) -> BufferId {
    list.dispatch(
        Kernel::SubtractGradient { axis },
        &[velocity.input(), pressure],
        velocity.output(),
    );
    velocity.swap();
    bound(list, axis.boundary_mode(), velocity);
    velocity.input()
}

/// Projects `(u.input(), v.input())` onto its divergence-free part.
pub fn project(
    list: &mut CommandList,
    u: &mut PingPong,
    v: &mut PingPong,
    scratch: &mut ProjectionScratch,
) -> (BufferId, BufferId) {
    let divergence = compute_divergence(list, u.input(), v.input(), &mut scratch.divergence);
    let pressure = solve_pressure(list, divergence, &mut scratch.pressure);
    (
        subtract_pressure_gradient(list, Axis::Horizontal, pressure, u),
        subtract_pressure_gradient(list, Axis::Vertical, pressure, v),
    )
}

pub fn copy(list: &mut CommandList, src: BufferId, dst: BufferId) {
    list.dispatch(Kernel::Copy, &[src], dst);
}

/// Overwrites `target` with a soft circle of `magnitude` around `center`.
pub fn inject_source_at_point(
    list: &mut CommandList,
    target: BufferId,
    center: Vec2,
    radius: f32,
    magnitude: f32,
) {
    list.dispatch(
        Kernel::Splat {
            center,
            radius,
            magnitude,
        },
        &[],
        target,
    );
}

/// Overwrites the velocity sources with the scaled drag velocity,
/// splatted at the current pointer position.
///
/// Without a previous sample or a positive time step both sources are
/// written as zero.
pub fn inject_velocity_from_drag(
    list: &mut CommandList,
    input: &UserInput,
    injection: &InjectionParams,
    u_source: BufferId,
    v_source: BufferId,
) {
    let velocity = input
        .velocity()
        .map_or(Vec2::ZERO, |v| v * injection.velocity_scale);
    let center = input.curr.pos;
    inject_source_at_point(list, u_source, center, injection.radius, velocity.x);
    inject_source_at_point(list, v_source, center, injection.radius, velocity.y);
}

/// `target *= factor`, staged through `staging`.
pub fn decay(list: &mut CommandList, target: BufferId, factor: f32, staging: BufferId) {
    list.dispatch(Kernel::Scale { factor }, &[target], staging);
    copy(list, staging, target);
}
