//! Integration tests for eddy-gpu.

use eddy_gpu::arena::BufferRegistry;
use eddy_gpu::{
    Axis, CommandList, ComputeBackend, CpuFallback, Fence, FenceStatus, GridBuffer, Kernel,
    ThreadedDevice,
};
use eddy_types::{BoundaryMode, BufferId, EddyError, Grid};
use glam::Vec2;

fn cpu() -> CpuFallback {
    let mut backend = CpuFallback::new();
    backend.init().unwrap();
    backend
}

fn threaded() -> ThreadedDevice {
    let mut device = ThreadedDevice::new();
    device.init().unwrap();
    device
}

fn ramp(grid: Grid) -> Vec<f32> {
    (0..grid.cell_count()).map(|c| (c as f32 * 0.37).sin()).collect()
}

/// A short chain touching every kernel.
fn record_chain(ids: &[BufferId]) -> CommandList {
    let [a, b, c, d, e] = [ids[0], ids[1], ids[2], ids[3], ids[4]];
    let mut list = CommandList::new("chain");
    list.dispatch(
        Kernel::Splat { center: Vec2::new(0.4, 0.6), radius: 0.3, magnitude: 2.0 },
        &[],
        b,
    );
    list.dispatch(Kernel::AddSource { dt: 0.1 }, &[a, b], c);
    list.dispatch(Kernel::JacobiDiffuse { k: 0.5 }, &[c, a], d);
    list.dispatch(Kernel::SetBoundary { mode: BoundaryMode::Scalar }, &[d], e);
    list.dispatch(Kernel::Advect { dt: 0.05 }, &[e, a, b], c);
    list.dispatch(Kernel::Divergence, &[c, e], d);
    list.dispatch(Kernel::JacobiPressure, &[d, a], b);
    list.dispatch(Kernel::SubtractGradient { axis: Axis::Vertical }, &[c, b], e);
    list.dispatch(Kernel::Scale { factor: 0.5 }, &[e], a);
    list.dispatch(Kernel::Copy, &[a], d);
    list
}

fn run_chain<B: ComputeBackend>(backend: &mut B) -> Vec<f32> {
    let grid = Grid::new(9, 7).unwrap();
    let ids: Vec<BufferId> = (0..5).map(|_| backend.create_buffer(grid).unwrap()).collect();
    backend.set_values(ids[0], &ramp(grid)).unwrap();
    let fence = backend.submit(record_chain(&ids)).unwrap();
    backend.wait(&fence).unwrap();
    backend.read(ids[3]).unwrap()
}

// ─── Buffer Tests ─────────────────────────────────────────────

#[test]
fn buffer_zeros() {
    let grid = Grid::new(4, 3).unwrap();
    let buf = GridBuffer::zeros(grid);
    assert_eq!(buf.len(), 12);
    assert!(buf.as_slice().iter().all(|&x| x == 0.0));
}

#[test]
fn buffer_from_data_checks_length() {
    let grid = Grid::square(3).unwrap();
    assert!(GridBuffer::from_data(grid, vec![1.0; 9]).is_ok());
    let err = GridBuffer::from_data(grid, vec![1.0; 8]).unwrap_err();
    assert!(matches!(err, EddyError::LengthMismatch { expected: 9, actual: 8 }));
}

#[test]
fn buffer_set_values_and_get() {
    let grid = Grid::new(3, 4).unwrap();
    let mut buf = GridBuffer::zeros(grid);
    let data: Vec<f32> = (0..12).map(|c| c as f32).collect();
    buf.set_values(&data).unwrap();
    assert_eq!(buf.get(2, 1), 5.0);
    buf.fill(1.5);
    assert!(buf.as_slice().iter().all(|&x| x == 1.5));
}

// ─── Command List Tests ───────────────────────────────────────

#[test]
fn command_list_counts_dispatches() {
    let mut list = CommandList::new("test");
    list.fill(BufferId(0), 1.0);
    list.dispatch(Kernel::Copy, &[BufferId(0)], BufferId(1));
    list.dispatch(Kernel::Scale { factor: 2.0 }, &[BufferId(1)], BufferId(2));
    assert_eq!(list.len(), 3);
    assert_eq!(list.dispatch_count(), 2);
    assert_eq!(list.kernel_names(), vec!["copy", "scale"]);
    assert_eq!(list.label(), "test");
}

#[test]
#[should_panic(expected = "reads and writes buffer")]
fn command_list_rejects_aliasing() {
    let mut list = CommandList::new("alias");
    list.dispatch(Kernel::Copy, &[BufferId(3)], BufferId(3));
}

#[test]
#[should_panic(expected = "takes 2 inputs")]
fn command_list_rejects_wrong_arity() {
    let mut list = CommandList::new("arity");
    list.dispatch(Kernel::Divergence, &[BufferId(0)], BufferId(1));
}

#[test]
#[should_panic(expected = "copy in 'mixed'")]
fn registry_rejects_mixed_grids() {
    let mut registry = BufferRegistry::new();
    let a = registry.allocate(Grid::square(4).unwrap()).unwrap();
    let b = registry.allocate(Grid::square(5).unwrap()).unwrap();
    let mut list = CommandList::new("mixed");
    list.dispatch(Kernel::Copy, &[a], b);
    let _ = registry.validate(&list);
}

#[test]
fn registry_never_reuses_handles() {
    let mut registry = BufferRegistry::new();
    let grid = Grid::square(3).unwrap();
    let a = registry.allocate(grid).unwrap();
    registry.release(a).unwrap();
    let b = registry.allocate(grid).unwrap();
    assert_ne!(a, b);
    assert!(matches!(registry.grid_of(a), Err(EddyError::UnknownBuffer(id)) if id == a));
    assert_eq!(registry.live_count(), 1);
}

// ─── Fence Tests ──────────────────────────────────────────────

#[test]
fn fence_transitions() {
    let fence = Fence::pending(7);
    let observer = fence.clone();
    assert_eq!(observer.status(), FenceStatus::Pending);
    fence.signal();
    assert!(observer.is_signaled());
    assert_eq!(observer.submission(), 7);

    let failed = Fence::pending(8);
    failed.fail();
    assert_eq!(failed.status(), FenceStatus::Failed);
}

// ─── CpuFallback Tests ────────────────────────────────────────

#[test]
fn cpu_init() {
    let mut backend = CpuFallback::new();
    assert!(backend.init().is_ok());
    assert_eq!(backend.name(), "cpu_fallback");
    assert!(!backend.is_gpu());
}

#[test]
fn cpu_requires_init() {
    let mut backend = CpuFallback::new();
    let err = backend.create_buffer(Grid::square(3).unwrap()).unwrap_err();
    assert!(matches!(err, EddyError::Device(_)));
}

#[test]
fn cpu_buffers_start_zeroed() {
    let mut backend = cpu();
    let grid = Grid::new(5, 4).unwrap();
    let id = backend.create_buffer(grid).unwrap();
    assert_eq!(backend.grid_of(id).unwrap(), grid);
    assert_eq!(backend.read(id).unwrap(), vec![0.0; 20]);
}

#[test]
fn cpu_set_values_length_mismatch() {
    let mut backend = cpu();
    let id = backend.create_buffer(Grid::square(3).unwrap()).unwrap();
    let err = backend.set_values(id, &[1.0; 4]).unwrap_err();
    assert!(matches!(err, EddyError::LengthMismatch { expected: 9, actual: 4 }));
}

#[test]
fn cpu_submit_signals_immediately() {
    let mut backend = cpu();
    let grid = Grid::square(4).unwrap();
    let a = backend.create_buffer(grid).unwrap();
    let b = backend.create_buffer(grid).unwrap();
    backend.fill(a, 2.0).unwrap();

    let mut list = CommandList::new("copy");
    list.dispatch(Kernel::Copy, &[a], b);
    let fence = backend.submit(list).unwrap();

    assert_eq!(backend.poll(&fence), FenceStatus::Signaled);
    assert_eq!(fence.submission(), 1);
    assert_eq!(backend.read(b).unwrap(), vec![2.0; 16]);
}

#[test]
fn cpu_release_invalidates_handle() {
    let mut backend = cpu();
    let id = backend.create_buffer(Grid::square(3).unwrap()).unwrap();
    backend.release_buffer(id).unwrap();
    assert_eq!(backend.live_buffers(), 0);
    assert!(matches!(backend.read(id), Err(EddyError::UnknownBuffer(_))));
}

#[test]
fn cpu_copy_round_trip_is_identity() {
    let mut backend = cpu();
    let grid = Grid::new(6, 5).unwrap();
    let a = backend.create_buffer(grid).unwrap();
    let b = backend.create_buffer(grid).unwrap();
    let data = ramp(grid);
    backend.set_values(a, &data).unwrap();

    let mut list = CommandList::new("copy twice");
    list.dispatch(Kernel::Copy, &[a], b);
    list.dispatch(Kernel::Copy, &[b], a);
    backend.submit(list).unwrap();

    assert_eq!(backend.read(a).unwrap(), data);
}

// ─── ThreadedDevice Tests ─────────────────────────────────────

#[test]
fn threaded_requires_init() {
    let device = ThreadedDevice::new();
    assert!(matches!(
        device.read(BufferId(0)),
        Err(EddyError::Device(_))
    ));
}

#[test]
fn threaded_read_observes_prior_submissions() {
    let mut device = threaded();
    let grid = Grid::square(5).unwrap();
    let a = device.create_buffer(grid).unwrap();
    let b = device.create_buffer(grid).unwrap();
    device.fill(a, 1.0).unwrap();

    let mut list = CommandList::new("scale");
    list.dispatch(Kernel::Scale { factor: 3.0 }, &[a], b);
    let fence = device.submit(list).unwrap();

    // no wait: readback is queued behind the submission
    assert_eq!(device.read(b).unwrap(), vec![3.0; 25]);
    assert_eq!(device.poll(&fence), FenceStatus::Signaled);
}

#[test]
fn threaded_wait_completes_fence() {
    let mut device = threaded();
    let grid = Grid::square(16).unwrap();
    let a = device.create_buffer(grid).unwrap();
    let b = device.create_buffer(grid).unwrap();
    let mut list = CommandList::new("many");
    for _ in 0..50 {
        list.dispatch(Kernel::Copy, &[a], b);
        list.dispatch(Kernel::Copy, &[b], a);
    }
    let fence = device.submit(list).unwrap();
    device.wait(&fence).unwrap();
    assert!(fence.is_signaled());
}

#[test]
fn threaded_set_values_validates_on_host() {
    let mut device = threaded();
    let id = device.create_buffer(Grid::square(4).unwrap()).unwrap();
    assert!(matches!(
        device.set_values(id, &[0.0; 3]),
        Err(EddyError::LengthMismatch { expected: 16, actual: 3 })
    ));
}

#[test]
fn threaded_matches_cpu_bit_for_bit() {
    let reference = run_chain(&mut cpu());
    let queued = run_chain(&mut threaded());
    assert_eq!(reference.len(), 63);
    assert_eq!(reference, queued);
    assert!(reference.iter().all(|v| v.is_finite()));
}
