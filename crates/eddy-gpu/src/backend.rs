//! Compute backend trait and CPU fallback.
//!
//! The [`ComputeBackend`] trait owns grid buffers and executes recorded
//! [`CommandList`]s. The [`CpuFallback`] implementation executes each
//! submission before returning, serving as a reference for correctness.

use eddy_types::{BufferId, EddyError, EddyResult, Grid};

use crate::arena::{BufferArena, BufferRegistry};
use crate::buffers::GridBuffer;
use crate::command::CommandList;
use crate::fence::{Fence, FenceStatus};

/// Trait for compute backends.
///
/// The solver records all per-step work into command lists and submits
/// them here. Buffers are addressed by handle only; host code never
/// borrows device storage.
///
/// Every method except [`init`](ComputeBackend::init) and
/// [`name`](ComputeBackend::name) fails with [`EddyError::Device`]
/// before initialization.
///
/// # Implementations
/// - [`CpuFallback`] — synchronous reference (always available)
/// - [`ThreadedDevice`](crate::ThreadedDevice) — asynchronous worker queue
pub trait ComputeBackend: Send {
    /// Initialize the backend. Called once at startup.
    fn init(&mut self) -> EddyResult<()>;

    /// Returns the backend name (e.g., "cpu_fallback").
    fn name(&self) -> &str;

    /// Allocates a zero-filled buffer.
    fn create_buffer(&mut self, grid: Grid) -> EddyResult<BufferId>;

    /// Frees a buffer. The handle becomes unknown.
    fn release_buffer(&mut self, id: BufferId) -> EddyResult<()>;

    fn grid_of(&self, id: BufferId) -> EddyResult<Grid>;

    /// Overwrites every cell, ordered after all earlier submissions.
    fn fill(&mut self, id: BufferId, value: f32) -> EddyResult<()>;

    /// Uploads row-major data, ordered after all earlier submissions.
    ///
    /// Fails with [`EddyError::LengthMismatch`] unless `values` covers
    /// the grid exactly.
    fn set_values(&mut self, id: BufferId, values: &[f32]) -> EddyResult<()>;

    /// Reads a buffer back once every earlier submission has finished.
    fn read(&self, id: BufferId) -> EddyResult<Vec<f32>>;

    /// Queues a command list and returns its completion fence.
    ///
    /// # Panics
    /// If a dispatch mixes buffers of different grids.
    fn submit(&mut self, commands: CommandList) -> EddyResult<Fence>;

    /// Non-blocking completion check.
    fn poll(&self, fence: &Fence) -> FenceStatus {
        fence.status()
    }

    /// Blocks until `fence` completes; fails if its submission failed.
    fn wait(&mut self, fence: &Fence) -> EddyResult<()>;

    /// Returns true if work runs off the host thread.
    fn is_gpu(&self) -> bool {
        false
    }
}

pub(crate) fn not_initialized(name: &str) -> EddyError {
    EddyError::Device(format!("{name} not initialized. Call init() first."))
}

pub(crate) fn fence_result(fence: &Fence) -> EddyResult<()> {
    match fence.status() {
        FenceStatus::Signaled => Ok(()),
        FenceStatus::Failed => Err(EddyError::Device(format!(
            "submission {} failed",
            fence.submission()
        ))),
        FenceStatus::Pending => Err(EddyError::Device(format!(
            "submission {} never completed",
            fence.submission()
        ))),
    }
}

/// CPU fallback backend — synchronous reference implementation.
///
/// Always available, used for:
/// - Tests and headless runs
/// - Correctness validation (other backends should match bit for bit)
/// - Small grids where a worker hop isn't worthwhile
pub struct CpuFallback {
    initialized: bool,
    registry: BufferRegistry,
    arena: BufferArena,
    submissions: u64,
}

impl CpuFallback {
    /// Creates a new CPU fallback backend.
    pub fn new() -> Self {
        Self {
            initialized: false,
            registry: BufferRegistry::new(),
            arena: BufferArena::new(),
            submissions: 0,
        }
    }

    /// Number of command lists submitted so far.
    pub fn submissions(&self) -> u64 {
        self.submissions
    }

    /// Number of live buffers.
    pub fn live_buffers(&self) -> usize {
        self.registry.live_count()
    }

    fn ensure_init(&self) -> EddyResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(not_initialized(self.name()))
        }
    }
}

impl Default for CpuFallback {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputeBackend for CpuFallback {
    fn init(&mut self) -> EddyResult<()> {
        self.initialized = true;
        Ok(())
    }

    fn name(&self) -> &str {
        "cpu_fallback"
    }

    fn create_buffer(&mut self, grid: Grid) -> EddyResult<BufferId> {
        self.ensure_init()?;
        let id = self.registry.allocate(grid)?;
        self.arena.insert(id, GridBuffer::zeros(grid));
        Ok(id)
    }

    fn release_buffer(&mut self, id: BufferId) -> EddyResult<()> {
        self.ensure_init()?;
        self.registry.release(id)?;
        self.arena.remove(id)?;
        Ok(())
    }

    fn grid_of(&self, id: BufferId) -> EddyResult<Grid> {
        self.ensure_init()?;
        self.registry.grid_of(id)
    }

    fn fill(&mut self, id: BufferId, value: f32) -> EddyResult<()> {
        self.ensure_init()?;
        self.arena.get_mut(id)?.fill(value);
        Ok(())
    }

    fn set_values(&mut self, id: BufferId, values: &[f32]) -> EddyResult<()> {
        self.ensure_init()?;
        self.arena.get_mut(id)?.set_values(values)
    }

    fn read(&self, id: BufferId) -> EddyResult<Vec<f32>> {
        self.ensure_init()?;
        Ok(self.arena.get(id)?.as_slice().to_vec())
    }

    fn submit(&mut self, commands: CommandList) -> EddyResult<Fence> {
        self.ensure_init()?;
        self.registry.validate(&commands)?;
        self.submissions += 1;
        self.arena.execute(&commands)?;
        Ok(Fence::signaled(self.submissions))
    }

    fn wait(&mut self, fence: &Fence) -> EddyResult<()> {
        self.ensure_init()?;
        fence_result(fence)
    }
}
