//! Asynchronous compute device backed by a worker thread.
//!
//! The worker owns every buffer and drains a FIFO job queue, so uploads,
//! command lists and readbacks execute in submission order. The host
//! keeps only the handle registry and learns about completion through
//! fences, the way a GPU queue is driven.

use std::sync::mpsc;
use std::thread::JoinHandle;

use eddy_types::{BufferId, EddyError, EddyResult, Grid};

use crate::arena::{BufferArena, BufferRegistry};
use crate::backend::{fence_result, not_initialized, ComputeBackend};
use crate::buffers::{check_len, GridBuffer};
use crate::command::CommandList;
use crate::fence::{Fence, FenceStatus};

enum Job {
    Create { id: BufferId, grid: Grid },
    Release { id: BufferId },
    Execute { commands: CommandList, fence: Option<Fence> },
    Readback { id: BufferId, reply: mpsc::Sender<EddyResult<Vec<f32>>> },
    Barrier { reply: mpsc::Sender<()> },
}

/// Compute backend whose kernels run on a dedicated worker thread.
///
/// [`submit`](ComputeBackend::submit) returns at once with a pending
/// fence. [`read`](ComputeBackend::read) and
/// [`wait`](ComputeBackend::wait) block on a round trip through the
/// queue. Dropping the device drains the queue and joins the worker.
pub struct ThreadedDevice {
    registry: BufferRegistry,
    queue: Option<mpsc::Sender<Job>>,
    worker: Option<JoinHandle<()>>,
    submissions: u64,
}

impl ThreadedDevice {
    pub fn new() -> Self {
        Self {
            registry: BufferRegistry::new(),
            queue: None,
            worker: None,
            submissions: 0,
        }
    }

    fn send(&self, job: Job) -> EddyResult<()> {
        let queue = self.queue.as_ref().ok_or_else(|| not_initialized(self.name()))?;
        queue
            .send(job)
            .map_err(|_| EddyError::Device("compute worker terminated".into()))
    }

    fn ensure_init(&self) -> EddyResult<()> {
        if self.queue.is_some() {
            Ok(())
        } else {
            Err(not_initialized(self.name()))
        }
    }

    fn enqueue(&mut self, commands: CommandList) -> EddyResult<()> {
        self.registry.validate(&commands)?;
        self.send(Job::Execute { commands, fence: None })
    }
}

impl Default for ThreadedDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ThreadedDevice {
    fn drop(&mut self) {
        // closing the queue ends the worker loop
        self.queue.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("compute worker panicked");
            }
        }
    }
}

impl ComputeBackend for ThreadedDevice {
    fn init(&mut self) -> EddyResult<()> {
        if self.queue.is_some() {
            return Ok(());
        }
        let (sender, receiver) = mpsc::channel();
        let worker = std::thread::Builder::new()
            .name("eddy-compute".into())
            .spawn(move || worker_loop(receiver))?;
        self.queue = Some(sender);
        self.worker = Some(worker);
        tracing::info!(backend = self.name(), "compute worker started");
        Ok(())
    }

    fn name(&self) -> &str {
        "threaded"
    }

    fn create_buffer(&mut self, grid: Grid) -> EddyResult<BufferId> {
        self.ensure_init()?;
        let id = self.registry.allocate(grid)?;
        self.send(Job::Create { id, grid })?;
        Ok(id)
    }

    fn release_buffer(&mut self, id: BufferId) -> EddyResult<()> {
        self.ensure_init()?;
        self.registry.release(id)?;
        self.send(Job::Release { id })
    }

    fn grid_of(&self, id: BufferId) -> EddyResult<Grid> {
        self.ensure_init()?;
        self.registry.grid_of(id)
    }

    fn fill(&mut self, id: BufferId, value: f32) -> EddyResult<()> {
        self.ensure_init()?;
        let mut commands = CommandList::new("fill");
        commands.fill(id, value);
        self.enqueue(commands)
    }

    fn set_values(&mut self, id: BufferId, values: &[f32]) -> EddyResult<()> {
        self.ensure_init()?;
        check_len(self.registry.grid_of(id)?, values.len())?;
        let mut commands = CommandList::new("upload");
        commands.upload(id, values.to_vec());
        self.enqueue(commands)
    }

    fn read(&self, id: BufferId) -> EddyResult<Vec<f32>> {
        self.ensure_init()?;
        self.registry.grid_of(id)?;
        let (reply, response) = mpsc::channel();
        self.send(Job::Readback { id, reply })?;
        response
            .recv()
            .map_err(|_| EddyError::Device("compute worker dropped a readback".into()))?
    }

    fn submit(&mut self, commands: CommandList) -> EddyResult<Fence> {
        self.ensure_init()?;
        self.registry.validate(&commands)?;
        self.submissions += 1;
        let fence = Fence::pending(self.submissions);
        self.send(Job::Execute {
            commands,
            fence: Some(fence.clone()),
        })?;
        Ok(fence)
    }

    fn wait(&mut self, fence: &Fence) -> EddyResult<()> {
        self.ensure_init()?;
        if fence.status() == FenceStatus::Pending {
            let (reply, done) = mpsc::channel();
            self.send(Job::Barrier { reply })?;
            done.recv()
                .map_err(|_| EddyError::Device("compute worker terminated".into()))?;
        }
        fence_result(fence)
    }

    fn is_gpu(&self) -> bool {
        true
    }
}

fn worker_loop(jobs: mpsc::Receiver<Job>) {
    let mut arena = BufferArena::new();
    while let Ok(job) = jobs.recv() {
        match job {
            Job::Create { id, grid } => arena.insert(id, GridBuffer::zeros(grid)),
            Job::Release { id } => {
                if let Err(err) = arena.remove(id) {
                    tracing::error!(%err, "release failed");
                }
            }
            Job::Execute { commands, fence } => match arena.execute(&commands) {
                Ok(()) => {
                    if let Some(fence) = fence {
                        tracing::debug!(submission = fence.submission(), "fence signaled");
                        fence.signal();
                    }
                }
                Err(err) => {
                    tracing::error!(%err, label = commands.label(), "command list failed");
                    if let Some(fence) = fence {
                        fence.fail();
                    }
                }
            },
            Job::Readback { id, reply } => {
                let data = arena.get(id).map(|b| b.as_slice().to_vec());
                // the host may have given up waiting
                let _ = reply.send(data);
            }
            Job::Barrier { reply } => {
                let _ = reply.send(());
            }
        }
    }
}
