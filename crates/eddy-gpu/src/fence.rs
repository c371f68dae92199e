//! Device completion signals.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

const PENDING: u8 = 0;
const SIGNALED: u8 = 1;
const FAILED: u8 = 2;

/// Completion state of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FenceStatus {
    Pending,
    Signaled,
    /// The submission stopped on an error; its outputs are undefined.
    Failed,
}

/// Shared completion flag for one submitted command list.
///
/// Clones observe the same status. The device side calls
/// [`signal`](Fence::signal) or [`fail`](Fence::fail) exactly once; the
/// host polls [`status`](Fence::status) without blocking.
#[derive(Debug, Clone)]
pub struct Fence {
    submission: u64,
    state: Arc<AtomicU8>,
}

impl Fence {
    pub fn pending(submission: u64) -> Self {
        Self {
            submission,
            state: Arc::new(AtomicU8::new(PENDING)),
        }
    }

    /// A fence for work that already completed.
    pub fn signaled(submission: u64) -> Self {
        Self {
            submission,
            state: Arc::new(AtomicU8::new(SIGNALED)),
        }
    }

    /// Monotonic index of the submission this fence tracks.
    pub fn submission(&self) -> u64 {
        self.submission
    }

    pub fn signal(&self) {
        self.state.store(SIGNALED, Ordering::Release);
    }

    pub fn fail(&self) {
        self.state.store(FAILED, Ordering::Release);
    }

    pub fn status(&self) -> FenceStatus {
        match self.state.load(Ordering::Acquire) {
            PENDING => FenceStatus::Pending,
            SIGNALED => FenceStatus::Signaled,
            _ => FenceStatus::Failed,
        }
    }

    pub fn is_signaled(&self) -> bool {
        self.status() == FenceStatus::Signaled
    }
}
