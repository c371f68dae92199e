//! Step scheduling outcomes.

use thiserror::Error;

use eddy_types::EddyError;

/// Why [`try_advance`](crate::StepScheduler::try_advance) issued no step.
#[derive(Debug, Error)]
pub enum AdvanceError {
    /// The previous step's fence is not signaled yet. Expected under
    /// load; try again next frame.
    #[error("Previous step still in flight")]
    StillBusy,

    /// The backend failed to record, submit or complete a step.
    #[error(transparent)]
    Backend(#[from] EddyError),
}

impl AdvanceError {
    pub fn is_busy(&self) -> bool {
        matches!(self, AdvanceError::StillBusy)
    }
}
