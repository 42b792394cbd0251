use pp_core::{PhaseId, PpError, WorkerId};
use pp_sync::SyncError;
use pp_work::WorkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] PpError),

    #[error("work provider error: {0}")]
    Work(#[from] WorkError),

    #[error("sync point error: {0}")]
    Sync(#[from] SyncError),

    #[error("work provider is built for {got} workers but the engine runs {expected}")]
    WorkerCountMismatch {
        expected: usize,
        got:      usize,
    },

    #[error("work provider covers {got} items but the configuration says {expected}")]
    WorkSizeMismatch {
        expected: usize,
        got:      usize,
    },

    /// The model's processing callback failed.
    #[error("{worker} failed on item {item} in {phase} of iteration {iteration}: {source}")]
    Process {
        worker:    WorkerId,
        phase:     PhaseId,
        iteration: u64,
        item:      usize,
        source:    Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// The worker stopped because its sync points were interrupted, either by
    /// another worker's failure or by a [`StopHandle`](crate::StopHandle).
    #[error("{worker} cancelled in {phase} of iteration {iteration}")]
    Cancelled {
        worker:    WorkerId,
        phase:     PhaseId,
        iteration: u64,
    },

    #[error("{worker} panicked")]
    WorkerPanicked { worker: WorkerId },

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),
}

impl SimError {
    /// `true` for errors that only report being stopped by someone else.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, SimError::Cancelled { .. })
    }
}

pub type SimResult<T> = Result<T, SimError>;
