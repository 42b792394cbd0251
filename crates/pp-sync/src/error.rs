use pp_core::PhaseId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SyncError {
    /// The point was stopped; every current and future `arrive` fails until
    /// `reset` is called.
    #[error("synchronization at {0} interrupted by another thread")]
    Interrupted(PhaseId),

    #[error("a synchronization point needs at least one participant")]
    NoParticipants,
}

pub type SyncResult<T> = Result<T, SyncError>;
