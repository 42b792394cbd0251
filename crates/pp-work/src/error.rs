use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkError {
    #[error("work provider needs at least one worker")]
    NoWorkers,

    #[error("block size must be at least 1")]
    ZeroBlockSize,
}

pub type WorkResult<T> = Result<T, WorkError>;
