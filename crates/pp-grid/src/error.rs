use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid dimensions must be non-zero (got {width}x{height})")]
    EmptyDimensions { width: usize, height: usize },

    #[error("grid of {width}x{height} cells overflows usize")]
    TooLarge { width: usize, height: usize },
}

pub type GridResult<T> = Result<T, GridError>;
