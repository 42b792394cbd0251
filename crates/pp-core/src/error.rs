//! Engine-wide configuration error type.
//!
//! Sub-crates define their own error enums and either convert them into
//! `PpError` or wrap it as one variant (as `pp-sim::SimError` does).

use thiserror::Error;

/// Errors raised while validating engine configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PpError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("phase {phase:?} expects {got} participants but the engine runs {expected} workers")]
    ParticipantMismatch {
        phase:    String,
        expected: usize,
        got:      usize,
    },

    #[error("duplicate phase name {0:?}")]
    DuplicatePhase(String),

    #[error("unknown phase {0:?}")]
    UnknownPhase(String),
}

/// Shorthand result type for all `pp-*` crates.
pub type PpResult<T> = Result<T, PpError>;
