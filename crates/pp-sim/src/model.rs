//! The `WorkModel` trait — the plug-in point for model code.

use pp_core::{PhaseId, WorkerId, WorkerRng};

/// Where an item is being processed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ItemContext {
    pub worker:    WorkerId,
    pub iteration: u64,
    pub phase:     PhaseId,
}

/// Per-item processing callback executed by every worker.
///
/// One instance is shared by all workers of a run, so `process` takes `&self`
/// and any mutable model state needs its own synchronization (per-cell locks,
/// atomics, …).  Within one phase every item in `[0, work_size)` is processed
/// exactly once, by exactly one worker; phases never overlap.
///
/// The same value is handed to barrier observers as their context, after
/// every worker has finished the phase.
pub trait WorkModel: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Process work item `item` of phase `ctx.phase`.
    ///
    /// Returning `Err` stops the run: every worker is released and
    /// [`Engine::run`](crate::Engine::run) reports this error.
    fn process(&self, ctx: &ItemContext, item: usize, rng: &mut WorkerRng) -> Result<(), Self::Error>;
}
