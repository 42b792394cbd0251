//! The `WorkProvider` trait and the per-worker cursor it hands back.

use pp_core::WorkerId;

/// A worker's private view of its current block of tokens.
///
/// Owned by one worker thread and passed to the provider as `&mut`; never
/// shared.  `next >= limit` means the worker has no block in hand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerState {
    pub worker: WorkerId,
    /// Next token to hand out from the current block.
    pub next:   usize,
    /// Exclusive upper bound of the current block.
    pub limit:  usize,
}

impl WorkerState {
    /// A zeroed state: no block in hand.
    pub fn new(worker: WorkerId) -> Self {
        Self { worker, next: 0, limit: 0 }
    }

    /// Drop whatever is left of the current block.
    #[inline]
    pub fn clear(&mut self) {
        self.next = 0;
        self.limit = 0;
    }
}

/// Source of work tokens for one run.
///
/// Implementations must guarantee that, between two completed reset rounds,
/// the tokens returned across all workers are exactly `0..work_size()` with
/// no duplicates.
///
/// The trait is object safe so the engine can hold a `Box<dyn WorkProvider>`
/// chosen at configuration time.
pub trait WorkProvider: Send + Sync {
    /// Fresh state for `worker`, called once per worker at thread start.
    fn new_worker_state(&self, worker: WorkerId) -> WorkerState;

    /// Next token for this worker, or `None` once the round is exhausted.
    ///
    /// Never blocks.
    fn next_token(&self, state: &mut WorkerState) -> Option<usize>;

    /// Called by every worker exactly once per round after it has seen
    /// `None`.  The provider becomes usable for the next round only after
    /// all workers have called it.
    fn reset_work(&self, state: &mut WorkerState);

    /// Forget any partial round (e.g. after a cancelled run).
    ///
    /// Must only be called while no worker is using the provider.
    fn rearm(&self);

    /// Number of items per round.
    fn work_size(&self) -> usize;

    /// Workers the provider was built for.  Every one of them must call
    /// `reset_work` before the next round starts.
    fn num_workers(&self) -> usize;
}

impl<P: WorkProvider + ?Sized> WorkProvider for Box<P> {
    fn new_worker_state(&self, worker: WorkerId) -> WorkerState {
        (**self).new_worker_state(worker)
    }

    fn next_token(&self, state: &mut WorkerState) -> Option<usize> {
        (**self).next_token(state)
    }

    fn reset_work(&self, state: &mut WorkerState) {
        (**self).reset_work(state)
    }

    fn rearm(&self) {
        (**self).rearm()
    }

    fn work_size(&self) -> usize {
        (**self).work_size()
    }

    fn num_workers(&self) -> usize {
        (**self).num_workers()
    }
}
