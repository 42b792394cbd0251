//! `EqualProvider` — static, contiguous split of the work range.
//!
//! Worker `w` of `n` always gets the same slice of `[0, work_size)`; slice
//! lengths differ by at most one.  Nothing is shared between workers, so the
//! provider does no atomic work at all, but a worker with expensive items
//! holds everyone else up at the next barrier.

use pp_core::WorkerId;

use crate::{WorkError, WorkProvider, WorkResult, WorkerState};

#[derive(Debug, Clone)]
pub struct EqualProvider {
    num_workers: usize,
    work_size:   usize,
}

impl EqualProvider {
    pub fn new(num_workers: usize, work_size: usize) -> WorkResult<Self> {
        if num_workers == 0 {
            return Err(WorkError::NoWorkers);
        }
        Ok(Self { num_workers, work_size })
    }

    /// The half-open token range owned by `worker`.
    ///
    /// Workers beyond `num_workers` own nothing.
    pub fn range_of(&self, worker: WorkerId) -> (usize, usize) {
        let w = worker.index();
        if w >= self.num_workers {
            return (self.work_size, self.work_size);
        }
        let base = self.work_size / self.num_workers;
        let rem = self.work_size % self.num_workers;
        let start = w * base + w.min(rem);
        let len = base + usize::from(w < rem);
        (start, start + len)
    }

    fn load(&self, state: &mut WorkerState) {
        let (start, end) = self.range_of(state.worker);
        state.next = start;
        state.limit = end;
    }
}

impl WorkProvider for EqualProvider {
    fn new_worker_state(&self, worker: WorkerId) -> WorkerState {
        let mut state = WorkerState::new(worker);
        self.load(&mut state);
        state
    }

    fn next_token(&self, state: &mut WorkerState) -> Option<usize> {
        if state.next < state.limit {
            let token = state.next;
            state.next += 1;
            Some(token)
        } else {
            None
        }
    }

    fn reset_work(&self, state: &mut WorkerState) {
        self.load(state);
    }

    fn rearm(&self) {}

    fn work_size(&self) -> usize {
        self.work_size
    }

    fn num_workers(&self) -> usize {
        self.num_workers
    }
}
