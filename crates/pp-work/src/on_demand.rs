//! `OnDemandProvider` — dynamic, block-batched token allocation.
//!
//! # How it works
//!
//! All workers share one atomic cursor.  A worker that has used up its block
//! claims the next `block_size` tokens with one compare-and-swap loop on the
//! cursor, then hands them to itself one by one without touching shared
//! memory.  Contention is therefore one atomic RMW per `block_size` tokens,
//! not per token.
//!
//! A claim never moves the cursor past `work_size`, and a worker that finds
//! it there leaves it alone.  Repeated fetching after exhaustion cannot wrap
//! the cursor, however large the block size.
//!
//! Fast workers simply come back for more blocks, so uneven per-item cost is
//! absorbed automatically.  The block size trades balance against traffic:
//! small blocks even out the tail, large blocks cut the number of RMWs.
//!
//! # Reset protocol
//!
//! The cursor may only go back to zero once every worker has stopped fetching
//! for the current round; otherwise a fast worker could claim tokens of the
//! next round while a slow one is still on the current one.  Each worker
//! increments `resets` after seeing exhaustion, and the one whose increment
//! reaches `num_workers` (exactly one, by atomicity) re-arms both counters.

use std::sync::atomic::{AtomicUsize, Ordering};

use pp_core::WorkerId;
use tracing::{debug, trace};

use crate::{WorkError, WorkProvider, WorkResult, WorkerState};

/// Hands out `[0, work_size)` in blocks of `block_size` from a shared cursor.
#[derive(Debug)]
pub struct OnDemandProvider {
    /// Next unclaimed token.  Never exceeds `work_size`.
    cursor:      AtomicUsize,
    /// Workers that have called `reset_work` in the current round.
    resets:      AtomicUsize,
    num_workers: usize,
    block_size:  usize,
    work_size:   usize,
}

impl OnDemandProvider {
    pub fn new(num_workers: usize, block_size: usize, work_size: usize) -> WorkResult<Self> {
        if num_workers == 0 {
            return Err(WorkError::NoWorkers);
        }
        if block_size == 0 {
            return Err(WorkError::ZeroBlockSize);
        }
        Ok(Self {
            cursor: AtomicUsize::new(0),
            resets: AtomicUsize::new(0),
            num_workers,
            block_size,
            work_size,
        })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

}

impl WorkProvider for OnDemandProvider {
    fn new_worker_state(&self, worker: WorkerId) -> WorkerState {
        WorkerState::new(worker)
    }

    fn next_token(&self, state: &mut WorkerState) -> Option<usize> {
        if state.next >= state.limit {
            // Uniqueness only needs the RMW itself; cross-round visibility
            // comes from the barrier between rounds.
            let (block, work) = (self.block_size, self.work_size);
            match self.cursor.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |start| {
                (start < work).then(|| start + block.min(work - start))
            }) {
                Ok(start) => {
                    state.next = start;
                    state.limit = start + block.min(work - start);
                }
                Err(_) => {
                    state.next = work;
                    state.limit = work;
                }
            }
        }

        if state.next < self.work_size {
            let token = state.next;
            state.next += 1;
            Some(token)
        } else {
            None
        }
    }

    fn reset_work(&self, state: &mut WorkerState) {
        state.clear();

        let arrived = self.resets.fetch_add(1, Ordering::AcqRel) + 1;
        if arrived == self.num_workers {
            self.resets.store(0, Ordering::Release);
            self.cursor.store(0, Ordering::Release);
            trace!(worker = %state.worker, "last reset of round, cursor re-armed");
        }
    }

    fn rearm(&self) {
        self.resets.store(0, Ordering::Release);
        self.cursor.store(0, Ordering::Release);
        debug!(work_size = self.work_size, block_size = self.block_size, "provider re-armed");
    }

    fn work_size(&self) -> usize {
        self.work_size
    }

    fn num_workers(&self) -> usize {
        self.num_workers
    }
}
