//! `Cell<A>` — one grid location.

use parking_lot::{Mutex, MutexGuard};

use crate::{insert_ordered, PutAgent};

/// Agents currently in a cell plus agents arriving into it.
///
/// The two lists have separate locks so that a phase can move agents out of
/// their source cells (owner side) while other workers drop arrivals into
/// destination cells (`future` side) without any cell lock being held by two
/// parties at once.  A later phase folds the arrivals in with
/// [`commit_future`](Self::commit_future).
pub struct Cell<A> {
    agents: Mutex<Vec<A>>,
    future: Mutex<Vec<A>>,
}

impl<A> Default for Cell<A> {
    fn default() -> Self {
        Self { agents: Mutex::new(Vec::new()), future: Mutex::new(Vec::new()) }
    }
}

impl<A> Cell<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Owner access to the current agents.
    ///
    /// Drop the guard before reaching a barrier or touching another cell.
    pub fn lock(&self) -> MutexGuard<'_, Vec<A>> {
        self.agents.lock()
    }

    /// Remove and return every current agent.
    pub fn take_agents(&self) -> Vec<A> {
        std::mem::take(&mut *self.agents.lock())
    }

    pub fn len(&self) -> usize {
        self.agents.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.lock().is_empty()
    }

    /// Agents waiting to be committed.
    pub fn future_len(&self) -> usize {
        self.future.lock().len()
    }

    /// Clone of the current agents, for inspection and tests.
    pub fn snapshot(&self) -> Vec<A>
    where
        A: Clone,
    {
        self.agents.lock().clone()
    }
}

impl<A: Ord> Cell<A> {
    /// Put `agent` among the current agents.
    pub fn put<S: PutAgent>(&self, strategy: &S, agent: A) {
        strategy.put(&self.agents, agent);
    }

    /// Put `agent` among the arrivals.  Safe to call from any worker.
    pub fn put_future<S: PutAgent>(&self, strategy: &S, agent: A) {
        strategy.put(&self.future, agent);
    }

    /// Fold the arrivals into the current agents, keeping them sorted.
    ///
    /// The result is sorted whichever strategy put the arrivals, as long as
    /// the current agents were.  Arrivals compare after current agents they
    /// are equal to, and equal arrivals keep the order they were put in.
    pub fn commit_future(&self) {
        let arrivals = std::mem::take(&mut *self.future.lock());
        let mut current = self.agents.lock();
        if current.is_empty() {
            *current = arrivals;
            // Stable, and linear when the arrivals are already ordered.
            current.sort();
        } else {
            for agent in arrivals {
                insert_ordered(&mut *current, agent);
            }
        }
    }
}
