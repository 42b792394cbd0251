//! Strategies for placing an agent into a shared, lock-protected list.
//!
//! Several workers can target the same destination cell in one phase (agents
//! moving in from different source cells).  With plain appends the final
//! order of the list would follow thread interleaving and break run-to-run
//! reproducibility; [`SyncOrdered`] keeps every list sorted by the agents'
//! total order instead, so the result is the same whatever the arrival
//! order.

use parking_lot::Mutex;

/// Insert `agent` into an already sorted `agents`, keeping it sorted.
///
/// Equal elements keep arrival order: the new agent goes after every
/// existing element that compares equal.  O(log n) search, O(n) shift.
#[inline]
pub fn insert_ordered<A: Ord>(agents: &mut Vec<A>, agent: A) {
    let idx = agents.partition_point(|existing| existing <= &agent);
    agents.insert(idx, agent);
}

/// How an agent is put into a cell's list.
///
/// Implementations take the list's lock for the duration of the insertion
/// only; callers must not already hold it.
pub trait PutAgent: Send + Sync {
    fn put<A: Ord>(&self, agents: &Mutex<Vec<A>>, agent: A);
}

/// Locked, order-preserving insertion.  The resulting list is independent of
/// the order in which concurrent callers arrive, provided distinct agents
/// never compare equal.
#[derive(Copy, Clone, Debug, Default)]
pub struct SyncOrdered;

impl PutAgent for SyncOrdered {
    fn put<A: Ord>(&self, agents: &Mutex<Vec<A>>, agent: A) {
        insert_ordered(&mut agents.lock(), agent);
    }
}

/// Locked append.  Cheaper, but the list order depends on scheduling; only
/// for models whose outcome does not depend on agent order.
#[derive(Copy, Clone, Debug, Default)]
pub struct SyncAppend;

impl PutAgent for SyncAppend {
    fn put<A: Ord>(&self, agents: &Mutex<Vec<A>>, agent: A) {
        agents.lock().push(agent);
    }
}
