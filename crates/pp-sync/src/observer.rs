//! Observer trait for barrier releases.

use pp_core::PhaseId;

/// Which release is being reported.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PhaseEvent<'a> {
    pub phase:     PhaseId,
    /// Phase name as configured.
    pub name:      &'a str,
    /// Zero-based count of releases of this point since the last reset,
    /// i.e. the iteration number.
    pub iteration: u64,
}

/// Callback notified once per release of a [`SyncPoint`][crate::SyncPoint].
///
/// # Threading contract
///
/// `notify` runs on whichever participant arrives last, so successive calls
/// generally come from different threads; hence the `Send` bound.  It runs
/// while the point's lock is held and every other participant is parked, so
/// it sees a fully settled model and no participant proceeds until it
/// returns.  It must not call back into the same point (`arrive`,
/// `stop_now`, …); that would deadlock.
///
/// Closures `FnMut(&PhaseEvent, &C) + Send` implement this trait.
pub trait SyncObserver<C: ?Sized>: Send {
    fn notify(&mut self, event: &PhaseEvent<'_>, ctx: &C);
}

impl<C: ?Sized, F> SyncObserver<C> for F
where
    F: FnMut(&PhaseEvent<'_>, &C) + Send,
{
    fn notify(&mut self, event: &PhaseEvent<'_>, ctx: &C) {
        self(event, ctx)
    }
}
