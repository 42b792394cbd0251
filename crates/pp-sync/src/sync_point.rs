//! `SyncPoint<C>` — a reusable, interruptible rendezvous.
//!
//! # Design
//!
//! Arrival count, release generation, interrupted flag and the observer list
//! all live behind one `parking_lot::Mutex`, and a single `Condvar` wakes
//! waiters on both release and interruption.  `stop_now` therefore sets the
//! flag and wakes everyone atomically with respect to `arrive`: a waiter
//! either sees its generation advance (released) or sees the flag (cancelled),
//! never neither.
//!
//! The last participant to arrive runs the observers before bumping the
//! generation, so observer side effects happen-before any participant
//! returns from `arrive`.
//!
//! The interrupted flag is mirrored in an `AtomicBool` so workers can poll it
//! between work items without taking the lock.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Condvar, Mutex};
use pp_core::PhaseId;
use tracing::{debug, trace};

use crate::{PhaseEvent, SyncError, SyncObserver, SyncResult};

struct PointState<C: ?Sized> {
    /// Participants parked in the current generation.
    arrived:     usize,
    /// Completed releases since construction or the last `reset`.
    generation:  u64,
    interrupted: bool,
    observers:   Vec<Box<dyn SyncObserver<C>>>,
}

/// Barrier for one phase transition, shared by every worker of a run.
pub struct SyncPoint<C: ?Sized> {
    phase:        PhaseId,
    name:         String,
    participants: usize,
    state:        Mutex<PointState<C>>,
    released:     Condvar,
    interrupted:  AtomicBool,
}

impl<C: ?Sized> SyncPoint<C> {
    /// Create an armed point that releases once `participants` threads arrive.
    pub fn new(phase: PhaseId, name: impl Into<String>, participants: usize) -> SyncResult<Self> {
        if participants == 0 {
            return Err(SyncError::NoParticipants);
        }
        Ok(Self {
            phase,
            name: name.into(),
            participants,
            state: Mutex::new(PointState {
                arrived:     0,
                generation:  0,
                interrupted: false,
                observers:   Vec::new(),
            }),
            released: Condvar::new(),
            interrupted: AtomicBool::new(false),
        })
    }

    pub fn phase(&self) -> PhaseId {
        self.phase
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn participants(&self) -> usize {
        self.participants
    }

    /// Add an observer, notified after every later release in registration
    /// order.
    ///
    /// Takes `&mut self`: registration is closed once the point is shared
    /// with the workers.
    pub fn register_observer<O>(&mut self, observer: O)
    where
        O: SyncObserver<C> + 'static,
    {
        self.register_boxed(Box::new(observer));
    }

    /// [`register_observer`](Self::register_observer) for an already boxed
    /// observer.
    pub fn register_boxed(&mut self, observer: Box<dyn SyncObserver<C>>) {
        self.state.get_mut().observers.push(observer);
    }

    pub fn observer_count(&mut self) -> usize {
        self.state.get_mut().observers.len()
    }

    /// Block until all participants have arrived, then return the generation
    /// that was released.
    ///
    /// Fails with [`SyncError::Interrupted`] immediately if the point is
    /// stopped, or as soon as it becomes stopped while waiting.  A waiter
    /// whose generation was already released returns `Ok` even if a stop
    /// follows before it wakes.
    pub fn arrive(&self, ctx: &C) -> SyncResult<u64> {
        let mut state = self.state.lock();
        if state.interrupted {
            return Err(SyncError::Interrupted(self.phase));
        }

        let generation = state.generation;
        state.arrived += 1;

        if state.arrived == self.participants {
            let event = PhaseEvent { phase: self.phase, name: &self.name, iteration: generation };
            for observer in state.observers.iter_mut() {
                observer.notify(&event, ctx);
            }
            state.arrived = 0;
            state.generation += 1;
            self.released.notify_all();
            trace!(phase = %self.phase, name = %self.name, generation, "barrier released");
            return Ok(generation);
        }

        while state.generation == generation && !state.interrupted {
            self.released.wait(&mut state);
        }

        if state.generation != generation {
            Ok(generation)
        } else {
            Err(SyncError::Interrupted(self.phase))
        }
    }

    /// Interrupt the point: wake every waiter with an error and make every
    /// later `arrive` fail until [`reset`](Self::reset).
    ///
    /// Callable from any thread, including from inside a processing callback
    /// on another worker.  Idempotent.
    pub fn stop_now(&self) {
        let mut state = self.state.lock();
        if !state.interrupted {
            state.interrupted = true;
            self.interrupted.store(true, Ordering::Release);
            debug!(phase = %self.phase, name = %self.name, parked = state.arrived, "sync point interrupted");
        }
        self.released.notify_all();
    }

    /// Lock-free check of the interrupted flag.
    #[inline]
    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Acquire)
    }

    /// Re-arm for a fresh run: clear the interrupted flag and zero the
    /// arrival and generation counters.  Observers stay registered.
    ///
    /// Not for use between iterations of one run (releases re-arm the point
    /// by themselves) and never while threads are parked in `arrive`.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.arrived = 0;
        state.generation = 0;
        state.interrupted = false;
        self.interrupted.store(false, Ordering::Release);
    }

    /// Releases completed since construction or the last reset.
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Participants currently parked.
    pub fn waiting(&self) -> usize {
        self.state.lock().arrived
    }
}
