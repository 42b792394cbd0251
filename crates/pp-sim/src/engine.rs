//! The `Engine` controller: owns the model, the work provider and the sync
//! points, and runs the worker threads.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pp_core::{EngineConfig, PhaseId, WorkerId};
use pp_sync::SyncPoint;
use pp_work::WorkProvider;
use tracing::{error, info, warn};

use crate::worker::{Shared, Worker};
use crate::{SimError, SimResult, WorkModel};

/// Summary of a run that completed every iteration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub iterations: u64,
    pub workers:    usize,
    pub elapsed:    Duration,
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// Phase-synchronized worker pool bound to one model.
///
/// Create via [`EngineBuilder`][crate::EngineBuilder].  An engine can be run
/// any number of times; each [`run`](Self::run) starts from re-armed sync
/// points and a re-armed provider, whatever happened to the previous one.
pub struct Engine<M: WorkModel> {
    config:   EngineConfig,
    model:    M,
    provider: Box<dyn WorkProvider>,
    points:   Arc<Vec<SyncPoint<M>>>,
}

impl<M: WorkModel> Engine<M> {
    pub(crate) fn from_parts(
        config:   EngineConfig,
        model:    M,
        provider: Box<dyn WorkProvider>,
        points:   Arc<Vec<SyncPoint<M>>>,
    ) -> Self {
        Self { config, model, provider, points }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable model access between runs, e.g. to seed a new population.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    /// Name of `phase`, if it exists.
    pub fn phase_name(&self, phase: PhaseId) -> Option<&str> {
        self.config.phases.get(phase.index()).map(|p| p.name.as_str())
    }

    /// A handle that cancels the current run from any thread.
    ///
    /// A stop issued while no run is in progress is cleared by the next
    /// `run`.
    pub fn stop_handle(&self) -> StopHandle {
        let points: Arc<dyn Interrupt> = self.points.clone();
        StopHandle { points }
    }

    /// Run `config.iterations` iterations on `config.num_workers` threads and
    /// block until every thread has exited.
    ///
    /// # Errors
    ///
    /// If any worker fails, every worker is released and the error that
    /// caused the stop is returned: a processing failure, a panic or a spawn
    /// failure takes precedence over the [`SimError::Cancelled`] reported by
    /// the workers it released.  A run stopped through a [`StopHandle`]
    /// returns `Cancelled`.
    pub fn run(&mut self) -> SimResult<RunReport> {
        for point in self.points.iter() {
            point.reset();
        }
        self.provider.rearm();

        let config = &self.config;
        info!(
            workers = config.num_workers,
            iterations = config.iterations,
            work_size = config.work_size,
            phases = config.phases.len(),
            "run starting"
        );
        let started = Instant::now();

        let shared = Shared {
            config,
            model:    &self.model,
            provider: &*self.provider,
            points:   self.points.as_slice(),
        };

        let outcomes: Vec<SimResult<()>> = thread::scope(|s| {
            let mut handles = Vec::with_capacity(config.num_workers);
            let mut spawn_error = None;

            for w in 0..config.num_workers {
                let worker = WorkerId(w as u32);
                let spawned = thread::Builder::new()
                    .name(format!("pp-worker-{w}"))
                    .spawn_scoped(s, move || Worker::new(shared, worker).run());
                match spawned {
                    Ok(handle) => handles.push((worker, handle)),
                    Err(e) => {
                        error!(%worker, error = %e, "failed to spawn worker, stopping the run");
                        stop_all(shared.points);
                        spawn_error = Some(SimError::Spawn(e));
                        break;
                    }
                }
            }

            let mut outcomes: Vec<SimResult<()>> = handles
                .into_iter()
                .map(|(worker, handle)| {
                    handle.join().unwrap_or_else(|_| Err(SimError::WorkerPanicked { worker }))
                })
                .collect();
            outcomes.extend(spawn_error.map(Err));
            outcomes
        });

        let elapsed = started.elapsed();
        match root_cause(outcomes) {
            None => {
                info!(elapsed_ms = elapsed.as_millis() as u64, "run finished");
                Ok(RunReport {
                    iterations: config.iterations,
                    workers: config.num_workers,
                    elapsed,
                })
            }
            Some(e) if e.is_cancellation() => {
                warn!(error = %e, "run cancelled");
                Err(e)
            }
            Some(e) => {
                error!(error = %e, "run failed");
                Err(e)
            }
        }
    }
}

/// The first non-cancellation error, else the first cancellation.
fn root_cause(outcomes: Vec<SimResult<()>>) -> Option<SimError> {
    let mut cancelled = None;
    for outcome in outcomes {
        match outcome {
            Ok(()) => {}
            Err(e) if e.is_cancellation() => {
                cancelled.get_or_insert(e);
            }
            Err(e) => return Some(e),
        }
    }
    cancelled
}

pub(crate) fn stop_all<C: ?Sized>(points: &[SyncPoint<C>]) {
    for point in points {
        point.stop_now();
    }
}

// ── StopHandle ────────────────────────────────────────────────────────────────

trait Interrupt: Send + Sync {
    fn interrupt(&self);
    fn is_interrupted(&self) -> bool;
}

impl<C: ?Sized> Interrupt for Vec<SyncPoint<C>> {
    fn interrupt(&self) {
        stop_all(self);
    }

    fn is_interrupted(&self) -> bool {
        self.iter().any(SyncPoint::is_interrupted)
    }
}

/// Cancels an engine's run from outside the worker pool.
///
/// Cheap to clone and `Send + Sync`; typically moved into a signal handler or
/// a watchdog thread.
#[derive(Clone)]
pub struct StopHandle {
    points: Arc<dyn Interrupt>,
}

impl StopHandle {
    /// Interrupt every sync point.  Workers leave at their next item or
    /// barrier and the run returns [`SimError::Cancelled`].  Idempotent.
    pub fn stop(&self) {
        self.points.interrupt();
    }

    pub fn is_stopped(&self) -> bool {
        self.points.is_interrupted()
    }
}
