//! The loop each worker thread runs.

use std::thread;

use pp_core::{EngineConfig, PhaseId, RngPolicy, WorkerId, WorkerRng};
use pp_sync::SyncPoint;
use pp_work::{WorkProvider, WorkerState};
use tracing::{debug, error, warn};

use crate::engine::stop_all;
use crate::{ItemContext, SimError, SimResult, WorkModel};

/// Everything a worker borrows from the engine for the duration of a run.
pub(crate) struct Shared<'a, M: WorkModel> {
    pub config:   &'a EngineConfig,
    pub model:    &'a M,
    pub provider: &'a dyn WorkProvider,
    pub points:   &'a [SyncPoint<M>],
}

impl<M: WorkModel> Clone for Shared<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: WorkModel> Copy for Shared<'_, M> {}

/// Stops every sync point if the worker unwinds, so the others do not wait
/// forever at a barrier it will never reach.
struct StopOnPanic<'a, C: ?Sized>(&'a [SyncPoint<C>]);

impl<C: ?Sized> Drop for StopOnPanic<'_, C> {
    fn drop(&mut self) {
        if thread::panicking() {
            error!("worker panicked, stopping all workers");
            stop_all(self.0);
        }
    }
}

pub(crate) struct Worker<'a, M: WorkModel> {
    shared: Shared<'a, M>,
    id:     WorkerId,
    rng:    WorkerRng,
    state:  WorkerState,
}

impl<'a, M: WorkModel> Worker<'a, M> {
    pub(crate) fn new(shared: Shared<'a, M>, id: WorkerId) -> Self {
        Self {
            rng: WorkerRng::new(shared.config.seed, id),
            state: shared.provider.new_worker_state(id),
            shared,
            id,
        }
    }

    pub(crate) fn run(mut self) -> SimResult<()> {
        let _guard = StopOnPanic(self.shared.points);
        debug!(worker = %self.id, "worker started");

        let result = self.run_iterations();
        match &result {
            Ok(()) => debug!(worker = %self.id, "worker finished"),
            Err(e) => debug!(worker = %self.id, error = %e, "worker exited early"),
        }
        result
    }

    fn run_iterations(&mut self) -> SimResult<()> {
        let points = self.shared.points;
        for iteration in 0..self.shared.config.iterations {
            for (index, point) in points.iter().enumerate() {
                let ctx = ItemContext { worker: self.id, iteration, phase: PhaseId(index as u16) };
                self.run_phase(&ctx, point)?;
            }
        }
        Ok(())
    }

    /// Drain the provider for one phase, then wait at its barrier.
    fn run_phase(&mut self, ctx: &ItemContext, point: &SyncPoint<M>) -> SimResult<()> {
        let Shared { config, model, provider, points } = self.shared;
        let per_item = config.rng_policy == RngPolicy::PerItem;

        while let Some(item) = provider.next_token(&mut self.state) {
            if point.is_interrupted() {
                return Err(cancelled(ctx));
            }
            if per_item {
                self.rng.reseed_for_item(ctx.iteration, ctx.phase, item);
            }
            if let Err(source) = model.process(ctx, item, &mut self.rng) {
                error!(
                    worker = %ctx.worker,
                    phase = %ctx.phase,
                    iteration = ctx.iteration,
                    item,
                    error = %source,
                    "processing failed, stopping all workers"
                );
                stop_all(points);
                return Err(SimError::Process {
                    worker:    ctx.worker,
                    phase:     ctx.phase,
                    iteration: ctx.iteration,
                    item,
                    source:    Box::new(source),
                });
            }
        }

        provider.reset_work(&mut self.state);
        point.arrive(model).map_err(|_| cancelled(ctx))?;
        Ok(())
    }
}

fn cancelled(ctx: &ItemContext) -> SimError {
    warn!(worker = %ctx.worker, phase = %ctx.phase, iteration = ctx.iteration, "worker cancelled");
    SimError::Cancelled { worker: ctx.worker, phase: ctx.phase, iteration: ctx.iteration }
}
