//! Per-iteration population history, filled in by a barrier observer.

use std::sync::Arc;

use parking_lot::Mutex;
use pp_sim::{PhaseEvent, SyncObserver};
use tracing::info;

use crate::model::{PredPrey, Stats};

/// Appends one [`Stats`] row per release of the barrier it observes.
///
/// Registered on the last phase of the iteration, so each row describes a
/// finished iteration.  Row 0 of the history is the start-up population,
/// pushed before the run.
pub struct StatsCollector {
    history:   Arc<Mutex<Vec<Stats>>>,
    log_every: u64,
}

impl StatsCollector {
    /// Log the counts every `log_every` iterations (never if 0).
    pub fn new(history: Arc<Mutex<Vec<Stats>>>, log_every: u64) -> Self {
        Self { history, log_every }
    }
}

impl SyncObserver<PredPrey> for StatsCollector {
    fn notify(&mut self, event: &PhaseEvent<'_>, model: &PredPrey) {
        let stats = model.stats();
        let done = event.iteration + 1;
        if self.log_every > 0 && done % self.log_every == 0 {
            info!(
                iteration = done,
                sheep = stats.sheep,
                wolves = stats.wolves,
                grass = stats.grass,
                "population"
            );
        }
        self.history.lock().push(stats);
    }
}
