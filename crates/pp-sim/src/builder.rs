//! Fluent builder for constructing an [`Engine`].

use std::sync::Arc;

use pp_core::{EngineConfig, PhaseId, WorkPolicy};
use pp_sync::{SyncObserver, SyncPoint};
use pp_work::{EqualProvider, OnDemandProvider, WorkProvider};

use crate::{Engine, SimError, SimResult, WorkModel};

/// Fluent builder for [`Engine<M>`].
///
/// # Required inputs
///
/// - [`EngineConfig`] — workers, work size, iterations, phases, …
/// - `M: WorkModel` — the per-item processing callback and the state it
///   works on
///
/// # Optional inputs
///
/// | Method                  | Default                                         |
/// |-------------------------|-------------------------------------------------|
/// | `.observe(phase, obs)`  | No observers                                    |
/// | `.work_provider(p)`     | Built from `config.work_policy`                 |
///
/// # Example
///
/// ```rust,ignore
/// let mut engine = EngineBuilder::new(config, model)
///     .observe("act", stats_collector)
///     .build()?;
/// engine.run()?;
/// ```
pub struct EngineBuilder<M: WorkModel> {
    config:    EngineConfig,
    model:     M,
    observers: Vec<(String, Box<dyn SyncObserver<M>>)>,
    provider:  Option<Box<dyn WorkProvider>>,
}

impl<M: WorkModel> EngineBuilder<M> {
    pub fn new(config: EngineConfig, model: M) -> Self {
        Self { config, model, observers: Vec::new(), provider: None }
    }

    /// Notify `observer` each time the barrier at the end of phase `phase`
    /// releases, with the model as context.
    ///
    /// Observers of one phase run in the order they were added.  An unknown
    /// phase name is reported by [`build`](Self::build).
    pub fn observe<O>(mut self, phase: impl Into<String>, observer: O) -> Self
    where
        O: SyncObserver<M> + 'static,
    {
        self.observers.push((phase.into(), Box::new(observer)));
        self
    }

    /// Replace the provider selected by `config.work_policy`.
    ///
    /// The provider must be built for `config.num_workers` workers and
    /// `config.work_size` items; the work size is checked by `build`.
    pub fn work_provider<P>(mut self, provider: P) -> Self
    where
        P: WorkProvider + 'static,
    {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Validate the configuration, create the work provider and one sync
    /// point per phase, and return a ready-to-run [`Engine`].
    pub fn build(self) -> SimResult<Engine<M>> {
        let config = self.config;
        config.validate()?;

        // ── Work provider ─────────────────────────────────────────────────
        let provider: Box<dyn WorkProvider> = match self.provider {
            Some(p) => {
                if p.num_workers() != config.num_workers {
                    return Err(SimError::WorkerCountMismatch {
                        expected: config.num_workers,
                        got:      p.num_workers(),
                    });
                }
                if p.work_size() != config.work_size {
                    return Err(SimError::WorkSizeMismatch {
                        expected: config.work_size,
                        got:      p.work_size(),
                    });
                }
                p
            }
            None => match config.work_policy {
                WorkPolicy::OnDemand => Box::new(OnDemandProvider::new(
                    config.num_workers,
                    config.block_size,
                    config.work_size,
                )?),
                WorkPolicy::Equal => {
                    Box::new(EqualProvider::new(config.num_workers, config.work_size)?)
                }
            },
        };

        // ── Sync points, one per phase ────────────────────────────────────
        let mut points = Vec::with_capacity(config.phases.len());
        for (i, spec) in config.phases.iter().enumerate() {
            points.push(SyncPoint::new(PhaseId(i as u16), spec.name.as_str(), config.participants())?);
        }
        for (name, observer) in self.observers {
            let phase = config.phase_id(&name)?;
            points[phase.index()].register_boxed(observer);
        }

        Ok(Engine::from_parts(config, self.model, provider, Arc::new(points)))
    }
}
