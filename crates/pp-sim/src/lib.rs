//! `pp-sim` — the controller and worker loop of the rust_pp engine.
//!
//! # One run
//!
//! ```text
//! Engine::run:
//!   reset every SyncPoint, rearm the WorkProvider
//!   spawn num_workers threads, each:
//!     for iteration in 0..config.iterations:
//!       for phase in config.phases:
//!         while let Some(item) = provider.next_token(state):
//!           stop if interrupted
//!           model.process(ctx, item, rng)      — failure stops every point
//!         provider.reset_work(state)
//!         points[phase].arrive(&model)         — last arrival runs observers
//!   join all workers; report the root cause of any failure
//! ```
//!
//! Any failing worker stops every sync point, so the remaining workers return
//! from their current barrier or item loop instead of waiting forever.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Runs [`Grid::census`] on Rayon's thread pool.           |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pp_core::{EngineConfig, PhaseSpec};
//! use pp_sim::EngineBuilder;
//!
//! let config = EngineConfig {
//!     num_workers: 4,
//!     work_size:   grid.len(),
//!     iterations:  100,
//!     phases:      vec![PhaseSpec::new("move"), PhaseSpec::new("act")],
//!     ..EngineConfig::default()
//! };
//! let mut engine = EngineBuilder::new(config, model)
//!     .observe("act", |ev: &PhaseEvent<'_>, m: &Model| m.record(ev.iteration))
//!     .build()?;
//! let report = engine.run()?;
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod model;
mod worker;


pub use builder::EngineBuilder;
pub use engine::{Engine, RunReport, StopHandle};
pub use error::{SimError, SimResult};
pub use model::{ItemContext, WorkModel};

pub use pp_grid::{insert_ordered, Cell, Grid, GridError, PutAgent, SyncAppend, SyncOrdered};
pub use pp_sync::{PhaseEvent, SyncObserver};
