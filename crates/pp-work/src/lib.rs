//! `pp-work` — work distribution for the rust_pp engine.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`provider`]   | `WorkProvider` trait, `WorkerState`                        |
//! | [`on_demand`]  | `OnDemandProvider` — shared atomic cursor, block batching  |
//! | [`equal`]      | `EqualProvider` — fixed contiguous range per worker        |
//! | [`error`]      | `WorkError`, `WorkResult<T>`                               |
//!
//! # Token lifecycle
//!
//! ```text
//! state = provider.new_worker_state(w)        // once per worker per run
//! loop per phase:
//!     while let Some(item) = provider.next_token(&mut state) { … }
//!     provider.reset_work(&mut state)         // once per worker per round
//! ```
//!
//! Within one round every index in `[0, work_size)` is handed out exactly
//! once across all workers.  The round ends for the provider when the last
//! of `num_workers` workers has called `reset_work`.

pub mod equal;
pub mod error;
pub mod on_demand;
pub mod provider;

#[cfg(test)]
mod tests;

pub use equal::EqualProvider;
pub use error::{WorkError, WorkResult};
pub use on_demand::OnDemandProvider;
pub use provider::{WorkProvider, WorkerState};
