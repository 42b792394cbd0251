//! `pp-core` — foundational types for the `rust_pp` simulation engine.
//!
//! This crate is a dependency of every other `pp-*` crate.  It has no `pp-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `WorkerId`, `PhaseId`                                 |
//! | [`config`]      | `EngineConfig`, `PhaseSpec`, `WorkPolicy`, `RngPolicy` |
//! | [`rng`]         | `WorkerRng` (per-worker / per-item), `SimRng` (global) |
//! | [`error`]       | `PpError`, `PpResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids and config types.    |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{EngineConfig, PhaseSpec, RngPolicy, WorkPolicy};
pub use error::{PpError, PpResult};
pub use ids::{PhaseId, WorkerId};
pub use rng::{SimRng, WorkerRng};
