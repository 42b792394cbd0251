//! `pp-sync` — phase barriers for the rust_pp engine.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`sync_point`]  | `SyncPoint<C>` — reusable, interruptible barrier          |
//! | [`observer`]    | `SyncObserver<C>` trait, `PhaseEvent`                     |
//! | [`error`]       | `SyncError`, `SyncResult<T>`                              |
//!
//! # Lifecycle of one point
//!
//! ```text
//! Armed ──(last arrival)──▶ Releasing ──(observers done, waiters woken)──▶ Armed
//!   │                           │
//!   └──────── stop_now() ───────┴──▶ Interrupted (until reset())
//! ```
//!
//! A point is built once per run and reused for every iteration; only its
//! arrival counter resets on each release.  `C` is the context handed to
//! observers, typically the model whose state they summarize.

pub mod error;
pub mod observer;
pub mod sync_point;


pub use error::{SyncError, SyncResult};
pub use observer::{PhaseEvent, SyncObserver};
pub use sync_point::SyncPoint;
