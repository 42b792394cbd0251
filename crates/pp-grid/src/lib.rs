//! `pp-grid` — shared spatial state for the rust_pp engine.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`put`]     | `PutAgent` strategies (`SyncOrdered`, `SyncAppend`), `insert_ordered` |
//! | [`cell`]    | `Cell<A>` — current and incoming agent lists, one lock each   |
//! | [`grid`]    | `Grid<A>` — row-major torus of cells, neighbours, census      |
//! | [`error`]   | `GridError`, `GridResult<T>`                                  |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | `Grid::census` scans cells on Rayon's thread pool.         |
//!
//! # Ownership discipline
//!
//! During a phase each cell index is held by exactly one worker (the token
//! owner).  The owner may lock and mutate its own cell freely.  Any other
//! worker may only *add* agents to a cell, through a [`PutAgent`] strategy,
//! and only into the list the current phase designates for arrivals.

pub mod cell;
pub mod error;
pub mod grid;
pub mod put;

#[cfg(test)]
mod tests;

pub use cell::Cell;
pub use error::{GridError, GridResult};
pub use grid::Grid;
pub use put::{insert_ordered, PutAgent, SyncAppend, SyncOrdered};
