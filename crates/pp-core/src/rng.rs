//! Deterministic per-worker and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each worker gets its own independent `SmallRng` seeded by:
//!
//!   seed = master_seed XOR (worker_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive ids uniformly across the seed space.
//!
//! With dynamic work distribution the worker that processes a given item
//! changes from run to run, so a per-worker stream alone does not make a
//! model reproducible.  [`WorkerRng::reseed_for_item`] derives the stream
//! from `(master_seed, iteration, phase, item)` instead; the engine calls it
//! before every item under [`RngPolicy::PerItem`](crate::RngPolicy::PerItem).

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{PhaseId, WorkerId};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Finalizer from SplitMix64; turns structured inputs into well-spread seeds.
#[inline]
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

// ── WorkerRng ─────────────────────────────────────────────────────────────────

/// Per-worker deterministic RNG handed to the processing callback.
///
/// Owned by exactly one worker thread for the whole run and passed down as
/// `&mut WorkerRng`; it is never shared.
pub struct WorkerRng {
    rng:         SmallRng,
    master_seed: u64,
}

impl WorkerRng {
    /// Seed deterministically from the run's master seed and a worker ID.
    pub fn new(master_seed: u64, worker: WorkerId) -> Self {
        let seed = master_seed ^ (worker.0 as u64).wrapping_mul(MIXING_CONSTANT);
        Self { rng: SmallRng::seed_from_u64(seed), master_seed }
    }

    /// Restart the stream from a seed derived from the item coordinates.
    ///
    /// Two workers reseeding for the same `(iteration, phase, item)` draw the
    /// same values, whichever of them ends up holding the token.
    pub fn reseed_for_item(&mut self, iteration: u64, phase: PhaseId, item: usize) {
        let mut h = mix64(self.master_seed ^ iteration.wrapping_mul(MIXING_CONSTANT));
        h = mix64(h ^ (phase.0 as u64).wrapping_add(1).wrapping_mul(MIXING_CONSTANT));
        h = mix64(h ^ (item as u64));
        self.rng = SmallRng::seed_from_u64(h);
    }

    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.rng.gen_range(range)
    }

    /// Probabilities outside `[0, 1]` saturate instead of panicking.
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Single-threaded generator for model set-up (initial placement and the
/// like).  Work items draw from their [`WorkerRng`] instead.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
