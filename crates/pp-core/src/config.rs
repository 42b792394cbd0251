//! Engine configuration.
//!
//! Read once when the engine is built and never consulted again at run
//! time.  Applications typically fill it from their own parameter file;
//! parsing is not this crate's concern.

use crate::{PhaseId, PpError, PpResult};

/// Default number of work tokens handed out per atomic cursor bump.
pub const DEFAULT_BLOCK_SIZE: usize = 100;

// ── Policies ──────────────────────────────────────────────────────────────────

/// How work items are distributed among workers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WorkPolicy {
    /// Blocks of `block_size` tokens are claimed from a shared atomic cursor
    /// on demand.  Balances uneven per-item cost.
    #[default]
    OnDemand,
    /// `[0, work_size)` is split once into `num_workers` contiguous ranges.
    /// No shared counter at all; the worker → item mapping is fixed.
    Equal,
}

/// Where the processing callback's randomness comes from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RngPolicy {
    /// One stream per worker for the whole run.
    #[default]
    PerWorker,
    /// Stream reseeded from `(seed, iteration, phase, item)` before every
    /// item, so results do not depend on which worker got which token.
    PerItem,
}

// ── PhaseSpec ─────────────────────────────────────────────────────────────────

/// One stage of an iteration, gated by its own synchronization point.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseSpec {
    /// Unique name; observers are registered against it.
    pub name: String,

    /// Expected participants at this phase's barrier.  `None` means every
    /// worker.  Any explicit value must equal `num_workers`, since every
    /// worker passes through every phase.
    pub participants: Option<usize>,
}

impl PhaseSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), participants: None }
    }

    /// Pin the expected participant count (validated against `num_workers`).
    pub fn with_participants(mut self, n: usize) -> Self {
        self.participants = Some(n);
        self
    }
}

// ── EngineConfig ──────────────────────────────────────────────────────────────

/// Top-level engine configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Worker threads spawned per run.  Reused across all iterations.
    pub num_workers: usize,

    /// Tokens claimed per cursor bump under [`WorkPolicy::OnDemand`].
    /// Smaller blocks balance uneven work better at the cost of more atomic
    /// traffic.
    pub block_size: usize,

    /// Number of work items per phase (e.g. grid cells).
    pub work_size: usize,

    /// Iterations per run.
    pub iterations: u64,

    /// Master RNG seed.  The same seed always produces the same streams.
    pub seed: u64,

    pub work_policy: WorkPolicy,

    pub rng_policy: RngPolicy,

    /// Ordered phases of one iteration.  The last one doubles as the
    /// end-of-iteration barrier.
    pub phases: Vec<PhaseSpec>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            num_workers: 1,
            block_size:  DEFAULT_BLOCK_SIZE,
            work_size:   0,
            iterations:  0,
            seed:        0,
            work_policy: WorkPolicy::default(),
            rng_policy:  RngPolicy::default(),
            phases:      Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Reject configurations the engine cannot run.
    ///
    /// Sizes are unsigned, so the only numeric errors left are zeros.
    pub fn validate(&self) -> PpResult<()> {
        if self.num_workers == 0 {
            return Err(PpError::Config("num_workers must be at least 1".into()));
        }
        if u32::try_from(self.num_workers).is_err() {
            return Err(PpError::Config(format!("num_workers {} is too large", self.num_workers)));
        }
        if self.block_size == 0 {
            return Err(PpError::Config("block_size must be at least 1".into()));
        }
        if self.phases.is_empty() {
            return Err(PpError::Config("at least one phase is required".into()));
        }
        if u16::try_from(self.phases.len()).is_err() {
            return Err(PpError::Config(format!("too many phases ({})", self.phases.len())));
        }

        for (i, phase) in self.phases.iter().enumerate() {
            if self.phases[..i].iter().any(|p| p.name == phase.name) {
                return Err(PpError::DuplicatePhase(phase.name.clone()));
            }
            if let Some(got) = phase.participants {
                if got != self.num_workers {
                    return Err(PpError::ParticipantMismatch {
                        phase:    phase.name.clone(),
                        expected: self.num_workers,
                        got,
                    });
                }
            }
        }
        Ok(())
    }

    /// Look up a phase by name.
    pub fn phase_id(&self, name: &str) -> PpResult<PhaseId> {
        self.phases
            .iter()
            .position(|p| p.name == name)
            .map(|i| PhaseId(i as u16))
            .ok_or_else(|| PpError::UnknownPhase(name.to_owned()))
    }

    /// Participants expected at every barrier (all workers).
    #[inline]
    pub fn participants(&self) -> usize {
        self.num_workers
    }
}
