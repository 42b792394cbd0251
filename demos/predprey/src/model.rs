//! The predator–prey model: sheep, wolves and grass on a torus.
//!
//! One iteration has two phases, each covering every cell once:
//!
//! | Phase  | Per cell                                                        |
//! |--------|-----------------------------------------------------------------|
//! | `move` | grass regrows one step; every animal loses one unit of energy,  |
//! |        | dies at zero, otherwise steps into a neighbour (or stays).      |
//! | `act`  | arrivals are committed; animals eat, then may reproduce; the    |
//! |        | dead (starved or eaten) are removed.                            |
//!
//! Animals always land in a cell's arrival list and are ordered by
//! [`AgentKey`], so the outcome does not depend on which worker processed
//! which cell.

use std::cmp::Ordering as CmpOrdering;
use std::convert::Infallible;
use std::sync::atomic::{AtomicU32, Ordering};

use pp_core::{EngineConfig, PhaseId, PhaseSpec, RngPolicy, SimRng, WorkerRng};
use pp_sim::{insert_ordered, Grid, GridError, ItemContext, SyncOrdered, WorkModel};

/// Phase names, in execution order.
pub const PHASES: [&str; 2] = ["move", "act"];

const MOVE: PhaseId = PhaseId(0);

// ── Parameters ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct SpeciesParams {
    /// Animals placed at start-up.
    pub initial:               usize,
    /// Energy gained per meal.  Initial energy is drawn from
    /// `1..=2 * gain_from_food`.
    pub gain_from_food:        u32,
    /// Reproduction needs strictly more energy than this.
    pub reproduce_threshold:   u32,
    /// Chance of reproducing per iteration, in percent.
    pub reproduce_probability: u32,
}

#[derive(Clone, Debug)]
pub struct Params {
    pub width:         usize,
    pub height:        usize,
    /// Iterations an eaten grass patch needs to grow back.
    pub grass_restart: u32,
    pub sheep:         SpeciesParams,
    pub wolves:        SpeciesParams,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            width:         100,
            height:        100,
            grass_restart: 10,
            sheep:         SpeciesParams {
                initial:               400,
                gain_from_food:        4,
                reproduce_threshold:   2,
                reproduce_probability: 4,
            },
            wolves:        SpeciesParams {
                initial:               200,
                gain_from_food:        20,
                reproduce_threshold:   2,
                reproduce_probability: 5,
            },
        }
    }
}

// ── Animals ───────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Species {
    Sheep,
    Wolf,
}

impl Species {
    pub fn params(self, params: &Params) -> &SpeciesParams {
        match self {
            Species::Sheep => &params.sheep,
            Species::Wolf => &params.wolves,
        }
    }

    pub fn gain_from_food(self, params: &Params) -> u32 {
        self.params(params).gain_from_food
    }

    pub fn reproduce_threshold(self, params: &Params) -> u32 {
        self.params(params).reproduce_threshold
    }

    pub fn reproduce_probability(self, params: &Params) -> u32 {
        self.params(params).reproduce_probability
    }
}

/// Identity of an animal, unique for the whole run.
///
/// Start-up animals have `born == 0` and a global serial; a newborn gets the
/// iteration it was born in (1-based), its parent's cell and its position
/// among that cell's newborns.  None of these depend on the worker that
/// created it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgentKey {
    pub born:   u64,
    pub cell:   usize,
    pub serial: u32,
}

#[derive(Clone, Debug)]
pub struct Animal {
    pub key:     AgentKey,
    pub species: Species,
    /// Zero means dead.
    pub energy:  u32,
}

impl Animal {
    pub fn is_alive(&self) -> bool {
        self.energy > 0
    }
}

// Animals are ordered and compared by identity only.
impl PartialEq for Animal {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Animal {}

impl PartialOrd for Animal {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for Animal {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        self.key.cmp(&other.key)
    }
}

// ── Statistics ────────────────────────────────────────────────────────────────

/// Population counts at the end of an iteration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub sheep:  usize,
    pub wolves: usize,
    /// Cells with grass ready to eat.
    pub grass:  usize,
}

// ── Model ─────────────────────────────────────────────────────────────────────

pub struct PredPrey {
    params: Params,
    grid:   Grid<Animal>,
    /// Regrowth countdown per cell; 0 means grass is available.  Only the
    /// worker holding a cell's token touches its entry.
    grass:  Vec<AtomicU32>,
}

impl PredPrey {
    /// Place the initial grass and animals with a generator seeded from
    /// `seed`.
    pub fn new(params: Params, seed: u64) -> Result<Self, GridError> {
        let grid = Grid::new(params.width, params.height)?;
        let mut rng = SimRng::new(seed);

        let grass = (0..grid.len())
            .map(|_| {
                let countdown = if params.grass_restart == 0 || rng.gen_bool(0.5) {
                    0
                } else {
                    rng.gen_range(1..=params.grass_restart)
                };
                AtomicU32::new(countdown)
            })
            .collect();

        let mut serial = 0;
        for species in [Species::Sheep, Species::Wolf] {
            let sp = species.params(&params);
            for _ in 0..sp.initial {
                let cell = rng.gen_range(0..grid.len());
                let energy = rng.gen_range(1..=2 * sp.gain_from_food.max(1));
                let key = AgentKey { born: 0, cell, serial };
                grid.cell(cell).put(&SyncOrdered, Animal { key, species, energy });
                serial += 1;
            }
        }

        Ok(Self { params, grid, grass })
    }

    /// Work items per phase: one per cell.
    pub fn work_size(&self) -> usize {
        self.grid.len()
    }

    /// Current population counts.  Only consistent while no phase is running.
    pub fn stats(&self) -> Stats {
        Stats {
            sheep:  self.grid.census(|a| a.species == Species::Sheep),
            wolves: self.grid.census(|a| a.species == Species::Wolf),
            grass:  self.grass.iter().filter(|g| g.load(Ordering::Relaxed) == 0).count(),
        }
    }

    fn move_cell(&self, cell: usize, rng: &mut WorkerRng) {
        let countdown = &self.grass[cell];
        let left = countdown.load(Ordering::Relaxed);
        if left > 0 {
            countdown.store(left - 1, Ordering::Relaxed);
        }

        let neighbours = self.grid.neighbours(cell);
        for mut animal in self.grid.cell(cell).take_agents() {
            animal.energy = animal.energy.saturating_sub(1);
            if !animal.is_alive() {
                continue;
            }
            // One extra choice past the neighbours means staying put.
            let choice = rng.gen_range(0..=neighbours.len());
            let dest = neighbours.get(choice).copied().unwrap_or(cell);
            self.grid.cell(dest).put_future(&SyncOrdered, animal);
        }
    }

    fn act_cell(&self, iteration: u64, cell: usize, rng: &mut WorkerRng) {
        let target = self.grid.cell(cell);
        target.commit_future();

        let params = &self.params;
        let mut agents = target.lock();
        let mut newborns = Vec::new();

        for i in 0..agents.len() {
            if !agents[i].is_alive() {
                // Eaten earlier in this phase.
                continue;
            }
            let species = agents[i].species;

            match species {
                Species::Sheep => {
                    let grass = &self.grass[cell];
                    if grass.load(Ordering::Relaxed) == 0 {
                        grass.store(params.grass_restart, Ordering::Relaxed);
                        agents[i].energy += species.gain_from_food(params);
                    }
                }
                Species::Wolf => {
                    // One live sheep per meal.
                    let prey = agents
                        .iter_mut()
                        .find(|a| a.species == Species::Sheep && a.is_alive());
                    if let Some(prey) = prey {
                        prey.energy = 0;
                        agents[i].energy += species.gain_from_food(params);
                    }
                }
            }

            let parent = &mut agents[i];
            if parent.energy > species.reproduce_threshold(params)
                && rng.gen_range(0..100) < species.reproduce_probability(params)
            {
                let energy = parent.energy / 2;
                if energy > 0 {
                    parent.energy -= energy;
                    let key = AgentKey { born: iteration + 1, cell, serial: newborns.len() as u32 };
                    newborns.push(Animal { key, species, energy });
                }
            }
        }

        agents.retain(Animal::is_alive);
        for child in newborns {
            insert_ordered(&mut *agents, child);
        }
    }
}

impl WorkModel for PredPrey {
    type Error = Infallible;

    fn process(&self, ctx: &ItemContext, cell: usize, rng: &mut WorkerRng) -> Result<(), Infallible> {
        if ctx.phase == MOVE {
            self.move_cell(cell, rng);
        } else {
            self.act_cell(ctx.iteration, cell, rng);
        }
        Ok(())
    }
}

/// Engine configuration for running `model` with the given workers.
///
/// Uses per-item random streams so the populations depend on the seed only.
pub fn engine_config(model: &PredPrey, workers: usize, block_size: usize, iterations: u64, seed: u64) -> EngineConfig {
    EngineConfig {
        num_workers: workers,
        block_size,
        work_size: model.work_size(),
        iterations,
        seed,
        rng_policy: RngPolicy::PerItem,
        phases: PHASES.iter().map(|name| PhaseSpec::new(*name)).collect(),
        ..EngineConfig::default()
    }
}
