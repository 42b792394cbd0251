//! `predprey` — sheep, wolves and grass on a 100×100 torus, run on the
//! rust_pp phase-synchronized worker pool.
//!
//! Each iteration moves every animal (`move` phase), then lets it eat and
//! reproduce (`act` phase).  Populations are recorded after every iteration
//! and summarized at the end.
//!
//! Run with:
//!   cargo run -p predprey --release
//!   RUST_LOG=predprey=debug,pp_sim=debug cargo run -p predprey --release

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod model;
mod stats;


use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use anyhow::Result;
use parking_lot::Mutex;
use pp_sim::{EngineBuilder, RunReport};
use tracing::info;
use tracing_subscriber::EnvFilter;

use model::{engine_config, Params, PredPrey, Stats};
use stats::StatsCollector;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:         u64   = 42;
const ITERATIONS:   u64   = 1_000;
const BLOCK_SIZE:   usize = 250;  // cells claimed per cursor bump
const LOG_EVERY:    u64   = 100;
const PRINT_EVERY:  usize = 100;

/// Build the model, run it for `iterations` and return the population
/// history (start-up row first) with the run report.
pub fn simulate(
    params:     Params,
    workers:    usize,
    block_size: usize,
    iterations: u64,
    seed:       u64,
) -> Result<(Vec<Stats>, RunReport)> {
    let model = PredPrey::new(params, seed)?;
    let history = Arc::new(Mutex::new(vec![model.stats()]));

    let config = engine_config(&model, workers, block_size, iterations, seed);
    let mut engine = EngineBuilder::new(config, model)
        .observe("act", StatsCollector::new(Arc::clone(&history), LOG_EVERY))
        .build()?;
    let report = engine.run()?;

    let rows = std::mem::take(&mut *history.lock());
    Ok((rows, report))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,predprey=info")),
        )
        .init();

    let workers = thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(1);
    let params = Params::default();

    println!(
        "=== rust_pp  predprey — {}x{} torus, {} sheep, {} wolves, {} workers ===",
        params.width, params.height, params.sheep.initial, params.wolves.initial, workers
    );
    info!(seed = SEED, iterations = ITERATIONS, block_size = BLOCK_SIZE, "starting");

    let t_run = Instant::now();
    let (history, report) = simulate(params, workers, BLOCK_SIZE, ITERATIONS, SEED)?;
    let elapsed = t_run.elapsed().as_secs_f64();

    println!();
    println!("{:>9}  {:>8}  {:>8}  {:>8}", "iteration", "sheep", "wolves", "grass");
    for (i, row) in history.iter().enumerate() {
        if i % PRINT_EVERY == 0 || i + 1 == history.len() {
            println!("{:>9}  {:>8}  {:>8}  {:>8}", i, row.sheep, row.wolves, row.grass);
        }
    }

    let peak_sheep = history.iter().map(|s| s.sheep).max().unwrap_or(0);
    let peak_wolves = history.iter().map(|s| s.wolves).max().unwrap_or(0);
    println!();
    println!("Peak sheep: {peak_sheep}, peak wolves: {peak_wolves}");
    println!(
        "Simulation complete in {:.3}s ({} iterations on {} workers, {:.0} it/s)",
        elapsed,
        report.iterations,
        report.workers,
        report.iterations as f64 / report.elapsed.as_secs_f64().max(f64::EPSILON),
    );
    Ok(())
}
