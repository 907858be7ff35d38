//! Coevo - headless host/parasite coevolution runner
//!
//! Loads a TOML config (or defaults), runs the world for the requested
//! number of ticks, and writes a CSV time series plus an optional JSON
//! summary.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use coevo::core::config::SimulationConfig;
use coevo::core::error::Result;
use coevo::report::{CsvReport, RunSummary};
use coevo::world::World;

/// Host/parasite coevolution on a grid of tiny register machines
#[derive(Parser, Debug)]
#[command(name = "coevo")]
#[command(about = "Run a host/parasite coevolution experiment")]
struct Args {
    /// TOML configuration file; missing keys take their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the configured number of ticks
    #[arg(long)]
    updates: Option<u64>,

    /// Seed the grid with the hand-written NAND ancestor
    #[arg(long)]
    ancestor: bool,

    /// CSV output path
    #[arg(long, default_value = "coevo.csv")]
    output: PathBuf,

    /// Write a JSON run summary to this path
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("coevo=info")),
        )
        .init();

    if let Err(err) = run(Args::parse()) {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(updates) = args.updates {
        config.num_updates = updates;
    }
    if args.ancestor {
        config.seed_with_ancestor = true;
    }

    let mut world = World::seeded(config)?;
    let ticks = world.config.num_updates;
    let interval = world.config.output_interval.max(1);

    tracing::info!(
        seed = world.config.seed,
        ticks,
        slots = world.population.len(),
        "Starting coevolution run"
    );

    let start = Instant::now();
    let mut report = CsvReport::create(&args.output)?;
    report.write_row(&world.stats())?;

    for _ in 0..ticks {
        world.update();
        if world.tick % interval == 0 {
            report.write_row(&world.stats())?;
        }
    }
    let rows = report.rows();
    report.finish()?;

    let summary = RunSummary::new(&world, start.elapsed());
    println!("{}", summary.summary());
    println!("{} rows written to {}", rows, args.output.display());

    if let Some(path) = &args.summary {
        summary.write_json(path)?;
        println!("Summary written to {}", path.display());
    }

    Ok(())
}
