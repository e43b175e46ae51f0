//! Headless terrarium runner.
//!
//! Drives a simulation without any rendering: advances the clock in
//! fixed steps, reports event traffic, and optionally writes periodic
//! world snapshots as JSON.

use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wriggle_core::{output, ConfigError, SimConfig, Simulation};

/// Command line arguments for the runner.
#[derive(Parser, Debug)]
#[command(name = "wriggle_sim")]
#[command(about = "Headless multi-snake terrarium simulation")]
struct Args {
    /// TOML configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Board width in cells
    #[arg(long)]
    cols: Option<i32>,

    /// Board height in cells
    #[arg(long)]
    rows: Option<i32>,

    /// Number of snakes
    #[arg(long)]
    snakes: Option<usize>,

    /// Number of clock steps to simulate
    #[arg(long, default_value_t = 2000)]
    steps: u64,

    /// Milliseconds advanced per step
    #[arg(long, default_value_t = 250)]
    step_ms: u64,

    /// Write a snapshot every N steps (0 disables)
    #[arg(long, default_value_t = 0)]
    snapshot_every: u64,

    /// Directory for snapshot output
    #[arg(long, default_value = "output/snapshots")]
    output_dir: PathBuf,
}

fn load_config(args: &Args) -> Result<SimConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(cols) = args.cols {
        config.cols = cols;
    }
    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(snakes) = args.snakes {
        config.snakes = snakes;
    }
    Ok(config)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("Wriggle Terrarium");
    println!("=================");
    println!("Seed: {}", config.seed);
    println!("Board: {}x{}", config.cols, config.rows);
    println!("Snakes: {}", config.snakes);
    println!("Steps: {} x {} ms", args.steps, args.step_ms);
    println!();

    let mut sim = Simulation::new(config);
    let mut event_totals: HashMap<String, usize> = HashMap::new();

    for step in 0..args.steps {
        sim.advance(args.step_ms);

        for event in sim.drain_events() {
            let key = format!("{:?}", event.kind);
            *event_totals.entry(key).or_insert(0) += 1;
        }

        if args.snapshot_every > 0 && step > 0 && step % args.snapshot_every == 0 {
            let snapshot = sim.snapshot();
            if let Err(e) = output::write_snapshot(&args.output_dir, &snapshot) {
                eprintln!("Warning: could not write snapshot at step {}: {}", step, e);
            }
        }

        if step > 0 && step % 400 == 0 {
            let world = sim.world();
            let living = world.living_count();
            let longest = world.snakes.iter().map(|s| s.len()).max().unwrap_or(0);
            println!(
                "[Step {:>5}] {:>7} ms - {} living, longest {}",
                step, world.now_ms, living, longest
            );
        }
    }

    let final_snapshot = sim.snapshot();
    if args.snapshot_every > 0 {
        if let Err(e) = output::write_snapshot(&args.output_dir, &final_snapshot) {
            eprintln!("Warning: could not write final snapshot: {}", e);
        }
    }

    println!();
    println!(
        "Simulation complete: status {}, clock {} ms.",
        final_snapshot.status, final_snapshot.at_ms
    );
    let mut kinds: Vec<_> = event_totals.iter().collect();
    kinds.sort();
    for (kind, count) in kinds {
        println!("  {:<16} {}", kind, count);
    }
}
