#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Zombie Survival session.
//!
//! The session plays itself: a stationary marksman defends the centre of a
//! procedurally scattered arena while waves of zombies path toward it. A run
//! summary is printed once the frame budget is spent or the player dies.

mod config;
mod scenario;
mod session;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    scenario::{rolling_hills, scatter_obstacles},
    session::{RunSummary, Session},
};

/// Headless Zombie Survival simulation.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file overriding the default tuning.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of frames to simulate.
    #[arg(short, long, default_value_t = 3_600)]
    frames: u64,
    /// Simulated frames per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Seed for the arena layout and spawn positions.
    #[arg(short, long)]
    seed: Option<u64>,
    /// Number of obstacles scattered over the arena.
    #[arg(long, default_value_t = 24)]
    obstacles: usize,
    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
    /// Print the run summary as JSON.
    #[arg(long)]
    json: bool,
}

/// Entry point for the Zombie Survival command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let mut config = config::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.waves.spawn_seed = seed;
    }
    let fps = args.fps.max(1);
    let dt = Duration::from_secs(1) / fps;

    let obstacles = scatter_obstacles(
        config.waves.spawn_seed,
        args.obstacles,
        config.navigation.world_size,
        &rolling_hills,
    );
    let mut session = Session::new(config, Box::new(rolling_hills), obstacles)
        .context("failed to build the world")?;
    session.start();

    for _ in 0..args.frames {
        if session.is_over() {
            break;
        }
        session.frame(dt);
    }

    let summary = session.summary();
    info!(
        frames = summary.frames,
        kills = summary.zombies_killed,
        game_over = summary.game_over,
        "session finished"
    );
    if args.json {
        let json = serde_json::to_string_pretty(summary).context("failed to encode summary")?;
        println!("{json}");
    } else {
        print_summary(summary);
    }
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn print_summary(summary: &RunSummary) {
    println!("frames simulated: {}", summary.frames);
    println!("simulated time:   {:.1}s", summary.simulated_ms as f64 / 1_000.0);
    println!(
        "waves:            {} started, {} completed, reached wave {}",
        summary.waves_started, summary.waves_completed, summary.highest_wave
    );
    println!(
        "zombies:          {} spawned, {} killed",
        summary.zombies_spawned, summary.zombies_killed
    );
    println!(
        "shots:            {} fired, {} hit",
        summary.shots_fired, summary.hits
    );
    println!("player health:    {:.0}", summary.player_health);
    if summary.game_over {
        println!("GAME OVER");
    }
}
