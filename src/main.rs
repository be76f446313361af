//! tilecraft - a deterministic 2D tile sandbox
//!
//! Headless runner: generates a world, plays scripted or idle input, and
//! writes an event log and end-of-run report.

mod config;
mod headless;
mod scripted_input;

use anyhow::Result;
use clap::Parser;
use headless::HeadlessConfig;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a tilecraft session headlessly", long_about = None)]
struct Args {
    /// Session config (TOML); missing or invalid files fall back to defaults
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Number of ticks to simulate (defaults to the script length, or 600)
    #[arg(long)]
    ticks: Option<u64>,
    /// Override the world seed
    #[arg(long)]
    seed: Option<u64>,
    /// JSON input script to replay
    #[arg(long)]
    script: Option<PathBuf>,
    /// Write every tick event as JSON lines
    #[arg(long)]
    events: Option<PathBuf>,
    /// Write the final session summary as JSON
    #[arg(long)]
    report: Option<PathBuf>,
    /// Write the effective config to the given path and exit
    #[arg(long)]
    write_default_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting tilecraft v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let mut session = config::load_from_path(&args.config);
    if let Some(seed) = args.seed {
        session.world.seed = seed;
    }

    if let Some(path) = args.write_default_config {
        config::save_to_path(&session, &path)?;
        println!("wrote config to {}", path.display());
        return Ok(());
    }

    let summary = headless::run(HeadlessConfig {
        session,
        scripted_input: args.script,
        max_ticks: args.ticks,
        events: args.events,
        report: args.report,
    })?;

    println!(
        "ticks={} health={} position=({:.1}, {:.1}) solid_cells={} held={}",
        summary.ticks,
        summary.health,
        summary.position[0],
        summary.position[1],
        summary.solid_cells,
        summary.inventory.total()
    );
    Ok(())
}
