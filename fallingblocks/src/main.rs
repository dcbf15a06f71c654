//! Runs the falling blocks timer against a simulated world.
use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use clap::Parser;
use fallingblocks::{
    FallingBlocksServer, logger,
    sim::{SimHost, SimSettings, TerrainSettings},
};
use fallingblocks_core::FallingBlocksConfig;
use tokio::signal;

#[derive(Parser, Debug)]
#[command(name = "fallingblocks", about = "Runs the falling blocks timer against a simulated world")]
struct Args {
    /// JSON5 config file, created with defaults if missing
    #[arg(short, long, default_value = "config/fallingblocks_config.json5")]
    config: PathBuf,

    /// Number of simulated players
    #[arg(short, long, default_value_t = 2)]
    players: usize,

    /// Terrain seed (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Stop after this many ticks instead of waiting for Ctrl-C
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Run ticks back to back instead of at the configured tick rate
    #[arg(long)]
    fast: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init()?;

    let config = FallingBlocksConfig::load_or_create(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Using seed {seed}");

    let host = SimHost::new(
        &config,
        SimSettings {
            seed,
            players: args.players,
            terrain: TerrainSettings::default(),
        },
    );
    let tick_period = (!args.fast).then(|| Duration::from_secs(1) / config.tick_rate);
    let server = FallingBlocksServer::new(host, tick_period, args.ticks);
    let handle = server.start();

    let cancel_token = server.cancel_token.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            log::info!("Stopping falling blocks server");
            cancel_token.cancel();
        }
    });

    let ticks = handle.await.context("tick loop panicked")?;

    let stats = server.host.lock().stats();
    log::info!(
        "Ran {ticks} tick(s): {} event(s), {} voxel(s) dropped, {} landed, {} lost",
        stats.events,
        stats.converted,
        stats.landed,
        stats.lost
    );

    Ok(())
}
