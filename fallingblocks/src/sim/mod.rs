//! The simulated server the falling blocks timer runs against.
//!
//! A [`SimHost`] owns everything a real server would lend the core: the clock,
//! a generated world, the player roster and the boss bar. Each [`SimHost::tick`]
//! moves the players, lets one of them leave or rejoin now and then, runs the
//! core and finally lets spawned falling voxels land.

pub mod boss_bar;
pub mod player;
pub mod terrain;

use std::sync::Arc;

use fallingblocks_core::host::Observer;
use fallingblocks_core::memory::ManualClock;
use fallingblocks_core::{FallingBlocks, FallingBlocksConfig, TickOutcome};
use fallingblocks_utils::random::{Random, Xoroshiro};

pub use boss_bar::LoggedBossBar;
pub use player::SimPlayer;
pub use terrain::{SettleReport, Terrain, TerrainSettings};

/// Players take a step every this many ticks.
const WANDER_PERIOD: u64 = 10;
/// The last player leaves or rejoins every this many ticks.
const CHURN_PERIOD: u64 = 400;

/// How the simulation is set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimSettings {
    /// Seed for the terrain and player movement.
    pub seed: u64,
    /// Number of simulated players.
    pub players: usize,
    /// Shape of the generated patch.
    pub terrain: TerrainSettings,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            players: 2,
            terrain: TerrainSettings::default(),
        }
    }
}

/// Running totals for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimStats {
    /// Ticks run so far.
    pub ticks: u64,
    /// Falling events that ran.
    pub events: u64,
    /// Voxels turned into falling entities.
    pub converted: usize,
    /// Falling voxels placed back into the world.
    pub landed: usize,
    /// Falling voxels that found no free spot.
    pub lost: usize,
}

/// A single-world server with simulated players.
pub struct SimHost {
    clock: ManualClock,
    terrain: Terrain,
    players: Vec<Arc<SimPlayer>>,
    connected: Vec<Arc<SimPlayer>>,
    falling_blocks: FallingBlocks<LoggedBossBar>,
    rng: Xoroshiro,
    stats: SimStats,
}

impl SimHost {
    /// Generates the world and connects every player.
    #[must_use]
    pub fn new(config: &FallingBlocksConfig, settings: SimSettings) -> Self {
        Self::with_driver(
            FallingBlocks::with_bar(config, LoggedBossBar::new()),
            settings,
        )
    }

    /// Like [`SimHost::new`], with a driver built by the caller.
    #[must_use]
    pub fn with_driver(falling_blocks: FallingBlocks<LoggedBossBar>, settings: SimSettings) -> Self {
        let terrain = Terrain::generate(settings.seed, settings.terrain);
        let mut rng = Xoroshiro::from_seed(settings.seed).fork();
        let half_width = terrain.half_width();

        let players: Vec<_> = (1..=settings.players)
            .map(|n| {
                let x = rng.next_i32_between(-half_width, half_width);
                let z = rng.next_i32_between(-half_width, half_width);
                Arc::new(SimPlayer::new(
                    format!("Player{n}"),
                    terrain.standing_point(x, z),
                ))
            })
            .collect();

        Self {
            clock: ManualClock::default(),
            terrain,
            connected: players.clone(),
            players,
            falling_blocks,
            rng,
            stats: SimStats::default(),
        }
    }

    /// Called once when the server starts.
    pub fn start_session(&mut self) {
        log::info!(
            "Session started with {} player(s) on a {}x{} patch",
            self.connected.len(),
            self.terrain.half_width() * 2 + 1,
            self.terrain.half_width() * 2 + 1,
        );
        self.falling_blocks.on_session_start();
    }

    /// Called once when the server stops.
    pub fn stop_session(&mut self) {
        self.falling_blocks.on_session_stop();
        log::info!("Session stopped after {} tick(s)", self.stats.ticks);
    }

    /// Advances the world by one tick.
    pub fn tick(&mut self) -> TickOutcome {
        self.clock.advance(1);
        let now = self.clock.tick;

        if now % WANDER_PERIOD == 0 {
            self.wander();
        }
        if now % CHURN_PERIOD == 0 {
            self.churn();
        }

        let outcome = self
            .falling_blocks
            .tick(&self.clock, &self.connected, self.terrain.world_mut());

        if let TickOutcome::Triggered(report) = outcome {
            let settled = self.terrain.settle();
            self.stats.events += 1;
            self.stats.converted += report.converted;
            self.stats.landed += settled.landed;
            self.stats.lost += settled.lost;
            log::debug!("{} voxel(s) landed, {} lost", settled.landed, settled.lost);
        }

        self.stats.ticks += 1;
        outcome
    }

    fn wander(&mut self) {
        for player in &self.connected {
            let dx = self.rng.next_i32_between(-1, 1);
            let dz = self.rng.next_i32_between(-1, 1);
            player.step(dx, dz, &self.terrain);
        }
    }

    /// Toggles the last player between connected and disconnected.
    fn churn(&mut self) {
        let Some(player) = self.players.last().cloned() else {
            return;
        };

        let id = player.id();
        if let Some(index) = self.connected.iter().position(|p| p.id() == id) {
            self.connected.remove(index);
            self.falling_blocks.on_observer_leave(id);
            log::info!("{} left the game", player.name());
        } else {
            self.connected.push(player.clone());
            self.falling_blocks.on_observer_join(&self.clock, id);
            log::info!("{} joined the game", player.name());
        }
    }

    /// The current tick.
    #[must_use]
    pub fn current_tick(&self) -> u64 {
        self.clock.tick
    }

    /// The generated world.
    #[must_use]
    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    /// Every player, connected or not.
    #[must_use]
    pub fn players(&self) -> &[Arc<SimPlayer>] {
        &self.players
    }

    /// Connected players in join order.
    #[must_use]
    pub fn connected(&self) -> &[Arc<SimPlayer>] {
        &self.connected
    }

    /// The falling blocks driver.
    #[must_use]
    pub fn falling_blocks(&self) -> &FallingBlocks<LoggedBossBar> {
        &self.falling_blocks
    }

    /// Totals for the session so far.
    #[must_use]
    pub fn stats(&self) -> SimStats {
        self.stats
    }
}
