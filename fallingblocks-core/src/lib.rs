//! # Falling Blocks Core
//!
//! Every so often, at a random moment, the terrain around each connected player
//! starts to fall. A countdown bar warns players for the last few seconds, then
//! every unsupported voxel in a sphere around each of them is turned into a
//! falling entity.
//!
//! The host server is reached only through the traits in [`host`].
//! [`FallingBlocks`] owns all mutable state and is driven once per tick.

pub mod config;
pub mod countdown;
pub mod direction;
pub mod eligibility;
pub mod event_loop;
pub mod host;
pub mod memory;
pub mod scanner;
pub mod schedule;
pub mod voxel;

pub use config::{ConfigError, FallingBlocksConfig};
pub use countdown::{CountdownBarState, CountdownPresenter};
pub use event_loop::{EventPhase, FallingBlocks, TickOutcome, TimerState};
pub use scanner::{RegionScanner, ScanReport};
pub use voxel::{VoxelClass, VoxelState};
