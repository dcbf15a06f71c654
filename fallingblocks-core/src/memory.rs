//! RAM-only host world.
//!
//! A sparse voxel map that implements the world capabilities without any
//! server behind it. Useful for:
//! - Unit tests and benchmarks
//! - The standalone simulation host

use std::mem;

use fallingblocks_utils::{BlockPos, math::Vector3};
use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::host::{Clock, Observer, WorldAccess, WorldMutation};
use crate::voxel::{MAX_SNOW_LAYERS, VoxelClass, VoxelState};

/// A falling entity spawned by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallingVoxel {
    /// Where the entity was spawned.
    pub pos: BlockPos,
    /// The block it carries.
    pub state: VoxelState,
}

/// In-memory voxel storage.
///
/// Positions never written read back as air.
#[derive(Debug, Default)]
pub struct MemoryWorld {
    voxels: FxHashMap<BlockPos, VoxelState>,
    falling: Vec<FallingVoxel>,
    cleared: usize,
}

impl MemoryWorld {
    /// Creates an empty (all air) world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `state` at `pos`. Placing air removes the entry.
    pub fn set(&mut self, pos: BlockPos, state: VoxelState) {
        if state.is_air() {
            self.voxels.remove(&pos);
        } else {
            self.voxels.insert(pos, state);
        }
    }

    /// Fills the inclusive box between `from` and `to` with `state`.
    pub fn fill(&mut self, from: BlockPos, to: BlockPos, state: &VoxelState) {
        for x in from.x().min(to.x())..=from.x().max(to.x()) {
            for y in from.y().min(to.y())..=from.y().max(to.y()) {
                for z in from.z().min(to.z())..=from.z().max(to.z()) {
                    self.set(BlockPos::new(x, y, z), state.clone());
                }
            }
        }
    }

    /// Number of non-air voxels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// Whether every position reads as air.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Falling entities spawned so far, oldest first.
    #[must_use]
    pub fn falling(&self) -> &[FallingVoxel] {
        &self.falling
    }

    /// Removes and returns the falling entities spawned so far.
    pub fn take_falling(&mut self) -> Vec<FallingVoxel> {
        mem::take(&mut self.falling)
    }

    /// How many times `clear_voxel` was called.
    #[must_use]
    pub fn cleared(&self) -> usize {
        self.cleared
    }

    /// The highest non-air voxel in the column at (`x`, `z`), scanning down from `max_y`.
    #[must_use]
    pub fn top_at(&self, x: i32, z: i32, min_y: i32, max_y: i32) -> Option<BlockPos> {
        (min_y..=max_y)
            .rev()
            .map(|y| BlockPos::new(x, y, z))
            .find(|pos| self.voxels.contains_key(pos))
    }
}

impl WorldAccess for MemoryWorld {
    fn voxel_state_at(&self, pos: BlockPos) -> VoxelState {
        self.voxels.get(&pos).cloned().unwrap_or_else(VoxelState::air)
    }

    fn is_full_opaque_cube(&self, _pos: BlockPos, state: &VoxelState) -> bool {
        match state.class() {
            VoxelClass::Solid | VoxelClass::Obsidian | VoxelClass::Bedrock => true,
            VoxelClass::SnowLayer { layers } => layers == MAX_SNOW_LAYERS,
            _ => false,
        }
    }
}

impl WorldMutation for MemoryWorld {
    fn clear_voxel(&mut self, pos: BlockPos) {
        self.voxels.remove(&pos);
        self.cleared += 1;
    }

    fn spawn_falling(&mut self, pos: BlockPos, state: VoxelState) {
        self.falling.push(FallingVoxel { pos, state });
    }
}

/// A clock advanced by hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    /// The current tick.
    pub tick: u64,
}

impl ManualClock {
    /// A clock stopped at `tick`.
    #[must_use]
    pub const fn at(tick: u64) -> Self {
        Self { tick }
    }

    /// Moves the clock forward by `ticks`.
    pub fn advance(&mut self, ticks: u64) {
        self.tick += ticks;
    }
}

impl Clock for ManualClock {
    fn current_tick(&self) -> u64 {
        self.tick
    }
}

/// An observer that does not move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedObserver {
    /// Identity reported to the core.
    pub id: Uuid,
    /// Where the observer stands.
    pub position: Vector3<f64>,
}

impl FixedObserver {
    /// A fixed observer with a fresh random id.
    #[must_use]
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position: Vector3::new(x, y, z),
        }
    }
}

impl Observer for FixedObserver {
    fn id(&self) -> Uuid {
        self.id
    }

    fn position(&self) -> Vector3<f64> {
        self.position
    }
}
