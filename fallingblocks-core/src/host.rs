//! Capabilities the core borrows from the hosting server.
//!
//! The core never owns the world, the players or the boss bar widget. It reads
//! and mutates them only through these traits, so any server (or a test double)
//! can drive it.

use std::sync::Arc;

use fallingblocks_utils::{BlockPos, math::Vector3};
use uuid::Uuid;

use crate::voxel::VoxelState;

/// Source of the current game tick.
pub trait Clock {
    /// The current tick. Monotonic within one session.
    fn current_tick(&self) -> u64;
}

/// A connected participant.
pub trait Observer {
    /// Stable identity, also used as the countdown subscription key.
    fn id(&self) -> Uuid;

    /// Current position in world space.
    fn position(&self) -> Vector3<f64>;
}

impl<T: Observer + ?Sized> Observer for Arc<T> {
    fn id(&self) -> Uuid {
        (**self).id()
    }

    fn position(&self) -> Vector3<f64> {
        (**self).position()
    }
}

impl<T: Observer + ?Sized> Observer for &T {
    fn id(&self) -> Uuid {
        (**self).id()
    }

    fn position(&self) -> Vector3<f64> {
        (**self).position()
    }
}

/// The list of connected observers.
pub trait Roster {
    /// Handle type handed out for each observer.
    type Observer: Observer;

    /// Every connected observer, in the host's roster order.
    fn connected_observers(&self) -> Vec<Self::Observer>;

    /// Number of connected observers.
    fn observer_count(&self) -> usize;
}

impl<O: Observer + Clone> Roster for Vec<O> {
    type Observer = O;

    fn connected_observers(&self) -> Vec<O> {
        self.clone()
    }

    fn observer_count(&self) -> usize {
        self.len()
    }
}

/// Read access to voxel data.
pub trait WorldAccess {
    /// The state of the voxel at `pos`.
    fn voxel_state_at(&self, pos: BlockPos) -> VoxelState;

    /// Whether `state`, placed at `pos`, is a full opaque unit cube.
    fn is_full_opaque_cube(&self, pos: BlockPos, state: &VoxelState) -> bool;
}

/// Write access to voxel data.
pub trait WorldMutation: WorldAccess {
    /// Replaces the voxel at `pos` with air without drops or neighbor side effects.
    fn clear_voxel(&mut self, pos: BlockPos);

    /// Spawns a falling entity at `pos` carrying `state`.
    fn spawn_falling(&mut self, pos: BlockPos, state: VoxelState);
}

/// A server-wide progress bar shown to subscribed observers.
pub trait CountdownBar {
    /// Shows or hides the bar.
    fn set_visible(&mut self, visible: bool);

    /// Sets the fill fraction in `[0, 1]`.
    fn set_progress(&mut self, fraction: f32);

    /// Replaces the text shown on the bar.
    fn set_label(&mut self, label: &str);

    /// Shows the bar to `observer`.
    fn subscribe(&mut self, observer: Uuid);

    /// Stops showing the bar to `observer`.
    fn unsubscribe(&mut self, observer: Uuid);

    /// Whether `observer` currently sees the bar.
    fn is_subscribed(&self, observer: Uuid) -> bool;

    /// Removes every subscriber.
    fn unsubscribe_all(&mut self);
}
