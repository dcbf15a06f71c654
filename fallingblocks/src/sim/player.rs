//! Simulated players.

use fallingblocks_core::host::Observer;
use fallingblocks_utils::{BlockPos, math::Vector3};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::sim::terrain::Terrain;

/// A player that walks around on the terrain surface.
///
/// The position sits behind a lock so the player can be shared as an
/// `Arc<SimPlayer>` between the roster and whatever moves it.
pub struct SimPlayer {
    id: Uuid,
    name: String,
    position: Mutex<Vector3<f64>>,
}

impl SimPlayer {
    /// Creates a player with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>, position: Vector3<f64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            position: Mutex::new(position),
        }
    }

    /// The display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Moves the player by (`dx`, `dz`) columns and stands them on the surface there.
    pub fn step(&self, dx: i32, dz: i32, terrain: &Terrain) {
        let mut position = self.position.lock();
        let column = BlockPos::containing(*position);
        *position = terrain.standing_point(column.x() + dx, column.z() + dz);
    }
}

impl Observer for SimPlayer {
    fn id(&self) -> Uuid {
        self.id
    }

    fn position(&self) -> Vector3<f64> {
        *self.position.lock()
    }
}
