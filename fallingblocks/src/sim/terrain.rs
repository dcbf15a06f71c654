//! Seeded terrain for the simulation.

use fallingblocks_core::host::WorldAccess;
use fallingblocks_core::memory::MemoryWorld;
use fallingblocks_core::{VoxelClass, VoxelState};
use fallingblocks_utils::random::{Random, Xoroshiro};
use fallingblocks_utils::{BlockPos, math::Vector3};

const PLANTS: [&str; 8] = [
    "poppy",
    "dandelion",
    "short_grass",
    "fern",
    "oxeye_daisy",
    "cornflower",
    "sweet_berry_bush",
    "oak_sapling",
];

/// Inclusive frame size of the nether portal.
const PORTAL_WIDTH: i32 = 4;
const PORTAL_HEIGHT: i32 = 5;

/// Shape of the generated patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainSettings {
    /// Columns span `-half_width..=half_width` on both axes.
    pub half_width: i32,
    /// Lowest surface height. Columns rise up to two blocks above it.
    pub base_height: i32,
    /// One stone voxel in this many is hollowed out.
    pub cave_rarity: i32,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            half_width: 24,
            base_height: 12,
            cave_rarity: 10,
        }
    }
}

/// Voxels handled by one [`Terrain::settle`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleReport {
    /// Falling voxels placed back into the world.
    pub landed: usize,
    /// Falling voxels that found no free spot.
    pub lost: usize,
}

/// A generated patch of world.
pub struct Terrain {
    world: MemoryWorld,
    half_width: i32,
    min_y: i32,
    max_y: i32,
    portal_origin: BlockPos,
}

impl Terrain {
    /// Generates a patch: bedrock floor, stone body with cave pockets, a grass
    /// surface decorated with plants and snow, and a lit nether portal.
    #[must_use]
    pub fn generate(seed: u64, settings: TerrainSettings) -> Self {
        let mut rng = Xoroshiro::from_seed(seed);
        let mut world = MemoryWorld::new();
        let half_width = settings.half_width.max(PORTAL_WIDTH);
        let stone = VoxelState::vanilla("stone");

        world.fill(
            BlockPos::new(-half_width, 0, -half_width),
            BlockPos::new(half_width, 0, half_width),
            &VoxelState::vanilla("bedrock"),
        );

        let mut max_surface = 0;
        for x in -half_width..=half_width {
            for z in -half_width..=half_width {
                let surface = settings.base_height.max(2) + rng.next_i32_between(0, 2);
                max_surface = max_surface.max(surface);
                for y in 1..surface {
                    let pocket = y > 1 && rng.next_i32_bounded(settings.cave_rarity.max(1)) == 0;
                    if !pocket {
                        world.set(BlockPos::new(x, y, z), stone.clone());
                    }
                }
                world.set(BlockPos::new(x, surface, z), VoxelState::vanilla("grass_block"));

                let above = BlockPos::new(x, surface + 1, z);
                match rng.next_i32_bounded(10) {
                    0 => {
                        let plant = PLANTS[rng.next_i32_bounded(PLANTS.len() as i32) as usize];
                        world.set(above, VoxelState::vanilla(plant));
                    }
                    1 => {
                        let layers = u8::try_from(rng.next_i32_between(1, 8)).unwrap_or(1);
                        world.set(above, VoxelState::snow(layers));
                    }
                    _ => {}
                }
            }
        }

        let mut terrain = Self {
            world,
            half_width,
            min_y: 0,
            max_y: max_surface + PORTAL_HEIGHT + 1,
            portal_origin: BlockPos::new(-2, 0, half_width / 2),
        };
        terrain.build_portal();
        terrain
    }

    /// Places the portal on solid footing at `portal_origin`'s column.
    fn build_portal(&mut self) {
        let origin = self.portal_origin;
        let base = (0..PORTAL_WIDTH)
            .filter_map(|dx| {
                self.world
                    .top_at(origin.x() + dx, origin.z(), self.min_y, self.max_y)
            })
            .map(|top| top.y())
            .max()
            .unwrap_or(self.min_y)
            + 1;
        self.portal_origin = BlockPos::new(origin.x(), base, origin.z());

        let obsidian = VoxelState::vanilla("obsidian");
        self.world.fill(
            BlockPos::new(origin.x(), 1, origin.z()),
            BlockPos::new(origin.x() + PORTAL_WIDTH - 1, base - 1, origin.z()),
            &VoxelState::vanilla("stone"),
        );
        self.world.fill(
            self.portal_origin,
            self.portal_origin
                .offset(PORTAL_WIDTH - 1, PORTAL_HEIGHT - 1, 0),
            &obsidian,
        );
        self.world.fill(
            self.portal_origin.offset(1, 1, 0),
            self.portal_origin
                .offset(PORTAL_WIDTH - 2, PORTAL_HEIGHT - 2, 0),
            &VoxelState::vanilla("nether_portal"),
        );
    }

    /// The voxels of this patch.
    #[must_use]
    pub fn world(&self) -> &MemoryWorld {
        &self.world
    }

    /// Mutable access to the voxels.
    pub fn world_mut(&mut self) -> &mut MemoryWorld {
        &mut self.world
    }

    /// Columns span `-half_width..=half_width` on both axes.
    #[must_use]
    pub const fn half_width(&self) -> i32 {
        self.half_width
    }

    /// Bottom left corner of the portal frame.
    #[must_use]
    pub const fn portal_origin(&self) -> BlockPos {
        self.portal_origin
    }

    /// Every position of the portal frame and its interior.
    pub fn portal_positions(&self) -> impl Iterator<Item = BlockPos> + '_ {
        (0..PORTAL_WIDTH).flat_map(move |dx| {
            (0..PORTAL_HEIGHT).map(move |dy| self.portal_origin.offset(dx, dy, 0))
        })
    }

    /// Where a player standing on the column at (`x`, `z`) has their feet.
    /// Coordinates outside the patch are clamped to its edge.
    #[must_use]
    pub fn standing_point(&self, x: i32, z: i32) -> Vector3<f64> {
        let x = x.clamp(-self.half_width, self.half_width);
        let z = z.clamp(-self.half_width, self.half_width);
        let feet = self
            .world
            .top_at(x, z, self.min_y, self.max_y)
            .map_or(self.min_y, |top| top.y() + 1);
        Vector3::new(f64::from(x) + 0.5, f64::from(feet), f64::from(z) + 0.5)
    }

    /// Drops every falling voxel spawned since the last call to the first
    /// supported position below it, in spawn order.
    pub fn settle(&mut self) -> SettleReport {
        let mut report = SettleReport::default();
        for falling in self.world.take_falling() {
            let mut pos = falling.pos;
            while pos.y() > self.min_y && self.is_passable(pos.below()) {
                pos = pos.below();
            }
            if self.is_passable(pos) {
                log::trace!("{} landed at {pos}", falling.state);
                self.world.set(pos, falling.state);
                report.landed += 1;
            } else {
                report.lost += 1;
            }
        }
        report
    }

    fn is_passable(&self, pos: BlockPos) -> bool {
        matches!(
            self.world.voxel_state_at(pos).class(),
            VoxelClass::Air | VoxelClass::Fluid
        )
    }
}
