//! Decides whether a voxel may be converted into a falling entity.

use fallingblocks_utils::BlockPos;

use crate::direction::Direction;
use crate::host::WorldAccess;
use crate::voxel::{MAX_SNOW_LAYERS, VoxelClass, VoxelState};

/// Returns true if the voxel `state` at `pos` may fall.
///
/// Checks run in a fixed order and the first disqualifying one wins:
/// 1. air never falls
/// 2. fluids never fall
/// 3. bedrock, portals, portal frames, gateways and plants never fall
/// 4. obsidian touching a nether portal on any face stays put
/// 5. snow thinner than a full block stays put
/// 6. anything else falls only when the voxel below is not a full opaque cube
///
/// Only steps 4 and 6 read the world.
pub fn can_fall<W: WorldAccess + ?Sized>(state: &VoxelState, pos: BlockPos, world: &W) -> bool {
    match state.class() {
        VoxelClass::Air | VoxelClass::Fluid => return false,
        class if class.is_denied() => return false,
        VoxelClass::Obsidian if frames_nether_portal(pos, world) => return false,
        VoxelClass::SnowLayer { layers } if layers < MAX_SNOW_LAYERS => return false,
        _ => {}
    }

    let below = pos.below();
    let below_state = world.voxel_state_at(below);
    !world.is_full_opaque_cube(below, &below_state)
}

/// Whether any face neighbor of `pos` is a nether portal.
fn frames_nether_portal<W: WorldAccess + ?Sized>(pos: BlockPos, world: &W) -> bool {
    Direction::ALL.into_iter().any(|direction| {
        world.voxel_state_at(direction.relative(pos)).class() == VoxelClass::NetherPortal
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryWorld;

    const POS: BlockPos = BlockPos::new(0, 64, 0);

    fn world_with(state: VoxelState) -> MemoryWorld {
        let mut world = MemoryWorld::new();
        world.set(POS, state);
        world
    }

    fn check(world: &MemoryWorld) -> bool {
        can_fall(&world.voxel_state_at(POS), POS, world)
    }

    #[test]
    fn air_and_fluids_never_fall() {
        for path in ["air", "cave_air", "void_air", "water", "lava"] {
            let world = world_with(VoxelState::vanilla(path));
            assert!(!check(&world), "{path} should not fall");
        }
    }

    #[test]
    fn deny_list_never_falls() {
        for path in [
            "bedrock",
            "nether_portal",
            "end_portal",
            "end_portal_frame",
            "end_gateway",
            "poppy",
            "short_grass",
            "oak_sapling",
            "wheat",
            "red_mushroom",
        ] {
            let world = world_with(VoxelState::vanilla(path));
            assert!(!check(&world), "{path} should not fall");
        }
    }

    #[test]
    fn unsupported_solid_falls() {
        let world = world_with(VoxelState::vanilla("stone"));
        assert!(check(&world));
    }

    #[test]
    fn solid_on_full_cube_stays() {
        let mut world = world_with(VoxelState::vanilla("dirt"));
        world.set(POS.below(), VoxelState::vanilla("stone"));
        assert!(!check(&world));
    }

    #[test]
    fn solid_on_non_cube_falls() {
        for below in ["water", "poppy", "end_portal_frame"] {
            let mut world = world_with(VoxelState::vanilla("sand"));
            world.set(POS.below(), VoxelState::vanilla(below));
            assert!(check(&world), "sand above {below} should fall");
        }

        let mut world = world_with(VoxelState::vanilla("sand"));
        world.set(POS.below(), VoxelState::snow(7));
        assert!(check(&world));
    }

    #[test]
    fn thin_snow_never_falls() {
        for layers in 1..MAX_SNOW_LAYERS {
            let world = world_with(VoxelState::snow(layers));
            assert!(!check(&world), "{layers} layers should not fall");
        }
    }

    #[test]
    fn full_snow_falls_when_unsupported() {
        let world = world_with(VoxelState::snow(MAX_SNOW_LAYERS));
        assert!(check(&world));

        let mut world = world_with(VoxelState::snow(MAX_SNOW_LAYERS));
        world.set(POS.below(), VoxelState::vanilla("stone"));
        assert!(!check(&world));
    }

    #[test]
    fn obsidian_next_to_portal_stays_on_every_face() {
        for direction in Direction::ALL {
            let mut world = world_with(VoxelState::vanilla("obsidian"));
            world.set(direction.relative(POS), VoxelState::vanilla("nether_portal"));
            assert!(!check(&world), "portal on {direction:?} face");
        }
    }

    #[test]
    fn lone_obsidian_falls_when_unsupported() {
        let mut world = world_with(VoxelState::vanilla("obsidian"));
        world.set(POS.offset(2, 0, 0), VoxelState::vanilla("nether_portal"));
        assert!(check(&world));

        world.set(POS.below(), VoxelState::vanilla("obsidian"));
        assert!(!check(&world));
    }
}
