//! Spherical scan around observers that turns eligible voxels into falling entities.

use fallingblocks_utils::{BlockPos, math::Vector3};
use rustc_hash::FxHashSet;

use crate::eligibility::can_fall;
use crate::host::{Observer, WorldMutation};

/// Largest radius a scan walks. Larger requests are clamped to it.
pub const MAX_SCAN_RADIUS: i32 = 64;

/// Summary of one falling event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    /// Radius used for every observer's sphere.
    pub radius: i32,
    /// Observers whose surroundings were scanned.
    pub observers: usize,
    /// Voxels converted into falling entities.
    pub converted: usize,
}

/// Scans spheres around observers and converts eligible voxels.
pub struct RegionScanner;

impl RegionScanner {
    /// Offsets inside a sphere of `radius`, ascending by x, then y, then z.
    ///
    /// A lattice point is inside when `dx² + dy² + dz² <= radius² + 0.5`.
    /// `radius` is clamped to `0..=MAX_SCAN_RADIUS`.
    #[must_use]
    pub fn sphere_offsets(radius: i32) -> Vec<Vector3<i32>> {
        let radius = radius.clamp(0, MAX_SCAN_RADIUS);
        let limit = f64::from(radius * radius) + 0.5;
        let mut offsets = Vec::new();
        for x in -radius..=radius {
            for y in -radius..=radius {
                for z in -radius..=radius {
                    let offset = Vector3::new(x, y, z);
                    if f64::from(offset.length_squared()) <= limit {
                        offsets.push(offset);
                    }
                }
            }
        }
        offsets
    }

    /// Runs one falling event.
    ///
    /// Observers are visited in the given order. A single processed set spans the
    /// whole call, so a voxel inside several overlapping spheres converts at most once.
    pub fn trigger_event<O, W>(observers: &[O], radius: i32, world: &mut W) -> ScanReport
    where
        O: Observer,
        W: WorldMutation + ?Sized,
    {
        let mut report = ScanReport {
            radius,
            observers: observers.len(),
            converted: 0,
        };
        if observers.is_empty() {
            return report;
        }

        let offsets = Self::sphere_offsets(radius);
        let mut processed: FxHashSet<BlockPos> = FxHashSet::default();

        for observer in observers {
            let center = BlockPos::containing(observer.position());
            for offset in &offsets {
                let pos = BlockPos(center.0 + *offset);
                if processed.contains(&pos) {
                    continue;
                }

                let state = world.voxel_state_at(pos);
                if can_fall(&state, pos, &*world) {
                    processed.insert(pos);
                    log::trace!("Dropping {state} at {pos}");
                    world.clear_voxel(pos);
                    world.spawn_falling(pos, state);
                    report.converted += 1;
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::WorldAccess;
    use crate::memory::{FixedObserver, MemoryWorld};
    use crate::voxel::VoxelState;

    #[test]
    fn sphere_offset_counts() {
        assert_eq!(RegionScanner::sphere_offsets(0).len(), 1);
        assert_eq!(RegionScanner::sphere_offsets(1).len(), 7);
        // 1 + 6 + 12 + 8 + 6 points at squared distances 0..=4
        assert_eq!(RegionScanner::sphere_offsets(2).len(), 33);
    }

    #[test]
    fn sphere_offsets_are_ordered_and_bounded() {
        let radius = 9;
        let offsets = RegionScanner::sphere_offsets(radius);
        assert!(offsets.windows(2).all(|w| (w[0].x, w[0].y, w[0].z) < (w[1].x, w[1].y, w[1].z)));
        assert!(offsets.iter().all(|o| o.length_squared() <= radius * radius));
        assert!(offsets.contains(&Vector3::new(radius, 0, 0)));
        assert!(!offsets.contains(&Vector3::new(radius, 1, 0)));
    }

    #[test]
    fn oversized_radius_is_clamped() {
        let largest = RegionScanner::sphere_offsets(MAX_SCAN_RADIUS);
        assert_eq!(RegionScanner::sphere_offsets(50_000), largest);
        assert_eq!(RegionScanner::sphere_offsets(i32::MAX).len(), largest.len());
        assert_eq!(RegionScanner::sphere_offsets(-3).len(), 1);
    }

    #[test]
    fn no_observers_is_a_no_op() {
        let mut world = MemoryWorld::new();
        world.set(BlockPos::new(0, 0, 0), VoxelState::vanilla("sand"));
        let report = RegionScanner::trigger_event::<FixedObserver, _>(&[], 5, &mut world);
        assert_eq!(report.converted, 0);
        assert_eq!(world.len(), 1);
        assert!(world.falling().is_empty());
    }

    #[test]
    fn converts_only_unsupported_voxels() {
        let mut world = MemoryWorld::new();
        world.fill(
            BlockPos::new(-2, 0, -2),
            BlockPos::new(2, 0, 2),
            &VoxelState::vanilla("bedrock"),
        );
        world.fill(
            BlockPos::new(-2, 1, -2),
            BlockPos::new(2, 1, 2),
            &VoxelState::vanilla("stone"),
        );
        world.set(BlockPos::new(1, 2, 1), VoxelState::vanilla("poppy"));
        world.set(BlockPos::new(0, 3, 0), VoxelState::vanilla("sand"));
        let before = world.len();
        let observer = FixedObserver::at(0.5, 2.5, 0.5);

        let report = RegionScanner::trigger_event(&[observer], 4, &mut world);

        assert_eq!(report.radius, 4);
        assert_eq!(report.observers, 1);
        assert_eq!(report.converted, 1);
        assert_eq!(world.len(), before - 1);
        assert_eq!(world.falling()[0].pos, BlockPos::new(0, 3, 0));
        assert_eq!(world.falling()[0].state, VoxelState::vanilla("sand"));
    }

    #[test]
    fn clearing_a_voxel_exposes_the_one_above() {
        let mut world = MemoryWorld::new();
        world.set(BlockPos::new(0, 5, 0), VoxelState::vanilla("stone"));
        world.set(BlockPos::new(0, 6, 0), VoxelState::vanilla("stone"));
        let observer = FixedObserver::at(0.0, 5.0, 0.0);

        // y ascends within a column, so the lower block drops first and leaves
        // the upper one unsupported when it is reached.
        let report = RegionScanner::trigger_event(&[observer], 3, &mut world);

        assert_eq!(report.converted, 2);
        assert!(world.is_empty());
    }

    #[test]
    fn overlapping_spheres_convert_each_voxel_once() {
        let mut world = MemoryWorld::new();
        // Unsupported sand columns every other block along x so clearing one never
        // exposes another within the same event.
        for x in -6..=6 {
            if x % 2 == 0 {
                world.set(BlockPos::new(x, 10, 0), VoxelState::vanilla("sand"));
            }
        }
        let sand_count = world.len();
        let a = FixedObserver::at(-1.0, 10.0, 0.0);
        let b = FixedObserver::at(1.0, 10.0, 0.0);

        let report = RegionScanner::trigger_event(&[a, b], 8, &mut world);

        assert_eq!(report.converted, sand_count);
        assert_eq!(world.cleared(), sand_count);
        let mut positions: Vec<_> = world.falling().iter().map(|f| f.pos).collect();
        positions.sort();
        positions.dedup();
        assert_eq!(positions.len(), sand_count);
    }

    #[test]
    fn same_observer_twice_converts_once() {
        let mut world = MemoryWorld::new();
        world.set(BlockPos::new(0, 3, 0), VoxelState::vanilla("gravel"));
        // A cleared voxel reads as air, but a host may keep it; the processed set
        // must still prevent a second conversion.
        struct StickyWorld(MemoryWorld);
        impl WorldAccess for StickyWorld {
            fn voxel_state_at(&self, pos: BlockPos) -> VoxelState {
                self.0.voxel_state_at(pos)
            }
            fn is_full_opaque_cube(&self, pos: BlockPos, state: &VoxelState) -> bool {
                self.0.is_full_opaque_cube(pos, state)
            }
        }
        impl WorldMutation for StickyWorld {
            fn clear_voxel(&mut self, _pos: BlockPos) {}
            fn spawn_falling(&mut self, pos: BlockPos, state: VoxelState) {
                self.0.spawn_falling(pos, state);
            }
        }
        let mut sticky = StickyWorld(world);
        let observer = FixedObserver::at(0.0, 3.0, 0.0);

        let report = RegionScanner::trigger_event(&[observer, observer], 2, &mut sticky);

        assert_eq!(report.converted, 1);
        assert_eq!(sticky.0.falling().len(), 1);
    }

    #[test]
    fn center_is_floored_position() {
        let mut world = MemoryWorld::new();
        world.set(BlockPos::new(-1, -1, -1), VoxelState::vanilla("sand"));
        world.set(BlockPos::new(1, 0, 0), VoxelState::vanilla("sand"));
        let observer = FixedObserver::at(-0.5, -0.5, -0.5);

        let report = RegionScanner::trigger_event(&[observer], 0, &mut world);

        assert_eq!(report.converted, 1);
        assert_eq!(world.falling()[0].pos, BlockPos::new(-1, -1, -1));
    }
}
