//! Breadth-first hull discovery
//!
//! Starting from a seed voxel, walk face-adjacent neighbours and collect every
//! voxel that is neither air nor liquid. Each collected voxel is tagged with
//! the vessel's name on the spot.

use crate::control::{vessel_name_at, NAME_TAG};
use crate::hull::HullEntry;
use crate::world::{GridError, TagStore, VoxelGrid, VoxelSnapshot};
use glam::IVec3;
use std::collections::{HashSet, VecDeque};
use tracing::{trace, warn};

/// Result of a discovery pass
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Hull voxels in discovery (distance) order
    pub entries: Vec<HullEntry>,
    /// Search stopped at the size cap; the hull may be incomplete
    pub truncated: bool,
}

/// Upper bound on the work queue reserved up front; it grows past this on demand
const FRONTIER_RESERVE: usize = 4096;

/// Collect the connected hull around `seed`
///
/// Voxels already tagged with a different vessel's name act as a boundary.
/// The search stops as soon as the hull holds `max_size` voxels; the result
/// is only marked truncated if claimable voxels were left unvisited.
pub fn discover<W>(
    seed: IVec3,
    name: &str,
    world: &mut W,
    max_size: usize,
) -> Result<Discovery, GridError>
where
    W: VoxelGrid + TagStore + ?Sized,
{
    let mut visited: HashSet<IVec3> = HashSet::new();
    // Each popped voxel enqueues at most four unseen neighbours
    let capacity = max_size.saturating_mul(4).saturating_add(2);
    let mut work: VecDeque<IVec3> = VecDeque::with_capacity(capacity.min(FRONTIER_RESERVE));
    let mut discovery = Discovery::default();

    work.push_back(seed);

    while let Some(coord) = work.pop_front() {
        if !visited.insert(coord) {
            continue;
        }

        let Some(voxel) = claimable(&*world, coord, name)? else {
            continue;
        };

        trace!("Adding {} at {}", voxel.material, coord);
        world.tag(coord, NAME_TAG, name);
        discovery.entries.push(HullEntry::new(coord, voxel));

        for neighbor in world.neighbors6(coord) {
            if !visited.contains(&neighbor) {
                work.push_back(neighbor);
            }
        }

        if discovery.entries.len() >= max_size {
            discovery.truncated = frontier_remains(&*world, name, &work, &visited)?;
            if discovery.truncated {
                warn!(
                    "Vessel '{}' reached the size cap of {} voxels, hull may be incomplete",
                    name, max_size
                );
            }
            break;
        }
    }

    Ok(discovery)
}

/// Voxel at `coord` if it can join the hull of `name`
///
/// Air, liquids and voxels owned by another vessel cannot.
fn claimable<W>(world: &W, coord: IVec3, name: &str) -> Result<Option<VoxelSnapshot>, GridError>
where
    W: VoxelGrid + TagStore + ?Sized,
{
    let voxel = world.get(coord)?;
    if voxel.is_empty() || voxel.is_liquid() {
        return Ok(None);
    }
    if let Some(owner) = vessel_name_at(world, coord) {
        if owner != name {
            trace!("Skipping voxel at {} owned by vessel '{}'", coord, owner);
            return Ok(None);
        }
    }
    Ok(Some(voxel))
}

fn frontier_remains<W>(
    world: &W,
    name: &str,
    work: &VecDeque<IVec3>,
    visited: &HashSet<IVec3>,
) -> Result<bool, GridError>
where
    W: VoxelGrid + TagStore + ?Sized,
{
    for coord in work.iter().filter(|c| !visited.contains(*c)) {
        if claimable(world, *coord, name)?.is_some() {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryWorld;

    #[test]
    fn test_single_voxel() {
        let mut world = MemoryWorld::new();
        world.place(IVec3::ZERO, VoxelSnapshot::of("oak_planks"));

        let found = discover(IVec3::ZERO, "Argo", &mut world, 100).unwrap();
        assert_eq!(found.entries.len(), 1);
        assert!(!found.truncated);
        assert_eq!(world.get_tag(IVec3::ZERO, NAME_TAG).as_deref(), Some("Argo"));
    }

    #[test]
    fn test_breadth_first_order() {
        let mut world = MemoryWorld::new();
        world.fill(IVec3::ZERO, IVec3::new(4, 0, 0), &VoxelSnapshot::of("oak_planks"));

        let found = discover(IVec3::new(2, 0, 0), "Argo", &mut world, 100).unwrap();
        let distances: Vec<i32> = found
            .entries
            .iter()
            .map(|e| (e.coord.x - 2).abs())
            .collect();
        assert_eq!(distances, vec![0, 1, 1, 2, 2]);
    }

    #[test]
    fn test_air_and_liquid_are_boundaries() {
        let mut world = MemoryWorld::new();
        world.place(IVec3::ZERO, VoxelSnapshot::of("oak_planks"));
        world.place(IVec3::X, VoxelSnapshot::of("water"));
        world.place(IVec3::new(2, 0, 0), VoxelSnapshot::of("oak_planks"));
        world.place(IVec3::NEG_X, VoxelSnapshot::of("cave_air"));
        world.place(IVec3::new(-2, 0, 0), VoxelSnapshot::of("oak_planks"));

        let found = discover(IVec3::ZERO, "Argo", &mut world, 100).unwrap();
        assert_eq!(found.entries.len(), 1);
        assert_eq!(world.get_tag(IVec3::X, NAME_TAG), None);
        assert_eq!(world.get_tag(IVec3::new(2, 0, 0), NAME_TAG), None);
    }

    #[test]
    fn test_other_vessel_is_boundary() {
        let mut world = MemoryWorld::new();
        world.fill(IVec3::ZERO, IVec3::new(3, 0, 0), &VoxelSnapshot::of("oak_planks"));
        world.tag(IVec3::new(2, 0, 0), NAME_TAG, "Kon-Tiki");

        let found = discover(IVec3::ZERO, "Argo", &mut world, 100).unwrap();
        assert_eq!(found.entries.len(), 2);
        assert_eq!(
            world.get_tag(IVec3::new(2, 0, 0), NAME_TAG).as_deref(),
            Some("Kon-Tiki")
        );
    }

    #[test]
    fn test_truncates_at_cap() {
        let mut world = MemoryWorld::new();
        world.fill(IVec3::ZERO, IVec3::new(9, 9, 0), &VoxelSnapshot::of("stone"));

        let found = discover(IVec3::ZERO, "Argo", &mut world, 25).unwrap();
        assert_eq!(found.entries.len(), 25);
        assert!(found.truncated);
        assert_eq!(world.tagged(NAME_TAG).len(), 25);
    }

    #[test]
    fn test_exact_fit_is_not_truncated() {
        let mut world = MemoryWorld::new();
        world.fill(IVec3::ZERO, IVec3::new(4, 0, 0), &VoxelSnapshot::of("oak_planks"));

        let found = discover(IVec3::ZERO, "Argo", &mut world, 5).unwrap();
        assert_eq!(found.entries.len(), 5);
        assert!(!found.truncated);

        let mut world = MemoryWorld::new();
        world.fill(IVec3::ZERO, IVec3::new(4, 0, 0), &VoxelSnapshot::of("oak_planks"));

        let found = discover(IVec3::ZERO, "Argo", &mut world, 4).unwrap();
        assert_eq!(found.entries.len(), 4);
        assert!(found.truncated);
    }

    #[test]
    fn test_foreign_frontier_is_not_truncation() {
        let mut world = MemoryWorld::new();
        world.fill(IVec3::ZERO, IVec3::new(3, 0, 0), &VoxelSnapshot::of("oak_planks"));
        world.tag(IVec3::new(3, 0, 0), NAME_TAG, "Kon-Tiki");

        let found = discover(IVec3::ZERO, "Argo", &mut world, 3).unwrap();
        assert_eq!(found.entries.len(), 3);
        assert!(!found.truncated);
    }

    #[test]
    fn test_unbounded_cap() {
        let mut world = MemoryWorld::new();
        world.fill(IVec3::ZERO, IVec3::new(2, 2, 0), &VoxelSnapshot::of("stone"));

        let found = discover(IVec3::ZERO, "Argo", &mut world, usize::MAX).unwrap();
        assert_eq!(found.entries.len(), 9);
        assert!(!found.truncated);
    }
}
