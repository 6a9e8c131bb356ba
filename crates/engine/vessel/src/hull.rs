//! Hull storage: the voxels a vessel owns and its pivot

use crate::classifier::{classify, Priority};
use crate::world::VoxelSnapshot;
use glam::IVec3;
use serde::{Deserialize, Serialize};

/// One voxel belonging to a vessel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HullEntry {
    pub coord: IVec3,
    /// Snapshot written back after relocation
    pub voxel: VoxelSnapshot,
    pub priority: Priority,
}

impl HullEntry {
    /// Entry classified from the voxel
    pub fn new(coord: IVec3, voxel: VoxelSnapshot) -> Self {
        let priority = classify(&voxel);
        HullEntry {
            coord,
            voxel,
            priority,
        }
    }
}

/// Ordered voxel list plus the origin used as rotation pivot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hull {
    pub(crate) entries: Vec<HullEntry>,
    pub(crate) origin: IVec3,
}

impl Hull {
    /// Hull pivoting about `origin`
    pub fn new(origin: IVec3, entries: Vec<HullEntry>) -> Self {
        Hull { entries, origin }
    }

    /// Entries in their current pass order
    pub fn entries(&self) -> &[HullEntry] {
        &self.entries
    }

    /// Pivot for rotations
    pub fn origin(&self) -> IVec3 {
        self.origin
    }

    /// Number of voxels in the hull
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the hull holds no voxels
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if `coord` is part of the hull
    pub fn contains(&self, coord: IVec3) -> bool {
        self.entries.iter().any(|e| e.coord == coord)
    }

    /// Add a voxel unless its coordinate is already part of the hull
    pub fn absorb(&mut self, coord: IVec3, voxel: VoxelSnapshot) -> bool {
        if self.contains(coord) {
            return false;
        }
        self.entries.push(HullEntry::new(coord, voxel));
        true
    }

    /// Coordinates of every hull voxel
    pub fn coords(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.entries.iter().map(|e| e.coord)
    }

    /// Sort by priority only, keeping discovery order inside each class
    pub(crate) fn sort_by_priority(&mut self) {
        self.entries.sort_by_key(|e| e.priority);
    }

    /// Sort by priority, then by position along `delta`
    ///
    /// Within a class, voxels furthest along the direction of travel come
    /// last, so a reverse walk writes the leading edge first.
    pub(crate) fn sort_for_translation(&mut self, delta: IVec3) {
        self.entries
            .sort_by_key(|e| (e.priority, e.coord.dot(delta)));
    }
}
