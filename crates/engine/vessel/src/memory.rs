//! In-memory world for tests and headless simulation
//!
//! A sparse voxel map (absent coordinates read as air), a tag map and a small
//! entity table, implementing every collaborator trait in [`crate::world`].

use crate::world::{chunk_of, EntityIndex, GridError, TagStore, VoxelGrid, VoxelSnapshot};
use glam::{DVec3, IVec2, IVec3};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Handle of an entity in a [`MemoryWorld`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Transform and motion of a simulated entity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EntityState {
    pub position: DVec3,
    pub velocity: DVec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl EntityState {
    /// Entity at rest at `position`
    pub fn at(position: DVec3) -> Self {
        EntityState {
            position,
            ..Default::default()
        }
    }
}

/// One recorded grid write
#[derive(Debug, Clone, PartialEq)]
pub enum GridWrite {
    Set {
        coord: IVec3,
        voxel: VoxelSnapshot,
        apply_physics: bool,
    },
    Clear {
        coord: IVec3,
    },
}

impl GridWrite {
    pub fn coord(&self) -> IVec3 {
        match self {
            GridWrite::Set { coord, .. } | GridWrite::Clear { coord } => *coord,
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryWorld {
    voxels: HashMap<IVec3, VoxelSnapshot>,
    tags: HashMap<(IVec3, String), String>,
    entities: HashMap<EntityId, EntityState>,
    next_entity: u64,
    /// Inclusive vertical build limits
    height_limits: Option<(i32, i32)>,
    journal: Option<Vec<GridWrite>>,
}

impl MemoryWorld {
    /// Empty world without height limits
    pub fn new() -> Self {
        MemoryWorld::default()
    }

    /// Reject writes outside `[min_y, max_y]`
    pub fn with_height_limits(mut self, min_y: i32, max_y: i32) -> Self {
        self.height_limits = Some((min_y, max_y));
        self
    }

    /// Start recording every `set`/`set_empty` call
    pub fn record_writes(&mut self) {
        self.journal = Some(Vec::new());
    }

    /// Recorded writes since `record_writes`
    pub fn journal(&self) -> &[GridWrite] {
        self.journal.as_deref().unwrap_or(&[])
    }

    /// Drain recorded writes
    pub fn take_journal(&mut self) -> Vec<GridWrite> {
        self.journal.as_mut().map(std::mem::take).unwrap_or_default()
    }

    /// Place a voxel directly (scene setup, not journaled)
    pub fn place(&mut self, coord: IVec3, voxel: VoxelSnapshot) {
        if voxel.is_empty() {
            self.voxels.remove(&coord);
        } else {
            self.voxels.insert(coord, voxel);
        }
    }

    /// Fill an inclusive box with a voxel
    pub fn fill(&mut self, min: IVec3, max: IVec3, voxel: &VoxelSnapshot) {
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    self.place(IVec3::new(x, y, z), voxel.clone());
                }
            }
        }
    }

    /// Voxel at a coordinate, air if nothing is stored
    pub fn voxel(&self, coord: IVec3) -> VoxelSnapshot {
        self.voxels.get(&coord).cloned().unwrap_or_else(VoxelSnapshot::air)
    }

    /// Number of non-air voxels
    pub fn voxel_count(&self) -> usize {
        self.voxels.len()
    }

    /// All non-air voxels, unordered
    pub fn voxels(&self) -> impl Iterator<Item = (&IVec3, &VoxelSnapshot)> {
        self.voxels.iter()
    }

    /// Coordinates carrying a tag key
    pub fn tagged(&self, key: &str) -> HashSet<IVec3> {
        self.tags
            .keys()
            .filter(|(_, k)| k == key)
            .map(|(coord, _)| *coord)
            .collect()
    }

    /// Add an entity and return its id
    pub fn spawn_entity(&mut self, state: EntityState) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        self.entities.insert(id, state);
        id
    }

    pub fn entity(&self, id: EntityId) -> Option<&EntityState> {
        self.entities.get(&id)
    }

    fn entity_mut(&mut self, id: EntityId) -> Result<&mut EntityState, GridError> {
        self.entities
            .get_mut(&id)
            .ok_or_else(|| GridError::UnknownEntity(id.to_string()))
    }

    fn entity_ref(&self, id: EntityId) -> Result<&EntityState, GridError> {
        self.entities
            .get(&id)
            .ok_or_else(|| GridError::UnknownEntity(id.to_string()))
    }

    fn check_bounds(&self, coord: IVec3) -> Result<(), GridError> {
        match self.height_limits {
            Some((min_y, max_y)) if coord.y < min_y || coord.y > max_y => {
                Err(GridError::OutOfBounds(coord))
            }
            _ => Ok(()),
        }
    }

    fn record(&mut self, write: GridWrite) {
        if let Some(journal) = &mut self.journal {
            journal.push(write);
        }
    }
}

impl VoxelGrid for MemoryWorld {
    fn get(&self, coord: IVec3) -> Result<VoxelSnapshot, GridError> {
        Ok(self.voxel(coord))
    }

    fn set(
        &mut self,
        coord: IVec3,
        voxel: VoxelSnapshot,
        apply_physics: bool,
    ) -> Result<(), GridError> {
        self.check_bounds(coord)?;
        self.record(GridWrite::Set {
            coord,
            voxel: voxel.clone(),
            apply_physics,
        });
        self.place(coord, voxel);
        Ok(())
    }

    fn set_empty(&mut self, coord: IVec3) -> Result<(), GridError> {
        self.check_bounds(coord)?;
        self.record(GridWrite::Clear { coord });
        self.voxels.remove(&coord);
        Ok(())
    }
}

impl TagStore for MemoryWorld {
    fn tag(&mut self, coord: IVec3, key: &str, value: &str) {
        self.tags.insert((coord, key.to_string()), value.to_string());
    }

    fn untag(&mut self, coord: IVec3, key: &str) {
        self.tags.remove(&(coord, key.to_string()));
    }

    fn get_tag(&self, coord: IVec3, key: &str) -> Option<String> {
        self.tags.get(&(coord, key.to_string())).cloned()
    }
}

impl EntityIndex for MemoryWorld {
    type Handle = EntityId;

    fn entities_in_regions(&self, regions: &[IVec2]) -> Result<Vec<EntityId>, GridError> {
        let regions: HashSet<IVec2> = regions.iter().copied().collect();
        let mut found: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, state)| regions.contains(&chunk_of(state.position.floor().as_ivec3())))
            .map(|(id, _)| *id)
            .collect();
        found.sort();
        Ok(found)
    }

    fn position(&self, entity: EntityId) -> Result<DVec3, GridError> {
        Ok(self.entity_ref(entity)?.position)
    }

    fn set_position(&mut self, entity: EntityId, position: DVec3) -> Result<(), GridError> {
        self.entity_mut(entity)?.position = position;
        Ok(())
    }

    fn velocity(&self, entity: EntityId) -> Result<DVec3, GridError> {
        Ok(self.entity_ref(entity)?.velocity)
    }

    fn set_velocity(&mut self, entity: EntityId, velocity: DVec3) -> Result<(), GridError> {
        self.entity_mut(entity)?.velocity = velocity;
        Ok(())
    }

    fn yaw_pitch(&self, entity: EntityId) -> Result<(f32, f32), GridError> {
        let state = self.entity_ref(entity)?;
        Ok((state.yaw, state.pitch))
    }

    fn set_yaw_pitch(&mut self, entity: EntityId, yaw: f32, pitch: f32) -> Result<(), GridError> {
        let state = self.entity_mut(entity)?;
        state.yaw = yaw;
        state.pitch = pitch;
        Ok(())
    }
}
