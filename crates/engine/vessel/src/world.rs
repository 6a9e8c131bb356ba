//! World collaborator traits and voxel data
//!
//! The vessel engine never owns voxel storage. Everything it reads or writes
//! goes through the traits in this module, which a host world implements:
//!
//! - [`VoxelGrid`] - voxel read/write by integer coordinate
//! - [`TagStore`] - ephemeral per-voxel key/value tags
//! - [`EntityIndex`] - dynamic entities located by chunk column
//!
//! [`World`] bundles all three and is what the transform entry points take.

use crate::orientation::{BlockAxis, CompassPoint, Facing};
use glam::{DVec3, IVec2, IVec3};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::hash::Hash;
use thiserror::Error;

/// Width of a chunk column along X and Z
pub const CHUNK_SIZE: i32 = 16;

/// Face-adjacent offsets, in the order `neighbors6` returns them
pub const FACE_OFFSETS: [IVec3; 6] = [
    IVec3::Y,
    IVec3::NEG_Y,
    IVec3::X,
    IVec3::NEG_X,
    IVec3::NEG_Z,
    IVec3::Z,
];

/// Chunk column containing a voxel coordinate
pub fn chunk_of(coord: IVec3) -> IVec2 {
    IVec2::new(coord.x.div_euclid(CHUNK_SIZE), coord.z.div_euclid(CHUNK_SIZE))
}

/// Errors reported by world collaborators
///
/// These are passed through the engine unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Coordinate lies outside the loaded or buildable world
    #[error("coordinate {0} is outside the world bounds")]
    OutOfBounds(IVec3),

    /// Entity handle no longer refers to a live entity
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// Any other backend failure
    #[error("grid backend failure: {0}")]
    Backend(String),
}

/// Namespaced block identifier, e.g. `oak_planks` or `oak_wall_sign`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Material(Cow<'static, str>);

impl Material {
    pub const AIR: Material = Material(Cow::Borrowed("air"));
    pub const CAVE_AIR: Material = Material(Cow::Borrowed("cave_air"));
    pub const VOID_AIR: Material = Material(Cow::Borrowed("void_air"));
    pub const WATER: Material = Material(Cow::Borrowed("water"));
    pub const LAVA: Material = Material(Cow::Borrowed("lava"));

    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Material(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }

    /// Air in any of its variants (plain, cave, void)
    pub fn is_air(&self) -> bool {
        matches!(self.id(), "air" | "cave_air" | "void_air")
    }

    pub fn is_liquid(&self) -> bool {
        matches!(self.id(), "water" | "lava")
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Orientation and state attributes carried by a voxel
///
/// Each attribute is optional; a plain stone block has none of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    /// Facing of directional blocks (wall signs, torches, levers, stairs)
    pub facing: Option<Facing>,
    /// Axis of orientable blocks (logs, pillars, chains)
    pub axis: Option<BlockAxis>,
    /// 16-point rotation of standing signs and banners
    pub rotation: Option<CompassPoint>,
    /// Growth stage of ageable blocks (crops)
    pub age: Option<u8>,
}

impl Shape {
    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = Some(facing);
        self
    }

    pub fn with_axis(mut self, axis: BlockAxis) -> Self {
        self.axis = Some(axis);
        self
    }

    pub fn with_rotation(mut self, rotation: CompassPoint) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_age(mut self, age: u8) -> Self {
        self.age = Some(age);
        self
    }
}

/// Material plus shape of a single voxel, as read from the grid
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoxelSnapshot {
    pub material: Material,
    #[serde(default)]
    pub shape: Shape,
}

impl VoxelSnapshot {
    pub fn new(material: Material) -> Self {
        VoxelSnapshot {
            material,
            shape: Shape::default(),
        }
    }

    /// Convenience constructor from a material id
    pub fn of(id: &'static str) -> Self {
        Self::new(Material::new(id))
    }

    pub fn air() -> Self {
        Self::new(Material::AIR)
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    pub fn facing(mut self, facing: Facing) -> Self {
        self.shape.facing = Some(facing);
        self
    }

    pub fn axis(mut self, axis: BlockAxis) -> Self {
        self.shape.axis = Some(axis);
        self
    }

    pub fn rotation(mut self, rotation: CompassPoint) -> Self {
        self.shape.rotation = Some(rotation);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.material.is_air()
    }

    pub fn is_liquid(&self) -> bool {
        self.material.is_liquid()
    }
}

/// Voxel storage owned by the host world
pub trait VoxelGrid {
    /// Read the voxel at a coordinate
    fn get(&self, coord: IVec3) -> Result<VoxelSnapshot, GridError>;

    /// Write a voxel, optionally letting the host propagate physics updates
    fn set(
        &mut self,
        coord: IVec3,
        voxel: VoxelSnapshot,
        apply_physics: bool,
    ) -> Result<(), GridError>;

    /// Clear a voxel without triggering physics
    fn set_empty(&mut self, coord: IVec3) -> Result<(), GridError> {
        self.set(coord, VoxelSnapshot::air(), false)
    }

    /// The six face-adjacent coordinates
    fn neighbors6(&self, coord: IVec3) -> [IVec3; 6] {
        FACE_OFFSETS.map(|offset| coord + offset)
    }
}

/// Ephemeral key/value tags attached to voxel coordinates
///
/// Tags live for the lifetime of the process only.
pub trait TagStore {
    fn tag(&mut self, coord: IVec3, key: &str, value: &str);

    fn untag(&mut self, coord: IVec3, key: &str);

    fn get_tag(&self, coord: IVec3, key: &str) -> Option<String>;
}

/// Dynamic entities (players, mobs, items) tracked by the host world
pub trait EntityIndex {
    type Handle: Copy + Eq + Hash + fmt::Debug;

    /// All entities whose position lies in one of the given chunk columns
    fn entities_in_regions(&self, regions: &[IVec2]) -> Result<Vec<Self::Handle>, GridError>;

    fn position(&self, entity: Self::Handle) -> Result<DVec3, GridError>;

    /// Teleport an entity
    fn set_position(&mut self, entity: Self::Handle, position: DVec3) -> Result<(), GridError>;

    fn velocity(&self, entity: Self::Handle) -> Result<DVec3, GridError>;

    fn set_velocity(&mut self, entity: Self::Handle, velocity: DVec3) -> Result<(), GridError>;

    /// Heading in degrees as `(yaw, pitch)`
    fn yaw_pitch(&self, entity: Self::Handle) -> Result<(f32, f32), GridError>;

    fn set_yaw_pitch(
        &mut self,
        entity: Self::Handle,
        yaw: f32,
        pitch: f32,
    ) -> Result<(), GridError>;
}

/// Everything a vessel needs from its host
pub trait World: VoxelGrid + TagStore + EntityIndex {}

impl<T: VoxelGrid + TagStore + EntityIndex> World for T {}
