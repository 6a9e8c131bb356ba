//! Vessel crate - moving block-built ships through a voxel world
//!
//! A vessel is a connected group of voxels claimed by a license sign. Engine
//! and steering signs attached to the hull drive it: the whole hull is lifted
//! out of the grid and written back translated or rotated a quarter turn,
//! carrying its tags and any entities standing on it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Vessel Registry                       │
//! │  ├── Sign write  -> create vessel / attach surface       │
//! │  └── Sign click  -> move forward / rotate                │
//! ├─────────────────────────────────────────────────────────┤
//! │  Vessel                                                  │
//! │  ├── Hull (voxels + origin)                             │
//! │  ├── Control surfaces (license, engine, steering)       │
//! │  └── Discovery (bounded breadth-first search)           │
//! ├─────────────────────────────────────────────────────────┤
//! │  Transform                                               │
//! │  ├── Priority sort (attached before solid)              │
//! │  ├── Clear forward, write in reverse                    │
//! │  └── Tag and entity relocation                          │
//! ├─────────────────────────────────────────────────────────┤
//! │  World traits: VoxelGrid, TagStore, EntityIndex          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use vessel::{CompassPoint, Facing, MemoryWorld, VesselRegistry, VoxelSnapshot};
//! use glam::IVec3;
//!
//! let mut world = MemoryWorld::new();
//! world.fill(IVec3::new(-1, 0, -1), IVec3::new(1, 0, 1), &VoxelSnapshot::of("oak_planks"));
//! world.place(IVec3::Y, VoxelSnapshot::of("oak_sign").rotation(CompassPoint::SOUTH));
//! world.place(IVec3::new(2, 0, 0), VoxelSnapshot::of("oak_wall_sign").facing(Facing::East));
//!
//! let mut registry = VesselRegistry::default();
//! registry.handle_sign_write(IVec3::Y, &["[Ship]", "[name]", "Argo"], &mut world).unwrap();
//! registry.handle_sign_write(IVec3::new(2, 0, 0), &["[Ship]", "[move]"], &mut world).unwrap();
//!
//! // The engine's text faces East, so the vessel travels West
//! registry.handle_sign_click(IVec3::new(2, 0, 0), &mut world).unwrap();
//! assert_eq!(registry.get("Argo").unwrap().origin(), IVec3::new(-1, 1, 0));
//! ```

mod classifier;
mod config;
mod control;
mod discovery;
mod error;
mod hull;
mod memory;
mod orientation;
mod registry;
mod transform;
mod vessel;
mod world;

pub use classifier::{
    classify, has_header, is_sign, is_wall_sign, role_of, ControlRole, Priority, ENGINE_MARKER,
    LICENSE_MARKER, SIGN_HEADER, STEERING_MARKER,
};
pub use config::{ConfigError, VesselConfig, MAX_VELOCITY, MAX_VESSEL_SZ, VESSEL_SIZE_CEILING};
pub use control::{
    role_at, vessel_name_at, ControlSurfaces, Engine, License, Steering, CONTROL_TAG, NAME_TAG,
};
pub use discovery::{discover, Discovery};
pub use error::{Error, Result};
pub use hull::{Hull, HullEntry};
pub use memory::{EntityId, EntityState, GridWrite, MemoryWorld};
pub use orientation::{wrap_degrees, BlockAxis, CompassPoint, Facing, Turn, HORIZONTAL_FACINGS};
pub use registry::{ClickOutcome, SignOutcome, VesselRegistry};
pub use transform::{rotate, translate, TransformTarget};
pub use vessel::Vessel;
pub use world::{
    chunk_of, EntityIndex, GridError, Material, Shape, TagStore, VoxelGrid, VoxelSnapshot, World,
    CHUNK_SIZE, FACE_OFFSETS,
};

// Re-export glam for convenience
pub use glam;
