//! Error types for the vessel crate

use crate::classifier::ControlRole;
use crate::world::GridError;
use glam::IVec3;
use thiserror::Error;

/// Result type alias for vessel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or moving a vessel
#[derive(Debug, Error)]
pub enum Error {
    /// Movement or velocity change requested before an engine exists
    #[error("vessel '{0}' has no engine registered")]
    MissingEngine(String),

    /// A control surface of this kind is already registered
    #[error("vessel '{vessel}' already has a {role} control surface")]
    DuplicateControlSurface { vessel: String, role: ControlRole },

    /// The coordinate already carries a different control role
    #[error("vessel '{vessel}' already uses {coord} as its {existing} sign")]
    OccupiedControlSurface {
        vessel: String,
        coord: IVec3,
        existing: ControlRole,
    },

    /// Steering sign text is neither `<` nor `>`
    #[error("invalid steering marker: '{0}'")]
    InvalidSteeringMarker(String),

    /// Engine sign has no horizontal facing to derive a heading from
    #[error("engine sign at {0} has no horizontal facing")]
    UnorientedEngine(IVec3),

    /// A vessel with this name is already registered
    #[error("vessel already exists: {0}")]
    DuplicateVessel(String),

    /// No vessel registered under this name
    #[error("vessel not found: {0}")]
    VesselNotFound(String),

    /// Control sign mounted on a voxel no vessel owns
    #[error("voxel at {0} does not belong to any vessel")]
    NotAVesselVoxel(IVec3),

    /// Failure reported by the host world
    #[error(transparent)]
    Grid(#[from] GridError),
}
