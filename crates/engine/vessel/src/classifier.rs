//! Voxel and sign classification
//!
//! Pure lookups with no state: which voxels must move in the attachment
//! pass, and which control role a sign's text declares.

use crate::world::{Material, VoxelSnapshot};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Header line every vessel control sign starts with
pub const SIGN_HEADER: &str = "[Ship]";

/// Second-line markers, lower case
pub const LICENSE_MARKER: &str = "[name]";
pub const ENGINE_MARKER: &str = "[move]";
pub const STEERING_MARKER: &str = "[steer]";

/// Movement priority class of a hull voxel
///
/// Ordering matters: `Attached` sorts before `Solid`, so a forward walk
/// clears attachments before their support and a reverse walk writes
/// supports before the attachments that hang off them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Needs a supporting neighbour to stay valid
    Attached,
    /// Stands on its own
    Solid,
}

/// Classify a voxel by its material and shape
pub fn classify(voxel: &VoxelSnapshot) -> Priority {
    if voxel.shape.age.is_some() || is_attached_material(&voxel.material) {
        Priority::Attached
    } else {
        Priority::Solid
    }
}

fn is_attached_material(material: &Material) -> bool {
    let id = material.id();
    is_sign(material)
        || id == "lever"
        || id.ends_with("_button")
        || id == "rail"
        || id.ends_with("_rail")
        || id == "redstone_wire"
        || id.ends_with("torch")
}

/// Standing, wall and hanging signs of every wood type
pub fn is_sign(material: &Material) -> bool {
    material.id().ends_with("_sign")
}

/// Wall-mounted sign (regular or hanging)
pub fn is_wall_sign(material: &Material) -> bool {
    material.id().ends_with("_wall_sign") || material.id().ends_with("_wall_hanging_sign")
}

/// Role a control sign plays for its vessel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlRole {
    License,
    Engine,
    Steering,
    Unknown,
}

impl ControlRole {
    /// Value stored in the control tag, `None` for `Unknown`
    pub fn tag_value(self) -> Option<&'static str> {
        match self {
            ControlRole::License => Some("license"),
            ControlRole::Engine => Some("engine"),
            ControlRole::Steering => Some("steering"),
            ControlRole::Unknown => None,
        }
    }

    /// Decode a control tag value; unrecognised values are `Unknown`
    pub fn from_tag_value(value: &str) -> Self {
        match value {
            "license" => ControlRole::License,
            "engine" => ControlRole::Engine,
            "steering" => ControlRole::Steering,
            _ => ControlRole::Unknown,
        }
    }
}

impl fmt::Display for ControlRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ControlRole::License => "license",
            ControlRole::Engine => "engine",
            ControlRole::Steering => "steering",
            ControlRole::Unknown => "unknown",
        })
    }
}

/// Decode the control role from a sign's lines (the marker is line two)
pub fn role_of<S: AsRef<str>>(lines: &[S]) -> ControlRole {
    let Some(marker) = lines.get(1) else {
        return ControlRole::Unknown;
    };

    match marker.as_ref().trim().to_ascii_lowercase().as_str() {
        LICENSE_MARKER => ControlRole::License,
        ENGINE_MARKER => ControlRole::Engine,
        STEERING_MARKER => ControlRole::Steering,
        _ => ControlRole::Unknown,
    }
}

/// Whether the first line carries the vessel sign header
pub fn has_header<S: AsRef<str>>(lines: &[S]) -> bool {
    lines
        .first()
        .is_some_and(|line| line.as_ref().trim() == SIGN_HEADER)
}
