//! Control surfaces: the license, engine and steering signs of a vessel
//!
//! Surfaces are plain values holding a coordinate. The tag store carries
//! the reverse lookup (voxel -> vessel name, voxel -> role) so the input
//! layer can resolve a clicked sign without walking any vessel.

use crate::classifier::ControlRole;
use crate::error::{Error, Result};
use crate::orientation::{Facing, Turn};
use crate::world::{TagStore, VoxelSnapshot};
use glam::IVec3;
use serde::{Deserialize, Serialize};

/// Tag key holding the owning vessel's name
pub const NAME_TAG: &str = "vessel:name";

/// Tag key holding the control role of a sign voxel
pub const CONTROL_TAG: &str = "vessel:control";

/// Anchor of the vessel; its position is the rotation pivot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub coord: IVec3,
}

/// Propulsion sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engine {
    pub coord: IVec3,
    /// Voxels per forward move, always in `[1, max_velocity]`
    pub velocity: u32,
    /// Direction of forward travel
    pub heading: Facing,
}

impl Engine {
    /// New engine at velocity 1, heading away from the sign text
    pub fn new(coord: IVec3, sign: &VoxelSnapshot) -> Result<Self> {
        Ok(Engine {
            coord,
            velocity: 1,
            heading: Self::heading_from(coord, sign)?,
        })
    }

    /// Forward heading of an engine sign
    ///
    /// The vessel travels away from the side the sign's text faces.
    /// Wall signs use their facing, standing signs the nearest cardinal
    /// point of their rotation.
    pub fn heading_from(coord: IVec3, sign: &VoxelSnapshot) -> Result<Facing> {
        let facing = match (sign.shape.facing, sign.shape.rotation) {
            (Some(facing), _) if facing.is_horizontal() => facing,
            (_, Some(rotation)) => rotation.nearest_facing(),
            _ => return Err(Error::UnorientedEngine(coord)),
        };
        Ok(facing.opposite())
    }

    /// Translation applied by one forward move
    pub fn delta(&self) -> IVec3 {
        self.heading.offset() * self.velocity as i32
    }

    /// Raise velocity by one, clamped to `max_velocity`
    pub fn increment_velocity(&mut self, max_velocity: u32) -> u32 {
        self.velocity = (self.velocity + 1).min(max_velocity.max(1));
        self.velocity
    }

    /// Lower velocity by one, never below 1
    pub fn decrement_velocity(&mut self) -> u32 {
        self.velocity = self.velocity.saturating_sub(1).max(1);
        self.velocity
    }
}

/// Helm sign that turns the vessel one way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Steering {
    pub coord: IVec3,
    pub side: Turn,
}

impl Steering {
    /// Build from the sign's direction marker (`<` = left, `>` = right)
    pub fn new(coord: IVec3, marker: &str) -> Result<Self> {
        let side = match marker.trim() {
            "<" => Turn::Left,
            ">" => Turn::Right,
            other => return Err(Error::InvalidSteeringMarker(other.to_string())),
        };
        Ok(Steering { coord, side })
    }
}

/// All control surfaces of one vessel
///
/// At most one engine, and at most one steering sign per side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlSurfaces {
    pub license: License,
    pub engine: Option<Engine>,
    pub steering: Vec<Steering>,
}

impl ControlSurfaces {
    /// Surfaces of a freshly licensed vessel: no engine, no steering
    pub fn new(license: IVec3) -> Self {
        ControlSurfaces {
            license: License { coord: license },
            engine: None,
            steering: Vec::new(),
        }
    }

    /// Steering sign at a coordinate
    pub fn steering_at(&self, coord: IVec3) -> Option<&Steering> {
        self.steering.iter().find(|s| s.coord == coord)
    }

    /// Steering sign for a side
    pub fn steering_for(&self, side: Turn) -> Option<&Steering> {
        self.steering.iter().find(|s| s.side == side)
    }

    /// Role of the surface registered at a coordinate
    pub fn surface_at(&self, coord: IVec3) -> Option<ControlRole> {
        self.roles()
            .into_iter()
            .find(|(c, _)| *c == coord)
            .map(|(_, role)| role)
    }

    /// Every control coordinate with its role
    pub fn roles(&self) -> Vec<(IVec3, ControlRole)> {
        let mut roles = vec![(self.license.coord, ControlRole::License)];
        if let Some(engine) = &self.engine {
            roles.push((engine.coord, ControlRole::Engine));
        }
        roles.extend(self.steering.iter().map(|s| (s.coord, ControlRole::Steering)));
        roles
    }

    /// Move every control surface through `map`, rewriting role tags
    ///
    /// All old tags are removed before any new one is written so that a
    /// surface landing on another surface's old coordinate keeps its tag.
    pub fn relocate<T: TagStore + ?Sized>(&mut self, tags: &mut T, map: impl Fn(IVec3) -> IVec3) {
        for (coord, _) in self.roles() {
            tags.untag(coord, CONTROL_TAG);
        }

        self.license.coord = map(self.license.coord);
        if let Some(engine) = &mut self.engine {
            engine.coord = map(engine.coord);
        }
        for steering in &mut self.steering {
            steering.coord = map(steering.coord);
        }

        for (coord, role) in self.roles() {
            write_role_tag(tags, coord, role);
        }
    }
}

/// Write the control tag for a role
pub(crate) fn write_role_tag<T: TagStore + ?Sized>(tags: &mut T, coord: IVec3, role: ControlRole) {
    if let Some(value) = role.tag_value() {
        tags.tag(coord, CONTROL_TAG, value);
    }
}

/// Read the control role tagged at a coordinate
pub fn role_at<T: TagStore + ?Sized>(tags: &T, coord: IVec3) -> Option<ControlRole> {
    tags.get_tag(coord, CONTROL_TAG)
        .map(|value| ControlRole::from_tag_value(&value))
}

/// Read the owning vessel's name tagged at a coordinate
pub fn vessel_name_at<T: TagStore + ?Sized>(tags: &T, coord: IVec3) -> Option<String> {
    tags.get_tag(coord, NAME_TAG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::CompassPoint;

    #[test]
    fn test_engine_heading_from_wall_sign() {
        let sign = VoxelSnapshot::of("oak_wall_sign").facing(Facing::East);
        let engine = Engine::new(IVec3::ZERO, &sign).unwrap();

        assert_eq!(engine.heading, Facing::West);
        assert_eq!(engine.velocity, 1);
        assert_eq!(engine.delta(), IVec3::NEG_X);
    }

    #[test]
    fn test_engine_heading_from_standing_sign() {
        let sign = VoxelSnapshot::of("oak_sign").rotation(CompassPoint::new(7));
        let heading = Engine::heading_from(IVec3::ZERO, &sign).unwrap();
        // 7 rounds to North, so travel is South
        assert_eq!(heading, Facing::South);
    }

    #[test]
    fn test_unoriented_engine_rejected() {
        let sign = VoxelSnapshot::of("oak_sign").facing(Facing::Up);
        assert!(matches!(
            Engine::new(IVec3::ONE, &sign),
            Err(Error::UnorientedEngine(c)) if c == IVec3::ONE
        ));
    }

    #[test]
    fn test_velocity_clamp() {
        let sign = VoxelSnapshot::of("oak_wall_sign").facing(Facing::North);
        let mut engine = Engine::new(IVec3::ZERO, &sign).unwrap();

        for _ in 0..20 {
            engine.increment_velocity(10);
        }
        assert_eq!(engine.velocity, 10);
        assert_eq!(engine.delta(), IVec3::new(0, 0, 10));

        for _ in 0..20 {
            engine.decrement_velocity();
        }
        assert_eq!(engine.velocity, 1);
    }

    #[test]
    fn test_steering_markers() {
        assert_eq!(Steering::new(IVec3::ZERO, "<").unwrap().side, Turn::Left);
        assert_eq!(Steering::new(IVec3::ZERO, " > ").unwrap().side, Turn::Right);
        assert!(matches!(
            Steering::new(IVec3::ZERO, "@"),
            Err(Error::InvalidSteeringMarker(m)) if m == "@"
        ));
    }

    #[test]
    fn test_roles_listing() {
        let mut controls = ControlSurfaces::new(IVec3::ZERO);
        controls.steering.push(Steering {
            coord: IVec3::X,
            side: Turn::Right,
        });

        let roles = controls.roles();
        assert_eq!(roles.len(), 2);
        assert_eq!(roles[0], (IVec3::ZERO, ControlRole::License));
        assert_eq!(roles[1], (IVec3::X, ControlRole::Steering));
        assert_eq!(controls.steering_at(IVec3::X).map(|s| s.side), Some(Turn::Right));
        assert!(controls.steering_for(Turn::Left).is_none());
        assert_eq!(controls.surface_at(IVec3::ZERO), Some(ControlRole::License));
        assert_eq!(controls.surface_at(IVec3::X), Some(ControlRole::Steering));
        assert_eq!(controls.surface_at(IVec3::Y), None);
    }
}
