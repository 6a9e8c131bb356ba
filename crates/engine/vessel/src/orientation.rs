//! Quarter-turn rotation about the vertical axis
//!
//! Compass conventions follow the host world: North is -Z, East is +X,
//! South is +Z, West is -X. A [`Turn::Left`] maps East to South.

use glam::{DVec3, IVec3};
use serde::{Deserialize, Serialize};

/// Direction of a 90 degree turn about the vertical axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    Left,
    Right,
}

impl Turn {
    /// Sign factor applied to the rotation formula
    pub fn factor(self) -> i32 {
        match self {
            Turn::Left => 1,
            Turn::Right => -1,
        }
    }

    /// Rotate a relative offset in the horizontal plane
    pub fn rotate_offset(self, offset: IVec3) -> IVec3 {
        let f = self.factor();
        IVec3::new(-offset.z * f, offset.y, offset.x * f)
    }

    /// Rotate a voxel coordinate about `origin`, keeping Y
    pub fn rotate_about(self, coord: IVec3, origin: IVec3) -> IVec3 {
        self.rotate_offset(coord - origin) + origin
    }

    /// Rotate a continuous position about the centre of the `origin` voxel
    ///
    /// A point inside voxel `v` ends up inside `rotate_about(v, origin)`.
    pub fn rotate_point_about(self, point: DVec3, origin: IVec3) -> DVec3 {
        let pivot = origin.as_dvec3() + DVec3::new(0.5, 0.0, 0.5);
        let rel = point - pivot;
        let f = self.factor() as f64;
        DVec3::new(-rel.z * f, rel.y, rel.x * f) + pivot
    }

    /// Adjust an entity yaw (degrees, 0 = South, 90 = West) by a quarter turn
    pub fn rotate_yaw(self, yaw: f32) -> f32 {
        wrap_degrees(yaw + 90.0 * self.factor() as f32)
    }
}

/// Wrap an angle into `[-180, 180)`
pub fn wrap_degrees(angle: f32) -> f32 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// Facing attribute of directional blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    North,
    East,
    South,
    West,
    Up,
    Down,
    /// Self-referential facing (points at its own voxel)
    Center,
}

/// The four horizontal facings, clockwise from North
pub const HORIZONTAL_FACINGS: [Facing; 4] =
    [Facing::North, Facing::East, Facing::South, Facing::West];

impl Facing {
    /// Unit offset this facing points along
    pub const fn offset(self) -> IVec3 {
        match self {
            Facing::North => IVec3::NEG_Z,
            Facing::East => IVec3::X,
            Facing::South => IVec3::Z,
            Facing::West => IVec3::NEG_X,
            Facing::Up => IVec3::Y,
            Facing::Down => IVec3::NEG_Y,
            Facing::Center => IVec3::ZERO,
        }
    }

    /// Facing for a unit axis offset
    pub fn from_offset(offset: IVec3) -> Option<Self> {
        match (offset.x, offset.y, offset.z) {
            (0, 0, -1) => Some(Facing::North),
            (1, 0, 0) => Some(Facing::East),
            (0, 0, 1) => Some(Facing::South),
            (-1, 0, 0) => Some(Facing::West),
            (0, 1, 0) => Some(Facing::Up),
            (0, -1, 0) => Some(Facing::Down),
            (0, 0, 0) => Some(Facing::Center),
            _ => None,
        }
    }

    /// North, East, South or West
    pub fn is_horizontal(self) -> bool {
        matches!(
            self,
            Facing::North | Facing::East | Facing::South | Facing::West
        )
    }

    pub fn opposite(self) -> Self {
        match self {
            Facing::North => Facing::South,
            Facing::East => Facing::West,
            Facing::South => Facing::North,
            Facing::West => Facing::East,
            Facing::Up => Facing::Down,
            Facing::Down => Facing::Up,
            Facing::Center => Facing::Center,
        }
    }

    /// Rotate a horizontal facing; vertical and self facings are unchanged
    pub fn rotated(self, turn: Turn) -> Self {
        if !self.is_horizontal() {
            return self;
        }
        Facing::from_offset(turn.rotate_offset(self.offset())).unwrap_or(self)
    }
}

/// Axis attribute of orientable blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockAxis {
    X,
    Y,
    Z,
}

impl BlockAxis {
    /// A quarter turn swaps X and Z; the direction of the turn is irrelevant
    pub fn rotated(self, _turn: Turn) -> Self {
        match self {
            BlockAxis::X => BlockAxis::Z,
            BlockAxis::Y => BlockAxis::Y,
            BlockAxis::Z => BlockAxis::X,
        }
    }
}

/// One of the 16 compass points used by standing signs and banners
///
/// Index 0 is South and indices increase clockwise seen from above
/// (4 = West, 8 = North, 12 = East).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompassPoint(u8);

impl CompassPoint {
    pub const SOUTH: CompassPoint = CompassPoint(0);
    pub const WEST: CompassPoint = CompassPoint(4);
    pub const NORTH: CompassPoint = CompassPoint(8);
    pub const EAST: CompassPoint = CompassPoint(12);

    /// Points per quarter turn
    const QUARTER: u8 = 4;

    pub fn new(index: u8) -> Self {
        CompassPoint(index % 16)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Move one quarter turn around the ring
    pub fn rotated(self, turn: Turn) -> Self {
        match turn {
            Turn::Left => CompassPoint::new(self.0 + Self::QUARTER),
            Turn::Right => CompassPoint::new(self.0 + 16 - Self::QUARTER),
        }
    }

    /// Nearest horizontal facing
    pub fn nearest_facing(self) -> Facing {
        match ((self.0 + 2) / 4) % 4 {
            0 => Facing::South,
            1 => Facing::West,
            2 => Facing::North,
            _ => Facing::East,
        }
    }
}

impl crate::world::Shape {
    /// Rotate every orientation attribute by one quarter turn
    pub fn rotated(self, turn: Turn) -> Self {
        crate::world::Shape {
            facing: self.facing.map(|f| f.rotated(turn)),
            axis: self.axis.map(|a| a.rotated(turn)),
            rotation: self.rotation.map(|r| r.rotated(turn)),
            age: self.age,
        }
    }
}
