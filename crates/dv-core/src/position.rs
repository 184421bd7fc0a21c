//! Integer lattice positions

use core::fmt;
use core::ops::Add;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;

/// A point on the room lattice
///
/// +x is east, +y is north, +z is up. Rooms occupy lattice points; the
/// registry guarantees at most one room per point.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    /// The origin room's position
    pub const ORIGIN: Position = Position { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The neighboring position one step in the given direction
    pub const fn step(&self, dir: Direction) -> Self {
        let (dx, dy, dz) = dir.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Component-wise difference `self - other`
    pub const fn offset_from(&self, other: &Position) -> (i32, i32, i32) {
        (self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Add<Direction> for Position {
    type Output = Position;

    fn add(self, dir: Direction) -> Position {
        self.step(dir)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
