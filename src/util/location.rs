use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::util::direction::Direction;

/// Tile position in the world (x, y, height level)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Location {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Location {
    pub const ORIGIN: Location = Location { x: 0, y: 0, z: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Ground-level location
    #[inline]
    pub const fn ground(x: i32, y: i32) -> Self {
        Self { x, y, z: 0 }
    }

    /// Delta from `other` to `self` on the same plane
    pub fn delta(&self, other: Location) -> Location {
        Location::new(self.x - other.x, self.y - other.y, 0)
    }

    /// Direction a walker at `other` would step to approach `self`
    pub fn direction_from(&self, other: Location) -> Direction {
        Direction::from_delta(self.delta(other))
    }

    /// Translate by one tile in `direction`
    pub fn step(&self, direction: Direction) -> Location {
        Location::new(self.x + direction.x(), self.y + direction.y(), self.z)
    }

    /// Chebyshev distance, ignoring height
    pub fn distance_to(&self, other: Location) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

impl Add for Location {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z,
        }
    }
}

impl Sub for Location {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.delta(rhs)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
