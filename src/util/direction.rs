//! Eight-way movement directions
//!
//! Maps coordinate deltas onto compass directions and carries the per-direction
//! encodings used by the entity update format.

use serde::{Deserialize, Serialize};

use crate::util::location::Location;

/// Compass direction of a single-tile step, or no movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    NorthWest,
    North,
    NorthEast,
    West,
    East,
    SouthWest,
    South,
    SouthEast,
    /// No movement
    None,
}

impl Direction {
    /// Every direction with a valid step, ordered by id
    pub const MOVING: [Direction; 8] = [
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::West,
        Direction::East,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
    ];

    /// Classify a delta by the sign of each axis. Magnitude is ignored.
    pub fn from_deltas(dx: i32, dy: i32) -> Self {
        match (dx.signum(), dy.signum()) {
            (-1, -1) => Direction::SouthWest,
            (-1, 0) => Direction::West,
            (-1, _) => Direction::NorthWest,
            (0, -1) => Direction::South,
            (0, 0) => Direction::None,
            (0, _) => Direction::North,
            (_, -1) => Direction::SouthEast,
            (_, 0) => Direction::East,
            (_, _) => Direction::NorthEast,
        }
    }

    /// Classify a delta position (height is ignored)
    pub fn from_delta(delta: Location) -> Self {
        Self::from_deltas(delta.x, delta.y)
    }

    /// Look up a direction by its numeric id
    pub fn from_id(id: i32) -> Option<Self> {
        if id == -1 {
            return Some(Direction::None);
        }
        usize::try_from(id)
            .ok()
            .and_then(|i| Self::MOVING.get(i).copied())
    }

    /// Numeric id (-1 for no movement)
    pub fn id(&self) -> i32 {
        match self {
            Direction::NorthWest => 0,
            Direction::North => 1,
            Direction::NorthEast => 2,
            Direction::West => 3,
            Direction::East => 4,
            Direction::SouthWest => 5,
            Direction::South => 6,
            Direction::SouthEast => 7,
            Direction::None => -1,
        }
    }

    /// Unit x movement
    pub fn x(&self) -> i32 {
        match self {
            Direction::NorthWest | Direction::West | Direction::SouthWest => -1,
            Direction::NorthEast | Direction::East | Direction::SouthEast => 1,
            Direction::North | Direction::South | Direction::None => 0,
        }
    }

    /// Unit y movement
    pub fn y(&self) -> i32 {
        match self {
            Direction::NorthWest | Direction::North | Direction::NorthEast => 1,
            Direction::SouthWest | Direction::South | Direction::SouthEast => -1,
            Direction::West | Direction::East | Direction::None => 0,
        }
    }

    /// Reverse direction. `Direction::None` has no opposite.
    pub fn opposite(&self) -> Option<Self> {
        match self {
            Direction::NorthWest => Some(Direction::SouthEast),
            Direction::North => Some(Direction::South),
            Direction::NorthEast => Some(Direction::SouthWest),
            Direction::West => Some(Direction::East),
            Direction::East => Some(Direction::West),
            Direction::SouthWest => Some(Direction::NorthEast),
            Direction::South => Some(Direction::North),
            Direction::SouthEast => Some(Direction::NorthWest),
            Direction::None => None,
        }
    }

    pub fn is_diagonal(&self) -> bool {
        match self {
            Direction::NorthWest
            | Direction::NorthEast
            | Direction::SouthWest
            | Direction::SouthEast => true,
            Direction::North
            | Direction::West
            | Direction::East
            | Direction::South
            | Direction::None => false,
        }
    }

    /// Encoding used by the NPC update block
    pub fn client_value(&self) -> u16 {
        match self {
            Direction::South | Direction::None => 0,
            Direction::SouthWest => 256,
            Direction::West => 512,
            Direction::NorthWest => 768,
            Direction::North => 1024,
            Direction::NorthEast => 1280,
            Direction::East => 1536,
            Direction::SouthEast => 1792,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Direction; 9] = [
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::West,
        Direction::East,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
        Direction::None,
    ];

    #[test]
    fn test_from_deltas_sign_table() {
        assert_eq!(Direction::from_deltas(-1, -1), Direction::SouthWest);
        assert_eq!(Direction::from_deltas(-1, 0), Direction::West);
        assert_eq!(Direction::from_deltas(-1, 1), Direction::NorthWest);
        assert_eq!(Direction::from_deltas(0, -1), Direction::South);
        assert_eq!(Direction::from_deltas(0, 0), Direction::None);
        assert_eq!(Direction::from_deltas(0, 1), Direction::North);
        assert_eq!(Direction::from_deltas(1, -1), Direction::SouthEast);
        assert_eq!(Direction::from_deltas(1, 0), Direction::East);
        assert_eq!(Direction::from_deltas(1, 1), Direction::NorthEast);
    }

    #[test]
    fn test_from_deltas_ignores_magnitude() {
        assert_eq!(Direction::from_deltas(5, 5), Direction::NorthEast);
        assert_eq!(Direction::from_deltas(1, 1), Direction::NorthEast);

        for dx in -20..=20 {
            for dy in -20..=20 {
                assert_eq!(
                    Direction::from_deltas(dx, dy),
                    Direction::from_deltas(dx.signum(), dy.signum())
                );
            }
        }
    }

    #[test]
    fn test_from_deltas_extremes() {
        assert_eq!(Direction::from_deltas(i32::MIN, i32::MAX), Direction::NorthWest);
        assert_eq!(Direction::from_deltas(i32::MAX, i32::MIN), Direction::SouthEast);
        assert_eq!(Direction::from_deltas(0, i32::MIN), Direction::South);
    }

    #[test]
    fn test_from_delta_location() {
        let delta = Location::new(-3, 0, 2);
        assert_eq!(Direction::from_delta(delta), Direction::West);
    }

    #[test]
    fn test_unit_vector_matches_classification() {
        for dir in ALL {
            assert_eq!(Direction::from_deltas(dir.x(), dir.y()), dir);
        }
    }

    #[test]
    fn test_opposite_involution() {
        for dir in Direction::MOVING {
            let opposite = dir.opposite().unwrap();
            assert_ne!(opposite, dir);
            assert_eq!(opposite.opposite(), Some(dir));
            assert_eq!(opposite.x(), -dir.x());
            assert_eq!(opposite.y(), -dir.y());
        }
        assert_eq!(Direction::None.opposite(), None);
    }

    #[test]
    fn test_diagonal_flag() {
        let diagonals: Vec<Direction> = ALL.into_iter().filter(|d| d.is_diagonal()).collect();
        assert_eq!(
            diagonals,
            vec![
                Direction::NorthWest,
                Direction::NorthEast,
                Direction::SouthWest,
                Direction::SouthEast
            ]
        );
        for dir in ALL {
            assert_eq!(dir.is_diagonal(), dir.x() != 0 && dir.y() != 0);
        }
    }

    #[test]
    fn test_ids_round_trip() {
        for dir in ALL {
            assert_eq!(Direction::from_id(dir.id()), Some(dir));
        }
        assert_eq!(Direction::from_id(8), None);
        assert_eq!(Direction::from_id(-2), None);
    }

    #[test]
    fn test_client_values() {
        assert_eq!(Direction::South.client_value(), 0);
        assert_eq!(Direction::North.client_value(), 1024);
        assert_eq!(Direction::SouthEast.client_value(), 1792);
        assert_eq!(Direction::None.client_value(), 0);
    }
}
