//! Cardinal Directions
//!
//! Facing, lock orientation and movement axes all use the same four
//! directions. North is screen-up (-Y).

use serde::{Deserialize, Serialize};

use super::vec2::Vec2;

/// One of the four cardinal directions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Screen-up (-Y)
    #[default]
    North = 0,
    /// Screen-right (+X)
    East = 1,
    /// Screen-down (+Y)
    South = 2,
    /// Screen-left (-X)
    West = 3,
}

impl Direction {
    /// All directions in clockwise order starting at North.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Get direction from index (0-3, clockwise from North).
    pub fn from_index(index: u8) -> Option<Direction> {
        match index {
            0 => Some(Direction::North),
            1 => Some(Direction::East),
            2 => Some(Direction::South),
            3 => Some(Direction::West),
            _ => None,
        }
    }

    /// Unit vector pointing this way.
    #[inline]
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::North => Vec2::new(0.0, -1.0),
            Direction::East => Vec2::new(1.0, 0.0),
            Direction::South => Vec2::new(0.0, 1.0),
            Direction::West => Vec2::new(-1.0, 0.0),
        }
    }

    /// The opposite direction.
    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Facing for a displacement: the axis with the larger component wins,
    /// vertical on a tie.
    pub fn dominant(delta: Vec2) -> Direction {
        if delta.x.abs() > delta.y.abs() {
            if delta.x > 0.0 {
                Direction::East
            } else {
                Direction::West
            }
        } else if delta.y > 0.0 {
            Direction::South
        } else {
            Direction::North
        }
    }
}
