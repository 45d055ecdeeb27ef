//! Grid Directions
//!
//! The four canonical probe directions. Row 0 is the top of the grid,
//! so `Up` decrements `y` and `Down` increments it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::GameError;

/// A canonical collision/movement direction.
///
/// The direction names the way the avatar is travelling, so `Down`
/// against an enemy means the avatar arrived from above.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Towards row 0
    Up = 0,
    /// Towards the last row
    Down = 1,
    /// Towards column 0
    Left = 2,
    /// Towards the last column
    Right = 3,
}

impl Direction {
    /// All directions in probe order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit grid delta `(dx, dy)`.
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Canonical token for this direction.
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Parse one of the four canonical tokens.
    pub fn parse(token: &str) -> Result<Self, GameError> {
        match token {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(GameError::InvalidDirection(other.to_string())),
        }
    }

    /// Apply this direction to a coordinate pair.
    #[inline]
    pub fn step(self, x: i32, y: i32) -> (i32, i32) {
        let (dx, dy) = self.delta();
        (x + dx, y + dy)
    }
}

impl FromStr for Direction {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::parse(s)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
