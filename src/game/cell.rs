//! Cells and Collision Responses
//!
//! A cell is one positioned entity on the grid. Static cells answer every
//! probe with the response fixed by their kind; characters (avatar,
//! enemy) run their own logic behind the same [`Collidable`] probe.

use serde::{Deserialize, Serialize};

use crate::core::direction::Direction;
use crate::core::error::GameError;

// =============================================================================
// COLLISION RESPONSE
// =============================================================================

/// Outcome of probing a cell from a direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Response {
    /// Move is cancelled; avatar keeps its cell
    Revert = 0,
    /// Avatar takes one point of damage
    Damage = 1,
    /// Level completed
    Win = 2,
    /// Enemy was stomped from above
    EnemyDead = 3,
    /// Avatar survived a hit and returns to the start cell
    ResetPosition = 4,
    /// Avatar lost its last point of health
    Dead = 5,
}

// =============================================================================
// STATIC CELLS
// =============================================================================

/// Kind of a fixed, non-damageable cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum StaticKind {
    /// Solid ground
    Platform = 0,
    /// Damages on contact
    Hazard = 1,
    /// Completes the level
    Goal = 2,
    /// Solid, drawn differently from platforms
    Pipe = 3,
}

impl StaticKind {
    /// Display glyph.
    pub const fn glyph(self) -> char {
        match self {
            StaticKind::Platform => 'X',
            StaticKind::Hazard => 'D',
            StaticKind::Goal => 'C',
            StaticKind::Pipe => 'P',
        }
    }

    /// Kind for a display glyph.
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            'X' => Some(StaticKind::Platform),
            'D' => Some(StaticKind::Hazard),
            'C' => Some(StaticKind::Goal),
            'P' => Some(StaticKind::Pipe),
            _ => None,
        }
    }

    /// The response assigned to this kind.
    pub const fn response(self) -> Response {
        match self {
            StaticKind::Platform | StaticKind::Pipe => Response::Revert,
            StaticKind::Hazard => Response::Damage,
            StaticKind::Goal => Response::Win,
        }
    }
}

/// Collision of a static cell. Direction does not change the answer.
#[inline]
pub fn static_collision(kind: StaticKind, _direction: Direction) -> Response {
    kind.response()
}

/// A positioned static cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticCell {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
    /// Fixed for the cell's lifetime
    pub kind: StaticKind,
}

impl StaticCell {
    /// Create a static cell.
    pub const fn new(x: i32, y: i32, kind: StaticKind) -> Self {
        Self { x, y, kind }
    }

    /// Solid platform.
    pub const fn platform(x: i32, y: i32) -> Self {
        Self::new(x, y, StaticKind::Platform)
    }

    /// Damaging hazard.
    pub const fn hazard(x: i32, y: i32) -> Self {
        Self::new(x, y, StaticKind::Hazard)
    }

    /// Level goal.
    pub const fn goal(x: i32, y: i32) -> Self {
        Self::new(x, y, StaticKind::Goal)
    }

    /// Pipe segment.
    pub const fn pipe(x: i32, y: i32) -> Self {
        Self::new(x, y, StaticKind::Pipe)
    }
}

// =============================================================================
// COLLISION PROBE
// =============================================================================

/// Something that sits on the grid and answers collision probes.
pub trait Collidable {
    /// Grid position `(x, y)`.
    fn position(&self) -> (i32, i32);

    /// Display glyph.
    fn glyph(&self) -> char;

    /// Resolve a collision from a canonical direction.
    fn collision(&mut self, direction: Direction) -> Response;

    /// Resolve a collision from a raw token.
    ///
    /// Fails with [`GameError::InvalidDirection`] before touching any
    /// state if the token is not canonical.
    fn probe(&mut self, token: &str) -> Result<Response, GameError> {
        let direction = Direction::parse(token)?;
        Ok(self.collision(direction))
    }
}

impl Collidable for StaticCell {
    fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    fn glyph(&self) -> char {
        self.kind.glyph()
    }

    fn collision(&mut self, direction: Direction) -> Response {
        static_collision(self.kind, direction)
    }
}
