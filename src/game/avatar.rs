//! Avatar State
//!
//! The player-controlled character. Movement primitives are raw ±1
//! coordinate changes; bounds and collisions are the level's job.

use serde::{Deserialize, Serialize};

use crate::core::direction::Direction;
use crate::core::hash::StateHasher;
use crate::game::cell::{Collidable, Response};
use crate::{DEFAULT_JUMP_SIZE, MAX_HEALTH};

/// Display glyph for the avatar.
pub const AVATAR_GLYPH: char = 'M';

/// State of the avatar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    /// Column
    pub x: i32,
    /// Row (0 is the top)
    pub y: i32,
    /// Cells risen before the jump peaks
    pub jump_size: u32,
    /// Is a jump in progress?
    pub rising: bool,
    /// Cells risen so far in the current jump
    pub rise_duration: u32,
    /// Remaining health
    pub health: u8,
    /// Is the avatar still alive?
    pub alive: bool,
}

impl Avatar {
    /// Create an avatar with default jump size and full health.
    pub const fn new(x: i32, y: i32) -> Self {
        Self::with_stats(x, y, DEFAULT_JUMP_SIZE, MAX_HEALTH)
    }

    /// Create an avatar with explicit jump size and health.
    pub const fn with_stats(x: i32, y: i32, jump_size: u32, health: u8) -> Self {
        Self {
            x,
            y,
            jump_size,
            rising: false,
            rise_duration: 0,
            health,
            alive: true,
        }
    }

    /// Move one column left.
    #[inline]
    pub fn move_left(&mut self) {
        self.x -= 1;
    }

    /// Move one column right.
    #[inline]
    pub fn move_right(&mut self) {
        self.x += 1;
    }

    /// Move one row up.
    #[inline]
    pub fn move_up(&mut self) {
        self.y -= 1;
    }

    /// Move one row down.
    #[inline]
    pub fn move_down(&mut self) {
        self.y += 1;
    }

    /// Apply the movement primitive for a direction.
    ///
    /// `Up` is a jump step, not a bare move.
    pub fn advance(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.jump(),
            Direction::Down => self.move_down(),
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
        }
    }

    /// Rise one cell and count it towards the jump.
    pub fn jump(&mut self) {
        self.rising = true;
        self.move_up();
        self.increment_rise_duration();
    }

    /// Count one risen cell, or reset once the peak is passed.
    ///
    /// A reset to zero signals that the jump peak was reached.
    pub fn increment_rise_duration(&mut self) {
        if self.rising && self.rise_duration < self.jump_size {
            self.rise_duration += 1;
        } else {
            self.rise_duration = 0;
        }
    }

    /// End the jump; gravity takes over on the next tick.
    pub fn stop_rising(&mut self) {
        self.rising = false;
        self.rise_duration = 0;
    }

    /// Has the current jump reached its peak?
    #[inline]
    pub fn at_peak(&self) -> bool {
        self.rise_duration == self.jump_size
    }

    /// Teleport to a cell.
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Hash this avatar's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_coord(self.x, self.y);
        hasher.update_u32(self.jump_size);
        hasher.update_bool(self.rising);
        hasher.update_u32(self.rise_duration);
        hasher.update_u8(self.health);
        hasher.update_bool(self.alive);
    }

    fn take_damage(&mut self) -> Response {
        self.health = self.health.saturating_sub(1);
        if self.health > 0 {
            return Response::ResetPosition;
        }

        self.alive = false;
        Response::Dead
    }
}

impl Collidable for Avatar {
    fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    fn glyph(&self) -> char {
        AVATAR_GLYPH
    }

    fn collision(&mut self, _direction: Direction) -> Response {
        self.take_damage()
    }
}
