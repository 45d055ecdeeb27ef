//! Enemy State
//!
//! Enemies never move. They can only be killed by a stomp, i.e. a probe
//! from an avatar travelling down onto them.

use serde::{Deserialize, Serialize};

use crate::core::direction::Direction;
use crate::core::hash::StateHasher;
use crate::game::cell::{Collidable, Response};

/// Display glyph for enemies.
pub const ENEMY_GLYPH: char = 'G';

/// A stationary enemy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
    /// Current health (1 while alive)
    pub health: u8,
    /// Is the enemy still on the grid?
    pub alive: bool,
}

impl Enemy {
    /// Create a live enemy.
    pub const fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            health: 1,
            alive: true,
        }
    }

    /// Hash this enemy's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_coord(self.x, self.y);
        hasher.update_u8(self.health);
        hasher.update_bool(self.alive);
    }
}

impl Collidable for Enemy {
    fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    fn glyph(&self) -> char {
        ENEMY_GLYPH
    }

    fn collision(&mut self, direction: Direction) -> Response {
        match direction {
            Direction::Down => {
                self.health = 0;
                self.alive = false;
                Response::EnemyDead
            }
            _ => Response::Damage,
        }
    }
}
