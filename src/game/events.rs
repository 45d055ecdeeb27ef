//! Level Events
//!
//! Events generated by each step, in the order they happened.
//! Used for logging, session bookkeeping and replay comparison.

use serde::{Deserialize, Serialize};

use crate::core::direction::Direction;

/// Something that happened during one command or tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelEvent {
    /// Avatar moved to an empty cell
    Moved {
        /// Cell left
        from: (i32, i32),
        /// Cell entered
        to: (i32, i32),
        /// Direction of travel
        direction: Direction,
    },

    /// Move cancelled by a solid cell or the grid edge
    Blocked {
        /// Direction of the cancelled move
        direction: Direction,
    },

    /// Jump started from solid ground
    JumpStarted,

    /// Jump reached its peak; falling starts next tick
    PeakReached,

    /// Enemy at `(x, y)` was stomped
    EnemyStomped {
        /// Column
        x: i32,
        /// Row
        y: i32,
    },

    /// Avatar was hit
    AvatarDamaged {
        /// Health left after the hit
        health: u8,
    },

    /// Avatar sent back to the start cell
    PositionReset {
        /// Start column
        x: i32,
        /// Start row
        y: i32,
    },

    /// Avatar lost its last point of health
    Died {
        /// Final score
        score: u32,
    },

    /// Goal reached
    Won {
        /// Final score
        score: u32,
    },

    /// Best distance improved
    ScoreChanged {
        /// New score
        score: u32,
    },

    /// Tick arrived while the level was not playing
    TickIgnored,
}

impl LevelEvent {
    /// Does this event end the level?
    pub fn is_terminal(&self) -> bool {
        matches!(self, LevelEvent::Died { .. } | LevelEvent::Won { .. })
    }
}
