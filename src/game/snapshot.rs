//! Level Snapshot
//!
//! Read-only view of a level for rendering and scoring consumers.
//! Serializes to JSON.

use serde::{Deserialize, Serialize};

use crate::game::level::{GameState, Level};

/// Avatar fields a renderer needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarView {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
    /// Remaining health
    pub health: u8,
    /// Still alive?
    pub alive: bool,
    /// Jump in progress?
    pub rising: bool,
}

/// Enemy fields a renderer needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyView {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
    /// Not yet stomped?
    pub alive: bool,
}

/// Point-in-time view of a level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    /// One string per grid row, space for empty cells
    pub glyphs: Vec<String>,
    /// The avatar
    pub avatar: AvatarView,
    /// Every enemy, stomped ones included
    pub enemies: Vec<EnemyView>,
    /// Current score
    pub score: u32,
    /// Lifecycle state
    pub state: GameState,
    /// Commands applied so far
    pub step: u32,
}

impl LevelSnapshot {
    /// Capture the current state of `level`.
    pub fn capture(level: &Level) -> Self {
        let avatar = level.avatar();

        Self {
            glyphs: level.render().lines().map(str::to_owned).collect(),
            avatar: AvatarView {
                x: avatar.x,
                y: avatar.y,
                health: avatar.health,
                alive: avatar.alive,
                rising: avatar.rising,
            },
            enemies: level
                .enemies()
                .iter()
                .map(|e| EnemyView {
                    x: e.x,
                    y: e.y,
                    alive: e.alive,
                })
                .collect(),
            score: level.score(),
            state: level.state(),
            step: level.step(),
        }
    }

    /// Encode as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl Level {
    /// Read-only view of the current state.
    pub fn snapshot(&self) -> LevelSnapshot {
        LevelSnapshot::capture(self)
    }
}
