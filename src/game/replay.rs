//! Deterministic Replay
//!
//! A level is a pure function of its template, its config and the ordered
//! commands applied to it. Replaying the same log always reproduces the
//! same state hash.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::error::GameError;
use crate::core::hash::{StateHash, StateHasher};
use crate::game::input::Command;
use crate::game::level::{Level, LevelConfig};
use crate::game::map::LevelMap;

/// Ordered record of every command applied to a level, ticks included.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveLog {
    commands: Vec<Command>,
}

impl MoveLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command.
    #[inline]
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Commands in the order they were applied.
    #[inline]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Number of recorded commands.
    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Is the log empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Replay the log on a fresh level built from `map`.
    pub fn replay(
        &self,
        map: impl Into<Arc<LevelMap>>,
        config: LevelConfig,
    ) -> Result<Level, GameError> {
        replay_commands(map, config, &self.commands)
    }

    /// Hash of the command sequence.
    pub fn hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_command_log();
        hasher.update_u32(self.commands.len() as u32);
        for command in &self.commands {
            hasher.update_u8(*command as u8);
        }
        hasher.finalize()
    }
}

impl From<Vec<Command>> for MoveLog {
    fn from(commands: Vec<Command>) -> Self {
        Self { commands }
    }
}

/// Feed `commands` into a fresh level built from `map`.
///
/// Stops at the first command the level rejects.
pub fn replay_commands(
    map: impl Into<Arc<LevelMap>>,
    config: LevelConfig,
    commands: &[Command],
) -> Result<Level, GameError> {
    let mut level = Level::new(map, config);

    for &command in commands {
        level.apply(command)?;
    }

    Ok(level)
}
