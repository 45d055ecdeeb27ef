//! Game Session Management
//!
//! Wraps a single-player [`Level`] with the lifecycle a hosting service
//! needs: a player joins, sends moves, and leaves. Every accepted move is
//! logged so the run can be replayed and verified.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::core::error::GameError;
use crate::game::input::{Command, MoveFrame};
use crate::game::level::{GameState, Level, LevelConfig, StepResult};
use crate::game::map::LevelMap;
use crate::game::replay::MoveLog;
use crate::game::transcript::LevelTranscript;

/// Unique session identifier.
pub type SessionId = [u8; 16];

// =============================================================================
// PLAYER ID
// =============================================================================

/// Unique player identifier (UUID as bytes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub [u8; 16]);

impl PlayerId {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Fresh random identifier.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().into_bytes())
    }

    /// Create from UUID string.
    pub fn from_uuid_str(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s).ok().map(|u| Self(*u.as_bytes()))
    }

    /// Convert to UUID string.
    pub fn to_uuid_string(&self) -> String {
        uuid::Uuid::from_bytes(self.0).to_string()
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uuid_string())
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Session lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// No player yet.
    WaitingForPlayer,
    /// Player joined, level running.
    InProgress,
    /// Level finished or player left.
    Over,
}

/// Configuration for a game session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Tunables for the hosted level.
    pub level: LevelConfig,
}

/// Errors that can occur in session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Session already has a player.
    #[error("Game is full")]
    GameFull,

    /// Player already in this session.
    #[error("Player is already in this game")]
    AlreadyInGame,

    /// Level not running.
    #[error("Game is not in progress")]
    NotInProgress,

    /// Player is not the one in this session.
    #[error("Player is not in this game")]
    PlayerNotInGame,

    /// Wire move outside the vocabulary.
    #[error("Invalid move ({row}, {col})")]
    InvalidMove {
        /// Vertical component
        row: i8,
        /// Horizontal component
        col: i8,
    },

    /// Level rejected the command.
    #[error(transparent)]
    Level(#[from] GameError),
}

/// A single-player game session.
#[derive(Debug)]
pub struct GameSession {
    /// Unique session identifier.
    pub id: SessionId,
    /// Session configuration.
    pub config: SessionConfig,
    status: SessionStatus,
    map: Arc<LevelMap>,
    level: Level,
    player: Option<PlayerId>,
    winner: Option<PlayerId>,
    /// Score as reported to the hosting service.
    score: u32,
    moves: MoveLog,
    transcript: LevelTranscript,
}

impl GameSession {
    /// Create a session hosting a level built from `map`.
    pub fn new(map: impl Into<Arc<LevelMap>>, config: SessionConfig) -> Self {
        let map: Arc<LevelMap> = map.into();
        let level = Level::new(Arc::clone(&map), config.level);
        let transcript = LevelTranscript::new(&map, config.level);

        Self {
            id: uuid::Uuid::new_v4().into_bytes(),
            config,
            status: SessionStatus::WaitingForPlayer,
            score: level.score(),
            map,
            level,
            player: None,
            winner: None,
            moves: MoveLog::new(),
            transcript,
        }
    }

    /// Session on the shipped first level.
    pub fn level_one() -> Self {
        Self::new(LevelMap::level_one(), SessionConfig::default())
    }

    /// Add the player and start the level.
    pub fn join(&mut self, player: PlayerId) -> Result<(), SessionError> {
        match self.player {
            Some(existing) if existing == player => return Err(SessionError::AlreadyInGame),
            Some(_) => return Err(SessionError::GameFull),
            None => {}
        }

        if self.status != SessionStatus::WaitingForPlayer {
            return Err(SessionError::GameFull);
        }

        self.player = Some(player);
        self.status = SessionStatus::InProgress;
        info!("Player {} joined session {}", player, hex::encode(&self.id[..4]));

        Ok(())
    }

    /// Apply a command on behalf of `player`.
    ///
    /// The command is logged only if the level accepts it. A terminal
    /// level ends the session; reaching the goal makes the player the
    /// winner.
    pub fn apply_move(
        &mut self,
        player: PlayerId,
        command: Command,
    ) -> Result<StepResult, SessionError> {
        if self.status != SessionStatus::InProgress {
            warn!("Move {} rejected: session is {:?}", command, self.status);
            return Err(SessionError::NotInProgress);
        }

        if self.player != Some(player) {
            warn!("Move {} rejected: player {} not in game", command, player);
            return Err(SessionError::PlayerNotInGame);
        }

        let result = self.level.apply(command)?;
        self.moves.push(command);
        self.transcript.record(command, &self.level);
        self.score = self.level.score();

        if result.state.is_terminal() {
            self.status = SessionStatus::Over;
            if result.state == GameState::Won {
                self.winner = Some(player);
            }
            self.transcript.finalize(&self.level);

            info!(
                "Session {} over: level {}, score {}",
                hex::encode(&self.id[..4]),
                result.state,
                self.score
            );
        }

        Ok(result)
    }

    /// Apply a wire move on behalf of `player`.
    pub fn apply_wire_move(
        &mut self,
        player: PlayerId,
        frame: MoveFrame,
    ) -> Result<StepResult, SessionError> {
        let command = Command::from_move(frame).ok_or(SessionError::InvalidMove {
            row: frame.row,
            col: frame.col,
        })?;
        self.apply_move(player, command)
    }

    /// Remove the player.
    ///
    /// Leaving mid-level ends the session with no winner and score 0.
    pub fn leave(&mut self, player: PlayerId) -> Result<(), SessionError> {
        if self.player != Some(player) {
            return Err(SessionError::PlayerNotInGame);
        }

        self.player = None;

        if self.status == SessionStatus::InProgress {
            self.status = SessionStatus::Over;
            self.winner = None;
            self.score = 0;
            self.transcript.finalize(&self.level);
            info!("Player {} left; session ended with no winner", player);
        }

        Ok(())
    }

    /// Fresh session on the same template and config.
    pub fn rematch(&self) -> GameSession {
        GameSession::new(Arc::clone(&self.map), self.config)
    }

    /// Current lifecycle status.
    #[inline]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// The hosted level.
    #[inline]
    pub fn level(&self) -> &Level {
        &self.level
    }

    /// The player, if one has joined and not left.
    #[inline]
    pub fn player(&self) -> Option<PlayerId> {
        self.player
    }

    /// The winner, once the goal is reached.
    #[inline]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Reported score.
    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Every accepted command, in order.
    #[inline]
    pub fn moves(&self) -> &MoveLog {
        &self.moves
    }

    /// Transcript of the run.
    #[inline]
    pub fn transcript(&self) -> &LevelTranscript {
        &self.transcript
    }
}
