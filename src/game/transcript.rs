//! Level Transcript Recording
//!
//! Records everything needed to re-run a level and check its outcome:
//! the template fingerprint, the config, every command and periodic state
//! hash checkpoints. Verification is a full deterministic replay.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::error::GameError;
use crate::core::hash::StateHash;
use crate::game::input::Command;
use crate::game::level::{GameState, Level, LevelConfig};
use crate::game::map::LevelMap;

/// Current transcript version.
pub const TRANSCRIPT_VERSION: u8 = 1;

/// Checkpoint interval in recorded commands.
pub const CHECKPOINT_INTERVAL: u32 = 10;

/// Errors that can occur with transcripts.
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// Serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization failed.
    #[error("deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Version mismatch.
    #[error("version mismatch: expected {expected}, got {got}")]
    VersionMismatch {
        /// Supported version
        expected: u8,
        /// Version found in the transcript
        got: u8,
    },

    /// Transcript was recorded on a different template.
    #[error("map fingerprint does not match the transcript")]
    MapMismatch,

    /// Transcript has no final result.
    #[error("transcript is incomplete")]
    Incomplete,

    /// Replayed state diverged from the recording.
    #[error("state hash mismatch at step {step}")]
    HashMismatch {
        /// Commands applied when the mismatch was found
        step: u32,
    },

    /// A recorded command was rejected during replay.
    #[error("command {step} rejected during replay: {source}")]
    Rejected {
        /// Index of the rejected command
        step: u32,
        /// Level error
        #[source]
        source: GameError,
    },
}

/// State checkpoint for partial verification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCheckpoint {
    /// Commands applied when the hash was taken.
    pub step: u32,

    /// State hash at this step.
    pub state_hash: StateHash,
}

/// Final level outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelResult {
    /// Commands applied in total.
    pub final_step: u32,

    /// State when recording stopped.
    pub state: GameState,

    /// Score when recording stopped.
    pub score: u32,

    /// Final state hash.
    pub final_state_hash: StateHash,
}

/// Complete record of one level run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTranscript {
    /// Version for forward compatibility.
    pub version: u8,

    /// Fingerprint of the template the run was played on.
    pub map_fingerprint: StateHash,

    /// Tunables the level was built with.
    pub config: LevelConfig,

    /// Every command, ticks included, in order.
    pub commands: Vec<Command>,

    /// State hash checkpoints (every [`CHECKPOINT_INTERVAL`] commands).
    pub checkpoints: Vec<StateCheckpoint>,

    /// Final outcome.
    pub result: Option<LevelResult>,
}

impl LevelTranscript {
    /// Start a transcript for a level built from `map`.
    pub fn new(map: &LevelMap, config: LevelConfig) -> Self {
        Self {
            version: TRANSCRIPT_VERSION,
            map_fingerprint: map.fingerprint(),
            config,
            commands: Vec::new(),
            checkpoints: Vec::new(),
            result: None,
        }
    }

    /// Record a command that was just applied to `level`.
    ///
    /// Takes a checkpoint every [`CHECKPOINT_INTERVAL`] commands.
    pub fn record(&mut self, command: Command, level: &Level) {
        self.commands.push(command);

        let step = self.commands.len() as u32;
        if step % CHECKPOINT_INTERVAL == 0 {
            self.add_checkpoint(step, level.compute_hash());
        }
    }

    /// Record a state checkpoint.
    pub fn add_checkpoint(&mut self, step: u32, state_hash: StateHash) {
        self.checkpoints.push(StateCheckpoint { step, state_hash });
    }

    /// Finalize the transcript with the level's current outcome.
    pub fn finalize(&mut self, level: &Level) {
        self.result = Some(LevelResult {
            final_step: self.commands.len() as u32,
            state: level.state(),
            score: level.score(),
            final_state_hash: level.compute_hash(),
        });
    }

    /// Check if transcript is complete.
    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    /// Serialize to bytes using bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TranscriptError> {
        bincode::serialize(self).map_err(|e| TranscriptError::SerializationFailed(e.to_string()))
    }

    /// Deserialize from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, TranscriptError> {
        let transcript: Self = bincode::deserialize(data)
            .map_err(|e| TranscriptError::DeserializationFailed(e.to_string()))?;

        if transcript.version != TRANSCRIPT_VERSION {
            return Err(TranscriptError::VersionMismatch {
                expected: TRANSCRIPT_VERSION,
                got: transcript.version,
            });
        }

        Ok(transcript)
    }

    /// Verify the transcript by full replay on `map`.
    ///
    /// Every checkpoint and the final result must match. Returns the
    /// replayed final hash.
    pub fn verify(&self, map: impl Into<Arc<LevelMap>>) -> Result<StateHash, TranscriptError> {
        if self.version != TRANSCRIPT_VERSION {
            return Err(TranscriptError::VersionMismatch {
                expected: TRANSCRIPT_VERSION,
                got: self.version,
            });
        }

        let result = self.result.as_ref().ok_or(TranscriptError::Incomplete)?;

        let map: Arc<LevelMap> = map.into();
        if map.fingerprint() != self.map_fingerprint {
            return Err(TranscriptError::MapMismatch);
        }

        let mut level = Level::new(map, self.config);
        let mut checkpoints = self.checkpoints.iter().peekable();

        for (i, &command) in self.commands.iter().enumerate() {
            level
                .apply(command)
                .map_err(|source| TranscriptError::Rejected {
                    step: i as u32,
                    source,
                })?;

            let step = i as u32 + 1;
            while let Some(checkpoint) = checkpoints.next_if(|c| c.step <= step) {
                if checkpoint.step != step || checkpoint.state_hash != level.compute_hash() {
                    debug!("Checkpoint at step {} diverged", checkpoint.step);
                    return Err(TranscriptError::HashMismatch {
                        step: checkpoint.step,
                    });
                }
            }
        }

        if let Some(checkpoint) = checkpoints.next() {
            return Err(TranscriptError::HashMismatch {
                step: checkpoint.step,
            });
        }

        let final_hash = level.compute_hash();
        if result.final_step != self.commands.len() as u32
            || result.final_state_hash != final_hash
            || result.state != level.state()
            || result.score != level.score()
        {
            return Err(TranscriptError::HashMismatch {
                step: result.final_step,
            });
        }

        info!(
            "Transcript verified: {} commands, {} checkpoints, final hash {}",
            self.commands.len(),
            self.checkpoints.len(),
            hex::encode(&final_hash[..8])
        );

        Ok(final_hash)
    }
}
