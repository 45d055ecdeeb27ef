//! Game Logic Module
//!
//! All level simulation code. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `cell`: Collision responses, static cells, the `Collidable` probe
//! - `enemy`: Stompable enemies
//! - `avatar`: The player-controlled character
//! - `map`: Immutable level templates
//! - `input`: Command vocabulary and wire form
//! - `events`: Step events for logging and replay
//! - `level`: Level state machine and collision pipeline
//! - `replay`: Deterministic replay of command logs
//! - `transcript`: Recorded runs with checkpoints
//! - `snapshot`: Read-only view for renderers
//! - `session`: Single-player session lifecycle

pub mod avatar;
pub mod cell;
pub mod enemy;
pub mod events;
pub mod input;
pub mod level;
pub mod map;
pub mod replay;
pub mod session;
pub mod snapshot;
pub mod transcript;

// Re-export key types
pub use avatar::Avatar;
pub use cell::{Collidable, Response, StaticCell, StaticKind};
pub use enemy::Enemy;
pub use events::LevelEvent;
pub use input::{Command, MoveFrame};
pub use level::{GameState, Level, LevelConfig, Neighbors, Occupant, StepResult};
pub use map::{LevelMap, TemplateCell};
pub use replay::{replay_commands, MoveLog};
pub use session::{GameSession, PlayerId, SessionConfig, SessionError, SessionStatus};
pub use snapshot::LevelSnapshot;
pub use transcript::{LevelTranscript, TranscriptError};
