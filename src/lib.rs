//! # Block Runner
//!
//! Deterministic grid platformer engine: a single avatar walks, jumps and
//! falls through a 2D cell grid, stomps enemies, avoids hazards and
//! reaches the goal.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       BLOCK RUNNER                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Deterministic primitives                 │
//! │  ├── direction.rs - Canonical probe directions               │
//! │  ├── error.rs     - Level errors                             │
//! │  └── hash.rs      - State hashing for verification           │
//! │                                                              │
//! │  game/            - Level logic (deterministic)              │
//! │  ├── cell.rs      - Responses, static cells, probe trait     │
//! │  ├── enemy.rs     - Stompable enemies                        │
//! │  ├── avatar.rs    - Player character                         │
//! │  ├── map.rs       - Immutable level templates                │
//! │  ├── input.rs     - Command vocabulary                       │
//! │  ├── level.rs     - State machine and collision pipeline     │
//! │  ├── replay.rs    - Command log replay                       │
//! │  ├── transcript.rs- Recorded runs with checkpoints           │
//! │  ├── snapshot.rs  - Read-only view for renderers             │
//! │  └── session.rs   - Single-player session lifecycle          │
//! │                                                              │
//! │  driver.rs        - Real-time gravity (non-deterministic)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic**:
//! - Integer grid coordinates only
//! - No system time dependencies
//! - No randomness in level logic
//! - One command or tick is resolved completely before the next
//!
//! Given the same template, config and command sequence, a level always
//! reaches the same state and the same state hash.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod driver;
pub mod game;

// Re-export commonly used types
pub use crate::core::direction::Direction;
pub use crate::core::error::GameError;
pub use crate::core::hash::StateHash;
pub use crate::driver::{run_level, spawn_level, DriverConfig, DriverOutcome};
pub use crate::game::input::Command;
pub use crate::game::level::{GameState, Level, LevelConfig, StepResult};
pub use crate::game::map::LevelMap;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default gravity rate (ticks per second)
pub const DEFAULT_TICK_RATE: u32 = 1;

/// Avatar health at the start of a level
pub const MAX_HEALTH: u8 = 3;

/// Score per column of best distance
pub const SCORE_MULTIPLIER: u32 = 100;

/// Cells risen before a jump peaks
pub const DEFAULT_JUMP_SIZE: u32 = 1;
