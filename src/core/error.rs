//! Simulation Errors
//!
//! Every error is raised synchronously and before any state is mutated.

/// Errors raised by the level simulation and its map template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// A collision probe received a token other than up/down/left/right.
    #[error("Invalid collision direction value: {0:?}")]
    InvalidDirection(String),

    /// A command or score update arrived while the level is terminal.
    #[error("Invalid state transition: level is {state}")]
    InvalidStateTransition {
        /// Name of the state the level was in.
        state: &'static str,
    },

    /// A coordinate lookup fell outside the grid.
    #[error("Coordinate ({x}, {y}) is out of bounds")]
    OutOfBounds {
        /// Requested column.
        x: i32,
        /// Requested row.
        y: i32,
    },

    /// The map template failed validation.
    #[error("Invalid map: {0}")]
    InvalidMap(String),
}
