//! Core deterministic primitives.
//!
//! Directions, errors and state hashing shared by the simulation.
//! Nothing here reads the clock or a random source.

pub mod direction;
pub mod error;
pub mod hash;

// Re-export core types
pub use direction::Direction;
pub use error::GameError;
pub use hash::{compute_level_hash, StateHash, StateHasher};
