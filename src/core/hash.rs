//! State Hashing for Verification
//!
//! Provides deterministic hashing of level state for:
//! - Replay reconciliation against a transmitted command history
//! - Transcript checkpoints
//! - Map template fingerprints

use sha2::{Digest, Sha256};

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for level state.
///
/// Wraps SHA-256 with helpers for grid types.
/// Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for live level state.
    pub fn for_level_state() -> Self {
        Self::new(b"BLOCK_RUNNER_LEVEL_V1")
    }

    /// Create hasher for a map template.
    pub fn for_map_template() -> Self {
        Self::new(b"BLOCK_RUNNER_MAP_V1")
    }

    /// Create hasher for a command log.
    pub fn for_command_log() -> Self {
        Self::new(b"BLOCK_RUNNER_COMMANDS_V1")
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an i32 value (little-endian).
    #[inline]
    pub fn update_i32(&mut self, value: i32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a grid coordinate.
    #[inline]
    pub fn update_coord(&mut self, x: i32, y: i32) {
        self.update_i32(x);
        self.update_i32(y);
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Update with a display glyph.
    #[inline]
    pub fn update_char(&mut self, value: char) {
        self.update_u32(value as u32);
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute state hash for level verification.
///
/// This function is called by `Level::compute_hash()`.
/// The closure adds level-specific data after the step counter and the
/// template fingerprint.
pub fn compute_level_hash<F>(step: u32, map_fingerprint: &StateHash, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_level_state();

    // Always hash step and template first
    hasher.update_u32(step);
    hasher.update_bytes(map_fingerprint);

    add_state(&mut hasher);

    hasher.finalize()
}
