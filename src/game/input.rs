//! Command Vocabulary
//!
//! Commands are the only way into a level besides `restart`. The
//! transport vocabulary is `{up, left, right, tick}`; anything else
//! decodes to [`Command::Unknown`] and is a no-op while playing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step of input for a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Command {
    /// Start a jump (only when grounded)
    Up = 0,
    /// Walk one column left
    Left = 1,
    /// Walk one column right
    Right = 2,
    /// Gravity pulse
    Tick = 3,
    /// Unrecognised input
    Unknown = 255,
}

/// Wire form of a command: `(row, col)` offsets.
///
/// - `(1, 0)`: up
/// - `(0, 1)`: right
/// - `(0, -1)`: left
/// - `(0, 0)`: tick
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveFrame {
    /// Vertical component
    pub row: i8,
    /// Horizontal component
    pub col: i8,
}

impl Command {
    /// Decode a transport token. Never fails.
    pub fn parse(token: &str) -> Self {
        match token {
            "up" => Command::Up,
            "left" => Command::Left,
            "right" => Command::Right,
            "tick" => Command::Tick,
            _ => Command::Unknown,
        }
    }

    /// Transport token for this command.
    pub const fn as_str(self) -> &'static str {
        match self {
            Command::Up => "up",
            Command::Left => "left",
            Command::Right => "right",
            Command::Tick => "tick",
            Command::Unknown => "unknown",
        }
    }

    /// Decode a wire move.
    pub fn from_move(frame: MoveFrame) -> Option<Self> {
        match (frame.row, frame.col) {
            (1, 0) => Some(Command::Up),
            (0, 1) => Some(Command::Right),
            (0, -1) => Some(Command::Left),
            (0, 0) => Some(Command::Tick),
            _ => None,
        }
    }

    /// Encode as a wire move. `Unknown` has no wire form.
    pub fn to_move(self) -> Option<MoveFrame> {
        let (row, col) = match self {
            Command::Up => (1, 0),
            Command::Right => (0, 1),
            Command::Left => (0, -1),
            Command::Tick => (0, 0),
            Command::Unknown => return None,
        };
        Some(MoveFrame { row, col })
    }

    /// Is this the gravity pulse?
    #[inline]
    pub fn is_tick(self) -> bool {
        self == Command::Tick
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vocabulary() {
        assert_eq!(Command::parse("up"), Command::Up);
        assert_eq!(Command::parse("left"), Command::Left);
        assert_eq!(Command::parse("right"), Command::Right);
        assert_eq!(Command::parse("tick"), Command::Tick);
        assert_eq!(Command::parse("down"), Command::Unknown);
        assert_eq!(Command::parse("space"), Command::Unknown);
    }

    #[test]
    fn test_wire_moves() {
        assert_eq!(Command::from_move(MoveFrame { row: 1, col: 0 }), Some(Command::Up));
        assert_eq!(Command::from_move(MoveFrame { row: 0, col: -1 }), Some(Command::Left));
        assert_eq!(Command::from_move(MoveFrame { row: -1, col: 0 }), None);
        assert_eq!(Command::Unknown.to_move(), None);

        for cmd in [Command::Up, Command::Left, Command::Right, Command::Tick] {
            let frame = cmd.to_move().unwrap();
            assert_eq!(Command::from_move(frame), Some(cmd));
        }
    }
}
