//! Level Map Templates
//!
//! Immutable grid layouts. A live [`Level`](crate::game::level::Level) is
//! always built from a template, and restarting rebuilds from the same
//! template, so killed enemies come back.
//!
//! Templates are written as glyph rows:
//!
//! | Glyph | Cell     |
//! |-------|----------|
//! | `X`   | Platform |
//! | `D`   | Hazard   |
//! | `C`   | Goal     |
//! | `P`   | Pipe     |
//! | `G`   | Enemy    |
//! | `M`   | Avatar   |
//! | ` `   | Empty    |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::GameError;
use crate::core::hash::{StateHash, StateHasher};
use crate::game::avatar::AVATAR_GLYPH;
use crate::game::cell::StaticKind;
use crate::game::enemy::ENEMY_GLYPH;
use crate::game::input::Command;

/// Glyph rows of the shipped first level.
const LEVEL_ONE_ROWS: [&str; 7] = [
    "             C",
    "             C",
    "   P    XX   C",
    "M XX   G     C",
    "XXXX  XXXXXXXC",
    "XXXX  XXXXXXXX",
    "XXXXDDXXXXXXXX",
];

/// A winning command sequence for level one. Final score 1200.
pub const LEVEL_ONE_ROUTE: &[Command] = &[
    // Hop onto the first wall
    Command::Right,
    Command::Up,
    Command::Right,
    Command::Tick,
    Command::Tick,
    // Clear the pipe and the pit
    Command::Up,
    Command::Right,
    Command::Right,
    Command::Right,
    Command::Right,
    Command::Tick,
    Command::Tick,
    Command::Tick,
    Command::Tick,
    // Stomp the enemy
    Command::Up,
    Command::Right,
    Command::Tick,
    Command::Tick,
    Command::Tick,
    Command::Tick,
    // Run to the goal
    Command::Right,
    Command::Right,
    Command::Right,
    Command::Right,
    Command::Right,
    Command::Right,
];

/// Occupant of a template cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateCell {
    /// Fixed cell
    Static(StaticKind),
    /// Enemy spawn
    Enemy,
    /// Avatar start
    Avatar,
}

impl TemplateCell {
    /// Display glyph.
    pub const fn glyph(self) -> char {
        match self {
            TemplateCell::Static(kind) => kind.glyph(),
            TemplateCell::Enemy => ENEMY_GLYPH,
            TemplateCell::Avatar => AVATAR_GLYPH,
        }
    }

    /// Parse a glyph. `Ok(None)` is an empty cell.
    pub fn from_glyph(glyph: char) -> Result<Option<Self>, GameError> {
        match glyph {
            ' ' => Ok(None),
            ENEMY_GLYPH => Ok(Some(TemplateCell::Enemy)),
            AVATAR_GLYPH => Ok(Some(TemplateCell::Avatar)),
            other => StaticKind::from_glyph(other)
                .map(|kind| Some(TemplateCell::Static(kind)))
                .ok_or_else(|| GameError::InvalidMap(format!("unknown glyph {other:?}"))),
        }
    }
}

/// Immutable, validated level layout.
///
/// Serializes as its glyph rows; deserializing goes through
/// [`LevelMap::from_rows`], so a decoded map is always valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LevelMap {
    width: usize,
    height: usize,
    /// Row-major cells
    cells: Vec<Option<TemplateCell>>,
    avatar_start: (i32, i32),
}

impl LevelMap {
    /// Build a template from glyph rows.
    ///
    /// Rows must be non-empty and of equal length, and exactly one cell
    /// must hold the avatar.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GameError> {
        let height = rows.len();
        if height == 0 {
            return Err(GameError::InvalidMap("map has no rows".to_string()));
        }

        let width = rows[0].as_ref().chars().count();
        if width == 0 {
            return Err(GameError::InvalidMap("map has no columns".to_string()));
        }

        let mut cells = Vec::with_capacity(width * height);
        let mut avatar_start = None;

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let row_width = row.chars().count();
            if row_width != width {
                return Err(GameError::InvalidMap(format!(
                    "row {y} has width {row_width}, expected {width}"
                )));
            }

            for (x, glyph) in row.chars().enumerate() {
                let cell = TemplateCell::from_glyph(glyph)?;
                if cell == Some(TemplateCell::Avatar) {
                    if avatar_start.is_some() {
                        return Err(GameError::InvalidMap("more than one avatar".to_string()));
                    }
                    avatar_start = Some((x as i32, y as i32));
                }
                cells.push(cell);
            }
        }

        let avatar_start =
            avatar_start.ok_or_else(|| GameError::InvalidMap("map has no avatar".to_string()))?;

        Ok(Self {
            width,
            height,
            cells,
            avatar_start,
        })
    }

    /// Build a template from newline-separated glyph rows.
    ///
    /// A single trailing newline is ignored, so the output of
    /// `Level::render()` parses back.
    pub fn parse(text: &str) -> Result<Self, GameError> {
        let text = text.strip_suffix('\n').unwrap_or(text);
        let rows: Vec<&str> = text.split('\n').collect();
        Self::from_rows(&rows)
    }

    /// The shipped first level. Avatar starts at (0, 3).
    pub fn level_one() -> Self {
        Self::from_rows(&LEVEL_ONE_ROWS).expect("built-in level one layout is valid")
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Where the avatar starts.
    #[inline]
    pub fn avatar_start(&self) -> (i32, i32) {
        self.avatar_start
    }

    /// Is `(x, y)` inside the grid?
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Template cell at `(x, y)`.
    pub fn cell(&self, x: i32, y: i32) -> Result<Option<TemplateCell>, GameError> {
        if !self.contains(x, y) {
            return Err(GameError::OutOfBounds { x, y });
        }
        Ok(self.cells[y as usize * self.width + x as usize])
    }

    /// Iterate `(x, y, cell)` over occupied cells in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (i32, i32, TemplateCell)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.map(|c| ((i % width) as i32, (i / width) as i32, c))
        })
    }

    /// Glyph rows, top row first.
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|cell| cell.map_or(' ', TemplateCell::glyph)).collect())
            .collect()
    }

    /// Fingerprint of the layout, bound into every level hash.
    pub fn fingerprint(&self) -> StateHash {
        let mut hasher = StateHasher::for_map_template();
        hasher.update_u32(self.width as u32);
        hasher.update_u32(self.height as u32);
        for cell in &self.cells {
            hasher.update_char(cell.map_or(' ', TemplateCell::glyph));
        }
        hasher.finalize()
    }
}

impl TryFrom<Vec<String>> for LevelMap {
    type Error = GameError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<LevelMap> for Vec<String> {
    fn from(map: LevelMap) -> Self {
        map.rows()
    }
}

impl fmt::Display for LevelMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
