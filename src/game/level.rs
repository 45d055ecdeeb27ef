//! Level State Machine
//!
//! A [`Level`] owns the live grid, the avatar, the enemies and static
//! cells derived from its template, the score and the game state. Every
//! command and tick is resolved completely before the next is accepted.
//!
//! ## States
//!
//! ```text
//!            goal reached
//!  Playing ───────────────► Won
//!     │
//!     │ last health lost
//!     └───────────────────► Dead
//! ```
//!
//! `Won` and `Dead` are terminal; only [`Level::restart`] leaves them, and
//! it does so by building a new level from the template.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::direction::Direction;
use crate::core::error::GameError;
use crate::core::hash::{compute_level_hash, StateHash};
use crate::game::avatar::{Avatar, AVATAR_GLYPH};
use crate::game::cell::{Collidable, Response, StaticCell};
use crate::game::enemy::{Enemy, ENEMY_GLYPH};
use crate::game::events::LevelEvent;
use crate::game::input::Command;
use crate::game::map::{LevelMap, TemplateCell};
use crate::{DEFAULT_JUMP_SIZE, MAX_HEALTH, SCORE_MULTIPLIER};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Tunables for a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Cells risen before a jump peaks
    pub jump_size: u32,
    /// Avatar health at construction and restart, clamped to
    /// `1..=MAX_HEALTH`
    pub max_health: u8,
    /// Score per column of best distance
    pub score_multiplier: u32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            jump_size: DEFAULT_JUMP_SIZE,
            max_health: MAX_HEALTH,
            score_multiplier: SCORE_MULTIPLIER,
        }
    }
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Lifecycle state of a level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GameState {
    /// Accepting commands
    #[default]
    Playing = 0,
    /// All health lost
    Dead = 1,
    /// Goal reached
    Won = 2,
}

impl GameState {
    /// Is this a terminal state?
    #[inline]
    pub fn is_terminal(self) -> bool {
        self != GameState::Playing
    }

    /// Lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            GameState::Playing => "playing",
            GameState::Dead => "dead",
            GameState::Won => "won",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// GRID OCCUPANTS
// =============================================================================

/// What sits in a live grid cell.
///
/// Indices point into the level's `blocks` and `enemies` lists, which are
/// fixed in length for the lifetime of the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Occupant {
    /// Index into `blocks`
    Static(usize),
    /// Index into `enemies`
    Enemy(usize),
    /// The avatar
    Avatar,
}

/// The four cells around the avatar. `None` is empty or off-grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Neighbors {
    /// Cell above
    pub up: Option<Occupant>,
    /// Cell below
    pub down: Option<Occupant>,
    /// Cell to the left
    pub left: Option<Occupant>,
    /// Cell to the right
    pub right: Option<Occupant>,
}

impl Neighbors {
    /// Neighbour in a direction.
    #[inline]
    pub fn get(&self, direction: Direction) -> Option<Occupant> {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
}

/// Result of one command or tick.
#[derive(Debug, Default)]
pub struct StepResult {
    /// Events generated this step, in order
    pub events: Vec<LevelEvent>,
    /// State after the step
    pub state: GameState,
}

// =============================================================================
// LEVEL
// =============================================================================

/// A live level built from a [`LevelMap`].
#[derive(Clone, Debug)]
pub struct Level {
    /// Template this level was built from
    map: Arc<LevelMap>,
    /// Cached template fingerprint
    map_fingerprint: StateHash,
    config: LevelConfig,
    width: usize,
    height: usize,
    /// Row-major live grid
    grid: Vec<Option<Occupant>>,
    blocks: Vec<StaticCell>,
    enemies: Vec<Enemy>,
    avatar: Avatar,
    start_pos: (i32, i32),
    score: u32,
    neighbors: Neighbors,
    state: GameState,
    /// Inputs applied so far (ignored ticks excluded)
    step: u32,
}

impl Level {
    /// Build a fresh level from a template.
    pub fn new(map: impl Into<Arc<LevelMap>>, config: LevelConfig) -> Self {
        let map: Arc<LevelMap> = map.into();
        let width = map.width();
        let height = map.height();
        let start_pos = map.avatar_start();

        let mut grid = vec![None; width * height];
        let mut blocks = Vec::new();
        let mut enemies = Vec::new();

        for (x, y, cell) in map.occupied() {
            let occupant = match cell {
                TemplateCell::Static(kind) => {
                    blocks.push(StaticCell::new(x, y, kind));
                    Occupant::Static(blocks.len() - 1)
                }
                TemplateCell::Enemy => {
                    enemies.push(Enemy::new(x, y));
                    Occupant::Enemy(enemies.len() - 1)
                }
                TemplateCell::Avatar => Occupant::Avatar,
            };
            grid[y as usize * width + x as usize] = Some(occupant);
        }

        let avatar = Avatar::with_stats(
            start_pos.0,
            start_pos.1,
            config.jump_size,
            config.max_health.clamp(1, MAX_HEALTH),
        );

        let mut level = Self {
            map_fingerprint: map.fingerprint(),
            map,
            config,
            width,
            height,
            grid,
            blocks,
            enemies,
            avatar,
            start_pos,
            score: 0,
            neighbors: Neighbors::default(),
            state: GameState::Playing,
            step: 0,
        };
        level.score = level.score_at(level.avatar.x);
        level.refresh_neighbors();

        debug!(
            "Level built: {}x{}, {} blocks, {} enemies, start {:?}",
            width,
            height,
            level.blocks.len(),
            level.enemies.len(),
            start_pos
        );

        level
    }

    /// Fresh level on the shipped first map with default tunables.
    pub fn level_one() -> Self {
        Self::new(LevelMap::level_one(), LevelConfig::default())
    }

    /// Build a brand-new level from the same template.
    ///
    /// Enemies come back, the avatar is at the start with full health and
    /// the score is what the start column is worth.
    pub fn restart(&self) -> Level {
        info!("Restarting level (was {}, score {})", self.state, self.score);
        Level::new(Arc::clone(&self.map), self.config)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The avatar.
    #[inline]
    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    /// Enemies, in template row-major order.
    #[inline]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Static cells, in template row-major order.
    #[inline]
    pub fn blocks(&self) -> &[StaticCell] {
        &self.blocks
    }

    /// Current score.
    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Current game state.
    #[inline]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Is the level still accepting commands?
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state == GameState::Playing
    }

    /// Where the avatar started.
    #[inline]
    pub fn start_pos(&self) -> (i32, i32) {
        self.start_pos
    }

    /// Cells around the avatar as of the last refresh.
    #[inline]
    pub fn neighbors(&self) -> &Neighbors {
        &self.neighbors
    }

    /// Template kind of the neighbour in a direction.
    pub fn neighbor_kind(&self, direction: Direction) -> Option<TemplateCell> {
        self.neighbors
            .get(direction)
            .map(|occupant| self.occupant_kind(occupant))
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Inputs applied so far.
    #[inline]
    pub fn step(&self) -> u32 {
        self.step
    }

    /// Template this level was built from.
    #[inline]
    pub fn map(&self) -> &LevelMap {
        &self.map
    }

    /// Tunables.
    #[inline]
    pub fn config(&self) -> LevelConfig {
        self.config
    }

    /// Glyph at `(x, y)`, `None` for an empty cell.
    pub fn glyph_at(&self, x: i32, y: i32) -> Result<Option<char>, GameError> {
        let index = self
            .index(x, y)
            .ok_or(GameError::OutOfBounds { x, y })?;
        Ok(self.grid[index].map(|occupant| self.occupant_glyph(occupant)))
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Apply one command.
    ///
    /// `Tick` follows [`Level::tick`] semantics. Any other command while
    /// the level is terminal fails with
    /// [`GameError::InvalidStateTransition`] and changes nothing.
    pub fn apply(&mut self, command: Command) -> Result<StepResult, GameError> {
        if command.is_tick() {
            return Ok(self.tick());
        }

        self.ensure_playing()?;
        self.step += 1;
        self.refresh_neighbors();

        let mut events = Vec::new();
        match command {
            Command::Right => {
                if self.resolve(Direction::Right, &mut events) {
                    self.update_score_into(&mut events)?;
                }
            }
            Command::Left => {
                self.resolve(Direction::Left, &mut events);
            }
            Command::Up => {
                if !self.avatar.rising && self.grounded() {
                    if self.resolve(Direction::Up, &mut events) {
                        events.push(LevelEvent::JumpStarted);
                    }
                } else {
                    debug!("Jump ignored: not grounded or already rising");
                }
            }
            Command::Unknown => {
                debug!("Unknown command ignored");
            }
            Command::Tick => {}
        }

        Ok(self.finish_step(events))
    }

    /// Apply one gravity tick.
    ///
    /// A no-op (logged) unless the level is playing. While rising the
    /// avatar either peaks or rises one more cell; otherwise it falls one
    /// cell if nothing solid is below.
    pub fn tick(&mut self) -> StepResult {
        if !self.is_playing() {
            debug!("Tick ignored: level is {}", self.state);
            return StepResult {
                events: vec![LevelEvent::TickIgnored],
                state: self.state,
            };
        }

        self.step += 1;
        self.refresh_neighbors();

        let mut events = Vec::new();
        if self.avatar.rising {
            if self.avatar.at_peak() {
                debug!("Jump peaked at y={}", self.avatar.y);
                self.avatar.stop_rising();
                events.push(LevelEvent::PeakReached);
            } else {
                self.resolve(Direction::Up, &mut events);
            }
        } else {
            self.resolve(Direction::Down, &mut events);
        }

        self.finish_step(events)
    }

    /// Raise the score to the value of the avatar's current column.
    ///
    /// Only valid while playing.
    pub fn update_score(&mut self) -> Result<(), GameError> {
        let mut events = Vec::new();
        self.update_score_into(&mut events)
    }

    /// Recompute the four cells around the avatar.
    pub fn refresh_neighbors(&mut self) {
        let (x, y) = (self.avatar.x, self.avatar.y);
        let lookup = |dir: Direction| {
            let (nx, ny) = dir.step(x, y);
            self.index(nx, ny).and_then(|i| self.grid[i])
        };

        let neighbors = Neighbors {
            up: lookup(Direction::Up),
            down: lookup(Direction::Down),
            left: lookup(Direction::Left),
            right: lookup(Direction::Right),
        };
        self.neighbors = neighbors;
    }

    // =========================================================================
    // Collision pipeline
    // =========================================================================

    /// Resolve a move of the avatar in `direction`.
    ///
    /// Returns `true` if the avatar moved into an empty cell.
    fn resolve(&mut self, direction: Direction, events: &mut Vec<LevelEvent>) -> bool {
        let (tx, ty) = direction.step(self.avatar.x, self.avatar.y);
        if self.index(tx, ty).is_none() {
            debug!("Move {} blocked by grid edge", direction);
            self.cancel_move(direction, events);
            return false;
        }

        let occupant = match self.neighbors.get(direction) {
            Some(occupant) => occupant,
            None => {
                self.commit_move(direction, events);
                return true;
            }
        };

        let response = match occupant {
            Occupant::Static(i) => self.blocks[i].collision(direction),
            Occupant::Enemy(i) => self.enemies[i].collision(direction),
            // Only one avatar exists, and it is never its own neighbour
            Occupant::Avatar => Response::Revert,
        };

        match response {
            Response::Revert => self.cancel_move(direction, events),
            Response::EnemyDead => self.remove_enemy(occupant, events),
            Response::Damage => self.damage_avatar(direction, events),
            Response::Win => self.win(events),
            Response::ResetPosition | Response::Dead => {
                debug!("Unexpected {:?} from neighbour, treating as revert", response);
                self.cancel_move(direction, events);
            }
        }

        false
    }

    fn commit_move(&mut self, direction: Direction, events: &mut Vec<LevelEvent>) {
        let from = (self.avatar.x, self.avatar.y);
        self.avatar.advance(direction);
        let to = (self.avatar.x, self.avatar.y);

        self.set_cell(from, None);
        self.set_cell(to, Some(Occupant::Avatar));
        self.refresh_neighbors();

        events.push(LevelEvent::Moved { from, to, direction });
    }

    fn cancel_move(&mut self, direction: Direction, events: &mut Vec<LevelEvent>) {
        if direction == Direction::Up {
            self.avatar.stop_rising();
        }
        events.push(LevelEvent::Blocked { direction });
    }

    /// Clear a stomped enemy's cell. The avatar keeps its own cell.
    fn remove_enemy(&mut self, occupant: Occupant, events: &mut Vec<LevelEvent>) {
        let Occupant::Enemy(i) = occupant else {
            return;
        };

        let (x, y) = (self.enemies[i].x, self.enemies[i].y);
        self.set_cell((x, y), None);
        self.refresh_neighbors();

        debug!("Enemy at ({}, {}) stomped", x, y);
        events.push(LevelEvent::EnemyStomped { x, y });
    }

    fn damage_avatar(&mut self, direction: Direction, events: &mut Vec<LevelEvent>) {
        let outcome = self.avatar.collision(direction);
        events.push(LevelEvent::AvatarDamaged {
            health: self.avatar.health,
        });

        match outcome {
            Response::Dead => self.die(events),
            _ => self.reset_position(events),
        }
    }

    /// Send the avatar back to the start cell. Health and score stay.
    fn reset_position(&mut self, events: &mut Vec<LevelEvent>) {
        let from = (self.avatar.x, self.avatar.y);
        let (sx, sy) = self.start_pos;

        self.set_cell(from, None);
        self.avatar.stop_rising();
        self.avatar.set_position(sx, sy);
        self.set_cell(self.start_pos, Some(Occupant::Avatar));
        self.refresh_neighbors();

        debug!("Avatar reset to start with {} health", self.avatar.health);
        events.push(LevelEvent::PositionReset { x: sx, y: sy });
    }

    fn die(&mut self, events: &mut Vec<LevelEvent>) {
        self.state = GameState::Dead;
        info!("Avatar died. Final score: {}", self.score);
        events.push(LevelEvent::Died { score: self.score });
    }

    fn win(&mut self, events: &mut Vec<LevelEvent>) {
        self.state = GameState::Won;
        info!("Level complete! Final score: {}", self.score);
        events.push(LevelEvent::Won { score: self.score });
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn ensure_playing(&self) -> Result<(), GameError> {
        if self.state.is_terminal() {
            return Err(GameError::InvalidStateTransition {
                state: self.state.as_str(),
            });
        }
        Ok(())
    }

    fn update_score_into(&mut self, events: &mut Vec<LevelEvent>) -> Result<(), GameError> {
        self.ensure_playing()?;

        let candidate = self.score_at(self.avatar.x);
        if candidate > self.score {
            self.score = candidate;
            events.push(LevelEvent::ScoreChanged { score: candidate });
        }
        Ok(())
    }

    fn score_at(&self, x: i32) -> u32 {
        (x.max(0) as u32).saturating_mul(self.config.score_multiplier)
    }

    /// Standing on something that answers a downward probe with `Revert`.
    ///
    /// Peeks at the kind instead of probing, so an enemy underneath is
    /// not stomped by a jump attempt.
    fn grounded(&self) -> bool {
        match self.neighbors.down {
            Some(Occupant::Static(i)) => self.blocks[i].kind.response() == Response::Revert,
            _ => false,
        }
    }

    fn finish_step(&self, events: Vec<LevelEvent>) -> StepResult {
        StepResult {
            events,
            state: self.state,
        }
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    fn set_cell(&mut self, (x, y): (i32, i32), occupant: Option<Occupant>) {
        if let Some(index) = self.index(x, y) {
            self.grid[index] = occupant;
        }
    }

    fn occupant_kind(&self, occupant: Occupant) -> TemplateCell {
        match occupant {
            Occupant::Static(i) => TemplateCell::Static(self.blocks[i].kind),
            Occupant::Enemy(_) => TemplateCell::Enemy,
            Occupant::Avatar => TemplateCell::Avatar,
        }
    }

    fn occupant_glyph(&self, occupant: Occupant) -> char {
        match occupant {
            Occupant::Static(i) => self.blocks[i].glyph(),
            Occupant::Enemy(_) => ENEMY_GLYPH,
            Occupant::Avatar => AVATAR_GLYPH,
        }
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Row-major glyph dump, one newline-terminated line per row.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.grid.chunks(self.width) {
            for cell in row {
                out.push(cell.map_or(' ', |occupant| self.occupant_glyph(occupant)));
            }
            out.push('\n');
        }
        out
    }

    /// Compute hash of current state for replay reconciliation.
    pub fn compute_hash(&self) -> StateHash {
        compute_level_hash(self.step, &self.map_fingerprint, |hasher| {
            for cell in &self.grid {
                hasher.update_char(cell.map_or(' ', |occupant| self.occupant_glyph(occupant)));
            }

            self.avatar.hash_into(hasher);

            for enemy in &self.enemies {
                enemy.hash_into(hasher);
            }

            hasher.update_u32(self.score);
            hasher.update_u8(self.state as u8);
        })
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::cell::StaticKind;

    fn level(rows: &[&str]) -> Level {
        Level::new(LevelMap::from_rows(rows).unwrap(), LevelConfig::default())
    }

    fn pos(level: &Level) -> (i32, i32) {
        (level.avatar().x, level.avatar().y)
    }

    #[test]
    fn test_construction_derives_entities() {
        let level = Level::level_one();

        assert_eq!(level.state(), GameState::Playing);
        assert_eq!(level.start_pos(), (0, 3));
        assert_eq!(level.score(), 0);
        assert_eq!(level.enemies().len(), 1);
        assert_eq!((level.enemies()[0].x, level.enemies()[0].y), (7, 3));
        assert!(level.blocks().iter().all(|b| b.kind != StaticKind::Hazard || b.y == 6));
        assert_eq!(level.neighbor_kind(Direction::Down), Some(TemplateCell::Static(StaticKind::Platform)));
        assert_eq!(level.neighbor_kind(Direction::Left), None);
        assert_eq!(level.neighbor_kind(Direction::Right), None);
    }

    #[test]
    fn test_initial_score_uses_start_column() {
        let level = level(&["  M", "XXX"]);
        assert_eq!(level.score(), 200);
    }

    #[test]
    fn test_right_moves_and_scores() {
        let mut level = Level::level_one();
        let result = level.apply(Command::Right).unwrap();

        assert_eq!(pos(&level), (1, 3));
        assert_eq!(level.score(), 100);
        assert_eq!(
            result.events,
            vec![
                LevelEvent::Moved { from: (0, 3), to: (1, 3), direction: Direction::Right },
                LevelEvent::ScoreChanged { score: 100 },
            ]
        );
        assert_eq!(level.glyph_at(0, 3), Ok(None));
        assert_eq!(level.glyph_at(1, 3), Ok(Some('M')));
    }

    #[test]
    fn test_left_keeps_best_score() {
        let mut level = level(&["M  ", "XXX"]);
        level.apply(Command::Right).unwrap();
        level.apply(Command::Right).unwrap();
        level.apply(Command::Left).unwrap();

        assert_eq!(pos(&level), (1, 0));
        assert_eq!(level.score(), 200);
    }

    #[test]
    fn test_platform_blocks_horizontal_move() {
        let mut level = level(&["MX", "XX"]);
        let result = level.apply(Command::Right).unwrap();

        assert_eq!(pos(&level), (0, 0));
        assert_eq!(result.events, vec![LevelEvent::Blocked { direction: Direction::Right }]);
    }

    #[test]
    fn test_grid_edge_blocks_move() {
        let mut level = level(&["M ", "XX"]);
        let result = level.apply(Command::Left).unwrap();

        assert_eq!(pos(&level), (0, 0));
        assert_eq!(result.events, vec![LevelEvent::Blocked { direction: Direction::Left }]);
    }

    #[test]
    fn test_gravity_rests_on_platform() {
        let mut level = level(&["   ", "   ", "   ", " M ", " X "]);
        let result = level.tick();

        assert_eq!(pos(&level), (1, 3));
        assert_eq!(result.events, vec![LevelEvent::Blocked { direction: Direction::Down }]);
        assert_eq!(level.neighbor_kind(Direction::Down), Some(TemplateCell::Static(StaticKind::Platform)));
    }

    #[test]
    fn test_jump_peak_and_fall() {
        let mut level = level(&["   ", "   ", "   ", " M ", " X "]);

        let result = level.apply(Command::Up).unwrap();
        assert_eq!(pos(&level), (1, 2));
        assert!(level.avatar().rising);
        assert_eq!(level.avatar().rise_duration, 1);
        assert!(result.events.contains(&LevelEvent::JumpStarted));

        let result = level.tick();
        assert_eq!(result.events, vec![LevelEvent::PeakReached]);
        assert!(!level.avatar().rising);
        assert_eq!(level.avatar().rise_duration, 0);
        assert_eq!(pos(&level), (1, 2));

        level.apply(Command::Right).unwrap();
        assert_eq!(pos(&level), (2, 2));

        level.tick();
        assert_eq!(pos(&level), (2, 3));
        level.tick();
        assert_eq!(pos(&level), (2, 4));
        level.tick();
        assert_eq!(pos(&level), (2, 4));
    }

    #[test]
    fn test_higher_jump_keeps_rising() {
        let map = LevelMap::from_rows(&["   ", "   ", " M ", " X "]).unwrap();
        let config = LevelConfig { jump_size: 2, ..LevelConfig::default() };
        let mut level = Level::new(map, config);

        level.apply(Command::Up).unwrap();
        assert_eq!(pos(&level), (1, 1));
        level.tick();
        assert_eq!(pos(&level), (1, 0));
        assert_eq!(level.avatar().rise_duration, 2);
        level.tick();
        assert!(!level.avatar().rising);
        level.tick();
        assert_eq!(pos(&level), (1, 1));
    }

    #[test]
    fn test_ceiling_cancels_jump() {
        let mut level = level(&[" X ", " M ", "XXX"]);
        let result = level.apply(Command::Up).unwrap();

        assert_eq!(pos(&level), (1, 1));
        assert!(!level.avatar().rising);
        assert_eq!(result.events, vec![LevelEvent::Blocked { direction: Direction::Up }]);
    }

    #[test]
    fn test_top_edge_cancels_jump() {
        let mut level = level(&["M", "X"]);
        level.apply(Command::Up).unwrap();

        assert_eq!(pos(&level), (0, 0));
        assert!(!level.avatar().rising);
    }

    #[test]
    fn test_no_jump_in_mid_air() {
        let mut level = level(&["M", " ", "X"]);
        let result = level.apply(Command::Up).unwrap();

        assert_eq!(pos(&level), (0, 0));
        assert!(result.events.is_empty());
    }

    #[test]
    fn test_no_jump_while_rising() {
        let mut level = level(&["   ", "   ", " M ", " X "]);
        level.apply(Command::Up).unwrap();
        level.apply(Command::Up).unwrap();

        assert_eq!(pos(&level), (1, 1));
    }

    #[test]
    fn test_jump_attempt_does_not_stomp_enemy_below() {
        let mut level = level(&["M", "G", "X"]);
        level.apply(Command::Up).unwrap();

        assert_eq!(pos(&level), (0, 0));
        assert!(level.enemies()[0].alive);
        assert_eq!(level.glyph_at(0, 1), Ok(Some('G')));
    }

    #[test]
    fn test_stomp_removes_enemy_and_keeps_avatar_in_place() {
        let mut level = level(&[" M ", " G ", "XXX"]);
        let result = level.tick();

        assert_eq!(result.events, vec![LevelEvent::EnemyStomped { x: 1, y: 1 }]);
        assert!(!level.enemies()[0].alive);
        assert_eq!(level.enemies()[0].health, 0);
        assert_eq!(pos(&level), (1, 0));
        assert_eq!(level.glyph_at(1, 1), Ok(None));
        assert_eq!(level.enemies().len(), 1);

        level.tick();
        assert_eq!(pos(&level), (1, 1));
    }

    #[test]
    fn test_jumping_into_enemy_overhead_damages() {
        let mut level = level(&["  G", "M  ", "XXX"]);
        level.apply(Command::Right).unwrap();
        level.apply(Command::Right).unwrap();
        assert_eq!(pos(&level), (2, 1));

        let result = level.apply(Command::Up).unwrap();

        assert_eq!(
            result.events,
            vec![
                LevelEvent::AvatarDamaged { health: 2 },
                LevelEvent::PositionReset { x: 0, y: 1 },
            ]
        );
        assert_eq!(pos(&level), (0, 1));
        assert!(!level.avatar().rising);
        assert!(level.enemies()[0].alive);
        assert_eq!(level.glyph_at(2, 0), Ok(Some('G')));
        assert_eq!(level.glyph_at(2, 1), Ok(None));
    }

    #[test]
    fn test_pipe_blocks_walk_and_fall() {
        let mut walker = level(&["M P", "XXX"]);
        walker.apply(Command::Right).unwrap();
        let result = walker.apply(Command::Right).unwrap();

        assert_eq!(pos(&walker), (1, 0));
        assert_eq!(result.events, vec![LevelEvent::Blocked { direction: Direction::Right }]);

        let mut faller = level(&["M", " ", "P"]);
        faller.tick();
        assert_eq!(pos(&faller), (0, 1));
        let result = faller.tick();

        assert_eq!(pos(&faller), (0, 1));
        assert_eq!(result.events, vec![LevelEvent::Blocked { direction: Direction::Down }]);

        // A pipe is solid ground to jump from
        let result = faller.apply(Command::Up).unwrap();
        assert_eq!(pos(&faller), (0, 0));
        assert!(result.events.contains(&LevelEvent::JumpStarted));
    }

    #[test]
    fn test_max_health_is_clamped() {
        for (configured, expected) in [(0u8, 1u8), (2, 2), (5, MAX_HEALTH), (u8::MAX, MAX_HEALTH)] {
            let map = LevelMap::from_rows(&["M ", "XX"]).unwrap();
            let config = LevelConfig { max_health: configured, ..LevelConfig::default() };
            let level = Level::new(map, config);
            assert_eq!(level.avatar().health, expected, "max_health {configured}");
            assert_eq!(level.restart().avatar().health, expected);
        }
    }

    #[test]
    fn test_walking_into_enemy_damages() {
        let mut level = level(&["  MG", "XXXX"]);
        level.apply(Command::Right).unwrap();

        assert_eq!(level.avatar().health, 2);
        assert_eq!(pos(&level), (2, 0));
        assert!(level.enemies()[0].alive);
        assert_eq!(level.state(), GameState::Playing);
    }

    #[test]
    fn test_hazard_resets_position() {
        let mut level = level(&["M D", "XXX"]);
        level.apply(Command::Right).unwrap();
        let result = level.apply(Command::Right).unwrap();

        assert_eq!(
            result.events,
            vec![
                LevelEvent::AvatarDamaged { health: 2 },
                LevelEvent::PositionReset { x: 0, y: 0 },
            ]
        );
        assert_eq!(pos(&level), (0, 0));
        assert_eq!(level.avatar().health, 2);
        assert_eq!(level.score(), 100);
        assert_eq!(level.state(), GameState::Playing);
        assert_eq!(level.glyph_at(1, 0), Ok(None));
        assert_eq!(level.glyph_at(0, 0), Ok(Some('M')));
    }

    #[test]
    fn test_falling_onto_hazard_damages() {
        let mut level = level(&["M  ", "X  ", "XDX"]);
        level.apply(Command::Right).unwrap();
        level.tick();
        assert_eq!(pos(&level), (1, 1));
        level.tick();
        assert_eq!(level.avatar().health, 2);
        assert_eq!(pos(&level), (0, 0));
    }

    #[test]
    fn test_last_hit_kills() {
        let mut level = level(&["MD", "XX"]);
        for expected in [2u8, 1] {
            level.apply(Command::Right).unwrap();
            assert_eq!(level.avatar().health, expected);
            assert_eq!(level.state(), GameState::Playing);
        }

        let result = level.apply(Command::Right).unwrap();
        assert_eq!(result.state, GameState::Dead);
        assert_eq!(level.avatar().health, 0);
        assert!(!level.avatar().alive);
        assert!(result.events.contains(&LevelEvent::Died { score: 0 }));
    }

    #[test]
    fn test_goal_wins() {
        let mut level = level(&["M C", "XXX"]);
        level.apply(Command::Right).unwrap();
        let result = level.apply(Command::Right).unwrap();

        assert_eq!(result.state, GameState::Won);
        assert_eq!(result.events, vec![LevelEvent::Won { score: 100 }]);
        assert_eq!(pos(&level), (1, 0));
    }

    #[test]
    fn test_terminal_state_rejects_commands() {
        let mut level = level(&["MC", "XX"]);
        level.apply(Command::Right).unwrap();
        let before = level.compute_hash();

        for cmd in [Command::Right, Command::Left, Command::Up, Command::Unknown] {
            assert_eq!(
                level.apply(cmd).unwrap_err(),
                GameError::InvalidStateTransition { state: "won" }
            );
        }
        assert_eq!(level.update_score(), Err(GameError::InvalidStateTransition { state: "won" }));

        let result = level.apply(Command::Tick).unwrap();
        assert_eq!(result.events, vec![LevelEvent::TickIgnored]);
        assert_eq!(level.compute_hash(), before);
    }

    #[test]
    fn test_unknown_command_is_noop() {
        let mut level = Level::level_one();
        let result = level.apply(Command::Unknown).unwrap();

        assert!(result.events.is_empty());
        assert_eq!(pos(&level), (0, 3));
    }

    #[test]
    fn test_restart_rebuilds_from_template() {
        let mut level = level(&[" M  ", " G D", "XXXX"]);
        level.tick();
        assert!(!level.enemies()[0].alive);
        level.tick();
        level.apply(Command::Right).unwrap();
        level.apply(Command::Right).unwrap();
        assert_eq!(level.avatar().health, 2);

        let fresh = level.restart();
        assert_eq!(fresh.state(), GameState::Playing);
        assert!(fresh.enemies()[0].alive);
        assert_eq!(fresh.glyph_at(1, 1), Ok(Some('G')));
        assert_eq!((fresh.avatar().x, fresh.avatar().y), (1, 0));
        assert_eq!(fresh.avatar().health, 3);
        assert_eq!(fresh.score(), 100);
        assert_eq!(fresh.step(), 0);

        // The old level is untouched
        assert!(!level.enemies()[0].alive);
    }

    #[test]
    fn test_render_level_one() {
        let level = Level::level_one();
        assert_eq!(level.render(), LevelMap::level_one().to_string());
        assert_eq!(level.to_string().lines().count(), 7);
    }

    #[test]
    fn test_glyph_at_out_of_bounds() {
        let level = Level::level_one();
        assert_eq!(level.glyph_at(14, 0), Err(GameError::OutOfBounds { x: 14, y: 0 }));
    }

    #[test]
    fn test_hash_tracks_state() {
        let mut a = Level::level_one();
        let mut b = Level::level_one();
        assert_eq!(a.compute_hash(), b.compute_hash());

        a.apply(Command::Right).unwrap();
        assert_ne!(a.compute_hash(), b.compute_hash());

        b.apply(Command::Right).unwrap();
        assert_eq!(a.compute_hash(), b.compute_hash());
    }
}
