//! Gravity Driver
//!
//! Runs a level in real time: external commands arrive on a channel and
//! gravity ticks fire on a fixed cadence. Both are applied to the level
//! one at a time, in arrival order, and logged so the run can be replayed.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::game::input::Command;
use crate::game::level::Level;
use crate::game::replay::MoveLog;
use crate::DEFAULT_TICK_RATE;

/// Capacity of the command channel created by [`spawn_level`].
pub const COMMAND_BUFFER: usize = 64;

/// Driver configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Gravity ticks per second.
    pub tick_rate: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
        }
    }
}

impl DriverConfig {
    /// Time between gravity ticks.
    pub fn tick_duration(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.tick_rate.max(1) as u64)
    }
}

/// What a finished run leaves behind.
#[derive(Debug)]
pub struct DriverOutcome {
    /// Level as it was when the run stopped.
    pub level: Level,
    /// Every applied command, ticks included.
    pub moves: MoveLog,
}

/// Drive `level` until it is terminal or `commands` closes.
///
/// Commands that are already queued are applied before a due tick.
pub async fn run_level(
    mut level: Level,
    mut commands: mpsc::Receiver<Command>,
    config: DriverConfig,
) -> DriverOutcome {
    let tick_duration = config.tick_duration();
    let mut tick_interval = interval_at(Instant::now() + tick_duration, tick_duration);
    tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut moves = MoveLog::new();

    info!("Driver started at {} ticks/s", config.tick_rate);

    while level.is_playing() {
        tokio::select! {
            biased;

            received = commands.recv() => {
                let Some(command) = received else {
                    info!("Command channel closed");
                    break;
                };

                match level.apply(command) {
                    Ok(result) => {
                        moves.push(command);
                        debug!("Applied {}: {:?}", command, result.events);
                    }
                    Err(e) => warn!("Command {} rejected: {}", command, e),
                }
            }

            _ = tick_interval.tick() => {
                let result = level.tick();
                moves.push(Command::Tick);
                debug!("Tick: {:?}", result.events);
            }
        }
    }

    info!(
        "Driver stopped: level {}, score {}, {} commands",
        level.state(),
        level.score(),
        moves.len()
    );

    DriverOutcome { level, moves }
}

/// Spawn [`run_level`] on the current runtime.
///
/// Returns the command sender and the handle of the running level.
pub fn spawn_level(
    level: Level,
    config: DriverConfig,
) -> (mpsc::Sender<Command>, JoinHandle<DriverOutcome>) {
    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    let handle = tokio::spawn(run_level(level, rx, config));
    (tx, handle)
}
