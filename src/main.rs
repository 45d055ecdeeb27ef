//! Block Runner Demo
//!
//! Plays level one through a session, verifies the recorded run by
//! replay, then drives a short real-time run with gravity.

use std::time::Duration;

use anyhow::{ensure, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use block_runner::{
    game::{
        events::LevelEvent,
        map::LEVEL_ONE_ROUTE,
        session::{GameSession, PlayerId},
        transcript::LevelTranscript,
    },
    spawn_level, Command, DriverConfig, Level, LevelConfig, LevelMap, DEFAULT_TICK_RATE,
    MAX_HEALTH, VERSION,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Block Runner v{}", VERSION);
    info!("Gravity: {} tick/s, health: {}", DEFAULT_TICK_RATE, MAX_HEALTH);

    demo_session()?;
    demo_driver().await?;

    Ok(())
}

/// Play the scripted route and verify it two ways.
fn demo_session() -> Result<()> {
    info!("=== Playing Level One ===");

    let mut session = GameSession::level_one();
    let player = PlayerId::random();
    session.join(player)?;

    for &command in LEVEL_ONE_ROUTE {
        let result = session.apply_move(player, command)?;

        for event in &result.events {
            match event {
                LevelEvent::EnemyStomped { x, y } => info!("Stomped enemy at ({}, {})", x, y),
                LevelEvent::AvatarDamaged { health } => info!("Hit! Health left: {}", health),
                LevelEvent::Won { score } => info!("Goal reached with score {}", score),
                LevelEvent::Died { score } => info!("Died with score {}", score),
                _ => {}
            }
        }
    }

    let level = session.level();
    info!("Final grid:\n{}", level);
    info!("Status: {:?}, score: {}", session.status(), session.score());

    let hash = level.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));
    info!("Snapshot: {}", level.snapshot().to_json()?);

    info!("=== Verifying Transcript ===");
    let bytes = session.transcript().to_bytes()?;
    let transcript = LevelTranscript::from_bytes(&bytes)?;
    let verified = transcript
        .verify(LevelMap::level_one())
        .context("transcript verification failed")?;
    info!("Transcript: {} bytes, hash {}", bytes.len(), hex::encode(verified));

    info!("=== Verifying Determinism ===");
    let replayed = session
        .moves()
        .replay(LevelMap::level_one(), LevelConfig::default())?;
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    ensure!(hash == replay_hash, "DETERMINISM FAILURE: hashes differ");
    info!("DETERMINISM VERIFIED: Hashes match!");

    Ok(())
}

/// Drive level one in real time for a moment and replay the result.
async fn demo_driver() -> Result<()> {
    info!("=== Real-Time Run ===");

    let config = DriverConfig { tick_rate: 20 };
    let (tx, handle) = spawn_level(Level::level_one(), config);

    for command in [Command::Right, Command::Up, Command::Right] {
        tx.send(command).await?;
    }
    tokio::time::sleep(Duration::from_millis(300)).await;
    drop(tx);

    let outcome = handle.await?;
    info!(
        "Driven run stopped after {} commands at ({}, {})",
        outcome.moves.len(),
        outcome.level.avatar().x,
        outcome.level.avatar().y
    );

    let replayed = outcome
        .moves
        .replay(LevelMap::level_one(), LevelConfig::default())?;
    ensure!(
        replayed.compute_hash() == outcome.level.compute_hash(),
        "driven run did not replay"
    );
    info!("Driven run replays exactly");

    Ok(())
}
