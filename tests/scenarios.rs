//! End-to-end level scenarios.

use block_runner::game::events::LevelEvent;
use block_runner::game::map::LEVEL_ONE_ROUTE;
use block_runner::game::session::{GameSession, PlayerId, SessionStatus};
use block_runner::game::transcript::LevelTranscript;
use block_runner::{Command, GameError, GameState, Level, LevelConfig, LevelMap};

fn level(rows: &[&str]) -> Level {
    Level::new(LevelMap::from_rows(rows).unwrap(), LevelConfig::default())
}

fn pos(level: &Level) -> (i32, i32) {
    (level.avatar().x, level.avatar().y)
}

#[test]
fn test_scenario_a_walk_right_scores() {
    let mut level = Level::level_one();
    assert_eq!(pos(&level), (0, 3));

    level.apply(Command::Right).unwrap();

    assert_eq!(pos(&level), (1, 3));
    assert_eq!(level.score(), 100);
}

#[test]
fn test_scenario_b_hazard_sends_back_to_start() {
    let mut level = level(&["   ", "M D", "XXX"]);
    level.tick();
    level.apply(Command::Right).unwrap();
    assert_eq!(pos(&level), (1, 1));

    level.apply(Command::Right).unwrap();

    assert_eq!(level.avatar().health, 2);
    assert_eq!(pos(&level), level.start_pos());
    assert_eq!(level.state(), GameState::Playing);
    assert_eq!(level.score(), 100);
}

#[test]
fn test_scenario_c_stomp_from_above() {
    let mut level = level(&["  M  ", "  G  ", "XXXXX"]);

    let result = level.tick();

    assert!(result.events.contains(&LevelEvent::EnemyStomped { x: 2, y: 1 }));
    assert!(!level.enemies()[0].alive);
    assert_eq!(pos(&level), (2, 0));
    assert_eq!(level.glyph_at(2, 1), Ok(None));
}

#[test]
fn test_scenario_d_goal_is_terminal() {
    let mut level = Level::level_one();
    for &command in LEVEL_ONE_ROUTE {
        level.apply(command).unwrap();
    }

    assert_eq!(level.state(), GameState::Won);
    assert_eq!(level.score(), 1200);
    assert!(!level.enemies()[0].alive);

    for _ in 0..3 {
        assert_eq!(
            level.apply(Command::Right).unwrap_err(),
            GameError::InvalidStateTransition { state: "won" }
        );
    }
}

#[test]
fn test_scenario_e_last_hit_is_fatal() {
    let mut level = level(&["MD", "XX"]);
    level.apply(Command::Right).unwrap();
    level.apply(Command::Right).unwrap();
    assert_eq!(level.avatar().health, 1);

    let result = level.apply(Command::Right).unwrap();

    assert_eq!(level.avatar().health, 0);
    assert_eq!(result.state, GameState::Dead);
    assert_eq!(level.state(), GameState::Dead);
}

#[test]
fn test_falling_into_level_one_pit() {
    let mut level = Level::level_one();
    level.apply(Command::Right).unwrap();
    level.apply(Command::Up).unwrap();
    level.apply(Command::Right).unwrap();
    level.tick();
    level.tick();
    assert_eq!(pos(&level), (2, 2));

    // Over the pipe and straight down into the pit
    level.apply(Command::Up).unwrap();
    level.apply(Command::Right).unwrap();
    level.apply(Command::Right).unwrap();
    for _ in 0..6 {
        level.tick();
    }

    assert_eq!(level.avatar().health, 2);
    assert_eq!(pos(&level), (0, 3));
    assert_eq!(level.score(), 400);
}

#[test]
fn test_restart_after_death() {
    let mut level = level(&["M G D", "XXXXX"]);
    // Walk up to the enemy and bump into it, three times
    for _ in 0..3 {
        level.apply(Command::Right).unwrap();
        level.apply(Command::Right).unwrap();
    }
    assert_eq!(level.state(), GameState::Dead);

    let fresh = level.restart();
    assert_eq!(fresh.state(), GameState::Playing);
    assert_eq!(fresh.avatar().health, 3);
    assert_eq!(pos(&fresh), (0, 0));
    assert_eq!(fresh.score(), 0);
    assert_eq!(fresh.render(), level.map().to_string());
}

#[test]
fn test_level_one_route_transcript_verifies() {
    let map = LevelMap::level_one();
    let mut level = Level::new(map.clone(), LevelConfig::default());
    let mut transcript = LevelTranscript::new(&map, LevelConfig::default());

    for &command in LEVEL_ONE_ROUTE {
        level.apply(command).unwrap();
        transcript.record(command, &level);
    }
    transcript.finalize(&level);

    let bytes = transcript.to_bytes().unwrap();
    let decoded = LevelTranscript::from_bytes(&bytes).unwrap();
    assert_eq!(decoded.verify(map).unwrap(), level.compute_hash());
}

#[test]
fn test_session_plays_level_one() {
    let mut session = GameSession::level_one();
    let player = PlayerId::random();
    session.join(player).unwrap();

    for &command in LEVEL_ONE_ROUTE {
        session.apply_move(player, command).unwrap();
    }

    assert_eq!(session.status(), SessionStatus::Over);
    assert_eq!(session.winner(), Some(player));
    assert_eq!(session.score(), 1200);
    assert_eq!(session.moves().len(), LEVEL_ONE_ROUTE.len());
}

#[test]
fn test_render_tracks_moves() {
    let mut level = level(&["M  ", "XXX"]);
    level.apply(Command::Right).unwrap();

    assert_eq!(level.render(), " M \nXXX\n");
    assert_eq!(LevelMap::parse(&level.render()).unwrap().avatar_start(), (1, 0));
}
