//! Integration tests for a run from start to game over, through the
//! public session and run-state APIs.

use std::time::{Duration, Instant};

use bracket_random::prelude::RandomNumberGenerator;
use sanctum_crawler::run::MAX_HEALTH;
use sanctum_crawler::sanctum::storage::MemoryStore;
use sanctum_crawler::{ActionOutcome, GameConfig, GamePhase, GameSession, RunState, WorldPoint};

// ── Helpers ────────────────────────────────────────────────────────────

fn run_with_seed(seed: u64) -> RunState {
    RunState::with_rng(GameConfig::default(), RandomNumberGenerator::seeded(seed))
}

fn session_with_seed(seed: u64) -> GameSession {
    GameSession::with_rng(
        GameConfig::default(),
        Box::new(MemoryStore::new()),
        RandomNumberGenerator::seeded(seed),
    )
}

/// Attacks every monster on the floor until none are left.
fn clear_with_attacks(session: &mut GameSession) {
    for monster in session.run().monsters() {
        while session.attack_monster(monster.id).is_some() {}
    }
}

// ── Start ──────────────────────────────────────────────────────────────

#[test]
fn start_places_the_player_in_the_first_room() {
    for seed in 0..20 {
        let mut run = run_with_seed(seed);
        assert!(run.start_run());
        assert_eq!(run.phase(), GamePhase::Playing);

        let expected = run
            .dungeon()
            .rooms
            .first()
            .map(|room| run.dungeon().grid_to_world(room.center()))
            .unwrap_or(WorldPoint::ORIGIN);
        assert_eq!(run.player_position(), expected);
        assert_eq!(run.monsters().len(), 5);
        assert_eq!((run.player_health(), run.player_level(), run.player_exp()), (100, 1, 0));
    }
}

#[test]
fn start_is_only_accepted_from_ready() {
    let mut run = run_with_seed(1);
    assert!(run.start_run());
    assert!(!run.start_run());
    run.take_damage(MAX_HEALTH);
    assert!(!run.start_run());
    run.reset_run();
    assert!(run.start_run());
}

#[test]
fn roomless_maps_still_start_a_run() {
    let config = GameConfig {
        map_width: 8,
        map_height: 8,
        ..GameConfig::default()
    };
    let mut run = RunState::with_rng(config, RandomNumberGenerator::seeded(12));
    assert!(run.start_run());

    assert!(run.dungeon().rooms.is_empty());
    assert_eq!(run.player_position(), WorldPoint::ORIGIN);
    assert_eq!(run.monsters().len(), 5);
    assert!(!run.move_player(1.0, 0.0));

    // Solid rock everywhere: monsters can strike but never step.
    let placed = run.monsters();
    run.advance(Duration::from_secs(5));
    let positions = |monsters: &[sanctum_crawler::data::monsters::Monster]| {
        monsters.iter().map(|m| m.position).collect::<Vec<_>>()
    };
    assert_eq!(positions(&run.monsters()), positions(&placed));
}

// ── Movement ───────────────────────────────────────────────────────────

#[test]
fn walking_into_a_wall_stops_the_player() {
    for seed in 0..20 {
        let mut run = run_with_seed(seed);
        run.start_run();

        for _ in 0..25 {
            if !run.move_player(-1.0, 0.0) {
                break;
            }
        }
        let stopped = run.player_position();
        assert!(!run.move_player(-1.0, 0.0));
        assert_eq!(run.player_position(), stopped);
        assert!(stopped.x.abs() <= 9.5 && stopped.y.abs() <= 9.5);
        assert!(run.dungeon().is_floor_at(stopped) || run.dungeon().rooms.is_empty());
    }
}

#[test]
fn throttled_moves_respect_the_cooldown() {
    let mut session = session_with_seed(2);
    session.start_run();
    let start = Instant::now();

    session.try_move(start, 0.0, 0.0);
    assert!(!session.try_move(start + Duration::from_millis(150), 1.0, 0.0));
    // Far enough apart for the throttle; the move itself may still hit a wall.
    let before = session.run().player_position();
    let moved = session.try_move(start + Duration::from_millis(151), 1.0, 0.0);
    assert_eq!(moved, session.run().player_position() != before);
}

// ── Floors ─────────────────────────────────────────────────────────────

#[test]
fn floors_grow_harder_and_keep_player_stats() {
    let mut session = session_with_seed(3);
    session.start_run();
    assert!(!session.next_floor());

    for floor in 1..=3u32 {
        clear_with_attacks(&mut session);
        assert!(session.run().floor_cleared());

        let run = session.run();
        let (health, level, exp) = (run.player_health(), run.player_level(), run.player_exp());
        assert!(session.next_floor());

        let run = session.run();
        let next = floor + 1;
        assert_eq!(run.current_floor(), next);
        assert_eq!(run.monsters().len(), 5 + next as usize);
        assert!(run
            .monsters()
            .iter()
            .all(|m| m.health == 50 + 10 * next as i32 && m.damage == 10 + 2 * next as i32));
        assert_eq!((run.player_health(), run.player_level(), run.player_exp()), (health, level, exp));
    }
}

#[test]
fn action_key_descends_once_the_floor_is_clear() {
    let mut session = session_with_seed(4);
    session.start_run();
    clear_with_attacks(&mut session);

    let outcome = session.try_action(Instant::now());
    assert_eq!(outcome, ActionOutcome::Descended { floor: 2 });
}

// ── Kills and drops ────────────────────────────────────────────────────

#[test]
fn every_drop_reaches_the_inventory_exactly_once() {
    let mut session = session_with_seed(5);
    session.start_run();
    let carried = |session: &GameSession| -> u32 {
        session.inventory().items().iter().map(|item| item.quantity).sum()
    };
    let before = carried(&session);

    clear_with_attacks(&mut session);
    assert!(session.run().pending_drops().is_empty());
    assert_eq!(session.run().player_exp(), 50);

    let gained = carried(&session) - before;
    assert!(gained <= 5 * 4);
    assert!(session
        .inventory()
        .items()
        .iter()
        .skip(3)
        .all(|item| item.description.starts_with("Dropped by ")));
}

// ── Game over and ticking ──────────────────────────────────────────────

#[test]
fn game_over_freezes_the_floor_until_reset() {
    let mut run = run_with_seed(6);
    run.start_run();
    run.take_damage(40);
    run.take_damage(70);
    assert_eq!(run.player_health(), 0);
    assert_eq!(run.phase(), GamePhase::GameOver);
    assert!(!run.is_ticking());

    let frozen = run.monsters();
    assert!(run.advance(Duration::from_secs(10)).is_empty());
    assert_eq!(run.monsters(), frozen);

    run.reset_run();
    assert_eq!(run.phase(), GamePhase::Ready);
    assert_eq!(run.current_floor(), 1);
    assert_eq!(run.player_health(), 100);
}

#[test]
fn monsters_only_act_while_playing() {
    let mut run = run_with_seed(7);
    let interval = run.config().tick_interval();
    let idle = run.monsters();
    assert!(run.advance(interval * 4).is_empty());
    assert_eq!(run.monsters(), idle);

    run.start_run();
    run.enter_sanctum();
    let parked = run.monsters();
    run.advance(interval * 4);
    assert_eq!(run.monsters(), parked);
    assert!(run.exit_sanctum());
    assert_eq!(run.phase(), GamePhase::Ready);
}

#[test]
fn experience_and_health_stay_in_range() {
    let mut run = run_with_seed(8);
    run.gain_exp(60);
    run.gain_exp(60);
    assert_eq!((run.player_level(), run.player_exp()), (2, 20));

    run.heal_player(1000);
    assert_eq!(run.player_health(), 100);
    run.take_damage(1000);
    assert_eq!(run.player_health(), 0);
}
