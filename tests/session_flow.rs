//! Session lifecycle: winning a level, saving, and resuming in a new session

use glam::Vec2;

use nexus_defender::platform::{KeyValueStore, MemoryStore};
use nexus_defender::persistence::{BEST_LEVELS_KEY, PROGRESS_KEY};
use nexus_defender::sim::{GamePhase, TickInput, autopilot_input};
use nexus_defender::{Difficulty, Session, SessionConfig, WeaponKind};

const DT: f32 = 1.0 / 60.0;

fn ready_session(store: MemoryStore) -> Session<MemoryStore> {
    let mut session = Session::new(SessionConfig::default(), store, 21);
    assert!(session.assets_ready());
    session
}

#[test]
fn test_last_base_wins_even_with_guards_alive() {
    let mut session = ready_session(MemoryStore::new());
    session.set_difficulty(Difficulty::Easy);
    assert!(session.start_game());

    // Keep a single base standing
    let world = session.world_mut();
    for base in world.bases.iter_mut().skip(1) {
        base.take_damage(100_000.0);
    }
    session.update(DT, &TickInput::default());
    assert_eq!(session.phase(), GamePhase::Playing);
    assert_eq!(session.world().active_base_count(), 1);

    session.world_mut().bases[0].take_damage(100_000.0);
    session.update(DT, &TickInput::default());
    assert_eq!(session.phase(), GamePhase::LevelUp);
    assert!(session.world().npcs.iter().any(|n| n.alive));

    // Nothing simulates until the host advances
    let time = session.world().time;
    session.update(DT, &TickInput::default());
    assert_eq!(session.world().time, time);
}

#[test]
fn test_progress_survives_a_new_session() {
    let mut session = ready_session(MemoryStore::new());
    session.set_difficulty(Difficulty::Hard);
    session.set_weapon(WeaponKind::Shotgun);
    assert!(session.start_game());

    for base in &mut session.world_mut().bases {
        base.take_damage(100_000.0);
    }
    session.update(DT, &TickInput::default());
    assert_eq!(session.phase(), GamePhase::LevelUp);

    let store = session.persistence().store().clone();
    assert!(store.get(PROGRESS_KEY).unwrap().is_some());
    assert!(store.get(BEST_LEVELS_KEY).unwrap().is_some());

    let mut resumed = ready_session(store);
    assert_eq!(resumed.best_levels().best(Difficulty::Hard), 1);
    assert_eq!(resumed.best_levels().best(Difficulty::Easy), 0);
    assert!(resumed.continue_saved());
    assert_eq!(resumed.phase(), GamePhase::Playing);
    assert_eq!(resumed.world().level, 2);
    assert_eq!(resumed.difficulty(), Difficulty::Hard);
    assert_eq!(resumed.world().player.weapon, WeaponKind::Shotgun);
}

#[test]
fn test_corrupt_save_starts_fresh() {
    let mut store = MemoryStore::new();
    store.set(PROGRESS_KEY, "{not json").unwrap();
    store.set(BEST_LEVELS_KEY, "[1, 2").unwrap();

    let mut session = ready_session(store);
    assert!(session.best_levels().is_empty());
    assert!(session.saved_progress().is_none());
    assert!(!session.continue_saved());
    assert_eq!(session.phase(), GamePhase::Menu);

    assert!(session.start_game());
    assert_eq!(session.world().level, 1);
}

#[test]
fn test_pause_freezes_simulation() {
    let mut session = ready_session(MemoryStore::new());
    session.start_game();
    session.update(DT, &TickInput::default());

    assert!(session.pause());
    let time = session.world().time;
    let player = session.world().player.pos;
    let input = TickInput {
        movement: Vec2::new(1.0, 0.0),
        ..Default::default()
    };
    for _ in 0..30 {
        session.update(DT, &input);
    }
    assert_eq!(session.world().time, time);
    assert_eq!(session.world().player.pos, player);

    assert!(session.resume());
    session.update(DT, &input);
    assert!(session.world().player.pos.x > player.x);
}

#[test]
fn test_autopilot_session_stays_consistent() {
    let mut session = ready_session(MemoryStore::new());
    session.set_difficulty(Difficulty::Easy);
    session.start_game();

    for _ in 0..(60 * 20) {
        let input = autopilot_input(session.world());
        session.update(DT, &input);
        match session.phase() {
            GamePhase::LevelUp => {
                assert!(session.next_level());
            }
            GamePhase::GameOver => break,
            _ => {}
        }

        let world = session.world();
        assert!(world.player.hp >= 0.0 && world.player.hp <= world.player.max_hp);
        assert!(world.nexus.hp >= 0.0 && world.nexus.hp <= world.nexus.max_hp);
        for base in &world.bases {
            assert!(base.hp >= 0.0 && base.hp <= base.max_hp);
            assert_eq!(base.destroyed, base.hp == 0.0);
        }
        for npc in &world.npcs {
            assert!(npc.hp >= 0.0 && npc.hp <= npc.max_hp);
        }
        assert!(world.projectiles.iter().all(|p| p.alive));
    }
}
