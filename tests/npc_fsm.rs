//! Guard state machine walkthroughs: hysteresis band and leash

use glam::Vec2;
use nexus_defender::sim::{
    EnemyBase, EntityId, LevelLayout, Npc, NpcContext, NpcState, TargetRef, Team, TickInput, World, tick,
};
use nexus_defender::{Difficulty, WeaponKind};

/// Tiny step so the NPC barely moves between checks
const DT: f32 = 0.001;

fn guard(anchor: Vec2) -> Npc {
    let mut profile = Difficulty::Normal.profile();
    profile.aggro_radius = 170.0;
    Npc::new_guard(EntityId(1), anchor, Team::Red, Some(EntityId(2)), 1, &profile)
}

/// Context with the player `d` pixels below the NPC
fn player_below(npc: &Npc, d: f32, home: Vec2) -> NpcContext {
    NpcContext {
        player: Some(npc.pos + Vec2::new(0.0, d)),
        nexus: Some(Vec2::new(100.0, 360.0)),
        home,
    }
}

#[test]
fn test_hysteresis_band() {
    let anchor = Vec2::new(800.0, 360.0);
    let home = anchor + Vec2::new(70.0, 0.0);
    let mut npc = guard(anchor);
    assert_eq!(npc.sense_radius, 170.0);
    assert_eq!(npc.state, NpcState::Guard);

    // Just inside sense: chase
    npc.update(DT, &player_below(&npc, 169.0, home));
    assert_eq!(npc.state, NpcState::Chase);
    assert_eq!(npc.target, Some(TargetRef::Player));

    // Pretend the chase pulled the guard off its post
    npc.pos = anchor - Vec2::new(60.0, 0.0);

    // Player escapes past 1.4 x sense: give up
    npc.update(DT, &player_below(&npc, 170.0 * 1.4 + 1.0, home));
    assert_eq!(npc.state, NpcState::Return);
    assert_eq!(npc.target, None);

    // Inside sense but outside the re-engage radius: keep walking home
    npc.update(DT, &player_below(&npc, 170.0 * 0.95, home));
    assert_eq!(npc.state, NpcState::Return);
    assert_eq!(npc.target, None);

    // Inside 0.9 x sense: re-engage
    npc.update(DT, &player_below(&npc, 170.0 * 0.9 - 1.0, home));
    assert_eq!(npc.state, NpcState::Chase);
    assert_eq!(npc.target, Some(TargetRef::Player));
}

#[test]
fn test_leash_through_world_tick() {
    let mut world = World::new(1280.0, 720.0, 3, WeaponKind::Rifle);
    let base_id = world.ids.next_id();
    let npc_id = world.ids.next_id();
    let mut base = EnemyBase::new(base_id, Vec2::new(1000.0, 360.0), Team::Red, 1, 170.0);
    let mut npc = Npc::new_guard(npc_id, base.guard_anchor(0), Team::Red, Some(base_id), 1, &Difficulty::Normal.profile());
    base.guards.push(npc_id);

    // Overextended: 260 px from its base, player well within sense range
    npc.pos = Vec2::new(740.0, 360.0);
    npc.state = NpcState::Chase;
    npc.target = Some(TargetRef::Player);

    world.install_level(
        1,
        LevelLayout {
            bases: vec![base],
            npcs: vec![npc],
            grid_fallbacks: 0,
        },
    );
    world.player.pos = Vec2::new(640.0, 360.0);

    tick(&mut world, &TickInput::default(), 1.0 / 60.0);

    let npc = world.npc(npc_id).unwrap();
    assert_eq!(npc.state, NpcState::Return);
    assert_eq!(npc.target, None);
}

#[test]
fn test_returning_guard_settles_at_anchor() {
    let anchor = Vec2::new(800.0, 360.0);
    let home = anchor + Vec2::new(70.0, 0.0);
    let mut npc = guard(anchor);
    npc.state = NpcState::Return;
    npc.pos = anchor - Vec2::new(100.0, 0.0);

    let far = NpcContext {
        player: Some(Vec2::new(100.0, 100.0)),
        nexus: None,
        home,
    };
    for _ in 0..120 {
        npc.update(1.0 / 60.0, &far);
    }
    assert_eq!(npc.state, NpcState::Guard);
    assert!(npc.pos.distance(anchor) < 6.0);
}
