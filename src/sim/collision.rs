//! Projectile collision detection and damage response
//!
//! A single pass over live projectiles with no spatial index; entity counts
//! per level are small. Every hit pushes particle and damage-number events
//! onto the caller's queue instead of drawing anything.

use glam::Vec2;

use super::base::EnemyBase;
use super::geometry::{circle_rect_overlap, circles_overlap};
use super::nexus::Nexus;
use super::npc::Npc;
use super::player::Player;
use super::projectile::Projectile;
use super::state::{EntityId, GameEvent, IMPACT_PARTICLES, ImpactKind, Team};
use crate::consts::HEAVY_HIT_FLASH_SECS;

/// Which filter a splash uses
#[derive(Debug, Clone, Copy)]
enum SplashFilter {
    /// Any enemy-team NPC
    AnyEnemy,
    /// Only NPCs on this team
    Team(Team),
}

fn push_hit(events: &mut Vec<GameEvent>, particles_at: Vec2, text_at: Vec2, amount: f32, kind: ImpactKind) {
    events.push(GameEvent::Particles {
        pos: particles_at,
        kind,
        count: IMPACT_PARTICLES,
    });
    events.push(GameEvent::DamageText {
        pos: text_at,
        amount,
        kind,
    });
}

/// Damage every living NPC matching `filter` within `radius` of `center`,
/// except the one at `skip` (already hit directly)
///
/// Returns how many NPCs were hit.
fn apply_splash(
    npcs: &mut [Npc],
    center: Vec2,
    radius: f32,
    damage: f32,
    filter: SplashFilter,
    skip: Option<usize>,
    events: &mut Vec<GameEvent>,
) -> usize {
    let mut hits = 0;
    for (i, npc) in npcs.iter_mut().enumerate() {
        if !npc.alive || skip == Some(i) {
            continue;
        }
        let eligible = match filter {
            SplashFilter::AnyEnemy => npc.team.is_enemy(),
            SplashFilter::Team(team) => npc.team == team,
        };
        if !eligible || npc.pos.distance_squared(center) > radius * radius {
            continue;
        }
        npc.take_damage(damage);
        npc.hit_flash = HEAVY_HIT_FLASH_SECS;
        push_hit(events, npc.pos, npc.pos - Vec2::new(0.0, npc.radius), damage, ImpactKind::NpcHit);
        hits += 1;
    }
    hits
}

/// Resolve every live projectile against the entities it can hit
///
/// Player projectiles test enemy NPCs first, then enemy bases. Enemy
/// projectiles test the player, then the Nexus. The first hit consumes the
/// projectile.
pub fn resolve(
    player: &mut Player,
    nexus: &mut Nexus,
    bases: &mut [EnemyBase],
    npcs: &mut [Npc],
    projectiles: &mut [Projectile],
    events: &mut Vec<GameEvent>,
) {
    for proj in projectiles.iter_mut().filter(|p| p.alive) {
        if proj.owner == Team::Player {
            resolve_player_shot(proj, bases, npcs, events);
        } else {
            resolve_enemy_shot(proj, player, nexus, events);
        }
    }
}

fn resolve_player_shot(proj: &mut Projectile, bases: &mut [EnemyBase], npcs: &mut [Npc], events: &mut Vec<GameEvent>) {
    let hit_npc = npcs
        .iter()
        .position(|n| n.alive && n.team.is_enemy() && circles_overlap(proj.pos, proj.radius, n.pos, n.radius));

    if let Some(idx) = hit_npc {
        // Full hit on the struck NPC; contact may lie outside a small splash
        let npc = &mut npcs[idx];
        npc.take_damage(proj.damage);
        push_hit(events, npc.pos, npc.pos - Vec2::new(0.0, npc.radius), proj.damage, ImpactKind::NpcHit);
        if proj.has_splash() {
            npc.hit_flash = HEAVY_HIT_FLASH_SECS;
            apply_splash(
                npcs,
                proj.pos,
                proj.splash_radius,
                proj.damage,
                SplashFilter::AnyEnemy,
                Some(idx),
                events,
            );
        }
        proj.destroy();
        return;
    }

    let hit_base = bases
        .iter_mut()
        .find(|b| !b.destroyed && b.team.is_enemy() && circle_rect_overlap(proj.pos, proj.radius, b.pos, b.size));

    if let Some(base) = hit_base {
        base.take_damage(proj.damage);
        base.hit_flash = HEAVY_HIT_FLASH_SECS;
        push_hit(
            events,
            proj.pos,
            proj.pos - Vec2::new(0.0, base.size.y / 2.0),
            proj.damage,
            ImpactKind::BaseHit,
        );
        if proj.has_splash() {
            let team = base.team;
            apply_splash(npcs, proj.pos, proj.splash_radius, proj.damage, SplashFilter::Team(team), None, events);
        }
        proj.destroy();
    }
}

fn resolve_enemy_shot(proj: &mut Projectile, player: &mut Player, nexus: &mut Nexus, events: &mut Vec<GameEvent>) {
    if player.alive && circles_overlap(proj.pos, proj.radius, player.pos, player.radius) {
        player.take_damage(proj.damage);
        push_hit(
            events,
            player.pos,
            player.pos - Vec2::new(0.0, player.radius),
            proj.damage,
            ImpactKind::PlayerHit,
        );
        proj.destroy();
        return;
    }

    if !nexus.destroyed && circle_rect_overlap(proj.pos, proj.radius, nexus.pos, nexus.size) {
        nexus.take_damage(proj.damage);
        push_hit(
            events,
            proj.pos,
            proj.pos - Vec2::new(0.0, nexus.size.y / 2.0),
            proj.damage,
            ImpactKind::NexusHit,
        );
        proj.destroy();
    }
}

/// Standing enemy bases whose aggro circle contains the player
pub fn aggro_triggered(player: &Player, bases: &[EnemyBase]) -> Vec<EntityId> {
    bases
        .iter()
        .filter(|b| !b.destroyed && b.team.is_enemy() && b.is_in_aggro_range(player.pos))
        .map(|b| b.id)
        .collect()
}
