//! Per-frame simulation tick
//!
//! Advances the whole world by one variable frame step. Step order is fixed
//! and each step sees the results of the previous one:
//!
//! 1. pause and debug toggles
//! 2. player movement and dash
//! 3. player shooting
//! 4. Nexus turret
//! 5. enemy bases (aggro, raiders, turret)
//! 6. NPCs (AI, SMG penalty, firing, corpse removal)
//! 7. projectiles
//! 8. particles and damage text
//! 9. collision
//! 10. win/lose

use glam::Vec2;

use super::collision::{aggro_triggered, resolve};
use super::npc::{Npc, NpcContext};
use super::projectile::{NPC_PROJECTILE_SPEED, Projectile};
use super::state::{DefeatReason, GameEvent, GamePhase, Team, World};
use crate::consts::MAX_FRAME_DT;
use crate::tuning::{SMG_TOO_CLOSE_DPS, SMG_TOO_CLOSE_RANGE};

/// Discrete one-shot actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Pause,
    Dash,
    ToggleGrid,
    ToggleAggro,
}

/// Input snapshot for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement vector, each axis in [-1, 1]
    pub movement: Vec2,
    /// Pointer in playfield coordinates
    pub pointer: Vec2,
    /// Primary action held (shoot)
    pub fire: bool,
    /// Pause toggle (edge)
    pub pause: bool,
    /// Dash toward the pointer (edge)
    pub dash: bool,
    /// Debug grid overlay toggle (edge)
    pub toggle_grid: bool,
    /// Debug aggro-radius overlay toggle (edge)
    pub toggle_aggro: bool,
}

impl TickInput {
    pub fn just_pressed(&self, action: Action) -> bool {
        match action {
            Action::Pause => self.pause,
            Action::Dash => self.dash,
            Action::ToggleGrid => self.toggle_grid,
            Action::ToggleAggro => self.toggle_aggro,
        }
    }
}

/// Advance the world by one frame; returns the events raised this frame
///
/// `dt` is clamped to `MAX_FRAME_DT`. Outside `Playing` only the pause
/// toggle and debug toggles are processed.
pub fn tick(world: &mut World, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    if input.just_pressed(Action::ToggleGrid) {
        world.debug.grid = !world.debug.grid;
    }
    if input.just_pressed(Action::ToggleAggro) {
        world.debug.aggro_radius = !world.debug.aggro_radius;
    }

    if input.just_pressed(Action::Pause) {
        match world.phase {
            GamePhase::Playing => {
                world.phase = GamePhase::Paused;
                log::info!("Paused");
                return Vec::new();
            }
            GamePhase::Paused => {
                world.phase = GamePhase::Playing;
                log::info!("Resumed");
            }
            _ => {}
        }
    }

    if world.phase != GamePhase::Playing {
        return Vec::new();
    }

    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    world.time += dt;

    update_player(world, input, dt);
    update_nexus(world, dt);
    update_bases(world, dt);
    update_npcs(world, dt);

    let bounds = world.bounds();
    for proj in &mut world.projectiles {
        proj.update(dt, bounds);
    }
    world.projectiles.retain(|p| p.alive);

    world.update_effects(dt);

    resolve(
        &mut world.player,
        &mut world.nexus,
        &mut world.bases,
        &mut world.npcs,
        &mut world.projectiles,
        &mut world.events,
    );
    world.projectiles.retain(|p| p.alive);
    let events = world.drain_events();

    check_outcome(world);
    events
}

fn update_player(world: &mut World, input: &TickInput, dt: f32) {
    let bounds = world.bounds();
    if input.just_pressed(Action::Dash) {
        world.player.dash(input.pointer);
    }
    world.player.update(dt, input.movement, input.pointer, bounds);

    if input.fire && world.player.shoot() {
        let shots = world.player.shot_projectiles(input.pointer);
        world.projectiles.extend(shots);
    }
}

fn update_nexus(world: &mut World, dt: f32) {
    world.nexus.update(dt);
    if !world.nexus.turret.can_shoot() {
        return;
    }
    let Some(target) = world.nexus.select_target(&world.npcs, &world.bases) else {
        return;
    };
    if world.nexus.turret.shoot() {
        let t = &world.nexus.turret;
        world.projectiles.push(
            Projectile::aimed(world.nexus.pos, target, t.projectile_speed, t.damage, Team::Player)
                .splash(t.splash_radius),
        );
    }
}

fn update_bases(world: &mut World, dt: f32) {
    let player_pos = world.player.alive.then_some(world.player.pos);
    let nexus_pos = (!world.nexus.destroyed).then_some(world.nexus.pos);
    let nexus_size = world.nexus.size;
    let triggered = if world.player.alive {
        aggro_triggered(&world.player, &world.bases)
    } else {
        Vec::new()
    };
    let profile = world.difficulty.profile();
    let level = world.level;

    for base in &mut world.bases {
        let raider_ready = base.update(dt);

        if triggered.contains(&base.id) && base.activate_raiders() {
            log::debug!("Base {:?} aggroed, raiders incoming", base.id);
        }

        if raider_ready {
            let raider = Npc::new_raider(
                world.ids.next_id(),
                base.raider_spawn_point(),
                base.team,
                Some(base.id),
                level,
                &profile,
            );
            log::debug!("Base {:?} spawned raider {:?}", base.id, raider.id);
            base.guards.push(raider.id);
            world.npcs.push(raider);
        }

        if !base.turret.can_shoot() {
            continue;
        }
        if let Some(target) = base.select_target(player_pos, nexus_pos, nexus_size) {
            if base.turret.shoot() {
                world.projectiles.push(Projectile::aimed(
                    base.pos,
                    target,
                    base.turret.projectile_speed,
                    base.turret.damage,
                    base.team,
                ));
            }
        }
    }
}

fn update_npcs(world: &mut World, dt: f32) {
    let smg_penalty = world.player.weapon.penalized_up_close();

    for npc in &mut world.npcs {
        let home = npc
            .base_home
            .and_then(|id| world.bases.iter().find(|b| b.id == id))
            .map_or(npc.anchor, |b| b.pos);
        let ctx = NpcContext {
            player: world.player.alive.then_some(world.player.pos),
            nexus: (!world.nexus.destroyed).then_some(world.nexus.pos),
            home,
        };

        npc.update(dt, &ctx);

        if smg_penalty
            && npc.alive
            && world.player.alive
            && npc.pos.distance(world.player.pos) <= SMG_TOO_CLOSE_RANGE
        {
            world.player.take_damage(SMG_TOO_CLOSE_DPS * dt);
        }

        if let Some(target) = npc.target_position(&ctx) {
            if npc.shoot(target) {
                world.projectiles.push(Projectile::aimed(
                    npc.pos,
                    target,
                    NPC_PROJECTILE_SPEED,
                    npc.damage,
                    npc.team,
                ));
            }
        }
    }

    world.npcs.retain(|n| !n.is_expired());
}

fn check_outcome(world: &mut World) {
    if !world.player.alive {
        world.phase = GamePhase::GameOver;
        world.defeat = Some(DefeatReason::PlayerDefeated);
        log::info!("Game over at level {}: player defeated", world.level);
    } else if world.nexus.destroyed {
        world.phase = GamePhase::GameOver;
        world.defeat = Some(DefeatReason::NexusDestroyed);
        log::info!("Game over at level {}: Nexus destroyed", world.level);
    } else if world.active_base_count() == 0 {
        world.phase = GamePhase::LevelUp;
        log::info!("Level {} complete", world.level);
    }
}
