//! Demo/autopilot input
//!
//! Produces a `TickInput` that plays the game: hunt the nearest threat,
//! keep out of point-blank range, fall back toward the Nexus when hurt.
//! Used by the headless native driver and as an attract-mode player.

use glam::Vec2;

use super::state::World;
use super::tick::TickInput;

/// Health fraction below which the autopilot falls back to the Nexus
const RETREAT_HEALTH: f32 = 0.3;
/// Fraction of weapon range the autopilot tries to hold
const PREFERRED_RANGE: f32 = 0.6;

fn nearest(from: Vec2, points: impl Iterator<Item = Vec2>) -> Option<Vec2> {
    points.min_by(|a, b| from.distance_squared(*a).total_cmp(&from.distance_squared(*b)))
}

/// Nearest living enemy NPC, else nearest standing base
fn pick_target(world: &World) -> Option<Vec2> {
    let from = world.player.pos;
    nearest(from, world.npcs.iter().filter(|n| n.alive && n.team.is_enemy()).map(|n| n.pos))
        .or_else(|| nearest(from, world.bases.iter().filter(|b| !b.destroyed).map(|b| b.pos)))
}

pub fn autopilot_input(world: &World) -> TickInput {
    let player = &world.player;
    let mut input = TickInput::default();
    if !player.alive {
        return input;
    }

    let Some(target) = pick_target(world) else {
        return input;
    };
    input.pointer = target;

    let dist = player.pos.distance(target);
    let hurt = player.hp < player.max_hp * RETREAT_HEALTH;

    input.movement = if hurt {
        (world.nexus.pos - player.pos).normalize_or_zero()
    } else if dist > player.range * PREFERRED_RANGE {
        (target - player.pos).normalize_or_zero()
    } else if dist < player.range * PREFERRED_RANGE * 0.5 {
        (player.pos - target).normalize_or_zero()
    } else {
        // Strafe to dodge incoming fire; flips every couple of seconds
        let side = if (world.time * 0.5).fract() < 0.5 { 1.0 } else { -1.0 };
        (target - player.pos).normalize_or_zero().perp() * side
    };

    input.fire = dist <= player.range;
    // Close the gap quickly when far from anything
    input.dash = !hurt && dist > player.range && !player.dash.is_dashing && player.dash.cooldown <= 0.0;

    input
}
