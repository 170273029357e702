//! Read-only views of the world for the renderer and HUD
//!
//! Everything here is plain data and serializes to JSON, which is how the
//! browser page receives it each frame.

use glam::Vec2;
use serde::Serialize;

use crate::sim::npc::NpcState;
use crate::sim::state::{DebugOverlays, DefeatReason, GamePhase, ImpactKind, Team, World};

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub facing: f32,
    pub weapon: &'static str,
    /// "idle", "walk", "dash" or "dead"
    pub sprite: &'static str,
    pub hit_flash: f32,
    pub alive: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructureView {
    pub id: Option<u32>,
    pub pos: Vec2,
    pub size: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub team: Team,
    pub aggro_radius: Option<f32>,
    pub hit_flash: f32,
    pub destroyed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NpcView {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub team: Team,
    pub state: NpcState,
    /// Animation key: "idle", "walk", "attack" or "death"
    pub sprite: &'static str,
    pub facing_left: bool,
    pub hit_flash: f32,
    pub alive: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectileView {
    pub pos: Vec2,
    pub radius: f32,
    pub owner: Team,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectView {
    pub pos: Vec2,
    pub kind: ImpactKind,
    /// Remaining fraction of life, for fading
    pub alpha: f32,
    pub size: f32,
    /// Damage number, when this is floating text
    pub amount: Option<f32>,
}

/// HUD-facing derived values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hud {
    pub level: u32,
    pub active_bases: usize,
    pub total_bases: usize,
    /// 0..=100
    pub player_health_pct: f32,
    pub nexus_health_pct: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    pub phase: GamePhase,
    pub defeat: Option<DefeatReason>,
    pub width: f32,
    pub height: f32,
    pub player: PlayerView,
    pub nexus: StructureView,
    pub bases: Vec<StructureView>,
    pub npcs: Vec<NpcView>,
    pub projectiles: Vec<ProjectileView>,
    pub effects: Vec<EffectView>,
    pub debug: DebugOverlays,
    pub hud: Hud,
}

fn pct(hp: f32, max_hp: f32) -> f32 {
    if max_hp > 0.0 { (hp / max_hp * 100.0).clamp(0.0, 100.0) } else { 0.0 }
}

impl Hud {
    pub fn from_world(world: &World) -> Self {
        Self {
            level: world.level,
            active_bases: world.active_base_count(),
            total_bases: world.bases.len(),
            player_health_pct: pct(world.player.hp, world.player.max_hp),
            nexus_health_pct: pct(world.nexus.hp, world.nexus.max_hp),
        }
    }
}

impl WorldSnapshot {
    pub fn capture(world: &World) -> Self {
        let p = &world.player;
        let sprite = if !p.alive {
            "dead"
        } else if p.dash.is_dashing {
            "dash"
        } else if p.is_moving() {
            "walk"
        } else {
            "idle"
        };

        let player = PlayerView {
            pos: p.pos,
            radius: p.radius,
            hp: p.hp,
            max_hp: p.max_hp,
            facing: p.facing,
            weapon: p.weapon.as_str(),
            sprite,
            hit_flash: p.hit_flash,
            alive: p.alive,
        };

        let n = &world.nexus;
        let nexus = StructureView {
            id: None,
            pos: n.pos,
            size: n.size,
            hp: n.hp,
            max_hp: n.max_hp,
            team: Team::Player,
            aggro_radius: None,
            hit_flash: n.hit_flash,
            destroyed: n.destroyed,
        };

        let bases = world
            .bases
            .iter()
            .map(|b| StructureView {
                id: Some(b.id.0),
                pos: b.pos,
                size: b.size,
                hp: b.hp,
                max_hp: b.max_hp,
                team: b.team,
                aggro_radius: Some(b.aggro_radius),
                hit_flash: b.hit_flash,
                destroyed: b.destroyed,
            })
            .collect();

        let npcs = world
            .npcs
            .iter()
            .map(|npc| NpcView {
                id: npc.id.0,
                pos: npc.pos,
                radius: npc.radius,
                hp: npc.hp,
                max_hp: npc.max_hp,
                team: npc.team,
                state: npc.state,
                sprite: npc.anim().as_str(),
                facing_left: npc.facing_left,
                hit_flash: npc.hit_flash,
                alive: npc.alive,
            })
            .collect();

        let projectiles = world
            .projectiles
            .iter()
            .map(|pr| ProjectileView {
                pos: pr.pos,
                radius: pr.radius,
                owner: pr.owner,
            })
            .collect();

        let particles = world.particles.iter().map(|pa| EffectView {
            pos: pa.pos,
            kind: pa.kind,
            alpha: (pa.life / pa.max_life).clamp(0.0, 1.0),
            size: pa.size,
            amount: None,
        });
        let texts = world.damage_texts.iter().map(|t| EffectView {
            pos: t.pos,
            kind: t.kind,
            alpha: (t.life / crate::sim::state::DAMAGE_TEXT_SECS).clamp(0.0, 1.0),
            size: 14.0,
            amount: Some(t.amount),
        });

        Self {
            phase: world.phase,
            defeat: world.defeat,
            width: world.width,
            height: world.height,
            player,
            nexus,
            bases,
            npcs,
            projectiles,
            effects: particles.chain(texts).collect(),
            debug: world.debug,
            hud: Hud::from_world(world),
        }
    }
}
