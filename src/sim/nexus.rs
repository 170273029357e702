//! The player's home structure, which doubles as an auto-turret

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::base::EnemyBase;
use super::geometry::point_rect_distance;
use super::npc::Npc;
use super::turret::Turret;
use crate::consts::HIT_FLASH_SECS;

pub const NEXUS_SIZE: Vec2 = Vec2::new(80.0, 80.0);
pub const NEXUS_MAX_HP: f32 = 200.0;

/// Floor for the turret's fire interval after level-ups
const MIN_FIRE_INTERVAL: f32 = 0.35;
/// Largest splash the turret grows to
const MAX_SPLASH_RADIUS: f32 = 60.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nexus {
    pub pos: Vec2,
    pub size: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub turret: Turret,
    pub destroyed: bool,
    pub hit_flash: f32,
}

impl Nexus {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: NEXUS_SIZE,
            hp: NEXUS_MAX_HP,
            max_hp: NEXUS_MAX_HP,
            turret: Turret {
                damage: 14.0,
                attack_range: 260.0,
                fire_interval: 0.8,
                fire_cooldown: 0.0,
                projectile_speed: 480.0,
                splash_radius: 0.0,
            },
            destroyed: false,
            hit_flash: 0.0,
        }
    }

    /// Decay the hit flash and turret cooldown
    pub fn update(&mut self, dt: f32) {
        self.hit_flash = (self.hit_flash - dt).max(0.0);
        self.turret.tick(dt);
    }

    /// Turret target: nearest living enemy NPC in range, else nearest
    /// standing enemy base in range
    pub fn select_target(&self, npcs: &[Npc], bases: &[EnemyBase]) -> Option<Vec2> {
        if self.destroyed {
            return None;
        }

        let nearest_npc = npcs
            .iter()
            .filter(|n| n.alive && n.team.is_enemy())
            .map(|n| (n.pos, self.pos.distance(n.pos)))
            .filter(|&(_, d)| self.turret.in_range(d))
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((pos, _)) = nearest_npc {
            return Some(pos);
        }

        bases
            .iter()
            .filter(|b| !b.destroyed)
            .map(|b| (b.pos, point_rect_distance(self.pos, b.pos, b.size)))
            .filter(|&(_, d)| self.turret.in_range(d))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(pos, _)| pos)
    }

    pub fn take_damage(&mut self, amount: f32) {
        if self.destroyed || amount <= 0.0 {
            return;
        }
        self.hp -= amount;
        self.hit_flash = HIT_FLASH_SECS;
        if self.hp <= 0.0 {
            self.hp = 0.0;
            self.destroyed = true;
        }
    }

    pub fn heal(&mut self, amount: f32) {
        if self.destroyed {
            return;
        }
        self.hp = (self.hp + amount.max(0.0)).min(self.max_hp);
    }

    /// Between-level upgrade; every stat moves in the player's favor
    pub fn level_up(&mut self) {
        self.max_hp += 45.0;
        if !self.destroyed {
            self.hp = (self.hp + (self.max_hp * 0.5).floor()).min(self.max_hp);
        }
        self.turret.damage += 3.0;
        self.turret.attack_range += 10.0;
        self.turret.fire_interval = (self.turret.fire_interval * 0.95).max(MIN_FIRE_INTERVAL);
        self.turret.splash_radius = (self.turret.splash_radius + 12.0).min(MAX_SPLASH_RADIUS);
    }

    /// Full restore used when a level is reloaded
    pub fn repair(&mut self) {
        self.hp = self.max_hp;
        self.destroyed = false;
        self.hit_flash = 0.0;
        self.turret.fire_cooldown = 0.0;
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_hp > 0.0 { self.hp / self.max_hp } else { 0.0 }
    }
}
