//! The player character

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::projectile::Projectile;
use super::state::Team;
use crate::angle_to;
use crate::consts::{HIT_FLASH_SECS, WALK_SPEED_THRESHOLD};
use crate::tuning::WeaponKind;

pub const PLAYER_RADIUS: f32 = 20.0;
pub const PLAYER_SPEED: f32 = 220.0;
pub const PLAYER_MAX_HP: f32 = 100.0;

pub const DASH_SPEED: f32 = 800.0;
pub const DASH_DURATION: f32 = 0.15;
pub const DASH_COOLDOWN: f32 = 1.0;

/// Dash bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashState {
    pub is_dashing: bool,
    /// Seconds of dash left
    pub timer: f32,
    /// Seconds until the next dash is allowed
    pub cooldown: f32,
    /// Unit direction locked at dash start
    pub direction: Vec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub vel: Vec2,
    pub speed: f32,
    pub hp: f32,
    pub max_hp: f32,

    pub weapon: WeaponKind,
    pub damage: f32,
    /// Seconds between shots
    pub fire_interval: f32,
    pub fire_cooldown: f32,
    pub range: f32,
    pub projectile_speed: f32,
    pub pellets: u32,
    /// Radians between adjacent pellets
    pub spread: f32,

    pub dash: DashState,
    /// Aim angle toward the pointer
    pub facing: f32,
    pub hit_flash: f32,
    pub alive: bool,
}

impl Player {
    pub fn new(pos: Vec2, weapon: WeaponKind) -> Self {
        let mut player = Self {
            pos,
            radius: PLAYER_RADIUS,
            vel: Vec2::ZERO,
            speed: PLAYER_SPEED,
            hp: PLAYER_MAX_HP,
            max_hp: PLAYER_MAX_HP,
            weapon,
            damage: 0.0,
            fire_interval: 0.0,
            fire_cooldown: 0.0,
            range: 0.0,
            projectile_speed: 0.0,
            pellets: 1,
            spread: 0.0,
            dash: DashState::default(),
            facing: 0.0,
            hit_flash: 0.0,
            alive: true,
        };
        player.equip(weapon);
        player
    }

    /// Copy a weapon profile onto the player
    pub fn equip(&mut self, weapon: WeaponKind) {
        let profile = weapon.profile();
        self.weapon = weapon;
        self.damage = profile.damage;
        self.fire_interval = profile.fire_interval;
        self.range = profile.range;
        self.projectile_speed = profile.projectile_speed;
        self.pellets = profile.pellets.max(1);
        self.spread = profile.spread;
    }

    /// Movement, dash integration, bounds clamping and facing
    ///
    /// `movement` is the raw input vector (each axis in [-1, 1]); it is
    /// normalized so diagonals are not faster.
    pub fn update(&mut self, dt: f32, movement: Vec2, pointer: Vec2, bounds: Vec2) {
        if !self.alive {
            return;
        }

        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        self.dash.cooldown = (self.dash.cooldown - dt).max(0.0);
        self.hit_flash = (self.hit_flash - dt).max(0.0);

        if self.dash.is_dashing {
            self.dash.timer -= dt;
            if self.dash.timer <= 0.0 {
                self.dash.is_dashing = false;
                self.dash.timer = 0.0;
            } else {
                self.pos += self.dash.direction * DASH_SPEED * dt;
            }
        } else {
            self.vel = movement.normalize_or_zero() * self.speed;
            self.pos += self.vel * dt;
        }

        self.pos = self.pos.clamp(
            Vec2::splat(self.radius),
            (bounds - Vec2::splat(self.radius)).max(Vec2::splat(self.radius)),
        );

        self.facing = angle_to(self.pos, pointer);
    }

    /// Start a dash toward `pointer`; false while dashing or cooling down
    pub fn dash(&mut self, pointer: Vec2) -> bool {
        if !self.alive || self.dash.is_dashing || self.dash.cooldown > 0.0 {
            return false;
        }
        self.dash = DashState {
            is_dashing: true,
            timer: DASH_DURATION,
            cooldown: DASH_COOLDOWN,
            direction: (pointer - self.pos).normalize_or_zero(),
        };
        true
    }

    pub fn can_shoot(&self) -> bool {
        self.alive && self.fire_cooldown <= 0.0
    }

    /// Consume the fire cooldown; false when gated
    pub fn shoot(&mut self) -> bool {
        if !self.can_shoot() {
            return false;
        }
        self.fire_cooldown = self.fire_interval;
        true
    }

    /// Projectiles for one trigger pull aimed at `pointer`
    ///
    /// Pellets fan symmetrically around the aim angle, `spread` radians
    /// apart. Sniper shots gain damage with the clamped cursor distance.
    pub fn shot_projectiles(&self, pointer: Vec2) -> Vec<Projectile> {
        let aim = angle_to(self.pos, pointer);
        let multiplier = self
            .weapon
            .damage_multiplier(self.pos.distance(pointer), self.range);
        let damage = self.damage * multiplier;
        let lifetime = if self.projectile_speed > 0.0 {
            self.range / self.projectile_speed
        } else {
            0.0
        };

        let n = self.pellets.max(1);
        let center = (n - 1) as f32 / 2.0;
        (0..n)
            .map(|i| {
                let offset = (i as f32 - center) * self.spread;
                Projectile::with_angle(self.pos, aim + offset, self.projectile_speed, damage, Team::Player)
                    .lifetime(lifetime)
            })
            .collect()
    }

    /// Apply damage; no-op once dead
    pub fn take_damage(&mut self, amount: f32) {
        if !self.alive || amount <= 0.0 {
            return;
        }
        self.hp -= amount;
        self.hit_flash = HIT_FLASH_SECS;
        if self.hp <= 0.0 {
            self.hp = 0.0;
            self.alive = false;
        }
    }

    pub fn heal(&mut self, amount: f32) {
        if !self.alive {
            return;
        }
        self.hp = (self.hp + amount.max(0.0)).min(self.max_hp);
    }

    /// Between-level upgrade: more max hp, partial heal, a little more damage
    pub fn level_up(&mut self) {
        self.max_hp += 12.0;
        self.hp = (self.hp + (self.max_hp * 0.45).floor()).min(self.max_hp);
        self.damage += 2.0;
    }

    /// Restore for a level restart (upgrades are kept)
    pub fn reset(&mut self, pos: Vec2) {
        self.pos = pos;
        self.hp = self.max_hp;
        self.alive = true;
        self.vel = Vec2::ZERO;
        self.fire_cooldown = 0.0;
        self.dash = DashState::default();
        self.hit_flash = 0.0;
    }

    pub fn is_moving(&self) -> bool {
        self.vel.x.abs() > WALK_SPEED_THRESHOLD || self.vel.y.abs() > WALK_SPEED_THRESHOLD
    }
}
