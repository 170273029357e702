//! Projectiles fired by the player, NPCs and turrets

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Team;
use crate::from_angle;

/// Collision radius of every projectile
pub const PROJECTILE_RADIUS: f32 = 6.0;
/// Default time-to-live in seconds
pub const DEFAULT_LIFETIME: f32 = 1.5;
/// Speed of NPC shots
pub const NPC_PROJECTILE_SPEED: f32 = 420.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Fixed at creation
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub owner: Team,
    /// Area damage radius, 0 for single-target
    pub splash_radius: f32,
    /// Seconds remaining
    pub lifetime: f32,
    pub alive: bool,
}

impl Projectile {
    /// Projectile from `origin` aimed at `target`
    ///
    /// A target equal to the origin fires along +x.
    pub fn aimed(origin: Vec2, target: Vec2, speed: f32, damage: f32, owner: Team) -> Self {
        let d = target - origin;
        let angle = if d.length_squared() > 0.0 {
            d.y.atan2(d.x)
        } else {
            0.0
        };
        Self::with_angle(origin, angle, speed, damage, owner)
    }

    /// Projectile from `origin` travelling along `angle`
    pub fn with_angle(origin: Vec2, angle: f32, speed: f32, damage: f32, owner: Team) -> Self {
        Self {
            pos: origin,
            vel: from_angle(angle) * speed,
            radius: PROJECTILE_RADIUS,
            damage,
            owner,
            splash_radius: 0.0,
            lifetime: DEFAULT_LIFETIME,
            alive: true,
        }
    }

    pub fn splash(mut self, radius: f32) -> Self {
        self.splash_radius = radius.max(0.0);
        self
    }

    pub fn lifetime(mut self, secs: f32) -> Self {
        self.lifetime = secs;
        self
    }

    pub fn has_splash(&self) -> bool {
        self.splash_radius > 0.0
    }

    /// Integrate position, decay lifetime, and cull when expired or out of bounds
    pub fn update(&mut self, dt: f32, bounds: Vec2) {
        if !self.alive {
            return;
        }
        self.pos += self.vel * dt;
        self.lifetime -= dt;

        if self.lifetime <= 0.0
            || self.pos.x < 0.0
            || self.pos.x > bounds.x
            || self.pos.y < 0.0
            || self.pos.y > bounds.y
        {
            self.alive = false;
        }
    }

    pub fn destroy(&mut self) {
        self.alive = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Vec2 = Vec2::new(1280.0, 720.0);

    #[test]
    fn test_aimed_velocity() {
        let p = Projectile::aimed(Vec2::new(100.0, 100.0), Vec2::new(100.0, 200.0), 500.0, 5.0, Team::Player);
        assert!(p.vel.x.abs() < 1e-3);
        assert!((p.vel.y - 500.0).abs() < 1e-3);
        assert!(!p.has_splash());
    }

    #[test]
    fn test_lifetime_expiry() {
        let mut p = Projectile::aimed(Vec2::new(600.0, 360.0), Vec2::new(700.0, 360.0), 10.0, 5.0, Team::Red)
            .lifetime(0.25);
        p.update(0.2, BOUNDS);
        assert!(p.alive);
        p.update(0.1, BOUNDS);
        assert!(!p.alive);
    }

    #[test]
    fn test_leaves_playfield() {
        let mut p = Projectile::aimed(Vec2::new(5.0, 360.0), Vec2::new(0.0, 360.0), 100.0, 5.0, Team::Red);
        p.update(0.1, BOUNDS);
        assert!(!p.alive);
    }

    #[test]
    fn test_negative_splash_is_ignored() {
        let p = Projectile::aimed(Vec2::ZERO, Vec2::X, 1.0, 1.0, Team::Player).splash(-5.0);
        assert_eq!(p.splash_radius, 0.0);
    }
}
