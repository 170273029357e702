//! Cooldown-gated auto-turret shared by the Nexus and enemy bases

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turret {
    pub damage: f32,
    /// Reach measured from the structure center
    pub attack_range: f32,
    /// Seconds between shots
    pub fire_interval: f32,
    /// Seconds until the next shot is allowed
    pub fire_cooldown: f32,
    pub projectile_speed: f32,
    /// Area damage radius, 0 for single-target shots
    pub splash_radius: f32,
}

impl Turret {
    /// Decay the cooldown
    pub fn tick(&mut self, dt: f32) {
        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
    }

    pub fn can_shoot(&self) -> bool {
        self.fire_cooldown <= 0.0
    }

    /// Consume the cooldown; false (and no state change) when still cooling down
    pub fn shoot(&mut self) -> bool {
        if !self.can_shoot() {
            return false;
        }
        self.fire_cooldown = self.fire_interval;
        true
    }

    pub fn in_range(&self, distance: f32) -> bool {
        distance <= self.attack_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turret() -> Turret {
        Turret {
            damage: 10.0,
            attack_range: 200.0,
            fire_interval: 0.5,
            fire_cooldown: 0.0,
            projectile_speed: 400.0,
            splash_radius: 0.0,
        }
    }

    #[test]
    fn test_turret_cooldown_gating() {
        let mut t = turret();
        assert!(t.shoot());
        assert!(!t.shoot());
        t.tick(0.3);
        assert!(!t.shoot());
        t.tick(0.2);
        assert!(t.shoot());
    }

    #[test]
    fn test_turret_range() {
        let t = turret();
        assert!(t.in_range(200.0));
        assert!(!t.in_range(200.5));
    }
}
