//! Enemy bases: damageable structures with a turret and a raider queue

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::point_rect_distance;
use super::state::{EntityId, Team};
use super::turret::Turret;
use crate::consts::HIT_FLASH_SECS;

pub const BASE_SIZE: Vec2 = Vec2::new(80.0, 80.0);
/// Hit points at level 1
pub const BASE_HP: f32 = 220.0;
/// Extra hit points per level
pub const BASE_HP_PER_LEVEL: f32 = 55.0;

/// Delay between queued raiders leaving the base
pub const RAIDER_SPAWN_INTERVAL: f32 = 1.5;
/// Period of the autonomous raider cycle once aggroed
pub const RAIDER_AUTO_INTERVAL: f32 = 12.0;
/// First autonomous raider comes quickly after aggro
pub const RAIDER_AGGRO_KICKOFF: f32 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyBase {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub team: Team,
    /// Level the base was spawned at
    pub level: u32,
    pub aggro_radius: f32,
    pub turret: Turret,

    pub raiders_to_spawn: u32,
    pub raider_spawn_timer: f32,
    pub raider_spawn_interval: f32,
    pub raider_aggro_active: bool,
    pub raider_auto_timer: f32,
    pub raider_auto_interval: f32,

    /// Guards and raiders belonging to this base (lookup handles only)
    pub guards: Vec<EntityId>,
    pub destroyed: bool,
    pub hit_flash: f32,
}

impl EnemyBase {
    pub fn new(id: EntityId, pos: Vec2, team: Team, level: u32, aggro_radius: f32) -> Self {
        let level = level.max(1);
        let hp = BASE_HP + (level - 1) as f32 * BASE_HP_PER_LEVEL;
        Self {
            id,
            pos,
            size: BASE_SIZE,
            hp,
            max_hp: hp,
            team,
            level,
            aggro_radius,
            turret: Turret {
                damage: 6.0 + level as f32,
                attack_range: 240.0,
                fire_interval: 1.4,
                fire_cooldown: 0.0,
                projectile_speed: 380.0,
                splash_radius: 0.0,
            },
            raiders_to_spawn: 0,
            raider_spawn_timer: 0.0,
            raider_spawn_interval: RAIDER_SPAWN_INTERVAL,
            raider_aggro_active: false,
            raider_auto_timer: 0.0,
            raider_auto_interval: RAIDER_AUTO_INTERVAL,
            guards: Vec::new(),
            destroyed: false,
            hit_flash: 0.0,
        }
    }

    /// Advance timers; returns true when a raider should leave the base now
    pub fn update(&mut self, dt: f32) -> bool {
        self.hit_flash = (self.hit_flash - dt).max(0.0);
        self.turret.tick(dt);

        if self.destroyed {
            return false;
        }

        if self.raider_aggro_active {
            self.raider_auto_timer -= dt;
            if self.raider_auto_timer <= 0.0 {
                self.raider_auto_timer = self.raider_auto_interval;
                self.raiders_to_spawn += 1;
            }
        }

        if self.raiders_to_spawn > 0 {
            self.raider_spawn_timer -= dt;
            if self.raider_spawn_timer <= 0.0 {
                self.raider_spawn_timer = self.raider_spawn_interval;
                return self.consume_raider();
            }
        }
        false
    }

    /// Start the autonomous raider cycle; false if it was already running
    pub fn activate_raiders(&mut self) -> bool {
        if self.destroyed || self.raider_aggro_active {
            return false;
        }
        self.raider_aggro_active = true;
        self.raider_auto_timer = RAIDER_AGGRO_KICKOFF;
        self.queue_raiders(1);
        true
    }

    /// Raise the queue to at least `count`
    pub fn queue_raiders(&mut self, count: u32) {
        self.raiders_to_spawn = self.raiders_to_spawn.max(count);
    }

    fn consume_raider(&mut self) -> bool {
        if self.raiders_to_spawn > 0 {
            self.raiders_to_spawn -= 1;
            true
        } else {
            false
        }
    }

    pub fn is_in_aggro_range(&self, p: Vec2) -> bool {
        self.pos.distance_squared(p) <= self.aggro_radius * self.aggro_radius
    }

    /// Guard post in front of (left of) the base, alternating above/below
    pub fn guard_anchor(&self, index: usize) -> Vec2 {
        let dy = if index % 2 == 0 { -20.0 } else { 20.0 };
        Vec2::new(self.pos.x - self.size.x / 2.0 - 30.0, self.pos.y + dy)
    }

    /// Where raiders appear
    pub fn raider_spawn_point(&self) -> Vec2 {
        Vec2::new(self.pos.x - self.size.x / 2.0 - 10.0, self.pos.y)
    }

    /// Turret target: the player if in range, else the Nexus if in range
    ///
    /// `player` is `None` when the player is dead, `nexus` is `None` when
    /// destroyed; `nexus_size` is the Nexus footprint.
    pub fn select_target(&self, player: Option<Vec2>, nexus: Option<Vec2>, nexus_size: Vec2) -> Option<Vec2> {
        if self.destroyed {
            return None;
        }
        if let Some(p) = player {
            if self.turret.in_range(self.pos.distance(p)) {
                return Some(p);
            }
        }
        nexus.filter(|&n| self.turret.in_range(point_rect_distance(self.pos, n, nexus_size)))
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
            log::debug!("Base {:?} ({}) destroyed", self.id, self.team.as_str());
        }
    }

    pub fn heal(&mut self, amount: f32) {
        if self.destroyed {
            return;
        }
        self.hp = (self.hp + amount.max(0.0)).min(self.max_hp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> EnemyBase {
        EnemyBase::new(EntityId(1), Vec2::new(900.0, 300.0), Team::Red, 1, 170.0)
    }

    #[test]
    fn test_hp_scales_with_level() {
        assert_eq!(base().max_hp, 220.0);
        let b = EnemyBase::new(EntityId(2), Vec2::ZERO, Team::Blue, 3, 170.0);
        assert_eq!(b.max_hp, 220.0 + 2.0 * 55.0);
    }

    #[test]
    fn test_damage_terminal() {
        let mut b = base();
        for _ in 0..10 {
            b.take_damage(24.0);
        }
        assert_eq!(b.hp, 0.0);
        assert!(b.destroyed);
        b.take_damage(24.0);
        assert_eq!(b.hp, 0.0);
        b.heal(100.0);
        assert_eq!(b.hp, 0.0);
    }

    #[test]
    fn test_raider_queue_timing() {
        let mut b = base();
        b.queue_raiders(2);
        // First raider leaves on the next update
        assert!(b.update(0.016));
        assert_eq!(b.raiders_to_spawn, 1);
        // Second waits for the interval
        assert!(!b.update(1.0));
        assert!(b.update(0.6));
        assert_eq!(b.raiders_to_spawn, 0);
        assert!(!b.update(5.0));
    }

    #[test]
    fn test_aggro_activation_cycle() {
        let mut b = base();
        assert!(b.activate_raiders());
        assert!(!b.activate_raiders());
        assert_eq!(b.raiders_to_spawn, 1);

        // Queued raider plus the kickoff raider from the auto cycle
        let mut spawned = 0;
        let mut t = 0.0;
        while t < 3.5 {
            if b.update(0.1) {
                spawned += 1;
            }
            t += 0.1;
        }
        assert_eq!(spawned, 2);
    }

    #[test]
    fn test_destroyed_base_spawns_nothing() {
        let mut b = base();
        b.queue_raiders(3);
        b.take_damage(1000.0);
        assert!(!b.update(0.1));
        assert!(!b.activate_raiders());
        assert_eq!(b.select_target(Some(b.pos), None, BASE_SIZE), None);
    }

    #[test]
    fn test_turret_prefers_player_then_nexus() {
        let b = base();
        let player = Vec2::new(800.0, 300.0);
        let nexus = Vec2::new(700.0, 300.0);
        assert_eq!(b.select_target(Some(player), Some(nexus), BASE_SIZE), Some(player));
        assert_eq!(b.select_target(None, Some(nexus), BASE_SIZE), Some(nexus));
        assert_eq!(b.select_target(Some(Vec2::ZERO), Some(Vec2::ZERO), BASE_SIZE), None);
    }

    #[test]
    fn test_guard_anchors_alternate() {
        let b = base();
        assert_eq!(b.guard_anchor(0), Vec2::new(830.0, 280.0));
        assert_eq!(b.guard_anchor(1), Vec2::new(830.0, 320.0));
        assert!(b.is_in_aggro_range(Vec2::new(900.0, 469.0)));
        assert!(!b.is_in_aggro_range(Vec2::new(900.0, 471.0)));
    }
}
