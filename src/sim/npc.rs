//! Enemy NPCs and their guard AI
//!
//! Guards run a three-state machine:
//!
//! - `Guard`: drift back to the anchor at reduced speed, watch for the player
//! - `Chase`: run at the target, stop at `stop_distance` and shoot
//! - `Return`: walk back to the anchor at full speed
//!
//! Re-engaging from `Return` needs the player closer (`0.9 × sense`) than
//! the initial detection, and a chase is only abandoned beyond `1.4 × sense`,
//! so a player standing near the sense boundary does not cause flip-flopping.
//!
//! Raiders skip the guard machine: they spawn in `Chase` aimed at the Nexus,
//! divert to the player when the player comes within sense range, and never
//! return home.
//!
//! Death is a separate flag. A dead NPC stops thinking and moving and is
//! removed by the game loop once its death grace period is over.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::step_toward;
use super::state::{EntityId, Team};
use crate::angle_to;
use crate::consts::{HIT_FLASH_SECS, WALK_SPEED_THRESHOLD};
use crate::tuning::DifficultyProfile;

pub const NPC_RADIUS: f32 = 24.0;
pub const NPC_SENSE_RADIUS: f32 = 170.0;
pub const NPC_LEASH_RADIUS: f32 = 230.0;
pub const NPC_STOP_DISTANCE: f32 = 150.0;

/// Chase is abandoned past `sense × ESCAPE_FACTOR`
pub const ESCAPE_FACTOR: f32 = 1.4;
/// Returning NPCs re-engage inside `sense × REENGAGE_FACTOR`
pub const REENGAGE_FACTOR: f32 = 0.9;
/// Speed multiplier while idling back to the anchor
pub const GUARD_DRIFT_FACTOR: f32 = 0.6;
/// Guards ignore anchor offsets below this
const GUARD_ANCHOR_SLACK: f32 = 4.0;
/// Distance at which a returning NPC counts as home
pub const RETURN_ARRIVAL_EPSILON: f32 = 6.0;

/// Seconds a dead NPC lingers before removal
pub const DEATH_GRACE_SECS: f32 = 3.0;
/// Length of the attack pose after a shot
const ATTACK_ANIM_SECS: f32 = 0.4;

/// Guard AI state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NpcState {
    Guard,
    Chase,
    Return,
}

/// How the NPC came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NpcRole {
    /// Placed at level generation, anchored to a base
    Guard,
    /// Spawned mid-level to attack the Nexus
    Raider,
}

/// Weak reference to something an NPC can attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetRef {
    Player,
    Nexus,
}

/// Sprite selection hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NpcAnim {
    Idle,
    Walk,
    Attack,
    Death,
}

impl NpcAnim {
    pub fn as_str(&self) -> &'static str {
        match self {
            NpcAnim::Idle => "idle",
            NpcAnim::Walk => "walk",
            NpcAnim::Attack => "attack",
            NpcAnim::Death => "death",
        }
    }
}

/// Positions an NPC needs to resolve its handles for one frame
#[derive(Debug, Clone, Copy)]
pub struct NpcContext {
    /// `None` while the player is dead
    pub player: Option<Vec2>,
    /// `None` once the Nexus is destroyed
    pub nexus: Option<Vec2>,
    /// Home base position (falls back to the anchor when the base is unknown)
    pub home: Vec2,
}

impl NpcContext {
    pub fn resolve(&self, target: TargetRef) -> Option<Vec2> {
        match target {
            TargetRef::Player => self.player,
            TargetRef::Nexus => self.nexus,
        }
    }
}

/// Per-level combat and movement stats before difficulty scaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NpcStats {
    pub speed: f32,
    pub hp: f32,
    pub damage: f32,
    pub range: f32,
    pub fire_interval: f32,
    pub sense_radius: f32,
}

impl NpcStats {
    pub fn for_level(level: u32) -> Self {
        let steps = level.max(1) - 1;
        Self {
            speed: 96.0 + (steps as f32 * 4.0).min(40.0),
            hp: 100.0 + steps as f32 * 16.0,
            damage: 8.0,
            range: 200.0,
            fire_interval: 0.95,
            sense_radius: NPC_SENSE_RADIUS,
        }
    }

    /// Apply difficulty multipliers (rounded) and the difficulty aggro radius
    pub fn scaled(mut self, profile: &DifficultyProfile) -> Self {
        self.hp = (self.hp * profile.npc_hp_multiplier).round().max(1.0);
        self.damage = (self.damage * profile.npc_damage_multiplier).round().max(1.0);
        self.sense_radius = profile.aggro_radius;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Npc {
    pub id: EntityId,
    pub pos: Vec2,
    pub radius: f32,
    pub team: Team,
    pub role: NpcRole,
    /// Owning base (lookup only)
    pub base_home: Option<EntityId>,
    /// Guard post
    pub anchor: Vec2,
    pub state: NpcState,
    pub target: Option<TargetRef>,
    pub speed: f32,
    /// Derived from the last frame's displacement
    pub vel: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub damage: f32,
    pub range: f32,
    /// Seconds between shots
    pub fire_interval: f32,
    pub fire_cooldown: f32,
    pub sense_radius: f32,
    pub leash_radius: f32,
    pub stop_distance: f32,
    /// Aim angle
    pub facing: f32,
    pub facing_left: bool,
    pub hit_flash: f32,
    pub attack_timer: f32,
    pub death_timer: f32,
    pub alive: bool,
}

impl Npc {
    fn with_stats(id: EntityId, pos: Vec2, team: Team, role: NpcRole, base_home: Option<EntityId>, stats: NpcStats) -> Self {
        Self {
            id,
            pos,
            radius: NPC_RADIUS,
            team,
            role,
            base_home,
            anchor: pos,
            state: NpcState::Guard,
            target: None,
            speed: stats.speed,
            vel: Vec2::ZERO,
            hp: stats.hp,
            max_hp: stats.hp,
            damage: stats.damage,
            range: stats.range,
            fire_interval: stats.fire_interval,
            fire_cooldown: 0.0,
            sense_radius: stats.sense_radius,
            leash_radius: NPC_LEASH_RADIUS,
            stop_distance: NPC_STOP_DISTANCE,
            facing: 0.0,
            facing_left: true,
            hit_flash: 0.0,
            attack_timer: 0.0,
            death_timer: 0.0,
            alive: true,
        }
    }

    /// Guard anchored at `anchor`, stats scaled by level and difficulty
    pub fn new_guard(
        id: EntityId,
        anchor: Vec2,
        team: Team,
        base_home: Option<EntityId>,
        level: u32,
        profile: &DifficultyProfile,
    ) -> Self {
        let stats = NpcStats::for_level(level).scaled(profile);
        Self::with_stats(id, anchor, team, NpcRole::Guard, base_home, stats)
    }

    /// Raider heading for the Nexus
    pub fn new_raider(
        id: EntityId,
        pos: Vec2,
        team: Team,
        base_home: Option<EntityId>,
        level: u32,
        profile: &DifficultyProfile,
    ) -> Self {
        let stats = NpcStats::for_level(level).scaled(profile);
        let mut npc = Self::with_stats(id, pos, team, NpcRole::Raider, base_home, stats);
        npc.state = NpcState::Chase;
        npc.target = Some(TargetRef::Nexus);
        npc
    }

    /// One frame of AI, movement and timers
    pub fn update(&mut self, dt: f32, ctx: &NpcContext) {
        if !self.alive {
            self.death_timer += dt;
            self.vel = Vec2::ZERO;
            return;
        }

        let prev = self.pos;
        self.hit_flash = (self.hit_flash - dt).max(0.0);
        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        self.attack_timer = (self.attack_timer - dt).max(0.0);

        match self.role {
            NpcRole::Guard => match self.state {
                NpcState::Guard => self.update_guard(dt, ctx),
                NpcState::Chase => self.update_chase(dt, ctx),
                NpcState::Return => self.update_return(dt, ctx),
            },
            NpcRole::Raider => self.update_raider(dt, ctx),
        }

        self.vel = if dt > 0.0 { (self.pos - prev) / dt } else { Vec2::ZERO };
        if self.vel.x.abs() > WALK_SPEED_THRESHOLD {
            self.facing_left = self.vel.x < 0.0;
        }
        if let Some(target) = self.target.and_then(|t| ctx.resolve(t)) {
            self.facing = angle_to(self.pos, target);
            self.facing_left = target.x < self.pos.x;
        }
    }

    fn update_guard(&mut self, dt: f32, ctx: &NpcContext) {
        if self.pos.distance(self.anchor) > GUARD_ANCHOR_SLACK {
            self.pos = step_toward(self.pos, self.anchor, self.speed * GUARD_DRIFT_FACTOR * dt);
        }

        if let Some(player) = ctx.player {
            if self.pos.distance(player) <= self.sense_radius {
                self.state = NpcState::Chase;
                self.target = Some(TargetRef::Player);
            }
        }
    }

    fn update_chase(&mut self, dt: f32, ctx: &NpcContext) {
        let Some(target) = self.target.and_then(|t| ctx.resolve(t)) else {
            // Target gone (dead/destroyed) or never set
            self.begin_return();
            return;
        };

        if self.pos.distance(ctx.home) > self.leash_radius {
            self.begin_return();
            return;
        }

        let dist = self.pos.distance(target);
        if dist > self.sense_radius * ESCAPE_FACTOR {
            self.begin_return();
            return;
        }

        if dist > self.stop_distance {
            self.pos = step_toward(self.pos, target, self.speed * dt);
        }
    }

    fn update_return(&mut self, dt: f32, ctx: &NpcContext) {
        if self.pos.distance(self.anchor) < RETURN_ARRIVAL_EPSILON {
            self.state = NpcState::Guard;
            self.target = None;
            return;
        }

        self.pos = step_toward(self.pos, self.anchor, self.speed * dt);

        if let Some(player) = ctx.player {
            if self.pos.distance(player) <= self.sense_radius * REENGAGE_FACTOR {
                self.state = NpcState::Chase;
                self.target = Some(TargetRef::Player);
            }
        }
    }

    fn update_raider(&mut self, dt: f32, ctx: &NpcContext) {
        self.state = NpcState::Chase;

        let player_dist = ctx.player.map(|p| self.pos.distance(p));
        let keep_player = self.target == Some(TargetRef::Player)
            && player_dist.is_some_and(|d| d <= self.sense_radius * ESCAPE_FACTOR);
        let sees_player = player_dist.is_some_and(|d| d <= self.sense_radius);

        self.target = if sees_player || keep_player {
            Some(TargetRef::Player)
        } else if ctx.nexus.is_some() {
            Some(TargetRef::Nexus)
        } else {
            None
        };

        if let Some(target) = self.target.and_then(|t| ctx.resolve(t)) {
            if self.pos.distance(target) > self.stop_distance {
                self.pos = step_toward(self.pos, target, self.speed * dt);
            }
        }
    }

    fn begin_return(&mut self) {
        self.state = NpcState::Return;
        self.target = None;
    }

    /// Cooldown elapsed and a target is set
    pub fn can_shoot(&self) -> bool {
        self.alive && self.fire_cooldown <= 0.0 && self.target.is_some()
    }

    /// Where the current target is, if it still exists
    pub fn target_position(&self, ctx: &NpcContext) -> Option<Vec2> {
        self.target.and_then(|t| ctx.resolve(t))
    }

    /// Fire at `target` if ready and within weapon range; false when gated
    pub fn shoot(&mut self, target: Vec2) -> bool {
        if !self.can_shoot() || self.pos.distance(target) > self.range {
            return false;
        }
        self.fire_cooldown = self.fire_interval;
        self.attack_timer = ATTACK_ANIM_SECS;
        true
    }

    pub fn take_damage(&mut self, amount: f32) {
        if !self.alive || amount <= 0.0 {
            return;
        }
        self.hp -= amount;
        self.hit_flash = HIT_FLASH_SECS;
        if self.hp <= 0.0 {
            self.hp = 0.0;
            self.alive = false;
            self.target = None;
        }
    }

    /// Dead long enough to be removed
    pub fn is_expired(&self) -> bool {
        !self.alive && self.death_timer >= DEATH_GRACE_SECS
    }

    pub fn anim(&self) -> NpcAnim {
        if !self.alive {
            NpcAnim::Death
        } else if self.attack_timer > 0.0 {
            NpcAnim::Attack
        } else if self.vel.x.abs() > WALK_SPEED_THRESHOLD || self.vel.y.abs() > WALK_SPEED_THRESHOLD {
            NpcAnim::Walk
        } else {
            NpcAnim::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Difficulty;

    const DT: f32 = 0.001;

    fn guard_at(anchor: Vec2) -> Npc {
        let mut profile = Difficulty::Normal.profile();
        profile.aggro_radius = 170.0;
        Npc::new_guard(EntityId(1), anchor, Team::Red, Some(EntityId(100)), 1, &profile)
    }

    fn ctx(player: Vec2, home: Vec2) -> NpcContext {
        NpcContext {
            player: Some(player),
            nexus: Some(Vec2::new(100.0, 360.0)),
            home,
        }
    }

    #[test]
    fn test_stats_scale_with_level_and_difficulty() {
        let s1 = NpcStats::for_level(1);
        let s20 = NpcStats::for_level(20);
        assert_eq!(s1.speed, 96.0);
        assert_eq!(s20.speed, 136.0);
        assert_eq!(s20.hp, 100.0 + 19.0 * 16.0);

        let easy = s1.scaled(&Difficulty::Easy.profile());
        assert_eq!(easy.hp, 65.0);
        assert_eq!(easy.damage, 5.0);
        assert_eq!(easy.sense_radius, 150.0);
    }

    #[test]
    fn test_guard_detects_player() {
        let anchor = Vec2::new(800.0, 360.0);
        let mut npc = guard_at(anchor);
        npc.update(DT, &ctx(anchor + Vec2::new(-175.0, 0.0), anchor));
        assert_eq!(npc.state, NpcState::Guard);
        assert_eq!(npc.target, None);

        npc.update(DT, &ctx(anchor + Vec2::new(-169.0, 0.0), anchor));
        assert_eq!(npc.state, NpcState::Chase);
        assert_eq!(npc.target, Some(TargetRef::Player));
    }

    #[test]
    fn test_guard_drifts_home_slowly() {
        let anchor = Vec2::new(800.0, 360.0);
        let mut npc = guard_at(anchor);
        npc.pos = anchor + Vec2::new(50.0, 0.0);
        npc.update(0.1, &ctx(Vec2::new(0.0, 0.0), anchor));
        let moved = 50.0 - npc.pos.distance(anchor);
        assert!((moved - npc.speed * GUARD_DRIFT_FACTOR * 0.1).abs() < 1e-3);
    }

    #[test]
    fn test_chase_stops_at_stop_distance() {
        let anchor = Vec2::new(800.0, 360.0);
        let mut npc = guard_at(anchor);
        npc.state = NpcState::Chase;
        npc.target = Some(TargetRef::Player);
        let player = anchor + Vec2::new(-140.0, 0.0);
        npc.update(0.1, &ctx(player, anchor));
        assert_eq!(npc.pos, anchor);
        assert_eq!(npc.state, NpcState::Chase);
        assert!(npc.facing_left);
    }

    #[test]
    fn test_leash_forces_return() {
        let home = Vec2::new(900.0, 360.0);
        let mut npc = guard_at(Vec2::new(830.0, 360.0));
        npc.state = NpcState::Chase;
        npc.target = Some(TargetRef::Player);
        // 240 px from home, player well within sense range
        npc.pos = Vec2::new(660.0, 360.0);
        npc.update(DT, &ctx(Vec2::new(560.0, 360.0), home));
        assert_eq!(npc.state, NpcState::Return);
        assert_eq!(npc.target, None);
    }

    #[test]
    fn test_return_arrives_and_guards() {
        let anchor = Vec2::new(800.0, 360.0);
        let mut npc = guard_at(anchor);
        npc.state = NpcState::Return;
        npc.pos = anchor + Vec2::new(-20.0, 0.0);
        let far_player = Vec2::new(10.0, 10.0);
        for _ in 0..10 {
            npc.update(0.1, &ctx(far_player, anchor));
        }
        assert_eq!(npc.state, NpcState::Guard);
        assert_eq!(npc.target, None);
    }

    #[test]
    fn test_dead_target_abandons_chase() {
        let anchor = Vec2::new(800.0, 360.0);
        let mut npc = guard_at(anchor);
        npc.state = NpcState::Chase;
        npc.target = Some(TargetRef::Player);
        let c = NpcContext {
            player: None,
            nexus: None,
            home: anchor,
        };
        npc.update(DT, &c);
        assert_eq!(npc.state, NpcState::Return);
        assert_eq!(npc.target, None);
    }

    #[test]
    fn test_shoot_gating() {
        let anchor = Vec2::new(800.0, 360.0);
        let mut npc = guard_at(anchor);
        let target = anchor + Vec2::new(-100.0, 0.0);

        // No target yet
        assert!(!npc.shoot(target));
        npc.target = Some(TargetRef::Player);
        assert!(npc.shoot(target));
        assert_eq!(npc.anim(), NpcAnim::Attack);
        // Cooling down
        assert!(!npc.shoot(target));
        npc.fire_cooldown = 0.0;
        // Out of range
        assert!(!npc.shoot(anchor + Vec2::new(-250.0, 0.0)));
    }

    #[test]
    fn test_death_freezes_and_expires() {
        let anchor = Vec2::new(800.0, 360.0);
        let mut npc = guard_at(anchor);
        npc.take_damage(npc.max_hp + 5.0);
        assert!(!npc.alive);
        assert_eq!(npc.hp, 0.0);
        npc.take_damage(10.0);
        assert_eq!(npc.hp, 0.0);

        let player = anchor + Vec2::new(-50.0, 0.0);
        npc.update(1.0, &ctx(player, anchor));
        assert_eq!(npc.pos, anchor);
        assert_eq!(npc.state, NpcState::Guard);
        assert!(!npc.is_expired());
        npc.update(2.0, &ctx(player, anchor));
        assert!(npc.is_expired());
        assert_eq!(npc.anim(), NpcAnim::Death);
    }

    #[test]
    fn test_raider_targets() {
        let profile = Difficulty::Normal.profile();
        let nexus = Vec2::new(100.0, 360.0);
        let mut raider = Npc::new_raider(EntityId(5), Vec2::new(900.0, 360.0), Team::Blue, Some(EntityId(1)), 1, &profile);
        assert_eq!(raider.state, NpcState::Chase);
        assert_eq!(raider.target, Some(TargetRef::Nexus));

        // Far from the player: heads for the Nexus
        let c = NpcContext { player: Some(Vec2::new(900.0, 50.0)), nexus: Some(nexus), home: Vec2::new(900.0, 360.0) };
        raider.update(0.5, &c);
        assert_eq!(raider.target, Some(TargetRef::Nexus));
        assert!(raider.pos.x < 900.0);

        // Player steps in close: diverts
        let near = raider.pos + Vec2::new(0.0, 100.0);
        let c = NpcContext { player: Some(near), ..c };
        raider.update(DT, &c);
        assert_eq!(raider.target, Some(TargetRef::Player));

        // Never goes home, even far past the leash
        raider.pos = Vec2::new(300.0, 360.0);
        raider.update(DT, &NpcContext { player: None, ..c });
        assert_eq!(raider.state, NpcState::Chase);
        assert_eq!(raider.target, Some(TargetRef::Nexus));
    }
}
