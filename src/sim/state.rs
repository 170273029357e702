//! Game state and core simulation types
//!
//! The `World` is the single owner of every entity collection. Components
//! never hold references into it; cross-entity links are `EntityId`
//! handles or `TargetRef` tags resolved through the world each frame.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::base::EnemyBase;
use super::level::{LevelGenerator, LevelLayout};
use super::nexus::Nexus;
use super::npc::Npc;
use super::player::Player;
use super::projectile::Projectile;
use crate::consts::*;
use crate::tuning::{Difficulty, WeaponKind};

/// Overall game phase; entity simulation only advances in `Playing`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Assets still loading
    Loading,
    /// Title/menu screen
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// All enemy bases destroyed, waiting for "continue"
    LevelUp,
    /// Player or Nexus lost, waiting for "retry"
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefeatReason {
    PlayerDefeated,
    NexusDestroyed,
}

/// Team tags; projectiles carry their shooter's team as owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Player,
    Red,
    Blue,
    Green,
}

impl Team {
    /// Rotation used when assigning teams to enemy bases
    pub const ENEMIES: [Team; 3] = [Team::Red, Team::Blue, Team::Green];

    pub fn is_enemy(&self) -> bool {
        *self != Team::Player
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Player => "player",
            Team::Red => "red",
            Team::Blue => "blue",
            Team::Green => "green",
        }
    }
}

/// Stable handle for bases and NPCs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Monotonic id source owned by the world
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// What a collision produced; drives particles and damage numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactKind {
    NpcHit,
    BaseHit,
    PlayerHit,
    NexusHit,
}

/// Events raised during a frame, drained by the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Burst of `count` particles at `pos`
    Particles {
        pos: Vec2,
        kind: ImpactKind,
        count: u32,
    },
    /// Floating damage number
    DamageText {
        pos: Vec2,
        amount: f32,
        kind: ImpactKind,
    },
}

/// Particles per impact burst
pub const IMPACT_PARTICLES: u32 = 6;
/// Maximum particles alive at once
pub const MAX_PARTICLES: usize = 256;
/// Lifetime of a floating damage number
pub const DAMAGE_TEXT_SECS: f32 = 0.8;
/// Rise speed of a floating damage number (px/s)
const DAMAGE_TEXT_RISE: f32 = 40.0;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: ImpactKind,
    /// Seconds remaining
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
}

/// Floating damage number
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageText {
    pub pos: Vec2,
    pub amount: f32,
    pub kind: ImpactKind,
    pub life: f32,
}

/// Renderer debug overlays toggled from input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugOverlays {
    pub grid: bool,
    pub aggro_radius: bool,
}

/// Authoritative simulation state
#[derive(Debug, Clone)]
pub struct World {
    /// Playfield size
    pub width: f32,
    pub height: f32,
    /// Current level (1-based)
    pub level: u32,
    /// Difficulty the current level was generated with
    pub difficulty: Difficulty,
    pub phase: GamePhase,
    /// Set when the phase becomes `GameOver`
    pub defeat: Option<DefeatReason>,
    /// Simulated seconds spent in `Playing`
    pub time: f32,
    pub player: Player,
    pub nexus: Nexus,
    pub bases: Vec<EnemyBase>,
    pub npcs: Vec<Npc>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub damage_texts: Vec<DamageText>,
    /// Pending events for the current frame
    pub events: Vec<GameEvent>,
    pub debug: DebugOverlays,
    pub ids: IdAllocator,
    rng: Pcg32,
}

impl World {
    /// Fresh world with the player and Nexus in their starting spots and no enemies
    pub fn new(width: f32, height: f32, seed: u64, weapon: WeaponKind) -> Self {
        Self {
            width,
            height,
            level: 1,
            difficulty: Difficulty::default(),
            phase: GamePhase::Playing,
            defeat: None,
            time: 0.0,
            player: Player::new(Self::player_start_for(height), weapon),
            nexus: Nexus::new(Vec2::new(NEXUS_X, height / 2.0)),
            bases: Vec::new(),
            npcs: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            damage_texts: Vec::new(),
            events: Vec::new(),
            debug: DebugOverlays::default(),
            ids: IdAllocator::default(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn player_start_for(height: f32) -> Vec2 {
        Vec2::new(PLAYER_START_X, height / 2.0)
    }

    pub fn player_start(&self) -> Vec2 {
        Self::player_start_for(self.height)
    }

    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Install a generated level: replaces enemies, clears transient
    /// entities and puts the player back at the start.
    pub fn install_level(&mut self, level: u32, layout: LevelLayout) {
        self.level = level;
        self.bases = layout.bases;
        self.npcs = layout.npcs;
        self.projectiles.clear();
        self.particles.clear();
        self.damage_texts.clear();
        self.events.clear();
        self.defeat = None;
        self.player.pos = self.player_start();
        self.player.vel = Vec2::ZERO;
    }

    /// Generate `level` with the world's RNG and ids, then install it
    pub fn load_level(&mut self, generator: &LevelGenerator, level: u32) {
        let layout = generator.generate_level(level, &mut self.rng, &mut self.ids);
        self.difficulty = generator.difficulty();
        self.install_level(level, layout);
    }

    pub fn base(&self, id: EntityId) -> Option<&EnemyBase> {
        self.bases.iter().find(|b| b.id == id)
    }

    pub fn npc(&self, id: EntityId) -> Option<&Npc> {
        self.npcs.iter().find(|n| n.id == id)
    }

    /// Enemy bases not yet destroyed
    pub fn active_base_count(&self) -> usize {
        self.bases.iter().filter(|b| !b.destroyed).count()
    }

    /// Turn queued events into particles and damage numbers, emptying the queue
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        let events = std::mem::take(&mut self.events);
        for event in &events {
            match *event {
                GameEvent::Particles { pos, kind, count } => {
                    for _ in 0..count {
                        if self.particles.len() >= MAX_PARTICLES {
                            break;
                        }
                        let vel = Vec2::new(
                            self.rng.random_range(-80.0..80.0),
                            self.rng.random_range(-80.0..80.0),
                        );
                        let life = self.rng.random_range(0.2..0.5);
                        self.particles.push(Particle {
                            pos,
                            vel,
                            kind,
                            life,
                            max_life: 0.5,
                            size: 3.0,
                        });
                    }
                }
                GameEvent::DamageText { pos, amount, kind } => {
                    self.damage_texts.push(DamageText {
                        pos,
                        amount,
                        kind,
                        life: DAMAGE_TEXT_SECS,
                    });
                }
            }
        }
        events
    }

    /// Advance particles and floating text (no collision)
    pub fn update_effects(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.life -= dt;
            p.pos += p.vel * dt;
        }
        self.particles.retain(|p| p.life > 0.0);

        for t in &mut self.damage_texts {
            t.life -= dt;
            t.pos.y -= DAMAGE_TEXT_RISE * dt;
        }
        self.damage_texts.retain(|t| t.life > 0.0);
    }
}
