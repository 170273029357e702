//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - One variable step per frame, clamped by `tick`
//! - Randomness only from the world's seeded RNG
//! - Entities reference each other by `EntityId`/`TargetRef`, never by pointer

pub mod autopilot;
pub mod base;
pub mod collision;
pub mod geometry;
pub mod level;
pub mod nexus;
pub mod npc;
pub mod player;
pub mod projectile;
pub mod state;
pub mod tick;
pub mod turret;

pub use autopilot::autopilot_input;
pub use base::EnemyBase;
pub use collision::{aggro_triggered, resolve};
pub use level::{LevelGenerator, LevelInfo, LevelLayout};
pub use nexus::Nexus;
pub use npc::{Npc, NpcAnim, NpcContext, NpcRole, NpcState, TargetRef};
pub use player::Player;
pub use projectile::Projectile;
pub use state::{
    DamageText, DebugOverlays, DefeatReason, EntityId, GameEvent, GamePhase, IdAllocator, ImpactKind, Particle,
    Team, World,
};
pub use tick::{Action, TickInput, tick};
pub use turret::Turret;
