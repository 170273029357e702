//! Nexus Defender - twin-stick shooting meets base defense
//!
//! Core modules:
//! - `sim`: Per-frame simulation (entities, NPC AI, collisions, level generation)
//! - `session`: Overall game-state machine around the simulation
//! - `snapshot`: Read-only entity views for the renderer and HUD
//! - `platform`: Browser/native abstraction (input state, key-value storage)
//! - `persistence`: Best-effort progress save/load
//! - `tuning`: Data-driven difficulty and weapon balance
//! - `assets`: Dotted-key image handle catalog

pub mod assets;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod sim;
pub mod snapshot;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::BestLevels;
pub use session::{Session, SessionConfig};
pub use tuning::{Difficulty, WeaponKind};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default playfield size in pixels
    pub const PLAYFIELD_WIDTH: f32 = 1280.0;
    pub const PLAYFIELD_HEIGHT: f32 = 720.0;

    /// Largest frame step the simulation accepts (stalled tabs are clamped to this)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Player spawn offset from the left edge
    pub const PLAYER_START_X: f32 = 160.0;
    /// Nexus offset from the left edge
    pub const NEXUS_X: f32 = 100.0;

    /// Visual hit-flash written on any entity that takes damage
    pub const HIT_FLASH_SECS: f32 = 0.18;
    /// Slightly longer flash for splash and structure hits
    pub const HEAVY_HIT_FLASH_SECS: f32 = 0.2;

    /// Speed threshold (px/s) separating idle from walking
    pub const WALK_SPEED_THRESHOLD: f32 = 10.0;
}

/// Angle (radians) of the vector pointing from `from` to `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector for an angle
#[inline]
pub fn from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
