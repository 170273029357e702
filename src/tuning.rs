//! Data-driven game balance
//!
//! Difficulty and weapon choices are plain enums that map to immutable
//! profile tables. Names coming from the outside (menus, saved progress)
//! are parsed once; unknown names fall back to the default with a warning.

use serde::{Deserialize, Serialize};

/// Level-generation knobs for one difficulty
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Fewest enemy bases on any level
    pub base_min: u32,
    /// Most enemy bases on any level
    pub base_max: u32,
    /// Guards per base at level 1
    pub guards_per_base: u32,
    pub npc_hp_multiplier: f32,
    pub npc_damage_multiplier: f32,
    /// Base aggro radius, also used as guard sense radius
    pub aggro_radius: f32,
}

/// Named difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Insane,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Insane,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Insane => "insane",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "insane" | "nightmare" => Some(Difficulty::Insane),
            _ => None,
        }
    }

    /// Parse a difficulty name, falling back to `Normal` for unknown input
    pub fn from_name_or_default(s: &str) -> Self {
        Self::from_name(s).unwrap_or_else(|| {
            log::warn!("Unknown difficulty '{}', using {}", s, Difficulty::default().as_str());
            Difficulty::default()
        })
    }

    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                base_min: 1,
                base_max: 2,
                guards_per_base: 1,
                npc_hp_multiplier: 0.65,
                npc_damage_multiplier: 0.65,
                aggro_radius: 150.0,
            },
            Difficulty::Normal => DifficultyProfile {
                base_min: 2,
                base_max: 3,
                guards_per_base: 1,
                npc_hp_multiplier: 0.8,
                npc_damage_multiplier: 0.8,
                aggro_radius: 170.0,
            },
            Difficulty::Hard => DifficultyProfile {
                base_min: 2,
                base_max: 3,
                guards_per_base: 2,
                npc_hp_multiplier: 0.95,
                npc_damage_multiplier: 0.95,
                aggro_radius: 190.0,
            },
            Difficulty::Insane => DifficultyProfile {
                base_min: 3,
                base_max: 4,
                guards_per_base: 3,
                npc_hp_multiplier: 1.15,
                npc_damage_multiplier: 1.1,
                aggro_radius: 210.0,
            },
        }
    }
}

/// Stats a weapon choice applies to the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponProfile {
    pub damage: f32,
    /// Seconds between shots
    pub fire_interval: f32,
    /// Maximum travel distance of a projectile
    pub range: f32,
    pub projectile_speed: f32,
    /// Projectiles per shot
    pub pellets: u32,
    /// Angle between adjacent pellets (radians)
    pub spread: f32,
}

/// Maximum damage bonus for a sniper shot aimed at full range
pub const SNIPER_MAX_BONUS: f32 = 1.0;
/// Distance band in which an SMG holder is hurt by nearby NPCs
pub const SMG_TOO_CLOSE_RANGE: f32 = 60.0;
/// Damage per second per NPC inside the band
pub const SMG_TOO_CLOSE_DPS: f32 = 6.0;

/// Player weapon classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeaponKind {
    #[default]
    Rifle,
    Sniper,
    Shotgun,
    Smg,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 4] = [
        WeaponKind::Rifle,
        WeaponKind::Sniper,
        WeaponKind::Shotgun,
        WeaponKind::Smg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::Rifle => "rifle",
            WeaponKind::Sniper => "sniper",
            WeaponKind::Shotgun => "shotgun",
            WeaponKind::Smg => "smg",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "rifle" => Some(WeaponKind::Rifle),
            "sniper" => Some(WeaponKind::Sniper),
            "shotgun" => Some(WeaponKind::Shotgun),
            "smg" | "submachine" | "submachinegun" => Some(WeaponKind::Smg),
            _ => None,
        }
    }

    pub fn from_name_or_default(s: &str) -> Self {
        Self::from_name(s).unwrap_or_else(|| {
            log::warn!("Unknown weapon '{}', using {}", s, WeaponKind::default().as_str());
            WeaponKind::default()
        })
    }

    pub fn profile(&self) -> WeaponProfile {
        match self {
            WeaponKind::Rifle => WeaponProfile {
                damage: 22.0,
                fire_interval: 0.14,
                range: 600.0,
                projectile_speed: 560.0,
                pellets: 1,
                spread: 0.0,
            },
            WeaponKind::Sniper => WeaponProfile {
                damage: 48.0,
                fire_interval: 0.9,
                range: 900.0,
                projectile_speed: 900.0,
                pellets: 1,
                spread: 0.0,
            },
            WeaponKind::Shotgun => WeaponProfile {
                damage: 12.0,
                fire_interval: 0.7,
                range: 320.0,
                projectile_speed: 520.0,
                pellets: 5,
                spread: 0.12,
            },
            WeaponKind::Smg => WeaponProfile {
                damage: 9.0,
                fire_interval: 0.06,
                range: 450.0,
                projectile_speed: 620.0,
                pellets: 1,
                spread: 0.0,
            },
        }
    }

    /// Sniper damage multiplier for a shot aimed `aim_distance` away
    ///
    /// Grows linearly from 1.0 at the muzzle to `1 + SNIPER_MAX_BONUS` at
    /// full range; other weapons always return 1.0.
    pub fn damage_multiplier(&self, aim_distance: f32, range: f32) -> f32 {
        match self {
            WeaponKind::Sniper if range > 0.0 => {
                1.0 + (aim_distance.clamp(0.0, range) / range) * SNIPER_MAX_BONUS
            }
            _ => 1.0,
        }
    }

    /// Whether NPCs standing too close hurt the holder
    pub fn penalized_up_close(&self) -> bool {
        matches!(self, WeaponKind::Smg)
    }
}
