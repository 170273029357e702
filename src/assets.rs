//! Image asset catalog
//!
//! The manifest is a nested JSON object whose leaves are image paths. It is
//! flattened into dotted keys (`"enemies.skeleton"`), which is also how the
//! renderer asks for handles. Pixel data never reaches this crate; the
//! browser side loads each path and reports back an opaque handle.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Opaque handle to an image owned by the host page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHandle(pub u32);

/// One flattened manifest leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    pub key: String,
    pub path: String,
}

/// Built-in sprite manifest
pub fn default_manifest() -> Value {
    json!({
        "player": {
            "idle": "assets/sprites/player/Pink_Monster_Idle_4.png",
            "walk": "assets/sprites/player/Pink_Monster_Walk_6.png",
            "run": "assets/sprites/player/Pink_Monster_Run_6.png",
            "hurt": "assets/sprites/player/Pink_Monster_Hurt_4.png",
            "death": "assets/sprites/player/Pink_Monster_Death_8.png"
        },
        "bases": {
            "castle_green": "assets/sprites/bases/spr_castle_green.png",
            "castle_red": "assets/sprites/bases/spr_castle_red.png"
        },
        "enemies": {
            "skeleton": "assets/sprites/enemies/spr_skeleton.png",
            "zombie": "assets/sprites/enemies/spr_zombie.png",
            "goblin": "assets/sprites/enemies/spr_goblin.png",
            "demon": "assets/sprites/enemies/spr_demon.png"
        },
        "projectiles": {
            "arrow": "assets/sprites/projectiles/spr_tower_archer_projectile.png",
            "cannon": "assets/sprites/projectiles/spr_tower_cannon_projectile.png"
        },
        "environment": {
            "tileset": "assets/sprites/environment/FieldsTileset.png",
            "background": "assets/background1.png"
        }
    })
}

/// Flatten a nested manifest into dotted keys
///
/// String leaves become entries; nested objects recurse; anything else is
/// skipped with a warning.
pub fn flatten_manifest(manifest: &Value) -> Vec<AssetEntry> {
    let mut out = Vec::new();
    flatten_into(manifest, "", &mut out);
    out
}

fn flatten_into(value: &Value, prefix: &str, out: &mut Vec<AssetEntry>) {
    let Value::Object(map) = value else {
        log::warn!("Asset manifest node '{}' is not an object", prefix);
        return;
    };
    for (key, child) in map {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match child {
            Value::String(path) => out.push(AssetEntry { key: full, path: path.clone() }),
            Value::Object(_) => flatten_into(child, &full, out),
            _ => log::warn!("Skipping non-path asset manifest entry '{}'", full),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
    Pending,
    Loaded(ImageHandle),
    /// Load failed; the game continues without it
    Failed,
}

#[derive(Debug, Clone)]
struct AssetSlot {
    path: String,
    status: AssetStatus,
}

/// Tracks every manifest entry from request to load/failure
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    slots: BTreeMap<String, AssetSlot>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_manifest(manifest: &Value) -> Self {
        let mut catalog = Self::new();
        for entry in flatten_manifest(manifest) {
            catalog.register(entry.key, entry.path);
        }
        log::info!("Asset catalog: {} entries", catalog.slots.len());
        catalog
    }

    /// Parse and flatten a JSON manifest document
    pub fn from_manifest_str(json: &str) -> Result<Self, serde_json::Error> {
        let manifest: Value = serde_json::from_str(json)?;
        Ok(Self::from_manifest(&manifest))
    }

    pub fn register(&mut self, key: impl Into<String>, path: impl Into<String>) {
        self.slots.insert(
            key.into(),
            AssetSlot {
                path: path.into(),
                status: AssetStatus::Pending,
            },
        );
    }

    /// `(key, path)` pairs still waiting to be loaded
    pub fn pending(&self) -> impl Iterator<Item = (&str, &str)> {
        self.slots
            .iter()
            .filter(|(_, s)| s.status == AssetStatus::Pending)
            .map(|(k, s)| (k.as_str(), s.path.as_str()))
    }

    /// Returns false for keys that were never registered
    pub fn mark_loaded(&mut self, key: &str, handle: ImageHandle) -> bool {
        self.set_status(key, AssetStatus::Loaded(handle))
    }

    pub fn mark_failed(&mut self, key: &str) -> bool {
        let known = self.set_status(key, AssetStatus::Failed);
        if known {
            log::error!("Failed to load asset: {}", key);
        }
        known
    }

    fn set_status(&mut self, key: &str, status: AssetStatus) -> bool {
        match self.slots.get_mut(key) {
            Some(slot) => {
                slot.status = status;
                true
            }
            None => {
                log::warn!("Unknown asset key reported: {}", key);
                false
            }
        }
    }

    /// `(settled, total)` where settled counts loaded and failed entries
    pub fn progress(&self) -> (usize, usize) {
        let settled = self.slots.values().filter(|s| s.status != AssetStatus::Pending).count();
        (settled, self.slots.len())
    }

    pub fn fraction(&self) -> f32 {
        match self.progress() {
            (_, 0) => 1.0,
            (done, total) => done as f32 / total as f32,
        }
    }

    /// Every entry has settled (failures included)
    pub fn is_ready(&self) -> bool {
        let (done, total) = self.progress();
        done == total
    }

    pub fn failed_count(&self) -> usize {
        self.slots.values().filter(|s| s.status == AssetStatus::Failed).count()
    }

    pub fn status(&self, key: &str) -> Option<AssetStatus> {
        self.slots.get(key).map(|s| s.status)
    }

    /// Handle for a dotted key; `None` (with a warning) when missing or not loaded
    pub fn get(&self, key: &str) -> Option<ImageHandle> {
        match self.slots.get(key).map(|s| s.status) {
            Some(AssetStatus::Loaded(handle)) => Some(handle),
            _ => {
                log::warn!("Asset not found: {}", key);
                None
            }
        }
    }
}
