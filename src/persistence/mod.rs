//! Best-effort progress persistence
//!
//! Two JSON values in a string-keyed store:
//! - the progress record (level, difficulty name, weapon name)
//! - the best level reached per difficulty
//!
//! The `try_*` methods report failures; the plain methods log them and
//! carry on as if nothing was saved.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::highscores::BestLevels;
use crate::platform::{KeyValueStore, StorageError};
use crate::tuning::{Difficulty, WeaponKind};

pub const PROGRESS_KEY: &str = "nexus_defender_progress";
pub const BEST_LEVELS_KEY: &str = "nexus_defender_best_levels";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("corrupt save data: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Saved run
///
/// Names are kept as strings so a record written by a build with more
/// difficulties or weapons still loads; unknown names resolve to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub level: u32,
    pub difficulty: String,
    pub weapon: String,
}

impl ProgressRecord {
    pub fn new(level: u32, difficulty: Difficulty, weapon: WeaponKind) -> Self {
        Self {
            level,
            difficulty: difficulty.as_str().to_string(),
            weapon: weapon.as_str().to_string(),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_name_or_default(&self.difficulty)
    }

    pub fn weapon(&self) -> WeaponKind {
        WeaponKind::from_name_or_default(&self.weapon)
    }
}

pub struct Persistence<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn try_load_progress(&self) -> Result<Option<ProgressRecord>, PersistenceError> {
        match self.store.get(PROGRESS_KEY)? {
            Some(json) => {
                let mut record: ProgressRecord = serde_json::from_str(&json)?;
                record.level = record.level.max(1);
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    pub fn try_save_progress(&mut self, record: &ProgressRecord) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(record)?;
        self.store.set(PROGRESS_KEY, &json)?;
        Ok(())
    }

    pub fn try_clear_progress(&mut self) -> Result<(), PersistenceError> {
        self.store.remove(PROGRESS_KEY)?;
        Ok(())
    }

    pub fn try_load_best_levels(&self) -> Result<BestLevels, PersistenceError> {
        match self.store.get(BEST_LEVELS_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(BestLevels::default()),
        }
    }

    pub fn try_save_best_levels(&mut self, best: &BestLevels) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(best)?;
        self.store.set(BEST_LEVELS_KEY, &json)?;
        Ok(())
    }

    /// Saved progress, or `None` when missing, unreadable or corrupt
    pub fn load_progress(&self) -> Option<ProgressRecord> {
        match self.try_load_progress() {
            Ok(Some(record)) => {
                log::info!("Found saved progress at level {} ({})", record.level, record.difficulty);
                Some(record)
            }
            Ok(None) => {
                log::info!("No saved progress found, starting fresh");
                None
            }
            Err(e) => {
                log::warn!("Ignoring saved progress: {}", e);
                None
            }
        }
    }

    /// Returns whether the record was written
    pub fn save_progress(&mut self, record: &ProgressRecord) -> bool {
        match self.try_save_progress(record) {
            Ok(()) => {
                log::info!("Progress saved (level {})", record.level);
                true
            }
            Err(e) => {
                log::warn!("Failed to save progress: {}", e);
                false
            }
        }
    }

    pub fn clear_progress(&mut self) {
        match self.try_clear_progress() {
            Ok(()) => log::info!("Saved progress cleared"),
            Err(e) => log::warn!("Failed to clear progress: {}", e),
        }
    }

    pub fn load_best_levels(&self) -> BestLevels {
        self.try_load_best_levels().unwrap_or_else(|e| {
            log::warn!("Ignoring saved best levels: {}", e);
            BestLevels::default()
        })
    }

    pub fn save_best_levels(&mut self, best: &BestLevels) -> bool {
        match self.try_save_best_levels(best) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to save best levels: {}", e);
                false
            }
        }
    }
}
