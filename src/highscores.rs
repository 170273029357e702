//! Best level reached per difficulty
//!
//! Persisted alongside the progress record; see `persistence`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tuning::Difficulty;

/// Highest level reached, keyed by difficulty name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BestLevels {
    levels: BTreeMap<String, u32>,
}

impl BestLevels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a level; returns true if it is a new best for `difficulty`
    pub fn record(&mut self, difficulty: Difficulty, level: u32) -> bool {
        let entry = self.levels.entry(difficulty.as_str().to_string()).or_insert(0);
        if level > *entry {
            *entry = level;
            true
        } else {
            false
        }
    }

    /// Best level for a difficulty (0 if never played)
    pub fn best(&self, difficulty: Difficulty) -> u32 {
        self.levels.get(difficulty.as_str()).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Best level across all difficulties
    pub fn highest_overall(&self) -> Option<(Difficulty, u32)> {
        self.levels
            .iter()
            .filter_map(|(name, &level)| Difficulty::from_name(name).map(|d| (d, level)))
            .max_by_key(|&(_, level)| level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_high_water_mark() {
        let mut best = BestLevels::new();
        assert!(best.is_empty());
        assert!(best.record(Difficulty::Hard, 3));
        assert!(!best.record(Difficulty::Hard, 2));
        assert!(best.record(Difficulty::Hard, 5));
        assert_eq!(best.best(Difficulty::Hard), 5);
        assert_eq!(best.best(Difficulty::Easy), 0);
    }

    #[test]
    fn test_highest_overall() {
        let mut best = BestLevels::new();
        assert_eq!(best.highest_overall(), None);
        best.record(Difficulty::Easy, 9);
        best.record(Difficulty::Insane, 4);
        assert_eq!(best.highest_overall(), Some((Difficulty::Easy, 9)));
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut best = BestLevels::new();
        best.record(Difficulty::Normal, 7);
        let json = serde_json::to_string(&best).unwrap();
        assert_eq!(json, r#"{"normal":7}"#);
        let back: BestLevels = serde_json::from_str(&json).unwrap();
        assert_eq!(back, best);
    }
}
