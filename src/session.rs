//! Overall game-state machine
//!
//! ```text
//! Loading -> Menu -> Playing <-> Paused
//!                    Playing -> LevelUp -> Playing (next level)
//!                    Playing -> GameOver -> Playing (retry / restart level)
//! ```
//!
//! `LevelUp` and `GameOver` only leave through an explicit call. The session
//! owns the world, the level generator and the persistence layer; the host
//! (browser page or native driver) feeds it frame deltas and input.

use serde::{Deserialize, Serialize};

use crate::highscores::BestLevels;
use crate::persistence::{Persistence, ProgressRecord};
use crate::platform::KeyValueStore;
use crate::sim::{GameEvent, GamePhase, LevelGenerator, LevelInfo, TickInput, World, tick};
use crate::snapshot::WorldSnapshot;
use crate::tuning::{Difficulty, WeaponKind};

/// Playfield configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: crate::consts::PLAYFIELD_WIDTH,
            height: crate::consts::PLAYFIELD_HEIGHT,
        }
    }
}

pub struct Session<S: KeyValueStore> {
    config: SessionConfig,
    world: World,
    generator: LevelGenerator,
    weapon: WeaponKind,
    persistence: Persistence<S>,
    best: BestLevels,
    seed: u64,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(config: SessionConfig, store: S, seed: u64) -> Self {
        let persistence = Persistence::new(store);
        let best = persistence.load_best_levels();
        let weapon = WeaponKind::default();
        let mut world = World::new(config.width, config.height, seed, weapon);
        world.phase = GamePhase::Loading;

        Self {
            config,
            world,
            generator: LevelGenerator::new(config.width, config.height),
            weapon,
            persistence,
            best,
            seed,
        }
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.world.phase
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn difficulty(&self) -> Difficulty {
        self.generator.difficulty()
    }

    pub fn weapon(&self) -> WeaponKind {
        self.weapon
    }

    pub fn best_levels(&self) -> &BestLevels {
        &self.best
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    /// Counts for the upcoming level, for the menu/level-up screens
    pub fn level_info(&self, level: u32) -> LevelInfo {
        self.generator.level_info(level)
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(&self.world)
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.world.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.world.phase, phase);
            self.world.phase = phase;
        }
    }

    /// Asset loading finished: Loading -> Menu
    pub fn assets_ready(&mut self) -> bool {
        if self.world.phase != GamePhase::Loading {
            return false;
        }
        self.set_phase(GamePhase::Menu);
        true
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.generator.set_difficulty(difficulty);
    }

    /// Unknown names keep the current difficulty
    pub fn set_difficulty_by_name(&mut self, name: &str) -> bool {
        self.generator.set_difficulty_by_name(name)
    }

    /// Takes effect on the next new game
    pub fn set_weapon(&mut self, weapon: WeaponKind) {
        self.weapon = weapon;
    }

    pub fn set_weapon_by_name(&mut self, name: &str) -> bool {
        match WeaponKind::from_name(name) {
            Some(w) => {
                self.weapon = w;
                true
            }
            None => {
                log::warn!("Unknown weapon '{}', keeping {}", name, self.weapon.as_str());
                false
            }
        }
    }

    /// Fresh world at `level` with the current difficulty and weapon
    fn start_at(&mut self, level: u32) {
        let previous = self.world.phase;
        self.seed = self.seed.wrapping_add(1);
        self.world = World::new(self.config.width, self.config.height, self.seed, self.weapon);
        self.world.phase = previous;
        self.world.load_level(&self.generator, level.max(1));
        log::info!(
            "New game: level {}, {} difficulty, {}",
            self.world.level,
            self.difficulty().as_str(),
            self.weapon.as_str()
        );
        self.save_progress(self.world.level);
        self.set_phase(GamePhase::Playing);
    }

    /// New game from level 1; ignored while loading
    pub fn start_game(&mut self) -> bool {
        if self.world.phase == GamePhase::Loading {
            return false;
        }
        self.start_at(1);
        true
    }

    /// Saved progress, if any
    pub fn saved_progress(&self) -> Option<ProgressRecord> {
        self.persistence.load_progress()
    }

    /// Resume from saved progress; false when there is nothing to resume
    pub fn continue_saved(&mut self) -> bool {
        if self.world.phase == GamePhase::Loading {
            return false;
        }
        let Some(record) = self.persistence.load_progress() else {
            return false;
        };
        self.generator.set_difficulty(record.difficulty());
        self.weapon = record.weapon();
        self.start_at(record.level);
        true
    }

    /// Advance one frame; only simulates while playing (or toggling pause)
    pub fn update(&mut self, dt: f32, input: &TickInput) -> Vec<GameEvent> {
        if !matches!(self.world.phase, GamePhase::Playing | GamePhase::Paused) {
            return Vec::new();
        }

        let events = tick(&mut self.world, input, dt);

        if self.world.phase == GamePhase::LevelUp {
            self.on_level_complete();
        }
        events
    }

    fn on_level_complete(&mut self) {
        let level = self.world.level;
        let difficulty = self.difficulty();
        if self.best.record(difficulty, level) {
            log::info!("New best on {}: level {}", difficulty.as_str(), level);
        }
        self.persistence.save_best_levels(&self.best);
        self.save_progress(level + 1);
    }

    fn save_progress(&mut self, level: u32) {
        let record = ProgressRecord::new(level, self.difficulty(), self.weapon);
        self.persistence.save_progress(&record);
    }

    /// LevelUp -> Playing on the next level, with player and Nexus upgrades
    pub fn next_level(&mut self) -> bool {
        if self.world.phase != GamePhase::LevelUp {
            return false;
        }
        self.world.player.level_up();
        self.world.nexus.level_up();
        let next = self.world.level + 1;
        self.world.load_level(&self.generator, next);
        self.set_phase(GamePhase::Playing);
        true
    }

    /// GameOver -> Playing on the same level; upgrades are kept
    pub fn restart_level(&mut self) -> bool {
        if self.world.phase != GamePhase::GameOver {
            return false;
        }
        let start = self.world.player_start();
        self.world.player.reset(start);
        self.world.nexus.repair();
        let level = self.world.level;
        self.world.load_level(&self.generator, level);
        self.set_phase(GamePhase::Playing);
        true
    }

    /// GameOver -> Playing from level 1
    pub fn retry(&mut self) -> bool {
        if self.world.phase != GamePhase::GameOver {
            return false;
        }
        self.start_at(1);
        true
    }

    /// Auto-pause hook (tab hidden, window blur); only acts while playing
    pub fn pause(&mut self) -> bool {
        if self.world.phase != GamePhase::Playing {
            return false;
        }
        self.set_phase(GamePhase::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.world.phase != GamePhase::Paused {
            return false;
        }
        self.set_phase(GamePhase::Playing);
        true
    }

    pub fn back_to_menu(&mut self) -> bool {
        if self.world.phase == GamePhase::Loading {
            return false;
        }
        self.set_phase(GamePhase::Menu);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    fn session() -> Session<MemoryStore> {
        let mut s = Session::new(SessionConfig::default(), MemoryStore::new(), 7);
        assert!(s.assets_ready());
        s
    }

    #[test]
    fn test_loading_gate() {
        let mut s = Session::new(SessionConfig::default(), MemoryStore::new(), 7);
        assert_eq!(s.phase(), GamePhase::Loading);
        assert!(!s.start_game());
        assert!(s.assets_ready());
        assert!(!s.assets_ready());
        assert_eq!(s.phase(), GamePhase::Menu);
    }

    #[test]
    fn test_menu_does_not_simulate() {
        let mut s = session();
        let t = s.world().time;
        s.update(0.016, &TickInput::default());
        assert_eq!(s.world().time, t);
    }

    #[test]
    fn test_start_uses_selected_options() {
        let mut s = session();
        assert!(s.set_difficulty_by_name("hard"));
        assert!(s.set_weapon_by_name("shotgun"));
        assert!(!s.set_weapon_by_name("laser"));
        assert!(s.start_game());

        assert_eq!(s.phase(), GamePhase::Playing);
        assert_eq!(s.world().difficulty, Difficulty::Hard);
        assert_eq!(s.world().player.weapon, WeaponKind::Shotgun);
        assert_eq!(s.world().level, 1);
        assert!(s.world().active_base_count() >= 2);
    }

    #[test]
    fn test_pause_resume_idempotent() {
        let mut s = session();
        assert!(!s.pause());
        s.start_game();
        assert!(s.pause());
        assert!(!s.pause());
        assert_eq!(s.phase(), GamePhase::Paused);
        assert!(s.resume());
        assert_eq!(s.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_level_complete_records_and_advances() {
        let mut s = session();
        s.start_game();
        for base in &mut s.world_mut().bases {
            base.take_damage(100_000.0);
        }
        s.update(0.016, &TickInput::default());
        assert_eq!(s.phase(), GamePhase::LevelUp);
        assert_eq!(s.best_levels().best(Difficulty::Normal), 1);
        assert_eq!(s.saved_progress().map(|r| r.level), Some(2));

        let max_hp = s.world().player.max_hp;
        assert!(s.next_level());
        assert_eq!(s.phase(), GamePhase::Playing);
        assert_eq!(s.world().level, 2);
        assert_eq!(s.world().player.max_hp, max_hp + 12.0);
        assert!(!s.next_level());
    }

    #[test]
    fn test_game_over_restart_and_retry() {
        let mut s = session();
        s.start_game();
        s.world_mut().nexus.take_damage(10_000.0);
        s.update(0.016, &TickInput::default());
        assert_eq!(s.phase(), GamePhase::GameOver);

        assert!(s.restart_level());
        assert_eq!(s.phase(), GamePhase::Playing);
        assert!(!s.world().nexus.destroyed);
        assert_eq!(s.world().defeat, None);

        s.world_mut().player.take_damage(10_000.0);
        s.update(0.016, &TickInput::default());
        assert!(s.retry());
        assert!(s.world().player.alive);
        assert_eq!(s.world().level, 1);
    }

    #[test]
    fn test_continue_saved_restores_choices() {
        let mut store = MemoryStore::new();
        let record = ProgressRecord::new(5, Difficulty::Insane, WeaponKind::Sniper);
        store
            .set(crate::persistence::PROGRESS_KEY, &serde_json::to_string(&record).unwrap())
            .unwrap();

        let mut s = Session::new(SessionConfig::default(), store, 1);
        s.assets_ready();
        assert!(s.continue_saved());
        assert_eq!(s.world().level, 5);
        assert_eq!(s.difficulty(), Difficulty::Insane);
        assert_eq!(s.world().player.weapon, WeaponKind::Sniper);
    }
}
