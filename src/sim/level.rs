//! Level generation and difficulty scaling
//!
//! Bases are rejection-sampled inside the right-hand enemy territory with a
//! minimum pairwise separation. When the attempt budget runs out the
//! remaining bases go on a jittered two-column grid, so generation always
//! succeeds.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::base::EnemyBase;
use super::npc::Npc;
use super::state::{IdAllocator, Team};
use crate::tuning::{Difficulty, DifficultyProfile};

/// Minimum distance between any two base centers
pub const MIN_BASE_SEPARATION: f32 = 280.0;
/// Sampled bases left of this x are rejected (player area)
pub const MIN_BASE_X: f32 = 520.0;
/// Sampling attempts allowed per base
const ATTEMPTS_PER_BASE: u32 = 50;
/// Fraction of the width where enemy territory begins
const TERRITORY_START: f32 = 0.56;
const TERRITORY_RIGHT_MARGIN: f32 = 60.0;
const TERRITORY_VERTICAL_MARGIN: f32 = 80.0;
/// Row spacing of the fallback grid
const GRID_ROW_SPACING: f32 = 140.0;
/// Random offset applied to fallback grid cells
const GRID_JITTER: f32 = 20.0;
/// Upper bound on guards per base at any level
pub const MAX_GUARDS_PER_BASE: u32 = 4;

/// Entities for one level, ready to install into the world
#[derive(Debug, Clone, Default)]
pub struct LevelLayout {
    pub bases: Vec<EnemyBase>,
    pub npcs: Vec<Npc>,
    /// Bases placed by the grid fallback rather than sampling
    pub grid_fallbacks: usize,
}

/// Counts for a level without generating it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub level: u32,
    pub bases: u32,
    pub guards_per_base: u32,
    pub total_enemies: u32,
}

/// Enemy territory rectangle (x range, y range)
#[derive(Debug, Clone, Copy)]
struct Territory {
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
}

/// Uniform sample in `[lo, hi)`, collapsing to `lo` for an empty range
fn sample<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

#[derive(Debug, Clone)]
pub struct LevelGenerator {
    pub width: f32,
    pub height: f32,
    difficulty: Difficulty,
}

impl LevelGenerator {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            difficulty: Difficulty::default(),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn profile(&self) -> DifficultyProfile {
        self.difficulty.profile()
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Select a difficulty by name; unknown names keep the current one
    pub fn set_difficulty_by_name(&mut self, name: &str) -> bool {
        match Difficulty::from_name(name) {
            Some(d) => {
                self.difficulty = d;
                true
            }
            None => {
                log::warn!("Unknown difficulty '{}', keeping {}", name, self.difficulty.as_str());
                false
            }
        }
    }

    pub fn base_count(&self, level: u32) -> u32 {
        let p = self.profile();
        let steps = level.max(1) - 1;
        (p.base_min + steps / 2).clamp(p.base_min, p.base_max)
    }

    pub fn guards_per_base(&self, level: u32) -> u32 {
        let steps = level.max(1) - 1;
        (self.profile().guards_per_base + steps / 3).clamp(1, MAX_GUARDS_PER_BASE)
    }

    pub fn level_info(&self, level: u32) -> LevelInfo {
        let bases = self.base_count(level);
        let guards_per_base = self.guards_per_base(level);
        LevelInfo {
            level,
            bases,
            guards_per_base,
            total_enemies: bases * guards_per_base,
        }
    }

    fn territory(&self) -> Territory {
        Territory {
            left: (self.width * TERRITORY_START).floor(),
            right: self.width - TERRITORY_RIGHT_MARGIN,
            top: TERRITORY_VERTICAL_MARGIN,
            bottom: self.height - TERRITORY_VERTICAL_MARGIN,
        }
    }

    /// Base centers; the second value is how many came from the grid fallback
    pub fn base_positions<R: Rng>(&self, count: usize, rng: &mut R) -> (Vec<Vec2>, usize) {
        let t = self.territory();
        let mut positions: Vec<Vec2> = Vec::with_capacity(count);
        let budget = ATTEMPTS_PER_BASE as usize * count;

        let mut attempts = 0;
        while positions.len() < count && attempts < budget {
            attempts += 1;
            let candidate = Vec2::new(sample(rng, t.left, t.right), sample(rng, t.top, t.bottom));

            if candidate.x < MIN_BASE_X {
                continue;
            }
            if positions.iter().all(|p| p.distance(candidate) >= MIN_BASE_SEPARATION) {
                positions.push(candidate);
            }
        }

        let sampled = positions.len();
        let column_width = (t.right - t.left) / 2.0;
        while positions.len() < count {
            let i = positions.len();
            let x = t.left + (i % 2) as f32 * column_width + sample(rng, -GRID_JITTER, GRID_JITTER);
            let y = t.top + (i / 2) as f32 * GRID_ROW_SPACING + sample(rng, -GRID_JITTER, GRID_JITTER);
            positions.push(Vec2::new(x, y));
        }

        (positions, count - sampled)
    }

    /// Generate bases and their guards for `level`
    ///
    /// Guards are linked both ways: each base lists its guards' ids and each
    /// guard's `base_home` names its base.
    pub fn generate_level<R: Rng>(&self, level: u32, rng: &mut R, ids: &mut IdAllocator) -> LevelLayout {
        let level = level.max(1);
        let profile = self.profile();
        let count = self.base_count(level) as usize;
        let guard_count = self.guards_per_base(level) as usize;

        let (positions, grid_fallbacks) = self.base_positions(count, rng);

        let mut layout = LevelLayout {
            bases: Vec::with_capacity(count),
            npcs: Vec::with_capacity(count * guard_count),
            grid_fallbacks,
        };

        for (i, pos) in positions.into_iter().enumerate() {
            let team = Team::ENEMIES[i % Team::ENEMIES.len()];
            let mut base = EnemyBase::new(ids.next_id(), pos, team, level, profile.aggro_radius);

            for g in 0..guard_count {
                let guard = Npc::new_guard(ids.next_id(), base.guard_anchor(g), team, Some(base.id), level, &profile);
                base.guards.push(guard.id);
                layout.npcs.push(guard);
            }
            layout.bases.push(base);
        }

        if grid_fallbacks > 0 {
            log::debug!("Level {}: {} base(s) placed on fallback grid", level, grid_fallbacks);
        }
        log::info!(
            "Generated level {} ({}): {} bases, {} guards",
            level,
            self.difficulty.as_str(),
            layout.bases.len(),
            layout.npcs.len()
        );

        layout
    }
}
