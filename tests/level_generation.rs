//! Level generation across difficulties and levels

use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use nexus_defender::Difficulty;
use nexus_defender::sim::level::{MAX_GUARDS_PER_BASE, MIN_BASE_SEPARATION, MIN_BASE_X};
use nexus_defender::sim::{IdAllocator, LevelGenerator};

fn generator(difficulty: Difficulty) -> LevelGenerator {
    let mut g = LevelGenerator::new(1280.0, 720.0);
    g.set_difficulty(difficulty);
    g
}

fn difficulty_strategy() -> impl Strategy<Value = Difficulty> {
    prop::sample::select(Difficulty::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_counts_stay_in_profile(difficulty in difficulty_strategy(), level in 1u32..200) {
        let g = generator(difficulty);
        let p = difficulty.profile();

        let bases = g.base_count(level);
        prop_assert!(bases >= p.base_min && bases <= p.base_max);
        let guards = g.guards_per_base(level);
        prop_assert!((1..=MAX_GUARDS_PER_BASE).contains(&guards));

        prop_assert!(g.base_count(level + 1) >= bases);
        prop_assert!(g.guards_per_base(level + 1) >= guards);
    }

    #[test]
    fn prop_generated_levels_are_consistent(difficulty in difficulty_strategy(), level in 1u32..30, seed: u64) {
        let g = generator(difficulty);
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut ids = IdAllocator::default();
        let layout = g.generate_level(level, &mut rng, &mut ids);

        prop_assert_eq!(layout.bases.len() as u32, g.base_count(level));
        prop_assert_eq!(layout.npcs.len() as u32, g.base_count(level) * g.guards_per_base(level));

        let sampled = layout.bases.len() - layout.grid_fallbacks;
        for (i, a) in layout.bases.iter().take(sampled).enumerate() {
            prop_assert!(a.pos.x >= MIN_BASE_X);
            for b in layout.bases.iter().take(sampled).skip(i + 1) {
                prop_assert!(a.pos.distance(b.pos) >= MIN_BASE_SEPARATION);
            }
        }

        for npc in &layout.npcs {
            let home = npc.base_home.and_then(|id| layout.bases.iter().find(|b| b.id == id));
            prop_assert!(home.is_some());
            let home = home.unwrap();
            prop_assert!(home.guards.contains(&npc.id));
            prop_assert_eq!(npc.team, home.team);
        }
    }
}

#[test]
fn test_level_one_versus_level_eleven_on_normal() {
    let g = generator(Difficulty::Normal);
    let mut rng = Pcg32::seed_from_u64(11);
    let mut ids = IdAllocator::default();

    let first = g.generate_level(1, &mut rng, &mut ids);
    assert_eq!(first.bases.len(), 2);
    assert_eq!(first.npcs.len(), 2);
    assert!(first.bases.iter().all(|b| b.max_hp == 220.0));

    let eleventh = g.generate_level(11, &mut rng, &mut ids);
    assert_eq!(eleventh.bases.len(), 3);
    assert_eq!(eleventh.npcs.len(), 12);
    assert!(eleventh.bases.iter().all(|b| b.max_hp > 220.0));

    // Later guards are tougher than level 1 guards
    assert!(eleventh.npcs[0].max_hp > first.npcs[0].max_hp);
    assert!(eleventh.npcs[0].damage >= first.npcs[0].damage);

    // Ids never repeat across levels from the same allocator
    let mut seen: Vec<u32> = first
        .bases
        .iter()
        .map(|b| b.id.0)
        .chain(first.npcs.iter().map(|n| n.id.0))
        .chain(eleventh.bases.iter().map(|b| b.id.0))
        .chain(eleventh.npcs.iter().map(|n| n.id.0))
        .collect();
    let total = seen.len();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), total);
}

#[test]
fn test_grid_fallback_fills_crowded_territory() {
    let g = generator(Difficulty::Normal);
    let mut rng = Pcg32::seed_from_u64(5);

    // Far more bases than fit with 280 px separation in a 504 x 560 territory
    let (positions, fallbacks) = g.base_positions(10, &mut rng);
    assert_eq!(positions.len(), 10);
    assert!(fallbacks > 0);
    assert!(fallbacks <= 10);
}

#[test]
fn test_same_seed_same_layout() {
    let g = generator(Difficulty::Hard);
    let layout = |seed| {
        let mut rng = Pcg32::seed_from_u64(seed);
        g.generate_level(3, &mut rng, &mut IdAllocator::default())
    };
    let a = layout(42);
    let b = layout(42);
    let pa: Vec<_> = a.bases.iter().map(|b| b.pos).collect();
    let pb: Vec<_> = b.bases.iter().map(|b| b.pos).collect();
    assert_eq!(pa, pb);
}
