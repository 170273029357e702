//! Nexus Defender - native headless driver
//!
//! The browser build is driven from JavaScript through `web::WebGame`.
//! Natively there is no window; this binary plays a few levels with the
//! autopilot and logs what happened, which is handy for balance checks.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use nexus_defender::platform::MemoryStore;
    use nexus_defender::sim::{GamePhase, autopilot_input};
    use nexus_defender::{Difficulty, Session, SessionConfig, WeaponKind};

    const FRAME_DT: f32 = 1.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 60 * 5;

    env_logger::init();
    log::info!("Nexus Defender (native) starting...");
    log::info!("Browser build: `cargo build --target wasm32-unknown-unknown --profile release-web`, then drive `WebGame` from the page");

    let mut session = Session::new(SessionConfig::default(), MemoryStore::new(), 0x5eed);
    session.assets_ready();
    session.set_difficulty(Difficulty::Normal);
    session.set_weapon(WeaponKind::Rifle);
    session.start_game();

    let mut frames = 0;
    while frames < MAX_FRAMES {
        let input = autopilot_input(session.world());
        session.update(FRAME_DT, &input);
        frames += 1;

        match session.phase() {
            GamePhase::LevelUp => {
                let info = session.level_info(session.world().level + 1);
                log::info!(
                    "Cleared level {} after {:.1}s; next: {} bases, {} enemies",
                    session.world().level,
                    session.world().time,
                    info.bases,
                    info.total_enemies
                );
                session.next_level();
            }
            GamePhase::GameOver => break,
            _ => {}
        }
    }

    let world = session.world();
    log::info!(
        "Autopilot finished after {} frames: level {}, phase {:?}, defeat {:?}, player {:.0}/{:.0} hp, Nexus {:.0}/{:.0} hp",
        frames,
        world.level,
        world.phase,
        world.defeat,
        world.player.hp,
        world.player.max_hp,
        world.nexus.hp,
        world.nexus.max_hp
    );
    if let Some((difficulty, level)) = session.best_levels().highest_overall() {
        log::info!("Best: level {} on {}", level, difficulty.as_str());
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}
