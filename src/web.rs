//! Browser entry points
//!
//! The page owns the canvas, DOM listeners and `requestAnimationFrame`; it
//! forwards events here and draws the JSON snapshot returned by `frame`.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::assets::{AssetCatalog, ImageHandle, default_manifest};
use crate::platform::{InputState, KeyValueStore, LocalStorage, MemoryStore};
use crate::session::{Session, SessionConfig};
use crate::tuning::Difficulty;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by a previous module instance
        return;
    }
    log::info!("Nexus Defender starting...");
}

fn open_store() -> Box<dyn KeyValueStore> {
    match LocalStorage::open() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            log::warn!("LocalStorage unavailable ({}), progress will not persist", e);
            Box::new(MemoryStore::new())
        }
    }
}

#[wasm_bindgen]
pub struct WebGame {
    session: Session<Box<dyn KeyValueStore>>,
    input: InputState,
    assets: AssetCatalog,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> WebGame {
        let seed = (js_sys::Date::now() as u64) ^ ((js_sys::Math::random() * u32::MAX as f64) as u64);
        let config = SessionConfig { width, height };
        log::info!("Game initialized with seed: {}", seed);
        WebGame {
            session: Session::new(config, open_store(), seed),
            input: InputState::new(),
            assets: AssetCatalog::from_manifest(&default_manifest()),
        }
    }

    /// Pending `[key, path]` pairs as JSON for the page's image loader
    pub fn asset_requests(&self) -> String {
        let pending: Vec<(&str, &str)> = self.assets.pending().collect();
        serde_json::to_string(&pending).unwrap_or_else(|e| {
            log::warn!("Failed to encode asset requests: {}", e);
            "[]".to_string()
        })
    }

    pub fn asset_loaded(&mut self, key: &str, handle: u32) {
        self.assets.mark_loaded(key, ImageHandle(handle));
        self.check_assets();
    }

    pub fn asset_failed(&mut self, key: &str) {
        self.assets.mark_failed(key);
        self.check_assets();
    }

    fn check_assets(&mut self) {
        if self.assets.is_ready() && self.session.assets_ready() {
            let failed = self.assets.failed_count();
            if failed > 0 {
                log::warn!("{} asset(s) failed to load", failed);
            }
        }
    }

    pub fn load_progress(&self) -> f32 {
        self.assets.fraction()
    }

    /// Image handle for a dotted asset key
    pub fn image(&self, key: &str) -> Option<u32> {
        self.assets.get(key).map(|h| h.0)
    }

    pub fn key_down(&mut self, code: &str) -> bool {
        self.input.key_event(code, true)
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        self.input.key_event(code, false)
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.input.set_pointer(Vec2::new(x, y));
    }

    pub fn pointer_button(&mut self, down: bool) {
        self.input.set_pointer_down(down);
    }

    /// Advance one animation frame and return the render snapshot as JSON
    pub fn frame(&mut self, dt: f32) -> String {
        let input = self.input.snapshot();
        self.session.update(dt, &input);
        serde_json::to_string(&self.session.snapshot()).unwrap_or_else(|e| {
            log::warn!("Failed to encode snapshot: {}", e);
            "{}".to_string()
        })
    }

    /// Tab hidden or window blurred
    pub fn auto_pause(&mut self) {
        self.input.reset();
        if self.session.pause() {
            log::info!("Auto-paused");
        }
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.session.phase())
    }

    pub fn set_difficulty(&mut self, name: &str) -> bool {
        self.session.set_difficulty_by_name(name)
    }

    pub fn set_weapon(&mut self, name: &str) -> bool {
        self.session.set_weapon_by_name(name)
    }

    pub fn has_saved_game(&self) -> bool {
        self.session.saved_progress().is_some()
    }

    pub fn start_game(&mut self) -> bool {
        self.input.reset();
        self.session.start_game()
    }

    pub fn continue_game(&mut self) -> bool {
        self.input.reset();
        self.session.continue_saved()
    }

    pub fn next_level(&mut self) -> bool {
        self.session.next_level()
    }

    pub fn restart_level(&mut self) -> bool {
        self.session.restart_level()
    }

    pub fn retry(&mut self) -> bool {
        self.session.retry()
    }

    pub fn resume(&mut self) -> bool {
        self.session.resume()
    }

    pub fn back_to_menu(&mut self) -> bool {
        self.session.back_to_menu()
    }

    pub fn best_level(&self, difficulty: &str) -> u32 {
        self.session
            .best_levels()
            .best(Difficulty::from_name_or_default(difficulty))
    }

    /// Level preview as JSON (`{level, bases, guards_per_base, total_enemies}`)
    pub fn level_info(&self, level: u32) -> String {
        serde_json::to_string(&self.session.level_info(level)).unwrap_or_else(|_| "{}".to_string())
    }
}
