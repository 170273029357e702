//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key/pointer state to per-frame snapshots)
//! - Storage (LocalStorage on web, in-memory elsewhere)

pub mod input;
pub mod storage;

pub use input::{InputState, Key, key_from_code};
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
pub use storage::{KeyValueStore, MemoryStore, NullStore, StorageError};
