//! Keyboard/pointer state tracking
//!
//! Browser key events only flip held flags; edges are computed once per
//! frame against the previous frame's flags when the `TickInput` snapshot
//! is taken.

use std::collections::HashSet;

use glam::Vec2;

use crate::sim::TickInput;

/// Logical keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Shoot,
    Dash,
    Pause,
    ToggleGrid,
    ToggleAggro,
}

/// Map a DOM `KeyboardEvent.code` (or lowercase `key`) to a logical key
pub fn key_from_code(code: &str) -> Option<Key> {
    match code {
        "KeyW" | "ArrowUp" | "w" => Some(Key::Up),
        "KeyS" | "ArrowDown" | "s" => Some(Key::Down),
        "KeyA" | "ArrowLeft" | "a" => Some(Key::Left),
        "KeyD" | "ArrowRight" | "d" => Some(Key::Right),
        "Space" | " " => Some(Key::Shoot),
        "KeyF" | "f" => Some(Key::Dash),
        "Escape" | "KeyP" | "escape" | "p" => Some(Key::Pause),
        "KeyG" | "g" => Some(Key::ToggleGrid),
        "KeyR" | "r" => Some(Key::ToggleAggro),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    prev: HashSet<Key>,
    pointer: Vec2,
    pointer_down: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Convenience for raw DOM codes; returns false for unmapped codes
    pub fn key_event(&mut self, code: &str, down: bool) -> bool {
        match key_from_code(code) {
            Some(key) if down => {
                self.key_down(key);
                true
            }
            Some(key) => {
                self.key_up(key);
                true
            }
            None => false,
        }
    }

    pub fn set_pointer(&mut self, pos: Vec2) {
        self.pointer = pos;
    }

    pub fn set_pointer_down(&mut self, down: bool) {
        self.pointer_down = down;
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn just_pressed(&self, key: Key) -> bool {
        self.held.contains(&key) && !self.prev.contains(&key)
    }

    /// WASD/arrow vector, each axis in [-1, 1] (screen y points down)
    pub fn movement(&self) -> Vec2 {
        let axis = |neg: Key, pos: Key| (self.is_down(pos) as i32 - self.is_down(neg) as i32) as f32;
        Vec2::new(axis(Key::Left, Key::Right), axis(Key::Up, Key::Down))
    }

    /// Build this frame's input and roll edge state forward
    pub fn snapshot(&mut self) -> TickInput {
        let input = TickInput {
            movement: self.movement(),
            pointer: self.pointer,
            fire: self.pointer_down || self.is_down(Key::Shoot),
            pause: self.just_pressed(Key::Pause),
            dash: self.just_pressed(Key::Dash),
            toggle_grid: self.just_pressed(Key::ToggleGrid),
            toggle_aggro: self.just_pressed(Key::ToggleAggro),
        };
        self.prev = self.held.clone();
        input
    }

    /// Drop all held keys (focus loss)
    pub fn reset(&mut self) {
        self.held.clear();
        self.prev.clear();
        self.pointer_down = false;
    }
}
