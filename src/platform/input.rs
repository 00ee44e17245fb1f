//! Keyboard input
//!
//! Key events update a held-key set; the simulation reads it once per tick.

use std::collections::HashSet;

use glam::Vec2;

/// A directional game key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    Up,
    Down,
    Left,
    Right,
}

impl GameKey {
    /// Map a `KeyboardEvent.key` value (arrows and WASD)
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(GameKey::Up),
            "ArrowDown" | "s" | "S" => Some(GameKey::Down),
            "ArrowLeft" | "a" | "A" => Some(GameKey::Left),
            "ArrowRight" | "d" | "D" => Some(GameKey::Right),
            _ => None,
        }
    }
}

/// Currently held game keys, by key name. Arrows and WASD are tracked
/// separately so releasing one doesn't cancel the other.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<String>,
}

/// Letters are stored lowercase so Shift doesn't strand a key
fn key_name(key: &str) -> String {
    if key.chars().count() == 1 {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key is a game key (caller should suppress default handling)
    pub fn key_down(&mut self, key: &str) -> bool {
        if GameKey::from_key(key).is_none() {
            return false;
        }
        self.held.insert(key_name(key));
        true
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.remove(&key_name(key));
    }

    /// Drop all held keys (window blur)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Is any key for this direction down?
    pub fn is_held(&self, key: GameKey) -> bool {
        self.held
            .iter()
            .any(|name| GameKey::from_key(name) == Some(key))
    }

    /// Raw (unnormalized) direction; screen coordinates, +y is down
    pub fn axis(&self) -> Vec2 {
        let mut v = Vec2::ZERO;
        if self.is_held(GameKey::Left) {
            v.x -= 1.0;
        }
        if self.is_held(GameKey::Right) {
            v.x += 1.0;
        }
        if self.is_held(GameKey::Up) {
            v.y -= 1.0;
        }
        if self.is_held(GameKey::Down) {
            v.y += 1.0;
        }
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_and_wasd_map_to_same_axis() {
        let mut input = InputState::new();
        assert!(input.key_down("ArrowLeft"));
        assert_eq!(input.axis(), Vec2::new(-1.0, 0.0));
        input.key_up("ArrowLeft");
        assert!(input.key_down("a"));
        assert_eq!(input.axis(), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_releasing_one_key_keeps_the_other() {
        let mut input = InputState::new();
        input.key_down("ArrowLeft");
        input.key_down("a");
        input.key_up("a");
        assert_eq!(input.axis(), Vec2::new(-1.0, 0.0));
        input.key_up("ArrowLeft");
        assert_eq!(input.axis(), Vec2::ZERO);
    }

    #[test]
    fn test_shifted_letter_release() {
        let mut input = InputState::new();
        input.key_down("D");
        input.key_up("d");
        assert!(!input.is_held(GameKey::Right));
    }

    #[test]
    fn test_non_game_key_ignored() {
        let mut input = InputState::new();
        assert!(!input.key_down("Enter"));
        assert_eq!(input.axis(), Vec2::ZERO);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut input = InputState::new();
        input.key_down("w");
        input.key_down("ArrowDown");
        assert_eq!(input.axis(), Vec2::ZERO);
    }
}
