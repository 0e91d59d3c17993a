//! Key events to per-tick intents
//!
//! Arrow keys steer, the configured shoot key fires. Key state is sampled by
//! the simulation at tick time.

use crate::settings::ShootKey;
use crate::sim::TickInput;

/// Key codes the page would otherwise use for scrolling
const NAVIGATION_KEYS: [&str; 5] = ["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight", "Space"];

/// Whether a key's default browser action should be suppressed during play
pub fn is_navigation_key(code: &str) -> bool {
    NAVIGATION_KEYS.contains(&code)
}

/// Held-key state for one game
#[derive(Debug, Clone, Default)]
pub struct InputState {
    shoot_key: ShootKey,
    intents: TickInput,
}

impl InputState {
    pub fn new(shoot_key: ShootKey) -> Self {
        Self {
            shoot_key,
            intents: TickInput::default(),
        }
    }

    pub fn shoot_key(&self) -> ShootKey {
        self.shoot_key
    }

    /// Record a key press. Returns true if the key is bound.
    pub fn key_down(&mut self, code: &str) -> bool {
        self.set(code, true)
    }

    /// Record a key release. Returns true if the key is bound.
    pub fn key_up(&mut self, code: &str) -> bool {
        self.set(code, false)
    }

    fn set(&mut self, code: &str, pressed: bool) -> bool {
        let intents = &mut self.intents;
        match code {
            "ArrowLeft" => intents.move_left = pressed,
            "ArrowRight" => intents.move_right = pressed,
            "ArrowUp" => intents.move_up = pressed,
            "ArrowDown" => intents.move_down = pressed,
            _ if self.shoot_key.matches(code) => intents.shooting = pressed,
            _ => return false,
        }
        true
    }

    /// Intents for the next tick
    pub fn intents(&self) -> TickInput {
        self.intents
    }

    /// Release everything
    pub fn clear(&mut self) {
        self.intents = TickInput::default();
    }
}
