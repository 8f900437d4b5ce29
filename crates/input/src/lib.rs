//! Keyboard state for the warp host and the key bindings that drive it.

pub mod bindings;

pub use bindings::*;

use std::collections::HashSet;

/// Key state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame, in press order.
    keys_pressed: Vec<KeyCode>,
    /// Keys released this frame.
    keys_released: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call once the frame's presses have been consumed.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    /// Process a keyboard event. Auto-repeat does not count as a new press.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.keys_held.insert(key) {
                    self.keys_pressed.push(key);
                }
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
                self.keys_released.insert(key);
            }
        }
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Keys pressed this frame, oldest first.
    pub fn pressed_keys(&self) -> &[KeyCode] {
        &self.keys_pressed
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;
