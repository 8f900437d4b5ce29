//! Key to action table.

use crate::{InputState, KeyCode};
use std::collections::HashMap;

/// Everything a key can ask the warp host to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Slower,
    ResetSpeed,
    Faster,
    ToggleDirection,
    NewSeed,
    ToggleHud,
    Quit,
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<KeyCode, Action>,
}

impl Default for KeyBindings {
    /// `1` slower, `2` reset, `3` faster, `5` reverse, `S` new seed, `H` HUD, `Esc` quit.
    /// Number row and keypad both work.
    fn default() -> Self {
        let mut bindings = Self::empty();
        for (keys, action) in [
            ([KeyCode::Digit1, KeyCode::Numpad1], Action::Slower),
            ([KeyCode::Digit2, KeyCode::Numpad2], Action::ResetSpeed),
            ([KeyCode::Digit3, KeyCode::Numpad3], Action::Faster),
            ([KeyCode::Digit5, KeyCode::Numpad5], Action::ToggleDirection),
        ] {
            for key in keys {
                bindings.bind(key, action);
            }
        }
        bindings.bind(KeyCode::KeyS, Action::NewSeed);
        bindings.bind(KeyCode::KeyH, Action::ToggleHud);
        bindings.bind(KeyCode::Escape, Action::Quit);
        bindings
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self { map: HashMap::new() }
    }

    /// Bind `key`, replacing any previous binding for it.
    pub fn bind(&mut self, key: KeyCode, action: Action) {
        if let Some(old) = self.map.insert(key, action) {
            log::debug!("Rebound {:?} from {:?} to {:?}", key, old, action);
        }
    }

    pub fn action_for(&self, key: KeyCode) -> Option<Action> {
        self.map.get(&key).copied()
    }

    /// Actions for this frame's presses, in press order.
    pub fn drain_actions(&self, input: &InputState) -> Vec<Action> {
        input
            .pressed_keys()
            .iter()
            .filter_map(|&key| self.action_for(key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ElementState;

    #[test]
    fn default_table() {
        let b = KeyBindings::default();
        assert_eq!(b.action_for(KeyCode::Digit1), Some(Action::Slower));
        assert_eq!(b.action_for(KeyCode::Numpad2), Some(Action::ResetSpeed));
        assert_eq!(b.action_for(KeyCode::Digit3), Some(Action::Faster));
        assert_eq!(b.action_for(KeyCode::Numpad5), Some(Action::ToggleDirection));
        assert_eq!(b.action_for(KeyCode::KeyS), Some(Action::NewSeed));
        assert_eq!(b.action_for(KeyCode::KeyH), Some(Action::ToggleHud));
        assert_eq!(b.action_for(KeyCode::Escape), Some(Action::Quit));
        assert_eq!(b.action_for(KeyCode::Digit4), None);
    }

    #[test]
    fn drain_maps_presses_and_skips_unbound_keys() {
        let b = KeyBindings::default();
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::Digit3, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyQ, ElementState::Pressed);
        input.process_keyboard(KeyCode::Digit5, ElementState::Pressed);
        assert_eq!(b.drain_actions(&input), [Action::Faster, Action::ToggleDirection]);
        input.begin_frame();
        assert!(b.drain_actions(&input).is_empty());
    }

    #[test]
    fn rebinding_replaces() {
        let mut b = KeyBindings::default();
        b.bind(KeyCode::KeyS, Action::Quit);
        assert_eq!(b.action_for(KeyCode::KeyS), Some(Action::Quit));
    }
}
