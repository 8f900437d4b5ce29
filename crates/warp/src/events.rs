//! Window event handling for the warp host.

use field::Command;
use input::Action;
use winit::event::WindowEvent;
use winit::keyboard::PhysicalKey;

use crate::WarpHost;

/// Session command for a key action. HUD and quit are handled by the host.
pub fn command_for(action: Action) -> Option<Command> {
    match action {
        Action::Slower => Some(Command::Slower),
        Action::ResetSpeed => Some(Command::ResetSpeed),
        Action::Faster => Some(Command::Faster),
        Action::ToggleDirection => Some(Command::ToggleDirection),
        Action::NewSeed => Some(Command::RandomSeed),
        Action::ToggleHud | Action::Quit => None,
    }
}

impl WarpHost {
    /// Handle a window event. Returns true if the app should exit.
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
                true
            }
            WindowEvent::Resized(size) => {
                self.session.set_aspect(size.width, size.height);
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.input.process_keyboard(key, event.state);
                }
                false
            }
            WindowEvent::RedrawRequested => {
                self.frame();
                !self.running
            }
            _ => false,
        }
    }

    /// Turn this frame's key presses into session commands.
    pub(crate) fn apply_actions(&mut self) {
        for action in self.bindings.drain_actions(&self.input) {
            match action {
                Action::ToggleHud => {
                    self.show_hud = !self.show_hud;
                    self.refresh_title();
                }
                Action::Quit => self.running = false,
                other => {
                    if let Some(command) = command_for(other) {
                        log::debug!("{:?} -> {:?}", other, command);
                        self.session.command(command);
                    }
                }
            }
        }
        self.input.begin_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_motion_key_maps_to_a_command() {
        assert!(matches!(command_for(Action::Slower), Some(Command::Slower)));
        assert!(matches!(command_for(Action::ResetSpeed), Some(Command::ResetSpeed)));
        assert!(matches!(command_for(Action::Faster), Some(Command::Faster)));
        assert!(matches!(command_for(Action::ToggleDirection), Some(Command::ToggleDirection)));
        assert!(matches!(command_for(Action::NewSeed), Some(Command::RandomSeed)));
        assert!(command_for(Action::ToggleHud).is_none());
        assert!(command_for(Action::Quit).is_none());
    }
}
