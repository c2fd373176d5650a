//! Keyboard shortcuts and wheel normalization.
//!
//! Physical key codes are used so the shortcuts sit in the same place on
//! every keyboard layout.

use jovian_panel::PanelCommand;
use winit::event::{ElementState, MouseScrollDelta};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Pixels of touchpad scroll treated as one wheel notch.
const PIXELS_PER_LINE: f64 = 40.0;

/// Map a key press to a panel command. Releases and repeats are ignored.
pub fn shortcut(key: PhysicalKey, state: ElementState, repeat: bool) -> Option<PanelCommand> {
    if state != ElementState::Pressed || repeat {
        return None;
    }
    match key {
        PhysicalKey::Code(KeyCode::KeyR) => Some(PanelCommand::Randomize),
        PhysicalKey::Code(KeyCode::KeyC) => Some(PanelCommand::NextScheme),
        PhysicalKey::Code(KeyCode::Escape) => Some(PanelCommand::Quit),
        _ => None,
    }
}

/// Wheel notches, positive when scrolling up (zoom in).
pub fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn test_shortcut_keys() {
        let press = |code| shortcut(PhysicalKey::Code(code), ElementState::Pressed, false);
        assert_eq!(press(KeyCode::KeyR), Some(PanelCommand::Randomize));
        assert_eq!(press(KeyCode::KeyC), Some(PanelCommand::NextScheme));
        assert_eq!(press(KeyCode::Escape), Some(PanelCommand::Quit));
        assert_eq!(press(KeyCode::KeyW), None);
    }

    #[test]
    fn test_release_and_repeat_ignored() {
        let key = PhysicalKey::Code(KeyCode::KeyR);
        assert_eq!(shortcut(key, ElementState::Released, false), None);
        assert_eq!(shortcut(key, ElementState::Pressed, true), None);
    }

    #[test]
    fn test_scroll_lines() {
        assert_eq!(scroll_lines(MouseScrollDelta::LineDelta(0.0, -2.0)), -2.0);
        let pixels = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 80.0));
        assert!((scroll_lines(pixels) - 2.0).abs() < 1e-6);
    }
}
