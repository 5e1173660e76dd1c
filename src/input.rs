use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

const DIGITS: [KeyCode; 10] = [
    KeyCode::Digit0,
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

/// Tracks keyboard and mouse state between frames.
#[derive(Debug, Default)]
pub struct Input {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    mouse_buttons_down: HashSet<MouseButton>,
    mouse_position: Option<Vec2>,
    mouse_delta: Vec2,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call after each frame has consumed the input to reset per-frame state.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_delta = Vec2::ZERO;
    }

    /// Process a window event. Returns true if it changed input state.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => match event.physical_key {
                PhysicalKey::Code(key) => {
                    self.key_event(key, event.state);
                    true
                }
                PhysicalKey::Unidentified(_) => false,
            },
            WindowEvent::MouseInput { state, button, .. } => {
                self.button_event(*button, *state);
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Vec2::new(position.x as f32, position.y as f32));
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.mouse_position = None;
                false
            }
            WindowEvent::Focused(false) => {
                self.keys_down.clear();
                self.mouse_buttons_down.clear();
                false
            }
            _ => false,
        }
    }

    pub(crate) fn key_event(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.keys_down.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }
            ElementState::Released => {
                self.keys_down.remove(&key);
            }
        }
    }

    pub(crate) fn button_event(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.mouse_buttons_down.insert(button);
            }
            ElementState::Released => {
                self.mouse_buttons_down.remove(&button);
            }
        }
    }

    /// The first position after the cursor enters produces no delta.
    pub(crate) fn cursor_moved(&mut self, position: Vec2) {
        if let Some(previous) = self.mouse_position {
            self.mouse_delta += position - previous;
        }
        self.mouse_position = Some(position);
    }

    /// Returns true if the key is currently held down.
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns true if the key was pressed this frame. Key repeat does not count.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// The lowest digit key pressed this frame.
    pub fn digit_pressed(&self) -> Option<u8> {
        (0u8..)
            .zip(DIGITS)
            .find(|&(_, key)| self.key_pressed(key))
            .map(|(digit, _)| digit)
    }

    /// Returns true if the mouse button is currently held down.
    pub fn mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons_down.contains(&button)
    }

    /// Mouse movement accumulated since the last [`begin_frame`](Self::begin_frame).
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_reported_once() {
        let mut input = Input::new();
        input.key_event(KeyCode::Space, ElementState::Pressed);
        assert!(input.key_pressed(KeyCode::Space));
        input.begin_frame();
        // Key repeat.
        input.key_event(KeyCode::Space, ElementState::Pressed);
        assert!(!input.key_pressed(KeyCode::Space));
        assert!(input.key_down(KeyCode::Space));
        input.key_event(KeyCode::Space, ElementState::Released);
        assert!(!input.key_down(KeyCode::Space));
    }

    #[test]
    fn digits_are_decoded() {
        let mut input = Input::new();
        assert_eq!(input.digit_pressed(), None);
        input.key_event(KeyCode::Digit7, ElementState::Pressed);
        assert_eq!(input.digit_pressed(), Some(7));
    }

    #[test]
    fn first_cursor_position_has_no_delta() {
        let mut input = Input::new();
        input.cursor_moved(Vec2::new(300.0, 200.0));
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
        input.cursor_moved(Vec2::new(310.0, 195.0));
        input.cursor_moved(Vec2::new(312.0, 195.0));
        assert_eq!(input.mouse_delta(), Vec2::new(12.0, -5.0));
        input.begin_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn buttons_track_held_state() {
        let mut input = Input::new();
        input.button_event(MouseButton::Left, ElementState::Pressed);
        assert!(input.mouse_down(MouseButton::Left));
        input.button_event(MouseButton::Left, ElementState::Released);
        assert!(!input.mouse_down(MouseButton::Left));
    }
}
