#![warn(missing_docs)]
//! Window input adapter: turns winit events into per-tick simulation commands.

use glam::Vec2;
use std::collections::HashSet;
use tilecraft_core::{ClickKind, PointerAction, TickInput};
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

const LEFT_KEYS: [KeyCode; 2] = [KeyCode::KeyA, KeyCode::ArrowLeft];
const RIGHT_KEYS: [KeyCode; 2] = [KeyCode::KeyD, KeyCode::ArrowRight];
const JUMP_KEYS: [KeyCode; 3] = [KeyCode::Space, KeyCode::KeyW, KeyCode::ArrowUp];
const CRAFTING_KEY: KeyCode = KeyCode::KeyE;
const DIGIT_KEYS: [KeyCode; 9] = [
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

/// Input state tracking for a single frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently pressed.
    keys_pressed: HashSet<KeyCode>,
    /// Keys pressed this frame (edge-triggered).
    keys_just_pressed: HashSet<KeyCode>,
    /// Keys released this frame (edge-triggered).
    keys_just_released: HashSet<KeyCode>,

    /// Mouse buttons currently pressed.
    mouse_buttons: HashSet<MouseButton>,
    /// Mouse buttons pressed this frame.
    mouse_just_pressed: HashSet<MouseButton>,

    /// Last cursor position in window coordinates.
    pub cursor: Vec2,
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a window event to update input state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(keycode),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => self.press_key(*keycode),
                ElementState::Released => self.release_key(*keycode),
            },
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => self.press_mouse(*button),
                ElementState::Released => self.release_mouse(*button),
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.set_cursor(position.x as f32, position.y as f32);
            }
            WindowEvent::Focused(false) => {
                // Releases are not delivered to unfocused windows.
                self.keys_pressed.clear();
                self.mouse_buttons.clear();
            }
            _ => {}
        }
    }

    /// Record a key press. Repeats while held do not count as new presses.
    pub fn press_key(&mut self, key: KeyCode) {
        if self.keys_pressed.insert(key) {
            self.keys_just_pressed.insert(key);
        }
    }

    /// Record a key release.
    pub fn release_key(&mut self, key: KeyCode) {
        self.keys_pressed.remove(&key);
        self.keys_just_released.insert(key);
    }

    /// Record a mouse button press.
    pub fn press_mouse(&mut self, button: MouseButton) {
        if self.mouse_buttons.insert(button) {
            self.mouse_just_pressed.insert(button);
        }
    }

    /// Record a mouse button release.
    pub fn release_mouse(&mut self, button: MouseButton) {
        self.mouse_buttons.remove(&button);
    }

    /// Move the cursor.
    pub fn set_cursor(&mut self, x: f32, y: f32) {
        self.cursor = Vec2::new(x, y);
    }

    /// Reset per-frame state (call after each simulation tick).
    pub fn begin_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.keys_just_released.clear();
        self.mouse_just_pressed.clear();
    }

    /// Check if a key is currently pressed.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key was just pressed this frame.
    pub fn key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    /// Check if a key was just released this frame.
    pub fn key_just_released(&self, key: KeyCode) -> bool {
        self.keys_just_released.contains(&key)
    }

    /// Check if a mouse button is currently pressed.
    pub fn mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    /// Check if a mouse button was just pressed this frame.
    pub fn mouse_button_just_pressed(&self, button: MouseButton) -> bool {
        self.mouse_just_pressed.contains(&button)
    }

    fn any_pressed(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|&key| self.key_pressed(key))
    }

    fn any_just_pressed(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|&key| self.key_just_pressed(key))
    }

    /// Build this tick's commands.
    ///
    /// `camera_offset` converts the cursor into world space. Digit keys pick
    /// a recipe while the crafting menu is open and a hotbar slot otherwise.
    pub fn snapshot(&self, camera_offset: Vec2, crafting_open: bool) -> TickInput {
        let digit = DIGIT_KEYS
            .iter()
            .position(|&key| self.key_just_pressed(key))
            .map(|idx| idx + 1);

        let click = if self.mouse_button_just_pressed(MouseButton::Left) {
            Some(ClickKind::Secondary)
        } else if self.mouse_button_just_pressed(MouseButton::Right) {
            Some(ClickKind::Primary)
        } else {
            None
        };
        let world = self.cursor + camera_offset;

        TickInput {
            move_left: self.any_pressed(&LEFT_KEYS),
            move_right: self.any_pressed(&RIGHT_KEYS),
            jump: self.any_just_pressed(&JUMP_KEYS),
            pointer: click.map(|click| PointerAction::new(world.x, world.y, click)),
            select_slot: digit.filter(|_| !crafting_open).map(|n| n - 1),
            toggle_crafting: self.key_just_pressed(CRAFTING_KEY),
            craft_recipe: digit.filter(|_| crafting_open),
        }
    }
}
