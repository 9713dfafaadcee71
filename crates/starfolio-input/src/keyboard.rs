//! Frame-coherent keyboard state.
//!
//! Physical key codes are used so WASD steering works on any layout.

use rustc_hash::FxHashSet;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// A key transition, decoupled from winit's window events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyEvent {
    pub key: PhysicalKey,
    pub state: ElementState,
    pub repeat: bool,
}

impl RawKeyEvent {
    /// Non-repeat press of `code`.
    pub fn press(code: KeyCode) -> Self {
        Self {
            key: PhysicalKey::Code(code),
            state: ElementState::Pressed,
            repeat: false,
        }
    }

    /// Release of `code`.
    pub fn release(code: KeyCode) -> Self {
        Self {
            key: PhysicalKey::Code(code),
            state: ElementState::Released,
            repeat: false,
        }
    }

    /// The key code, when the key is identified.
    pub fn code(&self) -> Option<KeyCode> {
        match self.key {
            PhysicalKey::Code(code) => Some(code),
            PhysicalKey::Unidentified(_) => None,
        }
    }

    pub fn is_press(&self) -> bool {
        self.state == ElementState::Pressed && !self.repeat
    }
}

impl From<&KeyEvent> for RawKeyEvent {
    fn from(event: &KeyEvent) -> Self {
        Self {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        }
    }
}

/// Held / just-pressed / just-released sets for physical keys.
///
/// Feed every key event to [`process_raw`](Self::process_raw), query, then
/// call [`clear_transients`](Self::clear_transients) at the end of the frame.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pressed: FxHashSet<KeyCode>,
    just_pressed: FxHashSet<KeyCode>,
    just_released: FxHashSet<KeyCode>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a winit key event.
    pub fn process_event(&mut self, event: &KeyEvent) {
        self.process_raw(RawKeyEvent::from(event));
    }

    /// Apply a key transition. Repeats and unidentified keys are ignored.
    pub fn process_raw(&mut self, event: RawKeyEvent) {
        if event.repeat {
            return;
        }
        let Some(code) = event.code() else {
            return;
        };
        match event.state {
            ElementState::Pressed => {
                self.pressed.insert(code);
                self.just_pressed.insert(code);
            }
            ElementState::Released => {
                self.pressed.remove(&code);
                self.just_released.insert(code);
            }
        }
    }

    #[must_use]
    pub fn is_pressed(&self, code: KeyCode) -> bool {
        self.pressed.contains(&code)
    }

    #[must_use]
    pub fn just_pressed(&self, code: KeyCode) -> bool {
        self.just_pressed.contains(&code)
    }

    #[must_use]
    pub fn just_released(&self, code: KeyCode) -> bool {
        self.just_released.contains(&code)
    }

    /// Either shift key held.
    #[must_use]
    pub fn shift_held(&self) -> bool {
        self.is_pressed(KeyCode::ShiftLeft) || self.is_pressed(KeyCode::ShiftRight)
    }

    /// Either control key held.
    #[must_use]
    pub fn ctrl_held(&self) -> bool {
        self.is_pressed(KeyCode::ControlLeft) || self.is_pressed(KeyCode::ControlRight)
    }

    pub fn clear_transients(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Release everything, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.just_released.extend(self.pressed.drain());
        self.just_pressed.clear();
    }
}

/// Stable name of a key code (`"KeyW"`, `"ArrowUp"`), as used by key
/// sequence detectors and binding files.
pub fn key_name(code: KeyCode) -> String {
    format!("{code:?}")
}
