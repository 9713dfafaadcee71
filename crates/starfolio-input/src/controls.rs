//! The shared control record vehicles read every frame.

use crate::bindings::KeyBindings;
use crate::keyboard::KeyboardState;

/// Named boolean controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Forward,
    Back,
    Left,
    Right,
    Boost,
    Interact,
}

/// Single-writer (input layer), multi-reader (vehicles) control flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub boost: bool,
    pub interact: bool,
}

impl ControlState {
    /// Derive the controls from held keys.
    pub fn from_keyboard(keyboard: &KeyboardState, bindings: &KeyBindings) -> Self {
        Self {
            forward: keyboard.is_pressed(bindings.forward),
            back: keyboard.is_pressed(bindings.back),
            left: keyboard.is_pressed(bindings.left),
            right: keyboard.is_pressed(bindings.right),
            boost: keyboard.shift_held(),
            interact: keyboard.is_pressed(bindings.interact),
        }
    }

    pub fn get(&self, control: Control) -> bool {
        match control {
            Control::Forward => self.forward,
            Control::Back => self.back,
            Control::Left => self.left,
            Control::Right => self.right,
            Control::Boost => self.boost,
            Control::Interact => self.interact,
        }
    }

    pub fn set(&mut self, control: Control, value: bool) {
        let slot = match control {
            Control::Forward => &mut self.forward,
            Control::Back => &mut self.back,
            Control::Left => &mut self.left,
            Control::Right => &mut self.right,
            Control::Boost => &mut self.boost,
            Control::Interact => &mut self.interact,
        };
        *slot = value;
    }

    /// True when no control is active.
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}
