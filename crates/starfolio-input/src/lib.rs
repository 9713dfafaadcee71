//! Keyboard handling for the galaxy: raw key state, the shared
//! [`ControlState`] record read by vehicles, user-editable [`KeyBindings`],
//! and the [`InputBridge`] that turns key presses into controls, bus events
//! and UI commands.

pub mod bindings;
pub mod bridge;
pub mod controls;
pub mod keyboard;

pub use bindings::KeyBindings;
pub use bridge::{InputBridge, InputCommand};
pub use controls::{Control, ControlState};
pub use keyboard::{KeyboardState, RawKeyEvent, key_name};
