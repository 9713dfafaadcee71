//! Turns key transitions into control flags, bus events and UI commands.

use starfolio_events::{EventBus, GalaxyEvent};

use crate::bindings::KeyBindings;
use crate::controls::ControlState;
use crate::keyboard::{KeyboardState, RawKeyEvent};

/// Shortcuts that act on stores owned by the session rather than on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    TogglePhotoMode,
    CapturePhoto,
    ToggleCustomizer,
    /// Pause when playing, resume otherwise.
    ToggleMusic,
    NextTrack,
    PreviousTrack,
}

/// Owns the keyboard state and bindings; the single writer of [`ControlState`].
#[derive(Debug, Clone, Default)]
pub struct InputBridge {
    keyboard: KeyboardState,
    bindings: KeyBindings,
    controls: ControlState,
}

impl InputBridge {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            ..Default::default()
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    /// Current control flags.
    pub fn controls(&self) -> ControlState {
        self.controls
    }

    /// Apply one key transition. Planet entry, exit and panel toggles are
    /// published on `bus`; store shortcuts are returned.
    pub fn handle_key(
        &mut self,
        event: RawKeyEvent,
        photo_mode: bool,
        bus: &mut EventBus,
    ) -> Vec<InputCommand> {
        self.keyboard.process_raw(event);
        self.controls = ControlState::from_keyboard(&self.keyboard, &self.bindings);

        let mut commands = Vec::new();
        if !event.is_press() {
            return commands;
        }
        let Some(code) = event.code() else {
            return commands;
        };
        let b = &self.bindings;
        let ctrl = self.keyboard.ctrl_held();

        if code == b.interact {
            bus.publish(GalaxyEvent::TriggerPlanetEntry);
        }
        if code == b.exit {
            bus.publish(GalaxyEvent::ExitRequested);
        }
        if code == b.photo_mode {
            commands.push(InputCommand::TogglePhotoMode);
        }
        if photo_mode {
            if code == b.capture {
                commands.push(InputCommand::CapturePhoto);
            }
            if code == b.gallery {
                bus.publish(GalaxyEvent::ToggleGallery);
            }
        } else {
            if code == b.customizer {
                commands.push(InputCommand::ToggleCustomizer);
            }
            if code == b.music {
                commands.push(InputCommand::ToggleMusic);
            }
            if code == b.achievements {
                bus.publish(GalaxyEvent::ToggleAchievements);
            }
        }
        if ctrl && code == b.next_track {
            commands.push(InputCommand::NextTrack);
        }
        if ctrl && code == b.previous_track {
            commands.push(InputCommand::PreviousTrack);
        }
        commands
    }

    /// Forget per-frame transitions.
    pub fn end_frame(&mut self) {
        self.keyboard.clear_transients();
    }

    /// Drop all held keys (focus lost).
    pub fn release_all(&mut self) {
        self.keyboard.release_all();
        self.controls = ControlState::default();
    }
}
