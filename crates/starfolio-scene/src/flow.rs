//! Top-level screens: start, vehicle selection, then the galaxy.

use starfolio_config::VehicleMode;
use tracing::{debug, info};

use crate::timers::Timers;

pub const START_TRANSITION_MS: u32 = 800;
pub const SELECT_TRANSITION_MS: u32 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Start,
    ModeSelect,
    Galaxy(VehicleMode),
}

/// Screen flow with the fade transitions between screens. Input is ignored
/// while a transition is running.
#[derive(Debug)]
pub struct AppFlow {
    screen: Screen,
    transitioning: bool,
    timers: Timers<Screen>,
}

impl Default for AppFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl AppFlow {
    pub fn new() -> Self {
        Self {
            screen: Screen::Start,
            transitioning: false,
            timers: Timers::new(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// Leave the start screen.
    pub fn start(&mut self) -> bool {
        if self.screen != Screen::Start || self.transitioning {
            return false;
        }
        debug!("start pressed");
        self.transitioning = true;
        self.timers.schedule_ms(START_TRANSITION_MS, Screen::ModeSelect);
        true
    }

    /// Pick the vehicle on the selection screen.
    pub fn select_vehicle(&mut self, mode: VehicleMode) -> bool {
        if self.screen != Screen::ModeSelect || self.transitioning {
            return false;
        }
        debug!(vehicle = mode.as_str(), "vehicle selected");
        self.transitioning = true;
        self.timers.schedule_ms(SELECT_TRANSITION_MS, Screen::Galaxy(mode));
        true
    }

    /// Advance running transitions; returns the screen just entered.
    pub fn advance(&mut self, dt: f32) -> Option<Screen> {
        let next = self.timers.advance(dt).pop()?;
        self.screen = next.action;
        self.transitioning = false;
        info!(screen = ?self.screen, "screen changed");
        Some(self.screen)
    }
}
