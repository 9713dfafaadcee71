//! Planet entry: hyperjump, simulated loading, the landing sub-sequence, then
//! the interior. Strictly linear; exit collapses straight back to idle.

use rand::Rng;
use starfolio_config::EntryConfig;
use starfolio_events::PlanetId;
use starfolio_planet::{PlanetTheme, theme_for};
use tracing::{debug, info};

use crate::timers::Timers;

/// Phases of the landing overlay, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LandingPhase {
    Descending,
    Landed,
    HatchOpen,
    AstronautExit,
}

impl LandingPhase {
    fn next(self) -> Option<Self> {
        match self {
            LandingPhase::Descending => Some(LandingPhase::Landed),
            LandingPhase::Landed => Some(LandingPhase::HatchOpen),
            LandingPhase::HatchOpen => Some(LandingPhase::AstronautExit),
            LandingPhase::AstronautExit => None,
        }
    }

    pub fn caption(self) -> &'static str {
        match self {
            LandingPhase::Descending => "LANDING SEQUENCE INITIATED",
            LandingPhase::Landed => "TOUCHDOWN SUCCESSFUL",
            LandingPhase::HatchOpen => "HATCH OPENING",
            LandingPhase::AstronautExit => "ASTRONAUT DEPLOYING",
        }
    }
}

/// Which cinematic owns the screen. Anything but `None` hides the 3D scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EntryStage {
    #[default]
    None,
    Hyperjump,
    Loading,
    Landing(LandingPhase),
    Astronaut,
}

impl EntryStage {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryStage::None => "none",
            EntryStage::Hyperjump => "hyperjump",
            EntryStage::Loading => "loading",
            EntryStage::Landing(_) => "landing",
            EntryStage::Astronaut => "astronaut",
        }
    }
}

/// Durations of each step, in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntryTimings {
    pub hyperjump: f32,
    pub loading_tick: f32,
    pub loading_max_increment: f32,
    pub loading_settle: f32,
    pub descending: f32,
    pub landed: f32,
    pub hatch_open: f32,
    pub astronaut_exit: f32,
}

impl EntryTimings {
    fn phase_duration(&self, phase: LandingPhase) -> f32 {
        match phase {
            LandingPhase::Descending => self.descending,
            LandingPhase::Landed => self.landed,
            LandingPhase::HatchOpen => self.hatch_open,
            LandingPhase::AstronautExit => self.astronaut_exit,
        }
    }
}

impl From<&EntryConfig> for EntryTimings {
    fn from(c: &EntryConfig) -> Self {
        let secs = |ms: u32| ms as f32 / 1000.0;
        Self {
            hyperjump: secs(c.hyperjump_ms),
            loading_tick: secs(c.loading_tick_ms),
            loading_max_increment: c.loading_max_increment,
            loading_settle: secs(c.loading_settle_ms),
            descending: secs(c.descending_ms),
            landed: secs(c.landed_ms),
            hatch_open: secs(c.hatch_open_ms),
            astronaut_exit: secs(c.astronaut_exit_ms),
        }
    }
}

impl Default for EntryTimings {
    fn default() -> Self {
        Self::from(&EntryConfig::default())
    }
}

/// What happened during [`EntrySequencer::advance`].
#[derive(Clone, Debug, PartialEq)]
pub enum EntryNotice {
    StageChanged(EntryStage),
    /// The landing finished and the interior is mounted. Fires once per run.
    Arrived(PlanetId),
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Step {
    HyperjumpDone,
    LoadingTick,
    LoadingSettled,
    PhaseDone(LandingPhase),
}

/// Drives one planet entry at a time.
#[derive(Debug)]
pub struct EntrySequencer {
    timings: EntryTimings,
    stage: EntryStage,
    planet: Option<PlanetId>,
    theme: &'static PlanetTheme,
    progress: f32,
    timers: Timers<Step>,
}

impl EntrySequencer {
    pub fn new(timings: EntryTimings) -> Self {
        Self {
            timings,
            stage: EntryStage::None,
            planet: None,
            theme: theme_for(""),
            progress: 0.0,
            timers: Timers::new(),
        }
    }

    pub fn stage(&self) -> EntryStage {
        self.stage
    }

    /// The 3D canvas is mounted only while idle.
    pub fn canvas_visible(&self) -> bool {
        self.stage == EntryStage::None
    }

    pub fn planet(&self) -> Option<&PlanetId> {
        self.planet.as_ref()
    }

    /// Theme of the planet being entered (origin station when unknown).
    pub fn theme(&self) -> &'static PlanetTheme {
        self.theme
    }

    /// Raw loading progress, 0..=100.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Whole-percent progress as shown on the loading screen.
    pub fn displayed_progress(&self) -> u32 {
        (self.progress.floor() as u32).min(100)
    }

    /// Start entering `planet`. Ignored unless idle, so a second trigger
    /// mid-sequence never starts a concurrent run.
    pub fn begin(&mut self, planet: PlanetId) -> bool {
        if self.stage != EntryStage::None {
            debug!(planet = planet.as_str(), stage = self.stage.as_str(), "entry already running");
            return false;
        }
        self.theme = theme_for(planet.as_str());
        info!(planet = planet.as_str(), theme = self.theme.label, "starting planet entry");
        self.planet = Some(planet);
        self.progress = 0.0;
        self.stage = EntryStage::Hyperjump;
        self.timers.schedule(self.timings.hyperjump, Step::HyperjumpDone);
        true
    }

    /// Abort or leave the interior: back to idle in one step. Pending
    /// timers of this run are invalidated.
    pub fn exit(&mut self) -> bool {
        if self.stage == EntryStage::None {
            return false;
        }
        info!(from = self.stage.as_str(), "leaving planet entry");
        self.timers.cancel_all();
        self.stage = EntryStage::None;
        self.planet = None;
        self.progress = 0.0;
        true
    }

    /// Advance the timers by `dt` seconds.
    pub fn advance<R: Rng>(&mut self, dt: f32, rng: &mut R) -> Vec<EntryNotice> {
        let mut notices = Vec::new();
        for fired in self.timers.advance(dt) {
            if fired.generation != self.timers.generation() {
                continue;
            }
            self.apply(fired.action, rng, &mut notices);
        }
        notices
    }

    fn set_stage(&mut self, stage: EntryStage, notices: &mut Vec<EntryNotice>) {
        debug!(from = self.stage.as_str(), to = stage.as_str(), "entry stage");
        self.stage = stage;
        notices.push(EntryNotice::StageChanged(stage));
    }

    fn apply<R: Rng>(&mut self, step: Step, rng: &mut R, notices: &mut Vec<EntryNotice>) {
        match step {
            Step::HyperjumpDone => {
                self.progress = 0.0;
                self.set_stage(EntryStage::Loading, notices);
                self.timers.schedule(self.timings.loading_tick, Step::LoadingTick);
            }
            Step::LoadingTick => {
                self.progress += rng.random::<f32>() * self.timings.loading_max_increment;
                if self.progress >= 100.0 {
                    self.progress = 100.0;
                    self.timers.schedule(self.timings.loading_settle, Step::LoadingSettled);
                } else {
                    self.timers.schedule(self.timings.loading_tick, Step::LoadingTick);
                }
            }
            Step::LoadingSettled => {
                let first = LandingPhase::Descending;
                self.set_stage(EntryStage::Landing(first), notices);
                self.timers
                    .schedule(self.timings.phase_duration(first), Step::PhaseDone(first));
            }
            Step::PhaseDone(phase) => match phase.next() {
                Some(next) => {
                    self.set_stage(EntryStage::Landing(next), notices);
                    self.timers
                        .schedule(self.timings.phase_duration(next), Step::PhaseDone(next));
                }
                None => {
                    self.set_stage(EntryStage::Astronaut, notices);
                    if let Some(planet) = &self.planet {
                        info!(planet = planet.as_str(), "landed");
                        notices.push(EntryNotice::Arrived(planet.clone()));
                    }
                }
            },
        }
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
