//! The fixed set of galaxy events and their payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a planet, e.g. `"tech-nebula"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanetId(String);

impl PlanetId {
    /// Wrap a planet name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The planet name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlanetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlanetId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// What the notification overlay shows when an easter egg is found.
#[derive(Debug, Clone, PartialEq)]
pub struct EggNotice {
    /// Egg id, e.g. `"konami_code"`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Flavor text.
    pub description: String,
    /// Icon glyph.
    pub icon: String,
}

/// Every event that crosses a component boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum GalaxyEvent {
    /// Nearest planet in range changed (`None` = nothing near).
    UpdateNearPlanet(Option<PlanetId>),
    /// The interact key was pressed.
    TriggerPlanetEntry,
    /// The exit key was pressed.
    ExitRequested,
    /// The camera rig took (`true`) or released (`false`) the camera.
    /// Advisory: vehicles ignore controls while locked.
    CameraLock(bool),
    /// Rocket position projected to viewport pixels.
    RocketScreenPos { x: f32, y: f32 },
    /// A music track started.
    MusicPlay { track: String },
    /// Playback paused.
    MusicPause,
    /// Playback resumed.
    MusicResume,
    /// Volume changed (0..=1).
    MusicVolume(f32),
    /// Mute toggled.
    MusicMute(bool),
    /// Playback stopped.
    MusicStop,
    /// An easter egg was discovered.
    EasterEggFound(EggNotice),
    /// A secret was found; feeds the achievement tracker.
    SecretFound { secret_id: String },
    /// A photo was captured.
    PhotoTaken,
    /// Photo mode switched on or off.
    PhotoModeToggled(bool),
    /// Photo-mode FOV override in degrees.
    CameraFovChange(f32),
    /// A vehicle customization changed.
    VehicleCustomized,
    /// An achievement unlocked.
    AchievementUnlocked { id: String, title: String },
    /// Show/hide the achievements panel.
    ToggleAchievements,
    /// Show/hide the photo gallery.
    ToggleGallery,
    /// Show/hide the customizer panel.
    ToggleCustomizer,
}

/// Payload-free discriminant of [`GalaxyEvent`], used for subscription filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    UpdateNearPlanet,
    TriggerPlanetEntry,
    ExitRequested,
    CameraLock,
    RocketScreenPos,
    MusicPlay,
    MusicPause,
    MusicResume,
    MusicVolume,
    MusicMute,
    MusicStop,
    EasterEggFound,
    SecretFound,
    PhotoTaken,
    PhotoModeToggled,
    CameraFovChange,
    VehicleCustomized,
    AchievementUnlocked,
    ToggleAchievements,
    ToggleGallery,
    ToggleCustomizer,
}

impl GalaxyEvent {
    /// The discriminant of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            GalaxyEvent::UpdateNearPlanet(_) => EventKind::UpdateNearPlanet,
            GalaxyEvent::TriggerPlanetEntry => EventKind::TriggerPlanetEntry,
            GalaxyEvent::ExitRequested => EventKind::ExitRequested,
            GalaxyEvent::CameraLock(_) => EventKind::CameraLock,
            GalaxyEvent::RocketScreenPos { .. } => EventKind::RocketScreenPos,
            GalaxyEvent::MusicPlay { .. } => EventKind::MusicPlay,
            GalaxyEvent::MusicPause => EventKind::MusicPause,
            GalaxyEvent::MusicResume => EventKind::MusicResume,
            GalaxyEvent::MusicVolume(_) => EventKind::MusicVolume,
            GalaxyEvent::MusicMute(_) => EventKind::MusicMute,
            GalaxyEvent::MusicStop => EventKind::MusicStop,
            GalaxyEvent::EasterEggFound(_) => EventKind::EasterEggFound,
            GalaxyEvent::SecretFound { .. } => EventKind::SecretFound,
            GalaxyEvent::PhotoTaken => EventKind::PhotoTaken,
            GalaxyEvent::PhotoModeToggled(_) => EventKind::PhotoModeToggled,
            GalaxyEvent::CameraFovChange(_) => EventKind::CameraFovChange,
            GalaxyEvent::VehicleCustomized => EventKind::VehicleCustomized,
            GalaxyEvent::AchievementUnlocked { .. } => EventKind::AchievementUnlocked,
            GalaxyEvent::ToggleAchievements => EventKind::ToggleAchievements,
            GalaxyEvent::ToggleGallery => EventKind::ToggleGallery,
            GalaxyEvent::ToggleCustomizer => EventKind::ToggleCustomizer,
        }
    }
}
