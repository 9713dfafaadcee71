//! Photo mode: pause the scene, pick a filter, capture frames.
//!
//! Session-only; nothing here is persisted.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use starfolio_events::{EventBus, GalaxyEvent};
use tracing::debug;

/// Allowed range for the photo-mode field of view.
pub const PHOTO_FOV_RANGE: (f32, f32) = (30.0, 120.0);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoFilter {
    #[default]
    None,
    Vintage,
    Noir,
    Vivid,
    Cool,
    Warm,
    Cyberpunk,
    Dreamy,
}

impl PhotoFilter {
    pub const ALL: [PhotoFilter; 8] = [
        PhotoFilter::None,
        PhotoFilter::Vintage,
        PhotoFilter::Noir,
        PhotoFilter::Vivid,
        PhotoFilter::Cool,
        PhotoFilter::Warm,
        PhotoFilter::Cyberpunk,
        PhotoFilter::Dreamy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PhotoFilter::None => "None",
            PhotoFilter::Vintage => "Vintage",
            PhotoFilter::Noir => "Noir",
            PhotoFilter::Vivid => "Vivid",
            PhotoFilter::Cool => "Cool",
            PhotoFilter::Warm => "Warm",
            PhotoFilter::Cyberpunk => "Cyberpunk",
            PhotoFilter::Dreamy => "Dreamy",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CapturedPhoto {
    pub id: String,
    /// Encoded image as handed over by the renderer.
    pub image: Vec<u8>,
    pub timestamp: SystemTime,
    pub filter: PhotoFilter,
    /// Planet the photo was taken near, if any.
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PhotoModeStore {
    active: bool,
    paused: bool,
    filter: PhotoFilter,
    photos: Vec<CapturedPhoto>,
    captured: u64,
}

impl PhotoModeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Photo mode freezes the simulation while it is on.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn filter(&self) -> PhotoFilter {
        self.filter
    }

    pub fn photos(&self) -> &[CapturedPhoto] {
        &self.photos
    }

    pub fn toggle(&mut self, bus: &mut EventBus) -> bool {
        self.active = !self.active;
        self.paused = self.active;
        debug!(active = self.active, "photo mode toggled");
        bus.publish(GalaxyEvent::PhotoModeToggled(self.active));
        self.active
    }

    pub fn set_filter(&mut self, filter: PhotoFilter) {
        self.filter = filter;
    }

    /// Store a captured frame and announce it.
    pub fn capture(&mut self, image: Vec<u8>, location: Option<String>, bus: &mut EventBus) -> &CapturedPhoto {
        self.captured += 1;
        let timestamp = SystemTime::now();
        let millis = timestamp
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        self.photos.push(CapturedPhoto {
            id: format!("photo_{millis}_{}", self.captured),
            image,
            timestamp,
            filter: self.filter,
            location,
        });
        bus.publish(GalaxyEvent::PhotoTaken);
        &self.photos[self.photos.len() - 1]
    }

    /// Remove a photo by id. Returns whether one was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.photos.len();
        self.photos.retain(|p| p.id != id);
        self.photos.len() != before
    }

    pub fn clear(&mut self) {
        self.photos.clear();
    }

    /// Override the camera field of view, clamped to [`PHOTO_FOV_RANGE`].
    pub fn set_fov(&self, fov: f32, bus: &mut EventBus) -> f32 {
        let fov = fov.clamp(PHOTO_FOV_RANGE.0, PHOTO_FOV_RANGE.1);
        bus.publish(GalaxyEvent::CameraFovChange(fov));
        fov
    }
}
