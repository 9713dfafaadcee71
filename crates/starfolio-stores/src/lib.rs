//! Persisted, independently versioned service objects: achievements and
//! their tracker, music, photo mode, vehicle customization and easter eggs.
//!
//! Services are plain structs owned by the session and passed by reference;
//! they publish their notifications on the [`starfolio_events::EventBus`].

pub mod achievements;
pub mod customization;
pub mod easter_eggs;
mod error;
pub mod music;
pub mod persist;
pub mod photo;
mod services;
pub mod tracker;

pub use achievements::{AchievementDef, AchievementStore};
pub use customization::{CustomizationPatch, CustomizationStore, Rgb, VehicleCustomization, VehicleKind};
pub use easter_eggs::EasterEggStore;
pub use error::StoreError;
pub use music::MusicStore;
pub use persist::{FileStateStore, MemoryStateStore, StateStore};
pub use photo::{CapturedPhoto, PhotoFilter, PhotoModeStore};
pub use services::{Services, local_now, time_of_day};
pub use tracker::AchievementTracker;
