//! The set of services a session is built with.

use chrono::{DateTime, FixedOffset, Local, TimeZone, Timelike};
use tracing::warn;

use crate::achievements::AchievementStore;
use crate::customization::CustomizationStore;
use crate::easter_eggs::EasterEggStore;
use crate::music::MusicStore;
use crate::persist::{MemoryStateStore, StateStore};
use crate::photo::PhotoModeStore;
use crate::tracker::AchievementTracker;

/// Every store, constructed once and handed to the session.
pub struct Services {
    backend: Box<dyn StateStore>,
    pub achievements: AchievementStore,
    pub tracker: AchievementTracker,
    pub music: MusicStore,
    pub photo: PhotoModeStore,
    pub customization: CustomizationStore,
    pub eggs: EasterEggStore,
}

impl Services {
    /// Load every persisted store from `backend`.
    pub fn load(backend: Box<dyn StateStore>, default_volume: f32) -> Self {
        Self {
            achievements: AchievementStore::load(backend.as_ref()),
            tracker: AchievementTracker::new(),
            music: MusicStore::load(backend.as_ref(), default_volume),
            photo: PhotoModeStore::new(),
            customization: CustomizationStore::load(backend.as_ref()),
            eggs: EasterEggStore::load(backend.as_ref()),
            backend,
        }
    }

    /// Fresh services on an in-memory back end.
    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryStateStore::new()), 0.5)
    }

    pub fn backend(&self) -> &dyn StateStore {
        self.backend.as_ref()
    }

    /// Save every store with unsaved changes. Failures are logged and the
    /// store stays dirty so the next call retries.
    pub fn persist(&mut self) {
        let backend = self.backend.as_mut();
        if self.achievements.is_dirty() {
            if let Err(e) = self.achievements.save(backend) {
                warn!("could not save achievements: {e}");
            }
        }
        if self.music.is_dirty() {
            if let Err(e) = self.music.save(backend) {
                warn!("could not save music preferences: {e}");
            }
        }
        if self.customization.is_dirty() {
            if let Err(e) = self.customization.save(backend) {
                warn!("could not save customization: {e}");
            }
        }
        if self.eggs.is_dirty() {
            if let Err(e) = self.eggs.save(backend) {
                warn!("could not save easter eggs: {e}");
            }
        }
    }
}

/// `(hour, minute)` of `now` on its own clock.
pub fn time_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> (u32, u32) {
    (now.hour(), now.minute())
}

/// The player's wall clock. Resolves to UTC when the local zone is unknown.
pub fn local_now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use starfolio_events::EventBus;

    #[test]
    fn test_persist_then_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut bus = EventBus::new();
        {
            let backend = Box::new(crate::persist::FileStateStore::new(dir.path()));
            let mut services = Services::load(backend, 0.5);
            services.achievements.unlock("night_owl", &mut bus);
            services.music.set_volume(0.9, &mut bus);
            services.eggs.unlock_secret_planet(&mut bus);
            services.persist();
            assert!(!services.achievements.is_dirty());
        }
        let backend = Box::new(crate::persist::FileStateStore::new(dir.path()));
        let services = Services::load(backend, 0.5);
        assert!(services.achievements.is_unlocked("night_owl"));
        assert_eq!(services.music.volume(), 0.9);
        assert!(services.eggs.secret_planet_unlocked());
    }

    #[test]
    fn test_clock_checks_follow_the_local_offset() {
        let mut bus = EventBus::new();
        let mut services = Services::in_memory();
        let ist = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();

        // 18:30 UTC is midnight at +05:30
        let midnight = Utc.with_ymd_and_hms(2026, 3, 1, 18, 30, 0).unwrap().with_timezone(&ist);
        let (hour, minute) = time_of_day(&midnight);
        assert_eq!((hour, minute), (0, 0));
        services.eggs.check_midnight(hour, minute, &mut bus);
        assert!(services.eggs.is_found("midnight_visitor"));

        // 20:00 UTC is 01:30 local: inside the night-owl window
        let late = Utc.with_ymd_and_hms(2026, 3, 1, 20, 0, 0).unwrap().with_timezone(&ist);
        services.tracker.check_night_owl(time_of_day(&late).0, &mut services.achievements, &mut bus);
        assert!(services.achievements.is_unlocked("night_owl"));
    }

    #[test]
    fn test_utc_evening_is_not_night_further_east() {
        let mut bus = EventBus::new();
        let mut services = Services::in_memory();
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();

        // 23:00 UTC is 08:00 in Tokyo
        let morning = Utc.with_ymd_and_hms(2026, 3, 1, 23, 0, 0).unwrap().with_timezone(&tokyo);
        assert_eq!(time_of_day(&morning), (8, 0));
        services.tracker.check_night_owl(time_of_day(&morning).0, &mut services.achievements, &mut bus);
        assert!(!services.achievements.is_unlocked("night_owl"));
    }
}
