//! Session metrics that feed achievement progress.
//!
//! Vehicles, the entry sequencer and the UI report raw facts here (a boost
//! frame, a new position, a photo). The tracker turns them into
//! [`AchievementStore`] progress. Calls are fire-and-forget.

use glam::Vec3;
use rustc_hash::FxHashSet;
use starfolio_events::EventBus;

use crate::achievements::AchievementStore;

/// Gap after which boosting again counts as a new boost.
const NEW_BOOST_GAP_SECS: f32 = 1.0;
/// Delay before the first-launch achievement unlocks.
const FIRST_LAUNCH_DELAY_SECS: f32 = 2.0;

#[derive(Debug, Clone)]
pub struct AchievementTracker {
    clock: f32,
    first_launch_at: Option<f32>,
    visited_planets: FxHashSet<String>,
    boost_count: u32,
    boost_time: f32,
    last_boost_at: Option<f32>,
    total_distance: f32,
    last_position: Option<Vec3>,
    interior_time: f32,
    photos_taken: u32,
    vehicles_used: FxHashSet<String>,
    secrets_found: FxHashSet<String>,
}

impl Default for AchievementTracker {
    fn default() -> Self {
        Self {
            clock: 0.0,
            first_launch_at: Some(FIRST_LAUNCH_DELAY_SECS),
            visited_planets: FxHashSet::default(),
            boost_count: 0,
            boost_time: 0.0,
            last_boost_at: None,
            total_distance: 0.0,
            last_position: None,
            interior_time: 0.0,
            photos_taken: 0,
            vehicles_used: FxHashSet::default(),
            secrets_found: FxHashSet::default(),
        }
    }
}

impl AchievementTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the session clock; unlocks first launch once its delay passed.
    pub fn tick(&mut self, dt: f32, store: &mut AchievementStore, bus: &mut EventBus) {
        self.clock += dt.max(0.0);
        if self.first_launch_at.is_some_and(|at| self.clock >= at) {
            self.first_launch_at = None;
            store.unlock("first_launch", bus);
        }
    }

    /// Unlock night owl when the local hour is 22:00-05:59.
    pub fn check_night_owl(&self, hour: u32, store: &mut AchievementStore, bus: &mut EventBus) {
        if hour >= 22 || hour < 6 {
            store.unlock("night_owl", bus);
        }
    }

    pub fn track_planet_visit(&mut self, planet: &str, store: &mut AchievementStore, bus: &mut EventBus) {
        if !self.visited_planets.insert(planet.to_owned()) {
            return;
        }
        if self.visited_planets.len() == 1 {
            store.unlock("planet_explorer", bus);
        }
        store.update_progress("galaxy_traveler", self.visited_planets.len() as u32, bus);
    }

    pub fn visited_planets(&self) -> usize {
        self.visited_planets.len()
    }

    /// Report one frame of boost state.
    pub fn track_boost(&mut self, boosting: bool, dt: f32, store: &mut AchievementStore, bus: &mut EventBus) {
        if !boosting {
            return;
        }
        let is_new = self
            .last_boost_at
            .is_none_or(|at| self.clock - at > NEW_BOOST_GAP_SECS);
        if is_new {
            self.boost_count += 1;
            store.update_progress("speed_demon", self.boost_count, bus);
        }
        self.last_boost_at = Some(self.clock);
        self.boost_time += dt.max(0.0);
        store.update_progress("sonic_boom", self.boost_time.floor() as u32, bus);
    }

    pub fn boost_count(&self) -> u32 {
        self.boost_count
    }

    /// Report the active vehicle's position. The first sample only anchors.
    pub fn track_distance(&mut self, position: Vec3, store: &mut AchievementStore, bus: &mut EventBus) {
        if let Some(last) = self.last_position {
            self.total_distance += last.distance(position);
            store.update_progress("marathon_runner", self.total_distance.floor() as u32, bus);
        }
        self.last_position = Some(position);
    }

    /// Forget the distance anchor, e.g. after a vehicle swap teleports.
    pub fn reset_distance_anchor(&mut self) {
        self.last_position = None;
    }

    pub fn total_distance(&self) -> f32 {
        self.total_distance
    }

    pub fn track_interior_time(&mut self, in_interior: bool, dt: f32, store: &mut AchievementStore, bus: &mut EventBus) {
        if in_interior {
            self.interior_time += dt.max(0.0);
            store.update_progress("deep_diver", self.interior_time.floor() as u32, bus);
        }
    }

    pub fn track_vehicle(&mut self, mode: &str, store: &mut AchievementStore, bus: &mut EventBus) {
        if self.vehicles_used.insert(mode.to_owned()) {
            store.update_progress("vehicle_switcher", self.vehicles_used.len() as u32, bus);
        }
    }

    pub fn track_photo(&mut self, store: &mut AchievementStore, bus: &mut EventBus) {
        self.photos_taken += 1;
        if self.photos_taken == 1 {
            store.unlock("photographer", bus);
        }
        store.update_progress("influencer", self.photos_taken, bus);
    }

    pub fn track_secret(&mut self, secret_id: &str, store: &mut AchievementStore, bus: &mut EventBus) {
        if !self.secrets_found.insert(secret_id.to_owned()) {
            return;
        }
        store.update_progress("easter_egg_hunter", self.secrets_found.len() as u32, bus);
        match secret_id {
            "secret_planet" => {
                store.unlock("secret_planet", bus);
            }
            "konami_code" => {
                store.unlock("konami_master", bus);
            }
            _ => {}
        }
    }

    pub fn track_customization(&mut self, store: &mut AchievementStore, bus: &mut EventBus) {
        store.unlock("customizer", bus);
    }
}
