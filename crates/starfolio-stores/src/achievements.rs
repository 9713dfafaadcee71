//! Achievement definitions and the persisted unlock/progress store.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use starfolio_events::{EventBus, GalaxyEvent};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persist::{StateStore, load_versioned, save_versioned};

pub const ACHIEVEMENTS_KEY: &str = "portfolio-achievements";
pub const ACHIEVEMENTS_VERSION: u32 = 1;

/// Seconds a fresh unlock stays in the popup slot.
pub const RECENT_UNLOCK_SECS: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Exploration,
    Speed,
    Interaction,
    Secret,
}

/// Static description of one achievement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AchievementDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub rarity: Rarity,
    pub category: Category,
    pub max_progress: u32,
}

const fn def(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    icon: &'static str,
    rarity: Rarity,
    category: Category,
    max_progress: u32,
) -> AchievementDef {
    AchievementDef {
        id,
        title,
        description,
        icon,
        rarity,
        category,
        max_progress,
    }
}

pub const ACHIEVEMENTS: [AchievementDef; 15] = [
    def("first_launch", "First Launch", "Start your journey into the portfolio galaxy", "🚀", Rarity::Common, Category::Exploration, 1),
    def("planet_explorer", "Planet Explorer", "Visit your first planet", "🌍", Rarity::Common, Category::Exploration, 1),
    def("galaxy_traveler", "Galaxy Traveler", "Visit all 5 planets", "🌌", Rarity::Rare, Category::Exploration, 5),
    def("deep_diver", "Deep Diver", "Spend 5 minutes exploring interiors", "⏱️", Rarity::Rare, Category::Exploration, 300),
    def("speed_demon", "Speed Demon", "Use boost 50 times", "⚡", Rarity::Common, Category::Speed, 50),
    def("sonic_boom", "Sonic Boom", "Travel at max speed for 30 seconds", "💨", Rarity::Rare, Category::Speed, 30),
    def("marathon_runner", "Marathon Runner", "Travel a total distance of 1000 units", "🏃", Rarity::Epic, Category::Speed, 1000),
    def("vehicle_switcher", "Vehicle Switcher", "Try all 3 vehicle modes", "🔄", Rarity::Common, Category::Interaction, 3),
    def("photographer", "Photographer", "Take your first photo", "📸", Rarity::Common, Category::Interaction, 1),
    def("influencer", "Influencer", "Take 10 photos", "🌟", Rarity::Rare, Category::Interaction, 10),
    def("customizer", "Customizer", "Customize your vehicle", "🎨", Rarity::Common, Category::Interaction, 1),
    def("secret_planet", "???", "Find the hidden planet", "❓", Rarity::Legendary, Category::Secret, 1),
    def("easter_egg_hunter", "Easter Egg Hunter", "Discover all hidden secrets", "🥚", Rarity::Epic, Category::Secret, 5),
    def("night_owl", "Night Owl", "Visit the portfolio at night", "🦉", Rarity::Rare, Category::Secret, 1),
    def("konami_master", "Konami Master", "Enter the legendary code", "🎮", Rarity::Legendary, Category::Secret, 1),
];

/// Look up a definition by id.
pub fn achievement_def(id: &str) -> Option<&'static AchievementDef> {
    ACHIEVEMENTS.iter().find(|d| d.id == id)
}

/// Persisted per-achievement state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementRecord {
    pub id: String,
    pub unlocked: bool,
    /// Unix seconds.
    #[serde(default)]
    pub unlocked_at: Option<u64>,
    pub progress: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Saved {
    records: Vec<AchievementRecord>,
}

#[derive(Debug, Clone, Copy)]
struct RecentUnlock {
    def: &'static AchievementDef,
    remaining: f32,
}

/// Unlock state and progress for every achievement.
#[derive(Debug, Clone)]
pub struct AchievementStore {
    records: Vec<AchievementRecord>,
    recent: Option<RecentUnlock>,
    dirty: bool,
}

impl Default for AchievementStore {
    fn default() -> Self {
        Self {
            records: fresh_records(),
            recent: None,
            dirty: false,
        }
    }
}

fn fresh_records() -> Vec<AchievementRecord> {
    ACHIEVEMENTS
        .iter()
        .map(|d| AchievementRecord {
            id: d.id.to_owned(),
            unlocked: false,
            unlocked_at: None,
            progress: 0,
        })
        .collect()
}

fn unix_now() -> Option<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())
}

impl AchievementStore {
    /// Restore from `store`; unknown ids in the blob are dropped and missing
    /// ones start locked.
    pub fn load(store: &dyn StateStore) -> Self {
        let mut this = Self::default();
        if let Some(saved) = load_versioned::<Saved>(store, ACHIEVEMENTS_KEY, ACHIEVEMENTS_VERSION) {
            for rec in saved.records {
                let Some(def) = achievement_def(&rec.id) else {
                    debug!(id = %rec.id, "dropping unknown saved achievement");
                    continue;
                };
                if let Some(slot) = this.records.iter_mut().find(|r| r.id == rec.id) {
                    slot.unlocked = rec.unlocked;
                    slot.unlocked_at = rec.unlocked_at;
                    slot.progress = rec.progress.min(def.max_progress);
                }
            }
        }
        this
    }

    pub fn save(&mut self, store: &mut dyn StateStore) -> Result<(), StoreError> {
        save_versioned(
            store,
            ACHIEVEMENTS_KEY,
            ACHIEVEMENTS_VERSION,
            &Saved {
                records: self.records.clone(),
            },
        )?;
        self.dirty = false;
        Ok(())
    }

    /// Changed since the last save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn record_mut(&mut self, id: &str) -> Option<&mut AchievementRecord> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    pub fn record(&self, id: &str) -> Option<&AchievementRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.record(id).is_some_and(|r| r.unlocked)
    }

    /// `(progress, max_progress)` for `id`.
    pub fn progress(&self, id: &str) -> Option<(u32, u32)> {
        let def = achievement_def(id)?;
        self.record(id).map(|r| (r.progress, def.max_progress))
    }

    /// Unlock `id`. Returns false when the id is unknown or already unlocked.
    pub fn unlock(&mut self, id: &str, bus: &mut EventBus) -> bool {
        let Some(def) = achievement_def(id) else {
            warn!(id, "unlock requested for unknown achievement");
            return false;
        };
        let Some(rec) = self.record_mut(id) else {
            return false;
        };
        if rec.unlocked {
            return false;
        }
        rec.unlocked = true;
        rec.unlocked_at = unix_now();
        rec.progress = def.max_progress;
        self.recent = Some(RecentUnlock {
            def,
            remaining: RECENT_UNLOCK_SECS,
        });
        self.dirty = true;
        info!(id, title = def.title, "achievement unlocked");
        bus.publish(GalaxyEvent::AchievementUnlocked {
            id: def.id.to_owned(),
            title: def.title.to_owned(),
        });
        true
    }

    /// Set absolute progress for `id` (clamped to its max). Reaching the max
    /// unlocks it. Ignored for unknown or unlocked achievements.
    pub fn update_progress(&mut self, id: &str, progress: u32, bus: &mut EventBus) {
        let Some(def) = achievement_def(id) else {
            return;
        };
        let Some(rec) = self.record_mut(id) else {
            return;
        };
        if rec.unlocked {
            return;
        }
        let clamped = progress.min(def.max_progress);
        if rec.progress != clamped {
            rec.progress = clamped;
            self.dirty = true;
        }
        if progress >= def.max_progress {
            self.unlock(id, bus);
        }
    }

    pub fn unlocked_count(&self) -> usize {
        self.records.iter().filter(|r| r.unlocked).count()
    }

    /// Share of unlocked achievements, rounded to a whole percent.
    pub fn total_progress(&self) -> u32 {
        if self.records.is_empty() {
            return 0;
        }
        (self.unlocked_count() as f32 / self.records.len() as f32 * 100.0).round() as u32
    }

    /// The achievement shown in the popup, if one unlocked recently.
    pub fn recent_unlock(&self) -> Option<&'static AchievementDef> {
        self.recent.map(|r| r.def)
    }

    pub fn clear_recent_unlock(&mut self) {
        self.recent = None;
    }

    /// Expire the recent unlock after [`RECENT_UNLOCK_SECS`].
    pub fn tick(&mut self, dt: f32) {
        if let Some(recent) = &mut self.recent {
            recent.remaining -= dt;
            if recent.remaining <= 0.0 {
                self.recent = None;
            }
        }
    }

    /// Definitions paired with their current state, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static AchievementDef, &AchievementRecord)> {
        ACHIEVEMENTS.iter().zip(self.records.iter())
    }

    pub fn reset(&mut self) {
        self.records = fresh_records();
        self.recent = None;
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStateStore;
    use starfolio_events::EventKind;

    #[test]
    fn test_catalog_has_fifteen_unique_ids() {
        let mut ids: Vec<_> = ACHIEVEMENTS.iter().map(|d| d.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 15);
        assert_eq!(achievement_def("deep_diver").map(|d| d.max_progress), Some(300));
    }

    #[test]
    fn test_unlock_publishes_once() {
        let mut bus = EventBus::new();
        let sub = bus.subscribe(&[EventKind::AchievementUnlocked]);
        let mut store = AchievementStore::default();

        assert!(store.unlock("photographer", &mut bus));
        assert!(!store.unlock("photographer", &mut bus));
        assert!(!store.unlock("no_such_thing", &mut bus));

        assert_eq!(sub.drain().count(), 1);
        assert!(store.is_unlocked("photographer"));
        assert_eq!(store.progress("photographer"), Some((1, 1)));
        assert_eq!(store.recent_unlock().map(|d| d.id), Some("photographer"));
    }

    #[test]
    fn test_progress_clamps_and_auto_unlocks() {
        let mut bus = EventBus::new();
        let mut store = AchievementStore::default();
        store.update_progress("galaxy_traveler", 3, &mut bus);
        assert_eq!(store.progress("galaxy_traveler"), Some((3, 5)));
        assert!(!store.is_unlocked("galaxy_traveler"));

        store.update_progress("galaxy_traveler", 9, &mut bus);
        assert_eq!(store.progress("galaxy_traveler"), Some((5, 5)));
        assert!(store.is_unlocked("galaxy_traveler"));

        store.update_progress("galaxy_traveler", 1, &mut bus);
        assert_eq!(store.progress("galaxy_traveler"), Some((5, 5)));
    }

    #[test]
    fn test_total_progress_rounds() {
        let mut bus = EventBus::new();
        let mut store = AchievementStore::default();
        assert_eq!(store.total_progress(), 0);
        store.unlock("first_launch", &mut bus);
        assert_eq!(store.total_progress(), 7);
        store.unlock("night_owl", &mut bus);
        assert_eq!(store.total_progress(), 13);
    }

    #[test]
    fn test_recent_unlock_expires_after_five_seconds() {
        let mut bus = EventBus::new();
        let mut store = AchievementStore::default();
        store.unlock("customizer", &mut bus);
        for _ in 0..299 {
            store.tick(1.0 / 60.0);
        }
        assert!(store.recent_unlock().is_some());
        store.tick(0.05);
        assert!(store.recent_unlock().is_none());
    }

    #[test]
    fn test_persisted_progress_survives_reload() {
        let mut bus = EventBus::new();
        let mut backend = MemoryStateStore::new();
        let mut store = AchievementStore::default();
        store.unlock("konami_master", &mut bus);
        store.update_progress("marathon_runner", 420, &mut bus);
        assert!(store.is_dirty());
        store.save(&mut backend).unwrap();
        assert!(!store.is_dirty());

        let reloaded = AchievementStore::load(&backend);
        assert!(reloaded.is_unlocked("konami_master"));
        assert_eq!(reloaded.progress("marathon_runner"), Some((420, 1000)));
        assert!(reloaded.recent_unlock().is_none());
    }

    #[test]
    fn test_reset_locks_everything() {
        let mut bus = EventBus::new();
        let mut store = AchievementStore::default();
        store.unlock("first_launch", &mut bus);
        store.reset();
        assert_eq!(store.unlocked_count(), 0);
        assert!(store.recent_unlock().is_none());
    }
}
