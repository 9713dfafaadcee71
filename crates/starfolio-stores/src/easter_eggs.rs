//! Hidden eggs, their detectors, and the secret-planet unlock flag.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use starfolio_events::{EggNotice, EventBus, GalaxyEvent};
use tracing::{info, warn};

use crate::error::StoreError;
use crate::persist::{StateStore, load_versioned, save_versioned};

pub const EASTER_EGGS_KEY: &str = "easter-eggs";
pub const EASTER_EGGS_VERSION: u32 = 1;

pub const KONAMI_CODE: [&str; 10] = [
    "ArrowUp", "ArrowUp", "ArrowDown", "ArrowDown", "ArrowLeft", "ArrowRight", "ArrowLeft",
    "ArrowRight", "KeyB", "KeyA",
];

const CLICK_FRENZY_COUNT: u32 = 50;
const CLICK_FRENZY_GAP_SECS: f32 = 2.0;
const BOOST_HOLD_SECS: f32 = 10.0;
const FULL_TURN: f32 = std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EggKind {
    Konami,
    Click,
    Explore,
    Time,
    Sequence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EggRarity {
    Common,
    Rare,
    Legendary,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EggDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub hint: &'static str,
    pub kind: EggKind,
    pub rarity: EggRarity,
}

pub const EGGS: [EggDef; 8] = [
    EggDef { id: "konami_code", name: "The Legendary Code", description: "You entered the legendary Konami Code!", icon: "🎮", hint: "Try the most famous cheat code in gaming history", kind: EggKind::Konami, rarity: EggRarity::Legendary },
    EggDef { id: "secret_planet", name: "Hidden Planet X", description: "You discovered the mysterious Planet X!", icon: "🌑", hint: "Look beyond the known planets...", kind: EggKind::Explore, rarity: EggRarity::Legendary },
    EggDef { id: "triple_boost", name: "Speed Demon", description: "Hold boost for 10 seconds straight", icon: "⚡", hint: "Need for speed!", kind: EggKind::Sequence, rarity: EggRarity::Rare },
    EggDef { id: "midnight_visitor", name: "Midnight Explorer", description: "Visit the portfolio at exactly midnight", icon: "🌙", hint: "When the clock strikes twelve...", kind: EggKind::Time, rarity: EggRarity::Rare },
    EggDef { id: "spin_master", name: "Spin Master", description: "Do a 360° spin in any vehicle", icon: "🌀", hint: "Try spinning, that's a good trick!", kind: EggKind::Sequence, rarity: EggRarity::Common },
    EggDef { id: "click_frenzy", name: "Click Frenzy", description: "Click on the sun 50 times", icon: "☀️", hint: "The sun has secrets...", kind: EggKind::Click, rarity: EggRarity::Common },
    EggDef { id: "planet_visitor", name: "Universal Tourist", description: "Visit all planets in a single session", icon: "🗺️", hint: "Complete the grand tour", kind: EggKind::Explore, rarity: EggRarity::Rare },
    EggDef { id: "photo_bomb", name: "Perfect Shot", description: "Take a photo while boosting near a planet", icon: "📸", hint: "Capture the perfect moment", kind: EggKind::Sequence, rarity: EggRarity::Rare },
];

pub fn egg_def(id: &str) -> Option<&'static EggDef> {
    EGGS.iter().find(|e| e.id == id)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundEgg {
    pub id: String,
    /// Unix seconds.
    pub found_at: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Saved {
    found: Vec<FoundEgg>,
    secret_planet_unlocked: bool,
}

/// Discovery flags plus the transient detectors that find eggs.
#[derive(Debug, Clone, Default)]
pub struct EasterEggStore {
    found: Vec<FoundEgg>,
    secret_planet_unlocked: bool,
    dirty: bool,
    konami: VecDeque<String>,
    clock: f32,
    click_count: u32,
    last_click_at: Option<f32>,
    boost_held: f32,
    spin: f32,
    visited: FxHashSet<String>,
}

impl EasterEggStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(store: &dyn StateStore) -> Self {
        let mut this = Self::default();
        if let Some(saved) = load_versioned::<Saved>(store, EASTER_EGGS_KEY, EASTER_EGGS_VERSION) {
            this.found = saved
                .found
                .into_iter()
                .filter(|f| egg_def(&f.id).is_some())
                .collect();
            this.secret_planet_unlocked = saved.secret_planet_unlocked;
        }
        this
    }

    pub fn save(&mut self, store: &mut dyn StateStore) -> Result<(), StoreError> {
        let saved = Saved {
            found: self.found.clone(),
            secret_planet_unlocked: self.secret_planet_unlocked,
        };
        save_versioned(store, EASTER_EGGS_KEY, EASTER_EGGS_VERSION, &saved)?;
        self.dirty = false;
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_found(&self, id: &str) -> bool {
        self.found.iter().any(|f| f.id == id)
    }

    pub fn found_count(&self) -> usize {
        self.found.len()
    }

    pub fn found(&self) -> &[FoundEgg] {
        &self.found
    }

    /// Whether planet X has joined the catalog.
    pub fn secret_planet_unlocked(&self) -> bool {
        self.secret_planet_unlocked
    }

    /// Mark `id` found. Publishes `EasterEggFound` then `SecretFound`.
    pub fn found_egg(&mut self, id: &str, bus: &mut EventBus) -> bool {
        let Some(def) = egg_def(id) else {
            warn!(id, "unknown easter egg");
            return false;
        };
        if self.is_found(id) {
            return false;
        }
        self.found.push(FoundEgg {
            id: def.id.to_owned(),
            found_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .ok()
                .map(|d| d.as_secs()),
        });
        self.dirty = true;
        info!(id, name = def.name, "easter egg found");
        bus.publish(GalaxyEvent::EasterEggFound(EggNotice {
            id: def.id.to_owned(),
            name: def.name.to_owned(),
            description: def.description.to_owned(),
            icon: def.icon.to_owned(),
        }));
        bus.publish(GalaxyEvent::SecretFound {
            secret_id: def.id.to_owned(),
        });
        true
    }

    pub fn unlock_secret_planet(&mut self, bus: &mut EventBus) {
        if !self.secret_planet_unlocked {
            self.secret_planet_unlocked = true;
            self.dirty = true;
        }
        self.found_egg("secret_planet", bus);
    }

    /// Feed one key press (by key name). The last ten presses are compared
    /// against the Konami code.
    pub fn track_key(&mut self, key: &str, bus: &mut EventBus) {
        self.konami.push_back(key.to_owned());
        if self.konami.len() > KONAMI_CODE.len() {
            self.konami.pop_front();
        }
        if self.konami.len() == KONAMI_CODE.len() && self.konami.iter().map(String::as_str).eq(KONAMI_CODE.iter().copied()) {
            self.konami.clear();
            self.found_egg("konami_code", bus);
            self.unlock_secret_planet(bus);
        }
    }

    /// Advance the detector clock.
    pub fn tick(&mut self, dt: f32) {
        self.clock += dt.max(0.0);
    }

    /// One click on the sun. Fifty clicks with short gaps finds the egg.
    pub fn track_click(&mut self, bus: &mut EventBus) {
        let chained = self
            .last_click_at
            .is_some_and(|at| self.clock - at <= CLICK_FRENZY_GAP_SECS);
        self.last_click_at = Some(self.clock);
        if !chained {
            self.click_count = 1;
            return;
        }
        self.click_count += 1;
        if self.click_count >= CLICK_FRENZY_COUNT {
            self.click_count = 0;
            self.found_egg("click_frenzy", bus);
        }
    }

    /// Called once a minute with the local wall clock.
    pub fn check_midnight(&mut self, hour: u32, minute: u32, bus: &mut EventBus) {
        if hour == 0 && minute == 0 {
            self.found_egg("midnight_visitor", bus);
        }
    }

    /// One frame of boost state; ten seconds held without release finds the egg.
    pub fn track_boost_hold(&mut self, boosting: bool, dt: f32, bus: &mut EventBus) {
        if !boosting {
            self.boost_held = 0.0;
            return;
        }
        self.boost_held += dt.max(0.0);
        if self.boost_held >= BOOST_HOLD_SECS {
            self.found_egg("triple_boost", bus);
        }
    }

    /// Heading change this frame. A full turn in one direction finds the
    /// egg; reversing or stopping resets the count.
    pub fn track_turn(&mut self, yaw_delta: f32, bus: &mut EventBus) {
        if yaw_delta == 0.0 || (self.spin != 0.0 && yaw_delta.signum() != self.spin.signum()) {
            self.spin = yaw_delta;
        } else {
            self.spin += yaw_delta;
        }
        if self.spin.abs() >= FULL_TURN {
            self.spin = 0.0;
            self.found_egg("spin_master", bus);
        }
    }

    /// Planet entered this session; all `catalog_size` planets finds the egg.
    pub fn track_planet_visit(&mut self, planet: &str, catalog_size: usize, bus: &mut EventBus) {
        self.visited.insert(planet.to_owned());
        if catalog_size > 0 && self.visited.len() >= catalog_size {
            self.found_egg("planet_visitor", bus);
        }
    }

    /// A photo was taken; counts when boosting near a planet.
    pub fn track_photo(&mut self, boosting: bool, near_planet: bool, bus: &mut EventBus) {
        if boosting && near_planet {
            self.found_egg("photo_bomb", bus);
        }
    }

    pub fn reset(&mut self) {
        *self = Self {
            dirty: true,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStateStore;
    use starfolio_events::EventKind;

    #[test]
    fn test_konami_sequence_unlocks_planet() {
        let mut bus = EventBus::new();
        let sub = bus.subscribe(&[EventKind::SecretFound]);
        let mut eggs = EasterEggStore::new();
        eggs.track_key("KeyW", &mut bus);
        for key in KONAMI_CODE {
            eggs.track_key(key, &mut bus);
        }
        assert!(eggs.is_found("konami_code"));
        assert!(eggs.is_found("secret_planet"));
        assert!(eggs.secret_planet_unlocked());
        let ids: Vec<_> = sub
            .drain()
            .filter_map(|e| match e {
                GalaxyEvent::SecretFound { secret_id } => Some(secret_id),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec!["konami_code".to_owned(), "secret_planet".to_owned()]);
    }

    #[test]
    fn test_wrong_sequence_does_nothing() {
        let mut bus = EventBus::new();
        let mut eggs = EasterEggStore::new();
        for key in KONAMI_CODE.iter().rev() {
            eggs.track_key(key, &mut bus);
        }
        assert_eq!(eggs.found_count(), 0);
    }

    #[test]
    fn test_found_egg_is_idempotent() {
        let mut bus = EventBus::new();
        let sub = bus.subscribe(&[EventKind::EasterEggFound]);
        let mut eggs = EasterEggStore::new();
        assert!(eggs.found_egg("photo_bomb", &mut bus));
        assert!(!eggs.found_egg("photo_bomb", &mut bus));
        assert!(!eggs.found_egg("unicorn", &mut bus));
        assert_eq!(sub.drain().count(), 1);
    }

    #[test]
    fn test_click_frenzy_needs_fast_clicks() {
        let mut bus = EventBus::new();
        let mut eggs = EasterEggStore::new();
        for _ in 0..49 {
            eggs.tick(0.5);
            eggs.track_click(&mut bus);
        }
        eggs.tick(3.0);
        eggs.track_click(&mut bus);
        assert!(!eggs.is_found("click_frenzy"));
        for _ in 0..49 {
            eggs.tick(0.1);
            eggs.track_click(&mut bus);
        }
        assert!(eggs.is_found("click_frenzy"));
    }

    #[test]
    fn test_midnight_only_at_zero_zero() {
        let mut bus = EventBus::new();
        let mut eggs = EasterEggStore::new();
        eggs.check_midnight(0, 1, &mut bus);
        eggs.check_midnight(12, 0, &mut bus);
        assert!(!eggs.is_found("midnight_visitor"));
        eggs.check_midnight(0, 0, &mut bus);
        assert!(eggs.is_found("midnight_visitor"));
    }

    #[test]
    fn test_boost_hold_resets_on_release() {
        let mut bus = EventBus::new();
        let mut eggs = EasterEggStore::new();
        eggs.track_boost_hold(true, 9.0, &mut bus);
        eggs.track_boost_hold(false, 0.016, &mut bus);
        eggs.track_boost_hold(true, 9.0, &mut bus);
        assert!(!eggs.is_found("triple_boost"));
        eggs.track_boost_hold(true, 1.5, &mut bus);
        assert!(eggs.is_found("triple_boost"));
    }

    #[test]
    fn test_spin_requires_one_direction() {
        let mut bus = EventBus::new();
        let mut eggs = EasterEggStore::new();
        for _ in 0..50 {
            eggs.track_turn(0.1, &mut bus);
        }
        eggs.track_turn(-0.1, &mut bus);
        for _ in 0..50 {
            eggs.track_turn(0.1, &mut bus);
        }
        assert!(!eggs.is_found("spin_master"));
        for _ in 0..20 {
            eggs.track_turn(0.1, &mut bus);
        }
        assert!(eggs.is_found("spin_master"));
    }

    #[test]
    fn test_planet_visitor_and_photo_bomb() {
        let mut bus = EventBus::new();
        let mut eggs = EasterEggStore::new();
        for p in ["a", "b", "a"] {
            eggs.track_planet_visit(p, 3, &mut bus);
        }
        assert!(!eggs.is_found("planet_visitor"));
        eggs.track_planet_visit("c", 3, &mut bus);
        assert!(eggs.is_found("planet_visitor"));

        eggs.track_photo(true, false, &mut bus);
        assert!(!eggs.is_found("photo_bomb"));
        eggs.track_photo(true, true, &mut bus);
        assert!(eggs.is_found("photo_bomb"));
    }

    #[test]
    fn test_discoveries_persist() {
        let mut bus = EventBus::new();
        let mut backend = MemoryStateStore::new();
        let mut eggs = EasterEggStore::new();
        eggs.unlock_secret_planet(&mut bus);
        eggs.save(&mut backend).unwrap();

        let back = EasterEggStore::load(&backend);
        assert!(back.secret_planet_unlocked());
        assert!(back.is_found("secret_planet"));
        assert!(!back.is_dirty());
    }
}
