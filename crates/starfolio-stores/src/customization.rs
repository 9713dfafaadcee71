//! Per-vehicle paint jobs, presets and the customizer panel flag.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use starfolio_events::{EventBus, GalaxyEvent};
use tracing::warn;

use crate::error::StoreError;
use crate::persist::{StateStore, load_versioned, save_versioned};

pub const CUSTOMIZATION_KEY: &str = "vehicle-customization";
pub const CUSTOMIZATION_VERSION: u32 = 1;

/// An sRGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    const fn hex(v: u32) -> Self {
        Self::new((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    /// Linear 0..1 components for shaders.
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color {:?}, expected #rrggbb", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_owned());
        let digits = s.strip_prefix('#').ok_or_else(err)?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let v = u32::from_str_radix(digits, 16).map_err(|_| err())?;
        Ok(Self::hex(v))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    Rocket,
    Car,
    Astronaut,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleCustomization {
    pub primary_color: Rgb,
    pub secondary_color: Rgb,
    pub accent_color: Rgb,
    pub trail_color: Rgb,
    pub glow_color: Rgb,
    pub decal: String,
    pub trail_intensity: f32,
    pub glow_intensity: f32,
    pub preset: String,
}

impl VehicleCustomization {
    /// Factory paint for `kind`.
    pub fn defaults_for(kind: VehicleKind) -> Self {
        let (primary, secondary, accent, trail, glow, trail_i, glow_i) = match kind {
            VehicleKind::Rocket => (0x0b0f14, 0x0ea5e9, 0x00d4ff, 0x00e4ff, 0x00d4ff, 1.0, 1.0),
            VehicleKind::Car => (0x1a1a1a, 0x0ea5e9, 0x00d4ff, 0x00e4ff, 0x00d4ff, 1.0, 1.0),
            VehicleKind::Astronaut => (0xffffff, 0x1a3a4a, 0x0ea5e9, 0x00d4ff, 0x00ffff, 0.5, 0.8),
        };
        Self {
            primary_color: Rgb::hex(primary),
            secondary_color: Rgb::hex(secondary),
            accent_color: Rgb::hex(accent),
            trail_color: Rgb::hex(trail),
            glow_color: Rgb::hex(glow),
            decal: "none".to_owned(),
            trail_intensity: trail_i,
            glow_intensity: glow_i,
            preset: "default".to_owned(),
        }
    }

    fn apply(&mut self, patch: &CustomizationPatch) {
        if let Some(c) = patch.primary_color {
            self.primary_color = c;
        }
        if let Some(c) = patch.secondary_color {
            self.secondary_color = c;
        }
        if let Some(c) = patch.accent_color {
            self.accent_color = c;
        }
        if let Some(c) = patch.trail_color {
            self.trail_color = c;
        }
        if let Some(c) = patch.glow_color {
            self.glow_color = c;
        }
        if let Some(d) = &patch.decal {
            self.decal.clone_from(d);
        }
        if let Some(i) = patch.trail_intensity {
            self.trail_intensity = i.max(0.0);
        }
        if let Some(i) = patch.glow_intensity {
            self.glow_intensity = i.max(0.0);
        }
        if let Some(p) = &patch.preset {
            self.preset.clone_from(p);
        }
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomizationPatch {
    pub primary_color: Option<Rgb>,
    pub secondary_color: Option<Rgb>,
    pub accent_color: Option<Rgb>,
    pub trail_color: Option<Rgb>,
    pub glow_color: Option<Rgb>,
    pub decal: Option<String>,
    pub trail_intensity: Option<f32>,
    pub glow_intensity: Option<f32>,
    pub preset: Option<String>,
}

pub const PRESET_NAMES: [&str; 9] = [
    "default", "cyberpunk", "stealth", "neon", "sunset", "ocean", "forest", "royal", "fire",
];

/// The color patch for a named preset. `"default"` has no colors of its own;
/// applying it restores the vehicle's factory paint.
pub fn preset(name: &str) -> Option<CustomizationPatch> {
    let colors: [u32; 5] = match name {
        "default" => return Some(CustomizationPatch::default()),
        "cyberpunk" => [0xff006e, 0x8b5cf6, 0x00d4ff, 0xff006e, 0xff00ff],
        "stealth" => [0x0a0a0a, 0x1a1a1a, 0x2a2a2a, 0x333333, 0x444444],
        "neon" => [0x000000, 0x00ff99, 0x00ffff, 0x00ff99, 0x00ffff],
        "sunset" => [0xff6b35, 0xf7931e, 0xffd700, 0xff8c42, 0xffa500],
        "ocean" => [0x006494, 0x0496ff, 0x00d4ff, 0x06b6d4, 0x00d4ff],
        "forest" => [0x2d5016, 0x52b788, 0x95d5b2, 0x74c69d, 0x52b788],
        "royal" => [0x4a148c, 0x7b1fa2, 0xce93d8, 0x9c27b0, 0xba68c8],
        "fire" => [0xc1121f, 0xff6700, 0xffd60a, 0xff9500, 0xff4800],
        _ => return None,
    };
    Some(CustomizationPatch {
        primary_color: Some(Rgb::hex(colors[0])),
        secondary_color: Some(Rgb::hex(colors[1])),
        accent_color: Some(Rgb::hex(colors[2])),
        trail_color: Some(Rgb::hex(colors[3])),
        glow_color: Some(Rgb::hex(colors[4])),
        preset: Some(name.to_owned()),
        ..Default::default()
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Saved {
    rocket: VehicleCustomization,
    car: VehicleCustomization,
    astronaut: VehicleCustomization,
    current_vehicle: VehicleKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomizationStore {
    rocket: VehicleCustomization,
    car: VehicleCustomization,
    astronaut: VehicleCustomization,
    current_vehicle: VehicleKind,
    show_customizer: bool,
    dirty: bool,
}

impl Default for CustomizationStore {
    fn default() -> Self {
        Self {
            rocket: VehicleCustomization::defaults_for(VehicleKind::Rocket),
            car: VehicleCustomization::defaults_for(VehicleKind::Car),
            astronaut: VehicleCustomization::defaults_for(VehicleKind::Astronaut),
            current_vehicle: VehicleKind::Rocket,
            show_customizer: false,
            dirty: false,
        }
    }
}

impl CustomizationStore {
    pub fn load(store: &dyn StateStore) -> Self {
        match load_versioned::<Saved>(store, CUSTOMIZATION_KEY, CUSTOMIZATION_VERSION) {
            Some(saved) => Self {
                rocket: saved.rocket,
                car: saved.car,
                astronaut: saved.astronaut,
                current_vehicle: saved.current_vehicle,
                ..Default::default()
            },
            None => Self::default(),
        }
    }

    pub fn save(&mut self, store: &mut dyn StateStore) -> Result<(), StoreError> {
        let saved = Saved {
            rocket: self.rocket.clone(),
            car: self.car.clone(),
            astronaut: self.astronaut.clone(),
            current_vehicle: self.current_vehicle,
        };
        save_versioned(store, CUSTOMIZATION_KEY, CUSTOMIZATION_VERSION, &saved)?;
        self.dirty = false;
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn get(&self, kind: VehicleKind) -> &VehicleCustomization {
        match kind {
            VehicleKind::Rocket => &self.rocket,
            VehicleKind::Car => &self.car,
            VehicleKind::Astronaut => &self.astronaut,
        }
    }

    fn get_mut(&mut self, kind: VehicleKind) -> &mut VehicleCustomization {
        match kind {
            VehicleKind::Rocket => &mut self.rocket,
            VehicleKind::Car => &mut self.car,
            VehicleKind::Astronaut => &mut self.astronaut,
        }
    }

    /// Merge `patch` into `kind`'s customization.
    pub fn set_customization(&mut self, kind: VehicleKind, patch: &CustomizationPatch, bus: &mut EventBus) {
        self.get_mut(kind).apply(patch);
        self.dirty = true;
        bus.publish(GalaxyEvent::VehicleCustomized);
    }

    /// Apply a named preset. Unknown names are ignored.
    pub fn apply_preset(&mut self, kind: VehicleKind, name: &str, bus: &mut EventBus) -> bool {
        let Some(patch) = preset(name) else {
            warn!(name, "unknown customization preset");
            return false;
        };
        if name == "default" {
            *self.get_mut(kind) = VehicleCustomization::defaults_for(kind);
            self.dirty = true;
            bus.publish(GalaxyEvent::VehicleCustomized);
        } else {
            self.set_customization(kind, &patch, bus);
        }
        true
    }

    /// Restore factory paint without announcing a customization.
    pub fn reset(&mut self, kind: VehicleKind) {
        *self.get_mut(kind) = VehicleCustomization::defaults_for(kind);
        self.dirty = true;
    }

    pub fn current_vehicle(&self) -> VehicleKind {
        self.current_vehicle
    }

    pub fn set_current_vehicle(&mut self, kind: VehicleKind) {
        if self.current_vehicle != kind {
            self.current_vehicle = kind;
            self.dirty = true;
        }
    }

    pub fn is_customizer_open(&self) -> bool {
        self.show_customizer
    }

    pub fn toggle_customizer(&mut self, bus: &mut EventBus) -> bool {
        self.show_customizer = !self.show_customizer;
        bus.publish(GalaxyEvent::ToggleCustomizer);
        self.show_customizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStateStore;
    use starfolio_events::EventKind;

    #[test]
    fn test_color_parse_and_display() {
        let c: Rgb = "#0EA5E9".parse().unwrap();
        assert_eq!(c, Rgb::new(0x0e, 0xa5, 0xe9));
        assert_eq!(c.to_string(), "#0ea5e9");
        assert!("0ea5e9".parse::<Rgb>().is_err());
        assert!("#0ea5e".parse::<Rgb>().is_err());
        assert!("#zzzzzz".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_factory_defaults() {
        let s = CustomizationStore::default();
        assert_eq!(s.get(VehicleKind::Car).primary_color.to_string(), "#1a1a1a");
        assert_eq!(s.get(VehicleKind::Astronaut).glow_intensity, 0.8);
        assert_eq!(s.current_vehicle(), VehicleKind::Rocket);
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let mut bus = EventBus::new();
        let sub = bus.subscribe(&[EventKind::VehicleCustomized]);
        let mut s = CustomizationStore::default();
        s.set_customization(
            VehicleKind::Rocket,
            &CustomizationPatch {
                glow_intensity: Some(2.5),
                decal: Some("stripes".into()),
                ..Default::default()
            },
            &mut bus,
        );
        let r = s.get(VehicleKind::Rocket);
        assert_eq!(r.glow_intensity, 2.5);
        assert_eq!(r.decal, "stripes");
        assert_eq!(r.primary_color.to_string(), "#0b0f14");
        assert_eq!(sub.pending(), 1);
    }

    #[test]
    fn test_all_presets_resolve() {
        for name in PRESET_NAMES {
            assert!(preset(name).is_some(), "{name}");
        }
        assert!(preset("vaporwave").is_none());
    }

    #[test]
    fn test_apply_preset_and_default_restores() {
        let mut bus = EventBus::new();
        let mut s = CustomizationStore::default();
        assert!(s.apply_preset(VehicleKind::Car, "fire", &mut bus));
        assert_eq!(s.get(VehicleKind::Car).preset, "fire");
        assert_eq!(s.get(VehicleKind::Car).glow_color.to_string(), "#ff4800");
        assert!(s.apply_preset(VehicleKind::Car, "default", &mut bus));
        assert_eq!(s.get(VehicleKind::Car), &VehicleCustomization::defaults_for(VehicleKind::Car));
        assert!(!s.apply_preset(VehicleKind::Car, "vaporwave", &mut bus));
    }

    #[test]
    fn test_preset_round_trips_through_storage() {
        let mut bus = EventBus::new();
        let mut backend = MemoryStateStore::new();
        let mut s = CustomizationStore::default();
        s.apply_preset(VehicleKind::Rocket, "royal", &mut bus);
        s.set_customization(
            VehicleKind::Astronaut,
            &CustomizationPatch {
                trail_intensity: Some(0.25),
                ..Default::default()
            },
            &mut bus,
        );
        s.set_current_vehicle(VehicleKind::Car);
        s.save(&mut backend).unwrap();

        let back = CustomizationStore::load(&backend);
        for kind in [VehicleKind::Rocket, VehicleKind::Car, VehicleKind::Astronaut] {
            assert_eq!(back.get(kind), s.get(kind));
        }
        assert_eq!(back.current_vehicle(), VehicleKind::Car);
    }

    #[test]
    fn test_toggle_customizer() {
        let mut bus = EventBus::new();
        let mut s = CustomizationStore::default();
        assert!(s.toggle_customizer(&mut bus));
        assert!(!s.toggle_customizer(&mut bus));
    }
}
