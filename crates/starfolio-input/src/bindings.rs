//! User-editable key bindings, persisted as RON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;
use winit::keyboard::KeyCode;

/// [`KeyCode`] has no serde support; store it by name.
mod keycode_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use winit::keyboard::KeyCode;

    pub fn serialize<S: Serializer>(code: &KeyCode, s: S) -> Result<S::Ok, S::Error> {
        crate::keyboard::key_name(*code).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<KeyCode, D::Error> {
        let name = String::deserialize(d)?;
        super::parse_key(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown key: {name}")))
    }
}

/// Parse a key name produced by [`crate::key_name`]. Only the keys a binding
/// can reasonably use are recognized.
pub fn parse_key(name: &str) -> Option<KeyCode> {
    use KeyCode::*;
    let code = match name {
        "KeyA" => KeyA,
        "KeyB" => KeyB,
        "KeyC" => KeyC,
        "KeyD" => KeyD,
        "KeyE" => KeyE,
        "KeyF" => KeyF,
        "KeyG" => KeyG,
        "KeyH" => KeyH,
        "KeyI" => KeyI,
        "KeyJ" => KeyJ,
        "KeyK" => KeyK,
        "KeyL" => KeyL,
        "KeyM" => KeyM,
        "KeyN" => KeyN,
        "KeyO" => KeyO,
        "KeyP" => KeyP,
        "KeyQ" => KeyQ,
        "KeyR" => KeyR,
        "KeyS" => KeyS,
        "KeyT" => KeyT,
        "KeyU" => KeyU,
        "KeyV" => KeyV,
        "KeyW" => KeyW,
        "KeyX" => KeyX,
        "KeyY" => KeyY,
        "KeyZ" => KeyZ,
        "Digit0" => Digit0,
        "Digit1" => Digit1,
        "Digit2" => Digit2,
        "Digit3" => Digit3,
        "Digit4" => Digit4,
        "Digit5" => Digit5,
        "Digit6" => Digit6,
        "Digit7" => Digit7,
        "Digit8" => Digit8,
        "Digit9" => Digit9,
        "Space" => Space,
        "Enter" => Enter,
        "Escape" => Escape,
        "Tab" => Tab,
        "Backspace" => Backspace,
        "ArrowUp" => ArrowUp,
        "ArrowDown" => ArrowDown,
        "ArrowLeft" => ArrowLeft,
        "ArrowRight" => ArrowRight,
        "F1" => F1,
        "F2" => F2,
        "F3" => F3,
        "F4" => F4,
        "F5" => F5,
        "F12" => F12,
        _ => return None,
    };
    Some(code)
}

/// Which physical key drives each control and shortcut.
///
/// Boost is either shift key and track skipping needs control held; those
/// modifiers are fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(with = "keycode_serde")]
    pub forward: KeyCode,
    #[serde(with = "keycode_serde")]
    pub back: KeyCode,
    #[serde(with = "keycode_serde")]
    pub left: KeyCode,
    #[serde(with = "keycode_serde")]
    pub right: KeyCode,
    /// Interact and request planet entry.
    #[serde(with = "keycode_serde")]
    pub interact: KeyCode,
    /// Leave the planet interior / close the panel.
    #[serde(with = "keycode_serde")]
    pub exit: KeyCode,
    #[serde(with = "keycode_serde")]
    pub photo_mode: KeyCode,
    /// Capture, only in photo mode.
    #[serde(with = "keycode_serde")]
    pub capture: KeyCode,
    /// Gallery, only in photo mode.
    #[serde(with = "keycode_serde")]
    pub gallery: KeyCode,
    #[serde(with = "keycode_serde")]
    pub customizer: KeyCode,
    /// Pause/resume playback.
    #[serde(with = "keycode_serde")]
    pub music: KeyCode,
    /// With control held.
    #[serde(with = "keycode_serde")]
    pub next_track: KeyCode,
    /// With control held.
    #[serde(with = "keycode_serde")]
    pub previous_track: KeyCode,
    #[serde(with = "keycode_serde")]
    pub achievements: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            back: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            interact: KeyCode::KeyE,
            exit: KeyCode::Escape,
            photo_mode: KeyCode::KeyP,
            capture: KeyCode::Space,
            gallery: KeyCode::Tab,
            customizer: KeyCode::KeyC,
            music: KeyCode::KeyM,
            next_track: KeyCode::ArrowRight,
            previous_track: KeyCode::ArrowLeft,
            achievements: KeyCode::KeyA,
        }
    }
}

impl KeyBindings {
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    /// Write the bindings to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Load bindings from `path`, falling back to defaults with a warning
    /// when the file is missing or malformed.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_ron(&contents).unwrap_or_else(|e| {
                warn!("Malformed key binding file {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(e) => {
                warn!("Could not read key binding file {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// `<config dir>/starfolio/input.ron`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("starfolio").join("input.ron"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_layout() {
        let b = KeyBindings::default();
        assert_eq!(b.forward, KeyCode::KeyW);
        assert_eq!(b.interact, KeyCode::KeyE);
        assert_eq!(b.exit, KeyCode::Escape);
        assert_eq!(b.capture, KeyCode::Space);
    }

    #[test]
    fn test_ron_uses_key_names() {
        let ron = KeyBindings::default().to_ron().unwrap();
        assert!(ron.contains("\"KeyW\""));
        assert!(ron.contains("\"Escape\""));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let b = KeyBindings::from_ron("(forward: \"ArrowUp\", photo_mode: \"F12\")").unwrap();
        assert_eq!(b.forward, KeyCode::ArrowUp);
        assert_eq!(b.photo_mode, KeyCode::F12);
        assert_eq!(b.back, KeyCode::KeyS);
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        assert!(KeyBindings::from_ron("(forward: \"Hyper\")").is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("input.ron");
        let b = KeyBindings {
            interact: KeyCode::KeyF,
            ..Default::default()
        };
        b.save(&path).unwrap();
        assert_eq!(KeyBindings::load(&path), b);
    }

    #[test]
    fn test_load_falls_back_on_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.ron");
        std::fs::write(&path, "{{{ nope").unwrap();
        assert_eq!(KeyBindings::load(&path), KeyBindings::default());
        assert_eq!(
            KeyBindings::load(&dir.path().join("missing.ron")),
            KeyBindings::default()
        );
    }
}
