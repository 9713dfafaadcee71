//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level galaxy configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window / viewport settings.
    pub window: WindowConfig,
    /// Camera rig tuning.
    pub camera: CameraConfig,
    /// Proximity detector tuning.
    pub proximity: ProximityConfig,
    /// Planet entry cinematic timings.
    pub entry: EntryConfig,
    /// Session settings (vehicle, throttles, orbit speed).
    pub session: SessionConfig,
    /// Audio settings.
    pub audio: AudioConfig,
    /// Persisted-state location.
    pub storage: StorageConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Which vehicle the player drives through the galaxy.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum VehicleMode {
    /// Hover car.
    #[default]
    Car,
    /// Rocket.
    Rocket,
    /// Astronaut on foot.
    Walk,
}

impl VehicleMode {
    /// Stable lowercase name, used by trackers and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleMode::Car => "car",
            VehicleMode::Rocket => "rocket",
            VehicleMode::Walk => "walk",
        }
    }
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Viewport width in logical pixels.
    pub width: u32,
    /// Viewport height in logical pixels.
    pub height: u32,
    /// Window title.
    pub title: String,
}

/// Camera rig configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Length of the opening spiral descent in seconds.
    pub intro_duration_s: f32,
    /// Resting vertical field of view in degrees.
    pub default_fov: f32,
    /// Upper bound applied to every frame delta, in seconds.
    pub max_frame_dt: f32,
}

/// Proximity detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProximityConfig {
    /// Polling interval in milliseconds.
    pub poll_interval_ms: u32,
    /// Planet size multiplier giving the "near" radius.
    pub threshold_factor: f32,
}

/// Planet entry pipeline timings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EntryConfig {
    /// Hyperjump overlay duration.
    pub hyperjump_ms: u32,
    /// Interval between loading progress increments.
    pub loading_tick_ms: u32,
    /// Largest random progress increment per loading tick.
    pub loading_max_increment: f32,
    /// Pause after loading reaches 100 before landing starts.
    pub loading_settle_ms: u32,
    /// Landing phase: vehicle descending.
    pub descending_ms: u32,
    /// Landing phase: touchdown.
    pub landed_ms: u32,
    /// Landing phase: hatch opening.
    pub hatch_open_ms: u32,
    /// Landing phase: astronaut stepping out.
    pub astronaut_exit_ms: u32,
}

/// Galaxy session configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Vehicle used when entering the galaxy.
    pub vehicle: VehicleMode,
    /// Throttle interval for non-essential visual updates, in milliseconds.
    pub secondary_update_ms: u32,
    /// Planet orbit speed (0 keeps planets parked at their start angle).
    pub orbit_speed: f32,
    /// Seed for the loading-progress random increments.
    pub seed: u64,
}

/// Audio configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    /// Music volume (0.0 - 1.0) used when no preference is stored yet.
    pub volume: f32,
}

/// Where persisted stores live.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Override for the data directory. `None` uses the platform data dir.
    pub data_dir: Option<PathBuf>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Starfolio".to_string(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            intro_duration_s: 4.0,
            default_fov: 60.0,
            max_frame_dt: 0.033,
        }
    }
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            threshold_factor: 3.5,
        }
    }
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            hyperjump_ms: 2000,
            loading_tick_ms: 200,
            loading_max_increment: 15.0,
            loading_settle_ms: 500,
            descending_ms: 1500,
            landed_ms: 500,
            hatch_open_ms: 800,
            astronaut_exit_ms: 1200,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            vehicle: VehicleMode::Car,
            secondary_update_ms: 33,
            orbit_speed: 0.0,
            seed: 0x5EED,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self { volume: 0.5 }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl StorageConfig {
    /// Resolve the directory persisted stores are written to.
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("starfolio")
        })
    }
}

/// Default config directory (`<platform config dir>/starfolio`).
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("starfolio")
}

const CONFIG_FILE: &str = "config.ron";

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: Config = ron::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Load `config.ron` from `config_dir`, writing the defaults there first
    /// if the file does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        if path.exists() {
            let config = read_config(&path)?;
            log::info!("Loaded config from {}", path.display());
            return Ok(config);
        }
        let config = Config::default();
        config.save(config_dir)?;
        log::info!("Wrote default config to {}", path.display());
        Ok(config)
    }

    /// Write `config.ron` into `config_dir`, creating the directory.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        let write_err = |source| ConfigError::Write {
            path: path.clone(),
            source,
        };
        std::fs::create_dir_all(config_dir).map_err(write_err)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let text = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;
        std::fs::write(&path, text).map_err(write_err)
    }

    /// Re-read the file; `Some` only when it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = read_config(&config_dir.join(CONFIG_FILE))?;
        if &fresh == self {
            return Ok(None);
        }
        log::info!("Config changed on disk");
        Ok(Some(fresh))
    }

    /// Reject values the frame loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });
        if self.camera.max_frame_dt <= 0.0 {
            return invalid("camera.max_frame_dt", "must be positive");
        }
        if self.camera.intro_duration_s <= 0.0 {
            return invalid("camera.intro_duration_s", "must be positive");
        }
        if self.proximity.poll_interval_ms == 0 {
            return invalid("proximity.poll_interval_ms", "must be at least 1");
        }
        if self.entry.loading_tick_ms == 0 {
            return invalid("entry.loading_tick_ms", "must be at least 1");
        }
        if self.entry.loading_max_increment <= 0.0 {
            return invalid("entry.loading_max_increment", "loading would never finish");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("intro_duration_s: 4.0"));
        assert!(ron_str.contains("poll_interval_ms: 100"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.session.vehicle = VehicleMode::Rocket;
        config.storage.data_dir = Some(PathBuf::from("/tmp/starfolio"));
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (), camera: (intro_duration_s: 3.0))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.entry, EntryConfig::default());
        assert!((config.camera.intro_duration_s - 3.0).abs() < 1e-6);
        assert!((config.camera.default_fov - 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_vehicle_mode_parses_lowercase() {
        let config: Config = ron::from_str("(session: (vehicle: walk))").unwrap();
        assert_eq!(config.session.vehicle, VehicleMode::Walk);
        assert_eq!(config.session.vehicle.as_str(), "walk");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.entry.hyperjump_ms = 1500;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.proximity.threshold_factor = 5.0;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_some());
        assert!((result.unwrap().proximity.threshold_factor - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.ron"),
            "(proximity: (poll_interval_ms: 0))",
        )
        .unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "proximity.poll_interval_ms",
                ..
            }
        ));
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(err.to_string().contains("config.ron"));
    }

    #[test]
    fn test_data_dir_override_wins() {
        let storage = StorageConfig {
            data_dir: Some(PathBuf::from("/srv/saves")),
        };
        assert_eq!(storage.resolve_data_dir(), PathBuf::from("/srv/saves"));
    }
}
