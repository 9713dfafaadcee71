//! Configuration system for the Starfolio galaxy.
//!
//! Provides runtime-configurable settings that persist to disk as RON files.
//! Supports CLI overrides via clap, hot-reload detection, and forward/backward
//! compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AudioConfig, CameraConfig, Config, DebugConfig, EntryConfig, ProximityConfig, SessionConfig,
    StorageConfig, VehicleMode, WindowConfig, default_config_dir,
};
pub use error::ConfigError;
