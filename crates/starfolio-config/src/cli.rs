//! Command-line argument parsing for the Starfolio runner.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, VehicleMode};

/// Starfolio command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "starfolio", about = "Starfolio galaxy session runner")]
pub struct CliArgs {
    /// Vehicle to drive through the galaxy.
    #[arg(long, value_enum)]
    pub vehicle: Option<VehicleMode>,

    /// Number of 60 Hz frames to simulate.
    #[arg(long, default_value_t = 3600)]
    pub frames: u32,

    /// Viewport width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Viewport height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Seed for loading-progress randomness.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Directory persisted stores are written to.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(vehicle) = args.vehicle {
            self.session.vehicle = vehicle;
        }
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(seed) = args.seed {
            self.session.seed = seed;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(ref dir) = args.data_dir {
            self.storage.data_dir = Some(dir.clone());
        }
    }
}
