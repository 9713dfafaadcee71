//! Starfolio headless runner.
//!
//! Walks the start and vehicle-select screens, then flies a scripted tour of
//! the galaxy for a fixed number of 60 Hz frames, logging every stage change,
//! achievement and easter egg along the way. Persisted stores live in the
//! data directory, so progress carries over between runs.
//!
//! Run with: `cargo run -p starfolio-game -- --vehicle rocket --frames 7200`

mod autopilot;

use clap::Parser;
use starfolio_config::{CliArgs, Config, default_config_dir};
use starfolio_events::{EventKind, GalaxyEvent};
use starfolio_input::KeyBindings;
use starfolio_scene::{AppFlow, EntryNotice, GalaxySession, Screen};
use starfolio_stores::{FileStateStore, Services};
use tracing::{info, warn};

use crate::autopilot::{Autopilot, tour, vehicle_label};

const FRAME_DT: f32 = 1.0 / 60.0;

fn main() {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);
    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config unavailable ({e}), using defaults");
            Config::default()
        }
    };
    config.apply_cli_overrides(&args);

    let data_dir = config.storage.resolve_data_dir();
    starfolio_log::init_logging(
        Some(&data_dir.join("logs")),
        cfg!(debug_assertions),
        Some(&config),
    );
    info!(
        "Starfolio: {}x{} | vehicle={} | data={}",
        config.window.width,
        config.window.height,
        config.session.vehicle.as_str(),
        data_dir.display()
    );

    let mode = enter_galaxy(&config);
    let services = Services::load(Box::new(FileStateStore::new(&data_dir)), config.audio.volume);
    let bindings = KeyBindings::default_path()
        .map(|path| KeyBindings::load(&path))
        .unwrap_or_default();
    let mut session = GalaxySession::new(&config, mode, services, bindings);
    let notices = session.bus_mut().subscribe(&[
        EventKind::AchievementUnlocked,
        EventKind::EasterEggFound,
        EventKind::MusicPlay,
    ]);

    let mut pilot = Autopilot::new(tour(&session));
    info!(
        vehicle = vehicle_label(mode),
        planets = session.planets().len(),
        "autopilot engaged"
    );

    for _ in 0..args.frames {
        for key in pilot.drive(&session, FRAME_DT) {
            session.handle_key(key);
        }
        let report = session.frame(FRAME_DT);
        if report.capture_requested {
            session.complete_capture(Vec::new());
        }
        for notice in &report.entry {
            match notice {
                EntryNotice::StageChanged(stage) => info!(stage = stage.as_str(), "entry stage"),
                EntryNotice::Arrived(planet) => info!(planet = planet.as_str(), "arrived"),
            }
        }
        for event in notices.drain() {
            match event {
                GalaxyEvent::AchievementUnlocked { id, title } => {
                    info!(id = id.as_str(), "achievement unlocked: {title}");
                }
                GalaxyEvent::EasterEggFound(egg) => {
                    info!(id = egg.id.as_str(), "easter egg found: {}", egg.name);
                }
                GalaxyEvent::MusicPlay { track } => info!(track = track.as_str(), "now playing"),
                _ => {}
            }
        }
        if pilot.is_done() {
            info!(frames = session.frames(), "tour complete");
            break;
        }
    }

    if !pilot.is_done() {
        warn!(target = ?pilot.target(), "frame budget ran out mid-tour");
    }
    let achievements = &session.services().achievements;
    info!(
        unlocked = achievements.unlocked_count(),
        progress = achievements.total_progress(),
        eggs = session.services().eggs.found_count(),
        "session summary"
    );
}

/// Click through the start and vehicle-select screens.
fn enter_galaxy(config: &Config) -> starfolio_config::VehicleMode {
    let mut flow = AppFlow::new();
    flow.start();
    loop {
        match flow.advance(FRAME_DT) {
            Some(Screen::ModeSelect) => {
                flow.select_vehicle(config.session.vehicle);
            }
            Some(Screen::Galaxy(mode)) => return mode,
            Some(Screen::Start) | None => {}
        }
    }
}
