//! End-to-end scenarios for the galaxy session: entry and exit, the planet
//! panel, easter eggs, photo mode and persistence.

use super::*;
use chrono::{TimeZone, Utc};
use starfolio_player::CameraMode;
use starfolio_stores::FileStateStore;
use winit::keyboard::KeyCode;

const DT: f32 = 1.0 / 60.0;

fn session(mode: VehicleMode) -> GalaxySession {
    GalaxySession::new(&Config::default(), mode, Services::in_memory(), KeyBindings::default())
}

fn tap(session: &mut GalaxySession, code: KeyCode) {
    session.handle_key(RawKeyEvent::press(code));
    session.handle_key(RawKeyEvent::release(code));
}

fn run(session: &mut GalaxySession, secs: f32) -> Vec<FrameReport> {
    let frames = (secs / DT).ceil() as usize;
    (0..frames).map(|_| session.frame(DT)).collect()
}

fn run_until(
    session: &mut GalaxySession,
    max_secs: f32,
    stop: impl Fn(&GalaxySession) -> bool,
) -> Vec<FrameReport> {
    let mut reports = Vec::new();
    let mut t = 0.0;
    while t < max_secs && !stop(&*session) {
        reports.push(session.frame(DT));
        t += DT;
    }
    reports
}

/// Park the vehicle next to origin station and let proximity notice it.
fn park_near_origin(session: &mut GalaxySession) {
    session.vehicle.respawn(Vec3::new(7.0, 0.0, 0.0));
    run(session, 0.3);
    assert_eq!(session.near_planet().map(PlanetId::as_str), Some("origin-station"));
}

fn current_track(session: &GalaxySession) -> Option<&'static str> {
    session.services().music.current_track().map(|t| t.id)
}

#[test]
fn test_startup_plays_ambient_and_tracks_vehicle() {
    let mut s = session(VehicleMode::Rocket);
    assert_eq!(current_track(&s), Some(AMBIENT_TRACK));
    assert_eq!(
        s.services().achievements.progress("vehicle_switcher").map(|p| p.0),
        Some(1)
    );
    assert_eq!(s.services().customization.current_vehicle(), VehicleKind::Rocket);
    assert_eq!(s.planets().len(), 5);

    run(&mut s, 2.5);
    assert!(s.services().achievements.is_unlocked("first_launch"));
    assert_eq!(s.rig().mode(), CameraMode::Intro);
}

#[test]
fn test_enter_land_exit_and_close_panel() {
    let mut s = session(VehicleMode::Car);
    park_near_origin(&mut s);

    tap(&mut s, KeyCode::KeyE);
    assert_eq!(s.stage(), EntryStage::Hyperjump);
    assert_eq!(s.open_panel().map(PlanetId::as_str), Some("origin-station"));

    let reports = run_until(&mut s, 60.0, |s| s.in_interior());
    assert!(s.in_interior());
    assert!(reports.iter().all(|r| r.camera.is_none() && r.vehicle.is_none()));
    let arrivals = reports
        .iter()
        .flat_map(|r| &r.entry)
        .filter(|n| matches!(n, EntryNotice::Arrived(_)))
        .count();
    assert_eq!(arrivals, 1);
    assert_eq!(current_track(&s), Some("origin_station"));
    assert!(s.services().achievements.is_unlocked("planet_explorer"));

    run(&mut s, 2.0);
    assert_eq!(s.services().tracker.visited_planets(), 1);
    let (inside_secs, _) = s.services().achievements.progress("deep_diver").unwrap();
    assert!(inside_secs >= 2);

    tap(&mut s, KeyCode::Escape);
    assert_eq!(s.stage(), EntryStage::None);
    assert_eq!(current_track(&s), Some(AMBIENT_TRACK));
    assert!(s.open_panel().is_some());

    let reports = run(&mut s, 0.5);
    assert!(reports.iter().all(|r| r.camera.is_some()));
    assert_eq!(s.rig().mode(), CameraMode::DramaticZoom);
    assert!(s.vehicle().is_locked());
    assert!(!reports.last().is_some_and(|r| r.vehicle.is_some_and(|v| v.driven)));

    tap(&mut s, KeyCode::Escape);
    assert!(s.open_panel().is_none());
    run(&mut s, 0.1);
    assert_eq!(s.rig().mode(), CameraMode::Follow);
    assert!(!s.vehicle().is_locked());
}

#[test]
fn test_double_trigger_runs_once() {
    let mut s = session(VehicleMode::Car);
    park_near_origin(&mut s);

    tap(&mut s, KeyCode::KeyE);
    run(&mut s, 0.03);
    tap(&mut s, KeyCode::KeyE);
    assert_eq!(s.stage(), EntryStage::Hyperjump);

    let reports = run_until(&mut s, 60.0, |s| s.in_interior());
    let loading = reports
        .iter()
        .flat_map(|r| &r.entry)
        .filter(|n| **n == EntryNotice::StageChanged(EntryStage::Loading))
        .count();
    assert_eq!(loading, 1);
}

#[test]
fn test_interact_inside_exits_without_reentering() {
    let mut s = session(VehicleMode::Walk);
    park_near_origin(&mut s);
    tap(&mut s, KeyCode::KeyE);
    run_until(&mut s, 60.0, |s| s.in_interior());

    tap(&mut s, KeyCode::KeyE);
    assert_eq!(s.stage(), EntryStage::None);
    run(&mut s, 3.0);
    assert_eq!(s.stage(), EntryStage::None);
}

#[test]
fn test_escape_aborts_hyperjump() {
    let mut s = session(VehicleMode::Car);
    park_near_origin(&mut s);
    tap(&mut s, KeyCode::KeyE);
    run(&mut s, 1.0);
    tap(&mut s, KeyCode::Escape);
    assert_eq!(s.stage(), EntryStage::None);

    let reports = run(&mut s, 5.0);
    assert!(reports.iter().all(|r| r.entry.is_empty()));
    assert_eq!(s.services().tracker.visited_planets(), 0);
}

#[test]
fn test_no_entry_when_nothing_near() {
    let mut s = session(VehicleMode::Car);
    run(&mut s, 0.3);
    assert!(s.near_planet().is_none());
    tap(&mut s, KeyCode::KeyE);
    assert_eq!(s.stage(), EntryStage::None);
}

#[test]
fn test_konami_reveals_planet_x() {
    let mut s = session(VehicleMode::Car);
    for code in [
        KeyCode::ArrowUp,
        KeyCode::ArrowUp,
        KeyCode::ArrowDown,
        KeyCode::ArrowDown,
        KeyCode::ArrowLeft,
        KeyCode::ArrowRight,
        KeyCode::ArrowLeft,
        KeyCode::ArrowRight,
        KeyCode::KeyB,
        KeyCode::KeyA,
    ] {
        tap(&mut s, code);
    }
    let eggs = &s.services().eggs;
    assert!(eggs.is_found("konami_code"));
    assert!(eggs.secret_planet_unlocked());
    assert_eq!(s.planets().len(), 6);
    assert!(s.planets().get("secret-planet-x").is_some());

    let achievements = &s.services().achievements;
    assert!(achievements.is_unlocked("konami_master"));
    assert!(achievements.is_unlocked("secret_planet"));
    assert_eq!(achievements.progress("easter_egg_hunter").map(|p| p.0), Some(2));
}

#[test]
fn test_photo_mode_pauses_and_captures() {
    let mut s = session(VehicleMode::Car);
    run(&mut s, 4.5);

    tap(&mut s, KeyCode::KeyP);
    assert!(s.services().photo.is_active());
    let before = s.vehicle().transform().position;
    s.handle_key(RawKeyEvent::press(KeyCode::KeyW));
    let reports = run(&mut s, 0.5);
    assert!(reports.iter().all(|r| r.vehicle.is_some_and(|v| !v.driven)));
    assert_eq!(s.vehicle().transform().position, before);

    // C is a photo-mode no-op
    tap(&mut s, KeyCode::KeyC);
    assert!(!s.services().customization.is_customizer_open());

    tap(&mut s, KeyCode::Space);
    let report = s.frame(DT);
    assert!(report.capture_requested);
    assert!(!s.frame(DT).capture_requested);
    s.complete_capture(vec![1, 2, 3]);
    assert_eq!(s.services().photo.photos().len(), 1);
    assert!(s.services().achievements.is_unlocked("photographer"));

    assert_eq!(s.set_photo_fov(200.0), 120.0);
    run(&mut s, 5.0);
    assert!((s.rig().fov() - 120.0).abs() < 0.5);

    tap(&mut s, KeyCode::KeyP);
    assert!(!s.services().photo.is_active());
    run(&mut s, 5.0);
    assert!(s.rig().fov() < 80.0);
    s.handle_key(RawKeyEvent::release(KeyCode::KeyW));
}

#[test]
fn test_customizer_closed_while_panel_open() {
    let mut s = session(VehicleMode::Car);
    tap(&mut s, KeyCode::KeyC);
    assert!(s.services().customization.is_customizer_open());
    tap(&mut s, KeyCode::KeyC);
    assert!(!s.services().customization.is_customizer_open());

    park_near_origin(&mut s);
    tap(&mut s, KeyCode::KeyE);
    tap(&mut s, KeyCode::Escape);
    assert!(s.open_panel().is_some());
    tap(&mut s, KeyCode::KeyC);
    assert!(!s.services().customization.is_customizer_open());
}

#[test]
fn test_preset_unlocks_customizer() {
    let mut s = session(VehicleMode::Rocket);
    assert!(s.apply_preset("neon"));
    assert!(s.services().achievements.is_unlocked("customizer"));
    assert!(!s.apply_preset("plaid"));
}

#[test]
fn test_rocket_reports_screen_position_every_frame() {
    let mut s = session(VehicleMode::Rocket);
    let hud = s.bus_mut().subscribe(&[EventKind::RocketScreenPos]);
    let reports = run(&mut s, 1.0);
    assert!(reports.iter().all(|r| r.rocket_screen_pos.is_some()));
    assert_eq!(hud.pending(), reports.len());

    // glow stays on the throttled cadence
    let with_glow = reports.iter().filter(|r| r.glow.is_some()).count();
    assert!(with_glow > 0);
    assert!(with_glow < reports.len());
}

#[test]
fn test_car_never_reports_screen_position() {
    let mut s = session(VehicleMode::Car);
    let reports = run(&mut s, 1.0);
    assert!(reports.iter().all(|r| r.rocket_screen_pos.is_none()));
    assert!(reports.iter().any(|r| r.glow.is_some()));
}

#[test]
fn test_clock_check_uses_local_midnight() {
    let mut s = session(VehicleMode::Car);
    let offset = FixedOffset::west_opt(5 * 3600).unwrap();

    // midnight UTC is still evening at -05:00
    s.check_clock(Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap().with_timezone(&offset));
    assert!(!s.services().eggs.is_found("midnight_visitor"));

    s.check_clock(Utc.with_ymd_and_hms(2026, 1, 10, 5, 0, 0).unwrap().with_timezone(&offset));
    assert!(s.services().eggs.is_found("midnight_visitor"));
    assert!(s.services().achievements.is_unlocked("night_owl"));
}

#[test]
fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default();
    {
        let services = Services::load(Box::new(FileStateStore::new(dir.path())), 0.5);
        let mut s = GalaxySession::new(&config, VehicleMode::Car, services, KeyBindings::default());
        s.click_sun();
        s.apply_preset("sunset");
        s.services.eggs.unlock_secret_planet(&mut s.bus);
        s.frame(DT);
    }
    let services = Services::load(Box::new(FileStateStore::new(dir.path())), 0.5);
    let s = GalaxySession::new(&config, VehicleMode::Car, services, KeyBindings::default());
    assert_eq!(s.planets().len(), 6);
    assert!(s.services().achievements.is_unlocked("customizer"));
    assert_eq!(
        s.services().customization.get(VehicleKind::Car).preset,
        "sunset"
    );
}
