//! One visit to the galaxy: owns the bus, the services and every simulated
//! system, and fans each frame out to them in a fixed order.
//!
//! Frame order while the scene is visible:
//! planets -> vehicle -> proximity -> camera rig -> rocket HUD position,
//! with glow refreshed on secondary frames only.
//! Bus notifications are dispatched after input and at the end of each frame.

use chrono::{DateTime, FixedOffset};
use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use starfolio_config::{Config, VehicleMode};
use starfolio_events::{EventBus, EventKind, GalaxyEvent, PlanetId, Subscription};
use starfolio_input::{InputBridge, InputCommand, KeyBindings, RawKeyEvent, key_name};
use starfolio_math::{Ticker, clamp_dt};
use starfolio_planet::{PlanetSystem, ProximityDetector};
use starfolio_player::{CameraPose, CameraRig, FollowTarget, VehicleController, VehicleStep, glow_level};
use starfolio_stores::{Services, VehicleKind, local_now, time_of_day};
use tracing::{debug, info};

use crate::entry::{EntryNotice, EntrySequencer, EntryStage, EntryTimings};

/// Track played while flying between planets.
pub const AMBIENT_TRACK: &str = "space_ambient_1";

/// Wall-clock checks (midnight egg, night owl) run this often.
const CLOCK_CHECK_SECS: f32 = 60.0;

/// What one frame produced, for the render layer.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    /// Clamped frame delta actually simulated.
    pub dt: f32,
    pub stage: EntryStage,
    /// `None` while a cinematic overlay hides the scene.
    pub camera: Option<CameraPose>,
    pub vehicle: Option<VehicleStep>,
    /// Vehicle glow, refreshed on secondary frames only.
    pub glow: Option<f32>,
    pub rocket_screen_pos: Option<Vec2>,
    pub entry: Vec<EntryNotice>,
    /// The photo shortcut fired; the render layer should grab a frame and
    /// hand it to [`GalaxySession::complete_capture`].
    pub capture_requested: bool,
}

fn vehicle_kind(mode: VehicleMode) -> VehicleKind {
    match mode {
        VehicleMode::Car => VehicleKind::Car,
        VehicleMode::Rocket => VehicleKind::Rocket,
        VehicleMode::Walk => VehicleKind::Astronaut,
    }
}

pub struct GalaxySession {
    bus: EventBus,
    events: Subscription,
    services: Services,
    input: InputBridge,
    planets: PlanetSystem,
    proximity: ProximityDetector,
    vehicle: VehicleController,
    rig: CameraRig,
    entry: EntrySequencer,
    rng: ChaCha8Rng,
    /// Planet whose info panel is open; the camera stays on it while idle.
    panel: Option<PlanetId>,
    viewport: Vec2,
    max_dt: f32,
    clock_check: Ticker,
    capture_requested: bool,
    frames: u64,
    elapsed: f32,
}

impl GalaxySession {
    pub fn new(config: &Config, mode: VehicleMode, mut services: Services, bindings: KeyBindings) -> Self {
        let mut bus = EventBus::new();
        let events = bus.subscribe(&[
            EventKind::ExitRequested,
            EventKind::TriggerPlanetEntry,
            EventKind::SecretFound,
            EventKind::CameraFovChange,
            EventKind::PhotoModeToggled,
            EventKind::PhotoTaken,
            EventKind::VehicleCustomized,
        ]);

        let mut planets = PlanetSystem::new(config.session.orbit_speed);
        if services.eggs.secret_planet_unlocked() {
            planets.unlock_secret_planet();
        }
        let vehicle = VehicleController::new(mode, Vec3::ZERO, config.session.secondary_update_ms, &mut bus);

        services.customization.set_current_vehicle(vehicle_kind(mode));
        services.tracker.track_vehicle(mode.as_str(), &mut services.achievements, &mut bus);
        services.music.play_track(AMBIENT_TRACK, &mut bus);
        let (hour, _) = time_of_day(&local_now());
        services.tracker.check_night_owl(hour, &mut services.achievements, &mut bus);

        info!(vehicle = mode.as_str(), planets = planets.len(), "entering galaxy");

        let mut session = Self {
            events,
            services,
            input: InputBridge::new(bindings),
            planets,
            proximity: ProximityDetector::new(
                config.proximity.poll_interval_ms,
                config.proximity.threshold_factor,
            ),
            vehicle,
            rig: CameraRig::new(
                config.camera.intro_duration_s,
                config.camera.default_fov,
                config.camera.max_frame_dt,
            ),
            entry: EntrySequencer::new(EntryTimings::from(&config.entry)),
            rng: ChaCha8Rng::seed_from_u64(config.session.seed),
            panel: None,
            viewport: Vec2::new(config.window.width as f32, config.window.height as f32),
            max_dt: config.camera.max_frame_dt,
            clock_check: Ticker::new(CLOCK_CHECK_SECS),
            capture_requested: false,
            frames: 0,
            elapsed: 0.0,
            bus,
        };
        session.dispatch();
        session
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// For the render layer to subscribe to HUD events.
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn planets(&self) -> &PlanetSystem {
        &self.planets
    }

    pub fn vehicle(&self) -> &VehicleController {
        &self.vehicle
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn entry(&self) -> &EntrySequencer {
        &self.entry
    }

    pub fn stage(&self) -> EntryStage {
        self.entry.stage()
    }

    pub fn near_planet(&self) -> Option<&PlanetId> {
        self.proximity.current()
    }

    pub fn open_panel(&self) -> Option<&PlanetId> {
        self.panel.as_ref()
    }

    pub fn in_interior(&self) -> bool {
        self.entry.stage() == EntryStage::Astronaut
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
    }

    /// Feed one key transition.
    pub fn handle_key(&mut self, event: RawKeyEvent) {
        if event.is_press()
            && let Some(code) = event.code()
        {
            self.services.eggs.track_key(&key_name(code), &mut self.bus);
        }

        let photo_mode = self.services.photo.is_active();
        for command in self.input.handle_key(event, photo_mode, &mut self.bus) {
            self.run_command(command);
        }
        self.dispatch();
    }

    /// Window lost focus: forget held keys.
    pub fn release_keys(&mut self) {
        self.input.release_all();
    }

    fn run_command(&mut self, command: InputCommand) {
        let bus = &mut self.bus;
        let services = &mut self.services;
        match command {
            InputCommand::TogglePhotoMode => {
                services.photo.toggle(bus);
            }
            InputCommand::CapturePhoto => self.capture_requested = true,
            InputCommand::ToggleCustomizer => {
                if self.panel.is_none() && self.entry.stage() != EntryStage::Astronaut {
                    services.customization.toggle_customizer(bus);
                }
            }
            InputCommand::ToggleMusic => services.music.toggle_playback(bus),
            InputCommand::NextTrack => services.music.next_track(bus),
            InputCommand::PreviousTrack => services.music.previous_track(bus),
        }
    }

    /// Store a frame grabbed after a capture request.
    pub fn complete_capture(&mut self, image: Vec<u8>) {
        let location = self
            .proximity
            .current()
            .or(self.panel.as_ref())
            .map(|p| self.planets.get(p.as_str()).map_or(p.as_str(), |r| r.theme.label).to_owned());
        let near = self.proximity.current().is_some();
        let boosting = self.input.controls().boost;
        self.services.photo.capture(image, location, &mut self.bus);
        self.services.eggs.track_photo(boosting, near, &mut self.bus);
        self.dispatch();
    }

    /// Photo-mode FOV slider.
    pub fn set_photo_fov(&mut self, fov: f32) -> f32 {
        let fov = self.services.photo.set_fov(fov, &mut self.bus);
        self.dispatch();
        fov
    }

    /// Apply a customization preset to the active vehicle.
    pub fn apply_preset(&mut self, name: &str) -> bool {
        let kind = vehicle_kind(self.vehicle.mode());
        let applied = self.services.customization.apply_preset(kind, name, &mut self.bus);
        self.dispatch();
        applied
    }

    /// One click on the sun.
    pub fn click_sun(&mut self) {
        self.services.eggs.track_click(&mut self.bus);
        self.dispatch();
    }

    /// Run the wall-clock checks against `now`, read in its own offset.
    pub fn check_clock(&mut self, now: DateTime<FixedOffset>) {
        let (hour, minute) = time_of_day(&now);
        self.services.eggs.check_midnight(hour, minute, &mut self.bus);
        self.services
            .tracker
            .check_night_owl(hour, &mut self.services.achievements, &mut self.bus);
    }

    pub fn respawn_vehicle(&mut self) {
        self.vehicle.respawn(Vec3::ZERO);
        self.services.tracker.reset_distance_anchor();
    }

    /// Simulate one frame of `raw_dt` seconds.
    pub fn frame(&mut self, raw_dt: f32) -> FrameReport {
        let dt = clamp_dt(raw_dt, self.max_dt);
        self.frames += 1;
        self.elapsed += dt;
        let mut report = FrameReport {
            dt,
            ..Default::default()
        };

        let services = &mut self.services;
        services.tracker.tick(dt, &mut services.achievements, &mut self.bus);
        services.achievements.tick(dt);
        services.eggs.tick(dt);
        if self.clock_check.advance(dt) > 0 {
            self.check_clock(local_now());
        }

        report.entry = self.entry.advance(dt, &mut self.rng);
        for notice in &report.entry {
            if let EntryNotice::Arrived(planet) = notice {
                self.on_arrival(planet.clone());
            }
        }

        if self.entry.canvas_visible() {
            self.simulate_scene(dt, &mut report);
        }

        let in_interior = self.in_interior();
        self.services
            .tracker
            .track_interior_time(in_interior, dt, &mut self.services.achievements, &mut self.bus);

        self.dispatch();
        self.services.persist();
        self.input.end_frame();

        report.stage = self.entry.stage();
        report.capture_requested = std::mem::take(&mut self.capture_requested);
        report
    }

    fn simulate_scene(&mut self, dt: f32, report: &mut FrameReport) {
        if !self.services.photo.is_paused() {
            self.planets.update(dt);
        }

        self.vehicle.handle_events();
        let camera_position = self.rig.pose().position;
        let step = self.vehicle.step(&self.input.controls(), camera_position, dt);

        let services = &mut self.services;
        services
            .tracker
            .track_boost(step.boosting, dt, &mut services.achievements, &mut self.bus);
        if step.driven {
            services
                .tracker
                .track_distance(step.position, &mut services.achievements, &mut self.bus);
        }
        services.eggs.track_boost_hold(step.boosting, dt, &mut self.bus);
        services.eggs.track_turn(step.yaw_delta, &mut self.bus);

        self.proximity
            .poll(dt, step.position, self.planets.as_slice(), &mut self.bus);

        self.rig.set_selected_planet(self.panel.clone(), &mut self.bus);
        let planet_position = self
            .rig
            .selected_planet()
            .and_then(|id| self.planets.get(id.as_str()))
            .map(|p| p.position());
        let target = FollowTarget {
            position: step.position,
            yaw: self.vehicle.transform().yaw,
        };
        let pose = self.rig.update(dt, Some(target), planet_position);

        if step.secondary {
            let paint = self.services.customization.get(vehicle_kind(self.vehicle.mode()));
            report.glow = Some(glow_level(
                self.elapsed,
                step.speed,
                step.boosting,
                paint.glow_intensity,
            ));
        }
        if self.vehicle.mode() == VehicleMode::Rocket
            && let Some(screen) = pose.project_to_screen(step.position, self.viewport)
        {
            self.bus.publish(GalaxyEvent::RocketScreenPos {
                x: screen.x,
                y: screen.y,
            });
            report.rocket_screen_pos = Some(screen);
        }

        report.camera = Some(pose);
        report.vehicle = Some(step);
    }

    /// Route pending bus notifications to their owners.
    fn dispatch(&mut self) {
        let stage_before = self.entry.stage();
        self.vehicle.handle_events();

        while let Some(event) = self.events.try_next() {
            match event {
                GalaxyEvent::ExitRequested => {
                    if self.entry.stage() != EntryStage::None {
                        self.exit_entry();
                    } else if self.panel.is_some() {
                        self.close_panel();
                    }
                }
                GalaxyEvent::TriggerPlanetEntry => {
                    if self.entry.stage() == EntryStage::Astronaut {
                        self.exit_entry();
                    }
                }
                GalaxyEvent::SecretFound { secret_id } => {
                    let services = &mut self.services;
                    services
                        .tracker
                        .track_secret(&secret_id, &mut services.achievements, &mut self.bus);
                    if secret_id == "secret_planet" {
                        self.planets.unlock_secret_planet();
                    }
                }
                GalaxyEvent::CameraFovChange(fov) => self.rig.set_fov_override(Some(fov)),
                GalaxyEvent::PhotoModeToggled(active) => {
                    if !active {
                        self.rig.set_fov_override(None);
                    }
                }
                GalaxyEvent::PhotoTaken => {
                    let services = &mut self.services;
                    services
                        .tracker
                        .track_photo(&mut services.achievements, &mut self.bus);
                }
                GalaxyEvent::VehicleCustomized => {
                    let services = &mut self.services;
                    services
                        .tracker
                        .track_customization(&mut services.achievements, &mut self.bus);
                }
                _ => {}
            }
        }

        // Entry requests only count from the live scene; the same E press
        // that leaves the interior must not start another run.
        if let Some(planet) = self.vehicle.take_entry_request()
            && stage_before == EntryStage::None
            && self.entry.stage() == EntryStage::None
        {
            self.begin_entry(planet);
        }
    }

    fn begin_entry(&mut self, planet: PlanetId) {
        if self.entry.begin(planet.clone()) {
            self.panel = Some(planet);
            if self.services.customization.is_customizer_open() {
                self.services.customization.toggle_customizer(&mut self.bus);
            }
        }
    }

    fn on_arrival(&mut self, planet: PlanetId) {
        let services = &mut self.services;
        services
            .tracker
            .track_planet_visit(planet.as_str(), &mut services.achievements, &mut self.bus);
        if starfolio_planet::CATALOG.iter().any(|p| p.id == planet.as_str()) {
            services
                .eggs
                .track_planet_visit(planet.as_str(), self.planets.catalog_len(), &mut self.bus);
        }
        let theme = self.entry.theme();
        services.music.play_track(theme.music_track, &mut self.bus);
    }

    /// Leave the interior, or abort a running entry. The panel stays open.
    fn exit_entry(&mut self) {
        if self.entry.exit() {
            self.services.music.play_track(AMBIENT_TRACK, &mut self.bus);
        }
    }

    fn close_panel(&mut self) {
        if let Some(planet) = self.panel.take() {
            debug!(planet = planet.as_str(), "panel closed");
            self.services.music.play_track(AMBIENT_TRACK, &mut self.bus);
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
