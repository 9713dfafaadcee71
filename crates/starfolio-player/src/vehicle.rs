//! Frame-stepped vehicle controllers for the car, rocket and walker.
//!
//! Each controller reads the shared [`ControlState`], integrates a velocity
//! with per-vehicle acceleration, damping and speed cap, and writes its
//! [`Transform`]. Planet proximity and entry arrive over the event bus.

use glam::{Quat, Vec3};
use starfolio_config::VehicleMode;
use starfolio_events::{EventBus, EventKind, GalaxyEvent, PlanetId, Subscription};
use starfolio_input::ControlState;
use starfolio_math::{Throttle, Transform, frame_decay, smoothing_factor};
use tracing::{debug, info};

/// Height the vehicles hover at.
pub const BASE_HEIGHT: f32 = -1.2;

/// How input becomes motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Steering {
    /// Left/right turn the heading; forward/back push along it.
    Tank {
        /// Radians per second.
        turn_speed: f32,
        /// Fraction of the acceleration used when reversing.
        reverse_factor: f32,
    },
    /// Input is relative to the camera and the heading eases toward the velocity.
    CameraRelative {
        /// Heading smoothing rate per second.
        turn_rate: f32,
    },
}

/// Acceleration, damping and speed cap, each with a boosted variant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VehicleTuning {
    pub accel: f32,
    pub boost_accel: f32,
    /// Per-60 Hz-frame velocity retention.
    pub damping: f32,
    pub boost_damping: f32,
    pub max_speed: f32,
    pub boost_max_speed: f32,
    pub steering: Steering,
    pub bob_amplitude: f32,
    pub bob_frequency: f32,
    /// Extra height per unit of speed.
    pub speed_lift: f32,
}

impl VehicleTuning {
    pub const CAR: Self = Self {
        accel: 9.0,
        boost_accel: 18.0,
        damping: 0.92,
        boost_damping: 0.92,
        max_speed: 8.0,
        boost_max_speed: 15.0,
        steering: Steering::Tank {
            turn_speed: 2.5,
            reverse_factor: 0.6,
        },
        bob_amplitude: 0.08,
        bob_frequency: 2.0,
        speed_lift: 0.01,
    };

    pub const ROCKET: Self = Self {
        accel: 11.0,
        boost_accel: 22.0,
        damping: 0.96,
        boost_damping: 0.985,
        max_speed: 3.0,
        boost_max_speed: 5.0,
        steering: Steering::CameraRelative { turn_rate: 7.0 },
        bob_amplitude: 0.05,
        bob_frequency: 2.6,
        speed_lift: 0.0,
    };

    pub const WALKER: Self = Self {
        accel: 3.0,
        boost_accel: 6.0,
        damping: 0.88,
        boost_damping: 0.88,
        max_speed: 4.0,
        boost_max_speed: 8.0,
        steering: Steering::Tank {
            turn_speed: 2.0,
            reverse_factor: 0.5,
        },
        bob_amplitude: 0.03,
        bob_frequency: 2.0,
        speed_lift: 0.005,
    };

    pub fn for_mode(mode: VehicleMode) -> Self {
        match mode {
            VehicleMode::Car => Self::CAR,
            VehicleMode::Rocket => Self::ROCKET,
            VehicleMode::Walk => Self::WALKER,
        }
    }

    fn pick(&self, boost: bool) -> (f32, f32, f32) {
        if boost {
            (self.boost_accel, self.boost_damping, self.boost_max_speed)
        } else {
            (self.accel, self.damping, self.max_speed)
        }
    }
}

/// Result of one [`VehicleController::step`], for trackers and the HUD.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VehicleStep {
    pub position: Vec3,
    /// Heading change this frame in radians.
    pub yaw_delta: f32,
    pub speed: f32,
    pub boosting: bool,
    /// False when controls were ignored (camera lock or photo pause).
    pub driven: bool,
    /// True on frames where throttled secondary updates should run.
    pub secondary: bool,
}

/// Glow strength for the vehicle's emissive parts.
pub fn glow_level(elapsed: f32, speed: f32, boosting: bool, glow_intensity: f32) -> f32 {
    let boost = if boosting { 1.8 } else { 1.0 };
    (0.5 + (elapsed * 3.0).sin() * 0.2 + speed * 0.05) * boost * glow_intensity
}

/// The player's vehicle.
pub struct VehicleController {
    mode: VehicleMode,
    tuning: VehicleTuning,
    transform: Transform,
    velocity: Vec3,
    elapsed: f32,
    near_planet: Option<PlanetId>,
    entry_request: Option<PlanetId>,
    locked: bool,
    paused: bool,
    secondary: Throttle,
    events: Subscription,
}

impl VehicleController {
    /// Create a controller at rest and subscribe it to the bus.
    ///
    /// # Arguments
    /// * `mode` - Selects the tuning (car, rocket or walker).
    /// * `start` - Spawn point; the height is replaced by `BASE_HEIGHT`.
    /// * `secondary_update_ms` - Throttle interval for glow updates.
    /// * `bus` - Bus the controller listens on for proximity, entry, lock and pause.
    pub fn new(mode: VehicleMode, start: Vec3, secondary_update_ms: u32, bus: &mut EventBus) -> Self {
        let events = bus.subscribe(&[
            EventKind::UpdateNearPlanet,
            EventKind::TriggerPlanetEntry,
            EventKind::CameraLock,
            EventKind::PhotoModeToggled,
        ]);
        Self {
            mode,
            tuning: VehicleTuning::for_mode(mode),
            transform: Transform::from_position(Vec3::new(start.x, BASE_HEIGHT, start.z)),
            velocity: Vec3::ZERO,
            elapsed: 0.0,
            near_planet: None,
            entry_request: None,
            locked: false,
            paused: false,
            secondary: Throttle::from_millis(secondary_update_ms),
            events,
        }
    }

    /// Which vehicle this is.
    pub fn mode(&self) -> VehicleMode {
        self.mode
    }

    /// Acceleration, damping and speed limits in use.
    pub fn tuning(&self) -> &VehicleTuning {
        &self.tuning
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Current speed in world units per second.
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Last planet reported near by proximity.
    pub fn near_planet(&self) -> Option<&PlanetId> {
        self.near_planet.as_ref()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Apply pending bus notifications.
    pub fn handle_events(&mut self) {
        while let Some(event) = self.events.try_next() {
            match event {
                GalaxyEvent::UpdateNearPlanet(planet) => self.near_planet = planet,
                GalaxyEvent::TriggerPlanetEntry => {
                    if let Some(planet) = &self.near_planet {
                        info!(planet = planet.as_str(), vehicle = self.mode.as_str(), "entry requested");
                        self.entry_request = Some(planet.clone());
                    }
                }
                GalaxyEvent::CameraLock(locked) => self.locked = locked,
                GalaxyEvent::PhotoModeToggled(active) => self.paused = active,
                _ => {}
            }
        }
    }

    /// The planet the player asked to enter since the last call, if any.
    pub fn take_entry_request(&mut self) -> Option<PlanetId> {
        self.entry_request.take()
    }

    /// Integrate one frame. `camera_position` steers camera-relative vehicles.
    pub fn step(&mut self, controls: &ControlState, camera_position: Vec3, dt: f32) -> VehicleStep {
        self.elapsed += dt;
        let secondary = self.secondary.ready(dt);
        let driven = !self.locked && !self.paused;
        if !driven {
            return VehicleStep {
                position: self.transform.position,
                yaw_delta: 0.0,
                speed: self.speed(),
                boosting: false,
                driven,
                secondary,
            };
        }

        let yaw_before = self.transform.yaw;
        match self.tuning.steering {
            Steering::Tank {
                turn_speed,
                reverse_factor,
            } => self.step_tank(controls, turn_speed, reverse_factor, dt),
            Steering::CameraRelative { turn_rate } => {
                self.step_camera_relative(controls, camera_position, turn_rate, dt)
            }
        }

        let speed = self.speed();
        self.transform.position.y = BASE_HEIGHT
            + (self.elapsed * self.tuning.bob_frequency).sin() * self.tuning.bob_amplitude
            + speed * self.tuning.speed_lift;

        VehicleStep {
            position: self.transform.position,
            yaw_delta: self.transform.yaw - yaw_before,
            speed,
            boosting: controls.boost,
            driven,
            secondary,
        }
    }

    fn step_tank(&mut self, controls: &ControlState, turn_speed: f32, reverse_factor: f32, dt: f32) {
        let (accel, damping, max_speed) = self.tuning.pick(controls.boost);
        if controls.forward {
            self.velocity.z -= accel * dt;
        }
        if controls.back {
            self.velocity.z += accel * dt * reverse_factor;
        }
        if controls.left {
            self.transform.yaw += turn_speed * dt;
        }
        if controls.right {
            self.transform.yaw -= turn_speed * dt;
        }

        self.velocity *= frame_decay(damping, dt);
        self.velocity = self.velocity.clamp_length_max(max_speed);

        let world_velocity = self.transform.rotation() * self.velocity;
        self.transform.position += world_velocity * (dt * 60.0);
    }

    fn step_camera_relative(
        &mut self,
        controls: &ControlState,
        camera_position: Vec3,
        turn_rate: f32,
        dt: f32,
    ) {
        let (accel, damping, max_speed) = self.tuning.pick(controls.boost);
        let axis = |pos: bool, neg: bool| f32::from(u8::from(pos)) - f32::from(u8::from(neg));
        let mut input = Vec3::new(
            axis(controls.right, controls.left),
            0.0,
            axis(controls.back, controls.forward),
        );
        if input.length_squared() > 0.0 {
            let to_camera = camera_position - self.transform.position;
            let camera_yaw = to_camera.x.atan2(to_camera.z);
            input = Quat::from_rotation_y(camera_yaw) * input.normalize();
        }

        self.velocity += input * accel * dt;
        self.velocity *= frame_decay(damping, dt);
        self.velocity = self.velocity.clamp_length_max(max_speed);
        self.transform.position += self.velocity * (dt * 60.0);

        if self.velocity.length_squared() > 0.001 {
            let heading = (-self.velocity.x).atan2(-self.velocity.z);
            let diff = wrap_angle(heading - self.transform.yaw);
            self.transform.yaw += diff * smoothing_factor(turn_rate, dt);
        }
    }

    /// Put the vehicle back at `position`, at rest.
    pub fn respawn(&mut self, position: Vec3) {
        debug!(vehicle = self.mode.as_str(), "respawn");
        self.transform = Transform::from_position(Vec3::new(position.x, BASE_HEIGHT, position.z));
        self.velocity = Vec3::ZERO;
    }
}

/// Wrap into `(-PI, PI]`.
fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}
