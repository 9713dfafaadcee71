//! The cinematic camera rig: intro spiral, vehicle follow, dramatic zoom
//! toward a selected planet, and a slow orbit while inside it.
//!
//! Transitions:
//!
//! | from            | signal                  | to             |
//! |-----------------|-------------------------|----------------|
//! | `Intro`         | intro timer done        | `Follow`       |
//! | `Intro`         | planet selected         | `DramaticZoom` |
//! | `Follow`        | planet selected         | `DramaticZoom` |
//! | `DramaticZoom`  | zoom timer done         | `Inside`       |
//! | `DramaticZoom`  | other planet selected   | `DramaticZoom` |
//! | `DramaticZoom`  | selection cleared       | `Follow`       |
//! | `Inside`        | other planet selected   | `DramaticZoom` |
//! | `Inside`        | selection cleared       | `Follow`       |
//!
//! Every other combination keeps the current mode. `Intro` is never re-entered.

use std::f32::consts::PI;

use glam::{Quat, Vec3};
use starfolio_events::{EventBus, GalaxyEvent, PlanetId};
use starfolio_math::{EasingFunction, clamp_dt, damp, damp_f32, frame_decay};
use tracing::{debug, info};

use crate::projection::CameraPose;

/// Where the camera starts before the intro spiral.
pub const START_POSITION: Vec3 = Vec3::new(0.0, 5.0, 20.0);

const FOLLOW_BASE_OFFSET: Vec3 = Vec3::new(0.0, 2.5, 8.5);
const FOLLOW_LAG: f32 = -15.0;
const FOLLOW_SIDE: f32 = 0.8;
const FOLLOW_MAX_FOV_BOOST: f32 = 10.0;
const ZOOM_RATE: f32 = 0.8;
const ZOOM_ARC_HEIGHT: f32 = 5.0;
const ZOOM_END_OFFSET: Vec3 = Vec3::new(0.0, 1.5, 3.5);
const ZOOM_FOV: f32 = 45.0;
const INSIDE_FOV: f32 = 50.0;
const INSIDE_RADIUS: f32 = 3.8;
const SHAKE_PEAK: f32 = 0.02;
const SHAKE_FLOOR: f32 = 1e-4;

/// The rig's cinematic mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CameraMode {
    Intro,
    Follow,
    DramaticZoom,
    Inside,
}

impl CameraMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CameraMode::Intro => "intro",
            CameraMode::Follow => "follow",
            CameraMode::DramaticZoom => "dramatic-zoom",
            CameraMode::Inside => "inside",
        }
    }
}

/// The vehicle the camera tracks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FollowTarget {
    pub position: Vec3,
    pub yaw: f32,
}

#[derive(Clone, Copy, Debug, Default)]
struct Shake {
    intensity: f32,
    phase: f32,
    offset: Vec3,
}

impl Shake {
    fn update(&mut self, dt: f32) {
        if self.intensity > SHAKE_FLOOR {
            self.phase += dt * 10.0;
            self.offset = Vec3::new(
                self.phase.sin() * self.intensity,
                (self.phase * 1.3).cos() * self.intensity,
                (self.phase * 0.8).sin() * self.intensity * 0.5,
            );
            self.intensity *= frame_decay(0.95, dt);
        } else {
            self.intensity = 0.0;
            self.offset = Vec3::ZERO;
        }
    }
}

/// Owns the render camera's position, look-at target and field of view.
#[derive(Debug)]
pub struct CameraRig {
    mode: CameraMode,
    position: Vec3,
    look_at: Vec3,
    fov: f32,
    target_fov: f32,
    fov_override: Option<f32>,
    default_fov: f32,
    intro_duration: f32,
    max_dt: f32,
    elapsed: f32,
    intro_t: f32,
    zoom_t: f32,
    zoom_start_position: Vec3,
    zoom_start_look: Vec3,
    selected: Option<PlanetId>,
    locked: bool,
    last_target: Option<Vec3>,
    previous_target: Option<Vec3>,
    smoothed_velocity: Vec3,
    shake: Shake,
}

impl CameraRig {
    /// Create a rig parked at the start of the intro spiral.
    ///
    /// # Arguments
    /// * `intro_duration` - Seconds the intro descent takes.
    /// * `default_fov` - Vertical field of view in degrees when nothing overrides it.
    /// * `max_dt` - Upper bound applied to every frame delta.
    pub fn new(intro_duration: f32, default_fov: f32, max_dt: f32) -> Self {
        Self {
            mode: CameraMode::Intro,
            position: START_POSITION,
            look_at: Vec3::ZERO,
            fov: default_fov,
            target_fov: default_fov,
            fov_override: None,
            default_fov,
            intro_duration: intro_duration.max(0.01),
            max_dt,
            elapsed: 0.0,
            intro_t: 0.0,
            zoom_t: 0.0,
            zoom_start_position: START_POSITION,
            zoom_start_look: Vec3::ZERO,
            selected: None,
            locked: false,
            last_target: None,
            previous_target: None,
            smoothed_velocity: Vec3::ZERO,
            shake: Shake::default(),
        }
    }

    /// The active cinematic mode.
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// The planet the rig is zooming to or orbiting.
    pub fn selected_planet(&self) -> Option<&PlanetId> {
        self.selected.as_ref()
    }

    /// Current field of view in degrees.
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Field of view the rig is easing toward.
    pub fn target_fov(&self) -> f32 {
        self.target_fov
    }

    /// Whether the rig has published `CameraLock(true)`.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            look_at: self.look_at,
            fov: self.fov,
        }
    }

    /// Pin the field of view (photo mode) or release it with `None`.
    pub fn set_fov_override(&mut self, fov: Option<f32>) {
        self.fov_override = fov;
    }

    /// Feed the externally selected planet. Only changes act; setting the
    /// same value again is a no-op.
    pub fn set_selected_planet(&mut self, planet: Option<PlanetId>, bus: &mut EventBus) {
        if planet == self.selected {
            return;
        }
        match &planet {
            Some(id) => {
                info!(planet = id.as_str(), from = self.mode.as_str(), "camera zooming to planet");
                self.zoom_start_position = self.position;
                self.zoom_start_look = self.last_target.unwrap_or(Vec3::ZERO);
                self.mode = CameraMode::DramaticZoom;
                self.zoom_t = 0.0;
                self.target_fov = INSIDE_FOV;
                if !self.locked {
                    self.locked = true;
                    bus.publish(GalaxyEvent::CameraLock(true));
                }
            }
            None => {
                // a cleared selection before the intro finishes keeps the intro
                if self.mode != CameraMode::Intro {
                    info!("camera back to follow");
                    self.mode = CameraMode::Follow;
                    self.target_fov = self.default_fov;
                    self.previous_target = None;
                }
                if self.locked {
                    self.locked = false;
                    bus.publish(GalaxyEvent::CameraLock(false));
                }
            }
        }
        self.selected = planet;
    }

    /// Advance one frame. `target` is the vehicle, `planet` the selected
    /// planet's position when it can be resolved.
    pub fn update(&mut self, raw_dt: f32, target: Option<FollowTarget>, planet: Option<Vec3>) -> CameraPose {
        let dt = clamp_dt(raw_dt, self.max_dt);
        self.elapsed += dt;
        if let Some(t) = target {
            self.last_target = Some(t.position);
        }

        let goal_fov = self.fov_override.unwrap_or(self.target_fov);
        self.fov = damp_f32(self.fov, goal_fov, 5.0, dt);
        self.shake.update(dt);

        match self.mode {
            CameraMode::Intro => self.update_intro(dt),
            CameraMode::Follow => match target {
                Some(t) => self.update_follow(dt, t),
                None => self.update_idle(dt),
            },
            CameraMode::DramaticZoom => match planet {
                Some(p) => self.update_zoom(dt, p),
                None => self.update_idle(dt),
            },
            CameraMode::Inside => match planet {
                Some(p) => self.update_inside(dt, p),
                None => self.update_idle(dt),
            },
        }
        self.pose()
    }

    fn update_intro(&mut self, dt: f32) {
        self.intro_t = (self.intro_t + dt / self.intro_duration).min(1.0);
        let t = EasingFunction::CubicInOut.apply(self.intro_t);

        let spiral_angle = (1.0 - t) * PI * 2.0;
        let spiral_radius = 30.0 * (1.0 - t);
        let goal = Vec3::new(
            spiral_angle.cos() * spiral_radius,
            25.0 * (1.0 - t) + 3.0,
            spiral_angle.sin() * spiral_radius + 14.0 * t,
        );
        self.position = damp(self.position, goal, 3.5, dt);
        self.look_at = Vec3::new(0.0, -t, 0.0);
        self.target_fov = self.default_fov + 10.0 * (1.0 - t);

        if self.intro_t >= 1.0 {
            info!("intro finished");
            self.mode = CameraMode::Follow;
            self.target_fov = self.default_fov;
        }
    }

    fn update_follow(&mut self, dt: f32, target: FollowTarget) {
        // displacement per 60 Hz frame
        let velocity = match self.previous_target {
            Some(prev) if dt > 0.0 => (target.position - prev) / (dt * 60.0),
            _ => Vec3::ZERO,
        };
        self.previous_target = Some(target.position);
        self.smoothed_velocity = damp(self.smoothed_velocity, velocity, 5.0, dt);

        let mut lag = self.smoothed_velocity * FOLLOW_LAG;
        lag.y = lag.y.abs();
        let mut offset = Quat::from_rotation_y(target.yaw) * (FOLLOW_BASE_OFFSET + lag);
        offset.x += target.yaw.sin() * FOLLOW_SIDE;

        let desired = target.position + offset + self.shake.offset;
        let speed = self.smoothed_velocity.length();
        let rate = 3.5 + (speed * 2.0).min(2.0);
        self.position = damp(self.position, desired, rate, dt);

        let look_ahead = target.position + self.smoothed_velocity * 8.0 + Vec3::Y * 0.5;
        self.look_at = damp(self.look_at, look_ahead, 4.0, dt);
        self.target_fov = self.default_fov + (speed * 50.0).min(FOLLOW_MAX_FOV_BOOST);
    }

    fn update_idle(&mut self, dt: f32) {
        let angle = self.elapsed * 0.05;
        let goal = Vec3::new(
            angle.cos() * 22.0,
            7.0 + (self.elapsed * 0.3).sin() * 2.0,
            angle.sin() * 22.0 * 0.7,
        );
        self.position = damp(self.position, goal, 0.8, dt);
        self.look_at = Vec3::Y;
        if self.mode == CameraMode::Follow {
            self.target_fov = self.default_fov;
        }
    }

    fn update_zoom(&mut self, dt: f32, planet: Vec3) {
        self.zoom_t = (self.zoom_t + dt * ZOOM_RATE).min(1.0);
        let t = EasingFunction::QuarticInOut.apply(self.zoom_t);

        let end = planet + ZOOM_END_OFFSET;
        let arc = (t * PI).sin() * ZOOM_ARC_HEIGHT;
        let goal = self.zoom_start_position.lerp(end, t) + Vec3::Y * arc + self.shake.offset;
        self.position = damp(self.position, goal, 4.5, dt);

        let look_end = planet + Vec3::Y * 0.3;
        self.look_at = self.zoom_start_look.lerp(look_end, t);
        self.target_fov = self.default_fov + (ZOOM_FOV - self.default_fov) * t;

        if t > 0.2 && t < 0.8 {
            self.shake.intensity = SHAKE_PEAK * (t * PI).sin();
        }

        if self.zoom_t >= 1.0 {
            debug!("zoom landed");
            self.mode = CameraMode::Inside;
            self.target_fov = INSIDE_FOV;
        }
    }

    fn update_inside(&mut self, dt: f32, planet: Vec3) {
        let angle = self.elapsed * 0.15;
        let orbit = Vec3::new(
            angle.cos() * INSIDE_RADIUS,
            1.4 + (angle * 2.0).sin() * 0.6,
            angle.sin() * INSIDE_RADIUS * 0.8,
        );
        let goal = planet + orbit + self.shake.offset;
        self.position = damp(self.position, goal, 2.8, dt);
        self.look_at = planet + Vec3::Y * ((angle * 0.5).sin() * 0.3);
        self.target_fov = INSIDE_FOV + (self.elapsed * 0.5).sin() * 2.0;
    }
}

#[cfg(test)]
#[path = "rig_tests.rs"]
mod tests;
