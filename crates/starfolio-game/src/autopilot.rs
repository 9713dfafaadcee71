//! Scripted tour: drive to each planet, enter it, look around, leave, close
//! the panel, move on. Produces key transitions the way a player would.

use glam::{Quat, Vec3};
use starfolio_config::VehicleMode;
use starfolio_input::RawKeyEvent;
use starfolio_player::Steering;
use starfolio_scene::{EntryStage, GalaxySession};
use tracing::{info, warn};
use winit::keyboard::KeyCode;

/// Give up on a planet after this long without reaching it.
const LEG_TIMEOUT_SECS: f32 = 30.0;
/// Time spent inside before pressing exit.
const INTERIOR_SECS: f32 = 3.0;
/// Time the panel stays open before closing it.
const PANEL_SECS: f32 = 1.5;
/// Headings closer than this count as on course.
const HEADING_TOLERANCE: f32 = 0.15;
/// Cut the throttle inside this distance so the vehicle doesn't overshoot.
const COAST_DISTANCE: f32 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Leg {
    Drive,
    Entering,
    Inside,
    Panel,
}

pub struct Autopilot {
    targets: Vec<String>,
    index: usize,
    leg: Leg,
    leg_time: f32,
    held: Vec<KeyCode>,
}

impl Autopilot {
    pub fn new(targets: Vec<String>) -> Self {
        Self {
            targets,
            index: 0,
            leg: Leg::Drive,
            leg_time: 0.0,
            held: Vec::new(),
        }
    }

    pub fn target(&self) -> Option<&str> {
        self.targets.get(self.index).map(String::as_str)
    }

    pub fn is_done(&self) -> bool {
        self.index >= self.targets.len()
    }

    fn next_leg(&mut self, leg: Leg) {
        self.leg = leg;
        self.leg_time = 0.0;
    }

    fn next_target(&mut self) {
        self.index += 1;
        self.next_leg(Leg::Drive);
        if let Some(target) = self.target() {
            info!(target, "autopilot heading to next planet");
        }
    }

    /// Key transitions to feed the session before its next frame.
    pub fn drive(&mut self, session: &GalaxySession, dt: f32) -> Vec<RawKeyEvent> {
        self.leg_time += dt;
        let Some(target) = self.target().map(str::to_owned) else {
            return self.hold(&[]);
        };

        match self.leg {
            Leg::Drive => {
                if session.near_planet().is_some_and(|p| p.as_str() == target)
                    && session.stage() == EntryStage::None
                {
                    self.next_leg(Leg::Entering);
                    let mut events = self.hold(&[]);
                    events.push(RawKeyEvent::press(KeyCode::KeyE));
                    events.push(RawKeyEvent::release(KeyCode::KeyE));
                    return events;
                }
                if self.leg_time > LEG_TIMEOUT_SECS {
                    warn!(target = target.as_str(), "autopilot could not reach planet");
                    self.next_target();
                    return self.hold(&[]);
                }
                let keys = steer(session, &target);
                self.hold(&keys)
            }
            Leg::Entering => {
                if session.stage() == EntryStage::Astronaut {
                    self.next_leg(Leg::Inside);
                } else if session.stage() == EntryStage::None && self.leg_time > 1.0 {
                    self.next_leg(Leg::Drive);
                }
                Vec::new()
            }
            Leg::Inside => {
                if self.leg_time < INTERIOR_SECS {
                    return Vec::new();
                }
                self.next_leg(Leg::Panel);
                tap(KeyCode::Escape)
            }
            Leg::Panel => {
                if session.open_panel().is_none() {
                    self.next_target();
                    Vec::new()
                } else if self.leg_time < PANEL_SECS {
                    Vec::new()
                } else {
                    tap(KeyCode::Escape)
                }
            }
        }
    }

    /// Press what `keys` adds, release what it drops.
    fn hold(&mut self, keys: &[KeyCode]) -> Vec<RawKeyEvent> {
        let mut events = Vec::new();
        self.held.retain(|code| {
            let keep = keys.contains(code);
            if !keep {
                events.push(RawKeyEvent::release(*code));
            }
            keep
        });
        for code in keys {
            if !self.held.contains(code) {
                events.push(RawKeyEvent::press(*code));
                self.held.push(*code);
            }
        }
        events
    }
}

fn tap(code: KeyCode) -> Vec<RawKeyEvent> {
    vec![RawKeyEvent::press(code), RawKeyEvent::release(code)]
}

/// Keys that move the vehicle toward `target`.
fn steer(session: &GalaxySession, target: &str) -> Vec<KeyCode> {
    let Some(planet) = session.planets().get(target) else {
        return Vec::new();
    };
    let vehicle = session.vehicle();
    let position = vehicle.transform().position;
    let mut to_target = planet.position() - position;
    to_target.y = 0.0;
    let distance = to_target.length();
    if distance < f32::EPSILON {
        return Vec::new();
    }
    let heading = to_target / distance;
    let throttle = distance > COAST_DISTANCE || vehicle.speed() < 0.2;

    let mut keys = Vec::new();
    match vehicle.tuning().steering {
        Steering::Tank { .. } => {
            let forward = vehicle.transform().forward();
            let turn = forward.cross(heading).y;
            let aligned = forward.dot(heading);
            if aligned < 1.0 - HEADING_TOLERANCE || turn.abs() > HEADING_TOLERANCE {
                keys.push(if turn >= 0.0 { KeyCode::KeyA } else { KeyCode::KeyD });
            }
            if throttle && aligned > 0.5 {
                keys.push(KeyCode::KeyW);
            }
        }
        Steering::CameraRelative { .. } => {
            // Undo the camera-yaw rotation the rocket applies to its input.
            let to_camera = session.rig().pose().position - position;
            let camera_yaw = to_camera.x.atan2(to_camera.z);
            let local = Quat::from_rotation_y(-camera_yaw) * heading;
            if !throttle {
                return keys;
            }
            if local.x > 0.3 {
                keys.push(KeyCode::KeyD);
            } else if local.x < -0.3 {
                keys.push(KeyCode::KeyA);
            }
            if local.z > 0.3 {
                keys.push(KeyCode::KeyS);
            } else if local.z < -0.3 {
                keys.push(KeyCode::KeyW);
            }
        }
    }
    keys
}

/// Every planet worth visiting, in catalog order.
pub fn tour(session: &GalaxySession) -> Vec<String> {
    session
        .planets()
        .iter()
        .map(|p| p.id.as_str().to_owned())
        .collect()
}

/// Short label for logs.
pub fn vehicle_label(mode: VehicleMode) -> &'static str {
    match mode {
        VehicleMode::Car => "hover car",
        VehicleMode::Rocket => "rocket",
        VehicleMode::Walk => "astronaut",
    }
}
