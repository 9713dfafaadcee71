use glam::Vec3;

/// Flattened elliptical orbit around the galactic origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub radius: f32,
    /// Current angle in radians.
    pub angle: f32,
    /// Angular speed multiplier; 0 parks the planet.
    pub speed: f32,
}

impl Orbit {
    /// Depth axis squash.
    pub const ELLIPSE_FACTOR: f32 = 0.85;

    pub fn new(radius: f32, angle: f32, speed: f32) -> Self {
        Self {
            radius,
            angle,
            speed,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(
            self.angle.cos() * self.radius,
            (self.angle * 0.35).sin() * 0.25,
            self.angle.sin() * self.radius * Self::ELLIPSE_FACTOR,
        )
    }

    pub fn advance(&mut self, dt: f32) {
        self.angle += self.speed * dt * 0.5;
    }
}
