//! Yaw-only transform used by vehicles and planets.

use glam::{Quat, Vec3};

/// Position, heading and uniform scale of a scene node.
///
/// Owned by whichever controller animates it; observers only read it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World-space position.
    pub position: Vec3,
    /// Rotation about +Y in radians. 0 faces -Z.
    pub yaw: f32,
    /// Uniform scale.
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            scale: 1.0,
        }
    }
}

impl Transform {
    /// A unit-scale transform at `position` facing -Z.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Heading as a quaternion.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Unit forward direction (local -Z rotated by yaw).
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    /// Distance between the two positions.
    pub fn distance_to(&self, other: &Transform) -> f32 {
        self.position.distance(other.position)
    }
}
