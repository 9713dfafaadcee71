//! Camera pose and world-to-screen projection for HUD overlays.

use glam::{Mat4, Vec2, Vec3, Vec4};

const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;

/// What the render layer needs to place the camera for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
}

impl CameraPose {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_at, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect_ratio, NEAR, FAR)
    }

    /// Pixel coordinates of `world` in a `viewport` (origin top-left), or
    /// `None` when the point is behind the camera.
    pub fn project_to_screen(&self, world: Vec3, viewport: Vec2) -> Option<Vec2> {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return None;
        }
        let view_proj = self.projection_matrix(viewport.x / viewport.y) * self.view_matrix();
        let clip = view_proj * Vec4::new(world.x, world.y, world.z, 1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * viewport.x,
            (1.0 - ndc.y) * 0.5 * viewport.y,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose() -> CameraPose {
        CameraPose {
            position: Vec3::new(0.0, 0.0, 10.0),
            look_at: Vec3::ZERO,
            fov: 60.0,
        }
    }

    #[test]
    fn test_look_at_point_lands_mid_screen() {
        let p = pose().project_to_screen(Vec3::ZERO, Vec2::new(1280.0, 720.0)).unwrap();
        assert!((p - Vec2::new(640.0, 360.0)).length() < 1e-3);
    }

    #[test]
    fn test_right_and_up_map_to_screen_axes() {
        let viewport = Vec2::new(800.0, 600.0);
        let right = pose().project_to_screen(Vec3::new(2.0, 0.0, 0.0), viewport).unwrap();
        let up = pose().project_to_screen(Vec3::new(0.0, 2.0, 0.0), viewport).unwrap();
        assert!(right.x > 400.0);
        // screen y grows downward
        assert!(up.y < 300.0);
    }

    #[test]
    fn test_behind_camera_is_none() {
        assert!(pose().project_to_screen(Vec3::new(0.0, 0.0, 20.0), Vec2::new(800.0, 600.0)).is_none());
    }
}
