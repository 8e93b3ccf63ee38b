//! Camera follow

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::CameraMode;

/// Viewport rectangle in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Camera {
    pub fn new(w: f32, h: f32) -> Self {
        Self { x: 0.0, y: 0.0, w, h }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Center the camera on the ship's grid center
pub fn snap_camera_to_grid(camera: &mut Camera, grid_center: Vec2, mode: CameraMode, dt: f32) {
    let goal = grid_center - Vec2::new(camera.w, camera.h) / 2.0;
    match mode {
        CameraMode::Snap => {
            camera.x = goal.x;
            camera.y = goal.y;
        }
        CameraMode::Ease { factor } => {
            camera.x += (goal.x - camera.x) * factor * dt;
            camera.y += (goal.y - camera.y) * factor * dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_centers_immediately() {
        let mut camera = Camera::new(100.0, 50.0);
        snap_camera_to_grid(&mut camera, Vec2::new(500.0, 300.0), CameraMode::Snap, 1.0 / 60.0);
        assert_eq!(camera.center(), Vec2::new(500.0, 300.0));
    }

    #[test]
    fn test_ease_closes_distance_gradually() {
        let mut camera = Camera::new(100.0, 100.0);
        let target = Vec2::new(1000.0, 0.0);
        let mode = CameraMode::Ease { factor: 5.0 };

        snap_camera_to_grid(&mut camera, target, mode, 0.1);
        let first = camera.center();
        assert!(first.x > 50.0 && first.x < 1000.0);

        for _ in 0..200 {
            snap_camera_to_grid(&mut camera, target, mode, 0.1);
        }
        assert!((camera.center() - target).length() < 0.01);
    }
}
