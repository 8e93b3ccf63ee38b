//! Continuous-space rigid bodies
//!
//! Used for the ship origin and every free-flying object.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::wrap_coordinate;

/// Position and velocity in world units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RigidBody {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl RigidBody {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self { position, velocity }
    }

    /// Implicit Euler step with linear drag, then toroidal wrap.
    ///
    /// `v /= 1 + dt*drag; p += v*dt`
    pub fn update_physics(&mut self, dt: f32, drag: f32, space_size: f32) {
        self.velocity /= 1.0 + dt * drag;
        self.position += self.velocity * dt;

        self.position.x = wrap_coordinate(self.position.x, space_size);
        self.position.y = wrap_coordinate(self.position.y, space_size);
    }

    /// Where the body would be `ahead` seconds from now, ignoring drag
    #[inline]
    pub fn extrapolate(&self, ahead: f32) -> Vec2 {
        self.position + self.velocity * ahead
    }

    /// Clamp each axis of the velocity independently
    pub fn clamp_speed(&mut self, max_speed: f32) {
        self.velocity = self
            .velocity
            .clamp(Vec2::splat(-max_speed), Vec2::splat(max_speed));
    }
}
