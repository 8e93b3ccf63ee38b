//! Fixed-step accumulator and render extrapolation
//!
//! Real frames arrive at whatever rate the host manages. The driver banks
//! their duration and pays it out in whole simulation steps; whatever is left
//! over is used only to push positions forward for drawing.

use glam::Vec2;

use super::camera::Camera;
use super::object::{ObjectId, ObjectKind};
use super::state::GameState;
use super::tick::{TickInput, tick};
use crate::consts::SIM_DT;
use crate::settings::Settings;

/// Accumulator that turns variable frame times into fixed ticks
#[derive(Debug, Clone, PartialEq)]
pub struct FixedStepDriver {
    pub step: f32,
    pub accumulator: f32,
    /// Cap on ticks per frame (spiral-of-death guard)
    pub max_substeps: u32,
    /// Cap on a single frame's contribution
    pub max_frame_dt: f32,
}

impl Default for FixedStepDriver {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl FixedStepDriver {
    pub fn new(step: f32, max_substeps: u32, max_frame_dt: f32) -> Self {
        assert!(step > 0.0, "fixed step must be positive");
        Self {
            step,
            accumulator: 0.0,
            max_substeps,
            max_frame_dt,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(SIM_DT, settings.max_substeps, settings.max_frame_dt)
    }

    /// Feed one real frame. Returns the number of ticks run.
    ///
    /// One-shot inputs (`skip_phase`, `edit`) are consumed by the first tick.
    pub fn advance(&mut self, state: &mut GameState, input: &mut TickInput, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, self.max_frame_dt);

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            tick(state, input, self.step);
            self.accumulator -= self.step;
            substeps += 1;

            input.skip_phase = false;
            input.edit = None;
        }

        if self.accumulator >= self.step {
            let dropped = (self.accumulator / self.step) as u32;
            log::warn!("Simulation falling behind, dropping {dropped} steps");
            self.accumulator %= self.step;
        }
        substeps
    }

    /// Unsimulated time carried into the next frame
    #[inline]
    pub fn leftover(&self) -> f32 {
        self.accumulator
    }

    /// Leftover as a fraction of one step
    #[inline]
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }
}

/// Positions to draw this frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderView {
    pub ship_position: Vec2,
    pub camera: Camera,
    pub objects: Vec<(ObjectId, ObjectKind, Vec2)>,
}

/// Push every moving thing forward by `leftover` seconds of its current velocity.
///
/// Reads the state only; the result is for drawing and is never fed back.
pub fn extrapolate(state: &GameState, leftover: f32) -> RenderView {
    let ship_position = state.ship.extrapolate(leftover);
    let shift = ship_position - state.ship.position;

    let mut camera = state.camera;
    camera.x += shift.x;
    camera.y += shift.y;

    let tile_size = state.tuning.tile_size;
    let objects = state
        .objects
        .iter()
        .map(|(id, object)| {
            let position = match object.body() {
                Some(body) => body.extrapolate(leftover),
                None => object.world_position(ship_position, tile_size),
            };
            (id, object.kind, position)
        })
        .collect();

    RenderView {
        ship_position,
        camera,
        objects,
    }
}
