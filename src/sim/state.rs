//! Game state and session setup
//!
//! Everything one game session owns lives here: the ship grid and body, the
//! object pool, the phase tracker and the seeded random source. Restarting
//! means building a fresh `GameState`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::RigidBody;
use super::camera::Camera;
use super::goal::{Outcome, PhaseTracker};
use super::grid::GridSpace;
use super::object::{ObjectPool, spawn_field};
use super::rng::{SimRng, seeded};
use crate::error::SimError;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: SimRng,
    pub tuning: Tuning,
    pub settings: Settings,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Ship tiles
    pub grid: GridSpace,
    /// Ship origin (top-left corner of the grid) and velocity
    pub ship: RigidBody,
    pub objects: ObjectPool,
    pub camera: Camera,
    pub phases: PhaseTracker,
}

impl GameState {
    /// New session with the shipped balance
    pub fn new(seed: u64) -> Self {
        let tuning = Tuning::default();
        // The shipped template is a constant; a failure here is a build mistake
        let grid = match GridSpace::from_template(
            tuning.ship_width,
            tuning.ship_height,
            &tuning.ship_template,
            tuning.engine_initial_fuel,
        ) {
            Ok(grid) => grid,
            Err(err) => panic!("default ship template is invalid: {err}"),
        };
        Self::assemble(seed, tuning, Settings::default(), grid)
    }

    /// New session from loaded configuration
    pub fn with_config(seed: u64, tuning: Tuning, settings: Settings) -> Result<Self, SimError> {
        tuning.validate()?;
        let grid = GridSpace::from_template(
            tuning.ship_width,
            tuning.ship_height,
            &tuning.ship_template,
            tuning.engine_initial_fuel,
        )?;
        Ok(Self::assemble(seed, tuning, settings, grid))
    }

    fn assemble(seed: u64, tuning: Tuning, settings: Settings, grid: GridSpace) -> Self {
        let mut rng = seeded(seed);
        let mut objects = ObjectPool::new(tuning.max_objects);
        spawn_field(&mut objects, &mut rng, &tuning);

        let ship_size = grid.pixel_size(tuning.tile_size);
        let ship = RigidBody::new(Vec2::splat(tuning.space_size / 2.0) - ship_size / 2.0, Vec2::ZERO);

        let (w, h) = settings.viewport;
        let mut camera = Camera::new(w, h);
        super::camera::snap_camera_to_grid(
            &mut camera,
            ship.position + ship_size / 2.0,
            crate::settings::CameraMode::Snap,
            0.0,
        );

        let mut phases = PhaseTracker::new();
        phases.start(&tuning, &mut rng);

        log::info!(
            "Session {} started: {}x{} ship, {} objects, {} phases",
            seed,
            grid.width(),
            grid.height(),
            objects.len(),
            tuning.phases.len()
        );

        Self {
            seed,
            rng,
            tuning,
            settings,
            time_ticks: 0,
            grid,
            ship,
            objects,
            camera,
            phases,
        }
    }

    /// Ship bounding box size in world units
    pub fn ship_size(&self) -> Vec2 {
        self.grid.pixel_size(self.tuning.tile_size)
    }

    /// Center of the ship grid in world space
    pub fn ship_center(&self) -> Vec2 {
        self.ship.position + self.ship_size() / 2.0
    }

    pub fn outcome(&self) -> Outcome {
        self.phases.outcome
    }

    /// Simulated seconds since the session began
    pub fn elapsed_seconds(&self) -> f32 {
        self.time_ticks as f32 * crate::consts::SIM_DT
    }

    /// Drag currently acting on the ship
    pub fn ship_drag(&self) -> f32 {
        if self.phases.outcome == Outcome::Destroyed {
            self.tuning.failed_ship_drag
        } else {
            self.tuning.ship_drag
        }
    }
}
