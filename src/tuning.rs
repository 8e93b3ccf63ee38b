//! Data-driven game balance
//!
//! Every number the simulation reads lives in [`Tuning`]. The defaults are the
//! shipped balance; a JSON document can override any subset of them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_OBJECTS, SPACE_SIZE, TILE_SIZE};
use crate::error::SimError;
use crate::sim::goal::{Objective, PhaseDef};

/// Starter ship: intakes on the hull feed two furnaces that fan out to the engines.
pub const DEFAULT_SHIP_TEMPLATE: &str = "\
#UUUUUUU#
L>>>V<<<R
#l<<f>>r#
#...V...#
#u<<f>>d#
#>>>A<<<#
#DDDDDDD#
";
pub const DEFAULT_SHIP_WIDTH: u8 = 9;
pub const DEFAULT_SHIP_HEIGHT: u8 = 7;

/// Shipped phase script: (prompt, seconds, objective)
pub const DEFAULT_PHASES: &[(&str, f32, Objective)] = &[
    ("Hold the arrow keys to fire your engines.", 8.0, Objective::None),
    (
        "Fly into asteroids with your intakes. Furnaces refine them into fuel.",
        25.0,
        Objective::ShipConstruct,
    ),
    ("Reach the goal before time runs out!", 60.0, Objective::ReachGoalPoint),
    ("Cool down. Patch up the factory.", 10.0, Objective::None),
    ("Another goal, less time.", 45.0, Objective::ReachGoalPoint),
    ("Cool down.", 10.0, Objective::None),
    ("Final goal!", 30.0, Objective::ReachGoalPoint),
];

/// Simulation balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Ship layout ===
    pub ship_width: u8,
    pub ship_height: u8,
    /// Row-major ASCII template (newlines ignored)
    pub ship_template: String,

    // === World ===
    pub tile_size: f32,
    pub space_size: f32,

    // === Factory ===
    /// Transition units per second on conveyors and intakes
    pub conveyor_rate: f32,
    /// Transition units per second for raw asteroids in a furnace
    pub furnace_raw_rate: f32,
    /// Transition units per second for already-refined fuel passing a furnace
    pub furnace_refined_rate: f32,

    // === Engines ===
    /// Fuel every engine tile starts with
    pub engine_initial_fuel: f32,
    /// Fuel burned per second by a firing engine
    pub engine_burn_rate: f32,
    /// Velocity added per tick per firing engine
    pub thrust_per_engine: f32,
    /// Per-axis speed clamp for the ship
    pub max_speed: f32,

    // === Drag ===
    pub ship_drag: f32,
    /// Drag once the ship is destroyed (drifts to a stop)
    pub failed_ship_drag: f32,
    pub object_drag: f32,

    // === Collisions ===
    /// Multiplier on ship velocity handed to an object it plows into (> 1)
    pub force_transfer: f32,
    /// Velocity the ship loses per bounced object
    pub ship_nudge: f32,

    // === Objects ===
    pub max_objects: usize,
    pub object_count: usize,
    pub object_max_speed: f32,
    /// Fraction of spawned objects that start pre-refined
    pub fuel_spawn_ratio: f32,

    // === Goals & damage ===
    pub goal_size: f32,
    /// Goals never spawn closer than this to the world edge
    pub goal_margin: f32,
    /// Per-cell chance of destruction when a goal is missed
    pub damage_chance: f32,
    /// Ship is destroyed once damage count exceeds this
    pub destroyed_threshold: u32,
    pub damaged_display_seconds: f32,
    pub phases: Vec<PhaseDef>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ship_width: DEFAULT_SHIP_WIDTH,
            ship_height: DEFAULT_SHIP_HEIGHT,
            ship_template: DEFAULT_SHIP_TEMPLATE.to_string(),

            tile_size: TILE_SIZE,
            space_size: SPACE_SIZE,

            conveyor_rate: 256.0,
            furnace_raw_rate: 64.0,
            furnace_refined_rate: 512.0,

            engine_initial_fuel: 2.0,
            engine_burn_rate: 0.25,
            thrust_per_engine: 0.5,
            max_speed: 300.0,

            ship_drag: 0.05,
            failed_ship_drag: 2.0,
            object_drag: 0.01,

            force_transfer: 1.5,
            ship_nudge: 4.0,

            max_objects: MAX_OBJECTS,
            object_count: 400,
            object_max_speed: 40.0,
            fuel_spawn_ratio: 0.0,

            goal_size: 256.0,
            goal_margin: 512.0,
            damage_chance: 0.1,
            destroyed_threshold: 2,
            damaged_display_seconds: 3.0,
            phases: default_phases(),
        }
    }
}

/// The shipped phase script as owned definitions
pub fn default_phases() -> Vec<PhaseDef> {
    DEFAULT_PHASES
        .iter()
        .map(|&(prompt, seconds, objective)| PhaseDef::new(prompt, seconds, objective))
        .collect()
}

impl Tuning {
    /// Parse tuning from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        serde_json::from_str(json).map_err(|source| SimError::Parse {
            what: "tuning".to_string(),
            source,
        })
    }

    /// Reject values that parse but would break the simulation
    pub fn validate(&self) -> Result<(), SimError> {
        let positive = [
            ("space_size", self.space_size),
            ("tile_size", self.tile_size),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(SimError::InvalidTuning { field, value });
            }
        }

        let non_negative = [
            ("conveyor_rate", self.conveyor_rate),
            ("furnace_raw_rate", self.furnace_raw_rate),
            ("furnace_refined_rate", self.furnace_refined_rate),
            ("engine_initial_fuel", self.engine_initial_fuel),
            ("engine_burn_rate", self.engine_burn_rate),
            ("thrust_per_engine", self.thrust_per_engine),
            ("max_speed", self.max_speed),
            ("ship_drag", self.ship_drag),
            ("failed_ship_drag", self.failed_ship_drag),
            ("object_drag", self.object_drag),
            ("force_transfer", self.force_transfer),
            ("ship_nudge", self.ship_nudge),
            ("object_max_speed", self.object_max_speed),
            ("goal_size", self.goal_size),
            ("goal_margin", self.goal_margin),
            ("damaged_display_seconds", self.damaged_display_seconds),
        ];
        for (field, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(SimError::InvalidTuning { field, value });
            }
        }

        let chances = [
            ("damage_chance", self.damage_chance),
            ("fuel_spawn_ratio", self.fuel_spawn_ratio),
        ];
        for (field, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimError::InvalidTuning { field, value });
            }
        }

        if let Some(phase) = self.phases.iter().find(|p| p.seconds.is_nan() || p.seconds < 0.0) {
            return Err(SimError::InvalidTuning {
                field: "phases.seconds",
                value: phase.seconds,
            });
        }
        Ok(())
    }

    /// Load tuning from a JSON file
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }
}
