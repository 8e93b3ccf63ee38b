//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (passed explicitly into every random decision)
//! - Stable iteration order (grid row-major, objects by arena slot)
//! - No rendering or platform dependencies

pub mod body;
pub mod camera;
pub mod collision;
pub mod driver;
pub mod factory;
pub mod goal;
pub mod grid;
pub mod object;
pub mod rng;
pub mod state;
pub mod tick;

pub use body::RigidBody;
pub use camera::{Camera, snap_camera_to_grid};
pub use collision::{CollisionReport, Edge, EdgeHit, obj_hitting_grid, tile_coordinate_hit, update_objects};
pub use driver::{FixedStepDriver, RenderView, extrapolate};
pub use factory::{FactoryReport, conveyor_away, do_factory};
pub use goal::{Goal, Objective, Outcome, PhaseDef, PhaseEvent, PhaseTracker, check_goal_satisfied};
pub use grid::{Dir, EngineCell, GridCell, GridSpace, TileKind};
pub use object::{Object, ObjectId, ObjectKind, ObjectPool, ObjectState, spawn_field};
pub use rng::{ConstRng, SimRng, seeded};
pub use state::GameState;
pub use tick::{TickInput, TickReport, TileEdit, tick};
