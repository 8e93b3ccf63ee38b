//! Space Factory - a ship-as-factory arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (factory grid, physics, capture, phases)
//! - `tuning`: Data-driven game balance
//! - `settings`: Presentation-side preferences (camera follow)
//! - `visual`: Tile/object tag to sprite lookup for a renderer

pub mod error;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod visual;

pub use error::SimError;
pub use settings::{CameraMode, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Edge length of one ship tile in world units
    pub const TILE_SIZE: f32 = 32.0;
    /// Side length of the toroidal world
    pub const SPACE_SIZE: f32 = 4096.0;

    /// Transition counter value an object must exceed to leave its tile
    pub const TRANSITION_THRESHOLD: f32 = 128.0;
    /// `conveyor_away` accepts a neighbour when `rng % GATE == 0`
    pub const CONVEYOR_AWAY_GATE: u32 = 4;
    /// Fuel units a refined object adds to the engine that consumes it
    pub const FUEL_PER_OBJECT: f32 = 1.0;

    /// Default object pool capacity
    pub const MAX_OBJECTS: usize = 1024;
}

/// Wrap a single coordinate onto the toroidal world.
///
/// Only positions on or past an edge move; interior values are returned unchanged.
#[inline]
pub fn wrap_coordinate(value: f32, space_size: f32) -> f32 {
    if value >= space_size {
        0.0
    } else if value <= 0.0 {
        space_size
    } else {
        value
    }
}

/// Is `point` inside the axis-aligned box at `min` with `size` (edges inclusive)?
#[inline]
pub fn point_in_rect(point: Vec2, min: Vec2, size: Vec2) -> bool {
    let max = min + size;
    point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
}

/// The four corners of a box, clockwise from `min`
#[inline]
pub fn rect_corners(min: Vec2, size: Vec2) -> [Vec2; 4] {
    [
        min,
        Vec2::new(min.x + size.x, min.y),
        min + size,
        Vec2::new(min.x, min.y + size.y),
    ]
}
