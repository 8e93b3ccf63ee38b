//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically.

use super::camera::snap_camera_to_grid;
use super::collision::{CollisionReport, update_objects};
use super::factory::{FactoryReport, do_factory};
use super::goal::{Outcome, PhaseEvent};
use super::grid::{Dir, TileKind};
use super::state::GameState;

/// A player edit to the ship layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileEdit {
    pub x: i32,
    pub y: i32,
    pub kind: TileKind,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Thrust keys held this frame
    pub thrust_up: bool,
    pub thrust_down: bool,
    pub thrust_left: bool,
    pub thrust_right: bool,
    /// Skip to next phase (debug/testing)
    pub skip_phase: bool,
    /// Place or remove a tile before the step runs
    pub edit: Option<TileEdit>,
}

impl TickInput {
    fn thrust(&self) -> [(Dir, bool); 4] {
        [
            (Dir::Up, self.thrust_up),
            (Dir::Down, self.thrust_down),
            (Dir::Left, self.thrust_left),
            (Dir::Right, self.thrust_right),
        ]
    }
}

/// Everything notable from one tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Engines lit by the thrust keys
    pub engines_firing: u32,
    pub factory: FactoryReport,
    pub collisions: CollisionReport,
    pub phase_event: Option<PhaseEvent>,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> TickReport {
    let mut report = TickReport::default();
    state.time_ticks += 1;

    if let Some(edit) = input.edit {
        let fuel = state.tuning.engine_initial_fuel;
        match state.grid.set_tile(edit.x, edit.y, edit.kind, fuel) {
            Ok(()) => log::debug!("Placed {:?} at ({}, {})", edit.kind, edit.x, edit.y),
            Err(err) => log::warn!("Ignoring tile edit: {err}"),
        }
    }

    // A wrecked ship drifts; the engines stay dark
    let controllable = state.phases.outcome != Outcome::Destroyed;

    // Thrust scales with the number of fueled engines facing each way
    for (dir, held) in input.thrust() {
        let engage = held && controllable;
        let engines = state.grid.control_engines_in_direction(dir, engage);
        if engage {
            state.ship.velocity += dir.unit() * engines as f32 * state.tuning.thrust_per_engine;
            report.engines_firing += engines;
        }
    }
    state.ship.clamp_speed(state.tuning.max_speed);
    state
        .grid
        .update_engine_fuel(dt, state.tuning.engine_burn_rate);

    report.factory = do_factory(
        &mut state.grid,
        &mut state.objects,
        dt,
        &state.tuning,
        &mut state.rng,
    );
    report.collisions = update_objects(
        &mut state.objects,
        &state.grid,
        &mut state.ship,
        dt,
        &state.tuning,
    );
    // Bounce nudges are clamped too
    state.ship.clamp_speed(state.tuning.max_speed);

    let drag = state.ship_drag();
    state
        .ship
        .update_physics(dt, drag, state.tuning.space_size);

    let center = state.ship_center();
    snap_camera_to_grid(&mut state.camera, center, state.settings.camera_mode, dt);

    report.phase_event = if input.skip_phase {
        state.phases.skip(&state.tuning, &mut state.rng)
    } else {
        let ship_size = state.ship_size();
        state.phases.update(
            dt,
            state.ship.position,
            ship_size,
            &mut state.grid,
            &state.tuning,
            &mut state.rng,
        )
    };

    report
}
