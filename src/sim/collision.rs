//! Ship/object collision and capture
//!
//! The ship is an axis-aligned box of tiles. A free object inside that box is
//! classified by the nearest hull edge, not by a swept ray: intakes on that
//! edge swallow it, anything else bats it away and shoves the ship back a little.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::RigidBody;
use super::grid::GridSpace;
use super::object::{ObjectPool, ObjectState};
use crate::point_in_rect;
use crate::tuning::Tuning;

/// Distance a bounced object is placed outside the struck edge
const EDGE_CLEARANCE: f32 = 0.5;

/// Hull side of the ship box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Result of nearest-edge classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeHit {
    pub edge: Edge,
    /// Tile on the struck edge row/column
    pub tile_x: u8,
    pub tile_y: u8,
}

/// What `update_objects` did this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub captured: u32,
    pub bounced: u32,
}

/// Is the object inside the ship's bounding box?
#[inline]
pub fn obj_hitting_grid(obj_pos: Vec2, ship_pos: Vec2, grid_size: Vec2) -> bool {
    point_in_rect(obj_pos, ship_pos, grid_size)
}

/// Map an object inside the ship box onto the hull edge it is closest to.
///
/// Comparisons are strict and checked top, bottom, left; anything that wins
/// none of them, exact ties included, lands on the right edge.
pub fn tile_coordinate_hit(
    obj_pos: Vec2,
    ship_pos: Vec2,
    grid: &GridSpace,
    tile_size: f32,
) -> EdgeHit {
    let size = grid.pixel_size(tile_size);
    let local = obj_pos - ship_pos;

    let dist_top = local.y;
    let dist_bottom = size.y - local.y;
    let dist_left = local.x;
    let dist_right = size.x - local.x;

    let last_x = grid.width().saturating_sub(1);
    let last_y = grid.height().saturating_sub(1);
    let column = ((local.x / tile_size) as i32).clamp(0, last_x as i32) as u8;
    let row = ((local.y / tile_size) as i32).clamp(0, last_y as i32) as u8;

    if dist_top < dist_bottom && dist_top < dist_left && dist_top < dist_right {
        EdgeHit {
            edge: Edge::Top,
            tile_x: column,
            tile_y: 0,
        }
    } else if dist_bottom < dist_top && dist_bottom < dist_left && dist_bottom < dist_right {
        EdgeHit {
            edge: Edge::Bottom,
            tile_x: column,
            tile_y: last_y,
        }
    } else if dist_left < dist_top && dist_left < dist_bottom && dist_left < dist_right {
        EdgeHit {
            edge: Edge::Left,
            tile_x: 0,
            tile_y: row,
        }
    } else {
        EdgeHit {
            edge: Edge::Right,
            tile_x: last_x,
            tile_y: row,
        }
    }
}

/// Hand-tuned impulse: the object takes the ship's velocity along the struck
/// axis times `force_transfer`, the ship loses `ship_nudge` on that axis.
fn bounce(body: &mut RigidBody, ship: &mut RigidBody, edge: Edge, size: Vec2, tuning: &Tuning) {
    let transfer = tuning.force_transfer;
    let nudge = tuning.ship_nudge;
    match edge {
        Edge::Top => {
            body.velocity.y = ship.velocity.y * transfer;
            body.position.y = ship.position.y - EDGE_CLEARANCE;
            ship.velocity.y += nudge;
        }
        Edge::Bottom => {
            body.velocity.y = ship.velocity.y * transfer;
            body.position.y = ship.position.y + size.y + EDGE_CLEARANCE;
            ship.velocity.y -= nudge;
        }
        Edge::Left => {
            body.velocity.x = ship.velocity.x * transfer;
            body.position.x = ship.position.x - EDGE_CLEARANCE;
            ship.velocity.x += nudge;
        }
        Edge::Right => {
            body.velocity.x = ship.velocity.x * transfer;
            body.position.x = ship.position.x + size.x + EDGE_CLEARANCE;
            ship.velocity.x -= nudge;
        }
    }
}

/// Integrate free objects and resolve their contact with the ship.
///
/// Grid-locked objects are left alone; the factory step owns them and their
/// world position is derived from the ship every time it is asked for.
pub fn update_objects(
    pool: &mut ObjectPool,
    grid: &GridSpace,
    ship: &mut RigidBody,
    dt: f32,
    tuning: &Tuning,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    let size = grid.pixel_size(tuning.tile_size);

    for (_, object) in pool.iter_mut() {
        let ObjectState::FreeFlying { body } = &mut object.state else {
            continue;
        };

        body.update_physics(dt, tuning.object_drag, tuning.space_size);
        if !obj_hitting_grid(body.position, ship.position, size) {
            continue;
        }

        let hit = tile_coordinate_hit(body.position, ship.position, grid, tuning.tile_size);
        if grid.cell(hit.tile_x, hit.tile_y).kind.is_intake() {
            object.capture(hit.tile_x, hit.tile_y);
            report.captured += 1;
        } else {
            bounce(body, ship, hit.edge, size, tuning);
            report.bounced += 1;
        }
    }

    if report.captured > 0 {
        log::debug!("Captured {} objects", report.captured);
    }
    report
}
