//! Tile and object tags to tile-sheet cells
//!
//! The simulation never looks at any of this. A renderer asks for the sprite
//! of a [`TileKind`] or [`ObjectKind`] and draws it; swapping the sheet layout
//! only touches this table.

use crate::sim::grid::{Dir, GridCell, TileKind};
use crate::sim::object::ObjectKind;

/// Cell in the tile sheet plus a rotation for directional tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteRef {
    pub column: u8,
    pub row: u8,
    /// Clockwise quarter turns applied when drawing
    pub quarter_turns: u8,
}

impl SpriteRef {
    pub const fn new(column: u8, row: u8) -> Self {
        Self {
            column,
            row,
            quarter_turns: 0,
        }
    }

    pub const fn rotated(self, quarter_turns: u8) -> Self {
        Self {
            quarter_turns: quarter_turns % 4,
            ..self
        }
    }

    /// Source rectangle `(x, y, w, h)` in sheet pixels
    pub fn source_rect(&self, cell_px: u32) -> (u32, u32, u32, u32) {
        (
            self.column as u32 * cell_px,
            self.row as u32 * cell_px,
            cell_px,
            cell_px,
        )
    }
}

// Sheet layout: row 0 structure, row 1 machinery, row 2 loose objects
const WALL: SpriteRef = SpriteRef::new(0, 0);
const FLOOR: SpriteRef = SpriteRef::new(1, 0);
const DESTROYED: SpriteRef = SpriteRef::new(2, 0);
/// Drawn pointing right
const CONVEYOR: SpriteRef = SpriteRef::new(0, 1);
const FURNACE: SpriteRef = SpriteRef::new(1, 1);
/// Drawn pushing right
const INTAKE: SpriteRef = SpriteRef::new(2, 1);
/// Drawn thrusting up, idle and lit variants side by side
const ENGINE: SpriteRef = SpriteRef::new(3, 1);
const ENGINE_LIT: SpriteRef = SpriteRef::new(4, 1);
const ASTEROID: SpriteRef = SpriteRef::new(0, 2);
const FUEL: SpriteRef = SpriteRef::new(1, 2);

/// Clockwise quarter turns from a right-facing sprite
fn turns_from_right(dir: Dir) -> u8 {
    match dir {
        Dir::Right => 0,
        Dir::Down => 1,
        Dir::Left => 2,
        Dir::Up => 3,
    }
}

/// Sprite for a tile kind
pub fn tile_sprite(kind: TileKind) -> SpriteRef {
    match kind {
        TileKind::Wall => WALL,
        TileKind::Floor => FLOOR,
        TileKind::Destroyed => DESTROYED,
        TileKind::Furnace => FURNACE,
        TileKind::Conveyor(dir) => CONVEYOR.rotated(turns_from_right(dir)),
        TileKind::Intake(side) => INTAKE.rotated(turns_from_right(side.opposite())),
        TileKind::Engine(dir) => ENGINE.rotated(turns_from_right(dir) + 1),
    }
}

/// Sprite for a cell, showing the exhaust on firing engines
pub fn cell_sprite(cell: &GridCell) -> SpriteRef {
    let sprite = tile_sprite(cell.kind);
    if cell.kind.is_engine() && cell.engine.firing {
        ENGINE_LIT.rotated(sprite.quarter_turns)
    } else {
        sprite
    }
}

pub fn object_sprite(kind: ObjectKind) -> SpriteRef {
    match kind {
        ObjectKind::Asteroid => ASTEROID,
        ObjectKind::Fuel => FUEL,
    }
}
