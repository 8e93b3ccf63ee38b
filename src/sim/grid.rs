//! Ship tile grid
//!
//! A fixed rectangle of typed cells built once per session from an ASCII
//! template. Engine tiles carry their own fuel tank so thrust degrades per
//! direction as individual engines run dry.

use std::fmt;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Cardinal direction in grid space (+y is down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    /// Tile offset for one step in this direction
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    /// Unit vector in world space
    #[inline]
    pub fn unit(self) -> Vec2 {
        let (dx, dy) = self.delta();
        Vec2::new(dx as f32, dy as f32)
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// Cell type. Glyphs are the template characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileKind {
    /// `#`
    Wall,
    /// `.`
    #[default]
    Floor,
    /// `<` `>` `A` `V`, moving objects toward the direction
    Conveyor(Dir),
    /// `f`
    Furnace,
    /// `L` `R` `U` `D`, an intake on that side of the hull
    Intake(Dir),
    /// `l` `r` `u` `d`, thrusting the ship toward the direction
    Engine(Dir),
    /// `0`, hull breach left by damage
    Destroyed,
}

impl TileKind {
    pub fn from_glyph(glyph: char) -> Option<Self> {
        let kind = match glyph {
            '#' => TileKind::Wall,
            '.' => TileKind::Floor,
            '<' => TileKind::Conveyor(Dir::Left),
            '>' => TileKind::Conveyor(Dir::Right),
            'A' => TileKind::Conveyor(Dir::Up),
            'V' => TileKind::Conveyor(Dir::Down),
            'f' => TileKind::Furnace,
            'L' => TileKind::Intake(Dir::Left),
            'R' => TileKind::Intake(Dir::Right),
            'U' => TileKind::Intake(Dir::Up),
            'D' => TileKind::Intake(Dir::Down),
            'l' => TileKind::Engine(Dir::Left),
            'r' => TileKind::Engine(Dir::Right),
            'u' => TileKind::Engine(Dir::Up),
            'd' => TileKind::Engine(Dir::Down),
            '0' => TileKind::Destroyed,
            _ => return None,
        };
        Some(kind)
    }

    pub fn glyph(self) -> char {
        match self {
            TileKind::Wall => '#',
            TileKind::Floor => '.',
            TileKind::Conveyor(Dir::Left) => '<',
            TileKind::Conveyor(Dir::Right) => '>',
            TileKind::Conveyor(Dir::Up) => 'A',
            TileKind::Conveyor(Dir::Down) => 'V',
            TileKind::Furnace => 'f',
            TileKind::Intake(Dir::Left) => 'L',
            TileKind::Intake(Dir::Right) => 'R',
            TileKind::Intake(Dir::Up) => 'U',
            TileKind::Intake(Dir::Down) => 'D',
            TileKind::Engine(Dir::Left) => 'l',
            TileKind::Engine(Dir::Right) => 'r',
            TileKind::Engine(Dir::Up) => 'u',
            TileKind::Engine(Dir::Down) => 'd',
            TileKind::Destroyed => '0',
        }
    }

    #[inline]
    pub fn is_engine(self) -> bool {
        matches!(self, TileKind::Engine(_))
    }

    #[inline]
    pub fn is_intake(self) -> bool {
        matches!(self, TileKind::Intake(_))
    }

    /// Per-tile movement applied to objects that finish a transition here.
    ///
    /// Intakes push inward, away from the hull side they sit on.
    pub fn conveyance(self) -> Option<(i32, i32)> {
        match self {
            TileKind::Conveyor(dir) => Some(dir.delta()),
            TileKind::Intake(side) => Some(side.opposite().delta()),
            _ => None,
        }
    }
}

/// Fuel tank and throttle of one engine tile
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineCell {
    pub fuel: f32,
    pub firing: bool,
}

/// One tile of the ship
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub kind: TileKind,
    /// Only meaningful when `kind` is an engine
    pub engine: EngineCell,
}

impl GridCell {
    pub fn new(kind: TileKind, engine_initial_fuel: f32) -> Self {
        let engine = if kind.is_engine() {
            EngineCell {
                fuel: engine_initial_fuel,
                firing: false,
            }
        } else {
            EngineCell::default()
        };
        Self { kind, engine }
    }
}

/// Row-major rectangle of tiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpace {
    width: u8,
    height: u8,
    cells: Vec<GridCell>,
}

impl GridSpace {
    /// A grid of floor tiles
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![GridCell::default(); width as usize * height as usize],
        }
    }

    /// Build a grid from a template in one go
    pub fn from_template(
        width: u8,
        height: u8,
        template: &str,
        engine_initial_fuel: f32,
    ) -> Result<Self, SimError> {
        if width == 0 || height == 0 {
            return Err(SimError::InvalidGridSize {
                width: width as usize,
                height: height as usize,
            });
        }
        let mut grid = Self::new(width, height);
        grid.try_set_from_str(template, engine_initial_fuel)?;
        Ok(grid)
    }

    #[inline]
    pub fn width(&self) -> u8 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u8 {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Ship extent in world units
    pub fn pixel_size(&self, tile_size: f32) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * tile_size
    }

    /// Fill cells row-major from a template, skipping newlines.
    ///
    /// Panics if the template has more tiles than the grid or an unknown glyph;
    /// the shipped templates are constants, so either is a build mistake.
    /// Fewer tiles leave the trailing cells as they were.
    pub fn set_from_str(&mut self, template: &str, engine_initial_fuel: f32) {
        if let Err(err) = self.try_set_from_str(template, engine_initial_fuel) {
            panic!("GridSpace doesn't fit the template: {err}");
        }
    }

    /// Fallible [`set_from_str`](Self::set_from_str) for templates loaded at runtime.
    ///
    /// Validates the whole template before touching any cell. Returns the
    /// number of cells written.
    pub fn try_set_from_str(
        &mut self,
        template: &str,
        engine_initial_fuel: f32,
    ) -> Result<usize, SimError> {
        let mut kinds = Vec::with_capacity(self.cells.len());
        for (offset, glyph) in template.chars().filter(|&c| c != '\n' && c != '\r').enumerate() {
            let kind = TileKind::from_glyph(glyph).ok_or(SimError::UnknownTile { glyph, offset })?;
            kinds.push(kind);
        }
        if kinds.len() > self.cells.len() {
            return Err(SimError::TemplateOverflow {
                glyphs: kinds.len(),
                capacity: self.cells.len(),
            });
        }

        for (cell, kind) in self.cells.iter_mut().zip(kinds.iter()) {
            *cell = GridCell::new(*kind, engine_initial_fuel);
        }
        Ok(kinds.len())
    }

    #[inline]
    fn index(&self, x: u8, y: u8) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Unchecked cell access; callers validate coordinates
    #[inline]
    pub fn cell(&self, x: u8, y: u8) -> &GridCell {
        &self.cells[self.index(x, y)]
    }

    #[inline]
    pub fn cell_mut(&mut self, x: u8, y: u8) -> &mut GridCell {
        let index = self.index(x, y);
        &mut self.cells[index]
    }

    /// Checked coordinate conversion for neighbour lookups
    pub fn in_bounds(&self, x: i32, y: i32) -> Option<(u8, u8)> {
        if x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32 {
            Some((x as u8, y as u8))
        } else {
            None
        }
    }

    /// Bounds-checked lookup
    pub fn get(&self, x: i32, y: i32) -> Option<&GridCell> {
        self.in_bounds(x, y).map(|(x, y)| self.cell(x, y))
    }

    /// Place or remove a tile (player edit)
    pub fn set_tile(
        &mut self,
        x: i32,
        y: i32,
        kind: TileKind,
        engine_initial_fuel: f32,
    ) -> Result<(), SimError> {
        let (x, y) = self.in_bounds(x, y).ok_or(SimError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        *self.cell_mut(x, y) = GridCell::new(kind, engine_initial_fuel);
        Ok(())
    }

    /// Cells with their coordinates, row-major
    pub fn iter(&self) -> impl Iterator<Item = (u8, u8, &GridCell)> {
        let width = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| ((i % width) as u8, (i / width) as u8, cell))
    }

    /// Number of cells of a kind
    pub fn count(&self, kind: TileKind) -> usize {
        self.cells.iter().filter(|c| c.kind == kind).count()
    }

    /// Fire (or cut) every fueled engine facing `dir`.
    ///
    /// Returns how many engines were switched; empty tanks are never lit.
    pub fn control_engines_in_direction(&mut self, dir: Dir, set: bool) -> u32 {
        let mut engaged = 0;
        for cell in &mut self.cells {
            if cell.kind == TileKind::Engine(dir) && cell.engine.fuel > 0.0 {
                cell.engine.firing = set;
                engaged += 1;
            }
        }
        engaged
    }

    /// Burn fuel in every firing engine
    pub fn update_engine_fuel(&mut self, dt: f32, burn_rate: f32) {
        for cell in &mut self.cells {
            if !cell.kind.is_engine() || !cell.engine.firing {
                continue;
            }
            cell.engine.fuel -= burn_rate * dt;
            if cell.engine.fuel <= 0.0 {
                cell.engine.fuel = 0.0;
                cell.engine.firing = false;
            }
        }
    }

    /// Fuel across all engine tiles
    pub fn total_fuel(&self) -> f32 {
        self.cells
            .iter()
            .filter(|c| c.kind.is_engine())
            .map(|c| c.engine.fuel)
            .sum()
    }

    /// Randomly blow holes in the hull. Returns the number of cells cleared.
    pub fn damage_ship<R: Rng>(&mut self, rng: &mut R, chance: f32) -> u32 {
        let mut cleared = 0;
        for cell in &mut self.cells {
            if rng.random::<f32>() < chance {
                *cell = GridCell::new(TileKind::Destroyed, 0.0);
                cleared += 1;
            }
        }
        cleared
    }
}

impl fmt::Display for GridSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1) as usize) {
            for cell in row {
                write!(f, "{}", cell.kind.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
