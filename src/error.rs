//! Error type for the recoverable edges of the simulation
//!
//! Per-tick simulation functions never fail. Errors only come from data that
//! enters from outside: tuning files, ship templates and player tile edits.

use std::path::PathBuf;

/// Errors surfaced by loading configuration or editing the ship grid
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Template has more glyphs than the grid has cells
    #[error("ship template has {glyphs} tiles but the grid only holds {capacity}")]
    TemplateOverflow { glyphs: usize, capacity: usize },

    /// Template contains a glyph that isn't a tile
    #[error("unknown tile glyph {glyph:?} at template offset {offset}")]
    UnknownTile { glyph: char, offset: usize },

    /// Grid coordinate outside the ship
    #[error("tile ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u8,
        height: u8,
    },

    /// Grid dimensions that can't back a ship
    #[error("invalid grid size {width}x{height}")]
    InvalidGridSize { width: usize, height: usize },

    /// A tuning value outside the range the simulation can run with
    #[error("tuning field {field} out of range: {value}")]
    InvalidTuning { field: &'static str, value: f32 },

    /// Failed to parse a tuning or settings document
    #[error("parse error in {what}: {source}")]
    Parse {
        what: String,
        source: serde_json::Error,
    },

    /// Failed to read a config file
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
