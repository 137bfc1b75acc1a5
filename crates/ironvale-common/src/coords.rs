//! Coordinate types for the tile grid.
//!
//! World positions are plain `f32` pixels; the grid is addressed by whole tiles.
//! Conversion always floors, so negative pixels land in negative tiles rather
//! than collapsing onto tile zero.

use serde::{Deserialize, Serialize};

/// Default edge length of one tile, in world pixels.
pub const TILE_SIZE: f32 = 16.0;

/// Tile coordinate (identifies a cell in the tile grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Converts a world pixel position to the tile containing it.
    ///
    /// `tile = floor(pixel / tile_size)` on both axes.
    #[must_use]
    pub fn from_pixel(x: f32, y: f32, tile_size: f32) -> Self {
        Self {
            x: (x / tile_size).floor() as i32,
            y: (y / tile_size).floor() as i32,
        }
    }

}
