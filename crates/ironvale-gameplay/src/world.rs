//! Tile-grid collision queries.
//!
//! The level subsystem owns the map and answers one question per tile through
//! [`TileQuery`]. [`WorldCollision`] builds rectangle queries on top of it and
//! [`Body`] uses those to move one axis at a time.

use ironvale_common::{TileCoord, WorldError, TILE_SIZE};
use serde::{Deserialize, Serialize};

use crate::geometry::{Vec2, AABB};

/// Tile lookup supplied by the level subsystem.
///
/// Implementations must report tiles outside the map as solid.
pub trait TileQuery {
    /// Checks if the tile at the given tile coordinates is solid.
    fn tile_is_solid(&self, tile_x: i32, tile_y: i32) -> bool;
}

impl<F> TileQuery for F
where
    F: Fn(i32, i32) -> bool,
{
    fn tile_is_solid(&self, tile_x: i32, tile_y: i32) -> bool {
        self(tile_x, tile_y)
    }
}

/// Rectangle queries against a tile lookup.
#[derive(Clone, Copy)]
pub struct WorldCollision<'a> {
    tiles: &'a dyn TileQuery,
    tile_size: f32,
}

impl std::fmt::Debug for WorldCollision<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldCollision")
            .field("tile_size", &self.tile_size)
            .finish_non_exhaustive()
    }
}

impl<'a> WorldCollision<'a> {
    /// Wraps a tile lookup with the given tile size.
    #[must_use]
    pub fn new(tiles: &'a dyn TileQuery, tile_size: f32) -> Self {
        Self { tiles, tile_size }
    }

    /// Wraps a tile lookup with the default tile size.
    #[must_use]
    pub fn with_default_tiles(tiles: &'a dyn TileQuery) -> Self {
        Self::new(tiles, TILE_SIZE)
    }

    /// Edge length of one tile.
    #[must_use]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Checks whether the pixel at `(x, y)` lies in a solid tile.
    #[must_use]
    pub fn is_solid_at(&self, x: f32, y: f32) -> bool {
        let tile = TileCoord::from_pixel(x, y, self.tile_size);
        self.tiles.tile_is_solid(tile.x, tile.y)
    }

    /// Checks whether a rectangle overlaps solid terrain.
    ///
    /// Samples the four corners and the four edge midpoints. The right and bottom
    /// samples sit one pixel inside the rectangle so a box resting flush against a
    /// tile is not reported as blocked.
    #[must_use]
    pub fn is_blocked(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        let left = x;
        let right = (x + width - 1.0).max(x);
        let top = y;
        let bottom = (y + height - 1.0).max(y);
        let mid_x = (left + right) / 2.0;
        let mid_y = (top + bottom) / 2.0;

        [
            (left, top),
            (right, top),
            (left, mid_y),
            (right, mid_y),
            (left, bottom),
            (right, bottom),
            (mid_x, top),
            (mid_x, bottom),
        ]
        .into_iter()
        .any(|(px, py)| self.is_solid_at(px, py))
    }

    /// [`WorldCollision::is_blocked`] for an [`AABB`].
    #[must_use]
    pub fn is_blocked_aabb(&self, aabb: &AABB) -> bool {
        self.is_blocked(aabb.min_x, aabb.min_y, aabb.width(), aabb.height())
    }
}

/// Tile map built from ASCII rows. `#` is solid, anything else is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    solid: Vec<bool>,
}

impl TileGrid {
    /// Creates an open grid of the given size.
    #[must_use]
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            solid: vec![false; width * height],
        }
    }

    /// Parses an ASCII layout, one string per row.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, WorldError> {
        let first = rows.first().ok_or(WorldError::EmptyLayout)?;
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(WorldError::EmptyLayout);
        }

        let mut solid = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let actual = line.chars().count();
            if actual != width {
                return Err(WorldError::RaggedRow {
                    row,
                    expected: width,
                    actual,
                });
            }
            solid.extend(line.chars().map(|c| c == '#'));
        }

        Ok(Self {
            width,
            height: rows.len(),
            solid,
        })
    }

    /// Width in tiles.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Marks a tile solid or open. Out-of-range coordinates are ignored.
    pub fn set_solid(&mut self, tile_x: i32, tile_y: i32, solid: bool) {
        if let Some(index) = self.index(tile_x, tile_y) {
            self.solid[index] = solid;
        }
    }

    /// Fills every tile in row `tile_y` and below.
    pub fn fill_floor(&mut self, tile_y: i32) {
        for y in tile_y.max(0)..self.height as i32 {
            for x in 0..self.width as i32 {
                self.set_solid(x, y, true);
            }
        }
    }

    fn index(&self, tile_x: i32, tile_y: i32) -> Option<usize> {
        let x = usize::try_from(tile_x).ok()?;
        let y = usize::try_from(tile_y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}

impl TileQuery for TileGrid {
    fn tile_is_solid(&self, tile_x: i32, tile_y: i32) -> bool {
        self.index(tile_x, tile_y).map_or(true, |i| self.solid[i])
    }
}

/// Outcome of a two-axis move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveResult {
    /// Horizontal movement was cut short.
    pub hit_wall: bool,
    /// Downward movement was cut short.
    pub hit_ground: bool,
    /// Upward movement was cut short.
    pub hit_ceiling: bool,
}

/// Physical body of a grounded actor: top-left position, size, velocity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner in world pixels.
    pub position: Vec2,
    /// Velocity in pixels per tick.
    pub velocity: Vec2,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Whether the last vertical move ended on a floor.
    pub on_ground: bool,
}

impl Body {
    /// Creates a resting body.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            width,
            height,
            on_ground: false,
        }
    }

    /// Bounding box at the current position.
    #[must_use]
    pub fn aabb(&self) -> AABB {
        AABB::from_rect(self.position.x, self.position.y, self.width, self.height)
    }

    /// Center of the body.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.position.x + self.width / 2.0,
            self.position.y + self.height / 2.0,
        )
    }

    fn blocked_at(&self, world: &WorldCollision<'_>, x: f32, y: f32) -> bool {
        world.is_blocked(x, y, self.width, self.height)
    }

    /// Moves horizontally by `dx`, stopping flush against terrain.
    ///
    /// Returns `true` if the move was cut short.
    pub fn move_horizontal(&mut self, world: &WorldCollision<'_>, dx: f32) -> bool {
        if dx == 0.0 {
            return false;
        }
        let x = self.position.x;
        let y = self.position.y;
        let target = x + dx;
        if !self.blocked_at(world, target, y) {
            self.position.x = target;
            return false;
        }

        let tile = world.tile_size();
        let flush = if dx > 0.0 {
            ((target + self.width) / tile).floor() * tile - self.width
        } else {
            ((target / tile).floor() + 1.0) * tile
        };
        let between = if dx > 0.0 {
            flush >= x && flush <= target
        } else {
            flush <= x && flush >= target
        };
        if between && !self.blocked_at(world, flush, y) {
            self.position.x = flush;
        }
        true
    }

    /// Moves vertically by `dy`, stopping flush against terrain.
    ///
    /// Returns `true` if the move was cut short.
    pub fn move_vertical(&mut self, world: &WorldCollision<'_>, dy: f32) -> bool {
        if dy == 0.0 {
            return false;
        }
        let x = self.position.x;
        let y = self.position.y;
        let target = y + dy;
        if !self.blocked_at(world, x, target) {
            self.position.y = target;
            return false;
        }

        let tile = world.tile_size();
        let flush = if dy > 0.0 {
            ((target + self.height) / tile).floor() * tile - self.height
        } else {
            ((target / tile).floor() + 1.0) * tile
        };
        let between = if dy > 0.0 {
            flush >= y && flush <= target
        } else {
            flush <= y && flush >= target
        };
        if between && !self.blocked_at(world, x, flush) {
            self.position.y = flush;
        }
        true
    }

    /// Applies gravity, clamps fall speed, then moves horizontally by `dx` and
    /// vertically by the resulting velocity.
    pub fn integrate(
        &mut self,
        world: &WorldCollision<'_>,
        dx: f32,
        gravity: f32,
        max_fall: f32,
    ) -> MoveResult {
        let mut result = MoveResult::default();

        self.velocity.y = (self.velocity.y + gravity).min(max_fall);

        result.hit_wall = self.move_horizontal(world, dx);

        let dy = self.velocity.y;
        let blocked = self.move_vertical(world, dy);
        if blocked {
            if dy > 0.0 {
                result.hit_ground = true;
            } else {
                result.hit_ceiling = true;
            }
            self.velocity.y = 0.0;
        }
        self.on_ground = result.hit_ground;

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> TileGrid {
        TileGrid::from_rows(&[
            "..........",
            "..........",
            "......#...",
            "......#...",
            "##########",
        ])
        .expect("valid layout")
    }

    #[test]
    fn test_grid_parsing() {
        let grid = arena();
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 5);
        assert!(grid.tile_is_solid(6, 2));
        assert!(!grid.tile_is_solid(5, 2));
        assert!(grid.tile_is_solid(0, 4));
    }

    #[test]
    fn test_ragged_layout_rejected() {
        let err = TileGrid::from_rows(&["...", ".."]).unwrap_err();
        assert_eq!(
            err,
            WorldError::RaggedRow {
                row: 1,
                expected: 3,
                actual: 2
            }
        );
        let empty: [&str; 0] = [];
        assert_eq!(TileGrid::from_rows(&empty).unwrap_err(), WorldError::EmptyLayout);
    }

    #[test]
    fn test_out_of_bounds_is_solid() {
        let grid = TileGrid::empty(4, 4);
        assert!(!grid.tile_is_solid(0, 0));
        assert!(grid.tile_is_solid(-1, 0));
        assert!(grid.tile_is_solid(0, -1));
        assert!(grid.tile_is_solid(4, 0));
        assert!(grid.tile_is_solid(0, 4));
    }

    #[test]
    fn test_is_blocked_samples_edges() {
        let grid = arena();
        let world = WorldCollision::with_default_tiles(&grid);

        // Resting flush on the floor is not blocked.
        assert!(!world.is_blocked(16.0, 32.0, 16.0, 32.0));
        // One pixel into the floor is.
        assert!(world.is_blocked(16.0, 33.0, 16.0, 32.0));
        // Right edge inside the pillar.
        assert!(world.is_blocked(81.0, 32.0, 16.0, 16.0));
        // Flush against the pillar.
        assert!(!world.is_blocked(80.0, 32.0, 16.0, 16.0));
        // Leaving the map is blocked.
        assert!(world.is_blocked(-4.0, 0.0, 16.0, 16.0));
    }

    #[test]
    fn test_closure_tile_query() {
        let floor = |_x: i32, y: i32| y >= 3;
        let world = WorldCollision::new(&floor, 16.0);
        assert!(world.is_blocked(0.0, 40.0, 16.0, 16.0));
        assert!(!world.is_blocked(0.0, 32.0, 16.0, 16.0));
    }

    #[test]
    fn test_body_lands_flush_on_floor() {
        let grid = arena();
        let world = WorldCollision::with_default_tiles(&grid);
        let mut body = Body::new(16.0, 20.0, 16.0, 32.0);

        let mut landed = false;
        for _ in 0..60 {
            landed |= body.integrate(&world, 0.0, 0.35, 10.0).hit_ground;
        }

        assert!(landed);
        assert!(body.on_ground);
        assert_eq!(body.position.y, 32.0);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_body_stops_at_wall() {
        let grid = arena();
        let world = WorldCollision::with_default_tiles(&grid);
        let mut body = Body::new(85.0, 32.0, 8.0, 16.0);

        let blocked = body.move_horizontal(&world, 5.0);
        assert!(blocked);
        assert_eq!(body.position.x, 88.0);
        assert!(!body.move_horizontal(&world, -5.0));
        assert_eq!(body.position.x, 83.0);
    }

    #[test]
    fn test_fall_speed_clamped() {
        let open = |_x: i32, _y: i32| false;
        let world = WorldCollision::new(&open, 16.0);
        let mut body = Body::new(0.0, 0.0, 16.0, 16.0);
        for _ in 0..100 {
            body.integrate(&world, 0.0, 0.35, 10.0);
        }
        assert_eq!(body.velocity.y, 10.0);
    }
}
