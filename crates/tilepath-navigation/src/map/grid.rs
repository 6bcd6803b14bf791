#![warn(missing_docs)]

use core::fmt;

use rand::Rng;
use tracing::debug;

use super::{GridPoint, PixelPoint};
use crate::error::GridError;

/// Axis-aligned steps in neighbor enumeration order: +x, -x, +y, -y.
///
/// Search tie-breaking depends on this order.
const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Occupancy state of a single tile.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tile {
    /// Walkable tile
    #[default]
    Floor = 0,
    /// Blocked tile
    Wall = 1,
}

impl Tile {
    /// Converts the Tile to its u8 representation
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Creates a Tile from a u8 value. Any non-zero value is a wall.
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Tile::Floor,
            _ => Tile::Wall,
        }
    }

    /// ASCII glyph used by [`Grid::from_rows`] and the `Display` impl.
    pub fn glyph(self) -> char {
        match self {
            Tile::Floor => '.',
            Tile::Wall => '#',
        }
    }

    /// Parses an ASCII glyph.
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(Tile::Floor),
            '#' => Some(Tile::Wall),
            _ => None,
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tile::Floor => write!(f, "Floor"),
            Tile::Wall => write!(f, "Wall"),
        }
    }
}

/// A rectangular grid of walkable and blocked tiles.
///
/// The shape is fixed at construction; only the contents change. Tiles are
/// stored row-major (`y * width + x`). A separate mark overlay records tiles
/// highlighted for display and has no influence on walkability.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "GridData"))]
pub struct Grid {
    /// Width of the grid in tiles
    width: usize,
    /// Height of the grid in tiles
    height: usize,
    /// Edge length of one tile in pixels
    tile_size_px: u32,
    tiles: Vec<Tile>,
    marks: Vec<bool>,
}

impl Grid {
    /// Creates a new all-floor Grid with the specified dimensions.
    ///
    /// # Arguments
    /// * `width` - Width of the grid in tiles
    /// * `height` - Height of the grid in tiles
    /// * `tile_size_px` - Edge length of a tile in pixels, used by [`Grid::lookup_tile`]
    ///
    /// # Returns
    /// * `Result<Self, GridError>` - The created Grid or an error if parameters are invalid
    pub fn new(width: usize, height: usize, tile_size_px: u32) -> Result<Self, GridError> {
        if tile_size_px == 0 {
            return Err(GridError::InvalidTileSize("Tile size must be non-zero"));
        }
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions("Width and height must be non-zero"));
        }
        if width > i32::MAX as usize || height > i32::MAX as usize {
            return Err(GridError::InvalidDimensions(
                "Width and height must fit in a grid coordinate",
            ));
        }
        let Some(total) = width.checked_mul(height) else {
            return Err(GridError::InvalidDimensions(
                "Grid dimensions too large, would cause overflow",
            ));
        };

        debug!(total, width, height, "Created grid");

        Ok(Grid {
            width,
            height,
            tile_size_px,
            tiles: vec![Tile::Floor; total],
            marks: vec![false; total],
        })
    }

    /// Builds a grid from ASCII rows, `.` for floor and `#` for wall.
    ///
    /// Row `i` of the input becomes `y = i`.
    pub fn from_rows(rows: &[&str], tile_size_px: u32) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut grid = Grid::new(width, height, tile_size_px)?;

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(GridError::InvalidDimensions("All rows must have the same length"));
            }
            for (x, glyph) in row.chars().enumerate() {
                let tile = Tile::from_glyph(glyph).ok_or(GridError::InvalidTile(glyph))?;
                grid.tiles[y * width + x] = tile;
            }
        }
        Ok(grid)
    }

    /// Width of the grid in tiles.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the grid in tiles.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Edge length of a tile in pixels.
    pub fn tile_size_px(&self) -> u32 {
        self.tile_size_px
    }

    /// Total number of tiles.
    pub fn total_tiles(&self) -> usize {
        self.tiles.len()
    }

    /// Returns true iff `0 <= x < width` and `0 <= y < height`.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Returns true if `p` lies inside the grid.
    pub fn contains(&self, p: GridPoint) -> bool {
        self.in_bounds(p.x, p.y)
    }

    /// Calculates the index in the tile vector for a grid point, if in bounds.
    pub(crate) fn index(&self, p: GridPoint) -> Option<usize> {
        if self.contains(p) {
            Some(p.y as usize * self.width + p.x as usize)
        } else {
            None
        }
    }

    /// Gets the tile at a grid coordinate.
    ///
    /// # Returns
    /// * `Result<Tile, GridError>` - The tile or an error if out of bounds
    pub fn tile(&self, p: GridPoint) -> Result<Tile, GridError> {
        self.index(p)
            .map(|i| self.tiles[i])
            .ok_or(GridError::OutOfBounds(p))
    }

    /// Sets the tile at a grid coordinate.
    pub fn set_tile(&mut self, p: GridPoint, tile: Tile) -> Result<(), GridError> {
        let i = self.index(p).ok_or(GridError::OutOfBounds(p))?;
        self.tiles[i] = tile;
        Ok(())
    }

    /// Returns whether the tile at `p` is floor.
    ///
    /// # Returns
    /// * `Result<bool, GridError>` - Walkability or an error if out of bounds
    pub fn is_walkable(&self, p: GridPoint) -> Result<bool, GridError> {
        Ok(self.tile(p)? == Tile::Floor)
    }

    /// Returns the in-bounds, walkable 4-neighbors of `p` in the order
    /// +x, -x, +y, -y.
    pub fn neighbors(&self, p: GridPoint) -> Vec<GridPoint> {
        let mut out = Vec::with_capacity(DIRECTIONS.len());
        for (dx, dy) in DIRECTIONS {
            let n = p.offset(dx, dy);
            // Bounds first: `is_walkable` must never see an outside point here.
            if self.contains(n) && matches!(self.is_walkable(n), Ok(true)) {
                out.push(n);
            }
        }
        out
    }

    /// Re-randomizes every tile and clears the mark overlay.
    ///
    /// Each tile independently becomes a wall with probability `wall_ratio`.
    /// A ratio outside `[0, 1]` is rejected and the grid is left untouched.
    ///
    /// # Arguments
    /// * `wall_ratio` - Probability in `[0, 1]` that a tile becomes a wall
    /// * `rng` - Random source; pass a seeded generator for reproducible grids
    pub fn regenerate(&mut self, wall_ratio: f64, rng: &mut impl Rng) -> Result<(), GridError> {
        if !(0.0..=1.0).contains(&wall_ratio) {
            return Err(GridError::InvalidWallRatio(wall_ratio));
        }

        let mut walls = 0usize;
        for tile in self.tiles.iter_mut() {
            *tile = if rng.random_bool(wall_ratio) {
                walls += 1;
                Tile::Wall
            } else {
                Tile::Floor
            };
        }
        self.clear_marks();

        debug!(wall_ratio, walls, total = self.tiles.len(), "Regenerated grid");
        Ok(())
    }

    /// Marks a tile for display.
    pub fn mark(&mut self, p: GridPoint) -> Result<(), GridError> {
        let i = self.index(p).ok_or(GridError::OutOfBounds(p))?;
        self.marks[i] = true;
        Ok(())
    }

    /// Marks every tile of `path`.
    pub fn mark_path(&mut self, path: &[GridPoint]) -> Result<(), GridError> {
        path.iter().try_for_each(|&p| self.mark(p))
    }

    /// Returns whether a tile is marked.
    pub fn is_marked(&self, p: GridPoint) -> Result<bool, GridError> {
        self.index(p)
            .map(|i| self.marks[i])
            .ok_or(GridError::OutOfBounds(p))
    }

    /// Number of marked tiles.
    pub fn marked_count(&self) -> usize {
        self.marks.iter().filter(|&&m| m).count()
    }

    /// Removes every mark.
    pub fn clear_marks(&mut self) {
        self.marks.fill(false);
    }

    /// Clears the entire grid, setting all tiles to Floor and removing marks.
    pub fn clear(&mut self) {
        self.tiles.fill(Tile::Floor);
        self.clear_marks();
    }

    /// Gets a reference to the underlying row-major tile data.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Allocates a per-tile buffer of this grid's size, filled with `fill`.
    ///
    /// Indexed the same way as the tile data.
    pub fn tile_buffer<T: Clone>(&self, fill: T) -> Vec<T> {
        vec![fill; self.tiles.len()]
    }

    /// Maps a pixel position to the tile containing it, clamped to the grid.
    pub fn lookup_tile(&self, pixel: PixelPoint) -> GridPoint {
        let size = self.tile_size_px as f32;
        let x = (pixel.x / size).floor() as i32;
        let y = (pixel.y / size).floor() as i32;
        GridPoint::new(
            x.clamp(0, self.width as i32 - 1),
            y.clamp(0, self.height as i32 - 1),
        )
    }
}

/// Unchecked wire form of a [`Grid`]; validated on the way in.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct GridData {
    width: usize,
    height: usize,
    tile_size_px: u32,
    tiles: Vec<Tile>,
    marks: Vec<bool>,
}

#[cfg(feature = "serde")]
impl TryFrom<GridData> for Grid {
    type Error = GridError;

    fn try_from(data: GridData) -> Result<Self, Self::Error> {
        let mut grid = Grid::new(data.width, data.height, data.tile_size_px)?;
        if data.tiles.len() != grid.tiles.len() || data.marks.len() != grid.marks.len() {
            return Err(GridError::InvalidDimensions(
                "Tile and mark data must hold width * height entries",
            ));
        }
        grid.tiles = data.tiles;
        grid.marks = data.marks;
        Ok(grid)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.tiles.chunks(self.width).enumerate() {
            for (x, tile) in row.iter().enumerate() {
                if self.marks[y * self.width + x] {
                    write!(f, "*")?;
                } else {
                    write!(f, "{}", tile.glyph())?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
