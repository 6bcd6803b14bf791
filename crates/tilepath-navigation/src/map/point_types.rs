use core::fmt;

/// Represents a point in grid coordinates (tile indices).
///
/// Coordinates are signed so that candidates one step past an edge can be
/// formed and then rejected by a bounds check.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPoint {
    /// The x-coordinate (column index) in the grid.
    pub x: i32,
    /// The y-coordinate (row index) in the grid.
    pub y: i32,
}

impl GridPoint {
    /// Creates a new `GridPoint`.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offsets this point by `(dx, dy)`.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Returns true if `other` differs by exactly one unit along exactly one axis.
    pub fn is_adjacent(self, other: GridPoint) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }
}

impl From<(i32, i32)> for GridPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Represents a point in screen coordinates (pixels).
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct PixelPoint {
    /// The x-coordinate in pixels.
    pub x: f32,
    /// The y-coordinate in pixels.
    pub y: f32,
}

impl PixelPoint {
    /// Creates a new `PixelPoint`.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
