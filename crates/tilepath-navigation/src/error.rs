//! This module defines the error types used by the `tilepath-navigation` crate.

#![warn(missing_docs)]

use crate::map::GridPoint;

/// Error type for grid operations.
///
/// "No path exists" is not an error: searches report it as an empty path.
/// These variants cover invalid construction parameters and accesses that
/// fall outside the grid.
#[derive(Debug, PartialEq)]
pub enum GridError {
    /// Error for invalid grid dimensions.
    /// This variant is returned when width or height is zero, the tile count
    /// would overflow, or ASCII rows are empty or ragged.
    InvalidDimensions(&'static str),
    /// Error for an invalid tile size.
    /// This variant is returned when the pixel size of a tile is zero.
    InvalidTileSize(&'static str),
    /// Error for a wall ratio outside `[0, 1]`.
    InvalidWallRatio(f64),
    /// Error for an unrecognized glyph when parsing ASCII rows.
    InvalidTile(char),
    /// Error for out-of-bounds access.
    /// This variant is returned when attempting to access tiles outside the grid.
    OutOfBounds(GridPoint),
}

impl core::fmt::Display for GridError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GridError::InvalidDimensions(msg) => write!(f, "Invalid grid dimensions: {}", msg),
            GridError::InvalidTileSize(msg) => write!(f, "Invalid tile size: {}", msg),
            GridError::InvalidWallRatio(ratio) => {
                write!(f, "Invalid wall ratio: {} is not within [0, 1]", ratio)
            }
            GridError::InvalidTile(glyph) => write!(f, "Invalid tile glyph: {:?}", glyph),
            GridError::OutOfBounds(p) => {
                write!(f, "Grid access out of bounds: ({}, {})", p.x, p.y)
            }
        }
    }
}

impl core::error::Error for GridError {}
