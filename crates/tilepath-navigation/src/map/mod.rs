//! Grid-related functionality for navigation.
//!
//! This module provides the tile grid searched by [`crate::astar`] and the
//! point types used to address it.

pub mod grid;
pub mod point_types;

pub use grid::{Grid, Tile};
pub use point_types::{GridPoint, PixelPoint};
