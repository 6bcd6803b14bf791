//! Tile grid model and A* shortest-path search.
//!
//! A [`Grid`] holds floor and wall tiles plus a display-only mark overlay.
//! [`find_path`] runs A* with a Manhattan heuristic over its 4-connected floor tiles.

#![warn(missing_docs)]

pub mod astar;
pub mod error;
pub mod map;

pub use astar::{PathResult, find_path, find_path_detailed, manhattan_distance};
pub use error::GridError;
pub use map::{Grid, GridPoint, PixelPoint, Tile};
