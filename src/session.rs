use anyhow::Context;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tilepath_navigation::{Grid, GridPoint, PathResult, find_path_detailed};
use tracing::info;

use crate::settings::Settings;

/// One regenerate-and-search round.
#[derive(Debug, Clone, PartialEq)]
pub struct PathQuery {
    pub start: GridPoint,
    pub goal: GridPoint,
    pub result: PathResult,
}

/// Session driven by the standard seedable generator, as the visualizer runs it.
pub type DemoSession = Session<StdRng>;

/// The grid shown on screen plus the random source that drives it.
///
/// Every trigger picks two random tiles, regenerates the grid and marks the
/// path between them. Nothing here touches the window, so the logic is
/// testable headless.
pub struct Session<R: Rng> {
    grid: Grid,
    rng: R,
    wall_ratio: f64,
    last_query: Option<PathQuery>,
}

impl Session<StdRng> {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let grid = Grid::new(
            settings.grid_width(),
            settings.grid_height(),
            settings.grid.tile_size_px,
        )
        .context("failed to create grid")?;

        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        info!(
            width = grid.width(),
            height = grid.height(),
            seed = ?settings.seed,
            "Session created"
        );
        Ok(Self::new(grid, settings.grid.wall_ratio, rng))
    }
}

impl<R: Rng> Session<R> {
    pub fn new(grid: Grid, wall_ratio: f64, rng: R) -> Self {
        Self {
            grid,
            rng,
            wall_ratio,
            last_query: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn last_query(&self) -> Option<&PathQuery> {
        self.last_query.as_ref()
    }

    fn random_tile(&mut self) -> GridPoint {
        GridPoint::new(
            self.rng.random_range(0..self.grid.width() as i32),
            self.rng.random_range(0..self.grid.height() as i32),
        )
    }

    /// Picks new endpoints, regenerates the grid, searches and marks the path.
    ///
    /// Endpoints are drawn before regeneration and independently of wall
    /// placement, so either may land on a wall.
    pub fn trigger(&mut self) -> anyhow::Result<&PathQuery> {
        let start = self.random_tile();
        let goal = self.random_tile();

        self.grid
            .regenerate(self.wall_ratio, &mut self.rng)
            .context("failed to regenerate grid")?;

        let result = find_path_detailed(&self.grid, start, goal);
        self.grid
            .mark_path(&result.path)
            .context("path left the grid")?;

        info!(
            %start,
            %goal,
            path_length = result.path_length(),
            nodes_explored = result.nodes_explored,
            "Path query finished"
        );

        Ok(self.last_query.insert(PathQuery { start, goal, result }))
    }
}
