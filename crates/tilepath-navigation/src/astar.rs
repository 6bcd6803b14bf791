/*

A* = f(n) = g(n) + h(n)

Where:
    n = a tile of the grid
    g(n) = number of steps from start to n
    h(n) = Manhattan distance from n to the goal
    f(n) = estimated length of the cheapest path through n

Initialize:
    - g(start) = 0, g(n) = infinity elsewhere
    - frontier holds (f(start), 0, start)

Loop:
    - pop the entry with lowest (f, g, position)
    - if its g is worse than the best known g(n), it is stale: drop it
    - if n is the goal, stop and walk the parent links back
    - for each walkable neighbor m of n (+x, -x, +y, -y):
        - if g(n) + 1 < g(m): record it, parent(m) = n, push (g(m) + h(m), g(m), m)

Entries are never removed from the frontier when a better cost is found; the
outdated copy is simply skipped when it surfaces.

*/

use core::fmt;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, warn};

use crate::map::{Grid, GridPoint};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Best-known cost of a tile the search has not reached.
const UNREACHED: u32 = u32::MAX;

/// Represents the result of an A* search with metadata.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathResult {
    /// The computed path from start to goal, inclusive. Empty if none was found.
    pub path: Vec<GridPoint>,
    /// The number of frontier entries expanded (stale entries excluded).
    pub nodes_explored: usize,
    /// The number of stale frontier entries discarded.
    pub stale_entries: usize,
}

impl PathResult {
    /// Creates a new PathResult for a successful search.
    pub fn success(path: Vec<GridPoint>, nodes_explored: usize, stale_entries: usize) -> Self {
        Self {
            path,
            nodes_explored,
            stale_entries,
        }
    }

    /// Creates a new PathResult for a failed search.
    pub fn failure(nodes_explored: usize, stale_entries: usize) -> Self {
        Self {
            path: Vec::new(),
            nodes_explored,
            stale_entries,
        }
    }

    /// Returns true if a path was found.
    pub fn is_success(&self) -> bool {
        !self.path.is_empty()
    }

    /// The number of tiles on the path, endpoints included.
    pub fn path_length(&self) -> usize {
        self.path.len()
    }

    /// Returns the path, empty if none was found.
    pub fn into_path(self) -> Vec<GridPoint> {
        self.path
    }
}

impl fmt::Display for PathResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_success() {
            write!(
                f,
                "PathResult {{ success: true, path_length: {}, nodes_explored: {}, stale_entries: {} }}",
                self.path_length(),
                self.nodes_explored,
                self.stale_entries
            )
        } else {
            write!(
                f,
                "PathResult {{ success: false, nodes_explored: {}, stale_entries: {} }}",
                self.nodes_explored, self.stale_entries
            )
        }
    }
}

/// Calculates the Manhattan distance between two grid points.
pub fn manhattan_distance(a: GridPoint, b: GridPoint) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

/// Frontier entry.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
struct State {
    f: u32,
    g: u32,
    position: GridPoint,
}

// `BinaryHeap` is a max-heap; every comparison is flipped so the lowest
// (f, g, position) pops first.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.g.cmp(&self.g))
            .then_with(|| other.position.cmp(&self.position))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Walks parent links from `goal` back to `start`.
///
/// Returns `None` if a link is missing or the chain is longer than the grid,
/// either of which means the search tables are inconsistent.
fn reconstruct_path(
    grid: &Grid,
    parents: &[Option<GridPoint>],
    start: GridPoint,
    goal: GridPoint,
) -> Option<Vec<GridPoint>> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        if path.len() > grid.total_tiles() {
            return None;
        }
        let previous = grid.index(current).and_then(|i| parents.get(i).copied().flatten())?;
        path.push(previous);
        current = previous;
    }
    path.reverse();
    Some(path)
}

/// Finds a shortest 4-directional path from `start` to `goal`.
///
/// The walkability of `start` and `goal` themselves is not checked: a search
/// from a wall tile still expands its walkable neighbors, while a wall goal
/// is only reachable when it equals `start`.
///
/// # Arguments
/// * `grid` - The grid to plan in.
/// * `start` - Starting tile.
/// * `goal` - Goal tile.
///
/// # Returns
/// * `Vec<GridPoint>` - The path including both endpoints, or an empty vector
///   if no path exists or an endpoint is outside the grid.
pub fn find_path(grid: &Grid, start: GridPoint, goal: GridPoint) -> Vec<GridPoint> {
    find_path_detailed(grid, start, goal).into_path()
}

/// Finds a shortest path like [`find_path`], also reporting search counters.
///
/// # Returns
/// * `PathResult` - The path (empty on failure) and exploration metadata.
pub fn find_path_detailed(grid: &Grid, start: GridPoint, goal: GridPoint) -> PathResult {
    let (Some(start_idx), true) = (grid.index(start), grid.contains(goal)) else {
        warn!(%start, %goal, "Search endpoint outside the grid");
        return PathResult::failure(0, 0);
    };

    let mut g_costs = grid.tile_buffer(UNREACHED);
    let mut parents: Vec<Option<GridPoint>> = grid.tile_buffer(None);
    g_costs[start_idx] = 0;

    let h = |p: GridPoint| manhattan_distance(p, goal);

    let mut frontier = BinaryHeap::new();
    frontier.push(State {
        f: h(start),
        g: 0,
        position: start,
    });

    let mut nodes_explored = 0;
    let mut stale_entries = 0;
    let mut found = false;

    while let Some(State { g, position, .. }) = frontier.pop() {
        let Some(current_idx) = grid.index(position) else {
            continue;
        };
        if g > g_costs[current_idx] {
            stale_entries += 1;
            continue;
        }
        nodes_explored += 1;

        if position == goal {
            found = true;
            break;
        }

        for neighbor in grid.neighbors(position) {
            let Some(neighbor_idx) = grid.index(neighbor) else {
                continue;
            };
            let tentative_g = g + 1;
            if tentative_g < g_costs[neighbor_idx] {
                g_costs[neighbor_idx] = tentative_g;
                parents[neighbor_idx] = Some(position);
                frontier.push(State {
                    f: tentative_g + h(neighbor),
                    g: tentative_g,
                    position: neighbor,
                });
            }
        }
    }

    if !found {
        debug!(%start, %goal, nodes_explored, stale_entries, "No path found");
        return PathResult::failure(nodes_explored, stale_entries);
    }

    match reconstruct_path(grid, &parents, start, goal) {
        Some(path) => {
            debug!(
                %start,
                %goal,
                nodes_explored,
                stale_entries,
                path_length = path.len(),
                "Path found"
            );
            PathResult::success(path, nodes_explored, stale_entries)
        }
        None => {
            warn!(%start, %goal, "Broken parent chain while reconstructing path");
            PathResult::failure(nodes_explored, stale_entries)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Tile;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::VecDeque;

    fn p(x: i32, y: i32) -> GridPoint {
        GridPoint::new(x, y)
    }

    /// Breadth-first step count from `start` to `goal`, expanding through
    /// `Grid::neighbors` exactly like the search does.
    fn bfs_distance(grid: &Grid, start: GridPoint, goal: GridPoint) -> Option<usize> {
        let mut dist = grid.tile_buffer(usize::MAX);
        let mut queue = VecDeque::new();
        dist[grid.index(start)?] = 0;
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            let d = dist[grid.index(current)?];
            if current == goal {
                return Some(d);
            }
            for n in grid.neighbors(current) {
                let ni = grid.index(n)?;
                if dist[ni] == usize::MAX {
                    dist[ni] = d + 1;
                    queue.push_back(n);
                }
            }
        }
        None
    }

    fn assert_valid_path(grid: &Grid, path: &[GridPoint], start: GridPoint, goal: GridPoint) {
        assert_eq!(path.first(), Some(&start), "Path start mismatch");
        assert_eq!(path.last(), Some(&goal), "Path goal mismatch");
        for pair in path.windows(2) {
            assert!(pair[0].is_adjacent(pair[1]), "{} -> {} is not a step", pair[0], pair[1]);
        }
        for &tile in &path[1..] {
            assert!(grid.is_walkable(tile).unwrap(), "{} is a wall", tile);
        }
    }

    #[test]
    fn test_manhattan_distance() {
        assert_eq!(manhattan_distance(p(0, 0), p(3, 4)), 7);
        assert_eq!(manhattan_distance(p(3, 4), p(0, 0)), 7);
        assert_eq!(manhattan_distance(p(-2, 1), p(2, -1)), 6);
    }

    #[test]
    fn test_open_grid_path_length() {
        let grid = Grid::new(4, 4, 1).unwrap();
        let path = find_path(&grid, p(0, 0), p(3, 3));
        assert_eq!(path.len(), 7);
        assert_valid_path(&grid, &path, p(0, 0), p(3, 3));
    }

    #[test]
    fn test_tie_break_prefers_lower_coordinates() {
        let grid = Grid::new(4, 4, 1).unwrap();
        let result = find_path_detailed(&grid, p(0, 0), p(3, 3));
        assert_eq!(
            result.path,
            vec![p(0, 0), p(0, 1), p(0, 2), p(0, 3), p(1, 3), p(2, 3), p(3, 3)]
        );
        assert_eq!(result.nodes_explored, 16);
        assert_eq!(result.stale_entries, 0);
    }

    #[test]
    fn test_simple_path_around_walls() {
        let grid = Grid::from_rows(
            &[
                "....#", //
                "##.#.", //
                ".....", //
                ".####", //
                ".....", //
            ],
            1,
        )
        .unwrap();

        let path = find_path(&grid, p(0, 0), p(4, 4));
        assert_eq!(
            path,
            vec![
                p(0, 0),
                p(1, 0),
                p(2, 0),
                p(2, 1),
                p(2, 2),
                p(1, 2),
                p(0, 2),
                p(0, 3),
                p(0, 4),
                p(1, 4),
                p(2, 4),
                p(3, 4),
                p(4, 4),
            ]
        );
    }

    #[test]
    fn test_blocked_row_has_no_path() {
        let grid = Grid::from_rows(&["...", "###", "..."], 1).unwrap();
        assert!(find_path(&grid, p(0, 0), p(2, 2)).is_empty());
    }

    #[test]
    fn test_blocked_column_has_no_path() {
        let grid = Grid::from_rows(&[".#.", ".#.", ".#."], 1).unwrap();
        let result = find_path_detailed(&grid, p(0, 0), p(2, 0));
        assert!(!result.is_success());
        // The whole left column is expanded before giving up.
        assert_eq!(result.nodes_explored, 3);
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = Grid::new(3, 3, 1).unwrap();
        assert_eq!(find_path(&grid, p(1, 1), p(1, 1)), vec![p(1, 1)]);

        let walled = Grid::from_rows(&["#"], 1).unwrap();
        assert_eq!(find_path(&walled, p(0, 0), p(0, 0)), vec![p(0, 0)]);
    }

    #[test]
    fn test_start_on_wall_still_searches() {
        let grid = Grid::from_rows(&["#.."], 1).unwrap();
        assert_eq!(find_path(&grid, p(0, 0), p(2, 0)), vec![p(0, 0), p(1, 0), p(2, 0)]);
    }

    #[test]
    fn test_isolated_wall_start_fails() {
        let grid = Grid::from_rows(&["##.", "#.."], 1).unwrap();
        let result = find_path_detailed(&grid, p(0, 0), p(2, 1));
        assert!(result.path.is_empty());
        assert_eq!(result.nodes_explored, 1);
    }

    #[test]
    fn test_goal_on_wall_is_unreachable() {
        let grid = Grid::from_rows(&["..#"], 1).unwrap();
        assert!(find_path(&grid, p(0, 0), p(2, 0)).is_empty());
    }

    #[test]
    fn test_endpoint_out_of_bounds() {
        let grid = Grid::new(3, 3, 1).unwrap();
        assert!(find_path(&grid, p(-1, 0), p(2, 2)).is_empty());
        assert!(find_path(&grid, p(0, 0), p(3, 2)).is_empty());
        assert_eq!(find_path_detailed(&grid, p(0, 0), p(0, 9)).nodes_explored, 0);
    }

    #[test]
    fn test_all_wall_grid() {
        let mut grid = Grid::new(5, 5, 1).unwrap();
        grid.regenerate(1.0, &mut StdRng::seed_from_u64(11)).unwrap();
        assert!(find_path(&grid, p(0, 0), p(4, 4)).is_empty());
        assert!(find_path(&grid, p(2, 2), p(2, 3)).is_empty());
        assert_eq!(find_path(&grid, p(3, 1), p(3, 1)), vec![p(3, 1)]);
    }

    #[test]
    fn test_all_floor_grid_matches_manhattan() {
        let mut grid = Grid::new(7, 5, 1).unwrap();
        grid.regenerate(0.0, &mut StdRng::seed_from_u64(11)).unwrap();
        let path = find_path(&grid, p(6, 0), p(1, 4));
        assert_eq!(path.len() as u32, manhattan_distance(p(6, 0), p(1, 4)) + 1);
    }

    #[test]
    fn test_search_ignores_marks() {
        let mut grid = Grid::from_rows(&["...", ".#.", "..."], 1).unwrap();
        let before = find_path(&grid, p(0, 0), p(2, 2));
        grid.mark_path(&before).unwrap();
        assert_eq!(find_path(&grid, p(0, 0), p(2, 2)), before);
    }

    #[test]
    fn test_detour_length() {
        let mut grid = Grid::new(5, 5, 1).unwrap();
        for y in 0..4 {
            grid.set_tile(p(2, y), Tile::Wall).unwrap();
        }
        let path = find_path(&grid, p(0, 0), p(4, 0));
        // Down to row 4, across, and back up.
        assert_eq!(path.len(), 13);
        assert_valid_path(&grid, &path, p(0, 0), p(4, 0));
    }

    #[test]
    fn test_matches_breadth_first_search_on_random_grids() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut grid = Grid::new(12, 9, 1).unwrap();

        for round in 0..60 {
            let ratio = [0.1, 0.25, 0.4][round % 3];
            grid.regenerate(ratio, &mut rng).unwrap();

            for _ in 0..8 {
                let start = p(rng.random_range(0..12), rng.random_range(0..9));
                let goal = p(rng.random_range(0..12), rng.random_range(0..9));
                let path = find_path(&grid, start, goal);

                match bfs_distance(&grid, start, goal) {
                    Some(d) => {
                        assert_eq!(path.len(), d + 1, "Non-optimal path {} -> {}", start, goal);
                        assert_valid_path(&grid, &path, start, goal);
                    }
                    None => assert!(path.is_empty(), "Path through walls {} -> {}", start, goal),
                }
            }
        }
    }

    #[test]
    fn test_repeated_queries_are_identical() {
        let mut grid = Grid::new(20, 12, 1).unwrap();
        grid.regenerate(0.2, &mut StdRng::seed_from_u64(42)).unwrap();
        let first = find_path_detailed(&grid, p(0, 0), p(19, 11));
        for _ in 0..5 {
            assert_eq!(find_path_detailed(&grid, p(0, 0), p(19, 11)), first);
        }
    }

    #[test]
    fn test_reconstruct_path_missing_parent() {
        let grid = Grid::new(3, 1, 1).unwrap();
        let mut parents = grid.tile_buffer(None);
        assert_eq!(reconstruct_path(&grid, &parents, p(0, 0), p(2, 0)), None);

        parents[2] = Some(p(1, 0));
        parents[1] = Some(p(0, 0));
        assert_eq!(
            reconstruct_path(&grid, &parents, p(0, 0), p(2, 0)),
            Some(vec![p(0, 0), p(1, 0), p(2, 0)])
        );
    }

    #[test]
    fn test_reconstruct_path_cycle() {
        let grid = Grid::new(3, 1, 1).unwrap();
        let mut parents = grid.tile_buffer(None);
        parents[1] = Some(p(2, 0));
        parents[2] = Some(p(1, 0));
        assert_eq!(reconstruct_path(&grid, &parents, p(0, 0), p(2, 0)), None);
    }

    #[test]
    fn test_frontier_ordering() {
        let entries = [(6, 2, p(0, 2)), (5, 3, p(4, 4)), (6, 1, p(3, 0)), (6, 1, p(1, 0))];
        let mut heap: BinaryHeap<State> = entries
            .into_iter()
            .map(|(f, g, position)| State { f, g, position })
            .collect();

        let order: Vec<GridPoint> = std::iter::from_fn(|| heap.pop().map(|s| s.position)).collect();
        assert_eq!(order, vec![p(4, 4), p(1, 0), p(3, 0), p(0, 2)]);
    }

    #[test]
    fn test_path_result_display() {
        let grid = Grid::from_rows(&["...", "#.#", "..."], 1).unwrap();
        let result = find_path_detailed(&grid, p(0, 0), p(2, 2));
        assert!(result.is_success());
        assert_eq!(result.path_length(), 5);
        assert!(result.nodes_explored > 0);
        let shown = format!("{}", result);
        assert!(shown.contains("success: true"));
        assert!(shown.contains("path_length: 5"));

        let blocked = Grid::from_rows(&[".#."], 1).unwrap();
        let failed = find_path_detailed(&blocked, p(0, 0), p(2, 0));
        assert_eq!(failed.path_length(), 0);
        assert!(format!("{}", failed).contains("success: false"));
    }
}
