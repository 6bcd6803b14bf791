use tilepath_navigation::{GridPoint, Grid, find_path_detailed};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // '.' = walkable, '#' = blocked. Row index is y.
    let mut grid = Grid::from_rows(
        &[
            "..........",
            ".##....##.",
            "....#.....",
            "..####.#..",
            ".....#.#..",
            ".###.#.##.",
            "...#......",
            ".#.#.###..",
            ".#......#.",
            "...###....",
        ],
        16,
    )?;

    let start = GridPoint::new(0, 0);
    let goal = GridPoint::new(9, 9);

    println!("Grid:\n{}", grid);
    println!("Start: {}, Goal: {}", start, goal);

    let result = find_path_detailed(&grid, start, goal);
    println!("{}", result);

    if result.is_success() {
        grid.mark_path(&result.path)?;
        println!("\nGrid with path:\n{}", grid);
    } else {
        println!("\nNo path found.");
    }
    Ok(())
}
