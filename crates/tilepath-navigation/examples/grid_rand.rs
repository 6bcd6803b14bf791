use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tilepath_navigation::{Grid, GridPoint, PixelPoint, find_path};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug shows the search counters.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // A 32x12 grid of 16px tiles, seeded so runs are reproducible.
    let mut grid = Grid::new(32, 12, 16)?;
    let mut rng = StdRng::seed_from_u64(2024);

    for round in 0..3 {
        grid.regenerate(0.25, &mut rng)?;

        let start = GridPoint::new(
            rng.random_range(0..grid.width() as i32),
            rng.random_range(0..grid.height() as i32),
        );
        let goal = GridPoint::new(
            rng.random_range(0..grid.width() as i32),
            rng.random_range(0..grid.height() as i32),
        );

        let path = find_path(&grid, start, goal);
        grid.mark_path(&path)?;

        println!("Round {}: {} -> {}, path length {}", round, start, goal, path.len());
        println!("{}", grid);
    }

    // Pixel lookup, as a renderer would use it for the cursor.
    let cursor = PixelPoint::new(100.0, 40.0);
    println!(
        "Pixel ({:.1}, {:.1}) lies in tile {}",
        cursor.x,
        cursor.y,
        grid.lookup_tile(cursor)
    );
    Ok(())
}
