use macroquad::prelude::*;
use tilepath_navigation::{Grid, GridPoint, PixelPoint, Tile};
use tracing::{error, info};

use crate::session::{DemoSession, PathQuery};
use crate::settings::Settings;

const FLOOR_COLOR: Color = Color::new(0.0, 100.0 / 255.0, 45.0 / 255.0, 1.0);
const WALL_COLOR: Color = Color::new(100.0 / 255.0, 0.0, 45.0 / 255.0, 1.0);
const MARK_COLOR: Color = Color::new(20.0 / 255.0, 20.0 / 255.0, 20.0 / 255.0, 1.0);
const OUTLINE_COLOR: Color = Color::new(50.0 / 255.0, 50.0 / 255.0, 50.0 / 255.0, 1.0);
const STATUS_FONT_SIZE: f32 = 20.0;

// Function to configure the macroquad window
pub fn window_conf(settings: &Settings) -> Conf {
    Conf {
        window_title: settings.window.title.clone(),
        window_width: settings.window.width as i32,
        window_height: settings.window.height as i32,
        // Mouse coordinates must stay in the same pixels the tiles are laid out in.
        high_dpi: false,
        window_resizable: false,
        ..Default::default()
    }
}

fn tile_color(grid: &Grid, p: GridPoint) -> Color {
    if matches!(grid.is_marked(p), Ok(true)) {
        return MARK_COLOR;
    }
    match grid.tile(p) {
        Ok(Tile::Wall) => WALL_COLOR,
        _ => FLOOR_COLOR,
    }
}

pub fn draw_grid(grid: &Grid) {
    let size = grid.tile_size_px() as f32;
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            let (px, py) = (x as f32 * size, y as f32 * size);
            draw_rectangle(px, py, size, size, tile_color(grid, GridPoint::new(x, y)));
            draw_rectangle_lines(px, py, size, size, 1.0, OUTLINE_COLOR);
        }
    }
}

fn status_line(hovered: GridPoint, last: Option<&PathQuery>) -> String {
    match last {
        None => format!("Tile {}  |  click to generate a grid and search", hovered),
        Some(q) if q.result.is_success() => format!(
            "Tile {}  |  {} -> {}: {} tiles, {} expanded",
            hovered,
            q.start,
            q.goal,
            q.result.path_length(),
            q.result.nodes_explored
        ),
        Some(q) => format!(
            "Tile {}  |  {} -> {}: no path, {} expanded",
            hovered, q.start, q.goal, q.result.nodes_explored
        ),
    }
}

pub async fn run_visualization_loop(mut session: DemoSession) {
    info!("Visualization loop starting...");

    loop {
        if is_key_pressed(KeyCode::Escape) {
            info!("Escape pressed, closing visualization.");
            break;
        }

        if is_mouse_button_released(MouseButton::Left) {
            if let Err(e) = session.trigger() {
                error!("Path query failed: {:#}", e);
            }
        }

        let (mouse_x, mouse_y) = mouse_position();
        let hovered = session.grid().lookup_tile(PixelPoint::new(mouse_x, mouse_y));

        clear_background(BLACK);
        draw_grid(session.grid());
        draw_text(
            &status_line(hovered, session.last_query()),
            10.0,
            20.0,
            STATUS_FONT_SIZE,
            WHITE,
        );

        next_frame().await
    }
}
