mod graphics; // tile rendering and the frame loop
mod session; // regenerate + search + mark, independent of the window
mod settings; // `config`-backed settings

use anyhow::Context;
use macroquad::Window;
use tracing::info;
use tracing_subscriber::EnvFilter;

use session::DemoSession;
use settings::{DEFAULT_CONFIG_PATH, load_settings};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("tilepath starting...");

    let settings = load_settings(DEFAULT_CONFIG_PATH)?;
    let session = DemoSession::from_settings(&settings).context("failed to set up session")?;

    // Blocks until the window closes.
    Window::from_config(
        graphics::window_conf(&settings),
        graphics::run_visualization_loop(session),
    );

    info!("tilepath exiting.");
    Ok(())
}
