use anyhow::{Context, ensure};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Window geometry in pixels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "A Star Demo".to_string(),
            width: 1024,
            height: 480,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub tile_size_px: u32,
    /// Probability that a tile becomes a wall on each regeneration.
    pub wall_ratio: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            tile_size_px: 16,
            wall_ratio: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub grid: GridSettings,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Settings {
    /// Grid width in tiles: the number of whole tiles that fit the window.
    pub fn grid_width(&self) -> usize {
        (self.window.width / self.grid.tile_size_px) as usize
    }

    /// Grid height in tiles.
    pub fn grid_height(&self) -> usize {
        (self.window.height / self.grid.tile_size_px) as usize
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let tile = self.grid.tile_size_px;
        ensure!(tile > 0, "grid.tile_size_px must be positive");
        ensure!(
            tile <= self.window.width && tile <= self.window.height,
            "grid.tile_size_px ({}) exceeds the {}x{} window",
            tile,
            self.window.width,
            self.window.height
        );
        ensure!(
            (0.0..=1.0).contains(&self.grid.wall_ratio),
            "grid.wall_ratio ({}) must be within [0, 1]",
            self.grid.wall_ratio
        );
        Ok(())
    }
}

/// Loads settings from `path` (optional) overlaid with `TILEPATH_*` environment variables.
pub fn load_settings(path: &str) -> anyhow::Result<Settings> {
    info!("Attempting to load configuration from {}", path);

    let builder = Config::builder()
        .add_source(File::new(path, FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix("TILEPATH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    settings_from(builder).with_context(|| format!("failed to load settings from {}", path))
}

fn settings_from(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Settings> {
    let settings = builder
        .build()
        .and_then(|config| config.try_deserialize::<Settings>());

    match settings {
        Ok(settings) => {
            settings.validate()?;
            info!(?settings, "Successfully loaded configuration");
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e.into())
        }
    }
}
