use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GameError;
use crate::grid::{Cell, GridSize};
use crate::obstacles;

/// Environment variable pointing at an optional JSON config file.
pub const CONFIG_ENV: &str = "SNAKE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "snake_config.json";

/// Every tunable of the game. Missing keys in the config file fall back to
/// the defaults below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side of one grid cell in pixels.
    pub cell_size: u32,
    /// Play area width in pixels.
    pub play_width: u32,
    /// Play area height in pixels, excluding the score panel.
    pub play_height: u32,
    /// Score panel height in pixels, drawn above the play area.
    pub panel_height: u32,
    pub initial_length: usize,
    /// Simulation ticks per second at round start.
    pub initial_tick_rate: f32,
    pub max_tick_rate: f32,
    pub tick_rate_increment: f32,
    /// Cadence of every screen that is not active play.
    pub ui_tick_rate: f32,
    pub score_per_food: u32,
    pub obstacle_count: usize,
    /// Chebyshev radius kept free of obstacles around the starting head.
    pub safety_radius: i32,
    /// Random draws the obstacle generator may spend before giving up.
    pub obstacle_attempt_cap: usize,
    pub leaderboard_capacity: usize,
    pub max_name_length: usize,
    pub leaderboard_path: PathBuf,
    pub initial_volume: f32,
    pub volume_step: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cell_size: 20,
            play_width: 800,
            play_height: 600,
            panel_height: 60,
            initial_length: 1,
            initial_tick_rate: 8.0,
            max_tick_rate: 50.0,
            tick_rate_increment: 0.5,
            ui_tick_rate: 15.0,
            score_per_food: 10,
            obstacle_count: 10,
            safety_radius: 3,
            obstacle_attempt_cap: 100_000,
            leaderboard_capacity: 10,
            max_name_length: 10,
            leaderboard_path: PathBuf::from("leaderboard.json"),
            initial_volume: 0.5,
            volume_step: 0.1,
        }
    }
}

impl GameConfig {
    /// Reads the config file at `path`. A missing file yields the defaults;
    /// anything unreadable or invalid is an error.
    pub fn load(path: &Path) -> Result<Self, GameError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|err| {
            GameError::InvalidConfig(format!("cannot read {}: {err}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|err| {
            GameError::InvalidConfig(format!("cannot parse {}: {err}", path.display()))
        })?;
        config.validate()?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn grid(&self) -> GridSize {
        let cell = self.cell_size.max(1);
        GridSize::new((self.play_width / cell) as i32, (self.play_height / cell) as i32)
    }

    pub fn screen_width(&self) -> f32 {
        self.play_width as f32
    }

    pub fn screen_height(&self) -> f32 {
        (self.panel_height + self.play_height) as f32
    }

    /// Snake body at round start: head at grid center, tail trailing left.
    /// The head is the first element.
    pub fn start_body(&self) -> Vec<Cell> {
        let grid = self.grid();
        let head = grid.center();
        (0..self.initial_length as i32)
            .map(|i| Cell::new(head.x - i, head.y))
            .collect()
    }

    pub fn validate(&self) -> Result<(), GameError> {
        let invalid = |msg: String| Err(GameError::InvalidConfig(msg));

        if self.cell_size == 0 {
            return invalid("cell_size must be > 0".into());
        }
        let grid = self.grid();
        if grid.width < 1 || grid.height < 1 {
            return invalid(format!(
                "play area {}x{} holds no {}px cell",
                self.play_width, self.play_height, self.cell_size
            ));
        }
        if !(self.initial_tick_rate > 0.0) || self.max_tick_rate < self.initial_tick_rate {
            return invalid(format!(
                "tick rates must satisfy 0 < initial ({}) <= max ({})",
                self.initial_tick_rate, self.max_tick_rate
            ));
        }
        if self.tick_rate_increment < 0.0 {
            return invalid("tick_rate_increment must be >= 0".into());
        }
        if !(self.ui_tick_rate > 0.0) {
            return invalid("ui_tick_rate must be > 0".into());
        }
        if self.leaderboard_capacity == 0 || self.max_name_length == 0 {
            return invalid("leaderboard_capacity and max_name_length must be > 0".into());
        }
        if self.initial_length == 0 || self.initial_length as i32 > grid.width / 2 + 1 {
            return invalid(format!(
                "initial_length {} does not fit a grid {} cells wide",
                self.initial_length, grid.width
            ));
        }
        if !(0.0..=1.0).contains(&self.initial_volume) || self.volume_step <= 0.0 {
            return invalid("initial_volume must be in [0, 1] and volume_step > 0".into());
        }

        let body = self.start_body();
        let available = obstacles::available_cells(grid, &body, self.safety_radius);
        if self.obstacle_count > available {
            return invalid(format!(
                "{} obstacles requested but only {available} cells lie outside the safety zone",
                self.obstacle_count
            ));
        }
        Ok(())
    }
}

/// Config path from the environment, falling back to the working directory.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
