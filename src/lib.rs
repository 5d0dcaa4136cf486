//! Grid snake with a menu shell, a persistent leaderboard and three arena
//! variants (walled, borderless, obstacles).
//!
//! The game core (`sim`, `obstacles`, `leaderboard`, `screens`, `app`) runs
//! headless; `presentation` is the macroquad front end driven by `main.rs`.

pub mod app;
pub mod config;
pub mod error;
pub mod grid;
pub mod input;
pub mod leaderboard;
pub mod menu;
pub mod obstacles;
pub mod presentation;
pub mod screens;
pub mod sim;

pub use app::{App, AppState, Clip, Effect};
pub use config::GameConfig;
pub use error::{GameError, LeaderboardError};
pub use grid::{Cell, Direction, GridSize};
pub use leaderboard::{Entry, LeaderboardStore};
pub use sim::{Collision, GameMode, Simulation, TickOutcome};
