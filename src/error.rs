use thiserror::Error;

/// Fatal errors raised while setting up the game or a round.
#[derive(Debug, Error, PartialEq)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("placed {placed} of {requested} obstacles before exhausting {attempts} attempts")]
    ObstaclePlacement {
        requested: usize,
        placed: usize,
        attempts: usize,
    },
}

/// Leaderboard persistence failures. These are recovered inside the store and
/// only ever show up in logs.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("leaderboard i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("leaderboard json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("leaderboard root is not an array")]
    NotAnArray,
}
