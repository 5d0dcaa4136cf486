use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::GameConfig;
use crate::error::LeaderboardError;

pub const DEFAULT_NAME: &str = "Player";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub score: u32,
}

impl Entry {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// True when `score` earns a slot: the board has room, or the score beats
/// the last-ranked entry.
pub fn qualifies(score: u32, board: &[Entry], capacity: usize) -> bool {
    if board.len() < capacity {
        return true;
    }
    match board.last() {
        Some(last) => score > last.score,
        None => true,
    }
}

/// Trims whitespace, caps the length in characters, and substitutes the
/// placeholder for an empty name.
pub fn normalize_name(raw: &str, max_len: usize) -> String {
    let trimmed: String = raw.trim().chars().take(max_len).collect();
    let trimmed = trimmed.trim_end();
    if trimmed.is_empty() {
        DEFAULT_NAME.chars().take(max_len).collect()
    } else {
        trimmed.to_string()
    }
}

/// Orders by descending score. Stable, so earlier entries keep precedence
/// among equal scores.
fn rank(entries: &mut Vec<Entry>, capacity: usize) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(capacity);
}

/// JSON-file backed leaderboard. Never fails outward: unreadable data loads
/// as an empty board and failed writes are logged.
#[derive(Clone, Debug)]
pub struct LeaderboardStore {
    path: PathBuf,
    capacity: usize,
    max_name_length: usize,
}

impl LeaderboardStore {
    pub fn new(path: impl Into<PathBuf>, capacity: usize, max_name_length: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
            max_name_length,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.leaderboard_path.clone(),
            config.leaderboard_capacity,
            config.max_name_length,
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn load(&self) -> Vec<Entry> {
        match self.try_load() {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "ignoring leaderboard: {err}");
                Vec::new()
            }
        }
    }

    pub fn qualifies(&self, score: u32, board: &[Entry]) -> bool {
        qualifies(score, board, self.capacity)
    }

    /// Appends a result, re-ranks and persists. Returns the new board.
    pub fn add_entry(&self, name: &str, score: u32) -> Vec<Entry> {
        let mut entries = self.load();
        let entry = Entry::new(normalize_name(name, self.max_name_length), score);
        tracing::info!(name = %entry.name, score, "leaderboard entry added");
        entries.push(entry);
        rank(&mut entries, self.capacity);

        if let Err(err) = self.try_save(&entries) {
            tracing::warn!(path = %self.path.display(), "leaderboard not saved: {err}");
        }
        entries
    }

    fn try_load(&self) -> Result<Vec<Entry>, LeaderboardError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path)?;
        let root: Value = serde_json::from_str(&text)?;
        let Value::Array(items) = root else {
            return Err(LeaderboardError::NotAnArray);
        };

        let mut entries: Vec<Entry> = items.into_iter().filter_map(parse_entry).collect();
        rank(&mut entries, self.capacity);
        Ok(entries)
    }

    fn try_save(&self, entries: &[Entry]) -> Result<(), LeaderboardError> {
        let text = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

/// Accepts only `{ "name": string, "score": non-negative integer }`.
fn parse_entry(value: Value) -> Option<Entry> {
    let obj = value.as_object()?;
    let name = obj.get("name")?.as_str()?;
    let score = obj.get("score")?.as_u64()?;
    let score = u32::try_from(score).ok()?;
    Some(Entry::new(name, score))
}
