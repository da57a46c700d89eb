//! Data structures mirroring the SQLite tables.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted leaderboard row, as exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: i64,
}

#[cfg(test)]
impl ScoreEntry {
    pub fn new(name: &str, score: i64) -> Self {
        Self {
            name: name.to_string(),
            score,
        }
    }
}

/// Nearest entry above a given score, with that entry's own rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rival {
    pub name: String,
    pub score: i64,
    pub rank: u32,
}
