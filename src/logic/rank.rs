//! Live rank and rival resolution over a leaderboard snapshot.
//!
//! Both functions are total: any score, any collection (including an empty
//! one). Fetching the snapshot is the caller's business.

use crate::database::models::{Rival, ScoreEntry};

/// 1 + number of entries strictly above `score`. Ties share the better rank.
pub fn rank(score: i64, entries: &[ScoreEntry]) -> u32 {
    let above = entries.iter().filter(|entry| entry.score > score).count();
    u32::try_from(above).unwrap_or(u32::MAX - 1) + 1
}

/// The entry with the smallest score still strictly above `score`, ranked
/// against the whole collection. `None` when nobody is ahead.
pub fn find_rival(score: i64, entries: &[ScoreEntry]) -> Option<Rival> {
    let target = entries
        .iter()
        .filter(|entry| entry.score > score)
        .min_by_key(|entry| entry.score)?;

    Some(Rival {
        name: target.name.clone(),
        score: target.score,
        rank: rank(target.score, entries),
    })
}

/// Tracks the displayed rank and reports improvements.
#[derive(Debug, Clone)]
pub struct RankTracker {
    current: u32,
}

impl RankTracker {
    pub fn new() -> Self {
        Self { current: 1 }
    }

    /// Records `rank`, returning `(from, to)` when it improved.
    pub fn observe(&mut self, rank: u32) -> Option<(u32, u32)> {
        let from = self.current;
        self.current = rank;
        (rank < from).then_some((from, rank))
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }
}

impl Default for RankTracker {
    fn default() -> Self {
        Self::new()
    }
}
