//! Best-effort leaderboard service on top of a `ScoreStore`.
//!
//! Invalid submissions are rejected before the store is touched. Storage
//! failures never propagate: reads degrade to an empty result and writes to
//! `SubmitStatus::Dropped`, so gameplay is never blocked by the backend.

use crate::database::models::{Rival, ScoreEntry};
use crate::database::store::ScoreStore;
use crate::logic::rank;
use crate::models::settings::LeaderboardConfig;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("name is empty")]
    EmptyName,
    #[error("name is longer than {max} characters")]
    NameTooLong { max: usize },
    #[error("score must be a non-negative integer")]
    InvalidScore,
}

/// A validated submission, ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub score: i64,
}

impl Submission {
    /// Trims and upper-cases `name`, then checks both fields.
    pub fn parse(name: &str, score: i64, name_max_len: usize) -> Result<Self, SubmitError> {
        let name = name.trim().to_uppercase();
        if name.is_empty() {
            return Err(SubmitError::EmptyName);
        }
        if name.chars().count() > name_max_len {
            return Err(SubmitError::NameTooLong { max: name_max_len });
        }
        if score < 0 {
            return Err(SubmitError::InvalidScore);
        }
        Ok(Self { name, score })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    Stored,
    /// Valid, but the store failed; already logged.
    Dropped,
}

pub struct Leaderboard<S> {
    store: S,
    config: LeaderboardConfig,
}

impl<S: ScoreStore> Leaderboard<S> {
    pub fn new(store: S, config: LeaderboardConfig) -> Self {
        Self { store, config }
    }

    /// Missing or non-positive limits fall back to the default; anything
    /// else is capped at the configured maximum.
    pub fn clamp_limit(&self, requested: Option<i64>) -> u32 {
        let max = self.config.max_limit.max(1);
        match requested {
            Some(limit) if limit > 0 => u32::try_from(limit).unwrap_or(max).min(max),
            _ => self.config.default_limit.clamp(1, max),
        }
    }

    pub async fn top_scores(&self, limit: Option<i64>) -> Vec<ScoreEntry> {
        let limit = self.clamp_limit(limit);
        match self.store.top_scores(limit).await {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("DB: failed to read top scores: {}", e);
                Vec::new()
            }
        }
    }

    /// Full collection used for rank and rival resolution.
    pub async fn snapshot(&self) -> Vec<ScoreEntry> {
        match self.store.all_scores().await {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("DB: failed to read scores: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn submit(&self, name: &str, score: i64) -> Result<SubmitStatus, SubmitError> {
        let submission = Submission::parse(name, score, self.config.name_max_len)?;
        Ok(self.store_submission(&submission).await)
    }

    pub async fn store_submission(&self, submission: &Submission) -> SubmitStatus {
        if let Err(e) = self
            .store
            .insert_score(&submission.name, submission.score)
            .await
        {
            log::error!("DB: failed to store score for {}: {}", submission.name, e);
            return SubmitStatus::Dropped;
        }

        if self.config.retention > 0 {
            match self.store.retain_top(self.config.retention).await {
                Ok(0) => {}
                Ok(removed) => log::debug!("DB: trimmed {} entries", removed),
                Err(e) => log::warn!("DB: retention trim failed: {}", e),
            }
        }

        log::info!(
            "DB: stored {} with {} points",
            submission.name,
            submission.score
        );
        SubmitStatus::Stored
    }

    pub async fn rival(&self, score: i64) -> Option<Rival> {
        let entries = self.snapshot().await;
        rank::find_rival(score, &entries)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::database::Database;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store that fails every call and counts the attempts.
    #[derive(Default)]
    pub(crate) struct BrokenStore {
        pub calls: AtomicUsize,
    }

    impl ScoreStore for BrokenStore {
        async fn top_scores(&self, _limit: u32) -> Result<Vec<ScoreEntry>, sqlx::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(sqlx::Error::PoolClosed)
        }

        async fn all_scores(&self) -> Result<Vec<ScoreEntry>, sqlx::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(sqlx::Error::PoolClosed)
        }

        async fn insert_score(&self, _name: &str, _score: i64) -> Result<(), sqlx::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(sqlx::Error::PoolClosed)
        }

        async fn retain_top(&self, _keep: u32) -> Result<u64, sqlx::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(sqlx::Error::PoolClosed)
        }
    }

    async fn memory_board(retention: u32) -> Leaderboard<Database> {
        let config = LeaderboardConfig {
            retention,
            ..LeaderboardConfig::default()
        };
        Leaderboard::new(Database::in_memory().await.unwrap(), config)
    }

    #[test]
    fn submission_validation() {
        assert_eq!(Submission::parse("   ", 10, 10), Err(SubmitError::EmptyName));
        assert_eq!(Submission::parse("", 10, 10), Err(SubmitError::EmptyName));
        assert_eq!(
            Submission::parse("ABCDEFGHIJK", 10, 10),
            Err(SubmitError::NameTooLong { max: 10 })
        );
        assert_eq!(
            Submission::parse("abc", -1, 10),
            Err(SubmitError::InvalidScore)
        );
        assert_eq!(
            Submission::parse(" abc ", 42, 10),
            Ok(Submission {
                name: "ABC".into(),
                score: 42
            })
        );
    }

    #[tokio::test]
    async fn invalid_submission_never_reaches_the_store() {
        let board = Leaderboard::new(BrokenStore::default(), LeaderboardConfig::default());
        assert_eq!(board.submit("", 10).await, Err(SubmitError::EmptyName));
        assert_eq!(board.submit("BOB", -5).await, Err(SubmitError::InvalidScore));
        assert_eq!(board.store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn storage_failures_degrade_silently() {
        let board = Leaderboard::new(BrokenStore::default(), LeaderboardConfig::default());
        assert!(board.top_scores(None).await.is_empty());
        assert!(board.snapshot().await.is_empty());
        assert_eq!(board.rival(10).await, None);
        assert_eq!(board.submit("BOB", 10).await, Ok(SubmitStatus::Dropped));
    }

    #[test]
    fn limit_is_defaulted_and_clamped() {
        let board = Leaderboard::new(BrokenStore::default(), LeaderboardConfig::default());
        assert_eq!(board.clamp_limit(None), 10);
        assert_eq!(board.clamp_limit(Some(0)), 10);
        assert_eq!(board.clamp_limit(Some(-3)), 10);
        assert_eq!(board.clamp_limit(Some(25)), 25);
        assert_eq!(board.clamp_limit(Some(5_000)), 100);
        assert_eq!(board.clamp_limit(Some(i64::MAX)), 100);
    }

    #[tokio::test]
    async fn retention_keeps_the_best_entries() {
        let board = memory_board(3).await;
        for (name, score) in [("A", 10), ("B", 40), ("C", 30), ("D", 20), ("E", 50)] {
            assert_eq!(board.submit(name, score).await, Ok(SubmitStatus::Stored));
        }
        let scores: Vec<i64> = board
            .snapshot()
            .await
            .into_iter()
            .map(|entry| entry.score)
            .collect();
        assert_eq!(scores, vec![50, 40, 30]);
    }

    #[tokio::test]
    async fn zero_retention_keeps_everything() {
        let board = memory_board(0).await;
        for score in 0..15 {
            board.submit("P", score).await.unwrap();
        }
        assert_eq!(board.snapshot().await.len(), 15);
        assert_eq!(board.top_scores(None).await.len(), 10);
    }

    #[tokio::test]
    async fn rival_comes_from_the_stored_collection() {
        let board = memory_board(0).await;
        board.submit("a", 500).await.unwrap();
        board.submit("b", 300).await.unwrap();
        board.submit("c", 100).await.unwrap();

        assert_eq!(
            board.rival(150).await,
            Some(Rival {
                name: "B".into(),
                score: 300,
                rank: 2
            })
        );
        assert_eq!(board.rival(500).await, None);
    }
}
