//! Persistence seam for the leaderboard.
//!
//! The rest of the game only talks to a `ScoreStore`; the SQLite `Database`
//! is the implementation the binary ships with.

use crate::database::connection::Database;
use crate::database::models::ScoreEntry;
use std::future::Future;

pub trait ScoreStore: Send + Sync {
    /// Best `limit` entries, descending by score.
    fn top_scores(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<ScoreEntry>, sqlx::Error>> + Send;

    /// Whatever the store currently holds, descending by score.
    fn all_scores(&self) -> impl Future<Output = Result<Vec<ScoreEntry>, sqlx::Error>> + Send;

    fn insert_score(
        &self,
        name: &str,
        score: i64,
    ) -> impl Future<Output = Result<(), sqlx::Error>> + Send;

    /// Trim-on-write retention: keep only the best `keep` entries.
    fn retain_top(&self, keep: u32) -> impl Future<Output = Result<u64, sqlx::Error>> + Send;
}

impl ScoreStore for Database {
    async fn top_scores(&self, limit: u32) -> Result<Vec<ScoreEntry>, sqlx::Error> {
        self.get_top_scores(limit).await
    }

    async fn all_scores(&self) -> Result<Vec<ScoreEntry>, sqlx::Error> {
        self.get_all_scores().await
    }

    async fn insert_score(&self, name: &str, score: i64) -> Result<(), sqlx::Error> {
        Database::insert_score(self, name, score).await.map(|_| ())
    }

    async fn retain_top(&self, keep: u32) -> Result<u64, sqlx::Error> {
        Database::retain_top(self, keep).await
    }
}
