//! Raw sqlx query helpers for the leaderboard table.

use crate::database::models::ScoreEntry;
use sqlx::SqlitePool;

/// Inserts one score row.
pub async fn insert_score(
    pool: &SqlitePool,
    name: &str,
    score: i64,
    timestamp: i64,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query("INSERT INTO scores (name, score, ts) VALUES (?1, ?2, ?3)")
        .bind(name)
        .bind(score)
        .bind(timestamp)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

/// Best scores first; equal scores keep submission order.
pub async fn get_top_scores(pool: &SqlitePool, limit: u32) -> Result<Vec<ScoreEntry>, sqlx::Error> {
    let scores: Vec<ScoreEntry> =
        sqlx::query_as("SELECT name, score FROM scores ORDER BY score DESC, id ASC LIMIT ?1")
            .bind(i64::from(limit))
            .fetch_all(pool)
            .await?;
    Ok(scores)
}

/// Every stored score, best first.
pub async fn get_all_scores(pool: &SqlitePool) -> Result<Vec<ScoreEntry>, sqlx::Error> {
    let scores: Vec<ScoreEntry> =
        sqlx::query_as("SELECT name, score FROM scores ORDER BY score DESC, id ASC")
            .fetch_all(pool)
            .await?;
    Ok(scores)
}

/// Deletes everything outside the best `keep` rows. Returns the number of
/// rows removed.
pub async fn retain_top(pool: &SqlitePool, keep: u32) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM scores WHERE id NOT IN (
            SELECT id FROM scores ORDER BY score DESC, id ASC LIMIT ?1
        )",
    )
    .bind(i64::from(keep))
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
