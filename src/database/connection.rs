use crate::database::models::ScoreEntry;
use crate::database::query;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens or creates the leaderboard database.
    pub async fn new(db_path: &Path) -> Result<Self, sqlx::Error> {
        // Make sure the parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    sqlx::Error::Io(std::io::Error::other(format!(
                        "Unable to create parent directory: {}",
                        e
                    )))
                })?;
            }
        }

        // sqlx wants an absolute path for file databases
        let absolute_path = if db_path.is_absolute() {
            db_path.to_path_buf()
        } else {
            std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(db_path)
        };

        let options = SqliteConnectOptions::new()
            .filename(&absolute_path)
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options).await?;
        let db = Database { pool };
        db.init_schema().await?;
        log::info!("DB: opened {:?}", absolute_path);
        Ok(db)
    }

    /// Private in-memory database. A single connection that never expires
    /// keeps the data alive for the lifetime of the pool.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        use sqlx::sqlite::SqlitePoolOptions;
        use std::str::FromStr;

        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        let db = Database { pool };
        db.init_schema().await?;
        Ok(db)
    }

    /// Creates the tables if they do not exist.
    async fn init_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS scores (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                score INTEGER NOT NULL,
                ts INTEGER NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS scores_by_score ON scores (score DESC)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn insert_score(&self, name: &str, score: i64) -> Result<i64, sqlx::Error> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        query::insert_score(&self.pool, name, score, timestamp).await
    }

    pub async fn get_top_scores(&self, limit: u32) -> Result<Vec<ScoreEntry>, sqlx::Error> {
        query::get_top_scores(&self.pool, limit).await
    }

    pub async fn get_all_scores(&self) -> Result<Vec<ScoreEntry>, sqlx::Error> {
        query::get_all_scores(&self.pool).await
    }

    pub async fn retain_top(&self, keep: u32) -> Result<u64, sqlx::Error> {
        query::retain_top(&self.pool, keep).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn top_scores_are_sorted_and_limited() {
        let db = Database::in_memory().await.unwrap();
        db.insert_score("C", 100).await.unwrap();
        db.insert_score("A", 500).await.unwrap();
        db.insert_score("B", 300).await.unwrap();

        let top = db.get_top_scores(2).await.unwrap();
        assert_eq!(
            top,
            vec![ScoreEntry::new("A", 500), ScoreEntry::new("B", 300)]
        );
        assert_eq!(db.get_all_scores().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn equal_scores_keep_submission_order() {
        let db = Database::in_memory().await.unwrap();
        db.insert_score("FIRST", 50).await.unwrap();
        db.insert_score("SECOND", 50).await.unwrap();

        let all = db.get_all_scores().await.unwrap();
        assert_eq!(all[0].name, "FIRST");
        assert_eq!(all[1].name, "SECOND");
    }

    #[tokio::test]
    async fn retain_top_trims_the_tail() {
        let db = Database::in_memory().await.unwrap();
        for (i, score) in [40, 10, 30, 20, 50].into_iter().enumerate() {
            db.insert_score(&format!("P{}", i), score).await.unwrap();
        }

        let removed = db.retain_top(3).await.unwrap();
        assert_eq!(removed, 2);
        let scores: Vec<i64> = db
            .get_all_scores()
            .await
            .unwrap()
            .into_iter()
            .map(|entry| entry.score)
            .collect();
        assert_eq!(scores, vec![50, 40, 30]);
    }
}
