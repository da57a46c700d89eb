pub mod connection;
pub mod leaderboard;
pub mod manager;
pub mod models;
pub mod query;
pub mod store;

pub use connection::Database;
pub use leaderboard::{Leaderboard, Submission, SubmitStatus};
pub use manager::DbManager;
pub use store::ScoreStore;
