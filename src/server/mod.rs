//! HTTP front for the leaderboard (`rclicker serve`).

pub mod routes;

use crate::database::{Database, Leaderboard, ScoreStore};
use crate::models::settings::Settings;
use std::error::Error;
use std::io;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Opens the database, binds the listener and serves until the process ends.
pub fn run(settings: &Settings) -> Result<(), Box<dyn Error>> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let db = Database::new(&settings.leaderboard.database).await?;
        let board = Arc::new(Leaderboard::new(db, settings.leaderboard.clone()));

        let listener = TcpListener::bind(&settings.server.bind).await?;
        log::info!("HTTP: listening on http://{}", listener.local_addr()?);
        serve(listener, board).await?;
        Ok::<(), Box<dyn Error>>(())
    })
}

pub async fn serve<S>(listener: TcpListener, board: Arc<Leaderboard<S>>) -> io::Result<()>
where
    S: ScoreStore + 'static,
{
    axum::serve(listener, routes::router(board)).await
}
