//! Background leaderboard thread used while playing.
//!
//! The logic thread must never wait on storage, so the database lives on its
//! own thread with a tokio runtime. Commands go in through a channel and the
//! latest leaderboard snapshot comes back through shared state that the
//! logic thread polls.

use crate::database::connection::Database;
use crate::database::leaderboard::{Leaderboard, Submission, SubmitStatus};
use crate::database::models::ScoreEntry;
use crate::models::settings::LeaderboardConfig;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

#[derive(Debug, Clone, Default)]
pub struct DbState {
    pub entries: Vec<ScoreEntry>,
    /// Bumped each time `entries` is replaced.
    pub revision: u64,
}

#[derive(Debug)]
pub enum DbCommand {
    Init,
    Refresh,
    Submit(Submission),
    Shutdown,
}

pub struct DbManager {
    state: Arc<Mutex<DbState>>,
    command_sender: UnboundedSender<DbCommand>,
    handle: Option<thread::JoinHandle<()>>,
}

fn lock(state: &Mutex<DbState>) -> MutexGuard<'_, DbState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl DbManager {
    pub fn new(config: LeaderboardConfig) -> Self {
        let state = Arc::new(Mutex::new(DbState::default()));
        let (tx, rx) = unbounded_channel();

        let state_clone = Arc::clone(&state);
        let handle = thread::Builder::new()
            .name("DB Thread".to_string())
            .spawn(move || {
                let rt = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        log::error!("DB: unable to start runtime: {}", e);
                        return;
                    }
                };
                rt.block_on(Self::db_thread(state_clone, rx, config));
            });

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("DB: unable to spawn thread: {}", e);
                None
            }
        };

        Self {
            state,
            command_sender: tx,
            handle,
        }
    }

    async fn db_thread(
        state: Arc<Mutex<DbState>>,
        mut rx: UnboundedReceiver<DbCommand>,
        config: LeaderboardConfig,
    ) {
        let mut board: Option<Leaderboard<Database>> = None;

        while let Some(cmd) = rx.recv().await {
            match cmd {
                DbCommand::Init => {
                    match Database::new(&config.database).await {
                        Ok(db) => {
                            let b = Leaderboard::new(db, config.clone());
                            Self::load_scores(&state, &b).await;
                            board = Some(b);
                        }
                        Err(e) => {
                            // the game keeps running without a leaderboard
                            log::error!("DB: initialization error: {}", e);
                        }
                    }
                }
                DbCommand::Refresh => {
                    if let Some(ref b) = board {
                        Self::load_scores(&state, b).await;
                    }
                }
                DbCommand::Submit(submission) => match board {
                    Some(ref b) => {
                        if b.store_submission(&submission).await == SubmitStatus::Dropped {
                            log::warn!("DB: score for {} was not stored", submission.name);
                        }
                        Self::load_scores(&state, b).await;
                    }
                    None => {
                        log::warn!("DB: no database, dropping score for {}", submission.name);
                    }
                },
                DbCommand::Shutdown => break,
            }
        }
        log::info!("DB: thread stopped");
    }

    async fn load_scores(state: &Arc<Mutex<DbState>>, board: &Leaderboard<Database>) {
        let entries = board.snapshot().await;

        let mut s = lock(state);
        s.entries = entries;
        s.revision += 1;
    }

    /// Returns the current entries if they changed since `revision`.
    pub fn entries_since(&self, revision: u64) -> Option<(u64, Vec<ScoreEntry>)> {
        let s = lock(&self.state);
        (s.revision != revision).then(|| (s.revision, s.entries.clone()))
    }

    pub fn send_command(&self, cmd: DbCommand) {
        if let Err(e) = self.command_sender.send(cmd) {
            log::warn!("DB: thread gone, dropping {:?}", e.0);
        }
    }

    pub fn init(&self) {
        self.send_command(DbCommand::Init);
    }

    pub fn refresh(&self) {
        self.send_command(DbCommand::Refresh);
    }

    pub fn submit(&self, submission: Submission) {
        self.send_command(DbCommand::Submit(submission));
    }

    /// Stops the thread and waits for it.
    pub fn shutdown(&mut self) {
        self.send_command(DbCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("DB: thread panicked");
            }
        }
    }
}

impl Drop for DbManager {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.shutdown();
        }
    }
}
