//! Logic thread: owns the game session and its decay timer.
//!
//! The loop blocks on the action channel until the next decay tick is due,
//! so the thread sleeps between ticks and reacts to clicks immediately.

pub mod engine;
pub mod feedback;
pub mod milestone;
pub mod rank;

use crate::database::{DbManager, Submission};
use crate::input::events::GameAction;
use crate::models::level::LevelTable;
use crate::models::settings::Settings;
use crate::state::session::{GameSession, SessionEvent};
use crate::system::bus::SystemBus;
use crossbeam_channel::RecvTimeoutError;
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Spawns the logic thread. It returns after a `Quit` action, once the
/// database thread has been shut down.
pub fn start_thread(
    bus: SystemBus,
    settings: Settings,
    levels: Arc<LevelTable>,
    db_manager: DbManager,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("Logic Thread".to_string())
        .spawn(move || {
            log::info!("LOGIC: Thread started");
            run(&bus, &settings, levels, db_manager);
            log::info!("LOGIC: Thread stopped");
        })
}

pub fn run(bus: &SystemBus, settings: &Settings, levels: Arc<LevelTable>, mut db_manager: DbManager) {
    db_manager.init();

    let tick_interval = settings.decay.tick_interval();
    let refresh_interval = settings.session.rank_refresh();

    let start = Instant::now();
    let mut session = GameSession::new(settings, levels, start);
    let mut next_tick = start + tick_interval;
    let mut next_refresh = start + refresh_interval;
    let mut revision = 0;
    let mut submitted = false;

    publish(bus, &session, start, Vec::new());

    loop {
        let mut events = Vec::new();
        let mut dirty = false;

        let timeout = next_tick.saturating_duration_since(Instant::now());
        match bus.action_rx.recv_timeout(timeout) {
            Ok(GameAction::Quit) => {
                log::info!("LOGIC: Quit received...");
                break;
            }
            Ok(GameAction::Click) => {
                let now = Instant::now();
                if session.is_game_over() {
                    log::debug!("LOGIC: Click ignored, game is over");
                } else {
                    events.extend(session.click(now));
                    dirty = true;
                }
            }
            Ok(GameAction::Restart) => {
                let now = Instant::now();
                session.restart(now);
                next_tick = now + tick_interval;
                submitted = false;
                dirty = true;
                log::info!("LOGIC: New game");
            }
            Ok(GameAction::Submit(name)) => {
                if submit(settings, &session, &db_manager, &name, submitted) {
                    submitted = true;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        let now = Instant::now();
        if now >= next_tick {
            events.extend(session.tick(now));
            next_tick = now + tick_interval;
        }

        if now >= next_refresh {
            db_manager.refresh();
            next_refresh = now + refresh_interval;
        }

        if let Some((latest, entries)) = db_manager.entries_since(revision) {
            revision = latest;
            session.set_leaderboard(entries);
            dirty = true;
        }

        if dirty || !events.is_empty() {
            publish(bus, &session, now, events);
        }
    }

    db_manager.shutdown();
}

/// Validates and queues the final score. Returns true when it was queued.
fn submit(
    settings: &Settings,
    session: &GameSession,
    db_manager: &DbManager,
    name: &str,
    already_submitted: bool,
) -> bool {
    let Some(score) = session.final_score() else {
        log::warn!("LOGIC: Nothing to submit until the game is over");
        return false;
    };
    if already_submitted {
        log::warn!("LOGIC: Score already submitted, restart to play again");
        return false;
    }

    match Submission::parse(name, i64::from(score), settings.leaderboard.name_max_len) {
        Ok(submission) => {
            log::info!("LOGIC: Submitting {} for {}", score, submission.name);
            db_manager.submit(submission);
            true
        }
        Err(e) => {
            log::warn!("LOGIC: Rejected submission: {}", e);
            false
        }
    }
}

fn publish(bus: &SystemBus, session: &GameSession, now: Instant, events: Vec<SessionEvent>) {
    if bus
        .snapshot_tx
        .send(session.snapshot(now, events))
        .is_err()
    {
        log::debug!("LOGIC: No snapshot observer");
    }
}
