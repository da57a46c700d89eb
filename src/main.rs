//! Application entry point and thread bootstrapper.

mod database;
mod input;
mod logic;
mod models;
mod server;
mod shared;
mod state;
mod system;

use crate::database::DbManager;
use crate::models::settings::{DEFAULT_CONFIG_PATH, Settings};
use crate::shared::snapshot::SessionSnapshot;
use crate::state::session::SessionEvent;
use crate::system::bus::SystemBus;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const CONFIG_ENV: &str = "RCLICKER_CONFIG";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // an explicitly named config must exist
    let settings = match std::env::var_os(CONFIG_ENV) {
        Some(path) => Settings::load(&PathBuf::from(path))?,
        None => Settings::load_or_default(Path::new(DEFAULT_CONFIG_PATH))?,
    };

    match std::env::args().nth(1).as_deref() {
        Some("serve") => {
            log::info!("MAIN: Booting rclicker leaderboard server...");
            server::run(&settings)
        }
        None | Some("play") => play(settings),
        Some(other) => Err(format!("unknown mode {:?}, expected `play` or `serve`", other).into()),
    }
}

fn play(settings: Settings) -> Result<(), Box<dyn Error>> {
    log::info!("MAIN: Booting rclicker...");
    log::info!("MAIN: Enter = click, r = restart, s NAME = submit score, q = quit");

    let levels = Arc::new(settings.level_table()?);
    let bus = SystemBus::new();
    let snapshots = bus.snapshot_rx.clone();
    let action_tx = bus.action_tx.clone();

    let db_manager = DbManager::new(settings.leaderboard.clone());

    // The input thread stays blocked on stdin and is not joined.
    input::start_thread(action_tx)?;
    let logic = logic::start_thread(bus, settings, levels, db_manager)?;

    // Ends once the logic thread drops the last snapshot sender.
    for snapshot in snapshots.iter() {
        report(&snapshot);
    }

    if logic.join().is_err() {
        return Err("logic thread panicked".into());
    }
    log::info!("MAIN: Bye");
    Ok(())
}

fn report(snapshot: &SessionSnapshot) {
    for event in &snapshot.events {
        match event {
            SessionEvent::Decay { .. } | SessionEvent::NewRecord(_) => {}
            SessionEvent::LevelUp { .. } => {
                log::info!("LEVEL UP >> {}", snapshot.level_name);
            }
            SessionEvent::Milestone(milestone) => log::info!("{:?}!", milestone),
            SessionEvent::Feedback(word) => log::info!("{}", word),
            SessionEvent::SpecialCombo(combo) => log::info!("{} !!!", combo),
            SessionEvent::RankUp { from, to } => log::info!("RANK UP #{} -> #{}", from, to),
            SessionEvent::GameOver { score } => {
                log::info!("GAME OVER: {} points. `s NAME` to submit, `r` to retry", score);
            }
        }
    }

    let state = &snapshot.combo.state;
    let rival = match (&snapshot.rival, snapshot.points_to_rival()) {
        (Some(rival), Some(gap)) => format!("next {} (+{})", rival.name, gap),
        _ => "top of the board".to_string(),
    };
    let record = if state.is_new_record { " NEW RECORD" } else { "" };
    let over = if snapshot.game_over { " | over" } else { "" };
    let line = format!(
        "combo {} | score {} | best {}{} | {} ({}) | rank #{} | {}{}",
        state.combo,
        state.score,
        state.max_combo,
        record,
        snapshot.level_name,
        snapshot.level_color,
        snapshot.rank,
        rival,
        over
    );

    // decay ticks arrive every tick interval
    let decay_only = !snapshot.events.is_empty()
        && snapshot
            .events
            .iter()
            .all(|event| matches!(event, SessionEvent::Decay { .. }));
    if decay_only {
        log::debug!("{}", line);
    } else {
        log::info!("{}", line);
    }
}
