//! Input thread: turns stdin lines into game actions.

pub mod events;

use crate::input::events::GameAction;
use crossbeam_channel::Sender;
use std::io::{self, BufRead};
use std::thread;

/// Reads `reader` line by line until EOF, which counts as a quit.
pub fn pump<R: BufRead>(reader: R, action_tx: &Sender<GameAction>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("INPUT: Failed to read stdin: {}", e);
                break;
            }
        };

        let Some(action) = GameAction::parse(&line) else {
            log::warn!("INPUT: Unknown command {:?} (c, r, s NAME, q)", line.trim());
            continue;
        };
        let quit = action == GameAction::Quit;
        if action_tx.send(action).is_err() || quit {
            return;
        }
    }

    let _ = action_tx.send(GameAction::Quit);
}

/// The thread only owns the action sender, so it never keeps other
/// channels alive while blocked on stdin.
pub fn start_thread(action_tx: Sender<GameAction>) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("Input Thread".to_string())
        .spawn(move || {
            log::info!("INPUT: Thread started");
            pump(io::stdin().lock(), &action_tx);
            log::info!("INPUT: Thread stopped");
        })
}
