//! Shared channel infrastructure between system threads.
//!
//! The `SystemBus` carries actions from the input thread to the logic thread
//! and session snapshots from the logic thread back to the main thread.

use crate::input::events::GameAction;
use crate::shared::snapshot::SessionSnapshot;
use crossbeam_channel::{Receiver, Sender, unbounded};

#[derive(Clone)]
pub struct SystemBus {
    /// Input → Logic: parsed player actions.
    pub action_tx: Sender<GameAction>,
    pub action_rx: Receiver<GameAction>,

    /// Logic → Main: session snapshots. Unbounded so no event is lost.
    pub snapshot_tx: Sender<SessionSnapshot>,
    pub snapshot_rx: Receiver<SessionSnapshot>,
}

impl SystemBus {
    pub fn new() -> Self {
        let (action_tx, action_rx) = unbounded();
        let (snapshot_tx, snapshot_rx) = unbounded();

        Self {
            action_tx,
            action_rx,
            snapshot_tx,
            snapshot_rx,
        }
    }
}

impl Default for SystemBus {
    fn default() -> Self {
        Self::new()
    }
}
