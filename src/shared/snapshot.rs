//! Session snapshots for inter-thread communication.
//!
//! Snapshots are immutable captures of the session sent from the logic
//! thread to whoever presents the game. This decouples game logic from
//! presentation.

use crate::database::models::Rival;
use crate::models::stats::ComboSnapshot;
use crate::state::session::SessionEvent;

#[derive(Clone, Debug)]
pub struct SessionSnapshot {
    /// Combo counters and derived level id.
    pub combo: ComboSnapshot,
    pub level_name: String,
    pub level_color: String,
    /// Live rank against the last leaderboard snapshot.
    pub rank: u32,
    /// Next entry to overtake, if any.
    pub rival: Option<Rival>,
    pub game_over: bool,
    /// Events raised since the previous snapshot.
    pub events: Vec<SessionEvent>,
}

impl SessionSnapshot {
    /// Points still needed to pass the rival.
    pub fn points_to_rival(&self) -> Option<i64> {
        self.rival
            .as_ref()
            .map(|rival| rival.score - i64::from(self.combo.state.score))
    }
}
