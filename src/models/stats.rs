//! Combo counters for a play session.
//!
//! `ComboState` is owned by the combo engine and only changes through its
//! operations; everything else sees copies of it.

use serde::Serialize;

/// Counters tracked by the combo engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ComboState {
    /// Current streak, subject to decay.
    pub combo: u32,
    /// Total successful clicks. Never decays.
    pub score: u32,
    /// High-water mark of `combo`.
    pub max_combo: u32,
    /// Raised for a short window after `combo` beats `max_combo`.
    pub is_new_record: bool,
    /// True while idle decay is shrinking the combo.
    pub is_decaying: bool,
}

impl ComboState {
    /// Creates a zeroed state.
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn is_zero(&self) -> bool {
        self.combo == 0 && self.score == 0 && self.max_combo == 0
    }
}

/// Immutable view of the engine after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComboSnapshot {
    #[serde(flatten)]
    pub state: ComboState,
    /// Level id derived from `state.combo`.
    pub level: u32,
}
