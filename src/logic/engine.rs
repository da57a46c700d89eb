//! Combo engine: click counting, record tracking and idle decay.
//!
//! All operations take the current instant explicitly so the engine stays a
//! plain state machine. A single owner drives it from two sources, clicks and
//! the periodic decay tick; a click always resets the idle clock, so a decay
//! computed after it starts from fresh state.

use crate::models::level::LevelTable;
use crate::models::settings::DecayConfig;
use crate::models::stats::{ComboSnapshot, ComboState};
use std::sync::Arc;
use std::time::Instant;

/// What a single click changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickOutcome {
    pub combo: u32,
    /// Fires once, on the click that beat the previous best.
    pub new_record: bool,
}

/// Result of one decay tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecayOutcome {
    /// Not idle long enough, or nothing left to decay.
    Idle,
    Decayed { from: u32, to: u32 },
}

pub struct ComboEngine {
    state: ComboState,
    levels: Arc<LevelTable>,
    decay: DecayConfig,
    last_action: Instant,
    record_flash_until: Option<Instant>,
}

impl ComboEngine {
    pub fn new(levels: Arc<LevelTable>, decay: DecayConfig, now: Instant) -> Self {
        Self {
            state: ComboState::new(),
            levels,
            decay,
            last_action: now,
            record_flash_until: None,
        }
    }

    pub fn register_click(&mut self, now: Instant) -> ClickOutcome {
        self.expire_record_flash(now);

        self.state.combo = self.state.combo.saturating_add(1);
        self.state.score = self.state.score.saturating_add(1);
        self.state.is_decaying = false;
        self.last_action = now;

        let new_record = self.state.combo > self.state.max_combo;
        if new_record {
            self.state.max_combo = self.state.combo;
            self.state.is_new_record = true;
            self.record_flash_until = Some(now + self.decay.record_flash());
        }

        ClickOutcome {
            combo: self.state.combo,
            new_record,
        }
    }

    /// Runs one decay step. Only the combo shrinks; score and max combo are
    /// untouched.
    pub fn tick_decay(&mut self, now: Instant) -> DecayOutcome {
        self.expire_record_flash(now);

        let idle = now.saturating_duration_since(self.last_action);
        if idle > self.decay.start_delay() && self.state.combo > 0 {
            let from = self.state.combo;
            let to = (f64::from(from) * self.decay.factor).floor().max(0.0) as u32;
            // floor of a product with a factor below 1, but guard the float anyway
            let to = to.min(from);
            self.state.combo = to;
            self.state.is_decaying = true;
            DecayOutcome::Decayed { from, to }
        } else {
            self.state.is_decaying = false;
            DecayOutcome::Idle
        }
    }

    /// Level id for the current combo, resolved on every call.
    pub fn current_level(&self) -> u32 {
        self.levels.level_for(self.state.combo)
    }

    pub fn reset(&mut self, now: Instant) {
        self.state = ComboState::new();
        self.last_action = now;
        self.record_flash_until = None;
    }

    /// Whether the new-record window is still open at `now`.
    pub fn is_new_record(&self, now: Instant) -> bool {
        self.record_flash_until.is_some_and(|until| now < until)
    }

    pub fn state(&self) -> &ComboState {
        &self.state
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn snapshot(&self, now: Instant) -> ComboSnapshot {
        let mut state = self.state;
        state.is_new_record = self.is_new_record(now);
        ComboSnapshot {
            state,
            level: self.current_level(),
        }
    }

    fn expire_record_flash(&mut self, now: Instant) {
        if !self.is_new_record(now) {
            self.record_flash_until = None;
            self.state.is_new_record = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn engine(now: Instant) -> ComboEngine {
        ComboEngine::new(Arc::new(LevelTable::default()), DecayConfig::default(), now)
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn clicks_without_gaps_count_everything() {
        let start = Instant::now();
        let mut engine = engine(start);
        for i in 1..=250u64 {
            engine.register_click(start + ms(i * 10));
        }
        let state = engine.state();
        assert_eq!(state.combo, 250);
        assert_eq!(state.score, 250);
        assert_eq!(state.max_combo, 250);
        assert_eq!(engine.current_level(), 6);
    }

    #[test]
    fn no_decay_before_start_delay() {
        let start = Instant::now();
        let mut engine = engine(start);
        for _ in 0..5 {
            engine.register_click(start);
        }
        assert_eq!(engine.tick_decay(start + ms(2000)), DecayOutcome::Idle);
        assert_eq!(engine.state().combo, 5);
        assert!(!engine.state().is_decaying);
    }

    #[test]
    fn decay_is_multiplicative_and_floors() {
        let start = Instant::now();
        let mut engine = engine(start);
        for _ in 0..100 {
            engine.register_click(start);
        }

        let t = start + ms(2100);
        assert_eq!(
            engine.tick_decay(t),
            DecayOutcome::Decayed { from: 100, to: 90 }
        );
        assert!(engine.state().is_decaying);
        assert_eq!(
            engine.tick_decay(t + ms(100)),
            DecayOutcome::Decayed { from: 90, to: 81 }
        );
        assert_eq!(engine.state().score, 100);
        assert_eq!(engine.state().max_combo, 100);
    }

    #[test]
    fn decay_is_non_increasing_and_reaches_zero() {
        let start = Instant::now();
        let mut engine = engine(start);
        for _ in 0..37 {
            engine.register_click(start);
        }

        let mut now = start + ms(2001);
        let mut previous = engine.state().combo;
        for _ in 0..200 {
            engine.tick_decay(now);
            let combo = engine.state().combo;
            assert!(combo <= previous);
            previous = combo;
            now += ms(100);
        }
        assert_eq!(engine.state().combo, 0);
        assert_eq!(engine.state().score, 37);
        assert_eq!(engine.state().max_combo, 37);
        assert_eq!(engine.tick_decay(now), DecayOutcome::Idle);
        assert!(!engine.state().is_decaying);
    }

    #[test]
    fn click_clears_decay_and_resets_idle_clock() {
        let start = Instant::now();
        let mut engine = engine(start);
        for _ in 0..20 {
            engine.register_click(start);
        }
        let t = start + ms(3000);
        engine.tick_decay(t);
        assert!(engine.state().is_decaying);

        engine.register_click(t + ms(10));
        assert!(!engine.state().is_decaying);
        assert_eq!(engine.tick_decay(t + ms(100)), DecayOutcome::Idle);
        assert_eq!(engine.state().combo, 19);
    }

    #[test]
    fn record_flag_is_a_short_window() {
        let start = Instant::now();
        let mut engine = engine(start);

        let first = engine.register_click(start);
        assert!(first.new_record);
        assert!(engine.is_new_record(start + ms(199)));
        assert!(!engine.is_new_record(start + ms(200)));

        engine.tick_decay(start + ms(250));
        assert!(!engine.state().is_new_record);
        assert!(!engine.snapshot(start + ms(250)).state.is_new_record);
    }

    #[test]
    fn record_fires_once_per_click_that_beats_max() {
        let start = Instant::now();
        let mut engine = engine(start);
        for _ in 0..30 {
            engine.register_click(start);
        }

        // decay below the record, then climb back without beating it
        let mut now = start + ms(2500);
        engine.tick_decay(now);
        now += ms(100);
        engine.tick_decay(now);
        let combo = engine.state().combo;
        assert!(combo < 30);

        let mut records = 0;
        for _ in combo..30 {
            now += ms(1);
            if engine.register_click(now).new_record {
                records += 1;
            }
        }
        assert_eq!(records, 0);
        assert!(engine.register_click(now + ms(1)).new_record);
        assert_eq!(engine.state().max_combo, 31);
    }

    #[test]
    fn level_follows_combo_both_ways() {
        let start = Instant::now();
        let mut engine = engine(start);
        for _ in 0..35 {
            engine.register_click(start);
        }
        assert_eq!(engine.current_level(), 3);

        engine.tick_decay(start + ms(2500)); // 35 -> 31
        assert_eq!(engine.current_level(), 3);
        engine.tick_decay(start + ms(2600)); // 31 -> 27
        assert_eq!(engine.current_level(), 2);
    }

    #[test]
    fn reset_restores_initial_state() {
        let start = Instant::now();
        let mut engine = engine(start);
        for _ in 0..80 {
            engine.register_click(start);
        }
        let later = start + ms(5000);
        engine.reset(later);

        assert!(engine.state().is_zero());
        assert!(!engine.state().is_decaying);
        assert!(!engine.is_new_record(later));
        assert_eq!(engine.current_level(), engine.levels().lowest_id());
        // idle clock restarted at reset
        engine.register_click(later);
        assert_eq!(engine.tick_decay(later + ms(1999)), DecayOutcome::Idle);
    }
}
