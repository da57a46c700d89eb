//! A single play session: combo engine plus everything derived from it.
//!
//! The session is the only mutator of the engine. It turns engine results
//! into one-shot events (records, level ups, milestones, rank ups, game over)
//! and keeps the last leaderboard snapshot for rank and rival lookups.

use crate::database::models::{Rival, ScoreEntry};
use crate::logic::engine::{ComboEngine, DecayOutcome};
use crate::logic::feedback::FeedbackPicker;
use crate::logic::milestone::{Milestone, MilestoneTracker};
use crate::logic::rank::{self, RankTracker};
use crate::models::level::LevelTable;
use crate::models::settings::{SessionConfig, Settings};
use crate::shared::snapshot::SessionSnapshot;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SessionEvent {
    NewRecord(u32),
    LevelUp { from: u32, to: u32 },
    Milestone(Milestone),
    Feedback(&'static str),
    SpecialCombo(u32),
    Decay { from: u32, to: u32 },
    RankUp { from: u32, to: u32 },
    GameOver { score: u32 },
}

pub struct GameSession {
    engine: ComboEngine,
    milestones: MilestoneTracker,
    feedback: FeedbackPicker,
    rank: RankTracker,
    rng: StdRng,
    config: SessionConfig,
    entries: Vec<ScoreEntry>,
    last_level: u32,
    game_over_at: Option<Instant>,
    game_over: bool,
}

impl GameSession {
    pub fn new(settings: &Settings, levels: Arc<LevelTable>, now: Instant) -> Self {
        Self::with_rng(settings, levels, now, StdRng::from_os_rng())
    }

    pub fn with_rng(
        settings: &Settings,
        levels: Arc<LevelTable>,
        now: Instant,
        rng: StdRng,
    ) -> Self {
        let engine = ComboEngine::new(levels, settings.decay, now);
        let last_level = engine.current_level();
        Self {
            engine,
            milestones: MilestoneTracker::new(settings.milestones),
            feedback: FeedbackPicker::new(),
            rank: RankTracker::new(),
            rng,
            config: settings.session,
            entries: Vec::new(),
            last_level,
            game_over_at: None,
            game_over: false,
        }
    }

    /// Handles a click. Ignored once the game is over.
    pub fn click(&mut self, now: Instant) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.game_over {
            return events;
        }

        let outcome = self.engine.register_click(now);
        self.game_over_at = None;

        if outcome.new_record {
            events.push(SessionEvent::NewRecord(outcome.combo));
        }

        let level = self.engine.current_level();
        if level > self.last_level {
            events.push(SessionEvent::LevelUp {
                from: self.last_level,
                to: level,
            });
        }
        self.last_level = level;

        let hits = self.milestones.observe(outcome.combo);
        for milestone in hits.milestones {
            events.push(SessionEvent::Milestone(milestone));
            if milestone == Milestone::Feedback {
                let word = self.feedback.pick(outcome.combo, &mut self.rng);
                events.push(SessionEvent::Feedback(word));
            }
        }
        if hits.special {
            events.push(SessionEvent::SpecialCombo(outcome.combo));
        }

        if let Some((from, to)) = self.rank.observe(self.live_rank()) {
            events.push(SessionEvent::RankUp { from, to });
        }

        events
    }

    /// Runs one decay tick and the game-over countdown.
    pub fn tick(&mut self, now: Instant) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.game_over {
            return events;
        }

        if let DecayOutcome::Decayed { from, to } = self.engine.tick_decay(now) {
            events.push(SessionEvent::Decay { from, to });
            // upward-only predicates: this records the drop without firing
            self.milestones.observe(to);
            self.last_level = self.engine.current_level();
        }

        let state = *self.engine.state();
        if state.combo == 0 && state.score > 0 && !self.engine.is_new_record(now) {
            match self.game_over_at {
                None => self.game_over_at = Some(now + self.config.game_over_delay()),
                Some(at) if now >= at => {
                    self.game_over_at = None;
                    self.game_over = true;
                    log::info!("SESSION: game over with {} points", state.score);
                    events.push(SessionEvent::GameOver { score: state.score });
                }
                Some(_) => {}
            }
        } else {
            self.game_over_at = None;
        }

        events
    }

    /// Starts a fresh game; the leaderboard snapshot is kept.
    pub fn restart(&mut self, now: Instant) {
        self.engine.reset(now);
        self.milestones.reset();
        self.feedback.reset();
        self.rank.reset();
        self.last_level = self.engine.current_level();
        self.game_over_at = None;
        self.game_over = false;
    }

    /// Replaces the leaderboard snapshot. The displayed rank follows silently.
    pub fn set_leaderboard(&mut self, entries: Vec<ScoreEntry>) {
        self.entries = entries;
        let live = self.live_rank();
        self.rank.observe(live);
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Score to submit, available once the game is over.
    pub fn final_score(&self) -> Option<u32> {
        self.game_over.then_some(self.engine.state().score)
    }

    pub fn rank(&self) -> u32 {
        self.rank.current()
    }

    pub fn rival(&self) -> Option<Rival> {
        rank::find_rival(i64::from(self.engine.state().score), &self.entries)
    }

    #[cfg(test)]
    pub fn engine(&self) -> &ComboEngine {
        &self.engine
    }

    pub fn snapshot(&self, now: Instant, events: Vec<SessionEvent>) -> SessionSnapshot {
        let combo = self.engine.snapshot(now);
        let (level_name, level_color) = self
            .engine
            .levels()
            .get(combo.level)
            .map(|level| (level.name.clone(), level.color.clone()))
            .unwrap_or_default();

        SessionSnapshot {
            combo,
            level_name,
            level_color,
            rank: self.rank(),
            rival: self.rival(),
            game_over: self.game_over,
            events,
        }
    }

    fn live_rank(&self) -> u32 {
        let score = self.engine.state().score;
        if score == 0 {
            1
        } else {
            rank::rank(i64::from(score), &self.entries)
        }
    }
}
