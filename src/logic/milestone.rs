//! Combo milestones: upward boundary crossings of configured intervals.

use crate::models::settings::MilestoneConfig;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Milestone {
    Rocket,
    Shockwave,
    Hyperspace,
    Feedback,
}

/// True when going from `prev` to `new` crosses a multiple of `interval`
/// upwards. Skipped multiples count as a single crossing; decreases never
/// fire.
pub fn crossed(prev: u32, new: u32, interval: u32) -> bool {
    interval > 0 && new > prev && prev / interval < new / interval
}

/// Milestones reached by one combo change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MilestoneHits {
    pub milestones: Vec<Milestone>,
    /// Combo just became the special value.
    pub special: bool,
}

#[cfg(test)]
impl MilestoneHits {
    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty() && !self.special
    }

    pub fn contains(&self, milestone: Milestone) -> bool {
        self.milestones.contains(&milestone)
    }
}

/// Remembers the last observed combo so every crossing is evaluated against
/// the value actually recorded before it, whatever the step size.
#[derive(Debug, Clone)]
pub struct MilestoneTracker {
    config: MilestoneConfig,
    last_combo: u32,
}

impl MilestoneTracker {
    pub fn new(config: MilestoneConfig) -> Self {
        Self {
            config,
            last_combo: 0,
        }
    }

    /// Records `combo` and reports what it crossed since the previous call.
    pub fn observe(&mut self, combo: u32) -> MilestoneHits {
        let prev = self.last_combo;
        self.last_combo = combo;

        let mut hits = MilestoneHits::default();
        for (milestone, interval) in [
            (Milestone::Rocket, self.config.rocket),
            (Milestone::Shockwave, self.config.shockwave),
            (Milestone::Hyperspace, self.config.hyperspace),
            (Milestone::Feedback, self.config.feedback),
        ] {
            if crossed(prev, combo, interval) {
                hits.milestones.push(milestone);
            }
        }
        hits.special = combo > prev && combo == self.config.special_combo;
        hits
    }

    pub fn reset(&mut self) {
        self.last_combo = 0;
    }
}
