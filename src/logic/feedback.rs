//! Floating feedback words shown on feedback milestones.

use rand::Rng;

pub const FEEDBACK_MESSAGES: &[&str] = &[
    "COOL!", "SICK!", "RAD!", "EPIC!", "WILD!", "HYPER!", "MAX!", "YEAH!", "SUPER!", "INSANE!",
    "POWER!", "SPEED!", "CRAZY!",
];

/// Extra words unlocked at higher combos.
pub const FEEDBACK_HIGH_MESSAGES: &[&str] = &[
    "AMAZING!",
    "AWESOME!",
    "UNSTOPPABLE!",
    "MONSTER!",
    "GODLIKE!",
    "LEGEND!",
];

/// Combo from which the high messages join the pool.
pub const HIGH_MESSAGE_COMBO: u32 = 50;

/// Picks feedback words, never the same word twice in a row.
#[derive(Debug, Clone, Default)]
pub struct FeedbackPicker {
    last: Option<&'static str>,
}

impl FeedbackPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pick<R: Rng>(&mut self, combo: u32, rng: &mut R) -> &'static str {
        let mut pool: Vec<&'static str> = FEEDBACK_MESSAGES.to_vec();
        if combo >= HIGH_MESSAGE_COMBO {
            pool.extend_from_slice(FEEDBACK_HIGH_MESSAGES);
        }

        let candidates: Vec<&'static str> = pool
            .iter()
            .copied()
            .filter(|word| Some(*word) != self.last)
            .collect();
        let source = if candidates.is_empty() {
            &pool
        } else {
            &candidates
        };

        let word = source[rng.random_range(0..source.len())];
        self.last = Some(word);
        word
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
