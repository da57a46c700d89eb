//! Level tiers derived from the combo counter.

use crate::models::settings::ConfigError;
use serde::{Deserialize, Serialize};

/// Id reported when no level can be resolved at all.
pub const FALLBACK_LEVEL_ID: u32 = 1;

fn default_color() -> String {
    "white".into()
}

/// One row of the level table. `threshold` is the minimum combo needed to
/// enter the level (inclusive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub id: u32,
    pub threshold: u32,
    pub name: String,
    /// Presentation tag, opaque to the engine.
    #[serde(default = "default_color")]
    pub color: String,
}

impl Level {
    pub fn new(id: u32, threshold: u32, name: &str, color: &str) -> Self {
        Self {
            id,
            threshold,
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

/// Immutable, validated level table. Thresholds and ids are both strictly
/// increasing and the first threshold is 0, so every combo resolves to a
/// level and a higher combo never maps to a lower id.
#[derive(Debug, Clone)]
pub struct LevelTable {
    levels: Vec<Level>,
}

impl LevelTable {
    pub fn new(levels: Vec<Level>) -> Result<Self, ConfigError> {
        Self::check(&levels)?;
        Ok(Self { levels })
    }

    /// Validates rows without taking ownership.
    pub fn check(levels: &[Level]) -> Result<(), ConfigError> {
        let first = levels.first().ok_or(ConfigError::NoLevels)?;
        if first.threshold != 0 {
            return Err(ConfigError::FirstThreshold(first.threshold));
        }

        for pair in levels.windows(2) {
            if pair[1].threshold <= pair[0].threshold {
                return Err(ConfigError::UnorderedThresholds {
                    prev: pair[0].threshold,
                    next: pair[1].threshold,
                });
            }
            if pair[1].id <= pair[0].id {
                return Err(ConfigError::UnorderedIds {
                    prev: pair[0].id,
                    next: pair[1].id,
                });
            }
        }
        Ok(())
    }

    pub fn default_levels() -> Vec<Level> {
        vec![
            Level::new(1, 0, "NOVICE", "white"),
            Level::new(2, 10, "AWAKENING", "cyan"),
            Level::new(3, 30, "OVERDRIVE", "green"),
            Level::new(4, 60, "RAMPAGE", "yellow"),
            Level::new(5, 100, "GODLIKE", "red"),
            Level::new(6, 200, "SINGULARITY", "purple"),
        ]
    }

    /// Row with the highest threshold not above `combo`. Ties (only possible
    /// in unvalidated data) go to the highest id.
    pub fn entry_for(&self, combo: u32) -> Option<&Level> {
        self.levels
            .iter()
            .filter(|level| level.threshold <= combo)
            .max_by_key(|level| (level.threshold, level.id))
            .or_else(|| self.lowest())
    }

    /// Level id for `combo`. Never fails, even on an empty table.
    pub fn level_for(&self, combo: u32) -> u32 {
        self.entry_for(combo)
            .map(|level| level.id)
            .unwrap_or(FALLBACK_LEVEL_ID)
    }

    /// Entry with the lowest id.
    pub fn lowest(&self) -> Option<&Level> {
        self.levels.iter().min_by_key(|level| level.id)
    }

    #[cfg(test)]
    pub fn lowest_id(&self) -> u32 {
        self.lowest()
            .map(|level| level.id)
            .unwrap_or(FALLBACK_LEVEL_ID)
    }

    pub fn get(&self, id: u32) -> Option<&Level> {
        self.levels.iter().find(|level| level.id == id)
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self {
            levels: Self::default_levels(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_inclusive_lower_bounds() {
        let table = LevelTable::default();
        assert_eq!(table.level_for(0), 1);
        assert_eq!(table.level_for(9), 1);
        assert_eq!(table.level_for(10), 2);
        assert_eq!(table.level_for(29), 2);
        assert_eq!(table.level_for(30), 3);
        assert_eq!(table.level_for(60), 4);
        assert_eq!(table.level_for(100), 5);
        assert_eq!(table.level_for(199), 5);
        assert_eq!(table.level_for(200), 6);
        assert_eq!(table.level_for(u32::MAX), 6);
    }

    #[test]
    fn level_is_monotonic_in_combo() {
        let table = LevelTable::new(vec![
            Level::new(1, 0, "A", "white"),
            Level::new(3, 4, "B", "white"),
            Level::new(9, 5, "C", "white"),
            Level::new(12, 40, "D", "white"),
        ])
        .unwrap();

        let rising: Vec<u32> = (0..60).map(|combo| table.level_for(combo)).collect();
        assert!(rising.windows(2).all(|w| w[0] <= w[1]));
        let falling: Vec<u32> = (0..60).rev().map(|combo| table.level_for(combo)).collect();
        assert!(falling.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(table.level_for(4), 3);
        assert_eq!(table.level_for(45), 12);
        assert_eq!(table.level_for(0), table.lowest_id());
    }

    #[test]
    fn empty_table_still_resolves() {
        let table = LevelTable { levels: Vec::new() };
        assert_eq!(table.level_for(0), FALLBACK_LEVEL_ID);
        assert_eq!(table.level_for(500), FALLBACK_LEVEL_ID);
        assert_eq!(table.lowest_id(), FALLBACK_LEVEL_ID);
    }

    #[test]
    fn ties_pick_the_highest_id() {
        let table = LevelTable {
            levels: vec![
                Level::new(1, 0, "A", "white"),
                Level::new(2, 10, "B", "white"),
                Level::new(5, 10, "C", "white"),
            ],
        };
        assert_eq!(table.level_for(12), 5);
    }

    #[test]
    fn validation_rules() {
        assert!(matches!(
            LevelTable::new(Vec::new()),
            Err(ConfigError::NoLevels)
        ));
        assert!(matches!(
            LevelTable::new(vec![Level::new(1, 3, "A", "white")]),
            Err(ConfigError::FirstThreshold(3))
        ));
        assert!(matches!(
            LevelTable::new(vec![
                Level::new(1, 0, "A", "white"),
                Level::new(1, 5, "B", "white"),
            ]),
            Err(ConfigError::UnorderedIds { prev: 1, next: 1 })
        ));
    }
}
