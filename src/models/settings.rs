//! Game configuration loaded from TOML.
//!
//! Every section has defaults so a missing file (or a partial one) still
//! produces a playable configuration. Validation only checks the invariants
//! the core relies on: a usable level table, a decay factor in (0, 1) and
//! non-zero intervals.

use crate::models::level::{Level, LevelTable};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Config file looked up when `RCLICKER_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "rclicker.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("level table is empty")]
    NoLevels,
    #[error("first level threshold must be 0, found {0}")]
    FirstThreshold(u32),
    #[error("level thresholds must be strictly increasing ({prev} then {next})")]
    UnorderedThresholds { prev: u32, next: u32 },
    #[error("level ids must be strictly increasing ({prev} then {next})")]
    UnorderedIds { prev: u32, next: u32 },
    #[error("decay factor must be in (0, 1), found {0}")]
    DecayFactor(f64),
    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),
}

fn default_start_delay_ms() -> u64 {
    2000
}
fn default_tick_interval_ms() -> u64 {
    100
}
fn default_factor() -> f64 {
    0.90
}
fn default_record_flash_ms() -> u64 {
    200
}

/// Idle decay parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayConfig {
    /// Idle time before decay begins.
    #[serde(default = "default_start_delay_ms")]
    pub start_delay_ms: u64,
    /// Cadence of the decay timer.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Combo is multiplied by this on every decaying tick.
    #[serde(default = "default_factor")]
    pub factor: f64,
    /// How long the new-record flag stays raised.
    #[serde(default = "default_record_flash_ms")]
    pub record_flash_ms: u64,
}

impl DecayConfig {
    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn record_flash(&self) -> Duration {
        Duration::from_millis(self.record_flash_ms)
    }
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: default_start_delay_ms(),
            tick_interval_ms: default_tick_interval_ms(),
            factor: default_factor(),
            record_flash_ms: default_record_flash_ms(),
        }
    }
}

fn default_rocket() -> u32 {
    10
}
fn default_shockwave() -> u32 {
    100
}
fn default_hyperspace() -> u32 {
    300
}
fn default_feedback() -> u32 {
    20
}
fn default_special_combo() -> u32 {
    67
}

/// Combo intervals driving the milestone events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneConfig {
    #[serde(default = "default_rocket")]
    pub rocket: u32,
    #[serde(default = "default_shockwave")]
    pub shockwave: u32,
    #[serde(default = "default_hyperspace")]
    pub hyperspace: u32,
    #[serde(default = "default_feedback")]
    pub feedback: u32,
    /// The one combo value with its own celebration.
    #[serde(default = "default_special_combo")]
    pub special_combo: u32,
}

impl Default for MilestoneConfig {
    fn default() -> Self {
        Self {
            rocket: default_rocket(),
            shockwave: default_shockwave(),
            hyperspace: default_hyperspace(),
            feedback: default_feedback(),
            special_combo: default_special_combo(),
        }
    }
}

fn default_game_over_delay_ms() -> u64 {
    1000
}
fn default_rank_refresh_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Grace period between the combo hitting zero and game over.
    #[serde(default = "default_game_over_delay_ms")]
    pub game_over_delay_ms: u64,
    /// How often the leaderboard snapshot is refreshed while playing.
    #[serde(default = "default_rank_refresh_ms")]
    pub rank_refresh_ms: u64,
}

impl SessionConfig {
    pub fn game_over_delay(&self) -> Duration {
        Duration::from_millis(self.game_over_delay_ms)
    }

    pub fn rank_refresh(&self) -> Duration {
        Duration::from_millis(self.rank_refresh_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game_over_delay_ms: default_game_over_delay_ms(),
            rank_refresh_ms: default_rank_refresh_ms(),
        }
    }
}

fn default_database() -> PathBuf {
    PathBuf::from("data/leaderboard.db")
}
fn default_limit() -> u32 {
    10
}
fn default_max_limit() -> u32 {
    100
}
fn default_retention() -> u32 {
    10
}
fn default_name_max_len() -> usize {
    10
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    #[serde(default = "default_database")]
    pub database: PathBuf,
    #[serde(default = "default_limit")]
    pub default_limit: u32,
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
    /// Entries kept after each submission, 0 keeps everything.
    #[serde(default = "default_retention")]
    pub retention: u32,
    #[serde(default = "default_name_max_len")]
    pub name_max_len: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            retention: default_retention(),
            name_max_len: default_name_max_len(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "LevelTable::default_levels")]
    pub levels: Vec<Level>,
    #[serde(default)]
    pub decay: DecayConfig,
    #[serde(default)]
    pub milestones: MilestoneConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            levels: LevelTable::default_levels(),
            decay: DecayConfig::default(),
            milestones: MilestoneConfig::default(),
            session: SessionConfig::default(),
            leaderboard: LeaderboardConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Settings {
    /// Loads and validates the config at `path`. A missing file yields defaults.
    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("CONFIG: {:?} not found, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Loads `path`. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings: Settings = load_toml(path)?;
        settings.validate()?;
        log::info!(
            "CONFIG: loaded {:?} ({} levels)",
            path,
            settings.levels.len()
        );
        Ok(settings)
    }

    #[cfg(test)]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        LevelTable::check(&self.levels)?;

        let factor = self.decay.factor;
        if !(factor > 0.0 && factor < 1.0) {
            return Err(ConfigError::DecayFactor(factor));
        }
        if self.decay.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroValue("decay.tick_interval_ms"));
        }

        let m = &self.milestones;
        for (name, value) in [
            ("milestones.rocket", m.rocket),
            ("milestones.shockwave", m.shockwave),
            ("milestones.hyperspace", m.hyperspace),
            ("milestones.feedback", m.feedback),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroValue(name));
            }
        }

        if self.leaderboard.max_limit == 0 {
            return Err(ConfigError::ZeroValue("leaderboard.max_limit"));
        }
        if self.leaderboard.name_max_len == 0 {
            return Err(ConfigError::ZeroValue("leaderboard.name_max_len"));
        }
        Ok(())
    }

    /// Builds the immutable level table shared by the session.
    pub fn level_table(&self) -> Result<LevelTable, ConfigError> {
        LevelTable::new(self.levels.clone())
    }
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| {
        log::error!("Failed to parse TOML file {:?}: {}", path, source);
        ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })
}
