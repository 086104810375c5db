//! Gamification configuration: XP rewards, badge catalog, level thresholds.
//!
//! All three tables are fixed configuration consumed by the engine, loadable
//! from a TOML file with sensible defaults when the file is absent.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::gamification::badges::{default_badges, BadgeDefinition};
use crate::gamification::levels::LevelTable;

/// Activity type keys recognized by the default reward table.
pub mod activity {
    pub const QUIZ_COMPLETION: &str = "quiz_completion";
    pub const GRAPH_CREATION: &str = "graph_creation";
    pub const DAILY_LOGIN: &str = "daily_login";
    pub const PERFECT_QUIZ: &str = "perfect_quiz";
    pub const DAILY_PROBLEM: &str = "daily_problem";
    pub const CHAT_INTERACTION: &str = "chat_interaction";
    pub const STREAK_MILESTONE: &str = "streak_milestone";
}

/// XP reward amounts keyed by activity type.
///
/// Unknown activity types intentionally award 0 XP instead of failing, so
/// new callers can introduce activity strings without breaking the engine.
/// The zero-XP ledger rows they produce keep typos auditable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewardTable {
    amounts: BTreeMap<String, i64>,
}

impl Default for RewardTable {
    fn default() -> Self {
        let amounts = [
            (activity::QUIZ_COMPLETION, 50),
            (activity::GRAPH_CREATION, 100),
            (activity::DAILY_LOGIN, 10),
            (activity::PERFECT_QUIZ, 100),
            (activity::DAILY_PROBLEM, 75),
            (activity::CHAT_INTERACTION, 5),
            (activity::STREAK_MILESTONE, 50),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self { amounts }
    }
}

impl RewardTable {
    /// Reward amount for an activity type; 0 for unrecognized types.
    pub fn amount(&self, activity_type: &str) -> i64 {
        self.amounts.get(activity_type).copied().unwrap_or(0)
    }

    /// Whether the activity type is a recognized reward key.
    pub fn is_known(&self, activity_type: &str) -> bool {
        self.amounts.contains_key(activity_type)
    }
}

/// Full gamification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamificationConfig {
    #[serde(default)]
    pub rewards: RewardTable,
    #[serde(default)]
    pub levels: LevelTable,
    #[serde(default = "default_badges")]
    pub badges: Vec<BadgeDefinition>,
}

// Not derived: a derived impl would leave `badges` empty, since the serde
// default only applies during deserialization.
impl Default for GamificationConfig {
    fn default() -> Self {
        Self {
            rewards: RewardTable::default(),
            levels: LevelTable::default(),
            badges: default_badges(),
        }
    }
}

/// Load configuration from a TOML file, falling back to defaults when the
/// file does not exist.
pub fn load_config(path: &Path) -> Result<GamificationConfig, ConfigError> {
    if !path.exists() {
        return Ok(GamificationConfig::default());
    }

    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Save configuration to a TOML file.
pub fn save_config(path: &Path, config: &GamificationConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::WriteError(e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to serialize config: {0}")]
    SerializeError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),
}
