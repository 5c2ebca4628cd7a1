//! Settings sections of `config.toml`

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::progress::leaderboard::DEFAULT_WINDOW_DAYS;
use crate::storage::StorageBackend;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// `file`, `sqlite` or `memory`
    #[serde(default)]
    pub backend: StorageBackend,

    /// Root directory for the backend. Defaults to `~/.marquee/data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringSettings {
    /// Never let the running total drop below zero.
    /// Per-day rows are not clamped either way.
    #[serde(default)]
    pub clamp_total_at_zero: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardSettings {
    /// Calendar days shown, today included
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

fn default_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
        }
    }
}
