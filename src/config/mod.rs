//! Configuration loading and management

mod io;
mod settings;

pub use settings::{LeaderboardSettings, ScoringSettings, StorageSettings};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where the profile is kept
    #[serde(default)]
    pub storage: StorageSettings,

    /// Score bookkeeping
    #[serde(default)]
    pub scoring: ScoringSettings,

    /// Recent-days panel
    #[serde(default)]
    pub leaderboard: LeaderboardSettings,
}

impl Config {
    /// Directory the storage backend is rooted at.
    ///
    /// Falls back to `~/.marquee/data` when `storage.data_dir` is unset.
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(|| Self::global_config_dir().join("data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageBackend;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert!(!config.scoring.clamp_total_at_zero);
        assert_eq!(config.leaderboard.window_days, 7);
    }

    #[test]
    fn test_partial_sections() {
        let config: Config = toml::from_str(
            r#"
            [storage]
            backend = "sqlite"
            data_dir = "/tmp/marquee"

            [scoring]
            clamp_total_at_zero = true
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/marquee"));
        assert!(config.scoring.clamp_total_at_zero);
        assert_eq!(config.leaderboard.window_days, 7);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let result: Result<Config, _> = toml::from_str("[storage]\nbackend = \"redis\"\n");
        assert!(result.is_err());
    }
}
