//! Tracker configuration loaded from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Config file read when `QUEST_TRACKER_CONFIG` is not set
pub const DEFAULT_CONFIG_PATH: &str = "quest-tracker.toml";
/// Environment variable overriding the config file path
pub const CONFIG_PATH_ENV: &str = "QUEST_TRACKER_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub daily_reset: DailyResetConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// sqlx connection string for the record database
    pub database_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:quest_tracker.db?mode=rwc".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive, extended by `RUST_LOG`
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "quest_tracker=info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyResetConfig {
    pub enabled: bool,
}

impl Default for DailyResetConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl TrackerConfig {
    /// Load config from a TOML file. A missing file yields the defaults.
    ///
    /// Runs before logging is installed, so it reports nothing itself.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;

        toml::from_str(&content).map_err(|e| format!("Failed to parse {:?}: {}", path, e))
    }

    /// Config path from the environment, or the default
    pub fn path_from_env() -> String {
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = TrackerConfig::load(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert!(config.daily_reset.enabled);
    }

    #[test]
    fn test_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tracker.toml");
        std::fs::write(
            &path,
            r#"
[storage]
database_url = "sqlite:/tmp/elsewhere.db?mode=rwc"

[daily_reset]
enabled = false
"#,
        )
        .unwrap();

        let config = TrackerConfig::load(&path).unwrap();
        assert_eq!(config.storage.database_url, "sqlite:/tmp/elsewhere.db?mode=rwc");
        assert!(!config.daily_reset.enabled);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tracker.toml");
        std::fs::write(&path, "[daily_reset]\nenabled = \"sometimes\"\n").unwrap();

        let err = TrackerConfig::load(&path).unwrap_err();
        assert!(err.contains("Failed to parse"));
    }
}
