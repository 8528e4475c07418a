//! Fetch configuration for resource-backed choices and batch loading.
//!
//! Settings are read from a small JSON file at `$MERIDIAN_CONFIG_PATH` or, when
//! unset, `<config_dir>/meridian/config.json`. A missing file means defaults; a
//! malformed file is logged and also falls back to defaults so one bad edit never
//! blocks data loading.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use dirs_next::config_dir;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::path_from_env;

/// Environment variable allowing callers to override the config file path.
pub const CONFIG_PATH_ENV: &str = "MERIDIAN_CONFIG_PATH";

/// Default filename for the JSON payload.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Error surfaced when the config file exists but cannot be read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Network settings used when fetching resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,
    /// User-Agent header override.
    pub user_agent: Option<String>,
    /// Per-attempt timeout applied by the batch loader, if any.
    pub batch_timeout_secs: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 60,
            connect_timeout_secs: 30,
            user_agent: None,
            batch_timeout_secs: None,
        }
    }
}

impl FetchConfig {
    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&default_config_path())
    }

    /// Load from `path`. Missing files and malformed payloads yield defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(config) => Ok(config),
                Err(error) => {
                    warn!(
                        path = %path.display(),
                        error = %error,
                        "Failed to parse config file; using defaults"
                    );
                    Ok(Self::default())
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(ConfigError::Io(error)),
        }
    }

    /// Persist to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn batch_timeout(&self) -> Option<Duration> {
        self.batch_timeout_secs.map(Duration::from_secs)
    }
}

/// Get the default path for the config file.
pub fn default_config_path() -> PathBuf {
    if let Some(path) = path_from_env(CONFIG_PATH_ENV) {
        return path;
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("meridian")
        .join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = FetchConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, FetchConfig::default());
        assert_eq!(config.connect_timeout(), Duration::from_secs(30));
        assert_eq!(config.batch_timeout(), None);
    }

    #[test]
    fn partial_file_fills_remaining_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"request_timeout_secs": 5, "batch_timeout_secs": 12}"#).unwrap();

        let config = FetchConfig::load_from(&path).unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.batch_timeout(), Some(Duration::from_secs(12)));
        assert_eq!(config.connect_timeout_secs, 30);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(FetchConfig::load_from(&path).unwrap(), FetchConfig::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = FetchConfig {
            user_agent: Some("meridian-test".into()),
            ..FetchConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(FetchConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn default_path_honors_env_override() {
        temp_env::with_var(CONFIG_PATH_ENV, Some("/tmp/meridian-custom.json"), || {
            assert_eq!(default_config_path(), PathBuf::from("/tmp/meridian-custom.json"));
        });
    }
}
