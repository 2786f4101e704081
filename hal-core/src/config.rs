//! Process configuration
//!
//! Stored as JSON, by default in /etc/switchhal/config.json. The location can
//! be overridden with the `SWITCHHAL_CONFIG` environment variable.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::paths;
use crate::error::{HalError, Result};

/// Settings consulted by entries and entities on every call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HalConfig {
    /// Replace all hardware I/O with fixed responses
    #[serde(default)]
    pub simulation: bool,

    /// Report live hardware thresholds instead of the configured ones
    #[serde(default)]
    pub report_hw_thresholds: bool,
}

/// Location of the configuration file
pub fn config_path() -> PathBuf {
    match std::env::var(paths::CONFIG_ENV_VAR) {
        Ok(p) if !p.is_empty() => PathBuf::from(p),
        _ => PathBuf::from(paths::DEFAULT_CONFIG_FILE),
    }
}

impl HalConfig {
    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = ?path, "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(HalError::FileRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config: HalConfig = serde_json::from_str(&data)?;
        debug!(path = ?path, ?config, "Loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = HalConfig::load_from(&dir.path().join("none.json")).unwrap();
        assert_eq!(config, HalConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"report_hw_thresholds": true}"#).unwrap();
        let config = HalConfig::load_from(&path).unwrap();
        assert!(config.report_hw_thresholds);
        assert!(!config.simulation);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"simulation": true, "verbose": 3}"#).unwrap();
        assert!(matches!(
            HalConfig::load_from(&path),
            Err(HalError::JsonParse(_))
        ));
    }

    #[test]
    #[serial]
    fn test_env_var_overrides_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, r#"{"simulation": true}"#).unwrap();

        std::env::set_var(paths::CONFIG_ENV_VAR, &path);
        assert_eq!(config_path(), path);
        let config = HalConfig::load().unwrap();
        std::env::remove_var(paths::CONFIG_ENV_VAR);

        assert!(config.simulation);
    }

    #[test]
    #[serial]
    fn test_default_path_without_env() {
        std::env::remove_var(paths::CONFIG_ENV_VAR);
        assert_eq!(config_path(), PathBuf::from(paths::DEFAULT_CONFIG_FILE));
    }
}
