//! Client configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::Result;

/// Failure records kept before the oldest are pruned
pub const DEFAULT_MAX_FAILURES: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    /// Filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Retention limit for the failure log, 0 keeps everything
    pub max_failures: usize,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("slsk.db"),
            log_filter: "info".to_string(),
            max_failures: DEFAULT_MAX_FAILURES,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("SLSK"))
            .unwrap_or_else(|| PathBuf::from(".slsk"))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a JSON config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(CoreError::Config("database_path cannot be empty".to_string()));
        }
        if self.log_filter.trim().is_empty() {
            return Err(CoreError::Config("log_filter cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config() {
        let config = Config::new(PathBuf::from("/var/lib/slsk"));
        assert_eq!(config.database_path, PathBuf::from("/var/lib/slsk/slsk.db"));
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.max_failures, DEFAULT_MAX_FAILURES);
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = Config::new(PathBuf::from("/tmp/slsk"));
        config.log_filter = "slsk_core=debug".to_string();
        config.max_failures = 10;

        let json = config.to_json().unwrap();
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = Config::from_json(r#"{"database_path": "/tmp/x.db"}"#).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.max_failures, DEFAULT_MAX_FAILURES);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(matches!(
            Config::from_json(r#"{"database_path": ""}"#),
            Err(CoreError::Config(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"log_filter": "  "}"#),
            Err(CoreError::Config(_))
        ));
        assert!(matches!(
            Config::from_json("[1, 2]"),
            Err(CoreError::Serialization(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Config::load("/nonexistent/slsk/config.json"),
            Err(CoreError::Io(_))
        ));
    }
}
