//! Runtime configuration resolved from the environment.
//!
//! # Invariants
//! - Blank variables behave exactly like unset ones.
//! - `log_dir == None` means file logging stays off.

use crate::logging::{LogLevel, LoggingError};
use crate::repo::csv_file_repo::DEFAULT_DATA_FILE_NAME;
use std::path::PathBuf;

pub const DATA_FILE_ENV: &str = "BOOKLOG_DATA_FILE";
pub const LOG_LEVEL_ENV: &str = "BOOKLOG_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "BOOKLOG_LOG_DIR";

/// Settings needed to open the reading log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Backing CSV file.
    pub data_file: PathBuf,
    pub log_level: LogLevel,
    /// Absolute directory for rolling log files.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE_NAME),
            log_level: LogLevel::build_default(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, LoggingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, falling back to defaults.
    ///
    /// # Errors
    /// - `UnsupportedLevel` when the level variable names no known level.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LoggingError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = value(DATA_FILE_ENV) {
            config.data_file = PathBuf::from(path);
        }
        if let Some(level) = value(LOG_LEVEL_ENV) {
            config.log_level = LogLevel::parse(&level)?;
        }
        config.log_dir = value(LOG_DIR_ENV).map(PathBuf::from);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, DATA_FILE_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use crate::logging::{LogLevel, LoggingError};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.data_file, PathBuf::from("book_tracker_data.csv"));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config =
            AppConfig::from_lookup(lookup(&[(DATA_FILE_ENV, "  "), (LOG_DIR_ENV, "")])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            (DATA_FILE_ENV, "/data/books.csv"),
            (LOG_LEVEL_ENV, "WARN"),
            (LOG_DIR_ENV, "/var/log/booklog"),
        ]))
        .unwrap();

        assert_eq!(config.data_file, PathBuf::from("/data/books.csv"));
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/booklog")));
    }

    #[test]
    fn unknown_level_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[(LOG_LEVEL_ENV, "chatty")])).unwrap_err();
        assert!(matches!(err, LoggingError::UnsupportedLevel(_)));
    }
}
