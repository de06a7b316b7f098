//! Runtime configuration
//!
//! Loaded from a JSON file (default `parsley.json`). Every key is optional;
//! a missing file yields the defaults.
//!
//! ```json
//! {"schema_dir": "./schemas", "dialect": "postgres", "coerce": true, "log_level": "INFO"}
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::schema::SqlDialect;
use crate::validation::ValidationOptions;

pub const DEFAULT_CONFIG_FILE: &str = "parsley.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config JSON in '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsleyConfig {
    /// Directory holding `*.json` schema documents (default: "./schemas")
    #[serde(default = "default_schema_dir")]
    pub schema_dir: PathBuf,

    /// Dialect for column definitions (default: sqlite)
    #[serde(default)]
    pub dialect: SqlDialect,

    /// Coerce input representations before type checks (default: true)
    #[serde(default = "default_coerce")]
    pub coerce: bool,

    /// Minimum log severity (default: INFO)
    #[serde(default = "default_log_level")]
    pub log_level: Severity,
}

fn default_schema_dir() -> PathBuf {
    PathBuf::from("./schemas")
}

fn default_coerce() -> bool {
    true
}

fn default_log_level() -> Severity {
    Severity::Info
}

impl Default for ParsleyConfig {
    fn default() -> Self {
        Self {
            schema_dir: default_schema_dir(),
            dialect: SqlDialect::default(),
            coerce: default_coerce(),
            log_level: default_log_level(),
        }
    }
}

impl ParsleyConfig {
    /// Loads the file at `path`, or defaults when it does not exist.
    ///
    /// Relative `schema_dir` values resolve against the config file's
    /// directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let mut config: ParsleyConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        if config.schema_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.schema_dir = parent.join(&config.schema_dir);
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.schema_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("schema_dir must not be empty".to_string()));
        }
        Ok(())
    }

    /// Applies process-wide settings and logs the load
    pub fn apply(&self) {
        Logger::set_min_severity(self.log_level);
        log_event_with_fields(
            Event::ConfigLoaded,
            &[
                ("dialect", self.dialect.as_str()),
                ("schema_dir", &self.schema_dir.display().to_string()),
            ],
        );
    }

    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions {
            coerce: self.coerce,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ParsleyConfig::default();
        assert_eq!(config.schema_dir, PathBuf::from("./schemas"));
        assert_eq!(config.dialect, SqlDialect::Sqlite);
        assert!(config.coerce);
        assert_eq!(config.log_level, Severity::Info);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ParsleyConfig::load(&temp_dir.path().join("parsley.json")).unwrap();
        assert_eq!(config, ParsleyConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("parsley.json");
        fs::write(&path, r#"{"dialect": "postgres", "coerce": false, "log_level": "WARN"}"#).unwrap();

        let config = ParsleyConfig::load(&path).unwrap();
        assert_eq!(config.dialect, SqlDialect::Postgres);
        assert!(!config.validation_options().coerce);
        assert_eq!(config.log_level, Severity::Warn);
        assert_eq!(config.schema_dir, temp_dir.path().join("./schemas"));
    }

    #[test]
    fn test_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("parsley.json");
        fs::write(&path, "{ dialect: ").unwrap();
        assert!(matches!(ParsleyConfig::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_unknown_dialect_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("parsley.json");
        fs::write(&path, r#"{"dialect": "oracle"}"#).unwrap();
        assert!(ParsleyConfig::load(&path).is_err());
    }
}
