//! # Engine Configuration
//!
//! Settings for bootstrapping the analysis engine, loaded from environment
//! variables and validated before use. Matching thresholds are deliberately
//! not configurable; they live as constants next to the code that uses them.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Default location of the ingredient catalog
pub const DEFAULT_CATALOG_PATH: &str = "data/ingredients.csv";

/// Environment variables read by [`EngineConfig::from_env`]
pub const ENV_VARIABLES: &str = "INGREDIENT_CATALOG_PATH, LOG_LEVEL, LOG_FORMAT";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Catalog location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path of the delimited catalog file
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CATALOG_PATH),
        }
    }
}

impl CatalogConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.path.as_os_str().is_empty() {
            return Err(AppError::Config("Catalog path cannot be empty".to_string()));
        }
        if self.path.is_dir() {
            return Err(AppError::Config(format!(
                "Catalog path '{}' is a directory",
                self.path.display()
            )));
        }
        Ok(())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!(
                "LOG_FORMAT must be 'pretty' or 'json', got '{}'",
                other
            ))),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level for the engine's targets
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> AppResult<()> {
        if !LOG_LEVELS.contains(&self.level.as_str()) {
            return Err(AppError::Config(format!(
                "LOG_LEVEL must be one of {:?}, got '{}'",
                LOG_LEVELS, self.level
            )));
        }
        Ok(())
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// Reads `INGREDIENT_CATALOG_PATH`, `LOG_LEVEL` and `LOG_FORMAT`, falling
    /// back to defaults for unset variables.
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        let catalog = CatalogConfig {
            path: env::var("INGREDIENT_CATALOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog.path),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL")
                .map(|level| level.trim().to_lowercase())
                .unwrap_or(defaults.logging.level),
            format: match env::var("LOG_FORMAT") {
                Ok(value) => LogFormat::parse(&value)?,
                Err(_) => defaults.logging.format,
            },
        };

        let config = Self { catalog, logging };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        self.catalog.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

impl fmt::Display for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "catalog={} log_level={} log_format={:?}",
            self.catalog.path.display(),
            self.logging.level,
            self.logging.format
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.catalog.path, PathBuf::from(DEFAULT_CATALOG_PATH));
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_invalid_log_level() {
        let config = LoggingConfig {
            level: "verbose".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::parse("JSON").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::parse(" pretty ").unwrap(), LogFormat::Pretty);
        assert!(LogFormat::parse("xml").is_err());
    }

    #[test]
    fn test_empty_catalog_path_rejected() {
        let config = CatalogConfig {
            path: PathBuf::new(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_directory_catalog_path_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = CatalogConfig {
            path: dir.path().to_path_buf(),
        };
        assert!(config.validate().is_err());
    }
}
