//! Process configuration.
//!
//! A typed configuration structure, loaded from a TOML file and validated
//! once at startup, then passed by reference into constructors. Nothing
//! re-reads the file at runtime.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::Date;

use clime_types::parse_utc_offset;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote provider settings.
    pub provider: ProviderConfig,
    /// The station this process ingests.
    pub station: StationConfig,
    /// Rate-limit and retry settings.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return any errors.
    ///
    /// This checks:
    /// - Provider base URL is present and uses http(s)
    /// - API key and station id are not empty
    /// - The station UTC offset parses as `±HH:MM`
    /// - Rate-limit window and call budget are non-zero
    /// - Storage path is not empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        errors.extend(self.provider.validate());
        errors.extend(self.station.validate());
        errors.extend(self.limits.validate());
        errors.extend(self.storage.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load and validate configuration from a file.
    ///
    /// This is a convenience method that combines `load()` and `validate()`.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }
}

/// Remote provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the provider API.
    pub base_url: String,
    /// API key sent with every request.
    pub api_key: String,
}

impl ProviderConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.base_url.is_empty() {
            errors.push(ValidationError {
                field: "provider.base_url".to_string(),
                message: "base URL cannot be empty".to_string(),
            });
        } else if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            errors.push(ValidationError {
                field: "provider.base_url".to_string(),
                message: format!(
                    "base URL '{}' must start with http:// or https://",
                    self.base_url
                ),
            });
        }

        if self.api_key.is_empty() {
            errors.push(ValidationError {
                field: "provider.api_key".to_string(),
                message: "API key cannot be empty".to_string(),
            });
        }

        errors
    }
}

/// The station this process ingests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    /// Station identifier at the provider.
    pub id: String,
    /// Earliest date the station has observations for; backfill starts here.
    #[serde(with = "clime_types::serde_date")]
    pub earliest_observation: Date,
    /// The station's UTC offset as `±HH:MM`; daily boundaries are
    /// station-local.
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
}

fn default_utc_offset() -> String {
    "+00:00".to_string()
}

impl StationConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.id.is_empty() {
            errors.push(ValidationError {
                field: "station.id".to_string(),
                message: "station id cannot be empty".to_string(),
            });
        }

        if let Err(e) = parse_utc_offset(&self.utc_offset) {
            errors.push(ValidationError {
                field: "station.utc_offset".to_string(),
                message: e.to_string(),
            });
        }

        errors
    }
}

/// Rate-limit and retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Calls admitted per rate-limit window.
    pub max_calls: u32,
    /// Rate-limit window length in seconds.
    pub window_secs: u64,
    /// Retry attempts after the initial call.
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    pub initial_delay_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_calls: 30,
            window_secs: 60,
            max_retries: 3,
            initial_delay_ms: 500,
        }
    }
}

impl LimitsConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.max_calls == 0 {
            errors.push(ValidationError {
                field: "limits.max_calls".to_string(),
                message: "call budget must be at least 1".to_string(),
            });
        }
        if self.window_secs == 0 {
            errors.push(ValidationError {
                field: "limits.window_secs".to_string(),
                message: "window cannot be zero".to_string(),
            });
        }

        errors
    }

    /// The rate-limit window as a [`Duration`].
    #[must_use]
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// The initial retry delay as a [`Duration`].
    #[must_use]
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }
}

/// Storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file path.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: clime_store::default_db_path(),
        }
    }
}

impl StorageConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.path.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "storage.path".to_string(),
                message: "database path cannot be empty".to_string(),
            });
        }

        errors
    }
}

/// A single validation failure.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Which config field failed.
    pub field: String,
    /// What was wrong with it.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read config from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse the config file.
    #[error("Failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// The configuration is invalid.
    #[error("Invalid configuration: {}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        toml::from_str(
            r#"
            [provider]
            base_url = "https://api.example.com/v2/pws"
            api_key = "secret"

            [station]
            id = "KAZPHOEN1"
            earliest_observation = "2021-03-01"
            utc_offset = "-07:00"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_minimal_config_parses_with_defaults() {
        let config = valid_config();
        config.validate().unwrap();

        assert_eq!(config.limits.max_calls, 30);
        assert_eq!(config.limits.window(), Duration::from_secs(60));
        assert_eq!(config.station.utc_offset, "-07:00");
        assert_eq!(
            config.station.earliest_observation,
            clime_types::parse_date("2021-03-01").unwrap()
        );
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let mut config = valid_config();
        config.provider.base_url = "api.example.com".to_string();
        config.provider.api_key = String::new();
        config.station.id = String::new();
        config.station.utc_offset = "MST".to_string();
        config.limits.max_calls = 0;

        let err = config.validate().unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(
                    fields,
                    [
                        "provider.base_url",
                        "provider.api_key",
                        "station.id",
                        "station.utc_offset",
                        "limits.max_calls"
                    ]
                );
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_load_validated_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("climecapsule.toml");
        std::fs::write(
            &path,
            r#"
            [provider]
            base_url = "https://api.example.com/v2/pws"
            api_key = "secret"

            [station]
            id = "KAZPHOEN1"
            earliest_observation = "2021-03-01"

            [limits]
            max_calls = 10
            window_secs = 30
            "#,
        )
        .unwrap();

        let config = Config::load_validated(&path).unwrap();
        assert_eq!(config.limits.max_calls, 10);
        // Offset falls back to UTC
        assert_eq!(config.station.utc_offset, "+00:00");
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(matches!(
            Config::load("/nonexistent/climecapsule.toml"),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_bad_date_fails_to_parse() {
        let result: Result<Config, _> = toml::from_str(
            r#"
            [provider]
            base_url = "https://api.example.com"
            api_key = "secret"

            [station]
            id = "S1"
            earliest_observation = "March 1st"
            "#,
        );
        assert!(result.is_err());
    }
}
