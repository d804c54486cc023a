//! Configuration loading from disk.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RankerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RankerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Load configuration, falling back to validated defaults when the file is absent.
pub fn load_or_default(path: &Path) -> Result<RankerConfig, ConfigError> {
    match fs::read_to_string(path) {
        Ok(content) => parse_config(&content),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            let config = RankerConfig::default();
            validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
        Err(e) => Err(ConfigError::Io(e)),
    }
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<RankerConfig, ConfigError> {
    let config: RankerConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.probe.timeout_ms, 10_000);
    }

    #[test]
    fn test_missing_file_is_error_for_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[fallback]\nstatus_baseline = 3\nprimary_limit = 2").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.fallback.status_baseline, 3);
        assert_eq!(config.fallback.primary_limit, Some(2));
        assert_eq!(config.fallback.secondary_limit, Some(1));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[probe\ntimeout_ms = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_display() {
        let err = parse_config("[probe]\ntimeout_ms = 0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: probe.timeout_ms must be greater than zero"
        );
    }
}
