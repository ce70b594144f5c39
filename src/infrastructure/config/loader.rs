use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project-local config file picked up when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "invariant-validator.yaml";

/// Prefix of environment overrides, e.g. `INVARIANT_VALIDATOR_ORIGIN_SCOPE`.
pub const ENV_PREFIX: &str = "INVARIANT_VALIDATOR_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: pretty, compact, json")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    #[error("Trace extension cannot be empty")]
    EmptyTraceExtension,

    #[error("Captured output prefix cannot be empty")]
    EmptyArtifactPrefix,

    #[error("Heuristic token cannot be empty")]
    EmptyHeuristicToken,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. ./invariant-validator.yaml (optional)
    /// 3. Environment variables (INVARIANT_VALIDATOR_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        Self::extract(Figment::new().merge(Yaml::file(DEFAULT_CONFIG_FILE)))
            .context("Failed to extract configuration from figment")
    }

    /// Load configuration from a specific file, still honouring the environment
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        Self::extract(Figment::new().merge(Yaml::file(path)))
            .with_context(|| format!("Failed to load config from {}", path.display()))
    }

    fn extract(file_layer: Figment) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(file_layer)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["pretty", "compact", "json"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(
                config.logging.rotation.clone(),
            ));
        }

        if config.trace_extension.is_empty() {
            return Err(ConfigError::EmptyTraceExtension);
        }

        if config.failure.artifact_prefix.is_empty() {
            return Err(ConfigError::EmptyArtifactPrefix);
        }

        if config.failure.heuristic_token.is_empty() {
            return Err(ConfigError::EmptyHeuristicToken);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::config::OriginScope;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output_path, PathBuf::from("DaikonTraceOutput.txt"));
        assert_eq!(config.trace_extension, "dtrace");
        assert_eq!(config.origin_scope, OriginScope::PerFile);
        assert_eq!(config.failure.startup_banner, "PARSEC Benchmark Suite\n");
        assert!(config.failure.golden_output.is_none());
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
output_path: /tmp/violations.csv
origin_scope: per-run
logging:
  level: debug
  format: json
failure:
  golden_output: "checksum OK"
  heuristic_token: "FAIL"
"#;

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.output_path, PathBuf::from("/tmp/violations.csv"));
        assert_eq!(config.origin_scope, OriginScope::PerRun);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.failure.golden_output.as_deref(), Some("checksum OK"));
        assert_eq!(config.failure.heuristic_token, "FAIL");
        assert_eq!(config.failure.artifact_prefix, "std_outputfile-run-");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogFormat(_))
        ));
    }

    #[test]
    fn test_validate_empty_fields() {
        let mut config = Config::default();
        config.trace_extension = String::new();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyTraceExtension)
        ));

        let mut config = Config::default();
        config.failure.heuristic_token = String::new();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyHeuristicToken)
        ));
    }

    #[test]
    fn test_load_from_file_with_env_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "trace_extension: trace\norigin_scope: per-run\n").unwrap();

        temp_env::with_var("INVARIANT_VALIDATOR_ORIGIN_SCOPE", Some("per-file"), || {
            let config = ConfigLoader::load_from_file(&path).unwrap();
            assert_eq!(config.trace_extension, "trace");
            assert_eq!(config.origin_scope, OriginScope::PerFile);
        });
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        assert!(ConfigLoader::load_from_file("/nonexistent/config.yaml").is_err());
    }
}
