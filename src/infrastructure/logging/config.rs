use std::path::PathBuf;

use crate::domain::models::config::LoggingConfig;
use crate::infrastructure::config::ConfigError;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format for stderr
    pub format: LogFormat,

    /// Directory for JSON log files (optional, if None logs only to stderr)
    pub log_dir: Option<PathBuf>,

    /// Log file rotation policy
    pub rotation: RotationPolicy,
}

/// Stderr output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human oriented
    Pretty,
    /// One line per event
    Compact,
    /// Newline-delimited JSON
    Json,
}

/// Log file rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationPolicy {
    Daily,
    Hourly,
    /// Single file, appended across runs
    #[default]
    Never,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            log_dir: None,
            rotation: RotationPolicy::default(),
        }
    }
}

impl TryFrom<&LoggingConfig> for LogConfig {
    type Error = ConfigError;

    fn try_from(config: &LoggingConfig) -> Result<Self, Self::Error> {
        let format = match config.format.as_str() {
            "pretty" => LogFormat::Pretty,
            "compact" => LogFormat::Compact,
            "json" => LogFormat::Json,
            other => return Err(ConfigError::InvalidLogFormat(other.to_string())),
        };
        let rotation = match config.rotation.as_str() {
            "daily" => RotationPolicy::Daily,
            "hourly" => RotationPolicy::Hourly,
            "never" => RotationPolicy::Never,
            other => return Err(ConfigError::InvalidLogRotation(other.to_string())),
        };

        Ok(Self {
            level: config.level.clone(),
            format,
            log_dir: config.log_dir.clone(),
            rotation,
        })
    }
}
