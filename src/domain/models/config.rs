use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Main configuration structure for the validator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Report file written by the run
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// File extension of trace files picked up from a trace directory
    #[serde(default = "default_trace_extension")]
    pub trace_extension: String,

    /// Lifetime of recorded entry values
    #[serde(default)]
    pub origin_scope: OriginScope,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Failure-mode classification settings
    #[serde(default)]
    pub failure: FailureConfig,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("DaikonTraceOutput.txt")
}

fn default_trace_extension() -> String {
    "dtrace".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            trace_extension: default_trace_extension(),
            origin_scope: OriginScope::default(),
            logging: LoggingConfig::default(),
            failure: FailureConfig::default(),
        }
    }
}

/// How long entry-time values stay available to `orig(...)` lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OriginScope {
    /// Cleared before each trace file
    #[default]
    PerFile,
    /// Kept for the whole run, so invocation ids are shared across files
    PerRun,
}

impl OriginScope {
    /// Config and CLI spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PerFile => "per-file",
            Self::PerRun => "per-run",
        }
    }
}

impl fmt::Display for OriginScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OriginScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per-file" => Ok(Self::PerFile),
            "per-run" => Ok(Self::PerRun),
            other => Err(format!(
                "invalid origin scope '{other}', expected per-file or per-run"
            )),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: pretty, compact or json
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for JSON log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// File rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

fn default_rotation() -> String {
    "never".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Failure-mode classification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FailureConfig {
    /// Text a correct run prints; when unset a line heuristic is used
    #[serde(default)]
    pub golden_output: Option<String>,

    /// Output of a run that died before producing anything real
    #[serde(default = "default_startup_banner")]
    pub startup_banner: String,

    /// File name prefix of captured outputs, followed by the trace id
    #[serde(default = "default_artifact_prefix")]
    pub artifact_prefix: String,

    /// Token whose presence on a line marks corrupted output
    #[serde(default = "default_heuristic_token")]
    pub heuristic_token: String,
}

fn default_startup_banner() -> String {
    "PARSEC Benchmark Suite\n".to_string()
}

fn default_artifact_prefix() -> String {
    "std_outputfile-run-".to_string()
}

fn default_heuristic_token() -> String {
    "not".to_string()
}

impl Default for FailureConfig {
    fn default() -> Self {
        Self {
            golden_output: None,
            startup_banner: default_startup_banner(),
            artifact_prefix: default_artifact_prefix(),
            heuristic_token: default_heuristic_token(),
        }
    }
}
