//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - stderr output (pretty, compact or JSON)
//! - optional JSON log files with rotation

pub mod config;
pub mod logger;

pub use config::{LogConfig, LogFormat, RotationPolicy};
pub use logger::LoggerImpl;
