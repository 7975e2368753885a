//! Structured logging for CloudCore.
//!
//! Installs a `tracing-subscriber` fmt layer behind an `EnvFilter`.
//! `RUST_LOG` wins when set; otherwise the configured level applies to this
//! crate only. Output goes to stderr so stdout stays clean for reports.

use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace level (most verbose)
    Trace = 0,
    /// Debug level
    Debug = 1,
    /// Info level
    Info = 2,
    /// Warning level
    Warn = 3,
    /// Error level
    Error = 4,
}

impl LogLevel {
    /// Level for a `-v` count: 0 warn, 1 info, 2 debug, 3+ trace.
    pub fn from_verbosity(count: u8) -> Self {
        match count {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    pub fn as_tracing(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Minimum level for this crate
    pub level: LogLevel,
    /// One JSON object per event
    pub json_format: bool,
    /// Include module path
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            json_format: false,
            include_target: false,
        }
    }
}

impl LoggingConfig {
    /// Verbose human-readable output.
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            json_format: false,
            include_target: true,
        }
    }

    /// JSON output at info.
    pub fn production() -> Self {
        Self {
            level: LogLevel::Info,
            json_format: true,
            include_target: true,
        }
    }

    /// Set level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Directive used when `RUST_LOG` is unset.
    pub fn default_directive(&self) -> String {
        format!("cloudcore={}", self.level)
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let installed = if config.json_format {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(config.include_target);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    } else {
        let fmt_layer = fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(config.include_target);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    };

    installed.map_err(|e| Error::Config(format!("logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, LogLevel::Warn);
        assert!(!config.json_format);
        assert_eq!(config.default_directive(), "cloudcore=warn");
    }

    #[test]
    fn test_production_config() {
        let config = LoggingConfig::production();
        assert!(config.json_format);
        assert_eq!(config.level.as_tracing(), Level::INFO);
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(LogLevel::from_verbosity(0), LogLevel::Warn);
        assert_eq!(LogLevel::from_verbosity(2), LogLevel::Debug);
        assert_eq!(LogLevel::from_verbosity(9), LogLevel::Trace);
        assert!(LogLevel::Trace < LogLevel::Error);
    }

    #[test]
    fn test_with_level() {
        let config = LoggingConfig::development().with_level(LogLevel::Error);
        assert_eq!(config.default_directive(), "cloudcore=error");
        assert!(config.include_target);
    }
}
