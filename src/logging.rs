//! Structured logging for the `adev` binary.
//!
//! Logs go to stderr so that commands printing documents to stdout
//! (`adev fsm from-file`, `adev fsm chain`) stay pipeable.

use anyhow::Context;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for machines, pretty-print for terminals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Include file:line in each event.
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// `ADEV_LOG_LEVEL`, `ADEV_LOG_FORMAT` and `ADEV_LOG_LOCATION`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = LogConfig::default();
        LogConfig {
            log_level: lookup("ADEV_LOG_LEVEL").unwrap_or(defaults.log_level),
            format: lookup("ADEV_LOG_FORMAT")
                .map(|f| LogFormat::parse(&f))
                .unwrap_or(defaults.format),
            include_location: lookup("ADEV_LOG_LOCATION")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.include_location),
        }
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `log_level` when set.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level().as_str()));

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse_defaults_to_pretty() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("xml"), LogFormat::Pretty);
    }

    #[test]
    fn test_from_lookup() {
        let config = LogConfig::from_lookup(|key| match key {
            "ADEV_LOG_LEVEL" => Some("debug".to_string()),
            "ADEV_LOG_FORMAT" => Some("json".to_string()),
            "ADEV_LOG_LOCATION" => Some("true".to_string()),
            _ => None,
        });
        assert_eq!(config.level(), Level::DEBUG);
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.include_location);
    }

    #[test]
    fn test_unknown_level_is_info() {
        let config = LogConfig::from_lookup(|key| (key == "ADEV_LOG_LEVEL").then(|| "loud".to_string()));
        assert_eq!(config.level(), Level::INFO);
        assert_eq!(config, LogConfig { log_level: "loud".into(), ..LogConfig::default() });
    }
}
