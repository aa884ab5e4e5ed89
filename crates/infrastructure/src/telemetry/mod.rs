//! Logging setup
//!
//! Installs the global `tracing` subscriber. Output goes to stderr so command
//! results on stdout stay machine-readable.

use std::io;

use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};

/// Errors during logging initialization
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Failed to initialize logging: {0}")]
    Init(String),
}

/// Pick the filter directive: `RUST_LOG` wins, then `override_level`, then config
pub fn resolve_filter(
    config: &LoggingConfig,
    override_level: Option<&str>,
) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let directive = override_level.unwrap_or(&config.level);
    EnvFilter::try_new(directive).map_err(|e| TelemetryError::InvalidFilter {
        filter: directive.to_string(),
        reason: e.to_string(),
    })
}

/// Install the global subscriber
///
/// Fails if a subscriber is already set.
pub fn init_logging(
    config: &LoggingConfig,
    override_level: Option<&str>,
) -> Result<(), TelemetryError> {
    let filter = resolve_filter(config, override_level)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_writer(io::stderr))
            .try_init(),
    };
    result.map_err(|e| TelemetryError::Init(e.to_string()))?;

    debug!(format = ?config.format, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_directive() {
        let config = LoggingConfig {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        };
        // RUST_LOG would take precedence; only assert when it is unset.
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(resolve_filter(&config, Some("integration_caldav=loud")).is_err());
            assert!(resolve_filter(&config, None).is_ok());
            assert!(resolve_filter(&config, Some("integration_caldav=debug")).is_ok());
        }
    }

    #[test]
    fn second_init_fails() {
        let config = LoggingConfig::default();
        let _ = init_logging(&config, Some("warn"));
        assert!(matches!(
            init_logging(&config, Some("warn")),
            Err(TelemetryError::Init(_))
        ));
    }
}
