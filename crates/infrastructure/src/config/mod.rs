//! Application configuration
//!
//! Sources, lowest precedence first:
//! - built-in defaults
//! - an optional `config.toml` (or any format the `config` crate knows)
//! - environment variables prefixed `HOMELAB_`, with `__` between sections
//!   (`HOMELAB_CALDAV__SERVER_URL`)

mod integrations;
mod logging;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use integrations::CalDavAppConfig;
pub use logging::{LogFormat, LoggingConfig};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "HOMELAB";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// CalDAV server (required for every calendar command)
    #[serde(default)]
    pub caldav: Option<CalDavAppConfig>,

    /// Log level and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load from `./config.*` (if present) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load from an explicit file (which must exist) or `./config.*`
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::build(path, environment())
    }

    fn build(
        path: Option<&Path>,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        config::Config::builder()
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    /// CalDAV section, or a configuration error naming what is missing
    pub fn caldav(&self) -> Result<&CalDavAppConfig, config::ConfigError> {
        self.caldav.as_ref().ok_or_else(|| {
            config::ConfigError::NotFound(format!(
                "caldav (set [caldav] in config.toml or {ENV_PREFIX}_CALDAV__SERVER_URL)"
            ))
        })
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
