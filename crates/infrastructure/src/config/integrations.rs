//! External integration configuration

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::default_true;

// ==============================
// CalDAV Configuration
// ==============================

/// CalDAV calendar server configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct CalDavAppConfig {
    /// CalDAV server URL (e.g., <https://cloud.example.com>)
    pub server_url: String,

    /// Username for authentication
    pub username: String,

    /// Password for authentication (sensitive - uses `SecretString`)
    #[serde(skip_serializing)]
    pub password: SecretString,

    /// Calendar holding events (default: `personal`)
    #[serde(default = "default_calendar")]
    pub calendar: String,

    /// Calendar holding VTODO tasks (default: `tasks`)
    #[serde(default = "default_tasks_calendar")]
    pub tasks_calendar: String,

    /// Calendar home path; Nextcloud layout when unset
    #[serde(default)]
    pub calendar_home: Option<String>,

    /// Verify TLS certificates (default: true)
    #[serde(default = "default_true")]
    pub verify_certs: bool,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_caldav_timeout")]
    pub timeout_secs: u64,

    /// Seconds before a validated connection is checked again (default: 300)
    #[serde(default = "default_revalidate_secs")]
    pub revalidate_secs: u64,
}

impl std::fmt::Debug for CalDavAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalDavAppConfig")
            .field("server_url", &self.server_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("calendar", &self.calendar)
            .field("tasks_calendar", &self.tasks_calendar)
            .field("calendar_home", &self.calendar_home)
            .field("verify_certs", &self.verify_certs)
            .field("timeout_secs", &self.timeout_secs)
            .field("revalidate_secs", &self.revalidate_secs)
            .finish()
    }
}

fn default_calendar() -> String {
    "personal".to_string()
}

fn default_tasks_calendar() -> String {
    "tasks".to_string()
}

const fn default_caldav_timeout() -> u64 {
    30
}

const fn default_revalidate_secs() -> u64 {
    300
}

impl CalDavAppConfig {
    /// Convert to `integration_caldav`'s `CalDavConfig`
    #[must_use]
    pub fn to_caldav_config(&self) -> integration_caldav::CalDavConfig {
        integration_caldav::CalDavConfig {
            server_url: self.server_url.clone(),
            username: self.username.clone(),
            password: self.password.expose_secret().to_string(),
            calendar_home: self.calendar_home.clone(),
            verify_certs: self.verify_certs,
            timeout_secs: self.timeout_secs,
        }
    }

    /// Interval for lazy session revalidation
    #[must_use]
    pub const fn revalidate_after(&self) -> Duration {
        Duration::from_secs(self.revalidate_secs)
    }
}
