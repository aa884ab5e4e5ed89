//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer on top of the CalDAV
//! integration, and owns configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, CalDavAppConfig, LogFormat, LoggingConfig};
pub use telemetry::{TelemetryError, init_logging};
