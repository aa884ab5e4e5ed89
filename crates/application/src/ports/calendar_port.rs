//! Calendar port for application layer
//!
//! Defines the interface for calendar operations (read/write events).
//! Implemented by adapters in the infrastructure layer; each adapter is
//! bound to one calendar.

use async_trait::async_trait;
use domain::{CalendarEvent, DateRange, EventUpdate, NewEvent};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Calendar port trait
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CalendarPort: Send + Sync {
    /// List events, limited to `range` when given
    async fn list_events(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<CalendarEvent>, ApplicationError>;

    /// Create an event and return its UID
    async fn create_event(&self, event: &NewEvent) -> Result<String, ApplicationError>;

    /// Apply a partial update to the event with `uid`
    async fn update_event(&self, uid: &str, update: &EventUpdate)
    -> Result<(), ApplicationError>;

    /// Delete the event with `uid`
    async fn delete_event(&self, uid: &str) -> Result<(), ApplicationError>;
}
