//! Calendar adapter - Implements CalendarPort over a CalDAV session

use std::sync::Arc;

use application::{ApplicationError, ports::CalendarPort};
use async_trait::async_trait;
use domain::{CalendarEvent, DateRange, EventUpdate, NewEvent};
use integration_caldav::{CalDavClient, CalDavSession};
use tracing::instrument;

use super::map_caldav_error;

/// Adapter for event operations on one CalDAV calendar
pub struct CalDavCalendarAdapter {
    session: Arc<CalDavSession>,
    calendar: String,
}

impl std::fmt::Debug for CalDavCalendarAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalDavCalendarAdapter")
            .field("calendar", &self.calendar)
            .finish_non_exhaustive()
    }
}

impl CalDavCalendarAdapter {
    /// Create an adapter bound to `calendar` (name, path or URL)
    pub fn new(session: Arc<CalDavSession>, calendar: impl Into<String>) -> Self {
        Self {
            session,
            calendar: calendar.into(),
        }
    }

    fn map_error(err: integration_caldav::CalDavError) -> ApplicationError {
        map_caldav_error(err, "Event")
    }
}

#[async_trait]
impl CalendarPort for CalDavCalendarAdapter {
    #[instrument(skip(self), fields(calendar = %self.calendar))]
    async fn list_events(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<CalendarEvent>, ApplicationError> {
        let client = self.session.ensure_healthy().await.map_err(Self::map_error)?;
        client
            .list_events(&self.calendar, range.as_ref())
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self, event), fields(calendar = %self.calendar))]
    async fn create_event(&self, event: &NewEvent) -> Result<String, ApplicationError> {
        let client = self.session.ensure_healthy().await.map_err(Self::map_error)?;
        client
            .create_event(&self.calendar, event)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self, update), fields(calendar = %self.calendar))]
    async fn update_event(&self, uid: &str, update: &EventUpdate) -> Result<(), ApplicationError> {
        let client = self.session.ensure_healthy().await.map_err(Self::map_error)?;
        client
            .update_event(&self.calendar, uid, update)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self), fields(calendar = %self.calendar))]
    async fn delete_event(&self, uid: &str) -> Result<(), ApplicationError> {
        let client = self.session.ensure_healthy().await.map_err(Self::map_error)?;
        client
            .delete_event(&self.calendar, uid)
            .await
            .map_err(Self::map_error)
    }
}
