//! CalDAV event (VEVENT) operations

use async_trait::async_trait;
use chrono::Utc;
use domain::{CalendarEvent, DateRange, EventUpdate, NewEvent};
use tracing::{debug, instrument};

use crate::client::{CalDavError, ComponentKind, HttpCalDavClient, calendar_query};
use crate::ical::{Stamp, event_ics, merge_event_update, parse_calendar_events};

/// CalDAV client trait for calendar events
#[async_trait]
pub trait CalDavClient: Send + Sync {
    /// List events, optionally limited to a time range
    async fn list_events(
        &self,
        calendar: &str,
        range: Option<&DateRange>,
    ) -> Result<Vec<CalendarEvent>, CalDavError>;

    /// Create an event and return its UID
    async fn create_event(&self, calendar: &str, event: &NewEvent)
    -> Result<String, CalDavError>;

    /// Rewrite the fields named in `update`, keeping everything else
    async fn update_event(
        &self,
        calendar: &str,
        uid: &str,
        update: &EventUpdate,
    ) -> Result<(), CalDavError>;

    /// Delete an event by UID
    async fn delete_event(&self, calendar: &str, uid: &str) -> Result<(), CalDavError>;
}

#[async_trait]
impl CalDavClient for HttpCalDavClient {
    #[instrument(skip(self))]
    async fn list_events(
        &self,
        calendar: &str,
        range: Option<&DateRange>,
    ) -> Result<Vec<CalendarEvent>, CalDavError> {
        let resources = self
            .report(calendar, calendar_query(ComponentKind::Event, range))
            .await?;

        let events: Vec<CalendarEvent> = resources
            .iter()
            .filter_map(|r| r.calendar_data.as_deref())
            .flat_map(parse_calendar_events)
            .collect();

        debug!(count = events.len(), "Events fetched");
        Ok(events)
    }

    #[instrument(skip(self, event), fields(summary = %event.summary))]
    async fn create_event(
        &self,
        calendar: &str,
        event: &NewEvent,
    ) -> Result<String, CalDavError> {
        let stamp = Stamp::fresh();
        self.put_new(calendar, &stamp.uid, event_ics(event, &stamp))
            .await?;
        Ok(stamp.uid)
    }

    #[instrument(skip(self, update))]
    async fn update_event(
        &self,
        calendar: &str,
        uid: &str,
        update: &EventUpdate,
    ) -> Result<(), CalDavError> {
        let resource = self.find_by_uid(calendar, ComponentKind::Event, uid).await?;
        let raw = resource
            .calendar_data
            .as_deref()
            .ok_or_else(|| CalDavError::ObjectNotFound(uid.to_string()))?;
        let merged = merge_event_update(raw, update, Utc::now())?;
        self.put_existing(&resource, merged).await
    }

    #[instrument(skip(self))]
    async fn delete_event(&self, calendar: &str, uid: &str) -> Result<(), CalDavError> {
        self.delete_by_uid(calendar, ComponentKind::Event, uid)
            .await
    }
}
