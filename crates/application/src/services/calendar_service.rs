//! Calendar service
//!
//! Business logic for calendar operations including event management.

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use domain::{CalendarEvent, DateRange, DomainError, EventUpdate, NewEvent};
use tracing::{debug, info, instrument};

use crate::{error::ApplicationError, ports::CalendarPort};

/// Days before now included in the upcoming window
pub const LOOKBACK_DAYS: u32 = 7;

/// Default number of days ahead for [`CalendarService::upcoming`]
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 30;

/// Category applied to new events that name none
pub const DEFAULT_CATEGORY: &str = "personal";

/// Calendar service for handling calendar operations
pub struct CalendarService {
    calendar_port: Arc<dyn CalendarPort>,
}

impl fmt::Debug for CalendarService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarService").finish_non_exhaustive()
    }
}

impl CalendarService {
    /// Create a new calendar service
    pub fn new(calendar_port: Arc<dyn CalendarPort>) -> Self {
        Self { calendar_port }
    }

    /// Events from a week ago up to `days` ahead, sorted by start
    pub async fn upcoming(&self, days: u32) -> Result<Vec<CalendarEvent>, ApplicationError> {
        self.upcoming_from(Utc::now(), days).await
    }

    /// Like [`Self::upcoming`] with an explicit reference instant
    #[instrument(skip(self))]
    pub async fn upcoming_from(
        &self,
        now: DateTime<Utc>,
        days: u32,
    ) -> Result<Vec<CalendarEvent>, ApplicationError> {
        let range = DateRange::around(now, LOOKBACK_DAYS, days)?;
        let mut events = self.calendar_port.list_events(Some(range)).await?;
        events.sort_by(|a, b| {
            a.start_date
                .as_deref()
                .unwrap_or("")
                .cmp(b.start_date.as_deref().unwrap_or(""))
        });
        debug!(count = events.len(), "Upcoming events loaded");
        Ok(events)
    }

    /// Create an event and return its UID
    ///
    /// Summary and start are required. Events without categories are filed
    /// under `personal`.
    #[instrument(skip(self, event), fields(summary = %event.summary))]
    pub async fn create(&self, mut event: NewEvent) -> Result<String, ApplicationError> {
        event.summary = event.summary.trim().to_string();
        if event.summary.is_empty() {
            return Err(DomainError::validation("summary is required").into());
        }
        if event.start_date.trim().is_empty() {
            return Err(DomainError::validation("startDate is required").into());
        }
        if event.categories.iter().all(|c| c.trim().is_empty()) {
            event.categories = vec![DEFAULT_CATEGORY.to_string()];
        }

        let uid = self.calendar_port.create_event(&event).await?;
        info!(uid = %uid, "Event created");
        Ok(uid)
    }

    /// Apply a partial update
    #[instrument(skip(self, update))]
    pub async fn update(&self, uid: &str, update: &EventUpdate) -> Result<(), ApplicationError> {
        require_uid(uid)?;
        if update.is_empty() {
            return Err(DomainError::validation("update contains no fields").into());
        }
        self.calendar_port.update_event(uid, update).await?;
        info!(uid = %uid, "Event updated");
        Ok(())
    }

    /// Delete an event
    #[instrument(skip(self))]
    pub async fn delete(&self, uid: &str) -> Result<(), ApplicationError> {
        require_uid(uid)?;
        self.calendar_port.delete_event(uid).await?;
        info!(uid = %uid, "Event deleted");
        Ok(())
    }
}

pub(crate) fn require_uid(uid: &str) -> Result<(), ApplicationError> {
    if uid.trim().is_empty() {
        return Err(DomainError::validation("uid is required").into());
    }
    Ok(())
}
