//! Almanac journal
//!
//! One quote per day, stored as an all-day event on the main calendar.

use std::{fmt, sync::Arc};

use chrono::{Days, NaiveDate};
use domain::{CalendarEvent, DateRange, DomainError, NewEvent};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{error::ApplicationError, ports::CalendarPort};

/// Category and summary prefix for almanac entries
pub const ALMANAC_CATEGORY: &str = "Olivers Almanac";

/// A recorded quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlmanacEntry {
    /// `YYYY-MM-DD`
    pub date: String,
    pub quote: String,
    pub uid: String,
}

impl AlmanacEntry {
    fn from_event(event: CalendarEvent) -> Option<Self> {
        let is_entry = event.categories.iter().any(|c| c == ALMANAC_CATEGORY)
            || event.summary.starts_with(ALMANAC_CATEGORY);
        if !is_entry {
            return None;
        }
        let date = event.start_date.as_deref()?.get(..10)?.to_string();
        let quote = event
            .summary
            .strip_prefix(ALMANAC_CATEGORY)
            .and_then(|rest| rest.strip_prefix(':'))
            .unwrap_or(&event.summary)
            .trim()
            .to_string();
        Some(Self {
            date,
            quote,
            uid: event.uid,
        })
    }
}

pub struct AlmanacService {
    calendar_port: Arc<dyn CalendarPort>,
}

impl fmt::Debug for AlmanacService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlmanacService").finish_non_exhaustive()
    }
}

impl AlmanacService {
    pub fn new(calendar_port: Arc<dyn CalendarPort>) -> Self {
        Self { calendar_port }
    }

    /// Store `quote` for `date` and return the new event's UID
    ///
    /// A day holds at most one quote; a second one is rejected with
    /// [`DomainError::AlreadyExists`].
    #[instrument(skip(self, quote))]
    pub async fn record_quote(
        &self,
        date: NaiveDate,
        quote: &str,
    ) -> Result<String, ApplicationError> {
        let quote = quote.trim();
        if quote.is_empty() {
            return Err(DomainError::validation("quote is required").into());
        }

        if let Some(existing) = self.entries_between(date, date).await?.into_iter().next() {
            return Err(DomainError::AlreadyExists(format!(
                "almanac entry for {}: {}",
                existing.date, existing.quote
            ))
            .into());
        }

        let entry = NewEvent::new(
            format!("{ALMANAC_CATEGORY}: {quote}"),
            date.format("%Y-%m-%d").to_string(),
        )
        .all_day()
        .with_category(ALMANAC_CATEGORY);

        let uid = self.calendar_port.create_event(&entry).await?;
        info!(uid = %uid, "Almanac entry recorded");
        Ok(uid)
    }

    /// Entries from `days` before `until` through `until`, oldest first
    #[instrument(skip(self))]
    pub async fn recent(
        &self,
        until: NaiveDate,
        days: u32,
    ) -> Result<Vec<AlmanacEntry>, ApplicationError> {
        let from = until
            .checked_sub_days(Days::new(u64::from(days)))
            .ok_or_else(|| {
                DomainError::InvalidDateTime(format!("{days} days before {until} is out of range"))
            })?;
        self.entries_between(from, until).await
    }

    /// Entries dated `from` through `to` inclusive, oldest first
    pub async fn entries_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AlmanacEntry>, ApplicationError> {
        let range = DateRange::new(DateRange::day(from)?.start(), DateRange::day(to)?.end())?;
        let first = from.format("%Y-%m-%d").to_string();
        let last = to.format("%Y-%m-%d").to_string();

        let mut entries: Vec<AlmanacEntry> = self
            .calendar_port
            .list_events(Some(range))
            .await?
            .into_iter()
            .filter_map(AlmanacEntry::from_event)
            .filter(|e| e.date >= first && e.date <= last)
            .collect();
        entries.sort_by(|a, b| a.date.cmp(&b.date));
        debug!(count = entries.len(), "Almanac entries loaded");
        Ok(entries)
    }
}
