//! Date range value object for calendar queries

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::errors::DomainError;

/// Half-open UTC time window `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    /// Create a range, rejecting an end before the start
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::InvalidDateTime(format!(
                "range end {end} is before start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The whole calendar day of `date`, midnight to midnight UTC
    pub fn day(date: NaiveDate) -> Result<Self, DomainError> {
        let start = date.and_time(NaiveTime::MIN).and_utc();
        let end = start
            .checked_add_signed(Duration::days(1))
            .ok_or_else(|| DomainError::InvalidDateTime(format!("no day after {date}")))?;
        Ok(Self { start, end })
    }

    /// Window around `now`: `days_back` before it to `days_ahead` after it
    ///
    /// Fails when either edge falls outside the representable range.
    pub fn around(
        now: DateTime<Utc>,
        days_back: u32,
        days_ahead: u32,
    ) -> Result<Self, DomainError> {
        let out_of_range =
            |days: u32| DomainError::InvalidDateTime(format!("{days} days from {now} is out of range"));
        let start = Duration::try_days(i64::from(days_back))
            .and_then(|back| now.checked_sub_signed(back))
            .ok_or_else(|| out_of_range(days_back))?;
        let end = Duration::try_days(i64::from(days_ahead))
            .and_then(|ahead| now.checked_add_signed(ahead))
            .ok_or_else(|| out_of_range(days_ahead))?;
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }
}
