//! Calendar event entity (VEVENT)

use serde::{Deserialize, Serialize};

/// A calendar event as exposed to API consumers
///
/// Dates are ISO-8601 strings: `YYYY-MM-DD` for all-day events,
/// `YYYY-MM-DDTHH:MM:SS` otherwise. Timestamps carry no zone; the deployment
/// runs in a single timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// iCalendar UID
    pub uid: String,
    /// Event title
    pub summary: String,
    /// Start date or date-time
    pub start_date: Option<String>,
    /// End date or date-time
    pub end_date: Option<String>,
    /// Whether DTSTART carried `VALUE=DATE`
    pub all_day: bool,
    /// Categories in source order
    #[serde(default)]
    pub categories: Vec<String>,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CalendarEvent {
    /// Sort key: all-day events first, then by start date
    #[must_use]
    pub fn agenda_key(&self) -> (bool, &str) {
        (!self.all_day, self.start_date.as_deref().unwrap_or(""))
    }
}

/// Fields for creating a new event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    /// Event title (required)
    pub summary: String,
    /// ISO start date or date-time (required)
    pub start_date: String,
    /// ISO end date or date-time
    #[serde(default)]
    pub end_date: Option<String>,
    /// Write DTSTART/DTEND as `VALUE=DATE`
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewEvent {
    /// Create an event draft with the required fields
    #[must_use]
    pub fn new(summary: impl Into<String>, start_date: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            start_date: start_date.into(),
            ..Self::default()
        }
    }

    /// Builder: mark as all-day
    #[must_use]
    pub const fn all_day(mut self) -> Self {
        self.all_day = true;
        self
    }

    /// Builder: set end date
    #[must_use]
    pub fn with_end(mut self, end_date: impl Into<String>) -> Self {
        self.end_date = Some(end_date.into());
        self
    }

    /// Builder: set description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: add category
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }
}

/// Partial update of an existing event
///
/// `None` leaves the property untouched. An empty `description`, `end_date`
/// or `categories` removes the property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdate {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub all_day: Option<bool>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

impl EventUpdate {
    /// True when no field is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.description.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.all_day.is_none()
            && self.categories.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(start: Option<&str>, all_day: bool) -> CalendarEvent {
        CalendarEvent {
            uid: "uid".to_string(),
            summary: "Event".to_string(),
            start_date: start.map(ToString::to_string),
            end_date: None,
            all_day,
            categories: Vec::new(),
            description: None,
        }
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(event(Some("2026-02-15"), true)).unwrap();
        assert_eq!(json["startDate"], "2026-02-15");
        assert_eq!(json["allDay"], true);
        assert!(json.get("description").is_none());
    }

    #[test]
    fn agenda_key_puts_all_day_first() {
        let mut events = vec![
            event(Some("2026-02-15T08:00:00"), false),
            event(Some("2026-02-15"), true),
            event(None, false),
        ];
        events.sort_by(|a, b| a.agenda_key().cmp(&b.agenda_key()));
        assert!(events[0].all_day);
        assert_eq!(events[1].start_date, None);
        assert_eq!(events[2].start_date.as_deref(), Some("2026-02-15T08:00:00"));
    }

    #[test]
    fn new_event_builder() {
        let draft = NewEvent::new("Dentist", "2026-04-01T09:00:00")
            .with_end("2026-04-01T10:00:00")
            .with_description("Bring forms")
            .with_category("health");
        assert_eq!(draft.summary, "Dentist");
        assert!(!draft.all_day);
        assert_eq!(draft.end_date.as_deref(), Some("2026-04-01T10:00:00"));
        assert_eq!(draft.categories, vec!["health".to_string()]);
    }

    #[test]
    fn empty_update_detection() {
        assert!(EventUpdate::default().is_empty());
        let update = EventUpdate {
            all_day: Some(true),
            ..EventUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
