//! VCALENDAR text for newly created events and tasks

use chrono::{DateTime, Utc};
use domain::{NewEvent, NewTask, TaskStatus};
use uuid::Uuid;

use super::date::{DateProperty, format_utc};

/// PRODID written into every generated calendar object
pub const PRODID: &str = "-//Homelab//Control Plane//EN";

/// UID and clock for one generated object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    pub uid: String,
    pub now: DateTime<Utc>,
}

impl Stamp {
    /// Random v4 UID at the current instant
    #[must_use]
    pub fn fresh() -> Self {
        Self {
            uid: Uuid::new_v4().to_string(),
            now: Utc::now(),
        }
    }

    /// Fixed UID and instant
    #[must_use]
    pub fn fixed(uid: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            uid: uid.into(),
            now,
        }
    }
}

/// Replace `"` with `'`
///
/// This is the only escaping applied; commas, colons and semicolons are
/// written as-is.
#[must_use]
pub fn sanitize_text(text: &str) -> String {
    text.replace('"', "'")
}

fn wrap(component: &str, body: Vec<String>) -> String {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{PRODID}"),
        format!("BEGIN:{component}"),
    ];
    lines.extend(body);
    lines.push(format!("END:{component}"));
    lines.push("END:VCALENDAR".to_string());
    lines.push(String::new());
    lines.join("\r\n")
}

fn push_optional(lines: &mut Vec<String>, name: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        lines.push(format!("{name}:{}", sanitize_text(value)));
    }
}

fn push_categories(lines: &mut Vec<String>, categories: &[String]) {
    let joined = categories
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(",");
    if !joined.is_empty() {
        lines.push(format!("CATEGORIES:{joined}"));
    }
}

/// Build a VEVENT calendar object
///
/// All-day events write `DTSTART;VALUE=DATE` and `DTEND;VALUE=DATE`, the end
/// defaulting to the start date. Timed events write `DTEND` only when an end
/// is given. Dates that cannot be encoded are left out.
#[must_use]
pub fn event_ics(event: &NewEvent, stamp: &Stamp) -> String {
    let mut lines = vec![
        format!("UID:{}", stamp.uid),
        format!("DTSTAMP:{}", format_utc(stamp.now)),
    ];

    let end = event
        .end_date
        .as_deref()
        .filter(|e| !e.is_empty())
        .or(event.all_day.then_some(event.start_date.as_str()));

    if let Some(start) = DateProperty::encode(&event.start_date, event.all_day) {
        lines.push(start.line("DTSTART"));
    }
    if let Some(end) = end.and_then(|e| DateProperty::encode(e, event.all_day)) {
        lines.push(end.line("DTEND"));
    }

    lines.push(format!("SUMMARY:{}", sanitize_text(event.summary.trim())));
    push_optional(&mut lines, "DESCRIPTION", event.description.as_deref());
    push_categories(&mut lines, &event.categories);

    wrap("VEVENT", lines)
}

/// Build a VTODO calendar object
///
/// New tasks start as `NEEDS-ACTION` at 0 percent. A due value that is a
/// bare date becomes `DUE;VALUE=DATE`, anything with a time a UTC
/// date-time.
#[must_use]
pub fn todo_ics(task: &NewTask, stamp: &Stamp) -> String {
    let now = format_utc(stamp.now);
    let mut lines = vec![
        format!("UID:{}", stamp.uid),
        format!("DTSTAMP:{now}"),
        format!("CREATED:{now}"),
        format!("LAST-MODIFIED:{now}"),
    ];

    if let Some(due) = task
        .due
        .as_deref()
        .filter(|d| !d.is_empty())
        .and_then(DateProperty::encode_auto)
    {
        lines.push(due.line("DUE"));
    }

    lines.push(format!("SUMMARY:{}", sanitize_text(task.summary.trim())));
    lines.push(format!("STATUS:{}", TaskStatus::NeedsAction.to_ical()));
    lines.push("PERCENT-COMPLETE:0".to_string());
    push_optional(&mut lines, "DESCRIPTION", task.description.as_deref());
    if task.priority != 0 {
        lines.push(format!("PRIORITY:{}", task.priority));
    }
    push_categories(&mut lines, &task.categories);

    wrap("VTODO", lines)
}
