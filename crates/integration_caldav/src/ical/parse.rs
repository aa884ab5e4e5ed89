//! Lenient VEVENT / VTODO reader
//!
//! Turns iCalendar text into flat records holding the handful of properties
//! the dashboard cares about. Nothing here fails: unknown properties, broken
//! numbers and unterminated blocks are skipped or defaulted.

use domain::{CalendarEvent, Task, TaskStatus};

use super::date::ical_to_iso_opt;

/// One `NAME;PARAMS:VALUE` content line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ContentLine<'a> {
    pub name: &'a str,
    pub params: &'a str,
    pub value: &'a str,
}

impl<'a> ContentLine<'a> {
    /// Split at the first `:`, then take the name up to the first `;`
    pub(crate) fn split(line: &'a str) -> Option<Self> {
        let (head, value) = line.split_once(':')?;
        let (name, params) = head.split_once(';').unwrap_or((head, ""));
        Some(Self {
            name,
            params,
            value,
        })
    }

    pub(crate) fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// `VALUE=DATE` present and no `DATE-TIME` anywhere in the parameters
    pub(crate) fn is_all_day(&self) -> bool {
        let params = self.params.to_ascii_uppercase();
        params.contains("VALUE=DATE") && !params.contains("DATE-TIME")
    }
}

/// Split text into logical lines
///
/// Accepts CRLF or LF. Folded continuation lines (leading space or tab) are
/// joined onto the previous line; every other line is trimmed.
pub(crate) fn logical_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in text.split('\n') {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        if raw.starts_with([' ', '\t']) {
            if let Some(previous) = lines.last_mut() {
                previous.push_str(&raw[1..]);
                continue;
            }
        }
        lines.push(raw.trim().to_string());
    }
    lines
}

/// Collect the content lines of every `component` block, in source order
///
/// A second `BEGIN` before the `END` discards the open block, as does the end
/// of input. Lines of nested sub-components (VALARM and friends) are skipped
/// so their DESCRIPTION or SUMMARY never shadows the parent's.
fn component_blocks<'a>(lines: &'a [String], component: &str) -> Vec<Vec<ContentLine<'a>>> {
    let mut blocks = Vec::new();
    let mut current: Option<Vec<ContentLine<'a>>> = None;
    let mut nested_depth = 0usize;

    for line in lines {
        let Some(content) = ContentLine::split(line) else {
            continue;
        };

        if content.is("BEGIN") {
            if content.value.eq_ignore_ascii_case(component) {
                current = Some(Vec::new());
                nested_depth = 0;
            } else if current.is_some() {
                nested_depth += 1;
            }
            continue;
        }

        if content.is("END") {
            if content.value.eq_ignore_ascii_case(component) {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
            } else {
                nested_depth = nested_depth.saturating_sub(1);
            }
            continue;
        }

        if nested_depth == 0 {
            if let Some(block) = current.as_mut() {
                block.push(content);
            }
        }
    }

    blocks
}

/// Raw VEVENT fields, values exactly as they appeared on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventRecord {
    pub uid: Option<String>,
    pub summary: Option<String>,
    pub dtstart: Option<String>,
    pub dtend: Option<String>,
    /// DTSTART carried `VALUE=DATE`
    pub all_day: bool,
    /// Comma-joined as on the wire
    pub categories: Option<String>,
    pub description: Option<String>,
}

impl EventRecord {
    /// Normalize dates and split categories
    #[must_use]
    pub fn into_event(self) -> CalendarEvent {
        CalendarEvent {
            uid: self.uid.unwrap_or_default(),
            summary: self.summary.unwrap_or_default(),
            start_date: ical_to_iso_opt(self.dtstart.as_deref()),
            end_date: ical_to_iso_opt(self.dtend.as_deref()),
            all_day: self.all_day,
            categories: self
                .categories
                .as_deref()
                .map(split_categories)
                .unwrap_or_default(),
            description: self.description.filter(|d| !d.is_empty()),
        }
    }
}

/// Raw VTODO fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoRecord {
    pub uid: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    /// 0 when absent or malformed
    pub priority: u8,
    pub due: Option<String>,
    /// DUE carried `VALUE=DATE`
    pub due_all_day: bool,
    /// 0 when absent or malformed, capped at 100
    pub percent_complete: u8,
    pub categories: Option<String>,
}

impl TodoRecord {
    /// Normalize dates, status and categories
    #[must_use]
    pub fn into_task(self) -> Task {
        Task {
            uid: self.uid.unwrap_or_default(),
            summary: self.summary.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            status: self
                .status
                .as_deref()
                .map(TaskStatus::from_ical)
                .unwrap_or_default(),
            priority: self.priority,
            due: ical_to_iso_opt(self.due.as_deref()),
            due_all_day: self.due_all_day,
            percent_complete: self.percent_complete,
            categories: self
                .categories
                .as_deref()
                .map(split_categories)
                .unwrap_or_default(),
        }
    }
}

fn parse_priority(value: &str) -> u8 {
    value.trim().parse().unwrap_or(0)
}

fn parse_percent(value: &str) -> u8 {
    value
        .trim()
        .parse::<i64>()
        .map_or(0, |p| u8::try_from(p.clamp(0, 100)).unwrap_or(0))
}

/// Split a CATEGORIES value into an ordered list
///
/// Entries are trimmed and empty ones dropped. Duplicates are kept.
#[must_use]
pub fn split_categories(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Read every VEVENT that has a SUMMARY
#[must_use]
pub fn parse_events(text: &str) -> Vec<EventRecord> {
    let lines = logical_lines(text);
    component_blocks(&lines, "VEVENT")
        .into_iter()
        .filter_map(|block| {
            let mut record = EventRecord::default();
            for line in block {
                let value = Some(line.value.to_string());
                match line.name.to_ascii_uppercase().as_str() {
                    "SUMMARY" => record.summary = value,
                    "DTSTART" => {
                        record.dtstart = value;
                        record.all_day = line.is_all_day();
                    },
                    "DTEND" => record.dtend = value,
                    "UID" => record.uid = value,
                    "CATEGORIES" => record.categories = value,
                    "DESCRIPTION" => record.description = value,
                    _ => {},
                }
            }
            record
                .summary
                .as_deref()
                .is_some_and(|s| !s.is_empty())
                .then_some(record)
        })
        .collect()
}

/// Read every VTODO that has a SUMMARY or a UID
#[must_use]
pub fn parse_todos(text: &str) -> Vec<TodoRecord> {
    let lines = logical_lines(text);
    component_blocks(&lines, "VTODO")
        .into_iter()
        .filter_map(|block| {
            let mut record = TodoRecord::default();
            for line in block {
                let value = Some(line.value.to_string());
                match line.name.to_ascii_uppercase().as_str() {
                    "UID" => record.uid = value,
                    "SUMMARY" => record.summary = value,
                    "DESCRIPTION" => record.description = value,
                    "STATUS" => record.status = value,
                    "PRIORITY" => record.priority = parse_priority(line.value),
                    "DUE" => {
                        record.due = value;
                        record.due_all_day = line.is_all_day();
                    },
                    "PERCENT-COMPLETE" => record.percent_complete = parse_percent(line.value),
                    "CATEGORIES" => record.categories = value,
                    _ => {},
                }
            }
            let present = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.is_empty());
            (present(&record.summary) || present(&record.uid)).then_some(record)
        })
        .collect()
}

/// Parse and normalize events in one step
#[must_use]
pub fn parse_calendar_events(text: &str) -> Vec<CalendarEvent> {
    parse_events(text)
        .into_iter()
        .map(EventRecord::into_event)
        .collect()
}

/// Parse and normalize tasks in one step
#[must_use]
pub fn parse_tasks(text: &str) -> Vec<Task> {
    parse_todos(text)
        .into_iter()
        .map(TodoRecord::into_task)
        .collect()
}

/// True when some `component` block in `text` has exactly this UID
///
/// Servers treat a UID text-match as a substring search, so REPORT results
/// are re-checked with this before acting on them.
#[must_use]
pub fn has_uid(text: &str, component: &str, uid: &str) -> bool {
    let lines = logical_lines(text);
    component_blocks(&lines, component)
        .iter()
        .flatten()
        .any(|line| line.is("UID") && line.value.trim() == uid)
}
