//! In-place updates of an existing VEVENT / VTODO
//!
//! The component block is held as an ordered list of entries, each keeping
//! its original text. Only the properties named by the update are rewritten;
//! everything else, including nested VALARM blocks and folded lines, is
//! written back byte for byte.

use chrono::{DateTime, Utc};
use domain::{EventUpdate, TaskStatus, TaskUpdate};
use thiserror::Error;

use super::date::{DateProperty, format_utc, ical_to_iso};
use super::generate::sanitize_text;
use super::parse::ContentLine;

/// Structural problems that make a stored object unsafe to rewrite
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("no BEGIN:{0} line found")]
    MissingBegin(&'static str),

    #[error("BEGIN:{0} is never closed")]
    MissingEnd(&'static str),

    #[error("BEGIN:{0} opened inside another {0}")]
    NestedBegin(&'static str),

    #[error("unexpected END:{0}")]
    UnexpectedEnd(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    /// A property: upper-cased name plus its physical lines
    Property { key: String, lines: Vec<String> },
    /// Kept as-is: sub-components and lines without a name
    Verbatim(Vec<String>),
}

impl Entry {
    fn lines(&self) -> &[String] {
        match self {
            Self::Property { lines, .. } | Self::Verbatim(lines) => lines,
        }
    }

    fn lines_mut(&mut self) -> &mut Vec<String> {
        match self {
            Self::Property { lines, .. } | Self::Verbatim(lines) => lines,
        }
    }

    fn key(&self) -> Option<&str> {
        match self {
            Self::Property { key, .. } => Some(key),
            Self::Verbatim(_) => None,
        }
    }
}

fn is_marker(line: &str, marker: &str, component: &str) -> bool {
    ContentLine::split(line)
        .is_some_and(|c| c.is(marker) && c.value.trim().eq_ignore_ascii_case(component))
}

fn marker_value<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    ContentLine::split(line)
        .filter(|c| c.is(marker))
        .map(|c| c.value.trim())
}

/// One calendar object split around its first `component` block
#[derive(Debug, Clone, PartialEq, Eq)]
struct Document {
    component: &'static str,
    before: Vec<String>,
    entries: Vec<Entry>,
    after: Vec<String>,
}

impl Document {
    fn parse(text: &str, component: &'static str) -> Result<Self, MergeError> {
        let mut raw_lines = text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l));

        let mut before = Vec::new();
        let mut found_begin = false;
        for line in raw_lines.by_ref() {
            let trimmed = line.trim();
            if is_marker(trimmed, "BEGIN", component) {
                found_begin = true;
                break;
            }
            before.push(trimmed.to_string());
        }
        if !found_begin {
            return Err(MergeError::MissingBegin(component));
        }

        let mut entries: Vec<Entry> = Vec::new();
        // open sub-component names, innermost last
        let mut nested: Vec<String> = Vec::new();
        let mut closed = false;

        for line in raw_lines.by_ref() {
            if line.starts_with([' ', '\t']) {
                if let Some(entry) = entries.last_mut() {
                    entry.lines_mut().push(line.to_string());
                }
                continue;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(name) = marker_value(trimmed, "BEGIN") {
                if name.eq_ignore_ascii_case(component) {
                    return Err(MergeError::NestedBegin(component));
                }
                if nested.is_empty() {
                    entries.push(Entry::Verbatim(Vec::new()));
                }
                nested.push(name.to_ascii_uppercase());
                if let Some(entry) = entries.last_mut() {
                    entry.lines_mut().push(trimmed.to_string());
                }
                continue;
            }

            if let Some(name) = marker_value(trimmed, "END") {
                let name = name.to_ascii_uppercase();
                if nested.is_empty() {
                    if name == component {
                        closed = true;
                        break;
                    }
                    return Err(MergeError::UnexpectedEnd(name));
                }
                if nested.last() != Some(&name) {
                    return Err(MergeError::UnexpectedEnd(name));
                }
                nested.pop();
                if let Some(entry) = entries.last_mut() {
                    entry.lines_mut().push(trimmed.to_string());
                }
                continue;
            }

            if !nested.is_empty() {
                if let Some(entry) = entries.last_mut() {
                    entry.lines_mut().push(trimmed.to_string());
                }
                continue;
            }

            match ContentLine::split(trimmed) {
                Some(content) => entries.push(Entry::Property {
                    key: content.name.to_ascii_uppercase(),
                    lines: vec![trimmed.to_string()],
                }),
                None => entries.push(Entry::Verbatim(vec![trimmed.to_string()])),
            }
        }

        if !closed {
            return Err(MergeError::MissingEnd(component));
        }

        let after = raw_lines.map(|l| l.trim().to_string()).collect();

        Ok(Self {
            component,
            before,
            entries,
            after,
        })
    }

    /// First occurrence of `key`, continuation lines unfolded
    fn property(&self, key: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|e| e.key() == Some(key))
            .map(|entry| {
                let mut lines = entry.lines().iter();
                let mut logical = lines.next().cloned().unwrap_or_default();
                for continuation in lines {
                    logical.push_str(continuation.get(1..).unwrap_or_default());
                }
                logical
            })
    }

    /// Replace the first `key` entry with `line` and drop the other ones, or
    /// append when absent
    fn set(&mut self, key: &str, line: String) {
        let mut replaced = false;
        self.entries.retain_mut(|entry| {
            if entry.key() != Some(key) {
                return true;
            }
            if replaced {
                return false;
            }
            *entry.lines_mut() = vec![line.clone()];
            replaced = true;
            true
        });
        if !replaced {
            self.entries.push(Entry::Property {
                key: key.to_string(),
                lines: vec![line],
            });
        }
    }

    fn remove(&mut self, key: &str) {
        self.entries.retain(|entry| entry.key() != Some(key));
    }

    fn render(self) -> String {
        let begin = format!("BEGIN:{}", self.component);
        let end = format!("END:{}", self.component);
        let mut out: Vec<&str> = self
            .before
            .iter()
            .map(String::as_str)
            .filter(|l| !l.is_empty())
            .collect();
        out.push(&begin);
        out.extend(
            self.entries
                .iter()
                .flat_map(Entry::lines)
                .map(String::as_str)
                .filter(|l| !l.trim().is_empty()),
        );
        out.push(&end);
        out.extend(
            self.after
                .iter()
                .map(String::as_str)
                .filter(|l| !l.is_empty()),
        );
        let mut text = out.join("\r\n");
        text.push_str("\r\n");
        text
    }

    fn set_text(&mut self, key: &str, value: &str) {
        self.set(key, format!("{key}:{}", sanitize_text(value)));
    }

    fn set_or_remove_text(&mut self, key: &str, value: &str) {
        if value.is_empty() {
            self.remove(key);
        } else {
            self.set_text(key, value);
        }
    }

    fn set_categories(&mut self, categories: &[String]) {
        let joined = categories
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        self.set_or_remove_text("CATEGORIES", &joined);
    }

    fn set_date(&mut self, key: &str, encoded: Option<DateProperty>) {
        if let Some(property) = encoded {
            self.set(key, property.line(key));
        }
    }

    fn is_all_day(&self, key: &str) -> bool {
        self.property(key)
            .as_deref()
            .and_then(ContentLine::split)
            .is_some_and(|c| c.is_all_day())
    }

    /// Current value of a date property as ISO text
    fn date_value(&self, key: &str) -> Option<String> {
        let line = self.property(key)?;
        ContentLine::split(&line)
            .map(|c| c.value.trim())
            .filter(|v| !v.is_empty())
            .map(ical_to_iso)
    }

    fn set_status(&mut self, status: TaskStatus) {
        self.set("STATUS", format!("STATUS:{}", status.to_ical()));
    }

    fn set_percent(&mut self, percent: u8) {
        self.set("PERCENT-COMPLETE", format!("PERCENT-COMPLETE:{percent}"));
    }

    fn stamp_completed(&mut self, now: &str) {
        self.set("COMPLETED", format!("COMPLETED:{now}"));
    }
}

/// Apply a task patch to the VTODO inside `raw`
///
/// `status` is applied before `percent_complete`, so the percentage decides
/// the final status when both are given. LAST-MODIFIED is always refreshed.
pub fn merge_task_update(
    raw: &str,
    update: &TaskUpdate,
    now: DateTime<Utc>,
) -> Result<String, MergeError> {
    let mut doc = Document::parse(raw, "VTODO")?;
    let now = format_utc(now);

    if let Some(summary) = &update.summary {
        doc.set_text("SUMMARY", summary);
    }
    if let Some(description) = &update.description {
        doc.set_or_remove_text("DESCRIPTION", description);
    }

    if let Some(status) = update.status.as_deref().and_then(TaskStatus::parse_ical) {
        doc.set_status(status);
        match status {
            TaskStatus::Completed => {
                doc.set_percent(100);
                doc.stamp_completed(&now);
            },
            TaskStatus::NeedsAction => {
                doc.set_percent(0);
                doc.remove("COMPLETED");
            },
            TaskStatus::InProgress | TaskStatus::Cancelled => {},
        }
    }

    if let Some(percent) = update.percent_complete {
        let percent = u8::try_from(percent.clamp(0, 100)).unwrap_or(100);
        let status = TaskStatus::for_percent(percent);
        doc.set_percent(percent);
        doc.set_status(status);
        if status == TaskStatus::Completed {
            doc.stamp_completed(&now);
        } else {
            doc.remove("COMPLETED");
        }
    }

    if let Some(priority) = update.priority {
        doc.set("PRIORITY", format!("PRIORITY:{priority}"));
    }

    if let Some(due) = update.due.as_deref() {
        if due.trim().is_empty() {
            doc.remove("DUE");
        } else {
            doc.set_date("DUE", DateProperty::encode_auto(due));
        }
    }

    if let Some(categories) = &update.categories {
        doc.set_categories(categories);
    }

    doc.set("LAST-MODIFIED", format!("LAST-MODIFIED:{now}"));
    Ok(doc.render())
}

/// Apply an event patch to the VEVENT inside `raw`
///
/// Dates are encoded with the update's `all_day` flag, falling back to the
/// existing DTSTART. Changing only the flag re-encodes the stored dates.
pub fn merge_event_update(
    raw: &str,
    update: &EventUpdate,
    now: DateTime<Utc>,
) -> Result<String, MergeError> {
    let mut doc = Document::parse(raw, "VEVENT")?;

    if let Some(summary) = &update.summary {
        doc.set_text("SUMMARY", summary);
    }
    if let Some(description) = &update.description {
        doc.set_or_remove_text("DESCRIPTION", description);
    }

    let all_day = update
        .all_day
        .unwrap_or_else(|| doc.is_all_day("DTSTART"));
    let toggled = update.all_day.is_some();

    let start = update
        .start_date
        .clone()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| toggled.then(|| doc.date_value("DTSTART")).flatten());
    if let Some(start) = start {
        doc.set_date("DTSTART", DateProperty::encode(&start, all_day));
    }

    match update.end_date.as_deref() {
        Some(end) if end.trim().is_empty() => doc.remove("DTEND"),
        Some(end) => doc.set_date("DTEND", DateProperty::encode(end, all_day)),
        None if toggled => {
            if let Some(end) = doc.date_value("DTEND") {
                doc.set_date("DTEND", DateProperty::encode(&end, all_day));
            }
        },
        None => {},
    }

    if let Some(categories) = &update.categories {
        doc.set_categories(categories);
    }

    doc.set("LAST-MODIFIED", format!("LAST-MODIFIED:{}", format_utc(now)));
    Ok(doc.render())
}
