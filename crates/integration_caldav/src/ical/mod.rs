//! Minimal iCalendar reader and writer
//!
//! Covers exactly what the dashboard needs from VEVENT and VTODO: a lenient
//! reader, a writer for new objects and an in-place merge for updates that
//! leaves unrelated properties untouched. Pure functions over strings, no I/O.

pub mod date;
pub mod generate;
pub mod merge;
pub mod parse;

pub use date::{DateProperty, ical_to_iso, iso_to_ical_date, iso_to_ical_datetime};
pub use generate::{PRODID, Stamp, event_ics, sanitize_text, todo_ics};
pub use merge::{MergeError, merge_event_update, merge_task_update};
pub use parse::{
    EventRecord, TodoRecord, has_uid, parse_calendar_events, parse_events, parse_tasks,
    parse_todos, split_categories,
};
