//! Entities - calendar items identified by their iCalendar UID

mod calendar_event;
mod task;

pub use calendar_event::{CalendarEvent, EventUpdate, NewEvent};
pub use task::{NewTask, Task, TaskUpdate};
