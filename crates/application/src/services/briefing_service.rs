//! Daily briefing
//!
//! Collects one day's events and the open tasks due by that day, each
//! tagged with its life-area pillar. Either source may fail without
//! sinking the briefing: a failed fetch yields an empty section.

use std::{fmt, sync::Arc};

use chrono::NaiveDate;
use domain::{CalendarEvent, DateRange, Pillar, Task, TaskStatus};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::ports::{CalendarPort, TaskPort};

/// An item annotated with its pillar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tagged<T> {
    #[serde(flatten)]
    pub item: T,
    pub pillar: Pillar,
}

impl Tagged<CalendarEvent> {
    fn event(event: CalendarEvent) -> Self {
        let pillar = Pillar::classify(&event.categories, &event.summary);
        Self {
            item: event,
            pillar,
        }
    }
}

impl Tagged<Task> {
    fn task(task: Task) -> Self {
        let pillar = Pillar::classify(&task.categories, &task.summary);
        Self { item: task, pillar }
    }
}

/// Agenda for a single day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyBriefing {
    pub date: NaiveDate,
    /// English weekday name, e.g. `Monday`
    pub weekday: String,
    pub events: Vec<Tagged<CalendarEvent>>,
    pub tasks: Vec<Tagged<Task>>,
}

/// Builds [`DailyBriefing`]s from the calendar and task ports
pub struct BriefingService {
    calendar_port: Arc<dyn CalendarPort>,
    task_port: Arc<dyn TaskPort>,
}

impl fmt::Debug for BriefingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BriefingService").finish_non_exhaustive()
    }
}

impl BriefingService {
    pub fn new(calendar_port: Arc<dyn CalendarPort>, task_port: Arc<dyn TaskPort>) -> Self {
        Self {
            calendar_port,
            task_port,
        }
    }

    /// Briefing for `date`
    ///
    /// Events are those overlapping the day, all-day first then by start.
    /// Tasks are everything not completed that is due on or before the day
    /// or has no due date, ordered by priority then due date.
    #[instrument(skip(self))]
    pub async fn today(&self, date: NaiveDate) -> DailyBriefing {
        let day_events = async {
            let range = DateRange::day(date)?;
            self.calendar_port.list_events(Some(range)).await
        };
        let (events, tasks) = tokio::join!(day_events, self.task_port.list_tasks());

        let mut events = events.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load events for briefing");
            Vec::new()
        });
        events.sort_by(|a, b| a.agenda_key().cmp(&b.agenda_key()));

        let day = date.format("%Y-%m-%d").to_string();
        let mut tasks: Vec<Task> = tasks
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load tasks for briefing");
                Vec::new()
            })
            .into_iter()
            .filter(|t| t.status != TaskStatus::Completed && t.is_due_by(&day))
            .collect();
        tasks.sort_by(|a, b| a.urgency_key().cmp(&b.urgency_key()));

        info!(
            events = events.len(),
            tasks = tasks.len(),
            "Daily briefing assembled"
        );

        DailyBriefing {
            date,
            weekday: date.format("%A").to_string(),
            events: events.into_iter().map(Tagged::event).collect(),
            tasks: tasks.into_iter().map(Tagged::task).collect(),
        }
    }
}
