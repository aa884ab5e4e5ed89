//! Task entity (VTODO)

use serde::{Deserialize, Serialize};

use crate::value_objects::TaskStatus;

/// A task as exposed to API consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// iCalendar UID
    pub uid: String,
    pub summary: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    /// 0 means unset; lower is more urgent
    pub priority: u8,
    /// ISO due date or date-time
    pub due: Option<String>,
    /// Whether DUE carried `VALUE=DATE`
    pub due_all_day: bool,
    /// 0..=100
    pub percent_complete: u8,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Task {
    /// Sort key: priority (unset sorts last), then due date (undated last)
    #[must_use]
    pub fn urgency_key(&self) -> (u8, &str) {
        let priority = if self.priority == 0 { 99 } else { self.priority };
        (priority, self.due.as_deref().unwrap_or("9999"))
    }

    /// Due on or before `date` (`YYYY-MM-DD`), or undated
    #[must_use]
    pub fn is_due_by(&self, date: &str) -> bool {
        self.due
            .as_deref()
            .is_none_or(|due| due.get(..10).unwrap_or(due) <= date)
    }
}

/// Fields for creating a new task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Task title (required)
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
    /// 0 leaves PRIORITY unset
    #[serde(default)]
    pub priority: u8,
    /// ISO date (all-day) or date-time
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl NewTask {
    /// Create a task draft with the required summary
    #[must_use]
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Self::default()
        }
    }

    /// Builder: set due date
    #[must_use]
    pub fn with_due(mut self, due: impl Into<String>) -> Self {
        self.due = Some(due.into());
        self
    }

    /// Builder: set priority
    #[must_use]
    pub const fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
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

/// Partial update of an existing task
///
/// `status` stays raw text: only the four VTODO values are applied, anything
/// else is ignored by the merge. When both `status` and `percent_complete`
/// are set, the percentage is applied last and decides the final status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Clamped to 0..=100 when applied
    #[serde(default)]
    pub percent_complete: Option<i64>,
    #[serde(default)]
    pub priority: Option<u8>,
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

impl TaskUpdate {
    /// Update that marks the task done
    #[must_use]
    pub fn complete() -> Self {
        Self {
            percent_complete: Some(100),
            ..Self::default()
        }
    }

    /// True when no field is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.percent_complete.is_none()
            && self.priority.is_none()
            && self.due.is_none()
            && self.categories.is_none()
    }
}
