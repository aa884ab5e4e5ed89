//! Task service
//!
//! Listing, filtering and editing of VTODO tasks.

use std::{fmt, str::FromStr, sync::Arc};

use domain::{DomainError, NewTask, Task, TaskStatus, TaskUpdate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{error::ApplicationError, ports::TaskPort, services::calendar_service::require_uid};

/// Which tasks [`TaskService::list`] returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    /// Anything not completed
    #[default]
    Incomplete,
    Completed,
    All,
}

impl TaskFilter {
    /// Whether a task passes the filter
    #[must_use]
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::Incomplete => task.status != TaskStatus::Completed,
            Self::Completed => task.status == TaskStatus::Completed,
            Self::All => true,
        }
    }
}

impl FromStr for TaskFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "incomplete" | "open" => Ok(Self::Incomplete),
            "completed" | "done" => Ok(Self::Completed),
            "all" => Ok(Self::All),
            other => Err(DomainError::validation(format!(
                "unknown task filter '{other}'"
            ))),
        }
    }
}

/// Task service for handling task operations
pub struct TaskService {
    task_port: Arc<dyn TaskPort>,
}

impl fmt::Debug for TaskService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskService").finish_non_exhaustive()
    }
}

impl TaskService {
    /// Create a new task service
    pub fn new(task_port: Arc<dyn TaskPort>) -> Self {
        Self { task_port }
    }

    /// Tasks passing `filter`, most urgent first
    #[instrument(skip(self))]
    pub async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>, ApplicationError> {
        let mut tasks: Vec<Task> = self
            .task_port
            .list_tasks()
            .await?
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();
        tasks.sort_by(|a, b| a.urgency_key().cmp(&b.urgency_key()));
        debug!(count = tasks.len(), "Tasks loaded");
        Ok(tasks)
    }

    /// Create a task and return its UID
    #[instrument(skip(self, task), fields(summary = %task.summary))]
    pub async fn create(&self, mut task: NewTask) -> Result<String, ApplicationError> {
        task.summary = task.summary.trim().to_string();
        if task.summary.is_empty() {
            return Err(DomainError::validation("summary is required").into());
        }
        if task.priority > 9 {
            return Err(DomainError::validation("priority must be between 0 and 9").into());
        }

        let uid = self.task_port.create_task(&task).await?;
        info!(uid = %uid, "Task created");
        Ok(uid)
    }

    /// Apply a partial update
    ///
    /// Status text must be one of the four VTODO values.
    #[instrument(skip(self, update))]
    pub async fn update(&self, uid: &str, update: &TaskUpdate) -> Result<(), ApplicationError> {
        require_uid(uid)?;
        if update.is_empty() {
            return Err(DomainError::validation("update contains no fields").into());
        }
        if let Some(status) = update.status.as_deref() {
            if TaskStatus::parse_ical(status).is_none() {
                return Err(
                    DomainError::validation(format!("unknown task status '{status}'")).into(),
                );
            }
        }
        if update.priority.is_some_and(|p| p > 9) {
            return Err(DomainError::validation("priority must be between 0 and 9").into());
        }

        self.task_port.update_task(uid, update).await?;
        info!(uid = %uid, "Task updated");
        Ok(())
    }

    /// Mark a task as completed
    pub async fn complete(&self, uid: &str) -> Result<(), ApplicationError> {
        self.update(uid, &TaskUpdate::complete()).await
    }

    /// Delete a task
    #[instrument(skip(self))]
    pub async fn delete(&self, uid: &str) -> Result<(), ApplicationError> {
        require_uid(uid)?;
        self.task_port.delete_task(uid).await?;
        info!(uid = %uid, "Task deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockTaskPort;

    fn task(uid: &str, status: TaskStatus, priority: u8, due: Option<&str>) -> Task {
        Task {
            uid: uid.to_string(),
            summary: format!("Task {uid}"),
            description: String::new(),
            status,
            priority,
            due: due.map(ToString::to_string),
            due_all_day: false,
            percent_complete: 0,
            categories: Vec::new(),
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task("undated", TaskStatus::NeedsAction, 0, None),
            task("done", TaskStatus::Completed, 1, Some("2026-02-01")),
            task("late", TaskStatus::NeedsAction, 5, Some("2026-03-01")),
            task("early", TaskStatus::InProgress, 5, Some("2026-02-10")),
            task("urgent", TaskStatus::Cancelled, 1, None),
        ]
    }

    #[test]
    fn filter_parses_names() {
        assert_eq!("incomplete".parse::<TaskFilter>().unwrap(), TaskFilter::Incomplete);
        assert_eq!("Completed".parse::<TaskFilter>().unwrap(), TaskFilter::Completed);
        assert_eq!("all".parse::<TaskFilter>().unwrap(), TaskFilter::All);
        assert!("someday".parse::<TaskFilter>().is_err());
    }

    #[tokio::test]
    async fn incomplete_tasks_sorted_by_urgency() {
        let mut port = MockTaskPort::new();
        port.expect_list_tasks().returning(|| Ok(sample()));

        let service = TaskService::new(Arc::new(port));
        let tasks = service.list(TaskFilter::Incomplete).await.unwrap();
        let uids: Vec<_> = tasks.iter().map(|t| t.uid.as_str()).collect();
        assert_eq!(uids, vec!["urgent", "early", "late", "undated"]);
    }

    #[tokio::test]
    async fn completed_and_all_filters() {
        let mut port = MockTaskPort::new();
        port.expect_list_tasks().times(2).returning(|| Ok(sample()));

        let service = TaskService::new(Arc::new(port));
        let done = service.list(TaskFilter::Completed).await.unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].uid, "done");

        let all = service.list(TaskFilter::All).await.unwrap();
        assert_eq!(all.len(), 5);
    }

    #[tokio::test]
    async fn create_validates_summary() {
        let mut port = MockTaskPort::new();
        port.expect_create_task().never();
        let service = TaskService::new(Arc::new(port));

        assert!(service.create(NewTask::new("  ")).await.is_err());
        assert!(
            service
                .create(NewTask::new("Too important").with_priority(12))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn create_returns_uid() {
        let mut port = MockTaskPort::new();
        port.expect_create_task()
            .withf(|t| t.summary == "Buy milk" && t.priority == 1)
            .returning(|_| Ok("task-1".to_string()));

        let service = TaskService::new(Arc::new(port));
        let uid = service
            .create(NewTask::new("Buy milk ").with_priority(1))
            .await
            .unwrap();
        assert_eq!(uid, "task-1");
    }

    #[tokio::test]
    async fn update_rejects_unknown_status() {
        let mut port = MockTaskPort::new();
        port.expect_update_task().never();
        let service = TaskService::new(Arc::new(port));

        let update = TaskUpdate {
            status: Some("DONE-ISH".to_string()),
            ..TaskUpdate::default()
        };
        let err = service.update("task-1", &update).await.unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::ValidationError(_))
        ));
        assert!(service.update("task-1", &TaskUpdate::default()).await.is_err());
    }

    #[tokio::test]
    async fn complete_sends_full_percentage() {
        let mut port = MockTaskPort::new();
        port.expect_update_task()
            .withf(|uid, update| uid == "task-1" && update.percent_complete == Some(100))
            .times(1)
            .returning(|_, _| Ok(()));

        let service = TaskService::new(Arc::new(port));
        service.complete("task-1").await.unwrap();
    }

    #[tokio::test]
    async fn delete_propagates_port_errors() {
        let mut port = MockTaskPort::new();
        port.expect_delete_task()
            .returning(|_| Err(ApplicationError::ExternalService("timeout".to_string())));

        let service = TaskService::new(Arc::new(port));
        let err = service.delete("task-1").await.unwrap_err();
        assert!(err.is_retryable());
    }
}
