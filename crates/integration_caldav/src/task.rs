//! CalDAV task (VTODO) operations

use async_trait::async_trait;
use chrono::Utc;
use domain::{NewTask, Task, TaskUpdate};
use tracing::{debug, instrument};

use crate::client::{CalDavError, ComponentKind, HttpCalDavClient, calendar_query};
use crate::ical::{Stamp, merge_task_update, parse_tasks, todo_ics};

/// CalDAV task client trait
#[async_trait]
pub trait CalDavTaskClient: Send + Sync {
    /// List every task in the calendar
    async fn list_tasks(&self, calendar: &str) -> Result<Vec<Task>, CalDavError>;

    /// Create a task and return its UID
    async fn create_task(&self, calendar: &str, task: &NewTask) -> Result<String, CalDavError>;

    /// Rewrite the fields named in `update`, keeping everything else
    async fn update_task(
        &self,
        calendar: &str,
        uid: &str,
        update: &TaskUpdate,
    ) -> Result<(), CalDavError>;

    /// Mark a task as completed
    async fn complete_task(&self, calendar: &str, uid: &str) -> Result<(), CalDavError> {
        self.update_task(calendar, uid, &TaskUpdate::complete())
            .await
    }

    /// Delete a task by UID
    async fn delete_task(&self, calendar: &str, uid: &str) -> Result<(), CalDavError>;
}

#[async_trait]
impl CalDavTaskClient for HttpCalDavClient {
    #[instrument(skip(self))]
    async fn list_tasks(&self, calendar: &str) -> Result<Vec<Task>, CalDavError> {
        let resources = self
            .report(calendar, calendar_query(ComponentKind::Todo, None))
            .await?;

        let tasks: Vec<Task> = resources
            .iter()
            .filter_map(|r| r.calendar_data.as_deref())
            .flat_map(parse_tasks)
            .collect();

        debug!(count = tasks.len(), "Tasks fetched");
        Ok(tasks)
    }

    #[instrument(skip(self, task), fields(summary = %task.summary))]
    async fn create_task(&self, calendar: &str, task: &NewTask) -> Result<String, CalDavError> {
        let stamp = Stamp::fresh();
        self.put_new(calendar, &stamp.uid, todo_ics(task, &stamp))
            .await?;
        Ok(stamp.uid)
    }

    #[instrument(skip(self, update))]
    async fn update_task(
        &self,
        calendar: &str,
        uid: &str,
        update: &TaskUpdate,
    ) -> Result<(), CalDavError> {
        let resource = self.find_by_uid(calendar, ComponentKind::Todo, uid).await?;
        let raw = resource
            .calendar_data
            .as_deref()
            .ok_or_else(|| CalDavError::ObjectNotFound(uid.to_string()))?;
        let merged = merge_task_update(raw, update, Utc::now())?;
        self.put_existing(&resource, merged).await
    }

    #[instrument(skip(self))]
    async fn delete_task(&self, calendar: &str, uid: &str) -> Result<(), CalDavError> {
        self.delete_by_uid(calendar, ComponentKind::Todo, uid).await
    }
}
