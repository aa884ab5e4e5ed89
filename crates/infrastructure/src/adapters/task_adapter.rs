//! Task adapter - Implements TaskPort using integration_caldav

use std::sync::Arc;

use application::{ApplicationError, ports::TaskPort};
use async_trait::async_trait;
use domain::{NewTask, Task, TaskUpdate};
use integration_caldav::{CalDavError, CalDavSession, CalDavTaskClient};
use tracing::{debug, instrument};

use super::map_caldav_error;

/// Adapter for VTODO operations on one CalDAV calendar
pub struct CalDavTaskAdapter {
    session: Arc<CalDavSession>,
    calendar: String,
}

impl std::fmt::Debug for CalDavTaskAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalDavTaskAdapter")
            .field("calendar", &self.calendar)
            .finish_non_exhaustive()
    }
}

impl CalDavTaskAdapter {
    /// Create a task adapter
    pub fn new(session: Arc<CalDavSession>, calendar: impl Into<String>) -> Self {
        Self {
            session,
            calendar: calendar.into(),
        }
    }

    fn map_error(err: CalDavError) -> ApplicationError {
        map_caldav_error(err, "Task")
    }
}

#[async_trait]
impl TaskPort for CalDavTaskAdapter {
    #[instrument(skip(self), fields(calendar = %self.calendar))]
    async fn list_tasks(&self) -> Result<Vec<Task>, ApplicationError> {
        let client = self.session.ensure_healthy().await.map_err(Self::map_error)?;
        let tasks = client
            .list_tasks(&self.calendar)
            .await
            .map_err(Self::map_error)?;
        debug!(count = tasks.len(), "Fetched tasks");
        Ok(tasks)
    }

    #[instrument(skip(self, task), fields(calendar = %self.calendar))]
    async fn create_task(&self, task: &NewTask) -> Result<String, ApplicationError> {
        let client = self.session.ensure_healthy().await.map_err(Self::map_error)?;
        client
            .create_task(&self.calendar, task)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self, update), fields(calendar = %self.calendar))]
    async fn update_task(&self, uid: &str, update: &TaskUpdate) -> Result<(), ApplicationError> {
        let client = self.session.ensure_healthy().await.map_err(Self::map_error)?;
        client
            .update_task(&self.calendar, uid, update)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self), fields(calendar = %self.calendar))]
    async fn delete_task(&self, uid: &str) -> Result<(), ApplicationError> {
        let client = self.session.ensure_healthy().await.map_err(Self::map_error)?;
        client
            .delete_task(&self.calendar, uid)
            .await
            .map_err(Self::map_error)
    }
}
