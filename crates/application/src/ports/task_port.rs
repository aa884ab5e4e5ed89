//! Task service port
//!
//! Defines the interface for task/todo management.

use async_trait::async_trait;
use domain::{NewTask, Task, TaskUpdate};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for task/todo operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TaskPort: Send + Sync {
    /// Every task in the bound calendar, in server order
    async fn list_tasks(&self) -> Result<Vec<Task>, ApplicationError>;

    /// Create a task and return its UID
    async fn create_task(&self, task: &NewTask) -> Result<String, ApplicationError>;

    /// Apply a partial update to the task with `uid`
    async fn update_task(&self, uid: &str, update: &TaskUpdate) -> Result<(), ApplicationError>;

    /// Delete the task with `uid`
    async fn delete_task(&self, uid: &str) -> Result<(), ApplicationError>;
}
