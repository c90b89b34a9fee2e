//! Task/category service trait.
//!
//! Defines the interface the dialog engine uses to talk to the task/category
//! store, decoupling the state machine from the HTTP transport.

use super::model::{Category, NewTask, Task, TaskPatch};
use crate::error::Result;
use async_trait::async_trait;

/// Typed access to the task/category store.
///
/// Implementations are thin request/response wrappers: each operation either
/// returns the decoded entity/collection or fails with
/// [`crate::BotError::Remote`]. No retries are performed here — a failure is
/// surfaced to the user once and the flow terminates.
#[async_trait]
pub trait TaskService: Send + Sync {
    /// Creates a task from an assembled draft.
    async fn create_task(&self, task: &NewTask) -> Result<Task>;

    /// Lists tasks, optionally including completed ones.
    async fn list_tasks(&self, show_completed: bool) -> Result<Vec<Task>>;

    /// Searches open tasks by title and description.
    async fn search_tasks(&self, query: &str) -> Result<Vec<Task>>;

    /// Applies a partial update to a task.
    async fn update_task(&self, task_id: i64, patch: &TaskPatch) -> Result<Task>;

    /// Deletes a task.
    async fn delete_task(&self, task_id: i64) -> Result<()>;

    /// Lists open tasks due within the coming week.
    async fn upcoming_deadlines(&self) -> Result<Vec<Task>>;

    /// Lists open tasks belonging to a category.
    async fn tasks_in_category(&self, category_id: i64) -> Result<Vec<Task>>;

    /// Lists all categories.
    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// Creates a category.
    async fn create_category(&self, name: &str) -> Result<Category>;

    /// Deletes a category.
    async fn delete_category(&self, category_id: i64) -> Result<()>;
}
