//! Comment service trait.

use super::model::{Comment, NewComment};
use crate::error::Result;
use async_trait::async_trait;

/// Typed access to the comment store.
///
/// Same contract as [`crate::task::TaskService`]: decoded entities on
/// success, [`crate::BotError::Remote`] on failure, no retries.
#[async_trait]
pub trait CommentService: Send + Sync {
    /// Lists comments attached to a task.
    async fn comments_for_task(&self, task_id: i64) -> Result<Vec<Comment>>;

    /// Creates a comment.
    async fn add_comment(&self, comment: &NewComment) -> Result<Comment>;
}
