//! Comment domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum comment length accepted by the comment store.
pub const MAX_COMMENT_LEN: usize = 500;

/// A comment as returned by the comment store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    /// Foreign reference to a task; no ownership implied
    pub task_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub task_id: i64,
    /// 1 to [`MAX_COMMENT_LEN`] characters
    pub text: String,
}
