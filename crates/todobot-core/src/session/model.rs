//! Session domain model.
//!
//! A session is the per-user conversation record tying a partially built
//! draft to the current dialog state tag. Sessions live only in memory and
//! only while a multi-step flow is in progress; losing them on restart is an
//! accepted degradation because flows are short-lived and restartable.

use super::state::DialogState;
use crate::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The partially accumulated fields of a task being built across dialog
/// steps, before submission to the task store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub category_ids: Vec<i64>,
}

/// One conversation's in-progress dialog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Conversation owner
    pub user_id: UserId,
    /// Current dialog state tag
    pub state: DialogState,
    /// Draft accumulated so far; always empty outside the add-task flow
    pub draft: TaskDraft,
}

impl Session {
    /// Creates a fresh session in the given state with an empty draft.
    pub fn new(user_id: UserId, state: DialogState) -> Self {
        Self {
            user_id,
            state,
            draft: TaskDraft::default(),
        }
    }

    /// Moves this session to another state, keeping the draft.
    pub fn advance(mut self, state: DialogState) -> Self {
        self.state = state;
        self
    }
}
