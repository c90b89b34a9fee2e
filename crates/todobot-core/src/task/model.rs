//! Task and category domain models.
//!
//! These mirror the wire representation of the task/category store. The
//! dialog engine never owns this data; it decodes what the store returns and
//! stages new entities in a [`crate::session::TaskDraft`] before handing them
//! off.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A category as returned by the task/category store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    /// Non-empty display name
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A task as returned by the task/category store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
    /// Owning user, as the store reports it
    #[serde(default)]
    pub user: Option<i64>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Whether this task has a due date in the past and is still open.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) if !self.completed => now > due,
            _ => false,
        }
    }

    /// Whether this task belongs to the given category.
    pub fn in_category(&self, category_id: i64) -> bool {
        self.categories.iter().any(|c| c.id == category_id)
    }
}

/// Payload for creating a task in the store.
///
/// `due_date` in the past is rejected by the store, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub category_ids: Vec<i64>,
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update payload for a task.
///
/// Only fields set to `Some` are sent; the engine uses this solely to mark
/// tasks completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// A patch that marks the task completed (or reopened).
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn task(due: Option<DateTime<Utc>>, completed: bool) -> Task {
        Task {
            id: 1,
            title: "t".to_string(),
            description: String::new(),
            due_date: due,
            completed,
            user: None,
            categories: Vec::new(),
            created_at: None,
        }
    }

    #[test]
    fn overdue_only_when_open_and_past_due() {
        let now = Utc::now();
        assert!(task(Some(now - Duration::hours(1)), false).is_overdue(now));
        assert!(!task(Some(now - Duration::hours(1)), true).is_overdue(now));
        assert!(!task(Some(now + Duration::hours(1)), false).is_overdue(now));
        assert!(!task(None, false).is_overdue(now));
    }

    #[test]
    fn decodes_store_payload() {
        let json = r#"{
            "id": 1700000000000001,
            "title": "Buy milk",
            "description": "",
            "created_at": "2024-03-01T10:00:00Z",
            "due_date": null,
            "completed": false,
            "user": 7,
            "categories": [{"id": 2, "name": "home", "created_at": "2024-02-01T09:00:00Z"}]
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.categories.len(), 1);
        assert!(task.in_category(2));
        assert!(!task.in_category(3));
    }
}
