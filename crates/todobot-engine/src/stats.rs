//! Completion statistics derived from a task listing.
//!
//! The task store exposes raw tasks; the counts shown to the user are
//! computed here so they stay consistent with whatever filter the listing
//! used.

use chrono::{DateTime, Utc};
use todobot_core::Task;

/// Aggregated task counts for the stats report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub overdue: usize,
}

impl TaskStats {
    /// Computes stats over a task listing at the given instant.
    pub fn from_tasks(tasks: &[Task], now: DateTime<Utc>) -> Self {
        let completed = tasks.iter().filter(|t| t.completed).count();
        let overdue = tasks.iter().filter(|t| t.is_overdue(now)).count();
        Self {
            total: tasks.len(),
            completed,
            overdue,
        }
    }

    /// Completion rate as a percentage string, `"0%"` when there are no tasks.
    pub fn completion_rate(&self) -> String {
        if self.total == 0 {
            return "0%".to_string();
        }
        format!(
            "{:.1}%",
            self.completed as f64 / self.total as f64 * 100.0
        )
    }

    /// The user-facing stats report.
    pub fn summary(&self) -> String {
        format!(
            "Task statistics:\n\
             Total: {}\n\
             Completed: {}\n\
             Completion rate: {}\n\
             Overdue: {}",
            self.total,
            self.completed,
            self.completion_rate(),
            self.overdue
        )
    }
}
