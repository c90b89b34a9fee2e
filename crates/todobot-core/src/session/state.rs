//! Dialog state tags for session state management.

use serde::{Deserialize, Serialize};

/// The current position of a conversation within a multi-step flow.
///
/// Every flow starts from `Idle` and drains back to `Idle` on completion,
/// cancellation, or collaborator failure; a session record only exists while
/// the state is something other than `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogState {
    /// No flow in progress.
    Idle,
    /// Waiting for the title of a new task.
    AddingTaskTitle,
    /// Waiting for the description of a new task (or a skip).
    AddingTaskDescription,
    /// Waiting for a due-date choice.
    SettingDueDate,
    /// Waiting for a category choice before creating the task.
    SelectingCategory,
    /// Waiting for a search query.
    Searching,
    /// The category management menu is open.
    CategoryMenu,
    /// Waiting for the name of a new category.
    AddingCategoryName,
    /// Waiting for the user to pick a category to delete.
    SelectingCategoryToDelete,
    /// Waiting for the user to pick a category to view tasks of.
    SelectingCategoryToView,
    /// Waiting for comment text for a task.
    AddingComment { task_id: i64 },
}

impl DialogState {
    /// Check if no flow is in progress
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// States that only accept button presses, where free text is a
    /// protocol violation rather than input.
    pub fn is_button_only(&self) -> bool {
        matches!(
            self,
            Self::SettingDueDate
                | Self::SelectingCategory
                | Self::CategoryMenu
                | Self::SelectingCategoryToDelete
                | Self::SelectingCategoryToView
        )
    }
}
