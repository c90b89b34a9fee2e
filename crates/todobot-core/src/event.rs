//! Inbound event types for the dialog engine.
//!
//! The event source (chat transport) delivers three shapes of input:
//! slash commands, button callbacks carrying an opaque token, and free-form
//! text. Callback tokens are parsed into [`CallbackToken`] up front so the
//! dispatch table works on a typed, inspectable value instead of string
//! prefixes scattered through handlers.

use crate::user::UserId;
use serde::{Deserialize, Serialize};

/// A slash command recognized by the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandName {
    Start,
    Tasks,
    Add,
    Categories,
    Search,
    Stats,
    Deadlines,
    Archive,
    Help,
}

impl CommandName {
    /// Parses a command name (without the leading slash).
    ///
    /// Returns `None` for unknown commands.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "start" => Some(Self::Start),
            "tasks" => Some(Self::Tasks),
            "add" => Some(Self::Add),
            "categories" => Some(Self::Categories),
            "search" => Some(Self::Search),
            "stats" => Some(Self::Stats),
            "deadlines" => Some(Self::Deadlines),
            "archive" => Some(Self::Archive),
            "help" => Some(Self::Help),
            _ => None,
        }
    }
}

/// A button-press token, as carried in callback data.
///
/// Tokens use the wire formats of the original bot: bare words for static
/// buttons, `cat_<id>` / `del_cat_<id>` / `view_cat_<id>` for category
/// selections, and colon-delimited `task:<id>`-style tokens for per-task
/// actions. [`CallbackToken::parse`] and [`CallbackToken::as_data`] round-trip
/// every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallbackToken {
    /// Start the add-task flow
    AddTask,
    /// Open the category management menu
    Categories,
    /// Start the create-category flow
    CreateCategory,
    /// Start the delete-category flow
    DeleteCategory,
    /// List existing categories
    ListCategories,
    /// Start the tasks-by-category flow
    TasksByCategory,
    /// A category chosen while creating a task (`cat_<id>`)
    Category(i64),
    /// A category chosen for deletion (`del_cat_<id>`)
    CategoryToDelete(i64),
    /// A category chosen for viewing its tasks (`view_cat_<id>`)
    CategoryToView(i64),
    /// Due date: today
    DueToday,
    /// Due date: tomorrow
    DueTomorrow,
    /// Due date: a week from now
    DueWeek,
    /// No due date
    SkipDueDate,
    /// Leave the task description empty
    SkipDescription,
    /// Create the task without a category
    SkipCategory,
    /// Abort the in-progress flow
    Cancel,
    /// Open the detail view of a task (`task:<id>`)
    Task(i64),
    /// Start the add-comment flow for a task (`add_comment:<id>`)
    AddComment(i64),
    /// Mark a task completed (`complete_task:<id>`)
    CompleteTask(i64),
    /// Ask for delete confirmation (`delete_task:<id>`)
    DeleteTask(i64),
    /// Confirmed deletion (`confirm_delete:<id>`)
    ConfirmDelete(i64),
    /// Show the archive of completed tasks
    ShowArchive,
    /// Retry a failed task-list fetch
    RetryTasks,
    /// Back to the active task list
    BackToTasks,
    /// Back to the main menu
    BackToMenu,
    /// Show the help screen
    Help,
}

impl CallbackToken {
    /// Parses raw callback data into a token.
    ///
    /// Returns `None` for unrecognized data; the engine ignores such events
    /// per the protocol contract.
    pub fn parse(data: &str) -> Option<Self> {
        let token = match data {
            "add_task" => Self::AddTask,
            "categories" => Self::Categories,
            "create_category" => Self::CreateCategory,
            "delete_category" => Self::DeleteCategory,
            "list_categories" => Self::ListCategories,
            "tasks_by_category" => Self::TasksByCategory,
            "due_today" => Self::DueToday,
            "due_tomorrow" => Self::DueTomorrow,
            "due_week" => Self::DueWeek,
            "skip_due_date" => Self::SkipDueDate,
            "skip_description" => Self::SkipDescription,
            "skip_category" => Self::SkipCategory,
            "cancel" => Self::Cancel,
            "show_archive" => Self::ShowArchive,
            "retry_tasks" => Self::RetryTasks,
            "back_to_tasks" => Self::BackToTasks,
            "back_to_menu" => Self::BackToMenu,
            "help" => Self::Help,
            _ => return Self::parse_parameterized(data),
        };
        Some(token)
    }

    fn parse_parameterized(data: &str) -> Option<Self> {
        if let Some(rest) = data.strip_prefix("del_cat_") {
            return rest.parse().ok().map(Self::CategoryToDelete);
        }
        if let Some(rest) = data.strip_prefix("view_cat_") {
            return rest.parse().ok().map(Self::CategoryToView);
        }
        if let Some(rest) = data.strip_prefix("cat_") {
            return rest.parse().ok().map(Self::Category);
        }
        if let Some(rest) = data.strip_prefix("task:") {
            return rest.parse().ok().map(Self::Task);
        }
        if let Some(rest) = data.strip_prefix("add_comment:") {
            return rest.parse().ok().map(Self::AddComment);
        }
        if let Some(rest) = data.strip_prefix("complete_task:") {
            return rest.parse().ok().map(Self::CompleteTask);
        }
        if let Some(rest) = data.strip_prefix("delete_task:") {
            return rest.parse().ok().map(Self::DeleteTask);
        }
        if let Some(rest) = data.strip_prefix("confirm_delete:") {
            return rest.parse().ok().map(Self::ConfirmDelete);
        }
        None
    }

    /// Renders the token back to its wire form.
    pub fn as_data(&self) -> String {
        match self {
            Self::AddTask => "add_task".to_string(),
            Self::Categories => "categories".to_string(),
            Self::CreateCategory => "create_category".to_string(),
            Self::DeleteCategory => "delete_category".to_string(),
            Self::ListCategories => "list_categories".to_string(),
            Self::TasksByCategory => "tasks_by_category".to_string(),
            Self::Category(id) => format!("cat_{id}"),
            Self::CategoryToDelete(id) => format!("del_cat_{id}"),
            Self::CategoryToView(id) => format!("view_cat_{id}"),
            Self::DueToday => "due_today".to_string(),
            Self::DueTomorrow => "due_tomorrow".to_string(),
            Self::DueWeek => "due_week".to_string(),
            Self::SkipDueDate => "skip_due_date".to_string(),
            Self::SkipDescription => "skip_description".to_string(),
            Self::SkipCategory => "skip_category".to_string(),
            Self::Cancel => "cancel".to_string(),
            Self::Task(id) => format!("task:{id}"),
            Self::AddComment(id) => format!("add_comment:{id}"),
            Self::CompleteTask(id) => format!("complete_task:{id}"),
            Self::DeleteTask(id) => format!("delete_task:{id}"),
            Self::ConfirmDelete(id) => format!("confirm_delete:{id}"),
            Self::ShowArchive => "show_archive".to_string(),
            Self::RetryTasks => "retry_tasks".to_string(),
            Self::BackToTasks => "back_to_tasks".to_string(),
            Self::BackToMenu => "back_to_menu".to_string(),
            Self::Help => "help".to_string(),
        }
    }
}

/// An inbound event delivered by the event source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// A slash command.
    Command { name: CommandName, user_id: UserId },
    /// A button press carrying opaque callback data.
    Callback { data: String, user_id: UserId },
    /// Free-form text, interpreted against the current dialog state.
    Text { content: String, user_id: UserId },
}

impl InboundEvent {
    /// The conversation owner this event belongs to.
    pub fn user_id(&self) -> UserId {
        match self {
            Self::Command { user_id, .. }
            | Self::Callback { user_id, .. }
            | Self::Text { user_id, .. } => *user_id,
        }
    }
}
