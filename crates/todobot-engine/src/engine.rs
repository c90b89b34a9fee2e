//! The per-conversation dialog state machine.
//!
//! [`DialogEngine::handle`] maps one inbound event onto a state transition,
//! mutating the session store and calling the collaborator services at the
//! points the transition table defines. Every flow drains back to idle:
//! completion, cancellation, and collaborator failure all clear the session.
//!
//! Failure classes at the per-event boundary:
//! - validation failures are reported inline and leave the state untouched;
//! - remote failures abort the flow to idle with a generic retry-later report;
//! - protocol violations (events that make no sense for the current state)
//!   are ignored or answered with a help hint.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use todobot_core::comment::MAX_COMMENT_LEN;
use todobot_core::{
    BotError, CallbackToken, CommandName, CommentService, DialogState, InboundEvent, NewComment,
    NewTask, Outbound, Result, Session, SessionStore, TaskDraft, TaskPatch, TaskService, UserId,
};

use crate::menus;
use crate::stats::TaskStats;

const HELP_HINT: &str =
    "I didn't catch that. Use the buttons above, send /help for commands, or Cancel to abort.";
const RETRY_LATER: &str =
    "Sorry, the service is unavailable right now. Please try again later.";

/// The dialog engine: one instance serves all conversations.
///
/// All state lives in the session store; the engine itself is immutable and
/// can be shared behind an [`Arc`]. Events for a single user must be applied
/// sequentially (see [`crate::dispatcher::Dispatcher`]); events for different
/// users may run concurrently.
pub struct DialogEngine {
    sessions: Arc<dyn SessionStore>,
    tasks: Arc<dyn TaskService>,
    comments: Arc<dyn CommentService>,
}

impl DialogEngine {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        tasks: Arc<dyn TaskService>,
        comments: Arc<dyn CommentService>,
    ) -> Self {
        Self {
            sessions,
            tasks,
            comments,
        }
    }

    /// Handles one inbound event, returning the action to deliver.
    ///
    /// Never fails: every error is converted to an outbound report here, so
    /// one user's failure cannot crash the engine or leak into another
    /// session. `None` means the event was ignored (unrecognized or
    /// out-of-place callback token).
    pub async fn handle(&self, event: InboundEvent) -> Option<Outbound> {
        let user_id = event.user_id();
        match self.dispatch(event).await {
            Ok(action) => action,
            Err(BotError::Validation(message)) => Some(Outbound::failure(message)),
            Err(BotError::Protocol(message)) => {
                tracing::debug!(%user_id, %message, "event out of place for current state");
                Some(Outbound::prompt(HELP_HINT))
            }
            Err(err) => {
                tracing::warn!(%user_id, error = %err, "event handling failed, aborting flow");
                self.sessions.clear(user_id).await;
                Some(Outbound::failure(RETRY_LATER))
            }
        }
    }

    async fn dispatch(&self, event: InboundEvent) -> Result<Option<Outbound>> {
        match event {
            InboundEvent::Command { name, user_id } => self.handle_command(name, user_id).await,
            InboundEvent::Callback { data, user_id } => {
                match CallbackToken::parse(&data) {
                    Some(token) => self.handle_callback(token, user_id).await,
                    None => {
                        // Unrecognized tokens are ignored per the contract.
                        tracing::debug!(%user_id, %data, "ignoring unrecognized callback token");
                        Ok(None)
                    }
                }
            }
            InboundEvent::Text { content, user_id } => self.handle_text(&content, user_id).await,
        }
    }

    async fn handle_command(
        &self,
        name: CommandName,
        user_id: UserId,
    ) -> Result<Option<Outbound>> {
        match name {
            CommandName::Start => {
                // A restart always abandons whatever was in progress.
                self.sessions.clear(user_id).await;
                Ok(Some(menus::main_menu()))
            }
            CommandName::Help => Ok(Some(menus::help_menu())),
            CommandName::Add => self.begin_add_task(user_id).await,
            CommandName::Tasks => self.open_task_list().await,
            CommandName::Categories => self.open_category_menu(user_id).await,
            CommandName::Search => {
                self.sessions
                    .set(Session::new(user_id, DialogState::Searching))
                    .await;
                Ok(Some(menus::search_prompt()))
            }
            CommandName::Stats => {
                let tasks = self.tasks.list_tasks(true).await?;
                let stats = TaskStats::from_tasks(&tasks, Utc::now());
                Ok(Some(Outbound::success(stats.summary())))
            }
            CommandName::Deadlines => {
                let tasks = self.tasks.upcoming_deadlines().await?;
                let message = if tasks.is_empty() {
                    "No upcoming deadlines.".to_string()
                } else {
                    format!("Upcoming deadlines:\n{}", menus::task_lines(&tasks))
                };
                Ok(Some(Outbound::success(message)))
            }
            CommandName::Archive => self.show_archive().await,
        }
    }

    async fn handle_callback(
        &self,
        token: CallbackToken,
        user_id: UserId,
    ) -> Result<Option<Outbound>> {
        match token {
            // Stateless tokens: valid from any state, each starting or
            // finishing its own interaction.
            CallbackToken::AddTask => self.begin_add_task(user_id).await,
            CallbackToken::Categories => self.open_category_menu(user_id).await,
            CallbackToken::Help => Ok(Some(menus::help_menu())),
            CallbackToken::BackToMenu => Ok(Some(menus::main_menu())),
            CallbackToken::BackToTasks | CallbackToken::RetryTasks => {
                self.open_task_list().await
            }
            CallbackToken::ShowArchive => self.show_archive().await,
            CallbackToken::Cancel => {
                self.sessions.clear(user_id).await;
                Ok(Some(Outbound::success("Operation cancelled.")))
            }
            CallbackToken::ListCategories => {
                let categories = self.tasks.list_categories().await?;
                Ok(Some(Outbound::success(menus::category_list_text(
                    &categories,
                ))))
            }
            CallbackToken::CreateCategory => {
                self.sessions
                    .set(Session::new(user_id, DialogState::AddingCategoryName))
                    .await;
                Ok(Some(Outbound::prompt("Enter a name for the new category:")))
            }
            CallbackToken::DeleteCategory => {
                let categories = self.tasks.list_categories().await?;
                if categories.is_empty() {
                    return Ok(Some(Outbound::success(
                        "There are no categories to delete.",
                    )));
                }
                self.sessions
                    .set(Session::new(user_id, DialogState::SelectingCategoryToDelete))
                    .await;
                Ok(Some(menus::category_delete_menu(&categories)))
            }
            CallbackToken::TasksByCategory => {
                let categories = self.tasks.list_categories().await?;
                if categories.is_empty() {
                    return Ok(Some(Outbound::success("There are no categories yet.")));
                }
                self.sessions
                    .set(Session::new(user_id, DialogState::SelectingCategoryToView))
                    .await;
                Ok(Some(menus::category_view_menu(&categories)))
            }
            CallbackToken::Task(task_id) => {
                let comments = self.comments.comments_for_task(task_id).await?;
                Ok(Some(menus::task_detail_menu(task_id, &comments)))
            }
            CallbackToken::CompleteTask(task_id) => {
                self.tasks
                    .update_task(task_id, &TaskPatch::completed(true))
                    .await?;
                Ok(Some(Outbound::success("Task moved to the archive.")))
            }
            CallbackToken::DeleteTask(task_id) => Ok(Some(menus::confirm_delete_menu(task_id))),
            CallbackToken::ConfirmDelete(task_id) => {
                self.tasks.delete_task(task_id).await?;
                Ok(Some(Outbound::success("Task deleted.")))
            }
            CallbackToken::AddComment(task_id) => {
                self.sessions
                    .set(Session::new(user_id, DialogState::AddingComment { task_id }))
                    .await;
                Ok(Some(menus::comment_prompt()))
            }

            // State-dependent tokens: a stray or re-delivered press outside
            // its step is ignored, so it can only ever re-trigger the current
            // step's handler.
            CallbackToken::SkipDescription => {
                let Some(mut session) = self.sessions.get(user_id).await else {
                    return Ok(None);
                };
                if session.state != DialogState::AddingTaskDescription {
                    return Ok(None);
                }
                session.draft.description.clear();
                self.sessions
                    .set(session.advance(DialogState::SettingDueDate))
                    .await;
                Ok(Some(menus::due_date_menu()))
            }
            CallbackToken::DueToday
            | CallbackToken::DueTomorrow
            | CallbackToken::DueWeek
            | CallbackToken::SkipDueDate => {
                let Some(session) = self.sessions.get(user_id).await else {
                    return Ok(None);
                };
                if session.state != DialogState::SettingDueDate {
                    return Ok(None);
                }
                self.advance_to_category_selection(session, due_date_for(token))
                    .await
            }
            CallbackToken::Category(category_id) => {
                let Some(mut session) = self.sessions.get(user_id).await else {
                    return Ok(None);
                };
                if session.state != DialogState::SelectingCategory {
                    return Ok(None);
                }
                session.draft.category_ids = vec![category_id];
                self.finalize_task(user_id, session.draft).await
            }
            CallbackToken::SkipCategory => {
                let Some(session) = self.sessions.get(user_id).await else {
                    return Ok(None);
                };
                if session.state != DialogState::SelectingCategory {
                    return Ok(None);
                }
                self.finalize_task(user_id, session.draft).await
            }
            CallbackToken::CategoryToDelete(category_id) => {
                let Some(session) = self.sessions.get(user_id).await else {
                    return Ok(None);
                };
                if session.state != DialogState::SelectingCategoryToDelete {
                    return Ok(None);
                }
                let result = self.tasks.delete_category(category_id).await;
                self.sessions.clear(user_id).await;
                result?;
                Ok(Some(Outbound::success("Category deleted.")))
            }
            CallbackToken::CategoryToView(category_id) => {
                let Some(session) = self.sessions.get(user_id).await else {
                    return Ok(None);
                };
                if session.state != DialogState::SelectingCategoryToView {
                    return Ok(None);
                }
                let result = self.tasks.tasks_in_category(category_id).await;
                self.sessions.clear(user_id).await;
                let tasks = result?;
                let message = if tasks.is_empty() {
                    "There are no tasks in this category.".to_string()
                } else {
                    format!("Tasks in this category:\n{}", menus::task_lines(&tasks))
                };
                Ok(Some(Outbound::success(message)))
            }
        }
    }

    async fn handle_text(&self, content: &str, user_id: UserId) -> Result<Option<Outbound>> {
        let Some(mut session) = self.sessions.get(user_id).await else {
            // Free text with no flow in progress gets a help prompt.
            return Ok(Some(Outbound::prompt(HELP_HINT)));
        };

        let text = content.trim();
        match session.state {
            DialogState::AddingTaskTitle => {
                if text.is_empty() {
                    return Err(BotError::validation("The title cannot be empty."));
                }
                session.draft.title = text.to_string();
                session.state = DialogState::AddingTaskDescription;
                self.sessions.set(session).await;
                Ok(Some(menus::description_prompt()))
            }
            DialogState::AddingTaskDescription => {
                // A literal "skip" behaves like the skip button.
                if !text.eq_ignore_ascii_case("skip") {
                    session.draft.description = text.to_string();
                }
                session.state = DialogState::SettingDueDate;
                self.sessions.set(session).await;
                Ok(Some(menus::due_date_menu()))
            }
            DialogState::AddingCategoryName => {
                if text.is_empty() {
                    return Err(BotError::validation("The category name cannot be empty."));
                }
                let result = self.tasks.create_category(text).await;
                self.sessions.clear(user_id).await;
                let category = result?;
                Ok(Some(Outbound::success(format!(
                    "Category '{}' created.",
                    category.name
                ))))
            }
            DialogState::Searching => {
                let result = self.tasks.search_tasks(text).await;
                self.sessions.clear(user_id).await;
                let tasks = result?;
                let message = if tasks.is_empty() {
                    "Nothing found.".to_string()
                } else {
                    format!("Search results:\n{}", menus::task_lines(&tasks))
                };
                Ok(Some(Outbound::success(message)))
            }
            DialogState::AddingComment { task_id } => {
                if text.is_empty() {
                    return Err(BotError::validation("The comment cannot be empty."));
                }
                if text.chars().count() > MAX_COMMENT_LEN {
                    return Err(BotError::validation(format!(
                        "Comments are limited to {MAX_COMMENT_LEN} characters."
                    )));
                }
                let comment = NewComment {
                    task_id,
                    text: text.to_string(),
                };
                let result = self.comments.add_comment(&comment).await;
                self.sessions.clear(user_id).await;
                result?;
                Ok(Some(Outbound::success("Comment added.")))
            }
            state if state.is_button_only() => Err(BotError::protocol(format!(
                "free text is not accepted in state {state:?}"
            ))),
            // An idle session record should not exist; treat it like none.
            _ => Ok(Some(Outbound::prompt(HELP_HINT))),
        }
    }

    async fn begin_add_task(&self, user_id: UserId) -> Result<Option<Outbound>> {
        // Starting over always begins with an empty draft.
        self.sessions
            .set(Session::new(user_id, DialogState::AddingTaskTitle))
            .await;
        Ok(Some(menus::title_prompt()))
    }

    async fn open_category_menu(&self, user_id: UserId) -> Result<Option<Outbound>> {
        self.sessions
            .set(Session::new(user_id, DialogState::CategoryMenu))
            .await;
        Ok(Some(menus::category_menu()))
    }

    /// Lists active tasks. A failed fetch is not a flow abort: the listing
    /// is retryable in place, so the menu offers a retry button instead.
    async fn open_task_list(&self) -> Result<Option<Outbound>> {
        match self.tasks.list_tasks(false).await {
            Ok(tasks) => Ok(Some(menus::task_list_menu(&tasks))),
            Err(err) => {
                tracing::warn!(error = %err, "task listing failed");
                Ok(Some(menus::task_list_retry_menu()))
            }
        }
    }

    async fn show_archive(&self) -> Result<Option<Outbound>> {
        let tasks = self.tasks.list_tasks(true).await?;
        let completed: Vec<_> = tasks.into_iter().filter(|t| t.completed).collect();
        Ok(Some(menus::archive_menu(&completed)))
    }

    /// Records the chosen due date and moves on to category selection.
    ///
    /// When no categories exist the choice step is skipped entirely and the
    /// task is created without one.
    async fn advance_to_category_selection(
        &self,
        mut session: Session,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Option<Outbound>> {
        session.draft.due_date = due_date;

        let categories = self.tasks.list_categories().await?;
        if categories.is_empty() {
            let user_id = session.user_id;
            return self.finalize_task(user_id, session.draft).await;
        }

        self.sessions
            .set(session.advance(DialogState::SelectingCategory))
            .await;
        Ok(Some(menus::category_select_menu(&categories)))
    }

    /// Hands the assembled draft off to the task store.
    ///
    /// The session is cleared whatever the outcome: a failed creation does
    /// not keep the draft alive, the user restarts the flow instead.
    async fn finalize_task(&self, user_id: UserId, draft: TaskDraft) -> Result<Option<Outbound>> {
        let new_task = NewTask {
            title: draft.title,
            description: draft.description,
            category_ids: draft.category_ids,
            completed: false,
            due_date: draft.due_date,
        };

        let created = self.tasks.create_task(&new_task).await;
        self.sessions.clear(user_id).await;
        let task = created?;

        let mut message = format!("Task '{}' created.", task.title);
        if let Some(due) = task.due_date {
            message.push_str(&format!(" Due {}.", due.format("%Y-%m-%d")));
        }
        Ok(Some(Outbound::success(message)))
    }
}

/// Maps a due-date button onto a concrete timestamp.
fn due_date_for(token: CallbackToken) -> Option<DateTime<Utc>> {
    let now = Utc::now();
    match token {
        CallbackToken::DueToday => Some(now),
        CallbackToken::DueTomorrow => Some(now + Duration::days(1)),
        CallbackToken::DueWeek => Some(now + Duration::days(7)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_date_tokens_map_to_increasing_offsets() {
        let today = due_date_for(CallbackToken::DueToday).unwrap();
        let tomorrow = due_date_for(CallbackToken::DueTomorrow).unwrap();
        let week = due_date_for(CallbackToken::DueWeek).unwrap();
        assert!(today < tomorrow);
        assert!(tomorrow < week);
        assert_eq!(due_date_for(CallbackToken::SkipDueDate), None);
    }
}
