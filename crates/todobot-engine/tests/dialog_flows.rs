//! End-to-end tests for the dialog state machine: every flow must drain back
//! to idle, drafts must survive exactly as long as their flow, and the
//! collaborator services must be called exactly once per terminal transition.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use todobot_core::comment::CommentService;
use todobot_core::task::TaskService;
use todobot_core::{
    BotError, CallbackToken, Category, Comment, CommandName, DialogState, InboundEvent,
    InMemorySessionStore, NewComment, NewTask, Outbound, ReportOutcome, Result, SessionStore,
    Task, TaskPatch, UserId,
};
use todobot_engine::{DialogEngine, Dispatcher, EventSink};

#[derive(Default)]
struct MockTaskService {
    categories: Vec<Category>,
    tasks: Vec<Task>,
    fail_create: bool,
    fail_delete_category: bool,
    fail_list: AtomicBool,
    created: Mutex<Vec<NewTask>>,
    deleted_categories: Mutex<Vec<i64>>,
    searches: Mutex<Vec<String>>,
}

impl MockTaskService {
    fn with_categories(categories: Vec<Category>) -> Self {
        Self {
            categories,
            ..Self::default()
        }
    }

    fn created(&self) -> Vec<NewTask> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskService for MockTaskService {
    async fn create_task(&self, task: &NewTask) -> Result<Task> {
        self.created.lock().unwrap().push(task.clone());
        if self.fail_create {
            return Err(BotError::remote(500, "store exploded"));
        }
        Ok(Task {
            id: 1,
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date,
            completed: false,
            user: None,
            categories: Vec::new(),
            created_at: None,
        })
    }

    async fn list_tasks(&self, show_completed: bool) -> Result<Vec<Task>> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(BotError::remote(503, "store unavailable"));
        }
        Ok(self
            .tasks
            .iter()
            .filter(|t| show_completed || !t.completed)
            .cloned()
            .collect())
    }

    async fn search_tasks(&self, query: &str) -> Result<Vec<Task>> {
        self.searches.lock().unwrap().push(query.to_string());
        Ok(self
            .tasks
            .iter()
            .filter(|t| t.title.contains(query))
            .cloned()
            .collect())
    }

    async fn update_task(&self, task_id: i64, patch: &TaskPatch) -> Result<Task> {
        Ok(Task {
            id: task_id,
            title: "updated".to_string(),
            description: String::new(),
            due_date: None,
            completed: patch.completed.unwrap_or(false),
            user: None,
            categories: Vec::new(),
            created_at: None,
        })
    }

    async fn delete_task(&self, _task_id: i64) -> Result<()> {
        Ok(())
    }

    async fn upcoming_deadlines(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.clone())
    }

    async fn tasks_in_category(&self, category_id: i64) -> Result<Vec<Task>> {
        Ok(self
            .tasks
            .iter()
            .filter(|t| t.in_category(category_id))
            .cloned()
            .collect())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.categories.clone())
    }

    async fn create_category(&self, name: &str) -> Result<Category> {
        Ok(Category {
            id: 100,
            name: name.to_string(),
            created_at: None,
        })
    }

    async fn delete_category(&self, category_id: i64) -> Result<()> {
        self.deleted_categories.lock().unwrap().push(category_id);
        if self.fail_delete_category {
            return Err(BotError::remote(404, "no such category"));
        }
        Ok(())
    }
}

#[derive(Default)]
struct MockCommentService {
    comments: Vec<Comment>,
    added: Mutex<Vec<NewComment>>,
}

#[async_trait]
impl CommentService for MockCommentService {
    async fn comments_for_task(&self, task_id: i64) -> Result<Vec<Comment>> {
        Ok(self
            .comments
            .iter()
            .filter(|c| c.task_id == task_id)
            .cloned()
            .collect())
    }

    async fn add_comment(&self, comment: &NewComment) -> Result<Comment> {
        self.added.lock().unwrap().push(comment.clone());
        Ok(Comment {
            id: 1,
            task_id: comment.task_id,
            text: comment.text.clone(),
            created_at: Utc::now(),
        })
    }
}

struct Harness {
    engine: Arc<DialogEngine>,
    sessions: Arc<InMemorySessionStore>,
    tasks: Arc<MockTaskService>,
    comments: Arc<MockCommentService>,
}

fn harness(tasks: MockTaskService) -> Harness {
    let sessions = Arc::new(InMemorySessionStore::new());
    let tasks = Arc::new(tasks);
    let comments = Arc::new(MockCommentService::default());
    let engine = Arc::new(DialogEngine::new(
        sessions.clone(),
        tasks.clone(),
        comments.clone(),
    ));
    Harness {
        engine,
        sessions,
        tasks,
        comments,
    }
}

fn cmd(name: CommandName, user: i64) -> InboundEvent {
    InboundEvent::Command {
        name,
        user_id: UserId(user),
    }
}

fn cb(data: &str, user: i64) -> InboundEvent {
    InboundEvent::Callback {
        data: data.to_string(),
        user_id: UserId(user),
    }
}

fn text(content: &str, user: i64) -> InboundEvent {
    InboundEvent::Text {
        content: content.to_string(),
        user_id: UserId(user),
    }
}

fn is_success(action: &Outbound) -> bool {
    matches!(
        action,
        Outbound::Report {
            outcome: ReportOutcome::Success,
            ..
        }
    )
}

fn is_failure(action: &Outbound) -> bool {
    matches!(
        action,
        Outbound::Report {
            outcome: ReportOutcome::Failure,
            ..
        }
    )
}

fn home_category() -> Category {
    Category {
        id: 7,
        name: "home".to_string(),
        created_at: None,
    }
}

#[tokio::test]
async fn add_task_flow_issues_exactly_one_create_call() {
    let h = harness(MockTaskService::with_categories(vec![home_category()]));

    h.engine.handle(cmd(CommandName::Add, 1)).await;
    h.engine.handle(text("Buy milk", 1)).await;
    h.engine.handle(text("skip", 1)).await;
    h.engine.handle(cb("due_tomorrow", 1)).await;
    let last = h.engine.handle(cb("skip_category", 1)).await.unwrap();

    assert!(is_success(&last));
    let created = h.tasks.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].title, "Buy milk");
    assert_eq!(created[0].description, "");
    assert!(created[0].category_ids.is_empty());

    let due = created[0].due_date.unwrap();
    let now = Utc::now();
    assert!(due > now + Duration::hours(23));
    assert!(due < now + Duration::hours(25));

    assert!(h.sessions.get(UserId(1)).await.is_none());
}

#[tokio::test]
async fn picking_a_category_sends_its_id() {
    let h = harness(MockTaskService::with_categories(vec![home_category()]));

    h.engine.handle(cmd(CommandName::Add, 1)).await;
    h.engine.handle(text("Clean up", 1)).await;
    h.engine.handle(cb("skip_description", 1)).await;
    h.engine.handle(cb("skip_due_date", 1)).await;
    let last = h.engine.handle(cb("cat_7", 1)).await.unwrap();

    assert!(is_success(&last));
    let created = h.tasks.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].category_ids, vec![7]);
    assert!(created[0].due_date.is_none());
}

#[tokio::test]
async fn failed_create_returns_to_idle_and_never_retries() {
    let mut tasks = MockTaskService::with_categories(vec![home_category()]);
    tasks.fail_create = true;
    let h = harness(tasks);

    h.engine.handle(cmd(CommandName::Add, 1)).await;
    h.engine.handle(text("Buy milk", 1)).await;
    h.engine.handle(cb("skip_description", 1)).await;
    h.engine.handle(cb("due_tomorrow", 1)).await;
    let last = h.engine.handle(cb("skip_category", 1)).await.unwrap();

    assert!(is_failure(&last));
    assert_eq!(h.tasks.created().len(), 1);
    assert!(h.sessions.get(UserId(1)).await.is_none());

    // A re-delivered press after the flow ended is ignored, not retried.
    let again = h.engine.handle(cb("skip_category", 1)).await;
    assert!(again.is_none());
    assert_eq!(h.tasks.created().len(), 1);
}

#[tokio::test]
async fn cancel_discards_the_draft_completely() {
    let h = harness(MockTaskService::default());

    h.engine.handle(cmd(CommandName::Add, 1)).await;
    h.engine.handle(text("Half-entered title", 1)).await;
    let cancelled = h.engine.handle(cb("cancel", 1)).await.unwrap();
    assert!(is_success(&cancelled));
    assert!(h.sessions.get(UserId(1)).await.is_none());

    // A fresh flow starts with an empty draft.
    h.engine.handle(cmd(CommandName::Add, 1)).await;
    let session = h.sessions.get(UserId(1)).await.unwrap();
    assert_eq!(session.state, DialogState::AddingTaskTitle);
    assert!(session.draft.title.is_empty());
}

#[tokio::test]
async fn empty_category_list_degrades_to_no_category_create() {
    let h = harness(MockTaskService::default());

    h.engine.handle(cmd(CommandName::Add, 1)).await;
    h.engine.handle(text("Buy milk", 1)).await;
    h.engine.handle(cb("skip_description", 1)).await;
    // No categories exist, so the due-date step finalizes directly.
    let last = h.engine.handle(cb("due_today", 1)).await.unwrap();

    assert!(is_success(&last));
    let created = h.tasks.created();
    assert_eq!(created.len(), 1);
    assert!(created[0].category_ids.is_empty());
    assert!(h.sessions.get(UserId(1)).await.is_none());
}

#[tokio::test]
async fn search_flow_drains_to_idle() {
    let h = harness(MockTaskService::default());

    h.engine.handle(cmd(CommandName::Search, 1)).await;
    let result = h.engine.handle(text("milk", 1)).await.unwrap();

    assert!(is_success(&result));
    assert_eq!(*h.tasks.searches.lock().unwrap(), vec!["milk".to_string()]);
    assert!(h.sessions.get(UserId(1)).await.is_none());
}

#[tokio::test]
async fn different_users_never_share_a_draft() {
    let h = harness(MockTaskService::default());

    h.engine.handle(cmd(CommandName::Add, 1)).await;
    h.engine.handle(cmd(CommandName::Add, 2)).await;
    h.engine.handle(text("first user task", 1)).await;
    h.engine.handle(text("second user task", 2)).await;

    let one = h.sessions.get(UserId(1)).await.unwrap();
    let two = h.sessions.get(UserId(2)).await.unwrap();
    assert_eq!(one.draft.title, "first user task");
    assert_eq!(two.draft.title, "second user task");
}

#[tokio::test]
async fn deleting_a_nonexistent_category_reports_remote_failure() {
    let mut tasks = MockTaskService::with_categories(vec![home_category()]);
    tasks.fail_delete_category = true;
    let h = harness(tasks);

    h.engine.handle(cb("delete_category", 1)).await;
    let last = h.engine.handle(cb("del_cat_999", 1)).await.unwrap();

    assert!(is_failure(&last));
    assert_eq!(*h.tasks.deleted_categories.lock().unwrap(), vec![999]);
    assert!(h.sessions.get(UserId(1)).await.is_none());
}

#[tokio::test]
async fn free_text_in_a_button_only_state_keeps_the_draft() {
    let h = harness(MockTaskService::with_categories(vec![home_category()]));

    h.engine.handle(cmd(CommandName::Add, 1)).await;
    h.engine.handle(text("Buy milk", 1)).await;
    h.engine.handle(cb("skip_description", 1)).await;
    let hint = h.engine.handle(text("tomorrow please", 1)).await.unwrap();

    assert!(matches!(hint, Outbound::Prompt { .. }));
    let session = h.sessions.get(UserId(1)).await.unwrap();
    assert_eq!(session.state, DialogState::SettingDueDate);
    assert_eq!(session.draft.title, "Buy milk");
}

#[tokio::test]
async fn unknown_callback_tokens_are_ignored() {
    let h = harness(MockTaskService::default());
    assert!(h.engine.handle(cb("frobnicate", 1)).await.is_none());
    assert!(h.sessions.get(UserId(1)).await.is_none());
}

#[tokio::test]
async fn idle_free_text_gets_a_help_prompt() {
    let h = harness(MockTaskService::default());
    let action = h.engine.handle(text("hello?", 1)).await.unwrap();
    assert!(matches!(action, Outbound::Prompt { .. }));
}

#[tokio::test]
async fn empty_comment_is_rejected_inline_and_state_survives() {
    let h = harness(MockTaskService::default());

    h.engine.handle(cb("add_comment:5", 1)).await;
    let rejected = h.engine.handle(text("   ", 1)).await.unwrap();
    assert!(is_failure(&rejected));
    assert_eq!(
        h.sessions.get(UserId(1)).await.unwrap().state,
        DialogState::AddingComment { task_id: 5 }
    );

    let accepted = h.engine.handle(text("done, I think", 1)).await.unwrap();
    assert!(is_success(&accepted));
    let added = h.comments.added.lock().unwrap().clone();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].task_id, 5);
    assert!(h.sessions.get(UserId(1)).await.is_none());
}

#[tokio::test]
async fn empty_category_name_is_rejected_inline() {
    let h = harness(MockTaskService::default());

    h.engine.handle(cb("create_category", 1)).await;
    let rejected = h.engine.handle(text("  ", 1)).await.unwrap();
    assert!(is_failure(&rejected));
    assert_eq!(
        h.sessions.get(UserId(1)).await.unwrap().state,
        DialogState::AddingCategoryName
    );

    let accepted = h.engine.handle(text("home", 1)).await.unwrap();
    assert!(is_success(&accepted));
    assert!(h.sessions.get(UserId(1)).await.is_none());
}

#[tokio::test]
async fn failed_task_listing_offers_a_retry_button() {
    let tasks = MockTaskService::default();
    tasks.fail_list.store(true, Ordering::SeqCst);
    let h = harness(tasks);

    let menu = h.engine.handle(cmd(CommandName::Tasks, 1)).await.unwrap();
    let Outbound::Menu { options, .. } = menu else {
        panic!("expected a retry menu");
    };
    assert!(
        options
            .iter()
            .any(|o| o.token == CallbackToken::RetryTasks)
    );

    // Once the store recovers, the retry button fetches the real list.
    h.tasks.fail_list.store(false, Ordering::SeqCst);
    let retried = h.engine.handle(cb("retry_tasks", 1)).await.unwrap();
    let Outbound::Menu { options, .. } = retried else {
        panic!("expected the task list");
    };
    assert!(options.iter().any(|o| o.token == CallbackToken::AddTask));
    assert!(
        !options
            .iter()
            .any(|o| o.token == CallbackToken::RetryTasks)
    );
}

#[derive(Default)]
struct CollectingSink {
    delivered: Mutex<Vec<(UserId, Outbound)>>,
}

#[async_trait]
impl EventSink for CollectingSink {
    async fn deliver(&self, user_id: UserId, action: Outbound) {
        self.delivered.lock().unwrap().push((user_id, action));
    }
}

#[tokio::test]
async fn dispatcher_applies_one_users_events_in_arrival_order() {
    let h = harness(MockTaskService::with_categories(vec![home_category()]));
    let sink = Arc::new(CollectingSink::default());
    let dispatcher = Dispatcher::new(h.engine.clone(), sink.clone());

    // Submit the whole flow without waiting for any handling to finish; the
    // per-user queue must apply it in order.
    dispatcher.submit(cmd(CommandName::Add, 1)).await;
    dispatcher.submit(text("Buy milk", 1)).await;
    dispatcher.submit(text("skip", 1)).await;
    dispatcher.submit(cb("due_tomorrow", 1)).await;
    dispatcher.submit(cb("skip_category", 1)).await;

    // Wait for the worker to drain its queue.
    for _ in 0..100 {
        if sink.delivered.lock().unwrap().len() == 5 {
            break;
        }
        tokio::time::sleep(StdDuration::from_millis(10)).await;
    }

    let created = h.tasks.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].title, "Buy milk");

    let delivered = sink.delivered.lock().unwrap();
    assert_eq!(delivered.len(), 5);
    assert!(is_success(&delivered.last().unwrap().1));
}

struct PanicOnceSink {
    panic_next: AtomicBool,
    delivered: Mutex<Vec<Outbound>>,
}

#[async_trait]
impl EventSink for PanicOnceSink {
    async fn deliver(&self, _user_id: UserId, action: Outbound) {
        if self.panic_next.swap(false, Ordering::SeqCst) {
            panic!("delivery failed");
        }
        self.delivered.lock().unwrap().push(action);
    }
}

#[tokio::test]
async fn dispatcher_respawns_a_worker_whose_task_died() {
    let h = harness(MockTaskService::default());
    let sink = Arc::new(PanicOnceSink {
        panic_next: AtomicBool::new(true),
        delivered: Mutex::new(Vec::new()),
    });
    let dispatcher = Dispatcher::new(h.engine.clone(), sink.clone());

    // The first delivery panics, killing the user's worker task.
    dispatcher.submit(cmd(CommandName::Help, 1)).await;
    tokio::time::sleep(StdDuration::from_millis(50)).await;

    // The next event must reach a fresh worker, not vanish into a dead queue.
    dispatcher.submit(cmd(CommandName::Help, 1)).await;
    for _ in 0..100 {
        if !sink.delivered.lock().unwrap().is_empty() {
            break;
        }
        tokio::time::sleep(StdDuration::from_millis(10)).await;
    }

    let delivered = sink.delivered.lock().unwrap();
    assert_eq!(delivered.len(), 1);
    assert!(matches!(delivered[0], Outbound::Menu { .. }));
}

#[tokio::test]
async fn dispatcher_keeps_users_isolated_under_interleaving() {
    let h = harness(MockTaskService::default());
    let sink = Arc::new(CollectingSink::default());
    let dispatcher = Dispatcher::new(h.engine.clone(), sink.clone());

    dispatcher.submit(cmd(CommandName::Add, 1)).await;
    dispatcher.submit(cmd(CommandName::Add, 2)).await;
    dispatcher.submit(text("for user one", 1)).await;
    dispatcher.submit(text("for user two", 2)).await;

    for _ in 0..100 {
        let both_titled = {
            let one = h.sessions.get(UserId(1)).await;
            let two = h.sessions.get(UserId(2)).await;
            one.is_some_and(|s| !s.draft.title.is_empty())
                && two.is_some_and(|s| !s.draft.title.is_empty())
        };
        if both_titled {
            break;
        }
        tokio::time::sleep(StdDuration::from_millis(10)).await;
    }

    assert_eq!(
        h.sessions.get(UserId(1)).await.unwrap().draft.title,
        "for user one"
    );
    assert_eq!(
        h.sessions.get(UserId(2)).await.unwrap().draft.title,
        "for user two"
    );
}
