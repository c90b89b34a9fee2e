//! Core domain types for the todobot dialog engine.
//!
//! This crate holds everything the dialog engine and its collaborator
//! clients share: the inbound event and outbound action shapes, the dialog
//! state tags and session model, the task/category/comment models mirroring
//! the external stores, and the service traits the HTTP clients implement.
//! It performs no I/O itself.

pub mod comment;
pub mod error;
pub mod event;
pub mod outbound;
pub mod session;
pub mod task;
pub mod user;

pub use comment::{Comment, CommentService, NewComment};
pub use error::{BotError, Result};
pub use event::{CallbackToken, CommandName, InboundEvent};
pub use outbound::{MenuOption, Outbound, ReportOutcome};
pub use session::{DialogState, InMemorySessionStore, Session, SessionStore, TaskDraft};
pub use task::{Category, NewTask, Task, TaskPatch, TaskService};
pub use user::UserId;
