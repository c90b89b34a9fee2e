//! Session domain: state tags, the per-user session record, and its store.

pub mod model;
pub mod state;
pub mod store;

pub use model::{Session, TaskDraft};
pub use state::DialogState;
pub use store::{InMemorySessionStore, SessionStore};
