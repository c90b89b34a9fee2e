//! Session store: per-user session records.
//!
//! The store holds at most one mutable session per user. The dialog engine
//! serializes all events for a single user (see the dispatcher), so the store
//! itself only needs per-key mutual exclusion, which the `RwLock` over the
//! whole map provides. No ordering guarantees exist across different users.

use super::model::Session;
use crate::user::UserId;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Abstract session storage.
///
/// A session is absent whenever no multi-step flow is in progress for the
/// user; absence is equivalent to the `Idle` state.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the session for a user, if a flow is in progress.
    async fn get(&self, user_id: UserId) -> Option<Session>;

    /// Stores (or replaces) the session for its owner.
    async fn set(&self, session: Session);

    /// Removes the session for a user, if any.
    async fn clear(&self, user_id: UserId);
}

/// In-memory session store.
///
/// Sessions never outlive the process; flows are resumable by re-issuing the
/// start command.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<UserId, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, user_id: UserId) -> Option<Session> {
        let sessions = self.sessions.read().await;
        sessions.get(&user_id).cloned()
    }

    async fn set(&self, session: Session) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.user_id, session);
    }

    async fn clear(&self, user_id: UserId) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(&user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::DialogState;

    #[tokio::test]
    async fn absent_until_set() {
        let store = InMemorySessionStore::new();
        assert!(store.get(UserId(1)).await.is_none());

        store
            .set(Session::new(UserId(1), DialogState::AddingTaskTitle))
            .await;
        let session = store.get(UserId(1)).await.unwrap();
        assert_eq!(session.state, DialogState::AddingTaskTitle);
    }

    #[tokio::test]
    async fn clear_removes_only_the_target_user() {
        let store = InMemorySessionStore::new();
        store
            .set(Session::new(UserId(1), DialogState::Searching))
            .await;
        store
            .set(Session::new(UserId(2), DialogState::AddingCategoryName))
            .await;

        store.clear(UserId(1)).await;

        assert!(store.get(UserId(1)).await.is_none());
        assert!(store.get(UserId(2)).await.is_some());
    }

    #[tokio::test]
    async fn set_replaces_existing_session() {
        let store = InMemorySessionStore::new();
        let mut session = Session::new(UserId(5), DialogState::AddingTaskTitle);
        session.draft.title = "old".to_string();
        store.set(session).await;

        store
            .set(Session::new(UserId(5), DialogState::AddingTaskTitle))
            .await;
        let session = store.get(UserId(5)).await.unwrap();
        assert!(session.draft.title.is_empty());
    }
}
