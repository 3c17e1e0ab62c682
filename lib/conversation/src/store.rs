//! Session storage.
//!
//! The store is the only owner of session state. Callers get snapshots or
//! mutate a session through a closure that runs under that user's lock, so a
//! second message from the same user can never lose an update. Nothing is
//! persisted; sessions live as long as the process.

use crate::session::UserSession;
use chrono::{Duration, Utc};
use litbot_core::UserId;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Trait for session storage.
pub trait SessionStore: Send + Sync {
    /// Returns a snapshot of the user's session, creating it on first contact.
    fn get_or_create(&self, user_id: UserId) -> impl Future<Output = UserSession> + Send;

    /// Runs `f` against the user's session under the per-user lock.
    ///
    /// The session is created first if it does not exist yet.
    fn update<F, R>(&self, user_id: UserId, f: F) -> impl Future<Output = R> + Send
    where
        F: FnOnce(&mut UserSession) -> R + Send,
        R: Send;

    /// Empties the user's history; favorites and stats are kept.
    fn clear(&self, user_id: UserId) -> impl Future<Output = ()> + Send;

    /// Returns the number of live sessions.
    fn len(&self) -> impl Future<Output = usize> + Send;

    /// Removes sessions not touched within `idle_for`, returning how many.
    fn evict_idle(&self, idle_for: Duration) -> impl Future<Output = usize> + Send;
}

type SessionHandle = Arc<Mutex<UserSession>>;

/// Process-local session store.
///
/// The map lock is only held to look up or insert an entry; each session has
/// its own mutex.
#[derive(Debug, Default, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<UserId, SessionHandle>>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn handle(&self, user_id: UserId) -> SessionHandle {
        if let Some(handle) = self.sessions.read().await.get(&user_id) {
            return Arc::clone(handle);
        }

        let mut sessions = self.sessions.write().await;
        let handle = sessions.entry(user_id).or_insert_with(|| {
            debug!(%user_id, "creating session");
            Arc::new(Mutex::new(UserSession::new(user_id)))
        });
        Arc::clone(handle)
    }
}

impl SessionStore for InMemorySessionStore {
    async fn get_or_create(&self, user_id: UserId) -> UserSession {
        self.update(user_id, |session| session.clone()).await
    }

    async fn update<F, R>(&self, user_id: UserId, f: F) -> R
    where
        F: FnOnce(&mut UserSession) -> R + Send,
        R: Send,
    {
        let handle = self.handle(user_id).await;
        let mut session = handle.lock().await;
        session.touch();
        f(&mut session)
    }

    async fn clear(&self, user_id: UserId) {
        self.update(user_id, UserSession::clear_history).await;
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn evict_idle(&self, idle_for: Duration) -> usize {
        let cutoff = Utc::now() - idle_for;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        // The map holds one reference; any other means an `update` has taken
        // the handle and may not have locked it yet.
        sessions.retain(|_, handle| {
            if Arc::strong_count(handle) > 1 {
                return true;
            }
            match handle.try_lock() {
                Ok(session) => !session.is_idle_since(cutoff),
                Err(_) => true,
            }
        });

        before - sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_user_gets_empty_session() {
        let store = InMemorySessionStore::new();

        for raw in [1, 2, -3] {
            let session = store.get_or_create(UserId::new(raw)).await;
            assert!(session.history.is_empty());
            assert!(session.favorites.is_empty());
            assert_eq!(session.stats.message_count, 0);
        }
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let store = InMemorySessionStore::new();
        let user = UserId::new(7);

        let first = store.get_or_create(user).await;
        store.update(user, |s| s.push_user_turn("hello")).await;
        let second = store.get_or_create(user).await;

        assert_eq!(first.stats.joined_at, second.stats.joined_at);
        assert_eq!(second.history.len(), 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn clear_keeps_favorites_and_count() {
        let store = InMemorySessionStore::new();
        let user = UserId::new(7);

        store
            .update(user, |s| {
                s.push_user_turn("Chekhov");
                s.push_assistant_turn("Anton Chekhov was...");
                s.favorites.add("Chekhov");
            })
            .await;

        store.clear(user).await;
        let session = store.get_or_create(user).await;

        assert!(session.history.is_empty());
        assert_eq!(session.favorites.len(), 1);
        assert_eq!(session.stats.message_count, 1);
    }

    #[tokio::test]
    async fn clear_creates_unknown_session() {
        let store = InMemorySessionStore::new();
        store.clear(UserId::new(5)).await;
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn update_returns_closure_result() {
        let store = InMemorySessionStore::new();
        let count = store
            .update(UserId::new(1), |s| {
                s.push_user_turn("a");
                s.push_user_turn("b");
                s.stats.message_count
            })
            .await;
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn concurrent_updates_are_not_lost() {
        let store = InMemorySessionStore::new();
        let user = UserId::new(1);

        let mut tasks = Vec::new();
        for i in 0..50 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store.update(user, |s| s.push_user_turn(format!("msg {i}"))).await;
            }));
        }
        for task in tasks {
            task.await.expect("task panicked");
        }

        let session = store.get_or_create(user).await;
        assert_eq!(session.stats.message_count, 50);
        assert_eq!(session.history.len(), 50);
    }

    #[tokio::test]
    async fn evict_idle_removes_only_stale_sessions() {
        let store = InMemorySessionStore::new();
        store.get_or_create(UserId::new(1)).await;
        store.get_or_create(UserId::new(2)).await;

        assert_eq!(store.evict_idle(Duration::minutes(10)).await, 0);
        assert_eq!(store.len().await, 2);

        // A negative idle window puts the cutoff in the future.
        assert_eq!(store.evict_idle(Duration::minutes(-1)).await, 2);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn sweep_keeps_session_whose_handle_is_taken_but_not_locked() {
        let store = InMemorySessionStore::new();
        let user = UserId::new(9);

        // An update between looking up its handle and locking the session.
        let handle = store.handle(user).await;
        assert_eq!(store.evict_idle(Duration::minutes(-1)).await, 0);

        {
            let mut session = handle.lock().await;
            session.touch();
            session.push_user_turn("Who wrote Dead Souls?");
        }
        drop(handle);

        let session = store.get_or_create(user).await;
        assert_eq!(session.stats.message_count, 1);
        assert_eq!(session.history.len(), 1);
        assert_eq!(store.len().await, 1);
    }
}
