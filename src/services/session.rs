//! Per-session conversation memory.
//!
//! Process-lifetime state only: no eviction and no durable persistence.
//! Sessions are created lazily on first reference. The outer map lock is
//! held only to resolve the session; appends take the session's own lock, so
//! concurrent requests for different sessions don't contend and concurrent
//! requests for the same session serialize instead of losing turns.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::models::Turn;

type SessionHandle = Arc<Mutex<Vec<Turn>>>;

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn get_or_create(&self, session_id: &str) -> SessionHandle {
        {
            let sessions = self.sessions.read().await;
            if let Some(handle) = sessions.get(session_id) {
                return Arc::clone(handle);
            }
        }

        let mut sessions = self.sessions.write().await;
        Arc::clone(
            sessions
                .entry(session_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(Vec::new()))),
        )
    }

    /// Snapshot of the session's turns in chronological order, creating the
    /// session if it doesn't exist yet.
    pub async fn history(&self, session_id: &str) -> Vec<Turn> {
        let handle = self.get_or_create(session_id).await;
        let turns = handle.lock().await;
        turns.clone()
    }

    /// Append a completed turn and return the updated history.
    pub async fn record(&self, session_id: &str, turn: Turn) -> Vec<Turn> {
        let handle = self.get_or_create(session_id).await;
        let mut turns = handle.lock().await;
        turns.push(turn);
        turns.clone()
    }

    /// Number of sessions seen so far.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unseen_session_starts_empty() {
        let store = SessionStore::new();
        assert!(store.history("s1").await.is_empty());
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn turns_append_in_chronological_order() {
        let store = SessionStore::new();
        store.record("s1", Turn::new("q1", "a1")).await;
        let history = store.record("s1", Turn::new("q2", "a2")).await;

        assert_eq!(history.len(), 2);
        assert_eq!(history[0], Turn::new("q1", "a1"));
        assert_eq!(history[1], Turn::new("q2", "a2"));
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = SessionStore::new();
        store.record("s1", Turn::new("q", "a")).await;
        assert!(store.history("s2").await.is_empty());
        assert_eq!(store.history("s1").await.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_appends_to_one_session_lose_nothing() {
        let store = Arc::new(SessionStore::new());

        let mut handles = Vec::new();
        for i in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .record("shared", Turn::new(format!("q{i}"), format!("a{i}")))
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.history("shared").await.len(), 32);
    }
}
