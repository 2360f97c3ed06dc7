//! Chat session state.
//!
//! History is scoped to an explicit server-issued session rather than any
//! process-global state, so handlers receive the store and operate on one
//! session at a time. Nothing is persisted; sessions live for the process
//! lifetime only.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single message in a chat session
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct ChatSession {
    messages: Vec<ChatMessage>,
}

/// In-memory store of chat sessions, keyed by server-issued session id
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, ChatSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Create a new empty session and return its id.
    pub fn create(&self) -> String {
        let session_id = Uuid::new_v4().to_string();
        self.sessions
            .insert(session_id.clone(), ChatSession::default());
        session_id
    }

    pub fn exists(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Append a message to a session. Returns false when the session is
    /// unknown.
    pub fn append(&self, session_id: &str, role: Role, content: impl Into<String>) -> bool {
        match self.sessions.get_mut(session_id) {
            Some(mut session) => {
                session.messages.push(ChatMessage {
                    role,
                    content: content.into(),
                    created_at: Utc::now(),
                });
                true
            }
            None => false,
        }
    }

    /// Snapshot of a session's history, oldest first.
    pub fn history(&self, session_id: &str) -> Option<Vec<ChatMessage>> {
        self.sessions
            .get(session_id)
            .map(|session| session.messages.clone())
    }

    /// Remove all messages from a session, keeping the session itself.
    /// Returns false when the session is unknown.
    pub fn clear(&self, session_id: &str) -> bool {
        match self.sessions.get_mut(session_id) {
            Some(mut session) => {
                session.messages.clear();
                true
            }
            None => false,
        }
    }

    #[allow(dead_code)] // Useful for monitoring/debugging
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_history_round_trip() {
        let store = SessionStore::new();
        let id = store.create();

        assert!(store.append(&id, Role::User, "hello"));
        assert!(store.append(&id, Role::Assistant, "hi there"));

        let history = store.history(&id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].content, "hello");
        assert_eq!(history[1].role, Role::Assistant);
    }

    #[test]
    fn unknown_session_is_rejected() {
        let store = SessionStore::new();
        assert!(!store.exists("nope"));
        assert!(!store.append("nope", Role::User, "hello"));
        assert!(store.history("nope").is_none());
        assert!(!store.clear("nope"));
    }

    #[test]
    fn clear_empties_but_keeps_the_session() {
        let store = SessionStore::new();
        let id = store.create();
        store.append(&id, Role::User, "hello");

        assert!(store.clear(&id));
        assert!(store.exists(&id));
        assert!(store.history(&id).unwrap().is_empty());
    }

    #[test]
    fn sessions_are_isolated() {
        let store = SessionStore::new();
        let first = store.create();
        let second = store.create();
        store.append(&first, Role::User, "only in first");

        assert_eq!(store.history(&first).unwrap().len(), 1);
        assert!(store.history(&second).unwrap().is_empty());
        assert_eq!(store.session_count(), 2);
    }
}
