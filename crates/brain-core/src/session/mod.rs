//! Conversation sessions held in process memory
//!
//! Each session's transcript sits behind its own async mutex, held for a whole
//! turn, so turns within one session run one at a time while different
//! sessions proceed independently.
//!
//! The store is bounded: it holds at most `max_sessions` entries and drops a
//! session once it has been idle for `idle`. Reset removes the entry.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_IDLE_SECS};
use crate::types::{ChatMessage, MessageRole};

/// Session used when the client does not name one
pub const DEFAULT_SESSION_ID: &str = "default";

/// One user-visible transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: MessageRole,
    pub content: String,
}

/// A conversation transcript. System prompts are never stored here.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    messages: Vec<ChatMessage>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            messages: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Full transcript, tool messages included
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = ChatMessage>) {
        self.messages.extend(messages);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// User and assistant text only; tool traffic never leaves the brain
    pub fn visible_history(&self) -> Vec<HistoryEntry> {
        self.messages
            .iter()
            .filter(|m| m.role.is_user_visible())
            .filter_map(|m| {
                m.text().map(|text| HistoryEntry {
                    role: m.role,
                    content: text.to_string(),
                })
            })
            .collect()
    }
}

/// Shared handle to one session
pub type SessionHandle = Arc<tokio::sync::Mutex<Session>>;

/// Sessions keyed by id
pub struct SessionStore {
    sessions: Cache<String, SessionHandle>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_MAX_SESSIONS, Duration::from_secs(DEFAULT_SESSION_IDLE_SECS))
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding at most `max_sessions`, evicting sessions idle for `idle`
    pub fn with_limits(max_sessions: u64, idle: Duration) -> Self {
        Self {
            sessions: Cache::builder().max_capacity(max_sessions).time_to_idle(idle).build(),
        }
    }

    /// Get the session, creating an empty one on first use
    pub fn get_or_create(&self, id: &str) -> SessionHandle {
        self.sessions
            .get_with(id.to_string(), || Arc::new(tokio::sync::Mutex::new(Session::new(id))))
    }

    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions.get(id)
    }

    /// Forget a session, waiting for any turn in progress on it
    pub async fn reset(&self, id: &str) {
        if let Some(handle) = self.sessions.remove(id) {
            handle.lock().await.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.run_pending_tasks();
        self.sessions.entry_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_visible_history_hides_tool_messages() {
        let mut session = Session::new("s1");
        session.push(ChatMessage::user("What is 20% margin on $100?"));
        session.push(ChatMessage::tool(
            "c1",
            "calculate_margin",
            json!({"revenue": 100, "margin_pct": 20}),
            r#"{"margin":20.0}"#,
        ));
        session.push(ChatMessage::assistant("The margin is $20."));

        assert_eq!(session.len(), 3);
        let history = session.visible_history();
        assert_eq!(
            history,
            vec![
                HistoryEntry {
                    role: MessageRole::User,
                    content: "What is 20% margin on $100?".to_string()
                },
                HistoryEntry {
                    role: MessageRole::Assistant,
                    content: "The margin is $20.".to_string()
                },
            ]
        );
        assert!(history.iter().all(|e| !e.content.contains("margin\":")));
    }

    #[tokio::test]
    async fn test_store_shares_and_resets_sessions() {
        let store = SessionStore::new();
        assert!(store.get("a").is_none());

        let handle = store.get_or_create("a");
        handle.lock().await.push(ChatMessage::user("hi"));

        let again = store.get_or_create("a");
        assert!(Arc::ptr_eq(&handle, &again));
        assert_eq!(again.lock().await.len(), 1);

        store.get_or_create("b");
        assert_eq!(store.len(), 2);

        store.reset("a").await;
        assert!(store.get("a").is_none());
        assert_eq!(store.len(), 1);
        assert!(handle.lock().await.is_empty());

        let fresh = store.get_or_create("a");
        assert!(!Arc::ptr_eq(&handle, &fresh));
        assert!(fresh.lock().await.is_empty());

        // Unknown sessions reset to nothing without being created
        store.reset("missing").await;
        assert!(store.get("missing").is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_store_is_capped() {
        let store = SessionStore::with_limits(3, Duration::from_secs(3600));
        for i in 0..50 {
            store.get_or_create(&format!("client-{}", i));
        }
        assert!(store.len() <= 3, "store grew to {}", store.len());
    }

    #[test]
    fn test_idle_sessions_expire() {
        let store = SessionStore::with_limits(10, Duration::from_millis(50));
        store.get_or_create("idle");
        assert!(store.get("idle").is_some());

        std::thread::sleep(Duration::from_millis(150));
        assert!(store.get("idle").is_none());
    }
}
