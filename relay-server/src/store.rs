//! In-memory conversation store.
//!
//! Conversations are created lazily on first reference and live until the
//! process exits; there is no eviction and no persistence. The map is
//! guarded by an `RwLock` and each conversation sits behind its own async
//! `Mutex`, so requests against the same conversation id are serialized
//! while distinct ids proceed concurrently.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Fixed instruction preamble; the first turn of every conversation.
pub const SYSTEM_PREAMBLE: &str = "You are a helpful AI assistant for Iron Lady, a leadership and edtech company. \
    Always answer based on Iron Lady's programs, FAQs, and values. \
    If the user asks about programs, duration, mode, certificates, mentors, pedagogy, or impact, \
    use the provided knowledge base. \
    If the answer is not in the knowledge base, use your AI reasoning but keep context about Iron Lady.";

/// One role-tagged message unit within a conversation.
///
/// Immutable once appended; turns are only ever added, never edited or
/// removed. The role is the caller-supplied string (no validation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: String,
    pub content: String,
}

/// Ordered turn history identified by a caller-supplied id.
#[derive(Debug)]
pub struct Conversation {
    turns: Vec<Turn>,
    ended: bool,
}

impl Conversation {
    /// Create a conversation seeded with the system preamble.
    fn new() -> Self {
        Self {
            turns: vec![Turn {
                role: "system".into(),
                content: SYSTEM_PREAMBLE.into(),
            }],
            ended: false,
        }
    }

    /// Append a turn.
    pub fn push(&mut self, role: impl Into<String>, content: impl Into<String>) {
        self.turns.push(Turn {
            role: role.into(),
            content: content.into(),
        });
    }

    /// The full turn history, oldest first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns, including the system preamble.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// A conversation always holds at least the system turn.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether this conversation has been marked ended.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Mark the conversation ended; subsequent chat requests are rejected.
    pub fn end(&mut self) {
        self.ended = true;
    }
}

/// Shared handle to one conversation.
pub type ConversationHandle = Arc<Mutex<Conversation>>;

/// Process-wide map from conversation id to conversation state.
#[derive(Clone, Default)]
pub struct ConversationStore {
    inner: Arc<RwLock<HashMap<String, ConversationHandle>>>,
}

impl ConversationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the conversation for `id`, creating it on first reference.
    pub async fn get_or_create(&self, id: &str) -> ConversationHandle {
        if let Some(conversation) = self.inner.read().await.get(id) {
            return conversation.clone();
        }

        let mut map = self.inner.write().await;
        map.entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Conversation::new())))
            .clone()
    }

    /// Return the conversation for `id` without creating it.
    pub async fn get(&self, id: &str) -> Option<ConversationHandle> {
        self.inner.read().await.get(id).cloned()
    }

    /// Mark the conversation ended. Returns false for an unseen id.
    pub async fn end(&self, id: &str) -> bool {
        let handle = match self.inner.read().await.get(id) {
            Some(handle) => handle.clone(),
            None => return false,
        };
        handle.lock().await.end();
        true
    }

    /// Number of conversations currently held.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Whether the store holds no conversations.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
