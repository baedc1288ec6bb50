//! Chat data model: messages, sessions and the session collection

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Prefix of assistant messages that carry a failed request
pub const ERROR_PREFIX: &str = "Error: ";

/// Content of the placeholder shown while a reply is in flight
pub const PENDING_TEXT: &str = "Thinking...";

/// Generate a new sortable unique id
pub fn new_id() -> String {
    Ulid::new().to_string()
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Typed by the user
    User,
    /// Produced by the AI (or an error standing in for a reply)
    Assistant,
}

/// One message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Stable identity of the message
    pub id: String,
    /// Author
    pub role: Role,
    /// Text content
    pub content: String,
    /// Creation time
    pub timestamp: DateTime<Utc>,
    /// Placeholder awaiting a reply
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pending: bool,
}

impl ChatMessage {
    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            pending: false,
        }
    }

    /// New user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// New assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Assistant message standing in for a failed request
    ///
    /// # Examples
    ///
    /// ```
    /// use puter_demo::chat::ChatMessage;
    ///
    /// let msg = ChatMessage::error_reply("rate limited");
    /// assert_eq!(msg.content, "Error: rate limited");
    /// assert!(msg.is_error());
    /// ```
    pub fn error_reply(message: impl AsRef<str>) -> Self {
        Self::assistant(format!("{}{}", ERROR_PREFIX, message.as_ref()))
    }

    /// Placeholder assistant turn shown while a reply is in flight
    pub fn placeholder() -> Self {
        Self {
            pending: true,
            ..Self::assistant(PENDING_TEXT)
        }
    }

    /// Whether this assistant message reports an error
    pub fn is_error(&self) -> bool {
        self.role == Role::Assistant && self.content.starts_with(ERROR_PREFIX)
    }

    /// Copy of this message under the same id with new content
    fn replaced_with(&self, content: String) -> Self {
        Self {
            id: self.id.clone(),
            role: self.role,
            content,
            timestamp: Utc::now(),
            pending: false,
        }
    }
}

/// Title for a session whose first user message is `text`
///
/// Keeps the first `max_chars` characters and appends `...` when the
/// message is longer.
///
/// # Examples
///
/// ```
/// use puter_demo::chat::derive_title;
///
/// assert_eq!(derive_title("Hello", 30), "Hello");
/// assert_eq!(derive_title("abcdef", 3), "abc...");
/// ```
pub fn derive_title(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// One conversation thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    /// Unique identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Messages in order
    pub messages: Vec<ChatMessage>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Time of the last append, replacement or clear
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// New session seeded with an assistant greeting
    pub fn new(title: impl Into<String>, welcome: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            title: title.into(),
            messages: vec![ChatMessage::assistant(welcome)],
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump `updated_at`, strictly past its previous value
    fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }

    /// Append a message
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.touch();
    }

    /// Replace the content of the message with `id`
    ///
    /// Returns false when no such message exists.
    pub fn replace(&mut self, id: &str, content: String) -> bool {
        let Some(slot) = self.messages.iter_mut().find(|m| m.id == id) else {
            return false;
        };
        *slot = slot.replaced_with(content);
        self.touch();
        true
    }

    /// Drop all messages, leaving one fresh greeting and the given title
    pub fn reset(&mut self, title: impl Into<String>, welcome: impl Into<String>) {
        self.title = title.into();
        self.messages = vec![ChatMessage::assistant(welcome)];
        self.touch();
    }

    /// Number of user messages
    pub fn user_message_count(&self) -> usize {
        self.messages.iter().filter(|m| m.role == Role::User).count()
    }

    /// Most recent message
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

/// Every session plus the active selection
///
/// Sessions are kept in creation order; at least one always exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCollection {
    /// Sessions in creation order
    pub sessions: Vec<ChatSession>,
    /// Id of the active session
    pub active_session_id: String,
}

impl SessionCollection {
    /// Collection holding one fresh session
    pub fn with_default(title: &str, welcome: &str) -> Self {
        let session = ChatSession::new(title, welcome);
        Self {
            active_session_id: session.id.clone(),
            sessions: vec![session],
        }
    }

    /// Session by exact id
    pub fn get(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Mutable session by exact id
    pub fn get_mut(&mut self, id: &str) -> Option<&mut ChatSession> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    /// Active session, or the first one if the selection is stale
    pub fn active(&self) -> &ChatSession {
        self.get(&self.active_session_id)
            .unwrap_or(&self.sessions[0])
    }

    /// Sessions ordered by `updated_at`, most recent first
    pub fn by_recent(&self) -> Vec<&ChatSession> {
        let mut sessions: Vec<&ChatSession> = self.sessions.iter().collect();
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        sessions
    }

    /// Id of the most recently updated session
    pub fn most_recent_id(&self) -> Option<String> {
        self.by_recent().first().map(|s| s.id.clone())
    }
}
