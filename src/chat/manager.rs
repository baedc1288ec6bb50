//! Multi-session chat manager
//!
//! Owns the session collection, applies every mutation, persists after each
//! one, and runs the request/response round trip against the capability
//! client. A send is split in two phases: [`ChatSessionManager::begin_send`]
//! appends the user message and a placeholder reply, and
//! [`ChatSessionManager::complete_send`] replaces that placeholder by id
//! once the client answers.

use crate::chat::store::SessionStore;
use crate::chat::types::{derive_title, ChatMessage, ChatSession, SessionCollection};
use crate::client::{extract_reply_text, CapabilityClient};
use crate::config::ChatConfig;
use crate::error::{error_message, DemoError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A send that has been started but not completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    /// Session the turn belongs to
    pub session_id: String,
    /// Id of the user message
    pub user_message_id: String,
    /// Id of the placeholder reply to be replaced
    pub placeholder_id: String,
    /// Trimmed prompt to send
    pub prompt: String,
}

/// Result of a send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank prompt, or a send already in flight for the session
    Ignored,
    /// Reply stored under `reply_id`
    Replied {
        /// Id of the assistant message
        reply_id: String,
    },
    /// Error stored as an assistant message under `reply_id`
    Failed {
        /// Id of the assistant message
        reply_id: String,
        /// Error text
        error: String,
    },
    /// The session was deleted or cleared before the reply arrived
    Discarded,
}

/// Chat session manager
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use puter_demo::chat::{ChatSessionManager, SessionStore};
/// use puter_demo::client::FakeCapabilityClient;
/// use puter_demo::config::ChatConfig;
/// use puter_demo::storage::MemoryStore;
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() -> puter_demo::error::Result<()> {
/// let client = Arc::new(FakeCapabilityClient::new());
/// client.push_chat_reply(json!({"message": {"content": "Hi there"}}));
///
/// let store = SessionStore::new(Arc::new(MemoryStore::new()), "sessions");
/// let mut manager = ChatSessionManager::new(client, store, ChatConfig::default());
///
/// let id = manager.active_id().to_string();
/// manager.send_message(&id, "Hello").await?;
///
/// let session = manager.active_session();
/// assert_eq!(session.title, "Hello");
/// assert_eq!(session.messages.len(), 3);
/// assert_eq!(session.messages[2].content, "Hi there");
/// # Ok(())
/// # }
/// ```
pub struct ChatSessionManager {
    collection: SessionCollection,
    /// Session id to the placeholder id of its in-flight send
    sending: HashMap<String, String>,
    client: Arc<dyn CapabilityClient>,
    store: SessionStore,
    settings: ChatConfig,
}

impl ChatSessionManager {
    /// Create a manager, restoring any persisted sessions
    pub fn new(client: Arc<dyn CapabilityClient>, store: SessionStore, settings: ChatConfig) -> Self {
        let collection = store.load(&settings);
        let manager = Self {
            collection,
            sending: HashMap::new(),
            client,
            store,
            settings,
        };
        manager.persist();
        manager
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.collection) {
            tracing::warn!("Failed to persist chat sessions: {:#}", e);
        }
    }

    fn fresh_session(&self) -> ChatSession {
        ChatSession::new(&self.settings.default_title, &self.settings.welcome_message)
    }

    /// Sessions in creation order
    pub fn sessions(&self) -> &[ChatSession] {
        &self.collection.sessions
    }

    /// Sessions ordered by last update, most recent first
    pub fn sessions_by_recent(&self) -> Vec<&ChatSession> {
        self.collection.by_recent()
    }

    /// Session by exact id
    pub fn session(&self, id: &str) -> Option<&ChatSession> {
        self.collection.get(id)
    }

    /// Currently selected session
    pub fn active_session(&self) -> &ChatSession {
        self.collection.active()
    }

    /// Id of the currently selected session
    pub fn active_id(&self) -> &str {
        &self.active_session().id
    }

    /// The whole collection, as persisted
    pub fn collection(&self) -> &SessionCollection {
        &self.collection
    }

    /// Resolve a full id or a unique id prefix
    ///
    /// # Errors
    ///
    /// Returns `DemoError::SessionNotFound` when nothing matches, or when a
    /// prefix matches several sessions.
    pub fn resolve_id(&self, id_or_prefix: &str) -> Result<String> {
        let needle = id_or_prefix.trim();
        if let Some(session) = self.collection.get(needle) {
            return Ok(session.id.clone());
        }

        let upper = needle.to_uppercase();
        let matches: Vec<&ChatSession> = self
            .collection
            .sessions
            .iter()
            .filter(|s| !needle.is_empty() && s.id.starts_with(&upper))
            .collect();
        match matches.as_slice() {
            [only] => Ok(only.id.clone()),
            [] => Err(DemoError::SessionNotFound(needle.to_string()).into()),
            _ => Err(DemoError::SessionNotFound(format!(
                "{} is ambiguous ({} sessions match)",
                needle,
                matches.len()
            ))
            .into()),
        }
    }

    /// Make `id` the active session
    pub fn select_session(&mut self, id: &str) -> Result<()> {
        let id = self.resolve_id(id)?;
        self.collection.active_session_id = id;
        self.persist();
        Ok(())
    }

    /// Create a new session, make it active, and return its id
    pub fn create_session(&mut self) -> String {
        let session = self.fresh_session();
        let id = session.id.clone();
        tracing::debug!("Created chat session {}", id);
        self.collection.sessions.push(session);
        self.collection.active_session_id = id.clone();
        self.persist();
        id
    }

    /// Delete a session
    ///
    /// When the active session is deleted, the most recently updated
    /// remaining session becomes active.
    ///
    /// # Errors
    ///
    /// Returns `DemoError::LastSession` if it is the only session, or
    /// `DemoError::SessionNotFound` for an unknown id. Nothing changes in
    /// either case.
    pub fn delete_session(&mut self, id: &str) -> Result<()> {
        let id = self.resolve_id(id)?;
        if self.collection.sessions.len() <= 1 {
            tracing::warn!("Refusing to delete the last chat session");
            return Err(DemoError::LastSession.into());
        }

        self.collection.sessions.retain(|s| s.id != id);
        self.sending.remove(&id);
        if self.collection.active_session_id == id {
            if let Some(next) = self.collection.most_recent_id() {
                self.collection.active_session_id = next;
            }
        }
        tracing::debug!("Deleted chat session {}", id);
        self.persist();
        Ok(())
    }

    /// Reset a session to one fresh greeting and the default title
    pub fn clear_session(&mut self, id: &str) -> Result<()> {
        let id = self.resolve_id(id)?;
        let title = self.settings.default_title.clone();
        let welcome = self.settings.welcome_message.clone();
        if let Some(session) = self.collection.get_mut(&id) {
            session.reset(title, welcome);
        }
        self.sending.remove(&id);
        self.persist();
        Ok(())
    }

    /// Replace every session with one fresh default session; returns its id
    pub fn clear_all(&mut self) -> String {
        let session = self.fresh_session();
        let id = session.id.clone();
        self.collection = SessionCollection {
            active_session_id: id.clone(),
            sessions: vec![session],
        };
        self.sending.clear();
        self.persist();
        id
    }

    /// Whether a send is in flight for `id`
    pub fn is_sending(&self, id: &str) -> bool {
        self.sending.contains_key(id)
    }

    /// First phase of a send
    ///
    /// Returns `Ok(None)` without changing anything when `text` is blank or
    /// a send is already in flight for the session.
    ///
    /// # Errors
    ///
    /// Returns `DemoError::SessionNotFound` for an unknown session.
    pub fn begin_send(&mut self, session_id: &str, text: &str) -> Result<Option<PendingSend>> {
        let prompt = text.trim();
        if prompt.is_empty() {
            return Ok(None);
        }

        let session_id = self.resolve_id(session_id)?;
        if self.sending.contains_key(&session_id) {
            tracing::debug!("Send already in flight for {}", session_id);
            return Ok(None);
        }

        let title_max_chars = self.settings.title_max_chars;
        let Some(session) = self.collection.get_mut(&session_id) else {
            return Err(DemoError::SessionNotFound(session_id).into());
        };

        if session.user_message_count() == 0 {
            session.title = derive_title(prompt, title_max_chars);
        }

        let user_message = ChatMessage::user(prompt);
        let placeholder = ChatMessage::placeholder();
        let pending = PendingSend {
            session_id: session_id.clone(),
            user_message_id: user_message.id.clone(),
            placeholder_id: placeholder.id.clone(),
            prompt: prompt.to_string(),
        };
        session.push(user_message);
        session.push(placeholder);

        self.sending.insert(session_id, pending.placeholder_id.clone());
        self.persist();
        Ok(Some(pending))
    }

    /// Second phase of a send: store the reply (or error) in place of the
    /// placeholder
    pub fn complete_send(&mut self, pending: PendingSend, result: Result<Value>) -> SendOutcome {
        if self.sending.get(&pending.session_id) == Some(&pending.placeholder_id) {
            self.sending.remove(&pending.session_id);
        }

        let (content, error) = match result {
            Ok(response) => (extract_reply_text(&response), None),
            Err(e) => {
                let error = error_message(&e);
                tracing::warn!("Chat request failed: {}", error);
                (ChatMessage::error_reply(&error).content, Some(error))
            }
        };

        let replaced = self
            .collection
            .get_mut(&pending.session_id)
            .map(|session| session.replace(&pending.placeholder_id, content))
            .unwrap_or(false);

        if !replaced {
            tracing::debug!(
                "Session {} changed before the reply arrived, dropping it",
                pending.session_id
            );
            return SendOutcome::Discarded;
        }

        self.persist();
        let reply_id = pending.placeholder_id;
        match error {
            None => SendOutcome::Replied { reply_id },
            Some(error) => SendOutcome::Failed { reply_id, error },
        }
    }

    /// Send a prompt and wait for the reply
    ///
    /// Blank prompts and prompts for a session that is already sending are
    /// ignored without calling the client. Client failures are stored in the
    /// conversation, not returned.
    ///
    /// # Errors
    ///
    /// Returns `DemoError::SessionNotFound` for an unknown session.
    pub async fn send_message(&mut self, session_id: &str, text: &str) -> Result<SendOutcome> {
        let Some(pending) = self.begin_send(session_id, text)? else {
            return Ok(SendOutcome::Ignored);
        };

        tracing::info!("Sending prompt for session {}", pending.session_id);
        let client = Arc::clone(&self.client);
        let result = client.ai_chat(&pending.prompt).await;
        Ok(self.complete_send(pending, result))
    }
}
