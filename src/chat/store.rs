//! Persistence of the session collection
//!
//! The whole collection is serialized to JSON and kept under one key of a
//! [`DurableStore`]. Absent or unreadable data falls back to a single
//! default session.

use crate::chat::types::{SessionCollection, ERROR_PREFIX};
use crate::config::ChatConfig;
use crate::error::{DemoError, Result};
use crate::storage::DurableStore;
use std::sync::Arc;

/// Text of a reply that never arrived before the previous run ended
const INTERRUPTED_TEXT: &str = "Reply interrupted before it arrived";

/// Serialize a collection to its durable form
pub fn encode(collection: &SessionCollection) -> Result<String> {
    serde_json::to_string(collection)
        .map_err(|e| DemoError::Storage(format!("Failed to serialize sessions: {}", e)).into())
}

/// Parse and repair a durable collection
///
/// Returns `None` when the data is unparseable or holds no sessions. A
/// stale active id is redirected to the most recent session, and pending
/// placeholders left by an interrupted run become error replies.
pub fn decode(raw: &str) -> Option<SessionCollection> {
    let mut collection: SessionCollection = match serde_json::from_str(raw) {
        Ok(collection) => collection,
        Err(e) => {
            tracing::warn!("Stored sessions are unreadable, starting fresh: {}", e);
            return None;
        }
    };

    if collection.sessions.is_empty() {
        tracing::warn!("Stored session list is empty, starting fresh");
        return None;
    }

    if collection.get(&collection.active_session_id).is_none() {
        if let Some(id) = collection.most_recent_id() {
            tracing::debug!("Active session {} missing, selecting {}", collection.active_session_id, id);
            collection.active_session_id = id;
        }
    }

    for session in &mut collection.sessions {
        for message in session.messages.iter_mut().filter(|m| m.pending) {
            message.content = format!("{}{}", ERROR_PREFIX, INTERRUPTED_TEXT);
            message.pending = false;
        }
    }

    Some(collection)
}

/// Loads and saves the session collection under a fixed key
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn DurableStore>,
    key: String,
}

impl SessionStore {
    /// Wrap a durable store
    pub fn new(store: Arc<dyn DurableStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Key the collection is stored under
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored collection, or a fresh default one
    ///
    /// Never fails: read errors are logged and treated as absent data.
    pub fn load(&self, settings: &ChatConfig) -> SessionCollection {
        let raw = match self.store.get(&self.key) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Failed to read stored sessions: {:#}", e);
                None
            }
        };

        match raw.as_deref().and_then(decode) {
            Some(collection) => {
                tracing::debug!("Restored {} chat sessions", collection.sessions.len());
                collection
            }
            None => SessionCollection::with_default(&settings.default_title, &settings.welcome_message),
        }
    }

    /// Write the collection
    pub fn save(&self, collection: &SessionCollection) -> Result<()> {
        let raw = encode(collection)?;
        self.store.set(&self.key, &raw)
    }
}
