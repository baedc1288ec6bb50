//! Remote capability client for puter-demo
//!
//! This module defines the [`CapabilityClient`] trait: the request/response
//! contract of the Puter platform (key-value store, file system, OS
//! metadata, AI chat and the file picker), along with the HTTP and
//! in-process implementations.

pub mod fake;
pub mod http;
pub mod picker;
pub mod reply;

pub use fake::FakeCapabilityClient;
pub use http::HttpCapabilityClient;
pub use picker::{PickerPrompt, ScriptedPickerPrompt, TerminalPickerPrompt};
pub use reply::{extract_reply_text, ReplyShape};

use crate::config::ClientConfig;
use crate::error::{DemoError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Raw bytes returned by a file read
///
/// Mirrors a browser `Blob`: the payload is kept as bytes and decoded on
/// demand with [`FileBlob::text`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileBlob {
    bytes: Vec<u8>,
}

impl FileBlob {
    /// Wrap raw bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Raw payload
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode the payload as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// A file entry offered or returned by the picker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    /// File name
    #[serde(default)]
    pub name: Option<String>,
    /// Full path on the platform
    #[serde(default)]
    pub path: Option<String>,
    /// Whether the entry is a directory
    #[serde(default)]
    pub is_dir: bool,
    /// Size in bytes, when known
    #[serde(default)]
    pub size: Option<u64>,
}

impl FileHandle {
    /// Build a handle for a file path, deriving the name from its last segment
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = path
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .map(str::to_string);
        Self {
            name,
            path: Some(path),
            is_dir: false,
            size: None,
        }
    }

    /// Name, else path, else `unknown`
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.path.as_deref().filter(|p| !p.is_empty()))
            .unwrap_or("unknown")
    }
}

/// Options for [`CapabilityClient::show_open_file_picker`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOptions {
    /// Allow more than one file to be selected
    pub multiple: bool,
    /// Directory the picker starts in
    pub start_dir: String,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            multiple: false,
            start_dir: "~".to_string(),
        }
    }
}

/// Result of a file picker interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerSelection {
    /// Exactly one file chosen
    Single(FileHandle),
    /// Several files chosen (multiple mode)
    Multiple(Vec<FileHandle>),
    /// Nothing chosen
    Cancelled,
}

impl PickerSelection {
    /// The single selection, or the first of several
    pub fn first(&self) -> Option<&FileHandle> {
        match self {
            Self::Single(handle) => Some(handle),
            Self::Multiple(handles) => handles.first(),
            Self::Cancelled => None,
        }
    }

    /// Build a selection from chosen handles
    pub fn from_handles(mut handles: Vec<FileHandle>, multiple: bool) -> Self {
        match (handles.len(), multiple) {
            (0, _) => Self::Cancelled,
            (_, true) => Self::Multiple(handles),
            _ => Self::Single(handles.remove(0)),
        }
    }
}

/// Request/response contract of the Puter platform
///
/// Every call is asynchronous and may fail; failures carry a
/// human-readable message.
#[async_trait]
pub trait CapabilityClient: Send + Sync {
    /// Read a key; `None` when the key is unset
    async fn kv_get(&self, key: &str) -> Result<Option<Value>>;

    /// Add `amount` to a numeric key and return the new value
    async fn kv_incr(&self, key: &str, amount: i64) -> Result<i64>;

    /// Subtract `amount` from a numeric key and return the new value
    async fn kv_decr(&self, key: &str, amount: i64) -> Result<i64>;

    /// Write text to a file, replacing its contents
    async fn fs_write(&self, path: &str, text: &str) -> Result<()>;

    /// Read a file
    async fn fs_read(&self, path: &str) -> Result<FileBlob>;

    /// Signed-in user record
    async fn os_user(&self) -> Result<Value>;

    /// Platform version record
    async fn os_version(&self) -> Result<Value>;

    /// Send a prompt to the chat completion service
    ///
    /// The response shape is not guaranteed; normalize it with
    /// [`extract_reply_text`].
    async fn ai_chat(&self, prompt: &str) -> Result<Value>;

    /// Let the user choose one or more files
    async fn show_open_file_picker(&self, options: &PickerOptions) -> Result<PickerSelection>;
}

/// Create the client selected by configuration
///
/// # Errors
///
/// Returns error if the client type is unknown or the HTTP client cannot be
/// built (bad base URL, missing token)
pub fn create_client(
    config: &ClientConfig,
    picker: Arc<dyn PickerPrompt>,
) -> Result<Arc<dyn CapabilityClient>> {
    match config.client_type.as_str() {
        "http" => Ok(Arc::new(HttpCapabilityClient::new(config, picker)?)),
        "offline" => Ok(Arc::new(FakeCapabilityClient::offline())),
        other => Err(DemoError::Config(format!("Unknown client type: {}", other)).into()),
    }
}

/// Coerce a KV value to an integer; the store may hold numbers or strings
pub(crate) fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
