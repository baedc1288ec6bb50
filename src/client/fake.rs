//! In-process capability client
//!
//! [`FakeCapabilityClient`] keeps KV entries and files in memory and
//! answers chat prompts from a script. It backs the `--offline` mode and
//! replaces network I/O in unit and integration tests.
//!
//! # Example
//!
//! ```
//! use puter_demo::client::{CapabilityClient, FakeCapabilityClient};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let client = FakeCapabilityClient::new();
//! client.push_chat_reply(json!({"message": {"content": "Hi there"}}));
//!
//! let reply = client.ai_chat("Hello").await.unwrap();
//! assert_eq!(reply["message"]["content"], "Hi there");
//! assert_eq!(client.chat_prompts(), vec!["Hello".to_string()]);
//! # }
//! ```

use crate::client::{CapabilityClient, FileBlob, FileHandle, PickerOptions, PickerSelection};
use crate::error::{DemoError, Result};

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

/// Capability operations that can be scripted to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakeOp {
    /// `kv_get`
    KvGet,
    /// `kv_incr` and `kv_decr`
    KvUpdate,
    /// `fs_write`
    FsWrite,
    /// `fs_read`
    FsRead,
    /// `os_user`
    OsUser,
    /// `os_version`
    OsVersion,
    /// `ai_chat`
    AiChat,
    /// `show_open_file_picker`
    Picker,
}

#[derive(Debug, Default)]
struct FakeState {
    kv: HashMap<String, Value>,
    files: HashMap<String, Vec<u8>>,
    chat_script: VecDeque<std::result::Result<Value, String>>,
    chat_prompts: Vec<String>,
    failures: HashMap<FakeOp, String>,
    calls: HashMap<FakeOp, usize>,
    user: Value,
    version: Value,
    picker_files: Vec<FileHandle>,
    picker_answer: Vec<usize>,
    echo_when_idle: bool,
}

/// Scriptable in-memory client
#[derive(Debug, Default)]
pub struct FakeCapabilityClient {
    state: Mutex<FakeState>,
}

impl FakeCapabilityClient {
    /// Empty client; chat calls fail unless a reply is scripted
    pub fn new() -> Self {
        let client = Self::default();
        if let Ok(mut state) = client.state.lock() {
            state.user = json!({ "username": "demo", "uuid": "00000000-0000-0000-0000-000000000000" });
            state.version = json!({ "version": "offline", "environment": "local" });
        }
        client
    }

    /// Client preloaded for the offline demo
    ///
    /// Chat prompts are echoed back, and the picker offers one sample file.
    pub fn offline() -> Self {
        let client = Self::new();
        if let Ok(mut state) = client.state.lock() {
            state.echo_when_idle = true;
            state.picker_files = vec![FileHandle::from_path("/demo/Documents/readme.txt")];
            state.picker_answer = vec![0];
        }
        client
    }

    fn lock(&self) -> Result<MutexGuard<'_, FakeState>> {
        self.state
            .lock()
            .map_err(|_| DemoError::Client("Fake client state poisoned".to_string()).into())
    }

    fn enter(&self, op: FakeOp) -> Result<MutexGuard<'_, FakeState>> {
        let mut state = self.lock()?;
        *state.calls.entry(op).or_insert(0) += 1;
        if let Some(message) = state.failures.get(&op) {
            return Err(DemoError::Client(message.clone()).into());
        }
        Ok(state)
    }

    /// Queue a successful chat response
    pub fn push_chat_reply(&self, response: Value) {
        if let Ok(mut state) = self.state.lock() {
            state.chat_script.push_back(Ok(response));
        }
    }

    /// Queue a failed chat call with the given message
    pub fn push_chat_error(&self, message: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.chat_script.push_back(Err(message.into()));
        }
    }

    /// Make every call of `op` fail with `message`
    pub fn fail(&self, op: FakeOp, message: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.failures.insert(op, message.into());
        }
    }

    /// Undo [`FakeCapabilityClient::fail`]
    pub fn recover(&self, op: FakeOp) {
        if let Ok(mut state) = self.state.lock() {
            state.failures.remove(&op);
        }
    }

    /// Seed a KV entry
    pub fn set_kv(&self, key: impl Into<String>, value: Value) {
        if let Ok(mut state) = self.state.lock() {
            state.kv.insert(key.into(), value);
        }
    }

    /// Current KV entry
    pub fn kv(&self, key: &str) -> Option<Value> {
        self.state.lock().ok().and_then(|s| s.kv.get(key).cloned())
    }

    /// Seed a file
    pub fn set_file(&self, path: impl Into<String>, contents: impl Into<Vec<u8>>) {
        if let Ok(mut state) = self.state.lock() {
            state.files.insert(path.into(), contents.into());
        }
    }

    /// Current file contents as text
    pub fn file_text(&self, path: &str) -> Option<String> {
        self.state
            .lock()
            .ok()
            .and_then(|s| s.files.get(path).map(|b| String::from_utf8_lossy(b).into_owned()))
    }

    /// Files the picker offers and the indices it answers with
    pub fn set_picker(&self, files: Vec<FileHandle>, answer: Vec<usize>) {
        if let Ok(mut state) = self.state.lock() {
            state.picker_files = files;
            state.picker_answer = answer;
        }
    }

    /// Prompts received by `ai_chat`, in order
    pub fn chat_prompts(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|s| s.chat_prompts.clone())
            .unwrap_or_default()
    }

    /// Number of calls made to `op`
    pub fn calls(&self, op: FakeOp) -> usize {
        self.state
            .lock()
            .map(|s| s.calls.get(&op).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    fn kv_step(&self, key: &str, delta: i64) -> Result<i64> {
        let mut state = self.enter(FakeOp::KvUpdate)?;
        let current = match state.kv.get(key) {
            None | Some(Value::Null) => 0,
            Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
            Some(other) => {
                return Err(DemoError::Client(format!(
                    "Value of {} is not a number: {}",
                    key, other
                ))
                .into())
            }
        };
        let next = current + delta;
        state.kv.insert(key.to_string(), json!(next));
        Ok(next)
    }
}

#[async_trait]
impl CapabilityClient for FakeCapabilityClient {
    async fn kv_get(&self, key: &str) -> Result<Option<Value>> {
        let state = self.enter(FakeOp::KvGet)?;
        Ok(state.kv.get(key).cloned())
    }

    async fn kv_incr(&self, key: &str, amount: i64) -> Result<i64> {
        self.kv_step(key, amount)
    }

    async fn kv_decr(&self, key: &str, amount: i64) -> Result<i64> {
        self.kv_step(key, -amount)
    }

    async fn fs_write(&self, path: &str, text: &str) -> Result<()> {
        let mut state = self.enter(FakeOp::FsWrite)?;
        state.files.insert(path.to_string(), text.as_bytes().to_vec());
        Ok(())
    }

    async fn fs_read(&self, path: &str) -> Result<FileBlob> {
        let state = self.enter(FakeOp::FsRead)?;
        state
            .files
            .get(path)
            .map(|bytes| FileBlob::new(bytes.clone()))
            .ok_or_else(|| DemoError::Client(format!("No such file: {}", path)).into())
    }

    async fn os_user(&self) -> Result<Value> {
        Ok(self.enter(FakeOp::OsUser)?.user.clone())
    }

    async fn os_version(&self) -> Result<Value> {
        Ok(self.enter(FakeOp::OsVersion)?.version.clone())
    }

    async fn ai_chat(&self, prompt: &str) -> Result<Value> {
        let mut state = self.enter(FakeOp::AiChat)?;
        state.chat_prompts.push(prompt.to_string());
        match state.chat_script.pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(DemoError::Client(message).into()),
            None if state.echo_when_idle => Ok(json!({
                "message": {
                    "role": "assistant",
                    "content": format!("(offline) You said: {}", prompt)
                }
            })),
            None => Err(DemoError::Client("No scripted chat reply".to_string()).into()),
        }
    }

    async fn show_open_file_picker(&self, options: &PickerOptions) -> Result<PickerSelection> {
        let state = self.enter(FakeOp::Picker)?;
        let mut handles: Vec<FileHandle> = state
            .picker_answer
            .iter()
            .filter_map(|i| state.picker_files.get(*i).cloned())
            .collect();
        if !options.multiple {
            handles.truncate(1);
        }
        Ok(PickerSelection::from_handles(handles, options.multiple))
    }
}
