use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use puter_demo::chat::{ChatSessionManager, SessionStore};
use puter_demo::client::{FakeCapabilityClient, HttpCapabilityClient, ScriptedPickerPrompt};
use puter_demo::config::{ChatConfig, ClientConfig};
use puter_demo::storage::SledStore;

#[allow(dead_code)]
pub fn create_temp_store() -> (Arc<SledStore>, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let store = SledStore::open(tmp.path().join("sessions")).expect("failed to open sled store");
    (Arc::new(store), tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Session manager over a sled store at `path`
#[allow(dead_code)]
pub fn manager_at(path: &std::path::Path, client: Arc<FakeCapabilityClient>) -> ChatSessionManager {
    let store = SledStore::open(path).expect("failed to open sled store");
    ChatSessionManager::new(
        client,
        SessionStore::new(Arc::new(store), "puter-chat-sessions"),
        ChatConfig::default(),
    )
}

/// HTTP client pointed at a mock server
#[allow(dead_code)]
pub fn http_client(base_url: &str, picker: ScriptedPickerPrompt) -> HttpCapabilityClient {
    let config = ClientConfig {
        api_base: base_url.to_string(),
        auth_token: Some("test-token".to_string()),
        timeout_seconds: 5,
        ..ClientConfig::default()
    };
    HttpCapabilityClient::new(&config, Arc::new(picker)).expect("valid client config")
}
