//! Test utilities for puter-demo
//!
//! This module provides common test helpers: temporary directories, an
//! offline configuration, session managers over in-memory storage, and
//! assertion helpers.

use crate::chat::{ChatSessionManager, SessionStore};
use crate::client::FakeCapabilityClient;
use crate::config::Config;
use crate::error::Result;
use crate::storage::{DurableStore, MemoryStore};
use std::sync::Arc;
use tempfile::TempDir;

/// Create a temporary directory for testing
///
/// # Returns
///
/// Returns a TempDir that will be cleaned up when dropped
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T: std::fmt::Debug>(result: Result<T>, expected: &str) {
    match result {
        Ok(value) => panic!("Expected error containing '{}', got Ok({:?})", expected, value),
        Err(e) => {
            let message = format!("{:#}", e);
            assert!(
                message.contains(expected),
                "Error '{}' does not contain '{}'",
                message,
                expected
            );
        }
    }
}

/// Configuration for tests: offline client, default everything else
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.client.client_type = "offline".to_string();
    config
}

/// YAML text of a complete configuration file
pub fn test_config_yaml() -> String {
    r#"
client:
  type: offline
  api_base: http://localhost:4100
  timeout_seconds: 5
storage:
  key: test-sessions
chat:
  default_title: Untitled
  title_max_chars: 12
panels:
  kv:
    counter_key: hits
  fs:
    app_data_path: /alice/AppData/demo
"#
    .to_string()
}

/// Session manager over a fresh in-memory store
pub fn manager_with(client: Arc<FakeCapabilityClient>) -> ChatSessionManager {
    manager_over(client, Arc::new(MemoryStore::new()))
}

/// Session manager over the given store
pub fn manager_over(
    client: Arc<FakeCapabilityClient>,
    store: Arc<dyn DurableStore>,
) -> ChatSessionManager {
    ChatSessionManager::new(
        client,
        SessionStore::new(store, "puter-chat-sessions"),
        test_config().chat,
    )
}
