//! Configuration management for puter-demo
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{DemoError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for puter-demo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Capability client configuration (HTTP or offline)
    pub client: ClientConfig,
    /// Chat session persistence
    #[serde(default)]
    pub storage: StorageConfig,
    /// Chat session defaults
    #[serde(default)]
    pub chat: ChatConfig,
    /// Per-panel settings
    #[serde(default)]
    pub panels: PanelsConfig,
}

/// Capability client configuration
///
/// Selects the client implementation and the endpoint it talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Client implementation: "http" or "offline"
    #[serde(rename = "type", default = "default_client_type")]
    pub client_type: String,

    /// Base URL of the Puter API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Bearer token used for every API call
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_client_type() -> String {
    "http".to_string()
}

fn default_api_base() -> String {
    "https://api.puter.com".to_string()
}

fn default_timeout() -> u64 {
    60
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client_type: default_client_type(),
            api_base: default_api_base(),
            auth_token: None,
            timeout_seconds: default_timeout(),
        }
    }
}

/// Session store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of the sled database; the platform data dir when unset
    #[serde(default)]
    pub path: Option<String>,

    /// Key the serialized session collection is stored under
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_key() -> String {
    "puter-chat-sessions".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            key: default_storage_key(),
        }
    }
}

/// Chat session defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Title given to new and cleared sessions
    #[serde(default = "default_title")]
    pub default_title: String,

    /// Assistant greeting seeded into new and cleared sessions
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,

    /// Characters of the first user message kept in a derived title
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,
}

fn default_title() -> String {
    "New conversation".to_string()
}

fn default_welcome_message() -> String {
    "Hi! I'm Puter AI. Ask me anything to get started.".to_string()
}

fn default_title_max_chars() -> usize {
    30
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_title: default_title(),
            welcome_message: default_welcome_message(),
            title_max_chars: default_title_max_chars(),
        }
    }
}

/// Settings for the individual panels
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PanelsConfig {
    /// KV panel
    #[serde(default)]
    pub kv: KvPanelConfig,
    /// File system panel
    #[serde(default)]
    pub fs: FsPanelConfig,
    /// File picker panel
    #[serde(default)]
    pub picker: PickerPanelConfig,
}

/// KV panel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KvPanelConfig {
    /// Key of the demo counter
    #[serde(default = "default_counter_key")]
    pub counter_key: String,
}

fn default_counter_key() -> String {
    "testCounter".to_string()
}

impl Default for KvPanelConfig {
    fn default() -> Self {
        Self {
            counter_key: default_counter_key(),
        }
    }
}

/// File system panel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsPanelConfig {
    /// App data folder the demo file is placed in, when known
    #[serde(default)]
    pub app_data_path: Option<String>,

    /// File name of the demo file
    #[serde(default = "default_demo_file_name")]
    pub demo_file_name: String,
}

fn default_demo_file_name() -> String {
    "puterjs-demo.txt".to_string()
}

impl Default for FsPanelConfig {
    fn default() -> Self {
        Self {
            app_data_path: None,
            demo_file_name: default_demo_file_name(),
        }
    }
}

/// File picker panel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerPanelConfig {
    /// Directory the picker opens in
    #[serde(default = "default_start_dir")]
    pub start_dir: String,
}

fn default_start_dir() -> String {
    "~".to_string()
}

impl Default for PickerPanelConfig {
    fn default() -> Self {
        Self {
            start_dir: default_start_dir(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default_config()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn default_config() -> Self {
        Self {
            client: ClientConfig::default(),
            storage: StorageConfig::default(),
            chat: ChatConfig::default(),
            panels: PanelsConfig::default(),
        }
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DemoError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| DemoError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(client_type) = std::env::var("PUTER_DEMO_CLIENT") {
            self.client.client_type = client_type;
        }

        if let Ok(api_base) = std::env::var("PUTER_DEMO_API_BASE") {
            self.client.api_base = api_base;
        }

        if let Ok(token) = std::env::var("PUTER_DEMO_AUTH_TOKEN") {
            if !token.trim().is_empty() {
                self.client.auth_token = Some(token);
            }
        }

        if let Ok(timeout) = std::env::var("PUTER_DEMO_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.client.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid PUTER_DEMO_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(store_path) = std::env::var("PUTER_DEMO_STORE_PATH") {
            self.storage.path = Some(store_path);
        }

        if let Ok(app_data_path) = std::env::var("PUTER_DEMO_APP_DATA_PATH") {
            self.panels.fs.app_data_path = Some(app_data_path);
        }

        if let Ok(key) = std::env::var("PUTER_DEMO_KV_KEY") {
            self.panels.kv.counter_key = key;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if cli.offline {
            tracing::debug!("Offline client requested on the command line");
            self.client.client_type = "offline".to_string();
        }

        if let Some(store_path) = &cli.store_path {
            tracing::info!("Using session store override from CLI: {}", store_path);
            self.storage.path = Some(store_path.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `DemoError::Config` naming the first invalid field
    pub fn validate(&self) -> Result<()> {
        let valid_clients = ["http", "offline"];
        if !valid_clients.contains(&self.client.client_type.as_str()) {
            return Err(DemoError::Config(format!(
                "Invalid client type: {}. Must be one of: {}",
                self.client.client_type,
                valid_clients.join(", ")
            ))
            .into());
        }

        let api_base = url::Url::parse(&self.client.api_base).map_err(|e| {
            DemoError::Config(format!(
                "client.api_base is not a valid URL ({}): {}",
                self.client.api_base, e
            ))
        })?;
        if api_base.scheme() != "http" && api_base.scheme() != "https" {
            return Err(DemoError::Config(format!(
                "client.api_base must use http or https, got {}",
                api_base.scheme()
            ))
            .into());
        }

        if self.client.timeout_seconds == 0 {
            return Err(DemoError::Config(
                "client.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.storage.key.trim().is_empty() {
            return Err(DemoError::Config("storage.key cannot be empty".to_string()).into());
        }

        if self.chat.default_title.trim().is_empty() {
            return Err(
                DemoError::Config("chat.default_title cannot be empty".to_string()).into(),
            );
        }

        if self.chat.title_max_chars == 0 {
            return Err(DemoError::Config(
                "chat.title_max_chars must be greater than 0".to_string(),
            )
            .into());
        }

        if self.panels.kv.counter_key.trim().is_empty() {
            return Err(
                DemoError::Config("panels.kv.counter_key cannot be empty".to_string()).into(),
            );
        }

        if self.panels.fs.demo_file_name.trim().is_empty() {
            return Err(DemoError::Config(
                "panels.fs.demo_file_name cannot be empty".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
