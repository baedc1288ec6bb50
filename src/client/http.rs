//! HTTP implementation of the capability client
//!
//! Talks to the Puter REST API. Key-value and AI chat calls go through the
//! driver-call endpoint (`POST /drivers/call`); files, OS metadata and the
//! picker listing use their dedicated endpoints. Every request carries the
//! configured bearer token.

use crate::client::{
    value_as_i64, CapabilityClient, FileBlob, FileHandle, PickerOptions, PickerPrompt,
    PickerSelection,
};
use crate::config::ClientConfig;
use crate::error::{DemoError, Result};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

const KV_INTERFACE: &str = "puter-kvstore";
const CHAT_INTERFACE: &str = "puter-chat-completion";

/// Puter API client
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use puter_demo::client::{CapabilityClient, HttpCapabilityClient, TerminalPickerPrompt};
/// use puter_demo::config::ClientConfig;
///
/// # async fn example() -> puter_demo::error::Result<()> {
/// let config = ClientConfig {
///     auth_token: Some("token".to_string()),
///     ..ClientConfig::default()
/// };
/// let client = HttpCapabilityClient::new(&config, Arc::new(TerminalPickerPrompt))?;
/// let user = client.os_user().await?;
/// println!("{}", user);
/// # Ok(())
/// # }
/// ```
pub struct HttpCapabilityClient {
    client: Client,
    api_base: String,
    auth_token: String,
    picker: Arc<dyn PickerPrompt>,
}

/// Body of a driver call
#[derive(Debug, Serialize)]
struct DriverCall<'a> {
    interface: &'a str,
    method: &'a str,
    args: Value,
}

/// Envelope wrapped around every driver result
#[derive(Debug, Deserialize)]
struct DriverEnvelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// Body of a directory listing request
#[derive(Debug, Serialize)]
struct ReaddirRequest<'a> {
    path: &'a str,
}

impl HttpCapabilityClient {
    /// Create a new HTTP client
    ///
    /// # Errors
    ///
    /// Returns `DemoError::MissingCredentials` without an auth token,
    /// `DemoError::Config` for an unparseable base URL, or an HTTP error if
    /// the underlying client cannot be built.
    pub fn new(config: &ClientConfig, picker: Arc<dyn PickerPrompt>) -> Result<Self> {
        let auth_token = config
            .auth_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                DemoError::MissingCredentials(
                    "set client.auth_token or PUTER_DEMO_AUTH_TOKEN".to_string(),
                )
            })?;

        url::Url::parse(&config.api_base).map_err(|e| {
            DemoError::Config(format!("Invalid API base {}: {}", config.api_base, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("puter-demo/0.1.0")
            .build()
            .map_err(|e| DemoError::Client(format!("Failed to build HTTP client: {}", e)))?;

        tracing::debug!("Puter HTTP client ready for {}", config.api_base);

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            auth_token,
            picker,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.api_base, endpoint)
    }

    async fn send(&self, endpoint: &str, request: RequestBuilder) -> Result<Response> {
        let response = request
            .bearer_auth(&self.auth_token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Request to {} failed: {}", endpoint, e);
                DemoError::Client(format!("Request to {} failed: {}", endpoint, e))
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message_from_body(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });
        tracing::error!("Puter API returned {} for {}: {}", status, endpoint, message);

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(DemoError::Authentication(message).into());
        }
        Err(DemoError::Client(format!("Puter API returned {}: {}", status.as_u16(), message)).into())
    }

    async fn get_json(&self, endpoint: &str) -> Result<Value> {
        let response = self.send(endpoint, self.client.get(self.url(endpoint))).await?;
        response.json().await.map_err(|e| {
            DemoError::Client(format!("Failed to parse {} response: {}", endpoint, e)).into()
        })
    }

    /// Invoke a driver method and unwrap its result envelope
    async fn driver_call(&self, interface: &str, method: &str, args: Value) -> Result<Value> {
        tracing::debug!("Driver call {}::{}", interface, method);

        let body = DriverCall {
            interface,
            method,
            args,
        };
        let response = self
            .send(
                "drivers/call",
                self.client.post(self.url("drivers/call")).json(&body),
            )
            .await?;

        let envelope: DriverEnvelope = response.json().await.map_err(|e| {
            DemoError::Client(format!(
                "Failed to parse {}::{} response: {}",
                interface, method, e
            ))
        })?;

        if envelope.success == Some(false) || envelope.error.is_some() {
            let message = envelope
                .error
                .as_ref()
                .and_then(error_message_from_value)
                .unwrap_or_else(|| format!("{}::{} failed", interface, method));
            return Err(DemoError::Client(message).into());
        }

        Ok(envelope.result.unwrap_or(Value::Null))
    }

    async fn kv_step(&self, method: &str, key: &str, amount: i64) -> Result<i64> {
        let result = self
            .driver_call(KV_INTERFACE, method, json!({ "key": key, "amount": amount }))
            .await?;
        value_as_i64(&result).ok_or_else(|| {
            DemoError::Client(format!("Unexpected {} result for {}: {}", method, key, result))
                .into()
        })
    }
}

#[async_trait]
impl CapabilityClient for HttpCapabilityClient {
    async fn kv_get(&self, key: &str) -> Result<Option<Value>> {
        let result = self
            .driver_call(KV_INTERFACE, "get", json!({ "key": key }))
            .await?;
        Ok(if result.is_null() { None } else { Some(result) })
    }

    async fn kv_incr(&self, key: &str, amount: i64) -> Result<i64> {
        self.kv_step("incr", key, amount).await
    }

    async fn kv_decr(&self, key: &str, amount: i64) -> Result<i64> {
        self.kv_step("decr", key, amount).await
    }

    async fn fs_write(&self, path: &str, text: &str) -> Result<()> {
        let request = self
            .client
            .post(self.url("write"))
            .query(&[("path", path), ("overwrite", "true")])
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(text.to_string());
        self.send("write", request).await?;
        tracing::debug!("Wrote {} bytes to {}", text.len(), path);
        Ok(())
    }

    async fn fs_read(&self, path: &str) -> Result<FileBlob> {
        let request = self.client.get(self.url("read")).query(&[("file", path)]);
        let response = self.send("read", request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DemoError::Client(format!("Failed to read {}: {}", path, e)))?;
        Ok(FileBlob::new(bytes.to_vec()))
    }

    async fn os_user(&self) -> Result<Value> {
        self.get_json("whoami").await
    }

    async fn os_version(&self) -> Result<Value> {
        self.get_json("version").await
    }

    async fn ai_chat(&self, prompt: &str) -> Result<Value> {
        self.driver_call(
            CHAT_INTERFACE,
            "complete",
            json!({ "messages": [{ "content": prompt }] }),
        )
        .await
    }

    async fn show_open_file_picker(&self, options: &PickerOptions) -> Result<PickerSelection> {
        let request = self.client.post(self.url("readdir")).json(&ReaddirRequest {
            path: &options.start_dir,
        });
        let response = self.send("readdir", request).await?;
        let entries: Vec<FileHandle> = response.json().await.map_err(|e| {
            DemoError::Client(format!("Failed to parse readdir response: {}", e))
        })?;

        let files: Vec<FileHandle> = entries.into_iter().filter(|e| !e.is_dir).collect();
        tracing::debug!("Picker offering {} files from {}", files.len(), options.start_dir);

        let chosen = self.picker.choose(&files, options.multiple)?;
        let handles = chosen
            .into_iter()
            .filter_map(|i| files.get(i).cloned())
            .collect();
        Ok(PickerSelection::from_handles(handles, options.multiple))
    }
}

fn error_message_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| map.get("error").and_then(error_message_from_value)),
        _ => None,
    }
}

fn error_message_from_body(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(value) => error_message_from_value(&value).or_else(|| Some(body.trim().to_string())),
        Err(_) => Some(body.trim().to_string()),
    }
}
