//! KV store panel: a persisted demo counter

use super::{status_line, PanelView};
use crate::client::{value_as_i64, CapabilityClient};
use crate::config::KvPanelConfig;
use crate::error::error_message;
use colored::Colorize;
use std::sync::Arc;

/// Counter text shown until the first load completes
pub const LOADING_TEXT: &str = "loading...";

/// Counter backed by one KV key
///
/// The count is `None` until [`KvPanel::load`] succeeds; increments and
/// decrements are rejected until then. Updates are applied locally first
/// and then replaced by the value the server returns.
pub struct KvPanel {
    client: Arc<dyn CapabilityClient>,
    key: String,
    count: Option<i64>,
    status: String,
}

impl KvPanel {
    /// New panel for the configured counter key
    pub fn new(client: Arc<dyn CapabilityClient>, config: &KvPanelConfig) -> Self {
        Self {
            client,
            key: config.counter_key.clone(),
            count: None,
            status: format!("This counter is stored in Puter KV as {}.", config.counter_key),
        }
    }

    /// KV key of the counter
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Local count, `None` until loaded
    pub fn count(&self) -> Option<i64> {
        self.count
    }

    /// Counter as displayed
    pub fn count_text(&self) -> String {
        self.count
            .map(|n| n.to_string())
            .unwrap_or_else(|| LOADING_TEXT.to_string())
    }

    /// Current status line
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Whether `+` and `-` are enabled
    pub fn is_loaded(&self) -> bool {
        self.count.is_some()
    }

    /// Read the counter; an unset key counts as zero
    pub async fn load(&mut self) {
        match self.client.kv_get(&self.key).await {
            Ok(value) => {
                let count = value.as_ref().and_then(value_as_i64).unwrap_or(0);
                tracing::debug!("Loaded {} = {}", self.key, count);
                self.count = Some(count);
                self.status = "Counter loaded".to_string();
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {:#}", self.key, e);
                self.status = format!("Load failed: {}", error_message(&e));
            }
        }
    }

    /// Add one to the counter
    pub async fn increment(&mut self) {
        self.step(1).await;
    }

    /// Subtract one from the counter
    pub async fn decrement(&mut self) {
        self.step(-1).await;
    }

    async fn step(&mut self, delta: i64) {
        let Some(local) = self.count else {
            self.status = "Counter is still loading".to_string();
            return;
        };
        self.count = Some(local + delta);

        let result = if delta >= 0 {
            self.client.kv_incr(&self.key, delta).await
        } else {
            self.client.kv_decr(&self.key, -delta).await
        };

        match result {
            Ok(server) => {
                self.count = Some(server);
                self.status = format!("Counter is now {}", server);
            }
            Err(e) => {
                tracing::warn!("Failed to update {}: {:#}", self.key, e);
                self.count = self.count.map(|n| n - delta);
                self.status = format!("Update failed: {}", error_message(&e));
            }
        }
    }
}

impl PanelView for KvPanel {
    fn title(&self) -> &'static str {
        "Puter KV Store"
    }

    fn render(&self) -> String {
        let count = if self.is_loaded() {
            self.count_text().bold().to_string()
        } else {
            self.count_text().dimmed().to_string()
        };
        format!("  [-]  {}  [+]\n{}\n", count, status_line(&self.status))
    }

    fn actions(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("load", "Reload the counter"),
            ("+", "Increment the counter"),
            ("-", "Decrement the counter"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeOp;
    use crate::client::FakeCapabilityClient;
    use serde_json::json;

    fn panel(client: &Arc<FakeCapabilityClient>) -> KvPanel {
        KvPanel::new(client.clone(), &KvPanelConfig::default())
    }

    #[tokio::test]
    async fn test_loading_until_loaded() {
        let client = Arc::new(FakeCapabilityClient::new());
        let mut panel = panel(&client);
        assert_eq!(panel.count_text(), "loading...");

        panel.increment().await;
        assert_eq!(panel.count(), None);
        assert_eq!(client.calls(FakeOp::KvUpdate), 0);

        panel.load().await;
        assert_eq!(panel.count(), Some(0));
    }

    #[tokio::test]
    async fn test_load_existing_value() {
        let client = Arc::new(FakeCapabilityClient::new());
        client.set_kv("testCounter", json!(41));
        let mut panel = panel(&client);
        panel.load().await;
        assert_eq!(panel.count_text(), "41");
    }

    #[tokio::test]
    async fn test_increment_adopts_server_value() {
        let client = Arc::new(FakeCapabilityClient::new());
        let mut panel = panel(&client);
        panel.load().await;

        // Another writer bumped the counter after our load.
        client.set_kv("testCounter", json!(10));
        panel.increment().await;
        assert_eq!(panel.count(), Some(11));

        panel.decrement().await;
        panel.decrement().await;
        assert_eq!(panel.count(), Some(9));
        assert_eq!(client.kv("testCounter"), Some(json!(9)));
    }

    #[tokio::test]
    async fn test_failed_update_reverts_local_count() {
        let client = Arc::new(FakeCapabilityClient::new());
        let mut panel = panel(&client);
        panel.load().await;
        client.fail(FakeOp::KvUpdate, "quota exceeded");

        panel.increment().await;
        assert_eq!(panel.count(), Some(0));
        assert_eq!(panel.status(), "Update failed: quota exceeded");
    }

    #[tokio::test]
    async fn test_failed_load_keeps_loading() {
        let client = Arc::new(FakeCapabilityClient::new());
        client.fail(FakeOp::KvGet, "offline");
        let mut panel = panel(&client);
        panel.load().await;
        assert!(!panel.is_loaded());
        assert_eq!(panel.status(), "Load failed: offline");
    }
}
