//! OS panel: current user and platform version

use super::{callout, format_json, status_line, PanelView, IDLE_STATUS};
use crate::client::CapabilityClient;
use crate::error::error_message;
use serde_json::Value;
use std::sync::Arc;

/// User and version lookups
pub struct OsPanel {
    client: Arc<dyn CapabilityClient>,
    status: String,
    user: Option<Value>,
    version: Option<Value>,
}

impl OsPanel {
    /// Create an idle panel with no records fetched
    pub fn new(client: Arc<dyn CapabilityClient>) -> Self {
        Self {
            client,
            status: IDLE_STATUS.to_string(),
            user: None,
            version: None,
        }
    }

    /// Current status line
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Last user record fetched
    pub fn user(&self) -> Option<&Value> {
        self.user.as_ref()
    }

    /// Last version record fetched
    pub fn version(&self) -> Option<&Value> {
        self.version.as_ref()
    }

    /// Fetch the signed-in user
    pub async fn fetch_user(&mut self) {
        self.status = "Fetching user...".to_string();
        match self.client.os_user().await {
            Ok(user) => {
                self.user = Some(user);
                self.status = "User info loaded".to_string();
            }
            Err(e) => {
                tracing::warn!("User lookup failed: {:#}", e);
                self.status = format!("User lookup failed: {}", error_message(&e));
            }
        }
    }

    /// Fetch the platform version
    pub async fn fetch_version(&mut self) {
        self.status = "Fetching version...".to_string();
        match self.client.os_version().await {
            Ok(version) => {
                self.version = Some(version);
                self.status = "Version loaded".to_string();
            }
            Err(e) => {
                tracing::warn!("Version lookup failed: {:#}", e);
                self.status = format!("Version lookup failed: {}", error_message(&e));
            }
        }
    }
}

impl PanelView for OsPanel {
    fn title(&self) -> &'static str {
        "Puter OS"
    }

    fn render(&self) -> String {
        let mut out = format!("{}\n", status_line(&self.status));
        if let Some(user) = &self.user {
            out.push_str(&callout("User info", &format_json(user)));
        }
        if let Some(version) = &self.version {
            out.push_str(&callout("Version info", &format_json(version)));
        }
        out
    }

    fn actions(&self) -> &'static [(&'static str, &'static str)] {
        &[("user", "Get current user"), ("version", "Get OS version")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeOp;
    use crate::client::FakeCapabilityClient;

    #[tokio::test]
    async fn test_fetch_user_and_version() {
        let client = Arc::new(FakeCapabilityClient::new());
        let mut panel = OsPanel::new(client);
        assert_eq!(panel.status(), "Idle");

        panel.fetch_user().await;
        assert_eq!(panel.status(), "User info loaded");
        assert_eq!(panel.user().unwrap()["username"], "demo");

        panel.fetch_version().await;
        assert_eq!(panel.status(), "Version loaded");
        assert!(panel.version().is_some());
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_record() {
        let client = Arc::new(FakeCapabilityClient::new());
        let mut panel = OsPanel::new(client.clone());
        panel.fetch_user().await;

        client.fail(FakeOp::OsUser, "session expired");
        panel.fetch_user().await;
        assert_eq!(panel.status(), "User lookup failed: session expired");
        assert!(panel.user().is_some());

        client.fail(FakeOp::OsVersion, "offline");
        panel.fetch_version().await;
        assert_eq!(panel.status(), "Version lookup failed: offline");
        assert!(panel.version().is_none());
    }
}
