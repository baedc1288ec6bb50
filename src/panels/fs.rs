//! File system panel: write and read back a demo file

use super::{callout, status_line, PanelView, IDLE_STATUS};
use crate::client::CapabilityClient;
use crate::config::FsPanelConfig;
use crate::error::error_message;
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;

/// Path of the demo file
///
/// Placed in the app data folder when one is configured, else a bare
/// relative name.
///
/// # Examples
///
/// ```
/// use puter_demo::config::FsPanelConfig;
/// use puter_demo::panels::fs::demo_path;
///
/// let mut config = FsPanelConfig::default();
/// assert_eq!(demo_path(&config), "puterjs-demo.txt");
///
/// config.app_data_path = Some("/alice/AppData/demo/".to_string());
/// assert_eq!(demo_path(&config), "/alice/AppData/demo/puterjs-demo.txt");
/// ```
pub fn demo_path(config: &FsPanelConfig) -> String {
    match config
        .app_data_path
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        Some(dir) => format!("{}/{}", dir.trim_end_matches('/'), config.demo_file_name),
        None => config.demo_file_name.clone(),
    }
}

/// Text written by [`FsPanel::write`]
pub fn sample_text() -> String {
    format!(
        "Hello from Puter.js at {}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

/// Demo file writer/reader
pub struct FsPanel {
    client: Arc<dyn CapabilityClient>,
    path: String,
    status: String,
    contents: String,
}

impl FsPanel {
    /// New panel for the configured demo file
    pub fn new(client: Arc<dyn CapabilityClient>, config: &FsPanelConfig) -> Self {
        Self::with_path(client, demo_path(config))
    }

    /// New panel for an explicit path
    pub fn with_path(client: Arc<dyn CapabilityClient>, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            status: IDLE_STATUS.to_string(),
            contents: String::new(),
        }
    }

    /// Path of the demo file
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Current status line
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Contents of the last successful read
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Write the sample text
    pub async fn write(&mut self) {
        self.status = "Writing sample file...".to_string();
        let text = sample_text();
        match self.client.fs_write(&self.path, &text).await {
            Ok(()) => {
                tracing::debug!("Wrote {} bytes to {}", text.len(), self.path);
                self.status = format!("Wrote sample text to {}", self.path);
            }
            Err(e) => {
                tracing::warn!("Write of {} failed: {:#}", self.path, e);
                self.status = format!("Write failed: {}", error_message(&e));
            }
        }
    }

    /// Read the file back
    pub async fn read(&mut self) {
        self.status = "Reading file...".to_string();
        match self.client.fs_read(&self.path).await {
            Ok(blob) => {
                self.contents = blob.text();
                self.status = "Read succeeded".to_string();
            }
            Err(e) => {
                tracing::warn!("Read of {} failed: {:#}", self.path, e);
                self.status = format!("Read failed: {}", error_message(&e));
            }
        }
    }
}

impl PanelView for FsPanel {
    fn title(&self) -> &'static str {
        "Puter File System"
    }

    fn render(&self) -> String {
        let mut out = format!("Sample file: {}\n{}\n", self.path, status_line(&self.status));
        if !self.contents.is_empty() {
            out.push_str(&callout("File contents", &self.contents));
        }
        out
    }

    fn actions(&self) -> &'static [(&'static str, &'static str)] {
        &[("write", "Write the sample file"), ("read", "Read the sample file")]
    }
}
