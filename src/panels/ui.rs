//! UI helpers panel: single-file picker

use super::{callout, PanelView};
use crate::client::{CapabilityClient, PickerOptions, PickerSelection};
use crate::config::PickerPanelConfig;
use crate::error::error_message;
use std::sync::Arc;

/// Result text before any picker interaction
pub const NO_ACTIONS_TEXT: &str = "No UI actions yet";

/// Text describing a picker outcome
pub fn describe_selection(selection: &PickerSelection) -> String {
    match selection.first() {
        Some(file) => format!("Selected file: {}", file.display_name()),
        None => "No file selected".to_string(),
    }
}

/// File picker demo
pub struct UiPanel {
    client: Arc<dyn CapabilityClient>,
    start_dir: String,
    last_result: String,
}

impl UiPanel {
    /// New panel opening the picker at the configured start directory
    pub fn new(client: Arc<dyn CapabilityClient>, config: &PickerPanelConfig) -> Self {
        Self {
            client,
            start_dir: config.start_dir.clone(),
            last_result: NO_ACTIONS_TEXT.to_string(),
        }
    }

    /// Text of the last picker outcome
    pub fn last_result(&self) -> &str {
        &self.last_result
    }

    /// Open the picker in single-file mode
    pub async fn open_file(&mut self) {
        let options = PickerOptions {
            multiple: false,
            start_dir: self.start_dir.clone(),
        };
        self.last_result = match self.client.show_open_file_picker(&options).await {
            Ok(selection) => describe_selection(&selection),
            Err(e) => {
                tracing::warn!("File picker failed: {:#}", e);
                format!("File picker failed: {}", error_message(&e))
            }
        };
    }
}

impl PanelView for UiPanel {
    fn title(&self) -> &'static str {
        "Puter UI"
    }

    fn render(&self) -> String {
        callout("Last UI result", &self.last_result)
    }

    fn actions(&self) -> &'static [(&'static str, &'static str)] {
        &[("pick", "Open file picker")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeOp;
    use crate::client::{FakeCapabilityClient, FileHandle};

    fn panel(client: &Arc<FakeCapabilityClient>) -> UiPanel {
        UiPanel::new(client.clone(), &PickerPanelConfig::default())
    }

    #[tokio::test]
    async fn test_initial_text() {
        let client = Arc::new(FakeCapabilityClient::new());
        assert_eq!(panel(&client).last_result(), "No UI actions yet");
    }

    #[tokio::test]
    async fn test_selected_file_by_name() {
        let client = Arc::new(FakeCapabilityClient::new());
        client.set_picker(vec![FileHandle::from_path("/alice/notes.txt")], vec![0]);
        let mut panel = panel(&client);
        panel.open_file().await;
        assert_eq!(panel.last_result(), "Selected file: notes.txt");
    }

    #[tokio::test]
    async fn test_selected_file_falls_back_to_path_then_unknown() {
        let client = Arc::new(FakeCapabilityClient::new());
        let by_path = FileHandle {
            path: Some("/alice/raw".to_string()),
            ..FileHandle::default()
        };
        client.set_picker(vec![by_path, FileHandle::default()], vec![0]);
        let mut panel = panel(&client);
        panel.open_file().await;
        assert_eq!(panel.last_result(), "Selected file: /alice/raw");

        client.set_picker(vec![FileHandle::default()], vec![0]);
        panel.open_file().await;
        assert_eq!(panel.last_result(), "Selected file: unknown");
    }

    #[tokio::test]
    async fn test_cancelled_picker() {
        let client = Arc::new(FakeCapabilityClient::new());
        let mut panel = panel(&client);
        panel.open_file().await;
        assert_eq!(panel.last_result(), "No file selected");
    }

    #[tokio::test]
    async fn test_picker_failure() {
        let client = Arc::new(FakeCapabilityClient::new());
        client.fail(FakeOp::Picker, "aborted");
        let mut panel = panel(&client);
        panel.open_file().await;
        assert_eq!(panel.last_result(), "File picker failed: aborted");
    }

    #[test]
    fn test_describe_multiple_uses_first() {
        let selection = PickerSelection::Multiple(vec![
            FileHandle::from_path("/a.txt"),
            FileHandle::from_path("/b.txt"),
        ]);
        assert_eq!(describe_selection(&selection), "Selected file: a.txt");
    }
}
