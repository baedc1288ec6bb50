//! AI chat panel
//!
//! Binds the [`ChatSessionManager`] to the shell: sends prompts to the
//! active session, reports progress on a status line and renders the
//! conversation.

use super::{status_line, PanelView, IDLE_STATUS};
use crate::chat::{ChatMessage, ChatSessionManager, Role, SendOutcome};
use crate::error::{error_message, Result};
use colored::Colorize;

/// Status while a prompt is in flight
pub const SENDING_STATUS: &str = "Sending to Puter AI...";

/// Status after a reply arrived
pub const RECEIVED_STATUS: &str = "Reply received";

/// Chat panel over the session manager
pub struct AiPanel {
    manager: ChatSessionManager,
    status: String,
}

impl AiPanel {
    /// Create an idle panel over `manager`
    pub fn new(manager: ChatSessionManager) -> Self {
        Self {
            manager,
            status: IDLE_STATUS.to_string(),
        }
    }

    /// Current status line
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Underlying session manager
    pub fn manager(&self) -> &ChatSessionManager {
        &self.manager
    }

    /// Mutable access to the session manager
    pub fn manager_mut(&mut self) -> &mut ChatSessionManager {
        &mut self.manager
    }

    /// Send a prompt to the active session
    ///
    /// Blank prompts are ignored; failures end up in the conversation and
    /// on the status line.
    pub async fn send(&mut self, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Ignored;
        }

        let id = self.manager.active_id().to_string();
        self.status = SENDING_STATUS.to_string();
        let outcome = match self.manager.send_message(&id, text).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.status = format!("Error: {}", error_message(&e));
                return SendOutcome::Ignored;
            }
        };

        self.status = match &outcome {
            SendOutcome::Replied { .. } => RECEIVED_STATUS.to_string(),
            SendOutcome::Failed { error, .. } => format!("Error: {}", error),
            SendOutcome::Ignored | SendOutcome::Discarded => IDLE_STATUS.to_string(),
        };
        outcome
    }

    /// Start a new conversation
    pub fn new_session(&mut self) -> String {
        self.status = IDLE_STATUS.to_string();
        self.manager.create_session()
    }

    /// Switch to another conversation
    pub fn select(&mut self, id: &str) -> Result<()> {
        self.manager.select_session(id)?;
        self.status = IDLE_STATUS.to_string();
        Ok(())
    }

    /// Delete a conversation; the caller confirms with the user first
    pub fn delete(&mut self, id: &str) -> Result<()> {
        self.manager.delete_session(id)
    }

    /// Reset the active conversation
    pub fn clear_active(&mut self) -> Result<()> {
        let id = self.manager.active_id().to_string();
        self.manager.clear_session(&id)?;
        self.status = IDLE_STATUS.to_string();
        Ok(())
    }

    /// Drop every conversation
    pub fn clear_all(&mut self) -> String {
        self.status = IDLE_STATUS.to_string();
        self.manager.clear_all()
    }
}

/// One conversation line, coloured by role
pub fn render_message(message: &ChatMessage) -> String {
    match message.role {
        Role::User => format!("{} {}", "You:".cyan().bold(), message.content),
        Role::Assistant if message.pending => {
            format!("{} {}", "Puter AI:".green().bold(), message.content.dimmed())
        }
        Role::Assistant if message.is_error() => {
            format!("{} {}", "Puter AI:".green().bold(), message.content.red())
        }
        Role::Assistant => format!("{} {}", "Puter AI:".green().bold(), message.content),
    }
}

impl PanelView for AiPanel {
    fn title(&self) -> &'static str {
        "Puter AI Chat"
    }

    fn render(&self) -> String {
        let session = self.manager.active_session();
        let mut out = format!(
            "{} {} [{}], {} in total\n",
            "Conversation:".bold(),
            session.title,
            short_id(&session.id),
            self.manager.sessions().len()
        );
        for message in &session.messages {
            out.push_str(&render_message(message));
            out.push('\n');
        }
        out.push_str(&status_line(&self.status));
        out.push('\n');
        out
    }

    fn actions(&self) -> &'static [(&'static str, &'static str)] {
        &[("<text>", "Send a prompt to the active conversation")]
    }
}

/// Leading characters of an id, enough to pick a session by prefix
pub fn short_id(id: &str) -> &str {
    id.get(..12).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::SessionStore;
    use crate::client::fake::FakeOp;
    use crate::client::FakeCapabilityClient;
    use crate::config::ChatConfig;
    use crate::storage::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    fn panel(client: &Arc<FakeCapabilityClient>) -> AiPanel {
        let store = SessionStore::new(Arc::new(MemoryStore::new()), "sessions");
        AiPanel::new(ChatSessionManager::new(
            client.clone(),
            store,
            ChatConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_send_reply_status() {
        let client = Arc::new(FakeCapabilityClient::new());
        client.push_chat_reply(json!({"message": {"content": "Hi there"}}));
        let mut panel = panel(&client);
        assert_eq!(panel.status(), "Idle");

        let outcome = panel.send("Hello").await;
        assert!(matches!(outcome, SendOutcome::Replied { .. }));
        assert_eq!(panel.status(), "Reply received");
        assert_eq!(panel.manager().active_session().messages.len(), 3);
    }

    #[tokio::test]
    async fn test_send_error_status() {
        let client = Arc::new(FakeCapabilityClient::new());
        client.push_chat_error("model unavailable");
        let mut panel = panel(&client);

        panel.send("Hello").await;
        assert_eq!(panel.status(), "Error: model unavailable");
        let last = panel.manager().active_session().last_message().unwrap();
        assert_eq!(last.content, "Error: model unavailable");
    }

    #[tokio::test]
    async fn test_blank_send_keeps_status() {
        let client = Arc::new(FakeCapabilityClient::new());
        let mut panel = panel(&client);
        assert_eq!(panel.send("   ").await, SendOutcome::Ignored);
        assert_eq!(panel.status(), "Idle");
        assert_eq!(client.calls(FakeOp::AiChat), 0);
    }

    #[tokio::test]
    async fn test_session_actions() {
        let client = Arc::new(FakeCapabilityClient::new());
        let mut panel = panel(&client);
        let first = panel.manager().active_id().to_string();
        let second = panel.new_session();
        assert_eq!(panel.manager().active_id(), second);

        panel.select(&first).unwrap();
        assert_eq!(panel.manager().active_id(), first);

        panel.delete(&first).unwrap();
        assert_eq!(panel.manager().active_id(), second);
        assert!(panel.delete(&second).is_err());

        panel.clear_all();
        assert_eq!(panel.manager().sessions().len(), 1);
    }

    #[test]
    fn test_render_message_labels() {
        colored::control::set_override(false);
        assert_eq!(render_message(&ChatMessage::user("hi")), "You: hi");
        assert_eq!(
            render_message(&ChatMessage::error_reply("boom")),
            "Puter AI: Error: boom"
        );
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("01HZX3ABCDEFGHJK"), "01HZX3ABCDEF");
        assert_eq!(short_id("abc"), "abc");
    }
}
