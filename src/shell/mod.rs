//! Tabbed interactive shell
//!
//! [`TabShell`] owns one panel per [`Tab`], tracks which one is active and
//! dispatches parsed [`ShellCommand`]s. It returns text instead of printing
//! so the line loop in `commands` stays thin.

pub mod commands;
pub mod tabs;

pub use commands::{help_text, parse_shell_command, CommandError, ShellCommand};
pub use tabs::Tab;

use crate::chat::ChatSessionManager;
use crate::client::CapabilityClient;
use crate::config::PanelsConfig;
use crate::error::error_message;
use crate::panels::ai::short_id;
use crate::panels::{AiPanel, FsPanel, KvPanel, OsPanel, PanelView, UiPanel};
use colored::Colorize;
use std::sync::Arc;

/// What the line loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellFlow {
    /// Keep reading; print the text if any
    Continue(Option<String>),
    /// Leave the shell
    Exit,
}

impl ShellFlow {
    fn say(text: impl Into<String>) -> Self {
        Self::Continue(Some(text.into()))
    }
}

/// The tabbed shell
pub struct TabShell {
    active: Tab,
    kv: KvPanel,
    fs: FsPanel,
    os: OsPanel,
    ai: AiPanel,
    ui: UiPanel,
}

impl TabShell {
    /// Build every panel over one client and session manager
    pub fn new(
        client: Arc<dyn CapabilityClient>,
        manager: ChatSessionManager,
        panels: &PanelsConfig,
    ) -> Self {
        Self {
            active: Tab::default(),
            kv: KvPanel::new(Arc::clone(&client), &panels.kv),
            fs: FsPanel::new(Arc::clone(&client), &panels.fs),
            os: OsPanel::new(Arc::clone(&client)),
            ui: UiPanel::new(client, &panels.picker),
            ai: AiPanel::new(manager),
        }
    }

    /// Currently active tab
    pub fn active_tab(&self) -> Tab {
        self.active
    }

    /// KV store panel
    pub fn kv(&self) -> &KvPanel {
        &self.kv
    }

    /// File system panel
    pub fn fs(&self) -> &FsPanel {
        &self.fs
    }

    /// OS info panel
    pub fn os(&self) -> &OsPanel {
        &self.os
    }

    /// AI chat panel, including its session manager
    pub fn ai(&self) -> &AiPanel {
        &self.ai
    }

    /// File picker panel
    pub fn ui(&self) -> &UiPanel {
        &self.ui
    }

    /// Parse a line typed on the active tab
    ///
    /// On the AI tab bare text is always a prompt, so only `/exit` and
    /// `/quit` leave from there.
    pub fn parse_input(&self, line: &str) -> Result<ShellCommand, CommandError> {
        let command = parse_shell_command(line)?;
        let bare = !line.trim_start().starts_with('/');
        if self.active == Tab::Ai && bare && command == ShellCommand::Exit {
            return Ok(ShellCommand::Action(line.trim().to_string()));
        }
        Ok(command)
    }

    /// Panel of the active tab
    pub fn panel(&self) -> &dyn PanelView {
        match self.active {
            Tab::Kv => &self.kv,
            Tab::Fs => &self.fs,
            Tab::Os => &self.os,
            Tab::Ai => &self.ai,
            Tab::Ui => &self.ui,
        }
    }

    /// Activate `tab` and mount its panel
    ///
    /// Mounting the KV tab loads the counter if it has not been loaded yet.
    pub async fn switch_tab(&mut self, tab: Tab) {
        tracing::debug!("Switching to tab {}", tab.id());
        self.active = tab;
        if tab == Tab::Kv && !self.kv.is_loaded() {
            self.kv.load().await;
        }
    }

    /// Tab bar, panel heading and panel body
    pub fn render(&self) -> String {
        let panel = self.panel();
        format!(
            "{}\n\n{}\n{}\n\n{}",
            self.active.tab_bar(),
            panel.title().bold().underline(),
            self.active.description().dimmed(),
            panel.render()
        )
    }

    /// Prompt shown by the line editor
    pub fn prompt(&self) -> String {
        format!("[{}] >> ", self.active.id())
    }

    /// Run one command
    ///
    /// `confirm` is asked before destructive session commands; answering
    /// false leaves everything unchanged.
    pub async fn execute(
        &mut self,
        command: ShellCommand,
        confirm: &mut dyn FnMut(&str) -> bool,
    ) -> ShellFlow {
        match command {
            ShellCommand::Empty => ShellFlow::Continue(None),
            ShellCommand::Exit => ShellFlow::Exit,
            ShellCommand::Help => ShellFlow::say(help_text()),
            ShellCommand::ListTabs => ShellFlow::say(self.tab_list()),
            ShellCommand::SwitchTab(tab) => {
                self.switch_tab(tab).await;
                ShellFlow::say(self.render())
            }
            ShellCommand::NewSession => {
                let id = self.ai.new_session();
                self.active = Tab::Ai;
                ShellFlow::say(format!("Started conversation {}\n\n{}", short_id(&id), self.render()))
            }
            ShellCommand::ListSessions => ShellFlow::say(self.session_list()),
            ShellCommand::SwitchSession(id) => match self.ai.select(&id) {
                Ok(()) => {
                    self.active = Tab::Ai;
                    ShellFlow::say(self.render())
                }
                Err(e) => ShellFlow::say(error_message(&e).yellow().to_string()),
            },
            ShellCommand::DeleteSession(id) => self.delete_session(&id, confirm),
            ShellCommand::ClearSession => match self.ai.clear_active() {
                Ok(()) => {
                    self.active = Tab::Ai;
                    ShellFlow::say(self.render())
                }
                Err(e) => ShellFlow::say(error_message(&e).yellow().to_string()),
            },
            ShellCommand::ClearAll => {
                if !confirm("Delete every conversation?") {
                    return ShellFlow::say("Kept all conversations");
                }
                self.ai.clear_all();
                self.active = Tab::Ai;
                ShellFlow::say(self.render())
            }
            ShellCommand::Action(input) => self.perform(&input).await,
        }
    }

    fn delete_session(&mut self, id: &str, confirm: &mut dyn FnMut(&str) -> bool) -> ShellFlow {
        let resolved = match self.ai.manager().resolve_id(id) {
            Ok(resolved) => resolved,
            Err(e) => return ShellFlow::say(error_message(&e).yellow().to_string()),
        };
        let title = self
            .ai
            .manager()
            .session(&resolved)
            .map(|s| s.title.clone())
            .unwrap_or_default();

        if !confirm(&format!("Delete conversation \"{}\"?", title)) {
            return ShellFlow::say("Kept conversation");
        }

        match self.ai.delete(&resolved) {
            Ok(()) => ShellFlow::say(format!("Deleted conversation \"{}\"", title)),
            Err(e) => {
                tracing::warn!("Delete of {} rejected: {:#}", resolved, e);
                ShellFlow::say(error_message(&e).yellow().to_string())
            }
        }
    }

    /// Hand bare input to the active panel
    pub async fn perform(&mut self, input: &str) -> ShellFlow {
        let word = input.trim().to_lowercase();
        match (self.active, word.as_str()) {
            (Tab::Kv, "load") => self.kv.load().await,
            (Tab::Kv, "+" | "inc" | "incr") => self.kv.increment().await,
            (Tab::Kv, "-" | "dec" | "decr") => self.kv.decrement().await,
            (Tab::Fs, "write") => self.fs.write().await,
            (Tab::Fs, "read") => self.fs.read().await,
            (Tab::Os, "user") => self.os.fetch_user().await,
            (Tab::Os, "version") => self.os.fetch_version().await,
            (Tab::Ui, "pick" | "open") => self.ui.open_file().await,
            (Tab::Ai, _) => {
                self.ai.send(input).await;
            }
            (tab, _) => {
                let known: Vec<&str> = self.panel().actions().iter().map(|(w, _)| *w).collect();
                return ShellFlow::say(format!(
                    "Unknown action for {}: {} (try {})",
                    tab.label(),
                    input.trim(),
                    known.join(", ")
                ));
            }
        }
        ShellFlow::say(self.panel().render())
    }

    fn tab_list(&self) -> String {
        Tab::ALL
            .iter()
            .map(|tab| {
                let marker = if *tab == self.active { "*" } else { " " };
                format!("{} {:<3} {:<12} {}", marker, tab.id(), tab.label(), tab.description())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn session_list(&self) -> String {
        let manager = self.ai.manager();
        let active = manager.active_id();
        manager
            .sessions_by_recent()
            .iter()
            .map(|session| {
                let marker = if session.id == active { "*" } else { " " };
                format!(
                    "{} {}  {:<33} {:>3} msgs  {}",
                    marker,
                    short_id(&session.id),
                    session.title,
                    session.messages.len(),
                    session.updated_at.format("%Y-%m-%d %H:%M")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
