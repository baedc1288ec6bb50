/*!
Command handlers for the CLI

This module provides the handlers invoked by the CLI entrypoint:

- `shell`    : the tabbed interactive shell
- `actions`  : one-shot panel actions (`kv`, `fs`, `os`, `chat`, `pick`)
- `sessions` : listing and deleting stored chat sessions

Handlers build the capability client and the session store from
configuration, then delegate to the library components.
*/

use crate::chat::{ChatSessionManager, SessionStore};
use crate::client::{create_client, CapabilityClient, TerminalPickerPrompt};
use crate::config::Config;
use crate::error::Result;
use crate::storage::{DurableStore, SledStore};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::sync::Arc;

pub mod actions;
pub mod sessions;

/// Everything a handler needs, built once from configuration
pub struct AppContext {
    /// Loaded and validated configuration
    pub config: Config,
    /// Client selected by `client.type`
    pub client: Arc<dyn CapabilityClient>,
    /// Durable store for chat sessions
    pub store: Arc<dyn DurableStore>,
}

impl AppContext {
    /// Build the client and open the session store
    ///
    /// # Errors
    ///
    /// Returns error if the client cannot be created (e.g. no auth token) or
    /// the store cannot be opened
    pub fn build(config: Config) -> Result<Self> {
        let client = create_client(&config.client, Arc::new(TerminalPickerPrompt))?;
        let store = SledStore::open_configured(config.storage.path.as_deref())?;
        tracing::debug!("Session store at {}", store.path().display());
        Ok(Self::with_parts(config, client, Arc::new(store)))
    }

    /// Assemble a context from existing parts
    pub fn with_parts(
        config: Config,
        client: Arc<dyn CapabilityClient>,
        store: Arc<dyn DurableStore>,
    ) -> Self {
        Self {
            config,
            client,
            store,
        }
    }

    /// Session store over the configured key
    pub fn session_store(&self) -> SessionStore {
        SessionStore::new(Arc::clone(&self.store), self.config.storage.key.clone())
    }

    /// Session manager restored from the store
    pub fn manager(&self) -> ChatSessionManager {
        ChatSessionManager::new(
            Arc::clone(&self.client),
            self.session_store(),
            self.config.chat.clone(),
        )
    }
}

/// Ask a yes/no question; anything but `y`/`yes` means no
pub fn confirm(rl: &mut DefaultEditor, question: &str) -> bool {
    match rl.readline(&format!("{} [y/N] ", question)) {
        Ok(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

/// Ask a yes/no question on a fresh line editor
pub fn confirm_once(question: &str) -> Result<bool> {
    let mut rl = DefaultEditor::new()?;
    Ok(confirm(&mut rl, question))
}

// Interactive shell handler
pub mod shell {
    //! Interactive shell handler.
    //!
    //! Builds every panel over one client and one session manager, then runs
    //! a readline loop that feeds each line to the [`TabShell`].

    use super::*;
    use crate::shell::{ShellFlow, Tab, TabShell};
    use colored::Colorize;

    /// Start the interactive shell on `tab`
    ///
    /// # Errors
    ///
    /// Returns error if the tab id is unknown, or the client, store or line
    /// editor cannot be created
    pub async fn run_shell(config: Config, tab: &str) -> Result<()> {
        let tab = Tab::parse_str(tab).map_err(crate::error::DemoError::Config)?;
        let ctx = AppContext::build(config)?;
        tracing::info!("Starting interactive shell on tab {}", tab.id());

        let mut shell = TabShell::new(
            Arc::clone(&ctx.client),
            ctx.manager(),
            &ctx.config.panels,
        );
        shell.switch_tab(tab).await;

        let mut rl = DefaultEditor::new()?;
        print_welcome_banner(&ctx.config);
        println!("{}", shell.render());

        loop {
            let prompt = shell.prompt();
            match rl.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = rl.add_history_entry(line.as_str());
                    }

                    let command = match shell.parse_input(&line) {
                        Ok(command) => command,
                        Err(e) => {
                            eprintln!("{}", e.to_string().red());
                            continue;
                        }
                    };

                    let mut ask = |question: &str| confirm(&mut rl, question);
                    match shell.execute(command, &mut ask).await {
                        ShellFlow::Continue(Some(text)) => println!("{}", text),
                        ShellFlow::Continue(None) => {}
                        ShellFlow::Exit => break,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(e) => {
                    eprintln!("Error: {:?}", e);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome_banner(config: &Config) {
        println!();
        println!("{}", "Puter.js demo shell".bold());
        let mode = if config.client.client_type == "offline" {
            "offline".yellow().to_string()
        } else {
            config.client.api_base.cyan().to_string()
        };
        println!("Connected to {}", mode);
        println!("Type {} for commands, {} to leave.", "/help".cyan(), "exit".cyan());
        println!();
    }
}
