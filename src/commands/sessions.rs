use crate::chat::{ChatSessionManager, SessionStore};
use crate::cli::SessionsCommand;
use crate::client::FakeCapabilityClient;
use crate::commands::confirm_once;
use crate::config::Config;
use crate::error::Result;
use crate::panels::ai::short_id;
use crate::storage::{DurableStore, SledStore};
use colored::Colorize;
use prettytable::{format, Table};
use std::sync::Arc;

/// Handle session commands
///
/// Session management never talks to the platform, so the manager is built
/// over an in-process client and works without credentials.
pub fn handle_sessions(config: &Config, command: SessionsCommand) -> Result<()> {
    let store = SledStore::open_configured(config.storage.path.as_deref())?;
    run(config, Arc::new(store), command, &mut |q| confirm_once(q))
}

fn run(
    config: &Config,
    store: Arc<dyn DurableStore>,
    command: SessionsCommand,
    confirm: &mut dyn FnMut(&str) -> Result<bool>,
) -> Result<()> {
    let mut manager = ChatSessionManager::new(
        Arc::new(FakeCapabilityClient::new()),
        SessionStore::new(store, config.storage.key.clone()),
        config.chat.clone(),
    );

    match command {
        SessionsCommand::List => print_sessions(&manager),
        SessionsCommand::Delete { id, yes } => {
            let id = manager.resolve_id(&id)?;
            let title = manager
                .session(&id)
                .map(|s| s.title.clone())
                .unwrap_or_default();
            if !yes && !confirm(&format!("Delete conversation \"{}\"?", title))? {
                println!("Kept conversation {}", short_id(&id));
                return Ok(());
            }
            manager.delete_session(&id)?;
            println!("{}", format!("Deleted conversation {}", short_id(&id)).green());
        }
        SessionsCommand::Clear { yes } => {
            if !yes && !confirm("Delete every conversation?")? {
                println!("Kept all conversations");
                return Ok(());
            }
            manager.clear_all();
            println!("{}", "Cleared all conversations".green());
        }
    }

    Ok(())
}

fn print_sessions(manager: &ChatSessionManager) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "".bold(),
        "ID".bold(),
        "Title".bold(),
        "Messages".bold(),
        "Last Updated".bold()
    ]);

    let active = manager.active_id();
    for session in manager.sessions_by_recent() {
        let marker = if session.id == active { "*" } else { "" };
        let updated = session
            .updated_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();

        table.add_row(prettytable::row![
            marker,
            short_id(&session.id).cyan(),
            session.title,
            session.messages.len(),
            updated
        ]);
    }

    println!("\nConversations:");
    table.printstd();
    println!();
    println!(
        "Use {} to continue a conversation.",
        "puter-demo chat --session <ID> <PROMPT>".cyan()
    );
    println!();
}
