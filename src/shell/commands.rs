//! Shell command parser
//!
//! Input starting with `/` is a shell command: switching tabs and managing
//! chat sessions. `exit` and `quit` also work without the slash. Anything
//! else is handed to the active panel as an action.

use super::tabs::Tab;
use thiserror::Error;

/// Errors from parsing shell commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// A parsed line of shell input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Activate a tab
    SwitchTab(Tab),

    /// List the tabs
    ListTabs,

    /// Start a new chat session
    NewSession,

    /// List chat sessions, most recent first
    ListSessions,

    /// Make a chat session active (id or unique prefix)
    SwitchSession(String),

    /// Delete a chat session after confirmation
    DeleteSession(String),

    /// Reset the active chat session
    ClearSession,

    /// Drop every chat session after confirmation
    ClearAll,

    /// Display help
    Help,

    /// Leave the shell
    Exit,

    /// Input for the active panel
    Action(String),

    /// Blank line
    Empty,
}

fn required_arg(
    input: &str,
    command: &str,
    usage: &str,
) -> Result<String, CommandError> {
    let arg = input[command.len()..].trim();
    if arg.is_empty() {
        Err(CommandError::MissingArgument {
            command: command.to_string(),
            usage: usage.to_string(),
        })
    } else {
        Ok(arg.to_string())
    }
}

/// Parse one line of shell input
///
/// Command words are case-insensitive; session ids keep their case.
///
/// # Errors
///
/// Returns `CommandError` for unknown commands, unknown tabs and missing
/// arguments.
///
/// # Examples
///
/// ```
/// use puter_demo::shell::{parse_shell_command, ShellCommand, Tab};
///
/// assert_eq!(parse_shell_command("/tab ai").unwrap(), ShellCommand::SwitchTab(Tab::Ai));
/// assert_eq!(parse_shell_command("/fs").unwrap(), ShellCommand::SwitchTab(Tab::Fs));
/// assert_eq!(
///     parse_shell_command("What can you do?").unwrap(),
///     ShellCommand::Action("What can you do?".to_string())
/// );
/// assert!(parse_shell_command("/teleport").is_err());
/// ```
pub fn parse_shell_command(input: &str) -> Result<ShellCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if trimmed.is_empty() {
        return Ok(ShellCommand::Empty);
    }

    if !trimmed.starts_with('/') {
        return Ok(match lower.as_str() {
            "exit" | "quit" => ShellCommand::Exit,
            _ => ShellCommand::Action(trimmed.to_string()),
        });
    }

    match lower.as_str() {
        // Tabs
        "/tabs" => Ok(ShellCommand::ListTabs),
        "/tab" => Err(CommandError::MissingArgument {
            command: "/tab".to_string(),
            usage: "/tab <kv|fs|os|ai|ui>".to_string(),
        }),
        input if input.starts_with("/tab ") => {
            let arg = input[5..].trim();
            Tab::parse_str(arg)
                .map(ShellCommand::SwitchTab)
                .map_err(|_| CommandError::UnsupportedArgument {
                    command: "/tab".to_string(),
                    arg: arg.to_string(),
                })
        }
        "/kv" => Ok(ShellCommand::SwitchTab(Tab::Kv)),
        "/fs" => Ok(ShellCommand::SwitchTab(Tab::Fs)),
        "/os" => Ok(ShellCommand::SwitchTab(Tab::Os)),
        "/ai" | "/chat" => Ok(ShellCommand::SwitchTab(Tab::Ai)),
        "/ui" => Ok(ShellCommand::SwitchTab(Tab::Ui)),

        // Chat sessions
        "/new" => Ok(ShellCommand::NewSession),
        "/sessions" | "/history" => Ok(ShellCommand::ListSessions),
        "/switch" | "/delete" => Err(CommandError::MissingArgument {
            command: lower.clone(),
            usage: format!("{} <session-id>", lower),
        }),
        input if input.starts_with("/switch ") => {
            required_arg(trimmed, "/switch", "/switch <session-id>").map(ShellCommand::SwitchSession)
        }
        input if input.starts_with("/delete ") => {
            required_arg(trimmed, "/delete", "/delete <session-id>").map(ShellCommand::DeleteSession)
        }
        "/clear" => Ok(ShellCommand::ClearSession),
        "/clear all" | "/clear-all" => Ok(ShellCommand::ClearAll),
        input if input.starts_with("/clear ") => Err(CommandError::UnsupportedArgument {
            command: "/clear".to_string(),
            arg: input[7..].trim().to_string(),
        }),

        // Help and exit
        "/help" | "/?" => Ok(ShellCommand::Help),
        "/exit" | "/quit" => Ok(ShellCommand::Exit),

        input => {
            let cmd = input.split_whitespace().next().unwrap_or(input);
            Err(CommandError::UnknownCommand(cmd.to_string()))
        }
    }
}

/// Help text for the shell
pub fn help_text() -> String {
    let mut tabs = String::new();
    for tab in Tab::ALL {
        tabs.push_str(&format!(
            "  /tab {:<4}       - {} ({})\n",
            tab.id(),
            tab.label(),
            tab.description()
        ));
    }

    format!(
        r#"
Shell Commands
==============

TABS:
{}  /tabs           - List tabs
  /kv /fs /os /ai /ui - Shorthand for /tab <id>

PANEL ACTIONS (type on the active tab):
  KV store        - load, +, -
  File system     - write, read
  OS              - user, version
  UI helpers      - pick
  AI chat         - any text is sent as a prompt

CHAT SESSIONS:
  /new            - Start a new conversation
  /sessions       - List conversations, most recent first
  /switch <id>    - Switch conversation (id or unique prefix)
  /delete <id>    - Delete a conversation (asks for confirmation)
  /clear          - Reset the active conversation
  /clear all      - Delete every conversation (asks for confirmation)

OTHER:
  /help           - Show this help
  /exit, exit     - Leave the shell (on the AI tab, `exit` is sent as a prompt)
"#,
        tabs
    )
}
