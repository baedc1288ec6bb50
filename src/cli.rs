//! Command-line interface definition for puter-demo
//!
//! This module defines the CLI structure using clap's derive API. The
//! `shell` command opens the tabbed interactive shell; the remaining
//! commands run a single panel action and exit.

use clap::{Parser, Subcommand};

/// puter-demo - Puter client API showcase
///
/// Exercise the key-value store, file system, OS metadata, AI chat and
/// file picker capabilities of the Puter platform from a terminal.
#[derive(Parser, Debug, Clone)]
#[command(name = "puter-demo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Use the in-process offline client instead of the Puter API
    #[arg(long)]
    pub offline: bool,

    /// Override the chat session store location
    #[arg(long)]
    pub store_path: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for puter-demo
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Open the tabbed interactive shell
    Shell {
        /// Tab to open first (kv, fs, os, ai, ui)
        #[arg(short, long, default_value = "kv")]
        tab: String,
    },

    /// Key-value store counter
    Kv {
        /// KV subcommand
        #[command(subcommand)]
        command: KvCommand,
    },

    /// Demo file read/write
    Fs {
        /// File system subcommand
        #[command(subcommand)]
        command: FsCommand,
    },

    /// User profile and OS version metadata
    Os {
        /// OS subcommand
        #[command(subcommand)]
        command: OsCommand,
    },

    /// Send one prompt to a chat session
    Chat {
        /// Session id (full id or unique prefix); defaults to the active session
        #[arg(short, long)]
        session: Option<String>,

        /// Start a new conversation for this prompt
        #[arg(long, conflicts_with = "session")]
        new: bool,

        /// Prompt text
        prompt: String,
    },

    /// Open the file picker
    Pick {
        /// Allow selecting several files
        #[arg(short, long)]
        multiple: bool,
    },

    /// Manage stored chat sessions
    Sessions {
        /// Sessions subcommand
        #[command(subcommand)]
        command: SessionsCommand,
    },
}

/// KV store subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum KvCommand {
    /// Read the counter
    Get {
        /// Key to read (defaults to the configured counter key)
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Increment the counter
    Incr {
        /// Key to increment (defaults to the configured counter key)
        #[arg(short, long)]
        key: Option<String>,

        /// Amount to add
        #[arg(short = 'n', long, default_value_t = 1)]
        amount: i64,
    },

    /// Decrement the counter
    Decr {
        /// Key to decrement (defaults to the configured counter key)
        #[arg(short, long)]
        key: Option<String>,

        /// Amount to subtract
        #[arg(short = 'n', long, default_value_t = 1)]
        amount: i64,
    },
}

/// File system subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum FsCommand {
    /// Write the timestamped sample text to the demo file
    Write {
        /// Target path (defaults to the demo file path)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Read the demo file back
    Read {
        /// Source path (defaults to the demo file path)
        #[arg(short, long)]
        path: Option<String>,
    },
}

/// OS metadata subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsCommand {
    /// Show the signed-in user
    User,
    /// Show the platform version
    Version,
}

/// Session management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionsCommand {
    /// List stored conversations, most recent first
    List,

    /// Delete a conversation
    Delete {
        /// Session id (full id or unique prefix)
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Replace every conversation with one fresh session
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            offline: false,
            store_path: None,
            command: Commands::Shell {
                tab: "kv".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(!cli.offline);
        if let Commands::Shell { tab } = cli.command {
            assert_eq!(tab, "kv");
        } else {
            panic!("Expected default command to be Shell");
        }
    }

    #[test]
    fn test_cli_parse_shell_default_tab() {
        let cli = Cli::try_parse_from(["puter-demo", "shell"]).unwrap();
        if let Commands::Shell { tab } = cli.command {
            assert_eq!(tab, "kv");
        } else {
            panic!("Expected Shell command");
        }
    }

    #[test]
    fn test_cli_parse_shell_with_tab() {
        let cli = Cli::try_parse_from(["puter-demo", "shell", "--tab", "ai"]).unwrap();
        if let Commands::Shell { tab } = cli.command {
            assert_eq!(tab, "ai");
        } else {
            panic!("Expected Shell command");
        }
    }

    #[test]
    fn test_cli_parse_kv_incr_with_amount() {
        let cli = Cli::try_parse_from(["puter-demo", "kv", "incr", "-n", "5"]).unwrap();
        if let Commands::Kv {
            command: KvCommand::Incr { key, amount },
        } = cli.command
        {
            assert_eq!(key, None);
            assert_eq!(amount, 5);
        } else {
            panic!("Expected Kv Incr command");
        }
    }

    #[test]
    fn test_cli_parse_kv_decr_default_amount() {
        let cli = Cli::try_parse_from(["puter-demo", "kv", "decr", "--key", "hits"]).unwrap();
        if let Commands::Kv {
            command: KvCommand::Decr { key, amount },
        } = cli.command
        {
            assert_eq!(key, Some("hits".to_string()));
            assert_eq!(amount, 1);
        } else {
            panic!("Expected Kv Decr command");
        }
    }

    #[test]
    fn test_cli_parse_fs_read_with_path() {
        let cli = Cli::try_parse_from(["puter-demo", "fs", "read", "--path", "notes.txt"]).unwrap();
        if let Commands::Fs {
            command: FsCommand::Read { path },
        } = cli.command
        {
            assert_eq!(path, Some("notes.txt".to_string()));
        } else {
            panic!("Expected Fs Read command");
        }
    }

    #[test]
    fn test_cli_parse_os_version() {
        let cli = Cli::try_parse_from(["puter-demo", "os", "version"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Os {
                command: OsCommand::Version
            }
        ));
    }

    #[test]
    fn test_cli_parse_chat_prompt() {
        let cli = Cli::try_parse_from(["puter-demo", "chat", "What can you do?"]).unwrap();
        if let Commands::Chat {
            session,
            new,
            prompt,
        } = cli.command
        {
            assert_eq!(session, None);
            assert!(!new);
            assert_eq!(prompt, "What can you do?");
        } else {
            panic!("Expected Chat command");
        }
    }

    #[test]
    fn test_cli_parse_chat_new_conflicts_with_session() {
        let cli = Cli::try_parse_from(["puter-demo", "chat", "--new", "--session", "01AB", "hi"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_parse_chat_requires_prompt() {
        let cli = Cli::try_parse_from(["puter-demo", "chat"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_parse_sessions_delete_with_yes() {
        let cli = Cli::try_parse_from(["puter-demo", "sessions", "delete", "01ABCDEF", "-y"]).unwrap();
        if let Commands::Sessions {
            command: SessionsCommand::Delete { id, yes },
        } = cli.command
        {
            assert_eq!(id, "01ABCDEF");
            assert!(yes);
        } else {
            panic!("Expected Sessions Delete command");
        }
    }

    #[test]
    fn test_cli_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "puter-demo",
            "--config",
            "custom.yaml",
            "-v",
            "--offline",
            "--store-path",
            "/tmp/sessions",
            "pick",
        ])
        .unwrap();
        assert_eq!(cli.config, Some("custom.yaml".to_string()));
        assert!(cli.verbose);
        assert!(cli.offline);
        assert_eq!(cli.store_path, Some("/tmp/sessions".to_string()));
        assert!(matches!(cli.command, Commands::Pick { multiple: false }));
    }

    #[test]
    fn test_cli_parse_missing_command() {
        let cli = Cli::try_parse_from(["puter-demo"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_parse_invalid_command() {
        let cli = Cli::try_parse_from(["puter-demo", "invalid"]);
        assert!(cli.is_err());
    }
}
