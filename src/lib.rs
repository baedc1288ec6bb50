//! puter-demo - Puter.js capability demo library
//!
//! This library provides the core functionality of the puter-demo shell:
//! a client for the Puter platform, a persistent multi-session chat
//! manager, and one panel per platform capability.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `client`: Capability client trait, HTTP and in-process implementations
//! - `storage`: Durable key-value storage for chat sessions
//! - `chat`: Chat data model, session persistence and the session manager
//! - `panels`: KV, file system, OS, UI and AI chat panels
//! - `shell`: Tabs, shell command parsing and the tabbed shell
//! - `commands`: CLI command handlers
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use puter_demo::{Config, commands::AppContext};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let ctx = AppContext::build(config)?;
//!     let mut manager = ctx.manager();
//!     let id = manager.active_id().to_string();
//!     manager.send_message(&id, "What can you do?").await?;
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod panels;
pub mod shell;
pub mod storage;

// Re-export commonly used types
pub use chat::{ChatMessage, ChatSession, ChatSessionManager, SendOutcome, SessionCollection};
pub use client::{extract_reply_text, CapabilityClient};
pub use config::Config;
pub use error::{DemoError, Result};

#[cfg(test)]
pub mod test_utils;
