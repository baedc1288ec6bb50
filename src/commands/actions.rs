//! One-shot panel actions
//!
//! Each handler performs a single capability call and prints the result.
//! Unlike the shell panels, failures are returned so the process exits
//! non-zero.

use super::AppContext;
use crate::chat::{Role, SendOutcome};
use crate::cli::{FsCommand, KvCommand, OsCommand};
use crate::client::{CapabilityClient, PickerOptions, PickerSelection};
use crate::error::{DemoError, Result};
use crate::panels::ai::render_message;
use crate::panels::fs::{demo_path, sample_text};
use crate::panels::format_json;
use crate::panels::ui::describe_selection;
use anyhow::Context;
use colored::Colorize;

/// Handle `kv get|incr|decr`
pub async fn run_kv(ctx: &AppContext, command: KvCommand) -> Result<()> {
    let default_key = ctx.config.panels.kv.counter_key.clone();
    match command {
        KvCommand::Get { key } => {
            let key = key.unwrap_or(default_key);
            let value = ctx
                .client
                .kv_get(&key)
                .await
                .with_context(|| format!("Failed to read {}", key))?;
            match value {
                Some(value) => println!("{} = {}", key.cyan(), format_json(&value)),
                None => println!("{} is not set", key.cyan()),
            }
        }
        KvCommand::Incr { key, amount } => {
            let key = key.unwrap_or(default_key);
            let value = ctx
                .client
                .kv_incr(&key, amount)
                .await
                .with_context(|| format!("Failed to increment {}", key))?;
            println!("{} = {}", key.cyan(), value);
        }
        KvCommand::Decr { key, amount } => {
            let key = key.unwrap_or(default_key);
            let value = ctx
                .client
                .kv_decr(&key, amount)
                .await
                .with_context(|| format!("Failed to decrement {}", key))?;
            println!("{} = {}", key.cyan(), value);
        }
    }
    Ok(())
}

/// Handle `fs write|read`
pub async fn run_fs(ctx: &AppContext, command: FsCommand) -> Result<()> {
    let default_path = demo_path(&ctx.config.panels.fs);
    match command {
        FsCommand::Write { path } => {
            let path = path.unwrap_or(default_path);
            let text = sample_text();
            ctx.client
                .fs_write(&path, &text)
                .await
                .with_context(|| format!("Write failed for {}", path))?;
            println!("{}", format!("Wrote sample text to {}", path).green());
        }
        FsCommand::Read { path } => {
            let path = path.unwrap_or(default_path);
            let blob = ctx
                .client
                .fs_read(&path)
                .await
                .with_context(|| format!("Read failed for {}", path))?;
            println!("{}", blob.text());
        }
    }
    Ok(())
}

/// Handle `os user|version`
pub async fn run_os(ctx: &AppContext, command: OsCommand) -> Result<()> {
    let record = match command {
        OsCommand::User => ctx.client.os_user().await.context("User lookup failed")?,
        OsCommand::Version => ctx
            .client
            .os_version()
            .await
            .context("Version lookup failed")?,
    };
    println!("{}", format_json(&record));
    Ok(())
}

/// Handle `pick`
pub async fn run_pick(ctx: &AppContext, multiple: bool) -> Result<()> {
    let options = PickerOptions {
        multiple,
        start_dir: ctx.config.panels.picker.start_dir.clone(),
    };
    let selection = ctx
        .client
        .show_open_file_picker(&options)
        .await
        .context("File picker failed")?;

    match &selection {
        PickerSelection::Multiple(files) => {
            for file in files {
                println!("Selected file: {}", file.display_name());
            }
        }
        other => println!("{}", describe_selection(other)),
    }
    Ok(())
}

/// Handle `chat [--session ID | --new] PROMPT`
///
/// The turn is stored in the chosen session (the active one by default).
///
/// # Errors
///
/// Returns error for an unknown session, and for a failed request after
/// the error reply has been stored.
pub async fn run_chat(
    ctx: &AppContext,
    session: Option<String>,
    new: bool,
    prompt: &str,
) -> Result<()> {
    let mut manager = ctx.manager();
    let session_id = if new {
        manager.create_session()
    } else {
        match session {
            Some(id) => manager.resolve_id(&id)?,
            None => manager.active_id().to_string(),
        }
    };

    let outcome = manager.send_message(&session_id, prompt).await?;
    match outcome {
        SendOutcome::Replied { reply_id } => {
            let reply = manager
                .session(&session_id)
                .and_then(|s| s.messages.iter().find(|m| m.id == reply_id));
            if let Some(reply) = reply.filter(|m| m.role == Role::Assistant) {
                println!("{}", render_message(reply));
            }
            Ok(())
        }
        SendOutcome::Failed { error, .. } => Err(DemoError::Client(error).into()),
        SendOutcome::Ignored => {
            println!("{}", "Nothing to send.".yellow());
            Ok(())
        }
        SendOutcome::Discarded => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeOp;
    use crate::client::FakeCapabilityClient;
    use crate::config::Config;
    use crate::storage::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    fn context(client: &Arc<FakeCapabilityClient>) -> AppContext {
        AppContext::with_parts(
            Config::default(),
            client.clone(),
            Arc::new(MemoryStore::new()),
        )
    }

    #[tokio::test]
    async fn test_kv_uses_configured_key_by_default() {
        let client = Arc::new(FakeCapabilityClient::new());
        let ctx = context(&client);
        run_kv(&ctx, KvCommand::Incr { key: None, amount: 3 }).await.unwrap();
        assert_eq!(client.kv("testCounter"), Some(json!(3)));

        run_kv(
            &ctx,
            KvCommand::Decr {
                key: Some("other".to_string()),
                amount: 2,
            },
        )
        .await
        .unwrap();
        assert_eq!(client.kv("other"), Some(json!(-2)));
    }

    #[tokio::test]
    async fn test_fs_failure_carries_context() {
        let client = Arc::new(FakeCapabilityClient::new());
        let ctx = context(&client);
        let err = run_fs(&ctx, FsCommand::Read { path: None }).await.unwrap_err();
        assert_eq!(
            format!("{:#}", err),
            "Read failed for puterjs-demo.txt: No such file: puterjs-demo.txt"
        );
    }

    #[tokio::test]
    async fn test_fs_write_default_path() {
        let client = Arc::new(FakeCapabilityClient::new());
        let ctx = context(&client);
        run_fs(&ctx, FsCommand::Write { path: None }).await.unwrap();
        assert!(client.file_text("puterjs-demo.txt").is_some());
    }

    #[tokio::test]
    async fn test_os_failure_propagates() {
        let client = Arc::new(FakeCapabilityClient::new());
        client.fail(FakeOp::OsVersion, "offline");
        let ctx = context(&client);
        assert!(run_os(&ctx, OsCommand::User).await.is_ok());
        assert!(run_os(&ctx, OsCommand::Version).await.is_err());
    }

    #[tokio::test]
    async fn test_chat_new_session_keeps_old_one() {
        let client = Arc::new(FakeCapabilityClient::new());
        client.push_chat_reply(json!({"message": {"content": "Hi there"}}));
        let ctx = context(&client);
        let before = ctx.manager().active_id().to_string();

        run_chat(&ctx, None, true, "Hello").await.unwrap();

        let manager = ctx.manager();
        assert_eq!(manager.sessions().len(), 2);
        assert_ne!(manager.active_id(), before);
        assert_eq!(manager.active_session().title, "Hello");
    }

    #[tokio::test]
    async fn test_chat_failure_is_stored_and_returned() {
        let client = Arc::new(FakeCapabilityClient::new());
        client.push_chat_error("rate limited");
        let ctx = context(&client);

        let err = run_chat(&ctx, None, false, "Hello").await.unwrap_err();
        assert_eq!(err.to_string(), "rate limited");
        let manager = ctx.manager();
        let last = manager.active_session().last_message().unwrap();
        assert_eq!(last.content, "Error: rate limited");
    }

    #[tokio::test]
    async fn test_chat_unknown_session() {
        let client = Arc::new(FakeCapabilityClient::new());
        let ctx = context(&client);
        assert!(run_chat(&ctx, Some("ZZZ".to_string()), false, "Hi").await.is_err());
        assert_eq!(client.calls(FakeOp::AiChat), 0);
    }
}
