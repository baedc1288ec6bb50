//! Tabbed shell integration tests
//!
//! Feeds shell input lines through the parser and `TabShell` the way the
//! interactive loop does, using the offline client and a sled store.

mod common;

use std::sync::Arc;

use puter_demo::cli::Cli;
use puter_demo::client::{CapabilityClient, FakeCapabilityClient};
use puter_demo::commands::AppContext;
use puter_demo::config::Config;
use puter_demo::shell::{ShellFlow, Tab, TabShell};

use common::{create_temp_store, temp_config_file};

async fn feed(shell: &mut TabShell, lines: &[&str]) -> Vec<ShellFlow> {
    let mut flows = Vec::new();
    for line in lines {
        let command = shell.parse_input(line).expect("valid shell input");
        flows.push(shell.execute(command, &mut |_| true).await);
    }
    flows
}

fn offline_context() -> (AppContext, Arc<FakeCapabilityClient>, tempfile::TempDir) {
    let (store, tmp) = create_temp_store();
    let client = Arc::new(FakeCapabilityClient::offline());
    let mut config = Config::default();
    config.client.client_type = "offline".to_string();
    let ctx = AppContext::with_parts(config, client.clone(), store);
    (ctx, client, tmp)
}

#[tokio::test]
async fn test_walk_through_every_tab() {
    let (ctx, client, _tmp) = offline_context();
    let mut shell = TabShell::new(Arc::clone(&ctx.client), ctx.manager(), &ctx.config.panels);
    shell.switch_tab(Tab::Kv).await;
    assert_eq!(shell.kv().count_text(), "0");

    feed(
        &mut shell,
        &["+", "+", "-", "/fs", "write", "read", "/os", "user", "version", "/ui", "pick"],
    )
    .await;

    assert_eq!(shell.kv().count(), Some(1));
    assert_eq!(client.kv("testCounter"), Some(serde_json::json!(1)));
    assert_eq!(shell.fs().status(), "Read succeeded");
    assert!(shell.fs().contents().starts_with("Hello from Puter.js at "));
    assert_eq!(shell.os().status(), "Version loaded");
    assert!(shell.os().user().is_some());
    assert_eq!(shell.ui().last_result(), "Selected file: readme.txt");
    assert_eq!(shell.active_tab(), Tab::Ui);
}

#[tokio::test]
async fn test_chat_sessions_through_shell() {
    let (ctx, client, _tmp) = offline_context();
    let mut shell = TabShell::new(Arc::clone(&ctx.client), ctx.manager(), &ctx.config.panels);

    let flows = feed(&mut shell, &["/ai", "Hello", "/new", "Second thread", "/sessions"]).await;
    assert_eq!(client.chat_prompts(), vec!["Hello", "Second thread"]);

    let manager = shell.ai().manager();
    assert_eq!(manager.sessions().len(), 2);
    assert_eq!(manager.active_session().title, "Second thread");
    assert_eq!(
        manager.active_session().messages[2].content,
        "(offline) You said: Second thread"
    );

    match flows.last() {
        Some(ShellFlow::Continue(Some(listing))) => assert_eq!(listing.lines().count(), 2),
        other => panic!("unexpected flow {:?}", other),
    }

    // A second manager over the same store sees the same sessions.
    let reloaded = ctx.manager();
    assert_eq!(reloaded.collection(), shell.ai().manager().collection());
}

#[tokio::test]
async fn test_offline_client_from_config_file() {
    let (_dir, path) = temp_config_file(
        r#"
client:
  type: http
  api_base: https://api.puter.com
panels:
  kv:
    counter_key: visits
"#,
    );
    let cli = Cli {
        offline: true,
        ..Cli::default()
    };
    let config = Config::load(path.to_str().unwrap(), &cli).unwrap();
    config.validate().unwrap();
    assert_eq!(config.client.client_type, "offline");

    let picker = Arc::new(puter_demo::client::ScriptedPickerPrompt::cancel());
    let client = puter_demo::client::create_client(&config.client, picker).unwrap();
    assert_eq!(client.kv_incr(&config.panels.kv.counter_key, 2).await.unwrap(), 2);
}
