//! puter-demo - Puter.js capability demo CLI
//!
#![doc = "puter-demo - Puter.js capability demo CLI"]
#![doc = "Main entry point for the puter-demo application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use puter_demo::cli::{Cli, Commands};
use puter_demo::commands::{self, actions, sessions, AppContext};
use puter_demo::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Shell { tab } => {
            tracing::info!("Starting interactive shell");
            commands::shell::run_shell(config, &tab).await?;
            Ok(())
        }
        Commands::Kv { command } => {
            let ctx = AppContext::build(config)?;
            actions::run_kv(&ctx, command).await
        }
        Commands::Fs { command } => {
            let ctx = AppContext::build(config)?;
            actions::run_fs(&ctx, command).await
        }
        Commands::Os { command } => {
            let ctx = AppContext::build(config)?;
            actions::run_os(&ctx, command).await
        }
        Commands::Chat {
            session,
            new,
            prompt,
        } => {
            if let Some(s) = &session {
                tracing::debug!("Using session: {}", s);
            }
            let ctx = AppContext::build(config)?;
            actions::run_chat(&ctx, session, new, &prompt).await
        }
        Commands::Pick { multiple } => {
            let ctx = AppContext::build(config)?;
            actions::run_pick(&ctx, multiple).await
        }
        Commands::Sessions { command } => {
            tracing::info!("Starting sessions command");
            sessions::handle_sessions(&config, command)?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so panel output on stdout stays clean.
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "puter_demo=debug"
    } else {
        "puter_demo=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
