//! Wayfarer - conversational travel-planning assistant
//!
#![doc = "Main entry point for the Wayfarer application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wayfarer::cli::{Cli, Commands};
use wayfarer::commands;
use wayfarer::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up API keys and WAYFARER_* overrides from a local .env, if any
    let _ = dotenvy::dotenv();

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
        Commands::Serve { .. } => {
            tracing::info!(
                "Starting API server on {}:{}",
                config.server.host,
                config.server.port
            );
            commands::serve::run_serve(config).await?;
            Ok(())
        }
        Commands::Chat { session } => {
            tracing::info!("Starting interactive chat mode");
            if let Some(id) = &session {
                tracing::debug!("Resuming session: {}", id);
            }
            commands::chat::run_chat(config, session).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "wayfarer=debug"
    } else {
        "wayfarer=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
