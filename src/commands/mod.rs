/*!
Command handlers for the CLI

- `serve` runs the HTTP API
- `chat` runs an interactive chat session in the terminal

Both open the session store and build the same [`ChatService`] from
configuration, so a session started in one can be continued in the other.
*/

use crate::chat::ChatService;
use crate::config::Config;
use crate::error::Result;
use crate::orchestrator::TravelCrew;
use crate::providers::{create_provider, create_provider_with_override, Provider};
use crate::session::{RollingSummarizer, SessionWindow};
use crate::storage::{SessionStore, SqliteSessionStore};
use std::sync::Arc;

/// Opens the session store at the configured path, or the default location
pub async fn open_store(config: &Config) -> Result<SqliteSessionStore> {
    match &config.storage.path {
        Some(path) => SqliteSessionStore::connect(path).await,
        None => SqliteSessionStore::connect_default().await,
    }
}

/// Wires providers, the travel crew and the window policy into a chat service
///
/// The summarizer uses `session.summary_model` when set, otherwise the same
/// model as the crew.
///
/// # Errors
///
/// Returns error if a provider cannot be created, or the orchestrator limits
/// or window size are invalid
pub fn build_service(config: &Config, store: Arc<dyn SessionStore>) -> Result<ChatService> {
    let provider: Arc<dyn Provider> = Arc::from(create_provider(&config.provider)?);

    let summary_provider: Arc<dyn Provider> = match config.session.summary_model.as_deref() {
        Some(model) => Arc::from(create_provider_with_override(&config.provider, Some(model))?),
        None => Arc::clone(&provider),
    };

    tracing::debug!(
        model = %provider.model(),
        summary_model = %summary_provider.model(),
        max_recent_messages = config.session.max_recent_messages,
        "Building chat service"
    );

    let crew = TravelCrew::new(provider, config.orchestrator.clone())?;
    let window = SessionWindow::new(
        config.session.max_recent_messages,
        RollingSummarizer::new(summary_provider),
    )?;

    Ok(ChatService::new(store, Arc::new(crew), window))
}

// HTTP server command handler
pub mod serve {
    //! Runs the HTTP API until Ctrl-C or SIGTERM, then closes the store.

    use super::*;
    use crate::api::{build_router, AppState};
    use anyhow::Context;
    use tracing::{info, warn};

    /// Start the HTTP server
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    pub async fn run_serve(config: Config) -> Result<()> {
        let store = Arc::new(open_store(&config).await?);
        let service = build_service(&config, store.clone())?;
        let app = build_router(AppState { chat: service });

        let addr = format!("{}:{}", config.server.host, config.server.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        info!("Wayfarer API listening on http://{}", addr);

        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        store.close()?;
        served?;

        info!("Wayfarer API stopped");
        Ok(())
    }

    /// Resolves when SIGINT (Ctrl-C) or SIGTERM is received
    async fn shutdown_signal() {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to install Ctrl-C handler");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut s) => {
                    s.recv().await;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {}
            _ = terminate => {}
        }

        info!("Shutdown signal received; draining requests");
    }
}

// Chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Runs a readline loop that sends each line through the chat service and
    //! keeps the session id between turns.

    use super::*;
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    const EXIT_COMMANDS: [&str; 3] = ["exit", "quit", "bye"];

    /// Whether `input` ends the interactive session
    pub fn is_exit_command(input: &str) -> bool {
        let input = input.trim();
        EXIT_COMMANDS.iter().any(|cmd| input.eq_ignore_ascii_case(cmd))
    }

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `session` - Optional session id to resume
    pub async fn run_chat(config: Config, session: Option<String>) -> Result<()> {
        let store = Arc::new(open_store(&config).await?);
        let service = build_service(&config, store.clone())?;

        let mut rl = DefaultEditor::new()?;
        let mut session_id = session;

        print_welcome_banner(session_id.as_deref());

        loop {
            match rl.readline(&format!("{} ", "you>".cyan().bold())) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if is_exit_command(trimmed) {
                        break;
                    }

                    rl.add_history_entry(trimmed)?;

                    match service.handle(session_id.clone(), trimmed.to_string()).await {
                        Ok(reply) => {
                            if session_id.as_deref() != Some(reply.session_id.as_str()) {
                                println!(
                                    "{}",
                                    format!("Session: {}", reply.session_id).dimmed()
                                );
                            }
                            println!("{} {}\n", "agent>".green().bold(), reply.response);
                            session_id = Some(reply.session_id);
                        }
                        Err(e) => {
                            eprintln!("{} {:#}\n", "error:".red().bold(), e);
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(id) = &session_id {
            println!("Resume with: wayfarer chat --session {}", id);
        }
        store.close()?;
        Ok(())
    }

    fn print_welcome_banner(session_id: Option<&str>) {
        println!("{}", "Wayfarer travel agent".bold());
        match session_id {
            Some(id) => println!("Resuming session {}", id),
            None => println!("Starting a new session"),
        }
        println!("Type 'exit', 'quit' or 'bye' to leave.\n");
    }
}
