//! Wayfarer - conversational travel-planning assistant library
//!
//! This library provides the chat backend for the Wayfarer travel agent:
//! session memory, persistence, the agent orchestrator and the HTTP API.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Chat session model, rolling summary engine and window policy
//! - `storage`: Session store trait and SQLite implementation
//! - `orchestrator`: Agent abstraction and the provider-backed travel crew
//! - `chat`: Per-request chat cycle shared by the API and the REPL
//! - `api`: axum HTTP surface
//! - `providers`: AI provider abstraction and implementations (Ollama, OpenAI-compatible)
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use wayfarer::commands::{build_service, open_store};
//! use wayfarer::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let store = Arc::new(open_store(&config).await?);
//!     let service = build_service(&config, store)?;
//!     let reply = service.handle(None, "Three days in Lisbon?".to_string()).await?;
//!     println!("{}", reply.response);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod prompts;
pub mod providers;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use chat::{ChatReply, ChatService};
pub use config::Config;
pub use error::{Result, WayfarerError};
pub use orchestrator::{Orchestrator, OrchestratorInputs, TravelCrew};
pub use session::{ChatSession, SessionWindow, SummaryOutcome};
pub use storage::{SessionStore, SqliteSessionStore};

#[cfg(test)]
pub mod test_utils;
