//! Command-line interface definition for Wayfarer
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for serving the chat API and chatting from a terminal.

use clap::{Parser, Subcommand};

/// Wayfarer - conversational travel-planning assistant
///
/// Serves a chat API backed by an AI travel agent, keeping each
/// conversation as a rolling summary plus a short recent window.
#[derive(Parser, Debug, Clone)]
#[command(name = "wayfarer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the session database path
    #[arg(long, env = "WAYFARER_SESSION_DB")]
    pub storage_path: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Wayfarer
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the HTTP chat API
    Serve {
        /// Interface to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Chat with the travel agent from the terminal
    Chat {
        /// Resume (or create) the session with this id
        #[arg(short, long)]
        session: Option<String>,
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
            storage_path: None,
            command: Commands::Chat { session: None },
        }
    }
}
