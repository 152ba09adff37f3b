//! Agent orchestration
//!
//! The chat handler only sees the [`Orchestrator`] trait: give it the
//! request inputs, get back the assistant's reply. How the reply is produced
//! (one model call, a delegating crew, retries) is the implementation's
//! concern.

pub mod crew;

pub use crew::TravelCrew;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Inputs for one orchestrator run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorInputs {
    /// The traveller's latest message
    pub topic: String,
    /// Summary plus recent conversation, as built by the session
    pub chat_history: String,
    /// Today's date, `YYYY-MM-DD`
    pub current_date: String,
}

impl OrchestratorInputs {
    /// Builds inputs for `topic` and `chat_history`, dated today (local time)
    pub fn new(topic: impl Into<String>, chat_history: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            chat_history: chat_history.into(),
            current_date: chrono::Local::now().format("%Y-%m-%d").to_string(),
        }
    }
}

/// Produces the assistant's reply for a chat request
///
/// Implementations report failure as
/// [`WayfarerError::Orchestrator`](crate::error::WayfarerError::Orchestrator).
#[async_trait]
pub trait Orchestrator: Send + Sync {
    /// Runs the agent and returns the reply text
    async fn execute(&self, inputs: &OrchestratorInputs) -> Result<String>;
}
