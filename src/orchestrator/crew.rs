//! Provider-backed travel crew
//!
//! Runs the travel manager persona against a single language model. Each
//! attempt is bounded by the configured timeout; provider failures are
//! retried up to `max_attempts` before the request fails.

use super::{Orchestrator, OrchestratorInputs};
use crate::config::OrchestratorConfig;
use crate::error::{Result, WayfarerError};
use crate::prompts;
use crate::providers::{Message, Provider};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Travel manager agent backed by one provider
pub struct TravelCrew {
    provider: Arc<dyn Provider>,
    config: OrchestratorConfig,
}

impl TravelCrew {
    /// Creates a crew that answers through `provider`
    ///
    /// # Errors
    ///
    /// Returns `WayfarerError::Config` if the limits are unusable
    pub fn new(provider: Arc<dyn Provider>, config: OrchestratorConfig) -> Result<Self> {
        if config.max_attempts == 0 {
            return Err(
                WayfarerError::Config("max_attempts must be greater than 0".to_string()).into(),
            );
        }
        if config.timeout_seconds == 0 {
            return Err(
                WayfarerError::Config("timeout_seconds must be greater than 0".to_string()).into(),
            );
        }

        Ok(Self { provider, config })
    }

    fn build_messages(inputs: &OrchestratorInputs) -> Vec<Message> {
        vec![
            Message::system(prompts::TRAVEL_MANAGER_PROMPT),
            Message::user(prompts::build_task_prompt(inputs)),
        ]
    }

    async fn attempt(&self, messages: &[Message]) -> std::result::Result<String, String> {
        let limit = Duration::from_secs(self.config.timeout_seconds);
        match tokio::time::timeout(limit, self.provider.complete(messages)).await {
            Ok(Ok(response)) => {
                let text = response.message.content.trim();
                if text.is_empty() {
                    Err("model returned an empty reply".to_string())
                } else {
                    if let Some(usage) = response.usage {
                        debug!(
                            prompt_tokens = usage.prompt_tokens,
                            completion_tokens = usage.completion_tokens,
                            "Crew completion usage"
                        );
                    }
                    Ok(text.to_string())
                }
            }
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!(
                "timed out after {} seconds",
                self.config.timeout_seconds
            )),
        }
    }
}

#[async_trait]
impl Orchestrator for TravelCrew {
    async fn execute(&self, inputs: &OrchestratorInputs) -> Result<String> {
        let messages = Self::build_messages(inputs);
        let start = Instant::now();
        let mut last_error = String::new();

        for attempt in 1..=self.config.max_attempts {
            debug!(
                attempt,
                max_attempts = self.config.max_attempts,
                model = %self.provider.model(),
                "Running travel crew"
            );

            match self.attempt(&messages).await {
                Ok(reply) => {
                    info!(
                        attempt,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Travel crew produced a reply"
                    );
                    return Ok(reply);
                }
                Err(e) => {
                    warn!(attempt, "Travel crew attempt failed: {}", e);
                    last_error = e;
                }
            }
        }

        Err(WayfarerError::Orchestrator(last_error).into())
    }
}
