//! Rolling summary engine
//!
//! Folds messages evicted from a session window into the session's running
//! summary with a single completion call. Failures never escape: the caller
//! gets [`SummaryOutcome::Unchanged`] and keeps the previous summary, and the
//! evicted messages are dropped.

use crate::prompts;
use crate::providers::{self, Provider};
use crate::session::{render_transcript, Message};
use std::sync::Arc;

/// Why a summary was left as it was
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnchangedReason {
    /// There was nothing to fold in; the provider was not called
    NoOverflow,
    /// The provider call failed or returned nothing usable
    ProviderFailed(String),
}

/// Result of a summarization attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// The provider produced a new summary
    Updated(String),
    /// The current summary stands
    Unchanged(UnchangedReason),
}

impl SummaryOutcome {
    /// Returns the summary the session should hold after this outcome
    ///
    /// # Examples
    ///
    /// ```
    /// use wayfarer::session::{SummaryOutcome, UnchangedReason};
    ///
    /// let kept = SummaryOutcome::Unchanged(UnchangedReason::NoOverflow);
    /// assert_eq!(kept.resolve("old"), "old");
    ///
    /// let updated = SummaryOutcome::Updated("new".to_string());
    /// assert_eq!(updated.resolve("old"), "new");
    /// ```
    pub fn resolve(self, current: &str) -> String {
        match self {
            SummaryOutcome::Updated(summary) => summary,
            SummaryOutcome::Unchanged(_) => current.to_string(),
        }
    }

    /// Whether the summary was rewritten
    pub fn is_updated(&self) -> bool {
        matches!(self, SummaryOutcome::Updated(_))
    }
}

/// Condenses overflow messages into a session's rolling summary
#[derive(Clone)]
pub struct RollingSummarizer {
    provider: Arc<dyn Provider>,
}

impl RollingSummarizer {
    /// Creates a summarizer backed by the given provider
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    /// Folds `overflow` into `current_summary`
    ///
    /// Never fails. An empty `overflow` short-circuits without calling the
    /// provider; a provider error or blank completion yields
    /// `Unchanged(ProviderFailed)`.
    pub async fn summarize(&self, current_summary: &str, overflow: &[Message]) -> SummaryOutcome {
        if overflow.is_empty() {
            return SummaryOutcome::Unchanged(UnchangedReason::NoOverflow);
        }

        let prompt = prompts::build_summary_prompt(current_summary, &render_transcript(overflow));
        let request = [providers::Message::user(prompt)];

        tracing::debug!(
            "Summarizing {} overflow messages with model {}",
            overflow.len(),
            self.provider.model()
        );

        match self.provider.complete(&request).await {
            Ok(response) => {
                let summary = response.message.content.trim();
                if summary.is_empty() {
                    tracing::warn!("Summary provider returned an empty completion");
                    SummaryOutcome::Unchanged(UnchangedReason::ProviderFailed(
                        "empty completion".to_string(),
                    ))
                } else {
                    SummaryOutcome::Updated(summary.to_string())
                }
            }
            Err(e) => {
                tracing::warn!("Error generating summary, keeping previous summary: {}", e);
                SummaryOutcome::Unchanged(UnchangedReason::ProviderFailed(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FailingProvider, ScriptedProvider};

    #[tokio::test]
    async fn test_empty_overflow_is_noop_without_provider_call() {
        let provider = Arc::new(ScriptedProvider::new(["should not be used"]));
        let summarizer = RollingSummarizer::new(provider.clone());

        let outcome = summarizer.summarize("kept summary", &[]).await;

        assert_eq!(outcome, SummaryOutcome::Unchanged(UnchangedReason::NoOverflow));
        assert_eq!(outcome.resolve("kept summary"), "kept summary");
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_successful_summary_replaces_current() {
        let provider = Arc::new(ScriptedProvider::new(["  Traveller plans Kyoto in April.  "]));
        let summarizer = RollingSummarizer::new(provider.clone());

        let overflow = vec![
            Message::user("I want to go to Kyoto"),
            Message::assistant("When?"),
            Message::user("April"),
        ];
        let outcome = summarizer.summarize("", &overflow).await;

        assert_eq!(
            outcome,
            SummaryOutcome::Updated("Traveller plans Kyoto in April.".to_string())
        );
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_prompt_carries_summary_and_transcript_in_order() {
        let provider = Arc::new(ScriptedProvider::new(["ok"]));
        let summarizer = RollingSummarizer::new(provider.clone());

        let overflow = vec![Message::user("first"), Message::assistant("second")];
        summarizer.summarize("Earlier: wants beaches.", &overflow).await;

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let prompt = &requests[0][0].content;
        assert!(prompt.contains("Earlier: wants beaches."));
        let first = prompt.find("user: first").unwrap();
        let second = prompt.find("assistant: second").unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn test_provider_failure_is_absorbed() {
        let summarizer = RollingSummarizer::new(Arc::new(FailingProvider::new("quota exceeded")));

        let outcome = summarizer
            .summarize("prior", &[Message::user("a"), Message::assistant("b")])
            .await;

        match &outcome {
            SummaryOutcome::Unchanged(UnchangedReason::ProviderFailed(reason)) => {
                assert!(reason.contains("quota exceeded"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(outcome.resolve("prior"), "prior");
    }

    #[tokio::test]
    async fn test_blank_completion_counts_as_failure() {
        let summarizer = RollingSummarizer::new(Arc::new(ScriptedProvider::new(["   "])));

        let outcome = summarizer.summarize("prior", &[Message::user("a")]).await;

        assert!(!outcome.is_updated());
        assert_eq!(outcome.resolve("prior"), "prior");
    }
}
