//! Session window policy
//!
//! Keeps a session at "rolling summary + bounded recent window". When a cycle
//! leaves more than `max_recent_messages` raw messages, the oldest
//! `max_recent_messages / 2` are evicted and folded into the summary.
//!
//! The eviction size is a fixed fraction of the configured maximum, not of
//! the current length. A request cycle adds exactly two messages, so with
//! `max_recent_messages >= 4` one eviction restores the bound.

use super::summary::{RollingSummarizer, SummaryOutcome};
use super::ChatSession;
use crate::error::{Result, WayfarerError};

/// Smallest window for which one eviction undoes a cycle's growth
pub const MIN_RECENT_MESSAGES: usize = 4;

/// Enforces the summary/window invariant on a [`ChatSession`]
#[derive(Clone)]
pub struct SessionWindow {
    max_recent_messages: usize,
    summarizer: RollingSummarizer,
}

impl SessionWindow {
    /// Creates a window policy
    ///
    /// # Arguments
    ///
    /// * `max_recent_messages` - Raw messages retained after a cycle
    /// * `summarizer` - Engine used to fold evicted messages into the summary
    ///
    /// # Errors
    ///
    /// Returns `WayfarerError::Config` if `max_recent_messages` is below
    /// [`MIN_RECENT_MESSAGES`]
    pub fn new(max_recent_messages: usize, summarizer: RollingSummarizer) -> Result<Self> {
        if max_recent_messages < MIN_RECENT_MESSAGES {
            return Err(WayfarerError::Config(format!(
                "max_recent_messages must be at least {}, got {}",
                MIN_RECENT_MESSAGES, max_recent_messages
            ))
            .into());
        }

        Ok(Self {
            max_recent_messages,
            summarizer,
        })
    }

    /// Configured window bound
    pub fn max_recent_messages(&self) -> usize {
        self.max_recent_messages
    }

    /// Number of messages to evict for a window of `len` messages, if any
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// # use wayfarer::providers::{CompletionResponse, Message, Provider};
    /// # struct Noop;
    /// # #[async_trait::async_trait]
    /// # impl Provider for Noop {
    /// #     async fn complete(&self, _m: &[Message]) -> wayfarer::error::Result<CompletionResponse> {
    /// #         Ok(CompletionResponse::new(Message::assistant("")))
    /// #     }
    /// #     fn model(&self) -> String { "noop".into() }
    /// # }
    /// use wayfarer::session::{RollingSummarizer, SessionWindow};
    ///
    /// let window = SessionWindow::new(6, RollingSummarizer::new(Arc::new(Noop))).unwrap();
    /// assert_eq!(window.eviction_count(6), None);
    /// assert_eq!(window.eviction_count(8), Some(3));
    /// assert_eq!(window.eviction_count(12), Some(3));
    /// ```
    pub fn eviction_count(&self, len: usize) -> Option<usize> {
        if len > self.max_recent_messages {
            Some((self.max_recent_messages / 2).min(len))
        } else {
            None
        }
    }

    /// Summarizes the head of the window when it exceeds the bound
    ///
    /// Returns `None` when the window is within bounds. Otherwise the evicted
    /// messages are removed from `recent_messages` whatever the summarizer
    /// does, and `summary` is replaced by the resolved outcome.
    pub async fn maybe_summarize(&self, session: &mut ChatSession) -> Option<SummaryOutcome> {
        let evict = self.eviction_count(session.recent_messages.len())?;

        let to_keep = session.recent_messages.split_off(evict);
        let to_summarize = std::mem::replace(&mut session.recent_messages, to_keep);

        let outcome = self
            .summarizer
            .summarize(&session.summary, &to_summarize)
            .await;

        if outcome.is_updated() {
            tracing::info!(
                session_id = %session.session_id,
                evicted = to_summarize.len(),
                retained = session.recent_messages.len(),
                "Folded overflow messages into rolling summary"
            );
        } else {
            tracing::warn!(
                session_id = %session.session_id,
                evicted = to_summarize.len(),
                "Summary unchanged; evicted messages dropped from long-term context"
            );
        }

        session.summary = outcome.clone().resolve(&session.summary);
        Some(outcome)
    }
}
