//! Error types for Wayfarer
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Wayfarer operations
///
/// Covers configuration loading, provider interactions, agent orchestration
/// and session persistence. Functions return [`Result`], which wraps these
/// variants in `anyhow::Error`; callers that need to classify a failure
/// downcast back to `WayfarerError`.
#[derive(Error, Debug)]
pub enum WayfarerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (API calls, authentication, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// The agent orchestrator failed to produce a reply
    #[error("Agent execution failed: {0}")]
    Orchestrator(String),

    /// The session store is not connected or cannot be reached
    #[error("Session store unavailable: {0}")]
    StoreUnavailable(String),

    /// Session storage errors (queries, corrupt records)
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl WayfarerError {
    /// Finds the `WayfarerError` carried by an `anyhow::Error`, if any
    ///
    /// # Examples
    ///
    /// ```
    /// use wayfarer::error::WayfarerError;
    ///
    /// let err: anyhow::Error = WayfarerError::StoreUnavailable("closed".into()).into();
    /// assert!(matches!(
    ///     WayfarerError::classify(&err),
    ///     Some(WayfarerError::StoreUnavailable(_))
    /// ));
    /// ```
    pub fn classify(err: &anyhow::Error) -> Option<&WayfarerError> {
        err.chain().find_map(|cause| cause.downcast_ref::<WayfarerError>())
    }
}

/// Result type alias for Wayfarer operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
