//! Test utilities for Wayfarer
//!
//! Hand-written fakes for the provider and orchestrator seams, plus helpers
//! for temporary session databases.

use crate::error::{Result, WayfarerError};
use crate::orchestrator::{Orchestrator, OrchestratorInputs};
use crate::providers::{CompletionResponse, Message, Provider};
use crate::session::ChatSession;
use crate::storage::{SessionStore, SqliteSessionStore};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

/// Provider that replies with scripted completions, in order
///
/// Records every request it receives. Once the script is exhausted it
/// either repeats a fixed reply or fails.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<String>>,
    repeat: Option<String>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedProvider {
    /// Replies with each entry once, then fails
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            repeat: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Replies with `reply` forever
    pub fn repeating(reply: impl Into<String>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            repeat: Some(reply.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of completion calls received
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn complete(&self, messages: &[Message]) -> Result<CompletionResponse> {
        self.requests.lock().unwrap().push(messages.to_vec());
        let next = self.replies.lock().unwrap().pop_front();
        match next.or_else(|| self.repeat.clone()) {
            Some(reply) => Ok(CompletionResponse::new(Message::assistant(reply))),
            None => Err(WayfarerError::Provider("script exhausted".to_string()).into()),
        }
    }

    fn model(&self) -> String {
        "scripted".to_string()
    }
}

/// Provider that always fails with the given message
pub struct FailingProvider {
    message: String,
    calls: AtomicUsize,
}

impl FailingProvider {
    /// Creates a provider failing with `message`
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of completion calls received
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for FailingProvider {
    async fn complete(&self, _messages: &[Message]) -> Result<CompletionResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(WayfarerError::Provider(self.message.clone()).into())
    }

    fn model(&self) -> String {
        "failing".to_string()
    }
}

/// Provider that sleeps before replying
pub struct SlowProvider {
    delay: Duration,
    reply: String,
}

impl SlowProvider {
    /// Creates a provider replying with `reply` after `delay`
    pub fn new(delay: Duration, reply: impl Into<String>) -> Self {
        Self {
            delay,
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl Provider for SlowProvider {
    async fn complete(&self, _messages: &[Message]) -> Result<CompletionResponse> {
        tokio::time::sleep(self.delay).await;
        Ok(CompletionResponse::new(Message::assistant(self.reply.clone())))
    }

    fn model(&self) -> String {
        "slow".to_string()
    }
}

/// Orchestrator that echoes the topic, or fails on demand
pub struct EchoOrchestrator {
    fail_with: Option<String>,
    seen: Mutex<Vec<OrchestratorInputs>>,
}

impl EchoOrchestrator {
    /// Replies `reply to: {topic}`
    pub fn new() -> Self {
        Self {
            fail_with: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Always fails with an orchestrator error
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Inputs received so far
    pub fn seen(&self) -> Vec<OrchestratorInputs> {
        self.seen.lock().unwrap().clone()
    }
}

impl Default for EchoOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Orchestrator for EchoOrchestrator {
    async fn execute(&self, inputs: &OrchestratorInputs) -> Result<String> {
        self.seen.lock().unwrap().push(inputs.clone());
        match &self.fail_with {
            Some(message) => Err(WayfarerError::Orchestrator(message.clone()).into()),
            None => Ok(format!("reply to: {}", inputs.topic)),
        }
    }
}

/// In-memory session store that counts writes
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, ChatSession>>,
    saves: AtomicUsize,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save` calls received
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn ensure_available(&self) -> Result<()> {
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<ChatSession>> {
        Ok(self.sessions.lock().unwrap().get(session_id).cloned())
    }

    async fn save(&self, session: &ChatSession) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.sessions
            .lock()
            .unwrap()
            .insert(session.session_id.clone(), session.clone());
        Ok(())
    }
}

/// Connects a session store backed by a file in a fresh temporary directory
///
/// Returns the `TempDir` too so the caller keeps the directory alive.
pub async fn temp_store() -> (SqliteSessionStore, TempDir) {
    let dir = TempDir::new().expect("failed to create tempdir");
    let store = SqliteSessionStore::connect(dir.path().join("sessions.db"))
        .await
        .expect("failed to connect session store");
    (store, dir)
}
