use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use wayfarer::error::{Result, WayfarerError};
use wayfarer::orchestrator::{Orchestrator, OrchestratorInputs};
use wayfarer::providers::{CompletionResponse, Message, Provider};
use wayfarer::session::{RollingSummarizer, SessionWindow};
use wayfarer::storage::{SessionStore, SqliteSessionStore};
use wayfarer::ChatService;

#[allow(dead_code)]
pub async fn create_temp_store() -> (SqliteSessionStore, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let db_path = tmp.path().join("sessions.db");
    let store = SqliteSessionStore::connect(db_path)
        .await
        .expect("failed to connect sqlite session store");
    (store, tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Summary provider that numbers its summaries and records each prompt
#[allow(dead_code)]
#[derive(Default)]
pub struct CountingSummaryProvider {
    prompts: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl CountingSummaryProvider {
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for CountingSummaryProvider {
    async fn complete(&self, messages: &[Message]) -> Result<CompletionResponse> {
        let mut prompts = self.prompts.lock().unwrap();
        prompts.push(messages[0].content.clone());
        Ok(CompletionResponse::new(Message::assistant(format!(
            "summary #{}",
            prompts.len()
        ))))
    }

    fn model(&self) -> String {
        "counting".to_string()
    }
}

/// Orchestrator that answers `ok: {topic}`, failing for topics starting with `fail`
#[allow(dead_code)]
pub struct TopicOrchestrator;

#[async_trait]
impl Orchestrator for TopicOrchestrator {
    async fn execute(&self, inputs: &OrchestratorInputs) -> Result<String> {
        if inputs.topic.starts_with("fail") {
            return Err(WayfarerError::Orchestrator("crew refused".to_string()).into());
        }
        Ok(format!("ok: {}", inputs.topic))
    }
}

#[allow(dead_code)]
pub fn chat_service(
    store: Arc<dyn SessionStore>,
    summary_provider: Arc<dyn Provider>,
    max_recent_messages: usize,
) -> ChatService {
    ChatService::new(
        store,
        Arc::new(TopicOrchestrator),
        SessionWindow::new(max_recent_messages, RollingSummarizer::new(summary_provider))
            .expect("valid window size"),
    )
}
