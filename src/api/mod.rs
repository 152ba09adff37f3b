//! HTTP API
//!
//! A thin axum surface over [`ChatService`]:
//!
//! - `POST /chat` runs one chat cycle
//! - `GET /` and `GET /health` answer liveness probes

mod error;

pub use error::ApiError;

use crate::chat::ChatService;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub chat: ChatService,
}

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Existing session to continue; omitted or blank starts a new one
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: String,
}

/// Reply of `POST /chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub response: String,
    pub history_summary: String,
}

/// Builds the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/chat", post(chat))
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "API is running..." }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let reply = state.chat.handle(request.session_id, request.message).await?;

    Ok(Json(ChatResponse {
        session_id: reply.session_id,
        response: reply.response,
        history_summary: reply.summary,
    }))
}
