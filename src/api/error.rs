//! HTTP error mapping

use crate::error::WayfarerError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

/// Error returned by API handlers
///
/// Wraps the handler's `anyhow::Error` and picks the status from the
/// [`WayfarerError`] found in its chain. The body is `{"detail": ...}`.
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_and_detail(&self) -> (StatusCode, String) {
        let hidden = (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal server error".to_string(),
        );

        let Some(err) = WayfarerError::classify(&self.0) else {
            return hidden;
        };

        match err {
            WayfarerError::StoreUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, err.to_string()),
            WayfarerError::Orchestrator(_) | WayfarerError::Storage(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            _ => hidden,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();
        error!(status = status.as_u16(), error = %self.0, "Chat request failed");
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
