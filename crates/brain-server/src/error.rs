//! HTTP error responses for the chat API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use brain_core::{RegistryError, TurnError};

/// Body of every failed API call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Errors surfaced to chat clients
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Error processing message: {0}")]
    Turn(#[from] TurnError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Turn(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Turn(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", self);
        } else {
            tracing::debug!(status = status.as_u16(), "{}", self);
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

/// Startup failures that stop the brain
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Tools are required but the tool server is not usable: {0}")]
    ToolsRequired(#[source] RegistryError),
}
