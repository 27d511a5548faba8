//! Tool server errors and the argument extractor

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::rag::GlossaryError;

/// Errors returned to tool callers as `{"error": "..."}`
#[derive(Debug, thiserror::Error)]
pub enum ToolServerError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ToolServerError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ToolServerError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ToolServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ToolServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ToolServerError {
    fn into_response(self) -> Response {
        tracing::warn!(status = self.status().as_u16(), "{}", self);
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<GlossaryError> for ToolServerError {
    fn from(e: GlossaryError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<JsonRejection> for ToolServerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}

/// JSON tool arguments; malformed bodies become 422 `{"error"}` responses
#[derive(Debug)]
pub struct ToolArgs<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ToolArgs<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ToolServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(args) = Json::<T>::from_request(req, state).await?;
        Ok(ToolArgs(args))
    }
}

pub type ToolResult<T> = Result<T, ToolServerError>;
