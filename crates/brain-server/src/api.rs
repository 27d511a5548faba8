//! Chat API handlers
//!
//! Only natural-language text crosses this boundary: tool calls and their
//! JSON results stay in the session transcript and the logs.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use brain_core::{HistoryEntry, RegistryStatus, DEFAULT_SESSION_ID};

use crate::error::ApiError;
use crate::AppState;

/// Header naming the conversation; absent means the shared default session
pub const SESSION_HEADER: &str = "x-session-id";

const MAX_SESSION_ID_LEN: usize = 128;

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub messages: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSummary {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsResponse {
    pub status: RegistryStatus,
    pub tools: Vec<ToolSummary>,
}

/// Session id from the request headers
pub fn session_id(headers: &HeaderMap) -> Result<String, ApiError> {
    let Some(value) = headers.get(SESSION_HEADER) else {
        return Ok(DEFAULT_SESSION_ID.to_string());
    };

    let id = value
        .to_str()
        .map_err(|_| ApiError::BadRequest(format!("{} must be visible ASCII", SESSION_HEADER)))?
        .trim();

    if id.is_empty() {
        Ok(DEFAULT_SESSION_ID.to_string())
    } else if id.len() > MAX_SESSION_ID_LEN {
        Err(ApiError::BadRequest(format!(
            "{} longer than {} characters",
            SESSION_HEADER, MAX_SESSION_ID_LEN
        )))
    } else {
        Ok(id.to_string())
    }
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let id = session_id(&headers)?;

    let session = state.sessions.get_or_create(&id);
    let outcome = state.orchestrator.chat(&session, &request.content).await?;

    for result in &outcome.tool_results {
        tracing::info!(session = %id, tool = %result.tool_name, payload = %result.to_llm_payload(), "tool call");
    }

    Ok(Json(ChatResponse {
        response: outcome.reply,
    }))
}

pub async fn reset(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Value>, ApiError> {
    let id = session_id(&headers)?;
    state.sessions.reset(&id).await;
    tracing::info!(session = %id, "session reset");
    Ok(Json(json!({ "status": "reset" })))
}

pub async fn history(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<HistoryResponse>, ApiError> {
    let id = session_id(&headers)?;
    let messages = match state.sessions.get(&id) {
        Some(session) => session.lock().await.visible_history(),
        None => Vec::new(),
    };
    Ok(Json(HistoryResponse { messages }))
}

pub async fn tools(State(state): State<AppState>) -> Json<ToolsResponse> {
    let registry = state.orchestrator.invoker().registry();
    Json(ToolsResponse {
        status: registry.status(),
        tools: registry
            .list_tools()
            .into_iter()
            .map(|t| ToolSummary {
                name: t.name,
                description: t.description,
            })
            .collect(),
    })
}
