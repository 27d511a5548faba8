//! Business term lookup over the glossary index

use std::sync::Arc;

use axum::{extract::State, Json};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ToolArgs, ToolResult, ToolServerError};
use crate::rag::{QueryResult, DEFAULT_TOP_K};
use crate::AppState;

/// Largest `top_k` accepted
pub const MAX_TOP_K: usize = 10;

/// Arguments for `lookup_business_term`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LookupArgs {
    /// Business term or question to look up, e.g. "EBITDA"
    pub query: String,
    /// Number of results to return (1 to 10, default 3)
    #[serde(default)]
    pub top_k: Option<usize>,
}

pub async fn handler(
    State(state): State<AppState>,
    ToolArgs(args): ToolArgs<LookupArgs>,
) -> ToolResult<Json<QueryResult>> {
    let query = args.query.trim();
    if query.is_empty() {
        return Err(ToolServerError::invalid("query must not be empty"));
    }

    let top_k = args.top_k.unwrap_or(DEFAULT_TOP_K);
    if top_k == 0 || top_k > MAX_TOP_K {
        return Err(ToolServerError::invalid(format!(
            "top_k must be between 1 and {}",
            MAX_TOP_K
        )));
    }

    let glossary = Arc::clone(&state.glossary);
    let text = query.to_string();
    let result = tokio::task::spawn_blocking(move || glossary.query(&text, top_k))
        .await
        .map_err(|e| ToolServerError::Internal(format!("glossary task failed: {}", e)))??;

    tracing::info!(query, top_k, hits = result.results.len(), source = ?result.source, "glossary lookup");
    Ok(Json(result))
}
