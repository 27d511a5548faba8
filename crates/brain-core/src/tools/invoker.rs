//! HTTP invocation of registered tools
//!
//! Every failure is returned as data inside [`ToolCallResult`] so the
//! orchestrator can feed it back to the LLM instead of aborting the turn.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use super::registry::ToolRegistry;
use super::schema;
use crate::logging::Logger;

/// Default per-call timeout
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(5);

/// Why a tool call produced no payload
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    #[error("Tool request failed: {message}")]
    Http { message: String },

    #[error("Tool returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed tool response: {message}")]
    MalformedResponse { message: String },
}

impl ToolError {
    /// Short machine-readable kind, sent to the LLM next to the message
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::UnknownTool { .. } => "unknown_tool",
            ToolError::InvalidArguments { .. } => "invalid_arguments",
            ToolError::Http { .. } => "http",
            ToolError::Status { .. } => "status",
            ToolError::MalformedResponse { .. } => "malformed_response",
        }
    }
}

/// Payload or error from one tool call
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success(Value),
    Error(ToolError),
}

/// Result of one tool call, consumed by the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallResult {
    pub tool_name: String,
    pub outcome: ToolOutcome,
}

impl ToolCallResult {
    pub fn success(tool_name: impl Into<String>, payload: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            outcome: ToolOutcome::Success(payload),
        }
    }

    pub fn error(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            outcome: ToolOutcome::Error(error),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Error(_))
    }

    /// JSON string handed to the LLM: the payload itself, or `{"error", "kind"}`
    pub fn to_llm_payload(&self) -> String {
        match &self.outcome {
            ToolOutcome::Success(payload) => payload.to_string(),
            ToolOutcome::Error(e) => json!({ "error": e.to_string(), "kind": e.kind() }).to_string(),
        }
    }
}

/// Calls tools listed in a [`ToolRegistry`]
pub struct ToolInvoker {
    registry: Arc<ToolRegistry>,
    client: reqwest::Client,
    timeout: Duration,
    logger: Arc<dyn Logger>,
}

impl ToolInvoker {
    pub fn new(registry: Arc<ToolRegistry>, logger: Arc<dyn Logger>) -> Self {
        Self {
            registry,
            client: reqwest::Client::new(),
            timeout: DEFAULT_TOOL_TIMEOUT,
            logger,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Validate `arguments` and POST them to the tool's endpoint
    pub async fn invoke(&self, name: &str, arguments: Value) -> ToolCallResult {
        self.logger.info(&format!("[ToolInvoker] Calling {} with {}", name, arguments));

        let result = match self.call(name, &arguments).await {
            Ok(payload) => ToolCallResult::success(name, payload),
            Err(e) => ToolCallResult::error(name, e),
        };

        match &result.outcome {
            ToolOutcome::Success(payload) => {
                self.logger.info(&format!("[ToolInvoker] {} returned {}", name, payload))
            }
            ToolOutcome::Error(e) => self.logger.warn(&format!("[ToolInvoker] {} failed: {}", name, e)),
        }
        result
    }

    async fn call(&self, name: &str, arguments: &Value) -> Result<Value, ToolError> {
        let descriptor = self.registry.get(name).ok_or_else(|| ToolError::UnknownTool {
            name: name.to_string(),
        })?;

        schema::validate(&descriptor.input_schema, arguments)
            .map_err(|message| ToolError::InvalidArguments { message })?;

        let response = self
            .client
            .post(&descriptor.endpoint)
            .timeout(self.timeout)
            .json(arguments)
            .send()
            .await
            .map_err(|e| ToolError::Http { message: e.to_string() })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ToolError::Http { message: e.to_string() })?;

        if !status.is_success() {
            return Err(ToolError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| ToolError::MalformedResponse { message: e.to_string() })
    }
}

/// Prefer the body's `error` field, else the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::types::ToolDescriptor;
    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn margin_descriptor() -> ToolDescriptor {
        ToolDescriptor {
            name: "calculate_margin".to_string(),
            description: "Margin".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "revenue": {"type": "number"},
                    "margin_pct": {"type": "number"}
                },
                "required": ["revenue", "margin_pct"],
                "additionalProperties": false
            }),
            endpoint: "/tools/calculate_margin".to_string(),
        }
    }

    fn descriptor(name: &str, endpoint: &str) -> ToolDescriptor {
        ToolDescriptor {
            name: name.to_string(),
            description: String::new(),
            input_schema: json!({"type": "object"}),
            endpoint: endpoint.to_string(),
        }
    }

    /// Tool server whose margin endpoint counts hits
    async fn mock_tool_server(hits: Arc<AtomicUsize>) -> String {
        let router = Router::new()
            .route(
                "/tools/calculate_margin",
                post(|State(hits): State<Arc<AtomicUsize>>, Json(args): Json<Value>| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    let revenue = args["revenue"].as_f64().unwrap_or(0.0);
                    let pct = args["margin_pct"].as_f64().unwrap_or(0.0);
                    Json(json!({ "margin": revenue * pct / 100.0 }))
                }),
            )
            .route(
                "/tools/broken",
                post(|| async {
                    (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"error": "bad input"})))
                }),
            )
            .route("/tools/garbled", post(|| async { "not json" }))
            .route(
                "/tools/slow",
                post(|| async {
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    Json(json!({}))
                }),
            )
            .with_state(hits);
        serve(router).await
    }

    fn invoker_for(base: &str, descriptors: Vec<ToolDescriptor>) -> ToolInvoker {
        let logger: Arc<dyn Logger> = Arc::new(NoOpLogger);
        let registry = ToolRegistry::from_descriptors(base, descriptors, Arc::clone(&logger)).unwrap();
        ToolInvoker::new(Arc::new(registry), logger)
    }

    #[tokio::test]
    async fn test_successful_invocation() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = mock_tool_server(Arc::clone(&hits)).await;
        let invoker = invoker_for(&base, vec![margin_descriptor()]);

        let result = invoker
            .invoke("calculate_margin", json!({"revenue": 100, "margin_pct": 20}))
            .await;

        assert_eq!(result.tool_name, "calculate_margin");
        assert_eq!(result.outcome, ToolOutcome::Success(json!({"margin": 20.0})));
        assert_eq!(result.to_llm_payload(), r#"{"margin":20.0}"#);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_data() {
        let invoker = invoker_for("http://127.0.0.1:9", vec![]);
        let result = invoker.invoke("does_not_exist", json!({})).await;

        assert_eq!(result.tool_name, "does_not_exist");
        assert!(matches!(result.outcome, ToolOutcome::Error(ToolError::UnknownTool { .. })));
        let payload: Value = serde_json::from_str(&result.to_llm_payload()).unwrap();
        assert_eq!(payload["kind"], "unknown_tool");
    }

    #[tokio::test]
    async fn test_invalid_arguments_never_reach_server() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = mock_tool_server(Arc::clone(&hits)).await;
        let invoker = invoker_for(&base, vec![margin_descriptor()]);

        let result = invoker
            .invoke("calculate_margin", json!({"revenue": "lots", "margin_pct": 20}))
            .await;

        assert!(matches!(result.outcome, ToolOutcome::Error(ToolError::InvalidArguments { .. })));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_error_status_carries_error_field() {
        let base = mock_tool_server(Arc::new(AtomicUsize::new(0))).await;
        let invoker = invoker_for(&base, vec![descriptor("broken", "/tools/broken")]);

        let result = invoker.invoke("broken", json!({})).await;
        assert_eq!(
            result.outcome,
            ToolOutcome::Error(ToolError::Status {
                status: 422,
                message: "bad input".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let base = mock_tool_server(Arc::new(AtomicUsize::new(0))).await;
        let invoker = invoker_for(&base, vec![descriptor("garbled", "/tools/garbled")]);

        let result = invoker.invoke("garbled", json!({})).await;
        assert!(matches!(result.outcome, ToolOutcome::Error(ToolError::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn test_timeout_and_server_down_are_http_errors() {
        let base = mock_tool_server(Arc::new(AtomicUsize::new(0))).await;
        let invoker = invoker_for(&base, vec![descriptor("slow", "/tools/slow")])
            .with_timeout(Duration::from_millis(100));
        let result = invoker.invoke("slow", json!({})).await;
        assert!(matches!(result.outcome, ToolOutcome::Error(ToolError::Http { .. })));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let invoker = invoker_for(&format!("http://{}", addr), vec![margin_descriptor()]);
        let result = invoker
            .invoke("calculate_margin", json!({"revenue": 100, "margin_pct": 20}))
            .await;
        assert_eq!(result.tool_name, "calculate_margin");
        assert!(matches!(result.outcome, ToolOutcome::Error(ToolError::Http { .. })));
    }
}
