//! Tool Server
//!
//! A small HTTP service exposing tools to the brain:
//!
//! | route | purpose |
//! |-------|---------|
//! | `GET /tools` | discovery listing with input schemas |
//! | `POST /tools/calculate_margin` | margin from revenue and percentage |
//! | `POST /tools/get_weather` | deterministic weather stub |
//! | `POST /tools/lookup_business_term` | glossary retrieval |
//! | `GET /`, `/health`, `/hello` | health checks |

pub mod error;
pub mod rag;
pub mod tools;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::Uri,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::error::ToolServerError;
use crate::rag::Glossary;
use crate::tools::ToolListing;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub glossary: Arc<Glossary>,
}

impl AppState {
    pub fn new(glossary: Glossary) -> Self {
        Self {
            glossary: Arc::new(glossary),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Glossary::default())
    }
}

/// Build the tool server router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/hello", get(hello))
        .route("/tools", get(list_tools))
        .route("/tools/calculate_margin", post(tools::margin::handler))
        .route("/tools/get_weather", post(tools::weather::handler))
        .route("/tools/lookup_business_term", post(tools::glossary::handler))
        .fallback(not_found)
        .with_state(state)
}

/// Serve on an already-bound listener until the server stops
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Tool server listening on http://{}", addr);
    }
    axum::serve(listener, router(state)).await
}

/// Bind an ephemeral local port and serve in the background; returns the bound address
pub async fn spawn(state: AppState) -> std::io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = serve(listener, state).await {
            tracing::error!("tool server stopped: {}", e);
        }
    });
    Ok(addr)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Tool Server Online" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn hello() -> Json<Value> {
    Json(json!({ "value": 90, "status": "success" }))
}

async fn list_tools() -> Json<ToolListing> {
    Json(ToolListing {
        tools: tools::descriptors(),
    })
}

async fn not_found(uri: Uri) -> ToolServerError {
    ToolServerError::NotFound(uri.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    async fn base_url() -> String {
        let addr = spawn(AppState::default()).await.unwrap();
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_health_routes() {
        let base = base_url().await;
        let client = reqwest::Client::new();

        let root: Value = client.get(&base).send().await.unwrap().json().await.unwrap();
        assert_eq!(root["message"], "Tool Server Online");

        let health: Value = client.get(format!("{}/health", base)).send().await.unwrap().json().await.unwrap();
        assert_eq!(health, json!({"status": "ok"}));

        let hello: Value = client.get(format!("{}/hello", base)).send().await.unwrap().json().await.unwrap();
        assert_eq!(hello, json!({"value": 90, "status": "success"}));
    }

    #[tokio::test]
    async fn test_listing() {
        let base = base_url().await;
        let listing: ToolListing = reqwest::get(format!("{}/tools", base)).await.unwrap().json().await.unwrap();
        assert_eq!(listing.tools.len(), 3);
        assert_eq!(listing.tools[0].endpoint, "/tools/calculate_margin");
    }

    #[tokio::test]
    async fn test_calculate_margin() {
        let base = base_url().await;
        let client = reqwest::Client::new();
        let url = format!("{}/tools/calculate_margin", base);

        let ok = client
            .post(&url)
            .json(&json!({"revenue": 100, "margin_pct": 20}))
            .send()
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);
        let body: Value = ok.json().await.unwrap();
        assert_eq!(body, json!({"margin": 20.0}));

        let out_of_range = client
            .post(&url)
            .json(&json!({"revenue": 100, "margin_pct": 150}))
            .send()
            .await
            .unwrap();
        assert_eq!(out_of_range.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = out_of_range.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("margin_pct"));

        let unknown_field = client
            .post(&url)
            .json(&json!({"revenue": 100, "margin_pct": 20, "tax": 1}))
            .send()
            .await
            .unwrap();
        assert_eq!(unknown_field.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = unknown_field.json().await.unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_weather_and_lookup() {
        let base = base_url().await;
        let client = reqwest::Client::new();

        let weather: Value = client
            .post(format!("{}/tools/get_weather", base))
            .json(&json!({"location": "Ann Arbor", "units": "imperial"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(weather["location"], "Ann Arbor");
        assert_eq!(weather["units"], "imperial");
        assert!(weather["temperature"].is_number());

        let lookup: Value = client
            .post(format!("{}/tools/lookup_business_term", base))
            .json(&json!({"query": "EBITDA"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(lookup["source"], "fallback");
        assert_eq!(lookup["results"][0]["term"], "EBITDA");

        let bad_top_k = client
            .post(format!("{}/tools/lookup_business_term", base))
            .json(&json!({"query": "EBITDA", "top_k": 0}))
            .send()
            .await
            .unwrap();
        assert_eq!(bad_top_k.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_404() {
        let base = base_url().await;
        let response = reqwest::Client::new()
            .post(format!("{}/tools/launch_rockets", base))
            .json(&json!({}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("launch_rockets"));
    }
}
