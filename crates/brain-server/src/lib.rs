//! Brain Server
//!
//! HTTP front end for the conversation orchestrator:
//!
//! | route | purpose |
//! |-------|---------|
//! | `GET /` | chat UI |
//! | `POST /api/chat` | `{content}` → `{response}` or `{error}` |
//! | `POST /api/reset` | clear the session transcript |
//! | `GET /api/history` | user and assistant messages of the session |
//! | `GET /api/tools` | discovered tools and registry status |
//! | `GET /health` | liveness check |
//!
//! Sessions are chosen with the `x-session-id` header.

pub mod api;
pub mod cli;
pub mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use brain_core::{
    BrainConfig, Logger, Orchestrator, Provider, RegistryStatus, SessionStore, ToolInvoker, ToolRegistry,
};

pub use error::{ApiError, StartupError};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>, sessions: SessionStore) -> Self {
        Self {
            orchestrator,
            sessions: Arc::new(sessions),
        }
    }
}

/// Discover tools and wire the orchestrator.
///
/// An unusable tool server leaves the brain in degraded mode (no tools)
/// unless `require_tools` is set, in which case startup fails.
pub async fn build_state(
    config: &BrainConfig,
    provider: Arc<dyn Provider>,
    logger: Arc<dyn Logger>,
) -> Result<AppState, StartupError> {
    let registry = Arc::new(ToolRegistry::new(config.tool_url.clone(), Arc::clone(&logger)));

    if let Err(e) = registry.refresh().await {
        if config.require_tools {
            return Err(StartupError::ToolsRequired(e));
        }
        tracing::error!("Running without tools (degraded mode): {}", e);
    }

    let invoker = Arc::new(
        ToolInvoker::new(Arc::clone(&registry), Arc::clone(&logger)).with_timeout(config.tool_timeout()),
    );
    let provider_name = provider.name().to_string();
    let orchestrator = Orchestrator::new(provider, invoker, config.orchestrator_config(), logger);

    if let RegistryStatus::Ready { count } = registry.status() {
        tracing::info!(
            "Brain ready: provider={} model={} tools={}",
            provider_name,
            config.model,
            count
        );
    }

    Ok(AppState::new(Arc::new(orchestrator), config.session_store()))
}

/// Build the chat router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/health", get(api::health))
        .route("/api/chat", post(api::chat))
        .route("/api/reset", post(api::reset))
        .route("/api/history", get(api::history))
        .route("/api/tools", get(api::tools))
        .with_state(state)
}

/// Serve on an already-bound listener until the server stops
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Brain listening on http://{}", addr);
    }
    axum::serve(listener, router(state)).await
}

/// Bind an ephemeral local port and serve in the background; returns the bound address
pub async fn spawn(state: AppState) -> std::io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = serve(listener, state).await {
            tracing::error!("brain server stopped: {}", e);
        }
    });
    Ok(addr)
}
