//! Brain Core
//!
//! The conversation engine behind the chat server: LLM providers, tool
//! discovery and invocation, sessions and the turn orchestrator.
//!
//! ## Turn flow
//!
//! The orchestrator sends the transcript and the registry's tools to the LLM.
//! If the model asks for a tool, the invoker POSTs the arguments to the tool
//! server and the JSON result is replayed to the LLM as a `tool` message
//! before the final reply is produced.
//!
//! ```rust,ignore
//! use brain_core::{Orchestrator, ToolInvoker, ToolRegistry, SessionStore};
//!
//! let registry = Arc::new(ToolRegistry::new("http://127.0.0.1:8000", logger.clone()));
//! registry.refresh().await?;
//!
//! let invoker = Arc::new(ToolInvoker::new(registry, logger.clone()));
//! let orchestrator = Orchestrator::new(provider, invoker, config, logger);
//!
//! let sessions = SessionStore::new();
//! let outcome = orchestrator.chat(&sessions.get_or_create("default"), "What is 20% margin on $100?").await?;
//! println!("{}", outcome.reply);
//! ```

pub mod types;
pub mod secrets;
pub mod logging;
pub mod config;
pub mod providers;
pub mod tools;
pub mod session;
pub mod orchestrator;

// Re-export commonly used types
pub use types::{
    ChatMessage, ContentPart, MessageRole, MessageContent,
    Tool, ToolCall, ToolDescriptor,
    StreamChunk, Completion,
};

pub use secrets::{SecretStore, EnvSecretStore, MemorySecretStore, ChainSecretStore};

pub use logging::{Logger, NoOpLogger, TracingLogger};

pub use config::{BrainConfig, ConfigError};

pub use providers::{create_provider, Provider, ProviderError, ProviderModelConfig, MockProvider, MockStep};

pub use tools::{
    RegistryError, RegistryStatus, ToolCallResult, ToolError, ToolInvoker, ToolOutcome, ToolRegistry,
};

pub use session::{HistoryEntry, Session, SessionHandle, SessionStore, DEFAULT_SESSION_ID};

pub use orchestrator::{Orchestrator, OrchestratorConfig, TurnError, TurnOutcome};
