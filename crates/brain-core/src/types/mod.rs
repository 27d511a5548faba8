//! Core types for LLM interactions
//!
//! Messages, tool definitions and streamed completion chunks shared by the
//! providers, the tool layer and the orchestrator.

mod message;
mod tool;
mod stream;

pub use message::{ChatMessage, ContentPart, MessageRole, MessageContent};
pub use tool::{Tool, ToolCall, ToolDescriptor};
pub use stream::{StreamChunk, Completion, CompletionBuilder};
