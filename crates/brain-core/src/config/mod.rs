//! Brain configuration
//!
//! Settings come from a YAML file (user-level `~/.config/tool-chat/brain.yaml`
//! or an explicit path), then command-line flags override individual fields.

mod error;
mod file;

pub use error::{ConfigError, ConfigResult};
pub use file::BrainConfig;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:8001";
pub const DEFAULT_TOOL_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_PROVIDER: &str = "anthropic";
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_MAX_TOOL_HOPS: usize = 1;
pub const DEFAULT_MAX_SESSIONS: u64 = 1_000;
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 60 * 60;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a Ross MBA assistant. Before claiming what tools you have available, \
always reference the actual tools you've been given. You have access to a dynamic set of tools - describe and use \
only what's in your tool list. Use the available tools to assist with analysis and information.";
