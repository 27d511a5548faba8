//! Tool discovery and invocation
//!
//! ```text
//! ┌──────────────────────────────┐
//! │  ToolRegistry                │  GET {tool_url}/tools
//! │  - caches ToolDescriptors    │ ─────────────────────────┐
//! │  - Ready / Degraded status   │                          │
//! └──────────────────────────────┘                          ▼
//!           │                                   ┌────────────────────┐
//!           ▼                                   │  Tool server       │
//! ┌──────────────────────────────┐  POST JSON   │  /tools/<name>     │
//! │  ToolInvoker                 │ ───────────▶ │                    │
//! │  - strict schema validation  │              └────────────────────┘
//! │  - errors returned as data   │
//! └──────────────────────────────┘
//! ```

mod invoker;
mod registry;
pub mod schema;

pub use invoker::{ToolCallResult, ToolError, ToolInvoker, ToolOutcome, DEFAULT_TOOL_TIMEOUT};
pub use registry::{RegistryError, RegistryStatus, ToolRegistry};
