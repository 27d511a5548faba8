//! Logging abstractions
//!
//! Components take an `Arc<dyn Logger>` so tests can stay silent while the
//! binaries route everything through `tracing`.

mod traits;
mod noop;
mod tracing_logger;

pub use traits::Logger;
pub use noop::NoOpLogger;
pub use tracing_logger::TracingLogger;
