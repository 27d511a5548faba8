//! API key resolution
//!
//! Keys for the LLM provider are looked up through a chain of stores:
//! an explicit key from the config file first, then process environment.

mod traits;
mod env_store;
mod memory_store;
mod chain_store;

pub use traits::SecretStore;
pub use env_store::EnvSecretStore;
pub use memory_store::MemorySecretStore;
pub use chain_store::ChainSecretStore;
