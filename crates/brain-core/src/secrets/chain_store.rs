//! Chained secret store with fallback behavior

use std::sync::Arc;

use super::traits::SecretStore;

/// Tries each store in order and returns the first match
///
/// ```
/// use brain_core::secrets::{SecretStore, ChainSecretStore, EnvSecretStore, MemorySecretStore};
/// use std::sync::Arc;
///
/// let explicit = Arc::new(MemorySecretStore::new());
/// explicit.insert("anthropic", "sk-from-config");
///
/// let chain = ChainSecretStore::new(vec![explicit, Arc::new(EnvSecretStore::new())]);
/// assert_eq!(chain.get("anthropic"), Some("sk-from-config".to_string()));
/// ```
pub struct ChainSecretStore {
    stores: Vec<Arc<dyn SecretStore>>,
}

impl ChainSecretStore {
    pub fn new(stores: Vec<Arc<dyn SecretStore>>) -> Self {
        Self { stores }
    }

    /// Config-provided key first, then environment
    pub fn with_explicit_key(provider: &str, api_key: Option<&str>) -> Self {
        let explicit = super::MemorySecretStore::new();
        if let Some(key) = api_key {
            explicit.insert(provider.to_lowercase(), key);
        }
        Self::new(vec![Arc::new(explicit), Arc::new(super::EnvSecretStore::new())])
    }

    /// Name of the first store holding `key`
    pub fn find_store(&self, key: &str) -> Option<&str> {
        self.stores.iter().find(|s| s.has(key)).map(|s| s.name())
    }
}

impl SecretStore for ChainSecretStore {
    fn name(&self) -> &str {
        "chain"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.stores.iter().find_map(|s| s.get(key))
    }
}

impl std::fmt::Debug for ChainSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainSecretStore")
            .field("stores", &self.stores.iter().map(|s| s.name()).collect::<Vec<_>>())
            .finish()
    }
}
