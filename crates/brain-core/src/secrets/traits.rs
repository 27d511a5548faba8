//! Secret store trait

/// Read access to secrets keyed by provider name or raw variable name
///
/// # Example
///
/// ```
/// use brain_core::secrets::{SecretStore, EnvSecretStore};
///
/// let store = EnvSecretStore::new();
/// // store.get("anthropic") checks ANTHROPIC_API_KEY
/// let _ = store.get("anthropic");
/// ```
pub trait SecretStore: Send + Sync {
    /// Human-readable name of this store
    fn name(&self) -> &str;

    /// Retrieve a secret by key
    ///
    /// The key can be a provider name (e.g. "anthropic") or a direct
    /// variable name (e.g. "ANTHROPIC_API_KEY").
    fn get(&self, key: &str) -> Option<String>;

    /// Check if a secret exists
    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}
