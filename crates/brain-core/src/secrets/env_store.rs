//! Environment variable secret store

use std::collections::HashMap;
use std::env;

use once_cell::sync::Lazy;

use super::traits::SecretStore;

/// Mapping from provider names to environment variable names
static ENV_VAR_MAP: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("anthropic", vec!["ANTHROPIC_API_KEY"]);
    m.insert("openai", vec!["OPENAI_API_KEY"]);
    m.insert("gemini", vec!["GEMINI_API_KEY", "GOOGLE_API_KEY"]);
    m.insert("groq", vec!["GROQ_API_KEY"]);
    m.insert("deepseek", vec!["DEEPSEEK_API_KEY"]);
    m.insert("xai", vec!["XAI_API_KEY"]);
    m.insert("ollama", vec![]); // Ollama doesn't need an API key
    m
});

/// Read-only secret store backed by the process environment
///
/// Provider names map to their conventional variables (`anthropic` →
/// `ANTHROPIC_API_KEY`); anything else is tried verbatim and then as
/// `<KEY>_API_KEY`.
#[derive(Debug, Default)]
pub struct EnvSecretStore {
    _private: (),
}

impl EnvSecretStore {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Get the environment variable names for a provider
    pub fn env_vars_for_provider(provider: &str) -> Option<&'static [&'static str]> {
        ENV_VAR_MAP.get(provider.to_lowercase().as_str()).map(|v| v.as_slice())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

impl SecretStore for EnvSecretStore {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = non_empty_var(key) {
            return Some(value);
        }

        if let Some(vars) = Self::env_vars_for_provider(key) {
            if let Some(value) = vars.iter().find_map(|v| non_empty_var(v)) {
                return Some(value);
            }
        }

        non_empty_var(&format!("{}_API_KEY", key.to_uppercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_store_get_direct() {
        env::set_var("BRAIN_TEST_SECRET_12345", "test_value");

        let store = EnvSecretStore::new();
        assert_eq!(store.get("BRAIN_TEST_SECRET_12345"), Some("test_value".to_string()));

        env::remove_var("BRAIN_TEST_SECRET_12345");
    }

    #[test]
    fn test_env_store_get_mapped() {
        env::set_var("XAI_API_KEY", "xai-test");

        let store = EnvSecretStore::new();
        assert_eq!(store.get("xai"), Some("xai-test".to_string()));
        assert_eq!(store.get("XAI"), Some("xai-test".to_string()));

        env::remove_var("XAI_API_KEY");
    }

    #[test]
    fn test_env_store_suffix_fallback() {
        env::set_var("BRAINTESTPROVIDER_API_KEY", "k");

        let store = EnvSecretStore::new();
        assert_eq!(store.get("braintestprovider"), Some("k".to_string()));

        env::remove_var("BRAINTESTPROVIDER_API_KEY");
    }

    #[test]
    fn test_env_store_not_found() {
        let store = EnvSecretStore::new();
        assert_eq!(store.get("nonexistent_provider_xyz"), None);
        assert!(!store.has("nonexistent_provider_xyz"));
        assert_eq!(store.name(), "env");
    }
}
