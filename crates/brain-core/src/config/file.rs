//! File-based brain configuration (YAML)

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use super::{
    DEFAULT_LISTEN, DEFAULT_MAX_SESSIONS, DEFAULT_MAX_TOKENS, DEFAULT_MAX_TOOL_HOPS, DEFAULT_MODEL,
    DEFAULT_PROVIDER, DEFAULT_SESSION_IDLE_SECS, DEFAULT_SYSTEM_PROMPT, DEFAULT_TOOL_TIMEOUT_SECS,
    DEFAULT_TOOL_URL,
};
use crate::orchestrator::OrchestratorConfig;
use crate::providers::ProviderModelConfig;
use crate::session::SessionStore;

/// Everything the brain process needs to start
///
/// Missing fields take their defaults, so an empty file is a valid config.
///
/// ```yaml
/// listen: 0.0.0.0:8001
/// tool_url: http://127.0.0.1:8000
/// provider: anthropic
/// model: claude-3-haiku-20240307
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrainConfig {
    /// Address the chat server binds to
    pub listen: String,
    /// Base URL of the tool server
    pub tool_url: String,
    /// Exit at startup instead of running without tools when the tool server is down
    pub require_tools: bool,
    pub tool_timeout_secs: u64,
    /// LLM provider id, e.g. "anthropic", "openai", "ollama", "mock"
    pub provider: String,
    pub model: String,
    /// Falls back to the provider's environment variable when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub max_tool_hops: usize,
    pub system_prompt: String,
    /// Sessions kept in memory at once
    pub max_sessions: u64,
    /// Seconds of inactivity before a session is dropped
    pub session_idle_secs: u64,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
            tool_url: DEFAULT_TOOL_URL.to_string(),
            require_tools: false,
            tool_timeout_secs: DEFAULT_TOOL_TIMEOUT_SECS,
            provider: DEFAULT_PROVIDER.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            api_base: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
            max_tool_hops: DEFAULT_MAX_TOOL_HOPS,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_sessions: DEFAULT_MAX_SESSIONS,
            session_idle_secs: DEFAULT_SESSION_IDLE_SECS,
        }
    }
}

impl BrainConfig {
    /// User-level config path (~/.config/tool-chat/brain.yaml)
    pub fn default_path() -> PathBuf {
        // XDG config directory on Linux, ~/Library/Application Support on macOS
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        config_dir.join("tool-chat").join("brain.yaml")
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config: BrainConfig = if content.trim().is_empty() {
            BrainConfig::default()
        } else {
            serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise use defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the config as YAML, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = serde_yaml::to_string(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        fs::write(path, content).map_err(io_err)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.listen.trim().is_empty() {
            return Err(ConfigError::Invalid("listen address is empty".to_string()));
        }
        if !(self.tool_url.starts_with("http://") || self.tool_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "tool_url must be an http(s) URL, got '{}'",
                self.tool_url
            )));
        }
        if self.provider.trim().is_empty() || self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("provider and model are required".to_string()));
        }
        if self.tool_timeout_secs == 0 {
            return Err(ConfigError::Invalid("tool_timeout_secs must be at least 1".to_string()));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::Invalid("max_tokens must be at least 1".to_string()));
        }
        if self.max_sessions == 0 || self.session_idle_secs == 0 {
            return Err(ConfigError::Invalid(
                "max_sessions and session_idle_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    /// Model settings for provider calls
    pub fn model_config(&self) -> ProviderModelConfig {
        let mut model = ProviderModelConfig::new(self.model.clone());
        if let Some(key) = &self.api_key {
            model = model.with_api_key(key.clone());
        }
        if let Some(base) = &self.api_base {
            model = model.with_api_base(base.clone());
        }
        model
    }

    /// Empty session store sized by `max_sessions` and `session_idle_secs`
    pub fn session_store(&self) -> SessionStore {
        SessionStore::with_limits(self.max_sessions, Duration::from_secs(self.session_idle_secs))
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            system_prompt: self.system_prompt.clone(),
            model: self.model_config(),
            max_tokens: Some(self.max_tokens),
            temperature: self.temperature,
            max_tool_hops: self.max_tool_hops,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("brain.yaml");
        fs::write(&path, "provider: openai\nmodel: gpt-4o-mini\nmax_tool_hops: 2\n").unwrap();

        let config = BrainConfig::load(&path).unwrap();
        assert_eq!(config.provider, "openai");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tool_hops, 2);
        assert_eq!(config.listen, DEFAULT_LISTEN);
        assert_eq!(config.tool_timeout(), Duration::from_secs(5));
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_missing_and_empty_files() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(matches!(BrainConfig::load(&missing), Err(ConfigError::Io { .. })));
        assert_eq!(BrainConfig::load_or_default(&missing).unwrap(), BrainConfig::default());

        let empty = dir.path().join("empty.yaml");
        fs::write(&empty, "").unwrap();
        assert_eq!(BrainConfig::load(&empty).unwrap(), BrainConfig::default());
    }

    #[test]
    fn test_invalid_files() {
        let dir = tempdir().unwrap();
        let garbled = dir.path().join("garbled.yaml");
        fs::write(&garbled, "max_tokens: [not, a, number]").unwrap();
        assert!(matches!(BrainConfig::load(&garbled), Err(ConfigError::Parse { .. })));

        let bad_url = dir.path().join("bad_url.yaml");
        fs::write(&bad_url, "tool_url: localhost:8000").unwrap();
        assert!(matches!(BrainConfig::load(&bad_url), Err(ConfigError::Invalid(_))));

        let no_sessions = dir.path().join("no_sessions.yaml");
        fs::write(&no_sessions, "max_sessions: 0").unwrap();
        assert!(matches!(BrainConfig::load(&no_sessions), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_save_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("brain.yaml");
        let config = BrainConfig {
            api_key: Some("sk-test".to_string()),
            ..BrainConfig::default()
        };

        config.save(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("claude-3-haiku-20240307"));
        assert_eq!(BrainConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_orchestrator_config() {
        let config = BrainConfig {
            api_base: Some("http://localhost:11434".to_string()),
            temperature: Some(0.2),
            ..BrainConfig::default()
        };
        let orch = config.orchestrator_config();
        assert_eq!(orch.max_tokens, Some(1024));
        assert_eq!(orch.max_tool_hops, 1);
        assert_eq!(orch.model.model, DEFAULT_MODEL);
        assert_eq!(orch.model.api_base.as_deref(), Some("http://localhost:11434"));
        assert!(orch.model.api_key.is_none());
    }

    #[test]
    fn test_default_path() {
        let path = BrainConfig::default_path();
        assert!(path.ends_with("tool-chat/brain.yaml"));
    }
}
