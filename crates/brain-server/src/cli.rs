//! Command-line interface for the `brain` binary
//!
//! Flags (and their environment variables) override the YAML config file.

use std::path::PathBuf;

use clap::Parser;

use brain_core::{BrainConfig, ConfigError};

#[derive(Debug, Parser)]
#[command(name = "brain", version, about = "Chat server that lets an LLM call HTTP tools")]
pub struct Cli {
    /// Config file (default: ~/.config/tool-chat/brain.yaml, if present)
    #[arg(long, short, env = "BRAIN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "BRAIN_LISTEN")]
    pub listen: Option<String>,

    /// Tool server base URL
    #[arg(long, env = "TOOL_URL")]
    pub tool_url: Option<String>,

    /// LLM provider (anthropic, openai, ollama, mock, ...)
    #[arg(long, env = "BRAIN_PROVIDER")]
    pub provider: Option<String>,

    /// Model name as the provider expects it
    #[arg(long, env = "BRAIN_MODEL")]
    pub model: Option<String>,

    /// Custom API base URL for the provider
    #[arg(long, env = "BRAIN_API_BASE")]
    pub api_base: Option<String>,

    /// Maximum tokens per LLM reply
    #[arg(long, env = "BRAIN_MAX_TOKENS")]
    pub max_tokens: Option<u32>,

    /// Tool calls allowed per turn
    #[arg(long, env = "BRAIN_MAX_TOOL_HOPS")]
    pub max_tool_hops: Option<usize>,

    /// Per-call tool timeout in seconds
    #[arg(long, env = "BRAIN_TOOL_TIMEOUT")]
    pub tool_timeout_secs: Option<u64>,

    /// Exit at startup if the tool server cannot be reached
    #[arg(long, env = "BRAIN_REQUIRE_TOOLS")]
    pub require_tools: bool,

    /// Write the resolved configuration to the config path and exit
    #[arg(long)]
    pub init_config: bool,
}

impl Cli {
    /// Path the config is read from (and written to by `--init-config`)
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(BrainConfig::default_path)
    }

    /// Load the config file and apply flag overrides
    pub fn resolve_config(&self) -> Result<BrainConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) if !self.init_config => BrainConfig::load(path)?,
            _ => BrainConfig::load_or_default(self.config_path())?,
        };
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut BrainConfig) {
        if let Some(listen) = &self.listen {
            config.listen = listen.clone();
        }
        if let Some(url) = &self.tool_url {
            config.tool_url = url.clone();
        }
        if let Some(provider) = &self.provider {
            config.provider = provider.clone();
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(base) = &self.api_base {
            config.api_base = Some(base.clone());
        }
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = max_tokens;
        }
        if let Some(hops) = self.max_tool_hops {
            config.max_tool_hops = hops;
        }
        if let Some(secs) = self.tool_timeout_secs {
            config.tool_timeout_secs = secs;
        }
        if self.require_tools {
            config.require_tools = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_flags_override_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("brain.yaml");
        fs::write(&path, "provider: openai\nmodel: gpt-4o-mini\nlisten: 127.0.0.1:9001\n").unwrap();

        let cli = Cli::try_parse_from([
            "brain",
            "--config",
            path.to_str().unwrap(),
            "--model",
            "gpt-4o",
            "--tool-url",
            "http://tools:8000",
            "--require-tools",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.provider, "openai");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.listen, "127.0.0.1:9001");
        assert_eq!(config.tool_url, "http://tools:8000");
        assert!(config.require_tools);
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.yaml");
        let cli = Cli::try_parse_from(["brain", "--config", path.to_str().unwrap()]).unwrap();
        assert!(matches!(cli.resolve_config(), Err(ConfigError::Io { .. })));

        // --init-config starts from defaults instead
        let cli = Cli::try_parse_from(["brain", "--config", path.to_str().unwrap(), "--init-config"]).unwrap();
        assert_eq!(cli.resolve_config().unwrap().provider, "anthropic");
    }

    #[test]
    fn test_invalid_override_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("brain.yaml");
        fs::write(&path, "").unwrap();
        let cli = Cli::try_parse_from([
            "brain",
            "--config",
            path.to_str().unwrap(),
            "--tool-timeout-secs",
            "0",
        ])
        .unwrap();
        assert!(matches!(cli.resolve_config(), Err(ConfigError::Invalid(_))));
    }
}
