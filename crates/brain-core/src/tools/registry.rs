//! Tool registry backed by a tool server's discovery endpoint
//!
//! The registry fetches `GET {base_url}/tools` and caches the descriptors.
//! When the server cannot be reached the registry stays empty and reports
//! itself as degraded, so chats keep working without tools.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::logging::Logger;
use crate::types::{Tool, ToolDescriptor};

const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors while fetching the tool listing
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    #[error("Tool server unreachable at {url}: {message}")]
    Unreachable { url: String, message: String },

    #[error("Tool server returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid tool listing: {0}")]
    InvalidListing(String),
}

/// Whether the registry holds a usable listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RegistryStatus {
    /// Listing fetched
    Ready { count: usize },
    /// No tools available; chats run without tool use
    Degraded { reason: String },
}

impl RegistryStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, RegistryStatus::Ready { .. })
    }
}

#[derive(Debug, Deserialize)]
struct ToolListing {
    tools: Vec<ToolDescriptor>,
}

/// Cached tool descriptors from one tool server
pub struct ToolRegistry {
    base_url: String,
    client: reqwest::Client,
    tools: RwLock<Vec<ToolDescriptor>>,
    status: RwLock<RegistryStatus>,
    logger: Arc<dyn Logger>,
}

impl ToolRegistry {
    /// Create an empty registry for the tool server at `base_url`
    pub fn new(base_url: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::with_client(base_url, reqwest::Client::new(), logger)
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client, logger: Arc<dyn Logger>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            tools: RwLock::new(Vec::new()),
            status: RwLock::new(RegistryStatus::Degraded {
                reason: "tools not fetched yet".to_string(),
            }),
            logger,
        }
    }

    /// Create a registry from a known listing, without any network access
    pub fn from_descriptors(
        base_url: impl Into<String>,
        descriptors: Vec<ToolDescriptor>,
        logger: Arc<dyn Logger>,
    ) -> Result<Self, RegistryError> {
        let registry = Self::new(base_url, logger);
        registry.install(descriptors)?;
        Ok(registry)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Re-query the tool server and replace the cached listing.
    ///
    /// On failure the registry is emptied and marked degraded.
    pub async fn refresh(&self) -> Result<usize, RegistryError> {
        match self.fetch().await.and_then(|descriptors| self.install(descriptors)) {
            Ok(count) => {
                self.logger.info(&format!(
                    "[ToolRegistry] Discovered {} tools from {}",
                    count, self.base_url
                ));
                Ok(count)
            }
            Err(e) => {
                self.logger.error(&format!("[ToolRegistry] Failed to fetch tools: {}", e));
                self.tools.write().clear();
                *self.status.write() = RegistryStatus::Degraded { reason: e.to_string() };
                Err(e)
            }
        }
    }

    async fn fetch(&self) -> Result<Vec<ToolDescriptor>, RegistryError> {
        let url = format!("{}/tools", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(DISCOVERY_TIMEOUT)
            .send()
            .await
            .map_err(|e| RegistryError::Unreachable {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let listing: ToolListing = response
            .json()
            .await
            .map_err(|e| RegistryError::InvalidListing(e.to_string()))?;
        Ok(listing.tools)
    }

    /// Validate and store a listing
    fn install(&self, descriptors: Vec<ToolDescriptor>) -> Result<usize, RegistryError> {
        let mut seen = HashSet::new();
        let mut resolved = Vec::with_capacity(descriptors.len());

        for mut desc in descriptors {
            if desc.name.trim().is_empty() {
                return Err(RegistryError::InvalidListing("tool with empty name".to_string()));
            }
            if !seen.insert(desc.name.clone()) {
                return Err(RegistryError::InvalidListing(format!(
                    "duplicate tool name '{}'",
                    desc.name
                )));
            }
            desc.endpoint = self.resolve_endpoint(&desc.endpoint);
            resolved.push(desc);
        }

        let count = resolved.len();
        *self.tools.write() = resolved;
        *self.status.write() = RegistryStatus::Ready { count };
        Ok(count)
    }

    /// Join relative endpoints onto the base URL; absolute URLs are kept
    fn resolve_endpoint(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
        }
    }

    /// All cached descriptors
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.tools.read().clone()
    }

    /// Look up a descriptor by tool name
    pub fn get(&self, name: &str) -> Option<ToolDescriptor> {
        self.tools.read().iter().find(|t| t.name == name).cloned()
    }

    /// Tools in the form offered to the LLM
    pub fn llm_tools(&self) -> Vec<Tool> {
        self.tools.read().iter().map(Tool::from).collect()
    }

    pub fn status(&self) -> RegistryStatus {
        self.status.read().clone()
    }

    pub fn len(&self) -> usize {
        self.tools.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
