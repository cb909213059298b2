use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use vine_core::config::QueryConfig;
use vine_core::{CoreConfig, RelayConfig};

/// CLI configuration that can be loaded from a JSON file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    /// Relays to query; the first one is the primary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relays: Option<Vec<String>>,

    /// Relays known to support search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_relays: Option<Vec<String>>,

    /// Per-query timeouts and cache windows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queries: Option<QueryConfig>,
}

impl CliConfig {
    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Deserialize config from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to deserialize config")
    }

    /// `$XDG_CONFIG_HOME/vine/config.json` or the platform equivalent
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vine").join("config.json"))
    }

    /// Build the core config. `relay_overrides` from the command line win
    /// over the file's relay list.
    pub fn into_core_config(self, relay_overrides: Vec<String>) -> CoreConfig {
        let mut relays = RelayConfig::default();
        if let Some(urls) = self.relays {
            relays = relays.with_relays(urls);
        }
        if !relay_overrides.is_empty() {
            relays = relays.with_relays(relay_overrides);
        }
        if let Some(search_urls) = self.search_relays {
            relays.search_urls = search_urls;
        }

        CoreConfig {
            relays,
            queries: self.queries.unwrap_or_default(),
        }
    }
}
