use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use quoteboard_core::{CoreConfig, SyncConfig};
use serde::{Deserialize, Serialize};

/// Overrides the remote endpoint when set
pub const ENDPOINT_ENV: &str = "QUOTEBOARD_ENDPOINT";

/// CLI configuration that can be loaded from a JSON file
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    /// Directory holding quotes.json and category_filter.json
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Directory for the per-session last quote
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_dir: Option<PathBuf>,

    /// Remote REST endpoint for push/fetch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_interval_secs: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_limit: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl CliConfig {
    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to deserialize config")
    }

    /// Resolve into the core configuration.
    ///
    /// Precedence, highest first: command-line flags, `QUOTEBOARD_ENDPOINT`,
    /// the config file, built-in defaults.
    pub fn into_core_config(
        self,
        data_dir_flag: Option<PathBuf>,
        endpoint_flag: Option<String>,
        endpoint_env: Option<String>,
    ) -> CoreConfig {
        let data_dir = data_dir_flag
            .or(self.data_dir)
            .unwrap_or_else(CoreConfig::default_data_dir);
        let session_dir = self
            .session_dir
            .unwrap_or_else(CoreConfig::default_session_dir);

        let mut sync = SyncConfig::default();
        if let Some(endpoint) = endpoint_flag.or(endpoint_env).or(self.endpoint) {
            sync.endpoint = endpoint;
        }
        if let Some(secs) = self.sync_interval_secs.filter(|s| *s > 0) {
            sync.interval = Duration::from_secs(secs);
        }
        if let Some(limit) = self.fetch_limit {
            sync.fetch_limit = limit;
        }
        if let Some(secs) = self.request_timeout_secs.filter(|s| *s > 0) {
            sync.request_timeout = Duration::from_secs(secs);
        }

        CoreConfig::new(data_dir)
            .with_session_dir(session_dir)
            .with_sync(sync)
    }
}

/// Read the endpoint override from the environment, ignoring blank values
pub fn endpoint_from_env() -> Option<String> {
    std::env::var(ENDPOINT_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
