use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    DEFAULT_ENDPOINT, DEFAULT_FETCH_LIMIT, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SYNC_INTERVAL_SECS,
};

/// Settings for the remote sync loop.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub endpoint: String,
    pub interval: Duration,
    /// Only the first `fetch_limit` remote items become quotes
    pub fetch_limit: usize,
    pub request_timeout: Duration,
}

impl SyncConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            interval: Duration::from_secs(DEFAULT_SYNC_INTERVAL_SECS),
            fetch_limit: DEFAULT_FETCH_LIMIT,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Durable storage (quotes, category filter)
    pub data_dir: PathBuf,
    /// Session storage for the last displayed quote. `None` keeps it in memory,
    /// so it lives exactly as long as the process.
    pub session_dir: Option<PathBuf>,
    pub sync: SyncConfig,
}

impl CoreConfig {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            session_dir: None,
            sync: SyncConfig::default(),
        }
    }

    pub fn with_session_dir<P: AsRef<Path>>(mut self, session_dir: P) -> Self {
        self.session_dir = Some(session_dir.as_ref().to_path_buf());
        self
    }

    pub fn with_sync(mut self, sync: SyncConfig) -> Self {
        self.sync = sync;
        self
    }

    /// `~/.quoteboard`, or `./quoteboard_data` when no home directory is known
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(".quoteboard"))
            .unwrap_or_else(|| PathBuf::from("quoteboard_data"))
    }

    /// Session files live under the OS temp dir, which is cleared on reboot
    pub fn default_session_dir() -> PathBuf {
        std::env::temp_dir().join("quoteboard-session")
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new(Self::default_data_dir())
    }
}
