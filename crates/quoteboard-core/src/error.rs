use std::path::PathBuf;

/// Every failure the core can report.
///
/// None of these are fatal: callers handle them at the boundary where they
/// occur and surface them as notifications.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    /// A required field was empty after trimming
    #[error("{field} must not be empty")]
    Validation { field: &'static str },

    /// Import payload was not JSON, or its top level was not an array
    #[error("invalid quote data: {0}")]
    Format(String),

    /// Persisted JSON could not be decoded
    #[error("failed to decode stored {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Network failure talking to the remote endpoint
    #[error("remote request failed: {0}")]
    Transport(String),

    /// Tried to pick from an empty selection
    #[error("no quotes available to pick from")]
    EmptySelection,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl QuoteError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        QuoteError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for QuoteError {
    fn from(e: reqwest::Error) -> Self {
        QuoteError::Transport(e.to_string())
    }
}
