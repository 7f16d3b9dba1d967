use std::sync::Arc;

use crate::constants::keys;
use crate::error::QuoteError;
use crate::models::{CategoryFilter, Quote};

use super::kv::KeyValueStore;

/// Durable slots: the quote collection and the selected category filter.
#[derive(Clone)]
pub struct LocalStore {
    backend: Arc<dyn KeyValueStore>,
}

impl LocalStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// `Ok(None)` when nothing was stored yet, `Err(Decode)` when the slot
    /// is not a JSON array. Elements that are not valid quotes are skipped,
    /// the rest are kept.
    pub fn load_quotes(&self) -> Result<Option<Vec<Quote>>, QuoteError> {
        let Some(raw) = self.backend.get(keys::QUOTES)? else {
            return Ok(None);
        };

        let items: Vec<serde_json::Value> =
            serde_json::from_str(&raw).map_err(|source| QuoteError::Decode {
                key: keys::QUOTES.to_string(),
                source,
            })?;

        let quotes: Vec<Quote> = items.iter().filter_map(Quote::from_value).collect();
        if quotes.len() < items.len() {
            tracing::warn!(
                "local_store: skipped {} malformed stored quotes",
                items.len() - quotes.len()
            );
        }
        Ok(Some(quotes))
    }

    pub fn save_quotes(&self, quotes: &[Quote]) -> Result<(), QuoteError> {
        let json = serde_json::to_string_pretty(quotes).map_err(|source| QuoteError::Encode {
            what: "quotes",
            source,
        })?;
        self.backend.set(keys::QUOTES, &json)
    }

    pub fn load_filter(&self) -> Option<CategoryFilter> {
        let raw = match self.backend.get(keys::CATEGORY_FILTER) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("local_store: failed to read category filter: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(filter) => Some(filter),
            Err(e) => {
                tracing::warn!("local_store: discarding corrupt category filter: {}", e);
                None
            }
        }
    }

    pub fn save_filter(&self, filter: &CategoryFilter) -> Result<(), QuoteError> {
        let json = serde_json::to_string(filter).map_err(|source| QuoteError::Encode {
            what: "category filter",
            source,
        })?;
        self.backend.set(keys::CATEGORY_FILTER, &json)
    }
}
