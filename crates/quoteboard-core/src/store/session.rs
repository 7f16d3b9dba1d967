use std::sync::Arc;

use crate::constants::keys;
use crate::error::QuoteError;
use crate::models::Quote;

use super::kv::{KeyValueStore, MemoryStore};

/// Session-scoped memory of the last displayed quote.
///
/// Only used to restore the visible quote without re-randomizing; losing it
/// is harmless, so read failures are logged and treated as "nothing cached".
#[derive(Clone)]
pub struct SessionCache {
    backend: Arc<dyn KeyValueStore>,
}

impl SessionCache {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn last_quote(&self) -> Option<Quote> {
        let raw = match self.backend.get(keys::LAST_QUOTE) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("session_cache: read failed: {}", e);
                return None;
            }
        };

        serde_json::from_str(&raw)
            .map_err(|e| tracing::debug!("session_cache: discarding corrupt entry: {}", e))
            .ok()
    }

    pub fn set_last_quote(&self, quote: &Quote) -> Result<(), QuoteError> {
        let json = serde_json::to_string(quote).map_err(|source| QuoteError::Encode {
            what: "last quote",
            source,
        })?;
        self.backend.set(keys::LAST_QUOTE, &json)
    }

    pub fn clear(&self) -> Result<(), QuoteError> {
        self.backend.remove(keys::LAST_QUOTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_quote_roundtrip() {
        let session = SessionCache::in_memory();
        assert_eq!(session.last_quote(), None);

        let quote = Quote::new("Carpe diem", "Latin").unwrap();
        session.set_last_quote(&quote).unwrap();
        assert_eq!(session.last_quote(), Some(quote));

        session.clear().unwrap();
        assert_eq!(session.last_quote(), None);
    }

    #[test]
    fn test_corrupt_entry_reads_as_empty() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(keys::LAST_QUOTE, "[1,2").unwrap();
        assert_eq!(SessionCache::new(backend).last_quote(), None);
    }
}
