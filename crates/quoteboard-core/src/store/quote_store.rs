use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::error::QuoteError;
use crate::models::{categories_match, CategoryFilter, Quote};

use super::local::LocalStore;

/// Capacity of the change-notification channel. Slow subscribers that fall
/// further behind than this see `RecvError::Lagged` and should re-read.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Change notifications for subscribers (UI, logging).
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    QuoteAdded(Quote),
    Imported(usize),
    Merged(usize),
    FilterChanged(CategoryFilter),
}

/// Shared handle used by the controller and the sync engine.
/// Never hold the lock across an `.await`.
pub type SharedQuoteStore = Arc<Mutex<QuoteStore>>;

/// The quote collection plus the selected category filter.
///
/// Every mutation is persisted to the [`LocalStore`] before it returns. If
/// the write fails the in-memory change is rolled back, so memory and disk
/// never disagree.
pub struct QuoteStore {
    local: LocalStore,
    quotes: Vec<Quote>,
    filter: CategoryFilter,
    events: broadcast::Sender<StoreEvent>,
}

impl QuoteStore {
    /// Load the persisted collection, seeding (and persisting) the default
    /// quotes when nothing usable is stored: no slot, a slot that is not a
    /// JSON array, or an array without a single valid quote. Otherwise the
    /// stored file is left as it is.
    pub fn load(local: LocalStore) -> Result<Self, QuoteError> {
        let stored = match local.load_quotes() {
            Ok(stored) => stored,
            Err(e @ QuoteError::Decode { .. }) => {
                tracing::warn!("quote_store: stored quotes unreadable, reseeding defaults: {}", e);
                None
            }
            Err(e) => return Err(e),
        };

        let quotes = stored.unwrap_or_default();

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let mut store = Self {
            local,
            quotes,
            filter: CategoryFilter::All,
            events,
        };

        if store.quotes.is_empty() {
            tracing::info!("quote_store: seeding default quotes");
            store.quotes = Quote::defaults();
            store.local.save_quotes(&store.quotes)?;
        }

        if let Some(saved) = store.local.load_filter() {
            store.filter = store.effective_filter(saved);
        }

        tracing::debug!(
            "quote_store: loaded {} quotes, filter={}",
            store.quotes.len(),
            store.filter.label()
        );
        Ok(store)
    }

    pub fn into_shared(self) -> SharedQuoteStore {
        Arc::new(Mutex::new(self))
    }

    // ===== Query Methods =====

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// Distinct categories in first-seen order. Spelling variants that differ
    /// only in case collapse onto the first one seen.
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for quote in &self.quotes {
            if !seen.iter().any(|c| categories_match(c, &quote.category)) {
                seen.push(quote.category.clone());
            }
        }
        seen
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.quotes.iter().any(|q| q.in_category(category))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    // ===== Mutation Methods =====

    /// Append a user-entered quote. Both fields are trimmed; blank input is a
    /// `Validation` error and leaves the collection untouched.
    pub fn add(&mut self, text: &str, category: &str) -> Result<Quote, QuoteError> {
        let quote = Quote::new(text, category)?;
        let previous_len = self.quotes.len();

        self.quotes.push(quote.clone());
        self.persist_or_rollback(previous_len)?;

        self.emit(StoreEvent::QuoteAdded(quote.clone()));
        Ok(quote)
    }

    /// Append every well-formed `{text, category}` element of a JSON array.
    /// Malformed elements are skipped silently; a non-array is a `Format`
    /// error. Returns the number of quotes imported.
    pub fn import_batch(&mut self, value: &serde_json::Value) -> Result<usize, QuoteError> {
        let items = value.as_array().ok_or_else(|| {
            QuoteError::Format("expected a JSON array of quotes".to_string())
        })?;

        let previous_len = self.quotes.len();
        self.quotes.extend(items.iter().filter_map(Quote::from_value));
        let imported = self.quotes.len() - previous_len;

        self.persist_or_rollback(previous_len)?;

        tracing::info!(
            "quote_store: imported {} of {} records",
            imported,
            items.len()
        );
        self.emit(StoreEvent::Imported(imported));
        Ok(imported)
    }

    /// Append records that already passed merge. Empty input is a no-op.
    pub fn append_merged(&mut self, records: Vec<Quote>) -> Result<usize, QuoteError> {
        if records.is_empty() {
            return Ok(0);
        }

        let previous_len = self.quotes.len();
        let count = records.len();
        self.quotes.extend(records);
        self.persist_or_rollback(previous_len)?;

        self.emit(StoreEvent::Merged(count));
        Ok(count)
    }

    /// Select a filter. A category missing from the collection falls back to
    /// `All`. Returns the filter actually applied.
    pub fn set_filter(&mut self, filter: CategoryFilter) -> Result<CategoryFilter, QuoteError> {
        let effective = self.effective_filter(filter);
        self.local.save_filter(&effective)?;

        self.filter = effective.clone();
        self.emit(StoreEvent::FilterChanged(effective.clone()));
        Ok(effective)
    }

    fn effective_filter(&self, filter: CategoryFilter) -> CategoryFilter {
        match filter {
            CategoryFilter::Category(ref name) if !self.has_category(name) => {
                tracing::debug!("quote_store: unknown category '{}', using all", name);
                CategoryFilter::All
            }
            other => other,
        }
    }

    fn persist_or_rollback(&mut self, previous_len: usize) -> Result<(), QuoteError> {
        if let Err(e) = self.local.save_quotes(&self.quotes) {
            tracing::error!("quote_store: failed to persist quotes: {}", e);
            self.quotes.truncate(previous_len);
            return Err(e);
        }
        Ok(())
    }

    fn emit(&self, event: StoreEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::keys;
    use crate::store::kv::{FileStore, KeyValueStore, MemoryStore};
    use serde_json::json;
    use tempfile::tempdir;

    fn memory_store() -> (Arc<MemoryStore>, QuoteStore) {
        let backend = Arc::new(MemoryStore::new());
        let store = QuoteStore::load(LocalStore::new(backend.clone())).unwrap();
        (backend, store)
    }

    fn stored_quotes(backend: &MemoryStore) -> Vec<Quote> {
        serde_json::from_str(&backend.get(keys::QUOTES).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn test_load_seeds_and_persists_defaults() {
        let (backend, store) = memory_store();
        assert_eq!(store.quotes(), Quote::defaults().as_slice());
        assert_eq!(stored_quotes(&backend), Quote::defaults());
        assert_eq!(store.filter(), &CategoryFilter::All);
    }

    #[test]
    fn test_load_recovers_from_corrupt_file() {
        let dir = tempdir().unwrap();
        let backend = Arc::new(FileStore::open(dir.path()).unwrap());
        backend.set(keys::QUOTES, "not json at all").unwrap();

        let store = QuoteStore::load(LocalStore::new(backend.clone())).unwrap();
        assert_eq!(store.len(), 3);

        let raw = std::fs::read_to_string(backend.path_for(keys::QUOTES)).unwrap();
        let rewritten: Vec<Quote> = serde_json::from_str(&raw).unwrap();
        assert_eq!(rewritten, Quote::defaults());
    }

    #[test]
    fn test_load_keeps_existing_collection() {
        let backend = Arc::new(MemoryStore::new());
        backend
            .set(keys::QUOTES, r#"[{"text":"Carpe diem","category":"Latin"}]"#)
            .unwrap();

        let store = QuoteStore::load(LocalStore::new(backend)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.categories(), vec!["Latin".to_string()]);
    }

    #[test]
    fn test_load_keeps_valid_records_next_to_malformed_ones() {
        let backend = Arc::new(MemoryStore::new());
        let raw = r#"[{"text":"Mine 1","category":"A"},{"text":"Mine 2","category":"B"},{"text":"broken"}]"#;
        backend.set(keys::QUOTES, raw).unwrap();

        let store = QuoteStore::load(LocalStore::new(backend.clone())).unwrap();
        let texts: Vec<&str> = store.quotes().iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["Mine 1", "Mine 2"]);

        // Loading alone never rewrites the user's file
        assert_eq!(backend.get(keys::QUOTES).unwrap().as_deref(), Some(raw));
    }

    #[test]
    fn test_load_reseeds_when_nothing_valid() {
        for raw in [r#"[{"text":"broken"}]"#, r#"{"text":"A","category":"B"}"#, "[]"] {
            let backend = Arc::new(MemoryStore::new());
            backend.set(keys::QUOTES, raw).unwrap();

            let store = QuoteStore::load(LocalStore::new(backend.clone())).unwrap();
            assert_eq!(store.quotes(), Quote::defaults().as_slice(), "slot {raw}");
            assert_eq!(stored_quotes(&backend), Quote::defaults());
        }
    }

    #[test]
    fn test_add_scenario() {
        let (backend, mut store) = memory_store();

        let added = store.add("Carpe diem", "Latin").unwrap();
        assert_eq!(added, Quote::new("Carpe diem", "Latin").unwrap());
        assert_eq!(store.len(), 4);
        assert!(store.categories().contains(&"Latin".to_string()));

        let persisted = stored_quotes(&backend);
        assert_eq!(persisted.len(), 4);
        assert_eq!(persisted.last(), Some(&added));
    }

    #[test]
    fn test_add_rejects_blank_input() {
        let (backend, mut store) = memory_store();

        for (text, category) in [("", "Latin"), ("Carpe diem", "   "), (" \t", "\n")] {
            assert!(matches!(
                store.add(text, category),
                Err(QuoteError::Validation { .. })
            ));
        }

        assert_eq!(store.len(), 3);
        assert_eq!(stored_quotes(&backend).len(), 3);
    }

    #[test]
    fn test_import_batch_skips_malformed() {
        let (_, mut store) = memory_store();

        let payload = json!([
            {"text": "A", "category": "One"},
            {"text": "", "category": "One"},
            {"text": "B"},
            42,
            {"text": "C", "category": "Two", "extra": true}
        ]);

        assert_eq!(store.import_batch(&payload).unwrap(), 2);
        assert_eq!(store.len(), 5);
        assert_eq!(store.quotes()[4].text, "C");
    }

    #[test]
    fn test_import_batch_rejects_non_array() {
        let (backend, mut store) = memory_store();

        let result = store.import_batch(&json!("not an array"));
        assert!(matches!(result, Err(QuoteError::Format(_))));
        assert_eq!(store.len(), 3);
        assert_eq!(stored_quotes(&backend).len(), 3);
    }

    #[test]
    fn test_categories_first_seen_order_case_insensitive() {
        let (_, mut store) = memory_store();
        store.add("x", "life").unwrap();
        store.add("y", "Latin").unwrap();

        assert_eq!(
            store.categories(),
            vec!["Motivation", "Inspiration", "Life", "Latin"]
        );
    }

    #[test]
    fn test_set_filter_falls_back_for_unknown_category() {
        let (backend, mut store) = memory_store();

        let applied = store.set_filter(CategoryFilter::parse("Life")).unwrap();
        assert_eq!(applied, CategoryFilter::Category("Life".into()));
        assert_eq!(backend.get(keys::CATEGORY_FILTER).unwrap().as_deref(), Some("\"Life\""));

        let applied = store.set_filter(CategoryFilter::parse("Nope")).unwrap();
        assert_eq!(applied, CategoryFilter::All);
        assert_eq!(store.filter(), &CategoryFilter::All);
    }

    #[test]
    fn test_filter_restored_only_if_category_present() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(keys::CATEGORY_FILTER, "\"Life\"").unwrap();
        let store = QuoteStore::load(LocalStore::new(backend.clone())).unwrap();
        assert_eq!(store.filter(), &CategoryFilter::Category("Life".into()));

        backend.set(keys::CATEGORY_FILTER, "\"Gone\"").unwrap();
        let store = QuoteStore::load(LocalStore::new(backend)).unwrap();
        assert_eq!(store.filter(), &CategoryFilter::All);
    }

    #[test]
    fn test_append_merged_empty_is_noop() {
        let (_, mut store) = memory_store();
        let mut events = store.subscribe();

        assert_eq!(store.append_merged(Vec::new()).unwrap(), 0);
        assert_eq!(store.len(), 3);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_subscribers_see_mutations() {
        let (_, mut store) = memory_store();
        let mut events = store.subscribe();

        store.add("Carpe diem", "Latin").unwrap();
        store
            .append_merged(vec![Quote::new("B", "Server").unwrap()])
            .unwrap();

        assert_eq!(
            events.try_recv().unwrap(),
            StoreEvent::QuoteAdded(Quote::new("Carpe diem", "Latin").unwrap())
        );
        assert_eq!(events.try_recv().unwrap(), StoreEvent::Merged(1));
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let backend = Arc::new(FileStore::open(&data_dir).unwrap());
        let mut store = QuoteStore::load(LocalStore::new(backend)).unwrap();

        // Pull the directory out from under the store so the next write fails
        std::fs::remove_dir_all(&data_dir).unwrap();

        assert!(matches!(
            store.add("Carpe diem", "Latin"),
            Err(QuoteError::Io { .. })
        ));
        assert_eq!(store.len(), 3);
    }
}
