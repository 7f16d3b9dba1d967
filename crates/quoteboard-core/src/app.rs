use std::path::Path;
use std::sync::Arc;

use crate::config::CoreConfig;
use crate::constants::messages;
use crate::error::QuoteError;
use crate::models::{CategoryFilter, Quote};
use crate::notifications::{Notification, SharedNotifications};
use crate::selector::{pick_random_thread_rng, visible_set};
use crate::store::{FileStore, LocalStore, QuoteStore, SessionCache, SharedQuoteStore};
use crate::sync::SyncEngine;
use crate::transfer;
use crate::view::{render, View};

/// The single controller that owns all widget state.
///
/// UI actions come in here; errors are turned into notifications at this
/// boundary and also returned so the caller can react.
pub struct QuoteBoard {
    config: CoreConfig,
    store: SharedQuoteStore,
    session: SessionCache,
    notifications: SharedNotifications,
}

impl QuoteBoard {
    pub fn open(config: CoreConfig) -> Result<Self, QuoteError> {
        let durable = Arc::new(FileStore::open(&config.data_dir)?);
        let store = QuoteStore::load(LocalStore::new(durable))?;

        let session = match config.session_dir {
            Some(ref dir) => SessionCache::new(Arc::new(FileStore::open(dir)?)),
            None => SessionCache::in_memory(),
        };

        tracing::info!(
            "quoteboard: opened {} ({} quotes)",
            config.data_dir.display(),
            store.len()
        );
        Ok(Self::with_parts(config, store, session))
    }

    pub fn with_parts(config: CoreConfig, store: QuoteStore, session: SessionCache) -> Self {
        Self {
            config,
            store: store.into_shared(),
            session,
            notifications: SharedNotifications::new(),
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn store(&self) -> SharedQuoteStore {
        self.store.clone()
    }

    pub fn notifications(&self) -> SharedNotifications {
        self.notifications.clone()
    }

    pub fn quotes(&self) -> Vec<Quote> {
        self.store.lock().quotes().to_vec()
    }

    pub fn categories(&self) -> Vec<String> {
        self.store.lock().categories()
    }

    pub fn filter(&self) -> CategoryFilter {
        self.store.lock().filter().clone()
    }

    /// Current view. Restores the last displayed quote from the session
    /// without re-randomizing; when there is none, or it is no longer
    /// visible under the filter, a random quote is picked instead.
    pub fn current_view(&self) -> View {
        let last = self.session.last_quote();
        let view = {
            let store = self.store.lock();
            render(store.quotes(), store.categories(), store.filter(), last.as_ref())
        };

        if view.quote_line.is_some() {
            view
        } else {
            self.show_random()
        }
    }

    /// Pick a random visible quote, remember it for the session and render.
    pub fn show_random(&self) -> View {
        let picked = {
            let store = self.store.lock();
            let visible = visible_set(store.quotes(), store.filter());
            pick_random_thread_rng(&visible).ok().map(|quote| (*quote).clone())
        };

        if let Some(ref quote) = picked {
            if let Err(e) = self.session.set_last_quote(quote) {
                tracing::warn!("quoteboard: could not remember last quote: {}", e);
            }
        }

        let store = self.store.lock();
        render(store.quotes(), store.categories(), store.filter(), picked.as_ref())
    }

    pub fn add_quote(&self, text: &str, category: &str) -> Result<Quote, QuoteError> {
        let result = self.store.lock().add(text, category);
        match result {
            Ok(quote) => {
                self.notifications
                    .notify(Notification::success(messages::ADD_SUCCESS));
                Ok(quote)
            }
            Err(e @ QuoteError::Validation { .. }) => {
                self.notifications
                    .notify(Notification::warning(messages::ADD_MISSING_FIELDS));
                Err(e)
            }
            Err(e) => {
                self.notifications
                    .notify(Notification::error(format!("Failed to save quote: {e}")));
                Err(e)
            }
        }
    }

    /// Select a category by name (`all` clears the filter). Unknown
    /// categories fall back to `all`; the applied filter is returned.
    pub fn set_filter(&self, name: &str) -> Result<CategoryFilter, QuoteError> {
        let requested = CategoryFilter::parse(name);
        let applied = self.store.lock().set_filter(requested.clone())?;

        if applied != requested {
            self.notifications.notify(Notification::warning(format!(
                "Unknown category '{}', showing all quotes",
                requested.label()
            )));
        }
        Ok(applied)
    }

    pub fn export(&self, path: &Path) -> Result<usize, QuoteError> {
        let quotes = self.quotes();
        match transfer::export_to_file(&quotes, path) {
            Ok(()) => {
                self.notifications.notify(Notification::success(format!(
                    "Exported {} quotes to {}",
                    quotes.len(),
                    path.display()
                )));
                Ok(quotes.len())
            }
            Err(e) => {
                self.notifications
                    .notify(Notification::error(format!("Export failed: {e}")));
                Err(e)
            }
        }
    }

    pub fn import(&self, path: &Path) -> Result<usize, QuoteError> {
        let result = transfer::read_import_file(path)
            .and_then(|value| self.store.lock().import_batch(&value));

        match result {
            Ok(count) => {
                self.notifications
                    .notify(Notification::success(format!("Imported {count} quotes")));
                Ok(count)
            }
            Err(e @ QuoteError::Format(_)) => {
                self.notifications
                    .notify(Notification::error(messages::IMPORT_NOT_ARRAY));
                Err(e)
            }
            Err(e) => {
                self.notifications
                    .notify(Notification::error(format!("Import failed: {e}")));
                Err(e)
            }
        }
    }

    /// Build a sync engine sharing this board's store and notifications
    pub fn sync_engine(&self) -> Result<SyncEngine, QuoteError> {
        SyncEngine::new(
            &self.config.sync,
            self.store.clone(),
            self.notifications.clone(),
        )
    }
}
