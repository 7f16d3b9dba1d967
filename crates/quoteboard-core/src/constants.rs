//! Application-wide constants
//!
//! Centralized location for storage keys, defaults and user-facing strings
//! that are shared across modules.

use std::time::Duration;

/// Default remote endpoint (mock REST API)
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";

/// Seconds between sync ticks
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 15;

/// Number of remote items mapped into quotes per fetch
pub const DEFAULT_FETCH_LIMIT: usize = 5;

/// Per-request timeout for remote calls
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Category label assigned to every quote fetched from the remote
pub const SERVER_CATEGORY: &str = "Server";

/// Sentinel filter value meaning "no category filter"
pub const ALL_CATEGORIES: &str = "all";

/// How long a notification stays on screen
pub const NOTIFICATION_DURATION: Duration = Duration::from_secs(4);

/// Default file name for exports
pub const DEFAULT_EXPORT_FILE: &str = "quotes.json";

// Storage slot keys
pub mod keys {
    /// Durable: JSON array of quotes
    pub const QUOTES: &str = "quotes";
    /// Durable: JSON string holding the selected category filter
    pub const CATEGORY_FILTER: &str = "category_filter";
    /// Session: JSON object holding the last displayed quote
    pub const LAST_QUOTE: &str = "last_quote";
}

// User-facing messages
pub mod messages {
    pub const NO_QUOTES_IN_CATEGORY: &str = "No quotes available in this category.";
    pub const ADD_SUCCESS: &str = "Quote added successfully!";
    pub const ADD_MISSING_FIELDS: &str = "Please enter both quote and category.";
    pub const PUSH_SUCCESS: &str = "Quotes synced to server";
    pub const PUSH_FAILURE: &str = "Failed to sync quotes to server";
    pub const IMPORT_NOT_ARRAY: &str = "Invalid file format: expected a JSON array of quotes";
}
