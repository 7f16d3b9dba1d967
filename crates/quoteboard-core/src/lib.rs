pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod mock_remote;
pub mod models;
pub mod notifications;
pub mod selector;
pub mod store;
pub mod sync;
pub mod tracing_setup;
pub mod transfer;
pub mod view;

// Re-export the types most callers need at crate root
pub use app::QuoteBoard;
pub use config::{CoreConfig, SyncConfig};
pub use error::QuoteError;
pub use models::{CategoryFilter, Quote};
