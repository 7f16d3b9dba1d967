pub mod kv;
pub mod local;
pub mod quote_store;
pub mod session;

pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use local::LocalStore;
pub use quote_store::{QuoteStore, SharedQuoteStore, StoreEvent};
pub use session::SessionCache;
