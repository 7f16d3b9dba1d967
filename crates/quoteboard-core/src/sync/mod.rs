pub mod engine;
pub mod merge;
pub mod remote;

pub use engine::{SyncEngine, TickOutcome, TickReport};
pub use merge::merge;
pub use remote::{map_remote_items, RemoteClient};
