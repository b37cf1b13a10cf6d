//! Persisted record of completed sessions.

pub mod entry;
pub mod store;

pub use entry::HistoryEntry;
pub use store::{HISTORY_KEY, HistoryStore};
