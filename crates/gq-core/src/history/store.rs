//! Append-only history log over a key-value store.

use log::{debug, info, warn};

use super::entry::HistoryEntry;
use crate::error::{QuizResult, StorageError};
use crate::storage::KeyValueStore;

/// Storage key holding the history log.
pub const HISTORY_KEY: &str = "history";

/// Completed sessions, oldest first, kept as one JSON array.
#[derive(Debug)]
pub struct HistoryStore<S> {
    backend: S,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Wrap a storage backend.
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Mutable access to the underlying store.
    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    /// Give the backend back.
    pub fn into_inner(self) -> S {
        self.backend
    }

    /// Append an entry unless one with the same id exists.
    ///
    /// Returns whether the entry was written. A log that exists but cannot be
    /// decoded is left untouched and reported as an error.
    pub fn append(&mut self, entry: HistoryEntry) -> QuizResult<bool> {
        let mut entries = self.read()?;
        if entries.iter().any(|e| e.id == entry.id) {
            debug!("session {} already recorded", entry.id);
            return Ok(false);
        }
        let id = entry.id.clone();
        entries.push(entry);
        let raw = serde_json::to_string(&entries).map_err(StorageError::from)?;
        self.backend.set(HISTORY_KEY, &raw)?;
        info!("recorded session {id} ({} in history)", entries.len());
        Ok(true)
    }

    /// Every recorded session, oldest first.
    ///
    /// An absent, unreadable or malformed log yields an empty list.
    pub fn load_all(&self) -> Vec<HistoryEntry> {
        match self.read() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("history unavailable: {e}");
                Vec::new()
            }
        }
    }

    fn read(&self) -> QuizResult<Vec<HistoryEntry>> {
        let Some(raw) = self.backend.get(HISTORY_KEY)? else {
            return Ok(Vec::new());
        };
        let entries: Vec<HistoryEntry> =
            serde_json::from_str(&raw).map_err(StorageError::from)?;
        Ok(entries)
    }
}
