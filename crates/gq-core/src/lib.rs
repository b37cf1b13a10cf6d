//! Region-identification quiz engine.
//!
//! Provides the French département pool, a session engine that picks targets
//! and grades guesses with a bounded number of attempts, score statistics,
//! persisted player settings and an append-only history of completed
//! sessions, all over a pluggable key-value store.

pub mod engine;
pub mod error;
pub mod history;
pub mod pool;
pub mod region;
pub mod resolver;
pub mod session;
pub mod settings;
pub mod stats;
pub mod storage;

pub use engine::{DEFAULT_CHOICES, GameEngine};
pub use error::{QuizError, QuizResult, StorageError};
pub use history::{HISTORY_KEY, HistoryEntry, HistoryStore};
pub use pool::RegionPool;
pub use region::{MAX_ATTEMPTS, Outcome, Region};
pub use session::{Session, SessionId, Verdict};
pub use settings::{GameMode, MapVisibility, RegionIdentifiers, SETTINGS_KEY, Settings};
pub use stats::{Stats, compute_stats};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
