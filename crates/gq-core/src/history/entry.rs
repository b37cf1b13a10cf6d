//! History entry type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::region::Region;
use crate::session::{Session, SessionId};
use crate::settings::{GameMode, RegionIdentifiers};
use crate::stats::{Stats, compute_stats};

/// Snapshot of one completed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Session identifier; unique within the log.
    pub id: SessionId,
    /// Mode the session was played in.
    pub mode: GameMode,
    /// Identifier flags in effect when the session ended.
    #[serde(default)]
    pub ids: RegionIdentifiers,
    /// Attempts allowed per target.
    pub max_guesses: u8,
    /// Regions in play.
    #[serde(default)]
    pub number_of_targets: usize,
    /// Final state of every region.
    #[serde(rename = "departements")]
    pub regions: Vec<Region>,
    /// When the session was recorded.
    pub date: DateTime<Utc>,
}

impl HistoryEntry {
    /// Snapshot a session as it stands.
    pub fn from_session(session: &Session, ids: RegionIdentifiers, date: DateTime<Utc>) -> Self {
        Self {
            id: session.id().clone(),
            mode: session.mode(),
            ids,
            max_guesses: session.max_attempts(),
            number_of_targets: session.target_subset_size(),
            regions: session.regions().to_vec(),
            date,
        }
    }

    /// Score of the recorded session.
    pub fn stats(&self) -> Stats {
        compute_stats(&self.regions)
    }
}
