//! The quiz engine a frontend drives.
//!
//! `GameEngine` owns the region pool, the player's settings, the running
//! [`Session`] and the storage backend. Frontends forward "region selected"
//! events to it and read state back; when a session completes it is written
//! to the history log exactly once.

use chrono::Utc;
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{QuizError, QuizResult};
use crate::history::{HistoryEntry, HistoryStore};
use crate::pool::RegionPool;
use crate::region::Region;
use crate::resolver::{resolve_region, suggest_regions};
use crate::session::{Session, Verdict};
use crate::settings::{GameMode, MapVisibility, RegionIdentifiers, Settings};
use crate::stats::Stats;
use crate::storage::KeyValueStore;

/// Number of options offered in [`GameMode::PickFromChoices`].
pub const DEFAULT_CHOICES: usize = 4;

/// A single-player quiz with persisted settings and history.
pub struct GameEngine<S, R = StdRng> {
    pool: RegionPool,
    settings: Settings,
    session: Session,
    history: HistoryStore<S>,
    rng: R,
    recorded: bool,
}

impl<S: KeyValueStore> GameEngine<S, StdRng> {
    /// Create an engine with an RNG seeded from the operating system.
    pub fn new(pool: RegionPool, storage: S) -> Self {
        Self::with_rng(pool, storage, StdRng::from_os_rng())
    }

    /// Create an engine with a reproducible RNG.
    pub fn seeded(pool: RegionPool, storage: S, seed: u64) -> Self {
        Self::with_rng(pool, storage, StdRng::seed_from_u64(seed))
    }
}

impl<S: KeyValueStore, R: Rng> GameEngine<S, R> {
    /// Create an engine around any random source.
    ///
    /// Settings are read from `storage`, falling back to defaults.
    pub fn with_rng(pool: RegionPool, storage: S, mut rng: R) -> Self {
        let settings = Settings::load(&storage);
        let session = Session::start(&pool, &settings, &mut rng);
        Self {
            pool,
            settings,
            session,
            history: HistoryStore::new(storage),
            rng,
            recorded: false,
        }
    }

    /// Throw away the current session and start a new one.
    pub fn reset(&mut self) {
        self.session = Session::start(&self.pool, &self.settings, &mut self.rng);
        self.recorded = false;
    }

    /// Submit a guess by region code.
    ///
    /// Completing the session records it in the history log.
    pub fn submit_guess(&mut self, code: &str) -> QuizResult<Verdict> {
        let verdict = self.session.submit_guess(code, &mut self.rng)?;
        if verdict.ends_round() && self.session.is_complete() {
            self.record_history();
        }
        Ok(verdict)
    }

    /// Handle a region picked in the UI.
    pub fn on_region_selected(&mut self, region: &Region) -> QuizResult<Verdict> {
        self.submit_guess(&region.code)
    }

    /// Submit typed text, resolved to a region by code or name.
    pub fn guess_by_name(&mut self, input: &str) -> QuizResult<Verdict> {
        let code = resolve_region(self.session.regions(), input)
            .map(|r| r.code.clone())
            .ok_or_else(|| QuizError::UnknownRegion(input.trim().to_string()))?;
        self.submit_guess(&code)
    }

    /// Write the session to history if it is complete and not yet written.
    ///
    /// Returns whether the session is recorded afterwards. Storage failures
    /// are logged and leave play unaffected.
    pub fn record_history(&mut self) -> bool {
        if self.recorded {
            return true;
        }
        if !self.session.is_complete() {
            return false;
        }
        let entry = HistoryEntry::from_session(&self.session, self.settings.ids, Utc::now());
        match self.history.append(entry) {
            Ok(_) => {
                self.recorded = true;
                true
            }
            Err(e) => {
                error!("could not record session {}: {e}", self.session.id());
                false
            }
        }
    }

    /// Switch game mode and restart.
    pub fn change_mode(&mut self, mode: GameMode) -> QuizResult<()> {
        self.settings.game_mode = mode;
        self.apply_settings_change();
        Ok(())
    }

    /// Change the attempts per target (1-3) and restart.
    pub fn change_max_attempts(&mut self, value: u32) -> QuizResult<()> {
        let value = Settings::validate_max_guesses(value)?;
        self.settings.max_guesses = value;
        self.apply_settings_change();
        Ok(())
    }

    /// Change how many regions are in play and restart.
    pub fn change_subset_size(&mut self, value: usize) -> QuizResult<()> {
        let value = Settings::validate_targets(value, self.pool.len())?;
        self.settings.number_of_targets = Some(value);
        self.apply_settings_change();
        Ok(())
    }

    /// Change which identifiers label a region. Does not restart.
    pub fn change_identifiers(&mut self, ids: RegionIdentifiers) -> QuizResult<()> {
        ids.validate()?;
        self.settings.ids = ids;
        self.persist_settings();
        Ok(())
    }

    /// Change map layer visibility. Does not restart.
    pub fn change_visibility(&mut self, visibility: MapVisibility) {
        self.settings.visibility = visibility;
        self.persist_settings();
    }

    fn apply_settings_change(&mut self) {
        self.persist_settings();
        info!("settings changed, restarting session");
        self.reset();
    }

    fn persist_settings(&mut self) {
        if let Err(e) = self.settings.save(self.history.backend_mut()) {
            warn!("settings not saved: {e}");
        }
    }

    /// Options to offer for the current target.
    pub fn choices(&mut self, count: usize) -> Vec<&Region> {
        self.session.choices(count, &mut self.rng)
    }

    /// Autocomplete candidates among regions still to be played.
    pub fn suggestions(&self, partial: &str, limit: usize) -> Vec<&Region> {
        suggest_regions(self.session.open_regions(), partial, limit)
    }

    /// Label a region with the configured identifiers.
    pub fn label(&self, region: &Region) -> String {
        self.settings.ids.label(region)
    }

    /// The running session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The region pool.
    pub fn pool(&self) -> &RegionPool {
        &self.pool
    }

    /// The region currently being sought.
    pub fn target(&self) -> Option<&Region> {
        self.session.target()
    }

    /// Score of the running session.
    pub fn stats(&self) -> Stats {
        self.session.stats()
    }

    /// Whether the running session has been written to history.
    pub fn is_recorded(&self) -> bool {
        self.recorded
    }

    /// Every recorded session, oldest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.load_all()
    }

    /// Give the storage backend back.
    pub fn into_storage(self) -> S {
        self.history.into_inner()
    }
}
