//! Quiz session state machine.
//!
//! A [`Session`] holds every region of the pool, a random subset of which is
//! marked active. Targets are drawn from the active regions that are still
//! unattempted; each target allows up to `max_attempts` guesses before the
//! answer is revealed. The session is complete once no active region is left
//! unattempted.

use std::fmt;

use log::{debug, info, warn};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{QuizError, QuizResult};
use crate::pool::RegionPool;
use crate::region::{MAX_ATTEMPTS, Outcome, Region};
use crate::settings::{GameMode, Settings};
use crate::stats::{Stats, compute_stats};

/// Opaque identifier of one play-through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The identifier as stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of a single guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Wrong guess; the same target stays up.
    Retry {
        /// Guesses left for this target.
        attempts_left: u8,
    },
    /// The target was identified.
    Correct {
        /// Code of the identified region.
        code: String,
        /// Attempt it was identified on (1-based).
        attempt: u8,
    },
    /// Attempts exhausted; the target is marked missed.
    Revealed {
        /// Code of the region that was the answer.
        answer: String,
    },
}

impl Verdict {
    /// Whether the round for the current target ended.
    pub fn ends_round(&self) -> bool {
        !matches!(self, Self::Retry { .. })
    }
}

/// Pick uniformly among the regions that are active and unattempted.
pub fn select_target<'a, R: Rng + ?Sized>(
    regions: &'a [Region],
    rng: &mut R,
) -> Option<&'a Region> {
    pick_open(regions, rng).map(|i| &regions[i])
}

fn pick_open<R: Rng + ?Sized>(regions: &[Region], rng: &mut R) -> Option<usize> {
    let open: Vec<usize> = regions
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_open())
        .map(|(i, _)| i)
        .collect();
    if open.is_empty() {
        return None;
    }
    Some(open[rng.random_range(0..open.len())])
}

/// One play-through over a subset of the region pool.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    mode: GameMode,
    max_attempts: u8,
    target_subset_size: usize,
    target: Option<usize>,
    attempt_count: u8,
    regions: Vec<Region>,
}

impl Session {
    /// Start a session with the mode, attempts and subset size from `settings`.
    ///
    /// The pool is shuffled and its first `subset_size` entries are marked
    /// active; `regions` keeps the pool's order.
    pub fn start<R: Rng + ?Sized>(pool: &RegionPool, settings: &Settings, rng: &mut R) -> Self {
        let subset_size = settings.subset_size(pool.len());
        let mut regions = pool.regions().to_vec();

        let mut order: Vec<usize> = (0..regions.len()).collect();
        order.shuffle(rng);
        for region in &mut regions {
            region.reset(false);
        }
        for &i in order.iter().take(subset_size) {
            regions[i].active = true;
        }

        let target = pick_open(&regions, rng);
        let session = Self {
            id: SessionId::new(),
            mode: settings.game_mode,
            max_attempts: settings.max_guesses.clamp(1, MAX_ATTEMPTS),
            target_subset_size: subset_size,
            target,
            attempt_count: 1,
            regions,
        };
        info!(
            "session {} started: {} regions, mode {}, {} attempts",
            session.id, subset_size, session.mode, session.max_attempts
        );
        session
    }

    /// Apply a guess for the current target.
    ///
    /// A wrong guess with attempts left flags the guessed region and keeps the
    /// target. A correct guess or a final miss resolves the target and draws
    /// the next one, or leaves none when the session is complete.
    pub fn submit_guess<R: Rng + ?Sized>(
        &mut self,
        code: &str,
        rng: &mut R,
    ) -> QuizResult<Verdict> {
        let Some(target) = self.target else {
            warn!("guess \"{code}\" ignored: no active target");
            return Err(QuizError::NoActiveTarget);
        };
        let guessed = self
            .index_of(code)
            .ok_or_else(|| QuizError::UnknownRegion(code.to_string()))?;

        self.clear_guess_flags();

        let verdict = if guessed == target {
            let attempt = self.attempt_count;
            self.regions[target].outcome = Outcome::FoundOnAttempt(attempt);
            Verdict::Correct {
                code: code.to_string(),
                attempt,
            }
        } else if self.attempt_count < self.max_attempts {
            self.regions[guessed].guess_flag = true;
            self.attempt_count += 1;
            debug!(
                "wrong guess {code} for {}, attempt {}/{}",
                self.regions[target].code, self.attempt_count, self.max_attempts
            );
            return Ok(Verdict::Retry {
                attempts_left: self.attempts_remaining(),
            });
        } else {
            self.regions[target].outcome = Outcome::Missed;
            Verdict::Revealed {
                answer: self.regions[target].code.clone(),
            }
        };

        debug!("round for {} ended: {verdict:?}", self.regions[target].code);
        self.attempt_count = 1;
        self.target = pick_open(&self.regions, rng);
        if self.target.is_none() {
            info!("session {} complete", self.id);
        }
        Ok(verdict)
    }

    fn clear_guess_flags(&mut self) {
        for region in &mut self.regions {
            region.guess_flag = false;
        }
    }

    fn index_of(&self, code: &str) -> Option<usize> {
        self.regions.iter().position(|r| r.code == code)
    }

    /// Session identifier.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Game mode the session was started with.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Attempts allowed per target.
    pub fn max_attempts(&self) -> u8 {
        self.max_attempts
    }

    /// Number of active regions.
    pub fn target_subset_size(&self) -> usize {
        self.target_subset_size
    }

    /// The region currently being sought.
    pub fn target(&self) -> Option<&Region> {
        self.target.map(|i| &self.regions[i])
    }

    /// Current attempt number for the target (1-based).
    pub fn attempt_count(&self) -> u8 {
        self.attempt_count
    }

    /// Guesses left for the current target, 0 when the session is complete.
    pub fn attempts_remaining(&self) -> u8 {
        if self.target.is_none() {
            return 0;
        }
        self.max_attempts - self.attempt_count + 1
    }

    /// Every region of the pool, in pool order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Look up a region by code.
    pub fn region(&self, code: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.code == code)
    }

    /// The region flagged as the latest wrong guess.
    pub fn flagged_guess(&self) -> Option<&Region> {
        self.regions.iter().find(|r| r.guess_flag)
    }

    /// Active regions still waiting to be played.
    pub fn open_regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|r| r.is_open())
    }

    /// True once no active region is unattempted.
    pub fn is_complete(&self) -> bool {
        self.open_regions().next().is_none()
    }

    /// Score over the active regions.
    pub fn stats(&self) -> Stats {
        compute_stats(&self.regions)
    }

    /// Answer options for the current target: the target plus up to
    /// `count - 1` other regions, shuffled.
    ///
    /// Distractors come from the active subset first and from the rest of the
    /// pool when the subset is too small.
    pub fn choices<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<&Region> {
        let Some(target) = self.target else {
            return Vec::new();
        };

        let mut active: Vec<usize> = Vec::new();
        let mut inactive: Vec<usize> = Vec::new();
        for (i, region) in self.regions.iter().enumerate() {
            if i == target {
                continue;
            }
            if region.active {
                active.push(i);
            } else {
                inactive.push(i);
            }
        }
        active.shuffle(rng);
        inactive.shuffle(rng);

        let mut picked: Vec<usize> = active
            .into_iter()
            .chain(inactive)
            .take(count.saturating_sub(1))
            .collect();
        picked.push(target);
        picked.shuffle(rng);
        picked.into_iter().map(|i| &self.regions[i]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn small_pool() -> RegionPool {
        RegionPool::new(vec![
            Region::new("33", "Gironde"),
            Region::new("75", "Paris"),
            Region::new("92", "Hauts-de-Seine"),
            Region::new("93", "Seine-Saint-Denis"),
            Region::new("94", "Val-de-Marne"),
        ])
        .unwrap()
    }

    /// Start on `pool` and force `code` as the target.
    fn session_targeting(pool: &RegionPool, settings: &Settings, code: &str) -> Session {
        let mut rng = StdRng::seed_from_u64(7);
        let mut session = Session::start(pool, settings, &mut rng);
        let index = session.index_of(code).unwrap();
        session.target = Some(index);
        session
    }

    fn play_to_end(session: &mut Session, rng: &mut StdRng) {
        while let Some(code) = session.target().map(|t| t.code.clone()) {
            session.submit_guess(&code, rng).unwrap();
        }
    }

    #[test]
    fn select_target_skips_resolved_and_inactive() {
        let mut regions = small_pool().regions().to_vec();
        regions[0].outcome = Outcome::FoundOnAttempt(1);
        regions[1].active = false;
        regions[2].outcome = Outcome::Missed;
        regions[3].active = false;
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(select_target(&regions, &mut rng).unwrap().code, "94");
        }
        regions[4].outcome = Outcome::FoundOnAttempt(2);
        assert!(select_target(&regions, &mut rng).is_none());
    }

    #[test]
    fn select_target_is_reproducible() {
        let regions = RegionPool::builtin().unwrap().regions().to_vec();
        let a = select_target(&regions, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = select_target(&regions, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a.code, b.code);
    }

    #[test]
    fn start_marks_subset_active() {
        let pool = RegionPool::builtin().unwrap();
        let settings = Settings::default().with_targets(10);
        let session = Session::start(&pool, &settings, &mut StdRng::seed_from_u64(3));
        assert_eq!(session.regions().len(), 96);
        assert_eq!(session.regions().iter().filter(|r| r.active).count(), 10);
        assert_eq!(session.stats().total, 10);
        assert_eq!(session.target_subset_size(), 10);
        assert_eq!(session.attempt_count(), 1);
        assert!(session.target().unwrap().active);
        assert!(session.regions().iter().all(|r| !r.guess_flag));
    }

    #[test]
    fn start_keeps_pool_order_and_fresh_ids() {
        let pool = small_pool();
        let mut rng = StdRng::seed_from_u64(3);
        let a = Session::start(&pool, &Settings::default(), &mut rng);
        let b = Session::start(&pool, &Settings::default(), &mut rng);
        let codes: Vec<_> = a.regions().iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, ["33", "75", "92", "93", "94"]);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn same_seed_same_subset() {
        let pool = RegionPool::builtin().unwrap();
        let settings = Settings::default().with_targets(5);
        let active = |seed| {
            Session::start(&pool, &settings, &mut StdRng::seed_from_u64(seed))
                .regions()
                .iter()
                .filter(|r| r.active)
                .map(|r| r.code.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(active(11), active(11));
    }

    #[test]
    fn three_attempt_scenario() {
        let pool = small_pool();
        let mut session = session_targeting(&pool, &Settings::default(), "75");
        let mut rng = StdRng::seed_from_u64(5);

        let v = session.submit_guess("92", &mut rng).unwrap();
        assert_eq!(v, Verdict::Retry { attempts_left: 2 });
        assert_eq!(session.attempt_count(), 2);
        assert!(session.region("92").unwrap().guess_flag);
        assert_eq!(session.target().unwrap().code, "75");

        session.submit_guess("93", &mut rng).unwrap();
        assert_eq!(session.attempt_count(), 3);
        assert!(session.region("93").unwrap().guess_flag);
        assert!(!session.region("92").unwrap().guess_flag);
        assert_eq!(session.target().unwrap().code, "75");

        let v = session.submit_guess("75", &mut rng).unwrap();
        assert_eq!(
            v,
            Verdict::Correct {
                code: "75".into(),
                attempt: 3
            }
        );
        assert_eq!(
            session.region("75").unwrap().outcome,
            Outcome::FoundOnAttempt(3)
        );
        assert_eq!(session.attempt_count(), 1);
        assert!(session.flagged_guess().is_none());
        let next = session.target().unwrap();
        assert_ne!(next.code, "75");
        assert_eq!(next.outcome, Outcome::Unattempted);
    }

    #[test]
    fn single_attempt_miss_reveals_target() {
        let pool = small_pool();
        let settings = Settings::default().with_max_guesses(1);
        let mut session = session_targeting(&pool, &settings, "33");
        let mut rng = StdRng::seed_from_u64(5);

        let v = session.submit_guess("75", &mut rng).unwrap();
        assert_eq!(
            v,
            Verdict::Revealed {
                answer: "33".into()
            }
        );
        assert_eq!(session.region("33").unwrap().outcome, Outcome::Missed);
        assert_eq!(session.region("75").unwrap().outcome, Outcome::Unattempted);
        assert!(!session.region("75").unwrap().guess_flag);
        assert_eq!(session.attempt_count(), 1);
        assert_ne!(session.target().unwrap().code, "33");
    }

    #[test]
    fn final_miss_after_retries() {
        let pool = small_pool();
        let settings = Settings::default().with_max_guesses(2);
        let mut session = session_targeting(&pool, &settings, "94");
        let mut rng = StdRng::seed_from_u64(5);

        session.submit_guess("92", &mut rng).unwrap();
        let v = session.submit_guess("93", &mut rng).unwrap();
        assert!(v.ends_round());
        assert_eq!(session.region("94").unwrap().outcome, Outcome::Missed);
        assert_eq!(session.region("93").unwrap().outcome, Outcome::Unattempted);
        assert!(session.flagged_guess().is_none());
    }

    #[test]
    fn completes_after_every_active_region() {
        let pool = small_pool();
        let mut rng = StdRng::seed_from_u64(8);
        let mut session = Session::start(&pool, &Settings::default().with_targets(3), &mut rng);
        assert!(!session.is_complete());
        play_to_end(&mut session, &mut rng);
        assert!(session.is_complete());
        assert!(session.target().is_none());
        assert_eq!(session.attempts_remaining(), 0);
        let stats = session.stats();
        assert_eq!((stats.total, stats.correct, stats.seen), (3, 3, 3));
    }

    #[test]
    fn guess_without_target_is_rejected() {
        let pool = small_pool();
        let mut rng = StdRng::seed_from_u64(8);
        let mut session = Session::start(&pool, &Settings::default(), &mut rng);
        play_to_end(&mut session, &mut rng);
        let before = session.regions().to_vec();
        let err = session.submit_guess("75", &mut rng).unwrap_err();
        assert!(matches!(err, QuizError::NoActiveTarget));
        assert_eq!(session.regions(), before.as_slice());
    }

    #[test]
    fn unknown_code_leaves_state_untouched() {
        let pool = small_pool();
        let mut session = session_targeting(&pool, &Settings::default(), "75");
        let mut rng = StdRng::seed_from_u64(8);
        session.submit_guess("92", &mut rng).unwrap();
        let err = session.submit_guess("99", &mut rng).unwrap_err();
        assert!(matches!(err, QuizError::UnknownRegion(code) if code == "99"));
        assert_eq!(session.attempt_count(), 2);
        assert!(session.region("92").unwrap().guess_flag);
    }

    #[test]
    fn choices_include_target_once() {
        let pool = RegionPool::builtin().unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        let session = Session::start(&pool, &Settings::default().with_targets(3), &mut rng);
        let target = session.target().unwrap().code.clone();
        let choices = session.choices(4, &mut rng);
        assert_eq!(choices.len(), 4);
        assert_eq!(choices.iter().filter(|r| r.code == target).count(), 1);
        // two active distractors exist; the fourth comes from outside the subset
        assert_eq!(choices.iter().filter(|r| r.active).count(), 3);
    }

    #[test]
    fn choices_capped_by_pool() {
        let pool = small_pool();
        let mut rng = StdRng::seed_from_u64(2);
        let session = Session::start(&pool, &Settings::default(), &mut rng);
        assert_eq!(session.choices(10, &mut rng).len(), 5);
        assert_eq!(session.choices(1, &mut rng).len(), 1);
    }

    proptest! {
        #[test]
        fn invariants_hold_for_any_guess_sequence(
            seed in any::<u64>(),
            max_guesses in 1u8..=3,
            targets in 1usize..=5,
            guesses in proptest::collection::vec(0usize..5, 0..60),
        ) {
            let pool = small_pool();
            let settings = Settings::default()
                .with_max_guesses(max_guesses)
                .with_targets(targets);
            let mut rng = StdRng::seed_from_u64(seed);
            let mut session = Session::start(&pool, &settings, &mut rng);

            for g in guesses {
                let code = pool.regions()[g].code.clone();
                let target_before = session.target().map(|t| t.code.clone());
                let resolved_before = session.stats().seen;

                match session.submit_guess(&code, &mut rng) {
                    Ok(verdict) => {
                        let target_before = target_before.unwrap();
                        if verdict.ends_round() {
                            prop_assert_eq!(session.stats().seen, resolved_before + 1);
                            prop_assert!(session.region(&target_before).unwrap().outcome.is_resolved());
                            prop_assert_eq!(session.attempt_count(), 1);
                        } else {
                            prop_assert_eq!(session.target().map(|t| t.code.clone()), Some(target_before));
                        }
                    }
                    Err(QuizError::NoActiveTarget) => prop_assert!(target_before.is_none()),
                    Err(e) => prop_assert!(false, "unexpected error {e}"),
                }

                prop_assert!(session.regions().iter().filter(|r| r.guess_flag).count() <= 1);
                prop_assert!((1..=max_guesses).contains(&session.attempt_count()));
                prop_assert_eq!(session.is_complete(), session.target().is_none());
                prop_assert_eq!(session.stats().total, targets);
            }
        }
    }
}
