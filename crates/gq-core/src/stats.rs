//! Score summaries derived from region outcomes.

use serde::Serialize;

use crate::region::{Outcome, Region};

/// Counts over the active regions of a session or history snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Stats {
    /// Regions in play.
    pub total: usize,
    /// Regions already resolved.
    pub seen: usize,
    /// Found on the first attempt.
    pub correct: usize,
    /// Found on the second attempt.
    pub second: usize,
    /// Found on the third attempt.
    pub third: usize,
    /// Revealed after every attempt failed.
    pub error: usize,
}

/// Count outcomes over the active regions.
pub fn compute_stats<'a>(regions: impl IntoIterator<Item = &'a Region>) -> Stats {
    let mut stats = Stats::default();
    for region in regions.into_iter().filter(|r| r.active) {
        stats.total += 1;
        match region.outcome {
            Outcome::Unattempted => continue,
            Outcome::FoundOnAttempt(1) => stats.correct += 1,
            Outcome::FoundOnAttempt(2) => stats.second += 1,
            Outcome::FoundOnAttempt(_) => stats.third += 1,
            Outcome::Missed => stats.error += 1,
        }
        stats.seen += 1;
    }
    stats
}

impl Stats {
    /// Active regions not yet resolved.
    pub fn remaining(&self) -> usize {
        self.total - self.seen
    }

    /// `count / total`, or 0 when nothing is in play.
    pub fn ratio(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64
        }
    }

    /// `count` as a rounded percentage of `total`.
    pub fn percent(&self, count: usize) -> u32 {
        (self.ratio(count) * 100.0).round() as u32
    }

    /// Share of first-attempt answers.
    pub fn correct_percent(&self) -> u32 {
        self.percent(self.correct)
    }

    /// Share of second-attempt answers.
    pub fn second_percent(&self) -> u32 {
        self.percent(self.second)
    }

    /// Share of third-attempt answers.
    pub fn third_percent(&self) -> u32 {
        self.percent(self.third)
    }

    /// Share of missed regions.
    pub fn error_percent(&self) -> u32 {
        self.percent(self.error)
    }

    /// Compact one-line summary, omitting attempt buckets above `max_attempts`.
    pub fn summary(&self, max_attempts: u8) -> String {
        let mut parts = vec![format!("{}% first", self.correct_percent())];
        if max_attempts > 1 {
            parts.push(format!("{}% second", self.second_percent()));
        }
        if max_attempts > 2 {
            parts.push(format!("{}% third", self.third_percent()));
        }
        parts.push(format!("{}% missed", self.error_percent()));
        format!("{}/{} | {}", self.seen, self.total, parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(code: &str, active: bool, outcome: Outcome) -> Region {
        let mut r = Region::new(code, code);
        r.active = active;
        r.outcome = outcome;
        r
    }

    #[test]
    fn empty_set_yields_zeroes() {
        let stats = compute_stats(&[]);
        assert_eq!(stats, Stats::default());
        assert_eq!(stats.correct_percent(), 0);
        assert_eq!(stats.error_percent(), 0);
        assert!(stats.ratio(0).is_finite());
    }

    #[test]
    fn only_inactive_regions_yield_zeroes() {
        let regions = vec![
            region("01", false, Outcome::FoundOnAttempt(1)),
            region("02", false, Outcome::Missed),
        ];
        let stats = compute_stats(&regions);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.seen, 0);
        assert_eq!(stats.summary(3), "0/0 | 0% first, 0% second, 0% third, 0% missed");
    }

    #[test]
    fn counts_each_bucket() {
        let regions = vec![
            region("01", true, Outcome::FoundOnAttempt(1)),
            region("02", true, Outcome::FoundOnAttempt(2)),
            region("03", true, Outcome::FoundOnAttempt(3)),
            region("04", true, Outcome::Missed),
            region("05", true, Outcome::Unattempted),
            region("06", false, Outcome::Missed),
        ];
        let stats = compute_stats(&regions);
        assert_eq!(
            stats,
            Stats {
                total: 5,
                seen: 4,
                correct: 1,
                second: 1,
                third: 1,
                error: 1,
            }
        );
        assert_eq!(stats.remaining(), 1);
        assert_eq!(stats.correct_percent(), 20);
    }

    #[test]
    fn summary_hides_unused_attempts() {
        let regions = vec![region("01", true, Outcome::FoundOnAttempt(1))];
        let stats = compute_stats(&regions);
        assert_eq!(stats.summary(1), "1/1 | 100% first, 0% missed");
    }
}
