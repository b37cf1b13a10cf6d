//! Regions and their per-session outcome.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Highest attempt number a region can be found on.
pub const MAX_ATTEMPTS: u8 = 3;

/// Wire value of [`Outcome::Missed`].
const MISSED_CODE: u8 = MAX_ATTEMPTS + 1;

/// What happened to a region during the current session.
///
/// Persisted as the integer `found` field: `0` unattempted, `1..=3` the
/// attempt on which it was found, `4` missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Outcome {
    /// Not yet resolved.
    #[default]
    Unattempted,
    /// Identified on the given attempt (1-based).
    FoundOnAttempt(u8),
    /// All attempts were used up; the answer was revealed.
    Missed,
}

impl Outcome {
    /// Whether the region has left the unattempted state.
    pub fn is_resolved(self) -> bool {
        !matches!(self, Self::Unattempted)
    }
}

impl From<Outcome> for u8 {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Unattempted => 0,
            Outcome::FoundOnAttempt(n) => n,
            Outcome::Missed => MISSED_CODE,
        }
    }
}

impl TryFrom<u8> for Outcome {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Unattempted),
            1..=MAX_ATTEMPTS => Ok(Self::FoundOnAttempt(value)),
            MISSED_CODE => Ok(Self::Missed),
            other => Err(format!("invalid outcome code {other}")),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unattempted => write!(f, "unattempted"),
            Self::FoundOnAttempt(n) => write!(f, "found on attempt {n}"),
            Self::Missed => write!(f, "missed"),
        }
    }
}

fn default_active() -> bool {
    true
}

/// A selectable geographic region.
///
/// `code` and `name` identify the region; the remaining fields belong to
/// the session that currently holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Short identifier (e.g. `"75"`, `"2A"`).
    pub code: String,
    /// Display name.
    #[serde(rename = "nom")]
    pub name: String,
    /// Administrative seat, when the dataset provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefecture: Option<String>,
    /// Whether the region is part of the subset being played.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Result of this session's round for the region.
    #[serde(rename = "found", default)]
    pub outcome: Outcome,
    /// Marks the most recent incorrect guess.
    #[serde(rename = "guess", default)]
    pub guess_flag: bool,
}

impl Region {
    /// Create an active, unattempted region.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            prefecture: None,
            active: true,
            outcome: Outcome::Unattempted,
            guess_flag: false,
        }
    }

    /// Set the prefecture.
    pub fn with_prefecture(mut self, prefecture: impl Into<String>) -> Self {
        self.prefecture = Some(prefecture.into());
        self
    }

    /// Active and still waiting to be played.
    pub fn is_open(&self) -> bool {
        self.active && self.outcome == Outcome::Unattempted
    }

    /// Clear all per-session state.
    pub(crate) fn reset(&mut self, active: bool) {
        self.active = active;
        self.outcome = Outcome::Unattempted;
        self.guess_flag = false;
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_codes() {
        assert_eq!(u8::from(Outcome::Unattempted), 0);
        assert_eq!(u8::from(Outcome::FoundOnAttempt(2)), 2);
        assert_eq!(u8::from(Outcome::Missed), 4);
        assert_eq!(Outcome::try_from(3u8), Ok(Outcome::FoundOnAttempt(3)));
        assert_eq!(Outcome::try_from(4u8), Ok(Outcome::Missed));
        assert!(Outcome::try_from(5u8).is_err());
    }

    #[test]
    fn region_wire_names() {
        let mut region = Region::new("75", "Paris");
        region.outcome = Outcome::FoundOnAttempt(1);
        let json = serde_json::to_value(&region).unwrap();
        assert_eq!(json["nom"], "Paris");
        assert_eq!(json["found"], 1);
        assert_eq!(json["guess"], false);
        assert!(json.get("prefecture").is_none());
    }

    #[test]
    fn sparse_snapshot_uses_defaults() {
        let region: Region = serde_json::from_str(r#"{"code":"33","nom":"Gironde"}"#).unwrap();
        assert!(region.active);
        assert_eq!(region.outcome, Outcome::Unattempted);
        assert!(!region.guess_flag);
        assert!(region.is_open());
    }

    #[test]
    fn rejects_unknown_outcome_code() {
        let res: Result<Region, _> =
            serde_json::from_str(r#"{"code":"33","nom":"Gironde","found":9}"#);
        assert!(res.is_err());
    }

    #[test]
    fn reset_clears_session_fields() {
        let mut region = Region::new("13", "Bouches-du-Rhône");
        region.outcome = Outcome::Missed;
        region.guess_flag = true;
        region.reset(false);
        assert!(!region.active);
        assert_eq!(region.outcome, Outcome::Unattempted);
        assert!(!region.guess_flag);
        assert!(!region.is_open());
    }
}
