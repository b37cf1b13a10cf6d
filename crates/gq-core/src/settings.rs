//! Player settings, persisted as a single document.

use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{QuizError, QuizResult};
use crate::region::{MAX_ATTEMPTS, Region};
use crate::storage::KeyValueStore;

/// Storage key holding the settings document.
pub const SETTINGS_KEY: &str = "settings";

/// How the player designates a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Click the target on the map.
    #[default]
    #[serde(rename = "Point")]
    PointOnMap,
    /// Type the name of the highlighted region.
    #[serde(rename = "Name")]
    TypeName,
    /// Pick the highlighted region among a few choices.
    #[serde(rename = "Choice")]
    PickFromChoices,
}

impl GameMode {
    /// Every mode, in menu order.
    pub const ALL: [GameMode; 3] = [Self::PointOnMap, Self::TypeName, Self::PickFromChoices];
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PointOnMap => write!(f, "point"),
            Self::TypeName => write!(f, "name"),
            Self::PickFromChoices => write!(f, "choice"),
        }
    }
}

impl FromStr for GameMode {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "point" | "map" => Ok(Self::PointOnMap),
            "name" | "type" => Ok(Self::TypeName),
            "choice" | "choices" | "pick" => Ok(Self::PickFromChoices),
            other => Err(QuizError::validation(
                "gameMode",
                format!("unknown mode \"{other}\", use: point, name, choice"),
            )),
        }
    }
}

/// Which map layers are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapVisibility {
    /// City labels.
    pub cities: bool,
    /// Administrative region boundaries.
    pub regions: bool,
}

impl Default for MapVisibility {
    fn default() -> Self {
        Self {
            cities: true,
            regions: true,
        }
    }
}

/// Which identifiers are shown when naming a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionIdentifiers {
    /// Show the region name.
    #[serde(rename = "nom")]
    pub name: bool,
    /// Show the region code.
    pub code: bool,
    /// Show the prefecture.
    pub prefecture: bool,
}

impl Default for RegionIdentifiers {
    fn default() -> Self {
        Self {
            name: true,
            code: true,
            prefecture: false,
        }
    }
}

impl RegionIdentifiers {
    /// At least one identifier must stay visible.
    pub fn validate(&self) -> QuizResult<()> {
        if self.name || self.code || self.prefecture {
            Ok(())
        } else {
            Err(QuizError::validation(
                "ids",
                "at least one identifier must be shown",
            ))
        }
    }

    /// Label a region with the enabled identifiers, e.g. `"75 - Paris"`.
    pub fn label(&self, region: &Region) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if self.code {
            parts.push(&region.code);
        }
        if self.name {
            parts.push(&region.name);
        }
        if let Some(p) = region.prefecture.as_deref().filter(|_| self.prefecture) {
            parts.push(p);
        }
        parts.join(" - ")
    }

    /// Parse a comma-separated list such as `"code,nom"`.
    pub fn parse_list(list: &str) -> QuizResult<Self> {
        let mut ids = Self {
            name: false,
            code: false,
            prefecture: false,
        };
        for item in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match item.to_lowercase().as_str() {
                "nom" | "name" => ids.name = true,
                "code" => ids.code = true,
                "prefecture" | "préfecture" => ids.prefecture = true,
                other => {
                    return Err(QuizError::validation(
                        "ids",
                        format!("unknown identifier \"{other}\", use: code, nom, prefecture"),
                    ));
                }
            }
        }
        ids.validate()?;
        Ok(ids)
    }
}

/// Everything the player can configure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Map layer flags.
    pub visibility: MapVisibility,
    /// Identifier display flags.
    pub ids: RegionIdentifiers,
    /// Attempts per target (1-3).
    pub max_guesses: u8,
    /// How guesses are entered.
    pub game_mode: GameMode,
    /// Regions in play per session; `None` plays the whole pool.
    pub number_of_targets: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            visibility: MapVisibility::default(),
            ids: RegionIdentifiers::default(),
            max_guesses: MAX_ATTEMPTS,
            game_mode: GameMode::default(),
            number_of_targets: None,
        }
    }
}

impl Settings {
    /// Set the attempts per target.
    pub fn with_max_guesses(mut self, max_guesses: u8) -> Self {
        self.max_guesses = max_guesses;
        self
    }

    /// Set the game mode.
    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.game_mode = mode;
        self
    }

    /// Set the number of regions in play.
    pub fn with_targets(mut self, targets: usize) -> Self {
        self.number_of_targets = Some(targets);
        self
    }

    /// Reject attempt counts outside `1..=3`.
    pub fn validate_max_guesses(value: u32) -> QuizResult<u8> {
        if (1..=u32::from(MAX_ATTEMPTS)).contains(&value) {
            Ok(value as u8)
        } else {
            Err(QuizError::validation(
                "maxGuesses",
                format!("the number of attempts must be between 1 and {MAX_ATTEMPTS}"),
            ))
        }
    }

    /// Reject subset sizes outside `1..=pool_size`.
    pub fn validate_targets(value: usize, pool_size: usize) -> QuizResult<usize> {
        if value > 0 && value <= pool_size {
            Ok(value)
        } else {
            Err(QuizError::validation(
                "numberOfTargets",
                format!("the number of regions must be between 1 and {pool_size}"),
            ))
        }
    }

    /// Number of regions to activate for a pool of `pool_size`.
    pub fn subset_size(&self, pool_size: usize) -> usize {
        match self.number_of_targets {
            Some(n) if n > 0 => n.min(pool_size),
            _ => pool_size,
        }
    }

    /// Load settings, falling back to defaults for anything missing or invalid.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let raw = match store.get(SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::default(),
            Err(e) => {
                warn!("settings unavailable, using defaults: {e}");
                return Self::default();
            }
        };
        let mut settings: Self = match serde_json::from_str(&raw) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("malformed settings, using defaults: {e}");
                return Self::default();
            }
        };
        if Self::validate_max_guesses(u32::from(settings.max_guesses)).is_err() {
            warn!(
                "stored maxGuesses {} out of range, using {MAX_ATTEMPTS}",
                settings.max_guesses
            );
            settings.max_guesses = MAX_ATTEMPTS;
        }
        if settings.ids.validate().is_err() {
            warn!("stored identifier flags are all off, using defaults");
            settings.ids = RegionIdentifiers::default();
        }
        settings
    }

    /// Write the whole document in one operation.
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> QuizResult<()> {
        let raw = serde_json::to_string(self).map_err(crate::error::StorageError::from)?;
        store.set(SETTINGS_KEY, &raw)?;
        Ok(())
    }
}
