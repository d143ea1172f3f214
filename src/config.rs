//! Construction-time race configuration.
//!
//! Every rule variant is a field here rather than a separate engine: reversed
//! camels, extra or wildcard dice, desert tiles, final wagers and partnerships
//! can each be switched on independently. Three presets cover the common
//! tables; anything else can be loaded from JSON.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::{CamelColor, Die};

/// Shortest track a race can be configured with.
pub const MIN_FINISH_LINE: i32 = 4;

/// Longest track a race can be configured with.
pub const MAX_FINISH_LINE: i32 = 256;

/// Error type for configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// Config file is not valid JSON for a [`RaceConfig`].
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Config parsed but is inconsistent.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// Too few or too many players for a race.
    #[error("a race needs 2 to 8 players, got {0}")]
    PlayerCount(usize),
    /// Unknown preset name.
    #[error("unknown variant '{0}' (expected classic, crazy or full)")]
    UnknownVariant(String),
}

/// How camels are arranged before the first leg.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartLayout {
    /// Racing camels stacked on square 0 in listed order, bottom first;
    /// reversed camels stacked on the square before the finish line.
    #[default]
    Stacked,
    /// Each camel placed by a setup roll: racing camels on `steps - 1`,
    /// reversed camels on `finish_line - steps`, later rolls stacking on top.
    Rolled,
}

/// Named presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Five racing camels, five dice, desert tiles.
    #[default]
    Classic,
    /// Classic plus white and black reversed camels, each with its own die.
    Crazy,
    /// Reversed camels behind one wildcard die, final wagers, partnerships,
    /// and strict tile spacing.
    Full,
}

impl Variant {
    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Crazy => "crazy",
            Variant::Full => "full",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Ok(Variant::Classic),
            "crazy" => Ok(Variant::Crazy),
            "full" => Ok(Variant::Full),
            _ => Err(ConfigError::UnknownVariant(s.to_string())),
        }
    }
}

/// Configuration for one race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Racing camels, in setup order.
    pub racing_camels: Vec<CamelColor>,
    /// Reversed camels, in setup order.
    pub reversed_camels: Vec<CamelColor>,
    /// Dice in the pyramid each leg.
    pub dice: Vec<Die>,
    /// First square that counts as finished.
    pub finish_line: i32,
    /// Opening arrangement.
    pub start: StartLayout,
    /// Coins each player starts with.
    pub starting_money: u32,
    /// Betting-ticket face values per camel per leg, highest first.
    pub ticket_values: Vec<u32>,
    /// Payouts for the 1st, 2nd, ... correct final wager; the last repeats.
    pub final_payouts: Vec<u32>,
    /// Coins a tile's owner earns each time camels land on it.
    pub tile_payout: u32,
    /// Pay `tile_payout` once when the tile is placed instead of on landings.
    pub tile_payout_on_place: bool,
    /// Whether desert tiles can be placed.
    pub desert_tiles: bool,
    /// Whether tiles may not sit next to each other.
    pub strict_tile_adjacency: bool,
    /// Whether tiles are removed at the end of every leg.
    pub clear_tiles_each_leg: bool,
    /// Whether final winner/loser wagers are played.
    pub final_wagers: bool,
    /// Whether players may partner up for a leg.
    pub partnerships: bool,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl RaceConfig {
    /// Five racing camels on a 16-square track.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            racing_camels: CamelColor::RACING.to_vec(),
            reversed_camels: Vec::new(),
            dice: CamelColor::RACING.into_iter().map(Die::Camel).collect(),
            finish_line: 16,
            start: StartLayout::Stacked,
            starting_money: 3,
            ticket_values: vec![5, 3, 2],
            final_payouts: vec![8, 5, 3, 2, 1],
            tile_payout: 1,
            tile_payout_on_place: false,
            desert_tiles: true,
            strict_tile_adjacency: false,
            clear_tiles_each_leg: true,
            final_wagers: false,
            partnerships: false,
        }
    }

    /// Classic plus two reversed camels with a die each.
    #[must_use]
    pub fn crazy() -> Self {
        let mut config = Self::classic();
        config.reversed_camels = CamelColor::REVERSED.to_vec();
        config
            .dice
            .extend(CamelColor::REVERSED.into_iter().map(Die::Camel));
        config
    }

    /// Every rule enabled.
    #[must_use]
    pub fn full() -> Self {
        let mut config = Self::classic();
        config.reversed_camels = CamelColor::REVERSED.to_vec();
        config.dice.push(Die::Wildcard);
        config.start = StartLayout::Rolled;
        config.ticket_values = vec![5, 3, 2, 2];
        config.strict_tile_adjacency = true;
        config.final_wagers = true;
        config.partnerships = true;
        config
    }

    /// Preset by name.
    #[must_use]
    pub fn preset(variant: Variant) -> Self {
        match variant {
            Variant::Classic => Self::classic(),
            Variant::Crazy => Self::crazy(),
            Variant::Full => Self::full(),
        }
    }

    /// Parse and validate a JSON config.
    ///
    /// Missing fields take their classic values.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the config is inconsistent.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the config is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if !(2..=CamelColor::RACING.len()).contains(&self.racing_camels.len()) {
            return invalid(format!(
                "need 2 to {} racing camels, got {}",
                CamelColor::RACING.len(),
                self.racing_camels.len()
            ));
        }
        if let Some(c) = self.racing_camels.iter().find(|c| !c.is_racing()) {
            return invalid(format!("{c} cannot be a racing camel"));
        }
        if let Some(c) = self.reversed_camels.iter().find(|c| c.is_racing()) {
            return invalid(format!("{c} cannot be a reversed camel"));
        }

        let mut camels = BTreeSet::new();
        for &color in self.racing_camels.iter().chain(&self.reversed_camels) {
            if !camels.insert(color) {
                return invalid(format!("{color} is listed twice"));
            }
        }

        if self.dice.is_empty() {
            return invalid("the pyramid needs at least one die".to_string());
        }
        let mut dice = BTreeSet::new();
        let mut wildcards = 0;
        for die in &self.dice {
            match die {
                Die::Camel(color) => {
                    if !camels.contains(color) {
                        return invalid(format!("die for {color}, which is not in the race"));
                    }
                    if !dice.insert(*color) {
                        return invalid(format!("two dice for {color}"));
                    }
                }
                Die::Wildcard => wildcards += 1,
            }
        }
        if wildcards > 1 {
            return invalid("at most one wildcard die".to_string());
        }
        if wildcards == 1 && self.reversed_camels.is_empty() {
            return invalid("wildcard die without reversed camels".to_string());
        }
        if let Some(c) = self.racing_camels.iter().find(|c| !dice.contains(c)) {
            return invalid(format!("racing camel {c} has no die"));
        }

        if self.finish_line < MIN_FINISH_LINE {
            return invalid(format!(
                "finish line {} is shorter than {MIN_FINISH_LINE}",
                self.finish_line
            ));
        }
        if self.finish_line > MAX_FINISH_LINE {
            return invalid(format!(
                "finish line {} is longer than {MAX_FINISH_LINE}",
                self.finish_line
            ));
        }

        if self.ticket_values.is_empty() {
            return invalid("ticket stacks need at least one value".to_string());
        }
        if !is_non_increasing(&self.ticket_values) {
            return invalid("ticket values must not increase".to_string());
        }
        if self.final_wagers {
            if self.final_payouts.is_empty() {
                return invalid("final wagers need a payout schedule".to_string());
            }
            if !is_non_increasing(&self.final_payouts) {
                return invalid("final payouts must not increase".to_string());
            }
        }

        Ok(())
    }
}

fn is_non_increasing(values: &[u32]) -> bool {
    values.windows(2).all(|w| w[0] >= w[1])
}
