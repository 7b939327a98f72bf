use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::models::{GameRecord, Ruleset};

/// Subset of the game history that statistics are computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DatasetSlice {
    /// Every recorded game
    All,
    /// Only games played with the standard ruleset
    Standard,
}

impl DatasetSlice {
    pub const ALL: [DatasetSlice; 2] = [DatasetSlice::All, DatasetSlice::Standard];

    pub fn includes(&self, game: &GameRecord) -> bool {
        match self {
            DatasetSlice::All => true,
            DatasetSlice::Standard => game.ruleset == Ruleset::Standard,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DatasetSlice::All => "all",
            DatasetSlice::Standard => "standard",
        }
    }
}
