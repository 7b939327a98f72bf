use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{Camp, PlayerId};

pub type TotalsMap = BTreeMap<PlayerId, PlayerTotals>;

/// Running integer totals for one player.
///
/// Everything here is a plain count so that folding games one batch at a
/// time gives exactly the same state as folding them all at once. Rates are
/// only ever derived from these totals, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTotals {
    pub games: u64,
    pub wins: u64,
    pub camps: BTreeMap<Camp, CampTotals>,
    pub roles: BTreeMap<String, u64>,

    pub games_with_death_data: u64,
    pub survivals: u64,
    pub deaths_by_vote: u64,
    /// Number of deaths per day of death
    pub death_days: BTreeMap<u32, u64>,
    pub kills: u64,

    /// All loot picked up, whether or not the game length is known
    pub loot_collected: u64,
    pub speech_ms: u64,
    pub speech_game_ms: u64,
    pub loot: u64,
    pub loot_game_ms: u64,

    pub votes_total: u64,
    pub votes_with_target: u64,
    pub judged_votes: u64,
    pub accurate_votes: u64,
    pub meetings_voted: u64,
    pub first_votes: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampTotals {
    pub games: u64,
    pub wins: u64,
}

impl PlayerTotals {
    pub fn camp(&self, camp: Camp) -> CampTotals {
        self.camps.get(&camp).copied().unwrap_or_default()
    }

    pub fn deaths_up_to_day(&self, day: u32) -> u64 {
        self.death_days.range(..=day).map(|(_, count)| count).sum()
    }
}
