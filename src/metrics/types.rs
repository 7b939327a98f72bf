use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::Camp;

/// Per-player metrics that take part in percentile distributions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    GamesPlayed,
    WinRate,
    VillagerWinRate,
    WolfWinRate,
    SoloWinRate,
    KillRate,
    SurvivalRate,
    EarlyDeathRate,
    VotedOutRate,
    TalkPerMinute,
    LootPerMinute,
    VoteParticipation,
    VoteAccuracy,
    FirstVoteRate,
}

impl Stat {
    pub const ALL: [Stat; 14] = [
        Stat::GamesPlayed,
        Stat::WinRate,
        Stat::VillagerWinRate,
        Stat::WolfWinRate,
        Stat::SoloWinRate,
        Stat::KillRate,
        Stat::SurvivalRate,
        Stat::EarlyDeathRate,
        Stat::VotedOutRate,
        Stat::TalkPerMinute,
        Stat::LootPerMinute,
        Stat::VoteParticipation,
        Stat::VoteAccuracy,
        Stat::FirstVoteRate,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Stat::GamesPlayed => "games_played",
            Stat::WinRate => "win_rate",
            Stat::VillagerWinRate => "villager_win_rate",
            Stat::WolfWinRate => "wolf_win_rate",
            Stat::SoloWinRate => "solo_win_rate",
            Stat::KillRate => "kill_rate",
            Stat::SurvivalRate => "survival_rate",
            Stat::EarlyDeathRate => "early_death_rate",
            Stat::VotedOutRate => "voted_out_rate",
            Stat::TalkPerMinute => "talk_per_minute",
            Stat::LootPerMinute => "loot_per_minute",
            Stat::VoteParticipation => "vote_participation",
            Stat::VoteAccuracy => "vote_accuracy",
            Stat::FirstVoteRate => "first_vote_rate",
        }
    }

    pub fn camp_win_rate(camp: Camp) -> Stat {
        match camp {
            Camp::Villager => Stat::VillagerWinRate,
            Camp::Wolf => Stat::WolfWinRate,
            Camp::Solo => Stat::SoloWinRate,
        }
    }
}

/// Derived metrics for one player. `None` means the sample was empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    pub games_played: u64,
    pub camp_games: BTreeMap<Camp, u64>,
    pub camp_wins: BTreeMap<Camp, u64>,
    pub role_counts: BTreeMap<String, u64>,

    pub win_rate: Option<f64>,
    pub villager_win_rate: Option<f64>,
    pub wolf_win_rate: Option<f64>,
    pub solo_win_rate: Option<f64>,
    pub kill_rate: Option<f64>,
    pub survival_rate: Option<f64>,
    pub early_death_rate: Option<f64>,
    pub voted_out_rate: Option<f64>,
    pub talk_per_minute: Option<f64>,
    pub loot_per_minute: Option<f64>,
    pub vote_participation: Option<f64>,
    pub vote_accuracy: Option<f64>,
    pub first_vote_rate: Option<f64>,
}

impl MetricSet {
    pub fn get(&self, stat: Stat) -> Option<f64> {
        match stat {
            Stat::GamesPlayed => Some(self.games_played as f64),
            Stat::WinRate => self.win_rate,
            Stat::VillagerWinRate => self.villager_win_rate,
            Stat::WolfWinRate => self.wolf_win_rate,
            Stat::SoloWinRate => self.solo_win_rate,
            Stat::KillRate => self.kill_rate,
            Stat::SurvivalRate => self.survival_rate,
            Stat::EarlyDeathRate => self.early_death_rate,
            Stat::VotedOutRate => self.voted_out_rate,
            Stat::TalkPerMinute => self.talk_per_minute,
            Stat::LootPerMinute => self.loot_per_minute,
            Stat::VoteParticipation => self.vote_participation,
            Stat::VoteAccuracy => self.vote_accuracy,
            Stat::FirstVoteRate => self.first_vote_rate,
        }
    }

    pub fn camp_win_rate(&self, camp: Camp) -> Option<f64> {
        self.get(Stat::camp_win_rate(camp))
    }

    pub fn role_count(&self, role: &str) -> u64 {
        self.role_counts.get(role).copied().unwrap_or(0)
    }

    /// Share of games played in `role`, as a percentage
    pub fn role_percentage(&self, role: &str) -> Option<f64> {
        ratio(self.role_count(role), self.games_played).map(|r| r * 100.0)
    }
}

/// `numerator / denominator`, or `None` for an empty sample
pub fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64)
}
