use crate::achievements::{AchievementCounter, AchievementDefinition};
use crate::domain::Camp;
use crate::metrics::Stat;
use crate::percentiles::Category;
use crate::titles::{CampProfile, CombinationRule, ConditionSpec, RuleTable, TitleDefinition};

fn title(id: &str, priority: u32, condition: ConditionSpec) -> TitleDefinition {
    TitleDefinition {
        id: id.to_string(),
        priority,
        condition,
    }
}

fn combination(id: &str, priority: u32, conditions: Vec<ConditionSpec>) -> CombinationRule {
    CombinationRule {
        id: id.to_string(),
        priority,
        conditions,
    }
}

fn achievement(id: &str, counter: AchievementCounter, tiers: &[u64]) -> AchievementDefinition {
    AchievementDefinition {
        id: id.to_string(),
        counter,
        tiers: tiers.to_vec(),
    }
}

/// Built-in rule table used when no rules file is given.
/// Order matters: earlier titles win ties in claim strength.
pub fn default_rule_table() -> RuleTable {
    RuleTable {
        titles: default_titles(),
        combinations: default_combinations(),
        achievements: default_achievements(),
    }
}

fn default_titles() -> Vec<TitleDefinition> {
    use Category::*;
    use ConditionSpec as C;

    vec![
        title("champion", 100, C::category(Stat::WinRate, ExtremeHigh)),
        title("village_hero", 80, C::category(Stat::VillagerWinRate, High)),
        title("alpha_predator", 80, C::category(Stat::WolfWinRate, High)),
        title("free_spirit", 80, C::category(Stat::SoloWinRate, High)),
        title("executioner", 75, C::category(Stat::KillRate, ExtremeHigh)),
        title("survivor", 70, C::category(Stat::SurvivalRate, ExtremeHigh)),
        title("sharp_eye", 70, C::category(Stat::VoteAccuracy, ExtremeHigh)),
        title("orator", 65, C::category(Stat::TalkPerMinute, ExtremeHigh)),
        title("collector", 60, C::category(Stat::LootPerMinute, ExtremeHigh)),
        title("all_rounder", 60, C::camp_balance(CampProfile::Balanced)),
        title("specialist", 60, C::camp_balance(CampProfile::Specialist)),
        title("ballot_devotee", 55, C::at_least(Stat::VoteParticipation, ExtremeHigh, High)),
        title("trendsetter", 55, C::category(Stat::FirstVoteRate, ExtremeHigh)),
        title("seer_devotee", 50, C::role("seer", 30.0)),
        title("witch_devotee", 50, C::role("witch", 25.0)),
        title("hunter_devotee", 50, C::role("hunter", 25.0)),
        title("silent_one", 50, C::category(Stat::TalkPerMinute, ExtremeLow)),
        title("first_victim", 45, C::category(Stat::EarlyDeathRate, ExtremeHigh)),
        title("scapegoat", 45, C::category(Stat::VotedOutRate, ExtremeHigh)),
        title("underdog", 40, C::category(Stat::WinRate, ExtremeLow)),
        title("pacifist", 35, C::category(Stat::KillRate, ExtremeLow)),
        title("abstainer", 30, C::category(Stat::VoteParticipation, ExtremeLow)),
        title("regular", 20, C::min_value(Stat::GamesPlayed, 200.0)),
    ]
}

fn default_combinations() -> Vec<CombinationRule> {
    use Category::*;
    use ConditionSpec as C;

    vec![
        combination(
            "alpha_wolf",
            150,
            vec![C::category(Stat::WolfWinRate, High), C::category(Stat::KillRate, High)],
        ),
        combination(
            "village_oracle",
            145,
            vec![
                C::category(Stat::VoteAccuracy, High),
                C::category(Stat::VillagerWinRate, AboveAverage),
            ],
        ),
        combination(
            "silver_tongue",
            140,
            vec![C::category(Stat::TalkPerMinute, High), C::category(Stat::WinRate, High)],
        ),
        combination(
            "untouchable",
            135,
            vec![C::category(Stat::SurvivalRate, ExtremeHigh), C::category(Stat::VotedOutRate, Low)],
        ),
        combination(
            "ringleader",
            130,
            vec![C::category(Stat::FirstVoteRate, High), C::category(Stat::VoteParticipation, High)],
        ),
        combination(
            "scavenger_king",
            125,
            vec![C::category(Stat::LootPerMinute, ExtremeHigh), C::category(Stat::SurvivalRate, High)],
        ),
        combination(
            "lone_survivor",
            125,
            vec![C::category(Stat::SoloWinRate, High), C::category(Stat::SurvivalRate, High)],
        ),
        combination(
            "quiet_assassin",
            120,
            vec![C::category(Stat::KillRate, High), C::category(Stat::TalkPerMinute, Low)],
        ),
        combination(
            "doomed_herald",
            110,
            vec![C::category(Stat::EarlyDeathRate, ExtremeHigh), C::category(Stat::TalkPerMinute, High)],
        ),
    ]
}

fn default_achievements() -> Vec<AchievementDefinition> {
    use AchievementCounter::*;

    vec![
        achievement("veteran", GamesPlayed, &[10, 50, 100, 250, 500]),
        achievement("victor", Wins, &[5, 25, 100, 250]),
        achievement("village_guardian", CampWins(Camp::Villager), &[5, 25, 100]),
        achievement("pack_hunter", CampWins(Camp::Wolf), &[5, 25, 100]),
        achievement("lone_wolf", CampWins(Camp::Solo), &[1, 10, 25]),
        achievement("hunter", Kills, &[1, 10, 50, 100]),
        achievement("still_standing", Survivals, &[5, 25, 100]),
        achievement("civic_duty", VotesCast, &[10, 100, 500]),
        achievement("detective", AccurateVotes, &[5, 50, 200]),
        achievement("hoarder", LootCollected, &[100, 1000, 10000]),
        achievement("seer_path", RoleGames("seer".to_string()), &[5, 25, 50]),
    ]
}
