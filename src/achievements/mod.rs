use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{Camp, GameId, GameRecord, PlayerId};
use crate::metrics::{PlayerTotals, TotalsMap, fold_game};

/// Running count an achievement is unlocked by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCounter {
    GamesPlayed,
    Wins,
    CampWins(Camp),
    Kills,
    Survivals,
    VotesCast,
    AccurateVotes,
    LootCollected,
    RoleGames(String),
}

impl AchievementCounter {
    pub fn read(&self, totals: &PlayerTotals) -> u64 {
        match self {
            AchievementCounter::GamesPlayed => totals.games,
            AchievementCounter::Wins => totals.wins,
            AchievementCounter::CampWins(camp) => totals.camp(*camp).wins,
            AchievementCounter::Kills => totals.kills,
            AchievementCounter::Survivals => totals.survivals,
            AchievementCounter::VotesCast => totals.votes_with_target,
            AchievementCounter::AccurateVotes => totals.accurate_votes,
            AchievementCounter::LootCollected => totals.loot_collected,
            AchievementCounter::RoleGames(role) => totals.roles.get(role).copied().unwrap_or(0),
        }
    }
}

/// Tiered achievement; `tiers` are ascending absolute thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementDefinition {
    pub id: String,
    pub counter: AchievementCounter,
    pub tiers: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockedTier {
    /// 1-based tier level
    pub level: usize,
    pub threshold: u64,
    /// Game in which the threshold was first reached
    pub game_id: GameId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementProgress {
    pub achievement_id: String,
    pub current: u64,
    pub levels: Vec<UnlockedTier>,
}

pub type AchievementReport = BTreeMap<PlayerId, Vec<AchievementProgress>>;

/// Replay games in order and record the game where each tier was crossed.
/// `games` must already be in chronological order.
pub fn compute_achievements<'a, I>(games: I, definitions: &[AchievementDefinition]) -> AchievementReport
where
    I: IntoIterator<Item = &'a GameRecord>,
{
    let mut totals = TotalsMap::new();
    let mut unlocked: BTreeMap<PlayerId, Vec<Vec<UnlockedTier>>> = BTreeMap::new();

    for game in games {
        if !fold_game(&mut totals, game) {
            continue;
        }

        let players: BTreeSet<&PlayerId> = game
            .participants
            .iter()
            .map(|p| &p.player_id)
            .filter(|id| !id.is_empty())
            .collect();

        for player_id in players {
            let Some(player_totals) = totals.get(player_id) else {
                continue;
            };
            let player_unlocked = unlocked
                .entry(player_id.clone())
                .or_insert_with(|| vec![Vec::new(); definitions.len()]);

            for (definition, reached) in definitions.iter().zip(player_unlocked.iter_mut()) {
                record_crossings(definition, player_totals, &game.id, reached);
            }
        }
    }

    let report = build_report(&totals, unlocked, definitions);
    info!("  → {} players unlocked at least one achievement", report.len());
    report
}

fn record_crossings(
    definition: &AchievementDefinition,
    totals: &PlayerTotals,
    game_id: &str,
    reached: &mut Vec<UnlockedTier>,
) {
    let current = definition.counter.read(totals);

    while let Some(&threshold) = definition.tiers.get(reached.len()) {
        if current < threshold {
            break;
        }
        reached.push(UnlockedTier {
            level: reached.len() + 1,
            threshold,
            game_id: game_id.to_string(),
        });
    }
}

fn build_report(
    totals: &TotalsMap,
    unlocked: BTreeMap<PlayerId, Vec<Vec<UnlockedTier>>>,
    definitions: &[AchievementDefinition],
) -> AchievementReport {
    unlocked
        .into_iter()
        .filter_map(|(player_id, per_definition)| {
            let player_totals = totals.get(&player_id)?;
            let progress: Vec<AchievementProgress> = definitions
                .iter()
                .zip(per_definition)
                .filter(|(_, levels)| !levels.is_empty())
                .map(|(definition, levels)| AchievementProgress {
                    achievement_id: definition.id.clone(),
                    current: definition.counter.read(player_totals),
                    levels,
                })
                .collect();

            (!progress.is_empty()).then_some((player_id, progress))
        })
        .collect()
}
