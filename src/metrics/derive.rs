use std::collections::BTreeMap;

use super::totals::{PlayerTotals, TotalsMap};
use super::types::{MetricSet, ratio};
use crate::config::settings::EligibilitySettings;
use crate::domain::{Camp, PlayerId};

const MS_PER_MINUTE: f64 = 60_000.0;

pub fn derive_metrics(
    totals: &TotalsMap,
    settings: &EligibilitySettings,
) -> BTreeMap<PlayerId, MetricSet> {
    totals
        .iter()
        .map(|(id, player)| (id.clone(), derive_player_metrics(player, settings)))
        .collect()
}

pub fn derive_player_metrics(totals: &PlayerTotals, settings: &EligibilitySettings) -> MetricSet {
    MetricSet {
        games_played: totals.games,
        camp_games: totals.camps.iter().map(|(c, t)| (*c, t.games)).collect(),
        camp_wins: totals.camps.iter().map(|(c, t)| (*c, t.wins)).collect(),
        role_counts: totals.roles.clone(),

        win_rate: ratio(totals.wins, totals.games),
        villager_win_rate: camp_win_rate(totals, Camp::Villager, settings),
        wolf_win_rate: camp_win_rate(totals, Camp::Wolf, settings),
        solo_win_rate: camp_win_rate(totals, Camp::Solo, settings),
        kill_rate: ratio(totals.kills, totals.camp(Camp::Wolf).games),
        survival_rate: ratio(totals.survivals, totals.games_with_death_data),
        early_death_rate: ratio(
            totals.deaths_up_to_day(settings.early_death_day),
            totals.games_with_death_data,
        ),
        voted_out_rate: ratio(totals.deaths_by_vote, totals.games_with_death_data),
        talk_per_minute: per_minute(totals.speech_ms as f64 / 1000.0, totals.speech_game_ms),
        loot_per_minute: per_minute(totals.loot as f64, totals.loot_game_ms),
        vote_participation: ratio(totals.votes_with_target, totals.votes_total),
        vote_accuracy: ratio(totals.accurate_votes, totals.judged_votes),
        first_vote_rate: ratio(totals.first_votes, totals.meetings_voted),
    }
}

fn camp_win_rate(
    totals: &PlayerTotals,
    camp: Camp,
    settings: &EligibilitySettings,
) -> Option<f64> {
    let camp_totals = totals.camp(camp);
    if camp_totals.games < u64::from(settings.min_camp_games) {
        return None;
    }
    ratio(camp_totals.wins, camp_totals.games)
}

fn per_minute(amount: f64, game_ms: u64) -> Option<f64> {
    (game_ms > 0).then(|| amount / (game_ms as f64 / MS_PER_MINUTE))
}
