use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};

use super::totals::{PlayerTotals, TotalsMap};
use crate::domain::{Camp, DeathCause, GameRecord, ParticipantEntry};

/// Outcome of folding a batch of games into running totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FoldSummary {
    pub folded: usize,
    pub skipped: usize,
}

/// Fold a fresh set of totals from a stream of games
pub fn aggregate_totals<'a, I>(games: I) -> (TotalsMap, FoldSummary)
where
    I: IntoIterator<Item = &'a GameRecord>,
{
    let mut totals = TotalsMap::new();
    let summary = fold_games(&mut totals, games);
    (totals, summary)
}

/// Add the effect of `games` onto existing totals
pub fn fold_games<'a, I>(totals: &mut TotalsMap, games: I) -> FoldSummary
where
    I: IntoIterator<Item = &'a GameRecord>,
{
    let mut summary = FoldSummary::default();

    for game in games {
        if fold_game(totals, game) {
            summary.folded += 1;
        } else {
            summary.skipped += 1;
        }
    }

    summary
}

/// Fold one game; returns `false` when the game has no usable roster
pub fn fold_game(totals: &mut TotalsMap, game: &GameRecord) -> bool {
    if !game.has_roster() {
        debug!("Skipping game {} without roster", game.id);
        return false;
    }

    let duration_ms = game.duration_ms();
    let roster = unique_roster(game);
    let first_voters = earliest_votes_per_day(&roster);

    for &entry in &roster {
        let player = totals.entry(entry.player_id.clone()).or_default();
        fold_outcome(player, entry);
        fold_death(player, entry);
        fold_speech_and_loot(player, entry, duration_ms);
        fold_votes(player, entry, game, &first_voters);
    }

    credit_kills(totals, game, &roster);
    true
}

/// Participants with a player id, first entry per player
fn unique_roster(game: &GameRecord) -> Vec<&ParticipantEntry> {
    let mut seen = BTreeSet::new();
    let mut roster = Vec::with_capacity(game.participants.len());

    for entry in game.participants.iter().filter(|p| !p.player_id.is_empty()) {
        if seen.insert(entry.player_id.as_str()) {
            roster.push(entry);
        } else {
            warn!("Player {} listed twice in game {}, keeping first entry", entry.player_id, game.id);
        }
    }
    roster
}

fn fold_outcome(player: &mut PlayerTotals, entry: &ParticipantEntry) {
    player.games += 1;
    *player.roles.entry(entry.role.clone()).or_insert(0) += 1;

    let camp = player.camps.entry(entry.camp).or_default();
    camp.games += 1;

    if entry.victorious {
        player.wins += 1;
        camp.wins += 1;
    }
}

fn fold_death(player: &mut PlayerTotals, entry: &ParticipantEntry) {
    let Some(survived) = entry.survived() else {
        return;
    };

    player.games_with_death_data += 1;
    if survived {
        player.survivals += 1;
    }

    if let Some(death) = entry.died() {
        *player.death_days.entry(death.day).or_insert(0) += 1;
        if death.cause == DeathCause::Vote {
            player.deaths_by_vote += 1;
        }
    }
}

fn fold_speech_and_loot(
    player: &mut PlayerTotals,
    entry: &ParticipantEntry,
    duration_ms: Option<u64>,
) {
    player.loot_collected += entry.loot.unwrap_or(0);

    let Some(duration_ms) = duration_ms else {
        return;
    };

    if let Some(speech_ms) = entry.speech_ms() {
        player.speech_ms += speech_ms;
        player.speech_game_ms += duration_ms;
    }

    if let Some(loot) = entry.loot {
        player.loot += loot;
        player.loot_game_ms += duration_ms;
    }
}

fn fold_votes(
    player: &mut PlayerTotals,
    entry: &ParticipantEntry,
    game: &GameRecord,
    first_voters: &BTreeMap<u32, DateTime<Utc>>,
) {
    let Some(votes) = entry.votes.as_ref() else {
        return;
    };

    for vote in votes {
        player.votes_total += 1;

        let Some(target_id) = vote.target_id.as_deref() else {
            continue;
        };
        player.votes_with_target += 1;

        if entry.camp == Camp::Wolf {
            continue;
        }
        if let Some(target) = game.participant(target_id) {
            player.judged_votes += 1;
            if target.camp == Camp::Wolf {
                player.accurate_votes += 1;
            }
        }
    }

    for (day, own_earliest) in earliest_by_day(votes.iter().map(|v| (v.day, v.cast_at))) {
        player.meetings_voted += 1;
        if first_voters.get(&day) == Some(&own_earliest) {
            player.first_votes += 1;
        }
    }
}

/// Kills are credited to the killer, who must be part of the same game
fn credit_kills(totals: &mut TotalsMap, game: &GameRecord, roster: &[&ParticipantEntry]) {
    let killers = roster
        .iter()
        .copied()
        .filter_map(|p| p.died())
        .filter_map(|death| death.killer_id.as_deref())
        .filter(|killer_id| game.participant(killer_id).is_some());

    for killer_id in killers {
        if let Some(killer) = totals.get_mut(killer_id) {
            killer.kills += 1;
        }
    }
}

fn earliest_votes_per_day(roster: &[&ParticipantEntry]) -> BTreeMap<u32, DateTime<Utc>> {
    let all_votes = roster
        .iter()
        .copied()
        .filter_map(|p| p.votes.as_ref())
        .flatten()
        .map(|v| (v.day, v.cast_at));

    earliest_by_day(all_votes)
}

fn earliest_by_day<I>(votes: I) -> BTreeMap<u32, DateTime<Utc>>
where
    I: IntoIterator<Item = (u32, DateTime<Utc>)>,
{
    let mut earliest = BTreeMap::new();
    for (day, cast_at) in votes {
        earliest
            .entry(day)
            .and_modify(|current: &mut DateTime<Utc>| {
                if cast_at < *current {
                    *current = cast_at;
                }
            })
            .or_insert(cast_at);
    }
    earliest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Death, DeathData, Ruleset, SpeechSample, VoteRecord};
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap()
    }

    fn entry(id: &str, camp: Camp, victorious: bool) -> ParticipantEntry {
        ParticipantEntry {
            player_id: id.to_string(),
            display_name: None,
            role: if camp == Camp::Wolf { "wolf" } else { "villager" }.to_string(),
            camp,
            victorious,
            death: None,
            votes: None,
            speech: None,
            loot: None,
        }
    }

    fn vote(day: u32, secs: i64, target: Option<&str>) -> VoteRecord {
        VoteRecord {
            day,
            cast_at: start() + Duration::seconds(secs),
            target_id: target.map(str::to_string),
        }
    }

    fn game(participants: Vec<ParticipantEntry>) -> GameRecord {
        GameRecord {
            id: "g1".to_string(),
            started_at: start(),
            ended_at: Some(start() + Duration::minutes(10)),
            ruleset: Ruleset::Standard,
            participants,
        }
    }

    #[test]
    fn test_skips_game_without_roster() {
        let (totals, summary) = aggregate_totals(&[game(vec![])]);

        assert!(totals.is_empty());
        assert_eq!(summary, FoldSummary { folded: 0, skipped: 1 });
    }

    #[test]
    fn test_counts_wins_and_camps() {
        let g = game(vec![
            entry("alice", Camp::Wolf, true),
            entry("bob", Camp::Villager, false),
        ]);
        let (totals, _) = aggregate_totals(&[g]);

        let alice = &totals["alice"];
        assert_eq!(alice.games, 1);
        assert_eq!(alice.wins, 1);
        assert_eq!(alice.camp(Camp::Wolf).wins, 1);
        assert_eq!(alice.roles["wolf"], 1);
        assert_eq!(totals["bob"].wins, 0);
    }

    #[test]
    fn test_repeated_player_in_roster_is_folded_once() {
        let mut duplicate = entry("alice", Camp::Villager, true);
        duplicate.loot = Some(7);
        let mut victim = entry("bob", Camp::Villager, false);
        victim.death = Some(DeathData::Died(Death {
            cause: DeathCause::Killed,
            day: 1,
            killer_id: Some("wolf".to_string()),
        }));
        let g = game(vec![
            entry("alice", Camp::Wolf, true),
            duplicate,
            entry("wolf", Camp::Wolf, true),
            victim.clone(),
            victim,
        ]);

        let (totals, summary) = aggregate_totals(&[g]);

        let alice = &totals["alice"];
        assert_eq!(summary.folded, 1);
        assert_eq!(alice.games, 1);
        assert_eq!(alice.wins, 1);
        assert_eq!(alice.camp(Camp::Wolf).games, 1);
        assert_eq!(alice.camp(Camp::Villager).games, 0);
        assert_eq!(alice.loot_collected, 0);
        assert_eq!(totals["bob"].games_with_death_data, 1);
        assert_eq!(totals["wolf"].kills, 1);
    }

    #[test]
    fn test_missing_death_data_is_not_a_survival() {
        let mut alice = entry("alice", Camp::Villager, true);
        alice.death = Some(DeathData::Survived);
        let bob = entry("bob", Camp::Villager, true);

        let (totals, _) = aggregate_totals(&[game(vec![alice, bob])]);

        assert_eq!(totals["alice"].games_with_death_data, 1);
        assert_eq!(totals["alice"].survivals, 1);
        assert_eq!(totals["bob"].games_with_death_data, 0);
    }

    #[test]
    fn test_credits_kills_to_killer_in_same_game() {
        let wolf = entry("wolf", Camp::Wolf, true);
        let mut victim = entry("victim", Camp::Villager, false);
        victim.death = Some(DeathData::Died(Death {
            cause: DeathCause::Killed,
            day: 1,
            killer_id: Some("wolf".to_string()),
        }));
        let mut stranger_victim = entry("other", Camp::Villager, false);
        stranger_victim.death = Some(DeathData::Died(Death {
            cause: DeathCause::Killed,
            day: 2,
            killer_id: Some("ghost".to_string()),
        }));

        let (totals, _) = aggregate_totals(&[game(vec![wolf, victim, stranger_victim])]);

        assert_eq!(totals["wolf"].kills, 1);
        assert!(!totals.contains_key("ghost"));
        assert_eq!(totals["victim"].deaths_up_to_day(1), 1);
        assert_eq!(totals["other"].deaths_up_to_day(1), 0);
    }

    #[test]
    fn test_speech_requires_valid_duration() {
        let mut alice = entry("alice", Camp::Villager, true);
        alice.speech = Some(vec![SpeechSample { duration_ms: 30_000 }]);
        let mut g = game(vec![alice]);
        g.ended_at = None;

        let (totals, _) = aggregate_totals(&[g]);

        assert_eq!(totals["alice"].speech_ms, 0);
        assert_eq!(totals["alice"].speech_game_ms, 0);
    }

    #[test]
    fn test_vote_accuracy_and_first_votes() {
        let mut alice = entry("alice", Camp::Villager, true);
        alice.votes = Some(vec![vote(1, 5, Some("wolf")), vote(2, 50, None)]);
        let mut bob = entry("bob", Camp::Villager, true);
        bob.votes = Some(vec![vote(1, 10, Some("alice")), vote(2, 20, Some("wolf"))]);
        let mut wolf = entry("wolf", Camp::Wolf, false);
        wolf.votes = Some(vec![vote(1, 30, Some("alice"))]);

        let (totals, _) = aggregate_totals(&[game(vec![alice, bob, wolf])]);

        let alice = &totals["alice"];
        assert_eq!(alice.votes_total, 2);
        assert_eq!(alice.votes_with_target, 1);
        assert_eq!(alice.judged_votes, 1);
        assert_eq!(alice.accurate_votes, 1);
        assert_eq!(alice.meetings_voted, 2);
        assert_eq!(alice.first_votes, 1);

        let bob = &totals["bob"];
        assert_eq!(bob.judged_votes, 2);
        assert_eq!(bob.accurate_votes, 1);
        assert_eq!(bob.first_votes, 1);

        assert_eq!(totals["wolf"].judged_votes, 0);
    }

    #[test]
    fn test_folding_in_batches_matches_single_fold() {
        let first = game(vec![
            entry("alice", Camp::Wolf, true),
            entry("bob", Camp::Villager, false),
        ]);
        let mut second = game(vec![
            entry("alice", Camp::Villager, false),
            entry("carol", Camp::Solo, true),
        ]);
        second.id = "g2".to_string();

        let (full, _) = aggregate_totals(&[first.clone(), second.clone()]);
        let (mut batched, _) = aggregate_totals(&[first]);
        fold_games(&mut batched, &[second]);

        assert_eq!(full, batched);
    }
}
