use anyhow::Result;
use log::{info, warn};
use std::collections::{BTreeMap, HashSet};

use super::snapshot::{CacheSnapshot, fingerprint};
use crate::domain::{DatasetSlice, GameId, GameRecord};
use crate::metrics::fold_games;

/// How the aggregate state of a run was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AggregationMode {
    /// Nothing changed; cached totals reused without any folding
    FastPath,
    /// Only games unseen by the cache were folded in
    Incremental { new_games: usize },
    /// Totals rebuilt from every game
    Full { games: usize },
}

impl AggregationMode {
    pub fn is_fast_path(&self) -> bool {
        matches!(self, AggregationMode::FastPath)
    }
}

/// Games of the current run compared against a snapshot
#[derive(Debug)]
pub struct CacheDiff<'a> {
    pub new_games: Vec<&'a GameRecord>,
    pub new_fingerprints: BTreeMap<GameId, String>,
    pub unchanged_count: usize,
    /// A cached game vanished or its content changed; totals cannot be
    /// patched by addition alone
    pub invalidated: bool,
}

pub fn diff<'a>(games: &[&'a GameRecord], snapshot: &CacheSnapshot) -> Result<CacheDiff<'a>> {
    let mut result = CacheDiff {
        new_games: Vec::new(),
        new_fingerprints: BTreeMap::new(),
        unchanged_count: 0,
        invalidated: false,
    };
    let mut current_ids: HashSet<&str> = HashSet::with_capacity(games.len());

    for &game in games {
        current_ids.insert(&game.id);
        let print = fingerprint(game)?;

        match snapshot.fingerprints.get(&game.id) {
            Some(cached) if *cached == print => result.unchanged_count += 1,
            Some(_) => {
                warn!("Game {} changed since it was cached", game.id);
                result.invalidated = true;
            }
            None => {
                result.new_games.push(game);
                result.new_fingerprints.insert(game.id.clone(), print);
            }
        }
    }

    let removed = snapshot
        .fingerprints
        .keys()
        .filter(|id| !current_ids.contains(id.as_str()))
        .count();
    if removed > 0 {
        warn!("{} cached games are no longer present", removed);
        result.invalidated = true;
    }

    Ok(result)
}

/// Fold only the new games into the snapshot's totals
pub fn update(mut snapshot: CacheSnapshot, diff: CacheDiff<'_>) -> CacheSnapshot {
    let summary = fold_games(&mut snapshot.totals, diff.new_games.iter().copied());
    if summary.skipped > 0 {
        info!("  → Skipped {} games without roster", summary.skipped);
    }

    snapshot.fingerprints.extend(diff.new_fingerprints);
    snapshot.game_count = snapshot.fingerprints.len();
    snapshot
}

/// Fold every game into a brand new snapshot
pub fn rebuild(slice: DatasetSlice, games: &[&GameRecord]) -> Result<CacheSnapshot> {
    let empty = CacheSnapshot::empty(slice);
    let everything = diff(games, &empty)?;
    Ok(update(empty, everything))
}

#[derive(Debug)]
pub struct AggregationOutcome {
    pub snapshot: CacheSnapshot,
    pub mode: AggregationMode,
}

/// Bring a slice's running totals up to date with `games`, reusing the
/// cached snapshot wherever possible
pub fn aggregate_with_cache(
    slice: DatasetSlice,
    games: &[&GameRecord],
    cached: Option<CacheSnapshot>,
) -> Result<AggregationOutcome> {
    let Some(snapshot) = cached else {
        info!("  → No usable cache for slice {}, folding all games", slice.as_str());
        return full_rebuild(slice, games);
    };

    let changes = diff(games, &snapshot)?;

    if changes.invalidated {
        info!("  → Cache for slice {} is stale, folding all games", slice.as_str());
        return full_rebuild(slice, games);
    }

    if changes.new_games.is_empty() {
        info!(
            "  → No new games for slice {} ({} cached), reusing totals",
            slice.as_str(),
            changes.unchanged_count
        );
        return Ok(AggregationOutcome {
            snapshot,
            mode: AggregationMode::FastPath,
        });
    }

    let new_games = changes.new_games.len();
    info!(
        "  → Folding {} new games into {} cached for slice {}",
        new_games,
        changes.unchanged_count,
        slice.as_str()
    );
    Ok(AggregationOutcome {
        snapshot: update(snapshot, changes),
        mode: AggregationMode::Incremental { new_games },
    })
}

fn full_rebuild(slice: DatasetSlice, games: &[&GameRecord]) -> Result<AggregationOutcome> {
    Ok(AggregationOutcome {
        snapshot: rebuild(slice, games)?,
        mode: AggregationMode::Full { games: games.len() },
    })
}
