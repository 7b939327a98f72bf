use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use super::structs::{Cache, StagedWrites};
use crate::domain::{DatasetSlice, GameId, GameRecord};
use crate::metrics::TotalsMap;

/// Bumped whenever the shape of [`CacheSnapshot`] or of the running totals
/// changes, so old files are rebuilt instead of misread
pub const SCHEMA_VERSION: u32 = 1;

/// Aggregate state of one dataset slice after the last run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    pub schema_version: u32,
    pub slice: DatasetSlice,
    pub game_count: usize,
    /// Content fingerprint per processed game
    pub fingerprints: BTreeMap<GameId, String>,
    pub totals: TotalsMap,
}

impl CacheSnapshot {
    pub fn empty(slice: DatasetSlice) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            slice,
            game_count: 0,
            fingerprints: BTreeMap::new(),
            totals: TotalsMap::new(),
        }
    }

    pub fn is_compatible(&self, slice: DatasetSlice) -> bool {
        self.schema_version == SCHEMA_VERSION && self.slice == slice
    }
}

pub fn snapshot_key(slice: DatasetSlice) -> String {
    format!("snapshot_{}", slice.as_str())
}

/// SHA-256 over the game's JSON form
pub fn fingerprint(game: &GameRecord) -> Result<String> {
    let bytes = serde_json::to_vec(game)
        .with_context(|| format!("Failed to serialize game {}", game.id))?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

/// Load the snapshot for a slice. Missing, unreadable or outdated snapshots
/// all come back as `None` so the caller recomputes from scratch.
pub fn load_snapshot(cache: &Cache, slice: DatasetSlice) -> Option<CacheSnapshot> {
    let key = snapshot_key(slice);

    let snapshot: CacheSnapshot = match cache.load(&key) {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => return None,
        Err(e) => {
            warn!("Ignoring unreadable cache {}: {:#}", key, e);
            return None;
        }
    };

    if !snapshot.is_compatible(slice) {
        warn!(
            "Ignoring cache {} with schema {} (expected {})",
            key, snapshot.schema_version, SCHEMA_VERSION
        );
        return None;
    }

    Some(snapshot)
}

/// Queue the snapshot so it is replaced together with the run's reports
pub fn stage_snapshot(cache: &Cache, snapshot: &CacheSnapshot, writes: &mut StagedWrites) -> Result<()> {
    writes.stage(&cache.path(&snapshot_key(snapshot.slice)), snapshot)
}
