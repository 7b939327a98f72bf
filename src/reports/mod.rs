mod console;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::achievements::AchievementReport;
use crate::cache::{AggregationMode, StagedWrites};
use crate::domain::{DatasetSlice, PlayerId};
use crate::titles::{PlayerTitles, TitleOutcome};

pub use console::{print_achievement_summary, print_title_summary};

/// Titles of one dataset slice as written to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleReport {
    pub slice: DatasetSlice,
    pub aggregation: AggregationMode,
    pub game_count: usize,
    pub eligible_players: usize,
    pub fallback_assignments: usize,
    pub players: BTreeMap<PlayerId, PlayerTitles>,
}

impl TitleReport {
    pub fn new(slice: DatasetSlice, aggregation: AggregationMode, game_count: usize, outcome: TitleOutcome) -> Self {
        Self {
            slice,
            aggregation,
            game_count,
            eligible_players: outcome.eligible_players,
            fallback_assignments: outcome.fallback_assignments,
            players: outcome.players,
        }
    }

    /// Number of players holding a title uniquely
    pub fn unique_primaries(&self) -> usize {
        self.players
            .values()
            .filter_map(|p| p.primary.as_ref())
            .filter(|primary| !primary.via_fallback)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementsFile {
    pub slice: DatasetSlice,
    pub players: AchievementReport,
}

pub fn titles_path(output_dir: &Path, slice: DatasetSlice) -> PathBuf {
    output_dir.join(format!("titles_{}.json", slice.as_str()))
}

pub fn achievements_path(output_dir: &Path, slice: DatasetSlice) -> PathBuf {
    output_dir.join(format!("achievements_{}.json", slice.as_str()))
}

/// Queue both report files of a slice run
pub fn stage_title_report(output_dir: &Path, report: &TitleReport, writes: &mut StagedWrites) -> Result<()> {
    writes.stage(&titles_path(output_dir, report.slice), report)
}

pub fn stage_achievements(output_dir: &Path, file: &AchievementsFile, writes: &mut StagedWrites) -> Result<()> {
    writes.stage(&achievements_path(output_dir, file.slice), file)
}
