pub mod aggregator;
mod derive;
pub mod totals;
pub mod types;

use std::collections::BTreeMap;

pub use aggregator::{FoldSummary, aggregate_totals, fold_game, fold_games};
pub use derive::{derive_metrics, derive_player_metrics};
pub use totals::{CampTotals, PlayerTotals, TotalsMap};
pub use types::{MetricSet, Stat};

use crate::config::settings::EligibilitySettings;
use crate::domain::{GameRecord, PlayerId};

/// Full fold of a game stream into per-player metrics
pub fn aggregate<'a, I>(games: I, settings: &EligibilitySettings) -> BTreeMap<PlayerId, MetricSet>
where
    I: IntoIterator<Item = &'a GameRecord>,
{
    let (totals, _) = aggregate_totals(games);
    derive_metrics(&totals, settings)
}
