use serde::{Deserialize, Serialize};

use super::rules::{CampProfile, ConditionSpec, StatRef};
use crate::config::settings::{AppConfig, CampBalanceSettings, CategoryThresholds};
use crate::domain::Camp;
use crate::metrics::{MetricSet, Stat};
use crate::percentiles::{Category, PercentileMap, Side};

/// Result of checking one condition for one player
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConditionOutcome {
    pub met: bool,
    pub current_value: Option<f64>,
    /// Only set for conditions decided by percentile category
    pub current_percentile: Option<f64>,
    pub category: Option<Category>,
    /// How far the player is from meeting the condition; 0 once met
    pub gap: Option<f64>,
}

impl ConditionOutcome {
    fn unmet() -> Self {
        Self::default()
    }
}

/// Check a condition against a player's metrics and classified percentiles
pub fn evaluate(
    metrics: &MetricSet,
    percentiles: &PercentileMap,
    condition: &ConditionSpec,
    config: &AppConfig,
) -> ConditionOutcome {
    match &condition.stat {
        StatRef::Role(role) => evaluate_role(metrics, role, condition, config),
        StatRef::CampBalance(profile) => evaluate_camp_balance(metrics, *profile, &config.camp_balance),
        StatRef::Metric(stat) => match condition.min_value {
            Some(min_value) => evaluate_min_value(metrics, *stat, min_value),
            None => evaluate_category(percentiles, *stat, condition, &config.categories),
        },
    }
}

/// All conditions must hold
pub fn evaluate_all(
    metrics: &MetricSet,
    percentiles: &PercentileMap,
    conditions: &[ConditionSpec],
    config: &AppConfig,
) -> Option<Vec<ConditionOutcome>> {
    let outcomes: Vec<ConditionOutcome> = conditions
        .iter()
        .map(|c| evaluate(metrics, percentiles, c, config))
        .collect();

    outcomes.iter().all(|o| o.met).then_some(outcomes)
}

fn evaluate_min_value(metrics: &MetricSet, stat: Stat, min_value: f64) -> ConditionOutcome {
    let Some(value) = metrics.get(stat) else {
        return ConditionOutcome::unmet();
    };

    threshold_outcome(value, min_value)
}

/// Role conditions need both a share of games and an absolute count, since
/// a share alone swings wildly over few games
fn evaluate_role(
    metrics: &MetricSet,
    role: &str,
    condition: &ConditionSpec,
    config: &AppConfig,
) -> ConditionOutcome {
    let Some(percentage) = metrics.role_percentage(role) else {
        return ConditionOutcome::unmet();
    };

    let count = metrics.role_count(role);
    let min_count = condition
        .min_count
        .unwrap_or(u64::from(config.eligibility.min_role_games));
    let min_percentage = condition.min_value.unwrap_or(0.0);

    let gap = if percentage < min_percentage {
        min_percentage - percentage
    } else {
        min_count.saturating_sub(count) as f64
    };

    ConditionOutcome {
        met: percentage >= min_percentage && count >= min_count,
        current_value: Some(percentage),
        current_percentile: None,
        category: None,
        gap: Some(gap),
    }
}

/// Normalise each camp's win rate by that camp's expected win rate and look
/// at the spread between the best and worst camp
pub fn camp_spread(metrics: &MetricSet, settings: &CampBalanceSettings) -> Option<f64> {
    let normalized: Vec<f64> = Camp::ALL
        .iter()
        .filter_map(|&camp| {
            let rate = metrics.camp_win_rate(camp)?;
            let baseline = camp_baseline(camp, settings);
            (baseline > 0.0).then(|| rate / baseline)
        })
        .collect();

    if normalized.len() < 2 {
        return None;
    }

    let max = normalized.iter().copied().fold(f64::MIN, f64::max);
    let min = normalized.iter().copied().fold(f64::MAX, f64::min);
    Some(max - min)
}

fn camp_baseline(camp: Camp, settings: &CampBalanceSettings) -> f64 {
    match camp {
        Camp::Villager => settings.villager_baseline,
        Camp::Wolf => settings.wolf_baseline,
        Camp::Solo => settings.solo_baseline,
    }
}

fn evaluate_camp_balance(
    metrics: &MetricSet,
    profile: CampProfile,
    settings: &CampBalanceSettings,
) -> ConditionOutcome {
    let Some(spread) = camp_spread(metrics, settings) else {
        return ConditionOutcome::unmet();
    };

    let (met, gap) = match profile {
        CampProfile::Balanced => (
            spread <= settings.balanced_max_spread,
            (spread - settings.balanced_max_spread).max(0.0),
        ),
        CampProfile::Specialist => (
            spread >= settings.specialist_min_spread,
            (settings.specialist_min_spread - spread).max(0.0),
        ),
    };

    ConditionOutcome {
        met,
        current_value: Some(spread),
        current_percentile: None,
        category: None,
        gap: Some(gap),
    }
}

fn evaluate_category(
    percentiles: &PercentileMap,
    stat: Stat,
    condition: &ConditionSpec,
    thresholds: &CategoryThresholds,
) -> ConditionOutcome {
    let (Some(required), Some(result)) = (condition.required_category, percentiles.get(&stat))
    else {
        return ConditionOutcome::unmet();
    };

    let met = result
        .category
        .satisfies(required, condition.min_category);
    let gap = if met {
        0.0
    } else {
        percentile_gap(result.percentile, required, condition.min_category, thresholds)
    };

    ConditionOutcome {
        met,
        current_value: Some(result.value),
        current_percentile: Some(result.percentile),
        category: Some(result.category),
        gap: Some(gap),
    }
}

/// Percentile points between `percentile` and the loosest boundary that
/// would still satisfy the requirement
fn percentile_gap(
    percentile: f64,
    required: Category,
    min_category: Option<Category>,
    thresholds: &CategoryThresholds,
) -> f64 {
    let loosest = match min_category {
        Some(min) if min.side() == required.side() && min.depth() < required.depth() => min,
        _ => required,
    };

    match loosest.side() {
        Side::High => (boundary(loosest, thresholds) - percentile).max(0.0),
        Side::Low => (percentile - boundary(loosest, thresholds)).max(0.0),
        Side::Neutral => {
            if percentile <= thresholds.below_average {
                thresholds.below_average - percentile
            } else {
                (percentile - thresholds.above_average).max(0.0)
            }
        }
    }
}

fn boundary(category: Category, thresholds: &CategoryThresholds) -> f64 {
    match category {
        Category::ExtremeHigh => thresholds.extreme_high,
        Category::High => thresholds.high,
        Category::AboveAverage => thresholds.above_average,
        Category::Average => 50.0,
        Category::BelowAverage => thresholds.below_average,
        Category::Low => thresholds.low,
        Category::ExtremeLow => thresholds.extreme_low,
    }
}

fn threshold_outcome(value: f64, min_value: f64) -> ConditionOutcome {
    ConditionOutcome {
        met: value >= min_value,
        current_value: Some(value),
        current_percentile: None,
        category: None,
        gap: Some((min_value - value).max(0.0)),
    }
}
