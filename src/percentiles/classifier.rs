use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::category::Category;
use super::distribution::DistributionSet;
use crate::config::settings::CategoryThresholds;
use crate::metrics::{MetricSet, Stat};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileResult {
    pub value: f64,
    pub percentile: f64,
    pub category: Category,
}

pub type PercentileMap = BTreeMap<Stat, PercentileResult>;

impl CategoryThresholds {
    pub fn classify(&self, percentile: f64) -> Category {
        if percentile >= self.extreme_high {
            Category::ExtremeHigh
        } else if percentile >= self.high {
            Category::High
        } else if percentile >= self.above_average {
            Category::AboveAverage
        } else if percentile <= self.extreme_low {
            Category::ExtremeLow
        } else if percentile <= self.low {
            Category::Low
        } else if percentile <= self.below_average {
            Category::BelowAverage
        } else {
            Category::Average
        }
    }
}

/// Classify every non-null metric of one player against the distributions
pub fn classify_player(
    metrics: &MetricSet,
    distributions: &DistributionSet,
    thresholds: &CategoryThresholds,
) -> PercentileMap {
    Stat::ALL
        .iter()
        .filter_map(|&stat| {
            let value = metrics.get(stat)?;
            let percentile = distributions.percentile(stat, value);
            let category = thresholds.classify(percentile);
            Some((stat, PercentileResult { value, percentile, category }))
        })
        .collect()
}
