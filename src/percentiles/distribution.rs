use std::collections::BTreeMap;

use crate::config::settings::EligibilitySettings;
use crate::domain::PlayerId;
use crate::metrics::{MetricSet, Stat};

const NEUTRAL_PERCENTILE: f64 = 50.0;

/// Sorted reference values for one metric
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Distribution {
    values: Vec<f64>,
}

impl Distribution {
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let mut values: Vec<f64> = values.into_iter().collect();
        values.sort_by(f64::total_cmp);
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Share of the distribution strictly below `value`, in 0..=100.
    /// An empty distribution gives the neutral 50.
    pub fn percentile(&self, value: f64) -> f64 {
        if self.values.is_empty() {
            return NEUTRAL_PERCENTILE;
        }
        let rank = self.values.partition_point(|v| *v < value);
        rank as f64 / self.values.len() as f64 * 100.0
    }
}

/// One distribution per metric, built from eligible players only
#[derive(Debug, Clone, Default)]
pub struct DistributionSet {
    by_stat: BTreeMap<Stat, Distribution>,
}

impl DistributionSet {
    pub fn build(
        metrics: &BTreeMap<PlayerId, MetricSet>,
        settings: &EligibilitySettings,
    ) -> Self {
        let eligible: Vec<&MetricSet> = metrics
            .values()
            .filter(|m| is_eligible(m, settings))
            .collect();

        let by_stat = Stat::ALL
            .iter()
            .map(|&stat| (stat, collect_distribution(&eligible, stat)))
            .collect();

        Self { by_stat }
    }

    pub fn get(&self, stat: Stat) -> Option<&Distribution> {
        self.by_stat.get(&stat)
    }

    pub fn percentile(&self, stat: Stat, value: f64) -> f64 {
        self.get(stat)
            .map(|d| d.percentile(value))
            .unwrap_or(NEUTRAL_PERCENTILE)
    }
}

fn collect_distribution(eligible: &[&MetricSet], stat: Stat) -> Distribution {
    Distribution::from_values(eligible.iter().filter_map(|m| m.get(stat)))
}

pub fn is_eligible(metrics: &MetricSet, settings: &EligibilitySettings) -> bool {
    metrics.games_played >= u64::from(settings.min_games)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_counts_strictly_lower_entries() {
        let distribution = Distribution::from_values(vec![4.0, 1.0, 2.0, 2.0, 3.0]);

        assert_eq!(distribution.values(), &[1.0, 2.0, 2.0, 3.0, 4.0]);
        assert_eq!(distribution.percentile(0.5), 0.0);
        assert_eq!(distribution.percentile(1.0), 0.0);
        assert_eq!(distribution.percentile(2.0), 20.0);
        assert_eq!(distribution.percentile(2.5), 60.0);
        assert_eq!(distribution.percentile(10.0), 100.0);
    }

    #[test]
    fn test_empty_distribution_is_neutral() {
        assert_eq!(Distribution::default().percentile(42.0), 50.0);
    }

    #[test]
    fn test_percentile_is_bounded_and_monotonic() {
        let distribution = Distribution::from_values((0..37).map(|i| ((i * 7) % 11) as f64));
        let mut previous = 0.0;

        for step in -20..=140 {
            let p = distribution.percentile(step as f64 / 10.0);
            assert!((0.0..=100.0).contains(&p));
            assert!(p >= previous);
            previous = p;
        }
    }

    #[test]
    fn test_only_eligible_players_and_non_null_values_enter() {
        let settings = EligibilitySettings::default();
        let mut metrics = BTreeMap::new();
        metrics.insert(
            "veteran".to_string(),
            MetricSet {
                games_played: 30,
                win_rate: Some(0.6),
                ..Default::default()
            },
        );
        metrics.insert(
            "silent".to_string(),
            MetricSet {
                games_played: 40,
                win_rate: Some(0.4),
                talk_per_minute: None,
                ..Default::default()
            },
        );
        metrics.insert(
            "rookie".to_string(),
            MetricSet {
                games_played: 3,
                win_rate: Some(1.0),
                ..Default::default()
            },
        );

        let set = DistributionSet::build(&metrics, &settings);

        assert_eq!(set.get(Stat::WinRate).unwrap().values(), &[0.4, 0.6]);
        assert!(set.get(Stat::TalkPerMinute).unwrap().is_empty());
        assert_eq!(set.percentile(Stat::TalkPerMinute, 3.0), 50.0);
    }
}
