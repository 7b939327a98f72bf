use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::condition::{ConditionOutcome, evaluate_all};
use super::rules::{ConditionSpec, RuleTable, StatRef};
use crate::config::settings::{AppConfig, ClaimSettings};
use crate::domain::PlayerId;
use crate::metrics::MetricSet;
use crate::percentiles::{Category, PercentileMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Basic,
    Combination,
}

/// Metric evidence behind one condition of a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub stat: StatRef,
    pub value: Option<f64>,
    pub percentile: Option<f64>,
    pub category: Option<Category>,
}

/// A title a player satisfies, before uniqueness is resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleClaim {
    pub title_id: String,
    pub kind: RuleKind,
    pub priority: u32,
    pub adjusted_percentile: f64,
    pub evidence: Vec<Evidence>,
    pub list_position: usize,
    pub strength: f64,
}

pub type ClaimsByPlayer = BTreeMap<PlayerId, Vec<TitleClaim>>;

/// Every rule in the table this player satisfies, in table order
pub fn collect_claims(
    metrics: &MetricSet,
    percentiles: &PercentileMap,
    table: &RuleTable,
    config: &AppConfig,
) -> Vec<TitleClaim> {
    let basic = table.titles.iter().filter_map(|title| {
        let conditions = std::slice::from_ref(&title.condition);
        let outcomes = evaluate_all(metrics, percentiles, conditions, config)?;
        Some(build_claim(&title.id, RuleKind::Basic, title.priority, conditions, &outcomes, &config.claims))
    });

    let combinations = table.combinations.iter().filter_map(|rule| {
        let outcomes = evaluate_all(metrics, percentiles, &rule.conditions, config)?;
        Some(build_claim(
            &rule.id,
            RuleKind::Combination,
            rule.priority,
            &rule.conditions,
            &outcomes,
            &config.claims,
        ))
    });

    basic.chain(combinations).collect()
}

fn build_claim(
    title_id: &str,
    kind: RuleKind,
    priority: u32,
    conditions: &[ConditionSpec],
    outcomes: &[ConditionOutcome],
    settings: &ClaimSettings,
) -> TitleClaim {
    let evidence = conditions
        .iter()
        .zip(outcomes)
        .map(|(condition, outcome)| Evidence {
            stat: condition.stat.clone(),
            value: outcome.current_value,
            percentile: outcome.current_percentile,
            category: outcome.category,
        })
        .collect();

    TitleClaim {
        title_id: title_id.to_string(),
        kind,
        priority,
        adjusted_percentile: adjusted_percentile(conditions, outcomes, settings.neutral_percentile),
        evidence,
        list_position: 0,
        strength: 0.0,
    }
}

/// Mean percentile of the conditions that produced one. Conditions asking
/// for a low category count `100 - p` so the most extreme low value scores
/// highest.
pub fn adjusted_percentile(
    conditions: &[ConditionSpec],
    outcomes: &[ConditionOutcome],
    neutral: f64,
) -> f64 {
    let oriented: Vec<f64> = conditions
        .iter()
        .zip(outcomes)
        .filter_map(|(condition, outcome)| {
            let percentile = outcome.current_percentile?;
            Some(if condition.prefers_low() {
                100.0 - percentile
            } else {
                percentile
            })
        })
        .collect();

    if oriented.is_empty() {
        neutral
    } else {
        oriented.iter().sum::<f64>() / oriented.len() as f64
    }
}

/// Keep a combination title only for the claimant(s) closest to the best
/// adjusted percentile
pub fn narrow_combination_claims(claims: &mut ClaimsByPlayer, tolerance: f64) {
    let mut best: BTreeMap<String, f64> = BTreeMap::new();

    for claim in claims.values().flatten() {
        if claim.kind == RuleKind::Combination {
            best.entry(claim.title_id.clone())
                .and_modify(|b| *b = b.max(claim.adjusted_percentile))
                .or_insert(claim.adjusted_percentile);
        }
    }

    for player_claims in claims.values_mut() {
        player_claims.retain(|claim| {
            claim.kind == RuleKind::Basic
                || best
                    .get(&claim.title_id)
                    .is_some_and(|b| claim.adjusted_percentile >= b - tolerance)
        });
    }
}

/// Order a player's claims by priority, then adjusted percentile, and
/// compute each claim's strength
pub fn rank_claims(claims: &mut [TitleClaim], settings: &ClaimSettings) {
    claims.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.adjusted_percentile.total_cmp(&a.adjusted_percentile))
    });

    for (position, claim) in claims.iter_mut().enumerate() {
        claim.list_position = position;
        claim.strength = claim_strength(claim.priority, claim.adjusted_percentile, position, settings);
    }
}

pub fn claim_strength(
    priority: u32,
    adjusted_percentile: f64,
    list_position: usize,
    settings: &ClaimSettings,
) -> f64 {
    f64::from(priority) * settings.priority_weight + adjusted_percentile * settings.percentile_weight
        - list_position as f64
}
