pub mod assignment;
pub mod claims;
pub mod condition;
pub mod rules;

use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use assignment::{Assignment, PrimaryTitle, assign_primary_titles};
pub use claims::{ClaimsByPlayer, Evidence, RuleKind, TitleClaim};
pub use condition::{ConditionOutcome, evaluate, evaluate_all};
pub use rules::{CampProfile, CombinationRule, ConditionSpec, RuleTable, StatRef, TitleDefinition};

use crate::config::settings::AppConfig;
use crate::domain::PlayerId;
use crate::metrics::MetricSet;
use crate::percentiles::{DistributionSet, classify_player, is_eligible};

/// A satisfied title as shown to the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardedTitle {
    pub title_id: String,
    pub kind: RuleKind,
    pub priority: u32,
    pub adjusted_percentile: f64,
    pub strength: f64,
    pub evidence: Vec<Evidence>,
    /// Player who holds this title uniquely, when that is someone else
    pub primary_owner: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerTitles {
    pub primary: Option<PrimaryTitle>,
    pub titles: Vec<AwardedTitle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleOutcome {
    pub eligible_players: usize,
    pub fallback_assignments: usize,
    pub players: BTreeMap<PlayerId, PlayerTitles>,
}

/// Rank eligible players against each other and hand out titles
pub fn assign_titles(
    metrics: &BTreeMap<PlayerId, MetricSet>,
    table: &RuleTable,
    config: &AppConfig,
) -> TitleOutcome {
    let distributions = DistributionSet::build(metrics, &config.eligibility);
    let eligible: Vec<(&PlayerId, &MetricSet)> = metrics
        .iter()
        .filter(|(_, m)| is_eligible(m, &config.eligibility))
        .collect();
    info!("  → {} of {} players eligible for titles", eligible.len(), metrics.len());

    let mut claims_by_player: ClaimsByPlayer = eligible
        .iter()
        .map(|(id, player_metrics)| {
            let percentiles = classify_player(player_metrics, &distributions, &config.categories);
            let player_claims = claims::collect_claims(player_metrics, &percentiles, table, config);
            ((*id).clone(), player_claims)
        })
        .collect();

    claims::narrow_combination_claims(&mut claims_by_player, config.claims.combination_tolerance);
    for player_claims in claims_by_player.values_mut() {
        claims::rank_claims(player_claims, &config.claims);
    }

    let assignment = assign_primary_titles(&claims_by_player);
    if assignment.fallback_count > 0 {
        info!(
            "  → {} players share an already owned title through fallback",
            assignment.fallback_count
        );
    }

    TitleOutcome {
        eligible_players: eligible.len(),
        fallback_assignments: assignment.fallback_count,
        players: build_player_titles(claims_by_player, &assignment),
    }
}

fn build_player_titles(
    claims: ClaimsByPlayer,
    assignment: &Assignment,
) -> BTreeMap<PlayerId, PlayerTitles> {
    claims
        .into_iter()
        .filter(|(_, player_claims)| !player_claims.is_empty())
        .map(|(player_id, player_claims)| {
            let titles = player_claims
                .into_iter()
                .map(|claim| AwardedTitle {
                    primary_owner: assignment
                        .owner_other_than(&claim.title_id, &player_id)
                        .cloned(),
                    title_id: claim.title_id,
                    kind: claim.kind,
                    priority: claim.priority,
                    adjusted_percentile: claim.adjusted_percentile,
                    strength: claim.strength,
                    evidence: claim.evidence,
                })
                .collect();

            let player = PlayerTitles {
                primary: assignment.primary.get(&player_id).cloned(),
                titles,
            };
            (player_id, player)
        })
        .collect()
}
