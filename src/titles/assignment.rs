use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::claims::{ClaimsByPlayer, TitleClaim};
use crate::domain::PlayerId;

/// The title a player displays first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryTitle {
    pub title_id: String,
    /// Set when the title was already owned by someone else and handed out
    /// because the player had nothing else left
    pub via_fallback: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    pub primary: BTreeMap<PlayerId, PrimaryTitle>,
    /// Title id to the player holding it uniquely
    pub owners: BTreeMap<String, PlayerId>,
    pub fallback_count: usize,
}

impl Assignment {
    /// Owner of `title_id` when that is somebody other than `player_id`
    pub fn owner_other_than(&self, title_id: &str, player_id: &str) -> Option<&PlayerId> {
        self.owners.get(title_id).filter(|owner| owner.as_str() != player_id)
    }
}

/// Give every title id to at most one player as their primary title.
///
/// All (player, claim) pairs are ranked by strength, then adjusted
/// percentile, then player order, and handed out greedily. A player left
/// without a primary title afterwards falls back to their strongest claim
/// even when someone else owns it; those are counted in `fallback_count`.
pub fn assign_primary_titles(claims: &ClaimsByPlayer) -> Assignment {
    let mut assignment = Assignment::default();
    let mut used: HashSet<&str> = HashSet::new();

    for (player_id, claim) in ranked_pairs(claims) {
        if assignment.primary.contains_key(player_id) || used.contains(claim.title_id.as_str()) {
            continue;
        }
        used.insert(&claim.title_id);
        assignment
            .owners
            .insert(claim.title_id.clone(), player_id.clone());
        assignment.primary.insert(
            player_id.clone(),
            PrimaryTitle {
                title_id: claim.title_id.clone(),
                via_fallback: false,
            },
        );
    }

    assign_fallbacks(claims, &mut assignment);
    assignment
}

fn ranked_pairs(claims: &ClaimsByPlayer) -> Vec<(&PlayerId, &TitleClaim)> {
    let mut pairs: Vec<(&PlayerId, &TitleClaim)> = claims
        .iter()
        .flat_map(|(player_id, player_claims)| player_claims.iter().map(move |c| (player_id, c)))
        .collect();

    // Stable sort keeps player order for exact ties
    pairs.sort_by(|(_, a), (_, b)| {
        b.strength
            .total_cmp(&a.strength)
            .then_with(|| b.adjusted_percentile.total_cmp(&a.adjusted_percentile))
    });
    pairs
}

fn assign_fallbacks(claims: &ClaimsByPlayer, assignment: &mut Assignment) {
    for (player_id, player_claims) in claims {
        if assignment.primary.contains_key(player_id) {
            continue;
        }
        let Some(strongest) = strongest_claim(player_claims) else {
            continue;
        };

        assignment.primary.insert(
            player_id.clone(),
            PrimaryTitle {
                title_id: strongest.title_id.clone(),
                via_fallback: true,
            },
        );
        assignment.fallback_count += 1;
    }
}

fn strongest_claim(claims: &[TitleClaim]) -> Option<&TitleClaim> {
    claims.iter().reduce(|best, claim| {
        if claim.strength > best.strength {
            claim
        } else {
            best
        }
    })
}
