use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::achievements::AchievementDefinition;
use crate::errors::{RuleTableError, load_context, parse_context};
use crate::metrics::Stat;
use crate::percentiles::Category;

/// What a condition looks at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatRef {
    /// A percentile-ranked metric
    Metric(Stat),
    /// How often the player was dealt a role
    Role(String),
    /// Spread of camp win rates against each camp's baseline
    CampBalance(CampProfile),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampProfile {
    Balanced,
    Specialist,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionSpec {
    pub stat: StatRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    /// Minimum number of games in the role, for role conditions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_count: Option<u64>,
}

impl ConditionSpec {
    pub fn category(stat: Stat, required: Category) -> Self {
        Self {
            stat: StatRef::Metric(stat),
            required_category: Some(required),
            min_category: None,
            min_value: None,
            min_count: None,
        }
    }

    pub fn at_least(stat: Stat, required: Category, min_category: Category) -> Self {
        Self {
            min_category: Some(min_category),
            ..Self::category(stat, required)
        }
    }

    pub fn min_value(stat: Stat, min_value: f64) -> Self {
        Self {
            stat: StatRef::Metric(stat),
            required_category: None,
            min_category: None,
            min_value: Some(min_value),
            min_count: None,
        }
    }

    pub fn role(role: &str, min_percentage: f64) -> Self {
        Self {
            stat: StatRef::Role(role.to_string()),
            required_category: None,
            min_category: None,
            min_value: Some(min_percentage),
            min_count: None,
        }
    }

    pub fn camp_balance(profile: CampProfile) -> Self {
        Self {
            stat: StatRef::CampBalance(profile),
            required_category: None,
            min_category: None,
            min_value: None,
            min_count: None,
        }
    }

    /// Whether a low percentile is what this condition rewards
    pub fn prefers_low(&self) -> bool {
        self.required_category.is_some_and(|c| c.is_low_side())
    }

    fn is_evaluable(&self) -> bool {
        match self.stat {
            StatRef::Metric(_) => self.required_category.is_some() || self.min_value.is_some(),
            StatRef::Role(_) | StatRef::CampBalance(_) => true,
        }
    }
}

/// Title unlocked by a single condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleDefinition {
    pub id: String,
    pub priority: u32,
    pub condition: ConditionSpec,
}

/// Title unlocked only when every condition holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationRule {
    pub id: String,
    pub priority: u32,
    pub conditions: Vec<ConditionSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTable {
    pub titles: Vec<TitleDefinition>,
    pub combinations: Vec<CombinationRule>,
    pub achievements: Vec<AchievementDefinition>,
}

impl RuleTable {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).with_context(|| load_context(path))?;
        let table: RuleTable = serde_json::from_str(&json).context(parse_context("rule table"))?;
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<(), RuleTableError> {
        let mut seen = HashSet::new();

        for title in &self.titles {
            check_unique(&mut seen, &title.id)?;
            check_condition(&title.id, &title.condition)?;
        }

        for rule in &self.combinations {
            check_unique(&mut seen, &rule.id)?;
            if rule.conditions.len() < 2 {
                return Err(RuleTableError::TooFewConditions(rule.id.clone()));
            }
            for condition in &rule.conditions {
                check_condition(&rule.id, condition)?;
            }
        }

        let mut achievement_ids = HashSet::new();
        for achievement in &self.achievements {
            check_unique(&mut achievement_ids, &achievement.id)?;
            check_tiers(achievement)?;
        }

        Ok(())
    }
}

fn check_unique<'a>(seen: &mut HashSet<&'a str>, id: &'a str) -> Result<(), RuleTableError> {
    if seen.insert(id) {
        Ok(())
    } else {
        Err(RuleTableError::DuplicateId(id.to_string()))
    }
}

fn check_condition(rule_id: &str, condition: &ConditionSpec) -> Result<(), RuleTableError> {
    if condition.is_evaluable() {
        Ok(())
    } else {
        Err(RuleTableError::EmptyCondition(rule_id.to_string()))
    }
}

fn check_tiers(achievement: &AchievementDefinition) -> Result<(), RuleTableError> {
    if achievement.tiers.is_empty() {
        return Err(RuleTableError::EmptyTiers(achievement.id.clone()));
    }
    if achievement.tiers.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(RuleTableError::UnorderedTiers(achievement.id.clone()));
    }
    Ok(())
}
