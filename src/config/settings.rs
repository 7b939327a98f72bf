use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::parse_context;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilitySettings {
    /// Games needed before a player enters distributions or gets titles
    pub min_games: u32,
    /// Games in a role needed for role-frequency titles
    pub min_role_games: u32,
    /// Games in a camp needed before that camp's win rate is reported
    pub min_camp_games: u32,
    /// Deaths on or before this day count as early deaths
    pub early_death_day: u32,
}

impl Default for EligibilitySettings {
    fn default() -> Self {
        Self {
            min_games: 25,
            min_role_games: 10,
            min_camp_games: 5,
            early_death_day: 1,
        }
    }
}

/// Percentile cut points for category assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryThresholds {
    pub extreme_high: f64,
    pub high: f64,
    pub above_average: f64,
    pub extreme_low: f64,
    pub low: f64,
    pub below_average: f64,
}

impl Default for CategoryThresholds {
    fn default() -> Self {
        Self {
            extreme_high: 85.0,
            high: 65.0,
            above_average: 55.0,
            extreme_low: 15.0,
            low: 35.0,
            below_average: 45.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimSettings {
    pub priority_weight: f64,
    pub percentile_weight: f64,
    /// Claimants of a combination title within this many percentile points
    /// of the best one keep the claim
    pub combination_tolerance: f64,
    /// Adjusted percentile for claims without any percentile evidence
    pub neutral_percentile: f64,
}

impl Default for ClaimSettings {
    fn default() -> Self {
        Self {
            priority_weight: 1000.0,
            percentile_weight: 10.0,
            combination_tolerance: 0.1,
            neutral_percentile: 50.0,
        }
    }
}

/// Expected win rates per camp and the spreads that define balanced and
/// specialist players
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CampBalanceSettings {
    pub villager_baseline: f64,
    pub wolf_baseline: f64,
    pub solo_baseline: f64,
    pub balanced_max_spread: f64,
    pub specialist_min_spread: f64,
}

impl Default for CampBalanceSettings {
    fn default() -> Self {
        Self {
            villager_baseline: 0.55,
            wolf_baseline: 0.40,
            solo_baseline: 0.15,
            balanced_max_spread: 0.25,
            specialist_min_spread: 0.60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub games_path: PathBuf,
    pub cache_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            games_path: env_path("GAMES_PATH", "data/games.json"),
            cache_dir: env_path("CACHE_DIR", "cache"),
            output_dir: env_path("OUTPUT_DIR", "output"),
        }
    }
}

fn env_path(var: &str, fallback: &str) -> PathBuf {
    std::env::var(var)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(fallback))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub eligibility: EligibilitySettings,
    pub categories: CategoryThresholds,
    pub claims: ClaimSettings,
    pub camp_balance: CampBalanceSettings,
    pub paths: PathSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a JSON file; missing fields keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&json).context(parse_context("config file"))
    }
}
