use anyhow::Result;
use log::info;

use crate::achievements::compute_achievements;
use crate::cache::{Cache, CacheSnapshot, StagedWrites, aggregate_with_cache, load_snapshot, stage_snapshot};
use crate::config::settings::AppConfig;
use crate::domain::{DatasetSlice, GameCollection, GameRecord};
use crate::errors::{with_load_context, with_parse_context};
use crate::metrics::derive_metrics;
use crate::reports::{self, AchievementsFile, TitleReport};
use crate::titles::{RuleTable, assign_titles};

/// Which outputs a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPlan {
    pub titles: bool,
    pub achievements: bool,
}

impl RunPlan {
    pub const FULL: RunPlan = RunPlan {
        titles: true,
        achievements: true,
    };
    pub const TITLES_ONLY: RunPlan = RunPlan {
        titles: true,
        achievements: false,
    };
    pub const ACHIEVEMENTS_ONLY: RunPlan = RunPlan {
        titles: false,
        achievements: true,
    };
}

/// Everything computed for one dataset slice, not yet written
#[derive(Debug)]
pub struct SliceRun {
    pub slice: DatasetSlice,
    pub titles: Option<TitleReport>,
    pub achievements: Option<AchievementsFile>,
    snapshot: Option<CacheSnapshot>,
}

pub struct ProcessingService {
    config: AppConfig,
    rules: RuleTable,
    cache: Cache,
}

impl ProcessingService {
    pub fn new(config: AppConfig, rules: RuleTable) -> Result<Self> {
        rules.validate()?;
        let cache = Cache::new(&config.paths.cache_dir)?;
        Ok(Self { config, rules, cache })
    }

    /// Compute every requested slice, then write reports and caches.
    /// All files are staged first and only moved into place once every
    /// slice has been computed and staged.
    pub fn run(&self, slices: &[DatasetSlice], plan: RunPlan) -> Result<Vec<SliceRun>> {
        info!("=== Starting Title Processing ===\n");

        let games = self.load_games()?;
        info!("  → Loaded {} games from {}\n", games.len(), self.config.paths.games_path.display());

        let runs = slices
            .iter()
            .map(|&slice| self.process_slice(&games, slice, plan))
            .collect::<Result<Vec<_>>>()?;

        self.persist(&runs)?;

        info!("=== Processing Complete ===");
        Ok(runs)
    }

    pub fn load_games(&self) -> Result<GameCollection> {
        let path = &self.config.paths.games_path;
        let json = with_load_context(std::fs::read_to_string(path), path)?;
        let games: Vec<GameRecord> = with_parse_context(serde_json::from_str(&json), "game records")?;
        Ok(GameCollection::from_games(games))
    }

    pub fn process_slice(&self, games: &GameCollection, slice: DatasetSlice, plan: RunPlan) -> Result<SliceRun> {
        let slice_games = games.for_slice(slice);
        info!("  Processing slice {} ({} games)", slice.as_str(), slice_games.len());

        let mut run = SliceRun {
            slice,
            titles: None,
            achievements: None,
            snapshot: None,
        };

        if plan.titles {
            let cached = load_snapshot(&self.cache, slice);
            let outcome = aggregate_with_cache(slice, &slice_games, cached)?;

            let metrics = derive_metrics(&outcome.snapshot.totals, &self.config.eligibility);
            let titles = assign_titles(&metrics, &self.rules, &self.config);
            info!("    → {} players received titles", titles.players.len());

            run.titles = Some(TitleReport::new(slice, outcome.mode, slice_games.len(), titles));
            if !outcome.mode.is_fast_path() {
                run.snapshot = Some(outcome.snapshot);
            }
        }

        if plan.achievements {
            let players = compute_achievements(slice_games.iter().copied(), &self.rules.achievements);
            run.achievements = Some(AchievementsFile { slice, players });
        }

        Ok(run)
    }

    fn persist(&self, runs: &[SliceRun]) -> Result<()> {
        let output_dir = &self.config.paths.output_dir;
        let mut writes = StagedWrites::new();

        for run in runs {
            if let Some(report) = &run.titles {
                reports::stage_title_report(output_dir, report, &mut writes)?;
            }
            if let Some(file) = &run.achievements {
                reports::stage_achievements(output_dir, file, &mut writes)?;
            }
            if let Some(snapshot) = &run.snapshot {
                stage_snapshot(&self.cache, snapshot, &mut writes)?;
            }
        }

        for path in writes.commit()? {
            info!("    → Wrote {}", path.display());
        }
        Ok(())
    }

    pub fn print_summary(runs: &[SliceRun]) {
        for run in runs {
            if let Some(report) = &run.titles {
                reports::print_title_summary(report);
            }
            if let Some(file) = &run.achievements {
                reports::print_achievement_summary(file);
            }
        }
    }

    pub fn clear_cache(&self) -> Result<()> {
        self.cache.clear()
    }
}
