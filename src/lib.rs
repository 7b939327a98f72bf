pub mod achievements;
pub mod cache;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod metrics;
pub mod percentiles;
pub mod reports;
pub mod services;
pub mod titles;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;
use std::path::Path;

use crate::cache::write_json_atomic;
use crate::config::{AppConfig, default_rule_table};
use crate::domain::DatasetSlice;
use crate::services::{ProcessingService, RunPlan};
use crate::titles::RuleTable;

pub fn interpret() -> Cli {
    Cli::parse()
}

/// Settings from `--config` (or defaults), with `--games` taking precedence
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::new(),
    };
    if let Some(games) = &cli.games {
        config.paths.games_path = games.clone();
    }
    Ok(config)
}

pub fn load_rules(cli: &Cli) -> Result<RuleTable> {
    match &cli.rules {
        Some(path) => RuleTable::from_file(path),
        None => Ok(default_rule_table()),
    }
}

fn service(cli: &Cli) -> Result<ProcessingService> {
    ProcessingService::new(load_config(cli)?, load_rules(cli)?)
}

pub fn handle_process(cli: &Cli) -> Result<()> {
    let runs = service(cli)?.run(&DatasetSlice::ALL, RunPlan::FULL)?;
    ProcessingService::print_summary(&runs);
    Ok(())
}

pub fn handle_titles(cli: &Cli, slice: DatasetSlice) -> Result<()> {
    let runs = service(cli)?.run(&[slice], RunPlan::TITLES_ONLY)?;
    ProcessingService::print_summary(&runs);
    Ok(())
}

pub fn handle_achievements(cli: &Cli) -> Result<()> {
    let runs = service(cli)?.run(&DatasetSlice::ALL, RunPlan::ACHIEVEMENTS_ONLY)?;
    ProcessingService::print_summary(&runs);
    Ok(())
}

pub fn handle_clear_cache(cli: &Cli) -> Result<()> {
    service(cli)?.clear_cache()
}

pub fn handle_export_rules(output: &Path) -> Result<()> {
    write_json_atomic(output, &default_rule_table())?;
    info!("Wrote built-in rule table to {}", output.display());
    Ok(())
}
