use colored::Colorize;
use std::collections::BTreeMap;

use super::{AchievementsFile, TitleReport};
use crate::cache::AggregationMode;

pub fn print_title_summary(report: &TitleReport) {
    println!();
    println!(
        "{}",
        format!("🏆 Titles ({} slice)", report.slice.as_str()).bright_cyan().bold()
    );
    println!("{}", "======================".cyan());

    let aggregation = match report.aggregation {
        AggregationMode::FastPath => "cache hit, nothing re-aggregated".green(),
        AggregationMode::Incremental { new_games } => format!("{new_games} new games folded").yellow(),
        AggregationMode::Full { games } => format!("full rebuild over {games} games").yellow(),
    };
    println!("Games: {}", report.game_count);
    println!("Aggregation: {aggregation}");
    println!("Eligible players: {}", report.eligible_players);
    println!("Players with titles: {}", report.players.len());
    println!("Unique primary titles: {}", report.unique_primaries().to_string().green());

    if report.fallback_assignments > 0 {
        println!(
            "Fallback assignments: {}",
            report.fallback_assignments.to_string().red()
        );
    }

    let mut holders: BTreeMap<&str, usize> = BTreeMap::new();
    for primary in report.players.values().filter_map(|p| p.primary.as_ref()) {
        *holders.entry(primary.title_id.as_str()).or_default() += 1;
    }
    for (title_id, count) in holders {
        let line = format!("   {title_id}: {count}");
        if count > 1 {
            println!("{}", line.red());
        } else {
            println!("{line}");
        }
    }
}

pub fn print_achievement_summary(file: &AchievementsFile) {
    println!();
    println!(
        "{}",
        format!("🎖  Achievements ({} slice)", file.slice.as_str()).bright_cyan().bold()
    );
    println!("{}", "======================".cyan());

    let mut unlocks: BTreeMap<&str, usize> = BTreeMap::new();
    for progress in file.players.values().flatten() {
        *unlocks.entry(progress.achievement_id.as_str()).or_default() += progress.levels.len();
    }

    println!("Players with achievements: {}", file.players.len().to_string().green());
    for (achievement_id, levels) in unlocks {
        println!("   {}: {} tiers unlocked", achievement_id.bold(), levels);
    }
}
