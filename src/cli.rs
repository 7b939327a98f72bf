use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::DatasetSlice;

#[derive(Parser, Debug)]
#[command(author, version, about = "Player titles and achievements from game history")]
pub struct Cli {
    /// Settings file overriding the built-in defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Rule table file; the built-in table is used when absent
    #[arg(long, global = true)]
    pub rules: Option<PathBuf>,

    /// Game history file (overrides GAMES_PATH)
    #[arg(long, global = true)]
    pub games: Option<PathBuf>,

    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Compute titles and achievements for every dataset slice
    Process,
    /// Compute titles for a single dataset slice
    Titles {
        #[arg(short, long, value_enum, default_value_t = DatasetSlice::All)]
        slice: DatasetSlice,
    },
    /// Compute achievements for every dataset slice
    Achievements,
    /// Remove cached aggregate snapshots
    ClearCache,
    /// Write the built-in rule table as JSON
    ExportRules {
        #[arg(short, long, default_value = "rules.json")]
        output: PathBuf,
    },
}
