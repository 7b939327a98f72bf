use anyhow::Result;

use werewolf_titles::cli::{Cli, Command};
use werewolf_titles::{
    handle_achievements, handle_clear_cache, handle_export_rules, handle_process, handle_titles, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let cli = interpret();
    execute_command(&cli)
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Process => handle_process(cli),
        Command::Titles { slice } => handle_titles(cli, *slice),
        Command::Achievements => handle_achievements(cli),
        Command::ClearCache => handle_clear_cache(cli),
        Command::ExportRules { output } => handle_export_rules(output),
    }
}
