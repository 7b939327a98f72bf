mod utils;

use werewolf_titles::cache::AggregationMode;
use werewolf_titles::config::{AppConfig, default_rule_table};
use werewolf_titles::domain::DatasetSlice;
use werewolf_titles::reports::{TitleReport, achievements_path, titles_path};
use werewolf_titles::services::{ProcessingService, RunPlan, SliceRun};

use utils::{temp_config, varied_history, write_games};

fn run(config: &AppConfig, slices: &[DatasetSlice], plan: RunPlan) -> Vec<SliceRun> {
    let service = ProcessingService::new(config.clone(), default_rule_table()).unwrap();
    service.run(slices, plan).unwrap()
}

fn titles(run: &SliceRun) -> &TitleReport {
    run.titles.as_ref().unwrap()
}

#[test]
fn second_run_without_new_games_takes_fast_path() {
    let config = temp_config("fast_path");
    write_games(&config, &varied_history(20, 100));

    let first = run(&config, &[DatasetSlice::All], RunPlan::TITLES_ONLY);
    let second = run(&config, &[DatasetSlice::All], RunPlan::TITLES_ONLY);

    assert_eq!(titles(&first[0]).aggregation, AggregationMode::Full { games: 100 });
    assert_eq!(titles(&second[0]).aggregation, AggregationMode::FastPath);
    assert_eq!(titles(&second[0]).game_count, 100);
    assert_eq!(titles(&first[0]).players, titles(&second[0]).players);
}

#[test]
fn incremental_run_matches_full_recompute() {
    let games = varied_history(20, 400);

    let incremental = temp_config("incremental");
    write_games(&incremental, &games[..300]);
    run(&incremental, &DatasetSlice::ALL, RunPlan::TITLES_ONLY);
    write_games(&incremental, &games);
    let updated = run(&incremental, &DatasetSlice::ALL, RunPlan::TITLES_ONLY);

    let full = temp_config("incremental_reference");
    write_games(&full, &games);
    let reference = run(&full, &DatasetSlice::ALL, RunPlan::TITLES_ONLY);

    assert_eq!(
        titles(&updated[0]).aggregation,
        AggregationMode::Incremental { new_games: 100 }
    );
    for (updated, reference) in updated.iter().zip(&reference) {
        assert_eq!(titles(updated).players, titles(reference).players);
        assert_eq!(titles(updated).eligible_players, titles(reference).eligible_players);
    }
}

#[test]
fn repeated_runs_write_identical_reports() {
    let config = temp_config("idempotent");
    write_games(&config, &varied_history(20, 200));
    let output_dir = config.paths.output_dir.clone();

    run(&config, &DatasetSlice::ALL, RunPlan::FULL);
    let first_titles: TitleReport =
        serde_json::from_str(&std::fs::read_to_string(titles_path(&output_dir, DatasetSlice::Standard)).unwrap())
            .unwrap();
    let first_achievements =
        std::fs::read_to_string(achievements_path(&output_dir, DatasetSlice::Standard)).unwrap();

    run(&config, &DatasetSlice::ALL, RunPlan::FULL);
    let second_titles: TitleReport =
        serde_json::from_str(&std::fs::read_to_string(titles_path(&output_dir, DatasetSlice::Standard)).unwrap())
            .unwrap();
    let second_achievements =
        std::fs::read_to_string(achievements_path(&output_dir, DatasetSlice::Standard)).unwrap();

    assert_eq!(second_titles.aggregation, AggregationMode::FastPath);
    assert_eq!(first_titles.players, second_titles.players);
    assert_eq!(first_achievements, second_achievements);
}

#[test]
fn standard_slice_leaves_out_custom_games() {
    let config = temp_config("slices");
    write_games(&config, &varied_history(20, 100));

    let runs = run(&config, &DatasetSlice::ALL, RunPlan::TITLES_ONLY);

    assert_eq!(titles(&runs[0]).game_count, 100);
    assert_eq!(titles(&runs[1]).game_count, 80);
    assert!(config.paths.cache_dir.join("snapshot_all.json").exists());
    assert!(config.paths.cache_dir.join("snapshot_standard.json").exists());
}

#[test]
fn corrupted_cache_is_rebuilt() {
    let config = temp_config("corrupted_cache");
    write_games(&config, &varied_history(20, 60));
    run(&config, &[DatasetSlice::All], RunPlan::TITLES_ONLY);

    std::fs::write(config.paths.cache_dir.join("snapshot_all.json"), "{ truncated").unwrap();
    let runs = run(&config, &[DatasetSlice::All], RunPlan::TITLES_ONLY);

    assert_eq!(titles(&runs[0]).aggregation, AggregationMode::Full { games: 60 });
}

#[test]
fn edited_game_forces_full_rebuild() {
    let config = temp_config("edited_game");
    let mut games = varied_history(20, 60);
    write_games(&config, &games);
    run(&config, &[DatasetSlice::All], RunPlan::TITLES_ONLY);

    games[10].participants[0].victorious = !games[10].participants[0].victorious;
    write_games(&config, &games);
    let runs = run(&config, &[DatasetSlice::All], RunPlan::TITLES_ONLY);

    assert_eq!(titles(&runs[0]).aggregation, AggregationMode::Full { games: 60 });
}

#[test]
fn missing_games_file_writes_nothing() {
    let config = temp_config("missing_games");
    let service = ProcessingService::new(config.clone(), default_rule_table()).unwrap();

    let result = service.run(&DatasetSlice::ALL, RunPlan::FULL);

    assert!(result.is_err());
    assert!(!config.paths.output_dir.exists());
    assert!(!config.paths.cache_dir.join("snapshot_all.json").exists());
}

#[test]
fn invalid_rule_table_is_rejected() {
    let config = temp_config("invalid_rules");
    let mut rules = default_rule_table();
    rules.achievements[0].tiers = vec![10, 5];

    let error = ProcessingService::new(config, rules).err().unwrap();

    assert!(error.to_string().contains("strictly ascending"));
}

#[test]
fn failed_write_leaves_previous_outputs_in_place() {
    let config = temp_config("failed_write");
    let games = varied_history(20, 100);
    write_games(&config, &games[..60]);
    run(&config, &DatasetSlice::ALL, RunPlan::FULL);

    let output_dir = &config.paths.output_dir;
    let snapshot_path = config.paths.cache_dir.join("snapshot_all.json");
    let titles_before = std::fs::read_to_string(titles_path(output_dir, DatasetSlice::All)).unwrap();
    let snapshot_before = std::fs::read_to_string(&snapshot_path).unwrap();

    // A directory where the last staged file goes makes that write fail
    std::fs::create_dir_all(output_dir.join("achievements_standard.json.tmp")).unwrap();
    write_games(&config, &games);
    let service = ProcessingService::new(config.clone(), default_rule_table()).unwrap();

    assert!(service.run(&DatasetSlice::ALL, RunPlan::FULL).is_err());
    assert_eq!(
        std::fs::read_to_string(titles_path(output_dir, DatasetSlice::All)).unwrap(),
        titles_before
    );
    assert_eq!(std::fs::read_to_string(&snapshot_path).unwrap(), snapshot_before);
    assert!(!output_dir.join("titles_all.json.tmp").exists());
    assert!(!config.paths.cache_dir.join("snapshot_all.json.tmp").exists());
}
