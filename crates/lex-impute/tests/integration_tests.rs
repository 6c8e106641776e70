//! Integration tests for the cleaning pipeline.
//!
//! These tests run full load, impute and save cycles over the fixtures in
//! `tests/fixtures`.

use lex_impute::{
    CleaningPipeline, ImputationEngine, ImputeError, RunConfig, StrategyConfig, load_dataset,
    read_config,
};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn run_config(strategies: &str, output: &TempDir) -> RunConfig {
    RunConfig::builder()
        .input_path(fixtures_path().join("stocks.csv"))
        .strategy_path(fixtures_path().join(strategies))
        .output_path(output.path().join("cleaned_data.csv"))
        .build()
        .expect("valid config")
}

fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

fn strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::String)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

// ============================================================================
// Full Pipeline Tests
// ============================================================================

#[test]
fn test_full_run_fills_every_configured_column() {
    let output = TempDir::new().unwrap();
    let config = run_config("stocks.ini", &output);

    let summary = CleaningPipeline::new(config.clone()).run().unwrap();

    assert_eq!(summary.columns, 6);
    assert_eq!(
        summary.columns_with_missing,
        vec!["Open", "High", "Close", "Volume", "Ticker"]
    );
    assert_eq!(summary.imputation.rows_removed(), 0);
    assert_eq!(summary.imputation.values_filled(), 6);

    let cleaned = load_dataset(&config.output_path, &["Date".to_string()]).unwrap();
    assert_eq!(cleaned.height(), 6);
    assert_eq!(cleaned.column("Date").unwrap().dtype(), &DataType::Date);

    assert_eq!(floats(&cleaned, "Open")[1], Some(11.0));
    assert_eq!(floats(&cleaned, "High")[2], Some(12.0));
    assert_eq!(floats(&cleaned, "Volume")[1], Some(350.0));
    assert_eq!(floats(&cleaned, "Volume")[5], Some(350.0));
    assert_eq!(strings(&cleaned, "Ticker")[2], Some("AAA".to_string()));

    // Close rises by exactly 1.0 per row, which the cubic fit reproduces
    let close = floats(&cleaned, "Close")[3].unwrap();
    assert!((close - 13.5).abs() < 1e-9, "got {close}");
}

#[test]
fn test_remove_and_default_section() {
    let output = TempDir::new().unwrap();
    let config = run_config("remove.ini", &output);

    let summary = CleaningPipeline::new(config.clone()).run().unwrap();
    assert_eq!(summary.imputation.rows_removed(), 1);

    let cleaned = load_dataset(&config.output_path, &["Date".to_string()]).unwrap();
    assert_eq!(cleaned.height(), 5);

    // Open falls back to the [DEFAULT] zero strategy before Ticker removes row 2
    assert_eq!(
        floats(&cleaned, "Open"),
        vec![Some(10.0), Some(0.0), Some(13.0), Some(14.0), Some(15.0)]
    );
    assert_eq!(
        floats(&cleaned, "High"),
        vec![Some(11.0), Some(12.0), Some(14.0), Some(15.0), Some(16.0)]
    );
    // Unconfigured columns keep their gaps
    assert_eq!(cleaned.column("Volume").unwrap().null_count(), 2);
}

#[test]
fn test_invalid_strategy_aborts_without_output() {
    let output = TempDir::new().unwrap();
    let config = run_config("invalid_strategy.ini", &output);

    let err = CleaningPipeline::new(config.clone()).run().unwrap_err();

    match &err {
        ImputeError::InvalidStrategy { column, strategy } => {
            assert_eq!(column, "Volume");
            assert_eq!(strategy, "average");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.exit_code(), 3);
    assert!(!config.output_path.exists());
}

#[test]
fn test_mean_on_text_column_fails() {
    let output = TempDir::new().unwrap();
    let config = run_config("text_mean.ini", &output);

    let err = CleaningPipeline::new(config).run().unwrap_err();
    assert_eq!(err.error_code(), "UNSUPPORTED_COLUMN_TYPE");
    assert_eq!(err.column(), Some("Ticker"));
}

#[test]
fn test_missing_config_file() {
    let output = TempDir::new().unwrap();
    let config = run_config("does_not_exist.ini", &output);

    let err = CleaningPipeline::new(config).run().unwrap_err();
    assert!(matches!(err, ImputeError::ConfigRead { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_missing_input_file() {
    let output = TempDir::new().unwrap();
    let config = RunConfig::builder()
        .input_path(output.path().join("nope.csv"))
        .strategy_path(fixtures_path().join("stocks.ini"))
        .output_path(output.path().join("out.csv"))
        .build()
        .unwrap();

    let err = CleaningPipeline::new(config).run().unwrap_err();
    assert_eq!(err.exit_code(), 4);
}

#[test]
fn test_inspect_reports_stripped_names() {
    let output = TempDir::new().unwrap();
    let profile = CleaningPipeline::new(run_config("stocks.ini", &output))
        .inspect()
        .unwrap();

    let counts: Vec<(String, usize)> = profile
        .into_iter()
        .map(|p| (p.name, p.missing_count))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("Date".to_string(), 0),
            ("Open".to_string(), 1),
            ("High".to_string(), 1),
            ("Close".to_string(), 1),
            ("Volume".to_string(), 2),
            ("Ticker".to_string(), 1),
        ]
    );
}

// ============================================================================
// Engine over loaded data
// ============================================================================

#[test]
fn test_engine_with_file_config() {
    let df = load_dataset(fixtures_path().join("stocks.csv"), &["Date".to_string()]).unwrap();
    let strategies = read_config(fixtures_path().join("stocks.ini")).unwrap();

    let plan = ImputationEngine::new(strategies.clone()).plan(&df).unwrap();
    let planned: Vec<String> = plan
        .iter()
        .map(|(column, strategy)| format!("{column}={strategy}"))
        .collect();
    assert_eq!(
        planned,
        vec![
            "Open=linear",
            "High=ffill",
            "Close=cubic",
            "Volume=median",
            "Ticker=mode"
        ]
    );

    let imputed = ImputationEngine::new(strategies).impute(df).unwrap();
    for column in imputed.data.get_columns() {
        assert_eq!(column.null_count(), 0, "column {}", column.name());
    }
}

#[test]
fn test_backfill_leaves_trailing_gap() {
    let df = load_dataset(fixtures_path().join("stocks.csv"), &[]).unwrap();
    let strategies = StrategyConfig::from_pairs([("Volume", "bfill")]);

    let imputed = ImputationEngine::new(strategies).impute(df).unwrap();

    assert_eq!(
        floats(&imputed.data, "Volume"),
        vec![
            Some(100.0),
            Some(300.0),
            Some(300.0),
            Some(400.0),
            Some(500.0),
            None
        ]
    );
    assert_eq!(imputed.summary.columns[0].missing_after(), 1);
}
