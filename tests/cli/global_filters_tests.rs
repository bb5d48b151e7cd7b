//! Global-filters command tests

use std::fs;
use std::path::{Path, PathBuf};

use bi_catalog_extract::cli::CliError;
use bi_catalog_extract::cli::commands::global_filters::{
    GlobalFiltersArgs, handle_global_filters,
};
use tempfile::TempDir;

const FILTERS_CSV: &str = "WorksheetName,DashboardName,FilterType,PromptName,TableName,ColumnName
Overview,Sales,globalFilterPrompt,Region,Markets,Region
Overview,Sales,ReportFilter,,Time,Year
Detail,Sales,globalFilterPrompt,Fiscal Year,Time,Fiscal Year
";

fn write_filters(dir: &Path) -> PathBuf {
    let path = dir.join("Filters.csv");
    fs::write(&path, FILTERS_CSV).unwrap();
    path
}

#[test]
fn test_writes_slicer_configurations() {
    let dir = TempDir::new().unwrap();
    let args = GlobalFiltersArgs {
        input: write_filters(dir.path()),
        output: dir.path().join("nested/globalFilter.json"),
        force: false,
    };
    assert_eq!(handle_global_filters(&args).unwrap(), 2);

    let content = fs::read_to_string(&args.output).unwrap();
    let entries: Vec<serde_json::Value> = serde_json::from_str(&content).unwrap();
    assert_eq!(entries[0]["dashboard"], "Sales");
    assert_eq!(entries[0]["tab"], "Overview");
    assert_eq!(entries[1]["tab"], "Detail");

    let config: serde_json::Value =
        serde_json::from_str(entries[1]["config"].as_str().unwrap()).unwrap();
    assert_eq!(
        config["singleVisual"]["projections"]["Values"][0]["queryRef"],
        "Time.FiscalYear"
    );
}

#[test]
fn test_existing_output_requires_force() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("globalFilter.json");
    fs::write(&output, "[]").unwrap();
    let args = GlobalFiltersArgs {
        input: write_filters(dir.path()),
        output: output.clone(),
        force: false,
    };
    assert!(matches!(
        handle_global_filters(&args),
        Err(CliError::InvalidArgument(_))
    ));

    let forced = GlobalFiltersArgs { force: true, ..args };
    assert_eq!(handle_global_filters(&forced).unwrap(), 2);
    assert_ne!(fs::read_to_string(output).unwrap(), "[]");
}

#[test]
fn test_missing_filters_table() {
    let dir = TempDir::new().unwrap();
    let args = GlobalFiltersArgs {
        input: dir.path().join("Filters.csv"),
        output: dir.path().join("globalFilter.json"),
        force: false,
    };
    let err = handle_global_filters(&args).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}
