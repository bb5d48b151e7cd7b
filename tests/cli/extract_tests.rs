//! Extract command tests

use std::fs;
use std::path::{Path, PathBuf};

use bi_catalog_extract::cli::CliError;
use bi_catalog_extract::cli::commands::extract::{ExtractArgs, handle_extract};
use bi_catalog_extract::config::OutputFormat;
use tempfile::TempDir;

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/catalog")
}

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("extract.toml");
    fs::write(&path, content).unwrap();
    path
}

fn args(dir: &Path, config: PathBuf) -> ExtractArgs {
    ExtractArgs {
        input: Some(fixture_root()),
        output: Some(dir.join("out")),
        config: Some(config),
        ..Default::default()
    }
}

#[test]
fn test_extract_writes_tables() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "");
    let summary = handle_extract(&args(dir.path(), config)).unwrap();

    assert_eq!(summary.reports, 2);
    for table in ["Dashboards", "Worksheets", "ChartType", "Filters", "Windows"] {
        assert!(dir.path().join("out").join(format!("{}.csv", table)).exists());
    }
}

#[test]
fn test_extract_json_with_diagnostics() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "");
    let diagnostics = dir.path().join("diagnostics.json");
    let args = ExtractArgs {
        format: Some(OutputFormat::Json),
        diagnostics: Some(diagnostics.clone()),
        ..args(dir.path(), config)
    };
    handle_extract(&args).unwrap();

    assert!(dir.path().join("out/Filters.json").exists());
    let events: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(diagnostics).unwrap()).unwrap();
    assert!(!events.as_array().unwrap().is_empty());
}

#[test]
fn test_config_without_overwrite_keeps_existing_tables() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "[output]\noverwrite = false\n");
    handle_extract(&args(dir.path(), config.clone())).unwrap();

    let err = handle_extract(&args(dir.path(), config.clone())).unwrap_err();
    assert!(matches!(err, CliError::ExportError(_)));
    assert_eq!(err.exit_code(), 1);

    let forced = ExtractArgs {
        force: true,
        ..args(dir.path(), config)
    };
    assert!(handle_extract(&forced).is_ok());
}

#[test]
fn test_missing_input_exits_with_two() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "");
    let args = ExtractArgs {
        input: Some(dir.path().join("missing")),
        ..args(dir.path(), config)
    };
    let err = handle_extract(&args).unwrap_err();
    assert!(matches!(err, CliError::InputNotFound(_)));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_missing_config_file() {
    let dir = TempDir::new().unwrap();
    let args = args(dir.path(), dir.path().join("absent.toml"));
    assert!(matches!(
        handle_extract(&args),
        Err(CliError::FileNotFound(_))
    ));
}
