//! Export functionality
//!
//! Provides exporters for the resolved tables:
//! - CSV (one file per table, fixed headers)
//! - JSON (one array file per table)
//! - Global-filter visual configuration (slicer layouts built from Filters rows)

pub mod csv;
pub mod json;
pub mod visual_config;

use std::path::{Path, PathBuf};

use crate::config::OutputFormat;
use crate::models::CatalogTables;

/// Result of an export operation.
///
/// Contains the exported content and format identifier.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[must_use = "export results contain the exported content and should be used"]
pub struct ExportResult {
    pub content: String,
    /// Format identifier
    pub format: String,
}

/// Error during export
#[derive(Debug, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Output exists: {0}")]
    OutputExists(String),
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::IoError(err.to_string())
    }
}

pub use self::csv::CsvExporter;
pub use json::JsonExporter;
pub use visual_config::{SlicerPlacement, VisualConfigExporter};

/// Write all tables to `dir` in `format`, returning the files written.
pub fn write_tables(
    tables: &CatalogTables,
    dir: &Path,
    format: OutputFormat,
    overwrite: bool,
) -> Result<Vec<PathBuf>, ExportError> {
    match format {
        OutputFormat::Csv => CsvExporter::new().write_tables(tables, dir, overwrite),
        OutputFormat::Json => JsonExporter::new().write_tables(tables, dir, overwrite),
    }
}

/// Fail when `path` exists and may not be replaced.
pub(crate) fn check_target(path: &Path, overwrite: bool) -> Result<(), ExportError> {
    if !overwrite && path.exists() {
        return Err(ExportError::OutputExists(path.display().to_string()));
    }
    Ok(())
}
