//! CSV exporter
//!
//! Headers are always written, so an empty table still yields a header line.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::{ExportError, ExportResult, check_target};
use crate::models::{CatalogTables, OutputTable};

/// Exporter for CSV tables
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }

    /// Render one table.
    pub fn export_table<T: OutputTable>(&self, rows: &[T]) -> Result<ExportResult, ExportError> {
        let mut writer = ::csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer
            .write_record(T::HEADERS)
            .map_err(|e| ExportError::SerializationError(e.to_string()))?;
        for row in rows {
            writer
                .serialize(row)
                .map_err(|e| ExportError::SerializationError(e.to_string()))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| ExportError::SerializationError(e.to_string()))?;
        let content =
            String::from_utf8(bytes).map_err(|e| ExportError::SerializationError(e.to_string()))?;

        Ok(ExportResult {
            content,
            format: "csv".to_string(),
        })
    }

    /// Write one table to `<dir>/<Table>.csv`.
    pub fn write_table<T: OutputTable>(
        &self,
        rows: &[T],
        dir: &Path,
        overwrite: bool,
    ) -> Result<PathBuf, ExportError> {
        let path = dir.join(format!("{}.csv", T::TABLE));
        check_target(&path, overwrite)?;
        let result = self.export_table(rows)?;
        fs::write(&path, result.content)?;
        info!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(path)
    }

    /// Write all five tables.
    pub fn write_tables(
        &self,
        tables: &CatalogTables,
        dir: &Path,
        overwrite: bool,
    ) -> Result<Vec<PathBuf>, ExportError> {
        fs::create_dir_all(dir)?;
        Ok(vec![
            self.write_table(&tables.dashboards, dir, overwrite)?,
            self.write_table(&tables.worksheets, dir, overwrite)?,
            self.write_table(&tables.chart_types, dir, overwrite)?,
            self.write_table(&tables.filters, dir, overwrite)?,
            self.write_table(&tables.windows, dir, overwrite)?,
        ])
    }
}
