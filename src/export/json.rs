//! JSON exporter

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::{ExportError, ExportResult, check_target};
use crate::models::{CatalogTables, OutputTable};

/// Exporter for JSON tables (an array of row objects per table)
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonExporter;

impl JsonExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn export_table<T: OutputTable>(&self, rows: &[T]) -> Result<ExportResult, ExportError> {
        let content = serde_json::to_string_pretty(rows)
            .map_err(|e| ExportError::SerializationError(e.to_string()))?;
        Ok(ExportResult {
            content,
            format: "json".to_string(),
        })
    }

    pub fn write_table<T: OutputTable>(
        &self,
        rows: &[T],
        dir: &Path,
        overwrite: bool,
    ) -> Result<PathBuf, ExportError> {
        let path = dir.join(format!("{}.json", T::TABLE));
        check_target(&path, overwrite)?;
        fs::write(&path, self.export_table(rows)?.content)?;
        info!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(path)
    }

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
