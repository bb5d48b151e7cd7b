//! BI catalog extraction library
//!
//! Reads an exported BI web catalog (dashboard layouts, dashboard pages,
//! analysis reports and prompts stored as namespaced XML) and flattens it
//! into five denormalized tables:
//! - `Dashboards`: every object placed on a dashboard page
//! - `Worksheets`: report columns with chart roles, aggregation and derivation
//! - `ChartType`: one row per report view
//! - `Filters`: report filters, sort orders and dashboard prompts
//! - `Windows`: object placement on a synthetic grid
//!
//! The pipeline runs in two phases. Extraction ([`batch`] over [`import`])
//! parses each document once into the records in [`models`]; resolution
//! ([`resolve`]) joins dashboard references against those records and emits
//! rows. Problems along the way are recorded in [`Diagnostics`] instead of
//! aborting the run.

pub mod batch;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod export;
pub mod import;
pub mod models;
pub mod resolve;
pub mod xml;

pub use batch::{BatchError, BatchOutput, CatalogBatch, RunSummary};
pub use config::{ConfigError, ExtractConfig, OutputFormat};
pub use diagnostics::{DiagnosticEvent, Diagnostics, DocumentKind, QualityGate};
pub use export::{
    CsvExporter, ExportError, ExportResult, JsonExporter, SlicerPlacement, VisualConfigExporter,
};
pub use import::{
    DashboardImporter, FilterFlattener, ImportError, PromptImporter, ReportImporter,
};
pub use resolve::{CatalogResolver, Corpus, QualityGates};
pub use xml::{Document, Element, XmlError};

// Re-export output rows
pub use models::{
    CatalogTables, ChartTypeRow, DashboardRow, FilterRow, OutputTable, WindowRow, WorksheetRow,
};
