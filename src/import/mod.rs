//! Import functionality
//!
//! Provides extractors for the catalog document kinds:
//! - Reports (criteria, columns, views, charts and the report filter)
//! - Dashboard layouts and pages
//! - Prompts (global filters)
//!
//! Each extractor parses one document completely or fails with an
//! [`ImportError`]; partial extracts are never returned.

pub mod dashboard;
pub mod filter;
pub mod identifiers;
pub mod prompt;
pub mod report;

pub use dashboard::DashboardImporter;
pub use filter::FilterFlattener;
pub use prompt::PromptImporter;
pub use report::ReportImporter;

use crate::xml::XmlError;

/// Error during import
#[derive(Debug, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum ImportError {
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<XmlError> for ImportError {
    fn from(error: XmlError) -> Self {
        ImportError::ParseError(error.to_string())
    }
}
