//! Catalog records
//!
//! Extractors produce these records once per document; the resolver only
//! reads and joins them into the rows in [`tables`].

pub mod dashboard;
pub mod filter;
pub mod prompt;
pub mod report;
pub mod tables;

pub use dashboard::{
    ActionLinkRef, DashboardColumn, DashboardPage, DashboardRecord, DashboardSection,
    GlobalFilterRef, PageContext, PageExtract, PageRef, ReportViewRef, SectionPlacement,
};
pub use filter::FilterCondition;
pub use prompt::{
    ConstrainPrompt, CustomSize, PromptDefaultValues, PromptDefinition, PromptDocument,
    PromptSource, PromptUiControl, PromptVariable,
};
pub use report::{
    ChartCategory, ChartMeasure, ChartRecord, ColumnOrder, ColumnRecord, CompoundLayout,
    EdgeLayerRecord, EdgeRecord, PivotMeasure, ReportExtract, ReportFilter, ReportRecord,
    ViewKind, ViewRecord,
};
pub use tables::{
    CatalogTables, ChartTypeRow, DashboardRow, FilterRow, OutputTable, WindowRow, WorksheetRow,
};
