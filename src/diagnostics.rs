//! Run diagnostics
//!
//! Non-fatal conditions found while extracting and resolving a catalog are
//! recorded as [`DiagnosticEvent`]s in an explicit [`Diagnostics`] sink that
//! the batch driver and resolver receive by reference. Every recorded event is
//! also emitted through `tracing`.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Kind of catalog document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Report,
    Prompt,
    DashboardLayout,
    DashboardPage,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Report => write!(f, "report"),
            DocumentKind::Prompt => write!(f, "prompt"),
            DocumentKind::DashboardLayout => write!(f, "dashboard layout"),
            DocumentKind::DashboardPage => write!(f, "dashboard page"),
        }
    }
}

/// Data-quality gate applied to worksheet rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityGate {
    /// Empty, aggregate-difference or IFERROR table names
    ErroneousTableNames,
    /// A table on the denylist
    DeniedTable,
    /// A denied combination of tables
    DeniedTableUnion,
}

impl fmt::Display for QualityGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityGate::ErroneousTableNames => write!(f, "erroneous table names"),
            QualityGate::DeniedTable => write!(f, "denied table"),
            QualityGate::DeniedTableUnion => write!(f, "denied table union"),
        }
    }
}

/// Something worth reporting that did not stop the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DiagnosticEvent {
    /// A document could not be parsed and was left out
    DocumentSkipped {
        kind: DocumentKind,
        path: String,
        error: String,
    },
    /// A page declared by a layout has no file
    PageMissing { dashboard: String, page: String },
    /// A dashboard reference matched no parsed document
    ReferenceUnresolved {
        kind: DocumentKind,
        path: String,
        page: String,
    },
    /// Several nested subject areas were concatenated
    AmbiguousSubjectArea {
        report: String,
        subject_areas: Vec<String>,
    },
    /// Worksheet rows dropped by a quality gate
    RowsRejected { gate: QualityGate, count: usize },
    /// Column names rewritten from variable syntax
    ColumnNamesNormalized { count: usize },
    /// References added for documents no dashboard points at
    ReferencesSynthesized { reports: usize, prompts: usize },
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticEvent::DocumentSkipped { kind, path, error } => {
                write!(f, "Skipped {} '{}': {}", kind, path, error)
            }
            DiagnosticEvent::PageMissing { dashboard, page } => {
                write!(f, "Dashboard '{}' page file not found: {}", dashboard, page)
            }
            DiagnosticEvent::ReferenceUnresolved { kind, path, page } => {
                write!(f, "Unresolved {} reference '{}' on page '{}'", kind, path, page)
            }
            DiagnosticEvent::AmbiguousSubjectArea {
                report,
                subject_areas,
            } => write!(
                f,
                "Report '{}' spans subject areas: {}",
                report,
                subject_areas.join(" | ")
            ),
            DiagnosticEvent::RowsRejected { gate, count } => {
                write!(f, "Dropped {} worksheet rows ({})", count, gate)
            }
            DiagnosticEvent::ColumnNamesNormalized { count } => {
                write!(f, "Normalized {} variable column names", count)
            }
            DiagnosticEvent::ReferencesSynthesized { reports, prompts } => write!(
                f,
                "Synthesized references for {} unreferenced reports and {} prompts",
                reports, prompts
            ),
        }
    }
}

/// Collected diagnostics of one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    events: Vec<DiagnosticEvent>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event and log it.
    pub fn record(&mut self, event: DiagnosticEvent) {
        match &event {
            DiagnosticEvent::DocumentSkipped { .. }
            | DiagnosticEvent::PageMissing { .. }
            | DiagnosticEvent::ReferenceUnresolved { .. } => warn!("{}", event),
            DiagnosticEvent::AmbiguousSubjectArea { .. } => debug!("{}", event),
            DiagnosticEvent::RowsRejected { count: 0, .. }
            | DiagnosticEvent::ColumnNamesNormalized { count: 0 } => debug!("{}", event),
            _ => info!("{}", event),
        }
        self.events.push(event);
    }

    pub fn events(&self) -> &[DiagnosticEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of documents skipped because they failed to parse.
    pub fn skipped_documents(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, DiagnosticEvent::DocumentSkipped { .. }))
            .count()
    }

    /// Number of dashboard references that matched nothing.
    pub fn unresolved_references(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, DiagnosticEvent::ReferenceUnresolved { .. }))
            .count()
    }

    /// Total worksheet rows rejected by quality gates.
    pub fn rejected_rows(&self) -> usize {
        self.events
            .iter()
            .map(|e| match e {
                DiagnosticEvent::RowsRejected { count, .. } => *count,
                _ => 0,
            })
            .sum()
    }
}
