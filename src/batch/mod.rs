//! Batch driver
//!
//! Walks a catalog root, runs the extractors over every document and hands
//! the resulting [`Corpus`] to the resolver. Only a missing root is fatal;
//! every per-document failure is recorded in [`Diagnostics`] and skipped.

pub mod discovery;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::diagnostics::{DiagnosticEvent, Diagnostics, DocumentKind};
use crate::import::{DashboardImporter, PromptImporter, ReportImporter};
use crate::models::{CatalogTables, PageContext};
use crate::resolve::paths::{document_catalog_path, relative_name};
use crate::resolve::{CatalogResolver, Corpus, PromptEntry, QualityGates, ReportEntry};

/// Fatal batch error
#[derive(Debug, thiserror::Error, Serialize, Deserialize)]
pub enum BatchError {
    #[error("Catalog root not found: {0}")]
    RootNotFound(String),
    #[error("Catalog root is not a directory: {0}")]
    NotADirectory(String),
}

/// Counts reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub reports: usize,
    pub prompts: usize,
    pub dashboards: usize,
    pub pages: usize,
    pub skipped_documents: usize,
    pub report_references: usize,
    pub prompt_references: usize,
    pub link_references: usize,
    pub unresolved_references: usize,
    pub synthesized_references: usize,
    pub rejected_rows: usize,
}

impl RunSummary {
    pub fn new(corpus: &Corpus, diagnostics: &Diagnostics) -> Self {
        let synthesized_references = diagnostics
            .events()
            .iter()
            .map(|e| match e {
                DiagnosticEvent::ReferencesSynthesized { reports, prompts } => reports + prompts,
                _ => 0,
            })
            .sum();
        Self {
            reports: corpus.reports.len(),
            prompts: corpus.prompts.len(),
            dashboards: corpus.dashboards.len(),
            pages: corpus.pages.len(),
            skipped_documents: diagnostics.skipped_documents(),
            report_references: corpus.report_views().count(),
            prompt_references: corpus.global_filters().count(),
            link_references: corpus.action_links().count(),
            unresolved_references: diagnostics.unresolved_references(),
            synthesized_references,
            rejected_rows: diagnostics.rejected_rows(),
        }
    }
}

/// Tables and counts of one run
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub tables: CatalogTables,
    pub summary: RunSummary,
}

/// Extracts and resolves one catalog
#[derive(Debug, Clone, Default)]
pub struct CatalogBatch {
    gates: QualityGates,
}

impl CatalogBatch {
    pub fn new(gates: QualityGates) -> Self {
        Self { gates }
    }

    /// Extract and resolve the catalog under `root`.
    pub fn run(&self, root: &Path, diagnostics: &mut Diagnostics) -> Result<BatchOutput, BatchError> {
        let corpus = self.extract(root, diagnostics)?;
        let tables = CatalogResolver::new(&corpus, self.gates.clone()).resolve(diagnostics);
        let summary = RunSummary::new(&corpus, diagnostics);
        Ok(BatchOutput { tables, summary })
    }

    /// Parse every document under `root`.
    pub fn extract(&self, root: &Path, diagnostics: &mut Diagnostics) -> Result<Corpus, BatchError> {
        if !root.exists() {
            return Err(BatchError::RootNotFound(root.display().to_string()));
        }
        if !root.is_dir() {
            return Err(BatchError::NotADirectory(root.display().to_string()));
        }

        info!("Scanning catalog: {}", root.display());
        let layout = discovery::discover(root);
        let mut corpus = Corpus::new(root);
        let mut consumed: HashSet<PathBuf> = HashSet::new();

        for dir in &layout.dashboard_dirs {
            self.extract_dashboard(root, dir, &mut corpus, &mut consumed, diagnostics);
        }

        for file in &layout.files {
            if consumed.contains(file) || discovery::is_skipped(file) {
                continue;
            }
            self.extract_document(root, file, &mut corpus, diagnostics);
        }

        info!(
            "Catalog scanned: {} dashboards, {} pages, {} reports, {} prompts",
            corpus.dashboards.len(),
            corpus.pages.len(),
            corpus.reports.len(),
            corpus.prompts.len()
        );
        Ok(corpus)
    }

    fn extract_dashboard(
        &self,
        root: &Path,
        dir: &Path,
        corpus: &mut Corpus,
        consumed: &mut HashSet<PathBuf>,
        diagnostics: &mut Diagnostics,
    ) {
        let importer = DashboardImporter::new();
        let dashboard_name = relative_name(dir, root);
        let mut dashboard_duid = String::new();
        let mut page_names: Vec<String> = Vec::new();

        if let Some(layout_path) = discovery::layout_file(dir) {
            consumed.insert(layout_path.clone());
            let layout = read_document(&layout_path).and_then(|xml| {
                importer
                    .import_layout(&xml, &dashboard_name, &layout_path.to_string_lossy())
                    .map_err(anyhow::Error::from)
            });
            match layout {
                Ok(record) => {
                    dashboard_duid = if record.duid.is_empty() {
                        record.xml_version.clone()
                    } else {
                        record.duid.clone()
                    };
                    for page_ref in &record.page_refs {
                        match discovery::page_file(dir, page_ref) {
                            Some(page_path) => {
                                consumed.insert(page_path.clone());
                                let context = PageContext {
                                    dashboard_name: dashboard_name.clone(),
                                    page_name: page_ref.path.clone(),
                                    page_file: page_path.to_string_lossy().into_owned(),
                                    dashboard_duid: dashboard_duid.clone(),
                                };
                                if self.extract_page(&page_path, context, corpus, diagnostics) {
                                    page_names.push(page_ref.path.clone());
                                }
                            }
                            None => diagnostics.record(DiagnosticEvent::PageMissing {
                                dashboard: dashboard_name.clone(),
                                page: page_ref.path.clone(),
                            }),
                        }
                    }
                    corpus.dashboards.push(record);
                }
                Err(e) => diagnostics.record(DiagnosticEvent::DocumentSkipped {
                    kind: DocumentKind::DashboardLayout,
                    path: layout_path.display().to_string(),
                    error: format!("{:#}", e),
                }),
            }
        }

        for page_path in discovery::standalone_pages(dir) {
            if consumed.contains(&page_path) {
                continue;
            }
            let page_name = discovery::file_stem(&page_path).replace('+', " ");
            if page_names.contains(&page_name) {
                continue;
            }
            consumed.insert(page_path.clone());
            debug!("Standalone dashboard page: {}", page_path.display());
            let context = PageContext {
                dashboard_name: dashboard_name.clone(),
                page_name: page_name.clone(),
                page_file: page_path.to_string_lossy().into_owned(),
                dashboard_duid: dashboard_duid.clone(),
            };
            if self.extract_page(&page_path, context, corpus, diagnostics) {
                page_names.push(page_name);
            }
        }
    }

    fn extract_page(
        &self,
        path: &Path,
        context: PageContext,
        corpus: &mut Corpus,
        diagnostics: &mut Diagnostics,
    ) -> bool {
        let page = read_document(path).and_then(|xml| {
            DashboardImporter::new()
                .import_page(&xml, &context)
                .map_err(anyhow::Error::from)
        });
        match page {
            Ok(page) => {
                corpus.pages.push(page);
                true
            }
            Err(e) => {
                diagnostics.record(DiagnosticEvent::DocumentSkipped {
                    kind: DocumentKind::DashboardPage,
                    path: path.display().to_string(),
                    error: format!("{:#}", e),
                });
                false
            }
        }
    }

    fn extract_document(
        &self,
        root: &Path,
        path: &Path,
        corpus: &mut Corpus,
        diagnostics: &mut Diagnostics,
    ) {
        let xml = match read_document(path) {
            Ok(xml) => xml,
            Err(e) => {
                diagnostics.record(DiagnosticEvent::DocumentSkipped {
                    kind: DocumentKind::Report,
                    path: path.display().to_string(),
                    error: format!("{:#}", e),
                });
                return;
            }
        };
        let catalog_path = document_catalog_path(path, root);

        if discovery::is_prompt_candidate(path, root) {
            match PromptImporter::new().import(&xml) {
                Ok(document) if !document.prompts.is_empty() => {
                    info!("Parsed prompt: {}", catalog_path);
                    corpus.prompts.push(PromptEntry {
                        catalog_path,
                        file_path: path.to_path_buf(),
                        document,
                    });
                    return;
                }
                Ok(_) => debug!("No prompts in {}, trying as report", path.display()),
                Err(e) => debug!("Not a prompt document {}: {}", path.display(), e),
            }
        }

        if !discovery::is_report_candidate(path) {
            return;
        }
        match ReportImporter::new().import(&xml, &discovery::file_stem(path)) {
            Ok(extract) => {
                info!("Parsed report: {}", catalog_path);
                if extract.report.has_ambiguous_subject_area() {
                    diagnostics.record(DiagnosticEvent::AmbiguousSubjectArea {
                        report: catalog_path.clone(),
                        subject_areas: extract.report.nested_subject_areas.clone(),
                    });
                }
                corpus.reports.push(ReportEntry {
                    catalog_path,
                    file_path: path.to_path_buf(),
                    extract,
                });
            }
            Err(e) => diagnostics.record(DiagnosticEvent::DocumentSkipped {
                kind: DocumentKind::Report,
                path: path.display().to_string(),
                error: e.to_string(),
            }),
        }
    }
}

fn read_document(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
