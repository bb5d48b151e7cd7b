//! Catalog resolver
//!
//! Joins the per-document records of a [`Corpus`] into the five output tables.
//! Dashboard references are matched to report and prompt documents by catalog
//! path (percent-decoded, case-insensitive, basename fallback). Documents that
//! no dashboard references get a synthesized reference, so a catalog without
//! dashboards still produces every table.

pub mod chart_types;
pub mod filters;
pub mod layout;
pub mod paths;
pub mod quality;
pub mod worksheets;

pub use quality::QualityGates;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::diagnostics::{DiagnosticEvent, Diagnostics, DocumentKind};
use crate::models::{
    ActionLinkRef, CatalogTables, DashboardRecord, GlobalFilterRef, PageExtract, PromptDocument,
    ReportExtract, ReportViewRef, SectionPlacement,
};
use paths::{
    CatalogIndex, basename, dashboard_catalog_path, dashboard_display_name, parent_folder,
    percent_decode, worksheet_catalog_path,
};

/// Parsed report document
#[derive(Debug, Clone)]
pub struct ReportEntry {
    /// Decoded catalog path, e.g. `/shared/Sales/Revenue`
    pub catalog_path: String,
    pub file_path: PathBuf,
    pub extract: ReportExtract,
}

/// Parsed prompt document
#[derive(Debug, Clone)]
pub struct PromptEntry {
    pub catalog_path: String,
    pub file_path: PathBuf,
    pub document: PromptDocument,
}

/// Everything extracted from one catalog, in discovery order
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub root: PathBuf,
    pub dashboards: Vec<DashboardRecord>,
    pub pages: Vec<PageExtract>,
    pub reports: Vec<ReportEntry>,
    pub prompts: Vec<PromptEntry>,
}

impl Corpus {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    pub fn report_views(&self) -> impl Iterator<Item = &ReportViewRef> {
        self.pages.iter().flat_map(|p| p.report_views.iter())
    }

    pub fn global_filters(&self) -> impl Iterator<Item = &GlobalFilterRef> {
        self.pages.iter().flat_map(|p| p.global_filters.iter())
    }

    pub fn action_links(&self) -> impl Iterator<Item = &ActionLinkRef> {
        self.pages.iter().flat_map(|p| p.action_links.iter())
    }
}

/// Naming shared by every row produced from one dashboard reference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowContext {
    pub worksheet_name: String,
    pub dashboard_name: String,
    pub dashboard_path: String,
    pub worksheet_path: String,
}

impl RowContext {
    pub fn new(placement: &SectionPlacement, root: &Path) -> Self {
        let worksheet_path = if placement.page_file.is_empty() {
            String::new()
        } else {
            worksheet_catalog_path(Path::new(&placement.page_file), root)
        };
        Self {
            worksheet_name: placement.page_name.clone(),
            dashboard_name: dashboard_display_name(&placement.dashboard_name),
            dashboard_path: dashboard_catalog_path(&placement.dashboard_name),
            worksheet_path,
        }
    }
}

/// Dashboard references after the inclusion policy, each with its target
#[derive(Debug, Clone, Default)]
pub struct ResolvedReferences {
    pub report_views: Vec<(ReportViewRef, Option<usize>)>,
    pub global_filters: Vec<(GlobalFilterRef, Option<usize>)>,
    pub action_links: Vec<ActionLinkRef>,
}

/// Joins a corpus into output tables
pub struct CatalogResolver<'a> {
    corpus: &'a Corpus,
    gates: QualityGates,
    report_index: CatalogIndex,
    prompt_index: CatalogIndex,
}

impl<'a> CatalogResolver<'a> {
    pub fn new(corpus: &'a Corpus, gates: QualityGates) -> Self {
        Self {
            report_index: CatalogIndex::new(corpus.reports.iter().map(|r| r.catalog_path.as_str())),
            prompt_index: CatalogIndex::new(corpus.prompts.iter().map(|p| p.catalog_path.as_str())),
            corpus,
            gates,
        }
    }

    pub fn corpus(&self) -> &Corpus {
        self.corpus
    }

    pub fn report(&self, position: Option<usize>) -> Option<&'a ReportEntry> {
        self.corpus.reports.get(position?)
    }

    pub fn prompt(&self, position: Option<usize>) -> Option<&'a PromptEntry> {
        self.corpus.prompts.get(position?)
    }

    /// Build all output tables.
    pub fn resolve(&self, diagnostics: &mut Diagnostics) -> CatalogTables {
        let references = self.references(diagnostics);

        let worksheets = worksheets::worksheet_rows(self, &references);
        let worksheets = self.gates.apply(worksheets, diagnostics);

        let tables = CatalogTables {
            dashboards: layout::dashboard_rows(self, &references),
            worksheets,
            chart_types: chart_types::chart_type_rows(self, &references),
            filters: filters::filter_rows(self, &references),
            windows: layout::window_rows(self, &references),
        };

        info!(
            "Resolved tables: {} dashboards, {} worksheets, {} chart types, {} filters, {} windows",
            tables.dashboards.len(),
            tables.worksheets.len(),
            tables.chart_types.len(),
            tables.filters.len(),
            tables.windows.len()
        );
        tables
    }

    /// Resolve dashboard references and add synthesized ones for unreferenced documents.
    pub fn references(&self, diagnostics: &mut Diagnostics) -> ResolvedReferences {
        let mut resolved = ResolvedReferences::default();

        for view in self.corpus.report_views() {
            let target = self.report_index.resolve(&view.report_path);
            if target.is_none() {
                diagnostics.record(DiagnosticEvent::ReferenceUnresolved {
                    kind: DocumentKind::Report,
                    path: view.report_path.clone(),
                    page: view.placement.page_name.clone(),
                });
            }
            resolved.report_views.push((view.clone(), target));
        }

        for filter in self.corpus.global_filters() {
            let target = self.prompt_index.resolve(&filter.filter_path);
            if target.is_none() {
                diagnostics.record(DiagnosticEvent::ReferenceUnresolved {
                    kind: DocumentKind::Prompt,
                    path: filter.filter_path.clone(),
                    page: filter.placement.page_name.clone(),
                });
            }
            resolved.global_filters.push((filter.clone(), target));
        }

        resolved.action_links = self.corpus.action_links().cloned().collect();

        let referenced_reports: HashSet<usize> =
            resolved.report_views.iter().filter_map(|(_, t)| *t).collect();
        let referenced_prompts: HashSet<usize> =
            resolved.global_filters.iter().filter_map(|(_, t)| *t).collect();

        let mut synthesized_reports = 0;
        for (position, entry) in self.corpus.reports.iter().enumerate() {
            if !referenced_reports.contains(&position) {
                resolved
                    .report_views
                    .push((self.synthesize_report_view(entry), Some(position)));
                synthesized_reports += 1;
            }
        }

        let mut synthesized_prompts = 0;
        for (position, entry) in self.corpus.prompts.iter().enumerate() {
            if !referenced_prompts.contains(&position) {
                resolved
                    .global_filters
                    .push((synthesize_global_filter(entry), Some(position)));
                synthesized_prompts += 1;
            }
        }

        if synthesized_reports > 0 || synthesized_prompts > 0 {
            diagnostics.record(DiagnosticEvent::ReferencesSynthesized {
                reports: synthesized_reports,
                prompts: synthesized_prompts,
            });
        }
        resolved
    }

    fn synthesize_report_view(&self, entry: &ReportEntry) -> ReportViewRef {
        let file_name = entry
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let page_name = if file_name.is_empty() {
            basename(&entry.catalog_path).to_string()
        } else {
            let decoded = percent_decode(&file_name.replace('+', " "));
            decoded.strip_suffix(".xml").unwrap_or(&decoded).to_string()
        };
        let folder_path = worksheet_catalog_path(&entry.file_path, &self.corpus.root);

        ReportViewRef {
            placement: SectionPlacement {
                dashboard_name: parent_folder(&folder_path).to_string(),
                page_name: page_name.clone(),
                page_file: entry.file_path.to_string_lossy().into_owned(),
                ..Default::default()
            },
            caption: page_name,
            report_path: entry.catalog_path.clone(),
            report_type: "report".to_string(),
            ..Default::default()
        }
    }
}

fn synthesize_global_filter(entry: &PromptEntry) -> GlobalFilterRef {
    let page_name = basename(&entry.catalog_path).to_string();
    GlobalFilterRef {
        placement: SectionPlacement {
            dashboard_name: parent_folder(&entry.catalog_path).to_string(),
            page_name: page_name.clone(),
            page_file: entry.file_path.to_string_lossy().into_owned(),
            ..Default::default()
        },
        filter_name: page_name.clone(),
        filter_path: entry.catalog_path.clone(),
        caption: page_name,
        ..Default::default()
    }
}
