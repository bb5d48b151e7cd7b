//! ChartType table
//!
//! One row per non-compound view of each referenced report. When the report
//! has a compound view, its `currentView` index picks the view shown first.

use super::{CatalogResolver, ResolvedReferences, RowContext};
use crate::models::{ChartTypeRow, ReportExtract, ViewKind, ViewRecord};

pub(super) fn chart_type_rows(
    resolver: &CatalogResolver<'_>,
    references: &ResolvedReferences,
) -> Vec<ChartTypeRow> {
    let root = &resolver.corpus().root;
    let mut rows = Vec::new();

    for (view_ref, target) in &references.report_views {
        let context = RowContext::new(&view_ref.placement, root);
        let base = ChartTypeRow {
            worksheet_name: context.worksheet_name,
            dashboard_name: context.dashboard_name,
            report_name: view_ref.caption.clone(),
            report_name_tag: view_ref.report_view_name.clone(),
            worksheet_path: context.worksheet_path,
            dashboard_path: context.dashboard_path,
            report_path: view_ref.report_path.clone(),
            ..Default::default()
        };

        let Some(entry) = resolver.report(*target) else {
            rows.push(ChartTypeRow {
                chart_type: "unknown".to_string(),
                is_current_view: "No".to_string(),
                reason: format!("Report not found at path: {}", view_ref.report_path),
                ..base
            });
            continue;
        };

        let extract = &entry.extract;
        let selected = extract
            .compound_view()
            .and_then(|v| v.compound.as_ref())
            .and_then(|layout| layout.selected_child());

        for view in extract.views.iter().filter(|v| v.kind != ViewKind::Compound) {
            let current = selected == Some(view.view_name_raw.as_str());
            rows.push(ChartTypeRow {
                view_id: view.view_name_raw.clone(),
                view_type: view.kind.to_string(),
                chart_type: chart_type(view, extract),
                title_text: view.title_text.clone(),
                is_current_view: if current { "Yes" } else { "No" }.to_string(),
                ..base.clone()
            });
        }
    }
    rows
}

/// Display classification of a view.
pub fn chart_type(view: &ViewRecord, extract: &ReportExtract) -> String {
    match &view.kind {
        ViewKind::Table => "table".to_string(),
        ViewKind::Pivot => "pivot".to_string(),
        ViewKind::Title => "title".to_string(),
        ViewKind::Chart => extract
            .chart(&view.view_name)
            .map(|chart| chart.chart_type())
            .filter(|kind| !kind.is_empty())
            .unwrap_or_else(|| "chart".to_string()),
        other => other.as_str().to_string(),
    }
}
