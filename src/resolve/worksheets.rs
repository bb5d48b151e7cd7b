//! Worksheets table
//!
//! One row per (report reference, column, emitted view id). The view ids are
//! the raw names of every non-compound view of the report, so each column is
//! repeated once per view.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

use super::{CatalogResolver, ReportEntry, ResolvedReferences, RowContext};
use crate::import::identifiers::{normalize_view_name, strip_quotes};
use crate::models::{ColumnRecord, ReportExtract, ReportViewRef, ViewKind, WorksheetRow};

static RE_TABLE_COLUMN_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"\\]+)"\s*\.\s*"([^"\\]+)""#).expect("Invalid regex"));

static RE_VALUEOF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)VALUEOF\s*\(\s*([^)]+)\s*\)").expect("Invalid regex"));

static RE_COLUMN_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"saw_(\d+)").expect("Invalid regex"));

pub(super) fn worksheet_rows(
    resolver: &CatalogResolver<'_>,
    references: &ResolvedReferences,
) -> Vec<WorksheetRow> {
    let root = &resolver.corpus().root;
    let mut rows = Vec::new();

    for (view_ref, target) in &references.report_views {
        let context = RowContext::new(&view_ref.placement, root);
        match resolver.report(*target) {
            Some(entry) => rows.extend(report_rows(&context, view_ref, entry)),
            None => rows.push(WorksheetRow {
                worksheet_name: context.worksheet_name,
                dashboard_name: context.dashboard_name,
                report_name: view_ref.caption.clone(),
                report_name_tag: view_ref.report_view_name.clone(),
                worksheet_path: context.worksheet_path,
                dashboard_path: context.dashboard_path,
                report_path: view_ref.report_path.clone(),
                ..Default::default()
            }),
        }
    }
    rows
}

fn report_rows(
    context: &RowContext,
    view_ref: &ReportViewRef,
    entry: &ReportEntry,
) -> Vec<WorksheetRow> {
    let extract = &entry.extract;
    let subject_area = strip_quotes(&extract.report.subject_area).to_string();
    let aggregation = AggregationRules::new(extract);
    let view_context = normalize_view_name(&view_ref.report_view_name);
    let view_ids = emitted_view_ids(extract);

    let categories: BTreeSet<&str> = extract
        .chart_categories
        .iter()
        .map(|c| c.column_id.as_str())
        .collect();
    let mut measures: HashMap<&str, (&str, &str)> = HashMap::new();
    for measure in &extract.chart_measures {
        measures.insert(
            measure.column_id.as_str(),
            (measure.measure_type.as_str(), measure.riser_type.as_str()),
        );
    }

    let mut rows = Vec::new();
    for column in &extract.columns {
        let (tables, names) = table_and_column_names(column);
        let derivation = Derivation::of(column, extract);

        let mut x = 0;
        let mut y = 0;
        let mut encoding = String::new();
        let mut measure_type = String::new();
        let mut riser_type = String::new();
        if categories.contains(column.column_id.as_str()) {
            x = 1;
            encoding = "category".to_string();
        }
        if let Some((measure, riser)) = measures.get(column.column_id.as_str()) {
            y = 1;
            measure_type = measure.to_string();
            riser_type = riser.to_string();
            encoding = if riser.is_empty() {
                "measure".to_string()
            } else {
                riser.to_string()
            };
        }

        for view_id in &view_ids {
            rows.push(WorksheetRow {
                worksheet_name: context.worksheet_name.clone(),
                dashboard_name: context.dashboard_name.clone(),
                report_name: view_ref.caption.clone(),
                report_name_tag: view_ref.report_view_name.clone(),
                view_id: view_id.clone(),
                data_source_name: subject_area.clone(),
                table_names: tables.join("|"),
                column_names: names.join("|"),
                formula: column.expression.clone(),
                column_id: column.column_id.clone(),
                column_type: column.column_type.clone(),
                expression_type: column.expr_type.clone(),
                x,
                y,
                encoding: encoding.clone(),
                measure_type: measure_type.clone(),
                riser_type: riser_type.clone(),
                summarized_by: aggregation.lookup(&view_context, &column.column_id).to_string(),
                is_derived: if derivation.is_derived { "Yes" } else { "No" }.to_string(),
                source_column_ids: derivation.source_ids.join("|"),
                source_expressions: derivation.source_expressions.join("|"),
                worksheet_path: context.worksheet_path.clone(),
                dashboard_path: context.dashboard_path.clone(),
                report_path: view_ref.report_path.clone(),
            });
        }
    }
    rows
}

/// Raw names of all non-compound views in document order, or a single blank id.
pub fn emitted_view_ids(extract: &ReportExtract) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for view in &extract.views {
        if view.kind != ViewKind::Compound
            && !view.view_name_raw.is_empty()
            && !ids.contains(&view.view_name_raw)
        {
            ids.push(view.view_name_raw.clone());
        }
    }
    if ids.is_empty() {
        ids.push(String::new());
    }
    ids
}

/// Aggregation rules keyed by (normalized view name, column id)
///
/// Pivot measures are registered first and edge layers override them.
pub struct AggregationRules {
    rules: Vec<((String, String), String)>,
}

impl AggregationRules {
    pub fn new(extract: &ReportExtract) -> Self {
        let mut rules = Self { rules: Vec::new() };
        for measure in &extract.pivot_measures {
            rules.upsert(&measure.view_name, &measure.column_id, &measure.agg_rule);
        }
        for layer in &extract.edge_layers {
            rules.upsert(&layer.view_name, &layer.column_id, &layer.agg_rule);
        }
        rules
    }

    fn upsert(&mut self, view_name: &str, column_id: &str, agg_rule: &str) {
        if agg_rule.is_empty() {
            return;
        }
        let key = (view_name.to_string(), column_id.to_string());
        match self.rules.iter_mut().find(|(k, _)| *k == key) {
            Some((_, rule)) => *rule = agg_rule.to_string(),
            None => self.rules.push((key, agg_rule.to_string())),
        }
    }

    /// Rule for a column under a view; with no view, the first rule under any view.
    pub fn lookup(&self, view_name: &str, column_id: &str) -> &str {
        let exact = self
            .rules
            .iter()
            .find(|((v, c), _)| v == view_name && c == column_id);
        if let Some((_, rule)) = exact {
            return rule;
        }
        if view_name.is_empty()
            && let Some((_, rule)) = self.rules.iter().find(|((_, c), _)| c == column_id)
        {
            return rule;
        }
        ""
    }
}

/// Table and column names a column reads from.
pub fn table_and_column_names(column: &ColumnRecord) -> (Vec<String>, Vec<String>) {
    let expression = &column.expression;
    let mut tables = Vec::new();
    let mut names = Vec::new();
    let mut seen = Vec::new();

    for pair in RE_TABLE_COLUMN_PAIR.captures_iter(expression) {
        let table = pair[1].to_string();
        let name = pair[2].to_string();
        if !seen.contains(&(table.clone(), name.clone())) {
            seen.push((table.clone(), name.clone()));
            tables.push(table);
            names.push(name);
        }
    }

    if let Some(valueof) = RE_VALUEOF.captures(expression) {
        let mut parts = valueof[1].split('.');
        if let (Some(table), Some(name)) = (parts.next(), parts.next()) {
            tables.push(table.trim().to_string());
            names.push(name.trim().to_string());
        }
    }

    if tables.is_empty() && names.is_empty() {
        if !column.table_heading.is_empty() {
            tables.push(column.table_heading.clone());
        }
        if !column.column_heading.is_empty() {
            names.push(column.column_heading.clone());
        }
    }
    (tables, names)
}

/// Source columns of a computed column
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Derivation {
    pub is_derived: bool,
    pub source_ids: Vec<String>,
    pub source_expressions: Vec<String>,
}

impl Derivation {
    pub fn of(column: &ColumnRecord, extract: &ReportExtract) -> Self {
        let expression = &column.expression;
        let is_derived = !(column.expr_type.is_empty() || column.expr_type == "sqlExpression")
            || expression.to_uppercase().contains("CASE")
            || expression.contains('(');
        if !is_derived {
            return Self::default();
        }

        let referenced: BTreeSet<&str> = RE_COLUMN_REFERENCE
            .find_iter(expression)
            .map(|m| m.as_str())
            .collect();
        let mut source_ids: Vec<String> = referenced.into_iter().map(str::to_string).collect();
        source_ids.sort_by(|a, b| numeric_key(a).cmp(&numeric_key(b)).then_with(|| a.cmp(b)));
        let source_expressions = source_ids
            .iter()
            .map(|id| {
                extract
                    .column(id)
                    .map(|c| c.expression.clone())
                    .unwrap_or_default()
            })
            .collect();

        Self {
            is_derived,
            source_ids,
            source_expressions,
        }
    }
}

/// Sort key comparing the `saw_<n>` suffix by value, of any length.
fn numeric_key(id: &str) -> (usize, &str) {
    let digits = id.trim_start_matches("saw_").trim_start_matches('0');
    (digits.len(), digits)
}
