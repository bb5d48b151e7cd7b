//! Filters table
//!
//! Three kinds of rows:
//! - `ReportFilter`: one per flattened condition of a referenced report's filter
//! - `Sort`: one per declared column order of a referenced report
//! - prompt rows: one per prompt of a referenced prompt document, typed by the
//!   document's view type (`globalFilterPrompt`), or a single `Prompt` row
//!   when the prompt document could not be resolved
//!
//! Style, Layout, Position and Display hold compact JSON objects: no spaces
//! after separators and non-ASCII text written as is.

use serde_json::{Map, Value, json};

use super::{CatalogResolver, ReportEntry, ResolvedReferences, RowContext};
use crate::import::identifiers::{first_quoted_identifier, strip_quotes};
use crate::models::{
    FilterRow, GlobalFilterRef, PromptDefinition, PromptDocument, PromptVariable, ReportViewRef,
};

pub(super) fn filter_rows(
    resolver: &CatalogResolver<'_>,
    references: &ResolvedReferences,
) -> Vec<FilterRow> {
    let root = &resolver.corpus().root;
    let mut rows = Vec::new();

    for (view_ref, target) in &references.report_views {
        if let Some(entry) = resolver.report(*target) {
            let context = RowContext::new(&view_ref.placement, root);
            rows.extend(report_filter_rows(&context, view_ref, entry));
            rows.extend(sort_rows(&context, view_ref, entry));
        }
    }

    for (filter_ref, target) in &references.global_filters {
        let context = RowContext::new(&filter_ref.placement, root);
        match resolver.prompt(*target) {
            Some(entry) => rows.extend(
                entry
                    .document
                    .prompts
                    .iter()
                    .map(|prompt| prompt_row(&context, filter_ref, &entry.document, prompt)),
            ),
            None => rows.push(FilterRow {
                filter_type: "Prompt".to_string(),
                column_name: filter_ref.caption.clone(),
                ..base_row(&context, filter_ref.filter_path.clone())
            }),
        }
    }
    rows
}

fn base_row(context: &RowContext, report_path: String) -> FilterRow {
    FilterRow {
        worksheet_name: context.worksheet_name.clone(),
        dashboard_name: context.dashboard_name.clone(),
        worksheet_path: context.worksheet_path.clone(),
        dashboard_path: context.dashboard_path.clone(),
        report_path,
        ..Default::default()
    }
}

/// Serialize an attribute map, leaving empty maps blank.
fn map_json(map: &Map<String, Value>) -> String {
    if map.is_empty() {
        String::new()
    } else {
        Value::Object(map.clone()).to_string()
    }
}

fn report_filter_rows(
    context: &RowContext,
    view_ref: &ReportViewRef,
    entry: &ReportEntry,
) -> Vec<FilterRow> {
    let Some(filter) = &entry.extract.filter else {
        return Vec::new();
    };
    let subject_area = strip_quotes(&entry.extract.report.subject_area).to_string();
    let style = map_json(&filter.attributes);
    let layout = map_json(&filter.criteria_attributes);

    filter
        .conditions
        .iter()
        .map(|condition| FilterRow {
            report_name: view_ref.caption.clone(),
            filter_type: "ReportFilter".to_string(),
            column_name: condition.column_name.clone(),
            table_name: condition.table_name.clone(),
            expression: condition.column_expression.clone(),
            operator: condition.operator.clone(),
            parent_operator: condition.parent_operator.clone(),
            filter_value: condition.filter_value.clone(),
            subject_area: subject_area.clone(),
            style: style.clone(),
            layout: layout.clone(),
            ..base_row(context, view_ref.report_path.clone())
        })
        .collect()
}

fn sort_rows(context: &RowContext, view_ref: &ReportViewRef, entry: &ReportEntry) -> Vec<FilterRow> {
    let extract = &entry.extract;
    extract
        .column_orders
        .iter()
        .map(|order| {
            let expression = extract
                .column(&order.column_id)
                .map(|c| c.expression.clone())
                .unwrap_or_default();
            let (table_name, column_name) = first_quoted_identifier(&expression);
            let mut style = Map::new();
            style.insert("report_file".to_string(), json!(order.report_file));
            FilterRow {
                report_name: view_ref.caption.clone(),
                filter_type: "Sort".to_string(),
                column_id: order.column_id.clone(),
                column_name,
                table_name,
                direction: order.direction.clone(),
                expression,
                style: map_json(&style),
                ..base_row(context, view_ref.report_path.clone())
            }
        })
        .collect()
}

fn prompt_row(
    context: &RowContext,
    filter_ref: &GlobalFilterRef,
    document: &PromptDocument,
    prompt: &PromptDefinition,
) -> FilterRow {
    let default_values = prompt.default_values_joined();
    let expression = repair_in_expression(prompt, &default_values);
    let position = json!({
        "columnName": filter_ref.placement.column_name,
        "sectionName": filter_ref.placement.section_name,
        "filterIndex": filter_ref.placement.item_index.to_string(),
    });
    let control = prompt.ui_control.as_ref();
    let defaults = prompt.default_values.as_ref();
    let constrain = prompt.constrain.as_ref();
    let source = prompt.source.as_ref();

    FilterRow {
        filter_type: if document.view_type.is_empty() {
            "Prompt".to_string()
        } else {
            document.view_type.clone()
        },
        prompt_type: prompt.prompt_type.clone(),
        prompt_name: prompt.prompt_name.clone(),
        formula: expression.clone(),
        column_id: prompt.column_id.clone(),
        column_name: prompt.column_name.clone(),
        table_name: prompt.table_name.clone(),
        expression,
        operator: prompt.operator.clone(),
        filter_value: default_values.clone(),
        control_type: control.map(|c| c.control_type.clone()).unwrap_or_default(),
        max_choices: control.map(|c| c.max_choices.clone()).unwrap_or_default(),
        include_all_choices: control
            .map(|c| c.include_all_choices.clone())
            .unwrap_or_default(),
        required: prompt.required.clone(),
        default_values,
        default_values_type: defaults.map(|d| d.values_type.clone()).unwrap_or_default(),
        using_code_value: defaults
            .map(|d| d.using_code_value.clone())
            .unwrap_or_default(),
        constrain_prompt_type: constrain
            .map(|c| c.constrain_type.clone())
            .unwrap_or_default(),
        auto_select_value: constrain
            .map(|c| c.auto_select_value.clone())
            .unwrap_or_default(),
        prompt_var_location: join_variables(prompt, |v| &v.location),
        prompt_var_type: join_variables(prompt, |v| &v.variable_type),
        prompt_var_formula: join_variables(prompt, |v| &v.formula),
        prompt_source_type: source.map(|s| s.source_type.clone()).unwrap_or_default(),
        prompt_choices: source.map(|s| s.choices.join("|")).unwrap_or_default(),
        source_formula: source.map(|s| s.source_formula.clone()).unwrap_or_default(),
        instruction: document.instruction.clone(),
        subject_area: document.subject_area.clone(),
        style: map_json(&prompt.style()),
        layout: map_json(&prompt.layout(document.step_custom_width.as_ref())),
        position: position.to_string(),
        display: map_json(&prompt.display()),
        ..base_row(context, filter_ref.filter_path.clone())
    }
}

fn join_variables(prompt: &PromptDefinition, field: impl Fn(&PromptVariable) -> &String) -> String {
    prompt
        .variables
        .iter()
        .map(|v| field(v).as_str())
        .collect::<Vec<_>>()
        .join("|")
}

/// `IN` prompts store only the column; render the full condition from the defaults.
fn repair_in_expression(prompt: &PromptDefinition, default_values: &str) -> String {
    let expression = &prompt.formula;
    if prompt.operator == "in"
        && !expression.is_empty()
        && !expression.to_uppercase().contains("IN")
        && !prompt.table_name.is_empty()
        && !prompt.column_name.is_empty()
    {
        return format!(
            r#""{}"."{}" IN ({})"#,
            prompt.table_name,
            prompt.column_name,
            default_values.replace('|', ", ")
        );
    }
    expression.clone()
}
