//! Report records
//!
//! One [`ReportExtract`] is produced per report document. The record sets are
//! relational: everything below the report is keyed by `report_file` and, for
//! view-scoped records, by the normalized view name.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::filter::FilterCondition;

/// Report-level metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    /// Document base name without extension
    pub report_file: String,
    pub xml_version: String,
    /// Criteria `xsi:type` without prefix (`simpleCriteria`, `derivedCriteria`)
    pub criteria_type: String,
    /// Subject area; nested subject areas are joined with `" | "`
    pub subject_area: String,
    pub within_hierarchy: String,
    /// Distinct subject areas found in nested criteria when the top level has none
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested_subject_areas: Vec<String>,
}

impl ReportRecord {
    /// More than one nested subject area contributed to `subject_area`.
    pub fn has_ambiguous_subject_area(&self) -> bool {
        self.nested_subject_areas.len() > 1
    }
}

/// Criteria column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRecord {
    pub report_file: String,
    pub column_id: String,
    pub column_type: String,
    /// Formula expression type without prefix (`sqlExpression`, ...)
    pub expr_type: String,
    pub expression: String,
    pub table_heading: String,
    pub column_heading: String,
}

/// Declared sort order entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnOrder {
    pub report_file: String,
    pub column_id: String,
    pub direction: String,
}

/// View type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ViewKind {
    Table,
    Pivot,
    Chart,
    Compound,
    Title,
    Other(String),
}

impl ViewKind {
    /// Classify an `xsi:type` value with the prefix already removed.
    pub fn from_type(view_type: &str) -> Self {
        match view_type {
            "tableView" => ViewKind::Table,
            "pivotTableView" => ViewKind::Pivot,
            "dvtchart" => ViewKind::Chart,
            "compoundView" => ViewKind::Compound,
            "titleView" => ViewKind::Title,
            other => ViewKind::Other(other.to_string()),
        }
    }

    /// The catalog type name.
    pub fn as_str(&self) -> &str {
        match self {
            ViewKind::Table => "tableView",
            ViewKind::Pivot => "pivotTableView",
            ViewKind::Chart => "dvtchart",
            ViewKind::Compound => "compoundView",
            ViewKind::Title => "titleView",
            ViewKind::Other(other) => other,
        }
    }
}

impl From<ViewKind> for String {
    fn from(kind: ViewKind) -> Self {
        kind.as_str().to_string()
    }
}

impl From<String> for ViewKind {
    fn from(value: String) -> Self {
        ViewKind::from_type(&value)
    }
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Child layout of a compound view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundLayout {
    /// `currentView` of the enclosing views element, a zero-based child index
    pub current_view: String,
    /// Child view names with positional suffix, in cell order
    pub children_raw: Vec<String>,
    /// Same children with the suffix removed
    pub children: Vec<String>,
}

impl CompoundLayout {
    /// Raw name of the child selected by `current_view`, if the index is valid.
    pub fn selected_child(&self) -> Option<&str> {
        let index: usize = self.current_view.trim().parse().ok()?;
        self.children_raw.get(index).map(String::as_str)
    }
}

/// Report view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRecord {
    pub report_file: String,
    /// Name with any `!<n>` suffix removed
    pub view_name: String,
    /// Name as declared; the durable identity of the view
    pub view_name_raw: String,
    pub kind: ViewKind,
    /// Listed as a cell of a compound view, or is itself a compound view
    pub in_compound_view: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compound: Option<CompoundLayout>,
    /// Caption of a title view
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title_text: String,
}

/// Edge of a table or pivot view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub report_file: String,
    pub view_name: String,
    pub axis: String,
    pub show_column_header: String,
}

/// Layer of an edge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeLayerRecord {
    pub report_file: String,
    pub view_name: String,
    pub axis: String,
    pub layer_type: String,
    pub column_id: String,
    pub agg_rule: String,
}

/// Chart display settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRecord {
    pub report_file: String,
    pub view_name: String,
    pub display_type: String,
    pub display_subtype: String,
    pub render_format: String,
    pub display_mode: String,
    pub bar_style: String,
    pub line_style: String,
    pub scatter_style: String,
    pub fill_style: String,
    pub bubble_percent_size: String,
    pub effect: String,
    pub canvas_height: String,
    pub canvas_width: String,
    pub data_labels_display: String,
    pub data_labels_label: String,
    pub data_labels_position: String,
    pub data_labels_transparent: String,
    pub data_labels_value_as: String,
    pub legend_position: String,
    pub legend_transparent_fill: String,
}

impl ChartRecord {
    /// `type_subtype`, or `type` when there is no subtype.
    pub fn chart_type(&self) -> String {
        match (self.display_type.as_str(), self.display_subtype.as_str()) {
            ("", _) => String::new(),
            (kind, "") => kind.to_string(),
            (kind, subtype) => format!("{}_{}", kind, subtype),
        }
    }
}

/// Chart category (dimension) column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartCategory {
    pub report_file: String,
    pub view_name: String,
    pub column_id: String,
}

/// Chart measure column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartMeasure {
    pub report_file: String,
    pub view_name: String,
    pub column_id: String,
    pub measure_type: String,
    pub riser_type: String,
}

/// Pivot measure with its aggregation rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotMeasure {
    pub report_file: String,
    pub view_name: String,
    pub column_id: String,
    pub agg_rule: String,
}

/// Flattened report filter with the attributes used for formatting columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportFilter {
    /// Attributes of the filter element
    pub attributes: Map<String, Value>,
    /// Criteria attributes other than type, subject area and hierarchy flag
    pub criteria_attributes: Map<String, Value>,
    pub conditions: Vec<FilterCondition>,
}

/// Everything extracted from one report document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportExtract {
    pub report: ReportRecord,
    pub columns: Vec<ColumnRecord>,
    pub column_orders: Vec<ColumnOrder>,
    pub views: Vec<ViewRecord>,
    pub edges: Vec<EdgeRecord>,
    pub edge_layers: Vec<EdgeLayerRecord>,
    pub charts: Vec<ChartRecord>,
    pub chart_categories: Vec<ChartCategory>,
    pub chart_measures: Vec<ChartMeasure>,
    pub pivot_measures: Vec<PivotMeasure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<ReportFilter>,
}

impl ReportExtract {
    pub fn column(&self, column_id: &str) -> Option<&ColumnRecord> {
        self.columns.iter().find(|c| c.column_id == column_id)
    }

    /// First compound view, if any.
    pub fn compound_view(&self) -> Option<&ViewRecord> {
        self.views.iter().find(|v| v.kind == ViewKind::Compound)
    }

    /// Chart settings for a normalized view name.
    pub fn chart(&self, view_name: &str) -> Option<&ChartRecord> {
        self.charts.iter().find(|c| c.view_name == view_name)
    }
}
