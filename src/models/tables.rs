//! Output table rows
//!
//! Field order and the serialized names are the column layout of the
//! exported tables and must not change.

use serde::{Deserialize, Serialize};

/// A row type of one output table
pub trait OutputTable: Serialize {
    /// Table name, also the output file stem
    const TABLE: &'static str;
    /// Column headers in serialization order
    const HEADERS: &'static [&'static str];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardRow {
    #[serde(rename = "WorksheetName")]
    pub worksheet_name: String,
    #[serde(rename = "DashboardName")]
    pub dashboard_name: String,
    #[serde(rename = "ObjectName")]
    pub object_name: String,
    #[serde(rename = "ObjectType")]
    pub object_type: String,
    #[serde(rename = "ObjectPath")]
    pub object_path: String,
    #[serde(rename = "WorksheetPath")]
    pub worksheet_path: String,
    #[serde(rename = "DashboardPath")]
    pub dashboard_path: String,
}

impl OutputTable for DashboardRow {
    const TABLE: &'static str = "Dashboards";
    const HEADERS: &'static [&'static str] = &[
        "WorksheetName",
        "DashboardName",
        "ObjectName",
        "ObjectType",
        "ObjectPath",
        "WorksheetPath",
        "DashboardPath",
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorksheetRow {
    #[serde(rename = "WorksheetName")]
    pub worksheet_name: String,
    #[serde(rename = "DashboardName")]
    pub dashboard_name: String,
    #[serde(rename = "ReportName")]
    pub report_name: String,
    #[serde(rename = "ReportNameTag")]
    pub report_name_tag: String,
    #[serde(rename = "ViewId")]
    pub view_id: String,
    #[serde(rename = "DataSourceName")]
    pub data_source_name: String,
    #[serde(rename = "TableNames")]
    pub table_names: String,
    #[serde(rename = "ColumnNames")]
    pub column_names: String,
    #[serde(rename = "Formula")]
    pub formula: String,
    #[serde(rename = "ColumnId")]
    pub column_id: String,
    #[serde(rename = "ColumnType")]
    pub column_type: String,
    #[serde(rename = "ExpressionType")]
    pub expression_type: String,
    #[serde(rename = "X")]
    pub x: u8,
    #[serde(rename = "Y")]
    pub y: u8,
    #[serde(rename = "Encoding")]
    pub encoding: String,
    #[serde(rename = "MeasureType")]
    pub measure_type: String,
    #[serde(rename = "RiserType")]
    pub riser_type: String,
    #[serde(rename = "Summerized_by")]
    pub summarized_by: String,
    #[serde(rename = "IsDerived")]
    pub is_derived: String,
    #[serde(rename = "SourceColumnIds")]
    pub source_column_ids: String,
    #[serde(rename = "SourceExpressions")]
    pub source_expressions: String,
    #[serde(rename = "WorksheetPath")]
    pub worksheet_path: String,
    #[serde(rename = "DashboardPath")]
    pub dashboard_path: String,
    #[serde(rename = "ReportPath")]
    pub report_path: String,
}

impl OutputTable for WorksheetRow {
    const TABLE: &'static str = "Worksheets";
    const HEADERS: &'static [&'static str] = &[
        "WorksheetName",
        "DashboardName",
        "ReportName",
        "ReportNameTag",
        "ViewId",
        "DataSourceName",
        "TableNames",
        "ColumnNames",
        "Formula",
        "ColumnId",
        "ColumnType",
        "ExpressionType",
        "X",
        "Y",
        "Encoding",
        "MeasureType",
        "RiserType",
        "Summerized_by",
        "IsDerived",
        "SourceColumnIds",
        "SourceExpressions",
        "WorksheetPath",
        "DashboardPath",
        "ReportPath",
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartTypeRow {
    #[serde(rename = "WorksheetName")]
    pub worksheet_name: String,
    #[serde(rename = "DashboardName")]
    pub dashboard_name: String,
    #[serde(rename = "ReportName")]
    pub report_name: String,
    #[serde(rename = "ReportNameTag")]
    pub report_name_tag: String,
    #[serde(rename = "ViewId")]
    pub view_id: String,
    #[serde(rename = "ViewType")]
    pub view_type: String,
    #[serde(rename = "ChartType")]
    pub chart_type: String,
    #[serde(rename = "TitleText")]
    pub title_text: String,
    #[serde(rename = "IsCurrentView")]
    pub is_current_view: String,
    #[serde(rename = "Reason")]
    pub reason: String,
    #[serde(rename = "WorksheetPath")]
    pub worksheet_path: String,
    #[serde(rename = "DashboardPath")]
    pub dashboard_path: String,
    #[serde(rename = "ReportPath")]
    pub report_path: String,
}

impl OutputTable for ChartTypeRow {
    const TABLE: &'static str = "ChartType";
    const HEADERS: &'static [&'static str] = &[
        "WorksheetName",
        "DashboardName",
        "ReportName",
        "ReportNameTag",
        "ViewId",
        "ViewType",
        "ChartType",
        "TitleText",
        "IsCurrentView",
        "Reason",
        "WorksheetPath",
        "DashboardPath",
        "ReportPath",
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterRow {
    #[serde(rename = "WorksheetName")]
    pub worksheet_name: String,
    #[serde(rename = "DashboardName")]
    pub dashboard_name: String,
    #[serde(rename = "ReportName")]
    pub report_name: String,
    #[serde(rename = "FilterType")]
    pub filter_type: String,
    #[serde(rename = "PromptType")]
    pub prompt_type: String,
    #[serde(rename = "PromptName")]
    pub prompt_name: String,
    #[serde(rename = "Formula")]
    pub formula: String,
    #[serde(rename = "ColumnId")]
    pub column_id: String,
    #[serde(rename = "ColumnName")]
    pub column_name: String,
    #[serde(rename = "TableName")]
    pub table_name: String,
    #[serde(rename = "Direction")]
    pub direction: String,
    #[serde(rename = "Expression")]
    pub expression: String,
    #[serde(rename = "Operator")]
    pub operator: String,
    #[serde(rename = "ParentOperator")]
    pub parent_operator: String,
    #[serde(rename = "FilterValue")]
    pub filter_value: String,
    #[serde(rename = "ControlType")]
    pub control_type: String,
    #[serde(rename = "MaxChoices")]
    pub max_choices: String,
    #[serde(rename = "IncludeAllChoices")]
    pub include_all_choices: String,
    #[serde(rename = "Required")]
    pub required: String,
    #[serde(rename = "DefaultValues")]
    pub default_values: String,
    #[serde(rename = "DefaultValuesType")]
    pub default_values_type: String,
    #[serde(rename = "UsingCodeValue")]
    pub using_code_value: String,
    #[serde(rename = "ConstrainPromptType")]
    pub constrain_prompt_type: String,
    #[serde(rename = "AutoSelectValue")]
    pub auto_select_value: String,
    #[serde(rename = "PromptVarLocation")]
    pub prompt_var_location: String,
    #[serde(rename = "PromptVarType")]
    pub prompt_var_type: String,
    #[serde(rename = "PromptVarFormula")]
    pub prompt_var_formula: String,
    #[serde(rename = "PromptSourceType")]
    pub prompt_source_type: String,
    #[serde(rename = "PromptChoices")]
    pub prompt_choices: String,
    #[serde(rename = "SourceFormula")]
    pub source_formula: String,
    #[serde(rename = "Instruction")]
    pub instruction: String,
    #[serde(rename = "SubjectArea")]
    pub subject_area: String,
    #[serde(rename = "Style")]
    pub style: String,
    #[serde(rename = "Layout")]
    pub layout: String,
    #[serde(rename = "Position")]
    pub position: String,
    #[serde(rename = "Display")]
    pub display: String,
    #[serde(rename = "WorksheetPath")]
    pub worksheet_path: String,
    #[serde(rename = "DashboardPath")]
    pub dashboard_path: String,
    #[serde(rename = "ReportPath")]
    pub report_path: String,
}

impl OutputTable for FilterRow {
    const TABLE: &'static str = "Filters";
    const HEADERS: &'static [&'static str] = &[
        "WorksheetName",
        "DashboardName",
        "ReportName",
        "FilterType",
        "PromptType",
        "PromptName",
        "Formula",
        "ColumnId",
        "ColumnName",
        "TableName",
        "Direction",
        "Expression",
        "Operator",
        "ParentOperator",
        "FilterValue",
        "ControlType",
        "MaxChoices",
        "IncludeAllChoices",
        "Required",
        "DefaultValues",
        "DefaultValuesType",
        "UsingCodeValue",
        "ConstrainPromptType",
        "AutoSelectValue",
        "PromptVarLocation",
        "PromptVarType",
        "PromptVarFormula",
        "PromptSourceType",
        "PromptChoices",
        "SourceFormula",
        "Instruction",
        "SubjectArea",
        "Style",
        "Layout",
        "Position",
        "Display",
        "WorksheetPath",
        "DashboardPath",
        "ReportPath",
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRow {
    #[serde(rename = "WorksheetName")]
    pub worksheet_name: String,
    #[serde(rename = "DashboardName")]
    pub dashboard_name: String,
    #[serde(rename = "WindowName")]
    pub window_name: String,
    #[serde(rename = "WindowClass")]
    pub window_class: String,
    #[serde(rename = "SectionName")]
    pub section_name: String,
    #[serde(rename = "ColumnName")]
    pub column_name: String,
    #[serde(rename = "Display")]
    pub display: String,
    #[serde(rename = "YPosition")]
    pub y_position: usize,
    #[serde(rename = "WorksheetPath")]
    pub worksheet_path: String,
    #[serde(rename = "DashboardPath")]
    pub dashboard_path: String,
}

impl OutputTable for WindowRow {
    const TABLE: &'static str = "Windows";
    const HEADERS: &'static [&'static str] = &[
        "WorksheetName",
        "DashboardName",
        "WindowName",
        "WindowClass",
        "SectionName",
        "ColumnName",
        "Display",
        "YPosition",
        "WorksheetPath",
        "DashboardPath",
    ];
}

/// The five denormalized output tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTables {
    pub dashboards: Vec<DashboardRow>,
    pub worksheets: Vec<WorksheetRow>,
    pub chart_types: Vec<ChartTypeRow>,
    pub filters: Vec<FilterRow>,
    pub windows: Vec<WindowRow>,
}
