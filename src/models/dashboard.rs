//! Dashboard records
//!
//! Dashboards are directories holding a layout document and one document per
//! page. Pages hold columns, columns hold sections, and sections hold the
//! report, prompt and link references that the resolver joins against the
//! report and prompt documents.

use serde::{Deserialize, Serialize};

/// Dashboard layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardRecord {
    /// Directory path relative to the corpus root, `/` separated
    pub name: String,
    pub layout_file: String,
    pub style: String,
    pub fit_content: String,
    pub xml_version: String,
    pub get_tab_with_action_link: String,
    pub prompts_auto_complete: String,
    pub duid: String,
    pub page_refs: Vec<PageRef>,
}

/// Page declared by a layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    pub path: String,
    pub page_type: String,
    pub hidden: String,
}

impl PageRef {
    /// File name stem a page path is stored under (`Table views` -> `table+views`).
    pub fn file_stem(&self) -> String {
        self.path.to_lowercase().replace(' ', "+")
    }
}

/// Where a page document came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContext {
    pub dashboard_name: String,
    pub page_name: String,
    pub page_file: String,
    /// Structural id of the owning dashboard
    pub dashboard_duid: String,
}

/// Dashboard page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardPage {
    pub dashboard_name: String,
    pub page_name: String,
    pub page_file: String,
    pub xml_version: String,
    pub is_empty: String,
    pub duid: String,
    pub parent_duid: String,
}

/// Page column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardColumn {
    pub dashboard_name: String,
    pub page_name: String,
    pub index: usize,
    pub name: String,
    pub frozen: String,
    pub can_freeze: String,
    pub layout_type: String,
    pub duid: String,
    pub parent_duid: String,
}

/// Column section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSection {
    pub dashboard_name: String,
    pub page_name: String,
    pub column_name: String,
    pub index: usize,
    pub name: String,
    pub layout_type: String,
    pub show_section_title: String,
    pub collapsible: String,
    pub horizontal_layout: String,
    pub duid: String,
    pub parent_duid: String,
}

/// Location of a reference inside a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionPlacement {
    pub dashboard_name: String,
    pub page_name: String,
    pub page_file: String,
    pub column_name: String,
    pub column_index: usize,
    pub section_name: String,
    pub section_index: usize,
    /// Position among references of the same kind within the section
    pub item_index: usize,
    /// Duid of the enclosing section
    pub parent_duid: String,
}

/// Report embedded in a section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportViewRef {
    pub placement: SectionPlacement,
    /// `name` of the report view element; identifies the view shown
    pub report_view_name: String,
    pub display: String,
    pub show_view: String,
    pub duid: String,
    pub caption: String,
    /// Catalog path of the report, `\/` already unescaped
    pub report_path: String,
    pub report_type: String,
}

/// Prompt embedded in a section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalFilterRef {
    pub placement: SectionPlacement,
    pub filter_name: String,
    pub filter_path: String,
    pub duid: String,
    pub caption: String,
}

/// Navigation link embedded in a section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLinkRef {
    pub placement: SectionPlacement,
    pub action_link_name: String,
    pub duid: String,
    pub brief_book_link: String,
    pub target: String,
    pub display_name: String,
    pub caption: String,
    pub navigation_path: String,
}

/// Everything extracted from one page document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageExtract {
    pub page: DashboardPage,
    pub columns: Vec<DashboardColumn>,
    pub sections: Vec<DashboardSection>,
    pub report_views: Vec<ReportViewRef>,
    pub global_filters: Vec<GlobalFilterRef>,
    pub action_links: Vec<ActionLinkRef>,
}
