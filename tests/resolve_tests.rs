//! Resolver tests over in-memory corpora

use std::path::PathBuf;

use bi_catalog_extract::diagnostics::{DiagnosticEvent, Diagnostics};
use bi_catalog_extract::import::{DashboardImporter, PromptImporter, ReportImporter};
use bi_catalog_extract::models::{CatalogTables, PageContext};
use bi_catalog_extract::resolve::{CatalogResolver, Corpus, PromptEntry, QualityGates, ReportEntry};

const REVENUE: &str = include_str!("fixtures/catalog/shared/Sales/Revenue");
const REGION_PROMPT: &str = include_str!("fixtures/catalog/shared/Sales/prompts/Region+Prompt");
const OVERVIEW: &str =
    include_str!("fixtures/catalog/shared/Sales/_portal/sales+dashboard/overview.xml");

const ROOT: &str = "/catalog";
const DASHBOARD: &str = "shared/Sales/_portal/sales+dashboard";

fn report_entry(catalog_path: &str, file: &str, xml: &str) -> ReportEntry {
    let stem = file.rsplit('/').next().unwrap_or_default();
    ReportEntry {
        catalog_path: catalog_path.to_string(),
        file_path: PathBuf::from(ROOT).join(file),
        extract: ReportImporter::new().import(xml, stem).unwrap(),
    }
}

fn region_prompt() -> PromptEntry {
    PromptEntry {
        catalog_path: "/shared/Sales/prompts/Region Prompt".to_string(),
        file_path: PathBuf::from(ROOT).join("shared/Sales/prompts/Region+Prompt"),
        document: PromptImporter::new().import(REGION_PROMPT).unwrap(),
    }
}

fn overview_page() -> bi_catalog_extract::models::PageExtract {
    let context = PageContext {
        dashboard_name: DASHBOARD.to_string(),
        page_name: "Overview".to_string(),
        page_file: format!("{}/{}/overview.xml", ROOT, DASHBOARD),
        dashboard_duid: "dash01".to_string(),
    };
    DashboardImporter::new().import_page(OVERVIEW, &context).unwrap()
}

fn resolve(corpus: &Corpus) -> (CatalogTables, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let tables = CatalogResolver::new(corpus, QualityGates::default()).resolve(&mut diagnostics);
    (tables, diagnostics)
}

fn report(columns: &str, views: &str) -> String {
    format!(
        r#"<saw:report xmlns:saw="com.siebel.analytics.web/report/v1.1" xmlns:sawx="com.siebel.analytics.web/expression/v1.1" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <saw:criteria xsi:type="saw:simpleCriteria" subjectArea="&quot;Ops&quot;"><saw:columns>{}</saw:columns></saw:criteria>
  {}
</saw:report>"#,
        columns, views
    )
}

fn column(id: &str, formula: &str) -> String {
    format!(
        r#"<saw:column xsi:type="saw:regularColumn" columnID="{}"><saw:columnFormula><sawx:expr xsi:type="sawx:sqlExpression">{}</sawx:expr></saw:columnFormula></saw:column>"#,
        id, formula
    )
}

mod unreferenced_document_tests {
    use super::*;

    #[test]
    fn test_catalog_without_dashboards_produces_tables() {
        let mut corpus = Corpus::new(ROOT);
        corpus
            .reports
            .push(report_entry("/shared/Sales/Revenue", "shared/Sales/Revenue", REVENUE));
        let (tables, diagnostics) = resolve(&corpus);

        assert_eq!(tables.worksheets.len(), 9);
        assert_eq!(tables.chart_types.len(), 3);
        assert_eq!(tables.filters.len(), 3);
        assert_eq!(tables.dashboards.len(), 1);
        assert_eq!(tables.windows.len(), 1);
        assert!(diagnostics.events().contains(&DiagnosticEvent::ReferencesSynthesized {
            reports: 1,
            prompts: 0
        }));

        let first = &tables.worksheets[0];
        assert_eq!(first.worksheet_name, "Revenue");
        assert_eq!(first.dashboard_name, "Sales");
        assert_eq!(first.dashboard_path, "/shared/Sales");
        assert_eq!(first.worksheet_path, "/shared/Sales/Revenue");
        assert_eq!(first.report_path, "/shared/Sales/Revenue");
        assert_eq!(first.data_source_name, "Sales");
        assert_eq!(first.view_id, "titleView!1");
    }

    #[test]
    fn test_worksheet_roles_and_derivation() {
        let mut corpus = Corpus::new(ROOT);
        corpus
            .reports
            .push(report_entry("/shared/Sales/Revenue", "shared/Sales/Revenue", REVENUE));
        let (tables, _) = resolve(&corpus);

        let year = tables.worksheets.iter().find(|r| r.column_id == "c0").unwrap();
        assert_eq!((year.x, year.y), (1, 0));
        assert_eq!(year.encoding, "category");
        assert_eq!(year.table_names, "Time");
        assert_eq!(year.column_names, "Year");
        assert_eq!(year.is_derived, "No");

        let revenue = tables.worksheets.iter().find(|r| r.column_id == "c1").unwrap();
        assert_eq!((revenue.x, revenue.y), (0, 1));
        assert_eq!(revenue.encoding, "measure");
        assert_eq!(revenue.measure_type, "y");
        assert_eq!(revenue.summarized_by, "sum");
        assert_eq!(revenue.table_names, "Sales Facts");

        let flag = tables.worksheets.iter().find(|r| r.column_id == "c2").unwrap();
        assert_eq!(flag.is_derived, "Yes");
        assert_eq!(flag.source_column_ids, "saw_1");
        assert_eq!(flag.table_names, "Flags");
        assert_eq!(flag.column_names, "Positive");

        let view_ids: Vec<&str> = tables
            .worksheets
            .iter()
            .filter(|r| r.column_id == "c1")
            .map(|r| r.view_id.as_str())
            .collect();
        assert_eq!(view_ids, vec!["titleView!1", "tableView!1", "dvtchart!1"]);
    }

    #[test]
    fn test_report_filter_and_sort_rows() {
        let mut corpus = Corpus::new(ROOT);
        corpus
            .reports
            .push(report_entry("/shared/Sales/Revenue", "shared/Sales/Revenue", REVENUE));
        let (tables, _) = resolve(&corpus);

        let kinds: Vec<&str> = tables.filters.iter().map(|f| f.filter_type.as_str()).collect();
        assert_eq!(kinds, vec!["ReportFilter", "ReportFilter", "Sort"]);

        let region = &tables.filters[1];
        assert_eq!(region.table_name, "Markets");
        assert_eq!(region.column_name, "Region");
        assert_eq!(region.operator, "in");
        assert_eq!(region.parent_operator, "and");
        assert_eq!(region.subject_area, "Sales");
        assert_eq!(region.style, "");
        assert_eq!(region.layout, r#"{"distinct":"false"}"#);

        let sort = &tables.filters[2];
        assert_eq!(sort.column_id, "c0");
        assert_eq!(sort.direction, "descending");
        assert_eq!(sort.table_name, "Time");
        assert_eq!(sort.column_name, "Year");
        assert_eq!(sort.style, r#"{"report_file":"Revenue"}"#);
    }
}

mod chart_type_tests {
    use super::*;

    #[test]
    fn test_current_view_follows_compound_index() {
        let views = r#"<saw:views currentView="2">
    <saw:view xsi:type="saw:compoundView" name="compoundView!1">
      <saw:cvTable>
        <saw:cvRow><saw:cvCell viewName="pivotTableView!1"/></saw:cvRow>
        <saw:cvRow><saw:cvCell viewName="pivotTableView!2"/></saw:cvRow>
        <saw:cvRow><saw:cvCell viewName="tableView!1"/></saw:cvRow>
      </saw:cvTable>
    </saw:view>
    <saw:view xsi:type="saw:pivotTableView" name="pivotTableView!1"/>
    <saw:view xsi:type="saw:pivotTableView" name="pivotTableView!2"/>
    <saw:view xsi:type="saw:tableView" name="tableView!1"/>
  </saw:views>"#;
        let xml = report(&column("c0", r#""Sales"."Amount""#), views);
        let mut corpus = Corpus::new(ROOT);
        corpus
            .reports
            .push(report_entry("/shared/Ops/Pivots", "shared/Ops/Pivots", &xml));
        let (tables, _) = resolve(&corpus);

        let flags: Vec<(&str, &str, &str)> = tables
            .chart_types
            .iter()
            .map(|r| (r.view_id.as_str(), r.chart_type.as_str(), r.is_current_view.as_str()))
            .collect();
        assert_eq!(
            flags,
            vec![
                ("pivotTableView!1", "pivot", "No"),
                ("pivotTableView!2", "pivot", "No"),
                ("tableView!1", "table", "Yes"),
            ]
        );
    }

    #[test]
    fn test_out_of_range_current_view_marks_nothing() {
        let views = r#"<saw:views currentView="7">
    <saw:view xsi:type="saw:compoundView" name="compoundView!1">
      <saw:cvTable><saw:cvRow><saw:cvCell viewName="tableView!1"/></saw:cvRow></saw:cvTable>
    </saw:view>
    <saw:view xsi:type="saw:tableView" name="tableView!1"/>
  </saw:views>"#;
        let xml = report(&column("c0", r#""Sales"."Amount""#), views);
        let mut corpus = Corpus::new(ROOT);
        corpus
            .reports
            .push(report_entry("/shared/Ops/Table", "shared/Ops/Table", &xml));
        let (tables, _) = resolve(&corpus);
        assert_eq!(tables.chart_types.len(), 1);
        assert_eq!(tables.chart_types[0].is_current_view, "No");
    }
}

mod dashboard_reference_tests {
    use super::*;

    fn dashboard_corpus() -> Corpus {
        let mut corpus = Corpus::new(ROOT);
        corpus.pages.push(overview_page());
        corpus
            .reports
            .push(report_entry("/shared/Sales/Revenue", "shared/Sales/Revenue", REVENUE));
        corpus.prompts.push(region_prompt());
        corpus
    }

    #[test]
    fn test_unresolved_report_reference() {
        let (tables, diagnostics) = resolve(&dashboard_corpus());
        assert_eq!(diagnostics.unresolved_references(), 1);

        let missing: Vec<_> = tables
            .chart_types
            .iter()
            .filter(|r| r.report_path == "/shared/Sales/Gone")
            .collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].chart_type, "unknown");
        assert_eq!(missing[0].is_current_view, "No");
        assert_eq!(missing[0].reason, "Report not found at path: /shared/Sales/Gone");
        assert_eq!(missing[0].report_name, "Gone");

        assert!(tables.worksheets.iter().all(|r| r.report_path != "/shared/Sales/Gone"));
        assert!(!diagnostics.events().iter().any(|e| matches!(
            e,
            DiagnosticEvent::ReferencesSynthesized { .. }
        )));
    }

    #[test]
    fn test_referenced_report_uses_dashboard_naming() {
        let (tables, _) = resolve(&dashboard_corpus());
        let row = tables
            .chart_types
            .iter()
            .find(|r| r.report_path == "/shared/Sales/Revenue")
            .unwrap();
        assert_eq!(row.worksheet_name, "Overview");
        assert_eq!(row.dashboard_name, "sales dashboard");
        assert_eq!(row.dashboard_path, "/shared/Sales/_portal/sales dashboard");
        assert_eq!(row.worksheet_path, "/shared/Sales/_portal/sales dashboard/overview");
        assert_eq!(row.report_name, "Revenue");
        assert_eq!(row.report_name_tag, "compoundView!1");
    }

    #[test]
    fn test_prompt_row() {
        let (tables, _) = resolve(&dashboard_corpus());
        let prompt = tables
            .filters
            .iter()
            .find(|f| f.filter_type == "globalFilterPrompt")
            .unwrap();
        assert_eq!(prompt.prompt_name, "Region");
        assert_eq!(prompt.expression, r#""Markets"."Region" IN (East, West)"#);
        assert_eq!(prompt.filter_value, "East|West");
        assert_eq!(prompt.default_values, "East|West");
        assert_eq!(prompt.control_type, "dropDown");
        assert_eq!(prompt.prompt_choices, "East|West Coast");
        assert_eq!(prompt.prompt_var_formula, "pvRegion");
        assert_eq!(prompt.instruction, "Pick a region");
        assert_eq!(prompt.subject_area, "Sales");
        assert_eq!(prompt.style, r#"{"maxChoices":"all","includeAllChoices":"true"}"#);
        assert_eq!(
            prompt.position,
            r#"{"columnName":"column 1","sectionName":"section 1","filterIndex":"0"}"#
        );
        assert_eq!(prompt.display, "");
        assert_eq!(prompt.report_path, "/shared/Sales/prompts/Region Prompt");
        assert_eq!(prompt.worksheet_name, "Overview");
    }

    #[test]
    fn test_unresolved_prompt_row() {
        let mut corpus = Corpus::new(ROOT);
        corpus.pages.push(overview_page());
        let (tables, diagnostics) = resolve(&corpus);
        assert_eq!(diagnostics.unresolved_references(), 3);

        let prompt = tables.filters.iter().find(|f| f.filter_type == "Prompt").unwrap();
        assert_eq!(prompt.column_name, "Region");
        assert_eq!(prompt.report_path, "/shared/Sales/prompts/Region Prompt");
    }

    #[test]
    fn test_dashboards_and_windows() {
        let (tables, _) = resolve(&dashboard_corpus());

        let objects: Vec<(&str, &str)> = tables
            .dashboards
            .iter()
            .map(|d| (d.object_type.as_str(), d.object_name.as_str()))
            .collect();
        assert_eq!(
            objects,
            vec![
                ("Reports", "Revenue"),
                ("Reports", "Gone"),
                ("Prompts", "Region"),
                ("Links", "Go to details"),
            ]
        );
        assert_eq!(tables.dashboards[3].object_path, "/shared/Sales/_portal/Details");

        let windows: Vec<(&str, usize, &str)> = tables
            .windows
            .iter()
            .map(|w| (w.window_class.as_str(), w.y_position, w.display.as_str()))
            .collect();
        assert_eq!(
            windows,
            vec![
                ("Reports", 0, "embedded"),
                ("Reports", 400, "link"),
                ("Prompts", 0, ""),
                ("Links", 0, ""),
            ]
        );
        assert_eq!(tables.windows[2].column_name, "column 1");
        assert_eq!(tables.windows[2].section_name, "section 1");
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let corpus = dashboard_corpus();
        let (first, _) = resolve(&corpus);
        let (second, _) = resolve(&corpus);
        assert_eq!(first, second);
    }
}

mod quality_gate_tests {
    use super::*;

    #[test]
    fn test_denied_tables_and_unions_are_dropped() {
        let columns = [
            column("c0", r#""Volume"."Units""#),
            column(
                "c1",
                r#""Scheduled Pick Date"."Day" + "Transaction Details"."Id" + "As Of Date"."Day""#,
            ),
            column("c2", r#""Sales"."Amount""#),
        ]
        .concat();
        let xml = report(&columns, "");
        let mut corpus = Corpus::new(ROOT);
        corpus
            .reports
            .push(report_entry("/shared/Ops/Gated", "shared/Ops/Gated", &xml));
        let (tables, diagnostics) = resolve(&corpus);

        assert_eq!(tables.worksheets.len(), 1);
        assert_eq!(tables.worksheets[0].column_id, "c2");
        assert_eq!(tables.worksheets[0].view_id, "");
        assert_eq!(diagnostics.rejected_rows(), 2);
    }

    #[test]
    fn test_custom_denylist() {
        let xml = report(&column("c0", r#""Sales"."Amount""#), "");
        let mut corpus = Corpus::new(ROOT);
        corpus
            .reports
            .push(report_entry("/shared/Ops/Sales", "shared/Ops/Sales", &xml));
        let gates = QualityGates {
            denied_tables: vec!["SALES".to_string()],
            denied_unions: Vec::new(),
        };
        let mut diagnostics = Diagnostics::new();
        let tables = CatalogResolver::new(&corpus, gates).resolve(&mut diagnostics);
        assert!(tables.worksheets.is_empty());
        assert_eq!(diagnostics.rejected_rows(), 1);
    }
}
