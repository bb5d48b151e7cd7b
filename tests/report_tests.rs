//! Report importer tests

use bi_catalog_extract::import::ReportImporter;
use bi_catalog_extract::models::{ReportExtract, ViewKind};
use bi_catalog_extract::resolve::worksheets::AggregationRules;

const REVENUE: &str = include_str!("fixtures/catalog/shared/Sales/Revenue");

fn import_revenue() -> ReportExtract {
    ReportImporter::new().import(REVENUE, "Revenue").unwrap()
}

mod report_import_tests {
    use super::*;

    #[test]
    fn test_report_metadata() {
        let extract = import_revenue();
        let report = &extract.report;
        assert_eq!(report.report_file, "Revenue");
        assert_eq!(report.xml_version, "201201160");
        assert_eq!(report.criteria_type, "simpleCriteria");
        assert_eq!(report.subject_area, "\"Sales\"");
        assert_eq!(report.within_hierarchy, "true");
        assert!(!report.has_ambiguous_subject_area());
    }

    #[test]
    fn test_columns_and_order() {
        let extract = import_revenue();
        assert_eq!(extract.columns.len(), 3);

        let year = extract.column("c0").unwrap();
        assert_eq!(year.column_type, "regularColumn");
        assert_eq!(year.expr_type, "sqlExpression");
        assert_eq!(year.expression, r#""Time"."Year""#);

        let flag = extract.column("c2").unwrap();
        assert_eq!(flag.expression, "CASE WHEN saw_1 > 0 THEN 1 ELSE 0 END");
        assert_eq!(flag.table_heading, "Flags");
        assert_eq!(flag.column_heading, "Positive");

        assert_eq!(extract.column_orders.len(), 1);
        assert_eq!(extract.column_orders[0].column_id, "c0");
        assert_eq!(extract.column_orders[0].direction, "descending");
    }

    #[test]
    fn test_views_and_compound_layout() {
        let extract = import_revenue();
        let raw: Vec<&str> = extract.views.iter().map(|v| v.view_name_raw.as_str()).collect();
        assert_eq!(raw, vec!["compoundView!1", "titleView!1", "tableView!1", "dvtchart!1"]);
        assert!(extract.views.iter().all(|v| v.in_compound_view));

        let compound = extract.compound_view().unwrap();
        assert_eq!(compound.kind, ViewKind::Compound);
        let layout = compound.compound.as_ref().unwrap();
        assert_eq!(layout.current_view, "1");
        assert_eq!(layout.children, vec!["titleView", "dvtchart", "tableView"]);
        assert_eq!(layout.selected_child(), Some("dvtchart!1"));

        let title = &extract.views[1];
        assert_eq!(title.kind, ViewKind::Title);
        assert_eq!(title.view_name, "titleView");
        assert_eq!(title.title_text, "Revenue by Year");
    }

    #[test]
    fn test_edges_and_layers() {
        let extract = import_revenue();
        assert_eq!(extract.edges.len(), 1);
        assert_eq!(extract.edges[0].view_name, "tableView");
        assert_eq!(extract.edges[0].axis, "row");
        assert_eq!(extract.edges[0].show_column_header, "true");

        assert_eq!(extract.edge_layers.len(), 2);
        assert_eq!(extract.edge_layers[0].agg_rule, "");
        assert_eq!(extract.edge_layers[1].column_id, "c1");
        assert_eq!(extract.edge_layers[1].agg_rule, "sum");
        assert!(extract.pivot_measures.is_empty());
    }

    #[test]
    fn test_chart_settings() {
        let extract = import_revenue();
        let chart = extract.chart("dvtchart").unwrap();
        assert_eq!(chart.chart_type(), "bar_stacked");
        assert_eq!(chart.bar_style, "gradient");
        assert_eq!(chart.effect, "2d");
        assert_eq!(chart.canvas_height, "330");
        assert_eq!(chart.canvas_width, "520");
        assert_eq!(chart.data_labels_position, "outside");
        assert_eq!(chart.legend_position, "bottom");

        assert_eq!(extract.chart_categories.len(), 1);
        assert_eq!(extract.chart_categories[0].column_id, "c0");
        assert_eq!(extract.chart_measures.len(), 1);
        assert_eq!(extract.chart_measures[0].column_id, "c1");
        assert_eq!(extract.chart_measures[0].measure_type, "y");
    }

    #[test]
    fn test_report_filter() {
        let extract = import_revenue();
        let filter = extract.filter.as_ref().unwrap();
        assert!(filter.attributes.is_empty());
        assert_eq!(filter.criteria_attributes.len(), 1);
        assert_eq!(filter.criteria_attributes["distinct"], "false");

        assert_eq!(filter.conditions.len(), 2);
        let year = &filter.conditions[0];
        assert_eq!(year.operator, "equal");
        assert_eq!(year.parent_operator, "and");
        assert_eq!(year.column_expression, r#""Time"."Year" = 2024"#);
        assert_eq!(year.table_name, "Time");
        assert_eq!(year.column_name, "Year");
        assert_eq!(year.filter_value, "2024");

        let region = &filter.conditions[1];
        assert_eq!(region.operator, "in");
        assert_eq!(region.column_expression, r#""Markets"."Region" IN (East, West)"#);
        assert_eq!(region.filter_value, "East | West");
    }

    #[test]
    fn test_pie_series_generator_is_a_category() {
        let xml = r#"<saw:report xmlns:saw="com.siebel.analytics.web/report/v1.1" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <saw:views>
    <saw:view xsi:type="saw:dvtchart" name="dvtchart!1">
      <saw:display type="pie"/>
      <saw:selections>
        <saw:seriesGenerators>
          <saw:seriesGenerator><saw:columnRef columnID="c4"/></saw:seriesGenerator>
        </saw:seriesGenerators>
      </saw:selections>
    </saw:view>
  </saw:views>
</saw:report>"#;
        let extract = ReportImporter::new().import(xml, "Pie").unwrap();
        assert_eq!(extract.chart("dvtchart").unwrap().chart_type(), "pie");
        assert_eq!(extract.chart_categories.len(), 1);
        assert_eq!(extract.chart_categories[0].column_id, "c4");
        assert!(extract.filter.is_none());
    }

    #[test]
    fn test_nested_subject_areas_are_joined() {
        let xml = r#"<saw:report xmlns:saw="com.siebel.analytics.web/report/v1.1" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <saw:criteria xsi:type="saw:setOperatorCriteria">
    <saw:criteria xsi:type="saw:simpleCriteria" subjectArea="&quot;Sales&quot;"/>
    <saw:criteria xsi:type="saw:simpleCriteria" subjectArea="&quot;Finance&quot;"/>
    <saw:criteria xsi:type="saw:simpleCriteria" subjectArea="&quot;Sales&quot;"/>
  </saw:criteria>
</saw:report>"#;
        let extract = ReportImporter::new().import(xml, "Union").unwrap();
        assert_eq!(extract.report.criteria_type, "setOperatorCriteria");
        assert_eq!(extract.report.subject_area, "Sales | Finance");
        assert!(extract.report.has_ambiguous_subject_area());
    }

    #[test]
    fn test_table_edges_read_before_pivot_edges() {
        let xml = r#"<saw:report xmlns:saw="com.siebel.analytics.web/report/v1.1" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <saw:views currentView="0">
    <saw:view xsi:type="saw:pivotTableView" name="pivotTableView!1">
      <saw:edges>
        <saw:edge axis="column">
          <saw:edgeLayers><saw:edgeLayer type="column" columnID="c1" aggRule="avg"/></saw:edgeLayers>
        </saw:edge>
      </saw:edges>
    </saw:view>
    <saw:view xsi:type="saw:tableView" name="tableView!1">
      <saw:edges>
        <saw:edge axis="row">
          <saw:edgeLayers><saw:edgeLayer type="column" columnID="c1" aggRule="sum"/></saw:edgeLayers>
        </saw:edge>
      </saw:edges>
    </saw:view>
  </saw:views>
</saw:report>"#;
        let extract = ReportImporter::new().import(xml, "Mixed").unwrap();
        let views: Vec<&str> = extract.edge_layers.iter().map(|l| l.view_name.as_str()).collect();
        assert_eq!(views, vec!["tableView", "pivotTableView"]);

        let rules = AggregationRules::new(&extract);
        assert_eq!(rules.lookup("", "c1"), "sum");
        assert_eq!(rules.lookup("pivotTableView", "c1"), "avg");
    }

    #[test]
    fn test_current_view_indexes_first_compound_view() {
        let xml = r#"<saw:report xmlns:saw="com.siebel.analytics.web/report/v1.1" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <saw:views currentView="1">
    <saw:view xsi:type="saw:compoundView" name="compoundView!1">
      <saw:cvTable>
        <saw:cvRow><saw:cvCell viewName="tableView!1"/></saw:cvRow>
        <saw:cvRow><saw:cvCell viewName="pivotTableView!1"/></saw:cvRow>
      </saw:cvTable>
    </saw:view>
    <saw:view xsi:type="saw:compoundView" name="compoundView!2">
      <saw:cvTable>
        <saw:cvRow><saw:cvCell viewName="dvtchart!1"/></saw:cvRow>
      </saw:cvTable>
    </saw:view>
    <saw:view xsi:type="saw:tableView" name="tableView!1"/>
    <saw:view xsi:type="saw:pivotTableView" name="pivotTableView!1"/>
    <saw:view xsi:type="saw:dvtchart" name="dvtchart!1"/>
  </saw:views>
</saw:report>"#;
        let extract = ReportImporter::new().import(xml, "TwoLayouts").unwrap();
        let first = extract.compound_view().unwrap();
        assert_eq!(first.view_name_raw, "compoundView!1");
        assert_eq!(
            first.compound.as_ref().unwrap().selected_child(),
            Some("pivotTableView!1")
        );

        let second = extract
            .views
            .iter()
            .find(|v| v.view_name_raw == "compoundView!2")
            .unwrap();
        assert_eq!(
            second.compound.as_ref().unwrap().children_raw,
            vec!["dvtchart!1"]
        );
    }

    #[test]
    fn test_malformed_report_is_an_error() {
        let broken = include_str!("fixtures/catalog/shared/Sales/Broken");
        assert!(ReportImporter::new().import(broken, "Broken").is_err());
    }
}
