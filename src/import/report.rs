//! Report importer
//!
//! Parses one report document into its related record sets: report metadata,
//! criteria columns, sort order, views, edges and edge layers, charts with
//! their categories and measures, pivot measures, and the flattened report
//! filter.

use std::collections::HashSet;

use tracing::{debug, info};

use super::ImportError;
use super::filter::FilterFlattener;
use super::identifiers::{normalize_view_name, strip_quotes};
use crate::models::{
    ChartCategory, ChartMeasure, ChartRecord, ColumnOrder, ColumnRecord, CompoundLayout,
    EdgeLayerRecord, EdgeRecord, PivotMeasure, ReportExtract, ReportFilter, ReportRecord,
    ViewKind, ViewRecord,
};
use crate::xml::{self, Document, Element};

/// Criteria attributes that have their own output columns
const CRITERIA_LAYOUT_EXCLUDED: [&str; 3] = ["type", "subjectArea", "withinHierarchy"];

/// Report Importer
///
/// Stateless; one instance can import any number of documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportImporter;

impl ReportImporter {
    pub fn new() -> Self {
        Self
    }

    /// Import a report document.
    ///
    /// # Arguments
    ///
    /// * `xml_content` - The report XML
    /// * `report_file` - Document base name without extension
    ///
    /// # Returns
    ///
    /// All record sets of the report, or an error when the document is not
    /// well-formed.
    pub fn import(&self, xml_content: &str, report_file: &str) -> Result<ReportExtract, ImportError> {
        let document = Document::parse(xml_content)?;
        let root = &document.root;

        let mut extract = ReportExtract {
            report: self.extract_report(root, report_file),
            columns: self.extract_columns(root, report_file),
            column_orders: self.extract_column_orders(root, report_file),
            views: self.extract_views(root, report_file),
            filter: self.extract_filter(root),
            ..Default::default()
        };

        // Table views are read before pivot views; the any-view aggregation
        // fallback takes the first rule registered for a column.
        let views = root.find_all("saw:views/saw:view");
        for kind in [ViewKind::Table, ViewKind::Pivot] {
            for view in views_of_kind(&views, &kind) {
                let view_name = normalize_view_name(&view.attr("name"));
                self.extract_edges(view, report_file, &view_name, &mut extract);
            }
        }
        for view in views_of_kind(&views, &ViewKind::Pivot) {
            let view_name = normalize_view_name(&view.attr("name"));
            self.extract_pivot_measures(view, report_file, &view_name, &mut extract);
        }
        for view in views_of_kind(&views, &ViewKind::Chart) {
            let view_name = normalize_view_name(&view.attr("name"));
            self.extract_chart(view, report_file, &view_name, &mut extract);
        }

        info!(
            "Report '{}' parsed: {} columns, {} views, {} charts",
            report_file,
            extract.columns.len(),
            extract.views.len(),
            extract.charts.len()
        );
        Ok(extract)
    }

    fn extract_report(&self, root: &Element, report_file: &str) -> ReportRecord {
        let criteria = root.find("saw:criteria");
        let mut subject_area = xml::attr(criteria, "subjectArea");
        let mut nested_subject_areas = Vec::new();

        if subject_area.is_empty() {
            for nested in root.find_all(".//saw:criteria") {
                if nested.local_type() != "simpleCriteria" {
                    continue;
                }
                let area = strip_quotes(&nested.attr("subjectArea")).to_string();
                if !area.is_empty() && !nested_subject_areas.contains(&area) {
                    nested_subject_areas.push(area);
                }
            }
            subject_area = nested_subject_areas.join(" | ");
        }

        ReportRecord {
            report_file: report_file.to_string(),
            xml_version: root.attr("xmlVersion"),
            criteria_type: criteria.map(Element::local_type).unwrap_or_default(),
            subject_area,
            within_hierarchy: xml::attr(criteria, "withinHierarchy"),
            nested_subject_areas,
        }
    }

    fn extract_columns(&self, root: &Element, report_file: &str) -> Vec<ColumnRecord> {
        root.find_all("saw:criteria/saw:columns/saw:column")
            .into_iter()
            .map(|column| {
                let expr = column.find("saw:columnFormula/sawx:expr");
                ColumnRecord {
                    report_file: report_file.to_string(),
                    column_id: column.attr("columnID"),
                    column_type: column.local_type(),
                    expr_type: expr.map(Element::local_type).unwrap_or_default(),
                    expression: xml::text(expr),
                    table_heading: xml::text(column.find("saw:tableHeading/saw:caption/saw:text")),
                    column_heading: xml::text(
                        column.find("saw:columnHeading/saw:caption/saw:text"),
                    ),
                }
            })
            .collect()
    }

    fn extract_column_orders(&self, root: &Element, report_file: &str) -> Vec<ColumnOrder> {
        root.find_all("saw:criteria/saw:columnOrder/saw:columnOrderRef")
            .into_iter()
            .map(|order| ColumnOrder {
                report_file: report_file.to_string(),
                column_id: order.attr("columnID"),
                direction: order.attr("direction"),
            })
            .collect()
    }

    fn extract_views(&self, root: &Element, report_file: &str) -> Vec<ViewRecord> {
        let current_view = xml::attr(root.find("saw:views"), "currentView");

        let mut compound_members: HashSet<String> = HashSet::new();
        let mut layouts = Vec::new();
        for compound in root.find_all(r#"saw:views/saw:view[@xsi:type="saw:compoundView"]"#) {
            let children_raw: Vec<String> = compound
                .find_all(".//saw:cvCell")
                .into_iter()
                .map(|cell| cell.attr("viewName"))
                .filter(|name| !name.is_empty())
                .collect();
            compound_members.extend(children_raw.iter().cloned());
            layouts.push(CompoundLayout {
                current_view: current_view.clone(),
                children: children_raw.iter().map(|n| normalize_view_name(n)).collect(),
                children_raw,
            });
        }
        let mut layouts = layouts.into_iter();

        let views: Vec<ViewRecord> = root
            .find_all("saw:views/saw:view")
            .into_iter()
            .map(|view| {
                let view_name_raw = view.attr("name");
                let kind = ViewKind::from_type(&view.local_type());
                let compound = if kind == ViewKind::Compound {
                    layouts.next()
                } else {
                    None
                };
                let title_text = if kind == ViewKind::Title {
                    xml::text(view.find("saw:title/saw:caption/saw:text"))
                } else {
                    String::new()
                };
                ViewRecord {
                    report_file: report_file.to_string(),
                    view_name: normalize_view_name(&view_name_raw),
                    in_compound_view: kind == ViewKind::Compound
                        || compound_members.contains(&view_name_raw),
                    view_name_raw,
                    kind,
                    compound,
                    title_text,
                }
            })
            .collect();

        debug!(
            "Views of '{}': {} ({} compound members)",
            report_file,
            views.len(),
            compound_members.len()
        );
        views
    }

    fn extract_edges(
        &self,
        view: &Element,
        report_file: &str,
        view_name: &str,
        extract: &mut ReportExtract,
    ) {
        for edge in view.find_all("saw:edges/saw:edge") {
            let axis = edge.attr("axis");
            extract.edges.push(EdgeRecord {
                report_file: report_file.to_string(),
                view_name: view_name.to_string(),
                axis: axis.clone(),
                show_column_header: edge.attr("showColumnHeader"),
            });
            for layer in edge.find_all("saw:edgeLayers/saw:edgeLayer") {
                extract.edge_layers.push(EdgeLayerRecord {
                    report_file: report_file.to_string(),
                    view_name: view_name.to_string(),
                    axis: axis.clone(),
                    layer_type: layer.attr("type"),
                    column_id: layer.attr("columnID"),
                    agg_rule: layer.attr("aggRule"),
                });
            }
        }
    }

    fn extract_pivot_measures(
        &self,
        view: &Element,
        report_file: &str,
        view_name: &str,
        extract: &mut ReportExtract,
    ) {
        for measure in view.find_all("saw:measuresList/saw:measure") {
            extract.pivot_measures.push(PivotMeasure {
                report_file: report_file.to_string(),
                view_name: view_name.to_string(),
                column_id: measure.attr("columnID"),
                agg_rule: measure.attr("aggRule"),
            });
        }
    }

    fn extract_chart(
        &self,
        chart: &Element,
        report_file: &str,
        view_name: &str,
        extract: &mut ReportExtract,
    ) {
        let display = chart.find("saw:display");
        let style = chart.find("saw:display/saw:style");
        let canvas = chart.find("saw:canvasFormat");
        let labels = chart.find("saw:canvasFormat/saw:dataLabels");
        let legend = chart.find("saw:legendFormat");

        extract.charts.push(ChartRecord {
            report_file: report_file.to_string(),
            view_name: view_name.to_string(),
            display_type: xml::attr(display, "type"),
            display_subtype: xml::attr(display, "subtype"),
            render_format: xml::attr(display, "renderFormat"),
            display_mode: xml::attr(display, "mode"),
            bar_style: xml::attr(style, "barStyle"),
            line_style: xml::attr(style, "lineStyle"),
            scatter_style: xml::attr(style, "scatterStyle"),
            fill_style: xml::attr(style, "fillStyle"),
            bubble_percent_size: xml::attr(style, "bubblePercentSize"),
            effect: xml::attr(style, "effect"),
            canvas_height: xml::attr(canvas, "height"),
            canvas_width: xml::attr(canvas, "width"),
            data_labels_display: xml::attr(labels, "display"),
            data_labels_label: xml::attr(labels, "label"),
            data_labels_position: xml::attr(labels, "position"),
            data_labels_transparent: xml::attr(labels, "transparentBackground"),
            data_labels_value_as: xml::attr(labels, "valueAs"),
            legend_position: xml::attr(legend, "position"),
            legend_transparent_fill: xml::attr(legend, "transparentFill"),
        });

        // Pie charts put the slice dimension under seriesGenerators
        for category in chart.find_all("saw:selections/saw:categories/saw:category") {
            extract.chart_categories.push(ChartCategory {
                report_file: report_file.to_string(),
                view_name: view_name.to_string(),
                column_id: xml::attr(category.find("saw:columnRef"), "columnID"),
            });
        }
        for generator in chart.find_all("saw:selections/saw:seriesGenerators/saw:seriesGenerator") {
            if let Some(column_ref) = generator.find("saw:columnRef") {
                extract.chart_categories.push(ChartCategory {
                    report_file: report_file.to_string(),
                    view_name: view_name.to_string(),
                    column_id: column_ref.attr("columnID"),
                });
            }
        }

        for measure in chart.find_all("saw:selections/saw:measures/saw:column") {
            extract.chart_measures.push(ChartMeasure {
                report_file: report_file.to_string(),
                view_name: view_name.to_string(),
                column_id: xml::attr(measure.find("saw:columnRef"), "columnID"),
                measure_type: measure.attr("measureType"),
                riser_type: measure.attr("riserType"),
            });
        }
    }

    fn extract_filter(&self, root: &Element) -> Option<ReportFilter> {
        let filter = root.find(".//saw:criteria/saw:filter")?;
        let expr = filter.find("sawx:expr")?;
        let criteria_attributes = root
            .find(".//saw:criteria")
            .map(|criteria| criteria.attribute_map(&CRITERIA_LAYOUT_EXCLUDED))
            .unwrap_or_default();

        Some(ReportFilter {
            attributes: filter.attribute_map(&[]),
            criteria_attributes,
            conditions: FilterFlattener::new().flatten(expr),
        })
    }
}

fn views_of_kind<'a>(views: &[&'a Element], kind: &ViewKind) -> Vec<&'a Element> {
    views
        .iter()
        .copied()
        .filter(|view| ViewKind::from_type(&view.local_type()) == *kind)
        .collect()
}
