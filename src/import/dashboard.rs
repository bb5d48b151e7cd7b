//! Dashboard importer
//!
//! Reads dashboard layout documents (the page list) and page documents
//! (columns, sections and the report, prompt and link references inside
//! them). Ordinal positions are kept so the references can be laid out the
//! way the page shows them.

use tracing::info;

use super::ImportError;
use crate::models::{
    ActionLinkRef, DashboardColumn, DashboardPage, DashboardRecord, DashboardSection,
    GlobalFilterRef, PageContext, PageExtract, PageRef, ReportViewRef, SectionPlacement,
};
use crate::xml::{self, Document, Element};

/// Dashboard Importer
#[derive(Debug, Default, Clone, Copy)]
pub struct DashboardImporter;

impl DashboardImporter {
    pub fn new() -> Self {
        Self
    }

    /// Import a dashboard layout document.
    pub fn import_layout(
        &self,
        xml_content: &str,
        dashboard_name: &str,
        layout_file: &str,
    ) -> Result<DashboardRecord, ImportError> {
        let document = Document::parse(xml_content)?;
        let root = &document.root;

        let page_refs: Vec<PageRef> = root
            .find_all("sawd:dashboardPageRef")
            .into_iter()
            .map(|page| PageRef {
                path: page.attr("path"),
                page_type: page.attr("type"),
                hidden: page.attr("hidden"),
            })
            .collect();

        info!(
            "Dashboard layout '{}' parsed: {} page references",
            dashboard_name,
            page_refs.len()
        );

        Ok(DashboardRecord {
            name: dashboard_name.to_string(),
            layout_file: layout_file.to_string(),
            style: root.attr("style"),
            fit_content: root.attr("fitContent"),
            xml_version: root.attr("xmlVersion"),
            get_tab_with_action_link: root.attr("getTabWithActionLink"),
            prompts_auto_complete: root.attr("promptsAutoComplete"),
            duid: root.attr("duid"),
            page_refs,
        })
    }

    /// Import a dashboard page document.
    pub fn import_page(
        &self,
        xml_content: &str,
        context: &PageContext,
    ) -> Result<PageExtract, ImportError> {
        let document = Document::parse(xml_content)?;
        let root = &document.root;
        let page_duid = root.attr("duid");

        let mut extract = PageExtract {
            page: DashboardPage {
                dashboard_name: context.dashboard_name.clone(),
                page_name: context.page_name.clone(),
                page_file: context.page_file.clone(),
                xml_version: root.attr("xmlVersion"),
                is_empty: root.attr("isEmpty"),
                duid: page_duid.clone(),
                parent_duid: context.dashboard_duid.clone(),
            },
            ..Default::default()
        };

        for (column_index, column) in root.find_all("sawd:dashboardColumn").into_iter().enumerate() {
            let column_name = column.attr("name");
            let column_duid = column.attr("duid");
            extract.columns.push(DashboardColumn {
                dashboard_name: context.dashboard_name.clone(),
                page_name: context.page_name.clone(),
                index: column_index,
                name: column_name.clone(),
                frozen: column.attr("frozen"),
                can_freeze: column.attr("canFreeze"),
                layout_type: column.attr("layoutType"),
                duid: column_duid.clone(),
                parent_duid: page_duid.clone(),
            });

            for (section_index, section) in column
                .find_all("sawd:dashboardSection")
                .into_iter()
                .enumerate()
            {
                let section_duid = section.attr("duid");
                extract.sections.push(DashboardSection {
                    dashboard_name: context.dashboard_name.clone(),
                    page_name: context.page_name.clone(),
                    column_name: column_name.clone(),
                    index: section_index,
                    name: section.attr("name"),
                    layout_type: section.attr("layoutType"),
                    show_section_title: section.attr("showSectionTitle"),
                    collapsible: section.attr("collapsible"),
                    horizontal_layout: section.attr("horizontalLayout"),
                    duid: section_duid.clone(),
                    parent_duid: column_duid.clone(),
                });

                let placement = SectionPlacement {
                    dashboard_name: context.dashboard_name.clone(),
                    page_name: context.page_name.clone(),
                    page_file: context.page_file.clone(),
                    column_name: column_name.clone(),
                    column_index,
                    section_name: section.attr("name"),
                    section_index,
                    item_index: 0,
                    parent_duid: section_duid,
                };
                self.extract_section_items(section, &placement, &mut extract);
            }
        }

        info!(
            "Dashboard page '{}' parsed: {} columns, {} sections, {} report views, {} global filters, {} action links",
            context.page_name,
            extract.columns.len(),
            extract.sections.len(),
            extract.report_views.len(),
            extract.global_filters.len(),
            extract.action_links.len()
        );
        Ok(extract)
    }

    fn extract_section_items(
        &self,
        section: &Element,
        placement: &SectionPlacement,
        extract: &mut PageExtract,
    ) {
        let at = |item_index: usize| SectionPlacement {
            item_index,
            ..placement.clone()
        };

        for (i, view) in section.find_all("sawd:reportView").into_iter().enumerate() {
            let report_ref = view.find("sawd:reportRef");
            extract.report_views.push(ReportViewRef {
                placement: at(i),
                report_view_name: view.attr("name"),
                display: view.attr("display"),
                show_view: view.attr("showView"),
                duid: view.attr("duid"),
                caption: xml::text(view.find("saw:caption/saw:text")),
                report_path: xml::attr(report_ref, "path").replace("\\/", "/"),
                report_type: xml::attr(report_ref, "type"),
            });
        }

        for (i, filter) in section.find_all("sawd:globalFilterView").into_iter().enumerate() {
            extract.global_filters.push(GlobalFilterRef {
                placement: at(i),
                filter_name: filter.attr("name"),
                filter_path: filter.attr("path"),
                duid: filter.attr("duid"),
                caption: xml::text(filter.find("saw:caption/saw:text")),
            });
        }

        for (i, link_view) in section.find_all("sawd:actionLinkView").into_iter().enumerate() {
            let Some(link) = link_view.find("sawd:actionLink") else {
                continue;
            };
            extract.action_links.push(ActionLinkRef {
                placement: at(i),
                action_link_name: link_view.attr("name"),
                duid: link_view.attr("duid"),
                brief_book_link: link.attr("briefBookLink"),
                target: link.attr("target"),
                display_name: link.attr("sDisplayName"),
                caption: xml::text(link.find("saw:caption/saw:text")),
                navigation_path: xml::text(
                    link.find("saw:action/saw:assignments/saw:assign/saw:value"),
                ),
            });
        }
    }
}
