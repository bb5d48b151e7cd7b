//! Dashboards and Windows tables
//!
//! Both list every reference (reports, then prompts, then links). Windows
//! stack each kind vertically by its position in the reference list.

use super::{CatalogResolver, ResolvedReferences, RowContext};
use crate::models::{DashboardRow, SectionPlacement, WindowRow};

const REPORT_ROW_HEIGHT: usize = 400;
const PROMPT_ROW_HEIGHT: usize = 100;
const LINK_ROW_HEIGHT: usize = 50;

#[derive(Clone, Copy)]
enum ObjectClass {
    Reports,
    Prompts,
    Links,
}

impl ObjectClass {
    fn as_str(self) -> &'static str {
        match self {
            ObjectClass::Reports => "Reports",
            ObjectClass::Prompts => "Prompts",
            ObjectClass::Links => "Links",
        }
    }

    fn row_height(self) -> usize {
        match self {
            ObjectClass::Reports => REPORT_ROW_HEIGHT,
            ObjectClass::Prompts => PROMPT_ROW_HEIGHT,
            ObjectClass::Links => LINK_ROW_HEIGHT,
        }
    }
}

/// One placed object: (class, placement, caption, object path, display)
type PlacedObject<'r> = (ObjectClass, &'r SectionPlacement, &'r str, &'r str, &'r str);

fn placed_objects(references: &ResolvedReferences) -> Vec<PlacedObject<'_>> {
    let reports = references.report_views.iter().map(|(r, _)| {
        (
            ObjectClass::Reports,
            &r.placement,
            r.caption.as_str(),
            r.report_path.as_str(),
            r.display.as_str(),
        )
    });
    let prompts = references.global_filters.iter().map(|(f, _)| {
        (
            ObjectClass::Prompts,
            &f.placement,
            f.caption.as_str(),
            f.filter_path.as_str(),
            "",
        )
    });
    let links = references.action_links.iter().map(|l| {
        (
            ObjectClass::Links,
            &l.placement,
            l.caption.as_str(),
            l.navigation_path.as_str(),
            "",
        )
    });
    reports.chain(prompts).chain(links).collect()
}

pub(super) fn dashboard_rows(
    resolver: &CatalogResolver<'_>,
    references: &ResolvedReferences,
) -> Vec<DashboardRow> {
    let root = &resolver.corpus().root;
    placed_objects(references)
        .into_iter()
        .map(|(class, placement, caption, path, _)| {
            let context = RowContext::new(placement, root);
            DashboardRow {
                worksheet_name: context.worksheet_name,
                dashboard_name: context.dashboard_name,
                object_name: caption.to_string(),
                object_type: class.as_str().to_string(),
                object_path: path.to_string(),
                worksheet_path: context.worksheet_path,
                dashboard_path: context.dashboard_path,
            }
        })
        .collect()
}

pub(super) fn window_rows(
    resolver: &CatalogResolver<'_>,
    references: &ResolvedReferences,
) -> Vec<WindowRow> {
    let root = &resolver.corpus().root;
    let mut rows = Vec::new();
    let mut position_in_class = [0usize; 3];

    for (class, placement, caption, _, display) in placed_objects(references) {
        let slot = &mut position_in_class[class as usize];
        let y_position = *slot * class.row_height();
        *slot += 1;

        let context = RowContext::new(placement, root);
        rows.push(WindowRow {
            worksheet_name: context.worksheet_name,
            dashboard_name: context.dashboard_name,
            window_name: caption.to_string(),
            window_class: class.as_str().to_string(),
            section_name: placement.section_name.clone(),
            column_name: placement.column_name.clone(),
            display: display.to_string(),
            y_position,
            worksheet_path: context.worksheet_path,
            dashboard_path: context.dashboard_path,
        });
    }
    rows
}
