//! Global-filter visual configuration exporter
//!
//! Turns the `globalFilterPrompt` rows of the Filters table into dropdown
//! slicer configurations, grouped by dashboard and tab. Slicers are placed on
//! a two-column grid in Filters order; names are derived from a v5 UUID so
//! repeated runs produce identical output.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use super::{ExportError, ExportResult};
use crate::models::FilterRow;

/// Filter type of prompt rows that become slicers
pub const GLOBAL_FILTER_PROMPT: &str = "globalFilterPrompt";

const GRID_ORIGIN_X: u32 = 1200;
const GRID_ORIGIN_Y: u32 = 200;
const GRID_COLUMN_WIDTH: u32 = 350;
const GRID_ROW_HEIGHT: u32 = 200;
const SLICER_Z: u32 = 4001;
const SLICER_WIDTH: f64 = 336.05;
const SLICER_HEIGHT: f64 = 171.72;
const NAME_LENGTH: usize = 20;

/// Grid position of the `index`-th slicer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlicerPlacement {
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub width: f64,
    pub height: f64,
    pub tab_order: u32,
}

impl SlicerPlacement {
    pub fn for_index(index: usize) -> Self {
        let index = index as u32;
        Self {
            x: GRID_ORIGIN_X + (index % 2) * GRID_COLUMN_WIDTH,
            y: GRID_ORIGIN_Y + (index / 2) * GRID_ROW_HEIGHT,
            z: SLICER_Z,
            width: SLICER_WIDTH,
            height: SLICER_HEIGHT,
            tab_order: SLICER_Z + index,
        }
    }
}

/// One slicer with its dashboard and tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlicerEntry {
    pub dashboard: String,
    pub tab: String,
    /// Compact JSON of the visual configuration
    pub config: String,
}

/// Exporter for slicer configurations
#[derive(Debug, Default, Clone, Copy)]
pub struct VisualConfigExporter;

impl VisualConfigExporter {
    pub fn new() -> Self {
        Self
    }

    /// Read a Filters CSV file.
    pub fn read_filters(&self, path: &Path) -> Result<Vec<FilterRow>, ExportError> {
        let mut reader = ::csv::Reader::from_path(path)
            .map_err(|e| ExportError::IoError(format!("{}: {}", path.display(), e)))?;
        reader
            .deserialize()
            .collect::<Result<Vec<FilterRow>, _>>()
            .map_err(|e| ExportError::SerializationError(e.to_string()))
    }

    /// Build slicer entries, grouped by dashboard and tab in first-seen order.
    pub fn entries(&self, filters: &[FilterRow]) -> Result<Vec<SlicerEntry>, ExportError> {
        let mut groups: Vec<((String, String), Vec<SlicerEntry>)> = Vec::new();

        for (index, row) in filters
            .iter()
            .filter(|row| row.filter_type == GLOBAL_FILTER_PROMPT)
            .enumerate()
        {
            let config = slicer_config(row, index);
            let entry = SlicerEntry {
                dashboard: row.dashboard_name.clone(),
                tab: row.worksheet_name.clone(),
                config: serde_json::to_string(&config)
                    .map_err(|e| ExportError::SerializationError(e.to_string()))?,
            };
            let key = (entry.dashboard.clone(), entry.tab.clone());
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, entries)) => entries.push(entry),
                None => groups.push((key, vec![entry])),
            }
        }

        let entries: Vec<SlicerEntry> = groups.into_iter().flat_map(|(_, e)| e).collect();
        info!("Built {} slicer configurations", entries.len());
        Ok(entries)
    }

    /// Build and render the slicer entries of `filters`.
    pub fn export(&self, filters: &[FilterRow]) -> Result<ExportResult, ExportError> {
        self.render(&self.entries(filters)?)
    }

    /// Render entries as a JSON array with one compact entry per line.
    pub fn render(&self, entries: &[SlicerEntry]) -> Result<ExportResult, ExportError> {
        let lines = entries
            .iter()
            .map(|entry| {
                serde_json::to_string(entry)
                    .map(|line| format!("    {}", line))
                    .map_err(|e| ExportError::SerializationError(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let content = if lines.is_empty() {
            "[\n]".to_string()
        } else {
            format!("[\n{}\n]", lines.join(",\n"))
        };
        Ok(ExportResult {
            content,
            format: "json".to_string(),
        })
    }
}

/// Stable slicer name for a row at a grid index.
pub fn slicer_name(row: &FilterRow, index: usize) -> String {
    let key = format!(
        "{}::{}::{}.{}::{}",
        row.dashboard_name, row.worksheet_name, row.table_name, row.column_name, index
    );
    let id = Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes());
    id.simple().to_string()[..NAME_LENGTH].to_string()
}

fn slicer_config(row: &FilterRow, index: usize) -> Value {
    let query_ref = format!("{}.{}", row.table_name, row.column_name.replace(' ', ""));
    json!({
        "name": slicer_name(row, index),
        "layouts": [{
            "id": 0,
            "position": SlicerPlacement::for_index(index),
        }],
        "singleVisual": {
            "visualType": "slicer",
            "projections": {"Values": [{"queryRef": query_ref, "active": true}]},
            "prototypeQuery": {
                "Version": 2,
                "From": [{"Name": "t", "Entity": row.table_name, "Type": 0}],
                "Select": [{
                    "Column": {
                        "Expression": {"SourceRef": {"Source": "t"}},
                        "Property": row.column_name,
                    },
                    "Name": query_ref,
                    "NativeReferenceName": row.column_name,
                }],
            },
            "drillFilterOtherVisuals": true,
            "objects": {
                "data": [{
                    "properties": {"mode": {"expr": {"Literal": {"Value": "'Dropdown'"}}}}
                }],
                "header": [{
                    "properties": {
                        "text": {"expr": {"Literal": {"Value": format!("'{}'", row.prompt_name)}}}
                    }
                }],
            },
        },
    })
}
